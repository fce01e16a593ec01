use trustplist_engine as tp;

#[test]
fn secure_default_matches_engine_defaults() {
    let cfg = tp::ExtractConfig::secure_default();
    assert_eq!(cfg.mod_date_policy, tp::EngineDefaults::MOD_DATE_POLICY);
    assert_eq!(cfg.mod_date_policy, tp::ModDatePolicy::Fatal);
    assert_eq!(cfg.keep_partial_issuer, tp::EngineDefaults::KEEP_PARTIAL_ISSUER);
    assert_eq!(cfg.limits.max_document_size, tp::EngineDefaults::MAX_DOCUMENT_SIZE);
    assert_eq!(cfg.limits.max_xml_nodes, tp::EngineDefaults::MAX_XML_NODES);
    assert_eq!(cfg.limits.max_nesting_depth, tp::EngineDefaults::MAX_NESTING_DEPTH);
    assert!(cfg.validate().is_ok());
}

#[test]
fn default_is_secure_default() {
    let cfg = tp::ExtractConfig::default();
    assert_eq!(cfg.mod_date_policy, tp::ModDatePolicy::Fatal);
    assert!(!cfg.keep_partial_issuer);
}

#[test]
fn lenient_only_changes_mod_date_policy() {
    let cfg = tp::ExtractConfig::lenient();
    assert_eq!(cfg.mod_date_policy, tp::ModDatePolicy::Lenient);
    assert!(!cfg.keep_partial_issuer);
    assert_eq!(cfg.limits.max_document_size, tp::LimitsConfig::defaults().max_document_size);
}

#[test]
fn each_zero_limit_is_rejected() {
    let zeroed = [
        tp::LimitsConfig { max_document_size: 0, ..tp::LimitsConfig::defaults() },
        tp::LimitsConfig { max_xml_nodes: 0, ..tp::LimitsConfig::defaults() },
        tp::LimitsConfig { max_nesting_depth: 0, ..tp::LimitsConfig::defaults() },
    ];
    for limits in zeroed {
        let cfg = tp::ExtractConfig { limits, ..tp::ExtractConfig::secure_default() };
        assert!(matches!(cfg.validate(), Err(tp::EngineError::Config(_))));
    }
}
