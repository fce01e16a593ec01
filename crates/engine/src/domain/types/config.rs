use crate::domain::error::{EngineError, EngineResult};

/// What to do with an entry whose `modDate` text does not parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModDatePolicy {
    /// Abort the whole document with `ExtractError::TimestampFormat`.
    Fatal,
    /// Leave `mod_date` absent and record a field issue.
    Lenient,
}

/// Centralized defaults for the engine.
/// All opinionated defaults should be defined here for consistency.
pub struct EngineDefaults;

impl EngineDefaults {
    // Behaviour defaults
    pub const MOD_DATE_POLICY: ModDatePolicy = ModDatePolicy::Fatal; // An unparsable modDate aborts the document
    pub const KEEP_PARTIAL_ISSUER: bool = false; // Any issuer decode error leaves the issuer absent

    // Resource defaults
    pub const MAX_DOCUMENT_SIZE: usize = 32 * 1024 * 1024; // 32 MB, system exports are a few hundred KB
    pub const MAX_XML_NODES: u32 = 4_000_000;
    pub const MAX_NESTING_DEPTH: usize = 32; // Exports nest four levels deep
}

/// Configurable per-call limits to bound memory use on untrusted input.
#[derive(Debug, Clone, Copy)]
pub struct LimitsConfig {
    /// Max size in bytes of one input document.
    pub max_document_size: usize,
    /// Max number of XML nodes the parser will build.
    pub max_xml_nodes: u32,
    /// Max nesting of `<dict>`/`<array>` elements below `<plist>`.
    pub max_nesting_depth: usize,
}

impl LimitsConfig {
    /// Opinionated production defaults.
    pub fn defaults() -> Self {
        Self {
            max_document_size: EngineDefaults::MAX_DOCUMENT_SIZE,
            max_xml_nodes: EngineDefaults::MAX_XML_NODES,
            max_nesting_depth: EngineDefaults::MAX_NESTING_DEPTH,
        }
    }
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self::defaults()
    }
}

/// Configuration for extracting records from one document.
#[derive(Debug, Clone)]
pub struct ExtractConfig {
    pub mod_date_policy: ModDatePolicy,
    /// Keep the RDNs recovered before a DER fault instead of dropping the issuer.
    pub keep_partial_issuer: bool,
    /// Per-call limits. Defaults are tuned for production safety.
    pub limits: LimitsConfig,
}

impl ExtractConfig {
    /// Secure opinionated defaults.
    pub fn secure_default() -> Self {
        Self {
            mod_date_policy: EngineDefaults::MOD_DATE_POLICY,
            keep_partial_issuer: EngineDefaults::KEEP_PARTIAL_ISSUER,
            limits: LimitsConfig::defaults(),
        }
    }

    /// Defaults with `modDate` failures downgraded to field issues.
    pub fn lenient() -> Self {
        Self {
            mod_date_policy: ModDatePolicy::Lenient,
            ..Self::secure_default()
        }
    }

    pub fn validate(&self) -> EngineResult<()> {
        if self.limits.max_document_size == 0 {
            return Err(EngineError::Config("max_document_size must be greater than zero".into()));
        }
        if self.limits.max_xml_nodes == 0 {
            return Err(EngineError::Config("max_xml_nodes must be greater than zero".into()));
        }
        if self.limits.max_nesting_depth == 0 {
            return Err(EngineError::Config("max_nesting_depth must be greater than zero".into()));
        }
        Ok(())
    }
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self::secure_default()
    }
}
