// crates/engine/src/lib.rs

//! Public facade for the trust-store engine.
//! Turns a trust-store export (XML property list) into per-certificate trust
//! records. Exposes a stable API and re-exports types for consumers (CLI, FFI).

pub mod adapters;
pub mod crypto;
pub mod domain;

/// Extract every certificate entry of one document with secure defaults.
/// `source_id` names the document in errors and logs only.
pub fn extract_trust_store(bytes: &[u8], source_id: &str) -> EngineResult<Vec<CertTrust>> {
    extract_trust_store_report(bytes, source_id, &ExtractConfig::secure_default())
        .map(|report| report.records)
}

/// Extract with an explicit configuration, keeping non-fatal field issues.
pub fn extract_trust_store_report(
    bytes: &[u8],
    source_id: &str,
    cfg: &ExtractConfig,
) -> EngineResult<ExtractionReport> {
    PlistTrustStore::run(bytes, source_id, cfg)
}

/// Structural parse only.
pub fn parse_plist(bytes: &[u8]) -> Result<PlistTree, ExtractError> {
    PlistTree::parse(bytes)
}

/// Decode `<data>` text holding a DER issuer name.
pub fn decode_issuer_name(text: &str) -> Result<DistinguishedName, DecodeError> {
    crypto::der_name::decode_issuer_name(text)
}

// Re-exports for convenience
pub use adapters::plist::{extract_records, extract_report, Array, Mapping, NodeKind, PlistTree, PlistTrustStore, ValueKind, ValueRef};
pub use crypto::der_name::{Asn1Error, DecodeError};
pub use domain::error::{EngineError, EngineResult, ErrorKind, ExtractError};
pub use domain::report::{ExtractionReport, FieldIssue, IssueKind};
pub use domain::trust_store::TrustStoreEngine;
pub use domain::types::{
    AttributeKind, CertTrust, DistinguishedName, EngineDefaults, ExtractConfig, LimitsConfig, ModDatePolicy,
    NameAttribute, RelativeDistinguishedName, SerialNumber,
};
