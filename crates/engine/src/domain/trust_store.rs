// crates/engine/src/domain/trust_store.rs

use super::error::ExtractError;
use super::report::ExtractionReport;
use super::types::ExtractConfig;

/// Trait implemented by trust-store export backends (XML plist today).
pub trait TrustStoreEngine {
    type Document;

    /// Structural parse of raw document bytes.
    fn parse(bytes: &[u8], config: &ExtractConfig) -> Result<Self::Document, ExtractError>;

    /// Semantic walk of a parsed document into trust records.
    fn extract(
        document: &Self::Document,
        source_id: &str,
        config: &ExtractConfig,
    ) -> Result<ExtractionReport, ExtractError>;
}
