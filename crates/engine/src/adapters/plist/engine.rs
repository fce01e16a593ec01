use std::panic::{catch_unwind, AssertUnwindSafe};

use crate::domain::error::{EngineError, EngineResult, ExtractError};
use crate::domain::report::ExtractionReport;
use crate::domain::trust_store::TrustStoreEngine;
use crate::domain::types::ExtractConfig;

use super::extract::extract_report;
use super::tree::PlistTree;

/// XML property-list trust-store backend.
pub struct PlistTrustStore;

impl TrustStoreEngine for PlistTrustStore {
  type Document = PlistTree;

  fn parse(bytes: &[u8], config: &ExtractConfig) -> Result<Self::Document, ExtractError> {
    PlistTree::parse_with_limits(bytes, &config.limits)
  }

  fn extract(
    document: &Self::Document,
    source_id: &str,
    config: &ExtractConfig,
  ) -> Result<ExtractionReport, ExtractError> {
    extract_report(document, source_id, config)
  }
}

impl PlistTrustStore {
  /// Parse and extract one document. Document-level failures come back
  /// with `source_id` attached.
  pub fn run(bytes: &[u8], source_id: &str, config: &ExtractConfig) -> EngineResult<ExtractionReport> {
    config.validate()?;
    with_panic_guard(|| {
      let document = Self::parse(bytes, config).map_err(|e| EngineError::document(source_id, e))?;
      Self::extract(&document, source_id, config).map_err(|e| EngineError::document(source_id, e))
    })
  }
}

/// Run `f`, turning a panic into `EngineError::Panic` so it never crosses
/// the library boundary.
pub fn with_panic_guard<F, T>(f: F) -> EngineResult<T>
where
  F: FnOnce() -> EngineResult<T>,
{
  match catch_unwind(AssertUnwindSafe(f)) {
    Ok(r) => r,
    Err(payload) => {
      let message = payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "trust-store extraction panicked".to_string());
      Err(EngineError::Panic(message))
    }
  }
}
