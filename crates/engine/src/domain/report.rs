// crates/engine/src/domain/report.rs
use serde::Serialize;

use super::error::EngineResult;
use super::types::CertTrust;

/// Kind of a non-fatal, field-level problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum IssueKind {
    Base64,
    Asn1,
    TimestampFormat,
    InvalidInteger,
    /// A key had no value of its expected kind left to pair with.
    MissingValue,
}

/// A field that could not be decoded. The field is left absent on the
/// record; extraction continues.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldIssue {
    /// Fingerprint of the affected entry, `None` for document-level fields.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<String>,
    pub field: String,
    pub kind: IssueKind,
    pub message: String,
}

/// Everything extracted from one trust-store document.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionReport {
    pub source_id: String,
    /// `trustVersion` from the root mapping, when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trust_version: Option<u64>,
    pub records: Vec<CertTrust>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<FieldIssue>,
}

impl ExtractionReport {
    pub fn new(source_id: impl Into<String>) -> Self {
        Self {
            source_id: source_id.into(),
            trust_version: None,
            records: Vec::new(),
            issues: Vec::new(),
        }
    }

    pub fn record(&self, fingerprint: &str) -> Option<&CertTrust> {
        self.records.iter().find(|r| r.fingerprint == fingerprint)
    }

    pub fn issues_for<'a>(&'a self, fingerprint: &'a str) -> impl Iterator<Item = &'a FieldIssue> + 'a {
        self.issues
            .iter()
            .filter(move |i| i.fingerprint.as_deref() == Some(fingerprint))
    }

    pub fn to_json(&self) -> EngineResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
