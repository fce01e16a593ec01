use std::collections::HashMap;

use trustplist_engine as tp;
use trustplist_engine::domain::error::EngineError;

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum FfiError {
    #[error("{message}")]
    Generic { message: String },
}

impl From<EngineError> for FfiError {
    fn from(e: EngineError) -> Self {
        FfiError::Generic {
            message: e.to_string(),
        }
    }
}

impl From<tp::DecodeError> for FfiError {
    fn from(e: tp::DecodeError) -> Self {
        FfiError::Generic {
            message: format!("issuer name: {e}"),
        }
    }
}

// ===== FFI types mirroring the public Rust API (FFI-friendly) =====

#[derive(uniffi::Enum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiIssueKind { Base64, Asn1, TimestampFormat, InvalidInteger, MissingValue }

impl From<tp::IssueKind> for FfiIssueKind {
    fn from(v: tp::IssueKind) -> Self {
        match v { tp::IssueKind::Base64 => FfiIssueKind::Base64, tp::IssueKind::Asn1 => FfiIssueKind::Asn1, tp::IssueKind::TimestampFormat => FfiIssueKind::TimestampFormat, tp::IssueKind::InvalidInteger => FfiIssueKind::InvalidInteger, tp::IssueKind::MissingValue => FfiIssueKind::MissingValue }
    }
}

#[derive(uniffi::Record, Debug, Clone, PartialEq, Eq)]
pub struct FfiNameAttribute {
    pub kind: String,       // friendly name, or dotted OID when unknown
    pub short_name: String, // CN, O, OU, ...
    pub value: String,
}

impl From<&tp::NameAttribute> for FfiNameAttribute {
    fn from(a: &tp::NameAttribute) -> Self {
        FfiNameAttribute {
            kind: a.kind.friendly_name().to_string(),
            short_name: a.kind.short_name().to_string(),
            value: a.value.clone(),
        }
    }
}

fn flatten_name(name: &tp::DistinguishedName) -> Vec<FfiNameAttribute> {
    name.attributes().map(Into::into).collect()
}

#[derive(uniffi::Record, Debug, Clone)]
pub struct FfiCertTrust {
    pub fingerprint: String,
    pub issuer: Option<Vec<FfiNameAttribute>>,
    pub issuer_display: Option<String>,
    pub mod_date: Option<String>,      // RFC 3339
    pub serial_number: Option<String>, // decimal
    pub trust_settings: HashMap<String, String>,
}

impl From<tp::CertTrust> for FfiCertTrust {
    fn from(v: tp::CertTrust) -> Self {
        FfiCertTrust {
            issuer: v.issuer.as_ref().map(flatten_name),
            issuer_display: v.issuer.as_ref().map(|n| n.to_string()),
            mod_date: v.mod_date.map(|d| d.to_rfc3339()),
            serial_number: v.serial_number.map(|s| s.to_string()),
            trust_settings: v.trust_settings.into_iter().collect(),
            fingerprint: v.fingerprint,
        }
    }
}

#[derive(uniffi::Record, Debug, Clone)]
pub struct FfiFieldIssue {
    pub fingerprint: Option<String>,
    pub field: String,
    pub kind: FfiIssueKind,
    pub message: String,
}

impl From<tp::FieldIssue> for FfiFieldIssue {
    fn from(v: tp::FieldIssue) -> Self {
        FfiFieldIssue { fingerprint: v.fingerprint, field: v.field, kind: v.kind.into(), message: v.message }
    }
}

#[derive(uniffi::Record, Debug, Clone)]
pub struct FfiExtractionReport {
    pub source_id: String,
    pub trust_version: Option<u64>,
    pub records: Vec<FfiCertTrust>,
    pub issues: Vec<FfiFieldIssue>,
}

impl From<tp::ExtractionReport> for FfiExtractionReport {
    fn from(v: tp::ExtractionReport) -> Self {
        FfiExtractionReport {
            source_id: v.source_id,
            trust_version: v.trust_version,
            records: v.records.into_iter().map(Into::into).collect(),
            issues: v.issues.into_iter().map(Into::into).collect(),
        }
    }
}

// ===== High-level API, mirroring Rust surface =====

#[uniffi::export]
pub fn extract_trust_store_ffi(
    bytes: Vec<u8>,
    source_id: String,
    lenient_mod_date: bool,
) -> Result<FfiExtractionReport, FfiError> {
    let cfg = if lenient_mod_date { tp::ExtractConfig::lenient() } else { tp::ExtractConfig::secure_default() };
    let report = tp::extract_trust_store_report(&bytes, &source_id, &cfg).map_err(FfiError::from)?;
    Ok(report.into())
}

#[uniffi::export]
pub fn decode_issuer_name_ffi(text: String) -> Result<Vec<FfiNameAttribute>, FfiError> {
    let name = tp::decode_issuer_name(&text)?;
    Ok(flatten_name(&name))
}

uniffi::setup_scaffolding!();

#[cfg(test)]
mod tests {
    use super::*;

    const ISSUER: &str = "MG8xCzAJBgNVBAYTAlNFMRQwEgYDVQQKEwtBZGRUcnVzdCBBQjEm\
        MCQGA1UECxMdQWRkVHJ1c3QgRXh0ZXJuYWwgVFRQIE5ldHdvcmsx\
        IjAgBgNVBAMTGUFkZFRydXN0IEV4dGVybmFsIENBIFJvb3Q=";

    fn doc(mod_date: &str) -> Vec<u8> {
        format!(
            "<plist version=\"1.0\"><dict><key>trustList</key><dict>\
             <key>02FAF3E291435468607857694DF5E45B68851868</key><dict>\
             <key>issuerName</key><data>{ISSUER}</data>\
             <key>modDate</key><date>{mod_date}</date>\
             <key>serialNumber</key><data>AQ==</data>\
             <key>trustSettings</key><array><dict>\
             <key>kSecTrustSettingsResult</key><integer>4</integer>\
             </dict></array></dict></dict>\
             <key>trustVersion</key><integer>1</integer></dict></plist>"
        )
        .into_bytes()
    }

    #[test]
    fn report_maps_to_ffi_records() {
        let report = extract_trust_store_ffi(doc("2018-02-20T02:13:51Z"), "ffi.plist".into(), false).unwrap();
        assert_eq!(report.trust_version, Some(1));
        let record = &report.records[0];
        assert_eq!(record.mod_date.as_deref(), Some("2018-02-20T02:13:51+00:00"));
        assert_eq!(record.serial_number.as_deref(), Some("1"));
        assert_eq!(record.trust_settings.get("kSecTrustSettingsResult").map(String::as_str), Some("4"));
        let issuer = record.issuer.as_ref().unwrap();
        assert_eq!(issuer.len(), 4);
        assert_eq!(issuer[3].short_name, "CN");
        assert_eq!(issuer[3].kind, "CommonName");
        assert!(record.issuer_display.as_deref().unwrap().starts_with("C=SE, O=AddTrust AB"));
    }

    #[test]
    fn bad_mod_date_is_an_error_unless_lenient() {
        let err = extract_trust_store_ffi(doc("not-a-date"), "ffi.plist".into(), false).unwrap_err();
        let FfiError::Generic { message } = err;
        assert!(message.starts_with("ffi.plist: "));

        let report = extract_trust_store_ffi(doc("not-a-date"), "ffi.plist".into(), true).unwrap();
        assert!(report.records[0].mod_date.is_none());
        assert_eq!(report.issues[0].kind, FfiIssueKind::TimestampFormat);
    }

    #[test]
    fn issuer_name_helper() {
        let attrs = decode_issuer_name_ffi(ISSUER.into()).unwrap();
        assert_eq!(attrs[0], FfiNameAttribute { kind: "Country".into(), short_name: "C".into(), value: "SE".into() });
        assert!(decode_issuer_name_ffi("@@".into()).is_err());
    }
}
