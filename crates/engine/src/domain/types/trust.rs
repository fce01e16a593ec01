use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::serial::SerialNumber;
use super::name::DistinguishedName;

/// Trust-settings key holding the integer trust result code.
pub const TRUST_RESULT_SETTING: &str = "kSecTrustSettingsResult";
/// Trust-settings key holding the policy name.
pub const POLICY_NAME_SETTING: &str = "kSecTrustSettingsPolicyName";

/// Trust record for one certificate entry of a trust-store export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CertTrust {
    /// Hex fingerprint, verbatim from the entry container's key.
    pub fingerprint: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issuer: Option<DistinguishedName>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mod_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<SerialNumber>,
    /// Setting name to its text value. Integer and string settings are both
    /// kept as text.
    pub trust_settings: BTreeMap<String, String>,
}

impl CertTrust {
    pub fn new(fingerprint: impl Into<String>) -> Self {
        Self {
            fingerprint: fingerprint.into(),
            issuer: None,
            mod_date: None,
            serial_number: None,
            trust_settings: BTreeMap::new(),
        }
    }

    pub fn trust_setting(&self, name: &str) -> Option<&str> {
        self.trust_settings.get(name).map(String::as_str)
    }

    /// `kSecTrustSettingsResult` parsed as an integer code.
    pub fn trust_result(&self) -> Option<i64> {
        self.trust_setting(TRUST_RESULT_SETTING)
            .and_then(|v| v.parse().ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trust_result_reads_result_setting() {
        let mut record = CertTrust::new("AA");
        assert_eq!(record.trust_result(), None);
        record.trust_settings.insert(TRUST_RESULT_SETTING.to_string(), "4".to_string());
        record.trust_settings.insert(POLICY_NAME_SETTING.to_string(), "sslServer".to_string());
        assert_eq!(record.trust_result(), Some(4));
        assert_eq!(record.trust_setting(POLICY_NAME_SETTING), Some("sslServer"));
    }

    #[test]
    fn non_numeric_result_has_no_code() {
        let mut record = CertTrust::new("AA");
        record.trust_settings.insert(TRUST_RESULT_SETTING.to_string(), "unspecified".to_string());
        assert_eq!(record.trust_result(), None);
    }
}
