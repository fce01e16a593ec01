use super::tree::ValueKind;
use crate::domain::types::{POLICY_NAME_SETTING, TRUST_RESULT_SETTING};

// Root mapping keys
pub const TRUST_LIST: &str = "trustList";
pub const TRUST_VERSION: &str = "trustVersion";

// Per-certificate entry keys
pub const ISSUER_NAME: &str = "issuerName";
pub const MOD_DATE: &str = "modDate";
pub const SERIAL_NUMBER: &str = "serialNumber";
pub const TRUST_SETTINGS: &str = "trustSettings";

// Keys inside a trustSettings dict. Only RESULT and POLICY_NAME are extracted.
pub const SETTINGS_RESULT: &str = TRUST_RESULT_SETTING;
pub const SETTINGS_POLICY_NAME: &str = POLICY_NAME_SETTING;
pub const SETTINGS_POLICY: &str = "kSecTrustSettingsPolicy";
pub const SETTINGS_POLICY_STRING: &str = "kSecTrustSettingsPolicyString";
pub const SETTINGS_APPLICATION: &str = "kSecTrustSettingsApplication";
pub const SETTINGS_ALLOWED_ERROR: &str = "kSecTrustSettingsAllowedError";
pub const SETTINGS_KEY_USAGE: &str = "kSecTrustSettingsKeyUsage";

/// Value kind the export schema pairs with a key, for keys we know.
pub fn schema_value_kind(key: &str) -> Option<ValueKind> {
  match key {
    TRUST_LIST => Some(ValueKind::Mapping),
    TRUST_VERSION => Some(ValueKind::Integer),
    ISSUER_NAME | SERIAL_NUMBER => Some(ValueKind::Data),
    MOD_DATE => Some(ValueKind::Date),
    TRUST_SETTINGS => Some(ValueKind::Array),
    SETTINGS_RESULT | SETTINGS_ALLOWED_ERROR | SETTINGS_KEY_USAGE => Some(ValueKind::Integer),
    SETTINGS_POLICY_NAME | SETTINGS_POLICY_STRING => Some(ValueKind::String),
    SETTINGS_POLICY | SETTINGS_APPLICATION => Some(ValueKind::Data),
    _ => None,
  }
}
