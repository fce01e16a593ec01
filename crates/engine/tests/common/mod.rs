#![allow(dead_code)]

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

pub const FINGERPRINT: &str = "02FAF3E291435468607857694DF5E45B68851868";

pub const OID_COUNTRY: &[u8] = &[0x55, 0x04, 0x06];
pub const OID_ORGANIZATION: &[u8] = &[0x55, 0x04, 0x0A];
pub const OID_ORG_UNIT: &[u8] = &[0x55, 0x04, 0x0B];
pub const OID_COMMON_NAME: &[u8] = &[0x55, 0x04, 0x03];

/// DER TLV with short or long form length.
pub fn tlv(tag: u8, body: &[u8]) -> Vec<u8> {
    let mut out = vec![tag];
    let len = body.len();
    if len < 0x80 {
        out.push(len as u8);
    } else if len <= 0xFF {
        out.extend_from_slice(&[0x81, len as u8]);
    } else {
        out.extend_from_slice(&[0x82, (len >> 8) as u8, len as u8]);
    }
    out.extend_from_slice(body);
    out
}

/// DER `Name` with one single-valued RDN per attribute, PrintableString values.
pub fn der_name(attributes: &[(&[u8], &str)]) -> Vec<u8> {
    let mut rdns = Vec::new();
    for (oid, value) in attributes {
        let mut atv = tlv(0x06, oid);
        atv.extend(tlv(0x13, value.as_bytes()));
        rdns.extend(tlv(0x31, &tlv(0x30, &atv)));
    }
    tlv(0x30, &rdns)
}

/// The three-component AddTrust issuer used across scenarios.
pub fn addtrust_issuer_der() -> Vec<u8> {
    der_name(&[
        (OID_ORGANIZATION, "AddTrust AB"),
        (OID_ORG_UNIT, "AddTrust External TTP Network"),
        (OID_COMMON_NAME, "AddTrust External CA Root"),
    ])
}

/// Base64 wrapped and indented the way exports lay out `<data>` text.
pub fn wrapped_base64(bytes: &[u8]) -> String {
    let encoded = STANDARD.encode(bytes);
    let mut out = String::from("\n");
    for line in encoded.as_bytes().chunks(52) {
        out.push_str("\t\t\t");
        out.push_str(std::str::from_utf8(line).unwrap());
        out.push('\n');
    }
    out.push_str("\t\t\t");
    out
}

/// One certificate entry of a trust-store export, rendered in schema order.
#[derive(Clone)]
pub struct EntryFixture {
    pub fingerprint: String,
    pub issuer_data: Option<String>,
    pub mod_date: Option<String>,
    pub serial_data: Option<String>,
    /// Raw XML of the `<dict>` elements inside the trustSettings array.
    pub trust_settings: Option<Vec<String>>,
}

impl EntryFixture {
    pub fn addtrust() -> Self {
        Self {
            fingerprint: FINGERPRINT.to_string(),
            issuer_data: Some(wrapped_base64(&addtrust_issuer_der())),
            mod_date: Some("2018-02-20T02:13:51Z".to_string()),
            serial_data: Some(wrapped_base64(&[0x01])),
            trust_settings: Some(vec![result_setting(4)]),
        }
    }

    pub fn render(&self) -> String {
        let mut xml = format!("\t\t<key>{}</key>\n\t\t<dict>\n", self.fingerprint);
        if let Some(data) = &self.issuer_data {
            xml.push_str(&format!("\t\t\t<key>issuerName</key>\n\t\t\t<data>{data}</data>\n"));
        }
        if let Some(date) = &self.mod_date {
            xml.push_str(&format!("\t\t\t<key>modDate</key>\n\t\t\t<date>{date}</date>\n"));
        }
        if let Some(data) = &self.serial_data {
            xml.push_str(&format!("\t\t\t<key>serialNumber</key>\n\t\t\t<data>{data}</data>\n"));
        }
        if let Some(settings) = &self.trust_settings {
            xml.push_str("\t\t\t<key>trustSettings</key>\n\t\t\t<array>\n");
            for dict in settings {
                xml.push_str(&format!("\t\t\t\t<dict>\n{dict}\t\t\t\t</dict>\n"));
            }
            xml.push_str("\t\t\t</array>\n");
        }
        xml.push_str("\t\t</dict>\n");
        xml
    }
}

pub fn result_setting(code: i64) -> String {
    format!("\t\t\t\t\t<key>kSecTrustSettingsResult</key>\n\t\t\t\t\t<integer>{code}</integer>\n")
}

pub fn policy_name_setting(name: &str) -> String {
    format!("\t\t\t\t\t<key>kSecTrustSettingsPolicyName</key>\n\t\t\t\t\t<string>{name}</string>\n")
}

/// Full export document with the given entries under `trustList`.
pub fn trust_store_doc(entries: &[EntryFixture]) -> String {
    let body: String = entries.iter().map(EntryFixture::render).collect();
    trust_store_doc_with_list(&body)
}

/// Export document around a raw `trustList` body.
pub fn trust_store_doc_with_list(list_body: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
<dict>
	<key>trustList</key>
	<dict>
{list_body}	</dict>
	<key>trustVersion</key>
	<integer>1</integer>
</dict>
</plist>
"#
    )
}
