use std::fmt;

use serde::{Serialize, Serializer};

/// Attribute types of an X.509 `Name`, as labelled for display.
/// Unrecognised OIDs are kept as dotted-decimal text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AttributeKind {
    CommonName,
    Surname,
    SerialNumber,
    Country,
    Locality,
    StateOrProvince,
    StreetAddress,
    Organization,
    OrganizationalUnit,
    Title,
    PostalCode,
    GivenName,
    EmailAddress,
    DomainComponent,
    UserId,
    Other(String),
}

impl AttributeKind {
    /// Short label used in rendered names (`CN`, `O`, ...). Unknown OIDs
    /// render as their dotted form.
    pub fn short_name(&self) -> &str {
        match self {
            AttributeKind::CommonName => "CN",
            AttributeKind::Surname => "SN",
            AttributeKind::SerialNumber => "SERIALNUMBER",
            AttributeKind::Country => "C",
            AttributeKind::Locality => "L",
            AttributeKind::StateOrProvince => "ST",
            AttributeKind::StreetAddress => "STREET",
            AttributeKind::Organization => "O",
            AttributeKind::OrganizationalUnit => "OU",
            AttributeKind::Title => "TITLE",
            AttributeKind::PostalCode => "POSTALCODE",
            AttributeKind::GivenName => "GN",
            AttributeKind::EmailAddress => "emailAddress",
            AttributeKind::DomainComponent => "DC",
            AttributeKind::UserId => "UID",
            AttributeKind::Other(oid) => oid,
        }
    }

    pub fn friendly_name(&self) -> &str {
        match self {
            AttributeKind::CommonName => "CommonName",
            AttributeKind::Surname => "Surname",
            AttributeKind::SerialNumber => "SerialNumber",
            AttributeKind::Country => "Country",
            AttributeKind::Locality => "Locality",
            AttributeKind::StateOrProvince => "StateOrProvince",
            AttributeKind::StreetAddress => "StreetAddress",
            AttributeKind::Organization => "Organization",
            AttributeKind::OrganizationalUnit => "OrganizationalUnit",
            AttributeKind::Title => "Title",
            AttributeKind::PostalCode => "PostalCode",
            AttributeKind::GivenName => "GivenName",
            AttributeKind::EmailAddress => "EmailAddress",
            AttributeKind::DomainComponent => "DomainComponent",
            AttributeKind::UserId => "UserId",
            AttributeKind::Other(oid) => oid,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, AttributeKind::Other(_))
    }
}

impl fmt::Display for AttributeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

impl Serialize for AttributeKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.friendly_name())
    }
}

/// One AttributeTypeAndValue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NameAttribute {
    pub kind: AttributeKind,
    pub value: String,
}

impl NameAttribute {
    pub fn new(kind: AttributeKind, value: impl Into<String>) -> Self {
        Self { kind, value: value.into() }
    }
}

/// A RelativeDistinguishedName: a set of attributes, kept in encoding order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RelativeDistinguishedName(pub Vec<NameAttribute>);

impl RelativeDistinguishedName {
    pub fn attributes(&self) -> &[NameAttribute] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Decoded RDNSequence, most significant RDN first (DER order).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DistinguishedName(pub Vec<RelativeDistinguishedName>);

impl DistinguishedName {
    pub fn rdns(&self) -> &[RelativeDistinguishedName] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Flattened attribute list in DER order.
    pub fn attributes(&self) -> impl Iterator<Item = &NameAttribute> {
        self.0.iter().flat_map(|rdn| rdn.0.iter())
    }

    /// First value of the given attribute type.
    pub fn get(&self, kind: &AttributeKind) -> Option<&str> {
        self.attributes()
            .find(|a| &a.kind == kind)
            .map(|a| a.value.as_str())
    }

    pub fn common_name(&self) -> Option<&str> {
        self.get(&AttributeKind::CommonName)
    }

    pub fn organization(&self) -> Option<&str> {
        self.get(&AttributeKind::Organization)
    }

    /// RFC 4514 string: least significant RDN first, no spaces, special
    /// characters escaped.
    pub fn to_rfc4514(&self) -> String {
        self.0
            .iter()
            .rev()
            .map(|rdn| {
                rdn.0
                    .iter()
                    .map(|a| format!("{}={}", a.kind.short_name(), escape_rfc4514(&a.value)))
                    .collect::<Vec<_>>()
                    .join("+")
            })
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl fmt::Display for DistinguishedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, rdn) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            for (j, attr) in rdn.0.iter().enumerate() {
                if j > 0 {
                    f.write_str(" + ")?;
                }
                write!(f, "{}={}", attr.kind, attr.value)?;
            }
        }
        Ok(())
    }
}

fn escape_rfc4514(value: &str) -> String {
    // Hex-encoded values ("#...") are emitted as-is.
    if value.starts_with('#') && value.len() > 1 && value[1..].bytes().all(|b| b.is_ascii_hexdigit()) {
        return value.to_string();
    }
    let last = value.chars().count().saturating_sub(1);
    let mut out = String::with_capacity(value.len());
    for (i, c) in value.chars().enumerate() {
        let leading = i == 0 && (c == ' ' || c == '#');
        let trailing = i == last && c == ' ';
        if leading || trailing || matches!(c, '"' | '+' | ',' | ';' | '<' | '>' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
