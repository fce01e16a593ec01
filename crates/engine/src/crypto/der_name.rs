//! DER decoding of X.509 `Name` values (RFC 5280 §4.1.2.4).
//!
//! Trust-store exports store the issuer as the raw DER of an RDNSequence.
//! Some exported entries carry damaged DER, so the walker keeps every RDN it
//! recovered before a fault and hands it back inside the error.

use std::collections::HashMap;

use const_oid::ObjectIdentifier;
use der::asn1::AnyRef;
use der::{Decode, Encode, Header, Reader, SliceReader, Tag, Tagged};
use once_cell::sync::Lazy;
use thiserror::Error;

use super::encoding::decode_base64;
use crate::domain::report::IssueKind;
use crate::domain::types::{AttributeKind, DistinguishedName, NameAttribute, RelativeDistinguishedName};

pub const CN: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.3");
pub const SURNAME: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.4");
pub const SERIAL_NUMBER: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.5");
pub const COUNTRY_NAME: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.6");
pub const LOCALITY_NAME: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.7");
pub const STATE_OR_PROVINCE_NAME: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.8");
pub const STREET_ADDRESS: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.9");
pub const ORGANIZATION_NAME: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.10");
pub const ORGANIZATIONAL_UNIT_NAME: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.11");
pub const TITLE: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.12");
pub const POSTAL_CODE: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.17");
pub const GIVEN_NAME: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.42");
pub const EMAIL_ADDRESS: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.1.9.1");
pub const DOMAIN_COMPONENT: ObjectIdentifier = ObjectIdentifier::new_unwrap("0.9.2342.19200300.100.1.25");
pub const USER_ID: ObjectIdentifier = ObjectIdentifier::new_unwrap("0.9.2342.19200300.100.1.1");

static ATTRIBUTE_TYPES: Lazy<HashMap<ObjectIdentifier, AttributeKind>> = Lazy::new(|| {
    [
        (CN, AttributeKind::CommonName),
        (SURNAME, AttributeKind::Surname),
        (SERIAL_NUMBER, AttributeKind::SerialNumber),
        (COUNTRY_NAME, AttributeKind::Country),
        (LOCALITY_NAME, AttributeKind::Locality),
        (STATE_OR_PROVINCE_NAME, AttributeKind::StateOrProvince),
        (STREET_ADDRESS, AttributeKind::StreetAddress),
        (ORGANIZATION_NAME, AttributeKind::Organization),
        (ORGANIZATIONAL_UNIT_NAME, AttributeKind::OrganizationalUnit),
        (TITLE, AttributeKind::Title),
        (POSTAL_CODE, AttributeKind::PostalCode),
        (GIVEN_NAME, AttributeKind::GivenName),
        (EMAIL_ADDRESS, AttributeKind::EmailAddress),
        (DOMAIN_COMPONENT, AttributeKind::DomainComponent),
        (USER_ID, AttributeKind::UserId),
    ]
    .into_iter()
    .collect()
});

/// Label for an attribute type OID; unknown OIDs keep their dotted form.
pub fn attribute_kind(oid: &ObjectIdentifier) -> AttributeKind {
    ATTRIBUTE_TYPES
        .get(oid)
        .cloned()
        .unwrap_or_else(|| AttributeKind::Other(oid.to_string()))
}

#[derive(Debug, Error)]
pub enum Asn1Error {
    #[error(transparent)]
    Der(#[from] der::Error),
    #[error("expected {expected}, found {found}")]
    UnexpectedTag { expected: Tag, found: Tag },
    #[error("{tag} declares {declared} bytes but only {available} remain")]
    Truncated { tag: Tag, declared: usize, available: usize },
    #[error("{0} trailing bytes after Name")]
    TrailingData(usize),
    #[error("RelativeDistinguishedName with no attributes")]
    EmptyRdn,
    #[error("invalid {tag} contents: {reason}")]
    InvalidString { tag: Tag, reason: &'static str },
}

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("base64: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("asn.1: {reason}")]
    Asn1 {
        #[source]
        reason: Asn1Error,
        /// RDNs recovered before the fault, in encoding order.
        partial: DistinguishedName,
    },
}

impl DecodeError {
    pub fn partial(&self) -> Option<&DistinguishedName> {
        match self {
            DecodeError::Asn1 { partial, .. } => Some(partial),
            DecodeError::Base64(_) => None,
        }
    }

    pub fn into_partial(self) -> Option<DistinguishedName> {
        match self {
            DecodeError::Asn1 { partial, .. } => Some(partial),
            DecodeError::Base64(_) => None,
        }
    }

    pub fn issue_kind(&self) -> IssueKind {
        match self {
            DecodeError::Base64(_) => IssueKind::Base64,
            DecodeError::Asn1 { .. } => IssueKind::Asn1,
        }
    }
}

/// Decode `<data>` text holding a DER `Name`.
pub fn decode_issuer_name(text: &str) -> Result<DistinguishedName, DecodeError> {
    let der = decode_base64(text)?;
    parse_rdn_sequence(&der)
}

/// Walk DER bytes as an RDNSequence.
pub fn parse_rdn_sequence(der: &[u8]) -> Result<DistinguishedName, DecodeError> {
    let mut walker = Walker::default();
    let mut name = DistinguishedName::default();
    let outcome = walker.walk_name(der, &mut name);
    match walker.truncation.take().or(outcome.err()) {
        None => Ok(name),
        Some(reason) => Err(DecodeError::Asn1 { reason, partial: name }),
    }
}

#[derive(Default)]
struct Walker {
    // First length overrun seen. Overrunning contents are still walked.
    truncation: Option<Asn1Error>,
}

impl Walker {
    fn walk_name(&mut self, der: &[u8], name: &mut DistinguishedName) -> Result<(), Asn1Error> {
        let mut outer = SliceReader::new(der)?;
        let body = self.read_tlv(&mut outer, Tag::Sequence)?;
        let trailing = usize::try_from(outer.remaining_len())?;

        let mut rdns = SliceReader::new(body)?;
        while !rdns.is_finished() {
            let set = self.read_tlv(&mut rdns, Tag::Set)?;
            let mut rdn = RelativeDistinguishedName::default();
            let result = self.walk_rdn(set, &mut rdn);
            if rdn.is_empty() {
                // SET SIZE (1..MAX)
                result?;
                return Err(Asn1Error::EmptyRdn);
            }
            name.0.push(rdn);
            result?;
        }

        if trailing > 0 {
            return Err(Asn1Error::TrailingData(trailing));
        }
        Ok(())
    }

    fn walk_rdn(&mut self, set: &[u8], rdn: &mut RelativeDistinguishedName) -> Result<(), Asn1Error> {
        let mut atvs = SliceReader::new(set)?;
        while !atvs.is_finished() {
            let atv = self.read_tlv(&mut atvs, Tag::Sequence)?;
            rdn.0.push(decode_attribute(atv)?);
        }
        Ok(())
    }

    fn read_tlv<'a>(&mut self, reader: &mut SliceReader<'a>, expected: Tag) -> Result<&'a [u8], Asn1Error> {
        let header = Header::decode(reader)?;
        if header.tag != expected {
            return Err(Asn1Error::UnexpectedTag { expected, found: header.tag });
        }
        let declared = usize::try_from(header.length)?;
        let available = usize::try_from(reader.remaining_len())?;
        if declared > available {
            self.truncation.get_or_insert(Asn1Error::Truncated { tag: expected, declared, available });
            let rest = reader.remaining_len();
            return Ok(reader.read_slice(rest)?);
        }
        Ok(reader.read_slice(header.length)?)
    }
}

fn decode_attribute(atv: &[u8]) -> Result<NameAttribute, Asn1Error> {
    let mut reader = SliceReader::new(atv)?;
    let oid = ObjectIdentifier::decode(&mut reader)?;
    let value = AnyRef::decode(&mut reader)?;
    reader.finish(())?;
    Ok(NameAttribute::new(attribute_kind(&oid), render_value(&value)?))
}

fn render_value(value: &AnyRef<'_>) -> Result<String, Asn1Error> {
    let bytes = value.value();
    let tag = value.tag();
    let text = match tag {
        Tag::Utf8String => std::str::from_utf8(bytes)
            .map_err(|_| Asn1Error::InvalidString { tag, reason: "not UTF-8" })?
            .to_owned(),
        Tag::PrintableString | Tag::Ia5String | Tag::VisibleString | Tag::NumericString => {
            String::from_utf8_lossy(bytes).into_owned()
        }
        // T.61 in practice carries Latin-1 or UTF-8.
        Tag::TeletexString => match std::str::from_utf8(bytes) {
            Ok(s) => s.to_owned(),
            Err(_) => bytes.iter().map(|b| char::from(*b)).collect(),
        },
        Tag::BmpString => {
            if bytes.len() % 2 != 0 {
                return Err(Asn1Error::InvalidString { tag, reason: "odd number of bytes" });
            }
            let units = bytes.chunks_exact(2).map(|pair| u16::from_be_bytes([pair[0], pair[1]]));
            char::decode_utf16(units)
                .map(|c| c.unwrap_or(char::REPLACEMENT_CHARACTER))
                .collect()
        }
        // RFC 4514 §2.4: non-string values render as '#' + hex of the encoding.
        _ => match value.to_der() {
            Ok(encoded) => format!("#{}", hex::encode(encoded)),
            Err(_) => format!("#{}", hex::encode(bytes)),
        },
    };
    Ok(text)
}
