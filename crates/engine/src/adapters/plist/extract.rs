use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::crypto::der_name::decode_issuer_name;
use crate::crypto::encoding::{decode_serial_number, parse_plist_date};
use crate::domain::error::ExtractError;
use crate::domain::report::{ExtractionReport, FieldIssue, IssueKind};
use crate::domain::types::{CertTrust, DistinguishedName, ExtractConfig, ModDatePolicy, SerialNumber};

use super::constants::*;
use super::tree::{Array, Mapping, PlistTree, ValueKind, ValueRef};

/// Hands out the values of one mapping in order, one counter per kind.
/// The n-th key of a kind is served the n-th value of that kind.
struct Cursor<'a> {
  mapping: &'a Mapping,
  taken: [usize; ValueKind::COUNT],
}

impl<'a> Cursor<'a> {
  fn new(mapping: &'a Mapping) -> Self {
    Self { mapping, taken: [0; ValueKind::COUNT] }
  }

  fn take(&mut self, kind: ValueKind) -> Option<ValueRef<'a>> {
    let slot = &mut self.taken[kind.index()];
    let value = self.mapping.value(kind, *slot);
    *slot += 1;
    value
  }

  fn take_text(&mut self, kind: ValueKind) -> Option<&'a str> {
    self.take(kind).and_then(|v| v.as_text())
  }

  /// Consume the value of a key we do not read, so later keys of the same
  /// kind stay aligned. Known keys use the schema; unknown keys use the
  /// element that follows them in the document.
  fn skip(&mut self, key_index: usize, key: &str) {
    let kind = schema_value_kind(key).or_else(|| self.mapping.kind_after_key(key_index));
    if let Some(kind) = kind {
      self.take(kind);
    }
  }
}

/// Collects field issues for one document and mirrors them to the log.
struct Issues<'r> {
  list: &'r mut Vec<FieldIssue>,
}

impl Issues<'_> {
  fn push(&mut self, fingerprint: Option<&str>, field: &str, kind: IssueKind, message: String) {
    warn!(fingerprint = fingerprint.unwrap_or("-"), field, ?kind, %message, "skipping undecodable field");
    self.list.push(FieldIssue {
      fingerprint: fingerprint.map(str::to_owned),
      field: field.to_owned(),
      kind,
      message,
    });
  }

  fn missing(&mut self, fingerprint: Option<&str>, field: &str, kind: ValueKind) {
    self.push(
      fingerprint,
      field,
      IssueKind::MissingValue,
      format!("no <{}> value left for key", kind.element_name()),
    );
  }
}

/// Extract records with the secure default configuration.
pub fn extract_records(tree: &PlistTree) -> Result<Vec<CertTrust>, ExtractError> {
  extract_report(tree, "", &ExtractConfig::secure_default()).map(|report| report.records)
}

/// Walk every top-level mapping of `tree` into one report.
pub fn extract_report(
  tree: &PlistTree,
  source_id: &str,
  config: &ExtractConfig,
) -> Result<ExtractionReport, ExtractError> {
  let mut report = ExtractionReport::new(source_id);
  for root in tree.roots() {
    read_root(root, config, &mut report)?;
  }
  info!(
    source_id,
    records = report.records.len(),
    issues = report.issues.len(),
    "extracted trust records"
  );
  Ok(report)
}

fn read_root(root: &Mapping, config: &ExtractConfig, report: &mut ExtractionReport) -> Result<(), ExtractError> {
  let container = match root.mappings() {
    [container] => container,
    other => {
      return Err(ExtractError::UnexpectedStructure(format!(
        "root mapping holds {} nested mappings, expected exactly one ({TRUST_LIST})",
        other.len()
      )))
    }
  };

  let mut issues = Issues { list: &mut report.issues };
  let mut cursor = Cursor::new(root);
  for (index, key) in root.keys().iter().enumerate() {
    match key.trim() {
      TRUST_VERSION => match cursor.take_text(ValueKind::Integer) {
        Some(text) => match text.trim().parse::<u64>() {
          Ok(version) => {
            report.trust_version.get_or_insert(version);
          }
          Err(e) => issues.push(None, TRUST_VERSION, IssueKind::InvalidInteger, format!("{text:?}: {e}")),
        },
        None => issues.missing(None, TRUST_VERSION, ValueKind::Integer),
      },
      name => cursor.skip(index, name),
    }
  }

  // The j-th fingerprint key names the j-th entry mapping. Nothing else ties
  // them together, so a count mismatch cannot be repaired.
  let fingerprints = container.keys();
  let entries = container.mappings();
  if fingerprints.len() != entries.len() {
    return Err(ExtractError::MalformedEntry {
      fingerprints: fingerprints.len(),
      entries: entries.len(),
    });
  }

  for (fingerprint, entry) in fingerprints.iter().zip(entries) {
    let record = read_entry(fingerprint.trim(), entry, config, &mut issues)?;
    report.records.push(record);
  }
  Ok(())
}

fn read_entry(
  fingerprint: &str,
  entry: &Mapping,
  config: &ExtractConfig,
  issues: &mut Issues<'_>,
) -> Result<CertTrust, ExtractError> {
  debug!(fingerprint, keys = entry.keys().len(), "reading trust entry");
  let mut record = CertTrust::new(fingerprint);
  let mut cursor = Cursor::new(entry);

  for (index, key) in entry.keys().iter().enumerate() {
    match key.trim() {
      ISSUER_NAME => match cursor.take_text(ValueKind::Data) {
        Some(text) => record.issuer = read_issuer(fingerprint, text, config, issues),
        None => issues.missing(Some(fingerprint), ISSUER_NAME, ValueKind::Data),
      },
      MOD_DATE => match cursor.take_text(ValueKind::Date) {
        Some(text) => record.mod_date = read_mod_date(fingerprint, text, config, issues)?,
        None => issues.missing(Some(fingerprint), MOD_DATE, ValueKind::Date),
      },
      SERIAL_NUMBER => match cursor.take_text(ValueKind::Data) {
        Some(text) => record.serial_number = read_serial(fingerprint, text, issues),
        None => issues.missing(Some(fingerprint), SERIAL_NUMBER, ValueKind::Data),
      },
      TRUST_SETTINGS => match cursor.take(ValueKind::Array).and_then(|v| v.as_array()) {
        Some(array) => read_trust_settings(fingerprint, array, &mut record.trust_settings, issues),
        None => issues.missing(Some(fingerprint), TRUST_SETTINGS, ValueKind::Array),
      },
      name => cursor.skip(index, name),
    }
  }
  Ok(record)
}

fn read_issuer(
  fingerprint: &str,
  text: &str,
  config: &ExtractConfig,
  issues: &mut Issues<'_>,
) -> Option<DistinguishedName> {
  match decode_issuer_name(text) {
    Ok(name) => Some(name),
    Err(e) => {
      issues.push(Some(fingerprint), ISSUER_NAME, e.issue_kind(), e.to_string());
      if config.keep_partial_issuer {
        e.into_partial().filter(|name| !name.is_empty())
      } else {
        None
      }
    }
  }
}

fn read_mod_date(
  fingerprint: &str,
  text: &str,
  config: &ExtractConfig,
  issues: &mut Issues<'_>,
) -> Result<Option<DateTime<Utc>>, ExtractError> {
  match parse_plist_date(text) {
    Ok(date) => Ok(Some(date)),
    Err(reason) => match config.mod_date_policy {
      ModDatePolicy::Fatal => Err(ExtractError::TimestampFormat {
        fingerprint: fingerprint.to_owned(),
        raw: text.trim().to_owned(),
        reason,
      }),
      ModDatePolicy::Lenient => {
        issues.push(
          Some(fingerprint),
          MOD_DATE,
          IssueKind::TimestampFormat,
          format!("{:?}: {reason}", text.trim()),
        );
        Ok(None)
      }
    },
  }
}

fn read_serial(fingerprint: &str, text: &str, issues: &mut Issues<'_>) -> Option<SerialNumber> {
  match decode_serial_number(text) {
    Ok(serial) => Some(serial),
    Err(e) => {
      issues.push(Some(fingerprint), SERIAL_NUMBER, IssueKind::Base64, e.to_string());
      None
    }
  }
}

fn read_trust_settings(
  fingerprint: &str,
  array: &Array,
  settings: &mut BTreeMap<String, String>,
  issues: &mut Issues<'_>,
) {
  for dict in array.mappings() {
    let mut cursor = Cursor::new(dict);
    for (index, key) in dict.keys().iter().enumerate() {
      let name = key.trim();
      let kind = match name {
        SETTINGS_RESULT => ValueKind::Integer,
        SETTINGS_POLICY_NAME => ValueKind::String,
        _ => {
          cursor.skip(index, name);
          continue;
        }
      };
      match cursor.take_text(kind) {
        Some(value) => {
          settings.insert(name.to_owned(), value.trim().to_owned());
        }
        None => issues.missing(Some(fingerprint), TRUST_SETTINGS, kind),
      }
    }
  }
}
