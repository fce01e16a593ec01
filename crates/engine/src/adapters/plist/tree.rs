//! In-memory model of the XML property-list subset used by trust-store
//! exports.
//!
//! A `<dict>` is not a list of key/value pairs: its `<key>` elements and its
//! values are siblings, so each `Mapping` keeps one sequence per kind. Which
//! key names which value is decided by the reader from schema knowledge.

use roxmltree::{Document, Node, ParsingOptions};

use crate::domain::error::ExtractError;
use crate::domain::types::LimitsConfig;

/// Kinds of value element a `<dict>` can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
  Data,
  Date,
  Integer,
  String,
  Array,
  Mapping,
}

impl ValueKind {
  pub const COUNT: usize = 6;

  pub fn index(self) -> usize {
    match self {
      ValueKind::Data => 0,
      ValueKind::Date => 1,
      ValueKind::Integer => 2,
      ValueKind::String => 3,
      ValueKind::Array => 4,
      ValueKind::Mapping => 5,
    }
  }

  pub fn element_name(self) -> &'static str {
    match self {
      ValueKind::Data => "data",
      ValueKind::Date => "date",
      ValueKind::Integer => "integer",
      ValueKind::String => "string",
      ValueKind::Array => "array",
      ValueKind::Mapping => "dict",
    }
  }
}

/// A child of a `<dict>`, in document order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
  Key,
  Value(ValueKind),
  /// An element outside the supported vocabulary (`<true/>`, `<real>`, ...).
  Other,
}

/// Borrowed view of one value of a `Mapping`.
#[derive(Debug, Clone, Copy)]
pub enum ValueRef<'a> {
  Data(&'a str),
  Date(&'a str),
  Integer(&'a str),
  String(&'a str),
  Array(&'a Array),
  Mapping(&'a Mapping),
}

impl<'a> ValueRef<'a> {
  pub fn kind(&self) -> ValueKind {
    match self {
      ValueRef::Data(_) => ValueKind::Data,
      ValueRef::Date(_) => ValueKind::Date,
      ValueRef::Integer(_) => ValueKind::Integer,
      ValueRef::String(_) => ValueKind::String,
      ValueRef::Array(_) => ValueKind::Array,
      ValueRef::Mapping(_) => ValueKind::Mapping,
    }
  }

  /// Raw text of a scalar value.
  pub fn as_text(&self) -> Option<&'a str> {
    match *self {
      ValueRef::Data(t) | ValueRef::Date(t) | ValueRef::Integer(t) | ValueRef::String(t) => Some(t),
      ValueRef::Array(_) | ValueRef::Mapping(_) => None,
    }
  }

  pub fn as_array(&self) -> Option<&'a Array> {
    match *self {
      ValueRef::Array(a) => Some(a),
      _ => None,
    }
  }

  pub fn as_mapping(&self) -> Option<&'a Mapping> {
    match *self {
      ValueRef::Mapping(m) => Some(m),
      _ => None,
    }
  }
}

/// A `<dict>`: keys and each kind of value in their own ordered sequence.
/// Scalar text is kept raw; `<data>` still carries its line wrapping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Mapping {
  keys: Vec<String>,
  data: Vec<String>,
  dates: Vec<String>,
  integers: Vec<String>,
  strings: Vec<String>,
  arrays: Vec<Array>,
  mappings: Vec<Mapping>,
  order: Vec<NodeKind>,
}

impl Mapping {
  pub fn keys(&self) -> &[String] {
    &self.keys
  }

  pub fn data(&self) -> &[String] {
    &self.data
  }

  pub fn dates(&self) -> &[String] {
    &self.dates
  }

  pub fn integers(&self) -> &[String] {
    &self.integers
  }

  pub fn strings(&self) -> &[String] {
    &self.strings
  }

  pub fn arrays(&self) -> &[Array] {
    &self.arrays
  }

  pub fn mappings(&self) -> &[Mapping] {
    &self.mappings
  }

  /// Children in document order.
  pub fn order(&self) -> &[NodeKind] {
    &self.order
  }

  pub fn count(&self, kind: ValueKind) -> usize {
    match kind {
      ValueKind::Data => self.data.len(),
      ValueKind::Date => self.dates.len(),
      ValueKind::Integer => self.integers.len(),
      ValueKind::String => self.strings.len(),
      ValueKind::Array => self.arrays.len(),
      ValueKind::Mapping => self.mappings.len(),
    }
  }

  /// The `index`-th value of `kind`, counted within that kind only.
  pub fn value(&self, kind: ValueKind, index: usize) -> Option<ValueRef<'_>> {
    match kind {
      ValueKind::Data => self.data.get(index).map(|t| ValueRef::Data(t)),
      ValueKind::Date => self.dates.get(index).map(|t| ValueRef::Date(t)),
      ValueKind::Integer => self.integers.get(index).map(|t| ValueRef::Integer(t)),
      ValueKind::String => self.strings.get(index).map(|t| ValueRef::String(t)),
      ValueKind::Array => self.arrays.get(index).map(ValueRef::Array),
      ValueKind::Mapping => self.mappings.get(index).map(ValueRef::Mapping),
    }
  }

  /// Kind of the element that directly follows the `key_index`-th key, if
  /// it is a supported value.
  pub fn kind_after_key(&self, key_index: usize) -> Option<ValueKind> {
    let position = self
      .order
      .iter()
      .enumerate()
      .filter(|(_, n)| **n == NodeKind::Key)
      .nth(key_index)
      .map(|(i, _)| i)?;
    match self.order.get(position + 1) {
      Some(NodeKind::Value(kind)) => Some(*kind),
      _ => None,
    }
  }

  fn push_key(&mut self, text: String) {
    self.keys.push(text);
    self.order.push(NodeKind::Key);
  }

  fn push_text(&mut self, kind: ValueKind, text: String) {
    match kind {
      ValueKind::Data => self.data.push(text),
      ValueKind::Date => self.dates.push(text),
      ValueKind::Integer => self.integers.push(text),
      ValueKind::String => self.strings.push(text),
      ValueKind::Array | ValueKind::Mapping => return,
    }
    self.order.push(NodeKind::Value(kind));
  }

  fn push_array(&mut self, array: Array) {
    self.arrays.push(array);
    self.order.push(NodeKind::Value(ValueKind::Array));
  }

  fn push_mapping(&mut self, mapping: Mapping) {
    self.mappings.push(mapping);
    self.order.push(NodeKind::Value(ValueKind::Mapping));
  }
}

/// An `<array>` of `<dict>`s. Other array members are not part of the
/// trust-store vocabulary and are dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Array {
  mappings: Vec<Mapping>,
}

impl Array {
  pub fn mappings(&self) -> &[Mapping] {
    &self.mappings
  }

  pub fn len(&self) -> usize {
    self.mappings.len()
  }

  pub fn is_empty(&self) -> bool {
    self.mappings.is_empty()
  }
}

/// Parsed `<plist>` document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlistTree {
  version: Option<String>,
  roots: Vec<Mapping>,
}

impl PlistTree {
  pub fn parse(bytes: &[u8]) -> Result<Self, ExtractError> {
    Self::parse_with_limits(bytes, &LimitsConfig::defaults())
  }

  pub fn parse_with_limits(bytes: &[u8], limits: &LimitsConfig) -> Result<Self, ExtractError> {
    if bytes.len() > limits.max_document_size {
      return Err(ExtractError::DocumentTooLarge { size: bytes.len(), max: limits.max_document_size });
    }
    let text = std::str::from_utf8(bytes)
      .map_err(|e| ExtractError::MalformedXml(format!("document is not UTF-8: {e}")))?;
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    // Exports carry the Apple plist DOCTYPE.
    let mut options = ParsingOptions::default();
    options.allow_dtd = true;
    options.nodes_limit = limits.max_xml_nodes;
    let doc = Document::parse_with_options(text, options)?;

    let root = doc.root_element();
    if root.tag_name().name() != "plist" {
      return Err(ExtractError::UnexpectedStructure(format!(
        "root element is <{}>, expected <plist>",
        root.tag_name().name()
      )));
    }

    let builder = TreeBuilder { max_depth: limits.max_nesting_depth };
    let mut roots = Vec::new();
    for child in root.children().filter(|n| n.has_tag_name("dict")) {
      roots.push(builder.mapping(child, 1)?);
    }
    if roots.is_empty() {
      return Err(ExtractError::UnexpectedStructure("<plist> has no top-level <dict>".into()));
    }

    tracing::debug!(roots = roots.len(), "parsed plist tree");
    Ok(Self { version: root.attribute("version").map(str::to_owned), roots })
  }

  /// `version` attribute of the `<plist>` element.
  pub fn version(&self) -> Option<&str> {
    self.version.as_deref()
  }

  /// Top-level `<dict>` elements, in document order.
  pub fn roots(&self) -> &[Mapping] {
    &self.roots
  }
}

struct TreeBuilder {
  max_depth: usize,
}

impl TreeBuilder {
  fn check_depth(&self, depth: usize) -> Result<(), ExtractError> {
    if depth > self.max_depth {
      return Err(ExtractError::NestingTooDeep { max: self.max_depth });
    }
    Ok(())
  }

  fn mapping(&self, node: Node<'_, '_>, depth: usize) -> Result<Mapping, ExtractError> {
    self.check_depth(depth)?;
    let mut mapping = Mapping::default();
    for child in node.children().filter(|n| n.is_element()) {
      match child.tag_name().name() {
        "key" => mapping.push_key(text_of(child)),
        "data" => mapping.push_text(ValueKind::Data, text_of(child)),
        "date" => mapping.push_text(ValueKind::Date, text_of(child)),
        "integer" => mapping.push_text(ValueKind::Integer, text_of(child)),
        "string" => mapping.push_text(ValueKind::String, text_of(child)),
        "array" => mapping.push_array(self.array(child, depth + 1)?),
        "dict" => mapping.push_mapping(self.mapping(child, depth + 1)?),
        other => {
          tracing::trace!(element = other, "ignoring unsupported plist element");
          mapping.order.push(NodeKind::Other);
        }
      }
    }
    Ok(mapping)
  }

  fn array(&self, node: Node<'_, '_>, depth: usize) -> Result<Array, ExtractError> {
    self.check_depth(depth)?;
    let mut mappings = Vec::new();
    for child in node.children().filter(|n| n.has_tag_name("dict")) {
      mappings.push(self.mapping(child, depth + 1)?);
    }
    Ok(Array { mappings })
  }
}

fn text_of(node: Node<'_, '_>) -> String {
  node
    .children()
    .filter(|c| c.is_text())
    .filter_map(|c| c.text())
    .collect()
}
