//! Unified Report Model
//!
//! Every command (partial or full pipeline) must map its output to this
//! model before rendering.

use serde::{Deserialize, Serialize};

/// The kind of report item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Source,
    Link,
    Letters,
    Error,
}

/// Resolution status of an internal link
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkStatus {
    Resolved,
    Broken,
}

/// Pipeline stage that produced a result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Fetch,
    Parse,
    Links,
    Letters,
}

/// Byte-based range within the source document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ByteRange {
    pub start: u64,
    pub end: u64,
}

impl ByteRange {
    /// Create a new byte range
    pub fn new(start: u64, end: u64) -> Self {
        ByteRange { start, end }
    }
}

/// Metadata for a report item
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Meta {
    /// Source document size in bytes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,

    /// Content hash (XXH3)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,

    /// Whether the excerpt was truncated
    #[serde(default)]
    pub truncated: bool,
}

/// Error information attached to a report item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanError {
    pub code: String,
    pub message: String,
}

impl ScanError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// The unified report item that all commands must produce
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportItem {
    /// The kind of this item
    pub kind: Kind,

    /// The resolved source locator (path or URL)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    /// Byte range within the source document
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<ByteRange>,

    /// Excerpt of the content (may be truncated)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,

    /// Structured payload (link href/status, letter counts)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,

    /// Pipeline stage that produced this item
    pub stage: Stage,

    /// Metadata
    pub meta: Meta,

    /// Errors (if any)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ScanError>,
}

impl ReportItem {
    /// Create a new source result (resolved locator + raw document text)
    pub fn source(locator: impl Into<String>) -> Self {
        Self {
            kind: Kind::Source,
            source: Some(locator.into()),
            range: None,
            excerpt: None,
            data: None,
            stage: Stage::Fetch,
            meta: Meta::default(),
            errors: Vec::new(),
        }
    }

    /// Create a new link result
    pub fn link(locator: impl Into<String>, range: ByteRange) -> Self {
        Self {
            kind: Kind::Link,
            source: Some(locator.into()),
            range: Some(range),
            excerpt: None,
            data: None,
            stage: Stage::Links,
            meta: Meta::default(),
            errors: Vec::new(),
        }
    }

    /// Create a new letter-count result
    pub fn letters(locator: impl Into<String>) -> Self {
        Self {
            kind: Kind::Letters,
            source: Some(locator.into()),
            range: None,
            excerpt: None,
            data: None,
            stage: Stage::Letters,
            meta: Meta::default(),
            errors: Vec::new(),
        }
    }

    /// Create a new error result
    pub fn error(stage: Stage, error: ScanError) -> Self {
        Self {
            kind: Kind::Error,
            source: None,
            range: None,
            excerpt: None,
            data: None,
            stage,
            meta: Meta::default(),
            errors: vec![error],
        }
    }

    /// Set metadata
    pub fn with_meta(mut self, meta: Meta) -> Self {
        self.meta = meta;
        self
    }

    /// Set excerpt
    pub fn with_excerpt(mut self, excerpt: impl Into<String>) -> Self {
        self.excerpt = Some(excerpt.into());
        self
    }

    /// Set structured data payload
    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Add an error
    #[allow(dead_code)]
    pub fn with_error(mut self, error: ScanError) -> Self {
        self.errors.push(error);
        self
    }
}

/// Report set containing multiple report items
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportSet {
    pub items: Vec<ReportItem>,
}

impl ReportSet {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn push(&mut self, item: ReportItem) {
        self.items.push(item);
    }

    pub fn extend(&mut self, items: impl IntoIterator<Item = ReportItem>) {
        self.items.extend(items);
    }

    #[allow(dead_code)]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl IntoIterator for ReportSet {
    type Item = ReportItem;
    type IntoIter = std::vec::IntoIter<ReportItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl FromIterator<ReportItem> for ReportSet {
    fn from_iter<T: IntoIterator<Item = ReportItem>>(iter: T) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_item_source() {
        let item = ReportItem::source("books/demo.fb2");
        assert_eq!(item.kind, Kind::Source);
        assert_eq!(item.source, Some("books/demo.fb2".to_string()));
        assert_eq!(item.stage, Stage::Fetch);
    }

    #[test]
    fn test_report_item_link() {
        let item = ReportItem::link("demo.fb2", ByteRange::new(10, 42));
        assert_eq!(item.kind, Kind::Link);
        assert_eq!(item.range, Some(ByteRange::new(10, 42)));
        assert_eq!(item.stage, Stage::Links);
    }

    #[test]
    fn test_report_item_letters() {
        let item = ReportItem::letters("demo.fb2");
        assert_eq!(item.kind, Kind::Letters);
        assert_eq!(item.stage, Stage::Letters);
        assert!(item.range.is_none());
    }

    #[test]
    fn test_report_item_error() {
        let item = ReportItem::error(Stage::Parse, ScanError::new("PARSE_ERROR", "boom"));
        assert_eq!(item.kind, Kind::Error);
        assert_eq!(item.errors.len(), 1);
        assert_eq!(item.errors[0].code, "PARSE_ERROR");
        assert_eq!(item.errors[0].message, "boom");
    }

    #[test]
    fn test_report_item_with_meta() {
        let meta = Meta {
            size: Some(1024),
            hash: Some("abc123".to_string()),
            truncated: true,
        };
        let item = ReportItem::source("demo.fb2").with_meta(meta);
        assert_eq!(item.meta.size, Some(1024));
        assert!(item.meta.truncated);
    }

    #[test]
    fn test_report_item_with_data() {
        let data = serde_json::json!({
            "href": "#ch1",
            "status": "broken"
        });
        let item = ReportItem::link("demo.fb2", ByteRange::new(0, 1)).with_data(data.clone());
        assert_eq!(item.data.unwrap(), data);
    }

    #[test]
    fn test_report_item_data_serialization() {
        let data = serde_json::json!({
            "raw": 42,
            "normalized": 44
        });
        let item = ReportItem::letters("demo.fb2").with_data(data);
        let json = serde_json::to_string(&item).unwrap();
        // data field should be embedded directly, not as an escaped string
        assert!(json.contains("\"data\":{"));
        assert!(json.contains("\"raw\":42"));
        assert!(json.contains("\"normalized\":44"));
    }

    #[test]
    fn test_kind_serialization() {
        let item = ReportItem::source("demo.fb2");
        let json = serde_json::to_string(&item).unwrap();
        assert!(json.contains("\"kind\":\"source\""));
        assert!(json.contains("\"stage\":\"fetch\""));
    }

    #[test]
    fn test_link_status_serialization() {
        let json = serde_json::to_string(&LinkStatus::Broken).unwrap();
        assert_eq!(json, "\"broken\"");
        let json = serde_json::to_string(&LinkStatus::Resolved).unwrap();
        assert_eq!(json, "\"resolved\"");
    }

    #[test]
    fn test_report_item_deserialization() {
        let json = r#"{"kind":"link","source":"demo.fb2","range":{"start":5,"end":20},"stage":"links","meta":{"truncated":false}}"#;
        let item: ReportItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.kind, Kind::Link);
        assert_eq!(item.range, Some(ByteRange::new(5, 20)));
    }

    #[test]
    fn test_report_set_push_extend() {
        let mut set = ReportSet::new();
        assert!(set.is_empty());
        set.push(ReportItem::source("a.xml"));
        set.extend(vec![
            ReportItem::letters("a.xml"),
            ReportItem::letters("b.xml"),
        ]);
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn test_report_set_into_iter() {
        let mut set = ReportSet::new();
        set.push(ReportItem::source("a.xml"));
        set.push(ReportItem::letters("a.xml"));

        let items: Vec<_> = set.into_iter().collect();
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn test_report_set_from_iter() {
        let items = vec![ReportItem::source("a.xml"), ReportItem::letters("a.xml")];
        let set: ReportSet = items.into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_meta_default() {
        let meta = Meta::default();
        assert!(meta.size.is_none());
        assert!(meta.hash.is_none());
        assert!(!meta.truncated);
    }

    #[test]
    fn test_scan_error_new() {
        let err = ScanError::new("CODE", "message");
        assert_eq!(err.code, "CODE");
        assert_eq!(err.message, "message");
    }
}
