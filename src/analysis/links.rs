//! Internal link analysis
//!
//! Scans `a` elements for in-document references (`l:href` starting with
//! `#`) and detects the ones whose target id does not exist.

use serde::{Deserialize, Serialize};

use crate::core::model::ByteRange;
use crate::document::Document;

/// Tag name of anchor elements
pub const LINK_TAG: &str = "a";

/// Literal attribute name carrying the link target (prefix included)
pub const LINK_HREF_ATTR: &str = "l:href";

/// An internal link found by the scanner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InternalLink {
    /// Literal href value, leading `#` included
    pub href: String,

    /// Byte range of the anchor element in the source
    pub range: ByteRange,
}

impl InternalLink {
    /// The referenced id: the href without its leading `#`
    pub fn target_id(&self) -> &str {
        &self.href[1..]
    }
}

/// Find internal links in document order.
///
/// An anchor qualifies iff it carries an attribute literally named
/// `l:href` whose value is non-empty and starts with `#`. Anchors
/// pointing outside the document (absolute or external URLs) are skipped.
pub fn find_internal_links(doc: &Document) -> Vec<InternalLink> {
    doc.elements_by_tag_name(LINK_TAG)
        .filter_map(|el| {
            let href = el.attribute(LINK_HREF_ATTR)?;
            // An empty value has no first character to classify
            if !href.starts_with('#') {
                return None;
            }
            Some(InternalLink {
                href: href.to_string(),
                range: el.range(),
            })
        })
        .collect()
}

/// Find the broken subsequence of the scanned links.
///
/// A link is broken iff no element carries its target id. Input order is
/// preserved and repeated hrefs are reported once per occurrence.
pub fn find_broken_links(doc: &Document, links: &[InternalLink]) -> Vec<InternalLink> {
    links
        .iter()
        .filter(|link| doc.element_by_id(link.target_id()).is_none())
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_internal_links() {
        let doc = Document::parse(
            r##"<book>
                <a l:href="#ch1">one</a>
                <a l:href="http://example.com">external</a>
                <a name="no-href">plain</a>
                <a l:href="#ch2">two</a>
            </book>"##,
        );
        let links = find_internal_links(&doc);
        let hrefs: Vec<_> = links.iter().map(|l| l.href.as_str()).collect();
        assert_eq!(hrefs, vec!["#ch1", "#ch2"]);
    }

    #[test]
    fn test_empty_href_is_not_internal() {
        let doc = Document::parse(r#"<book><a l:href="">empty</a></book>"#);
        assert!(find_internal_links(&doc).is_empty());
    }

    #[test]
    fn test_no_anchors_means_no_links() {
        let doc = Document::parse("<book><p>text only</p></book>");
        let links = find_internal_links(&doc);
        assert!(links.is_empty());
        assert!(find_broken_links(&doc, &links).is_empty());
    }

    #[test]
    fn test_document_order_preserved() {
        let doc = Document::parse(
            r##"<b><s><a l:href="#z">z</a></s><a l:href="#a">a</a></b>"##,
        );
        let hrefs: Vec<_> = find_internal_links(&doc)
            .iter()
            .map(|l| l.href.clone())
            .collect();
        assert_eq!(hrefs, vec!["#z", "#a"]);
    }

    #[test]
    fn test_target_id_strips_hash() {
        let link = InternalLink {
            href: "#note42".to_string(),
            range: ByteRange::new(0, 0),
        };
        assert_eq!(link.target_id(), "note42");
    }

    #[test]
    fn test_broken_link_detection() {
        let doc = Document::parse(
            r##"<book>
                <section id="ch1"><a l:href="#ch1">ok</a></section>
                <a l:href="#missing">bad</a>
            </book>"##,
        );
        let links = find_internal_links(&doc);
        assert_eq!(links.len(), 2);

        let broken = find_broken_links(&doc, &links);
        assert_eq!(broken.len(), 1);
        assert_eq!(broken[0].href, "#missing");
    }

    #[test]
    fn test_broken_links_no_dedup() {
        let doc = Document::parse(
            r##"<b><a l:href="#gone">1</a><a l:href="#gone">2</a></b>"##,
        );
        let links = find_internal_links(&doc);
        let broken = find_broken_links(&doc, &links);
        // Repeated broken href appears once per occurrence
        assert_eq!(broken.len(), 2);
        assert_eq!(broken[0].href, "#gone");
        assert_eq!(broken[1].href, "#gone");
    }

    #[test]
    fn test_hash_only_href_is_broken_unless_empty_id_exists() {
        let doc = Document::parse(r##"<b><a l:href="#">top</a></b>"##);
        let links = find_internal_links(&doc);
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].target_id(), "");
        assert_eq!(find_broken_links(&doc, &links).len(), 1);
    }

    #[test]
    fn test_error_state_document_yields_nothing() {
        let doc = Document::parse("<b><a l:href=\"#x\">");
        let links = find_internal_links(&doc);
        assert!(links.is_empty());
    }
}
