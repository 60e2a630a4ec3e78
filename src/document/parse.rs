//! XML parsing - builds the document arena from the quick-xml event stream

use std::collections::HashMap;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::core::model::ByteRange;
use crate::document::{Attribute, Child, Document, NodeData, NodeId};

/// Parse a document, mapping any reader error to the error state
pub(crate) fn parse_document(text: &str) -> Document {
    match try_parse(text) {
        Ok(doc) => doc,
        Err(message) => Document::failed(message),
    }
}

fn try_parse(text: &str) -> Result<Document, String> {
    // Text trimming stays off: letter counting reads text content verbatim.
    let mut reader = Reader::from_str(text);

    let mut nodes: Vec<NodeData> = Vec::new();
    let mut roots: Vec<NodeId> = Vec::new();
    let mut ids: HashMap<String, NodeId> = HashMap::new();
    let mut stack: Vec<NodeId> = Vec::new();

    loop {
        let event_start = reader.buffer_position();
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let id = open_element(&e, event_start, &mut nodes, &mut roots, &mut ids, &stack);
                stack.push(id);
            }
            Ok(Event::Empty(e)) => {
                let id = open_element(&e, event_start, &mut nodes, &mut roots, &mut ids, &stack);
                nodes[id].range.end = reader.buffer_position();
            }
            Ok(Event::End(_)) => {
                // Name pairing is validated by the reader itself
                if let Some(id) = stack.pop() {
                    nodes[id].range.end = reader.buffer_position();
                }
            }
            Ok(Event::Text(e)) => {
                let text = e.decode().map_err(|err| err.to_string())?;
                append_text(&mut nodes, &stack, text.as_ref());
            }
            Ok(Event::CData(e)) => {
                let text = reader
                    .decoder()
                    .decode(&e)
                    .map_err(|err| err.to_string())?;
                append_text(&mut nodes, &stack, text.as_ref());
            }
            Ok(Event::GeneralRef(e)) => {
                let name = e.decode().map_err(|err| err.to_string())?;
                let entity = format!("&{};", name);
                let resolved =
                    quick_xml::escape::unescape(&entity).map_err(|err| err.to_string())?;
                append_text(&mut nodes, &stack, resolved.as_ref());
            }
            Ok(Event::Eof) => break,
            // Declarations, comments, processing instructions, doctype
            Ok(_) => {}
            Err(err) => return Err(err.to_string()),
        }
    }

    if let Some(&open) = stack.last() {
        return Err(format!("unclosed element <{}>", nodes[open].name));
    }

    Ok(Document {
        nodes,
        roots,
        ids,
        error: None,
    })
}

/// Push a new element node and wire it to its parent (or the root list)
fn open_element(
    e: &BytesStart,
    start: u64,
    nodes: &mut Vec<NodeData>,
    roots: &mut Vec<NodeId>,
    ids: &mut HashMap<String, NodeId>,
    stack: &[NodeId],
) -> NodeId {
    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();

    let mut attributes = Vec::new();
    for attr in e.attributes().flatten() {
        attributes.push(Attribute {
            name: String::from_utf8_lossy(attr.key.as_ref()).into_owned(),
            value: String::from_utf8_lossy(&attr.value).into_owned(),
        });
    }

    let id = nodes.len();
    nodes.push(NodeData {
        name,
        attributes,
        children: Vec::new(),
        range: ByteRange::new(start, start),
    });

    if let Some(value) = nodes[id]
        .attributes
        .iter()
        .find(|a| a.name == "id")
        .map(|a| a.value.clone())
    {
        // First occurrence in document order wins
        ids.entry(value).or_insert(id);
    }

    match stack.last() {
        Some(&parent) => nodes[parent].children.push(Child::Element(id)),
        None => roots.push(id),
    }

    id
}

/// Append a run of text to the innermost open element.
///
/// Adjacent runs (split by entity references or CDATA boundaries) are
/// merged. Text outside any element (prolog whitespace) is dropped.
fn append_text(nodes: &mut [NodeData], stack: &[NodeId], text: &str) {
    let Some(&parent) = stack.last() else {
        return;
    };

    match nodes[parent].children.last_mut() {
        Some(Child::Text(existing)) => existing.push_str(text),
        _ => nodes[parent].children.push(Child::Text(text.to_string())),
    }
}
