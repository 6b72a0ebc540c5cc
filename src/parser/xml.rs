use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tracing::{debug, warn};

use crate::errors::{UiScopeError, UiScopeResult};
use crate::geometry::ElementBounds;
use crate::parser::types::RawNode;

/// Walks a UiAutomator XML dump and extracts every `<node>` element's full
/// attribute set into a flat, document-ordered list.
///
/// Pure function of the XML string. The only fatal condition is a document
/// that cannot be read at all (or contains no `hierarchy`/`node` element,
/// which means the input was not a UI dump). A node whose `bounds`
/// attribute fails to parse is dropped with a warning; its document slot is
/// kept so the paths of its descendants stay correct.
pub struct NodeParser;

/// Attribute set of one document node before bounds validation.
#[derive(Debug, Default)]
struct DocNode {
    text: String,
    content_desc: String,
    resource_id: String,
    class_name: String,
    package_name: String,
    bounds_attr: Option<String>,
    clickable: bool,
    scrollable: bool,
    enabled: bool,
    focused: bool,
    selected: bool,
    focusable: bool,
    checkable: bool,
    checked: bool,
    password: bool,
    parent: Option<usize>,
    children: Vec<usize>,
}

impl NodeParser {
    pub fn parse(xml: &str) -> UiScopeResult<Vec<RawNode>> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut doc: Vec<DocNode> = Vec::new();
        let mut roots: Vec<usize> = Vec::new();
        let mut stack: Vec<usize> = Vec::new();
        let mut saw_hierarchy = false;

        loop {
            match reader.read_event() {
                Ok(Event::Start(ref e)) => match e.name().as_ref() {
                    b"hierarchy" => saw_hierarchy = true,
                    b"node" => {
                        let index = Self::push_node(e, &mut doc, &mut roots, &stack);
                        stack.push(index);
                    }
                    _ => {}
                },
                Ok(Event::Empty(ref e)) => match e.name().as_ref() {
                    b"hierarchy" => saw_hierarchy = true,
                    b"node" => {
                        Self::push_node(e, &mut doc, &mut roots, &stack);
                    }
                    _ => {}
                },
                Ok(Event::End(ref e)) => {
                    if e.name().as_ref() == b"node" {
                        stack.pop();
                    }
                }
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(e) => return Err(UiScopeError::XmlSyntax(e.to_string())),
            }
        }

        if doc.is_empty() && !saw_hierarchy {
            return Err(UiScopeError::XmlSyntax(
                "document contains no hierarchy or node element".to_string(),
            ));
        }

        let mut nodes = Vec::with_capacity(doc.len());
        for index in 0..doc.len() {
            let bounds = match &doc[index].bounds_attr {
                Some(raw) => match ElementBounds::parse(raw) {
                    Ok(b) => b,
                    Err(e) => {
                        warn!(index, error = %e, "dropping node with malformed bounds");
                        continue;
                    }
                },
                None => {
                    warn!(index, "dropping node without bounds attribute");
                    continue;
                }
            };

            let d = &doc[index];
            nodes.push(RawNode {
                index,
                text: d.text.clone(),
                content_desc: d.content_desc.clone(),
                resource_id: d.resource_id.clone(),
                class_name: d.class_name.clone(),
                package_name: d.package_name.clone(),
                bounds,
                clickable: d.clickable,
                scrollable: d.scrollable,
                enabled: d.enabled,
                focused: d.focused,
                selected: d.selected,
                focusable: d.focusable,
                checkable: d.checkable,
                checked: d.checked,
                password: d.password,
                xpath: Self::xpath_of(&doc, &roots, index),
                node_path: Self::node_path_of(&doc, index),
            });
        }

        debug!(
            total = doc.len(),
            parsed = nodes.len(),
            "UI dump parsed"
        );
        Ok(nodes)
    }

    fn push_node(
        e: &BytesStart<'_>,
        doc: &mut Vec<DocNode>,
        roots: &mut Vec<usize>,
        stack: &[usize],
    ) -> usize {
        let mut node = Self::read_attributes(e);
        let index = doc.len();
        node.parent = stack.last().copied();
        match node.parent {
            Some(p) => doc[p].children.push(index),
            None => roots.push(index),
        }
        doc.push(node);
        index
    }

    fn read_attributes(e: &BytesStart<'_>) -> DocNode {
        let mut node = DocNode {
            enabled: true,
            ..DocNode::default()
        };

        for attr in e.attributes().flatten() {
            let value = match attr.unescape_value() {
                Ok(v) => v.into_owned(),
                Err(_) => String::from_utf8_lossy(&attr.value).into_owned(),
            };
            match attr.key.as_ref() {
                b"text" => node.text = value,
                b"content-desc" => node.content_desc = value,
                b"resource-id" => node.resource_id = value,
                b"class" => node.class_name = value,
                b"package" => node.package_name = value,
                b"bounds" => node.bounds_attr = Some(value),
                b"clickable" => node.clickable = value == "true",
                b"scrollable" => node.scrollable = value == "true",
                b"enabled" => node.enabled = value != "false",
                b"focused" => node.focused = value == "true",
                b"selected" => node.selected = value == "true",
                b"focusable" => node.focusable = value == "true",
                b"checkable" => node.checkable = value == "true",
                b"checked" => node.checked = value == "true",
                b"password" => node.password = value == "true",
                _ => {}
            }
        }
        node
    }

    /// XPath from the dump root. A positional qualifier is emitted only
    /// when the node has siblings, matching how inspector tools address
    /// UiAutomator dumps.
    fn xpath_of(doc: &[DocNode], roots: &[usize], index: usize) -> String {
        let mut segments = Vec::new();
        let mut current = Some(index);
        while let Some(i) = current {
            let siblings = match doc[i].parent {
                Some(p) => &doc[p].children,
                None => roots,
            };
            if siblings.len() > 1 {
                let position = siblings.iter().position(|&s| s == i).unwrap_or(0) + 1;
                segments.push(format!("node[{position}]"));
            } else {
                segments.push("node".to_string());
            }
            current = doc[i].parent;
        }
        segments.reverse();
        format!("/{}", segments.join("/"))
    }

    /// Human-readable ancestor chain: short class name plus the most
    /// identifying attribute of each node on the way down.
    fn node_path_of(doc: &[DocNode], index: usize) -> String {
        let mut segments = Vec::new();
        let mut current = Some(index);
        while let Some(i) = current {
            let node = &doc[i];
            let mut part = node
                .class_name
                .rsplit('.')
                .next()
                .filter(|s| !s.is_empty())
                .unwrap_or("node")
                .to_string();
            if !node.resource_id.is_empty() {
                let tail = node.resource_id.rsplit('/').next().unwrap_or("");
                part.push_str(&format!("[{tail}]"));
            } else if !node.text.is_empty() {
                part.push_str(&format!("[\"{}\"]", caption(&node.text)));
            } else if !node.content_desc.is_empty() {
                part.push_str(&format!("[desc:\"{}\"]", caption(&node.content_desc)));
            }
            segments.push(part);
            current = node.parent;
        }
        segments.reverse();
        segments.join(" > ")
    }
}

fn caption(s: &str) -> String {
    s.chars().take(20).collect()
}
