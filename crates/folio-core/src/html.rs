//! HTML serialization of renderer output.
//!
//! The renderer produces presentation nodes; this module is the
//! terminal consumer surface that turns them into escaped HTML on any
//! `io::Write`.

use std::io::{self, Write};

use crate::render::OutputNode;

/// Write a sequence of output nodes as HTML.
pub fn write_nodes<W: Write>(nodes: &[OutputNode], buf: &mut W) -> io::Result<()> {
    for node in nodes {
        write_node(node, buf)?;
    }
    Ok(())
}

fn write_node<W: Write>(node: &OutputNode, buf: &mut W) -> io::Result<()> {
    match node {
        OutputNode::Text(text) => write!(buf, "{}", escape_html(text)),
        OutputNode::Element {
            tag,
            attrs,
            children,
        } => {
            write!(buf, "<{tag}")?;
            for (name, value) in attrs {
                write!(buf, " {name}=\"{}\"", escape_html(value))?;
            }
            write!(buf, ">")?;
            write_nodes(children, buf)?;
            write!(buf, "</{tag}>")
        }
    }
}

/// Escape HTML special characters.
fn escape_html(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '&' => "&amp;".to_string(),
            '<' => "&lt;".to_string(),
            '>' => "&gt;".to_string(),
            '"' => "&quot;".to_string(),
            '\'' => "&#39;".to_string(),
            _ => c.to_string(),
        })
        .collect()
}

/// Convenience: render a sequence of output nodes to a `String`.
pub fn to_html(nodes: &[OutputNode]) -> String {
    let mut buf = Vec::new();
    // writing to a Vec cannot fail
    let _ = write_nodes(nodes, &mut buf);
    String::from_utf8(buf).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{RenderConfig, render};
    use serde_json::json;

    #[test]
    fn writes_nested_elements_with_attrs() {
        let nodes = vec![OutputNode::Element {
            tag: "p".into(),
            attrs: vec![],
            children: vec![OutputNode::Element {
                tag: "a".into(),
                attrs: vec![("href".into(), "https://example.org/?a=1&b=2".into())],
                children: vec![OutputNode::Text("link".into())],
            }],
        }];
        assert_eq!(
            to_html(&nodes),
            "<p><a href=\"https://example.org/?a=1&amp;b=2\">link</a></p>"
        );
    }

    #[test]
    fn escapes_text_content() {
        let nodes = vec![OutputNode::text("<script>alert('x')</script>")];
        assert_eq!(
            to_html(&nodes),
            "&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt;"
        );
    }

    #[test]
    fn renders_a_tree_end_to_end() {
        let tree = serde_json::from_value(json!({
            "blocks": [
                { "style": "h2", "spans": [{ "text": "Résultats" }] },
                { "listItem": { "kind": "bullet", "level": 1 }, "spans": [{ "text": "one" }] },
                { "listItem": { "kind": "bullet", "level": 1 }, "spans": [{ "text": "two" }] },
            ],
        }))
        .unwrap();
        let html = to_html(&render(&tree, &RenderConfig::default()));
        assert_eq!(
            html,
            "<h2>Résultats</h2><ul><li>one</li><li>two</li></ul>"
        );
    }
}
