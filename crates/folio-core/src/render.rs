//! Rich-text tree renderer.
//!
//! Recursively serializes a [`ContentTree`] into presentation nodes.
//! Dispatch is an exhaustive match per block style and per mark kind;
//! the `Unknown` variants route to the default plain transform, so the
//! fallback path is enforced by the compiler rather than accidental.
//! Rendering is pure: the same tree and config always produce
//! structurally identical output, and no render state survives a call.
//!
//! Degradation policy is fail-open throughout: unknown styles render as
//! paragraphs, unknown mark kinds as neutral spans, and mark references
//! without a matching definition are dropped. None of these conditions
//! fail the render.

use std::collections::HashSet;

use folio_doc_types::{Block, BlockStyle, ContentTree, ListKind, MarkDef, MarkKind, Span};

/// A presentation node: the renderer's output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputNode {
    Element {
        tag: String,
        attrs: Vec<(String, String)>,
        children: Vec<OutputNode>,
    },
    Text(String),
}

impl OutputNode {
    pub fn element(tag: impl Into<String>, children: Vec<OutputNode>) -> Self {
        OutputNode::Element {
            tag: tag.into(),
            attrs: Vec::new(),
            children,
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        OutputNode::Text(text.into())
    }
}

/// Presentation options for a render pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderConfig {
    /// `rel` attribute applied to link marks (e.g. "noopener noreferrer").
    pub link_rel: Option<String>,
    /// Open link marks in a new tab.
    pub link_blank: bool,
    /// Minimum rendered heading level; a page that already owns the `h1`
    /// sets this to 2.
    pub heading_floor: u8,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            link_rel: None,
            link_blank: false,
            heading_floor: 1,
        }
    }
}

/// Render a content tree into an ordered sequence of output nodes.
///
/// An empty tree yields an empty sequence. Blocks are visited in input
/// order; consecutive list-item blocks are grouped into nested list
/// structures by kind and level.
pub fn render(tree: &ContentTree, config: &RenderConfig) -> Vec<OutputNode> {
    let blocks = &tree.blocks;
    let mut out = Vec::new();
    let mut i = 0;
    while i < blocks.len() {
        match &blocks[i].list_item {
            Some(item) => {
                let (list, next) =
                    render_list(blocks, i, item.level, item.kind.clone(), tree, config);
                out.push(list);
                i = next;
            }
            None => {
                out.push(render_block(&blocks[i], tree, config));
                i += 1;
            }
        }
    }
    out
}

/// Group consecutive list items of `kind` at `level` into one list
/// node, recursing for deeper levels. Returns the node and the index of
/// the first unconsumed block.
fn render_list(
    blocks: &[Block],
    start: usize,
    level: u32,
    kind: ListKind,
    tree: &ContentTree,
    config: &RenderConfig,
) -> (OutputNode, usize) {
    let tag = match &kind {
        ListKind::Bullet => "ul",
        ListKind::Number => "ol",
        ListKind::Unknown(raw) => {
            tracing::debug!(kind = %raw, "unknown list kind, rendering as bullet list");
            "ul"
        }
    };

    let mut items: Vec<OutputNode> = Vec::new();
    let mut i = start;
    while i < blocks.len() {
        let Some(item) = &blocks[i].list_item else {
            break;
        };
        if item.level < level || (item.level == level && item.kind != kind) {
            break;
        }
        if item.level > level {
            let (nested, next) = render_list(blocks, i, item.level, item.kind.clone(), tree, config);
            match items.last_mut() {
                // a sublist belongs inside the preceding item
                Some(OutputNode::Element { children, .. }) => children.push(nested),
                // no preceding item at this level: wrap the sublist so
                // output stays a well-formed list
                _ => items.push(OutputNode::element("li", vec![nested])),
            }
            i = next;
        } else {
            items.push(OutputNode::element(
                "li",
                render_spans(&blocks[i].spans, tree, config),
            ));
            i += 1;
        }
    }
    (OutputNode::element(tag, items), i)
}

fn render_block(block: &Block, tree: &ContentTree, config: &RenderConfig) -> OutputNode {
    let children = render_spans(&block.spans, tree, config);
    match &block.style {
        BlockStyle::Normal => OutputNode::element("p", children),
        BlockStyle::Heading(level) => {
            let level = (*level).max(config.heading_floor).min(6);
            OutputNode::element(format!("h{level}"), children)
        }
        BlockStyle::Blockquote => OutputNode::element("blockquote", children),
        BlockStyle::Unknown(raw) => {
            tracing::debug!(style = %raw, "unknown block style, using plain transform");
            OutputNode::element("p", children)
        }
    }
}

fn render_spans(spans: &[Span], tree: &ContentTree, config: &RenderConfig) -> Vec<OutputNode> {
    spans.iter().map(|span| render_span(span, tree, config)).collect()
}

fn render_span(span: &Span, tree: &ContentTree, config: &RenderConfig) -> OutputNode {
    // duplicates are idempotent: only the first occurrence applies
    let mut seen = HashSet::new();
    let defs: Vec<&MarkDef> = span
        .mark_refs
        .iter()
        .filter(|id| seen.insert(id.as_str()))
        .filter_map(|id| match tree.mark_def(id) {
            Some(def) => Some(def),
            None => {
                tracing::debug!(mark = %id, "dropping mark ref without definition");
                None
            }
        })
        .collect();

    // innermost out: the first listed mark ends up outermost
    let mut node = OutputNode::text(&span.text);
    for def in defs.into_iter().rev() {
        node = apply_mark(def, node, config);
    }
    node
}

fn apply_mark(def: &MarkDef, inner: OutputNode, config: &RenderConfig) -> OutputNode {
    match &def.kind {
        MarkKind::Link => {
            let mut attrs = vec![(
                "href".to_owned(),
                def.href.clone().unwrap_or_default(),
            )];
            if let Some(rel) = &config.link_rel {
                attrs.push(("rel".to_owned(), rel.clone()));
            }
            if config.link_blank {
                attrs.push(("target".to_owned(), "_blank".to_owned()));
            }
            OutputNode::Element {
                tag: "a".to_owned(),
                attrs,
                children: vec![inner],
            }
        }
        MarkKind::Emphasis => OutputNode::element("em", vec![inner]),
        MarkKind::Strong => OutputNode::element("strong", vec![inner]),
        MarkKind::Code => OutputNode::element("code", vec![inner]),
        MarkKind::Unknown(raw) => {
            tracing::debug!(kind = %raw, "unknown mark kind, using plain transform");
            OutputNode::element("span", vec![inner])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_doc_types::ListItem;
    use serde_json::json;

    fn tree(value: serde_json::Value) -> ContentTree {
        serde_json::from_value(value).unwrap()
    }

    fn config() -> RenderConfig {
        RenderConfig::default()
    }

    #[test]
    fn empty_tree_renders_to_empty_sequence() {
        let out = render(&tree(json!({ "blocks": [] })), &config());
        assert!(out.is_empty());
    }

    #[test]
    fn paragraph_with_plain_span() {
        let out = render(
            &tree(json!({ "blocks": [{ "spans": [{ "text": "hello" }] }] })),
            &config(),
        );
        assert_eq!(
            out,
            vec![OutputNode::element("p", vec![OutputNode::text("hello")])]
        );
    }

    #[test]
    fn unknown_block_style_uses_plain_transform() {
        let out = render(
            &tree(json!({
                "blocks": [{ "style": "unknown-custom-style", "spans": [{ "text": "x" }] }],
            })),
            &config(),
        );
        assert_eq!(
            out,
            vec![OutputNode::element("p", vec![OutputNode::text("x")])]
        );
    }

    #[test]
    fn ghost_mark_ref_renders_as_if_unmarked() {
        let out = render(
            &tree(json!({
                "blocks": [{ "spans": [{ "text": "x", "markRefs": ["ghost"] }] }],
            })),
            &config(),
        );
        assert_eq!(
            out,
            vec![OutputNode::element("p", vec![OutputNode::text("x")])]
        );
    }

    #[test]
    fn marks_nest_first_listed_outermost() {
        let out = render(
            &tree(json!({
                "blocks": [{
                    "spans": [{ "text": "x", "markRefs": ["em1", "st1"] }],
                    "marks": [
                        { "id": "em1", "kind": "emphasis" },
                        { "id": "st1", "kind": "strong" },
                    ],
                }],
            })),
            &config(),
        );
        let expected = OutputNode::element(
            "p",
            vec![OutputNode::element(
                "em",
                vec![OutputNode::element("strong", vec![OutputNode::text("x")])],
            )],
        );
        assert_eq!(out, vec![expected]);
    }

    #[test]
    fn duplicate_mark_refs_apply_once() {
        let doubled = render(
            &tree(json!({
                "blocks": [{
                    "spans": [{ "text": "x", "markRefs": ["st1", "st1"] }],
                    "marks": [{ "id": "st1", "kind": "strong" }],
                }],
            })),
            &config(),
        );
        let single = render(
            &tree(json!({
                "blocks": [{
                    "spans": [{ "text": "x", "markRefs": ["st1"] }],
                    "marks": [{ "id": "st1", "kind": "strong" }],
                }],
            })),
            &config(),
        );
        assert_eq!(doubled, single);
    }

    #[test]
    fn unknown_mark_kind_degrades_to_neutral_span() {
        let out = render(
            &tree(json!({
                "blocks": [{
                    "spans": [{ "text": "x", "markRefs": ["glow1"] }],
                    "marks": [{ "id": "glow1", "kind": "glow" }],
                }],
            })),
            &config(),
        );
        assert_eq!(
            out,
            vec![OutputNode::element(
                "p",
                vec![OutputNode::element("span", vec![OutputNode::text("x")])],
            )]
        );
    }

    #[test]
    fn link_mark_carries_href_and_config_attrs() {
        let cfg = RenderConfig {
            link_rel: Some("noopener noreferrer".into()),
            link_blank: true,
            heading_floor: 1,
        };
        let out = render(
            &tree(json!({
                "blocks": [{
                    "spans": [{ "text": "site", "markRefs": ["l1"] }],
                    "marks": [{ "id": "l1", "kind": "link", "href": "https://example.org" }],
                }],
            })),
            &cfg,
        );
        let OutputNode::Element { children, .. } = &out[0] else {
            panic!("expected element");
        };
        let OutputNode::Element { tag, attrs, .. } = &children[0] else {
            panic!("expected link element");
        };
        assert_eq!(tag, "a");
        assert_eq!(
            attrs,
            &vec![
                ("href".to_owned(), "https://example.org".to_owned()),
                ("rel".to_owned(), "noopener noreferrer".to_owned()),
                ("target".to_owned(), "_blank".to_owned()),
            ]
        );
    }

    #[test]
    fn heading_floor_raises_levels() {
        let cfg = RenderConfig {
            heading_floor: 2,
            ..RenderConfig::default()
        };
        let out = render(
            &tree(json!({
                "blocks": [
                    { "style": "h1", "spans": [{ "text": "a" }] },
                    { "style": "h3", "spans": [{ "text": "b" }] },
                ],
            })),
            &cfg,
        );
        assert_eq!(
            out,
            vec![
                OutputNode::element("h2", vec![OutputNode::text("a")]),
                OutputNode::element("h3", vec![OutputNode::text("b")]),
            ]
        );
    }

    #[test]
    fn consecutive_list_items_group_and_nest() {
        let out = render(
            &tree(json!({
                "blocks": [
                    { "listItem": { "kind": "bullet", "level": 1 }, "spans": [{ "text": "one" }] },
                    { "listItem": { "kind": "bullet", "level": 1 }, "spans": [{ "text": "two" }] },
                    { "listItem": { "kind": "bullet", "level": 2 }, "spans": [{ "text": "two.a" }] },
                    { "listItem": { "kind": "bullet", "level": 1 }, "spans": [{ "text": "three" }] },
                    { "spans": [{ "text": "after" }] },
                ],
            })),
            &config(),
        );

        let expected_list = OutputNode::element(
            "ul",
            vec![
                OutputNode::element("li", vec![OutputNode::text("one")]),
                OutputNode::element(
                    "li",
                    vec![
                        OutputNode::text("two"),
                        OutputNode::element(
                            "ul",
                            vec![OutputNode::element("li", vec![OutputNode::text("two.a")])],
                        ),
                    ],
                ),
                OutputNode::element("li", vec![OutputNode::text("three")]),
            ],
        );
        assert_eq!(
            out,
            vec![
                expected_list,
                OutputNode::element("p", vec![OutputNode::text("after")]),
            ]
        );
    }

    #[test]
    fn list_kind_change_at_same_level_starts_a_sibling_list() {
        let out = render(
            &tree(json!({
                "blocks": [
                    { "listItem": { "kind": "bullet", "level": 1 }, "spans": [{ "text": "b" }] },
                    { "listItem": { "kind": "number", "level": 1 }, "spans": [{ "text": "n" }] },
                ],
            })),
            &config(),
        );
        assert_eq!(
            out,
            vec![
                OutputNode::element("ul", vec![OutputNode::element("li", vec![OutputNode::text("b")])]),
                OutputNode::element("ol", vec![OutputNode::element("li", vec![OutputNode::text("n")])]),
            ]
        );
    }

    #[test]
    fn numbered_list_renders_as_ol() {
        let item = ListItem {
            kind: ListKind::Number,
            level: 1,
        };
        let block = Block {
            style: BlockStyle::Normal,
            list_item: Some(item),
            spans: vec![Span::plain("first")],
            marks: Vec::new(),
        };
        let out = render(
            &ContentTree {
                blocks: vec![block],
            },
            &config(),
        );
        assert_eq!(
            out,
            vec![OutputNode::element(
                "ol",
                vec![OutputNode::element("li", vec![OutputNode::text("first")])],
            )]
        );
    }

    #[test]
    fn rendering_twice_yields_identical_output() {
        let t = tree(json!({
            "blocks": [
                { "style": "h2", "spans": [{ "text": "title" }] },
                {
                    "spans": [
                        { "text": "see ", "markRefs": [] },
                        { "text": "here", "markRefs": ["l1"] },
                    ],
                    "marks": [{ "id": "l1", "kind": "link", "href": "https://example.org" }],
                },
                { "listItem": { "kind": "bullet", "level": 1 }, "spans": [{ "text": "point" }] },
            ],
        }));
        let cfg = config();
        assert_eq!(render(&t, &cfg), render(&t, &cfg));
    }
}
