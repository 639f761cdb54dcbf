// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! A parsed HTML fragment: the content of an in-memory view.
//!
//! Nodes live in a flat arena and refer to each other by [`NodeHandle`].
//! Detached nodes (removed by the tree builder, or never appended) stay in
//! the arena but are unreachable from the root, so they are invisible to
//! serialisation and text extraction.

use html5ever::{LocalName, Namespace, QualName};

use super::fragment_creator::FragmentCreator;

const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

/// Elements serialised without a closing tag, as `innerHTML` does.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link",
    "meta", "source", "track", "wbr",
];

/// Elements whose text children `innerHTML` writes out unescaped.
const RAW_TEXT_ELEMENTS: &[&str] = &[
    "iframe", "noembed", "noframes", "noscript", "plaintext", "script",
    "style", "xmp",
];

pub(crate) fn html_name(local: &str) -> QualName {
    QualName::new(
        None,
        Namespace::from(HTML_NAMESPACE),
        LocalName::from(local),
    )
}

/// Attribute name as serialised, keeping the prefix of namespaced
/// attributes such as `xlink:href`.
pub(crate) fn attribute_name(name: &QualName) -> String {
    match &name.prefix {
        Some(prefix) => format!("{prefix}:{}", name.local),
        None => name.local.as_ref().to_owned(),
    }
}

/// `innerHTML` writes U+00A0 as `&nbsp;` in text and attribute values.
fn push_escaped(out: &mut String, escaped: &str) {
    out.push_str(&escaped.replace('\u{a0}', "&nbsp;"));
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) struct NodeHandle(pub(crate) usize);

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct FragmentElement {
    pub(crate) name: QualName,
    pub(crate) attrs: Vec<(String, String)>,
    pub(crate) children: Vec<NodeHandle>,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum FragmentNode {
    Document(Vec<NodeHandle>),
    Element(FragmentElement),
    Text(String),
    Comment(String),
}

impl FragmentNode {
    pub(crate) fn children(&self) -> &[NodeHandle] {
        match self {
            FragmentNode::Document(children) => children,
            FragmentNode::Element(e) => &e.children,
            FragmentNode::Text(_) | FragmentNode::Comment(_) => &[],
        }
    }

    pub(crate) fn children_mut(&mut self) -> Option<&mut Vec<NodeHandle>> {
        match self {
            FragmentNode::Document(children) => Some(children),
            FragmentNode::Element(e) => Some(&mut e.children),
            FragmentNode::Text(_) | FragmentNode::Comment(_) => None,
        }
    }
}

/// The tree under construction, plus the parent links the HTML tree builder
/// needs to move nodes around.
#[derive(Clone, Debug)]
pub(crate) struct FragmentArena {
    pub(crate) nodes: Vec<FragmentNode>,
    pub(crate) parents: Vec<Option<NodeHandle>>,
    pub(crate) document_handle: NodeHandle,
    /// Name reported for nodes that are not elements.
    pub(crate) anonymous_name: QualName,
}

impl FragmentArena {
    pub(crate) fn new() -> Self {
        Self {
            nodes: vec![FragmentNode::Document(Vec::new())],
            parents: vec![None],
            document_handle: NodeHandle(0),
            anonymous_name: html_name(""),
        }
    }

    pub(crate) fn document_handle(&self) -> &NodeHandle {
        &self.document_handle
    }

    pub(crate) fn add_node(&mut self, node: FragmentNode) -> NodeHandle {
        self.nodes.push(node);
        self.parents.push(None);
        NodeHandle(self.nodes.len() - 1)
    }

    pub(crate) fn get_node(&self, handle: &NodeHandle) -> &FragmentNode {
        &self.nodes[handle.0]
    }

    pub(crate) fn get_mut_node(
        &mut self,
        handle: &NodeHandle,
    ) -> &mut FragmentNode {
        &mut self.nodes[handle.0]
    }

    pub(crate) fn parent(&self, handle: &NodeHandle) -> Option<&NodeHandle> {
        self.parents[handle.0].as_ref()
    }

    pub(crate) fn name(&self, handle: &NodeHandle) -> &QualName {
        match self.get_node(handle) {
            FragmentNode::Element(e) => &e.name,
            _ => &self.anonymous_name,
        }
    }

    /// Append `child` as the last child of `parent`. Text and comment nodes
    /// cannot have children; appending to them is ignored.
    pub(crate) fn append_child(
        &mut self,
        parent: &NodeHandle,
        child: NodeHandle,
    ) {
        self.detach(&child);
        if let Some(children) = self.get_mut_node(parent).children_mut() {
            children.push(child.clone());
            self.parents[child.0] = Some(parent.clone());
        }
    }

    /// Insert `node` directly before `sibling` under the sibling's parent.
    pub(crate) fn insert_before(
        &mut self,
        sibling: &NodeHandle,
        node: NodeHandle,
    ) {
        let Some(parent) = self.parent(sibling).cloned() else {
            return;
        };
        self.detach(&node);
        if let Some(children) = self.get_mut_node(&parent).children_mut() {
            let index = children
                .iter()
                .position(|c| c == sibling)
                .unwrap_or(children.len());
            children.insert(index, node.clone());
            self.parents[node.0] = Some(parent);
        }
    }

    pub(crate) fn detach(&mut self, handle: &NodeHandle) {
        if let Some(parent) = self.parents[handle.0].take() {
            if let Some(children) = self.get_mut_node(&parent).children_mut() {
                children.retain(|c| c != handle);
            }
        }
    }

    pub(crate) fn reparent_children(
        &mut self,
        from: &NodeHandle,
        to: &NodeHandle,
    ) {
        let moved: Vec<NodeHandle> = self
            .get_mut_node(from)
            .children_mut()
            .map(std::mem::take)
            .unwrap_or_default();
        for child in moved {
            self.parents[child.0] = None;
            self.append_child(to, child);
        }
    }

    /// The last child of `parent`, if that child is a text node.
    pub(crate) fn trailing_text(
        &self,
        parent: &NodeHandle,
    ) -> Option<NodeHandle> {
        self.get_node(parent)
            .children()
            .last()
            .filter(|last| matches!(self.get_node(last), FragmentNode::Text(_)))
            .cloned()
    }

    /// The text node right before `sibling`, if there is one.
    pub(crate) fn text_before(
        &self,
        sibling: &NodeHandle,
    ) -> Option<NodeHandle> {
        let parent = self.parent(sibling)?;
        let children = self.get_node(parent).children();
        let index = children.iter().position(|c| c == sibling)?;
        let previous = children.get(index.checked_sub(1)?)?;
        matches!(self.get_node(previous), FragmentNode::Text(_))
            .then(|| previous.clone())
    }
}

/// The result of parsing markup the way an element's `innerHTML` setter
/// does: errors are tolerated and recorded, never fatal.
#[derive(Clone, Debug)]
pub struct Fragment {
    arena: FragmentArena,
    root: Option<NodeHandle>,
    parse_errors: Vec<String>,
}

impl Fragment {
    pub fn empty() -> Self {
        Self {
            arena: FragmentArena::new(),
            root: None,
            parse_errors: Vec::new(),
        }
    }

    pub fn parse(html: &str) -> Self {
        if html.is_empty() {
            return Self::empty();
        }
        let (arena, parse_errors) = FragmentCreator::parse(html);
        if !parse_errors.is_empty() {
            tracing::debug!(
                errors = parse_errors.len(),
                "tolerated HTML parse errors in view content"
            );
        }
        // Fragment parsing puts everything under a synthetic `<html>`
        // element below the document node.
        let root = arena
            .get_node(arena.document_handle())
            .children()
            .iter()
            .find(|h| matches!(arena.get_node(h), FragmentNode::Element(_)))
            .cloned();
        Self {
            arena,
            root,
            parse_errors,
        }
    }

    pub fn parse_errors(&self) -> &[String] {
        &self.parse_errors
    }

    pub fn is_empty(&self) -> bool {
        self.top_level().is_empty()
    }

    fn top_level(&self) -> &[NodeHandle] {
        self.root
            .as_ref()
            .map(|root| self.arena.get_node(root).children())
            .unwrap_or(&[])
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        for child in self.top_level() {
            self.write_html(child, false, &mut out);
        }
        out
    }

    pub fn text_content(&self) -> String {
        let mut out = String::new();
        for child in self.top_level() {
            self.write_text(child, &mut out);
        }
        out
    }

    fn write_html(
        &self,
        handle: &NodeHandle,
        in_raw_text: bool,
        out: &mut String,
    ) {
        match self.arena.get_node(handle) {
            FragmentNode::Text(text) if in_raw_text => out.push_str(text),
            FragmentNode::Text(text) => {
                push_escaped(out, &html_escape::encode_text(text));
            }
            FragmentNode::Comment(text) => {
                out.push_str("<!--");
                out.push_str(text);
                out.push_str("-->");
            }
            FragmentNode::Element(element) => {
                let tag = element.name.local.as_ref();
                out.push('<');
                out.push_str(tag);
                for (name, value) in &element.attrs {
                    out.push(' ');
                    out.push_str(name);
                    out.push_str("=\"");
                    push_escaped(
                        out,
                        &html_escape::encode_double_quoted_attribute(value),
                    );
                    out.push('"');
                }
                out.push('>');
                if VOID_ELEMENTS.contains(&tag) {
                    return;
                }
                let raw_text = RAW_TEXT_ELEMENTS.contains(&tag);
                for child in &element.children {
                    self.write_html(child, raw_text, out);
                }
                out.push_str("</");
                out.push_str(tag);
                out.push('>');
            }
            FragmentNode::Document(children) => {
                for child in children {
                    self.write_html(child, false, out);
                }
            }
        }
    }

    fn write_text(&self, handle: &NodeHandle, out: &mut String) {
        match self.arena.get_node(handle) {
            FragmentNode::Text(text) => out.push_str(text),
            FragmentNode::Comment(_) => {}
            node => {
                for child in node.children() {
                    self.write_text(child, out);
                }
            }
        }
    }
}

impl Default for Fragment {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod test {
    use indoc::indoc;
    use speculoos::{assert_that, AssertionFailure, Spec};

    use super::*;

    trait Roundtrips<T> {
        fn roundtrips(&self);
    }

    impl<'s, T> Roundtrips<T> for Spec<'s, T>
    where
        T: AsRef<str>,
    {
        fn roundtrips(&self) {
            let subject = self.subject.as_ref();
            let output = Fragment::parse(subject).to_html();
            if output != subject {
                AssertionFailure::from_spec(self)
                    .with_expected(String::from(subject))
                    .with_actual(output)
                    .fail();
            }
        }
    }

    #[test]
    fn parsing_an_empty_string_creates_an_empty_fragment() {
        let fragment = Fragment::parse("");
        assert!(fragment.is_empty());
        assert_eq!(fragment.to_html(), "");
        assert_eq!(fragment.text_content(), "");
    }

    #[test]
    fn plain_text_roundtrips() {
        assert_that!("Hello World").roundtrips();
    }

    #[test]
    fn inline_formatting_roundtrips() {
        assert_that!("A<i>B<b>C</b>D</i>E").roundtrips();
        assert_that!("line one<br>line two").roundtrips();
        assert_that!(r#"<a href="https://example.org">link</a>"#).roundtrips();
    }

    #[test]
    fn self_closing_line_break_is_normalised() {
        assert_eq!(Fragment::parse("a<br/>b").to_html(), "a<br>b");
    }

    #[test]
    fn raw_text_elements_keep_their_text_verbatim() {
        assert_that!("<style>a>b</style>").roundtrips();
        assert_that!("x<script>if (a < b && c) {}</script>").roundtrips();

        let once = Fragment::parse("<style>a>b</style>").to_html();
        let twice = Fragment::parse(&once).to_html();
        assert_eq!(twice, "<style>a>b</style>");
    }

    #[test]
    fn non_breaking_spaces_are_written_as_entities() {
        assert_that!("Hello&nbsp;").roundtrips();
        assert_that!(r#"<span title="a&nbsp;b">c</span>"#).roundtrips();
        assert_eq!(
            Fragment::parse("Hello&nbsp;").text_content(),
            "Hello\u{a0}"
        );
    }

    #[test]
    fn namespaced_attributes_keep_their_prefix() {
        assert_that!(r##"<svg><use xlink:href="#a"></use></svg>"##)
            .roundtrips();
    }

    #[test]
    fn entities_are_decoded_for_text_and_reencoded_for_html() {
        let fragment = Fragment::parse("aaa&lt;strong&gt;bbb&amp;");
        assert_eq!(fragment.text_content(), "aaa<strong>bbb&");
        assert_eq!(fragment.to_html(), "aaa&lt;strong&gt;bbb&amp;");
    }

    #[test]
    fn text_content_ignores_tags_and_comments() {
        let fragment =
            Fragment::parse("<b>bold</b> and <!-- note --><i>it</i>");
        assert_eq!(fragment.text_content(), "bold and it");
        assert_eq!(
            fragment.to_html(),
            "<b>bold</b> and <!-- note --><i>it</i>"
        );
    }

    #[test]
    fn a_lone_line_break_has_no_text() {
        let fragment = Fragment::parse("<br>");
        assert!(!fragment.is_empty());
        assert_eq!(fragment.text_content(), "");
    }

    #[test]
    fn unclosed_tags_are_closed() {
        assert_eq!(Fragment::parse("<b>Hello ").to_html(), "<b>Hello </b>");
    }

    #[test]
    fn stray_end_tags_are_dropped_and_recorded() {
        let fragment = Fragment::parse("Hello </b>World");
        assert_eq!(fragment.to_html(), "Hello World");
        assert!(!fragment.parse_errors().is_empty());
    }

    #[test]
    fn misnested_formatting_is_repaired() {
        let fragment = Fragment::parse("<b>1<i>2</b>3</i>");
        assert_eq!(fragment.text_content(), "123");
        assert_eq!(fragment.to_html(), "<b>1<i>2</i></b><i>3</i>");
    }

    #[test]
    fn multi_line_markup_keeps_its_whitespace() {
        let html = indoc! {"
            first
            <br>
            second"};
        let fragment = Fragment::parse(html);
        assert_eq!(fragment.text_content(), "first\n\nsecond");
        assert_eq!(fragment.to_html(), html);
    }
}
