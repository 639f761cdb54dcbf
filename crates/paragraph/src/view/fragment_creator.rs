// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use std::borrow::Cow;
use std::cell::{Ref, RefCell};

use html5ever::interface::NextParserState;
use html5ever::tendril::{StrTendril, TendrilSink};
use html5ever::tree_builder::{ElementFlags, NodeOrText, QuirksMode, TreeSink};
use html5ever::{parse_fragment, Attribute, QualName};

use super::fragment::{
    attribute_name, html_name, FragmentArena, FragmentElement, FragmentNode,
    NodeHandle,
};

pub(crate) type FragmentCreationResult = (FragmentArena, Vec<String>);

/// `TreeSink` that builds a [`FragmentArena`] the same way a browser builds
/// the children of an element whose `innerHTML` is assigned.
pub(crate) struct FragmentCreator {
    arena: RefCell<FragmentArena>,
    parse_errors: RefCell<Vec<String>>,
}

impl FragmentCreator {
    pub fn parse(html: &str) -> FragmentCreationResult {
        parse_fragment(
            FragmentCreator::default(),
            Default::default(),
            html_name("div"),
            vec![],
        )
        .from_utf8()
        .one(html.as_bytes())
    }

    fn append_text(&self, parent: &NodeHandle, text: &str) {
        let arena = &mut self.arena.borrow_mut();
        if let Some(existing) = arena.trailing_text(parent) {
            if let FragmentNode::Text(content) = arena.get_mut_node(&existing) {
                content.push_str(text);
            }
            return;
        }
        let handle = arena.add_node(FragmentNode::Text(text.to_owned()));
        arena.append_child(parent, handle);
    }
}

impl Default for FragmentCreator {
    fn default() -> Self {
        Self {
            arena: RefCell::new(FragmentArena::new()),
            parse_errors: RefCell::new(Vec::new()),
        }
    }
}

impl TreeSink for FragmentCreator {
    type Handle = NodeHandle;
    type Output = FragmentCreationResult;
    type ElemName<'a> = Ref<'a, QualName>;

    fn finish(self) -> Self::Output {
        (self.arena.into_inner(), self.parse_errors.into_inner())
    }

    fn parse_error(&self, msg: Cow<'static, str>) {
        self.parse_errors.borrow_mut().push(String::from(msg));
    }

    fn get_document(&self) -> Self::Handle {
        self.arena.borrow().document_handle().clone()
    }

    fn elem_name<'a>(&'a self, target: &'a Self::Handle) -> Self::ElemName<'a> {
        Ref::map(self.arena.borrow(), |arena| arena.name(target))
    }

    fn create_element(
        &self,
        name: QualName,
        attrs: Vec<Attribute>,
        _flags: ElementFlags,
    ) -> Self::Handle {
        let attrs = attrs
            .into_iter()
            .map(|attr| {
                (
                    attribute_name(&attr.name),
                    attr.value.as_ref().to_owned(),
                )
            })
            .collect();
        self.arena
            .borrow_mut()
            .add_node(FragmentNode::Element(FragmentElement {
                name,
                attrs,
                children: Vec::new(),
            }))
    }

    fn create_comment(&self, text: StrTendril) -> Self::Handle {
        self.arena
            .borrow_mut()
            .add_node(FragmentNode::Comment(text.as_ref().to_owned()))
    }

    fn create_pi(&self, _target: StrTendril, data: StrTendril) -> Self::Handle {
        // Processing instructions only occur in XML; keep them as comments
        // like the HTML parser does for `<?...>` bogus comments.
        self.create_comment(data)
    }

    fn append(&self, parent: &Self::Handle, child: NodeOrText<Self::Handle>) {
        match child {
            NodeOrText::AppendNode(node) => {
                self.arena.borrow_mut().append_child(parent, node)
            }
            NodeOrText::AppendText(text) => self.append_text(parent, &text),
        }
    }

    fn append_based_on_parent_node(
        &self,
        element: &Self::Handle,
        prev_element: &Self::Handle,
        child: NodeOrText<Self::Handle>,
    ) {
        let has_parent = self.arena.borrow().parent(element).is_some();
        if has_parent {
            self.append_before_sibling(element, child);
        } else {
            self.append(prev_element, child);
        }
    }

    fn append_doctype_to_document(
        &self,
        _name: StrTendril,
        _public_id: StrTendril,
        _system_id: StrTendril,
    ) {
        // Doctypes have no meaning inside an element's content.
    }

    fn mark_script_already_started(&self, _node: &Self::Handle) {}

    fn pop(&self, _node: &Self::Handle) {}

    fn get_template_contents(&self, target: &Self::Handle) -> Self::Handle {
        // Template contents are kept inline; the view never instantiates them.
        target.clone()
    }

    fn same_node(&self, x: &Self::Handle, y: &Self::Handle) -> bool {
        x == y
    }

    fn set_quirks_mode(&self, _mode: QuirksMode) {}

    fn append_before_sibling(
        &self,
        sibling: &Self::Handle,
        new_node: NodeOrText<Self::Handle>,
    ) {
        let arena = &mut self.arena.borrow_mut();
        match new_node {
            NodeOrText::AppendNode(node) => arena.insert_before(sibling, node),
            NodeOrText::AppendText(text) => {
                if let Some(previous) = arena.text_before(sibling) {
                    if let FragmentNode::Text(content) =
                        arena.get_mut_node(&previous)
                    {
                        content.push_str(&text);
                    }
                } else {
                    let handle = arena
                        .add_node(FragmentNode::Text(text.as_ref().to_owned()));
                    arena.insert_before(sibling, handle);
                }
            }
        }
    }

    fn add_attrs_if_missing(
        &self,
        target: &Self::Handle,
        attrs: Vec<Attribute>,
    ) {
        let arena = &mut self.arena.borrow_mut();
        if let FragmentNode::Element(element) = arena.get_mut_node(target) {
            for attr in attrs {
                let name = attribute_name(&attr.name);
                if !element.attrs.iter().any(|(n, _)| *n == name) {
                    let value = attr.value.as_ref().to_owned();
                    element.attrs.push((name, value));
                }
            }
        }
    }

    fn associate_with_form(
        &self,
        _target: &Self::Handle,
        _form: &Self::Handle,
        _nodes: (&Self::Handle, Option<&Self::Handle>),
    ) {
    }

    fn remove_from_parent(&self, target: &Self::Handle) {
        self.arena.borrow_mut().detach(target);
    }

    fn reparent_children(
        &self,
        node: &Self::Handle,
        new_parent: &Self::Handle,
    ) {
        self.arena.borrow_mut().reparent_children(node, new_parent);
    }

    fn is_mathml_annotation_xml_integration_point(
        &self,
        _handle: &Self::Handle,
    ) -> bool {
        false
    }

    fn set_current_line(&self, _line_number: u64) {}

    fn complete_script(&self, _node: &Self::Handle) -> NextParserState {
        NextParserState::Continue
    }

    fn allow_declarative_shadow_roots(
        &self,
        _intended_parent: &Self::Handle,
    ) -> bool {
        false
    }

    fn attach_declarative_shadow(
        &self,
        _location: &Self::Handle,
        _template: &Self::Handle,
        _attrs: Vec<Attribute>,
    ) -> Result<(), String> {
        Err("Declarative shadow roots are not supported in block views"
            .to_owned())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn parse(input: &str) -> FragmentArena {
        FragmentCreator::parse(input).0
    }

    fn top_level(arena: &FragmentArena) -> Vec<FragmentNode> {
        let document = arena.get_node(arena.document_handle());
        let html = document.children()[0].clone();
        arena
            .get_node(&html)
            .children()
            .iter()
            .map(|h| arena.get_node(h).clone())
            .collect()
    }

    #[test]
    fn parsing_wraps_content_in_a_synthetic_root() {
        let arena = parse("foo");
        let document = arena.get_node(arena.document_handle());
        assert_eq!(document.children().len(), 1);
        assert_eq!(
            arena.name(&document.children()[0]).local.as_ref(),
            "html"
        );
    }

    #[test]
    fn adjacent_text_is_merged_into_one_node() {
        let arena = parse("one </i>two");
        assert_eq!(
            top_level(&arena),
            vec![FragmentNode::Text("one two".to_owned())]
        );
    }

    #[test]
    fn parsing_tags_with_attributes_preserves_them() {
        let arena = parse("<span class='foo'>txt</span>");
        let nodes = top_level(&arena);
        let FragmentNode::Element(span) = &nodes[0] else {
            panic!("expected an element, got {:?}", nodes[0]);
        };
        assert_eq!(span.name.local.as_ref(), "span");
        assert_eq!(span.attrs, vec![("class".to_owned(), "foo".to_owned())]);
    }

    #[test]
    fn parse_errors_are_collected_not_fatal() {
        let (arena, errors) = FragmentCreator::parse("a</p>b");
        assert!(!errors.is_empty());
        assert!(!top_level(&arena).is_empty());
    }
}
