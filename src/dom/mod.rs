//! Minimal arena-backed element tree, standing in for the live widget tree
//! of the admin page. Only the surface the controller consumes is modeled:
//! tags, id, class lists, attributes, own text, and ordered traversal.
//! There are no text nodes; an element's own text lives on the element.

/// Handle to one element inside a [`Document`]. Only valid for the document
/// that minted it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// A single element: tag name, attributes, class list, own text.
#[derive(Debug, Clone, Default)]
pub struct Element {
    tag: String,
    attrs: Vec<(String, String)>,
    classes: Vec<String>,
    text: String,
}

impl Element {
    /// Create an element with the given tag name.
    pub fn new(tag: impl Into<String>) -> Self {
        Element {
            tag: tag.into(),
            ..Element::default()
        }
    }

    /// Set an attribute (builder style).
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push((name.into(), value.into()));
        self
    }

    /// Shorthand for `with_attr("id", ..)`.
    pub fn with_id(self, id: impl Into<String>) -> Self {
        self.with_attr("id", id)
    }

    /// Add a class (builder style).
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    /// Set the element's own text content (builder style).
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }
}

#[derive(Debug, Clone)]
struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    element: Element,
}

/// An element tree. Nodes are stored in an arena; [`NodeId`]s are stable for
/// the lifetime of the document and removal is never needed (hosts rebuild
/// the snapshot instead).
#[derive(Debug, Clone, Default)]
pub struct Document {
    nodes: Vec<Node>,
}

impl Document {
    /// Create an empty document.
    pub fn new() -> Self {
        Document::default()
    }

    /// Add a top-level element.
    pub fn push_root(&mut self, element: Element) -> NodeId {
        self.insert(None, element)
    }

    /// Append a child under `parent`.
    pub fn append(&mut self, parent: NodeId, element: Element) -> NodeId {
        self.insert(Some(parent), element)
    }

    fn insert(&mut self, parent: Option<NodeId>, element: Element) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            parent,
            children: Vec::new(),
            element,
        });
        if let Some(p) = parent {
            self.nodes[p.0].children.push(id);
        }
        id
    }

    fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    /// Tag name of an element.
    pub fn tag(&self, id: NodeId) -> &str {
        &self.node(id).element.tag
    }

    /// First element (in document order) whose `id` attribute matches.
    pub fn by_id(&self, id: &str) -> Option<NodeId> {
        let mut stack: Vec<NodeId> = self.roots();
        stack.reverse();
        while let Some(node) = stack.pop() {
            if self.attr(node, "id") == Some(id) {
                return Some(node);
            }
            for child in self.node(node).children.iter().rev() {
                stack.push(*child);
            }
        }
        None
    }

    fn roots(&self) -> Vec<NodeId> {
        (0..self.nodes.len())
            .map(NodeId)
            .filter(|id| self.node(*id).parent.is_none())
            .collect()
    }

    /// All descendants of `id` in document order, excluding `id` itself.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.node(id).children.iter().rev().copied().collect();
        while let Some(node) = stack.pop() {
            out.push(node);
            for child in self.node(node).children.iter().rev() {
                stack.push(*child);
            }
        }
        out
    }

    /// Direct children of `id`, in order.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).children
    }

    /// Parent of `id`, if any.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    /// Nearest element matching `pred`, starting from `id` itself and walking
    /// up through its ancestors.
    pub fn closest<P>(&self, id: NodeId, pred: P) -> Option<NodeId>
    where
        P: Fn(&Document, NodeId) -> bool,
    {
        let mut current = Some(id);
        while let Some(node) = current {
            if pred(self, node) {
                return Some(node);
            }
            current = self.node(node).parent;
        }
        None
    }

    /// True when `ancestor` is `id` itself or one of its ancestors.
    pub fn contains(&self, ancestor: NodeId, id: NodeId) -> bool {
        self.closest(id, |_, n| n == ancestor).is_some()
    }

    /// The element immediately following `id` among its parent's children.
    pub fn next_element_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.node(id).parent?;
        let siblings = &self.node(parent).children;
        let pos = siblings.iter().position(|s| *s == id)?;
        siblings.get(pos + 1).copied()
    }

    /// Attribute value, if present.
    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.node(id)
            .element
            .attrs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Set (or replace) an attribute.
    pub fn set_attr(&mut self, id: NodeId, name: &str, value: impl Into<String>) {
        let node = self.node_mut(id);
        let value = value.into();
        if let Some(slot) = node.element.attrs.iter_mut().find(|(n, _)| n == name) {
            slot.1 = value;
        } else {
            node.element.attrs.push((name.to_string(), value));
        }
    }

    /// Remove an attribute if present.
    pub fn remove_attr(&mut self, id: NodeId, name: &str) {
        self.node_mut(id).element.attrs.retain(|(n, _)| n != name);
    }

    /// Class list of an element, in order.
    pub fn classes(&self, id: NodeId) -> &[String] {
        &self.node(id).element.classes
    }

    /// True when the element carries `class`.
    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.node(id).element.classes.iter().any(|c| c == class)
    }

    /// True when any class of the element contains `fragment` as a substring.
    pub fn class_contains(&self, id: NodeId, fragment: &str) -> bool {
        self.node(id)
            .element
            .classes
            .iter()
            .any(|c| c.contains(fragment))
    }

    /// Add a class unless already present.
    pub fn add_class(&mut self, id: NodeId, class: &str) {
        if !self.has_class(id, class) {
            self.node_mut(id).element.classes.push(class.to_string());
        }
    }

    /// Remove a class if present.
    pub fn remove_class(&mut self, id: NodeId, class: &str) {
        self.node_mut(id).element.classes.retain(|c| c != class);
    }

    /// Own text plus all descendants' text, concatenated in document order.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = self.node(id).element.text.clone();
        for child in self.descendants(id) {
            out.push_str(&self.node(child).element.text);
        }
        out
    }

    /// The selected `option` child of a `select`: the first option carrying
    /// the `selected` attribute, else the first option (select-element
    /// default), else nothing.
    pub fn selected_option(&self, select: NodeId) -> Option<NodeId> {
        let options: Vec<NodeId> = self
            .node(select)
            .children
            .iter()
            .copied()
            .filter(|c| self.tag(*c) == "option")
            .collect();
        options
            .iter()
            .copied()
            .find(|o| self.attr(*o, "selected").is_some())
            .or_else(|| options.first().copied())
    }

    /// Mark `option` as the selected child of `select`, clearing the mark
    /// from its siblings.
    pub fn set_selected(&mut self, select: NodeId, option: NodeId) {
        let options: Vec<NodeId> = self
            .node(select)
            .children
            .iter()
            .copied()
            .filter(|c| self.tag(*c) == "option")
            .collect();
        for o in options {
            self.remove_attr(o, "selected");
        }
        self.set_attr(option, "selected", "");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (Document, NodeId, NodeId, NodeId) {
        let mut doc = Document::new();
        let root = doc.push_root(Element::new("div").with_id("sidebar"));
        let list = doc.append(root, Element::new("ul"));
        let item = doc.append(list, Element::new("li").with_class("filter-row"));
        (doc, root, list, item)
    }

    #[test]
    fn by_id_finds_first_match_in_document_order() {
        let (mut doc, root, _, _) = sample();
        doc.append(root, Element::new("div").with_id("dup"));
        doc.push_root(Element::new("div").with_id("dup"));
        let found = doc.by_id("dup").unwrap();
        assert_eq!(doc.parent(found), Some(root));
        assert!(doc.by_id("missing").is_none());
    }

    #[test]
    fn closest_includes_self() {
        let (doc, _, list, item) = sample();
        assert_eq!(doc.closest(item, |d, n| d.tag(n) == "li"), Some(item));
        assert_eq!(doc.closest(item, |d, n| d.tag(n) == "ul"), Some(list));
        assert!(doc.closest(item, |d, n| d.tag(n) == "table").is_none());
    }

    #[test]
    fn descendants_are_in_document_order() {
        let (mut doc, root, list, item) = sample();
        let late = doc.append(root, Element::new("p"));
        assert_eq!(doc.descendants(root), vec![list, item, late]);
    }

    #[test]
    fn next_element_sibling_walks_forward_only() {
        let (mut doc, root, list, _) = sample();
        let second = doc.append(root, Element::new("p"));
        assert_eq!(doc.next_element_sibling(list), Some(second));
        assert!(doc.next_element_sibling(second).is_none());
    }

    #[test]
    fn class_ops_are_idempotent() {
        let (mut doc, root, _, _) = sample();
        doc.add_class(root, "collapsed");
        doc.add_class(root, "collapsed");
        assert_eq!(doc.classes(root).to_vec(), ["collapsed"]);
        assert!(doc.class_contains(root, "collap"));
        doc.remove_class(root, "collapsed");
        assert!(!doc.has_class(root, "collapsed"));
    }

    #[test]
    fn text_content_concatenates_descendants() {
        let mut doc = Document::new();
        let h = doc.push_root(Element::new("h3").with_text("By "));
        doc.append(h, Element::new("span").with_text("registration date"));
        assert_eq!(doc.text_content(h), "By registration date");
    }

    #[test]
    fn selected_option_defaults_to_first() {
        let mut doc = Document::new();
        let select = doc.push_root(Element::new("select"));
        let all = doc.append(select, Element::new("option").with_attr("value", ""));
        let active = doc.append(
            select,
            Element::new("option").with_attr("value", "active"),
        );
        assert_eq!(doc.selected_option(select), Some(all));
        doc.set_selected(select, active);
        assert_eq!(doc.selected_option(select), Some(active));
        doc.set_selected(select, all);
        assert_eq!(doc.selected_option(select), Some(all));
    }
}
