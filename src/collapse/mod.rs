//! Collapse/expand state for one designated filter group.
//!
//! The state lives as an enum on the bound panel and is projected onto
//! presentation classes whenever it changes; classes are never read back. Toggling is
//! purely visual: it never touches query state and never navigates.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::contract::MarkupContract;
use crate::dom::{Document, NodeId};

/// Presentation state of the bound filter group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollapseState {
    Collapsed,
    Expanded,
}

impl CollapseState {
    /// The opposite state.
    pub fn toggled(self) -> Self {
        match self {
            CollapseState::Collapsed => CollapseState::Expanded,
            CollapseState::Expanded => CollapseState::Collapsed,
        }
    }
}

/// Result of offering a click to the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// The click hit the toggle heading: the state flipped, and the host must
    /// suppress the click's default action (the heading may be anchor-like).
    Toggled(CollapseState),
    /// Not ours; the host handles the click as usual.
    Ignored,
}

/// The bound collapsible group: heading (the toggle), wrapper (carries the
/// state class), content (the element being hidden), and the state itself.
#[derive(Debug, Clone)]
pub struct CollapsePanel {
    heading: NodeId,
    wrapper: NodeId,
    content: NodeId,
    collapsed_class: String,
    state: CollapseState,
}

impl CollapsePanel {
    /// Locate the designated filter group and bind to it, projecting the
    /// initial collapsed state onto its classes.
    ///
    /// Discovery prefers a group carrying the stable marker attribute; only
    /// when none exists does it fall back to scanning heading-like elements
    /// for the contract's phrases, first match in document order. Returns
    /// Returns `None` without touching anything when the container,
    /// heading, or content cannot be resolved; the controller is then inert for this
    /// page load.
    pub fn bind(doc: &mut Document, contract: &MarkupContract) -> Option<Self> {
        let container = doc.by_id(&contract.container_id)?;

        let (heading, wrapper) = match discover_marked(doc, contract, container) {
            Some(found) => found,
            None => {
                let heading = discover_by_text(doc, contract, container)?;
                let wrapper = resolve_wrapper(doc, contract, heading)?;
                (heading, wrapper)
            }
        };

        let content = resolve_content(doc, contract, heading, wrapper)?;

        doc.add_class(wrapper, &contract.wrapper_class);
        doc.add_class(content, &contract.content_class);
        doc.add_class(heading, &contract.toggle_class);

        let panel = CollapsePanel {
            heading,
            wrapper,
            content,
            collapsed_class: contract.collapsed_class.clone(),
            state: CollapseState::Collapsed,
        };
        panel.project(doc);
        Some(panel)
    }

    /// Current state.
    pub fn state(&self) -> CollapseState {
        self.state
    }

    /// The toggle heading.
    pub fn heading(&self) -> NodeId {
        self.heading
    }

    /// The collapsible content element.
    pub fn content(&self) -> NodeId {
        self.content
    }

    /// Offer a click to the panel. Clicks on (or inside) the heading flip
    /// the state and re-project it; everything else is ignored.
    pub fn handle_click(&mut self, doc: &mut Document, target: NodeId) -> ClickOutcome {
        if !doc.contains(self.heading, target) {
            return ClickOutcome::Ignored;
        }
        self.state = self.state.toggled();
        self.project(doc);
        debug!(state = ?self.state, "range filter toggled");
        ClickOutcome::Toggled(self.state)
    }

    /// Render the state onto the wrapper's class list. The collapsed class
    /// is captured at bind time so later clicks need no contract.
    fn project(&self, doc: &mut Document) {
        match self.state {
            CollapseState::Collapsed => doc.add_class(self.wrapper, &self.collapsed_class),
            CollapseState::Expanded => doc.remove_class(self.wrapper, &self.collapsed_class),
        }
    }
}

/// A group carrying the marker attribute, with its first heading-like
/// descendant as the toggle.
fn discover_marked(
    doc: &Document,
    contract: &MarkupContract,
    container: NodeId,
) -> Option<(NodeId, NodeId)> {
    let group = doc
        .descendants(container)
        .into_iter()
        .find(|id| doc.attr(*id, &contract.group_marker_attr).is_some())?;
    let heading = doc
        .descendants(group)
        .into_iter()
        .find(|id| heading_like(doc, contract, *id))?;
    Some((heading, group))
}

/// First heading-like element whose text contains one of the contract's
/// phrases.
fn discover_by_text(
    doc: &Document,
    contract: &MarkupContract,
    container: NodeId,
) -> Option<NodeId> {
    let found = doc.descendants(container).into_iter().find(|id| {
        if !heading_like(doc, contract, *id) {
            return false;
        }
        let text = doc.text_content(*id);
        let text = text.trim();
        contract.heading_phrases.iter().any(|p| text.contains(p.as_str()))
    });
    if found.is_none() {
        debug!("no collapsible range filter heading found");
    }
    found
}

fn heading_like(doc: &Document, contract: &MarkupContract, id: NodeId) -> bool {
    matches!(doc.tag(id), "h2" | "h3") || doc.class_contains(id, &contract.heading_class_fragment)
}

/// Nearest list-item ancestor, else nearest wrapper-classed ancestor, else
/// the heading's parent.
fn resolve_wrapper(doc: &Document, contract: &MarkupContract, heading: NodeId) -> Option<NodeId> {
    doc.closest(heading, |d, n| d.tag(n) == "li")
        .or_else(|| doc.closest(heading, |d, n| d.has_class(n, &contract.wrapper_class)))
        .or_else(|| doc.parent(heading))
}

/// The heading's next sibling, else the first wrapper descendant matching a
/// content fallback class, else the first `div` descendant. Never the
/// heading or anything inside it.
fn resolve_content(
    doc: &Document,
    contract: &MarkupContract,
    heading: NodeId,
    wrapper: NodeId,
) -> Option<NodeId> {
    if let Some(sibling) = doc.next_element_sibling(heading) {
        return Some(sibling);
    }
    let candidates: Vec<NodeId> = doc
        .descendants(wrapper)
        .into_iter()
        .filter(|id| !doc.contains(heading, *id))
        .collect();
    candidates
        .iter()
        .copied()
        .find(|id| {
            contract
                .content_fallback_classes
                .iter()
                .any(|c| doc.has_class(*id, c))
        })
        .or_else(|| candidates.iter().copied().find(|id| doc.tag(*id) == "div"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Element;

    fn contract() -> MarkupContract {
        MarkupContract::default()
    }

    struct Page {
        doc: Document,
        container: NodeId,
    }

    fn page() -> Page {
        let mut doc = Document::new();
        let container = doc.push_root(Element::new("div").with_id("changelist-filter"));
        Page { doc, container }
    }

    /// `<li><h3>Registration date</h3><div class="admindatefilter">…</div></li>`
    fn range_group(page: &mut Page, heading_text: &str) -> (NodeId, NodeId, NodeId) {
        let li = page.doc.append(page.container, Element::new("li"));
        let heading = page
            .doc
            .append(li, Element::new("h3").with_text(heading_text));
        let content = page
            .doc
            .append(li, Element::new("div").with_class("admindatefilter"));
        (li, heading, content)
    }

    #[test]
    fn bind_is_inert_without_a_matching_heading() {
        let mut page = page();
        let li = page.doc.append(page.container, Element::new("li"));
        let heading = page.doc.append(li, Element::new("h3").with_text("By status"));
        assert!(CollapsePanel::bind(&mut page.doc, &contract()).is_none());
        // nothing was touched
        assert!(page.doc.classes(li).is_empty());
        assert!(page.doc.classes(heading).is_empty());
    }

    #[test]
    fn bind_projects_the_initial_collapsed_state() {
        let mut page = page();
        let (li, heading, content) = range_group(&mut page, "Registration date");
        let panel = CollapsePanel::bind(&mut page.doc, &contract()).unwrap();
        assert_eq!(panel.state(), CollapseState::Collapsed);
        assert!(page.doc.has_class(li, "rangefilter-wrapper"));
        assert!(page.doc.has_class(li, "rangefilter-collapsed"));
        assert!(page.doc.has_class(heading, "rangefilter-toggle"));
        assert!(page.doc.has_class(content, "rangefilter-content"));
    }

    #[test]
    fn bind_matches_the_generic_range_keyword_too() {
        let mut page = page();
        range_group(&mut page, "Created (date range)");
        assert!(CollapsePanel::bind(&mut page.doc, &contract()).is_some());
    }

    #[test]
    fn bind_prefers_a_marked_group_over_an_earlier_text_match() {
        let mut page = page();
        // text-matching group first in document order
        range_group(&mut page, "Registration date");
        let marked = page.doc.append(
            page.container,
            Element::new("li").with_attr("data-filter-group", "created-range"),
        );
        let heading = page.doc.append(marked, Element::new("h3").with_text("Created"));
        page.doc
            .append(marked, Element::new("div").with_class("rf-datetime"));
        let panel = CollapsePanel::bind(&mut page.doc, &contract()).unwrap();
        assert_eq!(panel.heading(), heading);
        assert!(page.doc.has_class(marked, "rangefilter-collapsed"));
    }

    #[test]
    fn bind_without_content_is_inert() {
        let mut page = page();
        let li = page.doc.append(page.container, Element::new("li"));
        page.doc
            .append(li, Element::new("h3").with_text("Registration date"));
        assert!(CollapsePanel::bind(&mut page.doc, &contract()).is_none());
    }

    #[test]
    fn content_falls_back_to_a_wrapper_descendant() {
        let mut page = page();
        let li = page.doc.append(page.container, Element::new("li"));
        let inner = page.doc.append(li, Element::new("span"));
        page.doc
            .append(inner, Element::new("h3").with_text("Registration date"));
        let fields = page.doc.append(li, Element::new("div").with_class("rf-datetime"));
        let panel = CollapsePanel::bind(&mut page.doc, &contract()).unwrap();
        assert_eq!(panel.content(), fields);
    }

    #[test]
    fn click_toggles_and_a_second_click_restores_collapsed() {
        let mut page = page();
        let (li, heading, _) = range_group(&mut page, "Registration date");
        let before: Vec<String> = Vec::new();
        assert_eq!(page.doc.classes(li), &before[..]);
        let mut panel = CollapsePanel::bind(&mut page.doc, &contract()).unwrap();
        let bound_classes = page.doc.classes(li).to_vec();

        assert_eq!(
            panel.handle_click(&mut page.doc, heading),
            ClickOutcome::Toggled(CollapseState::Expanded)
        );
        assert!(!page.doc.has_class(li, "rangefilter-collapsed"));

        assert_eq!(
            panel.handle_click(&mut page.doc, heading),
            ClickOutcome::Toggled(CollapseState::Collapsed)
        );
        assert_eq!(page.doc.classes(li).to_vec(), bound_classes);
    }

    #[test]
    fn clicks_inside_the_heading_count_and_others_do_not() {
        let mut page = page();
        let (li, heading, content) = range_group(&mut page, "Registration date");
        let inner = page.doc.append(heading, Element::new("span").with_text("!"));
        let mut panel = CollapsePanel::bind(&mut page.doc, &contract()).unwrap();
        assert!(matches!(
            panel.handle_click(&mut page.doc, inner),
            ClickOutcome::Toggled(_)
        ));
        assert_eq!(panel.handle_click(&mut page.doc, content), ClickOutcome::Ignored);
        assert_eq!(panel.handle_click(&mut page.doc, li), ClickOutcome::Ignored);
    }

    #[test]
    fn toggling_never_touches_the_query() {
        // the API gives handle_click no way to navigate; assert the state
        // machine round-trips instead
        assert_eq!(CollapseState::Collapsed.toggled(), CollapseState::Expanded);
        assert_eq!(CollapseState::Expanded.toggled(), CollapseState::Collapsed);
    }
}
