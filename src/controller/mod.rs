//! The per-page controller. Constructed once per page load and handed to
//! whatever dispatches UI events; there is no ambient global to look up.

use tracing::info;

use crate::collapse::{ClickOutcome, CollapsePanel, CollapseState};
use crate::contract::MarkupContract;
use crate::dom::{Document, NodeId};
use crate::query::Location;
use crate::sync::{self, Navigation};

/// Controller for one list-view page's filter sidebar.
#[derive(Debug)]
pub struct FilterController {
    contract: MarkupContract,
    panel: Option<CollapsePanel>,
}

impl FilterController {
    /// Construct the controller for a freshly rendered page, binding the
    /// collapsible range-filter group if the markup carries one.
    pub fn mount(doc: &mut Document, contract: MarkupContract) -> Self {
        let panel = CollapsePanel::bind(doc, &contract);
        info!(
            container = %contract.container_id,
            collapsible = panel.is_some(),
            "filter controller mounted"
        );
        FilterController { contract, panel }
    }

    /// The markup contract this controller was mounted with.
    pub fn contract(&self) -> &MarkupContract {
        &self.contract
    }

    /// Change event on any element: auto-submit when the target is a filter
    /// widget. `None` means the event was not ours.
    pub fn on_change(
        &self,
        doc: &Document,
        target: NodeId,
        current: &Location,
    ) -> Option<Navigation> {
        sync::widget_changed(doc, &self.contract, target, current)
    }

    /// The manual submit button: rebuild the query from every visible widget.
    pub fn apply_all(&self, doc: &Document, current: &Location) -> Navigation {
        sync::apply_all(doc, &self.contract, current)
    }

    /// Click event on any element: toggles the bound collapse panel when the
    /// click lands on its heading. A `Toggled` outcome means the host must
    /// suppress the click's default action.
    pub fn on_click(&mut self, doc: &mut Document, target: NodeId) -> ClickOutcome {
        match self.panel.as_mut() {
            Some(panel) => panel.handle_click(doc, target),
            None => ClickOutcome::Ignored,
        }
    }

    /// Before a native sub-form submission: copy the active query into the
    /// form as hidden inputs so unrelated filters survive. Returns the
    /// number of inputs added.
    pub fn before_submit(&self, doc: &mut Document, form: NodeId, current: &Location) -> usize {
        sync::preserve_query_params(doc, form, current)
    }

    /// State of the bound collapse panel, if one was found at mount.
    pub fn collapse_state(&self) -> Option<CollapseState> {
        self.panel.as_ref().map(CollapsePanel::state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Element;

    #[test]
    fn mount_on_a_page_without_filters_degrades_everywhere() -> anyhow::Result<()> {
        let mut doc = Document::new();
        let stray = doc.push_root(Element::new("div"));
        let mut controller = FilterController::mount(&mut doc, MarkupContract::default());
        let current = Location::parse("/admin/core/user/?status=active")?;

        assert!(controller.collapse_state().is_none());
        assert!(controller.on_change(&doc, stray, &current).is_none());
        assert_eq!(controller.apply_all(&doc, &current), Navigation::Reload);
        assert_eq!(controller.on_click(&mut doc, stray), ClickOutcome::Ignored);
        Ok(())
    }
}
