//! Query synchronizer: translates widget state into navigation decisions.
//!
//! Two directions: a single widget change navigates immediately from the
//! current query, while apply-all rebuilds the query from scratch out of
//! every visible widget. Both end the page: a returned [`Navigation`] is the
//! terminal action of its handler.

use tracing::debug;

use crate::contract::MarkupContract;
use crate::dom::{Document, Element, NodeId};
use crate::query::{Location, QueryState};
use crate::registry::{FilterRegistry, FilterWidget};

/// What the host should do next.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub enum Navigation {
    /// Full navigation to the location (the server re-renders the list and
    /// the sidebar reflects server-confirmed widget state).
    Navigate(Location),
    /// Unconditional full reload of the current page.
    Reload,
}

/// Handle a change event on a filter widget.
///
/// Starts from the current query unmodified: a non-empty value writes the
/// resolved parameter, an empty value deletes it (selecting "all/any" clears
/// the filter rather than writing an empty key). `None` when the target is
/// not a filter widget inside the container, or when no parameter name can
/// be resolved; the host does nothing and waits for the next event.
pub fn widget_changed(
    doc: &Document,
    contract: &MarkupContract,
    target: NodeId,
    current: &Location,
) -> Option<Navigation> {
    let registry = FilterRegistry::discover(doc, contract)?;
    if !registry.contains(doc, target) {
        debug!("change target is outside the filter container, ignoring");
        return None;
    }
    let widget = FilterWidget::from_target(doc, contract, target)?;
    let resolved = widget.resolve(doc, contract)?;

    let mut query = current.query.clone();
    if resolved.value.is_empty() {
        query.delete(&resolved.name);
    } else {
        query.set(&resolved.name, resolved.value);
    }
    let next = Location::new(current.path.clone(), query);
    debug!(href = %next.href(), "filter change");
    Some(Navigation::Navigate(next))
}

/// Rebuild the query from every visible widget and navigate.
///
/// Builds fresh state rather than patching the current URL: only the
/// free-text search parameter is carried forward, every filter widget that
/// resolves to a non-empty (name, value) contributes, and every named range
/// input with a value contributes. Widgets with no selection are simply
/// omitted, there is nothing to delete in state built from scratch.
/// Degrades to [`Navigation::Reload`] when the container is missing, so the
/// action always does something visible.
pub fn apply_all(doc: &Document, contract: &MarkupContract, current: &Location) -> Navigation {
    let Some(registry) = FilterRegistry::discover(doc, contract) else {
        debug!("no filter container, falling back to reload");
        return Navigation::Reload;
    };

    let mut query = QueryState::new();
    if let Some(q) = current.query.get(&contract.search_param) {
        if !q.is_empty() {
            query.set(&contract.search_param, q);
        }
    }

    for widget in registry.filter_widgets(doc, contract) {
        if let Some(resolved) = widget.resolve(doc, contract) {
            if !resolved.value.is_empty() {
                query.set(&resolved.name, resolved.value);
            }
        }
    }

    for input in registry.range_inputs(doc, contract) {
        if !input.value.is_empty() {
            query.set(&input.name, input.value);
        }
    }

    let next = Location::new(current.path.clone(), query);
    debug!(href = %next.href(), "apply-all");
    Navigation::Navigate(next)
}

/// Inject the current query into a sub-form as hidden inputs, so submitting
/// it does not silently drop unrelated active filters.
///
/// Every query pair whose key is not among the form's own control names and
/// whose value is non-empty becomes an `<input type="hidden">` appended to
/// the form; repeated keys inject one input per value, in order. Runs
/// synchronously before the host lets the submission proceed. Returns the
/// number of inputs added.
pub fn preserve_query_params(
    doc: &mut Document,
    form: NodeId,
    current: &Location,
) -> usize {
    let own_names: Vec<String> = doc
        .descendants(form)
        .into_iter()
        .filter_map(|id| doc.attr(id, "name").map(str::to_string))
        .collect();

    let preserved: Vec<(String, String)> = current
        .query
        .iter()
        .filter(|(k, v)| !v.is_empty() && !own_names.iter().any(|n| n == k))
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

    let count = preserved.len();
    for (name, value) in preserved {
        doc.append(
            form,
            Element::new("input")
                .with_attr("type", "hidden")
                .with_attr("name", name)
                .with_attr("value", value),
        );
    }
    if count > 0 {
        debug!(count, "preserved query parameters into sub-form");
    }
    count
}
