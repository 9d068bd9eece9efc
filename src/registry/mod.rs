//! Widget registry: discovery of filter controls inside the designated
//! container. Nothing here caches across events.

use tracing::debug;

use crate::contract::MarkupContract;
use crate::dom::{Document, NodeId};

/// A parameter name/value pair resolved from one widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedParam {
    pub name: String,
    pub value: String,
}

/// A select carrying the widget marker class.
#[derive(Debug, Clone, Copy)]
pub struct FilterWidget {
    pub select: NodeId,
}

impl FilterWidget {
    /// Interpret an event target as a filter widget, if it is one.
    pub fn from_target(doc: &Document, contract: &MarkupContract, target: NodeId) -> Option<Self> {
        if doc.tag(target) == "select" && doc.has_class(target, &contract.widget_class) {
            Some(FilterWidget { select: target })
        } else {
            None
        }
    }

    /// Resolve the widget's (name, value).
    ///
    /// Name comes from the selected option's param-name attribute; when that
    /// is absent *or empty* the widget-level fallback attribute is consulted
    /// (an "all/any" option typically carries no name of its own). Yields
    /// nothing when both are empty, since the widget is unidentifiable. The value
    /// may legitimately be empty, which callers treat as "clear this filter".
    pub fn resolve(&self, doc: &Document, contract: &MarkupContract) -> Option<ResolvedParam> {
        let option = doc.selected_option(self.select);
        let option_name = option
            .and_then(|o| doc.attr(o, &contract.option_param_attr))
            .unwrap_or("");
        let name = if option_name.is_empty() {
            doc.attr(self.select, &contract.widget_param_attr)
                .unwrap_or("")
        } else {
            option_name
        };
        if name.is_empty() {
            debug!("filter select has no resolvable parameter name, skipping");
            return None;
        }
        let value = option
            .and_then(|o| doc.attr(o, "value"))
            .unwrap_or("")
            .to_string();
        Some(ResolvedParam {
            name: name.to_string(),
            value,
        })
    }
}

/// A named primitive input inside the range-filter wrapper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeInput {
    pub name: String,
    pub value: String,
}

/// The located filter container and the collections derived from it.
#[derive(Debug, Clone, Copy)]
pub struct FilterRegistry {
    container: NodeId,
}

impl FilterRegistry {
    /// Locate the filter container. `None` when the page carries no filter
    /// sidebar; callers degrade per their own policy.
    pub fn discover(doc: &Document, contract: &MarkupContract) -> Option<Self> {
        match doc.by_id(&contract.container_id) {
            Some(container) => Some(FilterRegistry { container }),
            None => {
                debug!(container = %contract.container_id, "filter container not found");
                None
            }
        }
    }

    /// The container element.
    pub fn container(&self) -> NodeId {
        self.container
    }

    /// True when `id` lives inside the container (or is the container).
    pub fn contains(&self, doc: &Document, id: NodeId) -> bool {
        doc.contains(self.container, id)
    }

    /// All filter widgets in the container, in document order.
    pub fn filter_widgets(&self, doc: &Document, contract: &MarkupContract) -> Vec<FilterWidget> {
        doc.descendants(self.container)
            .into_iter()
            .filter_map(|id| FilterWidget::from_target(doc, contract, id))
            .collect()
    }

    /// All named inputs inside a range-wrapper-classed element, in document
    /// order. Name and parameter are always identical for these.
    pub fn range_inputs(&self, doc: &Document, contract: &MarkupContract) -> Vec<RangeInput> {
        doc.descendants(self.container)
            .into_iter()
            .filter(|id| doc.tag(*id) == "input")
            .filter(|id| {
                doc.closest(*id, |d, n| d.has_class(n, &contract.range_wrapper_class))
                    .is_some()
            })
            .filter_map(|id| {
                let name = doc.attr(id, "name")?;
                if name.is_empty() {
                    return None;
                }
                Some(RangeInput {
                    name: name.to_string(),
                    value: doc.attr(id, "value").unwrap_or("").to_string(),
                })
            })
            .collect()
    }
}
