//! The markup contract: every reserved name binding the controller to the
//! host's rendered filter sidebar.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Raised when a contract override block fails to parse.
#[derive(Debug, Error)]
pub enum ContractError {
    #[error("failed to parse markup contract: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Reserved ids, classes, attributes, and phrases the controller recognizes.
///
/// `Default` carries the production markup names. Hosts that render different
/// markup override individual fields, typically by embedding a
/// `[markup_contract]` table in their own config file; every field is
/// optional in the serialized form.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkupContract {
    /// Id of the element hosting all filter widgets.
    pub container_id: String,
    /// Marker class identifying a select as a filter widget.
    pub widget_class: String,
    /// Attribute on an option carrying its explicit parameter name.
    pub option_param_attr: String,
    /// Fallback attribute on the select itself, consulted when the selected
    /// option carries no usable name.
    pub widget_param_attr: String,
    /// Class of the wrapper whose named inputs are range widgets.
    pub range_wrapper_class: String,
    /// Query parameter carrying the free-text search, preserved across
    /// apply-all.
    pub search_param: String,
    /// Stable attribute marking the collapsible group; preferred over
    /// heading-text discovery.
    pub group_marker_attr: String,
    /// Heading text fragments identifying the collapsible group when no
    /// marked group exists; matched in order, first hit wins.
    pub heading_phrases: Vec<String>,
    /// Class fragment that qualifies a non-heading element as heading-like
    /// during text discovery.
    pub heading_class_fragment: String,
    /// Class applied to the group wrapper on bind.
    pub wrapper_class: String,
    /// Class encoding the collapsed state on the group wrapper.
    pub collapsed_class: String,
    /// Class applied to the collapsible content element.
    pub content_class: String,
    /// Class marking the heading as an interactive toggle.
    pub toggle_class: String,
    /// Classes tried, in order, to locate the content element when the
    /// heading has no next sibling.
    pub content_fallback_classes: Vec<String>,
}

impl Default for MarkupContract {
    fn default() -> Self {
        MarkupContract {
            container_id: "changelist-filter".to_string(),
            widget_class: "search-filter".to_string(),
            option_param_attr: "data-name".to_string(),
            widget_param_attr: "data-filter-param".to_string(),
            range_wrapper_class: "admindatefilter".to_string(),
            search_param: "q".to_string(),
            group_marker_attr: "data-filter-group".to_string(),
            heading_phrases: vec!["Registration date".to_string(), "range".to_string()],
            heading_class_fragment: "rangefilter".to_string(),
            wrapper_class: "rangefilter-wrapper".to_string(),
            collapsed_class: "rangefilter-collapsed".to_string(),
            content_class: "rangefilter-content".to_string(),
            toggle_class: "rangefilter-toggle".to_string(),
            content_fallback_classes: vec![
                "rangefilter-content".to_string(),
                "rf-datetime".to_string(),
                "admindatefilter".to_string(),
            ],
        }
    }
}

impl MarkupContract {
    /// Parse a contract from a TOML fragment. Absent fields keep their
    /// production defaults.
    pub fn from_toml_str(raw: &str) -> Result<Self, ContractError> {
        Ok(toml::from_str(raw)?)
    }
}
