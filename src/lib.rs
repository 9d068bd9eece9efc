//! listfilter — changelist filter controller for list-view admin pages.
//!
//! Synchronizes the visible state of a set of independent filter widgets
//! with the page's query string, and manages the collapse/expand state of
//! one designated filter group. The host owns the real markup and the
//! navigation; this crate owns the decisions.

pub mod collapse;
pub mod contract;
pub mod controller;
pub mod dom;
pub mod query;
pub mod registry;
pub mod sync;

pub use collapse::{ClickOutcome, CollapsePanel, CollapseState};
pub use contract::{ContractError, MarkupContract};
pub use controller::FilterController;
pub use dom::{Document, Element, NodeId};
pub use query::{Location, LocationError, QueryState};
pub use sync::Navigation;
