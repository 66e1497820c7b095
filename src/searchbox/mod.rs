//! Search box view-model
//!
//! Holds the query, the selected engine and the dropdown list, and wires
//! typed input, the shared query stream and search page requests to the
//! engine drivers.

mod component;
mod debounce;
mod navigation;
mod state;

pub use component::{SearchBox, SearchBoxOptions};
pub use debounce::Debouncer;
pub use navigation::{
    BrowsingContext, BrowsingContextOpener, DetachedBrowser, SearchPages, SystemBrowser,
};
pub use state::{DisplayMode, ViewSnapshot, ViewState};
