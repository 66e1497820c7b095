//! Web server module
//!
//! Serves the search box as a local page plus a small JSON API.

mod handlers;
mod routes;
mod state;
mod templates;

pub use routes::create_router;
pub use state::AppState;
pub use templates::Templates;
