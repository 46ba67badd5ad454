//! Contacts web server: router, handlers, server-rendered views and
//! settings. The binary in `main.rs` wires these to a listener.

pub mod api;
pub mod app_state;
pub mod config;
mod views;

pub use api::build_router;
pub use app_state::AppState;
