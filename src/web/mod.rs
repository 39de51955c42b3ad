//! Browser UI: embedded pages plus the HTTP bridge onto the tool handler.

pub mod server;
pub mod templates;

pub use server::start_server;
