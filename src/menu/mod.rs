//! Menu resource service and its HTTP handlers

pub mod handlers;
pub mod service;

pub use handlers::AppState;
pub use service::{MenuCreated, MenuResourceService};
