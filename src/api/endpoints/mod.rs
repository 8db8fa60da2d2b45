//! API endpoint handlers, one module per resource.

pub mod alerts;
pub mod health;
pub mod readings;
pub mod templates;
