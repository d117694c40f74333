//! API endpoint handlers, one module per resource.

pub mod analyze;
pub mod health;
pub mod history;
pub mod predictions;
