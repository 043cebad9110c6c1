//! Profile HTTP module.

pub mod dto;
pub mod handlers;
mod routes;

pub use routes::profile_routes;
