//! HTTP adapters - the REST surface of the service.

pub mod error;
pub mod middleware;
pub mod profile;
mod router;
mod state;
pub mod subscription;

pub use router::{api_router, with_http_layers};
pub use state::AppState;
