//! HTTP 接口层

pub mod dto;
pub mod errors;
pub mod handlers;
pub mod router;

pub use errors::{ApiError, ErrorEnvelope};
pub use router::{AppState, build_router};
