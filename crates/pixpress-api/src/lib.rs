//! Pixpress API Library
//!
//! HTTP handlers, client IP resolution, and application setup for the image
//! compression service.

mod api_doc;
pub mod constants;
mod handlers;
mod services;
pub mod setup;
mod utils;

pub mod error;
pub mod state;

pub use error::{ErrorResponse, HttpAppError};
pub use state::AppState;
pub use utils::ip_extraction::{resolve_client_ip, ClientIp};
