//! Route prefixes and embedded assets

/// Prefix of every photo endpoint
pub const API_PREFIX: &str = "/photo";

pub const OPENAPI_PATH: &str = "/photo/openapi.json";

pub const DOCS_PATH: &str = "/docs";

/// Upload page, served at `/` and `/photo/`
pub const INDEX_HTML: &str = include_str!("../assets/index.html");
