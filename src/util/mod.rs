//! Utility functions shared by the extractor, fetcher and storage layers.
//!
//! - **URL validation**: shape checks for extracted URLs and the stricter
//!   import policy that rejects localhost/private addresses
//! - **Text processing**: control-character stripping and markdown cell cleanup

mod text;
mod url_validator;

pub use text::{plain_cell, strip_control_chars};
pub use url_validator::{parse_http_url, validate_url, UrlValidationError};
