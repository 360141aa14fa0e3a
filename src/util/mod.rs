//! Small helpers shared by the store and the terminal front end.
//!
//! - **Text**: control-character stripping for user input, and Unicode-aware
//!   width and truncation for rendering.
//! - **URLs**: scheme checks before anything is opened in a browser.

mod text;
mod url_validator;

pub use text::{display_width, strip_control_chars, truncate_to_width};
pub use url_validator::{validate_url_for_open, UrlValidationError};

/// Maximum length accepted by the filter and web-search inputs.
pub const MAX_QUERY_LENGTH: usize = 256;

/// Maximum length accepted by any dialog field.
pub const MAX_FIELD_LENGTH: usize = 2048;
