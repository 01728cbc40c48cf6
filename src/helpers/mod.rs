//! Shared helpers for HTML output and URL handling

mod html;
mod url;

pub use html::{html_escape, strip_html, truncate};
pub use url::encode_segment;
