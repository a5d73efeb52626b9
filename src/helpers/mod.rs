//! Helper functions for rendering
//!
//! Small formatting and URL utilities shared by the portable text renderer,
//! the post view and the templates.

mod date;
mod html;
mod url;

pub use date::*;
pub use html::*;
pub use url::*;
