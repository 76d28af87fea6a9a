//! Format implementations
//!
//! Output formats for translated documents, plus the companion HTML renderer used while
//! translating raw HTML.

pub mod html;
pub mod json;
pub mod mdx;

pub use html::{Html5everRenderer, HtmlToTree};
pub use json::JsonFormat;
pub use mdx::MdxFormat;
