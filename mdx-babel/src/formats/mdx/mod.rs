//! MDX format implementation
//!
//! Serializes translated documents to MDX: CommonMark block and inline syntax (with GFM
//! tables and strikethrough) mixed with JSX component elements.
//!
//! # Node Mapping Table
//!
//! | Target node     | MDX                                              | Notes                                        |
//! |-----------------|--------------------------------------------------|----------------------------------------------|
//! | Heading         | `## text`                                        | depth 1-6                                    |
//! | Paragraph       | inline text                                      | blocks separated by a blank line             |
//! | Emphasis        | `_x_`, nested `*x*`                              | markers alternate with nesting               |
//! | Strong          | `**x**`, nested `__x__`                          | markers alternate with nesting               |
//! | Strikethrough   | `~~x~~`                                          |                                              |
//! | InlineCode      | `` `x` ``                                        | fence grows past backticks in the content    |
//! | CodeBlock       | fenced block                                     | fence grows past backticks in the content    |
//! | List            | `-`/`+`/`*`, `1.`/`1)`                           | spread lists separate items by a blank line  |
//! | Table           | pipe table, or `<table>` markup                  | markup for spans, widths, captions, blocks   |
//! | Link, Image     | `[x](url "title")`, `![alt](url)`                |                                              |
//! | Blockquote      | `> x`                                            |                                              |
//! | ThematicBreak   | `---`                                            |                                              |
//! | Element         | `<Name attr="v">…</Name>`                        | flow elements indent their children          |
//! | Expression      | `{value}`                                        | also used for multi-line text                |
//! | front matter    | `---` YAML `---`                                 |                                              |
//!
//! # Escaping
//!
//! Text escapes every character with meaning in Markdown inlines or JSX (`` *_`~[](){}<>\ ``,
//! and `|` inside pipe-table cells). Text spanning several lines cannot be escaped reliably
//! and is emitted as a JSON string expression instead.

pub mod serializer;

use crate::error::FormatError;
use crate::format::Format;
use crate::ir::nodes::Document;

pub use serializer::{render_nodes, serialize_to_mdx};

/// Format implementation for MDX
pub struct MdxFormat;

impl Format for MdxFormat {
    fn name(&self) -> &str {
        "mdx"
    }

    fn description(&self) -> &str {
        "MDX (Markdown with JSX components)"
    }

    fn file_extensions(&self) -> &[&str] {
        &["mdx", "md"]
    }

    fn serialize(&self, doc: &Document) -> Result<String, FormatError> {
        serializer::serialize_to_mdx(doc)
    }
}
