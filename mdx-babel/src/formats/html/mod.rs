//! Companion HTML renderer
//!
//! Raw HTML embedded in a source tree (`raw` nodes with `format=html`) cannot be emitted as-is:
//! MDX only accepts JSX, which differs from HTML in attribute names, style syntax and
//! strictness. Raw fragments are therefore parsed into target nodes through [`HtmlToTree`] and
//! emitted like any other component element.
//!
//! # Library Choice
//!
//! We use the `html5ever` + `markup5ever_rcdom` pair for parsing:
//! - `html5ever`: Browser-grade HTML5 tokenizer and tree builder from the Servo project
//! - `markup5ever_rcdom`: Reference-counted DOM the tree builder writes into
//!
//! The parser recovers from any input, so the renderer treats every parse error it reports
//! as malformed input instead of trusting the recovered tree.
//!
//! # Element Mapping Table
//!
//! | HTML                         | Target node                                  |
//! |------------------------------|----------------------------------------------|
//! | block-level element          | flow [`Element`](crate::ir::nodes::Element)  |
//! | any other element            | text [`Element`](crate::ir::nodes::Element)  |
//! | `class`, `for`               | `className`, `htmlFor`                       |
//! | `tabindex`, `colspan`, ...   | camel-cased React attribute names            |
//! | `style="font-size: 1em"`     | `style={{"fontSize":"1em"}}`                 |
//! | empty boolean attribute      | bare attribute (`true`)                      |
//! | text                         | `Text` (formatting whitespace dropped)       |
//! | comment                      | dropped                                      |

mod parser;

pub use parser::Html5everRenderer;

use crate::error::RenderError;
use crate::ir::nodes::Node;

/// Converts HTML fragments into target nodes.
///
/// Implementations are shared by every document of a build, hence `Send + Sync`.
pub trait HtmlToTree: Send + Sync {
    /// Checks that the renderer can serve requests. Called once per build.
    fn probe(&self) -> Result<(), RenderError>;

    /// Parses `html` as body content and returns its top-level nodes.
    fn html_to_tree(&self, html: &str) -> Result<Vec<Node>, RenderError>;
}
