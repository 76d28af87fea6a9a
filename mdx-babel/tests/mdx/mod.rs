//! Source tree → MDX text, end to end.

mod kitchensink;
mod markdown_structure;
