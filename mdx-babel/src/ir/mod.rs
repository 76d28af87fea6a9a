//! Target markup tree.
//!
//! This module defines the tree the translator builds for every source document and the
//! serializers consume. See [`nodes`] for the variants.

pub mod nodes;
