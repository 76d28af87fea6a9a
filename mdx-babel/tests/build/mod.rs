//! Whole-bundle builds on disk.

mod bundle;
