//! Crate-level test modules.

pub(crate) mod support;
