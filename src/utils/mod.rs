//! Shared helpers for cell text and index base validation.

pub mod validation;
