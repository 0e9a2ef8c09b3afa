//! Dispatch progress display

pub mod reporter;
