//! Our subcommands.

pub mod detect;
pub mod models;
pub mod ocr;
