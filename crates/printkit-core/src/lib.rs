//! # printkit-core
//!
//! Safe Rust implementation of the `printf` formatting family.
//!
//! The engine converts a format template plus a typed argument list into
//! bytes, honoring flags, width, precision and numeric base, and writes into
//! bounded buffers with `snprintf`-style truncation accounting. No `unsafe`
//! code is permitted at the crate level.

#![deny(unsafe_code)]

pub mod config;
mod macros;
pub mod stdio;

pub use stdio::{Arg, ConvertError, FormatError};
