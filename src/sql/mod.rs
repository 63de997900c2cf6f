//! SQL helpers: identifiers are compile-time constants, values are always bound parameters.

mod builder;
pub use builder::*;
