//! Request extractors.

mod authorized;
pub use authorized::Authorized;
