//! HTTP handlers, one module per resource.

pub mod customers;
pub mod items;
pub mod merchants;
pub use customers::*;
pub use items::*;
pub use merchants::*;
