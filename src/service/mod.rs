//! Persistence operations per entity. Every write runs in its own transaction.

mod customers;
mod items;
mod merchants;
pub mod validation;

pub use customers::CustomerService;
pub use items::ItemService;
pub use merchants::MerchantService;
pub use validation::Validate;
