//! Client handles for talking to actors.

#[macro_use]
mod macros;
mod purchase_client;

pub use purchase_client::PurchaseClient;
