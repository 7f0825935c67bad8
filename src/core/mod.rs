//! Services and the store interfaces they read from.

pub mod services;
pub mod stores;

pub use stores::{CategoryStore, InMemoryStore, TransactionStore};
