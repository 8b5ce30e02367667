//! Client-side data synchronization between the UI and the remote API.
//!
//! The cache holds server-derived data under typed keys; the stores layer
//! the fetch and optimistic-create flows on top of it. Everything here is
//! single-threaded and event-loop driven; the only suspension points are
//! the network calls themselves.

pub mod cache;
pub mod client;
pub mod config;
pub mod expenses;

pub use cache::{QueryCache, Subscription};
pub use client::{ConfigClient, ExpensesClient};
pub use config::ConfigStore;
pub use expenses::ExpenseStore;
