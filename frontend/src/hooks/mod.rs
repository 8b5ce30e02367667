pub mod use_auth;
pub mod use_config;
pub mod use_expenses;
pub mod use_month;

pub use use_auth::{use_auth, AuthProvider};
pub use use_config::use_config;
pub use use_expenses::use_expenses;
pub use use_month::{use_month, MonthProvider};
