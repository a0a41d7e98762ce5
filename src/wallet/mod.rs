//! Wallet and balance entities

pub mod models;
pub mod repository;

pub use models::{BalanceSnapshot, Wallet, WalletBalance, WalletId};
pub use repository::WalletRepository;
