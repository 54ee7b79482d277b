pub mod actions;
pub mod amount;
pub mod broadcast;
pub mod config;
pub mod context;
pub mod lifecycle;
pub mod registry;
pub mod vesting;
