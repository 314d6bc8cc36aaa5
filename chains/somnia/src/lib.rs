pub mod bot;
pub mod client;
pub mod config;
pub mod contracts;
pub mod faucet;
pub mod task;
pub mod utils;
