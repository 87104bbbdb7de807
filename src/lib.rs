pub mod core {
	pub mod controller;
	pub mod network;
	pub mod state;
}

pub mod cli;
pub mod client;
pub mod config;
pub mod engine;
pub mod error;
pub mod protocol;
pub mod server;

// Re-export for convenience
pub use crate::core::controller::PingController;
pub use crate::error::GameError;
