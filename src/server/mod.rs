pub mod host;
pub mod routes;

pub use host::{serve, shutdown_signal, spawn};
pub use routes::create_router;
