pub mod runner;

pub use runner::{LoopExit, PingLoop};
