pub mod dispatcher;

pub use dispatcher::CommandDispatcher;
