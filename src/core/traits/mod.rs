pub mod executor;
pub mod runtime;
pub mod sink;
