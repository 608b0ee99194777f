pub mod config;
pub mod constants;
pub mod core;
pub mod error;
pub mod native;
pub mod paths;
pub mod problem;
pub mod runtime;
pub mod sinks;
pub mod state;

#[cfg(test)]
mod stubs;
