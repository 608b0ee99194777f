/// Native module contains implementations of core traits
/// that talk to the host directly, without containers or sandboxes.
pub mod executor;
