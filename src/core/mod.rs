pub mod compare;
pub mod domain;
pub mod pipeline;
pub mod summary;
pub mod traits;
