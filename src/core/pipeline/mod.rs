pub mod running;
