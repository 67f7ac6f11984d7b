pub mod buffer;
pub mod peak;
