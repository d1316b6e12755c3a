pub mod buffer;
pub mod line;
