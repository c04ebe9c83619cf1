//! Input processors built on the core translator

pub mod file;
