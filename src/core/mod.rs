//! Core translation engine module

pub mod chunker;
pub mod client;
pub mod config;
pub mod dispatcher;
pub mod errors;
pub mod models;
pub mod prompt;
pub mod tokenizer;
pub mod translator;
