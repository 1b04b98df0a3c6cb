pub mod config;
pub mod execution;
