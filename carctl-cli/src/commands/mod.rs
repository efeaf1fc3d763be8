//! Command implementations for carctl CLI

pub mod serve;

pub use serve::run_serve;
