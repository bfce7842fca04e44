
pub mod core;
pub mod app;
pub mod configs;
pub mod loggers;
pub mod markets;
pub mod pine;
pub mod retrieve;

pub use core::error::FngError;
