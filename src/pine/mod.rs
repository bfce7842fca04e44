//! Pine Script indicator generation for the Fear & Greed series.

pub mod renderer;

pub use renderer::{render, render_local, TEMPLATE};
