//! alternative.me Fear & Greed Index: API adapter and series model.

pub mod apicall;
pub mod fearandgreed;

pub use fearandgreed::{FearAndGreed, FetchedSeries, IndexSample, IndexSeries};
