#![forbid(unsafe_code)]

pub mod model;
pub mod stats;
pub mod time;
pub mod timer;

pub use time::Clock;
