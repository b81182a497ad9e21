pub mod settle;
pub mod slide_outline;
pub mod status_watch;

pub use settle::{Settled, settle_all};
pub use slide_outline::{Slide, SlideDeck};
pub use status_watch::{StatusTick, watch_case_study};
