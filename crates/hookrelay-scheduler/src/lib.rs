//! # HookRelay Scheduler
//!
//! Picks the hour of day at which a user has historically engaged the most
//! and turns it into the next future delivery moment.
//!
//! ```text
//! properties.hourly = {"9": 5, "14": 12}     now = 10:00 UTC
//!   └── best hour 14 → today 14:00:00Z
//! properties.hourly = {"9": 12, "14": 5}     now = 10:00 UTC
//!   └── best hour 9 (already past) → tomorrow 09:00:00Z
//! ```

pub mod clock;
pub mod optimal;

pub use clock::{Clock, FixedClock, SystemClock};
pub use optimal::{best_hour, compute_send_time, format_start_time, send_time};
