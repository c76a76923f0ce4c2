//! # HookRelay Pipeline
//! decode → filter → recommend → schedule → build → dispatch.

pub mod filter;
pub mod payload;
pub mod relay;

pub use filter::{FilterDecision, RejectReason, accepts};
pub use payload::build_payload;
pub use relay::{Outcome, Relay};
