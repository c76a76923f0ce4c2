//! Wire types shared across the relay.

pub mod event;
pub mod payload;
pub mod response;

pub use event::{InboundEvent, Properties, PropertyValue};
pub use payload::{OutboundPayload, Recommendation, SendOptions};
pub use response::StatusBody;
