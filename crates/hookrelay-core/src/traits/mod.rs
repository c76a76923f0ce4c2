//! Service seams. Implementations live in `hookrelay-providers` and
//! `hookrelay-channels`; tests substitute in-memory fakes.

pub mod destination;
pub mod recommender;

pub use destination::Destination;
pub use recommender::RecommendationSource;
