//! # HookRelay Gateway
//! HTTP surface: the inbound webhook endpoint plus health and info routes.

pub mod response;
pub mod routes;
pub mod server;

pub use server::{AppState, build_router, start_server};
