//! Gateway: liveness HTTP responder and Discord session wiring.
//!
//! The HTTP side answers GET / with "ok" for hosting-platform health checks and is
//! independent of the Discord session.

mod server;

pub use server::{health_router, run_gateway, serve_health, HEALTH_BODY};
