//! sd-gateway — library crate for the HTTP front of the deflection service.
//!
//! Re-exports all modules so the binary (`main.rs`) and external crates
//! (e.g. `sd-e2e-tests`) can access `AppState`, `build_router`, and the
//! gateway configuration.

pub mod config;
pub mod error;
pub mod listen;
pub mod routes;
pub mod state;

pub use config::GatewayConfig;
pub use error::{ApiError, ApiResult};
pub use routes::build_router;
pub use state::AppState;
