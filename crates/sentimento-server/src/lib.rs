//! Sentimento Server
//!
//! HTTP and command-line host for the inference router.

pub mod cli;
pub mod config;
pub mod routes;
pub mod state;

pub use cli::{Cli, Commands};
pub use config::{CorsConfig, ServerConfig};
pub use routes::{create_router, AppError};
pub use state::AppState;
