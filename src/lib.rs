pub mod api;
pub mod broadcast;
pub mod config;
pub mod error;
pub mod events;
pub mod models;
pub mod scheduler;
pub mod server;
pub mod state;
pub mod store;
pub mod utils;
pub mod websocket;

pub use api::types::{ApiResponse, ApiResult, IntoApiResult};
pub use server::{Server, build_router};
