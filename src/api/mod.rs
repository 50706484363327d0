pub mod handlers;
pub mod middleware;
pub mod overlays;
pub mod routes;
pub mod types;
