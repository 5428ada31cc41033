//! # Outpass HTTP Server
//!
//! # Endpoints
//!
//! - `GET /` - Submission form
//! - `POST /submit_form` - Submit a request, redirect to `/status`
//! - `GET /status` - All requests with index and status
//! - `GET /approve/:index`, `GET /reject/:index` - Warden action links
//! - `GET /health` - Health check

pub mod pages;
pub mod routes;
pub mod server;

pub use routes::outpass_routes;
pub use server::{HttpServer, HttpServerConfig};
