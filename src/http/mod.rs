//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, layers, listeners)
//!     → request.rs (request ID, request span)
//!     → public.rs (Host header → website → page → HTML)
//!     → response.rs (AppError → status + JSON body)
//!     → Send to client
//! ```

pub mod public;
pub mod request;
pub mod response;
pub mod server;

pub use request::X_REQUEST_ID;
pub use server::{AppState, HttpServer};
