//! Multi-tenant website host library.

pub mod admin;
pub mod config;
pub mod content;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;
pub mod site;
pub mod website;

pub use config::schema::SiteConfig;
pub use error::{AppError, Result};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use website::WebsiteStore;
