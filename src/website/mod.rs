//! Website subsystem.
//!
//! # Data Flow
//! ```text
//! editor input (WebsiteInput)
//!     → domain.rs (format validation, slug base)
//!     → store.rs (ownership, uniqueness, slug dedup)
//!     → DashMap + JSON file
//! ```
//!
//! # Design Decisions
//! - One website per account
//! - Slugs follow the domain name and are re-derived when it changes
//! - Every successful mutation rewrites the persistence file

pub mod domain;
pub mod model;
pub mod store;

pub use model::{AccountId, Website, WebsiteInput};
pub use store::WebsiteStore;
