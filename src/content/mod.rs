//! Website content subsystem.
//!
//! # Data Flow
//! ```text
//! stored JSON (opaque)
//!     → document.rs (parse into Document::WellFormed / Malformed)
//!     → page locator + read-only projections (sort, children, navigation)
//!     → set_page_content / normalize_positions (in-place edits)
//!     → Document::to_value → stored JSON
//! ```
//!
//! # Design Decisions
//! - Malformed content is never an error, it simply has no pages
//! - Lookup is exact and case-sensitive; first match in document order wins
//! - Slug helpers are free functions, independent of any document

pub mod document;
pub mod slug;

pub use document::{Document, NavItem, Page, PageInput};
pub use slug::{normalize_request_path, param_to_slug, parent_slug, slug_to_param};
