//! Public site resolution and rendering.
//!
//! # Data Flow
//! ```text
//! Host + path
//!     → lookup.rs (tenant label → website → publish gate → page)
//!     → render.rs (page + navigation → HTML)
//! ```

pub mod lookup;
pub mod render;

pub use lookup::{locate, locate_page, Lookup};
