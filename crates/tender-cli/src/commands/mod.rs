//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Shared utilities (sentinel loading, JSON output)
//! - `merge` - Merge and parse commands
//! - `sentinels` - Sentinel pattern inspection
//! - `templates` - Template catalogue and request building

pub mod core;
pub mod merge;
pub mod sentinels;
pub mod templates;

// Re-export command functions for main.rs
pub use self::core::*;
pub use merge::*;
pub use sentinels::*;
pub use templates::*;
