//! Extraction of Kconfig symbols and choices into database records.
//!
//! Walks every defined symbol, then every choice, and produces one
//! [`ExtractedRecord`] per declaration node that has a prompt or help text.
//! All expressions are rendered through [`format::ExprFormatter`], so
//! references to declared symbols become `#CONFIG_<NAME>` links.
//!
//! # Module structure
//!
//! - [`record`]: Serialized record types
//! - [`format`]: Symbol and expression rendering
//! - [`extract`]: The extraction pass

mod extract;
pub mod format;
mod record;


pub use extract::extract;
pub use format::ExprFormatter;
pub use record::{AltDefault, ExtractedRecord};
