//! # boardselector
//!
//! Board selector for documentation builds: loads a Kconfig tree, flattens
//! its symbols and choices into a JSON database and emits the search widget
//! that browses it.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! build     → Build hook: config toggle, load, extract, publish
//!   ↓
//! database  → JSON database and published assets
//! widget    → Search widget markup, page directive detection
//! domain    → Option cross-reference index
//!   ↓
//! extract   → Symbols/choices → records, HTML expression rendering
//!   ↓
//! project   → Module discovery, environment setup, tree loading
//!   ↓
//! kconfig   → Logos lexer, preprocessor, parser, tree finalization
//! ```

// ============================================================================
// MODULES (dependency order: kconfig → project → extract → database → build)
// ============================================================================

/// Kconfig tree provider: lexer, preprocessor, parser, finalization
pub mod kconfig;

/// Project loading: module descriptors, scoped environment, tree loading
pub mod project;

/// Extraction of symbols and choices into database records
pub mod extract;

/// JSON database writer
pub mod database;

/// Search widget
pub mod widget;

/// Option cross-reference index
pub mod domain;

/// Build configuration
pub mod config;

/// Build hooks
pub mod build;

mod error;

pub use build::{BuildOutcome, on_builder_inited};
pub use config::Config;
pub use database::{Database, Publication};
pub use error::{Error, Result};
pub use extract::{ExtractedRecord, extract};
pub use kconfig::{Kconfig, KconfigError};
pub use project::{LoadedTree, ModuleDescriptor, ModulePaths};
pub use widget::OutputFormat;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
