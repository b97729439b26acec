//! End-to-end tests
//!
//! Project trees on disk through loading, extraction and publishing:
//! - Module fragments and the generated Kconfig.modules
//! - Environment restoration
//! - Database contents and build toggles

mod tests_build;
mod tests_loader;
