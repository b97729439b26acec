//! Project loading: module discovery and Kconfig tree setup.
//!
//! A build sees the main project root plus any number of module
//! directories. Each module may contribute a Kconfig fragment; the loader
//! stitches them into the tree through a generated `Kconfig.modules` file.

pub mod env;
pub mod loader;
pub mod module;
pub mod paths;


pub use env::EnvScope;
pub use loader::{LoadedTree, load};
pub use module::{KconfigFragment, ModuleDescriptor, discover_modules};
pub use paths::ModulePaths;
