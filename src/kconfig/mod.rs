//! Kconfig tree provider.
//!
//! Reads a Kconfig tree the way the reference tooling does and exposes it
//! as an arena of menu nodes, symbols and choices:
//!
//! ```text
//! Kconfig files
//!     ↓
//! preprocess  → $(VAR) expansion, variable assignments
//!     ↓
//! lexer       → logos tokens, one logical line at a time
//!     ↓
//! parser      → MenuNode arena (config/choice/menu/comment/if/source)
//!     ↓
//! finalize    → propagated dependencies, implicit menus, reverse deps
//! ```
//!
//! Configuration reaches the parser only through an [`Environment`]:
//! `srctree` and every `$(NAME)` that is not a Kconfig variable.

mod error;
mod expr;
mod finalize;
mod lexer;
mod parser;
mod preprocess;
mod tree;


use std::collections::HashMap;
use std::hash::BuildHasher;
use std::path::Path;

pub use error::KconfigError;
pub use expr::{Connective, Expr, RelOp, ScRef, expr_str};
pub use lexer::{Token, tokenize};
pub use tree::{
    Choice, ChoiceId, Item, Kconfig, MenuNode, NodeId, Prompt, Symbol, SymbolId, SymbolType,
};

/// Source of environment variables for the parser.
pub trait Environment {
    fn var(&self, name: &str) -> Option<String>;
}

/// Reads the process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl Environment for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

impl<S: BuildHasher> Environment for HashMap<String, String, S> {
    fn var(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

impl Kconfig {
    /// Parse the tree rooted at `entry`, reading the process environment.
    pub fn load(entry: impl AsRef<Path>) -> Result<Self, KconfigError> {
        Self::load_with_env(entry, &ProcessEnv)
    }

    /// Parse the tree rooted at `entry` with an explicit environment.
    pub fn load_with_env(entry: impl AsRef<Path>, env: &dyn Environment) -> Result<Self, KconfigError> {
        parser::parse_file(entry.as_ref(), env)
    }

    /// Parse in-memory Kconfig text. `filename` is what nodes report as
    /// their source file.
    pub fn parse_str(filename: &str, text: &str, env: &dyn Environment) -> Result<Self, KconfigError> {
        parser::parse_source(filename, text, env)
    }
}
