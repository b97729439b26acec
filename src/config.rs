//! Build configuration.
//!
//! Settings come from an optional `boardselector.toml` in the project root;
//! the CLI overrides individual fields. Every field has a default, so an
//! empty file (or none at all) is a valid configuration.
//!
//! ```toml
//! generate_db = true
//! ext_paths = ["/opt/modules"]
//! module_dirs = ["../modules/hal/nordic"]
//! output_dir = "_build/html"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Conventional configuration file name.
pub const CONFIG_FILE: &str = "boardselector.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Build the board database. Off by default: pages that only reference
    /// options do not need it.
    pub generate_db: bool,
    /// Search roots for external module fragments
    /// (`<root>/modules/<name>/Kconfig`).
    pub ext_paths: Vec<PathBuf>,
    /// Directory holding the top-level `Kconfig`.
    pub project_root: PathBuf,
    /// Candidate module directories, in priority order.
    pub module_dirs: Vec<PathBuf>,
    /// Documentation output directory.
    pub output_dir: PathBuf,
    /// Widget stylesheet and script directory.
    pub static_dir: PathBuf,
    /// Page hosting the search widget; options resolve to anchors on it.
    pub search_docname: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            generate_db: false,
            ext_paths: Vec::new(),
            project_root: PathBuf::from("."),
            module_dirs: Vec::new(),
            output_dir: PathBuf::from("_build/html"),
            static_dir: PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("static"),
            search_docname: "boards/index".to_string(),
        }
    }
}

impl Config {
    pub fn from_toml_str(text: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Read a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Self::from_toml_str(&text).map_err(|e| Error::config(path, e.to_string()))
    }

    /// `dir/boardselector.toml` if present, otherwise the defaults rooted at
    /// `dir`.
    pub fn discover(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILE);
        if path.is_file() {
            tracing::debug!("reading {}", path.display());
            let mut config = Self::load(&path)?;
            config.resolve_relative_to(dir);
            Ok(config)
        } else {
            Ok(Self {
                project_root: dir.to_path_buf(),
                ..Self::default()
            })
        }
    }

    /// Make relative paths relative to `base` instead of the working
    /// directory.
    pub fn resolve_relative_to(&mut self, base: &Path) {
        let rebase = |path: &mut PathBuf| {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        };
        rebase(&mut self.project_root);
        rebase(&mut self.output_dir);
        rebase(&mut self.static_dir);
        self.ext_paths.iter_mut().for_each(rebase);
        self.module_dirs.iter_mut().for_each(rebase);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_gives_defaults() {
        assert_eq!(Config::from_toml_str("").unwrap(), Config::default());
        assert!(!Config::default().generate_db);
    }

    #[test]
    fn test_parse_fields() {
        let config = Config::from_toml_str(
            "generate_db = true\n\
             ext_paths = [\"/opt/ext\"]\n\
             module_dirs = [\"mods/a\", \"mods/b\"]\n\
             output_dir = \"out\"\n",
        )
        .unwrap();
        assert!(config.generate_db);
        assert_eq!(config.ext_paths, vec![PathBuf::from("/opt/ext")]);
        assert_eq!(config.module_dirs.len(), 2);
        assert_eq!(config.output_dir, PathBuf::from("out"));
        assert_eq!(config.search_docname, "boards/index");
    }

    #[test]
    fn test_unknown_types_are_rejected() {
        assert!(Config::from_toml_str("generate_db = \"yes\"\n").is_err());
    }

    #[test]
    fn test_discover_resolves_relative_paths() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            "generate_db = true\nmodule_dirs = [\"mods/a\", \"/abs/b\"]\n",
        )
        .unwrap();

        let config = Config::discover(dir.path()).unwrap();
        assert_eq!(config.project_root, dir.path().join("."));
        assert_eq!(config.output_dir, dir.path().join("_build/html"));
        assert_eq!(
            config.module_dirs,
            vec![dir.path().join("mods/a"), PathBuf::from("/abs/b")]
        );
    }

    #[test]
    fn test_discover_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::discover(dir.path()).unwrap();
        assert_eq!(config.project_root, dir.path());
        assert!(!config.generate_db);
    }

    #[test]
    fn test_invalid_file_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "generate_db = [").unwrap();
        assert!(matches!(Config::load(&path), Err(Error::Config { .. })));
    }
}
