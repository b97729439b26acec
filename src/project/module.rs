//! Module descriptors read from `zephyr/module.yml`.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Error, Result};

const DEFAULT_FRAGMENT: &str = "zephyr/Kconfig";

/// Where a module's Kconfig fragment comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KconfigFragment {
    /// The module has no Kconfig.
    None,
    /// Fragment inside the module, relative to its root, named in the
    /// metadata and exported as `ZEPHYR_<NAME>_KCONFIG`.
    InTree(PathBuf),
    /// `zephyr/Kconfig` when the metadata names no fragment. Sourced only
    /// if the file exists.
    Default,
    /// Fragment looked up under `<search root>/modules/<name>/Kconfig`.
    External,
}

/// A project module contributing to the Kconfig tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleDescriptor {
    pub name: String,
    pub root: PathBuf,
    pub kconfig: KconfigFragment,
}

#[derive(Debug, Default, Deserialize)]
struct ModuleYml {
    name: Option<String>,
    #[serde(default)]
    build: BuildSection,
}

#[derive(Debug, Default, Deserialize)]
struct BuildSection {
    kconfig: Option<String>,
    #[serde(rename = "kconfig-ext", default)]
    kconfig_ext: bool,
}

impl ModuleDescriptor {
    pub fn new(name: impl Into<String>, root: impl Into<PathBuf>, kconfig: KconfigFragment) -> Self {
        Self {
            name: name.into(),
            root: root.into(),
            kconfig,
        }
    }

    /// Read the descriptor of the module rooted at `dir`.
    ///
    /// Returns `Ok(None)` when `dir` is not a module: no `zephyr/module.yml`
    /// (or `.yaml`) and not the legacy `zephyr/CMakeLists.txt` +
    /// `zephyr/Kconfig` layout.
    pub fn from_dir(dir: &Path) -> Result<Option<Self>> {
        let root = dir.canonicalize().map_err(|e| Error::io(dir, e))?;
        let meta_dir = root.join("zephyr");

        let yml = ["module.yml", "module.yaml"]
            .iter()
            .map(|name| meta_dir.join(name))
            .find(|path| path.is_file());

        let meta = match yml {
            Some(path) => {
                let text = std::fs::read_to_string(&path).map_err(|e| Error::io(&path, e))?;
                if text.trim().is_empty() {
                    ModuleYml::default()
                } else {
                    serde_yaml::from_str(&text)
                        .map_err(|e| Error::module_metadata(&path, e.to_string()))?
                }
            }
            None if meta_dir.join("CMakeLists.txt").is_file() && meta_dir.join("Kconfig").is_file() => {
                ModuleYml {
                    name: None,
                    build: BuildSection {
                        kconfig: Some(DEFAULT_FRAGMENT.to_string()),
                        kconfig_ext: false,
                    },
                }
            }
            None => return Ok(None),
        };

        let name = match meta.name {
            Some(name) => name,
            None => root
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
        };

        let kconfig = if meta.build.kconfig_ext {
            KconfigFragment::External
        } else {
            match meta.build.kconfig {
                Some(fragment) => KconfigFragment::InTree(PathBuf::from(fragment)),
                None => KconfigFragment::Default,
            }
        };

        Ok(Some(Self { name, root, kconfig }))
    }

    /// Name with every non-alphanumeric character replaced by `_`.
    pub fn sanitized_name(&self) -> String {
        self.name
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect()
    }

    /// Environment variable naming the module's Kconfig fragment.
    pub fn kconfig_env_var(&self) -> String {
        format!("ZEPHYR_{}_KCONFIG", self.sanitized_name().to_uppercase())
    }

    /// Symbol the module always defines.
    pub fn module_symbol(&self) -> String {
        format!("ZEPHYR_{}_MODULE", self.sanitized_name().to_uppercase())
    }

    /// Kconfig text this module contributes to `Kconfig.modules`.
    pub fn kconfig_snippet(&self) -> String {
        let source = match &self.kconfig {
            KconfigFragment::InTree(fragment) => {
                let path = self.root.join(fragment);
                path.is_file().then(|| posix(&path))
            }
            KconfigFragment::Default => {
                let path = self.root.join(DEFAULT_FRAGMENT);
                path.is_file().then(|| posix(&path))
            }
            KconfigFragment::External => Some(format!("$({})", self.kconfig_env_var())),
            KconfigFragment::None => None,
        };

        let symbol = format!("config {}\n\tbool\n\tdefault y\n", self.module_symbol());
        match source {
            Some(source) => format!(
                "menu \"{} ({})\"\nosource \"{}\"\n{}endmenu\n",
                self.name,
                posix(&self.root),
                source,
                symbol
            ),
            None => symbol,
        }
    }
}

fn posix(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Descriptors for every module among `dirs`, in the given order.
/// Directories that are not modules are skipped.
pub fn discover_modules(dirs: &[PathBuf]) -> Result<Vec<ModuleDescriptor>> {
    let mut modules = Vec::new();
    for dir in dirs {
        match ModuleDescriptor::from_dir(dir)? {
            Some(module) => {
                tracing::debug!("module {} at {}", module.name, module.root.display());
                modules.push(module);
            }
            None => tracing::debug!("{} is not a module, skipping", dir.display()),
        }
    }
    Ok(modules)
}
