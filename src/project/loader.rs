//! Kconfig tree loading for a project and its modules.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::env::EnvScope;
use super::module::{KconfigFragment, ModuleDescriptor};
use super::paths::ModulePaths;
use crate::error::{Error, Result};
use crate::kconfig::Kconfig;

/// A parsed tree and the module roots used to display its filenames.
#[derive(Debug)]
pub struct LoadedTree {
    pub kconfig: Kconfig,
    pub module_paths: ModulePaths,
}

/// Load the Kconfig tree rooted at `root/Kconfig`.
///
/// Module fragments are stitched in through a generated `Kconfig.modules`
/// (and an empty `Kconfig.dts`) in a temporary directory exposed as
/// `$(KCONFIG_BINARY_DIR)`. Every architecture and board is included.
/// External fragments are looked up under each of `ext_paths`; a later
/// match overrides an earlier one.
///
/// The process environment is restored and the temporary directory removed
/// before returning, on success or failure.
pub fn load(root: &Path, modules: &[ModuleDescriptor], ext_paths: &[PathBuf]) -> Result<LoadedTree> {
    let entry = root.join("Kconfig");
    if !entry.is_file() {
        return Err(Error::MissingEntryPoint(entry));
    }

    let tempdir = tempfile::tempdir().map_err(|e| Error::io(std::env::temp_dir(), e))?;
    let modules_file = tempdir.path().join("Kconfig.modules");
    let snippets: String = modules.iter().map(ModuleDescriptor::kconfig_snippet).collect();
    std::fs::write(&modules_file, snippets).map_err(|e| Error::io(&modules_file, e))?;
    let dts_file = tempdir.path().join("Kconfig.dts");
    std::fs::write(&dts_file, "").map_err(|e| Error::io(&dts_file, e))?;

    let mut env = EnvScope::new();
    env.set("ZEPHYR_BASE", root);
    env.set("srctree", root);
    env.set("KCONFIG_DOC_MODE", "1");
    env.set("KCONFIG_BINARY_DIR", tempdir.path());
    env.set("ARCH_DIR", "arch");
    env.set("ARCH", "*");
    env.set("BOARD_DIR", "boards/*/*");

    let mut module_paths = ModulePaths::new();
    for module in modules {
        module_paths.insert(&module.name, &module.root);

        match &module.kconfig {
            KconfigFragment::None | KconfigFragment::Default => {}
            KconfigFragment::InTree(fragment) => {
                env.set(module.kconfig_env_var(), module.root.join(fragment));
            }
            KconfigFragment::External => {
                let found = ext_paths
                    .iter()
                    .map(|base| base.join("modules").join(&module.name).join("Kconfig"))
                    .filter(|candidate| candidate.exists())
                    .last();
                match found {
                    Some(path) => {
                        debug!("module {}: external Kconfig {}", module.name, path.display());
                        env.set(module.kconfig_env_var(), path);
                    }
                    None => debug!("module {}: no external Kconfig found", module.name),
                }
            }
        }
    }

    info!("loading Kconfig tree from {}", entry.display());
    let kconfig = Kconfig::load(&entry)?;
    Ok(LoadedTree { kconfig, module_paths })
}
