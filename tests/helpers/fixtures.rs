//! On-disk project fixtures.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Top-level Kconfig of the fixture project.
pub const ROOT_KCONFIG: &str = r#"mainmenu "Zephyr Kernel Configuration"

source "$(ARCH_DIR)/$(ARCH)/Kconfig"

menu "Modules"
osource "$(KCONFIG_BINARY_DIR)/Kconfig.modules"
endmenu

menu "Board Selection"
source "$(BOARD_DIR)/Kconfig.board"
endmenu

source "drivers/Kconfig"
"#;

pub const ARCH_ARM: &str = "config ARM\n\tbool \"ARM architecture\"\n";

pub const BOARD_NRF52DK: &str = "config BOARD_NRF52DK\n\tbool \"nRF52 DK\"\n\tselect SERIAL\n";

pub const DRIVERS: &str = r#"menu "Device Drivers"

config SERIAL
	bool "Serial drivers"
	help
	  Enable serial drivers.

config UART_CONSOLE
	bool "UART console"
	depends on SERIAL

rsource "Kconfig.defconfig"

endmenu
"#;

pub const DRIVERS_DEFCONFIG: &str = "config UART_CONSOLE\n\tdefault y if BOARD_NRF52DK\n";

/// A scratch directory with a Zephyr-like project under `zephyr/` and
/// modules under `modules/`.
pub struct Workspace {
    _dir: TempDir,
    base: PathBuf,
}

impl Workspace {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().canonicalize().unwrap();
        Self { _dir: dir, base }
    }

    /// A workspace with the standard project tree written.
    pub fn with_project() -> Self {
        let ws = Self::new();
        ws.write("zephyr/Kconfig", ROOT_KCONFIG);
        ws.write("zephyr/arch/arm/Kconfig", ARCH_ARM);
        ws.write("zephyr/boards/arm/nrf52dk/Kconfig.board", BOARD_NRF52DK);
        ws.write("zephyr/drivers/Kconfig", DRIVERS);
        ws.write("zephyr/drivers/Kconfig.defconfig", DRIVERS_DEFCONFIG);
        ws
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    pub fn project(&self) -> PathBuf {
        self.base.join("zephyr")
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.base.join(relative)
    }

    pub fn write(&self, relative: &str, text: &str) {
        let path = self.base.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, text).unwrap();
    }

    /// Create `modules/<dir>` with the given `module.yml` and in-module
    /// `zephyr/Kconfig`.
    pub fn module(&self, dir: &str, module_yml: &str, kconfig: Option<&str>) -> PathBuf {
        self.write(&format!("modules/{dir}/zephyr/module.yml"), module_yml);
        if let Some(kconfig) = kconfig {
            self.write(&format!("modules/{dir}/zephyr/Kconfig"), kconfig);
        }
        self.path(&format!("modules/{dir}"))
    }
}
