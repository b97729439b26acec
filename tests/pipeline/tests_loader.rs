//! Loading project trees with modules.

use std::ffi::OsString;

use boardselector::kconfig::KconfigError;
use boardselector::project::{KconfigFragment, ModuleDescriptor, discover_modules, load};
use boardselector::{Error, extract};

use crate::helpers::env_lock::env_lock;
use crate::helpers::fixtures::Workspace;

const LOADER_VARS: &[&str] = &[
    "ZEPHYR_BASE",
    "srctree",
    "KCONFIG_DOC_MODE",
    "KCONFIG_BINARY_DIR",
    "ARCH_DIR",
    "ARCH",
    "BOARD_DIR",
    "ZEPHYR_FOO_KCONFIG",
    "ZEPHYR_HAL_EXT_KCONFIG",
];

fn snapshot() -> Vec<Option<OsString>> {
    LOADER_VARS.iter().map(|var| std::env::var_os(var)).collect()
}

fn workspace_with_modules() -> (Workspace, Vec<ModuleDescriptor>) {
    let ws = Workspace::with_project();
    let foo = ws.module(
        "foo",
        "name: foo\nbuild:\n  kconfig: zephyr/Kconfig\n",
        Some("config FOO_DRIVER\n\tbool \"Foo driver\"\n\thelp\n\t  Foo.\n"),
    );
    let hal = ws.module("hal-ext", "build:\n  kconfig-ext: true\n", None);
    let plain = ws.module("plain", "name: plain\n", None);
    ws.write("ext/modules/hal-ext/Kconfig", "config HAL_EXT\n\tbool \"HAL ext\"\n");

    let modules = discover_modules(&[foo, hal, plain]).unwrap();
    (ws, modules)
}

#[test]
fn test_discovered_modules() {
    let (_ws, modules) = workspace_with_modules();
    let kinds: Vec<_> = modules.iter().map(|m| (m.name.as_str(), &m.kconfig)).collect();
    assert_eq!(kinds.len(), 3);
    assert_eq!(kinds[1], ("hal-ext", &KconfigFragment::External));
    assert_eq!(kinds[2], ("plain", &KconfigFragment::Default));
}

#[test]
fn test_load_project_with_modules() {
    let _lock = env_lock();
    let (ws, modules) = workspace_with_modules();
    let before = snapshot();

    let loaded = load(&ws.project(), &modules, &[ws.path("ext")]).unwrap();
    let tree = &loaded.kconfig;

    for name in [
        "ARM",
        "BOARD_NRF52DK",
        "SERIAL",
        "UART_CONSOLE",
        "FOO_DRIVER",
        "HAL_EXT",
        "ZEPHYR_FOO_MODULE",
        "ZEPHYR_HAL_EXT_MODULE",
        "ZEPHYR_PLAIN_MODULE",
    ] {
        let id = tree.lookup_symbol(name).unwrap_or_else(|| panic!("{name} missing"));
        assert!(!tree.symbol(id).nodes.is_empty(), "{name} not defined");
    }

    let board = tree.lookup_symbol("BOARD_NRF52DK").unwrap();
    let board_node = tree.node(tree.symbol(board).nodes[0]);
    assert_eq!(board_node.filename, "boards/arm/nrf52dk/Kconfig.board");

    assert_eq!(loaded.module_paths.len(), 3);
    assert_eq!(snapshot(), before);
}

#[test]
fn test_module_records() {
    let _lock = env_lock();
    let (ws, modules) = workspace_with_modules();

    let loaded = load(&ws.project(), &modules, &[ws.path("ext")]).unwrap();
    let records = extract(&loaded.kconfig, &loaded.module_paths);

    let foo = records.iter().find(|r| r.name == "CONFIG_FOO_DRIVER").unwrap();
    assert_eq!(foo.filename, "<module:foo>/zephyr/Kconfig");
    assert_eq!(foo.linenr, 1);
    assert_eq!(
        foo.menupath,
        format!("(Top) > Modules > foo ({})", ws.path("modules/foo").display())
    );

    let hal = records.iter().find(|r| r.name == "CONFIG_HAL_EXT").unwrap();
    assert_eq!(
        hal.filename,
        ws.path("ext/modules/hal-ext/Kconfig").to_string_lossy()
    );

    let serial = records.iter().find(|r| r.name == "CONFIG_SERIAL").unwrap();
    assert_eq!(serial.filename, "drivers/Kconfig");
    assert_eq!(serial.selected_by, vec!["CONFIG_BOARD_NRF52DK"]);

    let uart = records.iter().find(|r| r.name == "CONFIG_UART_CONSOLE").unwrap();
    assert_eq!(uart.linenr, 8);
    assert_eq!(uart.menupath, "(Top) > Device Drivers > Serial drivers");
    assert_eq!(uart.alt_defaults.len(), 1);
    assert_eq!(uart.alt_defaults[0].filename(), "drivers/Kconfig.defconfig");
    assert_eq!(
        uart.alt_defaults[0].value(),
        "y if <a href=\"#CONFIG_BOARD_NRF52DK\">CONFIG_BOARD_NRF52DK</a>"
    );

    assert!(records.iter().all(|r| !r.name.starts_with("CONFIG_ZEPHYR_")));
}

#[test]
fn test_last_external_root_wins() {
    let _lock = env_lock();
    let (ws, modules) = workspace_with_modules();
    ws.write("ext2/modules/hal-ext/Kconfig", "config HAL_EXT_TWO\n\tbool \"Two\"\n");

    let loaded = load(&ws.project(), &modules, &[ws.path("ext"), ws.path("ext2")]).unwrap();
    assert!(loaded.kconfig.lookup_symbol("HAL_EXT_TWO").is_some());
    assert!(loaded.kconfig.lookup_symbol("HAL_EXT").is_none());
}

#[test]
fn test_unresolved_external_fragment_is_skipped() {
    let _lock = env_lock();
    let (ws, modules) = workspace_with_modules();

    let loaded = load(&ws.project(), &modules, &[]).unwrap();
    assert!(loaded.kconfig.lookup_symbol("HAL_EXT").is_none());
    assert!(loaded.kconfig.lookup_symbol("ZEPHYR_HAL_EXT_MODULE").is_some());
}

#[test]
fn test_missing_in_tree_fragment_defines_module_symbol_only() {
    let _lock = env_lock();
    let ws = Workspace::with_project();
    let ghost = ws.module("ghost", "build:\n  kconfig: zephyr/Kconfig\n", None);
    let modules = discover_modules(&[ghost]).unwrap();

    let loaded = load(&ws.project(), &modules, &[]).unwrap();
    let module_sym = loaded.kconfig.lookup_symbol("ZEPHYR_GHOST_MODULE").unwrap();
    let node = loaded.kconfig.node(loaded.kconfig.symbol(module_sym).nodes[0]);
    let parent = loaded.kconfig.node(node.parent.unwrap());
    assert_eq!(parent.prompt.as_ref().unwrap().text, "Modules");
}

#[test]
fn test_module_without_kconfig_key_sources_default_fragment() {
    let _lock = env_lock();
    let ws = Workspace::with_project();
    let bare = ws.module(
        "bare",
        "name: bare\nbuild:\n  cmake: .\n",
        Some("config BARE_DRIVER\n\tbool \"Bare driver\"\n"),
    );
    let modules = discover_modules(&[bare]).unwrap();

    let loaded = load(&ws.project(), &modules, &[]).unwrap();
    let records = extract(&loaded.kconfig, &loaded.module_paths);
    let bare = records.iter().find(|r| r.name == "CONFIG_BARE_DRIVER").unwrap();
    assert_eq!(bare.filename, "<module:bare>/zephyr/Kconfig");
}

#[test]
fn test_parse_failure_restores_environment() {
    let _lock = env_lock();
    let ws = Workspace::with_project();
    ws.write("zephyr/drivers/Kconfig", "source \"drivers/missing/Kconfig\"\n");
    let before = snapshot();

    let err = load(&ws.project(), &[], &[]).unwrap_err();
    assert!(matches!(
        err,
        Error::Kconfig(KconfigError::SourceNotFound { ref pattern, .. }) if pattern == "drivers/missing/Kconfig"
    ));
    assert_eq!(snapshot(), before);
}

#[test]
fn test_missing_entry_point() {
    let _lock = env_lock();
    let ws = Workspace::new();
    let err = load(&ws.project(), &[], &[]).unwrap_err();
    assert!(matches!(err, Error::MissingEntryPoint(_)));
}
