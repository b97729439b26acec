//! The build hook end to end.

use std::path::PathBuf;

use boardselector::{Config, Database, Error, on_builder_inited};
use rstest::rstest;

use crate::helpers::env_lock::env_lock;
use crate::helpers::fixtures::Workspace;

fn config_for(ws: &Workspace) -> Config {
    Config {
        generate_db: true,
        project_root: ws.project(),
        module_dirs: vec![ws.path("modules/foo")],
        output_dir: ws.path("out"),
        static_dir: PathBuf::from("static"),
        ..Config::default()
    }
}

fn workspace() -> Workspace {
    let ws = Workspace::with_project();
    ws.module(
        "foo",
        "name: foo\nbuild:\n  kconfig: zephyr/Kconfig\n",
        Some("config FOO_DRIVER\n\tbool \"Foo driver\"\n"),
    );
    ws
}

#[test]
fn test_build_writes_database() {
    let _lock = env_lock();
    let ws = workspace();

    let outcome = on_builder_inited(&config_for(&ws)).unwrap().unwrap();

    let db_file = ws.path("out/board/board.json");
    assert_eq!(outcome.publication.database, db_file);
    assert_eq!(outcome.publication.extra_paths, vec![db_file.clone()]);
    assert_eq!(outcome.publication.static_paths, vec![PathBuf::from("static")]);

    let written = Database::from_json(&std::fs::read_to_string(&db_file).unwrap()).unwrap();
    assert_eq!(written, outcome.database);

    let names: Vec<_> = written.records().iter().map(|r| r.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "CONFIG_ARM",
            "CONFIG_FOO_DRIVER",
            "CONFIG_BOARD_NRF52DK",
            "CONFIG_SERIAL",
            "CONFIG_UART_CONSOLE",
        ]
    );
    assert_eq!(
        written.find("CONFIG_FOO_DRIVER").unwrap().filename,
        "<module:foo>/zephyr/Kconfig"
    );
}

#[test]
fn test_build_registers_options() {
    let _lock = env_lock();
    let ws = workspace();

    let outcome = on_builder_inited(&config_for(&ws)).unwrap().unwrap();

    assert_eq!(outcome.options.len(), outcome.database.len());
    let target = outcome.options.resolve("CONFIG_SERIAL").unwrap();
    assert_eq!(target.docname, "boards/index");
    assert_eq!(target.anchor, "CONFIG_SERIAL");
}

#[test]
fn test_disabled_build_does_nothing() {
    let ws = workspace();
    let config = Config {
        generate_db: false,
        ..config_for(&ws)
    };

    assert!(on_builder_inited(&config).unwrap().is_none());
    assert!(!ws.path("out").exists());
}

#[rstest]
#[case("zephyr/drivers/Kconfig", "config\n")]
#[case("zephyr/drivers/Kconfig", "source \"nowhere/Kconfig\"\n")]
#[case("zephyr/arch/arm/Kconfig", "menu \"Unterminated\"\n")]
fn test_failed_load_writes_nothing(#[case] file: &str, #[case] text: &str) {
    let _lock = env_lock();
    let ws = workspace();
    ws.write(file, text);

    let err = on_builder_inited(&config_for(&ws)).unwrap_err();
    assert!(matches!(err, Error::Kconfig(_)), "{err}");
    assert!(!ws.path("out/board/board.json").exists());
}

#[test]
fn test_build_from_config_file() {
    let _lock = env_lock();
    let ws = workspace();
    ws.write(
        "zephyr/boardselector.toml",
        "generate_db = true\nmodule_dirs = [\"../modules/foo\"]\noutput_dir = \"../out\"\n",
    );

    let config = Config::discover(&ws.project()).unwrap();
    let outcome = on_builder_inited(&config).unwrap().unwrap();

    assert!(outcome.database.find("CONFIG_FOO_DRIVER").is_some());
    assert!(outcome.publication.database.ends_with("out/board/board.json"));
}
