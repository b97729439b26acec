//! Build hooks.
//!
//! [`on_builder_inited`] runs once when a documentation build starts: it
//! loads the Kconfig tree, writes the board database and reports the files
//! to publish. Pages are checked with [`crate::widget::page_requests_widget`]
//! when rendered.

use tracing::{debug, info};

use crate::config::Config;
use crate::database::{Database, Publication};
use crate::domain::OptionIndex;
use crate::error::Result;
use crate::extract::extract;
use crate::project::{discover_modules, load};

/// Result of a database build.
#[derive(Debug)]
pub struct BuildOutcome {
    pub database: Database,
    pub publication: Publication,
    /// Every extracted option, registered on the search page.
    pub options: OptionIndex,
}

/// Build and publish the board database.
///
/// Returns `Ok(None)` without touching the filesystem when
/// `generate_db` is off. Nothing is written when loading fails.
pub fn on_builder_inited(config: &Config) -> Result<Option<BuildOutcome>> {
    if !config.generate_db {
        debug!("board database generation disabled");
        return Ok(None);
    }

    info!("Building board database...");
    let modules = discover_modules(&config.module_dirs)?;
    let loaded = load(&config.project_root, &modules, &config.ext_paths)?;
    let records = extract(&loaded.kconfig, &loaded.module_paths);
    drop(loaded);

    let mut options = OptionIndex::new();
    for record in &records {
        options.add_option(&record.name, &config.search_docname);
    }

    let database = Database::new(records);
    let publication = database.publish(&config.output_dir, &config.static_dir)?;
    Ok(Some(BuildOutcome {
        database,
        publication,
        options,
    }))
}
