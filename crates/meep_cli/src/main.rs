//! CLI smoke entry point.
//!
//! # Responsibility
//! - Load config (file argument or testing defaults) plus `MEEP_*` overrides.
//! - Open the configured database and report its schema state.
//!
//! Usage: `meep_cli [config.toml]`

use meep_core::db::migrations::{current_version, latest_version};
use meep_core::{CoreConfig, SqliteOwnerRepository, SqliteProjectRepository};
use meep_core::{OwnerRepository, ProjectRepository};
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("meep_cli: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut config = match std::env::args().nth(1) {
        Some(path) => CoreConfig::from_file(path)?,
        None => CoreConfig::testing(),
    };
    config.apply_env_overrides()?;

    if config.logging.init()? {
        log::info!("event=cli_start module=cli status=ok");
    }

    println!("meep_core ping={}", meep_core::ping());
    println!("meep_core version={}", meep_core::core_version());

    let conn = config.database.open()?;
    println!(
        "schema version={} latest={}",
        current_version(&conn)?,
        latest_version()
    );

    let owners = SqliteOwnerRepository::try_new(&conn)?.list_owners()?;
    let projects = SqliteProjectRepository::try_new(&conn)?.list_projects()?;
    println!("owners={} projects={}", owners.len(), projects.len());
    Ok(())
}
