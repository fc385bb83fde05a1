use tracing::info;

use amux_paths::Paths;

pub fn handle_init_command() -> anyhow::Result<()> {
    let paths = Paths::resolve()?;
    paths.ensure_directories()?;
    info!(event = "cli.init.directories_ready", home = %paths.home().display());

    let report = amux_migrate::run_migrations(&paths);
    println!("home: {}", paths.home().display());
    println!("workspaces migration: {:?}", report.workspaces_root);
    println!("metadata migration: {:?}", report.metadata_root);
    if let Some(err) = &report.first_error {
        println!("first error: {err}");
    }

    info!(
        event = "cli.init.completed",
        migrated_workspaces = report.migrated_workspaces_root(),
        migrated_metadata = report.migrated_metadata_root()
    );
    Ok(())
}
