use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use comfy_table::{Cell, ContentArrangement, Table};
use quiesce_app::{App, ManifestLoader, RefreshMode};
use quiesce_core::config::QuiesceConfig;
use quiesce_core::file_tree::ALL_FILTERS;
use quiesce_tui::{BrowserExit, tree_lines};

use crate::cli::{Cli, Command, ManifestArgs, TreeArgs};

pub fn run_with_deps(cli: Cli, config: QuiesceConfig) -> Result<()> {
    match cli.command {
        Command::Tree(args) => run_tree_command(args, config),
        Command::Summary(args) => run_summary_command(args, config),
        Command::Browse(args) => run_browse_command(args, config),
    }
}

fn load_app(manifest: &Path, config: QuiesceConfig) -> Result<App> {
    let app = App::new(config, Arc::new(ManifestLoader::new(manifest)));
    app.refresh_files(RefreshMode::Sync)?;
    Ok(app)
}

fn run_tree_command(args: TreeArgs, mut config: QuiesceConfig) -> Result<()> {
    if let Some(filter) = args.filter {
        config.tree.default_filter = filter;
    }
    config.tree.show_root_item |= args.root;
    config.tree.compress_single_child_folders &= !args.no_compress;
    config.tree.show_line_changes |= args.line_changes;
    let show_line_changes = config.tree.show_line_changes;

    let app = load_app(&args.manifest, config)?;
    for path in &args.collapse {
        app.tree().toggle_collapsed(path.trim_end_matches('/'));
    }

    for line in tree_lines(&app.tree().snapshot(), show_line_changes) {
        println!("{line}");
    }
    Ok(())
}

fn run_summary_command(args: ManifestArgs, config: QuiesceConfig) -> Result<()> {
    let app = load_app(&args.manifest, config)?;
    let tree = app.tree();

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Filter", "Description", "Files", "Folders"]);

    for filter in ALL_FILTERS {
        tree.set_filter(filter);
        let snapshot = tree.snapshot();
        table.add_row(vec![
            Cell::new(filter.as_str()),
            Cell::new(filter.title()),
            Cell::new(snapshot.root().file_count()),
            Cell::new(snapshot.folder_paths().len()),
        ]);
    }

    println!("{table}");
    Ok(())
}

fn run_browse_command(args: ManifestArgs, config: QuiesceConfig) -> Result<()> {
    let app = App::new(config, Arc::new(ManifestLoader::new(&args.manifest)));
    let exit = quiesce_tui::run_browser(&app).context("file browser failed")?;

    if let Err(error) = app.wait_until_idle() {
        tracing::warn!(%error, "exiting with background work still running");
    }
    if exit == BrowserExit::Interrupted {
        tracing::debug!("browser interrupted");
    }
    Ok(())
}
