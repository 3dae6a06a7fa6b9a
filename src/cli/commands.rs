//! Command dispatch: one function per subcommand

use std::io;
use std::path::Path;

use clap::CommandFactory;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, instrument};

use crate::application::services::{LiveView, SceneService, ViewState, LOADING_TEXT};
use crate::application::{parse_snapshot, ConnectionStatus, SyncEvent};
use crate::cli::args::{Cli, Commands, ConfigCommands, OutputFormat};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, Settings};
use crate::domain::generator::DEFAULT_USERS;
use crate::domain::{generate_dendrogram, layout, LayoutParams, TreeNode};
use crate::infrastructure::{
    EventSource, InfraError, IoResultExt, ReplaySource, WebSocketSource,
};

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        Commands::Layout { file, format } => cmd_layout(cli, file, *format),
        Commands::Watch { endpoint } => cmd_watch(cli, endpoint.as_deref()),
        Commands::Replay { file } => cmd_replay(cli, file),
        Commands::Generate {
            users,
            seed,
            pretty,
        } => cmd_generate(users, *seed, *pretty),
        Commands::Config { command } => cmd_config(cli, command),
        Commands::Completion { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(*shell, &mut cmd, "dendroview", &mut io::stdout());
            Ok(())
        }
    }
}

fn load_settings(cli: &Cli) -> CliResult<Settings> {
    let settings = Settings::load(cli.config.as_deref())?;
    debug!(?settings, "Settings loaded");
    Ok(settings)
}

#[instrument(skip(cli))]
fn cmd_layout(cli: &Cli, file: &Path, format: OutputFormat) -> CliResult<()> {
    let settings = load_settings(cli)?;
    let payload = std::fs::read_to_string(file)
        .with_path_context("read snapshot", file)
        .map_err(CliError::from)?;
    let tree = parse_snapshot(&payload, settings.sync.max_depth)?;

    match format {
        OutputFormat::Tree => print_tree(&tree, &settings.layout),
        OutputFormat::Json => {
            let scene = SceneService::new(settings.layout)?.render(&tree);
            let json = serde_json::to_string_pretty(&scene).map_err(InfraError::from)?;
            output::info(&json);
        }
    }
    Ok(())
}

fn print_tree(tree: &TreeNode, params: &LayoutParams) {
    let positioned = layout(tree, params);
    output::info(&positioned.to_tree_with(output::node_label));
}

#[instrument(skip(cli))]
fn cmd_watch(cli: &Cli, endpoint: Option<&str>) -> CliResult<()> {
    let settings = load_settings(cli)?;
    let endpoint = endpoint.unwrap_or(settings.endpoint.as_str());
    let mut source = WebSocketSource::new(endpoint)?;
    output::header(&format!("Watching {}", source.endpoint()));
    follow(&settings, &mut source)
}

#[instrument(skip(cli))]
fn cmd_replay(cli: &Cli, file: &Path) -> CliResult<()> {
    let settings = load_settings(cli)?;
    let mut source = ReplaySource::open(file)?;
    output::header(&format!("Replaying {}", file.display()));
    follow(&settings, &mut source)
}

/// Drive the live view from `source` and print every change.
///
/// Fails only if the transport failed; rejected snapshots are reported and skipped.
fn follow(settings: &Settings, source: &mut dyn EventSource) -> CliResult<()> {
    let scenes = SceneService::new(settings.layout)?;
    let mut view = LiveView::new(scenes, settings.sync);
    let mut transport_failure: Option<String> = None;

    view.run(source, |view, event| match event {
        SyncEvent::StatusChanged(status) => {
            output::status(&view.status_text());
            if *status == ConnectionStatus::Connected && view.view_state() == ViewState::Loading {
                output::status(LOADING_TEXT);
            }
        }
        SyncEvent::TreeReplaced(tree) => {
            output::header(&format!(
                "Snapshot {}: {} nodes",
                view.sync().snapshots_accepted(),
                tree.node_count()
            ));
            if let Some(diff) = view.last_diff() {
                output::detail(&output::diff_summary(diff));
            }
            print_tree(tree, &settings.layout);
        }
        SyncEvent::TreeCleared => output::status(LOADING_TEXT),
        SyncEvent::SnapshotRejected(reason) => {
            output::warning(&format!("snapshot dropped: {}", reason))
        }
        SyncEvent::TransportFailed(reason) => {
            output::error(reason);
            transport_failure = Some(reason.clone());
        }
    });

    let sync = view.sync();
    output::detail(&format!(
        "{} snapshots accepted, {} rejected",
        sync.snapshots_accepted(),
        sync.snapshots_rejected()
    ));
    if let Some(scene) = view.scene() {
        output::detail(&format!(
            "last scene: {} nodes, {} edges",
            scene.nodes().count(),
            scene.edges().count()
        ));
    }

    match transport_failure {
        Some(message) => Err(InfraError::Transport { message }.into()),
        None => Ok(()),
    }
}

#[instrument]
fn cmd_generate(users: &[String], seed: Option<u64>, pretty: bool) -> CliResult<()> {
    if users.iter().any(|u| u.trim().is_empty()) {
        return Err(CliError::InvalidArgs("user names must not be empty".into()));
    }
    let users: Vec<String> = if users.is_empty() {
        DEFAULT_USERS.iter().map(|u| u.to_string()).collect()
    } else {
        users.to_vec()
    };

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let tree = generate_dendrogram(&users, &mut rng);

    let json = if pretty {
        serde_json::to_string_pretty(&tree)
    } else {
        serde_json::to_string(&tree)
    }
    .map_err(InfraError::from)?;
    output::info(&json);
    Ok(())
}

fn cmd_config(cli: &Cli, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = load_settings(cli)?;
            output::info(&settings.to_toml()?);
        }
        ConfigCommands::Template => output::info(&Settings::template()),
        ConfigCommands::Path => {
            match global_config_path() {
                Some(path) => {
                    let state = if path.exists() { "exists" } else { "not found" };
                    output::info(&format!("Global: {} ({})", path.display(), state));
                }
                None => output::warning("no config directory available"),
            }
            if let Some(path) = &cli.config {
                let state = if path.exists() { "exists" } else { "not found" };
                output::info(&format!("Explicit: {} ({})", path.display(), state));
            }
        }
    }
    Ok(())
}
