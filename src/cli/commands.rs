//! Command dispatch: resolve settings, run one operation, render the outcome

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::application::services::LinkService;
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::{output, render, CliError, CliResult};
use crate::config::{default_config_path, expand_path, Settings};
use crate::infrastructure::di::ServiceContainer;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match &cli.command {
        Commands::Completion { shell } => {
            generate(*shell, &mut Cli::command(), "brig", &mut out);
            Ok(())
        }
        Commands::Config { command } => execute_config(cli, command, &mut out),
        command => {
            let settings = Settings::load(cli.config.as_deref(), &cli.flags())?;
            debug!("base_url={} timeout={:?}", settings.base_url, settings.timeout_secs);
            let container = ServiceContainer::new(settings);
            run_link_command(&container.links, command, &mut out)
        }
    }
}

/// Run one of the four link operations and render its outcome into `out`.
#[instrument(skip(links, out))]
pub fn run_link_command(
    links: &LinkService,
    command: &Commands,
    out: &mut dyn Write,
) -> CliResult<()> {
    let written = match command {
        Commands::List { json } => {
            let response = links.list()?.into_success("error listing links")?;
            if *json {
                render::list_json(out, &response)
            } else {
                render::list_table(out, &response.listing()?)
            }
        }
        Commands::Get { short_id } => {
            let lookup = links.get(short_id)?.into_result("error looking up link")?;
            render::link_status(out, &lookup)
        }
        Commands::Add {
            short_id,
            target_url,
        } => {
            let link = links
                .add(short_id, target_url)?
                .into_success("error creating link")?;
            render::created(out, &link)
        }
        Commands::Delete { short_id } => {
            let short_id = links
                .delete(short_id)?
                .into_success("error deleting link")?;
            render::deleted(out, &short_id)
        }
        Commands::Config { .. } | Commands::Completion { .. } => {
            return Err(CliError::Usage(format!(
                "not a link command: {:?}",
                command
            )))
        }
    };
    written.map_err(|e| CliError::io("write output", e))
}

fn config_path(cli: &Cli) -> CliResult<PathBuf> {
    cli.config
        .as_deref()
        .map(expand_path)
        .or_else(default_config_path)
        .ok_or_else(|| CliError::Usage("cannot determine config directory".into()))
}

fn execute_config(cli: &Cli, command: &ConfigCommands, out: &mut dyn Write) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = Settings::load(cli.config.as_deref(), &cli.flags())?;
            if let Err(e) = settings.ensure_ready() {
                output::warning(&e);
            }
            let toml = settings.to_toml()?;
            write!(out, "{}", toml).map_err(|e| CliError::io("write output", e))
        }
        ConfigCommands::Path => {
            let path = config_path(cli)?;
            let written = if path.is_file() {
                output::success(out, &path.display())
            } else {
                output::failure(out, &format!("{} (not found)", path.display()))
            };
            written.map_err(|e| CliError::io("write output", e))
        }
        ConfigCommands::Init { force } => {
            let path = config_path(cli)?;
            init_config(&path, *force)?;
            output::action(out, "Created", &path.display())
                .map_err(|e| CliError::io("write output", e))
        }
    }
}

/// Write the config template, refusing to clobber an existing file unless forced.
pub fn init_config(path: &std::path::Path, force: bool) -> CliResult<()> {
    if path.exists() && !force {
        return Err(CliError::Usage(format!(
            "config file already exists: {} (use --force to overwrite)",
            path.display()
        )));
    }
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|e| CliError::io(format!("create {}", parent.display()), e))?;
        }
    }
    fs::write(path, Settings::template())
        .map_err(|e| CliError::io(format!("write {}", path.display()), e))
}
