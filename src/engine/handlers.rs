//! CLI command handlers: stream the records of a mode, or print its field table.

use anyhow::{Context, Result};
use log::{debug, info, warn};
use serde::Serialize;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::engine::arg_parser::{Cli, Commands, Mode, SourceArgs};
use crate::engine::progress::{create_counter, refresh_bar, update_counter};
use crate::pipeline::{FileSource, TreeSource};
use crate::utils::setup_logging;
use crate::utils::source_toml::{load_default_source_toml, load_source_toml};
use crate::{HighWater, SourceConfig};

/// Overwrite config field from CLI when given.
macro_rules! apply_cli_opt {
    ($args:expr, $config:expr, $field:ident) => {
        if let Some(v) = &$args.$field {
            $config.$field = Some(v.clone());
        }
    };
}

/// Overwrite config list from CLI when non-empty.
macro_rules! apply_cli_list {
    ($args:expr, $config:expr, $field:ident) => {
        if !$args.$field.is_empty() {
            $config.$field = $args.$field.clone();
        }
    };
}

/// Apply CLI options on top of file config. Only options given on the command line change it.
pub fn apply_args_to_config(args: &SourceArgs, config: &mut SourceConfig) {
    apply_cli_opt!(args, config, path);
    apply_cli_opt!(args, config, path_env);
    apply_cli_opt!(args, config, converter);
    apply_cli_list!(args, config, include);
    apply_cli_list!(args, config, exclude);
    apply_cli_list!(args, config, depth);
    if let Some(skip) = args.skip_errors {
        config.skip_errors = skip;
    }
}

fn setup_source(cli: &Cli, args: &SourceArgs) -> Result<(SourceConfig, Option<HighWater>)> {
    // `.env` may supply the variable named by path_env.
    if let Err(e) = dotenvy::dotenv()
        && !e.not_found()
    {
        warn!(".env: {}", e);
    }
    let mut config = match &cli.config {
        Some(path) => load_source_toml(path)?.source,
        None => load_default_source_toml(Path::new("."))
            .map(|file| file.source)
            .unwrap_or_default(),
    };
    apply_args_to_config(args, &mut config);
    let high_water = args.high_water_field.as_ref().map(|field| HighWater {
        field: field.clone(),
        after: args.high_water.clone(),
    });
    Ok((config, high_water))
}

/// Run the selected command.
pub fn handle_run(cli: &Cli) -> Result<()> {
    setup_logging(cli.verbose);
    match &cli.command {
        Commands::Files(args) => {
            let (config, high_water) = setup_source(cli, args)?;
            let source = FileSource::new(&config, high_water.as_ref())?;
            info!("{}: {}", source, source.traversal().root().display());
            emit_records(source.records(), cli.verbose)
        }
        Commands::Tree(args) => {
            let (config, high_water) = setup_source(cli, args)?;
            let source = TreeSource::new(&config, high_water.as_ref())?;
            info!("{}: {}", source, source.traversal().root().display());
            emit_records(source.records(), cli.verbose)
        }
        Commands::Fields { mode } => print_fields(*mode),
    }
}

/// Pull records one at a time and write each as a JSON line to stdout.
/// Ctrl+C stops pulling; nothing further is read or converted.
fn emit_records<I, R>(records: I, verbose: bool) -> Result<()>
where
    I: Iterator<Item = crate::Result<R>>,
    R: Serialize,
{
    let cancel_requested = Arc::new(AtomicBool::new(false));
    let cancel_requested_handler = Arc::clone(&cancel_requested);
    ctrlc::set_handler(move || {
        cancel_requested_handler.store(true, Ordering::Relaxed);
    })
    .context("set Ctrl+C handler")?;

    let stdout = std::io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let mut bar = verbose.then(|| create_counter("Importing"));
    refresh_bar(&mut bar);

    let mut written = 0_usize;
    for record in records {
        if cancel_requested.load(Ordering::Relaxed) {
            break;
        }
        let record = record?;
        serde_json::to_writer(&mut out, &record).context("serialize record")?;
        out.write_all(b"\n").context("write record")?;
        written += 1;
        update_counter(&mut bar, 1);
    }
    out.flush().context("flush stdout")?;
    if bar.is_some() {
        eprintln!();
    }

    if cancel_requested.load(Ordering::Relaxed) {
        return Err(anyhow::anyhow!(
            "Cancelled by user after {} records",
            written
        ));
    }
    debug!("Wrote {} records", written);
    Ok(())
}

fn print_fields(mode: Mode) -> Result<()> {
    let (fields, ids) = match mode {
        Mode::Files => (FileSource::fields(), FileSource::ids()),
        Mode::Tree => (TreeSource::fields(), TreeSource::ids()),
    };
    for (name, label) in fields {
        println!("{:<14} {}", name, label);
    }
    println!("id: {}", serde_json::to_string(&ids).context("serialize id schema")?);
    Ok(())
}
