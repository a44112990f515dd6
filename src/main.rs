//! dirsource CLI: stream flat file records or tree records as JSON lines.

use anyhow::Result;
use clap::Parser;
use dirsource::engine::arg_parser::Cli;
use dirsource::engine::handle_run;
use std::time::Instant;

fn main() -> Result<()> {
    let start_time = Instant::now();
    let cli = Cli::parse();
    handle_run(&cli)?;
    log::debug!("Total time: {:?}", start_time.elapsed());
    Ok(())
}
