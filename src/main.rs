//! CLI entry point for template tessellation

use clap::Parser;
use tessellate::io::cli::{Cli, TessellationRunner, init_logging};

fn main() -> tessellate::Result<()> {
    let cli = Cli::parse();
    let _logger = init_logging(cli.log_level());
    let mut runner = TessellationRunner::new(cli);
    runner.process()
}
