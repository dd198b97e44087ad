//! toolgrid binary

use clap::Parser;
use toolgrid_cli::{init_tracing, run, Cli};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    tracing::debug!("toolgrid v{}", env!("CARGO_PKG_VERSION"));

    run(cli)
}
