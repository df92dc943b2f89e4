use anyhow::Result;
use clap::Parser;

use crate::capture::{CaptureCliArgs, CaptureConfig};

/// Capture a photo and its edge map each time the button is pressed.
#[derive(Debug, Parser)]
#[command(name = "edge-capture", version, about)]
struct Cli {
    #[command(flatten)]
    capture: CaptureCliArgs,
}

/// Parse process arguments. `--help`/`--version` print and exit here.
pub fn parse_config() -> Result<CaptureConfig> {
    let cli = Cli::parse();
    CaptureConfig::try_from(cli.capture)
}
