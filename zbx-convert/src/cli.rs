use std::path::PathBuf;

use clap::{ArgAction, Parser};

#[derive(Parser, Debug)]
#[command(name = "zbx-convert")]
#[command(about = "Convert Zabbix template XML exports to older schema versions")]
#[command(version, disable_version_flag = true)]
pub struct Cli {
    /// Template export file to convert.
    pub file: PathBuf,
    /// Target export schema version, for example 3.0 or 2.4.5.
    #[arg(short = 'o', long)]
    pub output_version: String,
    /// Remove value map references from items and item prototypes.
    #[arg(short = 's', long)]
    pub squash_value_maps: bool,
    /// Write the converted document to a file instead of stdout.
    #[arg(long)]
    pub output_file: Option<PathBuf>,
    /// Write a JSON conversion report to this path.
    #[arg(long)]
    pub report: Option<PathBuf>,
    /// Suppress per-rule notices and the summary line.
    #[arg(short, long)]
    pub quiet: bool,
    /// Print version information.
    #[arg(short = 'v', long = "version", action = ArgAction::Version)]
    pub version: Option<bool>,
}
