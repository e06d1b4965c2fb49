use std::fs;
use std::io::{self, Write};

use anyhow::{bail, Context, Result};
use clap::Parser;
use xml_tree_core::{parse_file, write};
use zbx_convert::engine::convert;
use zbx_convert::report::{render_outcomes, render_summary, render_warnings};
use zbx_convert::rules::ConvertOptions;

mod cli;

use cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut document = parse_file(&cli.file)
        .with_context(|| format!("failed to parse {}", cli.file.display()))?;
    if document.tag != "zabbix_export" {
        bail!(
            "unexpected root element <{}>; expected a <zabbix_export> template document",
            document.tag
        );
    }

    let options = ConvertOptions {
        squash_value_maps: cli.squash_value_maps,
    };
    let report = convert(&mut document, &cli.output_version, &options)
        .with_context(|| format!("conversion to {} failed", cli.output_version))?;

    if !cli.quiet {
        eprintln!("{}", render_outcomes(&report));
    }
    let warnings = render_warnings(&report);
    if !warnings.is_empty() {
        eprintln!("{warnings}");
    }

    if let Some(path) = &cli.report {
        let json = serde_json::to_string_pretty(&report)?;
        fs::write(path, json)
            .with_context(|| format!("failed to write report file {}", path.display()))?;
    }

    let xml = write(&document).context("failed to serialize converted document")?;
    match &cli.output_file {
        Some(path) => fs::write(path, &xml)
            .with_context(|| format!("failed to write output XML {}", path.display()))?,
        None => io::stdout()
            .write_all(&xml)
            .context("failed to write converted document to stdout")?,
    }

    if !cli.quiet {
        eprintln!("{}", render_summary(&report));
    }
    Ok(())
}
