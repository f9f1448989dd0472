use std::process::ExitCode;

use clap::Parser;
use raw2tiff::cli::Cli;
use raw2tiff::image_pipeline::BatchConverter;
use raw2tiff::logger;

use tracing::{error, info};

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    if cli.paths.is_empty() {
        let program = std::env::args().next().unwrap_or_else(|| "raw2tiff".to_string());
        println!("{}", Cli::usage(&program));
        return Ok(ExitCode::SUCCESS);
    }

    logger::init(cli.log_level());

    let config = cli.config();
    info!(
        "Scale factor: {}, auto-bright: {}, compression: {:?}",
        config.scale_factor,
        if config.develop.auto_bright {
            "enabled"
        } else {
            "disabled"
        },
        config.compression
    );

    let converter = BatchConverter::new(config, cli.policy())?;
    let report = converter.run(&cli.paths);

    if report.is_success() {
        return Ok(ExitCode::SUCCESS);
    }

    error!(
        "{} of {} file(s) converted",
        report.converted.len(),
        cli.paths.len()
    );
    Ok(ExitCode::FAILURE)
}
