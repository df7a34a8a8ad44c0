use std::process::ExitCode;

use anyhow::Result;

use kiln_engine::core::Runtime;
use kiln_engine::logging::{LoggingConfig, init_logging};

mod args;
mod hello;

use args::{StudioArgs, USAGE};
use hello::HelloApp;

fn main() -> ExitCode {
    let args = match StudioArgs::parse(std::env::args().skip(1)) {
        Ok(a) => a,
        Err(e) => {
            eprintln!("kiln-studio: {e:#}\n\n{USAGE}");
            return ExitCode::from(2);
        }
    };

    if args.help {
        println!("{USAGE}");
        return ExitCode::SUCCESS;
    }

    init_logging(if args.verbose {
        LoggingConfig::verbose()
    } else {
        LoggingConfig::default()
    });

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &StudioArgs) -> Result<()> {
    let config = args.resolve_config()?;
    log::info!(
        "starting '{}' ({}x{}, {:?}, vsync {})",
        config.title,
        config.width,
        config.height,
        config.graphics_api,
        config.vsync
    );

    let mut sequencer = kiln_engine::native_sequencer()?;
    let mut app = HelloApp::new();

    let summary = Runtime::run(&mut sequencer, &config, &mut app)?;

    log::info!(
        "exited after {} frames ({} idle)",
        summary.frames_drawn,
        summary.frames_idle
    );
    if !summary.shutdown.is_clean() {
        log::warn!(
            "{} teardown step(s) failed",
            summary.shutdown.errors.len()
        );
    }
    Ok(())
}
