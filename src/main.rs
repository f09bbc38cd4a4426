use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use havo_speak::cli::commands::{configure, practice, voices};
use havo_speak::cli::{Args, Command};
use havo_speak::topics::{print_topics, validate_topic};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    match args.command {
        Some(Command::Topics) => {
            print_topics();
        }
        Some(Command::Voices) => {
            voices::print_voices().await?;
        }
        Some(Command::Configure { show }) => {
            configure::run_configure(show)?;
        }
        Some(Command::Practice) | None => {
            if let Some(ref topic) = args.topic {
                validate_topic(topic)?;
            }

            let options = practice::PracticeOptions {
                topic: args.topic,
                endpoint: args.endpoint,
                model: args.model,
                voice: args.voice,
            };
            practice::run_practice(options).await?;
        }
    }

    Ok(())
}

/// Logs go to stderr so the conversation on stdout stays readable.
/// `RUST_LOG` wins over the defaults; `--verbose` turns on debug output.
fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("havo_speak=debug,warn")
        } else {
            EnvFilter::new("warn")
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
