//! `buildctx` CLI binary.
//!
//! Checks and inspects build context files:
//!
//! ```text
//! buildctx validate --file build_context.yml
//! buildctx show --json
//! buildctx tag
//! buildctx resolve --param params.image=ubuntu:18.04
//! ```
//!
//! The default file and log level come from `buildctx.yaml` or `BUILDCTX_*`
//! environment variables.

use buildctx::configuration::{get_configuration, Settings};
use buildctx::console::commands::cli::{config, resolve, tag};
use buildctx::console::commands::CallableTrait;
use buildctx::telemetry::{get_subscriber, init_subscriber};
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "buildctx",
    version,
    about = "Validate and inspect container build contexts"
)]
struct Cli {
    #[command(subcommand)]
    command: BuildCtxCommands,
}

#[derive(Debug, Subcommand)]
enum BuildCtxCommands {
    /// Validate a build context file
    Validate {
        /// Path to the build context (default: build_context.yml)
        #[arg(long, value_name = "FILE")]
        file: Option<String>,
    },
    /// Show the validated build context
    Show {
        #[arg(long, value_name = "FILE")]
        file: Option<String>,
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
    /// Print the tag of the base image
    Tag {
        #[arg(long, value_name = "FILE")]
        file: Option<String>,
    },
    /// Fill `{{ ... }}` references and print the result
    Resolve {
        #[arg(long, value_name = "FILE")]
        file: Option<String>,
        /// YAML or JSON mapping of parameters
        #[arg(long, value_name = "FILE")]
        params_file: Option<String>,
        /// Parameter as KEY=VALUE; dotted keys nest (params.image=ubuntu)
        #[arg(long = "param", value_name = "KEY=VALUE")]
        params: Vec<String>,
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let settings = get_configuration()?;
    let subscriber = get_subscriber("buildctx".into(), settings.log_level.clone());
    init_subscriber(subscriber);

    let cli = Cli::parse();
    let command = get_command(cli, &settings);
    if let Err(err) = command.call() {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
    Ok(())
}

fn get_command(cli: Cli, settings: &Settings) -> Box<dyn CallableTrait> {
    let or_default = |file: Option<String>| file.unwrap_or_else(|| settings.default_file.clone());

    match cli.command {
        BuildCtxCommands::Validate { file } => {
            Box::new(config::ConfigValidateCommand::new(or_default(file)))
        }
        BuildCtxCommands::Show { file, json } => {
            Box::new(config::ConfigShowCommand::new(or_default(file), json))
        }
        BuildCtxCommands::Tag { file } => Box::new(tag::TagCommand::new(or_default(file))),
        BuildCtxCommands::Resolve {
            file,
            params_file,
            params,
            json,
        } => Box::new(resolve::ResolveCommand::new(
            or_default(file),
            params_file,
            params,
            json,
        )),
    }
}
