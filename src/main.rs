use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use folio::Transport;

mod cli {
    pub mod contact;
    pub mod preference;
}

/// folio - portfolio contact form and display preferences
#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "Contact form and display preferences of the portfolio", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fill in and send the contact form
    Contact {
        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        email: Option<String>,

        #[arg(long)]
        message: Option<String>,

        /// web-development, mobile-development, consulting or maintenance
        #[arg(long)]
        service: Option<String>,

        /// Overrides the configured transport
        #[arg(long, value_enum)]
        transport: Option<Transport>,

        /// Mail wording for the smtp transport (es, en)
        #[arg(long)]
        lang: Option<String>,
    },
    /// Show or change the light/dark theme
    Theme {
        #[command(subcommand)]
        action: Option<cli::preference::ThemeAction>,
    },
    /// Show or change the color scheme
    Scheme {
        #[command(subcommand)]
        action: Option<cli::preference::SchemeAction>,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let config = folio::Config::load(cli.config.clone())?;
    config.validate().map_err(|e| anyhow::anyhow!(e))?;

    folio::observability::init_observability(
        "folio",
        env!("CARGO_PKG_VERSION"),
        &config.observability.log_level,
    )?;

    match cli.command {
        Commands::Contact {
            name,
            email,
            message,
            service,
            transport,
            lang,
        } => {
            let args = cli::contact::ContactArgs {
                name,
                email,
                message,
                service,
                transport,
                lang,
            };

            let accepted = cli::contact::run(config, args).await?;

            Ok(if accepted {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Commands::Theme { action } => {
            cli::preference::theme(config, action.unwrap_or_default())?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Scheme { action } => {
            cli::preference::scheme(config, action.unwrap_or_default()).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
