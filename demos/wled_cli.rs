//! CLI application for querying a WLED device.
//!
//! This example demonstrates a small command-line interface over the client's
//! read-only queries.
//!
//! Run with: cargo run --example wled_cli -- --help

use clap::{Parser, Subcommand};
use wled_rs::{Client, ClientOptions, Response};

#[derive(Parser)]
#[command(name = "wled-cli")]
#[command(about = "Query a WLED device from the command line", long_about = None)]
struct Cli {
    /// IP address or host name of the WLED device
    #[arg(long)]
    host: String,

    /// Use https instead of http
    #[arg(long)]
    https: bool,

    /// Port of the device (defaults to the scheme's port)
    #[arg(short, long)]
    port: Option<u16>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show device information
    Info,

    /// Show the current light state
    State,

    /// List stored presets
    Presets,

    /// Show the device configuration
    Config,

    /// Query every resource and print client diagnostics
    Diagnostics,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();

    let mut options = ClientOptions::new(&cli.host).https(cli.https);
    options.port = cli.port;
    let client = Client::new(options);

    client.on_error(|response: Response| {
        log::error!(
            "{} answered {}: {}",
            response.url(),
            response.status(),
            response.text()
        );
    });

    println!("Querying {}...", client.endpoint());

    let data = match cli.command {
        Commands::Info => client.get_info().await,
        Commands::State => client.get_state().await,
        Commands::Presets => client.get_presets().await,
        Commands::Config => client.get_config().await,
        Commands::Diagnostics => {
            for result in [
                client.get_info().await,
                client.get_state().await,
                client.get_presets().await,
                client.get_config().await,
            ] {
                if let Err(e) = result {
                    eprintln!("Error: {}", e);
                }
            }
            Ok(client.diagnostics().await)
        }
    };

    match data {
        Ok(value) => println!("{}", serde_json::to_string_pretty(&value)?),
        Err(e) => eprintln!("Error: {}", e),
    }

    Ok(())
}
