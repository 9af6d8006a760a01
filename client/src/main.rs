use clap::{Parser, Subcommand};
use client::network::RelayClient;
use client::payload::build_payload;
use client::poller::Poller;
use log::info;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Relay server base URL
    #[arg(short = 's', long, env = "RELAY_SERVER", default_value = "http://127.0.0.1:3000")]
    server: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check that the relay is up
    Health,

    /// Push a player action
    Action {
        /// Action name, e.g. "build"
        #[arg(short, long)]
        action: Option<String>,

        /// Acting player
        #[arg(short, long)]
        username: Option<String>,

        /// Extra payload field as key=value (repeatable)
        #[arg(short, long = "field")]
        fields: Vec<String>,
    },

    /// Register a player
    Register {
        /// Player name
        #[arg(short, long)]
        username: Option<String>,

        /// Extra registration field as key=value (repeatable)
        #[arg(short, long = "field")]
        fields: Vec<String>,
    },

    /// Poll for the latest action
    Poll {
        /// Delay between polls in milliseconds
        #[arg(short, long, default_value = "1000")]
        interval_ms: u64,

        /// Stop after this many polls
        #[arg(short, long)]
        count: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let relay = RelayClient::new(&args.server)?;

    match args.command {
        Command::Health => {
            let message = relay.health().await?;
            info!("{}", message);
        }
        Command::Action {
            action,
            username,
            fields,
        } => {
            let payload = build_payload(action.as_deref(), username.as_deref(), &fields)?;
            let status = relay.push_action(&payload).await?;
            info!("Action sent: {}", status.status);
        }
        Command::Register { username, fields } => {
            let player = build_payload(None, username.as_deref(), &fields)?;
            let status = relay.register(&player).await?;
            info!("Registration: {}", status.status);
        }
        Command::Poll { interval_ms, count } => {
            let mut poller = Poller::new(relay, Duration::from_millis(interval_ms));

            tokio::select! {
                _ = poller.run(count, |message| println!("{}", message)) => {}
                _ = tokio::signal::ctrl_c() => {
                    info!("Received Ctrl+C, stopping poller");
                }
            }
        }
    }

    Ok(())
}
