//! Parley TUI entry point.

use clap::Parser;
use parley_app::ViewConfig;
use parley_client::ConnectConfig;
use parley_tui::Runtime;

/// Parley terminal chat client
#[derive(Parser, Debug)]
#[command(name = "parley-tui")]
#[command(about = "Terminal client for the Parley chat service")]
#[command(version)]
struct Args {
    /// Websocket URL of the chat service
    #[arg(short, long, default_value = "ws://127.0.0.1:5000/chat")]
    server: String,

    /// Nickname to chat under (a guest identity is used when omitted)
    #[arg(short, long)]
    nick: Option<String>,

    /// Keep only the last 100 transcript entries instead of 500
    #[arg(long)]
    compact_history: bool,

    /// Do not reconnect automatically after a connection loss
    #[arg(long)]
    no_reconnect: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let view = if args.compact_history { ViewConfig::compact() } else { ViewConfig::default() };
    let connect = ConnectConfig { reconnect: !args.no_reconnect, ..ConnectConfig::default() };

    let runtime = Runtime::new(args.server, args.nick.as_deref(), view, connect)?;
    Ok(runtime.run().await?)
}
