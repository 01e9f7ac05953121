use std::str::FromStr;
use std::sync::Arc;

use clap::Parser;
use solana_counter_client::boundary::ErrorBoundary;
use solana_counter_client::config::{AppConfig, Args};
use solana_counter_client::connection::rpc_connection;
use solana_counter_client::notification;
use solana_counter_client::{
    Action, ClientError, CounterProgram, CounterView, KeypairWallet, WalletAdapter,
    WalletProvider,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

const HELP: &str = "\
Commands:
  connect      connect the wallet
  disconnect   disconnect the wallet
  init         initialize the counter
  inc          increment the counter
  dec          decrement the counter
  refresh      fetch the counter again
  show         redraw the screen
  reload       recover from a render error
  help         show this message
  quit         exit
";

enum Command {
    Connect,
    Disconnect,
    Run(Action),
    Show,
    Reload,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "connect" => Ok(Command::Connect),
            "disconnect" => Ok(Command::Disconnect),
            "init" | "initialize" => Ok(Command::Run(Action::Initialize)),
            "inc" | "increment" => Ok(Command::Run(Action::Increment)),
            "dec" | "decrement" => Ok(Command::Run(Action::Decrement)),
            "refresh" => Ok(Command::Run(Action::Refresh)),
            "" | "show" => Ok(Command::Show),
            "reload" => Ok(Command::Reload),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" | "q" => Ok(Command::Quit),
            other => Err(format!("Unknown command `{other}`, type `help`")),
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();
    dotenvy::dotenv().ok();

    let config = match AppConfig::from_args(Args::parse()) {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Invalid configuration");
            std::process::exit(2);
        }
    };

    if let Err(e) = run(config).await {
        error!(error = %e, "Counter app stopped");
        std::process::exit(1);
    }
}

async fn run(config: AppConfig) -> Result<(), ClientError> {
    info!(cluster = %config.cluster, program_id = %config.program_id, "Starting counter app");

    let connection = Arc::new(rpc_connection(&config.cluster));
    let wallets: Vec<Arc<dyn WalletAdapter>> = vec![Arc::new(KeypairWallet::new(config.keypair))];
    let provider = Arc::new(WalletProvider::new(
        config.cluster,
        connection.clone(),
        wallets,
        config.auto_connect,
    ));
    let (notifier, mut notifications) = notification::channel();
    let view = CounterView::new(
        provider.clone(),
        CounterProgram::new(connection, config.program_id),
        notifier,
    );

    if let Err(e) = provider.start().await {
        warn!(error = %e, "Auto-connect failed, use `connect` to retry");
    }
    let wallet_sync = view.spawn_wallet_sync();
    tokio::spawn({
        let view = view.clone();
        async move { view.mount().await }
    });

    let mut boundary = ErrorBoundary::default();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    println!("{HELP}");

    loop {
        tokio::select! {
            Some(notification) = notifications.recv() => println!("{notification}"),
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let command = match line.parse::<Command>() {
                    Ok(command) => command,
                    Err(message) => {
                        println!("{message}");
                        continue;
                    }
                };
                match command {
                    Command::Connect => {
                        if let Err(e) = provider.connect().await {
                            println!("[error] {e}");
                        }
                    }
                    Command::Disconnect => provider.disconnect().await,
                    Command::Run(action) => {
                        let view = view.clone();
                        tokio::spawn(async move { view.dispatch(action).await });
                    }
                    Command::Show => {}
                    Command::Reload => boundary.reset(),
                    Command::Help => {
                        println!("{HELP}");
                        continue;
                    }
                    Command::Quit => break,
                }
                let snapshot = view.snapshot().await;
                println!("{}", boundary.render(|| snapshot.render()));
            }
        }
    }

    wallet_sync.abort();
    Ok(())
}
