//! Cluster selection and command-line configuration.

use std::fmt;
use std::str::FromStr;

use clap::Parser;
use solana_sdk::pubkey::Pubkey;

use crate::error::{ClientError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cluster {
    Devnet,
    Testnet,
    MainnetBeta,
    Localnet,
    Custom(String),
}

impl Default for Cluster {
    fn default() -> Self {
        Cluster::Devnet
    }
}

impl Cluster {
    /// RPC endpoint for the cluster.
    pub fn url(&self) -> &str {
        match self {
            Cluster::Devnet => "https://api.devnet.solana.com",
            Cluster::Testnet => "https://api.testnet.solana.com",
            Cluster::MainnetBeta => "https://api.mainnet-beta.solana.com",
            Cluster::Localnet => "http://127.0.0.1:8899",
            Cluster::Custom(url) => url,
        }
    }

    /// Human-readable name used in the page title.
    pub fn label(&self) -> &str {
        match self {
            Cluster::Devnet => "Devnet",
            Cluster::Testnet => "Testnet",
            Cluster::MainnetBeta => "Mainnet Beta",
            Cluster::Localnet => "Localnet",
            Cluster::Custom(_) => "Custom",
        }
    }
}

impl fmt::Display for Cluster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cluster::Devnet => f.write_str("devnet"),
            Cluster::Testnet => f.write_str("testnet"),
            Cluster::MainnetBeta => f.write_str("mainnet-beta"),
            Cluster::Localnet => f.write_str("localnet"),
            Cluster::Custom(url) => f.write_str(url),
        }
    }
}

impl FromStr for Cluster {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "devnet" | "d" => Ok(Cluster::Devnet),
            "testnet" | "t" => Ok(Cluster::Testnet),
            "mainnet" | "mainnet-beta" | "m" => Ok(Cluster::MainnetBeta),
            "localnet" | "localhost" | "l" => Ok(Cluster::Localnet),
            other if other.starts_with("http://") || other.starts_with("https://") => {
                Ok(Cluster::Custom(s.trim().to_string()))
            }
            other => Err(ClientError::Config(format!("unknown cluster {other}"))),
        }
    }
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[arg(long, help = "Cluster name (devnet, testnet, mainnet-beta, localnet) or RPC URL")]
    pub cluster: Option<String>,
    #[arg(long, help = "Keypair file path or base58 secret key for the wallet")]
    pub keypair: Option<String>,
    #[arg(long, help = "Counter program id")]
    pub program_id: Option<String>,
    #[arg(long, help = "Do not connect the wallet on start-up")]
    pub no_auto_connect: bool,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub cluster: Cluster,
    pub keypair: String,
    pub program_id: Pubkey,
    pub auto_connect: bool,
}

impl AppConfig {
    pub fn from_args(args: Args) -> Result<Self> {
        Ok(Self {
            cluster: get_cluster(args.cluster)?,
            keypair: get_keypair(args.keypair),
            program_id: get_program_id(args.program_id)?,
            auto_connect: !args.no_auto_connect,
        })
    }
}

pub fn get_cluster(cli_cluster: Option<String>) -> Result<Cluster> {
    std::env::var("COUNTER_CLUSTER")
        .ok()
        .or(cli_cluster)
        .map(|name| name.parse())
        .unwrap_or(Ok(Cluster::default()))
}

pub fn get_keypair(cli_keypair: Option<String>) -> String {
    std::env::var("COUNTER_KEYPAIR")
        .ok()
        .or(cli_keypair)
        .unwrap_or_else(default_keypair_path)
}

pub fn get_program_id(cli_program_id: Option<String>) -> Result<Pubkey> {
    resolve_program_id(std::env::var("COUNTER_PROGRAM_ID").ok(), cli_program_id)
}

fn resolve_program_id(
    env_program_id: Option<String>,
    cli_program_id: Option<String>,
) -> Result<Pubkey> {
    match env_program_id.or(cli_program_id) {
        Some(id) => Pubkey::from_str(id.trim())
            .map_err(|e| ClientError::Config(format!("invalid program id {id}: {e}"))),
        None => Ok(solana_counter::ID),
    }
}

fn default_keypair_path() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{home}/.config/solana/id.json")
}
