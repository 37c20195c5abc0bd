use clap::{Parser, Subcommand};
use dispute_ledger::config::Config;
use dispute_ledger::error::{Error, Result};
use dispute_ledger::logger::Logger;
use dispute_ledger::replay::replay_to_tip;
use dispute_ledger::state::{apply, ContentRights, CreatorProfile, Dispute, State};
use dispute_ledger::storage::{FileStorage, Storage};
use dispute_ledger::tx::{validate, SignedTx};
use dispute_ledger::wallet;
use std::fs;
use std::io::{self, Read};

#[derive(Parser)]
#[command(name = "dispute-ledger")]
#[command(about = "Dispute Ledger CLI - On-ledger arbitration state machine")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: "human" or "json"
    #[arg(short, long, default_value = "human")]
    pub format: String,

    /// Data directory path
    #[arg(short, long)]
    pub data_dir: Option<String>,

    /// Arbiter principal (overrides DISPUTE_LEDGER_ARBITER)
    #[arg(long)]
    pub arbiter: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the data directory
    Init,

    /// Apply a transaction
    Apply {
        /// Transaction JSON (or read from stdin if not provided)
        #[arg(short, long)]
        tx: Option<String>,

        /// Transaction file path
        #[arg(short = 'F', long)]
        file: Option<String>,

        /// Dry-run: validate but don't apply
        #[arg(long)]
        dry_run: bool,
    },

    /// Show one dispute
    Dispute {
        /// Dispute id
        id: u64,
    },

    /// List disputes, optionally filtered to one party
    Disputes {
        /// Party principal (optional, shows all if not provided)
        party: Option<String>,
    },

    /// Show a creator profile
    Creator {
        /// Creator profile id
        id: u64,
    },

    /// Show a content rights record
    Rights {
        /// Content rights id
        id: u64,
    },

    /// Create a wallet and print its address
    WalletNew,

    /// Sign a transaction JSON with a stored wallet
    Sign {
        /// Wallet address to sign with
        #[arg(short, long)]
        address: String,

        /// Transaction JSON (or read from stdin if not provided)
        #[arg(short, long)]
        tx: Option<String>,

        /// Transaction file path
        #[arg(short = 'F', long)]
        file: Option<String>,
    },
}

/// Reconstruct state from snapshot + log tail
fn load_state(storage: &FileStorage, arbiter: &str) -> Result<(State, u64)> {
    replay_to_tip(storage, arbiter)
}

/// Parse transaction from JSON string
fn parse_tx(json: &str) -> Result<SignedTx> {
    let tx: SignedTx = serde_json::from_str(json).map_err(|e| {
        Error::InvalidTransaction(format!("Failed to parse transaction JSON: {}", e))
    })?;
    Ok(tx)
}

/// Read transaction from file or stdin
fn read_tx(file: Option<&str>) -> Result<String> {
    match file {
        Some(path) => fs::read_to_string(path)
            .map_err(|e| Error::Storage(format!("Failed to read file {}: {}", path, e))),
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|e| Error::Storage(format!("Failed to read from stdin: {}", e)))?;
            Ok(buffer)
        }
    }
}

/// Format output based on format type
fn format_output<T: serde::Serialize + std::fmt::Debug>(data: &T, format: &str) -> Result<String> {
    match format {
        "json" => serde_json::to_string_pretty(data)
            .map_err(|e| Error::Storage(format!("Failed to serialize JSON: {}", e))),
        _ => Ok(format!("{:#?}", data)),
    }
}

pub fn run(cli: Cli) -> Result<()> {
    let mut config = Config::from_env();
    if let Some(dir) = cli.data_dir {
        config.set_data_dir(std::path::PathBuf::from(dir));
    }
    if cli.format == "json" {
        config.set_output_format("json".to_string());
    }
    if let Some(arbiter) = cli.arbiter {
        config.arbiter = arbiter;
    }

    let mut storage = FileStorage::new(&config);
    let arbiter = config.get_arbiter().to_string();

    match cli.command {
        Commands::Init => {
            fs::create_dir_all(config.get_data_dir())
                .map_err(|e| Error::Storage(format!("Failed to create data directory: {}", e)))?;
            Logger::info(&format!(
                "Initialized data directory at: {}",
                config.get_data_dir().display()
            ));
            Ok(())
        }

        Commands::Apply { tx, file, dry_run } => {
            let (state, mut last_tx_id) = load_state(&storage, &arbiter)?;

            let tx_json = match tx {
                Some(json) => json,
                None => read_tx(file.as_deref())?,
            };

            let signed_tx = parse_tx(&tx_json)?;
            if signed_tx.signature.is_some() {
                wallet::verify_signature(&signed_tx)?;
            }
            validate(&state, &signed_tx, &arbiter)?;

            if dry_run {
                println!("✓ Transaction is valid");
                println!("  Digest: {}", signed_tx.digest()?);
                return Ok(());
            }

            let (state, assigned) = apply(&state, &signed_tx, &arbiter)?;
            last_tx_id += 1;

            storage.append_tx(&signed_tx)?;
            storage.persist_state(&state, last_tx_id)?;

            println!("✓ Transaction applied successfully");
            println!("  Digest: {}", signed_tx.digest()?);
            if let Some(id) = assigned {
                println!("  Assigned id: {}", id);
            }

            Ok(())
        }

        Commands::Dispute { id } => {
            let (state, _) = load_state(&storage, &arbiter)?;

            // Reads never fail: an absent id is reported, not an error
            match state.get_dispute(id) {
                Some(dispute) => {
                    let output = DisputeOutput::new(id, dispute);
                    println!("{}", format_output(&output, &cli.format)?);
                }
                None => {
                    println!("Dispute {} not found", id);
                }
            }
            Ok(())
        }

        Commands::Disputes { party } => {
            let (state, _) = load_state(&storage, &arbiter)?;

            let disputes: Vec<DisputeOutput> = match party {
                Some(principal) => state
                    .disputes_for_party(&principal)
                    .into_iter()
                    .map(|(id, d)| DisputeOutput::new(id, d))
                    .collect(),
                None => state
                    .all_disputes()
                    .map(|(id, d)| DisputeOutput::new(*id, d))
                    .collect(),
            };

            let output = DisputeListOutput { disputes };
            println!("{}", format_output(&output, &cli.format)?);
            Ok(())
        }

        Commands::Creator { id } => {
            let (state, _) = load_state(&storage, &arbiter)?;

            match state.get_creator(id) {
                Some(profile) => {
                    let output = CreatorOutput::new(id, profile);
                    println!("{}", format_output(&output, &cli.format)?);
                }
                None => {
                    println!("Creator profile {} not found", id);
                }
            }
            Ok(())
        }

        Commands::Rights { id } => {
            let (state, _) = load_state(&storage, &arbiter)?;

            match state.get_rights(id) {
                Some(rights) => {
                    let output = RightsOutput::new(id, rights);
                    println!("{}", format_output(&output, &cli.format)?);
                }
                None => {
                    println!("Content rights {} not found", id);
                }
            }
            Ok(())
        }

        Commands::WalletNew => {
            let mut wallets = wallet::Wallets::new(config.get_wallets_path());
            let address = wallets.create_wallet()?;
            println!("✓ Created wallet {}", address);
            Ok(())
        }

        Commands::Sign { address, tx, file } => {
            let tx_json = match tx {
                Some(json) => json,
                None => read_tx(file.as_deref())?,
            };
            let unsigned = parse_tx(&tx_json)?;
            let wallets = wallet::Wallets::new(config.get_wallets_path());
            let signed = wallets.sign_transaction(&address, unsigned.kind)?;
            println!(
                "{}",
                serde_json::to_string_pretty(&signed)
                    .map_err(|e| Error::Storage(format!("Failed to serialize JSON: {}", e)))?
            );
            Ok(())
        }
    }
}

#[derive(Debug, serde::Serialize)]
struct DisputeOutput {
    id: u64,
    client: String,
    creator: String,
    description: String,
    status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    resolution: Option<String>,
    votes_for_client: u64,
    votes_for_creator: u64,
}

impl DisputeOutput {
    fn new(id: u64, dispute: &Dispute) -> Self {
        DisputeOutput {
            id,
            client: dispute.client.clone(),
            creator: dispute.creator.clone(),
            description: dispute.description.clone(),
            status: format!("{:?}", dispute.status),
            resolution: dispute.resolution.clone(),
            votes_for_client: dispute.votes_for_client,
            votes_for_creator: dispute.votes_for_creator,
        }
    }
}

#[derive(Debug, serde::Serialize)]
struct DisputeListOutput {
    disputes: Vec<DisputeOutput>,
}

#[derive(Debug, serde::Serialize)]
struct CreatorOutput {
    id: u64,
    owner: String,
    name: String,
    bio: String,
}

impl CreatorOutput {
    fn new(id: u64, profile: &CreatorProfile) -> Self {
        CreatorOutput {
            id,
            owner: profile.owner.clone(),
            name: profile.name.clone(),
            bio: profile.bio.clone(),
        }
    }
}

#[derive(Debug, serde::Serialize)]
struct RightsOutput {
    id: u64,
    owner: String,
    license: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    expiration: Option<u64>,
    transferable: bool,
}

impl RightsOutput {
    fn new(id: u64, rights: &ContentRights) -> Self {
        RightsOutput {
            id,
            owner: rights.owner.clone(),
            license: rights.license.clone(),
            expiration: rights.expiration,
            transferable: rights.transferable,
        }
    }
}
