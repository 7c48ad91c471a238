//! Referral chests CLI - Command-line interface for the referral chests program
//!
//! Administers the chest table, sends joins and inspects participants of the
//! referral chests program.

#![forbid(unsafe_code)]

use anyhow::Result;
use clap::{Parser, Subcommand};
use referral_chests_cli::commands;
use referral_chests_cli::config::ReferralCliConfig;
use referral_chests_cli::utils::args::RepeatJoinPolicyArg;
use referral_chests_cli::utils::formatting::{parse_output_format, OutputFormat};
use referral_chests_sdk::ReferralClient;

#[derive(Parser, Debug)]
#[command(
    name = "referral-chests",
    version,
    about = "Command-line interface for the referral chests program"
)]
struct Cli {
    /// RPC endpoint URL
    #[arg(long)]
    rpc_url: Option<String>,

    /// Output format
    #[arg(long, value_enum)]
    output: Option<OutputFormat>,

    /// Program ID of the referral chests program
    #[arg(long)]
    program_id: Option<String>,

    /// Signing keypair file (defaults to the Solana CLI keypair)
    #[arg(long)]
    keypair: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create the registry (signer must be the program upgrade authority)
    InitRegistry {
        /// Comma-separated referral threshold of each of the 8 chests
        /// Example: 3,9,27,81,243,729,2187,6561
        #[arg(long)]
        referrals_to_unlock: Option<String>,

        /// What a join from an already registered participant does
        #[arg(long, value_enum, default_value = "recount")]
        repeat_join_policy: RepeatJoinPolicyArg,
    },

    /// Change the payout of one chest (administrator only)
    SetPayout {
        /// Chest index, 0 through 7
        #[arg(long)]
        chest: u8,

        /// New payout in lamports
        #[arg(long)]
        lamports: u64,
    },

    /// Join under a sponsor, paying the price of the sponsor's current chest
    Join {
        /// Sponsor address; ignored in favour of the recorded sponsor on repeat joins
        #[arg(long)]
        sponsor: String,

        /// Lamports to attach; defaults to the current price, excess is refunded
        #[arg(long)]
        paid: Option<u64>,
    },

    /// Preview a join without sending it
    Quote {
        /// Joining participant address
        #[arg(long)]
        joiner: String,

        /// Proposed sponsor address
        #[arg(long)]
        sponsor: String,

        /// Lamports that would be attached; defaults to the current price
        #[arg(long)]
        paid: Option<u64>,
    },

    /// Show one chest of the table
    Chest {
        /// Chest index, 0 through 7
        #[arg(long)]
        index: u8,
    },

    /// Show the whole chest table
    Chests,

    /// Show a participant's sponsor, tier and referral counters
    Participant {
        /// Participant address
        #[arg(long)]
        address: String,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = ReferralCliConfig::new();

    // Use configuration with CLI overrides
    let rpc_url = cli.rpc_url.as_deref().unwrap_or(&config.default_rpc_url);
    let output_format = match cli.output {
        Some(format) => format,
        None => parse_output_format(&config.default_output_format)?,
    };

    let client = if let Some(program_id) = &cli.program_id {
        ReferralClient::new_with_program_id(rpc_url, program_id)?
    } else {
        ReferralClient::new(rpc_url)?
    };

    match execute_command(&cli, &client, output_format, &config) {
        Ok(output) => println!("{output}"),
        Err(e) => {
            match output_format {
                OutputFormat::Human => eprintln!("Error: {e}"),
                OutputFormat::Json => {
                    let json_output = serde_json::json!({
                        "success": false,
                        "error": e.to_string()
                    });
                    println!("{}", serde_json::to_string_pretty(&json_output)?);
                }
            }
            std::process::exit(1);
        }
    }

    Ok(())
}

fn execute_command(
    cli: &Cli,
    client: &ReferralClient,
    output_format: OutputFormat,
    config: &ReferralCliConfig,
) -> Result<String> {
    let keypair = cli.keypair.as_deref();

    match &cli.command {
        Commands::InitRegistry {
            referrals_to_unlock,
            repeat_join_policy,
        } => commands::execute_init_registry(
            client,
            keypair,
            referrals_to_unlock.as_deref(),
            (*repeat_join_policy).into(),
            output_format,
        ),

        Commands::SetPayout { chest, lamports } => commands::execute_set_payout(
            client,
            keypair,
            *chest,
            *lamports,
            output_format,
            config,
        ),

        Commands::Join { sponsor, paid } => {
            commands::execute_join(client, keypair, sponsor, *paid, output_format, config)
        }

        Commands::Quote {
            joiner,
            sponsor,
            paid,
        } => commands::execute_quote(client, joiner, sponsor, *paid, output_format, config),

        Commands::Chest { index } => commands::execute_chest(client, *index, output_format, config),

        Commands::Chests => commands::execute_chests(client, output_format, config),

        Commands::Participant { address } => {
            commands::execute_participant(client, address, output_format, config)
        }
    }
}
