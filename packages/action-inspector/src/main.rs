mod logger;
mod offline;

use crate::offline::{parse_cw20_token, OfflineChainState};
use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use cosmwasm_std::{Addr, Timestamp};
use dao_actions::broadcast::to_cosmos_msg;
use dao_actions::config::load_chain_config;
use dao_actions::context::ActionContext;
use dao_actions::registry::ActionRegistry;
use dao_actions_api::api::{ActionData, DecodedAction};
use dao_actions_api::msg::UnifiedMessage;
use log::{error, info, warn};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Parser)]
#[command(version, about = "Decodes and encodes DAO proposal actions")]
struct Cli {
    /// Chain config JSON file
    #[arg(long)]
    config: PathBuf,

    /// DAO core contract the proposal executes from
    #[arg(long)]
    dao: String,

    /// Vesting factory used by the DAO
    #[arg(long)]
    vesting_factory: Option<String>,

    /// CW20 token metadata as address:symbol:decimals, repeatable
    #[arg(long = "token")]
    tokens: Vec<String>,

    /// Block time in seconds, defaults to the current time
    #[arg(long)]
    now: Option<u64>,

    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode a JSON list of on-chain messages into actions
    Decode { messages: PathBuf },

    /// Encode a JSON list of action data into on-chain messages
    Encode {
        actions: PathBuf,
        /// Print messages in the form the chain executes, with binary contract messages
        #[arg(long)]
        cosmos: bool,
    },
}

fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();
    logger::init_logger(cli.verbose);

    let config = load_chain_config(read_file(&cli.config)?)?;
    info!("Loaded config of chain {}", config.chain_id);

    let chain_state = OfflineChainState {
        config: config.clone(),
        tokens: cli
            .tokens
            .iter()
            .map(|token| parse_cw20_token(token))
            .collect::<Result<Vec<_>>>()?,
        vesting_factory: cli.vesting_factory.map(Addr::unchecked),
    };

    let mut ctx = ActionContext::new(config, Addr::unchecked(cli.dao), block_time(cli.now)?)?;
    ctx.resolve_vesting_factory(&chain_state)?;
    ctx.resolve_tokens(
        &chain_state,
        chain_state.tokens.iter().map(|token| token.key()),
    );

    let registry = ActionRegistry::with_default_actions();

    let output = match cli.cmd {
        Commands::Decode { messages } => {
            let msgs: Vec<UnifiedMessage> = serde_json::from_slice(&read_file(&messages)?)
                .with_context(|| format!("parsing messages in {}", messages.display()))?;

            ctx.resolve_tokens(&chain_state, registry.required_tokens(&msgs));

            decode(&registry, &msgs, &ctx)?
        }
        Commands::Encode { actions, cosmos } => {
            let actions: Vec<ActionData> = serde_json::from_slice(&read_file(&actions)?)
                .with_context(|| format!("parsing actions in {}", actions.display()))?;

            encode(&registry, &actions, &ctx, cosmos)?
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}

fn decode(
    registry: &ActionRegistry,
    msgs: &[UnifiedMessage],
    ctx: &ActionContext,
) -> Result<Value> {
    let decoded = registry.decode_all(msgs, ctx);

    for (index, action) in decoded.iter().enumerate() {
        match action {
            DecodedAction::Matched { key, .. } => info!("Message {} is a {} action", index, key),
            DecodedAction::Pending { key, token } => {
                warn!("Message {} looks like {}, but token {} is unknown", index, key, token)
            }
            DecodedAction::Unresolved { key, token, reason } => {
                warn!("Message {} looks like {}, but token {}: {}", index, key, token, reason)
            }
            DecodedAction::Raw(_) => info!("Message {} is not a known action", index),
        }
    }

    Ok(serde_json::to_value(decoded)?)
}

fn encode(
    registry: &ActionRegistry,
    actions: &[ActionData],
    ctx: &ActionContext,
    cosmos: bool,
) -> Result<Value> {
    let mut invalid = false;
    for (index, action) in actions.iter().enumerate() {
        for field_error in registry.validate(action, ctx)? {
            error!("Action {} ({}): {}", index, action.key(), field_error);
            invalid = true;
        }
    }
    if invalid {
        bail!("some actions are invalid");
    }

    let msgs = registry.encode_all(actions, ctx)?;

    if cosmos {
        let cosmos_msgs = msgs
            .iter()
            .map(to_cosmos_msg)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(serde_json::to_value(cosmos_msgs)?)
    } else {
        Ok(serde_json::to_value(msgs)?)
    }
}

fn read_file(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).with_context(|| format!("reading {}", path.display()))
}

fn block_time(now: Option<u64>) -> Result<Timestamp> {
    let seconds = match now {
        Some(seconds) => seconds,
        None => SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs(),
    };

    Ok(Timestamp::from_seconds(seconds))
}
