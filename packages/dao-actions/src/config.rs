use crate::amount::validate_decimals;
use cosmwasm_std::from_json;
use dao_actions_api::api::{ChainConfig, NativeTokenConfig};
use dao_actions_api::error::ActionError::InvalidConfig;
use dao_actions_api::error::ActionResult;
use std::collections::HashSet;

/// Parses and validates a chain config from its JSON form.
pub fn load_chain_config(json: impl AsRef<[u8]>) -> ActionResult<ChainConfig> {
    let config: ChainConfig = from_json(json)?;

    validate_chain_config(&config)?;

    Ok(config)
}

pub fn validate_chain_config(config: &ChainConfig) -> ActionResult<()> {
    if config.chain_id.trim().is_empty() {
        return Err(InvalidConfig {
            msg: "chain_id must not be empty".to_string(),
        });
    }

    if config.native_tokens.is_empty() {
        return Err(InvalidConfig {
            msg: "at least one native token must be configured".to_string(),
        });
    }

    let mut denoms: HashSet<&str> = HashSet::new();
    for token in &config.native_tokens {
        validate_native_token(token)?;

        if !denoms.insert(token.denom.as_str()) {
            return Err(InvalidConfig {
                msg: format!("duplicate native token {}", token.denom),
            });
        }
    }

    Ok(())
}

fn validate_native_token(token: &NativeTokenConfig) -> ActionResult<()> {
    if token.denom.trim().is_empty() {
        return Err(InvalidConfig {
            msg: "native token denom must not be empty".to_string(),
        });
    }

    validate_decimals(token.decimals).map_err(|e| InvalidConfig {
        msg: format!("native token {}: {}", token.denom, e),
    })
}
