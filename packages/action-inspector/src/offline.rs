use anyhow::{bail, Context, Result};
use cosmwasm_std::{Addr, StdError};
use dao_actions::amount::validate_decimals;
use dao_actions::context::ChainStateQuerier;
use dao_actions_api::api::{ChainConfig, Token, TokenKey, TokenType};
use dao_actions_api::error::ActionError::UnknownDenom;
use dao_actions_api::error::ActionResult;

/// Chain state given on the command line, used in place of a chain connection.
pub struct OfflineChainState {
    pub config: ChainConfig,
    pub tokens: Vec<Token>,
    pub vesting_factory: Option<Addr>,
}

impl ChainStateQuerier for OfflineChainState {
    fn query_token(&self, key: &TokenKey) -> ActionResult<Token> {
        if let Some(token) = self.tokens.iter().find(|token| token.key() == *key) {
            return Ok(token.clone());
        }

        match key.token_type {
            TokenType::Native => {
                let native = self
                    .config
                    .native_token(&key.denom_or_address)
                    .ok_or_else(|| UnknownDenom {
                        denom: key.denom_or_address.clone(),
                    })?;

                Ok(Token {
                    token_type: TokenType::Native,
                    denom_or_address: native.denom.clone(),
                    decimals: native.decimals,
                    symbol: native.symbol.clone(),
                })
            }
            TokenType::Cw20 => Err(StdError::not_found(format!(
                "token {} (pass it with --token)",
                key.denom_or_address
            ))
            .into()),
        }
    }

    fn query_vesting_factory(&self, _dao_address: &Addr) -> ActionResult<Option<Addr>> {
        Ok(self.vesting_factory.clone())
    }
}

/// Parses a CW20 token given as `address:symbol:decimals`.
pub fn parse_cw20_token(value: &str) -> Result<Token> {
    let parts: Vec<&str> = value.split(':').collect();

    let (address, symbol, decimals) = match parts.as_slice() {
        [address, symbol, decimals] if !address.is_empty() && !symbol.is_empty() => {
            (address, symbol, decimals)
        }
        _ => bail!("expected a token as address:symbol:decimals, got '{}'", value),
    };

    let decimals: u8 = decimals
        .parse()
        .with_context(|| format!("invalid decimals of token {}", address))?;
    validate_decimals(decimals)?;

    Ok(Token {
        token_type: TokenType::Cw20,
        denom_or_address: address.to_string(),
        decimals,
        symbol: symbol.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use crate::offline::{parse_cw20_token, OfflineChainState};
    use cosmwasm_std::Addr;
    use dao_actions::context::ChainStateQuerier;
    use dao_actions_api::api::{ChainConfig, NativeTokenConfig, Token, TokenKey, TokenType};

    fn chain_state() -> OfflineChainState {
        OfflineChainState {
            config: ChainConfig {
                chain_id: "phoenix-1".to_string(),
                native_tokens: vec![NativeTokenConfig {
                    denom: "uluna".to_string(),
                    symbol: "LUNA".to_string(),
                    decimals: 6,
                }],
                unbonding_duration_seconds: 0,
            },
            tokens: vec![Token {
                token_type: TokenType::Cw20,
                denom_or_address: "token_addr".to_string(),
                decimals: 8,
                symbol: "TKN".to_string(),
            }],
            vesting_factory: Some(Addr::unchecked("factory")),
        }
    }

    #[test]
    fn token_is_parsed_from_argument() -> anyhow::Result<()> {
        let token = parse_cw20_token("token_addr:TKN:8")?;

        assert_eq!(token.key(), TokenKey::cw20("token_addr"));
        assert_eq!(token.symbol, "TKN");
        assert_eq!(token.decimals, 8);

        Ok(())
    }

    #[test]
    fn malformed_token_arguments_are_rejected() {
        assert!(parse_cw20_token("token_addr:TKN").is_err());
        assert!(parse_cw20_token(":TKN:6").is_err());
        assert!(parse_cw20_token("token_addr:TKN:six").is_err());
        assert!(parse_cw20_token("token_addr:TKN:19").is_err());
    }

    #[test]
    fn only_known_tokens_resolve() {
        let chain_state = chain_state();

        assert!(chain_state.query_token(&TokenKey::cw20("token_addr")).is_ok());
        assert!(chain_state.query_token(&TokenKey::native("uluna")).is_ok());
        assert!(chain_state.query_token(&TokenKey::cw20("other")).is_err());
        assert!(chain_state.query_token(&TokenKey::native("uatom")).is_err());
    }
}
