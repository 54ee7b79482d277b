use crate::context::ActionContext;
use common::cw::testing::MOCK_CHAIN_ID;
use cosmwasm_std::{Addr, Decimal, Decimal256, Timestamp};
use dao_actions_api::api::{
    ChainConfig, DurationWithUnits, NativeTokenConfig, Token, TokenKey, TokenType, VestingStep,
};
use dao_actions_api::error::ActionResult;
use std::str::FromStr;

pub const DAO_ADDR: &str = "dao_core";
pub const VESTING_FACTORY: &str = "vesting_factory";
pub const STAKING_CONTRACT: &str = "staking_contract";
pub const VESTING_CONTRACT: &str = "vesting_contract";
pub const RECIPIENT: &str = "recipient";

pub const DENOM: &str = "utoken";
pub const OTHER_DENOM: &str = "uatom";
pub const CW20_TOKEN: &str = "cw20_token";
pub const CW20_DECIMALS: u8 = 8;

pub const UNBONDING_DURATION_SECONDS: u64 = 21 * 24 * 60 * 60;

pub fn stub_chain_config() -> ChainConfig {
    ChainConfig {
        chain_id: MOCK_CHAIN_ID.to_string(),
        native_tokens: vec![
            NativeTokenConfig {
                denom: DENOM.to_string(),
                symbol: "TOKEN".to_string(),
                decimals: 6,
            },
            NativeTokenConfig {
                denom: OTHER_DENOM.to_string(),
                symbol: "ATOM".to_string(),
                decimals: 6,
            },
        ],
        unbonding_duration_seconds: UNBONDING_DURATION_SECONDS,
    }
}

pub fn now() -> Timestamp {
    Timestamp::from_seconds(1_700_000_000)
}

pub fn cw20_token() -> Token {
    Token {
        token_type: TokenType::Cw20,
        denom_or_address: CW20_TOKEN.to_string(),
        decimals: CW20_DECIMALS,
        symbol: "CWT".to_string(),
    }
}

/// Context of a DAO with a vesting factory and the CW20 token already resolved.
pub fn stub_ctx() -> ActionResult<ActionContext> {
    Ok(
        ActionContext::new(stub_chain_config(), Addr::unchecked(DAO_ADDR), now())?
            .with_vesting_factory(Addr::unchecked(VESTING_FACTORY))
            .with_token(cw20_token()),
    )
}

pub fn native(denom: &str) -> TokenKey {
    TokenKey::native(denom)
}

pub fn cw20(addr: &str) -> TokenKey {
    TokenKey::cw20(addr)
}

pub fn dec(value: &str) -> Decimal256 {
    Decimal256::from_str(value).unwrap()
}

pub fn percent(value: u64) -> Decimal {
    Decimal::from_ratio(value, 1u8)
}

pub fn step(percent_value: u64, delay: DurationWithUnits) -> VestingStep {
    VestingStep {
        percent: percent(percent_value),
        delay,
    }
}
