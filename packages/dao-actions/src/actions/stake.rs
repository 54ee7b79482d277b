use crate::actions::{
    action_data, cw20_send_msg, decode_with_token, encode_token_amount, ensure_valid,
    parse_cw20_send, parse_execute, single_coin, validate_address, validate_amount,
    ActionTransform,
};
use crate::amount::try_to_human_units;
use crate::context::ActionContext;
use common::serde::SerdeExt;
use cosmwasm_std::{coins, Decimal256, Uint128};
use dao_actions_api::api::ActionKey::Stake;
use dao_actions_api::api::{
    ActionData, ActionKey, FieldError, MatchResult, StakeData, TokenKey, TokenType,
};
use dao_actions_api::error::ActionResult;
use dao_actions_api::msg::{StakingExecuteMsg, StakingHookMsg, UnifiedMessage};

/// Stakes treasury tokens into a DAO staking contract.
pub struct StakeAction;

/// Staking contract, token and base-unit amount of a stake message.
fn parse_stake(msg: &UnifiedMessage) -> Option<(String, TokenKey, Uint128)> {
    if let Some(send) = parse_cw20_send::<StakingHookMsg>(msg) {
        return Some((send.contract, TokenKey::cw20(send.token), send.amount));
    }

    let (staking_contract, funds, StakingExecuteMsg::Stake {}) =
        parse_execute::<StakingExecuteMsg>(msg)?;
    let coin = single_coin(funds)?;

    Some((
        staking_contract.to_string(),
        TokenKey::native(coin.denom.clone()),
        coin.amount,
    ))
}

impl ActionTransform for StakeAction {
    fn key(&self) -> ActionKey {
        Stake
    }

    fn defaults(&self, ctx: &ActionContext) -> ActionData {
        ActionData::Stake(StakeData {
            staking_contract: String::new(),
            token: ctx.default_token(),
            amount: Decimal256::zero(),
        })
    }

    fn validate(&self, data: &ActionData, ctx: &ActionContext) -> ActionResult<Vec<FieldError>> {
        let data = action_data!(data, Stake);

        let mut errors = vec![];
        validate_address(&mut errors, "staking_contract", &data.staking_contract);
        validate_amount(&mut errors, ctx, "amount", &data.token, data.amount)?;

        Ok(errors)
    }

    fn encode(&self, data: &ActionData, ctx: &ActionContext) -> ActionResult<UnifiedMessage> {
        ensure_valid(self.validate(data, ctx)?)?;
        let data = action_data!(data, Stake);

        let (token, amount) = encode_token_amount(ctx, &data.token, data.amount)?;

        match token.token_type {
            TokenType::Native => Ok(UnifiedMessage::wasm_execute(
                &data.staking_contract,
                StakingExecuteMsg::Stake {}.to_json_value()?,
                coins(amount.u128(), &token.denom_or_address),
            )),
            TokenType::Cw20 => cw20_send_msg(
                &token.denom_or_address,
                &data.staking_contract,
                amount,
                &StakingHookMsg::Stake {},
            ),
        }
    }

    fn matches(&self, msg: &UnifiedMessage) -> bool {
        parse_stake(msg).is_some()
    }

    fn decode(&self, msg: &UnifiedMessage, ctx: &ActionContext) -> ActionResult<MatchResult> {
        let (staking_contract, token_key, amount) = match parse_stake(msg) {
            Some(stake) => stake,
            None => return Ok(MatchResult::NotMatched),
        };

        decode_with_token(ctx, token_key, |token| {
            Ok(MatchResult::Matched(ActionData::Stake(StakeData {
                staking_contract,
                token: token.key(),
                amount: try_to_human_units(amount, token.decimals)?,
            })))
        })
    }

    fn required_tokens(&self, msg: &UnifiedMessage) -> Vec<TokenKey> {
        parse_stake(msg)
            .map(|(_, token, _)| vec![token])
            .unwrap_or_default()
    }
}
