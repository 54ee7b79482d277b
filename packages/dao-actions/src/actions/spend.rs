use crate::actions::{
    action_data, decode_with_token, encode_token_amount, ensure_valid, parse_execute, single_coin,
    validate_address, validate_amount, ActionTransform,
};
use crate::amount::try_to_human_units;
use crate::context::ActionContext;
use common::serde::SerdeExt;
use cosmwasm_std::{coins, Decimal256, Uint128};
use cw20::Cw20ExecuteMsg;
use dao_actions_api::api::ActionKey::Spend;
use dao_actions_api::api::{
    ActionData, ActionKey, FieldError, MatchResult, SpendData, TokenKey, TokenType,
};
use dao_actions_api::error::ActionResult;
use dao_actions_api::msg::{BankMessage, UnifiedMessage};

/// Transfers treasury funds: a bank send for native tokens, a CW20 `transfer` for contract
/// tokens.
pub struct SpendAction;

/// Recipient, token and base-unit amount of a spend message.
fn parse_spend(msg: &UnifiedMessage) -> Option<(String, TokenKey, Uint128)> {
    if let UnifiedMessage::Bank(BankMessage::Send { to_address, amount }) = msg {
        let coin = single_coin(amount)?;
        return Some((
            to_address.clone(),
            TokenKey::native(coin.denom.clone()),
            coin.amount,
        ));
    }

    match parse_execute::<Cw20ExecuteMsg>(msg)? {
        (token, [], Cw20ExecuteMsg::Transfer { recipient, amount }) => {
            Some((recipient, TokenKey::cw20(token), amount))
        }
        _ => None,
    }
}

impl ActionTransform for SpendAction {
    fn key(&self) -> ActionKey {
        Spend
    }

    fn defaults(&self, ctx: &ActionContext) -> ActionData {
        ActionData::Spend(SpendData {
            recipient: String::new(),
            token: ctx.default_token(),
            amount: Decimal256::zero(),
        })
    }

    fn validate(&self, data: &ActionData, ctx: &ActionContext) -> ActionResult<Vec<FieldError>> {
        let data = action_data!(data, Spend);

        let mut errors = vec![];
        validate_address(&mut errors, "recipient", &data.recipient);
        validate_amount(&mut errors, ctx, "amount", &data.token, data.amount)?;

        Ok(errors)
    }

    fn encode(&self, data: &ActionData, ctx: &ActionContext) -> ActionResult<UnifiedMessage> {
        ensure_valid(self.validate(data, ctx)?)?;
        let data = action_data!(data, Spend);

        let (token, amount) = encode_token_amount(ctx, &data.token, data.amount)?;

        match token.token_type {
            TokenType::Native => Ok(UnifiedMessage::bank_send(
                &data.recipient,
                coins(amount.u128(), &token.denom_or_address),
            )),
            TokenType::Cw20 => {
                let transfer = Cw20ExecuteMsg::Transfer {
                    recipient: data.recipient.clone(),
                    amount,
                };
                Ok(UnifiedMessage::wasm_execute(
                    &token.denom_or_address,
                    transfer.to_json_value()?,
                    vec![],
                ))
            }
        }
    }

    fn matches(&self, msg: &UnifiedMessage) -> bool {
        parse_spend(msg).is_some()
    }

    fn decode(&self, msg: &UnifiedMessage, ctx: &ActionContext) -> ActionResult<MatchResult> {
        let (recipient, token_key, amount) = match parse_spend(msg) {
            Some(spend) => spend,
            None => return Ok(MatchResult::NotMatched),
        };

        decode_with_token(ctx, token_key, |token| {
            Ok(MatchResult::Matched(ActionData::Spend(SpendData {
                recipient,
                token: token.key(),
                amount: try_to_human_units(amount, token.decimals)?,
            })))
        })
    }

    fn required_tokens(&self, msg: &UnifiedMessage) -> Vec<TokenKey> {
        parse_spend(msg)
            .map(|(_, token, _)| vec![token])
            .unwrap_or_default()
    }
}
