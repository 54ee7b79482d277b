use crate::actions::{
    action_data, encode_token_amount, ensure_valid, validate_address, validate_amount,
    ActionTransform,
};
use crate::amount::try_to_human_units;
use crate::context::{ActionContext, TokenLookup};
use cosmwasm_std::Coin;
use dao_actions_api::api::ActionKey::Execute;
use dao_actions_api::api::{
    ActionData, ActionKey, ExecuteData, ExecuteFunds, FieldError, MatchResult, TokenKey,
};
use dao_actions_api::error::ActionError::TokenResolutionFailed;
use dao_actions_api::error::ActionResult;
use dao_actions_api::msg::UnifiedMessage;
use itertools::Itertools;
use serde_json::{json, Value};

/// Generic contract call with native funds. Claims any wasm execute, so it is always tried last.
pub struct ExecuteAction;

fn parse_contract_execute(msg: &UnifiedMessage) -> Option<(&str, &[Coin], &Value)> {
    msg.as_wasm_execute()
        .filter(|(_, _, inner)| inner.is_object())
}

impl ActionTransform for ExecuteAction {
    fn key(&self) -> ActionKey {
        Execute
    }

    fn defaults(&self, _ctx: &ActionContext) -> ActionData {
        ActionData::Execute(ExecuteData {
            contract_address: String::new(),
            message: json!({}),
            funds: vec![],
        })
    }

    fn validate(&self, data: &ActionData, ctx: &ActionContext) -> ActionResult<Vec<FieldError>> {
        let data = action_data!(data, Execute);

        let mut errors = vec![];
        validate_address(&mut errors, "contract_address", &data.contract_address);

        match data.message.as_object() {
            None => errors.push(FieldError::new("message", "message must be a JSON object")),
            Some(message) if message.is_empty() => {
                errors.push(FieldError::new("message", "message must not be empty"))
            }
            Some(_) => {}
        }

        for (index, funds) in data.funds.iter().enumerate() {
            validate_amount(
                &mut errors,
                ctx,
                &format!("funds[{}].amount", index),
                &TokenKey::native(funds.denom.clone()),
                funds.amount,
            )?;
        }

        for denom in data.funds.iter().map(|funds| &funds.denom).duplicates() {
            errors.push(FieldError::new(
                "funds",
                format!("{} is sent more than once", denom),
            ));
        }

        Ok(errors)
    }

    fn encode(&self, data: &ActionData, ctx: &ActionContext) -> ActionResult<UnifiedMessage> {
        ensure_valid(self.validate(data, ctx)?)?;
        let data = action_data!(data, Execute);

        let funds = data
            .funds
            .iter()
            .map(|funds| -> ActionResult<Coin> {
                let (token, amount) =
                    encode_token_amount(ctx, &TokenKey::native(funds.denom.clone()), funds.amount)?;
                Ok(Coin {
                    denom: token.denom_or_address.clone(),
                    amount,
                })
            })
            .collect::<ActionResult<Vec<Coin>>>()?;

        Ok(UnifiedMessage::wasm_execute(
            &data.contract_address,
            data.message.clone(),
            funds,
        ))
    }

    fn matches(&self, msg: &UnifiedMessage) -> bool {
        parse_contract_execute(msg).is_some()
    }

    fn decode(&self, msg: &UnifiedMessage, ctx: &ActionContext) -> ActionResult<MatchResult> {
        let (contract_address, coins, message) = match parse_contract_execute(msg) {
            Some(execute) => execute,
            None => return Ok(MatchResult::NotMatched),
        };

        let mut funds = vec![];
        for coin in coins {
            let key = TokenKey::native(coin.denom.clone());
            let token = match ctx.token_lookup(&key) {
                TokenLookup::Resolved(token) => token,
                TokenLookup::Pending => return Ok(MatchResult::Pending { token: key }),
                TokenLookup::Failed(reason) => {
                    return Err(TokenResolutionFailed {
                        token: key,
                        reason: reason.to_string(),
                    })
                }
            };

            funds.push(ExecuteFunds {
                denom: coin.denom.clone(),
                amount: try_to_human_units(coin.amount, token.decimals)?,
            });
        }

        Ok(MatchResult::Matched(ActionData::Execute(ExecuteData {
            contract_address: contract_address.to_string(),
            message: message.clone(),
            funds,
        })))
    }

    fn required_tokens(&self, msg: &UnifiedMessage) -> Vec<TokenKey> {
        parse_contract_execute(msg)
            .map(|(_, coins, _)| {
                coins
                    .iter()
                    .map(|coin| TokenKey::native(coin.denom.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }
}
