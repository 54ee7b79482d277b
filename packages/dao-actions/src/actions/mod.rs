use crate::amount::{fits_decimals, to_human_units, try_to_base_units};
use crate::context::{ActionContext, TokenLookup};
use common::serde::{DeserdeExt, SerdeExt};
use cosmwasm_std::{to_json_binary, Coin, Decimal256, Uint128};
use cw20::Cw20ExecuteMsg;
use dao_actions_api::api::{ActionData, ActionKey, FieldError, MatchResult, Token, TokenKey};
use dao_actions_api::error::ActionError::{TokenResolutionFailed, Validation};
use dao_actions_api::error::ActionResult;
use dao_actions_api::msg::UnifiedMessage;
use serde::de::DeserializeOwned;
use serde::Serialize;

pub mod begin_vesting;
pub mod cancel_vesting;
pub mod execute;
pub mod items;
pub mod register_slash;
pub mod spend;
pub mod stake;

/// Two-way mapping between one action's form data and the on-chain message it produces.
///
/// Transforms hold no state, so a registry of them can be shared between threads that each
/// encode or decode with their own context.
pub trait ActionTransform: Send + Sync {
    fn key(&self) -> ActionKey;

    /// Form data a new action of this type starts out with.
    fn defaults(&self, ctx: &ActionContext) -> ActionData;

    /// User-correctable problems with the data. An empty list means the data can be encoded.
    fn validate(&self, data: &ActionData, ctx: &ActionContext) -> ActionResult<Vec<FieldError>>;

    /// Produces the message for the data. Refuses invalid data instead of emitting a malformed
    /// message.
    fn encode(&self, data: &ActionData, ctx: &ActionContext) -> ActionResult<UnifiedMessage>;

    /// Whether the message has this action's shape. Never fails and never needs token data.
    fn matches(&self, msg: &UnifiedMessage) -> bool;

    /// Extracts the action data from a message. Errors only when a token the message needs
    /// could not be resolved.
    fn decode(&self, msg: &UnifiedMessage, ctx: &ActionContext) -> ActionResult<MatchResult>;

    /// Tokens that must be resolved in the context before the message can be decoded.
    fn required_tokens(&self, _msg: &UnifiedMessage) -> Vec<TokenKey> {
        vec![]
    }
}

/// Unwraps the data of the given action variant, or returns `WrongActionData`.
macro_rules! action_data {
    ($data:expr, $variant:ident) => {
        match $data {
            dao_actions_api::api::ActionData::$variant(data) => data,
            other => {
                return Err(dao_actions_api::error::ActionError::WrongActionData {
                    expected: dao_actions_api::api::ActionKey::$variant,
                    actual: other.key(),
                })
            }
        }
    };
}

pub(crate) use action_data;

/// Contract, funds and typed inner message of a wasm execute, if the inner message parses as `T`.
pub(crate) fn parse_execute<T: DeserializeOwned>(
    msg: &UnifiedMessage,
) -> Option<(&str, &[Coin], T)> {
    let (contract, funds, inner) = msg.as_wasm_execute()?;

    let parsed = inner.to_t::<T>().ok()?;

    Some((contract, funds, parsed))
}

/// A CW20 `send` with its hook message decoded.
pub(crate) struct Cw20Send<T> {
    pub token: String,
    pub contract: String,
    pub amount: Uint128,
    pub hook: T,
}

pub(crate) fn parse_cw20_send<T: DeserializeOwned>(msg: &UnifiedMessage) -> Option<Cw20Send<T>> {
    let (token, funds, send) = parse_execute::<Cw20ExecuteMsg>(msg)?;

    if !funds.is_empty() {
        return None;
    }

    match send {
        Cw20ExecuteMsg::Send {
            contract,
            amount,
            msg,
        } => Some(Cw20Send {
            token: token.to_string(),
            contract,
            amount,
            hook: msg.to_t::<T>().ok()?,
        }),
        _ => None,
    }
}

/// Wraps a hook message into a CW20 `send` of `amount` to `contract`, executed on the token.
pub(crate) fn cw20_send_msg(
    token: &str,
    contract: &str,
    amount: Uint128,
    hook: &impl Serialize,
) -> ActionResult<UnifiedMessage> {
    let send = Cw20ExecuteMsg::Send {
        contract: contract.to_string(),
        amount,
        msg: to_json_binary(hook)?,
    };

    Ok(UnifiedMessage::wasm_execute(
        token,
        send.to_json_value()?,
        vec![],
    ))
}

/// Single coin of a native-token action's funds.
pub(crate) fn single_coin(funds: &[Coin]) -> Option<&Coin> {
    match funds {
        [coin] => Some(coin),
        _ => None,
    }
}

pub(crate) fn ensure_valid(errors: Vec<FieldError>) -> ActionResult<()> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(Validation { errors })
    }
}

/// Resolved token and base-unit amount of a human amount, for encoding.
pub(crate) fn encode_token_amount<'a>(
    ctx: &'a ActionContext,
    key: &TokenKey,
    amount: Decimal256,
) -> ActionResult<(&'a Token, Uint128)> {
    let token = ctx.token(key)?;

    let base_amount = try_to_base_units(amount, token.decimals)?;

    Ok((token, base_amount))
}

/// Runs `decode` with the token's metadata, or reports the token as pending.
pub(crate) fn decode_with_token<F>(
    ctx: &ActionContext,
    key: TokenKey,
    decode: F,
) -> ActionResult<MatchResult>
where
    F: FnOnce(&Token) -> ActionResult<MatchResult>,
{
    match ctx.token_lookup(&key) {
        TokenLookup::Resolved(token) => decode(token),
        TokenLookup::Pending => Ok(MatchResult::Pending { token: key }),
        TokenLookup::Failed(reason) => Err(TokenResolutionFailed {
            token: key,
            reason: reason.to_string(),
        }),
    }
}

pub(crate) fn validate_address(errors: &mut Vec<FieldError>, field: &str, address: &str) {
    if address.trim().is_empty() {
        errors.push(FieldError::new(field, "address is required"));
    } else if address.chars().any(char::is_whitespace) {
        errors.push(FieldError::new(field, "address must not contain whitespace"));
    }
}

pub(crate) fn validate_required(errors: &mut Vec<FieldError>, field: &str, value: &str) {
    if value.trim().is_empty() {
        errors.push(FieldError::new(field, "value is required"));
    }
}

/// Checks an amount of a token: non-zero, within the token's precision, and within the
/// treasury balance when it is known.
///
/// Precision and balance are only checked once the token is resolved.
pub(crate) fn validate_amount(
    errors: &mut Vec<FieldError>,
    ctx: &ActionContext,
    field: &str,
    key: &TokenKey,
    amount: Decimal256,
) -> ActionResult<()> {
    if amount.is_zero() {
        errors.push(FieldError::new(field, "amount must be greater than zero"));
        return Ok(());
    }

    let token = match ctx.token_lookup(key) {
        TokenLookup::Resolved(token) => token,
        TokenLookup::Pending | TokenLookup::Failed(_) => return Ok(()),
    };

    if !fits_decimals(amount, token.decimals)? {
        errors.push(FieldError::new(
            field,
            format!(
                "{} supports at most {} decimal places",
                token.symbol, token.decimals
            ),
        ));
        return Ok(());
    }

    let base_amount = match try_to_base_units(amount, token.decimals) {
        Ok(base_amount) => base_amount,
        Err(_) => {
            errors.push(FieldError::new(field, "amount is too large"));
            return Ok(());
        }
    };

    if let Some(balance) = ctx.balance(key) {
        if base_amount > balance {
            errors.push(FieldError::new(
                field,
                format!(
                    "amount exceeds the available balance of {} {}",
                    to_human_units(balance, token.decimals),
                    token.symbol
                ),
            ));
        }
    }

    Ok(())
}
