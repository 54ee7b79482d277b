use crate::api::{ActionKey, FieldError, TokenKey};
use cosmwasm_std::{
    CheckedFromRatioError, CheckedMultiplyRatioError, ConversionOverflowError, Decimal,
    DivideByZeroError, OverflowError, StdError,
};
use thiserror::Error;

pub type ActionResult<T> = Result<T, ActionError>;

#[derive(Error, Debug, PartialEq)]
pub enum ActionError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("Action failed validation: {}", join_field_errors(.errors))]
    Validation { errors: Vec<FieldError> },

    #[error("Invalid amount '{amount}': {msg}")]
    InvalidAmount { amount: String, msg: String },

    #[error("Token decimals must be at most 18, got {decimals}")]
    InvalidDecimals { decimals: u8 },

    #[error("Vesting schedule percents must add up to 100, got {percent_sum}")]
    InvalidVestingSchedule { percent_sum: Decimal },

    #[error("Vesting schedule has no steps")]
    EmptyVestingSchedule,

    #[error("Vesting schedule extends past the representable time range")]
    VestingTimeOverflow,

    #[error("Token {token} has not been resolved yet")]
    TokenNotResolved { token: TokenKey },

    #[error("Token {token} could not be resolved: {reason}")]
    TokenResolutionFailed { token: TokenKey, reason: String },

    #[error("Native denom {denom} is not known to this chain")]
    UnknownDenom { denom: String },

    #[error("The vesting factory address has not been resolved")]
    VestingFactoryNotResolved,

    #[error("Action {expected} was given data of action {actual}")]
    WrongActionData {
        expected: ActionKey,
        actual: ActionKey,
    },

    #[error("Action {action} is already registered")]
    DuplicateAction { action: ActionKey },

    #[error("Action {action} is not registered")]
    ActionNotRegistered { action: ActionKey },

    #[error("Stargate message {type_url} carries a decoded value; it must be protobuf-encoded before broadcasting")]
    UnencodedStargateValue { type_url: String },

    #[error("Cannot broadcast an empty message list")]
    EmptyMessageList,

    #[error("Action cannot be {operation} in its current state")]
    InvalidActionState { operation: String },

    #[error("Invalid chain config: {msg}")]
    InvalidConfig { msg: String },
}

impl From<OverflowError> for ActionError {
    fn from(e: OverflowError) -> Self {
        ActionError::Std(StdError::generic_err(e.to_string()))
    }
}

impl From<ConversionOverflowError> for ActionError {
    fn from(e: ConversionOverflowError) -> Self {
        ActionError::Std(StdError::generic_err(e.to_string()))
    }
}

impl From<CheckedMultiplyRatioError> for ActionError {
    fn from(e: CheckedMultiplyRatioError) -> Self {
        ActionError::Std(StdError::generic_err(e.to_string()))
    }
}

impl From<CheckedFromRatioError> for ActionError {
    fn from(e: CheckedFromRatioError) -> Self {
        ActionError::Std(StdError::generic_err(e.to_string()))
    }
}

impl From<DivideByZeroError> for ActionError {
    fn from(e: DivideByZeroError) -> Self {
        ActionError::Std(StdError::generic_err(e.to_string()))
    }
}

impl From<serde_json::Error> for ActionError {
    fn from(e: serde_json::Error) -> Self {
        ActionError::Std(StdError::generic_err(e.to_string()))
    }
}

fn join_field_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|error| error.to_string())
        .collect::<Vec<String>>()
        .join("; ")
}
