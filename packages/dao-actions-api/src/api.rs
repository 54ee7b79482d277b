use crate::msg::UnifiedMessage;
use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Coin, Decimal, Decimal256, Timestamp, Uint128};
use serde_json::Value;
use std::fmt;
use strum_macros::Display;

/// Highest decimal precision a token may declare. Human amounts are held as `Decimal256`,
/// which carries 18 fractional digits.
pub const MAX_TOKEN_DECIMALS: u8 = 18;

pub type TxHash = String;

#[cw_serde]
#[derive(Copy, Eq, PartialOrd, Ord, Hash, Display)]
pub enum TokenType {
    Native,
    Cw20,
}

/// Identifies a fungible asset. Used as the key of the token metadata cache.
#[cw_serde]
#[derive(Eq, PartialOrd, Ord, Hash)]
pub struct TokenKey {
    pub token_type: TokenType,
    pub denom_or_address: String,
}

impl TokenKey {
    pub fn native(denom: impl Into<String>) -> Self {
        TokenKey {
            token_type: TokenType::Native,
            denom_or_address: denom.into(),
        }
    }

    pub fn cw20(address: impl Into<String>) -> Self {
        TokenKey {
            token_type: TokenType::Cw20,
            denom_or_address: address.into(),
        }
    }
}

impl fmt::Display for TokenKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.token_type {
            TokenType::Native => write!(f, "native:{}", self.denom_or_address),
            TokenType::Cw20 => write!(f, "cw20:{}", self.denom_or_address),
        }
    }
}

/// Resolved token metadata. Immutable once resolved.
#[cw_serde]
#[derive(Eq)]
pub struct Token {
    pub token_type: TokenType,
    pub denom_or_address: String,
    pub decimals: u8,
    pub symbol: String,
}

impl Token {
    pub fn key(&self) -> TokenKey {
        TokenKey {
            token_type: self.token_type,
            denom_or_address: self.denom_or_address.clone(),
        }
    }
}

#[cw_serde]
#[derive(Copy, Eq, Display)]
pub enum DurationUnits {
    Seconds,
    Minutes,
    Hours,
    Days,
    Weeks,
    Months,
    Years,
}

impl DurationUnits {
    /// Fixed length of one unit. Months are 30 days and years 365 days, regardless of calendar.
    pub fn seconds(&self) -> u64 {
        match self {
            DurationUnits::Seconds => 1,
            DurationUnits::Minutes => 60,
            DurationUnits::Hours => 60 * 60,
            DurationUnits::Days => 24 * 60 * 60,
            DurationUnits::Weeks => 7 * 24 * 60 * 60,
            DurationUnits::Months => 30 * 24 * 60 * 60,
            DurationUnits::Years => 365 * 24 * 60 * 60,
        }
    }
}

#[cw_serde]
#[derive(Copy, Eq)]
pub struct DurationWithUnits {
    pub value: u64,
    pub units: DurationUnits,
}

impl DurationWithUnits {
    pub fn new(value: u64, units: DurationUnits) -> Self {
        DurationWithUnits { value, units }
    }

    pub fn seconds(value: u64) -> Self {
        Self::new(value, DurationUnits::Seconds)
    }

    pub fn days(value: u64) -> Self {
        Self::new(value, DurationUnits::Days)
    }

    pub fn months(value: u64) -> Self {
        Self::new(value, DurationUnits::Months)
    }

    pub fn years(value: u64) -> Self {
        Self::new(value, DurationUnits::Years)
    }

    /// Length in seconds, or None if it does not fit in a u64.
    pub fn to_seconds(&self) -> Option<u64> {
        self.value.checked_mul(self.units.seconds())
    }

    /// Expresses a second count in the largest unit that divides it exactly.
    ///
    /// Messages only carry seconds, so units are display-only: `days(30)` comes back as
    /// `months(1)` and `hours(24)` as `days(1)`. Compare durations with [`Self::to_seconds`].
    pub fn from_seconds(seconds: u64) -> Self {
        const DESCENDING: [DurationUnits; 7] = [
            DurationUnits::Years,
            DurationUnits::Months,
            DurationUnits::Weeks,
            DurationUnits::Days,
            DurationUnits::Hours,
            DurationUnits::Minutes,
            DurationUnits::Seconds,
        ];

        if seconds == 0 {
            return Self::seconds(0);
        }

        DESCENDING
            .iter()
            .find(|units| seconds % units.seconds() == 0)
            .map(|units| Self::new(seconds / units.seconds(), *units))
            .unwrap_or_else(|| Self::seconds(seconds))
    }
}

#[cw_serde]
pub struct VestingStep {
    /// Share of the total unlocked by this step, in the range 0..=100.
    pub percent: Decimal,
    /// Time after the previous step (or the start, for the first step).
    pub delay: DurationWithUnits,
}

/// Derived point of a vesting schedule. Never stored, always recomputed from the steps.
#[cw_serde]
pub struct VestingPoint {
    pub timestamp: Timestamp,
    pub cumulative_amount: Decimal256,
}

/// Result of checking a vesting schedule. An invalid schedule can still be previewed.
#[cw_serde]
pub struct VestingValidity {
    pub percent_sum: Decimal,
    pub is_valid: bool,
}

#[cw_serde]
#[derive(Copy, Eq, Hash, PartialOrd, Ord, Display)]
pub enum ActionKey {
    Spend,
    Stake,
    BeginVesting,
    CancelVesting,
    RegisterSlash,
    SetItem,
    RemoveItem,
    Execute,
}

impl ActionKey {
    /// Position in which this action's matcher is tried; lower goes first.
    ///
    /// Contract-token actions are wrapped in a CW20 `send`, and every message a specific action
    /// produces is also a valid generic execute, so `Execute` must always come last.
    pub fn match_priority(&self) -> u8 {
        match self {
            ActionKey::BeginVesting => 0,
            ActionKey::Stake => 1,
            ActionKey::RegisterSlash => 2,
            ActionKey::CancelVesting => 3,
            ActionKey::SetItem => 4,
            ActionKey::RemoveItem => 5,
            ActionKey::Spend => 6,
            ActionKey::Execute => u8::MAX,
        }
    }
}

#[cw_serde]
pub enum ActionData {
    Spend(SpendData),
    Stake(StakeData),
    BeginVesting(BeginVestingData),
    CancelVesting(CancelVestingData),
    RegisterSlash(RegisterSlashData),
    SetItem(SetItemData),
    RemoveItem(RemoveItemData),
    Execute(ExecuteData),
}

impl ActionData {
    pub fn key(&self) -> ActionKey {
        match self {
            ActionData::Spend(_) => ActionKey::Spend,
            ActionData::Stake(_) => ActionKey::Stake,
            ActionData::BeginVesting(_) => ActionKey::BeginVesting,
            ActionData::CancelVesting(_) => ActionKey::CancelVesting,
            ActionData::RegisterSlash(_) => ActionKey::RegisterSlash,
            ActionData::SetItem(_) => ActionKey::SetItem,
            ActionData::RemoveItem(_) => ActionKey::RemoveItem,
            ActionData::Execute(_) => ActionKey::Execute,
        }
    }
}

#[cw_serde]
pub struct SpendData {
    pub recipient: String,
    pub token: TokenKey,
    pub amount: Decimal256,
}

#[cw_serde]
pub struct StakeData {
    pub staking_contract: String,
    pub token: TokenKey,
    pub amount: Decimal256,
}

#[cw_serde]
pub struct BeginVestingData {
    pub recipient: String,
    pub title: String,
    pub description: Option<String>,
    /// Address allowed to cancel the vesting. None makes it uncancellable.
    pub owner: Option<String>,
    pub token: TokenKey,
    /// Total amount to vest, in human units of `token`.
    pub amount: Decimal256,
    pub start_time: Timestamp,
    pub steps: Vec<VestingStep>,
}

#[cw_serde]
pub struct CancelVestingData {
    pub vesting_contract: String,
}

#[cw_serde]
pub struct RegisterSlashData {
    pub vesting_contract: String,
    pub validator: String,
    pub time: Timestamp,
    /// Slashed amount in base units of the vested token.
    pub amount: Uint128,
    pub during_unbonding: bool,
}

#[cw_serde]
pub struct SetItemData {
    pub key: String,
    pub value: String,
}

#[cw_serde]
pub struct RemoveItemData {
    pub key: String,
}

#[cw_serde]
pub struct ExecuteData {
    pub contract_address: String,
    /// Decoded execute message, must be a JSON object.
    pub message: Value,
    pub funds: Vec<ExecuteFunds>,
}

#[cw_serde]
pub struct ExecuteFunds {
    pub denom: String,
    pub amount: Decimal256,
}

/// Outcome of running a single action's decoder against a message.
#[cw_serde]
pub enum MatchResult {
    Matched(ActionData),
    NotMatched,
    /// The message has this action's shape, but a token it refers to is not resolved yet.
    Pending { token: TokenKey },
}

/// Outcome of scanning a message through a whole registry.
#[cw_serde]
pub enum DecodedAction {
    Matched {
        key: ActionKey,
        data: ActionData,
    },
    Pending {
        key: ActionKey,
        token: TokenKey,
    },
    /// The message has the action's shape, but its token could not be resolved at all.
    Unresolved {
        key: ActionKey,
        token: TokenKey,
        reason: String,
    },
    /// No registered action claims the message; rendered as opaque JSON.
    Raw(UnifiedMessage),
}

/// User-correctable problem with one form field.
#[cw_serde]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        FieldError {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

#[cw_serde]
pub struct NativeTokenConfig {
    pub denom: String,
    pub symbol: String,
    pub decimals: u8,
}

/// Chain-level configuration, handed explicitly to whatever builds an action context.
#[cw_serde]
pub struct ChainConfig {
    pub chain_id: String,
    /// Native tokens known to the chain. The first one is the default for new actions.
    pub native_tokens: Vec<NativeTokenConfig>,
    /// Unbonding period of the chain's staking module, written into new vesting contracts.
    pub unbonding_duration_seconds: u64,
}

impl ChainConfig {
    pub fn native_token(&self, denom: &str) -> Option<&NativeTokenConfig> {
        self.native_tokens.iter().find(|token| token.denom == denom)
    }
}

#[cw_serde]
pub struct Fee {
    pub amount: Vec<Coin>,
    pub gas_limit: u64,
}
