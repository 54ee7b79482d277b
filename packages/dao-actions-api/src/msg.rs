use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Coin, Timestamp, Uint128};
use serde_json::Value;

/// One on-chain instruction in its decoded form.
///
/// Mirrors the CosmWasm `CosmosMsg` envelope, except that inner contract messages are carried
/// as JSON objects instead of base64 binaries.
#[cw_serde]
pub enum UnifiedMessage {
    Bank(BankMessage),
    Wasm(WasmMessage),
    Stargate(StargateMessage),
}

#[cw_serde]
pub enum BankMessage {
    Send {
        to_address: String,
        amount: Vec<Coin>,
    },
}

#[cw_serde]
pub enum WasmMessage {
    Execute {
        contract_addr: String,
        funds: Vec<Coin>,
        msg: Value,
    },
    Instantiate {
        admin: Option<String>,
        code_id: u64,
        label: String,
        msg: Value,
        funds: Vec<Coin>,
    },
    Migrate {
        contract_addr: String,
        new_code_id: u64,
        msg: Value,
    },
}

/// Native module message. `value` is either the decoded protobuf object or its base64 encoding.
#[cw_serde]
pub struct StargateMessage {
    pub type_url: String,
    pub value: Value,
}

impl UnifiedMessage {
    pub fn wasm_execute(contract_addr: impl Into<String>, msg: Value, funds: Vec<Coin>) -> Self {
        UnifiedMessage::Wasm(WasmMessage::Execute {
            contract_addr: contract_addr.into(),
            funds,
            msg,
        })
    }

    pub fn bank_send(to_address: impl Into<String>, amount: Vec<Coin>) -> Self {
        UnifiedMessage::Bank(BankMessage::Send {
            to_address: to_address.into(),
            amount,
        })
    }

    /// Returns (contract, funds, msg) if this is a wasm execute.
    pub fn as_wasm_execute(&self) -> Option<(&str, &[Coin], &Value)> {
        match self {
            UnifiedMessage::Wasm(WasmMessage::Execute {
                contract_addr,
                funds,
                msg,
            }) => Some((contract_addr.as_str(), funds.as_slice(), msg)),
            _ => None,
        }
    }
}

/// Execute messages of a DAO staking contract.
#[cw_serde]
pub enum StakingExecuteMsg {
    Stake {},
}

/// CW20 receive hook of a DAO staking contract.
#[cw_serde]
pub enum StakingHookMsg {
    Stake {},
}

/// Execute messages of the DAO core contract's item store.
#[cw_serde]
pub enum DaoCoreExecuteMsg {
    SetItem { key: String, value: String },
    RemoveItem { key: String },
}

/// Item store key under which a DAO records the address of its vesting factory.
pub const VESTING_FACTORY_ITEM_KEY: &str = "vesting";

#[cw_serde]
pub enum DaoCoreQueryMsg {
    GetItem { key: String },
}

#[cw_serde]
pub struct GetItemResponse {
    pub item: Option<String>,
}

/// Execute messages of a vesting contract that the DAO can send after vesting has begun.
#[cw_serde]
pub enum VestingExecuteMsg {
    Cancel {},
    RegisterSlash {
        validator: String,
        time: Timestamp,
        amount: Uint128,
        during_unbonding: bool,
    },
}

#[cw_serde]
pub enum UncheckedDenom {
    Native(String),
    Cw20(String),
}

#[cw_serde]
pub enum Schedule {
    /// Vests linearly from start to `start + vesting_duration_seconds`.
    SaturatingLinear,
    /// (seconds since start, cumulative vested amount) pairs, linear between points.
    PiecewiseLinear(Vec<(u64, Uint128)>),
}

#[cw_serde]
pub struct VestingInstantiateMsg {
    pub owner: Option<String>,
    pub recipient: String,
    pub title: String,
    pub description: Option<String>,
    pub total: Uint128,
    pub denom: UncheckedDenom,
    pub schedule: Schedule,
    pub start_time: Option<Timestamp>,
    pub vesting_duration_seconds: u64,
    pub unbonding_duration_seconds: u64,
}

/// Execute messages of the vesting (payroll) factory.
#[cw_serde]
pub enum PayrollFactoryExecuteMsg {
    InstantiateNativePayrollContract {
        instantiate_msg: VestingInstantiateMsg,
        label: String,
    },
}

/// CW20 receive hook of the vesting (payroll) factory.
#[cw_serde]
pub enum PayrollFactoryHookMsg {
    InstantiatePayrollContract {
        instantiate_msg: VestingInstantiateMsg,
        label: String,
    },
}
