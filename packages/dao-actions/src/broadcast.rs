use crate::lifecycle::ActionInstance;
use common::serde::json_value_to_binary;
use cosmwasm_std::{BankMsg, Binary, CosmosMsg, WasmMsg};
use dao_actions_api::api::{Fee, TxHash};
use dao_actions_api::error::ActionError::{
    EmptyMessageList, InvalidActionState, UnencodedStargateValue,
};
use dao_actions_api::error::ActionResult;
use dao_actions_api::msg::{BankMessage, StargateMessage, UnifiedMessage, WasmMessage};
use serde_json::Value;

/// Everything the broadcast collaborator needs to sign and send one transaction.
#[derive(Clone, Debug, PartialEq)]
pub struct SubmitRequest {
    pub sender: String,
    pub msgs: Vec<UnifiedMessage>,
    pub fee: Fee,
}

impl SubmitRequest {
    pub fn new(
        sender: impl Into<String>,
        msgs: Vec<UnifiedMessage>,
        fee: Fee,
    ) -> ActionResult<Self> {
        if msgs.is_empty() {
            return Err(EmptyMessageList);
        }

        Ok(SubmitRequest {
            sender: sender.into(),
            msgs,
            fee,
        })
    }

    /// Collects the messages of a proposal's actions. Every action has to be encoded, or be a
    /// raw message that no action claimed.
    pub fn from_instances(
        sender: impl Into<String>,
        instances: &[ActionInstance],
        fee: Fee,
    ) -> ActionResult<Self> {
        let msgs = instances
            .iter()
            .map(|instance| {
                instance.message().cloned().ok_or_else(|| InvalidActionState {
                    operation: "submitted".to_string(),
                })
            })
            .collect::<ActionResult<Vec<UnifiedMessage>>>()?;

        SubmitRequest::new(sender, msgs, fee)
    }

    pub fn cosmos_msgs(&self) -> ActionResult<Vec<CosmosMsg>> {
        self.msgs.iter().map(to_cosmos_msg).collect()
    }
}

/// Converts a message to the form the chain runtime executes, with inner contract messages
/// serialized to binary.
pub fn to_cosmos_msg(msg: &UnifiedMessage) -> ActionResult<CosmosMsg> {
    let cosmos_msg = match msg {
        UnifiedMessage::Bank(BankMessage::Send { to_address, amount }) => {
            CosmosMsg::Bank(BankMsg::Send {
                to_address: to_address.clone(),
                amount: amount.clone(),
            })
        }
        UnifiedMessage::Wasm(WasmMessage::Execute {
            contract_addr,
            funds,
            msg,
        }) => CosmosMsg::Wasm(WasmMsg::Execute {
            contract_addr: contract_addr.clone(),
            msg: json_value_to_binary(msg)?,
            funds: funds.clone(),
        }),
        UnifiedMessage::Wasm(WasmMessage::Instantiate {
            admin,
            code_id,
            label,
            msg,
            funds,
        }) => CosmosMsg::Wasm(WasmMsg::Instantiate {
            admin: admin.clone(),
            code_id: *code_id,
            msg: json_value_to_binary(msg)?,
            funds: funds.clone(),
            label: label.clone(),
        }),
        UnifiedMessage::Wasm(WasmMessage::Migrate {
            contract_addr,
            new_code_id,
            msg,
        }) => CosmosMsg::Wasm(WasmMsg::Migrate {
            contract_addr: contract_addr.clone(),
            new_code_id: *new_code_id,
            msg: json_value_to_binary(msg)?,
        }),
        UnifiedMessage::Stargate(StargateMessage { type_url, value }) => match value {
            // protobuf encoding of decoded values belongs to the chain codec
            Value::String(encoded) => CosmosMsg::Stargate {
                type_url: type_url.clone(),
                value: Binary::from_base64(encoded)?,
            },
            _ => {
                return Err(UnencodedStargateValue {
                    type_url: type_url.clone(),
                })
            }
        },
    };

    Ok(cosmos_msg)
}

/// Signs and sends a transaction. Implemented by the wallet layer, never by this crate.
pub trait Broadcaster {
    fn broadcast(&self, request: &SubmitRequest) -> ActionResult<TxHash>;
}
