use std::any::type_name;

use cosmwasm_std::{from_json, Binary, StdError, StdResult};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

/// Serialization helpers for typed messages.
///
/// `to_json_vec` and `to_binary` produce the compact, field-ordered JSON that CosmWasm contracts
/// parse, and are used for payloads nested inside other messages (e.g. the `msg` of a CW20
/// `send`). `to_json_value` produces a decoded JSON object for messages that are carried in
/// their readable form.
pub trait SerdeExt {
    fn to_json_vec(&self) -> StdResult<Vec<u8>>
    where
        Self: Sized + Serialize,
    {
        serde_json_wasm::to_vec(self).map_err(|e| StdError::serialize_err(type_name::<Self>(), e))
    }

    fn to_binary(&self) -> StdResult<Binary>
    where
        Self: Sized + Serialize,
    {
        self.to_json_vec().map(Binary)
    }

    fn to_json_value(&self) -> StdResult<Value>
    where
        Self: Sized + Serialize,
    {
        serde_json::to_value(self).map_err(|e| StdError::serialize_err(type_name::<Self>(), e))
    }
}

impl<T: Serialize> SerdeExt for T {}

pub trait DeserdeExt {
    fn to_t<T: DeserializeOwned>(&self) -> StdResult<T>;
}

impl DeserdeExt for Binary {
    fn to_t<T: DeserializeOwned>(&self) -> StdResult<T> {
        from_json(self)
    }
}

impl DeserdeExt for Value {
    fn to_t<T: DeserializeOwned>(&self) -> StdResult<T> {
        serde_json::from_value(self.clone()).map_err(|e| StdError::parse_err(type_name::<T>(), e))
    }
}

/// Serializes an arbitrary JSON value into the binary form expected by the chain.
///
/// Goes through `serde_json` rather than `serde-json-wasm`, since decoded values may carry
/// floats which the latter refuses.
pub fn json_value_to_binary(value: &Value) -> StdResult<Binary> {
    serde_json::to_vec(value)
        .map(Binary)
        .map_err(|e| StdError::serialize_err(type_name::<Value>(), e))
}

/// Parses a binary payload into a JSON value, for payloads whose type is not known up front.
pub fn binary_to_json_value(binary: &Binary) -> StdResult<Value> {
    serde_json::from_slice(binary.as_slice())
        .map_err(|e| StdError::parse_err(type_name::<Value>(), e))
}
