use crate::actions::{action_data, ensure_valid, parse_execute, validate_required, ActionTransform};
use crate::context::ActionContext;
use common::serde::SerdeExt;
use dao_actions_api::api::ActionKey::{RemoveItem, SetItem};
use dao_actions_api::api::{
    ActionData, ActionKey, FieldError, MatchResult, RemoveItemData, SetItemData,
};
use dao_actions_api::error::ActionResult;
use dao_actions_api::msg::{DaoCoreExecuteMsg, UnifiedMessage};

/// Writes an entry of the DAO core's item store.
pub struct SetItemAction;

/// Deletes an entry of the DAO core's item store.
pub struct RemoveItemAction;

// Matched on shape only, the target contract is not compared to the DAO address.
fn parse_item_msg(msg: &UnifiedMessage) -> Option<DaoCoreExecuteMsg> {
    match parse_execute::<DaoCoreExecuteMsg>(msg)? {
        (_, [], item_msg) => Some(item_msg),
        _ => None,
    }
}

impl ActionTransform for SetItemAction {
    fn key(&self) -> ActionKey {
        SetItem
    }

    fn defaults(&self, _ctx: &ActionContext) -> ActionData {
        ActionData::SetItem(SetItemData {
            key: String::new(),
            value: String::new(),
        })
    }

    fn validate(&self, data: &ActionData, _ctx: &ActionContext) -> ActionResult<Vec<FieldError>> {
        let data = action_data!(data, SetItem);

        let mut errors = vec![];
        validate_required(&mut errors, "key", &data.key);

        Ok(errors)
    }

    fn encode(&self, data: &ActionData, ctx: &ActionContext) -> ActionResult<UnifiedMessage> {
        ensure_valid(self.validate(data, ctx)?)?;
        let data = action_data!(data, SetItem);

        let set_item = DaoCoreExecuteMsg::SetItem {
            key: data.key.clone(),
            value: data.value.clone(),
        };

        Ok(UnifiedMessage::wasm_execute(
            &ctx.dao_address,
            set_item.to_json_value()?,
            vec![],
        ))
    }

    fn matches(&self, msg: &UnifiedMessage) -> bool {
        matches!(parse_item_msg(msg), Some(DaoCoreExecuteMsg::SetItem { .. }))
    }

    fn decode(&self, msg: &UnifiedMessage, _ctx: &ActionContext) -> ActionResult<MatchResult> {
        Ok(match parse_item_msg(msg) {
            Some(DaoCoreExecuteMsg::SetItem { key, value }) => {
                MatchResult::Matched(ActionData::SetItem(SetItemData { key, value }))
            }
            _ => MatchResult::NotMatched,
        })
    }
}

impl ActionTransform for RemoveItemAction {
    fn key(&self) -> ActionKey {
        RemoveItem
    }

    fn defaults(&self, _ctx: &ActionContext) -> ActionData {
        ActionData::RemoveItem(RemoveItemData { key: String::new() })
    }

    fn validate(&self, data: &ActionData, _ctx: &ActionContext) -> ActionResult<Vec<FieldError>> {
        let data = action_data!(data, RemoveItem);

        let mut errors = vec![];
        validate_required(&mut errors, "key", &data.key);

        Ok(errors)
    }

    fn encode(&self, data: &ActionData, ctx: &ActionContext) -> ActionResult<UnifiedMessage> {
        ensure_valid(self.validate(data, ctx)?)?;
        let data = action_data!(data, RemoveItem);

        let remove_item = DaoCoreExecuteMsg::RemoveItem {
            key: data.key.clone(),
        };

        Ok(UnifiedMessage::wasm_execute(
            &ctx.dao_address,
            remove_item.to_json_value()?,
            vec![],
        ))
    }

    fn matches(&self, msg: &UnifiedMessage) -> bool {
        matches!(
            parse_item_msg(msg),
            Some(DaoCoreExecuteMsg::RemoveItem { .. })
        )
    }

    fn decode(&self, msg: &UnifiedMessage, _ctx: &ActionContext) -> ActionResult<MatchResult> {
        Ok(match parse_item_msg(msg) {
            Some(DaoCoreExecuteMsg::RemoveItem { key }) => {
                MatchResult::Matched(ActionData::RemoveItem(RemoveItemData { key }))
            }
            _ => MatchResult::NotMatched,
        })
    }
}
