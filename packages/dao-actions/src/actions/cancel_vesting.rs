use crate::actions::{action_data, ensure_valid, parse_execute, validate_address, ActionTransform};
use crate::context::ActionContext;
use common::serde::SerdeExt;
use dao_actions_api::api::ActionKey::CancelVesting;
use dao_actions_api::api::{ActionData, ActionKey, CancelVestingData, FieldError, MatchResult};
use dao_actions_api::error::ActionResult;
use dao_actions_api::msg::{UnifiedMessage, VestingExecuteMsg};

pub struct CancelVestingAction;

fn parse_cancel_vesting(msg: &UnifiedMessage) -> Option<String> {
    match parse_execute::<VestingExecuteMsg>(msg)? {
        (vesting_contract, [], VestingExecuteMsg::Cancel {}) => Some(vesting_contract.to_string()),
        _ => None,
    }
}

impl ActionTransform for CancelVestingAction {
    fn key(&self) -> ActionKey {
        CancelVesting
    }

    fn defaults(&self, _ctx: &ActionContext) -> ActionData {
        ActionData::CancelVesting(CancelVestingData {
            vesting_contract: String::new(),
        })
    }

    fn validate(&self, data: &ActionData, _ctx: &ActionContext) -> ActionResult<Vec<FieldError>> {
        let data = action_data!(data, CancelVesting);

        let mut errors = vec![];
        validate_address(&mut errors, "vesting_contract", &data.vesting_contract);

        Ok(errors)
    }

    fn encode(&self, data: &ActionData, ctx: &ActionContext) -> ActionResult<UnifiedMessage> {
        ensure_valid(self.validate(data, ctx)?)?;
        let data = action_data!(data, CancelVesting);

        Ok(UnifiedMessage::wasm_execute(
            &data.vesting_contract,
            VestingExecuteMsg::Cancel {}.to_json_value()?,
            vec![],
        ))
    }

    fn matches(&self, msg: &UnifiedMessage) -> bool {
        parse_cancel_vesting(msg).is_some()
    }

    fn decode(&self, msg: &UnifiedMessage, _ctx: &ActionContext) -> ActionResult<MatchResult> {
        Ok(match parse_cancel_vesting(msg) {
            Some(vesting_contract) => {
                MatchResult::Matched(ActionData::CancelVesting(CancelVestingData {
                    vesting_contract,
                }))
            }
            None => MatchResult::NotMatched,
        })
    }
}
