use crate::actions::{
    action_data, ensure_valid, parse_execute, validate_address, validate_required,
    ActionTransform,
};
use crate::context::ActionContext;
use common::serde::SerdeExt;
use cosmwasm_std::Uint128;
use dao_actions_api::api::ActionKey::RegisterSlash;
use dao_actions_api::api::{ActionData, ActionKey, FieldError, MatchResult, RegisterSlashData};
use dao_actions_api::error::ActionResult;
use dao_actions_api::msg::{UnifiedMessage, VestingExecuteMsg};

/// Tells a vesting contract that a validator it delegated to was slashed, so that the slashed
/// amount is accounted for.
pub struct RegisterSlashAction;

fn parse_register_slash(msg: &UnifiedMessage) -> Option<RegisterSlashData> {
    match parse_execute::<VestingExecuteMsg>(msg)? {
        (
            vesting_contract,
            [],
            VestingExecuteMsg::RegisterSlash {
                validator,
                time,
                amount,
                during_unbonding,
            },
        ) => Some(RegisterSlashData {
            vesting_contract: vesting_contract.to_string(),
            validator,
            time,
            amount,
            during_unbonding,
        }),
        _ => None,
    }
}

impl ActionTransform for RegisterSlashAction {
    fn key(&self) -> ActionKey {
        RegisterSlash
    }

    fn defaults(&self, ctx: &ActionContext) -> ActionData {
        ActionData::RegisterSlash(RegisterSlashData {
            vesting_contract: String::new(),
            validator: String::new(),
            time: ctx.now,
            amount: Uint128::zero(),
            during_unbonding: false,
        })
    }

    fn validate(&self, data: &ActionData, ctx: &ActionContext) -> ActionResult<Vec<FieldError>> {
        let data = action_data!(data, RegisterSlash);

        let mut errors = vec![];
        validate_address(&mut errors, "vesting_contract", &data.vesting_contract);
        validate_required(&mut errors, "validator", &data.validator);
        if data.amount.is_zero() {
            errors.push(FieldError::new("amount", "amount must be greater than zero"));
        }
        if data.time > ctx.now {
            errors.push(FieldError::new("time", "slash cannot be in the future"));
        }

        Ok(errors)
    }

    fn encode(&self, data: &ActionData, ctx: &ActionContext) -> ActionResult<UnifiedMessage> {
        ensure_valid(self.validate(data, ctx)?)?;
        let data = action_data!(data, RegisterSlash);

        let register_slash = VestingExecuteMsg::RegisterSlash {
            validator: data.validator.clone(),
            time: data.time,
            amount: data.amount,
            during_unbonding: data.during_unbonding,
        };

        Ok(UnifiedMessage::wasm_execute(
            &data.vesting_contract,
            register_slash.to_json_value()?,
            vec![],
        ))
    }

    fn matches(&self, msg: &UnifiedMessage) -> bool {
        parse_register_slash(msg).is_some()
    }

    fn decode(&self, msg: &UnifiedMessage, _ctx: &ActionContext) -> ActionResult<MatchResult> {
        Ok(parse_register_slash(msg)
            .map(|data| MatchResult::Matched(ActionData::RegisterSlash(data)))
            .unwrap_or(MatchResult::NotMatched))
    }
}
