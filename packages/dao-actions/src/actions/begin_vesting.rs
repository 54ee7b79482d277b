use crate::actions::{
    action_data, cw20_send_msg, decode_with_token, encode_token_amount, ensure_valid,
    parse_cw20_send, parse_execute, single_coin, validate_address, validate_amount,
    validate_required, ActionTransform,
};
use crate::amount::{try_to_base_units, try_to_human_units};
use crate::context::{ActionContext, TokenLookup};
use crate::vesting::{
    hundred_percent, validate_vesting_steps, vesting_duration_seconds, vesting_offsets_are_exact,
    vesting_schedule_offsets,
};
use common::serde::SerdeExt;
use cosmwasm_std::{coins, Decimal, Decimal256, Timestamp, Uint128};
use dao_actions_api::api::ActionKey::BeginVesting;
use dao_actions_api::api::{
    ActionData, ActionKey, BeginVestingData, DurationWithUnits, FieldError, MatchResult, Token,
    TokenKey, TokenType, VestingStep,
};
use dao_actions_api::error::ActionError::{
    EmptyVestingSchedule, InvalidVestingSchedule, VestingFactoryNotResolved,
};
use dao_actions_api::error::ActionResult;
use dao_actions_api::msg::PayrollFactoryExecuteMsg::InstantiateNativePayrollContract;
use dao_actions_api::msg::PayrollFactoryHookMsg::InstantiatePayrollContract;
use dao_actions_api::msg::{
    PayrollFactoryExecuteMsg, PayrollFactoryHookMsg, Schedule, UncheckedDenom, UnifiedMessage,
    VestingInstantiateMsg,
};

/// Creates a vesting contract through the DAO's vesting factory, funded with the total amount.
///
/// Native tokens are sent along with the factory call; contract tokens are sent to the factory
/// with a CW20 `send` whose hook carries the same instantiate message.
pub struct BeginVestingAction;

/// On-chain schedule of the steps: a single step vests linearly over its delay, several steps
/// become a piecewise linear curve through each step's cumulative amount.
fn vesting_schedule(total: Uint128, steps: &[VestingStep]) -> ActionResult<Schedule> {
    if steps.len() == 1 {
        return Ok(Schedule::SaturatingLinear);
    }

    let mut points = vec![(0, Uint128::zero())];
    points.extend(vesting_schedule_offsets(total, steps)?);

    Ok(Schedule::PiecewiseLinear(points))
}

/// Inverse of [`vesting_schedule`]. None if the schedule cannot be expressed as steps.
fn schedule_steps(
    schedule: &Schedule,
    total: Uint128,
    vesting_duration_seconds: u64,
) -> Option<Vec<VestingStep>> {
    let points = match schedule {
        Schedule::SaturatingLinear => {
            return Some(vec![VestingStep {
                percent: hundred_percent(),
                delay: DurationWithUnits::from_seconds(vesting_duration_seconds),
            }])
        }
        Schedule::PiecewiseLinear(points) => points,
    };

    let points = match points.split_first() {
        Some((first, rest)) if *first == (0, Uint128::zero()) => rest,
        _ => points.as_slice(),
    };

    if points.is_empty() || total.is_zero() {
        return None;
    }

    let hundred = Uint128::new(100);
    let mut previous = (0u64, Uint128::zero());
    let mut previous_percent = Decimal::zero();
    let mut steps = vec![];

    for &(offset, amount) in points {
        if amount < previous.1 || amount > total {
            return None;
        }
        let delay = offset.checked_sub(previous.0)?;

        // Cumulative percents round down; the point reaching the total is exactly 100.
        let cumulative_percent = if amount == total {
            hundred_percent()
        } else {
            Decimal::checked_from_ratio(amount.checked_mul(hundred).ok()?, total).ok()?
        };

        steps.push(VestingStep {
            percent: cumulative_percent.checked_sub(previous_percent).ok()?,
            delay: DurationWithUnits::from_seconds(delay),
        });
        previous = (offset, amount);
        previous_percent = cumulative_percent;
    }

    Some(steps)
}

/// Total in base units, once the token is resolved and the amount fits its precision.
fn base_total(ctx: &ActionContext, key: &TokenKey, amount: Decimal256) -> Option<Uint128> {
    match ctx.token_lookup(key) {
        TokenLookup::Resolved(token) => try_to_base_units(amount, token.decimals).ok(),
        TokenLookup::Pending | TokenLookup::Failed(_) => None,
    }
}

/// Deterministic instance label for a new vesting contract.
fn vesting_label(recipient: &str, start_time: Timestamp) -> String {
    format!("vesting:{}:{}", recipient, start_time.seconds())
}

/// Instantiate message of a begin-vesting message, with the token it vests.
fn parse_begin_vesting(msg: &UnifiedMessage) -> Option<(VestingInstantiateMsg, TokenKey)> {
    if let Some(send) = parse_cw20_send::<PayrollFactoryHookMsg>(msg) {
        let InstantiatePayrollContract {
            instantiate_msg, ..
        } = send.hook;

        if instantiate_msg.denom != UncheckedDenom::Cw20(send.token.clone())
            || instantiate_msg.total != send.amount
        {
            return None;
        }

        return Some((instantiate_msg, TokenKey::cw20(send.token)));
    }

    let (_, funds, InstantiateNativePayrollContract { instantiate_msg, .. }) =
        parse_execute::<PayrollFactoryExecuteMsg>(msg)?;

    let denom = match &instantiate_msg.denom {
        UncheckedDenom::Native(denom) => denom.clone(),
        UncheckedDenom::Cw20(_) => return None,
    };

    let coin = single_coin(funds)?;
    if coin.denom != denom || coin.amount != instantiate_msg.total {
        return None;
    }

    Some((instantiate_msg, TokenKey::native(denom)))
}

fn decode_vesting_data(
    instantiate_msg: VestingInstantiateMsg,
    token: &Token,
    ctx: &ActionContext,
) -> ActionResult<MatchResult> {
    let steps = match schedule_steps(
        &instantiate_msg.schedule,
        instantiate_msg.total,
        instantiate_msg.vesting_duration_seconds,
    ) {
        Some(steps) => steps,
        None => return Ok(MatchResult::NotMatched),
    };

    Ok(MatchResult::Matched(ActionData::BeginVesting(
        BeginVestingData {
            recipient: instantiate_msg.recipient,
            title: instantiate_msg.title,
            description: instantiate_msg.description,
            owner: instantiate_msg.owner,
            token: token.key(),
            amount: try_to_human_units(instantiate_msg.total, token.decimals)?,
            start_time: instantiate_msg.start_time.unwrap_or(ctx.now),
            steps,
        },
    )))
}

impl ActionTransform for BeginVestingAction {
    fn key(&self) -> ActionKey {
        BeginVesting
    }

    fn defaults(&self, ctx: &ActionContext) -> ActionData {
        ActionData::BeginVesting(BeginVestingData {
            recipient: String::new(),
            title: String::new(),
            description: None,
            owner: Some(ctx.dao_address.to_string()),
            token: ctx.default_token(),
            amount: Decimal256::zero(),
            start_time: ctx.now,
            steps: vec![VestingStep {
                percent: hundred_percent(),
                delay: DurationWithUnits::years(1),
            }],
        })
    }

    fn validate(&self, data: &ActionData, ctx: &ActionContext) -> ActionResult<Vec<FieldError>> {
        let data = action_data!(data, BeginVesting);

        let mut errors = vec![];
        validate_address(&mut errors, "recipient", &data.recipient);
        validate_required(&mut errors, "title", &data.title);
        if let Some(owner) = &data.owner {
            validate_address(&mut errors, "owner", owner);
        }
        validate_amount(&mut errors, ctx, "amount", &data.token, data.amount)?;

        if data.steps.is_empty() {
            errors.push(FieldError::new("steps", "at least one step is required"));
        } else {
            let validity = validate_vesting_steps(&data.steps)?;
            if !validity.is_valid {
                errors.push(FieldError::new(
                    "steps",
                    format!("percents must add up to 100, got {}", validity.percent_sum),
                ));
            } else if let Some(total) = base_total(ctx, &data.token, data.amount) {
                if !vesting_offsets_are_exact(total, &data.steps)? {
                    errors.push(FieldError::new(
                        "steps",
                        "every step must unlock a whole number of base units",
                    ));
                }
            }
            if vesting_duration_seconds(&data.steps).is_err() {
                errors.push(FieldError::new("steps", "schedule is too long"));
            }
        }

        Ok(errors)
    }

    fn encode(&self, data: &ActionData, ctx: &ActionContext) -> ActionResult<UnifiedMessage> {
        let vesting = action_data!(data, BeginVesting);

        if vesting.steps.is_empty() {
            return Err(EmptyVestingSchedule);
        }
        let validity = validate_vesting_steps(&vesting.steps)?;
        if !validity.is_valid {
            return Err(InvalidVestingSchedule {
                percent_sum: validity.percent_sum,
            });
        }

        ensure_valid(self.validate(data, ctx)?)?;

        let factory = ctx
            .vesting_factory
            .as_ref()
            .ok_or(VestingFactoryNotResolved)?;

        let (token, total) = encode_token_amount(ctx, &vesting.token, vesting.amount)?;

        let denom = match token.token_type {
            TokenType::Native => UncheckedDenom::Native(token.denom_or_address.clone()),
            TokenType::Cw20 => UncheckedDenom::Cw20(token.denom_or_address.clone()),
        };

        let instantiate_msg = VestingInstantiateMsg {
            owner: vesting.owner.clone(),
            recipient: vesting.recipient.clone(),
            title: vesting.title.clone(),
            description: vesting.description.clone(),
            total,
            denom,
            schedule: vesting_schedule(total, &vesting.steps)?,
            start_time: Some(vesting.start_time),
            vesting_duration_seconds: vesting_duration_seconds(&vesting.steps)?,
            unbonding_duration_seconds: ctx.config.unbonding_duration_seconds,
        };
        let label = vesting_label(&vesting.recipient, vesting.start_time);

        match token.token_type {
            TokenType::Native => Ok(UnifiedMessage::wasm_execute(
                factory,
                InstantiateNativePayrollContract {
                    instantiate_msg,
                    label,
                }
                .to_json_value()?,
                coins(total.u128(), &token.denom_or_address),
            )),
            TokenType::Cw20 => cw20_send_msg(
                &token.denom_or_address,
                factory.as_str(),
                total,
                &InstantiatePayrollContract {
                    instantiate_msg,
                    label,
                },
            ),
        }
    }

    fn matches(&self, msg: &UnifiedMessage) -> bool {
        parse_begin_vesting(msg).is_some()
    }

    fn decode(&self, msg: &UnifiedMessage, ctx: &ActionContext) -> ActionResult<MatchResult> {
        let (instantiate_msg, token_key) = match parse_begin_vesting(msg) {
            Some(begin_vesting) => begin_vesting,
            None => return Ok(MatchResult::NotMatched),
        };

        decode_with_token(ctx, token_key, |token| {
            decode_vesting_data(instantiate_msg, token, ctx)
        })
    }

    fn required_tokens(&self, msg: &UnifiedMessage) -> Vec<TokenKey> {
        parse_begin_vesting(msg)
            .map(|(_, token)| vec![token])
            .unwrap_or_default()
    }
}
