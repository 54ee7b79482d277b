use cosmwasm_std::{Decimal, Decimal256, Timestamp, Uint128, Uint256};
use dao_actions_api::api::{VestingPoint, VestingStep, VestingValidity};
use dao_actions_api::error::ActionError::VestingTimeOverflow;
use dao_actions_api::error::ActionResult;

const NANOS_PER_SECOND: u64 = 1_000_000_000;

/// 100% expressed in the atomics of a `Decimal` percent.
const HUNDRED_PERCENT_ATOMICS: u128 = 100_000_000_000_000_000_000;

pub fn hundred_percent() -> Decimal {
    Decimal::from_ratio(100u8, 1u8)
}

/// Sums the step percents. The schedule is valid only if they add up to exactly 100.
///
/// An invalid schedule is reported, not rejected, so that it can still be previewed while
/// being edited.
pub fn validate_vesting_steps(steps: &[VestingStep]) -> ActionResult<VestingValidity> {
    let percent_sum = steps
        .iter()
        .try_fold(Decimal::zero(), |sum, step| sum.checked_add(step.percent))?;

    Ok(VestingValidity {
        percent_sum,
        is_valid: percent_sum == hundred_percent(),
    })
}

/// Computes the cumulative unlocked amount at the end of each step.
///
/// Step delays are relative to the previous step, the first one to `start`. A zero delay is
/// legal and gives a point with the same timestamp as the previous one.
pub fn compute_vesting_points(
    total: Decimal256,
    start: Timestamp,
    steps: &[VestingStep],
) -> ActionResult<Vec<VestingPoint>> {
    let hundred = Decimal256::from(hundred_percent());

    let mut timestamp = start;
    let mut cumulative_amount = Decimal256::zero();

    steps
        .iter()
        .map(|step| -> ActionResult<VestingPoint> {
            timestamp = add_delay(timestamp, step)?;

            let step_amount = total
                .checked_mul(Decimal256::from(step.percent))?
                .checked_div(hundred)?;
            cumulative_amount = cumulative_amount.checked_add(step_amount)?;

            Ok(VestingPoint {
                timestamp,
                cumulative_amount,
            })
        })
        .collect()
}

/// Time at which the last step unlocks, or None for an empty schedule.
pub fn vesting_finish_time(
    start: Timestamp,
    steps: &[VestingStep],
) -> ActionResult<Option<Timestamp>> {
    if steps.is_empty() {
        return Ok(None);
    }

    steps
        .iter()
        .try_fold(start, add_delay)
        .map(Some)
}

/// On-chain form of a schedule: (seconds since start, cumulative base units) per step.
///
/// Cumulative amounts are rounded down, so the last point of a valid schedule is exactly
/// `total`.
pub fn vesting_schedule_offsets(
    total: Uint128,
    steps: &[VestingStep],
) -> ActionResult<Vec<(u64, Uint128)>> {
    let mut offset = 0u64;
    let mut cumulative_percent = Decimal::zero();

    steps
        .iter()
        .map(|step| -> ActionResult<(u64, Uint128)> {
            offset = offset
                .checked_add(step_seconds(step)?)
                .ok_or(VestingTimeOverflow)?;
            cumulative_percent = cumulative_percent.checked_add(step.percent)?;

            let amount = total
                .checked_multiply_ratio(cumulative_percent.atomics(), HUNDRED_PERCENT_ATOMICS)?;

            Ok((offset, amount))
        })
        .collect()
}

/// Whether every step of the schedule ends on a whole number of base units of `total`.
///
/// Offsets of other schedules are rounded down, and decoding them gives back percents that
/// differ from the ones encoded.
pub fn vesting_offsets_are_exact(total: Uint128, steps: &[VestingStep]) -> ActionResult<bool> {
    let hundred_percent_atomics = Uint256::from(HUNDRED_PERCENT_ATOMICS);
    let mut cumulative_percent = Decimal::zero();

    for step in steps {
        cumulative_percent = cumulative_percent.checked_add(step.percent)?;

        let remainder = Uint256::from(total)
            .checked_mul(Uint256::from(cumulative_percent.atomics()))?
            .checked_rem(hundred_percent_atomics)?;
        if !remainder.is_zero() {
            return Ok(false);
        }
    }

    Ok(true)
}

/// Total length of the schedule in seconds.
pub fn vesting_duration_seconds(steps: &[VestingStep]) -> ActionResult<u64> {
    steps.iter().try_fold(0u64, |total, step| {
        total
            .checked_add(step_seconds(step)?)
            .ok_or(VestingTimeOverflow)
    })
}

fn step_seconds(step: &VestingStep) -> ActionResult<u64> {
    step.delay.to_seconds().ok_or(VestingTimeOverflow)
}

fn add_delay(timestamp: Timestamp, step: &VestingStep) -> ActionResult<Timestamp> {
    let delay_nanos = step_seconds(step)?
        .checked_mul(NANOS_PER_SECOND)
        .ok_or(VestingTimeOverflow)?;

    timestamp
        .nanos()
        .checked_add(delay_nanos)
        .map(Timestamp::from_nanos)
        .ok_or(VestingTimeOverflow)
}
