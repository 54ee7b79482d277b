use cosmwasm_std::{Decimal256, Uint128, Uint256};
use dao_actions_api::api::MAX_TOKEN_DECIMALS;
use dao_actions_api::error::ActionError::{InvalidAmount, InvalidDecimals};
use dao_actions_api::error::ActionResult;
use std::str::FromStr;

pub fn validate_decimals(decimals: u8) -> ActionResult<()> {
    if decimals > MAX_TOKEN_DECIMALS {
        return Err(InvalidDecimals { decimals });
    }

    Ok(())
}

/// Parses a human-readable amount, such as "8.029409", into base units of a token with the
/// given decimals.
///
/// Digits past the token's precision are rounded half away from zero, so "0.0000005" is 1 base
/// unit at 6 decimals and "2.5" is 3 base units at 0 decimals.
pub fn parse_base_units(amount: &str, decimals: u8) -> ActionResult<Uint128> {
    validate_decimals(decimals)?;

    let invalid = |msg: &str| InvalidAmount {
        amount: amount.to_string(),
        msg: msg.to_string(),
    };

    let trimmed = amount.trim();
    let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);
    if unsigned.starts_with('-') {
        return Err(invalid("amount must not be negative"));
    }

    let (whole, fraction) = unsigned.split_once('.').unwrap_or((unsigned, ""));
    if whole.is_empty() && fraction.is_empty() {
        return Err(invalid("not a number"));
    }
    if !whole.chars().chain(fraction.chars()).all(|c| c.is_ascii_digit()) {
        return Err(invalid("not a number"));
    }

    let scale = decimals as usize;
    let (kept, dropped) = fraction.split_at(fraction.len().min(scale));

    let digits = format!("{}{}{}", whole, kept, "0".repeat(scale - kept.len()));
    let digits = digits.trim_start_matches('0');

    let base = if digits.is_empty() {
        Uint128::zero()
    } else {
        Uint128::from_str(digits).map_err(|_| invalid("amount is too large"))?
    };

    match dropped.chars().next() {
        Some(first_dropped) if first_dropped >= '5' => base
            .checked_add(Uint128::one())
            .map_err(|_| invalid("amount is too large")),
        _ => Ok(base),
    }
}

/// Lenient form of [`parse_base_units`] for free-form input: anything that cannot be scaled
/// (not a number, negative, too large) gives zero.
pub fn to_base_units(amount: &str, decimals: u8) -> Uint128 {
    parse_base_units(amount, decimals).unwrap_or_default()
}

/// Scales a float amount to base units. Non-finite and negative inputs give zero.
///
/// Goes through the float's shortest decimal representation, so 8.029409 is read as
/// "8.029409" and not as its binary approximation.
pub fn f64_to_base_units(amount: f64, decimals: u8) -> Uint128 {
    if !amount.is_finite() {
        return Uint128::zero();
    }

    to_base_units(&amount.to_string(), decimals)
}

/// Scales a human amount to base units, rounding half away from zero at the token's precision.
pub fn try_to_base_units(amount: Decimal256, decimals: u8) -> ActionResult<Uint128> {
    validate_decimals(decimals)?;

    let divisor = Uint256::from(10u8).pow(u32::from(MAX_TOKEN_DECIMALS - decimals));

    let atomics = amount.atomics();
    let quotient = atomics.checked_div(divisor)?;
    let remainder = atomics.checked_rem(divisor)?;

    let rounded = if remainder.checked_mul(Uint256::from(2u8))? >= divisor {
        quotient.checked_add(Uint256::one())?
    } else {
        quotient
    };

    Uint128::try_from(rounded).map_err(|_| InvalidAmount {
        amount: amount.to_string(),
        msg: "amount is too large".to_string(),
    })
}

pub fn try_to_human_units(amount: Uint128, decimals: u8) -> ActionResult<Decimal256> {
    validate_decimals(decimals)?;

    Decimal256::from_atomics(amount, u32::from(decimals)).map_err(|e| InvalidAmount {
        amount: amount.to_string(),
        msg: e.to_string(),
    })
}

/// Lenient form of [`try_to_human_units`], giving zero on unsupported decimals.
pub fn to_human_units(amount: Uint128, decimals: u8) -> Decimal256 {
    try_to_human_units(amount, decimals).unwrap_or_default()
}

/// Scales a base-unit amount given as a string, e.g. a coin amount. Anything that is not an
/// unsigned integer gives zero.
pub fn to_human_units_str(amount: &str, decimals: u8) -> Decimal256 {
    Uint128::from_str(amount.trim())
        .map(|amount| to_human_units(amount, decimals))
        .unwrap_or_default()
}

/// Whether the amount has no more fractional digits than the token can represent.
pub fn fits_decimals(amount: Decimal256, decimals: u8) -> ActionResult<bool> {
    validate_decimals(decimals)?;

    let divisor = Uint256::from(10u8).pow(u32::from(MAX_TOKEN_DECIMALS - decimals));

    Ok(amount.atomics().checked_rem(divisor)?.is_zero())
}
