//! Percentage returns for open and closed positions.
//!
//! Every result is rounded half away from zero to two decimal places and is
//! `None` when its denominator is zero, an input price is missing, or the
//! result does not fit in a `Decimal`.

use rust_decimal::{Decimal, RoundingStrategy};

use super::holdings_model::PositionSide;
use crate::constants::PERCENT_DECIMALS;

/// Signed percentage move from `base` to `price`, unrounded.
pub fn signed_move(side: PositionSide, base: Decimal, price: Decimal) -> Option<Decimal> {
    if base.is_zero() {
        return None;
    }
    price
        .checked_sub(base)?
        .checked_div(base)?
        .checked_mul(Decimal::ONE_HUNDRED)?
        .checked_mul(side.multiplier())
}

/// Signed percentage move from `base` to `price`.
pub fn pct_change(side: PositionSide, base: Decimal, price: Decimal) -> Option<Decimal> {
    signed_move(side, base, price).map(round_pct)
}

/// Move since the previous session close.
pub fn daily_pct(
    side: PositionSide,
    current: Option<Decimal>,
    previous_close: Option<Decimal>,
) -> Option<Decimal> {
    pct_change(side, previous_close?, current?)
}

/// Move since the position was opened.
pub fn total_pct(side: PositionSide, purchase: Decimal, current: Option<Decimal>) -> Option<Decimal> {
    pct_change(side, purchase, current?)
}

/// Locked-in move of a closed position.
pub fn realized_pct(side: PositionSide, purchase: Decimal, close: Decimal) -> Option<Decimal> {
    pct_change(side, purchase, close)
}

pub fn round_pct(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(PERCENT_DECIMALS, RoundingStrategy::MidpointAwayFromZero)
}

/// Mean of the values, rounded like every other percentage.
pub fn average_pct(values: &[Decimal]) -> Option<Decimal> {
    if values.is_empty() {
        return None;
    }
    let sum = values
        .iter()
        .try_fold(Decimal::ZERO, |acc, value| acc.checked_add(*value))?;
    sum.checked_div(Decimal::from(values.len())).map(round_pct)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_total_pct_long() {
        assert_eq!(
            total_pct(PositionSide::Long, dec!(100), Some(dec!(110))),
            Some(dec!(10))
        );
        assert_eq!(
            total_pct(PositionSide::Long, dec!(200), Some(dec!(150))),
            Some(dec!(-25))
        );
    }

    #[test]
    fn test_total_pct_short_is_inverted() {
        assert_eq!(
            total_pct(PositionSide::Short, dec!(100), Some(dec!(110))),
            Some(dec!(-10))
        );
        assert_eq!(
            total_pct(PositionSide::Short, dec!(200), Some(dec!(150))),
            Some(dec!(25))
        );
    }

    #[test]
    fn test_total_pct_missing_or_zero() {
        assert_eq!(total_pct(PositionSide::Long, dec!(100), None), None);
        assert_eq!(total_pct(PositionSide::Long, dec!(0), Some(dec!(5))), None);
    }

    #[test]
    fn test_daily_pct() {
        assert_eq!(
            daily_pct(PositionSide::Long, Some(dec!(101)), Some(dec!(100))),
            Some(dec!(1))
        );
        assert_eq!(
            daily_pct(PositionSide::Short, Some(dec!(101)), Some(dec!(100))),
            Some(dec!(-1))
        );
        assert_eq!(daily_pct(PositionSide::Long, Some(dec!(101)), None), None);
        assert_eq!(daily_pct(PositionSide::Long, None, Some(dec!(100))), None);
        assert_eq!(
            daily_pct(PositionSide::Long, Some(dec!(101)), Some(dec!(0))),
            None
        );
    }

    #[test]
    fn test_realized_pct_rounds_two_places() {
        // 1/3 of a percent
        assert_eq!(
            realized_pct(PositionSide::Long, dec!(300), dec!(301)),
            Some(dec!(0.33))
        );
        // 2/3 of a percent
        assert_eq!(
            realized_pct(PositionSide::Long, dec!(300), dec!(302)),
            Some(dec!(0.67))
        );
        assert_eq!(realized_pct(PositionSide::Short, dec!(0), dec!(10)), None);
    }

    #[test]
    fn test_round_half_away_from_zero() {
        assert_eq!(round_pct(dec!(1.005)), dec!(1.01));
        assert_eq!(round_pct(dec!(-1.005)), dec!(-1.01));
        assert_eq!(round_pct(dec!(2.125)), dec!(2.13));
    }

    #[test]
    fn test_average_pct() {
        assert_eq!(average_pct(&[]), None);
        assert_eq!(average_pct(&[dec!(10), dec!(-5)]), Some(dec!(2.5)));
        assert_eq!(average_pct(&[dec!(1), dec!(1), dec!(2)]), Some(dec!(1.33)));
        assert_eq!(average_pct(&[Decimal::MAX, Decimal::MAX]), None);
    }

    #[test]
    fn test_overflowing_move_is_none() {
        // 0.000000000000000000000000001
        let tiny = Decimal::new(1, 27);
        assert_eq!(total_pct(PositionSide::Long, tiny, Some(dec!(190))), None);
        assert_eq!(total_pct(PositionSide::Short, tiny, Some(dec!(190))), None);
        assert_eq!(realized_pct(PositionSide::Long, tiny, dec!(190)), None);
        assert_eq!(signed_move(PositionSide::Long, tiny, dec!(190)), None);
        assert_eq!(
            signed_move(PositionSide::Long, dec!(1), Decimal::MAX),
            None
        );
    }
}
