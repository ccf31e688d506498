use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;
use validator::ValidationError;

use crate::errors::ServiceError;

/// Largest value a `DECIMAL(9, 2)` column holds.
pub const MAX_MONEY: Decimal = Decimal::from_parts(999_999_999, 0, 0, false, 2);

lazy_static! {
    pub static ref SLUG_RE: Regex = Regex::new(r"^[-a-zA-Z0-9_]+$").unwrap();
}

/// Money columns: non-negative, at most two decimals, fits `DECIMAL(9, 2)`.
pub fn validate_money(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        let mut err = ValidationError::new("non_negative");
        err.message = Some("must not be negative".into());
        return Err(err);
    }
    if value.normalize().scale() > 2 {
        let mut err = ValidationError::new("decimal_places");
        err.message = Some("must have at most 2 decimal places".into());
        return Err(err);
    }
    if *value > MAX_MONEY {
        let mut err = ValidationError::new("max_digits");
        err.message = Some("must have at most 9 digits".into());
        return Err(err);
    }
    Ok(())
}

pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("must not be blank".into());
        return Err(err);
    }
    Ok(())
}

/// `qty * unit_price`, rounded to cents. This is the snapshot stored on a
/// cart line; it fails instead of overflowing the column.
pub fn line_total(unit_price: Decimal, qty: i32) -> Result<Decimal, ServiceError> {
    if qty < 1 {
        return Err(ServiceError::ValidationError(format!(
            "qty: must be a positive integer, got {}",
            qty
        )));
    }

    let total = unit_price
        .checked_mul(Decimal::from(qty))
        .map(|t| t.round_dp(2))
        .ok_or_else(|| ServiceError::ValidationError("final_price: overflow".to_string()))?;

    if total > MAX_MONEY {
        return Err(ServiceError::ValidationError(format!(
            "final_price: {} exceeds {}",
            total, MAX_MONEY
        )));
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    #[test]
    fn max_money_is_nine_digits() {
        assert_eq!(MAX_MONEY, dec!(9999999.99));
    }

    #[test]
    fn money_rules() {
        assert!(validate_money(&dec!(0)).is_ok());
        assert!(validate_money(&dec!(19.99)).is_ok());
        assert!(validate_money(&dec!(19.990)).is_ok());
        assert!(validate_money(&dec!(-0.01)).is_err());
        assert!(validate_money(&dec!(1.999)).is_err());
        assert!(validate_money(&dec!(10000000.00)).is_err());
    }

    #[test]
    fn slug_shape() {
        assert!(SLUG_RE.is_match("rain-jacket_2021"));
        assert!(!SLUG_RE.is_match("rain jacket"));
        assert!(!SLUG_RE.is_match(""));
    }

    #[test]
    fn line_total_examples() {
        assert_eq!(line_total(dec!(19.99), 3).unwrap(), dec!(59.97));
        assert_eq!(line_total(dec!(24.99), 3).unwrap(), dec!(74.97));
        assert_eq!(line_total(dec!(0), 7).unwrap(), dec!(0));
    }

    #[test]
    fn line_total_rejects_bad_quantities_and_overflow() {
        assert_matches!(line_total(dec!(1), 0), Err(ServiceError::ValidationError(_)));
        assert_matches!(line_total(dec!(1), -2), Err(ServiceError::ValidationError(_)));
        assert_matches!(
            line_total(dec!(9999999.99), 2),
            Err(ServiceError::ValidationError(_))
        );
    }

    proptest! {
        #[test]
        fn line_total_is_exact_for_cent_prices(cents in 0i64..1_000_000, qty in 1i32..1_000) {
            let price = Decimal::new(cents, 2);
            let total = line_total(price, qty).unwrap();
            prop_assert_eq!(total, Decimal::new(cents * qty as i64, 2));
        }
    }
}
