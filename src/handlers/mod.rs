pub mod bookings;
pub mod customers;
pub mod fleet;
pub mod settings;

use actix_web::web;
use bigdecimal::{BigDecimal, Zero};
use std::str::FromStr;

use crate::errors::AppError;

/// Run a store-touching closure on the blocking pool and flatten the result.
pub(crate) async fn blocking<T, F>(f: F) -> Result<T, AppError>
where
    F: FnOnce() -> Result<T, AppError> + Send + 'static,
    T: Send + 'static,
{
    web::block(f)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
}

/// Parse a decimal carried as a string, e.g. "150000" or "9.99".
pub(crate) fn parse_money(field: &str, value: &str) -> Result<BigDecimal, AppError> {
    BigDecimal::from_str(value)
        .map_err(|e| AppError::BadRequest(format!("Invalid {} '{}': {}", field, value, e)))
}

pub(crate) fn parse_opt_money(
    field: &str,
    value: Option<&str>,
) -> Result<Option<BigDecimal>, AppError> {
    value.map(|v| parse_money(field, v)).transpose()
}

pub(crate) fn parse_money_or_zero(field: &str, value: Option<&str>) -> Result<BigDecimal, AppError> {
    Ok(parse_opt_money(field, value)?.unwrap_or_else(BigDecimal::zero))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_money_accepts_plain_and_fractional_amounts() {
        assert_eq!(
            parse_money("fee", "150000").expect("parse failed"),
            BigDecimal::from(150_000)
        );
        assert!(parse_money("fee", "12.50").is_ok());
    }

    #[test]
    fn parse_money_rejects_garbage() {
        let err = parse_money("delivery fee", "abc").expect_err("should fail");
        assert!(matches!(err, AppError::BadRequest(_)));
        assert!(err.to_string().contains("delivery fee"));
    }

    #[test]
    fn missing_amount_defaults_to_zero() {
        assert_eq!(
            parse_money_or_zero("fee", None).expect("parse failed"),
            BigDecimal::zero()
        );
    }
}
