//! Client-side form validation.
//!
//! Every form is checked before a request is built; a failing form produces
//! [`ApiError::InvalidForm`] and nothing is sent.

use rust_decimal::Decimal;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::error::{ApiError, ApiResult, FieldError};
use crate::models::{is_supported_pair, TradeSide};

fn validate_pair(symbol: &str) -> Result<(), ValidationError> {
    if !is_supported_pair(symbol) {
        return Err(ValidationError::new("unsupported_pair"));
    }
    Ok(())
}

fn validate_positive(value: &Decimal) -> Result<(), ValidationError> {
    if *value <= Decimal::ZERO {
        return Err(ValidationError::new("not_positive"));
    }
    Ok(())
}

fn field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut fields: Vec<FieldError> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, issues)| {
            issues
                .iter()
                .map(move |issue| FieldError::new(field.to_string(), issue.to_string()))
        })
        .collect();
    fields.sort_by(|a, b| a.field.cmp(&b.field));
    fields
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        ApiError::InvalidForm {
            fields: field_errors(&errors),
        }
    }
}

/// Validate `form`, mapping failures to [`ApiError::InvalidForm`].
pub fn check<F: Validate>(form: &F) -> ApiResult<()> {
    form.validate().map_err(|errors| {
        tracing::debug!("Form rejected before sending: {}", errors);
        ApiError::from(errors)
    })
}

/// Sign-in form.
#[derive(Debug, Clone, Validate)]
pub struct LoginForm {
    #[validate(email(message = "Enter a valid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Account creation form.
#[derive(Debug, Clone, Validate)]
pub struct RegisterForm {
    #[validate(email(message = "Enter a valid email address"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

/// Trade entry form.
#[derive(Debug, Clone, Validate)]
pub struct TradeForm {
    #[validate(custom(function = "validate_pair", message = "Unsupported trading pair"))]
    pub symbol: String,
    pub side: TradeSide,
    #[validate(custom(function = "validate_positive", message = "Price must be positive"))]
    pub price: Decimal,
    #[validate(custom(function = "validate_positive", message = "Quantity must be positive"))]
    pub quantity: Decimal,
}

impl TradeForm {
    /// Price times quantity, shown before submitting. `None` when the
    /// product does not fit in a `Decimal`.
    pub fn estimated_total(&self) -> Option<Decimal> {
        self.price.checked_mul(self.quantity)
    }
}

/// Privilege escalation form.
#[derive(Debug, Clone, Validate)]
pub struct PromoteForm {
    #[validate(length(min = 1, message = "Secret key is required"))]
    pub secret: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(value: &str) -> Decimal {
        Decimal::from_str(value).unwrap()
    }

    fn trade(symbol: &str, price: &str, quantity: &str) -> TradeForm {
        TradeForm {
            symbol: symbol.to_string(),
            side: TradeSide::Buy,
            price: dec(price),
            quantity: dec(quantity),
        }
    }

    fn invalid_fields(result: ApiResult<()>) -> Vec<FieldError> {
        match result {
            Err(ApiError::InvalidForm { fields }) => fields,
            other => panic!("Expected InvalidForm, got {:?}", other),
        }
    }

    #[test]
    fn test_login_form() {
        let ok = LoginForm {
            email: "trader@example.com".into(),
            password: "x".into(),
        };
        assert!(check(&ok).is_ok());

        let bad = LoginForm {
            email: "not-an-email".into(),
            password: String::new(),
        };
        let fields = invalid_fields(check(&bad));
        assert_eq!(
            fields,
            vec![
                FieldError::new("email", "Enter a valid email address"),
                FieldError::new("password", "Password is required"),
            ]
        );
    }

    #[test]
    fn test_register_password_length() {
        let short = RegisterForm {
            email: "trader@example.com".into(),
            password: "12345".into(),
        };
        let fields = invalid_fields(check(&short));
        assert_eq!(fields[0].message, "Password must be at least 6 characters");

        let ok = RegisterForm {
            email: "trader@example.com".into(),
            password: "123456".into(),
        };
        assert!(check(&ok).is_ok());
    }

    #[test]
    fn test_trade_form_positive_amounts() {
        assert!(check(&trade("BTC/USD", "42000.50", "0.25")).is_ok());

        let fields = invalid_fields(check(&trade("BTC/USD", "0", "-1")));
        assert_eq!(
            fields,
            vec![
                FieldError::new("price", "Price must be positive"),
                FieldError::new("quantity", "Quantity must be positive"),
            ]
        );
    }

    #[test]
    fn test_trade_form_unsupported_pair() {
        let fields = invalid_fields(check(&trade("XRP/USD", "1", "1")));
        assert_eq!(fields, vec![FieldError::new("symbol", "Unsupported trading pair")]);
    }

    #[test]
    fn test_estimated_total() {
        let form = trade("ETH/USD", "2500.5", "2");
        assert_eq!(form.estimated_total(), Some(dec("5001.0")));
    }

    #[test]
    fn test_estimated_total_overflow() {
        let form = trade("BTC/USD", "100000000000000000000", "100000000000000000000");
        assert!(check(&form).is_ok());
        assert_eq!(form.estimated_total(), None);
    }

    #[test]
    fn test_promote_requires_secret() {
        let fields = invalid_fields(check(&PromoteForm { secret: String::new() }));
        assert_eq!(fields, vec![FieldError::new("secret", "Secret key is required")]);
    }
}
