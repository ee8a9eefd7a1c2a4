//! Field constraints for products, checked before every write.

use thiserror::Error;

pub const NAME_MAX_LEN: usize = 100;
pub const DESCRIPTION_MAX_LEN: usize = 500;
pub const PRICE_MAX: f64 = 1_000_000.0;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{field} must not be blank")]
    Blank { field: &'static str },

    #[error("{field} exceeds maximum length of {max} characters")]
    TooLong { field: &'static str, max: usize },

    #[error("{field} must be greater than or equal to 0")]
    Negative { field: &'static str },

    #[error("{field} must be greater than 0")]
    NotPositive { field: &'static str },

    #[error("{field} must be less than or equal to {max}")]
    TooLarge { field: &'static str, max: f64 },

    #[error("{field} must be a finite number")]
    NotFinite { field: &'static str },

    #[error("{min_field} must not be greater than {max_field}")]
    InvertedRange {
        min_field: &'static str,
        max_field: &'static str,
    },
}

/// The full set of writable product fields, merged but not yet persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDraft {
    pub name: String,
    pub description: Option<String>,
    pub quantity: i32,
    pub price: f64,
}

impl ProductDraft {
    /// Checks every constraint and returns the normalized draft: trimmed name,
    /// price rounded to cents.
    pub fn validate(self) -> Result<Self, ValidationError> {
        let name = validate_name(&self.name)?;
        if let Some(description) = &self.description {
            check_max_len("description", description, DESCRIPTION_MAX_LEN)?;
        }
        if self.quantity < 0 {
            return Err(ValidationError::Negative { field: "quantity" });
        }
        let price = validate_price(self.price)?;

        Ok(Self {
            name,
            description: self.description,
            quantity: self.quantity,
            price,
        })
    }
}

pub fn validate_name(raw: &str) -> Result<String, ValidationError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(ValidationError::Blank { field: "name" });
    }
    check_max_len("name", name, NAME_MAX_LEN)?;
    Ok(name.to_string())
}

/// Case-folded form of a product name, computed here rather than in SQL
/// because SQLite's `LOWER` only folds ASCII.
pub fn fold_name(name: &str) -> String {
    name.trim().to_lowercase()
}

pub fn validate_price(price: f64) -> Result<f64, ValidationError> {
    if !price.is_finite() {
        return Err(ValidationError::NotFinite { field: "price" });
    }
    if price <= 0.0 {
        return Err(ValidationError::NotPositive { field: "price" });
    }
    if price > PRICE_MAX {
        return Err(ValidationError::TooLarge {
            field: "price",
            max: PRICE_MAX,
        });
    }
    let rounded = round_cents(price);
    // 0.001 rounds to 0.00
    if rounded <= 0.0 {
        return Err(ValidationError::NotPositive { field: "price" });
    }
    Ok(rounded)
}

pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn check_max_len(field: &'static str, value: &str, max: usize) -> Result<(), ValidationError> {
    if value.chars().count() > max {
        return Err(ValidationError::TooLong { field, max });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> ProductDraft {
        ProductDraft {
            name: "Laptop".into(),
            description: None,
            quantity: 10,
            price: 999.99,
        }
    }

    #[test]
    fn accepts_valid_draft() {
        assert_eq!(draft().validate().unwrap(), draft());
    }

    #[test]
    fn trims_name() {
        let d = ProductDraft {
            name: "  Desk Lamp \t".into(),
            ..draft()
        };
        assert_eq!(d.validate().unwrap().name, "Desk Lamp");
    }

    #[test]
    fn rejects_blank_name() {
        let d = ProductDraft {
            name: "   ".into(),
            ..draft()
        };
        assert_eq!(d.validate(), Err(ValidationError::Blank { field: "name" }));
    }

    #[test]
    fn name_length_counts_characters() {
        let ok = ProductDraft {
            name: "é".repeat(NAME_MAX_LEN),
            ..draft()
        };
        assert!(ok.validate().is_ok());

        let too_long = ProductDraft {
            name: "a".repeat(NAME_MAX_LEN + 1),
            ..draft()
        };
        assert_eq!(
            too_long.validate(),
            Err(ValidationError::TooLong {
                field: "name",
                max: NAME_MAX_LEN
            })
        );
    }

    #[test]
    fn rejects_long_description() {
        let d = ProductDraft {
            description: Some("x".repeat(DESCRIPTION_MAX_LEN + 1)),
            ..draft()
        };
        assert!(matches!(
            d.validate(),
            Err(ValidationError::TooLong {
                field: "description",
                ..
            })
        ));
    }

    #[test]
    fn rejects_negative_quantity() {
        let d = ProductDraft {
            quantity: -1,
            ..draft()
        };
        assert_eq!(
            d.validate(),
            Err(ValidationError::Negative { field: "quantity" })
        );
    }

    #[test]
    fn price_bounds() {
        assert_eq!(
            validate_price(0.0),
            Err(ValidationError::NotPositive { field: "price" })
        );
        assert_eq!(
            validate_price(-10.0),
            Err(ValidationError::NotPositive { field: "price" })
        );
        assert_eq!(
            validate_price(0.001),
            Err(ValidationError::NotPositive { field: "price" })
        );
        assert!(matches!(
            validate_price(1_000_000.01),
            Err(ValidationError::TooLarge { .. })
        ));
        assert_eq!(
            validate_price(f64::NAN),
            Err(ValidationError::NotFinite { field: "price" })
        );
        assert_eq!(validate_price(PRICE_MAX), Ok(PRICE_MAX));
    }

    #[test]
    fn rounds_price_to_cents() {
        assert_eq!(validate_price(19.999), Ok(20.0));
        assert_eq!(validate_price(10.123), Ok(10.12));
        assert_eq!(validate_price(999.99), Ok(999.99));
    }

    #[test]
    fn fold_name_handles_non_ascii() {
        assert_eq!(fold_name("Éclair"), "éclair");
        assert_eq!(fold_name("  ÜBER Straße "), "über straße");
        assert_eq!(fold_name("ÉCLAIR"), fold_name("éclair"));
    }

    #[test]
    fn error_messages() {
        let err = ValidationError::TooLong {
            field: "name",
            max: 100,
        };
        assert_eq!(err.to_string(), "name exceeds maximum length of 100 characters");
        assert_eq!(
            ValidationError::NotPositive { field: "price" }.to_string(),
            "price must be greater than 0"
        );
    }
}
