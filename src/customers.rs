//! Customers

use serde::{Deserialize, Serialize};

/// Customer details captured by value into each sale.
///
/// Carries no identity of its own; two sales to the same person hold two
/// independent copies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    /// Display name.
    pub name: String,

    /// Contact email address.
    pub email: String,

    /// Tax identifier.
    pub nit: String,
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn serializes_with_original_field_names() -> TestResult {
        let customer = Customer {
            name: "Ana".to_string(),
            email: "a@x.com".to_string(),
            nit: "1".to_string(),
        };

        let json = serde_json::to_value(&customer)?;

        assert_eq!(json["name"], "Ana");
        assert_eq!(json["email"], "a@x.com");
        assert_eq!(json["nit"], "1");

        Ok(())
    }
}
