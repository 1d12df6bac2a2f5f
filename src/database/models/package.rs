use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Package {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub price: BigDecimal,
    pub duration: Option<String>,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn price_type_matches_the_sqlx_numeric_binding() {
        // The direct bigdecimal pin must resolve to the same crate version
        // sqlx re-exports, or FromRow/bind on price stops compiling.
        let price = BigDecimal::from_str("4999.50").unwrap();
        let _: sqlx::types::BigDecimal = price.clone();

        let package = Package {
            id: 1,
            name: "Full stack".to_string(),
            description: None,
            price,
            duration: Some("6 months".to_string()),
            image: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let body = serde_json::to_value(&package).unwrap();
        assert_eq!(body["price"], "4999.50");
    }
}
