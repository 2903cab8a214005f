use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use shelfwise_core::{DomainError, DomainResult};

use crate::record::InventoryDocument;

/// Validated payload for registering a new product in the inventory store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProduct {
    pub product_name: String,
    pub current_stock: u64,
    pub marked_price: Decimal,
    pub expiry_date: NaiveDate,
    pub manufacturing_date: Option<NaiveDate>,
    pub date_received: Option<DateTime<Utc>>,
    pub inventory_turnover_rate: Option<Decimal>,
    pub sales_volume: Option<Decimal>,
}

impl NewProduct {
    /// Validate a loosely-typed payload.
    pub fn from_document(doc: InventoryDocument) -> DomainResult<Self> {
        let product_name = doc
            .product_name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .ok_or_else(|| DomainError::validation("product_name cannot be empty"))?;

        let current_stock = doc
            .current_stock
            .ok_or_else(|| DomainError::missing_field(&product_name, "current_stock"))?;
        let marked_price = doc
            .marked_price
            .ok_or_else(|| DomainError::missing_field(&product_name, "marked_price"))?;
        let expiry_date = doc
            .expiry_date
            .ok_or_else(|| DomainError::missing_field(&product_name, "expiry_date"))?;

        ensure_non_negative("marked_price", marked_price)?;
        if let Some(t) = doc.inventory_turnover_rate {
            ensure_non_negative("inventory_turnover_rate", t)?;
        }
        if let Some(v) = doc.sales_volume {
            ensure_non_negative("sales_volume", v)?;
        }
        if let Some(made) = doc.manufacturing_date {
            if made > expiry_date {
                return Err(DomainError::validation(
                    "manufacturing_date cannot be after expiry_date",
                ));
            }
        }

        Ok(Self {
            product_name,
            current_stock,
            marked_price,
            expiry_date,
            manufacturing_date: doc.manufacturing_date,
            date_received: doc.date_received,
            inventory_turnover_rate: doc.inventory_turnover_rate,
            sales_volume: doc.sales_volume,
        })
    }

    /// Produce the stored form, filling `date_received` with `received_at`
    /// when the payload did not carry one.
    pub fn into_document(self, received_at: DateTime<Utc>) -> InventoryDocument {
        InventoryDocument {
            product_name: Some(self.product_name),
            current_stock: Some(self.current_stock),
            marked_price: Some(self.marked_price),
            expiry_date: Some(self.expiry_date),
            manufacturing_date: self.manufacturing_date,
            date_received: Some(self.date_received.unwrap_or(received_at)),
            inventory_turnover_rate: self.inventory_turnover_rate,
            sales_volume: self.sales_volume,
        }
    }
}

fn ensure_non_negative(field: &str, value: Decimal) -> DomainResult<()> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(DomainError::validation(format!("{field} must be non-negative")));
    }
    Ok(())
}
