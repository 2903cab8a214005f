use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use shelfwise_core::date::{deserialize_optional_date, deserialize_optional_timestamp};
use shelfwise_core::{DomainError, DomainResult};

/// Turnover assumed when a record carries none (or a negative one).
pub const DEFAULT_TURNOVER_RATE: Decimal = Decimal::from_parts(5, 0, 0, false, 1);

/// Sales volume assumed when a record carries none (or a negative one).
pub const DEFAULT_SALES_VOLUME: Decimal = Decimal::from_parts(10, 0, 0, false, 0);

/// Inventory record as it comes back from a store.
///
/// Every field is optional here; required fields are enforced when converting
/// into an [`InventoryRecord`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InventoryDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_stock: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marked_price: Option<Decimal>,
    #[serde(
        default,
        deserialize_with = "deserialize_optional_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub expiry_date: Option<NaiveDate>,
    #[serde(
        default,
        deserialize_with = "deserialize_optional_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub manufacturing_date: Option<NaiveDate>,
    #[serde(
        default,
        deserialize_with = "deserialize_optional_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub date_received: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inventory_turnover_rate: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sales_volume: Option<Decimal>,
}

/// One product's current inventory state, validated and with defaults applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InventoryRecord {
    pub product_name: String,
    pub current_stock: u64,
    pub marked_price: Decimal,
    pub expiry_date: NaiveDate,
    pub manufacturing_date: Option<NaiveDate>,
    pub date_received: Option<DateTime<Utc>>,
    pub inventory_turnover_rate: Decimal,
    pub sales_volume: Decimal,
}

impl InventoryRecord {
    /// Minimal constructor; optional fields take their defaults.
    pub fn new(
        product_name: impl Into<String>,
        current_stock: u64,
        marked_price: Decimal,
        expiry_date: NaiveDate,
    ) -> Self {
        Self {
            product_name: product_name.into(),
            current_stock,
            marked_price,
            expiry_date,
            manufacturing_date: None,
            date_received: None,
            inventory_turnover_rate: DEFAULT_TURNOVER_RATE,
            sales_volume: DEFAULT_SALES_VOLUME,
        }
    }

    pub fn with_turnover(mut self, turnover: Decimal) -> Self {
        self.inventory_turnover_rate = non_negative_or(Some(turnover), DEFAULT_TURNOVER_RATE);
        self
    }

    pub fn with_sales_volume(mut self, sales_volume: Decimal) -> Self {
        self.sales_volume = non_negative_or(Some(sales_volume), DEFAULT_SALES_VOLUME);
        self
    }

    /// Whole days from `reference` until expiry. Negative once expired.
    ///
    /// Always derived on demand, never stored.
    pub fn remaining_life(&self, reference: NaiveDate) -> i64 {
        (self.expiry_date - reference).num_days()
    }

    /// Stock relative to smoothed sales velocity: `stock / (sales_volume + 1)`.
    ///
    /// Fails when `sales_volume` sits at the top of the decimal range.
    pub fn stock_pressure(&self) -> DomainResult<Decimal> {
        self.sales_volume
            .checked_add(Decimal::ONE)
            .and_then(|velocity| Decimal::from(self.current_stock).checked_div(velocity))
            .ok_or_else(|| {
                DomainError::validation(format!(
                    "stock pressure for `{}` is out of range",
                    self.product_name
                ))
            })
    }
}

impl TryFrom<InventoryDocument> for InventoryRecord {
    type Error = DomainError;

    fn try_from(doc: InventoryDocument) -> DomainResult<Self> {
        let product_name = match doc.product_name {
            Some(name) if !name.trim().is_empty() => name,
            _ => return Err(DomainError::missing_field("<unnamed>", "product_name")),
        };

        let current_stock = doc
            .current_stock
            .ok_or_else(|| DomainError::missing_field(&product_name, "current_stock"))?;
        let marked_price = doc
            .marked_price
            .ok_or_else(|| DomainError::missing_field(&product_name, "marked_price"))?;
        let expiry_date = doc
            .expiry_date
            .ok_or_else(|| DomainError::missing_field(&product_name, "expiry_date"))?;

        if marked_price.is_sign_negative() && !marked_price.is_zero() {
            return Err(DomainError::validation(format!(
                "marked_price for `{product_name}` must be non-negative"
            )));
        }

        Ok(Self {
            product_name,
            current_stock,
            marked_price,
            expiry_date,
            manufacturing_date: doc.manufacturing_date,
            date_received: doc.date_received,
            inventory_turnover_rate: non_negative_or(
                doc.inventory_turnover_rate,
                DEFAULT_TURNOVER_RATE,
            ),
            sales_volume: non_negative_or(doc.sales_volume, DEFAULT_SALES_VOLUME),
        })
    }
}

fn non_negative_or(value: Option<Decimal>, default: Decimal) -> Decimal {
    match value {
        Some(v) if !v.is_sign_negative() || v.is_zero() => v,
        _ => default,
    }
}
