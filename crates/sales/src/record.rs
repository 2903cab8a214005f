use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use shelfwise_core::date::deserialize_optional_date;
use shelfwise_core::{DomainError, DomainResult};

/// Sales-history entry as it comes back from a store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SalesDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_optional_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity_sold: Option<f64>,
}

/// One historical sales observation (a transaction or a day bucket).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesRecord {
    pub product_name: String,
    pub date: NaiveDate,
    pub quantity_sold: f64,
}

impl SalesRecord {
    pub fn new(product_name: impl Into<String>, date: NaiveDate, quantity_sold: f64) -> Self {
        Self {
            product_name: product_name.into(),
            date,
            quantity_sold,
        }
    }
}

impl TryFrom<SalesDocument> for SalesRecord {
    type Error = DomainError;

    fn try_from(doc: SalesDocument) -> DomainResult<Self> {
        let product_name = doc
            .product_name
            .ok_or_else(|| DomainError::missing_field("<unnamed>", "product_name"))?;
        let date = doc
            .date
            .ok_or_else(|| DomainError::missing_field(&product_name, "date"))?;
        let quantity_sold = doc
            .quantity_sold
            .ok_or_else(|| DomainError::missing_field(&product_name, "quantity_sold"))?;

        if !quantity_sold.is_finite() || quantity_sold < 0.0 {
            return Err(DomainError::validation(format!(
                "quantity_sold for `{product_name}` must be a non-negative number"
            )));
        }

        Ok(Self {
            product_name,
            date,
            quantity_sold,
        })
    }
}

/// Convert a whole batch of store documents.
///
/// A batch in which no document carries `product_name` or `quantity_sold`
/// is reported as a missing column; otherwise the first malformed document
/// fails the batch. An empty batch converts to an empty vector.
pub fn records_from_documents(docs: Vec<SalesDocument>) -> DomainResult<Vec<SalesRecord>> {
    if docs.is_empty() {
        return Ok(Vec::new());
    }
    if docs.iter().all(|d| d.product_name.is_none()) {
        return Err(DomainError::missing_column("product_name"));
    }
    if docs.iter().all(|d| d.quantity_sold.is_none()) {
        return Err(DomainError::missing_column("quantity_sold"));
    }
    docs.into_iter().map(SalesRecord::try_from).collect()
}
