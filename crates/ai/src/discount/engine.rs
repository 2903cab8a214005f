use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use shelfwise_inventory::{InventoryDocument, InventoryRecord};

use crate::job::AdviceJob;
use crate::result::AdviceError;
use crate::scheduler::WorkerPool;

use super::ladder::{ActionStatus, TierInputs, decide};
use super::projection::project;

/// Discount recommendation and financial projection for one inventory record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyResult {
    pub product_name: String,
    pub current_stock: u64,
    pub marked_price: Decimal,
    pub remaining_life: i64,
    pub action_status: ActionStatus,
    pub final_discount_pct: Decimal,
    pub final_selling_price: Decimal,
    pub sold_after: u64,
    pub revenue_after: Decimal,
    pub loss_after: Decimal,
}

/// Evaluate a single record against `reference`.
///
/// Fails with [`AdviceError::InvalidInput`] naming the product when its
/// amounts cannot be represented.
pub fn evaluate(
    record: &InventoryRecord,
    reference: NaiveDate,
) -> Result<StrategyResult, AdviceError> {
    let inputs = TierInputs::from_record(record, reference)?;
    let status = decide(&inputs);
    let projection = project(record.current_stock, record.marked_price, status).ok_or_else(|| {
        AdviceError::InvalidInput(format!(
            "financial projection for `{}` is out of range",
            record.product_name
        ))
    })?;

    Ok(StrategyResult {
        product_name: record.product_name.clone(),
        current_stock: record.current_stock,
        marked_price: record.marked_price,
        remaining_life: inputs.remaining_life,
        action_status: status,
        final_discount_pct: status.discount_pct(),
        final_selling_price: projection.final_selling_price,
        sold_after: projection.sold_after,
        revenue_after: projection.revenue_after,
        loss_after: projection.loss_after,
    })
}

/// Evaluate every record and rank by discount, highest first.
///
/// The sort is stable: records with equal discounts keep their input order.
/// One failing record fails the batch; the first failure in input order is
/// reported.
pub fn evaluate_batch(
    records: &[InventoryRecord],
    reference: NaiveDate,
    pool: WorkerPool,
) -> Result<Vec<StrategyResult>, AdviceError> {
    let mut results = pool
        .map(records, |r| evaluate(r, reference))
        .into_iter()
        .collect::<Result<Vec<_>, _>>()?;
    results.sort_by(|a, b| b.final_discount_pct.cmp(&a.final_discount_pct));
    Ok(results)
}

/// Discount strategy over one inventory snapshot.
///
/// The reference date is fixed at construction so every record in the batch
/// shares the same time basis.
#[derive(Debug, Clone)]
pub struct DiscountStrategyJob {
    records: Vec<InventoryRecord>,
    reference: NaiveDate,
}

impl DiscountStrategyJob {
    pub fn new(records: Vec<InventoryRecord>, reference: NaiveDate) -> Self {
        Self { records, reference }
    }

    /// Build a job from raw store documents.
    ///
    /// Any document missing `current_stock`, `marked_price` or `expiry_date`
    /// fails the whole batch.
    pub fn from_documents(
        docs: Vec<InventoryDocument>,
        reference: NaiveDate,
    ) -> Result<Self, AdviceError> {
        let records = docs
            .into_iter()
            .map(InventoryRecord::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(records, reference))
    }
}

impl AdviceJob for DiscountStrategyJob {
    type Output = Vec<StrategyResult>;

    fn name(&self) -> &'static str {
        "discount_strategy"
    }

    fn run(&self, pool: WorkerPool) -> Result<Self::Output, AdviceError> {
        if self.records.is_empty() {
            return Err(AdviceError::no_data("inventory collection is empty"));
        }

        debug!(
            records = self.records.len(),
            reference = %self.reference,
            "evaluating discount strategy"
        );

        evaluate_batch(&self.records, self.reference, pool)
    }
}
