//! Tiered discount rules.
//!
//! The ladder is an ordered list of (predicate, outcome) pairs evaluated
//! top-down; the first matching rule wins. Later predicates assume every
//! earlier one failed, so the order must not change.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use shelfwise_core::DomainResult;
use shelfwise_inventory::InventoryRecord;

/// Action recommended for a product.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionStatus {
    #[serde(rename = "DONATE")]
    Donate,
    #[serde(rename = "Critical Clearance")]
    CriticalClearance,
    #[serde(rename = "Flash Sale")]
    FlashSale,
    #[serde(rename = "Heavy Discount")]
    HeavyDiscount,
    #[serde(rename = "Stock Clearance")]
    StockClearance,
    #[serde(rename = "Bulk Promo")]
    BulkPromo,
    #[serde(rename = "Keep Price")]
    KeepPrice,
}

impl ActionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionStatus::Donate => "DONATE",
            ActionStatus::CriticalClearance => "Critical Clearance",
            ActionStatus::FlashSale => "Flash Sale",
            ActionStatus::HeavyDiscount => "Heavy Discount",
            ActionStatus::StockClearance => "Stock Clearance",
            ActionStatus::BulkPromo => "Bulk Promo",
            ActionStatus::KeepPrice => "Keep Price",
        }
    }

    /// Discount percentage in [0, 100] attached to this action.
    pub fn discount_pct(&self) -> Decimal {
        match self {
            ActionStatus::Donate => dec!(90),
            ActionStatus::CriticalClearance => dec!(80),
            ActionStatus::FlashSale => dec!(40),
            ActionStatus::HeavyDiscount => dec!(60),
            ActionStatus::StockClearance => dec!(30),
            ActionStatus::BulkPromo => dec!(20),
            ActionStatus::KeepPrice => Decimal::ZERO,
        }
    }
}

impl core::fmt::Display for ActionStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The facts the ladder looks at for one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TierInputs {
    pub remaining_life: i64,
    pub turnover: Decimal,
    pub stock_pressure: Decimal,
    pub current_stock: u64,
}

impl TierInputs {
    pub fn from_record(record: &InventoryRecord, reference: NaiveDate) -> DomainResult<Self> {
        Ok(Self {
            remaining_life: record.remaining_life(reference),
            turnover: record.inventory_turnover_rate,
            stock_pressure: record.stock_pressure()?,
            current_stock: record.current_stock,
        })
    }
}

const FAST_TURNOVER: Decimal = dec!(0.5);
const HIGH_STOCK_PRESSURE: Decimal = dec!(1.5);
const BULK_STOCK: u64 = 50;

struct Rule {
    applies: fn(&TierInputs) -> bool,
    outcome: ActionStatus,
}

static LADDER: [Rule; 7] = [
    Rule {
        applies: expired,
        outcome: ActionStatus::Donate,
    },
    Rule {
        applies: within_three_days,
        outcome: ActionStatus::CriticalClearance,
    },
    Rule {
        applies: within_month_fast_moving,
        outcome: ActionStatus::FlashSale,
    },
    Rule {
        applies: within_month,
        outcome: ActionStatus::HeavyDiscount,
    },
    Rule {
        applies: within_quarter_overstocked,
        outcome: ActionStatus::StockClearance,
    },
    Rule {
        applies: within_quarter_bulk,
        outcome: ActionStatus::BulkPromo,
    },
    Rule {
        applies: always,
        outcome: ActionStatus::KeepPrice,
    },
];

fn expired(i: &TierInputs) -> bool {
    i.remaining_life <= 0
}

fn within_three_days(i: &TierInputs) -> bool {
    i.remaining_life <= 3
}

// Strict `>`: a record on the default turnover (0.5) routes to Heavy Discount.
fn within_month_fast_moving(i: &TierInputs) -> bool {
    i.remaining_life <= 30 && i.turnover > FAST_TURNOVER
}

fn within_month(i: &TierInputs) -> bool {
    i.remaining_life <= 30
}

fn within_quarter_overstocked(i: &TierInputs) -> bool {
    i.remaining_life <= 90 && i.stock_pressure > HIGH_STOCK_PRESSURE
}

fn within_quarter_bulk(i: &TierInputs) -> bool {
    i.remaining_life <= 90 && i.current_stock > BULK_STOCK
}

fn always(_: &TierInputs) -> bool {
    true
}

/// Walk the ladder and return the first matching action.
pub fn decide(inputs: &TierInputs) -> ActionStatus {
    LADDER
        .iter()
        .find(|rule| (rule.applies)(inputs))
        .map(|rule| rule.outcome)
        .unwrap_or(ActionStatus::KeepPrice)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(remaining_life: i64) -> TierInputs {
        TierInputs {
            remaining_life,
            turnover: dec!(0.5),
            stock_pressure: dec!(1),
            current_stock: 10,
        }
    }

    #[test]
    fn expired_always_donates() {
        for life in [-400, -1, 0] {
            let i = TierInputs {
                turnover: dec!(9),
                stock_pressure: dec!(100),
                current_stock: 10_000,
                ..inputs(life)
            };
            assert_eq!(decide(&i), ActionStatus::Donate);
        }
    }

    #[test]
    fn tier_boundaries() {
        assert_eq!(decide(&inputs(1)), ActionStatus::CriticalClearance);
        assert_eq!(decide(&inputs(3)), ActionStatus::CriticalClearance);
        assert_eq!(decide(&inputs(4)), ActionStatus::HeavyDiscount);
        assert_eq!(decide(&inputs(30)), ActionStatus::HeavyDiscount);
        assert_eq!(decide(&inputs(31)), ActionStatus::KeepPrice);
        assert_eq!(decide(&inputs(91)), ActionStatus::KeepPrice);
    }

    #[test]
    fn default_turnover_routes_to_heavy_discount() {
        let i = TierInputs {
            turnover: dec!(0.5),
            ..inputs(10)
        };
        assert_eq!(decide(&i), ActionStatus::HeavyDiscount);

        let i = TierInputs {
            turnover: dec!(0.51),
            ..inputs(10)
        };
        assert_eq!(decide(&i), ActionStatus::FlashSale);
    }

    #[test]
    fn overstock_beats_bulk() {
        let i = TierInputs {
            stock_pressure: dec!(1.51),
            current_stock: 500,
            ..inputs(60)
        };
        assert_eq!(decide(&i), ActionStatus::StockClearance);

        let i = TierInputs {
            stock_pressure: dec!(1.5),
            current_stock: 51,
            ..inputs(60)
        };
        assert_eq!(decide(&i), ActionStatus::BulkPromo);

        let i = TierInputs {
            stock_pressure: dec!(1.5),
            current_stock: 50,
            ..inputs(90)
        };
        assert_eq!(decide(&i), ActionStatus::KeepPrice);
    }

    #[test]
    fn status_serializes_to_display_string() {
        let json = serde_json::to_string(&ActionStatus::CriticalClearance).unwrap();
        assert_eq!(json, "\"Critical Clearance\"");
        assert_eq!(ActionStatus::Donate.to_string(), "DONATE");
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: for fixed turnover/pressure/stock, discount never rises
            /// as shelf life grows.
            #[test]
            fn discount_is_non_increasing_in_remaining_life(
                life in -100i64..400,
                turnover_bp in 0u32..200,
                pressure_bp in 0u32..500,
                stock in 0u64..1000,
            ) {
                let base = TierInputs {
                    remaining_life: life,
                    turnover: Decimal::new(turnover_bp as i64, 2),
                    stock_pressure: Decimal::new(pressure_bp as i64, 2),
                    current_stock: stock,
                };
                let later = TierInputs {
                    remaining_life: life + 1,
                    ..base.clone()
                };
                prop_assert!(decide(&later).discount_pct() <= decide(&base).discount_pct());
            }
        }
    }
}
