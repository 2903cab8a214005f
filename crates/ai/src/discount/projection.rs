//! Financial projection applied after the tier decision.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal_macros::dec;

use super::ladder::ActionStatus;

/// Share of stock assumed to sell with no discount at all.
const BASE_SELL_THROUGH: Decimal = dec!(0.1);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Projection {
    pub final_selling_price: Decimal,
    pub sold_after: u64,
    pub revenue_after: Decimal,
    /// Unsold stock valued at full marked price (a write-down estimate).
    pub loss_after: Decimal,
}

/// Price after discount: `marked_price × (1 − discount/100)`.
///
/// `None` when the product leaves the decimal range.
pub fn discounted_price(marked_price: Decimal, discount_pct: Decimal) -> Option<Decimal> {
    marked_price.checked_mul(Decimal::ONE - discount_pct / Decimal::ONE_HUNDRED)
}

/// Units expected to sell: none when donating, otherwise `(10% + discount%)`
/// of stock, floored.
pub fn estimate_units_sold(current_stock: u64, status: ActionStatus) -> u64 {
    if status == ActionStatus::Donate {
        return 0;
    }
    let ratio = BASE_SELL_THROUGH + status.discount_pct() / Decimal::ONE_HUNDRED;
    Decimal::from(current_stock)
        .checked_mul(ratio)
        .and_then(|units| units.floor().to_u64())
        .unwrap_or(0)
        .min(current_stock)
}

/// Project price, sales and write-down for one record.
///
/// `None` when any amount overflows the decimal range.
pub fn project(
    current_stock: u64,
    marked_price: Decimal,
    status: ActionStatus,
) -> Option<Projection> {
    let final_selling_price = discounted_price(marked_price, status.discount_pct())?;
    let sold_after = estimate_units_sold(current_stock, status);
    let unsold = current_stock - sold_after;

    Some(Projection {
        final_selling_price,
        sold_after,
        revenue_after: Decimal::from(sold_after).checked_mul(final_selling_price)?,
        loss_after: Decimal::from(unsold).checked_mul(marked_price)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn critical_clearance_prices_exactly() {
        let p = project(100, dec!(10), ActionStatus::CriticalClearance).unwrap();
        assert_eq!(p.final_selling_price, dec!(2));
        assert_eq!(p.sold_after, 90);
        assert_eq!(p.revenue_after, dec!(180));
        assert_eq!(p.loss_after, dec!(100));
    }

    #[test]
    fn keep_price_sells_ten_percent_at_full_price() {
        let p = project(10, dec!(5), ActionStatus::KeepPrice).unwrap();
        assert_eq!(p.final_selling_price, dec!(5));
        assert_eq!(p.sold_after, 1);
        assert_eq!(p.loss_after, dec!(45));
    }

    #[test]
    fn donate_sells_nothing() {
        let p = project(37, dec!(3.20), ActionStatus::Donate).unwrap();
        assert_eq!(p.sold_after, 0);
        assert_eq!(p.revenue_after, Decimal::ZERO);
        assert_eq!(p.loss_after, dec!(118.40));
        assert_eq!(p.final_selling_price, dec!(0.32));
    }

    #[test]
    fn units_are_floored() {
        // 7 × 0.3 = 2.1 with Bulk Promo (20% + 10%)
        assert_eq!(estimate_units_sold(7, ActionStatus::BulkPromo), 2);
        assert_eq!(estimate_units_sold(0, ActionStatus::FlashSale), 0);
    }

    #[test]
    fn amounts_past_decimal_range_yield_none() {
        // 10% of u64::MAX units at 1e11 each is ~1.8e29.
        assert_eq!(project(u64::MAX, dec!(100000000000), ActionStatus::KeepPrice), None);
        assert_eq!(discounted_price(Decimal::MAX, dec!(0)), Some(Decimal::MAX));
        assert!(project(u64::MAX, dec!(1), ActionStatus::KeepPrice).is_some());
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        fn any_status() -> impl Strategy<Value = ActionStatus> {
            prop_oneof![
                Just(ActionStatus::Donate),
                Just(ActionStatus::CriticalClearance),
                Just(ActionStatus::FlashSale),
                Just(ActionStatus::HeavyDiscount),
                Just(ActionStatus::StockClearance),
                Just(ActionStatus::BulkPromo),
                Just(ActionStatus::KeepPrice),
            ]
        }

        proptest! {
            /// Property: projected sales never exceed stock and are zero when donating.
            #[test]
            fn sold_never_exceeds_stock(
                stock in 0u64..1_000_000,
                cents in 0i64..1_000_000,
                status in any_status(),
            ) {
                let p = project(stock, Decimal::new(cents, 2), status).unwrap();
                prop_assert!(p.sold_after <= stock);
                if status == ActionStatus::Donate {
                    prop_assert_eq!(p.sold_after, 0);
                }
                prop_assert!(p.revenue_after >= Decimal::ZERO);
                prop_assert!(p.loss_after >= Decimal::ZERO);
                prop_assert!(p.final_selling_price >= Decimal::ZERO);
            }

            /// Property: no discount means the marked price is kept exactly.
            #[test]
            fn zero_discount_keeps_price(cents in 0i64..10_000_000) {
                let price = Decimal::new(cents, 2);
                prop_assert_eq!(discounted_price(price, Decimal::ZERO), Some(price));
            }
        }
    }
}
