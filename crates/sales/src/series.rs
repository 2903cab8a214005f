use std::collections::HashMap;

use chrono::NaiveDate;

use crate::record::SalesRecord;

/// Time-ordered sales observations for a single product.
#[derive(Debug, Clone, PartialEq)]
pub struct SalesSeries {
    product_name: String,
    points: Vec<(NaiveDate, f64)>,
}

impl SalesSeries {
    /// Build a series; points are sorted by date, keeping arrival order for
    /// observations that share a date.
    pub fn new(product_name: impl Into<String>, mut points: Vec<(NaiveDate, f64)>) -> Self {
        points.sort_by_key(|(d, _)| *d);
        Self {
            product_name: product_name.into(),
            points,
        }
    }

    pub fn product_name(&self) -> &str {
        &self.product_name
    }

    pub fn points(&self) -> &[(NaiveDate, f64)] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn total_volume(&self) -> f64 {
        self.points.iter().map(|(_, y)| *y).sum()
    }

    /// Mean of the last `n` observations, or of all of them when the series
    /// has `n` or fewer.
    pub fn tail_mean(&self, n: usize) -> f64 {
        let start = self.points.len().saturating_sub(n);
        let tail = &self.points[start..];
        if tail.is_empty() {
            return 0.0;
        }
        tail.iter().map(|(_, y)| *y).sum::<f64>() / tail.len() as f64
    }
}

/// Group records by product name, in order of first appearance.
pub fn group_by_product(records: impl IntoIterator<Item = SalesRecord>) -> Vec<SalesSeries> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<(String, Vec<(NaiveDate, f64)>)> = Vec::new();

    for r in records {
        let slot = match index.get(&r.product_name) {
            Some(i) => *i,
            None => {
                index.insert(r.product_name.clone(), groups.len());
                groups.push((r.product_name.clone(), Vec::new()));
                groups.len() - 1
            }
        };
        groups[slot].1.push((r.date, r.quantity_sold));
    }

    groups
        .into_iter()
        .map(|(name, points)| SalesSeries::new(name, points))
        .collect()
}
