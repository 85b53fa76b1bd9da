//! Grouping of transformed deals into a product × deal-stage count pivot.

use std::collections::{BTreeMap, BTreeSet};

use crate::deals::DealRecord;

/// Deal counts pivoted with products on the row axis and deal stages on the
/// column axis.
///
/// Both axes are sorted ascending. Every (product, stage) combination has a
/// cell; combinations that never occur count as zero.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CountTable {
    products: Vec<String>,
    stages: Vec<String>,
    /// `counts[row][column]`, indexed like `products` × `stages`.
    counts: Vec<Vec<usize>>,
}

impl CountTable {
    /// Groups deals by `(product, deal_stage)` and pivots the group sizes.
    pub fn from_deals(deals: &[DealRecord]) -> Self {
        let mut groups: BTreeMap<(&str, &str), usize> = BTreeMap::new();
        let mut stages: BTreeSet<&str> = BTreeSet::new();

        for deal in deals {
            *groups.entry((deal.product(), deal.deal_stage())).or_default() += 1;
            stages.insert(deal.deal_stage());
        }

        let products: BTreeSet<&str> = groups.keys().map(|(product, _)| *product).collect();

        let counts: Vec<Vec<usize>> = products
            .iter()
            .map(|product| {
                stages
                    .iter()
                    .map(|stage| groups.get(&(*product, *stage)).copied().unwrap_or(0))
                    .collect::<Vec<usize>>()
            })
            .collect();

        CountTable {
            products: products.into_iter().map(String::from).collect(),
            stages: stages.into_iter().map(String::from).collect(),
            counts,
        }
    }

    pub fn products(&self) -> &[String] {
        &self.products
    }

    pub fn stages(&self) -> &[String] {
        &self.stages
    }

    /// Count for one cell; zero for unknown products or stages.
    pub fn count(&self, product: &str, stage: &str) -> usize {
        let row = self.products.iter().position(|p| p == product);
        let column = self.stages.iter().position(|s| s == stage);
        match (row, column) {
            (Some(r), Some(c)) => self.counts[r][c],
            _ => 0,
        }
    }

    /// Row of counts for the product at `row`, ordered like [`stages`](Self::stages).
    pub fn row(&self, row: usize) -> &[usize] {
        &self.counts[row]
    }

    pub fn max_count(&self) -> usize {
        self.counts.iter().flatten().copied().max().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.counts.iter().flatten().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}
