use crate::models::Bundle;
use rust_decimal::Decimal;
use std::rc::Rc;

/// (id, quantity, price) for every bundle the store sells.
const DEFAULT_BUNDLES: [(u32, u32, i64); 9] = [
    (1, 100, 15_000),
    (2, 70, 9_000),
    (3, 500, 72_000),
    (4, 1000, 127_000),
    (5, 1075, 137_000),
    (6, 720, 91_000),
    (7, 200, 29_000),
    (8, 355, 45_000),
    (9, 860, 109_000),
];

/// Fixed list of bundles. Membership never changes after construction;
/// sorting only reorders.
#[derive(Debug, Clone)]
pub struct Catalog {
    bundles: Vec<Rc<Bundle>>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new(
            DEFAULT_BUNDLES
                .iter()
                .map(|&(id, quantity, price)| Bundle::new(id, quantity, Decimal::from(price))),
        )
    }
}

impl Catalog {
    pub fn new(bundles: impl IntoIterator<Item = Bundle>) -> Self {
        Self {
            bundles: bundles.into_iter().map(Rc::new).collect(),
        }
    }

    /// Linear scan for the bundle with the given id.
    pub fn find_by_id(&self, id: u32) -> Option<Rc<Bundle>> {
        self.bundles.iter().find(|b| b.id == id).cloned()
    }

    /// Bubble sort by ascending price. Only strictly greater neighbours are
    /// swapped, so bundles with equal prices keep their relative order.
    pub fn sort_by_price_ascending(&mut self) {
        let n = self.bundles.len();
        let mut swaps = 0usize;

        for i in 0..n {
            for j in 0..n.saturating_sub(i + 1) {
                if self.bundles[j].price > self.bundles[j + 1].price {
                    self.bundles.swap(j, j + 1);
                    swaps += 1;
                }
            }
        }

        tracing::debug!("Catalog sorted by price ({} swaps)", swaps);
    }

    /// Bundles in current catalog order.
    pub fn list_all(&self) -> &[Rc<Bundle>] {
        &self.bundles
    }

    pub fn len(&self) -> usize {
        self.bundles.len()
    }
}
