use chrono::{DateTime, Local};
use rust_decimal::Decimal;
use std::rc::Rc;

/// A purchasable quantity/price pair. Immutable once the catalog is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bundle {
    pub id: u32,
    pub quantity: u32,
    pub price: Decimal,
}

impl Bundle {
    pub fn new(id: u32, quantity: u32, price: Decimal) -> Self {
        Self {
            id,
            quantity,
            price,
        }
    }
}

/// A customer's request to buy one bundle. The bundle is shared with the
/// catalog, not copied.
#[derive(Debug, Clone)]
pub struct Order {
    pub customer_id: String,
    pub bundle: Rc<Bundle>,
    pub submitted_at: DateTime<Local>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerEntry {
    pub customer_id: String,
    pub total_spent: Decimal,
}
