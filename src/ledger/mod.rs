use crate::models::LedgerEntry;
use rust_decimal::Decimal;
use std::cmp::Ordering;
use std::str::FromStr;
use thiserror::Error;

/// What `SpendLedger::insert` does with a customer id already in the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InsertPolicy {
    /// Equal keys go to the right subtree as a new node. Every purchase
    /// becomes its own entry.
    #[default]
    DuplicateRight,
    /// Equal keys add the amount to the existing node.
    Accumulate,
}

#[derive(Debug, Error)]
#[error("unknown ledger policy {0:?}, expected `duplicate` or `accumulate`")]
pub struct UnknownPolicy(String);

impl FromStr for InsertPolicy {
    type Err = UnknownPolicy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "duplicate" => Ok(Self::DuplicateRight),
            "accumulate" => Ok(Self::Accumulate),
            other => Err(UnknownPolicy(other.to_string())),
        }
    }
}

#[derive(Debug)]
struct LedgerNode {
    customer_id: String,
    total_spent: Decimal,
    left: Option<Box<LedgerNode>>,
    right: Option<Box<LedgerNode>>,
}

impl LedgerNode {
    fn new(customer_id: String, total_spent: Decimal) -> Self {
        Self {
            customer_id,
            total_spent,
            left: None,
            right: None,
        }
    }
}

/// Per-customer spend, kept as an unbalanced binary search tree ordered by
/// customer id (plain string comparison).
#[derive(Debug, Default)]
pub struct SpendLedger {
    root: Option<Box<LedgerNode>>,
    policy: InsertPolicy,
    len: usize,
}

impl SpendLedger {
    pub fn new(policy: InsertPolicy) -> Self {
        Self {
            root: None,
            policy,
            len: 0,
        }
    }

    pub fn insert(&mut self, customer_id: &str, amount: Decimal) {
        let mut slot = &mut self.root;

        while let Some(node) = slot {
            match customer_id.cmp(node.customer_id.as_str()) {
                Ordering::Less => slot = &mut node.left,
                Ordering::Equal if self.policy == InsertPolicy::Accumulate => {
                    node.total_spent += amount;
                    return;
                }
                _ => slot = &mut node.right,
            }
        }

        *slot = Some(Box::new(LedgerNode::new(customer_id.to_string(), amount)));
        self.len += 1;
    }

    /// Entries in ascending customer id order.
    pub fn traverse_in_order(&self) -> Vec<LedgerEntry> {
        let mut entries = Vec::with_capacity(self.len);
        let mut stack: Vec<&LedgerNode> = Vec::new();
        let mut current = self.root.as_deref();

        while current.is_some() || !stack.is_empty() {
            while let Some(node) = current {
                stack.push(node);
                current = node.left.as_deref();
            }
            if let Some(node) = stack.pop() {
                entries.push(LedgerEntry {
                    customer_id: node.customer_id.clone(),
                    total_spent: node.total_spent,
                });
                current = node.right.as_deref();
            }
        }

        entries
    }

    /// Sum over every entry for `customer_id`, whichever policy built the tree.
    pub fn total_for(&self, customer_id: &str) -> Option<Decimal> {
        let mut total = None;
        let mut current = self.root.as_deref();

        while let Some(node) = current {
            current = match customer_id.cmp(node.customer_id.as_str()) {
                Ordering::Less => node.left.as_deref(),
                Ordering::Equal => {
                    *total.get_or_insert(Decimal::ZERO) += node.total_spent;
                    node.right.as_deref()
                }
                Ordering::Greater => node.right.as_deref(),
            };
        }

        total
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }
}

// Repeat customers and ascending ids build long spines; unlink nodes one at a
// time so dropping the tree never recurses.
impl Drop for SpendLedger {
    fn drop(&mut self) {
        let mut stack: Vec<Box<LedgerNode>> = self.root.take().into_iter().collect();
        while let Some(mut node) = stack.pop() {
            stack.extend(node.left.take());
            stack.extend(node.right.take());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn ids(ledger: &SpendLedger) -> Vec<String> {
        ledger
            .traverse_in_order()
            .into_iter()
            .map(|e| e.customer_id)
            .collect()
    }

    #[test]
    fn traversal_is_sorted_by_customer_id() {
        let mut ledger = SpendLedger::default();
        ledger.insert("555000111", dec!(15000));
        ledger.insert("111000222", dec!(9000));
        ledger.insert("999000333", dec!(72000));

        assert_eq!(ids(&ledger), vec!["111000222", "555000111", "999000333"]);
        assert_eq!(ledger.len(), 3);
    }

    #[test]
    fn ordering_is_lexicographic() {
        let mut ledger = SpendLedger::default();
        ledger.insert("9000000000", dec!(1));
        ledger.insert("100000000", dec!(1));
        ledger.insert("1000000000", dec!(1));

        // "100000000" < "1000000000" < "9000000000" as strings
        assert_eq!(ids(&ledger), vec!["100000000", "1000000000", "9000000000"]);
    }

    #[test]
    fn duplicate_policy_keeps_separate_entries() {
        let mut ledger = SpendLedger::new(InsertPolicy::DuplicateRight);
        ledger.insert("123456789", dec!(15000));
        ledger.insert("123456789", dec!(9000));

        let entries = ledger.traverse_in_order();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].total_spent, dec!(15000));
        assert_eq!(entries[1].total_spent, dec!(9000));
        assert_eq!(ledger.total_for("123456789"), Some(dec!(24000)));
    }

    #[test]
    fn accumulate_policy_updates_existing_entry() {
        let mut ledger = SpendLedger::new(InsertPolicy::Accumulate);
        ledger.insert("123456789", dec!(15000));
        ledger.insert("987654321", dec!(500));
        ledger.insert("123456789", dec!(9000));

        let entries = ledger.traverse_in_order();
        assert_eq!(entries.len(), 2);
        assert_eq!(
            entries[0],
            LedgerEntry {
                customer_id: "123456789".to_string(),
                total_spent: dec!(24000),
            }
        );
        assert_eq!(ledger.len(), 2);
    }

    #[test]
    fn empty_ledger() {
        let ledger = SpendLedger::default();
        assert!(ledger.is_empty());
        assert!(ledger.traverse_in_order().is_empty());
        assert_eq!(ledger.total_for("123456789"), None);
    }

    #[test]
    fn degenerate_insertion_order_still_sorts() {
        let mut ledger = SpendLedger::default();
        let mut expected = Vec::new();
        for i in (0..500u32).rev() {
            let id = format!("{:09}", 100_000_000 + i);
            ledger.insert(&id, dec!(1));
            expected.push(id);
        }
        expected.sort();

        assert_eq!(ids(&ledger), expected);
    }

    #[test]
    fn deep_spine_inserts_and_drops_on_small_stack() {
        let handle = std::thread::Builder::new()
            .stack_size(128 * 1024)
            .spawn(|| {
                let mut ledger = SpendLedger::new(InsertPolicy::DuplicateRight);
                for _ in 0..10_000 {
                    ledger.insert("123456789", dec!(1));
                }
                let total = ledger.total_for("123456789");
                let len = ledger.len();
                drop(ledger);
                (total, len)
            })
            .unwrap();

        let (total, len) = handle.join().unwrap();
        assert_eq!(total, Some(dec!(10000)));
        assert_eq!(len, 10_000);
    }

    #[test]
    fn parses_policy_names() {
        assert_eq!("duplicate".parse::<InsertPolicy>().unwrap(), InsertPolicy::DuplicateRight);
        assert_eq!(" Accumulate ".parse::<InsertPolicy>().unwrap(), InsertPolicy::Accumulate);
        assert!("sum".parse::<InsertPolicy>().is_err());
    }
}
