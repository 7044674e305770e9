use crate::catalog::Catalog;
use crate::errors::StoreError;
use crate::graph::SimilarityGraph;
use crate::ledger::{InsertPolicy, SpendLedger};
use crate::models::{Bundle, Order};
use crate::queue::OrderQueue;
use chrono::Local;
use std::rc::Rc;

/// Owns the catalog, order queue, ledger and similarity graph for the life of
/// the process. Everything goes through here.
pub struct StorefrontService {
    catalog: Catalog,
    queue: OrderQueue,
    ledger: SpendLedger,
    graph: SimilarityGraph,
    recommendation_count: usize,
}

impl StorefrontService {
    pub fn new(catalog: Catalog, policy: InsertPolicy, recommendation_count: usize) -> Self {
        let graph = SimilarityGraph::from_catalog(&catalog);
        Self {
            catalog,
            queue: OrderQueue::new(),
            ledger: SpendLedger::new(policy),
            graph,
            recommendation_count,
        }
    }

    /// Customer ids are 9 or 10 ASCII digits.
    pub fn validate_customer_id(id: &str) -> bool {
        (9..=10).contains(&id.len()) && id.bytes().all(|b| b.is_ascii_digit())
    }

    /// Validates, enqueues and records the order. Nothing changes on failure.
    pub fn submit_order(&mut self, customer_id: &str, bundle_id: u32) -> Result<Order, StoreError> {
        let result = self.try_submit(customer_id, bundle_id);

        match &result {
            Ok(order) => {
                metrics::counter!("orders_submitted_total").increment(1);
                tracing::info!(
                    "Order queued: {} units (bundle {}) for {} at {}, recorded total {}",
                    order.bundle.quantity,
                    order.bundle.id,
                    order.customer_id,
                    order.bundle.price,
                    self.ledger.total_for(&order.customer_id).unwrap_or_default()
                );
            }
            Err(e) => {
                metrics::counter!("orders_rejected_total", "reason" => e.reason()).increment(1);
                tracing::warn!("Order rejected: {}", e);
            }
        }

        result
    }

    fn try_submit(&mut self, customer_id: &str, bundle_id: u32) -> Result<Order, StoreError> {
        if !Self::validate_customer_id(customer_id) {
            return Err(StoreError::InvalidCustomerId(customer_id.to_string()));
        }

        let bundle = self
            .catalog
            .find_by_id(bundle_id)
            .ok_or(StoreError::BundleNotFound(bundle_id.into()))?;

        let order = Order {
            customer_id: customer_id.to_string(),
            bundle: Rc::clone(&bundle),
            submitted_at: Local::now(),
        };

        self.queue.enqueue(order.clone());
        self.ledger.insert(customer_id, bundle.price);

        Ok(order)
    }

    /// Similar bundles, most similar first.
    pub fn recommend_for(&self, bundle_id: u32) -> Vec<Rc<Bundle>> {
        let ids = self.graph.recommend(bundle_id, self.recommendation_count);
        for &id in &ids {
            tracing::debug!(
                "Recommend {} for {} (weight {:.4})",
                id,
                bundle_id,
                self.graph.weight(bundle_id, id).unwrap_or_default()
            );
        }

        ids.into_iter()
            .filter_map(|id| self.catalog.find_by_id(id))
            .collect()
    }

    pub fn sort_catalog(&mut self) {
        self.catalog.sort_by_price_ascending();
    }

    /// Drains the queue, calling `on_each` per order. Returns the count.
    pub fn process_orders(&mut self, mut on_each: impl FnMut(&Order)) -> usize {
        let processed = self.queue.process_all(|order| {
            tracing::info!(
                "Processing {} units for {}",
                order.bundle.quantity,
                order.customer_id
            );
            on_each(order);
        });

        metrics::counter!("orders_processed_total").increment(processed as u64);
        processed
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn queue(&self) -> &OrderQueue {
        &self.queue
    }

    pub fn ledger(&self) -> &SpendLedger {
        &self.ledger
    }
}
