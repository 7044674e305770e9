use crate::models::Order;
use std::collections::VecDeque;

/// FIFO queue of pending orders. A dequeued order is gone for good.
#[derive(Debug, Default)]
pub struct OrderQueue {
    pending: VecDeque<Order>,
}

impl OrderQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue(&mut self, order: Order) {
        self.pending.push_back(order);
    }

    /// Earliest surviving order, or `None` when the queue is empty.
    pub fn dequeue(&mut self) -> Option<Order> {
        self.pending.pop_front()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Pending orders front to back, without consuming them.
    pub fn iter(&self) -> impl Iterator<Item = &Order> {
        self.pending.iter()
    }

    /// Drains the queue, handing each order to `on_each` in arrival order.
    /// Returns how many orders were processed.
    pub fn process_all(&mut self, mut on_each: impl FnMut(&Order)) -> usize {
        let mut count = 0;
        while let Some(order) = self.dequeue() {
            on_each(&order);
            count += 1;
        }
        count
    }
}
