//! # Owner Order Board
//!
//! Restaurant-side bookkeeping for incoming orders: confirm, mark ready, or decline,
//! plus per-status counts for the dashboard tabs. In-memory only, like the rest of the
//! owner dashboard prototype.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum BoardError {
    #[error("order {0} not found")]
    NotFound(u32),

    #[error("order {0} is already ready")]
    AlreadyReady(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Preparing,
    Ready,
}

#[derive(Debug, Clone, Serialize)]
pub struct IncomingOrder {
    pub id: u32,
    pub customer: String,
    pub items: String,
    pub total: u64,
    pub placed_at: DateTime<Utc>,
    pub status: OrderStatus,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct StatusCounts {
    pub pending: usize,
    pub preparing: usize,
    pub ready: usize,
}

#[derive(Debug, Default)]
pub struct OrderBoard {
    orders: Vec<IncomingOrder>,
    next_id: u32,
}

impl OrderBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, customer: String, items: String, total: u64) -> u32 {
        self.next_id += 1;
        let id = self.next_id;

        self.orders.push(IncomingOrder {
            id,
            customer,
            items,
            total,
            placed_at: Utc::now(),
            status: OrderStatus::Pending,
        });

        id
    }

    /// Pending → Preparing → Ready. Ready is terminal.
    pub fn advance(&mut self, id: u32) -> Result<OrderStatus, BoardError> {
        let order = self
            .orders
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or(BoardError::NotFound(id))?;

        order.status = match order.status {
            OrderStatus::Pending => OrderStatus::Preparing,
            OrderStatus::Preparing => OrderStatus::Ready,
            OrderStatus::Ready => return Err(BoardError::AlreadyReady(id)),
        };

        Ok(order.status)
    }

    /// Declining removes the order outright, as the dashboard does.
    pub fn decline(&mut self, id: u32) -> Result<(), BoardError> {
        let before = self.orders.len();
        self.orders.retain(|o| o.id != id);

        if self.orders.len() == before {
            return Err(BoardError::NotFound(id));
        }

        Ok(())
    }

    pub fn counts(&self) -> StatusCounts {
        let count = |s| self.orders.iter().filter(|o| o.status == s).count();

        StatusCounts {
            pending: count(OrderStatus::Pending),
            preparing: count(OrderStatus::Preparing),
            ready: count(OrderStatus::Ready),
        }
    }

    /// Tab view: `None` is the "all" tab.
    pub fn tab(&self, status: Option<OrderStatus>) -> Vec<&IncomingOrder> {
        self.orders
            .iter()
            .filter(|o| status.is_none_or(|s| o.status == s))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_with_two() -> OrderBoard {
        let mut board = OrderBoard::new();
        board.push("RichGuy".to_string(), "3x Buffet".to_string(), 4_500);
        board.push("Aline".to_string(), "1x Lunch".to_string(), 1_500);
        board
    }

    #[test]
    fn orders_walk_pending_preparing_ready() {
        let mut board = board_with_two();

        assert_eq!(board.advance(1), Ok(OrderStatus::Preparing));
        assert_eq!(board.advance(1), Ok(OrderStatus::Ready));
        assert_eq!(board.advance(1), Err(BoardError::AlreadyReady(1)));

        assert_eq!(
            board.counts(),
            StatusCounts {
                pending: 1,
                preparing: 0,
                ready: 1
            }
        );
    }

    #[test]
    fn decline_removes_the_order() {
        let mut board = board_with_two();

        board.decline(2).unwrap();

        assert_eq!(board.tab(None).len(), 1);
        assert_eq!(board.decline(2), Err(BoardError::NotFound(2)));
        assert_eq!(board.advance(99), Err(BoardError::NotFound(99)));
    }

    #[test]
    fn tabs_filter_by_status() {
        let mut board = board_with_two();
        board.advance(1).unwrap();

        assert_eq!(board.tab(Some(OrderStatus::Pending)).len(), 1);
        assert_eq!(board.tab(Some(OrderStatus::Preparing)).len(), 1);
        assert_eq!(board.tab(Some(OrderStatus::Ready)).len(), 0);
        assert_eq!(board.tab(None).len(), 2);
    }
}
