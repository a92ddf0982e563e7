//! Order-related state.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::wire::{decimal_or_zero, timestamp};

/// Buy or sell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderType {
    #[default]
    Buy,
    Sell,
}

impl std::fmt::Display for OrderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Buy => write!(f, "BUY"),
            Self::Sell => write!(f, "SELL"),
        }
    }
}

/// Order status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[default]
    Pending,
    Completed,
    Failed,
    Cancelled,
    #[serde(other)]
    Unknown,
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "Pending"),
            Self::Completed => write!(f, "Completed"),
            Self::Failed => write!(f, "Failed"),
            Self::Cancelled => write!(f, "Cancelled"),
            Self::Unknown => write!(f, "Unknown"),
        }
    }
}

/// An order placed through `/api/orders/pay`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Order {
    /// Order ID.
    pub id: u64,
    /// Coin the order is for.
    pub coin_id: String,
    /// Coin quantity.
    #[serde(deserialize_with = "decimal_or_zero")]
    pub quantity: Decimal,
    /// Unit price at execution.
    #[serde(deserialize_with = "decimal_or_zero")]
    pub price: Decimal,
    #[serde(deserialize_with = "decimal_or_zero")]
    pub total_amount: Decimal,
    pub order_type: OrderType,
    pub status: OrderStatus,
    #[serde(alias = "timestamp", deserialize_with = "timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Order {
    /// Total value, falling back to `price * quantity` when the backend omits it.
    pub fn total(&self) -> Decimal {
        if self.total_amount.is_zero() {
            self.price * self.quantity
        } else {
            self.total_amount
        }
    }

    pub fn is_open(&self) -> bool {
        self.status == OrderStatus::Pending
    }
}

/// Tabs of the order history screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderFilter {
    #[default]
    All,
    Open,
    Completed,
}

impl OrderFilter {
    pub const ALL: [OrderFilter; 3] = [OrderFilter::All, OrderFilter::Open, OrderFilter::Completed];

    pub fn matches(self, order: &Order) -> bool {
        match self {
            Self::All => true,
            Self::Open => order.status == OrderStatus::Pending,
            Self::Completed => order.status == OrderStatus::Completed,
        }
    }

    pub fn next(self) -> Self {
        match self {
            Self::All => Self::Open,
            Self::Open => Self::Completed,
            Self::Completed => Self::All,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Open => "Open",
            Self::Completed => "Completed",
        }
    }
}

/// State for order-related data.
#[derive(Debug, Default)]
pub struct OrderState {
    /// All orders, newest first once placed locally.
    pub orders: Vec<Order>,
    pub filter: OrderFilter,
    /// Index into [`OrderState::visible_orders`].
    pub selected_index: usize,
    /// Order shown in the detail popup.
    pub detail: Option<Order>,
    pub loading: bool,
    pub last_updated: Option<DateTime<Utc>>,
}

impl OrderState {
    pub fn visible_orders(&self) -> Vec<&Order> {
        self.orders
            .iter()
            .filter(|o| self.filter.matches(o))
            .collect()
    }

    pub fn selected_order(&self) -> Option<&Order> {
        self.visible_orders().get(self.selected_index).copied()
    }

    pub fn set_orders(&mut self, orders: Vec<Order>) {
        self.orders = orders;
        self.loading = false;
        self.last_updated = Some(Utc::now());
        self.clamp_selection();
    }

    /// Record a freshly placed order at the top of the list.
    pub fn prepend(&mut self, order: Order) {
        self.orders.retain(|o| o.id != order.id);
        self.orders.insert(0, order);
    }

    pub fn cycle_filter(&mut self) {
        self.filter = self.filter.next();
        self.selected_index = 0;
    }

    pub fn open_count(&self) -> usize {
        self.orders.iter().filter(|o| o.is_open()).count()
    }

    pub fn clamp_selection(&mut self) {
        let max = self.visible_orders().len().saturating_sub(1);
        self.selected_index = self.selected_index.min(max);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn order(id: u64, status: OrderStatus) -> Order {
        Order {
            id,
            coin_id: "bitcoin".into(),
            quantity: dec!(0.5),
            price: dec!(100),
            status,
            ..Order::default()
        }
    }

    #[test]
    fn test_order_wire_format() {
        let order: Order = serde_json::from_str(
            r#"{"id":9,"coinId":"bitcoin","quantity":0.25,"price":64000,"totalAmount":16000,
                "orderType":"SELL","status":"COMPLETED","createdAt":"2024-03-01T10:00:00"}"#,
        )
        .unwrap();
        assert_eq!(order.order_type, OrderType::Sell);
        assert_eq!(order.status, OrderStatus::Completed);
        assert_eq!(order.total(), dec!(16000));
        assert!(order.created_at.is_some());

        let odd: Order =
            serde_json::from_str(r#"{"id":1,"status":"ON_HOLD","timestamp":"2024-03-01"}"#)
                .unwrap();
        assert_eq!(odd.status, OrderStatus::Unknown);
        assert!(odd.created_at.is_some());
    }

    #[test]
    fn test_total_falls_back_to_price_times_quantity() {
        assert_eq!(order(1, OrderStatus::Pending).total(), dec!(50));
    }

    #[test]
    fn test_filter_tabs() {
        let mut state = OrderState::default();
        state.set_orders(vec![
            order(1, OrderStatus::Pending),
            order(2, OrderStatus::Completed),
            order(3, OrderStatus::Failed),
        ]);

        let ids = |s: &OrderState| s.visible_orders().iter().map(|o| o.id).collect::<Vec<_>>();
        assert_eq!(ids(&state), vec![1, 2, 3]);
        state.cycle_filter();
        assert_eq!(ids(&state), vec![1]);
        state.cycle_filter();
        assert_eq!(ids(&state), vec![2]);
        state.cycle_filter();
        assert_eq!(state.filter, OrderFilter::All);
        assert_eq!(state.open_count(), 1);
    }

    #[test]
    fn test_prepend_replaces_duplicate() {
        let mut state = OrderState::default();
        state.set_orders(vec![order(1, OrderStatus::Pending), order(2, OrderStatus::Pending)]);
        state.prepend(order(2, OrderStatus::Completed));
        assert_eq!(state.orders.len(), 2);
        assert_eq!(state.orders[0].id, 2);
        assert_eq!(state.orders[0].status, OrderStatus::Completed);
    }
}
