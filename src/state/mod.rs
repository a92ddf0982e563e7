//! State management for cointerm.
//!
//! This module provides centralized state management with a unidirectional
//! data flow pattern inspired by Redux/Elm architecture. Side effects
//! (network calls, session actions) live in [`crate::app::App`]; everything
//! here is synchronous.

mod app_state;
mod coin_state;
mod dashboard_state;
mod form_state;
mod market_state;
mod order_state;
mod request;
mod wallet_state;
mod watchlist_state;
mod wire;

pub use app_state::{AppState, InputMode};
pub use coin_state::{CHART_DAYS, ChartData, CoinDetailState};
pub use dashboard_state::{DashboardSnapshot, DashboardState};
pub use form_state::{Form, FormField, FormKind, FormSubmission, MIN_PASSWORD_LEN, OTP_LEN};
pub use market_state::{Coin, MarketState, SortKey};
pub use order_state::{Order, OrderFilter, OrderState, OrderStatus, OrderType};
pub use request::{RequestTracker, Resource, Ticket};
pub use wallet_state::{
    TransactionType, Wallet, WalletState, WalletTransaction, Withdrawal, WithdrawalStatus,
};
pub use watchlist_state::{WatchListItem, WatchlistChange, WatchlistState};
pub use wire::parse_timestamp;

use std::time::Instant;

use chrono::Utc;
use tokio::sync::mpsc;

use crate::api::SearchHit;
use crate::error::Result;
use crate::router::Route;
use crate::session::SessionStore;

/// Actions that can be dispatched to modify state.
#[derive(Debug, Clone)]
pub enum Action {
    // Navigation
    Navigate(Route),
    Back,
    SetInputMode(InputMode),

    // Session
    Logout,
    /// The backend answered 401.
    SessionExpired,

    // Remote data
    Refresh,
    MarketsLoaded {
        ticket: Ticket,
        coins: Vec<Coin>,
    },
    WatchlistLoaded {
        ticket: Ticket,
        items: Vec<WatchListItem>,
    },
    SearchLoaded {
        ticket: Ticket,
        query: String,
        hits: Vec<SearchHit>,
    },
    ChartLoaded {
        ticket: Ticket,
        coin_id: String,
        chart: ChartData,
    },
    DashboardLoaded {
        ticket: Ticket,
        snapshot: Box<DashboardSnapshot>,
    },
    WalletLoaded {
        ticket: Ticket,
        wallet: Wallet,
        transactions: Vec<WalletTransaction>,
        withdrawals: Vec<Withdrawal>,
    },
    OrdersLoaded {
        ticket: Ticket,
        orders: Vec<Order>,
    },
    OrderLoaded {
        ticket: Ticket,
        order: Order,
    },
    RequestFailed {
        ticket: Ticket,
        message: String,
    },

    // Mutations
    ToggleWatchlist(String),
    WatchlistRejected {
        change: WatchlistChange,
        message: String,
    },
    OrderPlaced(Order),
    Deposited(Wallet),
    WithdrawalRequested(Withdrawal),

    // Screen controls
    NextPage,
    PrevPage,
    CycleSort,
    CycleChartDays,
    CycleOrderFilter,
    ShowOrderDetail,

    // Forms and text input
    OpenForm(FormKind),
    CloseForm,
    SubmitForm,
    InputChar(char),
    InputBackspace,
    InputLeft,
    InputRight,
    NextField,
    PrevField,
    /// Enter pressed in search or command mode.
    SubmitInput,
    /// Esc pressed in search or command mode.
    CancelInput,

    // UI actions
    Select,
    ScrollUp,
    ScrollDown,
    PageUp,
    PageDown,
    GoToTop,
    GoToBottom,
    ToggleHelp,
    ShowNotification(Notification),
    DismissNotification,
    Tick,

    // Error handling
    SetError(String),
    ClearError,

    // Quit
    Quit,
}

/// A notification to display to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub level: NotificationLevel,
    pub duration_secs: u64,
}

/// Notification severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl Notification {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: NotificationLevel::Info,
            duration_secs: 3,
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: NotificationLevel::Success,
            duration_secs: 3,
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: NotificationLevel::Warning,
            duration_secs: 5,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: NotificationLevel::Error,
            duration_secs: 8,
        }
    }
}

/// The global state store.
#[derive(Debug)]
pub struct Store {
    /// Application state.
    pub app: AppState,
    /// Sign-in state and actions.
    pub session: SessionStore,
    pub dashboard: DashboardState,
    pub markets: MarketState,
    pub coin: CoinDetailState,
    pub wallet: WalletState,
    pub orders: OrderState,
    pub watchlist: WatchlistState,
    /// Generation counters for in-flight fetches.
    pub requests: RequestTracker,
    /// How long info and success notifications stay up.
    pub notification_secs: u64,
    /// Rows moved by page up/down.
    pub page_size: usize,
    /// Action sender for dispatching actions.
    action_tx: mpsc::UnboundedSender<Action>,
}

impl Store {
    /// Create a new store with the given action sender.
    pub fn new(action_tx: mpsc::UnboundedSender<Action>, session: SessionStore) -> Self {
        Self {
            app: AppState::default(),
            session,
            dashboard: DashboardState::default(),
            markets: MarketState::default(),
            coin: CoinDetailState::new(7),
            wallet: WalletState::default(),
            orders: OrderState::default(),
            watchlist: WatchlistState::default(),
            requests: RequestTracker::default(),
            notification_secs: 3,
            page_size: 10,
            action_tx,
        }
    }

    /// Dispatch an action to the store.
    pub fn dispatch(&self, action: Action) -> Result<()> {
        self.action_tx
            .send(action)
            .map_err(|e| crate::Error::channel(e.to_string()))
    }

    /// A sender for spawned tasks.
    pub fn sender(&self) -> mpsc::UnboundedSender<Action> {
        self.action_tx.clone()
    }

    /// Start tracking a fetch of `resource` and mark it loading.
    pub fn begin_request(&mut self, resource: Resource) -> Ticket {
        self.set_loading(resource, true);
        self.requests.issue(resource)
    }

    /// Whether any tracked resource is loading.
    pub fn is_loading(&self) -> bool {
        self.session.session().is_loading
            || self.dashboard.loading
            || self.markets.loading
            || self.coin.loading
            || self.wallet.loading
            || self.orders.loading
            || self.watchlist.loading
    }

    /// Show a notification, applying the configured duration to info and success.
    pub fn notify(&mut self, mut notification: Notification) {
        if matches!(
            notification.level,
            NotificationLevel::Info | NotificationLevel::Success
        ) {
            notification.duration_secs = self.notification_secs;
        }
        self.app.notify(notification);
    }

    /// Drop everything that belongs to the signed-in account.
    pub fn reset_account_data(&mut self) {
        self.dashboard = DashboardState::default();
        self.wallet = WalletState::default();
        self.orders = OrderState::default();
        self.watchlist = WatchlistState::default();
        self.app.history.clear();
        for resource in [
            Resource::Dashboard,
            Resource::Wallet,
            Resource::Orders,
            Resource::OrderDetail,
            Resource::Watchlist,
        ] {
            self.requests.issue(resource);
        }
    }

    /// Look up a loaded coin by id.
    pub fn find_coin(&self, coin_id: &str) -> Option<&Coin> {
        self.markets
            .coins
            .iter()
            .chain(self.dashboard.top_coins.iter())
            .find(|c| c.id == coin_id)
    }

    /// The action `select` performs on the current screen.
    pub fn select_action(&self) -> Option<Action> {
        let coin_id = match &self.app.route {
            Route::Dashboard => self.dashboard.selected_coin().map(|c| c.id.clone()),
            Route::Market => self.markets.selected_coin().map(|c| c.id.clone()),
            Route::Watchlist => self.watchlist.selected_coin_id().map(str::to_owned),
            Route::Orders => return self.orders.selected_order().map(|_| Action::ShowOrderDetail),
            _ => None,
        }?;
        Some(Action::Navigate(Route::CoinDetail(coin_id)))
    }

    /// Coin the current screen is focused on, for watchlist and trade keys.
    pub fn focused_coin_id(&self) -> Option<String> {
        match &self.app.route {
            Route::CoinDetail(id) | Route::Trading(id) => Some(id.clone()),
            Route::Dashboard => self.dashboard.selected_coin().map(|c| c.id.clone()),
            Route::Market => self.markets.selected_coin().map(|c| c.id.clone()),
            Route::Watchlist => self.watchlist.selected_coin_id().map(str::to_owned),
            _ => None,
        }
    }

    /// Apply an action to update state.
    pub fn reduce(&mut self, action: Action) {
        match action {
            // Navigation
            Action::Navigate(route) => {
                self.app.navigate(route);
                self.app.show_help = false;
            }
            Action::Back => {
                if self.orders.detail.take().is_none() {
                    self.app.back();
                }
            }
            Action::SetInputMode(mode) => {
                self.app.input_mode = mode;
                if mode == InputMode::Command {
                    self.app.clear_input();
                }
            }

            // Remote data
            Action::MarketsLoaded { ticket, coins } => {
                if self.accept(&ticket) {
                    self.markets.set_coins(coins);
                }
            }
            Action::WatchlistLoaded { ticket, items } => {
                if self.accept(&ticket) {
                    self.watchlist.set_items(items);
                }
            }
            Action::SearchLoaded {
                ticket,
                query,
                hits,
            } => {
                if self.accept(&ticket) {
                    self.markets.search_results = hits;
                    self.markets.remote_query = Some(query);
                }
            }
            Action::ChartLoaded {
                ticket,
                coin_id,
                chart,
            } => {
                if self.accept(&ticket) && self.coin.coin_id.as_deref() == Some(coin_id.as_str()) {
                    self.coin.chart = Some(chart);
                }
            }
            Action::DashboardLoaded { ticket, snapshot } => {
                if self.accept(&ticket) {
                    self.apply_dashboard(*snapshot);
                }
            }
            Action::WalletLoaded {
                ticket,
                wallet,
                transactions,
                withdrawals,
            } => {
                if self.accept(&ticket) {
                    self.wallet.wallet = Some(wallet);
                    self.wallet.transactions = transactions;
                    self.wallet.withdrawals = withdrawals;
                    self.wallet.last_updated = Some(Utc::now());
                }
            }
            Action::OrdersLoaded { ticket, orders } => {
                if self.accept(&ticket) {
                    self.orders.set_orders(orders);
                }
            }
            Action::OrderLoaded { ticket, order } => {
                if self.accept(&ticket) {
                    self.orders.detail = Some(order);
                }
            }
            Action::RequestFailed { ticket, message } => {
                if self.accept(&ticket) {
                    self.notify(Notification::error(message));
                }
            }

            // Mutations
            Action::WatchlistRejected { change, message } => {
                self.watchlist.rollback(&change);
                self.notify(Notification::error(message));
            }
            Action::OrderPlaced(order) => {
                let summary = format!(
                    "{} {} {} placed",
                    order.order_type,
                    order.quantity.normalize(),
                    order.coin_id
                );
                self.orders.prepend(order);
                self.app.close_form();
                self.notify(Notification::success(summary));
            }
            Action::Deposited(wallet) => {
                self.wallet.wallet = Some(wallet);
                self.app.close_form();
                self.notify(Notification::success("Deposit successful"));
            }
            Action::WithdrawalRequested(withdrawal) => {
                self.wallet.record_withdrawal(withdrawal);
                self.app.close_form();
                self.notify(Notification::success("Withdrawal requested"));
            }

            // Screen controls
            Action::CycleSort => self.markets.cycle_sort(),
            Action::CycleOrderFilter => self.orders.cycle_filter(),

            // Forms and text input
            Action::OpenForm(kind) => self.app.open_form(Form::new(kind)),
            Action::CloseForm => self.app.close_form(),
            Action::InputChar(c) => self.input_char(c),
            Action::InputBackspace => self.input_backspace(),
            Action::CancelInput => {
                match self.app.input_mode {
                    InputMode::Search => self.markets.set_search(""),
                    InputMode::Command => self.app.clear_input(),
                    InputMode::Normal | InputMode::Form => {}
                }
                self.app.input_mode = InputMode::Normal;
            }
            Action::InputLeft => self.app.cursor_left(),
            Action::InputRight => self.app.cursor_right(),
            Action::NextField => {
                if let Some(form) = self.app.form.as_mut() {
                    form.next_field();
                }
            }
            Action::PrevField => {
                if let Some(form) = self.app.form.as_mut() {
                    form.prev_field();
                }
            }

            // UI actions
            Action::ScrollUp => self.scroll(-1),
            Action::ScrollDown => self.scroll(1),
            Action::PageUp => self.scroll(-(self.page_size as i64)),
            Action::PageDown => self.scroll(self.page_size as i64),
            Action::GoToTop => self.scroll(i64::MIN / 2),
            Action::GoToBottom => self.scroll(i64::MAX / 2),
            Action::ToggleHelp => self.app.show_help = !self.app.show_help,
            Action::ShowNotification(notification) => self.notify(notification),
            Action::DismissNotification => {
                self.app.notification = None;
                self.app.notification_since = None;
            }
            Action::Tick => self.app.expire_notification(Instant::now()),

            // Error handling
            Action::SetError(error) => self.app.error = Some(error),
            Action::ClearError => {
                self.app.error = None;
                self.session.clear_error();
            }

            // Quit
            Action::Quit => self.app.should_quit = true,

            // Handled by the application before reaching the store.
            Action::Logout
            | Action::SessionExpired
            | Action::Refresh
            | Action::ToggleWatchlist(_)
            | Action::NextPage
            | Action::PrevPage
            | Action::CycleChartDays
            | Action::ShowOrderDetail
            | Action::SubmitForm
            | Action::SubmitInput
            | Action::Select => {
                tracing::debug!(?action, "Effect action reached the reducer");
            }
        }
    }

    /// Accept a response if its ticket is still current; clears the loading flag.
    fn accept(&mut self, ticket: &Ticket) -> bool {
        if !self.requests.is_current(ticket) {
            tracing::debug!(?ticket, "Discarding stale response");
            return false;
        }
        self.set_loading(ticket.resource, false);
        true
    }

    fn set_loading(&mut self, resource: Resource, loading: bool) {
        match resource {
            Resource::Markets => self.markets.loading = loading,
            Resource::Watchlist => self.watchlist.loading = loading,
            Resource::Chart => self.coin.loading = loading,
            Resource::Dashboard => self.dashboard.loading = loading,
            Resource::Wallet => self.wallet.loading = loading,
            Resource::Orders => self.orders.loading = loading,
            Resource::Search | Resource::OrderDetail => {}
        }
    }

    fn apply_dashboard(&mut self, snapshot: DashboardSnapshot) {
        let now = Some(Utc::now());
        if let Some(coins) = snapshot.top_coins {
            self.dashboard.top_coins = coins;
            self.dashboard.selected_index = self
                .dashboard
                .selected_index
                .min(self.dashboard.top_coins.len().saturating_sub(1));
        }
        if let Some(wallet) = snapshot.wallet {
            self.wallet.wallet = Some(wallet);
        }
        if let Some(transactions) = snapshot.transactions {
            self.wallet.transactions = transactions;
        }
        if let Some(orders) = snapshot.orders {
            self.orders.set_orders(orders);
        }
        self.dashboard.last_updated = now;
    }

    fn input_char(&mut self, c: char) {
        match self.app.input_mode {
            InputMode::Search => {
                let mut search = std::mem::take(&mut self.markets.search);
                search.push(c);
                self.markets.set_search(search);
            }
            InputMode::Command => self.app.push_char(c),
            InputMode::Form => {
                if let Some(form) = self.app.form.as_mut() {
                    form.push_char(c);
                }
            }
            InputMode::Normal => {}
        }
    }

    fn input_backspace(&mut self) {
        match self.app.input_mode {
            InputMode::Search => {
                let mut search = std::mem::take(&mut self.markets.search);
                search.pop();
                self.markets.set_search(search);
            }
            InputMode::Command => self.app.pop_char(),
            InputMode::Form => {
                if let Some(form) = self.app.form.as_mut() {
                    form.pop_char();
                }
            }
            InputMode::Normal => {}
        }
    }

    fn scroll(&mut self, delta: i64) {
        let (index, len) = match self.app.route {
            Route::Dashboard => (
                &mut self.dashboard.selected_index,
                self.dashboard.top_coins.len(),
            ),
            Route::Market => {
                let len = self.markets.visible_coins().len();
                (&mut self.markets.selected_index, len)
            }
            Route::Orders => {
                let len = self.orders.visible_orders().len();
                (&mut self.orders.selected_index, len)
            }
            Route::Watchlist => {
                let len = self.watchlist.len();
                (&mut self.watchlist.selected_index, len)
            }
            Route::Wallet => (
                &mut self.wallet.selected_index,
                self.wallet.transactions.len(),
            ),
            _ => return,
        };

        let max = len.saturating_sub(1) as i64;
        *index = (*index as i64).saturating_add(delta).clamp(0, max) as usize;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{MemoryCredentials, MockAuthGateway};
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    fn store() -> Store {
        let (tx, _rx) = mpsc::unbounded_channel();
        let session = SessionStore::new(
            Arc::new(MockAuthGateway::new()),
            Arc::new(MemoryCredentials::new()),
        );
        Store::new(tx, session)
    }

    fn coin(id: &str) -> Coin {
        Coin {
            id: id.into(),
            name: id.into(),
            ..Coin::default()
        }
    }

    #[test]
    fn test_stale_response_is_discarded() {
        let mut store = store();
        let old = store.begin_request(Resource::Markets);
        let new = store.begin_request(Resource::Markets);

        store.reduce(Action::MarketsLoaded {
            ticket: new,
            coins: vec![coin("fresh")],
        });
        store.reduce(Action::MarketsLoaded {
            ticket: old,
            coins: vec![coin("stale")],
        });

        assert_eq!(store.markets.coins.len(), 1);
        assert_eq!(store.markets.coins[0].id, "fresh");
        assert!(!store.markets.loading);
    }

    #[test]
    fn test_stale_failure_is_silent() {
        let mut store = store();
        let old = store.begin_request(Resource::Orders);
        store.begin_request(Resource::Orders);

        store.reduce(Action::RequestFailed {
            ticket: old,
            message: "boom".into(),
        });
        assert!(store.app.notification.is_none());
        assert!(store.orders.loading);
    }

    #[test]
    fn test_chart_for_other_coin_ignored() {
        let mut store = store();
        store.coin.open("ethereum");
        let ticket = store.begin_request(Resource::Chart);
        store.reduce(Action::ChartLoaded {
            ticket,
            coin_id: "bitcoin".into(),
            chart: ChartData::default(),
        });
        assert!(store.coin.chart.is_none());
    }

    #[test]
    fn test_watchlist_rejection_rolls_back() {
        let mut store = store();
        let change = store.watchlist.toggle("bitcoin");
        assert!(store.watchlist.contains("bitcoin"));

        store.reduce(Action::WatchlistRejected {
            change,
            message: "Coin not found".into(),
        });
        assert!(!store.watchlist.contains("bitcoin"));
        assert_eq!(
            store.app.notification.as_ref().map(|n| n.level),
            Some(NotificationLevel::Error)
        );
    }

    #[test]
    fn test_order_placed_prepends_and_closes_form() {
        let mut store = store();
        store.reduce(Action::OpenForm(FormKind::Trade {
            coin_id: "bitcoin".into(),
            side: OrderType::Buy,
        }));
        store.reduce(Action::OrderPlaced(Order {
            id: 42,
            coin_id: "bitcoin".into(),
            quantity: dec!(0.5),
            ..Order::default()
        }));

        assert_eq!(store.orders.orders[0].id, 42);
        assert!(store.app.form.is_none());
        assert_eq!(store.app.input_mode, InputMode::Normal);
        assert_eq!(
            store.app.notification.as_ref().map(|n| n.message.as_str()),
            Some("BUY 0.5 bitcoin placed")
        );
    }

    #[test]
    fn test_search_input_filters_market() {
        let mut store = store();
        store.markets.coins = vec![coin("bitcoin"), coin("ethereum")];
        store.reduce(Action::SetInputMode(InputMode::Search));
        for c in "eth".chars() {
            store.reduce(Action::InputChar(c));
        }
        assert_eq!(store.markets.visible_coins().len(), 1);
        store.reduce(Action::InputBackspace);
        assert_eq!(store.markets.search, "et");

        store.reduce(Action::CancelInput);
        assert_eq!(store.markets.search, "");
        assert_eq!(store.app.input_mode, InputMode::Normal);
    }

    #[test]
    fn test_scroll_is_clamped() {
        let mut store = store();
        store.reduce(Action::Navigate(Route::Market));
        store.markets.coins = vec![coin("a"), coin("b"), coin("c")];

        store.reduce(Action::ScrollUp);
        assert_eq!(store.markets.selected_index, 0);
        store.reduce(Action::PageDown);
        assert_eq!(store.markets.selected_index, 2);
        store.reduce(Action::GoToTop);
        assert_eq!(store.markets.selected_index, 0);
        store.reduce(Action::GoToBottom);
        assert_eq!(store.markets.selected_index, 2);
    }

    #[test]
    fn test_select_opens_coin_detail() {
        let mut store = store();
        store.reduce(Action::Navigate(Route::Market));
        assert!(store.select_action().is_none());

        store.markets.coins = vec![coin("bitcoin")];
        assert!(matches!(
            store.select_action(),
            Some(Action::Navigate(Route::CoinDetail(id))) if id == "bitcoin"
        ));
        assert_eq!(store.focused_coin_id().as_deref(), Some("bitcoin"));
    }

    #[test]
    fn test_dashboard_snapshot_fills_slices() {
        let mut store = store();
        let ticket = store.begin_request(Resource::Dashboard);
        store.reduce(Action::DashboardLoaded {
            ticket,
            snapshot: Box::new(DashboardSnapshot {
                top_coins: Some(vec![coin("bitcoin")]),
                wallet: Some(Wallet {
                    id: 1,
                    balance: dec!(250),
                }),
                transactions: None,
                orders: Some(vec![Order::default()]),
            }),
        });
        assert_eq!(store.dashboard.top_coins.len(), 1);
        assert_eq!(store.wallet.balance(), dec!(250));
        assert_eq!(store.orders.orders.len(), 1);
        assert!(!store.dashboard.loading);
        assert!(store.find_coin("bitcoin").is_some());
    }
}
