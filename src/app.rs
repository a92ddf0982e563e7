//! Main application module.
//!
//! This module contains the main `App` struct that coordinates
//! the event loop, state management, and rendering. The store is
//! synchronous; everything that talks to the backend lives here.

use std::future::Future;
use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::Duration;

use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tokio::sync::mpsc;

use crate::api::{
    ApiClient, AuthGateway, CredentialHolder, FileCredentials, MemoryCredentials, TradingApi,
};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::events::{EventConfig, EventHandler, EventLoop};
use crate::router::{Access, Route};
use crate::session::{Navigation, SessionStore, guard};
use crate::state::{
    Action, DashboardSnapshot, FormKind, FormSubmission, InputMode, Notification, OrderType,
    Resource, Store, Ticket, WatchlistChange,
};
use crate::ui::Ui;

/// Terminal in raw mode on the alternate screen; restored on drop.
struct Tui {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    mouse_capture: bool,
}

impl Tui {
    fn enter(mouse_capture: bool) -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        if mouse_capture {
            execute!(stdout, EnableMouseCapture)?;
        }
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        Ok(Self {
            terminal,
            mouse_capture,
        })
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        if self.mouse_capture {
            let _ = execute!(self.terminal.backend_mut(), DisableMouseCapture);
        }
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

/// The main application.
pub struct App {
    /// Application store.
    store: Store,
    /// Market, wallet, order and watchlist endpoints.
    api: Arc<dyn TradingApi>,
    /// Event handler.
    event_handler: EventHandler,
    /// Action receiver.
    action_rx: mpsc::UnboundedReceiver<Action>,
    /// Configuration.
    config: Config,
}

impl App {
    /// Create the application against the configured backend.
    pub fn new(config: Config) -> Result<Self> {
        let credentials: Arc<dyn CredentialHolder> = if config.api.persist_credentials {
            Arc::new(FileCredentials::open(config.api.token_path()?))
        } else {
            Arc::new(MemoryCredentials::new())
        };

        let client = Arc::new(ApiClient::new(
            config.api.clone(),
            Arc::clone(&credentials),
        )?);
        tracing::info!(base_url = %client.base_url(), "API client ready");

        Ok(Self::with_services(
            config,
            client.clone(),
            client,
            credentials,
        ))
    }

    /// Create the application from explicit services.
    pub fn with_services(
        config: Config,
        api: Arc<dyn TradingApi>,
        auth: Arc<dyn AuthGateway>,
        credentials: Arc<dyn CredentialHolder>,
    ) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();

        let mut store = Store::new(action_tx, SessionStore::new(auth, credentials));
        store.coin = crate::state::CoinDetailState::new(config.ui.chart_days);
        store.notification_secs = config.ui.notification_secs;
        store.page_size = config.ui.coins_per_page.max(1);

        let event_handler =
            EventHandler::new(config.keybindings.clone(), config.ui.mouse_support);

        Self {
            store,
            api,
            event_handler,
            action_rx,
            config,
        }
    }

    /// Read-only view of the state, for rendering and tests.
    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Resume a stored session and load the first screen.
    pub async fn start(&mut self) {
        self.store.session.restore().await;
        self.resolve_route().await;
    }

    /// Run the application event loop.
    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::enter(self.config.ui.mouse_support)?;
        let event_loop =
            EventLoop::new(EventConfig::default().with_tick_rate_ms(self.config.ui.tick_rate_ms));
        let (mut events, ticker) = event_loop.start();

        self.start().await;

        loop {
            tui.terminal.draw(|frame| {
                Ui::render(frame, &self.store, &self.config);
            })?;

            tokio::select! {
                Some(event) = events.recv() => {
                    if let Some(action) = self.event_handler.handle_event(&event, &self.store) {
                        self.handle_action(action).await?;
                    }
                }

                Some(action) = self.action_rx.recv() => {
                    self.handle_action(action).await?;
                }

                else => break,
            }

            if self.store.app.should_quit {
                break;
            }
        }

        ticker.abort();
        tracing::info!("Shutting down");
        Ok(())
    }

    /// Handle queued actions until none arrives for `idle`. Returns how many ran.
    pub async fn drain_actions(&mut self, idle: Duration) -> Result<usize> {
        let mut handled = 0;
        while let Ok(Some(action)) = tokio::time::timeout(idle, self.action_rx.recv()).await {
            self.handle_action(action).await?;
            handled += 1;
        }
        Ok(handled)
    }

    /// Handle an action, following up on any action it produces.
    pub async fn handle_action(&mut self, action: Action) -> Result<()> {
        let mut next = Some(action);
        while let Some(action) = next.take() {
            next = self.apply(action).await?;
        }
        Ok(())
    }

    async fn apply(&mut self, action: Action) -> Result<Option<Action>> {
        match action {
            Action::Navigate(route) => {
                self.store.reduce(Action::Navigate(route));
                self.resolve_route().await;
            }
            Action::Back => {
                let before = self.store.app.route.clone();
                self.store.reduce(Action::Back);
                if self.store.app.route != before {
                    self.resolve_route().await;
                }
            }
            Action::Select => return Ok(self.store.select_action()),

            Action::Logout => {
                self.store.session.logout();
                self.store.reset_account_data();
                self.store.app.redirect(Route::Login);
                self.store.notify(Notification::info("Signed out"));
                self.resolve_route().await;
            }
            Action::SessionExpired => self.expire_session().await,
            Action::Refresh => {
                let route = self.store.app.route.clone();
                if let Navigation::Render(route) = guard(self.store.session.session(), &route) {
                    tracing::debug!(%route, "Refreshing");
                    self.load_route(&route).await;
                    if self.leave_if_signed_out(&route) {
                        self.resolve_route().await;
                    }
                }
            }

            Action::NextPage => {
                self.store.markets.next_page();
                self.load_markets();
            }
            Action::PrevPage => {
                if self.store.markets.prev_page() {
                    self.load_markets();
                }
            }
            Action::CycleChartDays => {
                self.store.coin.cycle_days();
                self.load_chart();
            }
            Action::ShowOrderDetail => self.load_order_detail(),
            Action::ToggleWatchlist(coin_id) => self.toggle_watchlist(&coin_id),

            Action::SubmitForm => {
                let Some(form) = self.store.app.form.as_ref() else {
                    return Ok(None);
                };
                match form.submit() {
                    Ok(submission) => self.submit(submission).await,
                    Err(e) => self.set_form_error(Some(e.user_message())),
                }
            }
            Action::SubmitInput => return Ok(self.submit_input()),

            other => self.store.reduce(other),
        }
        Ok(None)
    }

    /// Apply the route guard to the current route and enter the result.
    async fn resolve_route(&mut self) {
        // A redirect target never redirects more than once.
        for _ in 0..3 {
            let route = self.store.app.route.clone();
            match guard(self.store.session.session(), &route) {
                Navigation::Loading => return,
                Navigation::Redirect(target) => {
                    tracing::debug!(from = %route, to = %target, "Route redirected");
                    self.store.app.redirect(target);
                }
                Navigation::Render(route) => {
                    self.enter(&route).await;
                    if !self.leave_if_signed_out(&route) {
                        return;
                    }
                }
            }
        }
        tracing::warn!(route = %self.store.app.route, "Route did not settle");
    }

    async fn enter(&mut self, route: &Route) {
        match route {
            Route::Login => self.ensure_form(FormKind::Login),
            Route::Signup => self.ensure_form(FormKind::Signup),
            Route::TwoFactor => self.ensure_form(FormKind::TwoFactor),
            Route::Trading(coin_id) => self.ensure_form(FormKind::Trade {
                coin_id: coin_id.clone(),
                side: OrderType::Buy,
            }),
            _ => self.store.app.close_form(),
        }
        self.load_route(route).await;
    }

    /// Open `kind` unless a form of that kind is already open.
    fn ensure_form(&mut self, kind: FormKind) {
        let already_open = match (&self.store.app.form, &kind) {
            (
                Some(form),
                FormKind::Trade {
                    coin_id: wanted, ..
                },
            ) => matches!(&form.kind, FormKind::Trade { coin_id, .. } if coin_id == wanted),
            (Some(form), kind) => form.kind == *kind,
            (None, _) => false,
        };

        if !already_open {
            if matches!(
                kind,
                FormKind::Login | FormKind::Signup | FormKind::TwoFactor
            ) {
                self.store.session.clear_error();
            }
            self.store.reduce(Action::OpenForm(kind));
        } else {
            self.store.app.input_mode = InputMode::Form;
        }
    }

    /// Issue the reads a screen needs.
    async fn load_route(&mut self, route: &Route) {
        match route {
            Route::Dashboard => self.load_dashboard(),
            Route::Market => {
                self.load_markets();
                self.load_watchlist();
            }
            Route::CoinDetail(coin_id) => {
                self.store.coin.open(coin_id);
                self.load_chart();
                if self.store.watchlist.is_empty() {
                    self.load_watchlist();
                }
            }
            Route::Trading(coin_id) => {
                if self.store.find_coin(coin_id).is_none() {
                    self.store.coin.open(coin_id);
                    self.load_chart();
                }
            }
            Route::Wallet => self.load_wallet(),
            Route::Orders => self.load_orders(),
            Route::Watchlist => {
                self.load_watchlist();
                if self.store.markets.coins.is_empty() {
                    self.load_markets();
                }
            }
            Route::Profile => self.store.session.fetch_current_user().await,
            Route::Login | Route::Signup | Route::TwoFactor | Route::NotFound(_) => {}
        }
    }

    /// Run `task` in the background and send its action back.
    ///
    /// A 401 becomes [`Action::SessionExpired`]; any other failure is
    /// reported against `ticket`.
    fn spawn_fetch<F>(&self, ticket: Ticket, task: F)
    where
        F: Future<Output = Result<Action>> + Send + 'static,
    {
        let tx = self.store.sender();
        tokio::spawn(async move {
            let action = match task.await {
                Ok(action) => action,
                Err(e) if e.is_unauthorized() => Action::SessionExpired,
                Err(e) => {
                    tracing::warn!(error = %e, resource = ?ticket.resource, "Request failed");
                    Action::RequestFailed {
                        ticket,
                        message: e.user_message(),
                    }
                }
            };
            let _ = tx.send(action);
        });
    }

    /// Like [`App::spawn_fetch`] for writes; failures become an error notification.
    fn spawn_mutation<F>(&self, what: &'static str, task: F)
    where
        F: Future<Output = Result<Action>> + Send + 'static,
    {
        let tx = self.store.sender();
        tokio::spawn(async move {
            let action = match task.await {
                Ok(action) => action,
                Err(e) if e.is_unauthorized() => Action::SessionExpired,
                Err(e) => {
                    tracing::warn!(error = %e, "{what} failed");
                    Action::ShowNotification(Notification::error(e.user_message()))
                }
            };
            let _ = tx.send(action);
        });
    }

    fn load_markets(&mut self) {
        let ticket = self.store.begin_request(Resource::Markets);
        let api = Arc::clone(&self.api);
        let page = self.store.markets.page;
        tracing::debug!(page, "Loading markets");
        self.spawn_fetch(ticket, async move {
            let coins = api.coins_page(page).await?;
            Ok(Action::MarketsLoaded { ticket, coins })
        });
    }

    fn load_watchlist(&mut self) {
        let ticket = self.store.begin_request(Resource::Watchlist);
        let api = Arc::clone(&self.api);
        self.spawn_fetch(ticket, async move {
            let items = api.watchlist().await?;
            Ok(Action::WatchlistLoaded { ticket, items })
        });
    }

    fn load_chart(&mut self) {
        let Some(coin_id) = self.store.coin.coin_id.clone() else {
            return;
        };
        let ticket = self.store.begin_request(Resource::Chart);
        let api = Arc::clone(&self.api);
        let days = self.store.coin.days;
        self.spawn_fetch(ticket, async move {
            let chart = api.market_chart(&coin_id, days).await?;
            Ok(Action::ChartLoaded {
                ticket,
                coin_id,
                chart,
            })
        });
    }

    fn load_dashboard(&mut self) {
        let ticket = self.store.begin_request(Resource::Dashboard);
        let api = Arc::clone(&self.api);
        self.spawn_fetch(ticket, async move {
            let (top_coins, wallet, transactions, orders) = futures::join!(
                api.top_coins(),
                api.wallet(),
                api.wallet_transactions(),
                api.orders()
            );

            let unauthorized = [
                top_coins.as_ref().err(),
                wallet.as_ref().err(),
                transactions.as_ref().err(),
                orders.as_ref().err(),
            ]
            .into_iter()
            .flatten()
            .any(Error::is_unauthorized);
            if unauthorized {
                return Err(Error::Unauthorized);
            }

            let snapshot = DashboardSnapshot {
                top_coins: partial("top coins", top_coins),
                wallet: partial("wallet", wallet),
                transactions: partial("transactions", transactions),
                orders: partial("orders", orders),
            };
            Ok(Action::DashboardLoaded {
                ticket,
                snapshot: Box::new(snapshot),
            })
        });
    }

    fn load_wallet(&mut self) {
        let ticket = self.store.begin_request(Resource::Wallet);
        let api = Arc::clone(&self.api);
        self.spawn_fetch(ticket, async move {
            let (wallet, transactions, withdrawals) =
                futures::try_join!(api.wallet(), api.wallet_transactions(), api.withdrawals())?;
            Ok(Action::WalletLoaded {
                ticket,
                wallet,
                transactions,
                withdrawals,
            })
        });
    }

    fn load_orders(&mut self) {
        let ticket = self.store.begin_request(Resource::Orders);
        let api = Arc::clone(&self.api);
        self.spawn_fetch(ticket, async move {
            let orders = api.orders().await?;
            Ok(Action::OrdersLoaded { ticket, orders })
        });
    }

    fn load_order_detail(&mut self) {
        let Some(order_id) = self.store.orders.selected_order().map(|o| o.id) else {
            return;
        };
        let ticket = self.store.begin_request(Resource::OrderDetail);
        let api = Arc::clone(&self.api);
        self.spawn_fetch(ticket, async move {
            let order = api.order(order_id).await?;
            Ok(Action::OrderLoaded { ticket, order })
        });
    }

    fn search(&mut self, query: String) {
        let ticket = self.store.begin_request(Resource::Search);
        let api = Arc::clone(&self.api);
        tracing::debug!(%query, "Searching coins");
        self.spawn_fetch(ticket, async move {
            let hits = api.search_coins(&query).await?;
            Ok(Action::SearchLoaded {
                ticket,
                query,
                hits,
            })
        });
    }

    /// Flip the coin in the local set now; undo it if the backend refuses.
    fn toggle_watchlist(&mut self, coin_id: &str) {
        let change = self.store.watchlist.toggle(coin_id);
        // A list fetched before the toggle would overwrite it.
        self.store.requests.issue(Resource::Watchlist);
        self.store.watchlist.loading = false;
        let message = match &change {
            WatchlistChange::Added(id) => format!("Added {id} to watchlist"),
            WatchlistChange::Removed(id) => format!("Removed {id} from watchlist"),
        };
        self.store.notify(Notification::info(message));

        let api = Arc::clone(&self.api);
        let tx = self.store.sender();
        tokio::spawn(async move {
            let result = match &change {
                WatchlistChange::Added(id) => api.add_to_watchlist(id).await.map(|_| ()),
                WatchlistChange::Removed(id) => api.remove_from_watchlist(id).await,
            };

            if let Err(e) = result {
                tracing::warn!(error = %e, coin_id = change.coin_id(), "Watchlist update rejected");
                let expired = e.is_unauthorized();
                let _ = tx.send(Action::WatchlistRejected {
                    change,
                    message: e.user_message(),
                });
                if expired {
                    let _ = tx.send(Action::SessionExpired);
                }
            }
        });
    }

    async fn submit(&mut self, submission: FormSubmission) {
        match submission {
            FormSubmission::Login { email, password } => {
                self.store.session.login(&email, &password).await;
                self.after_auth().await;
            }
            FormSubmission::Signup {
                full_name,
                email,
                password,
            } => {
                self.store
                    .session
                    .signup(&full_name, &email, &password)
                    .await;
                self.after_auth().await;
            }
            FormSubmission::TwoFactor { code } => {
                self.store.session.verify_two_factor(&code).await;
                self.after_auth().await;
            }
            FormSubmission::Trade(request) => {
                self.set_form_error(None);
                tracing::info!(
                    coin_id = %request.coin_id,
                    side = %request.order_type,
                    "Placing order"
                );
                let api = Arc::clone(&self.api);
                self.spawn_mutation("Order", async move {
                    Ok(Action::OrderPlaced(api.create_order(request).await?))
                });
            }
            FormSubmission::Deposit(amount) => {
                self.set_form_error(None);
                let api = Arc::clone(&self.api);
                self.spawn_mutation("Deposit", async move {
                    Ok(Action::Deposited(api.deposit(amount).await?))
                });
            }
            FormSubmission::Withdraw(amount) => {
                self.set_form_error(None);
                let api = Arc::clone(&self.api);
                self.spawn_mutation("Withdrawal", async move {
                    Ok(Action::WithdrawalRequested(api.withdraw(amount).await?))
                });
            }
        }
    }

    /// Route the user after a sign-in step finished.
    async fn after_auth(&mut self) {
        let session = self.store.session.session();

        if session.is_authenticated() {
            let greeting = match &session.user {
                Some(user) => format!("Welcome, {}", user.first_name()),
                None => "Signed in".to_string(),
            };
            self.store.app.close_form();
            self.store.app.history.clear();
            self.store.app.redirect(Route::Dashboard);
            self.store.notify(Notification::success(greeting));
            self.resolve_route().await;
        } else if session.two_factor_required() && self.store.app.route != Route::TwoFactor {
            self.store.reduce(Action::Navigate(Route::TwoFactor));
            self.resolve_route().await;
        } else {
            let error = session.error.clone();
            self.set_form_error(error);
        }
    }

    async fn expire_session(&mut self) {
        if self.store.app.route == Route::Login && !self.store.session.session().is_authenticated()
        {
            return;
        }
        self.drop_session();
        self.resolve_route().await;
    }

    fn drop_session(&mut self) {
        tracing::info!(route = %self.store.app.route, "Session expired");
        self.store.session.expire();
        self.store.reset_account_data();
        self.store.app.redirect(Route::Login);
        self.store.notify(Notification::warning(
            "Session expired, please sign in again",
        ));
    }

    /// A protected screen lost its session while loading. Returns whether
    /// the route was abandoned.
    fn leave_if_signed_out(&mut self, route: &Route) -> bool {
        let session = self.store.session.session();
        if route.access() != Access::Protected || session.is_authenticated() {
            return false;
        }

        if session.expired {
            self.drop_session();
        } else {
            tracing::info!(%route, "Signed out while loading");
            self.store.reset_account_data();
            self.store.app.redirect(Route::Login);
        }
        true
    }

    fn set_form_error(&mut self, error: Option<String>) {
        if let Some(form) = self.store.app.form.as_mut() {
            form.error = error;
        }
    }

    /// Enter pressed in the search box or on the command line.
    fn submit_input(&mut self) -> Option<Action> {
        match self.store.app.input_mode {
            InputMode::Search => {
                self.store.app.input_mode = InputMode::Normal;
                None
            }
            InputMode::Command => {
                let command = std::mem::take(&mut self.store.app.input_buffer);
                self.store.app.clear_input();
                self.store.app.input_mode = InputMode::Normal;
                self.run_command(command.trim())
            }
            InputMode::Normal | InputMode::Form => None,
        }
    }

    /// `:goto /path`, `:search term`, `:refresh`, `:logout`, `:q`.
    fn run_command(&mut self, command: &str) -> Option<Action> {
        let (name, arg) = match command.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (command, ""),
        };

        match name {
            "" => None,
            "q" | "quit" => Some(Action::Quit),
            "logout" => Some(Action::Logout),
            "refresh" => Some(Action::Refresh),
            "help" => Some(Action::ToggleHelp),
            "goto" | "go" if !arg.is_empty() => Some(Action::Navigate(Route::parse(arg))),
            "search" if !arg.is_empty() => {
                if self.store.session.session().is_authenticated() {
                    self.search(arg.to_string());
                }
                (self.store.app.route != Route::Market).then_some(Action::Navigate(Route::Market))
            }
            path if path.starts_with('/') => Some(Action::Navigate(Route::parse(path))),
            _ => {
                tracing::debug!(command, "Unknown command");
                self.store
                    .notify(Notification::error(format!("Unknown command: {command}")));
                None
            }
        }
    }
}

/// Keep a dashboard section that loaded; log the ones that didn't.
fn partial<T>(what: &str, result: Result<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(error = %e, section = what, "Dashboard section failed");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{AuthResponse, MockAuthGateway, MockTradingApi};
    use crate::session::{SessionStatus, User, UserRole};
    use crate::state::{Order, Wallet, WatchListItem};
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    const IDLE: Duration = Duration::from_millis(50);

    fn user() -> User {
        User {
            id: 7,
            full_name: "Ada Lovelace".into(),
            email: "ada@example.com".into(),
            role: UserRole::Customer,
            two_factor_enabled: false,
        }
    }

    fn signed_in_gateway() -> MockAuthGateway {
        let mut auth = MockAuthGateway::new();
        auth.expect_current_user().returning(|| Ok(user()));
        auth
    }

    /// Answers the four dashboard reads.
    fn dashboard_api() -> MockTradingApi {
        let mut api = MockTradingApi::new();
        api.expect_top_coins().returning(|| Ok(Vec::new()));
        api.expect_wallet().returning(|| {
            Ok(Wallet {
                id: 1,
                balance: dec!(100),
            })
        });
        api.expect_wallet_transactions()
            .returning(|| Ok(Vec::new()));
        api.expect_orders()
            .returning(|| Ok(vec![Order::default()]));
        api
    }

    fn app(
        api: MockTradingApi,
        auth: MockAuthGateway,
        credentials: Arc<MemoryCredentials>,
    ) -> App {
        App::with_services(Config::default(), Arc::new(api), Arc::new(auth), credentials)
    }

    fn fill_form(app: &mut App, values: &[&str]) {
        let form = app.store.app.form.as_mut().expect("form open");
        for (field, value) in form.fields.iter_mut().zip(values) {
            field.value = (*value).to_string();
        }
    }

    #[tokio::test]
    async fn test_start_without_token_shows_login() {
        let mut auth = MockAuthGateway::new();
        auth.expect_current_user().never();
        let mut app = app(
            MockTradingApi::new(),
            auth,
            Arc::new(MemoryCredentials::new()),
        );

        app.start().await;

        assert_eq!(app.store().app.route, Route::Login);
        assert_eq!(
            app.store().app.form.as_ref().map(|f| f.kind.clone()),
            Some(FormKind::Login)
        );
        assert_eq!(app.store().app.input_mode, InputMode::Form);
    }

    #[tokio::test]
    async fn test_protected_route_redirects_anonymous() {
        let mut app = app(
            MockTradingApi::new(),
            MockAuthGateway::new(),
            Arc::new(MemoryCredentials::new()),
        );
        app.start().await;

        app.handle_action(Action::Navigate(Route::Wallet))
            .await
            .unwrap();
        assert_eq!(app.store().app.route, Route::Login);
    }

    #[tokio::test]
    async fn test_login_lands_on_dashboard() {
        let mut auth = signed_in_gateway();
        auth.expect_signin().times(1).returning(|_, _| {
            Ok(AuthResponse {
                status: true,
                jwt: Some("jwt-1".into()),
                ..AuthResponse::default()
            })
        });
        let credentials = Arc::new(MemoryCredentials::new());
        let mut app = app(dashboard_api(), auth, credentials.clone());
        app.start().await;

        fill_form(&mut app, &["ada@example.com", "analytical"]);
        app.handle_action(Action::SubmitForm).await.unwrap();

        assert_eq!(app.store().app.route, Route::Dashboard);
        assert!(app.store().app.form.is_none());
        assert_eq!(credentials.token().as_deref(), Some("jwt-1"));

        app.drain_actions(IDLE).await.unwrap();
        assert_eq!(app.store().wallet.balance(), dec!(100));
        assert_eq!(app.store().orders.orders.len(), 1);
        assert!(!app.store().dashboard.loading);
    }

    #[tokio::test]
    async fn test_two_factor_login_asks_for_code() {
        let mut auth = MockAuthGateway::new();
        auth.expect_signin().returning(|_, _| {
            Ok(AuthResponse {
                two_factor_auth_enabled: true,
                session: Some("otp-1".into()),
                ..AuthResponse::default()
            })
        });
        auth.expect_current_user().never();
        let mut app = app(
            MockTradingApi::new(),
            auth,
            Arc::new(MemoryCredentials::new()),
        );
        app.start().await;

        fill_form(&mut app, &["ada@example.com", "analytical"]);
        app.handle_action(Action::SubmitForm).await.unwrap();

        assert_eq!(app.store().app.route, Route::TwoFactor);
        assert_eq!(
            app.store().app.form.as_ref().map(|f| f.kind.clone()),
            Some(FormKind::TwoFactor)
        );
        assert!(!app.store().session.session().is_authenticated());
    }

    #[tokio::test]
    async fn test_invalid_form_never_reaches_backend() {
        let mut auth = MockAuthGateway::new();
        auth.expect_signin().never();
        let mut app = app(
            MockTradingApi::new(),
            auth,
            Arc::new(MemoryCredentials::new()),
        );
        app.start().await;

        fill_form(&mut app, &["not-an-email", "analytical"]);
        app.handle_action(Action::SubmitForm).await.unwrap();

        assert_eq!(
            app.store().app.form.as_ref().and_then(|f| f.error.as_deref()),
            Some("Invalid email format")
        );
        assert_eq!(app.store().app.route, Route::Login);
    }

    #[tokio::test]
    async fn test_rejected_login_shows_backend_message() {
        let mut auth = MockAuthGateway::new();
        auth.expect_signin()
            .returning(|_, _| Err(Error::api(401, "Invalid password")));
        let mut app = app(
            MockTradingApi::new(),
            auth,
            Arc::new(MemoryCredentials::new()),
        );
        app.start().await;

        fill_form(&mut app, &["ada@example.com", "wrong-password"]);
        app.handle_action(Action::SubmitForm).await.unwrap();

        assert_eq!(app.store().app.route, Route::Login);
        assert_eq!(
            app.store().app.form.as_ref().and_then(|f| f.error.as_deref()),
            Some("Invalid password")
        );
    }

    #[tokio::test]
    async fn test_unauthorized_fetch_returns_to_login() {
        let mut api = MockTradingApi::new();
        api.expect_top_coins()
            .returning(|| Err(Error::Unauthorized));
        api.expect_wallet().returning(|| Ok(Wallet::default()));
        api.expect_wallet_transactions()
            .returning(|| Ok(Vec::new()));
        api.expect_orders().returning(|| Ok(Vec::new()));

        let credentials = Arc::new(MemoryCredentials::with_token("stale"));
        let mut app = app(api, signed_in_gateway(), credentials.clone());
        app.start().await;
        assert_eq!(app.store().app.route, Route::Dashboard);

        app.drain_actions(IDLE).await.unwrap();

        assert_eq!(app.store().app.route, Route::Login);
        assert_eq!(
            app.store().session.session().status,
            SessionStatus::Anonymous
        );
        assert!(app.store().session.session().user.is_none());
        assert!(!credentials.has_token());
    }

    #[tokio::test]
    async fn test_profile_rejection_returns_to_login() {
        let mut auth = MockAuthGateway::new();
        let mut calls = 0;
        auth.expect_current_user().returning(move || {
            calls += 1;
            if calls == 1 {
                Ok(user())
            } else {
                Err(Error::Unauthorized)
            }
        });

        let credentials = Arc::new(MemoryCredentials::with_token("jwt"));
        let mut app = app(dashboard_api(), auth, credentials.clone());
        app.start().await;
        assert_eq!(app.store().app.route, Route::Dashboard);

        app.handle_action(Action::Navigate(Route::Profile))
            .await
            .unwrap();

        assert_eq!(app.store().app.route, Route::Login);
        assert_eq!(
            app.store().session.session().status,
            SessionStatus::Anonymous
        );
        assert!(!credentials.has_token());
        assert_eq!(
            app.store()
                .app
                .notification
                .as_ref()
                .map(|n| n.message.as_str()),
            Some("Session expired, please sign in again")
        );

        app.drain_actions(IDLE).await.unwrap();
        assert!(app.store().orders.orders.is_empty());
    }

    #[tokio::test]
    async fn test_profile_refresh_outage_leaves_screen() {
        let mut auth = MockAuthGateway::new();
        let mut calls = 0;
        auth.expect_current_user().returning(move || {
            calls += 1;
            if calls <= 2 {
                Ok(user())
            } else {
                Err(Error::api(503, "Service Unavailable"))
            }
        });

        let credentials = Arc::new(MemoryCredentials::with_token("jwt"));
        let mut app = app(dashboard_api(), auth, credentials.clone());
        app.start().await;
        app.handle_action(Action::Navigate(Route::Profile))
            .await
            .unwrap();
        assert_eq!(app.store().app.route, Route::Profile);

        app.handle_action(Action::Refresh).await.unwrap();

        assert_eq!(app.store().app.route, Route::Login);
        assert!(!app.store().session.session().is_authenticated());
        assert!(credentials.has_token());
    }

    #[tokio::test]
    async fn test_watchlist_toggle_outlives_earlier_load() {
        let mut api = dashboard_api();
        api.expect_coins_page().returning(|_| Ok(Vec::new()));
        api.expect_watchlist().returning(|| Ok(Vec::new()));
        api.expect_add_to_watchlist()
            .times(1)
            .returning(|_| Ok(WatchListItem::default()));

        let mut app = app(
            api,
            signed_in_gateway(),
            Arc::new(MemoryCredentials::with_token("jwt")),
        );
        app.start().await;
        app.handle_action(Action::Navigate(Route::Market))
            .await
            .unwrap();
        app.handle_action(Action::ToggleWatchlist("bitcoin".into()))
            .await
            .unwrap();

        app.drain_actions(IDLE).await.unwrap();
        assert!(app.store().watchlist.contains("bitcoin"));
        assert!(!app.store().watchlist.loading);
    }

    #[tokio::test]
    async fn test_watchlist_toggle_rolls_back_on_failure() {
        let mut api = dashboard_api();
        api.expect_add_to_watchlist()
            .times(1)
            .returning(|_| Err(Error::api(404, "Coin not found")));

        let mut app = app(
            api,
            signed_in_gateway(),
            Arc::new(MemoryCredentials::with_token("jwt")),
        );
        app.start().await;

        app.handle_action(Action::ToggleWatchlist("bitcoin".into()))
            .await
            .unwrap();
        assert!(app.store().watchlist.contains("bitcoin"));

        app.drain_actions(IDLE).await.unwrap();
        assert!(!app.store().watchlist.contains("bitcoin"));
        assert_eq!(
            app.store()
                .app
                .notification
                .as_ref()
                .map(|n| n.message.as_str()),
            Some("Coin not found")
        );
    }

    #[tokio::test]
    async fn test_goto_command_navigates() {
        let mut app = app(
            dashboard_api(),
            signed_in_gateway(),
            Arc::new(MemoryCredentials::with_token("jwt")),
        );
        app.start().await;

        app.handle_action(Action::SetInputMode(InputMode::Command))
            .await
            .unwrap();
        for c in "goto /nowhere".chars() {
            app.handle_action(Action::InputChar(c)).await.unwrap();
        }
        app.handle_action(Action::SubmitInput).await.unwrap();

        assert_eq!(app.store().app.route, Route::NotFound("/nowhere".into()));
        assert_eq!(app.store().app.input_mode, InputMode::Normal);
        assert!(app.store().app.input_buffer.is_empty());
    }

    #[tokio::test]
    async fn test_logout_forgets_everything() {
        let credentials = Arc::new(MemoryCredentials::with_token("jwt"));
        let mut app = app(dashboard_api(), signed_in_gateway(), credentials.clone());
        app.start().await;
        app.drain_actions(IDLE).await.unwrap();
        assert!(app.store().session.session().is_authenticated());

        app.handle_action(Action::Logout).await.unwrap();

        assert_eq!(app.store().app.route, Route::Login);
        assert!(!app.store().session.session().is_authenticated());
        assert!(!credentials.has_token());
        assert!(app.store().orders.orders.is_empty());
        assert!(app.store().wallet.wallet.is_none());
    }
}
