//! Event handler for turning terminal input into actions.

use crossterm::event::{KeyEvent, KeyEventKind, MouseEvent, MouseEventKind};

use super::{Event, InputEvent, Key};
use crate::config::KeyBindings;
use crate::router::Route;
use crate::state::{Action, FormKind, InputMode, OrderType, Store};

/// Maps input to [`Action`]s based on the current screen and input mode.
#[derive(Debug, Clone)]
pub struct EventHandler {
    /// Key bindings.
    keybindings: KeyBindings,
    mouse_support: bool,
}

impl EventHandler {
    pub fn new(keybindings: KeyBindings, mouse_support: bool) -> Self {
        Self {
            keybindings,
            mouse_support,
        }
    }

    /// Translate one terminal event.
    pub fn handle_event(&self, event: &Event, store: &Store) -> Option<Action> {
        match event {
            Event::Tick => Some(Action::Tick),
            Event::Key(key) => self.handle_key(*key, store),
            Event::Mouse(mouse) if self.mouse_support => self.handle_mouse(*mouse),
            _ => None,
        }
    }

    /// Handle a key event and return an optional action.
    pub fn handle_key(&self, key: KeyEvent, store: &Store) -> Option<Action> {
        // Only process key press events
        if key.kind != KeyEventKind::Press {
            return None;
        }

        let input = InputEvent::from(key);
        if input.ctrl() && input.key == Key::Char('c') {
            return Some(Action::Quit);
        }

        match store.app.input_mode {
            InputMode::Normal => self.handle_normal_mode(input, store),
            InputMode::Form => self.handle_form_mode(input, store),
            InputMode::Search => Self::handle_search_mode(input),
            InputMode::Command => Self::handle_command_mode(input),
        }
    }

    fn handle_mouse(&self, mouse: MouseEvent) -> Option<Action> {
        match mouse.kind {
            MouseEventKind::ScrollUp => Some(Action::ScrollUp),
            MouseEventKind::ScrollDown => Some(Action::ScrollDown),
            _ => None,
        }
    }

    fn handle_normal_mode(&self, input: InputEvent, store: &Store) -> Option<Action> {
        let keys = &self.keybindings;

        if store.app.show_help {
            return (input.matches(&keys.help) || input.matches(&keys.back))
                .then_some(Action::ToggleHelp);
        }

        // Global shortcuts
        if input.matches(&keys.quit) {
            return Some(Action::Quit);
        }
        if input.matches(&keys.help) {
            return Some(Action::ToggleHelp);
        }
        if input.matches(&keys.command) {
            return Some(Action::SetInputMode(InputMode::Command));
        }
        if store.app.notification.is_some() && input.key == Key::Escape {
            return Some(Action::DismissNotification);
        }
        if input.matches(&keys.back) || input.key == Key::Backspace {
            return Some(Action::Back);
        }

        if !store.session.session().is_authenticated() {
            return None;
        }

        if input.matches(&keys.refresh) {
            return Some(Action::Refresh);
        }
        if input.matches(&keys.logout) {
            return Some(Action::Logout);
        }

        // Screen switching
        let tabs = [
            (&keys.dashboard, Route::Dashboard),
            (&keys.market, Route::Market),
            (&keys.wallet, Route::Wallet),
            (&keys.orders, Route::Orders),
            (&keys.watchlist, Route::Watchlist),
            (&keys.profile, Route::Profile),
        ];
        if let Some((_, route)) = tabs.into_iter().find(|(binding, _)| input.matches(binding)) {
            return Some(Action::Navigate(route));
        }
        if matches!(input.key, Key::Tab | Key::BackTab) {
            return Some(Action::Navigate(Self::adjacent_tab(
                &store.app.route,
                input.key == Key::Tab,
            )));
        }

        // List navigation
        if input.matches(&keys.up) || input.key == Key::Up {
            return Some(Action::ScrollUp);
        }
        if input.matches(&keys.down) || input.key == Key::Down {
            return Some(Action::ScrollDown);
        }
        match input.key {
            Key::PageUp => return Some(Action::PageUp),
            Key::PageDown => return Some(Action::PageDown),
            Key::Home => return Some(Action::GoToTop),
            Key::End => return Some(Action::GoToBottom),
            _ => {}
        }
        if input.matches(&keys.select) {
            return Some(Action::Select);
        }

        self.handle_screen_keys(input, store)
    }

    /// Keys that only mean something on a particular screen.
    fn handle_screen_keys(&self, input: InputEvent, store: &Store) -> Option<Action> {
        let keys = &self.keybindings;
        let left = input.matches(&keys.left) || input.key == Key::Left;
        let right = input.matches(&keys.right) || input.key == Key::Right;

        if input.matches(&keys.toggle_watchlist) {
            return store.focused_coin_id().map(Action::ToggleWatchlist);
        }
        if input.matches(&keys.buy) || input.matches(&keys.sell) {
            let side = if input.matches(&keys.buy) {
                OrderType::Buy
            } else {
                OrderType::Sell
            };
            return Self::trade_action(store, side);
        }

        match &store.app.route {
            Route::Market => {
                if input.matches(&keys.search) {
                    Some(Action::SetInputMode(InputMode::Search))
                } else if input.matches(&keys.cycle_sort) {
                    Some(Action::CycleSort)
                } else if left {
                    Some(Action::PrevPage)
                } else if right {
                    Some(Action::NextPage)
                } else {
                    None
                }
            }
            Route::CoinDetail(_) if left || right => Some(Action::CycleChartDays),
            Route::Orders if left || right => Some(Action::CycleOrderFilter),
            Route::Wallet => {
                if input.matches(&keys.deposit) {
                    Some(Action::OpenForm(FormKind::Deposit))
                } else if input.matches(&keys.withdraw) {
                    Some(Action::OpenForm(FormKind::Withdraw))
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    fn handle_form_mode(&self, input: InputEvent, store: &Store) -> Option<Action> {
        let route = &store.app.route;

        match input.key {
            Key::Enter => Some(Action::SubmitForm),
            Key::Backspace => Some(Action::InputBackspace),
            Key::Escape => match route {
                Route::Login => None,
                Route::Signup | Route::TwoFactor => Some(Action::Navigate(Route::Login)),
                Route::Trading(_) => Some(Action::Back),
                _ => Some(Action::CloseForm),
            },
            Key::Tab | Key::BackTab => match store.app.form.as_ref().map(|f| &f.kind) {
                Some(FormKind::Trade { coin_id, side }) => {
                    let side = match side {
                        OrderType::Buy => OrderType::Sell,
                        OrderType::Sell => OrderType::Buy,
                    };
                    Some(Action::OpenForm(FormKind::Trade {
                        coin_id: coin_id.clone(),
                        side,
                    }))
                }
                _ if input.key == Key::Tab => Some(Action::NextField),
                _ => Some(Action::PrevField),
            },
            Key::Down => Some(Action::NextField),
            Key::Up => Some(Action::PrevField),
            Key::Char('n') if input.ctrl() && *route == Route::Login => {
                Some(Action::Navigate(Route::Signup))
            }
            _ => input.text().map(Action::InputChar),
        }
    }

    fn handle_search_mode(input: InputEvent) -> Option<Action> {
        match input.key {
            Key::Escape => Some(Action::CancelInput),
            Key::Enter => Some(Action::SetInputMode(InputMode::Normal)),
            Key::Backspace => Some(Action::InputBackspace),
            _ => input.text().map(Action::InputChar),
        }
    }

    fn handle_command_mode(input: InputEvent) -> Option<Action> {
        match input.key {
            Key::Escape => Some(Action::CancelInput),
            Key::Enter => Some(Action::SubmitInput),
            Key::Backspace => Some(Action::InputBackspace),
            Key::Left => Some(Action::InputLeft),
            Key::Right => Some(Action::InputRight),
            _ => input.text().map(Action::InputChar),
        }
    }

    fn trade_action(store: &Store, side: OrderType) -> Option<Action> {
        let coin_id = store.focused_coin_id()?;
        match &store.app.route {
            Route::Trading(_) => Some(Action::OpenForm(FormKind::Trade { coin_id, side })),
            _ => Some(Action::Navigate(Route::Trading(coin_id))),
        }
    }

    fn adjacent_tab(current: &Route, forward: bool) -> Route {
        let len = Route::TABS.len();
        let idx = current.tab_index().unwrap_or(0);
        let next = if forward { (idx + 1) % len } else { (idx + len - 1) % len };
        Route::TABS[next].clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{MemoryCredentials, MockAuthGateway};
    use crate::session::{SessionStore, User, UserRole};
    use crate::state::{Coin, Form};
    use crossterm::event::{KeyCode, KeyModifiers};
    use std::sync::Arc;
    use tokio::sync::mpsc;

    fn store(authenticated: bool) -> Store {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut gateway = MockAuthGateway::new();
        gateway.expect_current_user().returning(|| {
            Ok(User {
                id: 1,
                full_name: "Ada".into(),
                email: "ada@example.com".into(),
                role: UserRole::Customer,
                two_factor_enabled: false,
            })
        });
        let credentials = Arc::new(MemoryCredentials::with_token("t"));
        let mut session = SessionStore::new(Arc::new(gateway), credentials);
        if authenticated {
            futures::executor::block_on(session.restore());
        }
        Store::new(tx, session)
    }

    fn handler() -> EventHandler {
        EventHandler::new(KeyBindings::default(), true)
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn char_key(c: char) -> KeyEvent {
        press(KeyCode::Char(c))
    }

    #[test]
    fn test_ctrl_c_always_quits() {
        let mut store = store(false);
        store.app.open_form(Form::new(FormKind::Login));
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert!(matches!(handler().handle_key(key, &store), Some(Action::Quit)));
    }

    #[test]
    fn test_tab_keys_need_session() {
        let anon = store(false);
        assert!(handler().handle_key(char_key('2'), &anon).is_none());

        let authed = store(true);
        assert!(matches!(
            handler().handle_key(char_key('2'), &authed),
            Some(Action::Navigate(Route::Market))
        ));
    }

    #[test]
    fn test_market_keys() {
        let mut store = store(true);
        store.app.route = Route::Market;
        store.markets.coins = vec![Coin {
            id: "bitcoin".into(),
            ..Coin::default()
        }];

        let h = handler();
        assert!(matches!(
            h.handle_key(char_key('/'), &store),
            Some(Action::SetInputMode(InputMode::Search))
        ));
        assert!(matches!(h.handle_key(char_key('s'), &store), Some(Action::CycleSort)));
        assert!(matches!(h.handle_key(char_key('l'), &store), Some(Action::NextPage)));
        assert!(matches!(
            h.handle_key(char_key('w'), &store),
            Some(Action::ToggleWatchlist(id)) if id == "bitcoin"
        ));
        assert!(matches!(
            h.handle_key(char_key('b'), &store),
            Some(Action::Navigate(Route::Trading(id))) if id == "bitcoin"
        ));
    }

    #[test]
    fn test_form_mode_types_text() {
        let mut store = store(false);
        store.app.route = Route::Login;
        store.app.open_form(Form::new(FormKind::Login));

        let h = handler();
        assert!(matches!(h.handle_key(char_key('q'), &store), Some(Action::InputChar('q'))));
        assert!(matches!(h.handle_key(press(KeyCode::Tab), &store), Some(Action::NextField)));
        assert!(matches!(h.handle_key(press(KeyCode::Enter), &store), Some(Action::SubmitForm)));
        let signup = KeyEvent::new(KeyCode::Char('n'), KeyModifiers::CONTROL);
        assert!(matches!(
            h.handle_key(signup, &store),
            Some(Action::Navigate(Route::Signup))
        ));
    }

    #[test]
    fn test_trade_form_tab_switches_side() {
        let mut store = store(true);
        store.app.route = Route::Trading("bitcoin".into());
        store.app.open_form(Form::new(FormKind::Trade {
            coin_id: "bitcoin".into(),
            side: OrderType::Buy,
        }));

        assert!(matches!(
            handler().handle_key(press(KeyCode::Tab), &store),
            Some(Action::OpenForm(FormKind::Trade { side: OrderType::Sell, .. }))
        ));
    }

    #[test]
    fn test_command_mode() {
        let mut store = store(true);
        store.app.input_mode = InputMode::Command;
        let h = handler();
        assert!(matches!(h.handle_key(char_key('q'), &store), Some(Action::InputChar('q'))));
        assert!(matches!(h.handle_key(press(KeyCode::Enter), &store), Some(Action::SubmitInput)));
        assert!(matches!(h.handle_key(press(KeyCode::Esc), &store), Some(Action::CancelInput)));
    }

    #[test]
    fn test_help_overlay_swallows_keys() {
        let mut store = store(true);
        store.app.show_help = true;
        let h = handler();
        assert!(h.handle_key(char_key('q'), &store).is_none());
        assert!(matches!(h.handle_key(char_key('?'), &store), Some(Action::ToggleHelp)));
    }

    #[test]
    fn test_adjacent_tab_wraps() {
        assert_eq!(EventHandler::adjacent_tab(&Route::Profile, true), Route::Dashboard);
        assert_eq!(EventHandler::adjacent_tab(&Route::Dashboard, false), Route::Profile);
        assert_eq!(
            EventHandler::adjacent_tab(&Route::CoinDetail("x".into()), true),
            Route::Wallet
        );
    }
}
