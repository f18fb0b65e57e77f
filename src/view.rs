use alloy::primitives::Address;
use std::time::{Duration, Instant};

/// How long the "copied" feedback stays visible after a copy action.
pub const COPY_FEEDBACK_TTL: Duration = Duration::from_millis(2000);

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Page {
    #[default]
    Home,
    Admin,
    Roadmap,
}

/// What the terminal shows this frame. Pages are only reachable while a
/// wallet session is attached on the expected chain.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Screen {
    Connect,
    WrongNetwork,
    Page(Page),
}

/// Gating facts derived from the session and the contract's owner read.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct SessionFacts {
    pub connected: bool,
    pub chain_ok: bool,
    pub is_owner: bool,
}

/// Unknown on either side, or unequal, means not the owner.
pub fn owner_match(address: Option<Address>, owner: Option<Address>) -> bool {
    matches!((address, owner), (Some(a), Some(o)) if a == o)
}

/// Deterministic page selection. Holds the last explicit navigation choice
/// and maps it, together with the session facts, to exactly one screen.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ViewState {
    nav: Page,
}

impl ViewState {
    /// Record an explicit navigation request. Admin is refused outright for
    /// non-owners; the selection stays where it was.
    pub fn navigate(&mut self, to: Page, facts: SessionFacts) {
        if to == Page::Admin && !facts.is_owner {
            return;
        }
        self.nav = to;
    }

    /// Select the screen for the current facts, highest rule first:
    /// disconnected beats wrong-network beats the stored page. Disconnecting
    /// also resets the stored page, so a later reconnect lands on Home
    /// rather than resuming Admin. Ownership is re-checked here on every
    /// resolution; a stored Admin selection without ownership renders Home
    /// without being overwritten, so a still-loading owner read does not
    /// discard the user's choice.
    pub fn resolve(&mut self, facts: SessionFacts) -> Screen {
        if !facts.connected {
            self.nav = Page::Home;
            return Screen::Connect;
        }
        if !facts.chain_ok {
            return Screen::WrongNetwork;
        }
        if self.nav == Page::Admin && !facts.is_owner {
            return Screen::Page(Page::Home);
        }
        Screen::Page(self.nav)
    }

    pub fn current(&self) -> Page {
        self.nav
    }
}

/// Zero-or-one notice message. Opening over a visible notice replaces it.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Popup {
    message: Option<String>,
}

impl Popup {
    pub fn open(&mut self, message: impl Into<String>) {
        self.message = Some(message.into());
    }

    pub fn close(&mut self) {
        self.message = None;
    }

    pub fn is_visible(&self) -> bool {
        self.message.is_some()
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

/// Wallet-address menu. A pointer press outside its bounds closes it; the
/// same press while it is already closed must not count as a state change.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Dropdown {
    open: bool,
}

impl Dropdown {
    pub fn toggle(&mut self) {
        self.open = !self.open;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Returns whether the press changed anything.
    pub fn press_outside(&mut self) -> bool {
        if self.open {
            self.open = false;
            true
        } else {
            false
        }
    }
}

/// Copied-to-clipboard indicator with a single pending deadline. A repeat
/// copy restarts the window rather than stacking a second timer.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct CopyFeedback {
    since: Option<Instant>,
}

impl CopyFeedback {
    pub fn activate(&mut self, now: Instant) {
        self.since = Some(now);
    }

    /// Clear the flag once the window has fully elapsed. Returns whether the
    /// flag changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.since {
            Some(since) if now.saturating_duration_since(since) >= COPY_FEEDBACK_TTL => {
                self.since = None;
                true
            }
            _ => false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.since.is_some()
    }
}

/// One-shot gate for the terminal bell rung on the first connect attempt.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct BellGate {
    fired: bool,
}

impl BellGate {
    /// True exactly once per session.
    pub fn fire(&mut self) -> bool {
        if self.fired {
            return false;
        }
        self.fired = true;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::address;

    const OWNER: Address = address!("95113fe45a8d5caea05a2cfea3b4613a4fa10fc7");
    const VISITOR: Address = address!("00000000000000000000000000000000000000a1");

    #[test]
    fn owner_match__requires_both_sides_known_and_equal() {
        assert!(owner_match(Some(OWNER), Some(OWNER)));
        assert!(!owner_match(Some(VISITOR), Some(OWNER)));
        assert!(!owner_match(None, Some(OWNER)));
        assert!(!owner_match(Some(OWNER), None));
        assert!(!owner_match(None, None));
    }

    #[test]
    fn navigate__refuses_admin_for_non_owner() {
        let mut view = ViewState::default();
        let facts = SessionFacts {
            connected: true,
            chain_ok: true,
            is_owner: false,
        };
        view.navigate(Page::Admin, facts);
        assert_eq!(view.current(), Page::Home);
    }

    #[test]
    fn navigate__admits_owner_to_admin() {
        let mut view = ViewState::default();
        let facts = SessionFacts {
            connected: true,
            chain_ok: true,
            is_owner: true,
        };
        view.navigate(Page::Admin, facts);
        assert_eq!(view.current(), Page::Admin);
    }

    #[test]
    fn bell_gate__fires_once() {
        let mut gate = BellGate::default();
        assert!(gate.fire());
        assert!(!gate.fire());
        assert!(!gate.fire());
    }
}
