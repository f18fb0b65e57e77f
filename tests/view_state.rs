use proptest::prelude::*;
use std::time::{Duration, Instant};
use vending_machine::view::{
    COPY_FEEDBACK_TTL, CopyFeedback, Dropdown, Page, Popup, Screen, SessionFacts, ViewState,
};

fn facts(connected: bool, chain_ok: bool, is_owner: bool) -> SessionFacts {
    SessionFacts {
        connected,
        chain_ok,
        is_owner,
    }
}

#[test]
fn resolve__disconnected_always_wins() {
    for chain_ok in [false, true] {
        let mut view = ViewState::default();
        assert_eq!(view.resolve(facts(false, chain_ok, false)), Screen::Connect);
    }
    let mut view = ViewState::default();
    assert_eq!(view.resolve(facts(true, false, false)), Screen::WrongNetwork);
    assert_eq!(
        view.resolve(facts(true, true, false)),
        Screen::Page(Page::Home)
    );
}

#[test]
fn resolve__wrong_network_preserves_navigation() {
    let mut view = ViewState::default();
    let connected = facts(true, true, false);
    view.navigate(Page::Roadmap, connected);

    // when: the wallet drifts to a foreign chain
    assert_eq!(view.resolve(facts(true, false, false)), Screen::WrongNetwork);

    // then: correcting the network resumes the same page
    assert_eq!(view.resolve(connected), Screen::Page(Page::Roadmap));
}

#[test]
fn disconnect__resets_navigation_to_home() {
    let mut view = ViewState::default();
    let owner = facts(true, true, true);
    view.navigate(Page::Admin, owner);
    assert_eq!(view.resolve(owner), Screen::Page(Page::Admin));

    // when: the session detaches while Admin is selected
    assert_eq!(view.resolve(facts(false, true, true)), Screen::Connect);

    // then: reconnecting without further navigation lands on Home, never Admin
    assert_eq!(view.resolve(owner), Screen::Page(Page::Home));
    assert_eq!(view.current(), Page::Home);
}

#[test]
fn resolve__admin_requires_ownership_every_time() {
    let mut view = ViewState::default();
    view.navigate(Page::Admin, facts(true, true, true));

    // when: the owner read stops matching the session address
    assert_eq!(
        view.resolve(facts(true, true, false)),
        Screen::Page(Page::Home)
    );

    // then: ownership coming back restores the stored selection
    assert_eq!(
        view.resolve(facts(true, true, true)),
        Screen::Page(Page::Admin)
    );
}

fn any_page() -> impl Strategy<Value = Page> {
    prop_oneof![Just(Page::Home), Just(Page::Admin), Just(Page::Roadmap)]
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 256, .. ProptestConfig::default() })]
    #[test]
    fn resolve__precedence_is_total(
        connected in any::<bool>(),
        chain_ok in any::<bool>(),
        is_owner in any::<bool>(),
        nav in any_page(),
    ) {
        let mut view = ViewState::default();
        view.navigate(nav, facts(true, true, true));

        let screen = view.resolve(facts(connected, chain_ok, is_owner));

        match screen {
            Screen::Connect => prop_assert!(!connected),
            Screen::WrongNetwork => prop_assert!(connected && !chain_ok),
            Screen::Page(page) => {
                prop_assert!(connected && chain_ok);
                if page == Page::Admin {
                    prop_assert!(is_owner);
                }
            }
        }
        if !connected {
            // disconnecting also resets the stored page
            prop_assert_eq!(view.current(), Page::Home);
        }
    }
}

#[test]
fn copy_feedback__clears_after_exactly_two_seconds() {
    let mut feedback = CopyFeedback::default();
    let t0 = Instant::now();

    feedback.activate(t0);
    assert!(feedback.is_active());

    // 1999 ms in: nothing changes
    assert!(!feedback.tick(t0 + Duration::from_millis(1999)));
    assert!(feedback.is_active());

    // exactly 2000 ms in: the flag clears
    assert!(feedback.tick(t0 + COPY_FEEDBACK_TTL));
    assert!(!feedback.is_active());
}

#[test]
fn copy_feedback__reactivation_restarts_the_window() {
    let mut feedback = CopyFeedback::default();
    let t0 = Instant::now();

    feedback.activate(t0);
    feedback.activate(t0 + Duration::from_millis(1500));

    // the first deadline has passed, the restarted one has not
    assert!(!feedback.tick(t0 + Duration::from_millis(2500)));
    assert!(feedback.is_active());

    assert!(feedback.tick(t0 + Duration::from_millis(3500)));
    assert!(!feedback.is_active());
}

#[test]
fn popup__replaces_existing_message() {
    let mut popup = Popup::default();
    popup.open("LinkedIn | COMING SOON");
    popup.open("Portfolio | UNDER CONSTRUCTION");
    assert_eq!(popup.message(), Some("Portfolio | UNDER CONSTRUCTION"));

    popup.close();
    assert!(!popup.is_visible());
}

#[test]
fn dropdown__outside_press_closes_when_open() {
    let mut dropdown = Dropdown::default();
    dropdown.toggle();
    assert!(dropdown.is_open());

    assert!(dropdown.press_outside());
    assert!(!dropdown.is_open());
}

#[test]
fn dropdown__outside_press_when_closed_is_noop() {
    let mut dropdown = Dropdown::default();
    assert!(!dropdown.press_outside());
    assert!(!dropdown.is_open());
}
