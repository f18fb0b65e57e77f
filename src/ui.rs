use crate::client::{AppSnapshot, WriteStatus};
use color_eyre::eyre::{Result, eyre};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use ratatui::layout::Position;
use ratatui::{prelude::*, widgets::*};
use std::io::{Write as _, stdout};
use tokio::sync::mpsc;
use vending_machine::view::{BellGate, Dropdown, Page, Popup, Screen};
use vending_machine::{explorer_tx_url, format_native, short_address, short_hash};

pub enum UserEvent {
    Quit,
    Redraw,
    Connect,
    Disconnect,
    SwitchNetwork,
    Navigate(Page),
    Contribute,
    Withdraw,
    CopyAddress,
}

#[derive(Debug)]
pub struct UiState {
    mode: Mode,
    dropdown: Dropdown,
    popup: Popup,
    bell: BellGate,
    // cached from the last draw so key handling can follow the screen
    screen: Screen,
    is_owner: bool,
    dropdown_area: Option<Rect>,
    terminal: Option<Terminal<CrosstermBackend<std::io::Stdout>>>,
}

impl Default for UiState {
    fn default() -> Self {
        UiState {
            mode: Mode::Normal,
            dropdown: Dropdown::default(),
            popup: Popup::default(),
            bell: BellGate::default(),
            screen: Screen::Connect,
            is_owner: false,
            dropdown_area: None,
            terminal: None,
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
enum Mode {
    #[default]
    Normal,
    QuitModal,
}

pub type InputEventReceiver = mpsc::UnboundedReceiver<Event>;

/// Terminal input on its own thread so reads never block the select loop.
pub fn input_event_stream() -> InputEventReceiver {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        loop {
            match event::read() {
                Ok(ev) => {
                    if tx.send(ev).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            }
        }
    });
    rx
}

pub async fn next_raw_event(events: &mut InputEventReceiver) -> Result<Event> {
    events
        .recv()
        .await
        .ok_or_else(|| eyre!("input event channel closed"))
}

/// Ring the terminal bell, at most once per session. Playback failures are
/// of no interest to anyone.
pub fn chime(state: &mut UiState) {
    if state.bell.fire() {
        let mut out = stdout();
        let _ = write!(out, "\x07");
        let _ = out.flush();
    }
}

pub fn terminal_enter(state: &mut UiState) -> Result<()> {
    enable_raw_mode()?;
    crossterm::execute!(
        std::io::stdout(),
        crossterm::terminal::EnterAlternateScreen,
        crossterm::event::EnableMouseCapture
    )?;
    // Create a single persistent Terminal to preserve buffers across draws
    let backend = CrosstermBackend::new(stdout());
    let terminal = Terminal::new(backend)?;
    state.terminal = Some(terminal);
    Ok(())
}

pub fn terminal_exit() -> Result<()> {
    disable_raw_mode()?;
    crossterm::execute!(
        std::io::stdout(),
        crossterm::event::DisableMouseCapture,
        crossterm::terminal::LeaveAlternateScreen
    )?;
    Ok(())
}

pub fn interpret_event(state: &mut UiState, event: Event) -> Option<UserEvent> {
    match event {
        Event::Key(k) if k.kind == KeyEventKind::Press => interpret_key(state, k),
        Event::Mouse(m) => interpret_mouse(state, m),
        Event::Resize(_, _) => Some(UserEvent::Redraw),
        _ => None,
    }
}

fn interpret_key(state: &mut UiState, k: KeyEvent) -> Option<UserEvent> {
    if let Mode::QuitModal = state.mode {
        return match k.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => Some(UserEvent::Quit),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                state.mode = Mode::Normal;
                Some(UserEvent::Redraw)
            }
            _ => None,
        };
    }
    if state.popup.is_visible() {
        return match k.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => {
                state.popup.close();
                Some(UserEvent::Redraw)
            }
            _ => None,
        };
    }
    if state.dropdown.is_open() {
        return match k.code {
            KeyCode::Esc | KeyCode::Char('w') => {
                state.dropdown.close();
                Some(UserEvent::Redraw)
            }
            KeyCode::Char('c') => Some(UserEvent::CopyAddress),
            KeyCode::Char('x') => {
                state.dropdown.close();
                Some(UserEvent::Disconnect)
            }
            _ => None,
        };
    }
    match k.code {
        KeyCode::Char('q') => {
            state.mode = Mode::QuitModal;
            Some(UserEvent::Redraw)
        }
        KeyCode::Char('l') => {
            state.popup.open("LinkedIn | COMING SOON");
            Some(UserEvent::Redraw)
        }
        KeyCode::Char('p') => {
            state.popup.open("Portfolio | UNDER CONSTRUCTION");
            Some(UserEvent::Redraw)
        }
        _ => match state.screen {
            Screen::Connect => match k.code {
                KeyCode::Char('c') | KeyCode::Enter => Some(UserEvent::Connect),
                _ => None,
            },
            Screen::WrongNetwork => match k.code {
                KeyCode::Char('s') | KeyCode::Enter => Some(UserEvent::SwitchNetwork),
                _ => None,
            },
            Screen::Page(page) => interpret_page_key(state, page, k.code),
        },
    }
}

fn interpret_page_key(state: &mut UiState, page: Page, code: KeyCode) -> Option<UserEvent> {
    match code {
        KeyCode::Char('h') => Some(UserEvent::Navigate(Page::Home)),
        KeyCode::Char('r') => Some(UserEvent::Navigate(Page::Roadmap)),
        KeyCode::Char('a') if state.is_owner => Some(UserEvent::Navigate(Page::Admin)),
        KeyCode::Char('w') => {
            state.dropdown.toggle();
            Some(UserEvent::Redraw)
        }
        KeyCode::Char('x') => Some(UserEvent::Disconnect),
        KeyCode::Char('b') | KeyCode::Enter if page == Page::Home => Some(UserEvent::Contribute),
        KeyCode::Char('t') | KeyCode::Enter if page == Page::Admin => Some(UserEvent::Withdraw),
        KeyCode::Esc if page != Page::Home => Some(UserEvent::Navigate(Page::Home)),
        _ => None,
    }
}

fn interpret_mouse(state: &mut UiState, m: MouseEvent) -> Option<UserEvent> {
    let MouseEventKind::Down(MouseButton::Left) = m.kind else {
        return None;
    };
    if !state.dropdown.is_open() {
        // a press anywhere with the menu closed is not ours to handle
        return None;
    }
    let inside = state
        .dropdown_area
        .is_some_and(|area| area.contains(Position::new(m.column, m.row)));
    if !inside {
        return state.dropdown.press_outside().then_some(UserEvent::Redraw);
    }
    let area = state.dropdown_area?;
    match m.row.saturating_sub(area.y) {
        1 => Some(UserEvent::CopyAddress),
        2 => {
            state.dropdown.close();
            Some(UserEvent::Disconnect)
        }
        _ => Some(UserEvent::Redraw),
    }
}

pub fn draw(state: &mut UiState, snap: &AppSnapshot) -> Result<()> {
    // keep the resolved screen around for key interpretation
    state.screen = snap.screen;
    state.is_owner = snap.is_owner;
    if !matches!(snap.screen, Screen::Page(_)) {
        state.dropdown.close();
    }
    if let Some(mut term) = state.terminal.take() {
        term.draw(|f| ui(f, state, snap))?;
        state.terminal = Some(term);
    }
    Ok(())
}

fn ui(f: &mut Frame, state: &mut UiState, snap: &AppSnapshot) {
    let chunks = Layout::vertical([
        Constraint::Length(7),
        Constraint::Min(12),
        Constraint::Length(5),
    ])
    .split(f.area());

    draw_header(f, chunks[0], snap);
    match snap.screen {
        Screen::Connect => draw_connect(f, chunks[1], snap),
        Screen::WrongNetwork => draw_wrong_network(f, chunks[1], snap),
        Screen::Page(Page::Home) => draw_home(f, chunks[1], snap),
        Screen::Page(Page::Admin) => draw_admin(f, chunks[1], snap),
        Screen::Page(Page::Roadmap) => draw_roadmap(f, chunks[1]),
    }
    draw_footer(f, chunks[2], snap);

    if state.dropdown.is_open() {
        draw_dropdown(f, state, snap);
    } else {
        state.dropdown_area = None;
    }
    if let Some(message) = state.popup.message() {
        let message = message.to_owned();
        draw_popup(f, &message);
    }
    if matches!(state.mode, Mode::QuitModal) {
        draw_quit_modal(f);
    }
}

fn draw_header(f: &mut Frame, area: Rect, snap: &AppSnapshot) {
    let mut nav = String::from("[h] HOME   [r] ROADMAP");
    if snap.is_owner {
        nav.push_str("   [a] ADMIN");
    }
    let wallet_line = match snap.address {
        Some(address) => {
            let mut spans = vec![
                Span::raw("wallet "),
                Span::styled(short_address(&address), Style::default().fg(Color::Cyan)),
                Span::raw("  [w] menu"),
            ];
            if snap.copy_feedback {
                spans.push(Span::styled(
                    "  Copied!",
                    Style::default().fg(Color::Green).bold(),
                ));
            }
            Line::from(spans)
        }
        None => Line::from(Span::styled(
            "no wallet attached",
            Style::default().fg(Color::DarkGray),
        )),
    };
    let lines = vec![
        Line::from(Span::styled(
            "MEMBANGUN MONAD",
            Style::default().fg(Color::Cyan).bold(),
        )),
        Line::from(Span::styled(
            "bersama Nostrodetion",
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(Span::styled(nav, Style::default().fg(Color::Magenta))),
        wallet_line,
        Line::from(Span::styled(
            snap.profile.name.clone(),
            Style::default().fg(Color::DarkGray),
        )),
    ];
    let header = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::bordered().border_style(Style::default().fg(Color::Magenta)));
    f.render_widget(header, area);
}

fn draw_connect(f: &mut Frame, area: Rect, snap: &AppSnapshot) {
    let lines = vec![
        Line::default(),
        Line::from(Span::styled(
            "Connect Wallet Heula Atuh Kehed!!",
            Style::default().fg(Color::Red).bold(),
        )),
        Line::default(),
        Line::from(format!("[c] Connect {}", snap.wallet_name)),
    ];
    let page = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::bordered().border_style(Style::default().fg(Color::Cyan)));
    f.render_widget(page, area);
}

fn draw_wrong_network(f: &mut Frame, area: Rect, snap: &AppSnapshot) {
    let current = snap
        .chain_id
        .map(|id| id.to_string())
        .unwrap_or_else(|| String::from("unknown"));
    let lines = vec![
        Line::default(),
        Line::from(Span::styled(
            "Wrong network",
            Style::default().fg(Color::Yellow).bold(),
        )),
        Line::default(),
        Line::from(format!(
            "Wallet is on chain {current}; {} runs on chain {}",
            snap.profile.name, snap.profile.chain_id
        )),
        Line::default(),
        Line::from(format!("[s] Switch to {}", snap.profile.name)),
    ];
    let page = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::bordered().border_style(Style::default().fg(Color::Yellow)));
    f.render_widget(page, area);
}

fn draw_home(f: &mut Frame, area: Rect, snap: &AppSnapshot) {
    let mut lines = vec![Line::default()];
    if let Some(address) = snap.address {
        lines.push(Line::from(vec![
            Span::raw("Connected to: "),
            Span::styled(address.to_string(), Style::default().fg(Color::Cyan)),
        ]));
    }
    lines.push(Line::default());
    lines.push(Line::from("Nyumbang, bisanya cuma:"));
    let price = match snap.price {
        Some(raw) => format!(
            "{} {}",
            format_native(raw, snap.profile.currency_decimals),
            snap.profile.currency_symbol
        ),
        None => String::from("..."),
    };
    lines.push(Line::from(Span::styled(
        price,
        Style::default().fg(Color::Yellow).bold(),
    )));
    if let Some(count) = snap.purchases {
        lines.push(Line::from(Span::styled(
            format!("Sumbangan tercatat: {count}x"),
            Style::default().fg(Color::DarkGray),
        )));
    }
    lines.push(Line::default());
    let button = match &snap.contribute {
        WriteStatus::Pending { .. } => Span::styled(
            "Processing...",
            Style::default().fg(Color::DarkGray),
        ),
        _ => Span::styled(
            format!("[b] NYUMBANG (0.5 {})", snap.profile.currency_symbol),
            Style::default().fg(Color::Black).bg(Color::Cyan).bold(),
        ),
    };
    lines.push(Line::from(button));
    if let WriteStatus::Confirmed { tx_hash } = &snap.contribute {
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            format!(
                "Sumbangan berhasil! Cek hash transaksi: {}",
                short_hash(tx_hash)
            ),
            Style::default().fg(Color::Green),
        )));
        lines.push(Line::from(Span::styled(
            explorer_tx_url(&snap.profile.explorer_url, tx_hash),
            Style::default().fg(Color::Green).underlined(),
        )));
    }
    lines.push(Line::default());
    if snap.is_owner {
        lines.push(Line::from(Span::styled(
            "[a] Masuk Panel Admin",
            Style::default().fg(Color::Magenta),
        )));
    }
    lines.push(Line::from(Span::styled(
        "[x] Disconnect?!",
        Style::default().fg(Color::DarkGray),
    )));
    let page = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(Block::bordered().border_style(Style::default().fg(Color::Cyan)));
    f.render_widget(page, area);
}

fn draw_admin(f: &mut Frame, area: Rect, snap: &AppSnapshot) {
    let mut lines = vec![
        Line::default(),
        Line::from(Span::styled(
            "-- PANEL KONTROL NOSTRO --",
            Style::default().fg(Color::Red).bold(),
        )),
        Line::from("Selamat datang, Bos!"),
        Line::default(),
    ];
    if let Some(owner) = snap.owner {
        lines.push(Line::from(vec![
            Span::styled("owner ", Style::default().fg(Color::DarkGray)),
            Span::styled(short_address(&owner), Style::default().fg(Color::Cyan)),
        ]));
        lines.push(Line::default());
    }
    let button = match &snap.withdraw {
        WriteStatus::Pending { .. } => Span::styled(
            "Processing...",
            Style::default().fg(Color::DarkGray),
        ),
        _ => Span::styled(
            "[t] TARIK SEMUA DANA JARAHAN",
            Style::default().fg(Color::White).bg(Color::Red).bold(),
        ),
    };
    lines.push(Line::from(button));
    if let WriteStatus::Confirmed { tx_hash } = &snap.withdraw {
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            format!("Dana berhasil ditarik! Cek hash: {}", short_hash(tx_hash)),
            Style::default().fg(Color::Green),
        )));
        lines.push(Line::from(Span::styled(
            explorer_tx_url(&snap.profile.explorer_url, tx_hash),
            Style::default().fg(Color::Green).underlined(),
        )));
    }
    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        "[Esc] Kembali ke Halaman Utama",
        Style::default().fg(Color::DarkGray),
    )));
    let page = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(Block::bordered().border_style(Style::default().fg(Color::Red)));
    f.render_widget(page, area);
}

const ROADMAP_ITEMS: [(&str, &str, &str); 4] = [
    ("Q2 2025", "Sumbang Mon Ke Nostro", "Selesai"),
    ("Q2 2025", "Nostro Banyak Mon", "Bismillah"),
    ("Q2 - Monad Mainnet", "Nostro Leluasa Bikin Dapp di Monad", "In Progress"),
    ("Updated Soon", "Monad Berkembang Karena Nostro", "To Do"),
];

fn draw_roadmap(f: &mut Frame, area: Rect) {
    let mut lines = vec![
        Line::default(),
        Line::from(Span::styled(
            "ROADMAP MEMBANGUN MONAD",
            Style::default().fg(Color::Yellow).bold(),
        )),
        Line::default(),
    ];
    for (index, (quarter, title, status)) in ROADMAP_ITEMS.iter().enumerate() {
        lines.push(Line::from(vec![
            Span::styled(
                format!("{}. ", index + 1),
                Style::default().fg(Color::Magenta).bold(),
            ),
            Span::styled(format!("{quarter}  "), Style::default().fg(Color::DarkGray)),
            Span::styled(*title, Style::default().bold()),
            Span::styled(
                format!("  {status}"),
                Style::default().fg(Color::Cyan),
            ),
        ]));
    }
    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        "[Esc] Kembali",
        Style::default().fg(Color::DarkGray),
    )));
    let page = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(Block::bordered().border_style(Style::default().fg(Color::Magenta)));
    f.render_widget(page, area);
}

fn draw_footer(f: &mut Frame, area: Rect, snap: &AppSnapshot) {
    let mut lines = vec![Line::from(vec![
        Span::styled("status: ", Style::default().fg(Color::DarkGray)),
        Span::styled(snap.status.clone(), Style::default().fg(Color::Yellow)),
    ])];
    if let Some(last) = snap.errors.first() {
        lines.push(Line::from(Span::styled(
            last.clone(),
            Style::default().fg(Color::Red),
        )));
    }
    lines.push(Line::from(Span::styled(
        "[l] LinkedIn   [p] Portfolio   [q] Quit   @nostrodetion",
        Style::default().fg(Color::DarkGray),
    )));
    let footer = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::bordered().border_style(Style::default().fg(Color::DarkGray)));
    f.render_widget(footer, area);
}

fn draw_dropdown(f: &mut Frame, state: &mut UiState, snap: &AppSnapshot) {
    let frame = f.area();
    let width = 24u16.min(frame.width);
    let area = Rect {
        x: frame.width.saturating_sub(width + 1),
        y: 6u16.min(frame.height.saturating_sub(4)),
        width,
        height: 4,
    };
    state.dropdown_area = Some(area);
    let copy_label = if snap.copy_feedback {
        "[c] Copied!"
    } else {
        "[c] Copy address"
    };
    let lines = vec![
        Line::from(copy_label),
        Line::from("[x] Disconnect"),
    ];
    f.render_widget(Clear, area);
    let menu = Paragraph::new(lines).block(
        Block::bordered()
            .title("wallet")
            .border_style(Style::default().fg(Color::Cyan)),
    );
    f.render_widget(menu, area);
}

fn draw_popup(f: &mut Frame, message: &str) {
    let area = centered_rect(50, 20, f.area());
    f.render_widget(Clear, area);
    let lines = vec![
        Line::default(),
        Line::from(Span::styled(
            message.to_owned(),
            Style::default().fg(Color::Yellow).bold(),
        )),
        Line::default(),
        Line::from(Span::styled(
            "[Esc] close",
            Style::default().fg(Color::DarkGray),
        )),
    ];
    let popup = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::bordered().border_style(Style::default().fg(Color::Cyan)));
    f.render_widget(popup, area);
}

fn draw_quit_modal(f: &mut Frame) {
    let area = centered_rect(30, 15, f.area());
    f.render_widget(Clear, area);
    let modal = Paragraph::new(Line::from("Quit? [y]/[n]"))
        .alignment(Alignment::Center)
        .block(Block::bordered().border_style(Style::default().fg(Color::Red)));
    f.render_widget(modal, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::vertical([
        Constraint::Percentage((100 - percent_y) / 2),
        Constraint::Percentage(percent_y),
        Constraint::Percentage((100 - percent_y) / 2),
    ])
    .split(area);
    let horizontal = Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .split(vertical[1]);
    horizontal[1]
}
