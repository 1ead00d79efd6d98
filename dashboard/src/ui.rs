//! # ui — ratatui rendering
//!
//! ```text
//! ┌ Bitcoin Price (LKR) ───────────┐┌ Satoshis ⇄ LKR ─────────────────┐
//! │     රු. 29,850,000 ▲           ││   1 sat = රු.0.2985             │
//! │     $98,500   (+2.5% 24h)      ││   රු.1 = 3.35 sats              │
//! └────────────────────────────────┘│   [███████       ] 29.9%        │
//!                                   └─────────────────────────────────┘
//! ┌ Block Height ┐┌ Difficulty ┐┌ Mempool ┐┌ Fees (sat/vB) ┐
//! ```

use std::io::{self, Stdout};
use std::time::Instant;

use ratatui::{
    backend::CrosstermBackend,
    crossterm::{
        event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
        execute,
        terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    },
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame, Terminal,
};

use crate::board::Board;
use crate::flow::FlowingNumber;

const ACCENT: Color = Color::Rgb(247, 147, 26);
const FLOW: Color = Color::Rgb(255, 214, 102);

// ─── Terminal lifecycle ───────────────────────────────────────────────────────

/// Raw mode + alternate screen for as long as this lives.
pub struct TerminalGuard;

impl TerminalGuard {
    pub fn enter() -> io::Result<(Self, Terminal<CrosstermBackend<Stdout>>)> {
        enable_raw_mode()?;
        guarded(Self, || {
            execute!(io::stdout(), EnterAlternateScreen)?;
            Terminal::new(CrosstermBackend::new(io::stdout()))
        })
    }
}

/// Run `setup` with `guard` already alive, so a failed setup still drops it.
fn guarded<G, T>(guard: G, setup: impl FnOnce() -> io::Result<T>) -> io::Result<(G, T)> {
    let value = setup()?;
    Ok((guard, value))
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

/// Drain pending key events without blocking; `true` on q / Esc / Ctrl-C.
pub fn quit_requested() -> io::Result<bool> {
    while event::poll(std::time::Duration::ZERO)? {
        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            let ctrl_c = key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL);
            if ctrl_c || matches!(key.code, KeyCode::Char('q') | KeyCode::Esc) {
                return Ok(true);
            }
        }
    }
    Ok(false)
}

// ─── Drawing ──────────────────────────────────────────────────────────────────

/// Spans for one flowing field: steady chars plain, changed chars lit.
pub fn flowing_spans(
    prefix: &str,
    field: &FlowingNumber,
    suffix: &str,
    style: Style,
    now: Instant,
) -> Line<'static> {
    let (steady, changed) = field.split(now);
    Line::from(vec![
        Span::styled(prefix.to_string(), style),
        Span::styled(steady.to_string(), style),
        Span::styled(
            changed.to_string(),
            style.fg(FLOW).add_modifier(Modifier::BOLD),
        ),
        Span::styled(suffix.to_string(), style),
    ])
}

fn card(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(title, Style::default().fg(Color::Gray)))
}

pub fn draw(frame: &mut Frame, board: &Board, now: Instant) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(8), Constraint::Length(5), Constraint::Min(0)])
        .split(frame.size());

    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[0]);

    draw_price(frame, board, now, top[0]);
    draw_sats(frame, board, now, top[1]);
    draw_stats(frame, board, now, rows[1]);

    let footer = Paragraph::new("mempool.space  •  coingecko  •  q to quit")
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    frame.render_widget(footer, rows[2]);
}

fn draw_price(frame: &mut Frame, board: &Board, now: Instant, area: Rect) {
    let fields = board.fields();
    let accent = Style::default().fg(ACCENT).add_modifier(Modifier::BOLD);
    let muted = Style::default().fg(Color::Gray);

    let trend = match board.lkr_trend() {
        1 => " ▲",
        -1 => " ▼",
        _ => "  ",
    };

    let lines = vec![
        Line::default(),
        flowing_spans("රු. ", &fields.price_lkr, trend, accent, now),
        Line::default(),
        flowing_spans("$", &fields.price_usd, "", muted, now),
        flowing_spans("", &fields.change_24h, "% 24h", muted, now),
    ];

    frame.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center).block(card("Bitcoin Price (LKR)")),
        area,
    );
}

fn draw_sats(frame: &mut Frame, board: &Board, now: Instant, area: Rect) {
    let fields = board.fields();
    let accent = Style::default().fg(ACCENT).add_modifier(Modifier::BOLD);
    let plain = Style::default().fg(Color::White);

    let block = card("Satoshis ⇄ LKR");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Length(2)])
        .split(inner);

    let lines = vec![
        Line::default(),
        flowing_spans("1 sat = රු.", &fields.lkr_per_sat, "", accent, now),
        flowing_spans("රු.1 = ", &fields.sats_per_lkr, " sats", plain, now),
    ];
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), parts[0]);

    let progress = board.current().parity_progress();
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(ACCENT).bg(Color::Black))
        .ratio(progress)
        .label(format!("{:.1}% to 1 sat = රු.1", progress * 100.0));
    frame.render_widget(gauge, parts[1]);
}

fn draw_stats(frame: &mut Frame, board: &Board, now: Instant, area: Rect) {
    let fields = board.fields();
    let accent = Style::default().fg(ACCENT).add_modifier(Modifier::BOLD);

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(area);

    let cards = [
        ("Block Height", &fields.block_height),
        ("Difficulty", &fields.difficulty),
        ("Mempool", &fields.mempool),
        ("Fees (sat/vB)", &fields.fees),
    ];

    for ((title, field), col) in cards.into_iter().zip(cols.iter()) {
        let lines = vec![Line::default(), flowing_spans("", field, "", accent, now)];
        frame.render_widget(
            Paragraph::new(lines).alignment(Alignment::Center).block(card(title)),
            *col,
        );
    }
}
