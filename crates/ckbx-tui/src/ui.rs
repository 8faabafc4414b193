//! UI rendering.

use crate::app::{App, InputMode};
use crate::location::Route;
use crate::page::AddressPage;
use crate::theme::Palette;
use ckbx_core::{LockScript, format_timestamp_ms, shannon_to_ckb, signed_ckb, truncate_middle};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Wrap},
};
use tracing::Level;

/// Log lines shown below the page.
const LOG_LINES: u16 = 5;

/// Render the entire UI.
pub fn render(frame: &mut Frame, app: &mut App) {
    let chunks = Layout::vertical([
        Constraint::Length(3),             // Header
        Constraint::Min(0),                // Content
        Constraint::Length(LOG_LINES + 2), // Log viewer
    ])
    .split(frame.area());

    render_header(frame, app, chunks[0]);
    match app.route.clone() {
        Route::Home => render_home(frame, app, chunks[1]),
        Route::NotFound => render_not_found(frame, app, chunks[1]),
        Route::Address(_) => render_address_page(frame, app, chunks[1]),
    }
    render_logs(frame, app, chunks[2]);

    match app.input_mode {
        InputMode::EnteringAddress => render_address_prompt(frame, app),
        InputMode::JumpingToPage => render_jump_prompt(frame, app),
        InputMode::Normal => {}
    }

    if app.showing_help {
        render_help_modal(frame, app);
    }

    render_toast(frame, app);
}

/// Centered rectangle of at most `width` x `height` inside `area`.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width.saturating_sub(4));
    let height = height.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

/// Render the header with network, location and loading state.
fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let p = &app.palette;

    let mut spans = vec![
        Span::styled(
            format!("[{}] ", app.network.token_symbol()),
            Style::default().fg(p.accent).bold(),
        ),
        Span::raw(app.network.to_string()),
        Span::raw("  │  "),
        Span::styled(app.location().href(), Style::default().fg(p.muted)),
    ];
    if app.context.is_loading() {
        spans.push(Span::raw("  │  "));
        spans.push(Span::styled(
            format!("{} Loading", app.spinner_char()),
            Style::default().fg(p.warning),
        ));
    }

    let history_hint = match (app.history.can_go_back(), app.history.can_go_forward()) {
        (true, true) => " b:Back f:Forward ",
        (true, false) => " b:Back ",
        (false, true) => " f:Forward ",
        (false, false) => "",
    };

    let header = Paragraph::new(Line::from(spans))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(p.border))
                .title(" CKB Explorer ")
                .title_bottom(Line::from(history_hint).right_aligned()),
        )
        .alignment(Alignment::Left);

    frame.render_widget(header, area);
}

fn render_home(frame: &mut Frame, app: &App, area: Rect) {
    let p = &app.palette;
    let text = vec![
        Line::from(""),
        Line::from("No address selected").style(Style::default().fg(p.accent).bold()),
        Line::from(""),
        Line::from(format!(
            "Press '/' to open a {} address ({}...)",
            app.network,
            app.network.address_prefix()
        )),
        Line::from(""),
        Line::from("Press '?' for help or 'q' to quit").style(Style::default().fg(p.muted)),
    ];
    let paragraph = Paragraph::new(text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(p.border)),
        )
        .alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}

fn render_not_found(frame: &mut Frame, app: &App, area: Rect) {
    let p = &app.palette;
    let text = vec![
        Line::from(""),
        Line::from("404").style(Style::default().fg(p.error).bold()),
        Line::from(""),
        Line::from(format!("Nothing lives at {}", app.location().path)),
        Line::from(""),
        Line::from("Press 'b' to go back or '/' to open an address")
            .style(Style::default().fg(p.muted)),
    ];
    let paragraph = Paragraph::new(text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(p.border))
                .title(" Not Found "),
        )
        .alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}

/// Address title, overview, transaction table and pagination bar.
fn render_address_page(frame: &mut Frame, app: &mut App, area: Rect) {
    let Some(page) = app.page.as_ref() else {
        return;
    };
    let p = app.palette;

    let chunks = Layout::vertical([
        Constraint::Length(3), // Address
        Constraint::Length(8), // Overview
        Constraint::Min(5),    // Transactions
        Constraint::Length(3), // Pagination
    ])
    .split(area);

    render_address_title(frame, page, &p, chunks[0]);
    render_overview(frame, page, &p, app.network.token_symbol(), chunks[1]);
    render_pagination(frame, page, &p, chunks[3]);

    let rows: Vec<Row> = page
        .transactions()
        .iter()
        .map(|tx| {
            let attrs = &tx.attributes;
            let income = attrs.income_for(page.address());
            let income_style = match income.signum() {
                1 => Style::default().fg(p.income),
                -1 => Style::default().fg(p.outgo),
                _ => Style::default().fg(p.muted),
            };
            Row::new(vec![
                Cell::from(truncate_middle(tx.hash(), 12, 10)).style(Style::default().fg(p.primary)),
                Cell::from(attrs.block_number.to_string()),
                Cell::from(format_timestamp_ms(attrs.block_timestamp)),
                Cell::from(signed_ckb(income)).style(income_style),
            ])
        })
        .collect();

    let header = Row::new(vec![
        Cell::from("Transaction Hash").style(Style::default().bold()),
        Cell::from("Block").style(Style::default().bold()),
        Cell::from("Time (UTC)").style(Style::default().bold()),
        Cell::from("Income").style(Style::default().bold()),
    ])
    .style(Style::default().fg(p.accent));

    let widths = [
        Constraint::Length(27),
        Constraint::Length(12),
        Constraint::Length(21),
        Constraint::Min(14),
    ];

    let empty = rows.is_empty();
    let title = format!(" Transactions ({}) ", page.total_transactions());
    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(p.border))
                .title(title),
        )
        .row_highlight_style(
            Style::default()
                .bg(p.selection)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol(">> ");

    frame.render_stateful_widget(table, chunks[2], &mut app.tx_table_state);

    if empty {
        let inner = chunks[2].inner(ratatui::layout::Margin::new(2, 2));
        let message = if app.context.is_loading() { "Loading..." } else { "No transactions" };
        frame.render_widget(
            Paragraph::new(message)
                .style(Style::default().fg(p.muted))
                .alignment(Alignment::Center),
            inner,
        );
    }
}

fn render_address_title(frame: &mut Frame, page: &AddressPage, p: &Palette, area: Rect) {
    let line = Line::from(vec![
        Span::styled(page.address().to_string(), Style::default().fg(p.primary).bold()),
        Span::styled("  c:Copy", Style::default().fg(p.muted)),
    ]);
    let paragraph = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(p.border))
            .title(" Address "),
    );
    frame.render_widget(paragraph, area);
}

fn render_overview(frame: &mut Frame, page: &AddressPage, p: &Palette, symbol: &str, area: Rect) {
    let summary = page.summary();
    let columns = Layout::horizontal([Constraint::Percentage(45), Constraint::Percentage(55)]).split(area);

    let label = Style::default().fg(p.accent);
    let stats = vec![
        Line::from(vec![
            Span::styled("Balance       ", label),
            Span::raw(format!("{} {}", shannon_to_ckb(summary.balance), symbol)),
        ]),
        Line::from(vec![
            Span::styled("Transactions  ", label),
            Span::raw(summary.transactions_count.to_string()),
        ]),
        Line::from(vec![
            Span::styled("Live Cells    ", label),
            Span::raw(summary.cell_consumed.to_string()),
        ]),
    ];
    frame.render_widget(
        Paragraph::new(stats).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(p.border))
                .title(" Overview "),
        ),
        columns[0],
    );

    let script = lock_script_json(&summary.lock_script);
    frame.render_widget(
        Paragraph::new(script)
            .style(Style::default().fg(p.muted))
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(p.border))
                    .title(" Lock Script "),
            ),
        columns[1],
    );
}

/// Lock script as JSON with a four-space indent.
pub fn lock_script_json(script: &LockScript) -> String {
    let mut out = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
    if let Err(e) = serde::Serialize::serialize(script, &mut serializer) {
        tracing::warn!("Failed to format lock script: {}", e);
        return String::new();
    }
    String::from_utf8(out).unwrap_or_default()
}

fn render_pagination(frame: &mut Frame, page: &AddressPage, p: &Palette, area: Rect) {
    let pagination = page.pagination();
    let key_style = Style::default().fg(p.accent).bold();
    let line = Line::from(vec![
        Span::styled("←/p ", key_style),
        Span::raw(format!(
            "Page {} of {}",
            pagination.page_number,
            page.page_count()
        )),
        Span::styled(" n/→", key_style),
        Span::raw("  │  "),
        Span::styled("-/+ ", key_style),
        Span::raw(format!("{} / page", pagination.page_size)),
        Span::raw("  │  "),
        Span::styled("g ", key_style),
        Span::raw("Go to page"),
    ]);
    frame.render_widget(
        Paragraph::new(line).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(p.border)),
        ),
        area,
    );
}

fn render_address_prompt(frame: &mut Frame, app: &App) {
    let p = &app.palette;
    let area = centered(frame.area(), 76, 7);
    frame.render_widget(Clear, area);

    let mut text = vec![
        Line::from(vec![
            Span::styled("> ", Style::default().fg(p.accent).bold()),
            Span::raw(app.input.as_str()),
            Span::styled("_", Style::default().fg(p.muted)),
        ]),
        Line::from(""),
    ];
    match &app.validation_error {
        Some(error) => text.push(Line::from(error.as_str()).style(Style::default().fg(p.error))),
        None => text.push(
            Line::from("Enter to open, Esc to cancel").style(Style::default().fg(p.muted)),
        ),
    }

    let paragraph = Paragraph::new(text).block(
        Block::default()
            .title(format!(" Open {} Address ", app.network))
            .title_style(Style::default().fg(p.accent).bold())
            .borders(Borders::ALL)
            .border_style(Style::default().fg(p.border))
            .style(Style::default().bg(p.bg)),
    );
    frame.render_widget(paragraph, area);
}

fn render_jump_prompt(frame: &mut Frame, app: &App) {
    let p = &app.palette;
    let area = centered(frame.area(), 30, 3);
    frame.render_widget(Clear, area);

    let last = app.page.as_ref().map_or(1, |page| page.page_count());
    let paragraph = Paragraph::new(Line::from(vec![
        Span::styled("> ", Style::default().fg(p.accent).bold()),
        Span::raw(app.input.as_str()),
        Span::styled("_", Style::default().fg(p.muted)),
    ]))
    .block(
        Block::default()
            .title(format!(" Go to page (1-{}) ", last))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(p.border))
            .style(Style::default().bg(p.bg)),
    );
    frame.render_widget(paragraph, area);
}

fn render_toast(frame: &mut Frame, app: &App) {
    let Some(toast) = app.context.toast() else {
        return;
    };
    let p = &app.palette;
    let area = frame.area();
    let width = (toast.text.chars().count() as u16 + 4).min(area.width);
    // Below the header when there is room, clipped to the frame otherwise.
    let toast_area =
        Rect::new(area.width.saturating_sub(width + 1), 3, width, 3).intersection(area);
    if toast_area.is_empty() {
        return;
    }
    frame.render_widget(Clear, toast_area);
    frame.render_widget(
        Paragraph::new(toast.text.as_str()).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(p.warning))
                .style(Style::default().bg(p.bg)),
        ),
        toast_area,
    );
}

fn render_help_modal(frame: &mut Frame, app: &App) {
    let pal = &app.palette;
    let modal_area = centered(frame.area(), 50, 21);
    frame.render_widget(Clear, modal_area);

    let key_style = Style::default().fg(pal.accent).bold();
    let section = |title: &'static str| {
        Line::from(Span::styled(title, Style::default().fg(pal.primary).bold()))
    };
    let entry = |keys: &'static str, desc: &'static str| {
        Line::from(vec![Span::styled(keys, key_style), Span::raw(desc)])
    };

    let lines = vec![
        section("  Navigation"),
        entry("  / or a    ", "Open an address"),
        entry("  b / f     ", "Back / forward"),
        entry("  c         ", "Copy address"),
        entry("  ↑/k ↓/j   ", "Select transaction"),
        Line::from(""),
        section("  Pagination"),
        entry("  ←/p →/n   ", "Previous / next page"),
        entry("  - / +     ", "Smaller / larger page size"),
        entry("  g         ", "Go to page"),
        Line::from(""),
        section("  Logs"),
        entry("  [ / ]     ", "Scroll logs up / down"),
        Line::from(""),
        entry("  q         ", "Quit"),
        Line::from(""),
        Line::from(vec![
            Span::raw("  Press "),
            Span::styled("Esc", key_style),
            Span::raw(" or "),
            Span::styled("?", key_style),
            Span::raw(" to close"),
        ]),
    ];

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(pal.primary))
            .title(" Keyboard Shortcuts ")
            .style(Style::default().bg(pal.bg)),
    );
    frame.render_widget(paragraph, modal_area);
}

/// Render the log viewer.
fn render_logs(frame: &mut Frame, app: &App, area: Rect) {
    let p = &app.palette;
    let entries = app.log_buffer.window(app.log_scroll, LOG_LINES as usize);

    let mut lines: Vec<Line> = entries
        .iter()
        .map(|entry| {
            let style = match entry.level {
                Level::ERROR => Style::default().fg(p.error),
                Level::WARN => Style::default().fg(p.warning),
                Level::INFO => Style::default().fg(p.fg),
                _ => Style::default().fg(p.muted),
            };
            Line::from(entry.line()).style(style)
        })
        .collect();
    if app.log_buffer.is_empty() {
        lines.push(Line::from("No log entries yet").style(Style::default().fg(p.muted)));
    }
    // Pad so the newest line sits at the bottom.
    while lines.len() < LOG_LINES as usize {
        lines.insert(0, Line::from(""));
    }

    let scroll_info = if app.log_scroll > 0 {
        format!(" [↑{}]", app.log_scroll)
    } else {
        String::new()
    };
    let title = Line::from(vec![
        Span::raw(" Logs "),
        Span::styled(format!("({})", app.log_buffer.len()), Style::default().fg(p.muted)),
        Span::styled(scroll_info, Style::default().fg(p.muted)),
        Span::raw(" │ [/]:Scroll  ?:Help  q:Quit "),
    ]);

    frame.render_widget(
        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(p.border))
                .title(title),
        ),
        area,
    );
}
