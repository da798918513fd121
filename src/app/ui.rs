use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{
        Block, Borders, Cell, Clear, List, ListItem, ListState, Paragraph, Row, Sparkline, Table,
        TableState,
    },
};
use rust_decimal::{Decimal, prelude::ToPrimitive};
use strum::IntoEnumIterator;

use crate::app::portfolio::Portfolio;
use crate::app::utils::{format_amount, format_percent};
use crate::models::ApiProvider;

pub fn render(
    frame: &mut Frame,
    portfolio: &Portfolio,
    table_state: &mut TableState,
    popup_message: &Option<String>,
    error_popup: &Option<String>,
    show_api_popup: bool,
    default_api_state: &mut ListState,
    selection_mode: bool,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(7),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(frame.area());

    render_header(frame, portfolio, chunks[0]);
    render_positions(frame, portfolio, table_state, selection_mode, chunks[1]);
    render_footer(frame, chunks[2]);

    if let Some(message) = popup_message {
        render_message_popup(frame, message);
    }

    if show_api_popup {
        render_api_popup(frame, default_api_state);
    }

    if let Some(message) = error_popup {
        render_error_popup(frame, message);
    }
}

fn render_header(frame: &mut Frame, portfolio: &Portfolio, area: Rect) {
    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(44), Constraint::Percentage(40)])
        .split(area);

    let growth = portfolio.growth();
    let growth_color = if *growth.value() >= Decimal::ZERO {
        Color::Green
    } else {
        Color::Red
    };
    let growth_arrow = if *growth.value() >= Decimal::ZERO {
        "▲"
    } else {
        "▼"
    };

    let lines = vec![
        Line::from(vec![
            Span::raw("Total  "),
            Span::styled(
                format_amount(&portfolio.total_value()),
                Style::default().add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(vec![
            Span::raw("Stock  "),
            Span::raw(format_amount(&portfolio.stock_value())),
        ]),
        Line::from(vec![
            Span::raw("Cash   "),
            Span::raw(format_amount(&portfolio.cash_value())),
        ]),
        Line::from(vec![
            Span::raw(format!("Growth ({})  ", portfolio.period().to_str())),
            Span::styled(
                format!(
                    "{} {} ({})",
                    growth_arrow,
                    format_amount(growth.value()),
                    format_percent(growth.percent())
                ),
                Style::default().fg(growth_color),
            ),
        ]),
        Line::from(Span::styled(
            format!("Quotes via {}", portfolio.default_api().label()),
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let summary = Paragraph::new(lines).block(
        Block::default()
            .title(format!("Portfolio: {}", portfolio.name()))
            .borders(Borders::ALL),
    );
    frame.render_widget(summary, halves[0]);

    let totals: Vec<u64> = portfolio
        .history()
        .iter()
        .map(|snapshot| snapshot.total_value().to_u64().unwrap_or(0))
        .collect();
    let sparkline = Sparkline::default()
        .block(Block::default().title("History").borders(Borders::ALL))
        .data(totals)
        .style(Style::default().fg(growth_color));
    frame.render_widget(sparkline, halves[1]);
}

fn render_positions(
    frame: &mut Frame,
    portfolio: &Portfolio,
    table_state: &mut TableState,
    selection_mode: bool,
    area: Rect,
) {
    let positions = portfolio.positions();

    if positions.is_empty() {
        let empty_message = Paragraph::new("No holdings to display. Record a buy first.")
            .style(Style::default().fg(Color::Yellow))
            .block(Block::default().title("Positions").borders(Borders::ALL));
        frame.render_widget(empty_message, area);
        return;
    }

    let header_cells = [
        "Ticker",
        "Name",
        "Lots",
        "Avg Cost",
        "Price",
        "Value",
        "Unr. G/L",
        "Unr. G/L %",
    ]
    .iter()
    .map(|h| Cell::from(*h).style(Style::default().fg(Color::Yellow)));
    let header = Row::new(header_cells).style(Style::default()).height(1);

    let rows = positions.iter().map(|position| {
        let unrealized_gain = *position.unrealized_gain();
        let unrealized_gain_percent = *position.unrealized_gain_percent();

        let color_unrealized_gain = if unrealized_gain >= Decimal::ZERO {
            Color::Green
        } else {
            Color::Red
        };

        let cells = [
            Cell::from(position.ticker().to_string()),
            Cell::from(position.name().to_string()),
            Cell::from(position.lots().to_string()),
            Cell::from(format_amount(position.average_cost())),
            Cell::from(format_amount(position.price())),
            Cell::from(format_amount(position.market_value())),
            Cell::from(format_amount(&unrealized_gain))
                .style(Style::default().fg(color_unrealized_gain)),
            Cell::from(format_percent(&unrealized_gain_percent))
                .style(Style::default().fg(color_unrealized_gain)),
        ];

        Row::new(cells).height(1)
    });

    let widths = [
        Constraint::Length(12),
        Constraint::Length(28),
        Constraint::Length(8),
        Constraint::Length(14),
        Constraint::Length(14),
        Constraint::Length(16),
        Constraint::Length(14),
        Constraint::Length(12),
    ];

    let highlight = if selection_mode {
        Style::default().add_modifier(Modifier::REVERSED)
    } else {
        Style::default()
    };

    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().title("Positions").borders(Borders::ALL))
        .row_highlight_style(highlight);

    frame.render_stateful_widget(table, area, table_state);
}

fn render_footer(frame: &mut Frame, area: Rect) {
    let hints = Paragraph::new(
        "q quit | F5 refresh | F4 import | F8 provider | Tab period | ↑↓ select | Esc clear",
    )
    .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(hints, area);
}

fn render_message_popup(frame: &mut Frame, message: &str) {
    let area = centered_rect(40, 20, frame.area());
    frame.render_widget(Clear, area);
    let popup = Paragraph::new(message).block(
        Block::default()
            .borders(Borders::ALL)
            .style(Style::default().fg(Color::Cyan)),
    );
    frame.render_widget(popup, area);
}

fn render_error_popup(frame: &mut Frame, message: &str) {
    let area = centered_rect(60, 30, frame.area());
    frame.render_widget(Clear, area);
    let popup = Paragraph::new(message)
        .wrap(ratatui::widgets::Wrap { trim: true })
        .block(
            Block::default()
                .title("Error (Esc to dismiss)")
                .borders(Borders::ALL)
                .style(Style::default().fg(Color::Red)),
        );
    frame.render_widget(popup, area);
}

fn render_api_popup(frame: &mut Frame, default_api_state: &mut ListState) {
    let area = centered_rect(40, 25, frame.area());
    frame.render_widget(Clear, area);

    let items: Vec<ListItem> = ApiProvider::iter()
        .map(|provider| ListItem::new(provider.label().to_string()))
        .collect();
    let list = List::new(items)
        .block(
            Block::default()
                .title("Quote provider (Enter to select)")
                .borders(Borders::ALL),
        )
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    frame.render_stateful_widget(list, area, default_api_state);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
