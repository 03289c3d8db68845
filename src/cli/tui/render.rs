use super::app::{App, Focus};
use crate::core::chart::{PlotArea, Tooltip};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Block, Chart, Clear, Dataset, GraphType, List, Paragraph},
};

const BACKGROUND: Color = Color::Rgb(15, 15, 15);

fn border_style(focused: bool) -> Style {
    if focused {
        Style::new().fg(Color::Cyan)
    } else {
        Style::new().fg(Color::DarkGray)
    }
}

impl From<Rect> for PlotArea {
    fn from(rect: Rect) -> Self {
        PlotArea {
            x: rect.x,
            y: rect.y,
            width: rect.width,
            height: rect.height,
        }
    }
}

/// Draws the whole converter and records the regions mouse events target.
pub fn draw(frame: &mut Frame, app: &mut App) {
    frame.render_widget(Block::new().style(Style::new().bg(BACKGROUND)), frame.area());

    let [title, selectors, amount, button, output, chart_label, chart, help] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(8),
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Min(6),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    frame.render_widget(
        Line::from("Currency Converter").bold().alignment(Alignment::Center),
        title,
    );

    draw_selectors(frame, app, selectors);
    draw_amount(frame, app, amount);
    draw_button(frame, app, button);

    let mut result = vec![Span::from(app.output.as_str()).bold()];
    if app.in_flight > 0 {
        result.push(" …".dark_gray());
    }
    frame.render_widget(Line::from(result).alignment(Alignment::Center), output);

    frame.render_widget(
        Line::from("Last 3 Months").alignment(Alignment::Center),
        chart_label,
    );
    draw_chart(frame, app, chart);

    frame.render_widget(
        Line::from("Tab focus · ↑↓ select · type to search · Enter convert · Esc quit")
            .dark_gray()
            .alignment(Alignment::Center),
        help,
    );
}

fn draw_selectors(frame: &mut Frame, app: &mut App, area: Rect) {
    let [from_area, to_area] =
        Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
            .spacing(2)
            .areas(area);
    app.regions.from_list = from_area;
    app.regions.to_list = to_area;

    let names = app.directory.names();
    for (label, selector, area, focus) in [
        ("From", &mut app.from, from_area, Focus::From),
        ("To", &mut app.to, to_area, Focus::To),
    ] {
        let title = if selector.query.is_empty() {
            format!(" {label} ")
        } else {
            format!(" {label} [{}] ", selector.query)
        };
        let list = List::new(names.iter().map(String::as_str))
            .block(
                Block::bordered()
                    .title(title)
                    .border_style(border_style(app.focus == focus)),
            )
            .highlight_style(Style::new().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");
        frame.render_stateful_widget(list, area, &mut selector.state);
    }
}

fn draw_amount(frame: &mut Frame, app: &mut App, area: Rect) {
    let [_, field, _] = Layout::horizontal([
        Constraint::Fill(1),
        Constraint::Length(30),
        Constraint::Fill(1),
    ])
    .areas(area);
    app.regions.amount = field;

    let focused = app.focus == Focus::Amount;
    let text = if focused {
        format!("{}▏", app.amount)
    } else {
        app.amount.clone()
    };
    frame.render_widget(
        Paragraph::new(text).block(
            Block::bordered()
                .title(" Amount ")
                .border_style(border_style(focused)),
        ),
        field,
    );
}

fn draw_button(frame: &mut Frame, app: &mut App, area: Rect) {
    let [_, button, _] = Layout::horizontal([
        Constraint::Fill(1),
        Constraint::Length(14),
        Constraint::Fill(1),
    ])
    .areas(area);
    app.regions.convert_button = button;

    let focused = app.focus == Focus::Convert;
    let mut label = Paragraph::new("Convert")
        .alignment(Alignment::Center)
        .block(Block::bordered().border_style(border_style(focused)));
    if focused {
        label = label.bold();
    }
    frame.render_widget(label, button);
}

fn draw_chart(frame: &mut Frame, app: &mut App, area: Rect) {
    app.regions.plot = area.into();

    let Some(model) = &app.chart else {
        return;
    };
    if model.series().is_empty() {
        frame.render_widget(
            Paragraph::new("No rate history available.")
                .dark_gray()
                .alignment(Alignment::Center),
            area,
        );
        return;
    }

    let data = model.data();
    let datasets = vec![
        Dataset::default()
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::new().fg(Color::White))
            .data(&data),
        Dataset::default()
            .marker(symbols::Marker::Dot)
            .graph_type(GraphType::Scatter)
            .style(Style::new().fg(Color::White))
            .data(&data),
    ];
    // no labels or titles, so neither axis takes any space
    let chart = Chart::new(datasets)
        .x_axis(Axis::default().bounds(model.x_bounds()))
        .y_axis(Axis::default().bounds(model.y_bounds()));
    frame.render_widget(chart, area);

    if let Tooltip::Showing { anchor, text, .. } = &app.tooltip {
        draw_tooltip(frame, *anchor, text, area);
    }
}

/// Boxed label above and left of the hovered point, kept inside `bounds`.
fn draw_tooltip(frame: &mut Frame, anchor: (u16, u16), text: &str, bounds: Rect) {
    let (col, row) = anchor;
    frame.render_widget(
        Paragraph::new("●").fg(Color::Yellow),
        Rect::new(col, row, 1, 1),
    );

    let width = (text.chars().count() as u16 + 4).min(bounds.width);
    let height = 3u16.min(bounds.height);
    let x = col
        .saturating_sub(width / 2)
        .clamp(bounds.x, bounds.right().saturating_sub(width).max(bounds.x));
    let y = if row >= bounds.y + height {
        row - height
    } else {
        (row + 1).min(bounds.bottom().saturating_sub(height))
    };

    let popup = Rect::new(x, y, width, height);
    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(text)
            .alignment(Alignment::Center)
            .block(Block::bordered().border_style(Style::new().fg(Color::Gray)))
            .style(Style::new().bg(Color::DarkGray).fg(Color::White)),
        popup,
    );
}
