use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Tabs, Wrap},
    Frame,
};

use crate::app::{App, StatusKind};
use crate::models::Screen;

use super::form::Form;
use super::handler::InputMode;

const LIGHT_BLUE: Color = Color::Rgb(191, 235, 255);
const POWDER_BLUE: Color = Color::Rgb(176, 224, 230);

pub fn draw(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Min(0),    // Active screen
            Constraint::Length(1), // Status line
            Constraint::Length(3), // Toolbar
        ])
        .split(frame.area());

    render_header(frame, app, chunks[0]);

    match app.screen {
        Screen::Home => render_expenses(frame, app, chunks[1]),
        Screen::Add => render_add(frame, app, chunks[1]),
        Screen::Stats => render_stats(frame, app, chunks[1]),
        Screen::Budgets => render_budgets(frame, app, chunks[1]),
        Screen::Bills => render_bills(frame, app, chunks[1]),
        Screen::Income => render_income(frame, app, chunks[1]),
    }

    render_status(frame, app, chunks[2]);
    render_toolbar(frame, app, chunks[3]);

    // The Add screen draws its form inline
    if let Some(form) = &app.form {
        if app.screen != Screen::Add {
            render_form_popup(frame, form);
        }
    }

    if let Some(pending) = &app.pending_delete {
        render_confirm(frame, &pending.prompt());
    }

    if app.show_help {
        render_help(frame);
    }
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let title = format!(" Finance Manager [{}] ", app.screen.label());
    let summary = format!(
        " {} Expenses | {} Budgets | {} Bills | Net {:.2}",
        app.expenses.len(),
        app.budgets.len(),
        app.bills.len(),
        app.stats.net()
    );

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let paragraph = Paragraph::new(summary).style(Style::default().fg(Color::White));
    frame.render_widget(paragraph, inner);
}

/// Alternating light/powder blue rows.
fn striped_row<'a>(index: usize, cells: Vec<String>) -> Row<'a> {
    let bg = if index % 2 == 0 { LIGHT_BLUE } else { POWDER_BLUE };
    Row::new(cells.into_iter().map(Cell::from)).style(Style::default().fg(Color::Black).bg(bg))
}

fn render_table(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    header: &[&'static str],
    widths: &[Constraint],
    rows: Vec<Row>,
    selected: Option<usize>,
) {
    let header = Row::new(header.iter().copied())
        .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));

    let table = Table::new(rows, widths.iter().copied())
        .header(header)
        .block(
            Block::default()
                .title(format!(" {title} "))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Green)),
        )
        .row_highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    let mut state = TableState::default();
    state.select(selected);

    frame.render_stateful_widget(table, area, &mut state);
}

fn selection(app: &App) -> Option<usize> {
    (app.row_count() > 0).then_some(app.selected_index)
}

fn render_expenses(frame: &mut Frame, app: &App, area: Rect) {
    let rows = app
        .expenses
        .iter()
        .enumerate()
        .map(|(i, e)| {
            striped_row(
                i,
                vec![
                    e.id.to_string(),
                    e.category.clone(),
                    format!("{:.2}", e.amount),
                    e.date.clone(),
                ],
            )
        })
        .collect();

    render_table(
        frame,
        area,
        "Expenses",
        &["ID", "Category", "Amount", "Date"],
        &[
            Constraint::Length(6),
            Constraint::Percentage(40),
            Constraint::Length(12),
            Constraint::Min(12),
        ],
        rows,
        selection(app),
    );
}

fn render_add(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(" Add Expense ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green));

    let lines = match &app.form {
        Some(form) => form_lines(form),
        None => vec![Line::from(Span::styled(
            "Press Enter or 'a' to add an expense",
            Style::default().fg(Color::DarkGray),
        ))],
    };

    let paragraph = Paragraph::new(lines).block(block);
    frame.render_widget(paragraph, area);
}

fn render_stats(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 2), Constraint::Ratio(1, 2)])
        .split(area);

    let stats = &app.stats;
    let mut lines = vec![
        Line::from(format!("Total expenses: {:.2}", stats.total_expenses)),
        Line::from(format!("Total income:   {:.2}", stats.total_income)),
        Line::from(format!("Total bills:    {:.2}", stats.total_bills)),
        Line::from(Span::styled(
            format!("Net:            {:.2}", stats.net()),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled("Categories", Style::default().fg(Color::Yellow))),
    ];
    lines.extend(
        stats
            .categories
            .iter()
            .map(|c| Line::from(format!("  {} ({})", c.name, c.kind.as_str()))),
    );

    let totals = Paragraph::new(lines).block(
        Block::default()
            .title(" Statistics ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Magenta)),
    );
    frame.render_widget(totals, chunks[0]);

    let rows = stats
        .by_category
        .iter()
        .enumerate()
        .map(|(i, t)| striped_row(i, vec![t.category.clone(), format!("{:.2}", t.total)]))
        .collect();
    render_table(
        frame,
        chunks[1],
        "Spending by Category",
        &["Category", "Spent"],
        &[Constraint::Percentage(60), Constraint::Percentage(40)],
        rows,
        None,
    );
}

fn render_budgets(frame: &mut Frame, app: &App, area: Rect) {
    let rows = app
        .budgets
        .iter()
        .enumerate()
        .map(|(i, b)| {
            let row = striped_row(
                i,
                vec![
                    b.category.clone(),
                    format!("{:.2}", b.amount),
                    format!("{:.2}", b.remaining),
                ],
            );
            if b.remaining < 0.0 {
                row.style(Style::default().fg(Color::Red).bg(POWDER_BLUE))
            } else {
                row
            }
        })
        .collect();

    render_table(
        frame,
        area,
        "Budgets",
        &["Category", "Budget Amount", "Remaining Amount"],
        &[
            Constraint::Percentage(40),
            Constraint::Percentage(30),
            Constraint::Percentage(30),
        ],
        rows,
        selection(app),
    );
}

fn render_bills(frame: &mut Frame, app: &App, area: Rect) {
    let rows = app
        .bills
        .iter()
        .enumerate()
        .map(|(i, b)| striped_row(i, vec![b.name.clone(), format!("{:.2}", b.amount)]))
        .collect();

    render_table(
        frame,
        area,
        "Bills",
        &["Name", "Amount"],
        &[Constraint::Percentage(60), Constraint::Percentage(40)],
        rows,
        selection(app),
    );
}

fn render_income(frame: &mut Frame, app: &App, area: Rect) {
    let rows = app
        .income
        .iter()
        .enumerate()
        .map(|(i, r)| {
            striped_row(
                i,
                vec![r.id.to_string(), format!("{:.2}", r.amount), r.received_on.clone()],
            )
        })
        .collect();

    let title = format!("Income (total {:.2})", app.stats.total_income);
    render_table(
        frame,
        area,
        &title,
        &["ID", "Amount", "Received"],
        &[
            Constraint::Length(6),
            Constraint::Length(14),
            Constraint::Min(12),
        ],
        rows,
        selection(app),
    );
}

fn render_status(frame: &mut Frame, app: &App, area: Rect) {
    let paragraph = match &app.status {
        Some(status) => {
            let color = match status.kind {
                StatusKind::Info => Color::Green,
                StatusKind::Error => Color::Red,
            };
            Paragraph::new(status.text.as_str()).style(Style::default().fg(color))
        }
        None => Paragraph::new(key_hints(app)).style(Style::default().fg(Color::DarkGray)),
    };
    frame.render_widget(paragraph, area);
}

fn key_hints(app: &App) -> &'static str {
    match app.input_mode() {
        InputMode::InlineForm => return "Tab:next field  Enter:save  Esc:cancel  ←/→:screens",
        InputMode::Form => return "Tab:next field  Enter:save  Esc:cancel",
        _ => {}
    }
    match app.screen {
        Screen::Home => "j/k:nav  a:add  e:edit  d:delete  ←/→:screens  ?:help  q:quit",
        Screen::Add => "Enter/a:new expense  ←/→:screens  ?:help  q:quit",
        Screen::Stats => "←/→:screens  ?:help  q:quit",
        Screen::Budgets | Screen::Bills => {
            "j/k:nav  a:add  e:edit amount  d:delete  ←/→:screens  ?:help  q:quit"
        }
        Screen::Income => "j/k:nav  a:add  d:delete  ←/→:screens  ?:help  q:quit",
    }
}

fn render_toolbar(frame: &mut Frame, app: &App, area: Rect) {
    let titles = Screen::ALL
        .iter()
        .enumerate()
        .map(|(i, s)| format!("{} {}", i + 1, s.label()));

    let tabs = Tabs::new(titles)
        .block(Block::default().borders(Borders::ALL))
        .select(app.screen.index())
        .style(Style::default().fg(Color::White))
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD | Modifier::REVERSED),
        )
        .divider("   ");

    frame.render_widget(tabs, area);
}

fn form_lines(form: &Form) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for (i, field) in form.fields.iter().enumerate() {
        let focused = i == form.focus;
        let label_style = if focused {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        let cursor = if focused { "_" } else { "" };

        lines.push(Line::from(Span::styled(format!("{}:", field.label), label_style)));
        lines.push(Line::from(format!("> {}{}", field.value, cursor)));
        lines.push(Line::from(""));
    }
    lines
}

fn render_form_popup(frame: &mut Frame, form: &Form) {
    let area = centered_rect(50, 40, frame.area());

    let block = Block::default()
        .title(format!(" {} ", form.title()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    let paragraph = Paragraph::new(form_lines(form)).block(block);

    frame.render_widget(Clear, area);
    frame.render_widget(paragraph, area);
}

fn render_confirm(frame: &mut Frame, prompt: &str) {
    let area = centered_rect(50, 20, frame.area());

    let block = Block::default()
        .title(" Confirm Delete ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red));

    let text = format!("{prompt}\n\ny:yes  n:no");
    let paragraph = Paragraph::new(text)
        .block(block)
        .wrap(Wrap { trim: true });

    frame.render_widget(Clear, area);
    frame.render_widget(paragraph, area);
}

fn render_help(frame: &mut Frame) {
    let area = centered_rect(50, 70, frame.area());

    let help_text = vec![
        "",
        " Screens:",
        "   1-6        Jump to a screen",
        "   ← / →      Previous / next screen",
        "",
        " Tables:",
        "   j / ↓      Move down",
        "   k / ↑      Move up",
        "   a          Add",
        "   e          Edit selected",
        "   d          Delete selected",
        "",
        " Forms:",
        "   Tab        Next field",
        "   Enter      Save",
        "   Esc        Cancel",
        "   ← / →      Leave the Add screen",
        "",
        " General:",
        "   ?          Toggle this help",
        "   q          Quit",
        "",
        " Press any key to close",
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let paragraph = Paragraph::new(help_text.join("\n"))
        .block(block)
        .style(Style::default().fg(Color::White));

    frame.render_widget(Clear, area);
    frame.render_widget(paragraph, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
