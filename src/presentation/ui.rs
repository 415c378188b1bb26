use crate::application::{App, AppMode, Screen};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table},
    Frame,
};

const KEYPAD_ROWS: [[&str; 3]; 4] = [
    ["1", "2", "3"],
    ["4", "5", "6"],
    ["7", "8", "9"],
    ["C", "0", "⌫"],
];

pub fn render_ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(f.area());

    render_header(f, app, chunks[0]);
    match app.screen() {
        Screen::CountEntry => render_count_entry(f, app, chunks[1]),
        Screen::NameEntry => render_name_entry(f, app, chunks[1]),
        Screen::Counting => render_counting(f, app, chunks[1]),
    }
    render_status_bar(f, app, chunks[2]);

    if app.mode == AppMode::Help {
        render_help_popup(f, app.help_scroll);
    }
}

fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let step = match app.screen() {
        Screen::CountEntry => "Setup: station count".to_string(),
        Screen::NameEntry => format!("Setup: names ({} stations)", app.session.station_count()),
        Screen::Counting => {
            let summary = app.session.summary();
            format!(
                "Counting | {} stations | total {}",
                summary.stations,
                summary.total_label()
            )
        }
    };
    let header = Paragraph::new(format!("tally - Station Counter | {step}"))
        .style(Style::default().fg(Color::Cyan));
    f.render_widget(header, area);
}

fn render_count_entry(f: &mut Frame, app: &App, area: Rect) {
    let field = if app.count_input.is_empty() {
        Span::styled(
            format!("1-{}", app.session.max_stations()),
            Style::default().fg(Color::DarkGray),
        )
    } else {
        Span::styled(app.count_input.clone(), Style::default().fg(Color::White))
    };
    let submit_style = if app.can_submit_count() {
        Style::default().fg(Color::Green)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let text = vec![
        Line::from("How many stations?"),
        Line::from(""),
        Line::from(vec![Span::raw("Stations: "), field]),
        Line::from(""),
        Line::from(Span::styled("[Enter] Confirm", submit_style)),
    ];
    let paragraph = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL).title("Station Count"));
    f.render_widget(paragraph, area);
}

fn render_name_entry(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);

    let visible = chunks[0].height.saturating_sub(2) as usize;
    let offset = scroll_offset(app.selected_name, visible);

    let rows: Vec<Row> = app
        .session
        .stations()
        .iter()
        .enumerate()
        .skip(offset)
        .take(visible)
        .map(|(i, station)| {
            let style = if i == app.selected_name {
                Style::default().bg(Color::Blue).fg(Color::White)
            } else if station.has_name() {
                Style::default()
            } else {
                Style::default().fg(Color::Yellow)
            };
            let name = if i == app.selected_name {
                format!("{}_", station.name)
            } else {
                station.name.clone()
            };
            Row::new(vec![
                Cell::from(format!("Station {}:", i + 1)),
                Cell::from(name),
            ])
            .style(style)
        })
        .collect();

    let table = Table::new(rows, [Constraint::Length(12), Constraint::Min(10)])
        .block(Block::default().borders(Borders::ALL).title("Station Names"))
        .column_spacing(1);
    f.render_widget(table, chunks[0]);

    let start_style = if app.session.can_start() {
        Style::default().fg(Color::Green)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let controls = Line::from(vec![
        Span::styled(" [Enter] Start counting ", start_style),
        Span::raw(" [Tab/↑↓] Field  [Ctrl+N] Reconfigure"),
    ]);
    f.render_widget(Paragraph::new(controls), chunks[1]);
}

fn render_counting(f: &mut Frame, app: &App, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(30), Constraint::Min(20)])
        .split(area);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Length(3),
            Constraint::Min(7),
        ])
        .split(columns[0]);

    if let Some(station) = app.session.current_station() {
        let current = Paragraph::new(vec![
            Line::from(Span::styled(
                station.name.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(format!("Count: {}", station.count)),
        ])
        .block(Block::default().borders(Borders::ALL).title("Current Station"));
        f.render_widget(current, left[0]);
    }

    let display_style = if app.session.pending_input().is_empty() {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
    };
    let display = Paragraph::new(app.session.display_input().to_string())
        .style(display_style)
        .alignment(Alignment::Right)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(display, left[1]);

    let mut keypad: Vec<Line> = KEYPAD_ROWS
        .iter()
        .map(|row| Line::from(format!("  [{}]  [{}]  [{}]", row[0], row[1], row[2])))
        .collect();
    keypad.push(Line::from("  [    ENTER    ]"));
    let keypad = Paragraph::new(keypad).block(Block::default().borders(Borders::ALL).title("Keypad"));
    f.render_widget(keypad, left[2]);

    render_station_list(f, app, columns[1]);
}

fn render_station_list(f: &mut Frame, app: &App, area: Rect) {
    let current = app.session.current_station_index();
    let visible = area.height.saturating_sub(3) as usize;
    let offset = scroll_offset(current, visible);

    let header = Row::new(vec!["#", "Station", "Count"])
        .style(Style::default().fg(Color::Yellow))
        .height(1);

    let rows: Vec<Row> = app
        .session
        .stations()
        .iter()
        .enumerate()
        .skip(offset)
        .take(visible)
        .map(|(i, station)| {
            let style = if i == current {
                Style::default().bg(Color::LightBlue).fg(Color::Black)
            } else {
                Style::default()
            };
            Row::new(vec![
                Cell::from(format!("{}", i + 1)),
                Cell::from(station.name.clone()),
                Cell::from(station.count.to_string()),
            ])
            .style(style)
        })
        .collect();

    let title = format!("Stations (total {})", app.session.summary().total_label());
    let table = Table::new(
        rows,
        [Constraint::Length(3), Constraint::Min(10), Constraint::Length(10)],
    )
    .header(header)
    .block(Block::default().borders(Borders::ALL).title(title))
    .column_spacing(1);
    f.render_widget(table, area);
}

/// First visible row so that `selected` stays on screen.
fn scroll_offset(selected: usize, visible: usize) -> usize {
    if visible == 0 {
        return selected;
    }
    (selected + 1).saturating_sub(visible)
}

fn render_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let input_text = match (app.mode, &app.status_message) {
        (AppMode::Help, _) => "↑↓/jk: scroll | Home: top | Esc/q: close help".to_string(),
        (AppMode::Normal, Some(status)) => status.clone(),
        (AppMode::Normal, None) => match app.screen() {
            Screen::CountEntry => "0-9: count | Enter: confirm | F1/?: help | q: quit".to_string(),
            Screen::NameEntry => {
                "Type a name | Tab: next field | Enter: start | Ctrl+N: reconfigure | Ctrl+C: quit"
                    .to_string()
            }
            Screen::Counting => {
                "0-9: digit | Enter: add | ⌫: delete | Esc/c: clear | Ctrl+E: export | Ctrl+R: reset | q: quit"
                    .to_string()
            }
        },
    };

    let style = match app.mode {
        AppMode::Help => Style::default().fg(Color::Cyan),
        AppMode::Normal if app.status_message.is_some() => Style::default().fg(Color::Yellow),
        AppMode::Normal => Style::default(),
    };

    let status = Paragraph::new(input_text)
        .block(Block::default().borders(Borders::ALL).title("Status"))
        .style(style);
    f.render_widget(status, area);
}

fn render_help_popup(f: &mut Frame, scroll: usize) {
    let area = f.area();
    let popup_area = Rect {
        x: area.width / 10,
        y: area.height / 10,
        width: area.width * 4 / 5,
        height: area.height * 4 / 5,
    };

    f.render_widget(Clear, popup_area);

    let help_lines: Vec<&str> = HELP_TEXT.lines().collect();
    let visible_height = popup_area.height.saturating_sub(2) as usize;

    let start_line = scroll.min(help_lines.len().saturating_sub(visible_height));
    let end_line = (start_line + visible_height).min(help_lines.len());

    let visible_text = help_lines[start_line..end_line].join("\n");

    let help_widget = Paragraph::new(visible_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("tally Help (Line {}/{})", start_line + 1, help_lines.len()))
                .style(Style::default().fg(Color::Cyan)),
        )
        .style(Style::default().fg(Color::White));

    f.render_widget(help_widget, popup_area);
}

const HELP_TEXT: &str = r#"TALLY STATION COUNTER

=== SETUP ===
1. Enter how many stations you are counting and press Enter.
2. Type a name for every station. Tab / arrow keys move between fields.
   Names made only of spaces count as empty.
3. Press Enter once every station has a name to start counting.
   Ctrl+N goes back to the station count.

=== COUNTING ===
0-9             Type a number on the keypad
Backspace       Delete the last digit
Esc / Delete / c Clear the number
Enter           Add the number to the current station and move on
                After the last station the cursor returns to the first

Counts only ever go up. To correct a mistake, add the difference at the
station's next turn.

=== ANYWHERE ===
Ctrl+E          Export station counts to CSV
Ctrl+R          Reset everything and return to the station count
F1 / ?          Show this help
q / Ctrl+C      Quit (q is typed as text on the name screen)

Nothing is saved between runs. Use Ctrl+E before quitting to keep a report."#;
