use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{
        Bar, BarChart, BarGroup, Block, Borders, List, ListItem, Paragraph, Tabs, Widget, Wrap,
    },
};

use gym_coach::models::{BodyArea, UserProfile};
use gym_coach::progress::WeekBucket;
use gym_coach::router::{Route, Screen};
use gym_coach::screens::admin::Overview;
use gym_coach::screens::injuries::InjuryView;
use gym_coach::screens::routines::RoutineView;
use gym_coach::screens::settings::SettingsView;
use gym_coach::screens::trainer::StudentOption;
use gym_coach::screens::ListState;

fn panel(title: &str) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", title))
        .border_style(Style::default().fg(Color::Gray))
}

fn area_color(area: &BodyArea) -> Color {
    match area {
        BodyArea::Legs => Color::Green,
        BodyArea::Cardio => Color::Red,
        BodyArea::Strength => Color::Cyan,
        BodyArea::Other(_) => Color::Magenta,
    }
}

/// Render the non-populated states of a list; returns true if it drew
fn render_list_state<T>(area: Rect, buf: &mut Buffer, state: &ListState<T>) -> bool {
    let (text, color) = match state {
        ListState::Populated(_) => return false,
        ListState::Loading => ("Loading...".to_string(), Color::Gray),
        ListState::Empty { message } => (message.clone(), Color::Gray),
        ListState::Unauthenticated => ("User not authenticated.".to_string(), Color::Red),
    };

    Paragraph::new(text)
        .style(Style::default().fg(color))
        .wrap(Wrap { trim: true })
        .render(area, buf);
    true
}

pub fn render_tabs(area: Rect, buf: &mut Buffer, route: &Route, selected: usize) {
    let titles: Vec<String> = route
        .screens()
        .iter()
        .enumerate()
        .map(|(i, screen)| format!("{} {}", i + 1, screen.title()))
        .collect();

    Tabs::new(titles)
        .block(panel(&format!("Gym Coach ({})", route)))
        .select(selected)
        .style(Style::default().fg(Color::Gray))
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .render(area, buf);
}

/// Loading, unknown-role and profile-error views
pub fn render_placeholder(area: Rect, buf: &mut Buffer, route: &Route) {
    let block = panel("Gym Coach");
    let inner = block.inner(area);
    block.render(area, buf);

    let (message, color) = match route {
        Route::ProfileError(_) => (route.placeholder().unwrap_or_default(), Color::Red),
        Route::UnknownRole(_) => (route.placeholder().unwrap_or_default(), Color::Yellow),
        _ => (
            route
                .placeholder()
                .unwrap_or_else(|| "Run 'gym-coach login' to sign in.".to_string()),
            Color::Gray,
        ),
    };

    Paragraph::new(vec![
        Line::from(Span::styled(message, Style::default().fg(color))),
        Line::from(""),
        Line::from(Span::styled("Press q to quit", Style::default().fg(Color::DarkGray))),
    ])
    .wrap(Wrap { trim: true })
    .render(inner, buf);
}

pub fn render_hint(area: Rect, buf: &mut Buffer, screen: Screen, lines: &[&str]) {
    let block = panel(screen.title());
    let inner = block.inner(area);
    block.render(area, buf);

    let lines: Vec<Line> = lines.iter().map(|l| Line::from(*l)).collect();
    Paragraph::new(lines)
        .style(Style::default().fg(Color::Gray))
        .wrap(Wrap { trim: true })
        .render(inner, buf);
}

pub fn render_welcome(area: Rect, buf: &mut Buffer, settings: Option<&SettingsView>) {
    let block = panel("Home");
    let inner = block.inner(area);
    block.render(area, buf);

    let name = settings.map(|s| s.name.as_str()).unwrap_or("athlete");
    let lines = vec![
        Line::from(vec![
            Span::styled("Welcome, ", Style::default().fg(Color::Gray)),
            Span::styled(
                name.to_string(),
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(""),
        Line::from("  2  Weekly progress"),
        Line::from("  3  Your routines"),
        Line::from("  4  Injury history"),
        Line::from("  5  Profile settings"),
    ];

    Paragraph::new(lines).render(inner, buf);
}

/// Grouped bar chart of weekly volume by body area
pub fn render_progress_chart(area: Rect, buf: &mut Buffer, state: &ListState<WeekBucket>) {
    let block = panel("Weekly volume");
    let inner = block.inner(area);
    block.render(area, buf);

    if render_list_state(inner, buf, state) {
        return;
    }

    let mut chart = BarChart::default().bar_width(3).bar_gap(0).group_gap(2);
    for bucket in state.items() {
        let bars: Vec<Bar> = BodyArea::STANDARD
            .iter()
            .map(|area| {
                Bar::default()
                    .value(bucket.volume(area).round() as u64)
                    .style(Style::default().fg(area_color(area)))
            })
            .collect();
        chart = chart.data(BarGroup::default().label(Line::from(bucket.label())).bars(&bars));
    }

    chart.render(inner, buf);
}

pub fn render_progress_table(area: Rect, buf: &mut Buffer, state: &ListState<WeekBucket>) {
    let block = panel("Totals");
    let inner = block.inner(area);
    block.render(area, buf);

    if render_list_state(inner, buf, state) {
        return;
    }

    let mut header = vec![Span::styled(format!("{:<10}", ""), Style::default())];
    for area in BodyArea::STANDARD.iter() {
        header.push(Span::styled(
            format!("{:>10}", area.to_string()),
            Style::default().fg(area_color(area)),
        ));
    }
    header.push(Span::styled(
        format!("{:>10}", "Total"),
        Style::default().add_modifier(Modifier::BOLD),
    ));

    let mut lines = vec![Line::from(header)];
    for bucket in state.items() {
        let mut row = format!("{:<10}", bucket.label());
        for area in BodyArea::STANDARD.iter() {
            row.push_str(&format!("{:>10.1}", bucket.volume(area)));
        }
        row.push_str(&format!("{:>10.1}", bucket.total));
        lines.push(Line::from(row));
    }

    Paragraph::new(lines).render(inner, buf);
}

fn highlight(is_selected: bool) -> Style {
    if is_selected {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    }
}

pub fn render_routines(
    area: Rect,
    buf: &mut Buffer,
    state: &ListState<RoutineView>,
    selected: usize,
) {
    let block = panel("Routines");
    let inner = block.inner(area);
    block.render(area, buf);

    if render_list_state(inner, buf, state) {
        return;
    }

    let items: Vec<ListItem> = state
        .items()
        .iter()
        .enumerate()
        .map(|(idx, routine)| {
            let mut lines = vec![Line::from(Span::styled(
                format!("{}  (from {})", routine.name, routine.start_date),
                highlight(idx == selected),
            ))];
            for exercise in &routine.exercises {
                lines.push(Line::from(Span::styled(
                    format!("   • {}", exercise.summary()),
                    Style::default().fg(Color::Gray),
                )));
            }
            ListItem::new(lines)
        })
        .collect();

    List::new(items).render(inner, buf);
}

pub fn render_injuries(
    area: Rect,
    buf: &mut Buffer,
    state: &ListState<InjuryView>,
    selected: usize,
) {
    let block = panel("Injuries");
    let inner = block.inner(area);
    block.render(area, buf);

    if render_list_state(inner, buf, state) {
        return;
    }

    let items: Vec<ListItem> = state
        .items()
        .iter()
        .enumerate()
        .map(|(idx, injury)| {
            ListItem::new(vec![
                Line::from(vec![
                    Span::styled(format!("{} ", injury.date), Style::default().fg(Color::Gray)),
                    Span::styled(
                        format!("[{}] ", injury.status),
                        Style::default().fg(Color::Yellow),
                    ),
                    Span::styled(injury.description.clone(), highlight(idx == selected)),
                ]),
                Line::from(Span::styled(
                    format!("   Notes: {}", injury.notes),
                    Style::default().fg(Color::Gray),
                )),
            ])
        })
        .collect();

    List::new(items).render(inner, buf);
}

pub fn render_students(
    area: Rect,
    buf: &mut Buffer,
    state: &ListState<StudentOption>,
    selected: usize,
) {
    let block = panel("Your students (Enter to select)");
    let inner = block.inner(area);
    block.render(area, buf);

    if render_list_state(inner, buf, state) {
        return;
    }

    let items: Vec<ListItem> = state
        .items()
        .iter()
        .enumerate()
        .map(|(idx, student)| {
            ListItem::new(Line::from(vec![
                Span::styled(format!("{:<30}", student.label), highlight(idx == selected)),
                Span::styled(student.id.clone(), Style::default().fg(Color::DarkGray)),
            ]))
        })
        .collect();

    List::new(items).render(inner, buf);
}

fn profile_items(profiles: &[&UserProfile]) -> Vec<ListItem<'static>> {
    profiles
        .iter()
        .map(|profile| {
            ListItem::new(Line::from(vec![
                Span::styled(format!("{:<24}", profile.label()), Style::default().fg(Color::White)),
                Span::styled(profile.id.clone(), Style::default().fg(Color::DarkGray)),
            ]))
        })
        .collect()
}

pub fn render_overview(area: Rect, buf: &mut Buffer, overview: &Overview) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(34),
            Constraint::Percentage(33),
            Constraint::Percentage(33),
        ])
        .split(area);

    let sections = [
        ("Trainers", &overview.trainers),
        ("Students", &overview.students),
    ];
    for (column, (title, state)) in columns.iter().zip(sections) {
        let block = panel(title);
        let inner = block.inner(*column);
        block.render(*column, buf);

        if !render_list_state(inner, buf, state) {
            let profiles: Vec<&UserProfile> = state.items().iter().collect();
            List::new(profile_items(&profiles)).render(inner, buf);
        }
    }

    let block = panel("Unassigned");
    let inner = block.inner(columns[2]);
    block.render(columns[2], buf);

    let unassigned = overview.unassigned_students();
    if unassigned.is_empty() {
        Paragraph::new("Every student has a trainer.")
            .style(Style::default().fg(Color::Gray))
            .render(inner, buf);
    } else {
        List::new(profile_items(&unassigned)).render(inner, buf);
    }
}

pub fn render_settings(area: Rect, buf: &mut Buffer, settings: Option<&SettingsView>) {
    let block = panel("Settings");
    let inner = block.inner(area);
    block.render(area, buf);

    let Some(view) = settings else {
        Paragraph::new("Profile not loaded.")
            .style(Style::default().fg(Color::Gray))
            .render(inner, buf);
        return;
    };

    let field = |label: &str, value: &str| {
        Line::from(vec![
            Span::styled(format!("{:<8}", label), Style::default().fg(Color::Gray)),
            Span::styled(value.to_string(), Style::default().fg(Color::White)),
        ])
    };

    Paragraph::new(vec![
        field("Name", &view.name),
        field("Email", &view.email),
        field("Role", &view.role),
        Line::from(""),
        Line::from(Span::styled(
            "Change your name with 'gym-coach profile set-name'.",
            Style::default().fg(Color::DarkGray),
        )),
    ])
    .render(inner, buf);
}

pub fn render_help_overlay(area: Rect, buf: &mut Buffer) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Help ")
        .border_style(Style::default().fg(Color::Cyan))
        .style(Style::default().bg(Color::Black));

    let inner = block.inner(area);
    block.render(area, buf);

    let help_text = vec![
        Line::from(Span::styled(
            "Keyboard Shortcuts",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("  Tab/→/l   - Next tab"),
        Line::from("  S-Tab/←/h - Previous tab"),
        Line::from("  1-5       - Jump to tab"),
        Line::from("  ↑/k ↓/j   - Move selection"),
        Line::from("  Enter     - Select student (trainers)"),
        Line::from("  r         - Reload"),
        Line::from("  ?         - Toggle this help"),
        Line::from("  q         - Quit"),
        Line::from(""),
        Line::from(Span::styled(
            "Press ? or ESC to close",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    Paragraph::new(help_text).render(inner, buf);
}

pub fn render_status_bar(
    area: Rect,
    buf: &mut Buffer,
    route: &Route,
    focused: Option<&StudentOption>,
) {
    let mut spans = vec![Span::styled(
        format!(" {} ", route),
        Style::default().fg(Color::Black).bg(Color::Cyan),
    )];
    if let Some(student) = focused {
        spans.push(Span::styled(
            format!(" Student: {} ", student.label),
            Style::default().fg(Color::Yellow).bg(Color::DarkGray),
        ));
    }
    spans.push(Span::styled(
        " Press ? for help ",
        Style::default().fg(Color::Gray).bg(Color::DarkGray),
    ));

    Paragraph::new(Line::from(spans)).render(area, buf);
}
