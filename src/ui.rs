use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Gauge, Paragraph, Row, Table, TableState, Tabs},
    Frame, Terminal,
};
use std::io;

use osrs_tracker::{
    Account, ChecklistItem, CompletedSet, EmptyState, GameMode, Membership, Tier, Tracker,
    ViewContent,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Search,
    NewAccount,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Name,
    Membership,
    Mode,
}

impl FormField {
    pub fn next(&self) -> Self {
        match self {
            FormField::Name => FormField::Membership,
            FormField::Membership => FormField::Mode,
            FormField::Mode => FormField::Name,
        }
    }
}

/// Draft of the "new account" form
#[derive(Debug, Clone, PartialEq)]
pub struct NewAccountForm {
    pub name: String,
    pub membership: Membership,
    pub game_mode: GameMode,
    pub field: FormField,
}

impl Default for NewAccountForm {
    fn default() -> Self {
        NewAccountForm {
            name: String::new(),
            membership: Membership::Members,
            game_mode: GameMode::Main,
            field: FormField::Name,
        }
    }
}

impl NewAccountForm {
    /// Left/right on a choice field
    pub fn cycle_choice(&mut self, forward: bool) {
        match self.field {
            FormField::Name => {}
            FormField::Membership => self.membership = self.membership.toggle(),
            FormField::Mode => {
                let modes = GameMode::ALL;
                let i = modes.iter().position(|m| *m == self.game_mode).unwrap_or(0);
                let next = if forward {
                    (i + 1) % modes.len()
                } else {
                    (i + modes.len() - 1) % modes.len()
                };
                self.game_mode = modes[next];
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierCell<'a> {
    pub item_id: &'a str,
    pub tier: Tier,
    pub done: bool,
}

/// One selectable line of the checklist panel
#[derive(Debug, Clone, PartialEq)]
pub enum DisplayRow<'a> {
    Header {
        id: &'a str,
        label: &'a str,
        expanded: bool,
        visible_children: usize,
    },
    Item {
        id: &'a str,
        label: &'a str,
        done: bool,
        detail: Option<String>,
    },
    Region {
        name: &'a str,
        tiers: Vec<TierCell<'a>>,
        done: bool,
    },
}

pub struct App {
    pub tracker: Tracker,
    pub state: TableState,
    pub input_mode: InputMode,
    pub form: NewAccountForm,
    /// Last error or confirmation, shown in the status bar
    pub message: Option<String>,
}

impl App {
    pub fn new(tracker: Tracker) -> Self {
        let mut app = Self {
            tracker,
            state: TableState::default(),
            input_mode: InputMode::Normal,
            form: NewAccountForm::default(),
            message: None,
        };
        app.reset_selection();
        app
    }

    // ========================================================================
    // ROWS
    // ========================================================================

    pub fn display_rows(&self) -> Vec<DisplayRow<'_>> {
        let Some(session) = self.tracker.session() else {
            return Vec::new();
        };
        let Some(view) = session.view(self.tracker.settings()) else {
            return Vec::new();
        };

        let completed = session.completed();
        match view.content {
            ViewContent::Flat(items) => items
                .into_iter()
                .map(|item| item_row(item, completed))
                .collect(),
            ViewContent::Sectioned(sections) => {
                let mut rows = Vec::new();
                for section in sections {
                    let expanded = match section.header {
                        Some(header) => {
                            let expanded = session.is_expanded(&header.id);
                            rows.push(DisplayRow::Header {
                                id: &header.id,
                                label: &header.label,
                                expanded,
                                visible_children: section.children.len(),
                            });
                            expanded
                        }
                        None => true,
                    };
                    if expanded {
                        rows.extend(
                            section
                                .children
                                .into_iter()
                                .map(|item| item_row(item, completed)),
                        );
                    }
                }
                rows
            }
            ViewContent::Diary(regions) => regions
                .into_iter()
                .map(|region| DisplayRow::Region {
                    name: region.name,
                    done: region.is_complete(completed),
                    tiers: region
                        .tiers
                        .iter()
                        .map(|t| TierCell {
                            item_id: &t.item.id,
                            tier: t.tier,
                            done: completed.contains(&t.item.id),
                        })
                        .collect(),
                })
                .collect(),
        }
    }

    fn row_count(&self) -> usize {
        self.display_rows().len()
    }

    pub fn reset_selection(&mut self) {
        let select = if self.row_count() > 0 { Some(0) } else { None };
        self.state.select(select);
    }

    /// Keep the cursor on a valid row after the list shrank or grew
    pub fn clamp_selection(&mut self) {
        let len = self.row_count();
        match self.state.selected() {
            _ if len == 0 => self.state.select(None),
            Some(i) if i >= len => self.state.select(Some(len - 1)),
            None => self.state.select(Some(0)),
            _ => {}
        }
    }

    pub fn next(&mut self) {
        let len = self.row_count();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) => {
                if i >= len - 1 {
                    0
                } else {
                    i + 1
                }
            }
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let len = self.row_count();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) => {
                if i == 0 {
                    len - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        self.state.select(Some(i));
    }

    // ========================================================================
    // ACTIONS
    // ========================================================================

    fn report(&mut self, result: Result<()>) {
        if let Err(err) = result {
            tracing::warn!("{:#}", err);
            self.message = Some(format!("{:#}", err));
        }
    }

    /// Space: toggle the selected item, or expand/collapse a header
    pub fn activate_selected(&mut self) {
        enum Action {
            Section(String),
            Item(String),
            Region,
        }

        let action = {
            let rows = self.display_rows();
            match self.state.selected().and_then(|i| rows.get(i)) {
                Some(DisplayRow::Header { id, .. }) => Action::Section(id.to_string()),
                Some(DisplayRow::Item { id, .. }) => Action::Item(id.to_string()),
                Some(DisplayRow::Region { .. }) => Action::Region,
                None => return,
            }
        };

        match action {
            Action::Section(id) => {
                if let Some(session) = self.tracker.session_mut() {
                    session.toggle_section(&id);
                }
            }
            Action::Item(id) => {
                let result = self.tracker.toggle_item(&id).map(|_| ());
                self.report(result);
            }
            Action::Region => {
                self.message = Some("Use 1-4 to toggle a diary tier".to_string());
            }
        }
        self.clamp_selection();
    }

    /// 1-4 on a diary region
    pub fn toggle_tier(&mut self, tier: Tier) {
        let item_id = {
            let rows = self.display_rows();
            match self.state.selected().and_then(|i| rows.get(i)) {
                Some(DisplayRow::Region { tiers, .. }) => tiers
                    .iter()
                    .find(|cell| cell.tier == tier)
                    .map(|cell| cell.item_id.to_string()),
                _ => None,
            }
        };

        if let Some(item_id) = item_id {
            let result = self.tracker.toggle_diary_tier(&item_id);
            self.report(result);
            self.clamp_selection();
        }
    }

    /// "Mark all" on the active category, when offered
    pub fn mark_all(&mut self) {
        let category_id = self.tracker.session().and_then(|session| {
            let category = session.active_category()?;
            session
                .can_bulk_toggle(category, self.tracker.settings())
                .then(|| category.id.clone())
        });

        match category_id {
            Some(id) => {
                let result = self.tracker.toggle_category(&id);
                self.report(result);
                self.clamp_selection();
            }
            None => self.message = Some("Mark all is not available here".to_string()),
        }
    }

    pub fn cycle_category(&mut self, forward: bool) {
        if let Some(session) = self.tracker.session_mut() {
            session.cycle_category(forward);
        }
        self.reset_selection();
    }

    pub fn cycle_account(&mut self, forward: bool) {
        let result = self.tracker.cycle_account(forward);
        self.report(result);
        self.reset_selection();
    }

    pub fn toggle_hide_completed(&mut self) {
        if let Some(session) = self.tracker.session_mut() {
            let hide = !session.hide_completed();
            session.set_hide_completed(hide);
        }
        self.clamp_selection();
    }

    pub fn cycle_sort(&mut self) {
        if let Some(session) = self.tracker.session_mut() {
            session.cycle_sort();
        }
        self.reset_selection();
    }

    pub fn toggle_third_age(&mut self) {
        let result = self.tracker.toggle_count_third_age();
        self.report(result);
        self.clamp_selection();
    }

    fn edit_query(&mut self, edit: impl FnOnce(&mut String)) {
        if let Some(session) = self.tracker.session_mut() {
            let mut query = session.query().to_string();
            edit(&mut query);
            session.set_query(&query);
        }
        self.reset_selection();
    }

    pub fn submit_new_account(&mut self) {
        let form = self.form.clone();
        match self.tracker.add_account(&form.name, form.membership, form.game_mode) {
            Ok(account) => {
                self.message = Some(format!("Created {}", account.label()));
                self.form = NewAccountForm::default();
                self.input_mode = InputMode::Normal;
                self.reset_selection();
            }
            Err(err) => self.message = Some(format!("{:#}", err)),
        }
    }

    // ========================================================================
    // KEYS
    // ========================================================================

    /// Apply one key press. Returns true when the app should quit.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        match self.input_mode {
            InputMode::Normal => return self.handle_normal_key(key),
            InputMode::Search => match key.code {
                KeyCode::Enter | KeyCode::Esc => self.input_mode = InputMode::Normal,
                KeyCode::Backspace => self.edit_query(|q| {
                    q.pop();
                }),
                KeyCode::Char(c) => self.edit_query(|q| q.push(c)),
                _ => {}
            },
            InputMode::NewAccount => match key.code {
                KeyCode::Esc => {
                    self.form = NewAccountForm::default();
                    self.input_mode = InputMode::Normal;
                }
                KeyCode::Enter => self.submit_new_account(),
                KeyCode::Tab | KeyCode::Down => self.form.field = self.form.field.next(),
                KeyCode::Left => self.form.cycle_choice(false),
                KeyCode::Right => self.form.cycle_choice(true),
                KeyCode::Backspace if self.form.field == FormField::Name => {
                    self.form.name.pop();
                }
                KeyCode::Char(c) if self.form.field == FormField::Name => self.form.name.push(c),
                KeyCode::Char(' ') => self.form.cycle_choice(true),
                _ => {}
            },
        }
        false
    }

    fn handle_normal_key(&mut self, key: KeyEvent) -> bool {
        self.message = None;
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Tab => self.cycle_category(true),
            KeyCode::BackTab => self.cycle_category(false),
            KeyCode::Char(']') => self.cycle_account(true),
            KeyCode::Char('[') => self.cycle_account(false),
            KeyCode::Down | KeyCode::Char('j') => self.next(),
            KeyCode::Up | KeyCode::Char('k') => self.previous(),
            KeyCode::Home => self.reset_selection(),
            KeyCode::End => {
                let len = self.row_count();
                if len > 0 {
                    self.state.select(Some(len - 1));
                }
            }
            KeyCode::Char(' ') | KeyCode::Enter => self.activate_selected(),
            KeyCode::Char(c @ '1'..='4') => {
                if let Some(tier) = c.to_digit(10).and_then(|d| Tier::from_rank(d as usize - 1)) {
                    self.toggle_tier(tier);
                }
            }
            KeyCode::Char('m') => self.mark_all(),
            KeyCode::Char('/') if self.tracker.session().is_some() => {
                self.input_mode = InputMode::Search
            }
            KeyCode::Char('s') => self.cycle_sort(),
            KeyCode::Char('h') => self.toggle_hide_completed(),
            KeyCode::Char('t') => self.toggle_third_age(),
            KeyCode::Char('n') => self.input_mode = InputMode::NewAccount,
            _ => {}
        }
        false
    }
}

fn item_row<'a>(item: &'a ChecklistItem, completed: &CompletedSet) -> DisplayRow<'a> {
    DisplayRow::Item {
        id: &item.id,
        label: &item.label,
        done: completed.contains(&item.id),
        detail: item_detail(item.source.as_deref(), item.rate.as_deref()),
    }
}

fn item_detail(source: Option<&str>, rate: Option<&str>) -> Option<String> {
    match (source, rate) {
        (Some(source), Some(rate)) => Some(format!("{} · {}", source, rate)),
        (Some(one), None) | (None, Some(one)) => Some(one.to_string()),
        (None, None) => None,
    }
}

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("Error: {:?}", err);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            // Windows reports releases too
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                return Ok(());
            }
            if app.handle_key(key) {
                return Ok(());
            }
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Account bar
            Constraint::Length(3), // Overall progress
            Constraint::Length(3), // Category tabs
            Constraint::Length(3), // Search, sort, toggles
            Constraint::Min(0),    // Checklist
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);

    if app.tracker.session().is_some() {
        render_progress(f, chunks[1], app);
        render_tabs(f, chunks[2], app);
        render_controls(f, chunks[3], app);
        render_checklist(f, chunks[4], app);
    } else {
        let body = Rect {
            height: chunks[1].height + chunks[2].height + chunks[3].height + chunks[4].height,
            ..chunks[1]
        };
        render_no_account(f, body);
    }

    render_status_bar(f, chunks[5], app);

    if app.input_mode == InputMode::NewAccount {
        render_new_account_form(f, f.size(), &app.form);
    }
}

fn badge_color(mode: GameMode) -> Color {
    match mode {
        GameMode::Main => Color::White,
        GameMode::Ironman => Color::Gray,
        GameMode::Hardcore => Color::Red,
        GameMode::Group => Color::Cyan,
    }
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let active_id = app.tracker.active_account().map(|a| a.id.as_str());

    let mut spans = vec![Span::styled(
        "OSRS Tracker ",
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
    )];

    for account in app.tracker.accounts() {
        spans.push(Span::raw(" │ "));
        spans.extend(account_spans(account, Some(account.id.as_str()) == active_id));
    }

    spans.push(Span::raw(" │ "));
    spans.push(Span::styled("+ new", Style::default().fg(Color::DarkGray)));

    let header = Paragraph::new(vec![Line::from(spans)])
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::Cyan)));

    f.render_widget(header, area);
}

fn account_spans(account: &Account, active: bool) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    if let Some(badge) = account.game_mode.badge_text() {
        spans.push(Span::styled(
            format!("{} ", badge),
            Style::default().fg(badge_color(account.game_mode)),
        ));
    }

    let style = if active {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    spans.push(Span::styled(account.name.clone(), style));
    spans
}

fn render_progress(f: &mut Frame, area: Rect, app: &App) {
    let Some(progress) = app.tracker.overall_progress() else {
        return;
    };

    let color = if progress.is_complete() {
        Color::Green
    } else {
        Color::Yellow
    };
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title(" Overall Progress "))
        .gauge_style(Style::default().fg(color).bg(Color::Black))
        .ratio(progress.ratio().clamp(0.0, 1.0))
        .label(progress.to_string());

    f.render_widget(gauge, area);
}

fn render_tabs(f: &mut Frame, area: Rect, app: &App) {
    let Some(session) = app.tracker.session() else {
        return;
    };
    let settings = app.tracker.settings();

    let titles: Vec<Line> = session
        .catalog()
        .categories()
        .iter()
        .map(|category| {
            let progress = session.category_progress(category, settings);
            let mut spans = vec![Span::raw(format!(
                "{} ({}/{})",
                category.title, progress.completed, progress.total
            ))];
            if progress.is_complete() {
                spans.push(Span::styled(" ✓", Style::default().fg(Color::Green)));
            }
            Line::from(spans)
        })
        .collect();

    let tabs = Tabs::new(titles)
        .block(Block::default().borders(Borders::ALL))
        .select(session.active_category_index().unwrap_or(0))
        .style(Style::default().fg(Color::DarkGray))
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        )
        .divider(" │ ");

    f.render_widget(tabs, area);
}

fn on_off(value: bool) -> Span<'static> {
    if value {
        Span::styled("on", Style::default().fg(Color::Green))
    } else {
        Span::styled("off", Style::default().fg(Color::DarkGray))
    }
}

fn render_controls(f: &mut Frame, area: Rect, app: &App) {
    let Some(session) = app.tracker.session() else {
        return;
    };
    let settings = app.tracker.settings();

    let search_style = if app.input_mode == InputMode::Search {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    };
    let search_text = if session.query().is_empty() && app.input_mode != InputMode::Search {
        "Search items...".to_string()
    } else if app.input_mode == InputMode::Search {
        format!("{}▏", session.query())
    } else {
        session.query().to_string()
    };

    let mut spans = vec![
        Span::styled("/", Style::default().fg(Color::Yellow)),
        Span::raw(" "),
        Span::styled(format!("{:<24}", search_text), search_style),
        Span::raw(" | Sort: "),
        Span::styled(session.sort().label(), Style::default().fg(Color::Cyan)),
        Span::raw(" | Hide completed: "),
        on_off(session.hide_completed()),
        Span::raw(" | Count 3rd age: "),
        on_off(settings.count_third_age),
    ];

    if let Some(category) = session.active_category() {
        if session.can_bulk_toggle(category, settings) {
            let progress = session.category_progress(category, settings);
            let label = if progress.is_complete() {
                " Unmark All"
            } else {
                " Mark All"
            };
            spans.push(Span::raw(" | "));
            spans.push(Span::styled("m", Style::default().fg(Color::Yellow)));
            spans.push(Span::raw(label));
        }
    }

    let controls = Paragraph::new(vec![Line::from(spans)])
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::White)));

    f.render_widget(controls, area);
}

fn checkbox(done: bool) -> &'static str {
    if done {
        "[x]"
    } else {
        "[ ]"
    }
}

fn render_checklist(f: &mut Frame, area: Rect, app: &mut App) {
    let Some(session) = app.tracker.session() else {
        return;
    };
    let title = session
        .active_category()
        .map(|c| format!(" {} ", c.title))
        .unwrap_or_default();

    let empty_state = session
        .view(app.tracker.settings())
        .and_then(|view| view.empty_state);
    let display_rows = app.display_rows();

    // Headers kept by a header-only match stay above the message
    let area = match (&empty_state, display_rows.is_empty()) {
        (Some(empty), true) => {
            render_empty_state(f, area, &title, empty);
            return;
        }
        (Some(empty), false) => {
            let split = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(0), Constraint::Length(4)])
                .split(area);
            render_empty_state(f, split[1], "", empty);
            split[0]
        }
        (None, _) => area,
    };

    let rows: Vec<Row> = display_rows
        .into_iter()
        .map(|row| match row {
            DisplayRow::Header {
                label,
                expanded,
                visible_children,
                ..
            } => {
                let arrow = if expanded { "▾" } else { "▸" };
                Row::new(vec![
                    Cell::from(arrow),
                    Cell::from(label.to_string()),
                    Cell::from(format!("{} items", visible_children)),
                ])
                .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
            }
            DisplayRow::Item {
                label, done, detail, ..
            } => {
                let color = if done { Color::Green } else { Color::White };
                Row::new(vec![
                    Cell::from(checkbox(done)),
                    Cell::from(label.to_string()).style(Style::default().fg(color)),
                    Cell::from(detail.unwrap_or_default())
                        .style(Style::default().fg(Color::DarkGray)),
                ])
            }
            DisplayRow::Region { name, tiers, done } => {
                let tier_text = tiers
                    .iter()
                    .map(|cell| format!("{} {}", checkbox(cell.done), cell.tier.short_name()))
                    .collect::<Vec<_>>()
                    .join("  ");
                let color = if done { Color::Green } else { Color::White };
                Row::new(vec![
                    Cell::from(if done { "✓" } else { " " }),
                    Cell::from(name.to_string()).style(Style::default().fg(color)),
                    Cell::from(tier_text),
                ])
            }
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(3),
            Constraint::Percentage(55),
            Constraint::Percentage(45),
        ],
    )
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(title),
    )
    .highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut app.state);
}

fn render_empty_state(f: &mut Frame, area: Rect, title: &str, empty: &EmptyState) {
    let lines = match empty {
        EmptyState::CategoryComplete => vec![
            Line::from(Span::styled(
                "✓ Category Complete!",
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            )),
            Line::from("All items in this category are done and hidden."),
        ],
        EmptyState::NoResults(query) => vec![
            Line::from(Span::styled(
                "No Results",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            )),
            Line::from(format!("Nothing matches \"{}\".", query)),
        ],
        EmptyState::NothingToShow => vec![Line::from(Span::styled(
            "Nothing to show",
            Style::default().fg(Color::DarkGray),
        ))],
    };

    let panel = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title(title.to_string()));
    f.render_widget(panel, area);
}

fn render_no_account(f: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "No Account Selected",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![
            Span::raw("Press "),
            Span::styled("n", Style::default().fg(Color::Yellow)),
            Span::raw(" to create an account and start tracking."),
        ]),
    ];

    let panel = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(panel, area);
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn render_new_account_form(f: &mut Frame, area: Rect, form: &NewAccountForm) {
    let popup = centered_rect(56, 9, area);

    let field_style = |field: FormField| {
        if form.field == field {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        }
    };
    let name = if form.field == FormField::Name {
        format!("{}▏", form.name)
    } else {
        form.name.clone()
    };

    let lines = vec![
        Line::from(vec![
            Span::raw("Name:       "),
            Span::styled(name, field_style(FormField::Name)),
        ]),
        Line::from(vec![
            Span::raw("Membership: "),
            Span::styled(
                format!("◂ {} ▸", form.membership.display_name()),
                field_style(FormField::Membership),
            ),
        ]),
        Line::from(vec![
            Span::raw("Mode:       "),
            Span::styled(
                format!("◂ {} ▸", form.game_mode.display_name()),
                field_style(FormField::Mode),
            ),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "Tab next field · ←/→ change · Enter create · Esc cancel",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let panel = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" Add New Account "),
    );

    f.render_widget(Clear, popup);
    f.render_widget(panel, popup);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let mut status_spans = Vec::new();

    if let Some(message) = &app.message {
        status_spans.push(Span::styled(
            format!(" {} ", message),
            Style::default().fg(Color::Red),
        ));
        status_spans.push(Span::raw(" | "));
    } else {
        let selected = app.state.selected().map(|i| i + 1).unwrap_or(0);
        status_spans.push(Span::styled(
            format!(" Row: {}/{} ", selected, app.row_count()),
            Style::default().fg(Color::Cyan),
        ));
        status_spans.push(Span::raw(" | "));
    }

    let hints: &[(&str, &str)] = match app.input_mode {
        InputMode::Search => &[("Enter/Esc", " Done")],
        InputMode::NewAccount => &[("Enter", " Create | "), ("Esc", " Cancel")],
        InputMode::Normal => &[
            ("Space", " Toggle | "),
            ("1-4", " Tier | "),
            ("Tab", " Category | "),
            ("[ ]", " Account | "),
            ("s", " Sort | "),
            ("h", " Hide | "),
            ("t", " 3rd age | "),
            ("n", " New | "),
        ],
    };
    for (key, action) in hints {
        status_spans.push(Span::styled(*key, Style::default().fg(Color::Yellow)));
        status_spans.push(Span::raw(*action));
    }
    if app.input_mode == InputMode::Normal {
        status_spans.push(Span::styled("q", Style::default().fg(Color::Red)));
        status_spans.push(Span::raw(" Quit"));
    }

    let status_bar = Paragraph::new(vec![Line::from(status_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status_bar, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use osrs_tracker::MemoryStore;

    fn press(app: &mut App, code: KeyCode) -> bool {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn test_app() -> App {
        App::new(Tracker::load(Box::new(MemoryStore::new())).unwrap())
    }

    fn goto_category(app: &mut App, category_id: &str) {
        for _ in 0..10 {
            let current = app
                .tracker
                .session()
                .and_then(|s| s.active_category())
                .map(|c| c.id.clone());
            if current.as_deref() == Some(category_id) {
                return;
            }
            press(app, KeyCode::Tab);
        }
        panic!("category {} not reachable", category_id);
    }

    #[test]
    fn test_space_toggles_selected_item() {
        let mut app = test_app();
        assert_eq!(app.state.selected(), Some(0));

        press(&mut app, KeyCode::Char(' '));

        assert!(app.tracker.session().unwrap().is_completed("mem_skill_attack"));
        assert_eq!(app.tracker.overall_progress().unwrap().completed, 1);
    }

    #[test]
    fn test_search_filters_rows() {
        let mut app = test_app();

        press(&mut app, KeyCode::Char('/'));
        type_text(&mut app, "att");
        press(&mut app, KeyCode::Enter);

        let rows = app.display_rows();
        assert_eq!(rows.len(), 1);
        assert!(matches!(rows[0], DisplayRow::Item { id: "mem_skill_attack", .. }));
        assert_eq!(app.input_mode, InputMode::Normal);
    }

    #[test]
    fn test_collapsed_sections_hide_children() {
        let mut app = test_app();
        goto_category(&mut app, "mem_collection_log");

        let rows = app.display_rows();
        let headers = rows
            .iter()
            .filter(|r| matches!(r, DisplayRow::Header { .. }))
            .count();
        // Only the beginner clue section starts expanded
        assert_eq!(headers, 6);
        assert_eq!(rows.len(), 6 + 5);

        // First row is the collapsed bosses header
        press(&mut app, KeyCode::Char(' '));
        assert!(app.tracker.session().unwrap().is_expanded("clog_header_bosses"));
        assert!(app.display_rows().len() > 11);
    }

    #[test]
    fn test_header_only_match_shown_with_no_results() {
        let mut app = test_app();
        goto_category(&mut app, "mem_collection_log");
        for id in [
            "clog_beginner_mole_slippers",
            "clog_beginner_frog_slippers",
            "clog_beginner_bear_feet",
            "clog_beginner_demon_feet",
            "clog_beginner_shoulder_parrot",
        ] {
            app.tracker.toggle_item(id).unwrap();
        }

        press(&mut app, KeyCode::Char('h'));
        press(&mut app, KeyCode::Char('/'));
        type_text(&mut app, "beginner");
        press(&mut app, KeyCode::Enter);

        let rows = app.display_rows();
        assert_eq!(rows.len(), 1);
        assert!(matches!(
            rows[0],
            DisplayRow::Header { id: "clog_header_clues_beginner", visible_children: 0, .. }
        ));
        let view = app
            .tracker
            .session()
            .unwrap()
            .view(app.tracker.settings())
            .unwrap();
        assert_eq!(view.empty_state, Some(EmptyState::NoResults("beginner".to_string())));
        assert_eq!(app.state.selected(), Some(0));
    }

    #[test]
    fn test_diary_tier_keys() {
        let mut app = test_app();
        goto_category(&mut app, "mem_diaries");

        assert!(matches!(app.display_rows()[0], DisplayRow::Region { name: "Ardougne", .. }));
        press(&mut app, KeyCode::Char('3'));

        let session = app.tracker.session().unwrap();
        assert!(session.is_completed("diary_ardougne_easy"));
        assert!(session.is_completed("diary_ardougne_medium"));
        assert!(session.is_completed("diary_ardougne_hard"));
        assert!(!session.is_completed("diary_ardougne_elite"));
    }

    #[test]
    fn test_mark_all_and_hide_completed() {
        let mut app = test_app();

        press(&mut app, KeyCode::Char('m'));
        press(&mut app, KeyCode::Char('h'));

        assert!(app.display_rows().is_empty());
        assert_eq!(app.state.selected(), None);
        let view = app
            .tracker
            .session()
            .unwrap()
            .view(app.tracker.settings())
            .unwrap();
        assert_eq!(view.empty_state, Some(EmptyState::CategoryComplete));
    }

    #[test]
    fn test_mark_all_unavailable_on_sectioned_category() {
        let mut app = test_app();
        goto_category(&mut app, "mem_quests");

        press(&mut app, KeyCode::Char('m'));

        assert!(app.message.is_some());
        assert!(app.tracker.session().unwrap().completed().is_empty());
    }

    #[test]
    fn test_new_account_form() {
        let mut app = test_app();

        press(&mut app, KeyCode::Char('n'));
        type_text(&mut app, "Solo Hc");
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Enter);

        let account = app.tracker.active_account().unwrap();
        assert_eq!(account.name, "Solo Hc");
        assert_eq!(account.membership, Membership::F2p);
        assert_eq!(account.game_mode, GameMode::Hardcore);
        assert_eq!(app.input_mode, InputMode::Normal);
    }

    #[test]
    fn test_new_account_rejects_blank_name() {
        let mut app = test_app();

        press(&mut app, KeyCode::Char('n'));
        type_text(&mut app, "  ");
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.input_mode, InputMode::NewAccount);
        assert!(app.message.is_some());
        assert_eq!(app.tracker.accounts().len(), 2);
    }

    #[test]
    fn test_account_switch_and_quit() {
        let mut app = test_app();

        press(&mut app, KeyCode::Char(']'));
        assert_eq!(app.tracker.active_account().unwrap().id, "feMont26");

        assert!(press(&mut app, KeyCode::Char('q')));
    }
}
