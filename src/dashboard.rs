use chrono::NaiveDate;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::{Constraint, Layout},
    style::Style,
    text::{Line, Span},
    widgets::{Cell, Paragraph, Row, Table, TableState},
    DefaultTerminal, Frame,
};

use crate::error::Result;
use crate::fmt;
use crate::ledger::Ledger;
use crate::models::{Status, Transaction};
use crate::store::KeyValueStore;
use crate::tui::{self, FOOTER_STYLE, HEADER_STYLE, OVERDUE_STYLE, PAID_STYLE, SELECTED_STYLE};
use crate::views::{self, CategoryTotal, GoalProgress, MonthSummary, TypeFilter, ViewQuery, YearMonth};

const MAX_CATEGORY_LINES: usize = 7;

enum Mode {
    Normal,
    Search,
    ConfirmDelete,
}

pub enum DashboardAction {
    Continue,
    Close,
    /// Month, filter or search changed; re-derive the view.
    Reload,
    ToggleStatus(String),
    Delete(String),
    TogglePrivacy,
}

/// Interactive month view over the ledger. Every action mutates the ledger
/// (which writes through to storage) and then re-derives the view.
pub struct Dashboard {
    query: ViewQuery,
    today: NaiveDate,
    rows: Vec<Transaction>,
    summary: MonthSummary,
    categories: Vec<CategoryTotal>,
    overdue_count: usize,
    overdue_total: f64,
    installment_debt: f64,
    goal: Option<GoalProgress>,
    privacy: bool,
    selected: usize,
    mode: Mode,
    status_message: Option<String>,
    table_state: TableState,
}

impl Dashboard {
    pub fn new(month: YearMonth, today: NaiveDate) -> Self {
        Self {
            query: ViewQuery::month(month),
            today,
            rows: Vec::new(),
            summary: MonthSummary::default(),
            categories: Vec::new(),
            overdue_count: 0,
            overdue_total: 0.0,
            installment_debt: 0.0,
            goal: None,
            privacy: false,
            selected: 0,
            mode: Mode::Normal,
            status_message: None,
            table_state: TableState::default(),
        }
    }

    pub fn refresh<S: KeyValueStore>(&mut self, ledger: &Ledger<S>) {
        let view = views::build(ledger.transactions(), &self.query, self.today, ledger.goal());
        self.rows = view.rows.into_iter().cloned().collect();
        self.summary = view.summary;
        self.categories = view.categories;
        self.overdue_count = view.overdue.len();
        self.overdue_total = view.overdue.iter().map(|t| t.amount).sum();
        self.installment_debt = view.installment_debt;
        self.goal = view.goal;
        self.privacy = ledger.privacy();
        if self.selected >= self.rows.len() {
            self.selected = self.rows.len().saturating_sub(1);
        }
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.rows.get(self.selected).map(|t| t.id.as_str())
    }

    pub fn run<S: KeyValueStore>(&mut self, ledger: &mut Ledger<S>) -> Result<()> {
        self.refresh(ledger);
        tui::with_terminal(|terminal| self.event_loop(terminal, ledger))
    }

    fn event_loop<S: KeyValueStore>(
        &mut self,
        terminal: &mut DefaultTerminal,
        ledger: &mut Ledger<S>,
    ) -> Result<()> {
        loop {
            terminal.draw(|frame| self.draw_frame(frame))?;

            if let Event::Key(KeyEvent {
                code,
                modifiers,
                kind,
                ..
            }) = event::read()?
            {
                if kind != KeyEventKind::Press {
                    continue;
                }
                if modifiers.contains(KeyModifiers::CONTROL) && code == KeyCode::Char('c') {
                    break;
                }

                let action = self.handle_key_event(code);
                if matches!(action, DashboardAction::Close) {
                    break;
                }
                if let Err(e) = self.apply(action, ledger) {
                    self.status_message = Some(format!("Action failed: {e}"));
                }
            }
        }
        Ok(())
    }

    pub fn apply<S: KeyValueStore>(
        &mut self,
        action: DashboardAction,
        ledger: &mut Ledger<S>,
    ) -> Result<()> {
        match action {
            DashboardAction::Continue | DashboardAction::Close => return Ok(()),
            DashboardAction::Reload => {}
            DashboardAction::ToggleStatus(id) => {
                let status = ledger.toggle_status(&id)?;
                let label = match status {
                    Status::Paid => "paid",
                    Status::Pending => "pending",
                };
                self.status_message = Some(format!("Marked {label}"));
            }
            DashboardAction::Delete(id) => {
                let removed = ledger.delete(&id)?;
                self.status_message = Some(format!("Deleted '{}'", removed.description));
            }
            DashboardAction::TogglePrivacy => {
                let on = ledger.toggle_privacy()?;
                self.status_message = Some(format!("Privacy {}", if on { "on" } else { "off" }));
            }
        }
        self.refresh(ledger);
        Ok(())
    }

    pub fn handle_key_event(&mut self, code: KeyCode) -> DashboardAction {
        match self.mode {
            Mode::Normal => self.handle_normal_key(code),
            Mode::Search => self.handle_search_key(code),
            Mode::ConfirmDelete => {
                self.mode = Mode::Normal;
                let id = self.selected_id().map(str::to_string);
                match (code, id) {
                    (KeyCode::Char('y'), Some(id)) => DashboardAction::Delete(id),
                    _ => {
                        self.status_message = Some("Delete cancelled".to_string());
                        DashboardAction::Continue
                    }
                }
            }
        }
    }

    fn handle_normal_key(&mut self, code: KeyCode) -> DashboardAction {
        self.status_message = None;
        match code {
            KeyCode::Char('q') | KeyCode::Esc => DashboardAction::Close,
            KeyCode::Left | KeyCode::Char('h') => {
                self.query.month = self.query.month.prev();
                self.selected = 0;
                DashboardAction::Reload
            }
            KeyCode::Right | KeyCode::Char('l') => {
                self.query.month = self.query.month.next();
                self.selected = 0;
                DashboardAction::Reload
            }
            KeyCode::Down => {
                if self.selected + 1 < self.rows.len() {
                    self.selected += 1;
                }
                DashboardAction::Continue
            }
            KeyCode::Up => {
                self.selected = self.selected.saturating_sub(1);
                DashboardAction::Continue
            }
            KeyCode::Char(' ') => match self.selected_id() {
                Some(id) => DashboardAction::ToggleStatus(id.to_string()),
                None => DashboardAction::Continue,
            },
            KeyCode::Char('x') => {
                if self.selected_id().is_some() {
                    self.mode = Mode::ConfirmDelete;
                }
                DashboardAction::Continue
            }
            KeyCode::Char('p') => DashboardAction::TogglePrivacy,
            KeyCode::Char('t') => {
                self.query.filter = self.query.filter.next();
                self.selected = 0;
                DashboardAction::Reload
            }
            KeyCode::Char('/') => {
                self.mode = Mode::Search;
                DashboardAction::Continue
            }
            _ => DashboardAction::Continue,
        }
    }

    fn handle_search_key(&mut self, code: KeyCode) -> DashboardAction {
        match code {
            KeyCode::Enter => {
                self.mode = Mode::Normal;
                DashboardAction::Continue
            }
            KeyCode::Esc => {
                self.mode = Mode::Normal;
                self.query.search.clear();
                self.selected = 0;
                DashboardAction::Reload
            }
            KeyCode::Backspace => {
                self.query.search.pop();
                self.selected = 0;
                DashboardAction::Reload
            }
            KeyCode::Char(c) => {
                self.query.search.push(c);
                self.selected = 0;
                DashboardAction::Reload
            }
            _ => DashboardAction::Continue,
        }
    }

    pub fn draw_frame(&mut self, frame: &mut Frame) {
        let area = frame.area();
        let cat_lines = self.categories.len().min(MAX_CATEGORY_LINES);
        let cat_height = if cat_lines == 0 { 0 } else { cat_lines as u16 + 1 };

        let areas = Layout::vertical([
            Constraint::Length(1),          // title
            Constraint::Length(2),          // summary + goal
            Constraint::Fill(1),            // table
            Constraint::Length(cat_height), // categories
            Constraint::Length(1),          // overdue / debt
            Constraint::Length(1),          // status
            Constraint::Length(1),          // keys
        ])
        .split(area);

        frame.render_widget(Paragraph::new(self.title()).style(HEADER_STYLE), areas[0]);
        frame.render_widget(Paragraph::new(self.summary_lines()), areas[1]);
        self.draw_table(frame, areas[2]);

        if cat_height > 0 {
            let mut lines = vec![Line::from(Span::styled("Expenses by category", HEADER_STYLE))];
            for c in self.categories.iter().take(MAX_CATEGORY_LINES) {
                lines.push(Line::from(vec![
                    Span::raw("  "),
                    tui::category_span(c.category),
                    Span::raw(format!(
                        "  {}  ({:.0}%)",
                        fmt::amount(c.total, self.privacy),
                        c.pct
                    )),
                ]));
            }
            frame.render_widget(Paragraph::new(lines), areas[3]);
        }

        let alerts = format!(
            "Overdue: {} ({})  |  Installment debt: {}",
            self.overdue_count,
            fmt::amount(self.overdue_total, self.privacy),
            fmt::amount(self.installment_debt, self.privacy),
        );
        let alert_style = if self.overdue_count > 0 { OVERDUE_STYLE } else { FOOTER_STYLE };
        frame.render_widget(Paragraph::new(alerts).style(alert_style), areas[4]);

        let status = self
            .status_message
            .clone()
            .unwrap_or_else(|| self.row_count_text());
        frame.render_widget(Paragraph::new(status).style(FOOTER_STYLE), areas[5]);

        let keys = match self.mode {
            Mode::Normal => Paragraph::new(
                "\u{2190}/\u{2192}:month  \u{2191}/\u{2193}:select  space:paid/pending  x:delete  t:type  /:search  p:privacy  q:quit",
            )
            .style(FOOTER_STYLE),
            Mode::Search => Paragraph::new(format!("Search: {}\u{2588}", self.query.search)),
            Mode::ConfirmDelete => {
                Paragraph::new("Delete this record? y to confirm, any other key to cancel")
                    .style(OVERDUE_STYLE)
            }
        };
        frame.render_widget(keys, areas[6]);
    }

    /// The debt filter spans every month, so it is not counted against the
    /// month's records.
    fn row_count_text(&self) -> String {
        if self.query.filter == TypeFilter::Debt {
            format!("{} pending installments across all months", self.rows.len())
        } else {
            format!("{} of {} records shown", self.rows.len(), self.summary.count)
        }
    }

    fn title(&self) -> String {
        let mut title = format!("tally: {}", self.query.month.title());
        if self.query.filter != TypeFilter::All {
            title.push_str(&format!("  [{}]", self.query.filter));
        }
        if !self.query.search.is_empty() {
            title.push_str(&format!("  [search: {}]", self.query.search));
        }
        if self.privacy {
            title.push_str("  [private]");
        }
        title
    }

    fn summary_lines(&self) -> Vec<Line<'static>> {
        let s = &self.summary;
        let balance_style = if s.balance < 0.0 { tui::EXPENSE_STYLE } else { tui::INCOME_STYLE };
        let mut lines = vec![Line::from(vec![
            Span::raw("Income "),
            Span::styled(fmt::amount(s.income, self.privacy), tui::INCOME_STYLE),
            Span::raw("   Expense "),
            Span::styled(fmt::amount(s.expense, self.privacy), tui::EXPENSE_STYLE),
            Span::raw("   Balance "),
            Span::styled(fmt::amount(s.balance, self.privacy), balance_style),
        ])];
        let goal_line = match &self.goal {
            Some(g) => {
                let style = if g.exceeded { OVERDUE_STYLE } else { FOOTER_STYLE };
                Line::from(Span::styled(
                    format!(
                        "Goal {}: {:.0}% used, {} left",
                        fmt::amount(g.goal, self.privacy),
                        g.pct,
                        fmt::amount(g.remaining.max(0.0), self.privacy),
                    ),
                    style,
                ))
            }
            None => Line::from(Span::styled("No spending goal set", FOOTER_STYLE)),
        };
        lines.push(goal_line);
        lines
    }

    fn draw_table(&mut self, frame: &mut Frame, table_area: ratatui::layout::Rect) {
        // marker + date + installment + category + amount
        let fixed_cols: u16 = 2 + 10 + 6 + 14 + 18;
        let spacing: u16 = 5;
        let desc_width = table_area.width.saturating_sub(fixed_cols + spacing) as usize;
        let desc_width = desc_width.max(10);

        let rows: Vec<Row> = self
            .rows
            .iter()
            .map(|t| {
                let (wrapped, height) = tui::wrap_text(&t.description, desc_width);
                let (marker, style) = if !t.is_pending() {
                    ("\u{2713}", PAID_STYLE)
                } else if t.is_overdue(self.today) {
                    ("!", OVERDUE_STYLE)
                } else {
                    ("\u{2022}", Style::default())
                };
                Row::new(vec![
                    Cell::from(Span::styled(marker, style)),
                    Cell::from(fmt::date_br(t.date)),
                    Cell::from(wrapped),
                    Cell::from(fmt::installment_badge(t)),
                    Cell::from(tui::category_span(t.category)),
                    Cell::from(tui::amount_span(t, self.privacy)),
                ])
                .height(height)
            })
            .collect();

        let widths = [
            Constraint::Length(2),
            Constraint::Length(10),
            Constraint::Fill(1),
            Constraint::Length(6),
            Constraint::Length(14),
            Constraint::Length(18),
        ];

        if self.rows.is_empty() {
            self.table_state.select(None);
        } else {
            self.table_state.select(Some(self.selected));
        }
        let table = Table::new(rows, widths)
            .header(
                Row::new(vec!["", "Date", "Description", "Part", "Category", "Amount"])
                    .style(HEADER_STYLE)
                    .bottom_margin(1),
            )
            .column_spacing(1)
            .row_highlight_style(SELECTED_STYLE);

        frame.render_stateful_widget(table, table_area, &mut self.table_state);
    }
}
