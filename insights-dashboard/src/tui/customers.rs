use insights_common::config::Config;
use insights_common::filter::{FilterBounds, Selection};
use insights_common::format::{money, thousands};
use insights_common::loader::Snapshot;
use insights_common::profile::{CustomerProfile, Section};
use insights_common::recommend::Recommendation;
use insights_common::tables::{CustomerSegment, OrderHistoryEntry};
use rand::Rng;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Row, Table, TableState, Wrap},
    Frame,
};
use tracing::debug;

use super::filters::{FilterEditor, FilterField};
use super::style::{notice, panel, segment_label, Tone};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Filters,
    Table,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrowserAction {
    ToggleFocus,
    Up,
    Down,
    Left,
    Right,
    ToggleSegment,
    ResetFilters,
    Select,
    ClearSelection,
    Shuffle,
}

/// Filterable customer table plus the detail of the selected customer.
pub struct CustomerBrowser<'a> {
    customers: &'a [CustomerSegment],
    editor: FilterEditor,
    visible: Vec<&'a CustomerSegment>,
    table: TableState,
    selection: Selection,
    profile: Option<CustomerProfile>,
    focus: Focus,
}

impl<'a> CustomerBrowser<'a> {
    pub fn new(customers: &'a [CustomerSegment], config: &Config) -> Self {
        let editor = FilterEditor::new(FilterBounds::observe(customers, config.spend_range()));
        let mut browser = Self {
            customers,
            editor,
            visible: Vec::new(),
            table: TableState::default(),
            selection: Selection::default(),
            profile: None,
            focus: Focus::Table,
        };
        browser.refilter();
        browser
    }

    pub fn visible(&self) -> &[&'a CustomerSegment] {
        &self.visible
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn profile(&self) -> Option<&CustomerProfile> {
        self.profile.as_ref()
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    /// Applies one interaction. Every interaction that leaves a customer selected re-reads the
    /// suggestions file, so the detail never shows a sample of a file that has since changed.
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        action: BrowserAction,
        snapshot: &Snapshot,
        config: &Config,
        rng: &mut R,
    ) {
        match (action, self.focus) {
            (BrowserAction::ToggleFocus, Focus::Filters) => self.focus = Focus::Table,
            (BrowserAction::ToggleFocus, Focus::Table) => self.focus = Focus::Filters,

            (BrowserAction::Up, Focus::Filters) => self.editor.previous_field(),
            (BrowserAction::Down, Focus::Filters) => self.editor.next_field(),
            (BrowserAction::Left, Focus::Filters) => {
                if self.editor.adjust(-1) {
                    self.refilter();
                }
            }
            (BrowserAction::Right, Focus::Filters) => {
                if self.editor.adjust(1) {
                    self.refilter();
                }
            }
            (BrowserAction::ToggleSegment, Focus::Filters) => {
                if self.editor.toggle_segment() {
                    self.refilter();
                }
            }
            (BrowserAction::ResetFilters, _) => {
                if self.editor.reset() {
                    self.refilter();
                }
            }

            (BrowserAction::Up, Focus::Table) => self.table.select_previous(),
            (BrowserAction::Down, Focus::Table) => {
                let last = self.visible.len().saturating_sub(1);
                if self.table.selected().is_some_and(|index| index < last) {
                    self.table.select_next();
                }
            }
            (BrowserAction::Select, Focus::Table) => {
                if self.select_highlighted(snapshot, config, rng) {
                    return;
                }
            }
            (BrowserAction::ClearSelection, _) => {
                if self.selection.clear() {
                    self.profile = None;
                }
            }
            // Shuffling is the refresh below with nothing else changed.
            (BrowserAction::Shuffle, _) => {}
            _ => {}
        }
        self.refresh_suggestions(snapshot, config, rng);
    }

    /// Redraws the suggestion sample of the open profile from the file on disk.
    pub fn refresh_suggestions<R: Rng + ?Sized>(
        &mut self,
        snapshot: &Snapshot,
        config: &Config,
        rng: &mut R,
    ) {
        if let Some(profile) = self.profile.as_mut() {
            profile.reshuffle(snapshot, config, rng);
        }
    }

    /// Builds the profile of the highlighted customer. Returns whether a new profile was built.
    fn select_highlighted<R: Rng + ?Sized>(
        &mut self,
        snapshot: &Snapshot,
        config: &Config,
        rng: &mut R,
    ) -> bool {
        let Some(customer) = self
            .table
            .selected()
            .and_then(|index| self.visible.get(index).copied())
        else {
            return false;
        };
        if !self.selection.select(&customer.customer_unique_id) {
            return false;
        }
        debug!(customer = %customer.customer_unique_id, "customer selected");
        self.profile = Some(CustomerProfile::build(snapshot, customer, config, rng));
        true
    }

    fn refilter(&mut self) {
        self.visible = self.editor.filter().apply(self.customers);
        debug!(visible = self.visible.len(), "customer filter applied");

        if self.selection.retain_visible(&self.visible) {
            self.profile = None;
        }
        let cursor = self
            .selection
            .current()
            .and_then(|id| self.visible.iter().position(|c| c.customer_unique_id == id));
        let cursor = match cursor {
            Some(index) => Some(index),
            None if self.visible.is_empty() => None,
            None => Some(0),
        };
        self.table.select(cursor);
    }

    pub fn draw(&mut self, frame: &mut Frame, area: Rect) {
        let detail_height = if self.profile.is_some() {
            Constraint::Percentage(60)
        } else {
            Constraint::Length(0)
        };
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(7),
                Constraint::Length(1),
                Constraint::Fill(1),
                detail_height,
            ])
            .split(area);

        self.draw_filters(frame, rows[0]);

        let banner = Line::from(vec![
            Span::raw("Found "),
            Span::raw(thousands(self.visible.len())).bold(),
            Span::raw(" clients. Enter shows details, Backspace clears, f switches focus."),
        ]);
        frame.render_widget(Paragraph::new(banner).style(Style::new().fg(Color::Cyan)), rows[1]);

        self.draw_table(frame, rows[2]);
        if let Some(profile) = &self.profile {
            draw_profile(frame, rows[3], profile);
        }
    }

    fn draw_filters(&self, frame: &mut Frame, area: Rect) {
        let focused = self.focus == Focus::Filters;
        let field_style = |field: FilterField| {
            if focused && self.editor.field() == field {
                Style::new().bold().fg(Color::Black).bg(Color::Cyan)
            } else {
                Style::new()
            }
        };

        let bounds = self.editor.bounds();
        let filter = self.editor.filter();

        let mut segments = vec![Span::styled("Segment: ", field_style(FilterField::Segments))];
        for (index, segment) in bounds.segments.iter().enumerate() {
            let mark = if filter.segments.contains(segment) { "[x]" } else { "[ ]" };
            let mut style = Style::new();
            if focused
                && self.editor.field() == FilterField::Segments
                && self.editor.segment_cursor() == index
            {
                style = style.underlined().bold();
            }
            segments.push(Span::styled(
                format!("{mark} {}", segment_label(segment.as_deref())),
                style,
            ));
            segments.push(Span::raw("  "));
        }

        let lines = vec![
            Line::from(segments),
            Line::from(vec![
                Span::raw("Number of orders: "),
                Span::styled(
                    filter.orders.start().to_string(),
                    field_style(FilterField::OrdersMin),
                ),
                Span::raw(" - "),
                Span::styled(
                    filter.orders.end().to_string(),
                    field_style(FilterField::OrdersMax),
                ),
                Span::raw(format!(
                    "   (observed {} - {})",
                    bounds.orders.start(),
                    bounds.orders.end()
                ))
                .dark_gray(),
            ]),
            Line::from(vec![
                Span::raw("Total Spend (BRL): "),
                Span::styled(
                    format!("{:.0}", filter.spend.start()),
                    field_style(FilterField::SpendMin),
                ),
                Span::raw(" - "),
                Span::styled(
                    format!("{:.0}", filter.spend.end()),
                    field_style(FilterField::SpendMax),
                ),
                Span::raw(format!(
                    "   (range {:.0} - {:.0})",
                    bounds.spend.start(),
                    bounds.spend.end()
                ))
                .dark_gray(),
            ]),
            Line::from(
                "Up/Down field, Left/Right adjust, Space toggles segment, r resets".dark_gray(),
            ),
        ];

        let paragraph = Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .block(panel("Filtering", focused));
        frame.render_widget(paragraph, area);
    }

    fn draw_table(&mut self, frame: &mut Frame, area: Rect) {
        let selected = self.selection.current();
        let rows = self.visible.iter().map(|customer| {
            let row = Row::new(vec![
                customer.customer_unique_id.clone(),
                segment_label(customer.customer_segment.as_deref()).to_string(),
                customer.n_orders.to_string(),
                format!("{:.2}", customer.total_spend),
                customer.recency_days.to_string(),
            ]);
            if selected == Some(customer.customer_unique_id.as_str()) {
                row.style(Style::new().fg(Color::Green))
            } else {
                row
            }
        });

        let widths = [
            Constraint::Fill(3),
            Constraint::Fill(2),
            Constraint::Fill(1),
            Constraint::Fill(1),
            Constraint::Fill(1),
        ];
        let table = Table::new(rows, widths)
            .column_spacing(1)
            .header(
                Row::new(vec![
                    "customer_unique_id",
                    "customer_segment",
                    "n_orders",
                    "total_spend",
                    "recency_days",
                ])
                .style(Style::new().bold().bg(Color::LightBlue)),
            )
            .block(panel("Clients", self.focus == Focus::Table))
            .row_highlight_style(Style::new().bold().bg(Color::DarkGray))
            .highlight_symbol(">");

        frame.render_stateful_widget(table, area, &mut self.table);
    }
}

fn draw_profile(frame: &mut Frame, area: Rect, profile: &CustomerProfile) {
    let block = Block::default()
        .title(format!("Client Profile: {}", profile.short_id))
        .title_style(Style::new().bold().fg(Color::White).bg(Color::DarkGray))
        .borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Fill(1),
            Constraint::Length(1),
            Constraint::Fill(1),
        ])
        .split(inner);

    let customer = &profile.customer;
    let segment = segment_label(customer.customer_segment.as_deref());
    let metrics = Line::from(vec![
        Span::raw("Segment: "),
        Span::raw(segment.to_string()).bold(),
        Span::raw("   Total Spend: "),
        Span::raw(money(customer.total_spend)).bold(),
        Span::raw("   Order Count: "),
        Span::raw(customer.n_orders.to_string()).bold(),
        Span::raw("   Last Purchase: "),
        Span::raw(format!("{} days ago", customer.recency_days)).bold(),
    ]);
    frame.render_widget(Paragraph::new(metrics), rows[0]);

    draw_history(frame, rows[1], &profile.history);

    let interests = match &profile.interests {
        Section::Ready(names) => Paragraph::new(Line::from(vec![
            Span::raw("Main Interests: ").bold(),
            Span::raw(names.join(", ")),
        ]))
        .style(Style::new().fg(Color::Green)),
        Section::Empty => notice(
            &format!("No affinity categories for segment {segment}."),
            Tone::Info,
        ),
        Section::Unavailable(missing) => {
            notice(&format!("Category names unavailable ({missing})."), Tone::Info)
        }
        Section::Unreadable(unreadable) => {
            notice(&format!("Category names unavailable ({unreadable})."), Tone::Info)
        }
    };
    frame.render_widget(interests, rows[2]);

    draw_suggestions(frame, rows[3], &profile.suggestions, segment);
}

fn draw_history(frame: &mut Frame, area: Rect, history: &Section<Vec<OrderHistoryEntry>>) {
    match history {
        Section::Ready(entries) => {
            let rows = entries.iter().map(|entry| {
                Row::new(vec![
                    entry.order_purchase_timestamp.clone(),
                    entry.product_category_name.clone().unwrap_or_default(),
                    money(entry.price),
                ])
            });
            let table = Table::new(
                rows,
                [Constraint::Fill(2), Constraint::Fill(2), Constraint::Fill(1)],
            )
            .header(Row::new(vec!["Date", "Category", "Price"]).style(Style::new().bold()))
            .block(panel("Order History", false));
            frame.render_widget(table, area);
        }
        Section::Empty => {
            let paragraph = notice("No historical data for this ID.", Tone::Warning);
            frame.render_widget(paragraph.block(panel("Order History", false)), area);
        }
        Section::Unavailable(_) => {
            let paragraph = notice("History file missing.", Tone::Error);
            frame.render_widget(paragraph.block(panel("Order History", false)), area);
        }
        Section::Unreadable(unreadable) => {
            let paragraph = notice(
                &format!("History file unreadable: {}", unreadable.reason),
                Tone::Error,
            );
            frame.render_widget(paragraph.block(panel("Order History", false)), area);
        }
    }
}

fn draw_suggestions(
    frame: &mut Frame,
    area: Rect,
    suggestions: &Section<Vec<Recommendation>>,
    segment: &str,
) {
    let title = format!("Suggested Products for segment {segment} (s to shuffle)");
    match suggestions {
        Section::Ready(drawn) => {
            let rows = drawn.iter().map(|r| {
                Row::new(vec![
                    r.display_name.clone(),
                    r.product_id.clone(),
                    score_bar(r.match_score, 10),
                ])
            });
            let table = Table::new(
                rows,
                [Constraint::Fill(2), Constraint::Fill(2), Constraint::Fill(1)],
            )
            .header(
                Row::new(vec!["Category / Product", "Product ID", "Purchase Probability"])
                    .style(Style::new().bold()),
            )
            .block(panel(&title, false));
            frame.render_widget(table, area);
        }
        Section::Empty => {
            let paragraph = notice("No specific products for this segment.", Tone::Warning);
            frame.render_widget(paragraph.block(panel(&title, false)), area);
        }
        Section::Unavailable(missing) => {
            let paragraph = notice(
                &format!("Missing file: {}", missing.0.file_name()),
                Tone::Warning,
            );
            frame.render_widget(paragraph.block(panel(&title, false)), area);
        }
        Section::Unreadable(unreadable) => {
            let paragraph = notice(
                &format!(
                    "Unreadable file: {} ({})",
                    unreadable.table.file_name(),
                    unreadable.reason
                ),
                Tone::Error,
            );
            frame.render_widget(paragraph.block(panel(&title, false)), area);
        }
    }
}

/// Text progress bar for a score in `[0, 100]`, e.g. `"#######--- 72.5%"`.
pub(crate) fn score_bar(score: f64, width: usize) -> String {
    let filled = ((score.clamp(0.0, 100.0) / 100.0) * width as f64).round() as usize;
    format!(
        "{}{} {score:.1}%",
        "#".repeat(filled),
        "-".repeat(width - filled)
    )
}
