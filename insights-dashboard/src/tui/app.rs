use std::io::Stdout;
use std::ops::ControlFlow;

use anyhow::Error;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use insights_common::config::Config;
use insights_common::error::MissingTable;
use insights_common::loader::Snapshot;
use insights_common::metrics::DashboardMetrics;
use rand::rngs::StdRng;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    prelude::CrosstermBackend,
    style::{Color, Style, Stylize},
    text::Line,
    widgets::{Block, BorderType, Paragraph, Wrap},
    Frame, Terminal,
};
use tracing::debug;

use super::customers::{BrowserAction, CustomerBrowser};
use super::dashboard;
use super::style::{notice, Tone};
use crate::router::{Navigation, View};

/// The interactive surface. Every key press runs one synchronous update followed by a full
/// redraw, there is no background work.
pub struct DashboardTui<'a> {
    snapshot: &'a Snapshot,
    config: &'a Config,
    rng: StdRng,
    view: View,
    metrics: Result<DashboardMetrics, MissingTable>,
    browser: Result<CustomerBrowser<'a>, MissingTable>,
}

impl<'a> DashboardTui<'a> {
    pub fn new(snapshot: &'a Snapshot, config: &'a Config, view: View, rng: StdRng) -> Self {
        let browser = snapshot
            .customers()
            .map(|customers| CustomerBrowser::new(customers, config));
        Self {
            snapshot,
            config,
            rng,
            view,
            metrics: snapshot.customers().map(DashboardMetrics::compute),
            browser,
        }
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn browser(&self) -> Option<&CustomerBrowser<'a>> {
        self.browser.as_ref().ok()
    }

    fn refresh_metrics(&mut self) {
        self.metrics = self.snapshot.customers().map(DashboardMetrics::compute);
    }

    fn navigate(&mut self, navigation: Navigation) {
        let next = self.view.navigate(navigation);
        if next != self.view {
            debug!(from = ?self.view, to = ?next, "switching view");
            self.view = next;
        }
        match next {
            View::Dashboard => self.refresh_metrics(),
            View::Customers => self.refresh_detail(),
        }
    }

    fn refresh_detail(&mut self) {
        if let Ok(browser) = &mut self.browser {
            browser.refresh_suggestions(self.snapshot, self.config, &mut self.rng);
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> ControlFlow<()> {
        if key.kind == KeyEventKind::Release {
            return ControlFlow::Continue(());
        }

        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => return ControlFlow::Break(()),
            KeyCode::Char('c') if key.modifiers == KeyModifiers::CONTROL => {
                return ControlFlow::Break(())
            }
            KeyCode::Char('1') => self.navigate(Navigation::ShowDashboard),
            KeyCode::Char('2') => self.navigate(Navigation::ShowCustomers),
            _ if self.view == View::Customers => match browser_action(key) {
                Some(action) => {
                    if let Ok(browser) = &mut self.browser {
                        browser.update(action, self.snapshot, self.config, &mut self.rng);
                    }
                }
                None => self.refresh_detail(),
            },
            _ => {}
        }
        ControlFlow::Continue(())
    }

    fn draw_outer(&self, frame: &mut Frame) -> Rect {
        let outer_block = Block::bordered()
            .title_top("Olist BI Dashboard - 1/2 to switch view, q to quit")
            .border_type(BorderType::Rounded)
            .title_alignment(Alignment::Center);

        let inner_area = outer_block.inner(frame.area());
        frame.render_widget(outer_block, frame.area());
        inner_area
    }

    fn draw_sidebar(&self, frame: &mut Frame, area: Rect) {
        let mut lines = vec![Line::from("Olist Analytics").bold(), Line::from("")];
        for view in View::ALL {
            let label = format!(" {} {} ", view.hotkey(), view.label());
            let line = if view == self.view {
                Line::from(label).bold().fg(Color::Black).bg(Color::Cyan)
            } else {
                Line::from(label)
            };
            lines.push(line);
        }

        if !self.snapshot.issues.is_empty() {
            lines.push(Line::from(""));
            lines.push(Line::from("Unreadable files:").fg(Color::Red));
            for issue in &self.snapshot.issues {
                let name = issue
                    .path()
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                lines.push(Line::from(name).fg(Color::Red));
            }
        }

        let sidebar = Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .block(Block::bordered().border_style(Style::new().fg(Color::DarkGray)));
        frame.render_widget(sidebar, area);
    }

    pub fn draw(&mut self, frame: &mut Frame) {
        let inner_area = self.draw_outer(frame);
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(22), Constraint::Fill(1)])
            .split(inner_area);

        self.draw_sidebar(frame, columns[0]);

        match self.view {
            View::Dashboard => match &self.metrics {
                Ok(metrics) => dashboard::draw(frame, columns[1], metrics),
                Err(missing) => render_missing_customers(frame, columns[1], missing),
            },
            View::Customers => match &mut self.browser {
                Ok(browser) => browser.draw(frame, columns[1]),
                Err(missing) => render_missing_customers(frame, columns[1], missing),
            },
        }
    }

    fn enter_draw_loop(
        &mut self,
        mut terminal: Terminal<CrosstermBackend<Stdout>>,
    ) -> Result<(), Error> {
        loop {
            terminal.draw(|frame| self.draw(frame))?;
            if let Event::Key(key) = event::read()? {
                if self.handle_key(key).is_break() {
                    return Ok(());
                }
            }
        }
    }
}

fn render_missing_customers(frame: &mut Frame, area: Rect, missing: &MissingTable) {
    let paragraph = notice(
        &format!("Missing customer data ({missing}). Generate the segment tables first."),
        Tone::Error,
    );
    frame.render_widget(paragraph, area);
}

fn browser_action(key: KeyEvent) -> Option<BrowserAction> {
    let action = match key.code {
        KeyCode::Char('f') | KeyCode::Tab => BrowserAction::ToggleFocus,
        KeyCode::Up => BrowserAction::Up,
        KeyCode::Down => BrowserAction::Down,
        KeyCode::Left => BrowserAction::Left,
        KeyCode::Right => BrowserAction::Right,
        KeyCode::Char(' ') => BrowserAction::ToggleSegment,
        KeyCode::Char('r') => BrowserAction::ResetFilters,
        KeyCode::Enter => BrowserAction::Select,
        KeyCode::Backspace | KeyCode::Delete => BrowserAction::ClearSelection,
        KeyCode::Char('s') => BrowserAction::Shuffle,
        _ => return None,
    };
    Some(action)
}

pub fn start_dashboard(
    snapshot: &Snapshot,
    config: &Config,
    view: View,
    rng: StdRng,
) -> Result<(), Error> {
    let terminal = ratatui::init();

    let mut app = DashboardTui::new(snapshot, config, view, rng);
    let res = app.enter_draw_loop(terminal);
    ratatui::restore();
    res
}
