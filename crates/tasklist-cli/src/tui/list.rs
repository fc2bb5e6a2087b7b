//! Full-screen task list view.
//!
//! All mutations go through [`TaskStore::apply`]; the view only keeps the
//! selection, the add-task input, and a transient status line.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::border,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Tabs},
};
use std::time::{Duration, Instant};
use tasklist_core::{Action, Filter, Task, TaskId, TaskStore};

use super::input::{InputAction, TaskInput};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InputMode {
    Normal,
    Adding,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StatusKind {
    Info,
    Error,
}

pub struct ListView {
    store: TaskStore,
    /// Selected row in the filtered view.
    list_state: ListState,
    input_mode: InputMode,
    input: TaskInput,
    status_msg: Option<(String, StatusKind, Instant)>,
    status_ttl: Duration,
    should_quit: bool,
}

impl ListView {
    pub fn new(store: TaskStore, status_ttl: Duration) -> Self {
        let mut view = Self {
            store,
            list_state: ListState::default(),
            input_mode: InputMode::Normal,
            input: TaskInput::default(),
            status_msg: None,
            status_ttl,
            should_quit: false,
        };
        view.clamp_selection();
        view
    }

    pub const fn should_quit(&self) -> bool {
        self.should_quit
    }

    #[cfg(test)]
    pub const fn store(&self) -> &TaskStore {
        &self.store
    }

    #[cfg(test)]
    pub fn status(&self) -> Option<&str> {
        self.status_msg.as_ref().map(|(msg, _, _)| msg.as_str())
    }

    /// Drop the status message once it has been shown long enough.
    pub fn tick(&mut self) {
        if let Some((_, _, at)) = self.status_msg
            && at.elapsed() >= self.status_ttl
        {
            self.status_msg = None;
        }
    }

    fn set_status(&mut self, msg: String, kind: StatusKind) {
        self.status_msg = Some((msg, kind, Instant::now()));
    }

    pub fn selected_task(&self) -> Option<&Task> {
        let idx = self.list_state.selected()?;
        self.store.filtered_view().get(idx).copied()
    }

    fn selected_id(&self) -> Option<TaskId> {
        self.selected_task().map(Task::id)
    }

    // -----------------------------------------------------------------------
    // Input handling
    // -----------------------------------------------------------------------

    pub fn handle_key(&mut self, key: KeyEvent) {
        match self.input_mode {
            InputMode::Normal => self.handle_normal_key(key),
            InputMode::Adding => self.handle_adding_key(key),
        }
    }

    fn handle_normal_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('c') if ctrl => self.should_quit = true,

            KeyCode::Char('j') | KeyCode::Down => self.select_next(),
            KeyCode::Char('k') | KeyCode::Up => self.select_prev(),
            KeyCode::Char('g') | KeyCode::Home => self.select_first(),
            KeyCode::Char('G') | KeyCode::End => self.select_last(),

            KeyCode::Char(' ' | 'x') | KeyCode::Enter => {
                if let Some(id) = self.selected_id() {
                    self.dispatch(Action::Toggle(id));
                }
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                if let Some(id) = self.selected_id() {
                    self.dispatch(Action::Delete(id));
                }
            }

            KeyCode::Char('a' | 'i') => self.input_mode = InputMode::Adding,

            KeyCode::Char('1') => {
                self.dispatch(Action::SetFilter(Filter::All));
            }
            KeyCode::Char('2') => {
                self.dispatch(Action::SetFilter(Filter::Pending));
            }
            KeyCode::Char('3') => {
                self.dispatch(Action::SetFilter(Filter::Completed));
            }
            KeyCode::Tab | KeyCode::Char('f') => {
                self.dispatch(Action::SetFilter(self.store.filter().next()));
            }
            KeyCode::BackTab => {
                self.dispatch(Action::SetFilter(self.store.filter().prev()));
            }

            _ => {}
        }
    }

    fn handle_adding_key(&mut self, key: KeyEvent) {
        match self.input.handle_key(key) {
            Some(InputAction::Submit(raw)) => {
                if self.dispatch(Action::Add(raw)) {
                    self.input.clear();
                    self.select_first();
                }
            }
            Some(InputAction::Cancel) => {
                self.input.clear();
                self.input_mode = InputMode::Normal;
            }
            None => {}
        }
    }

    /// Apply one action and report it in the status line. Returns whether
    /// the store accepted it.
    fn dispatch(&mut self, action: Action) -> bool {
        let accepted = match self.store.apply(action) {
            Ok(outcome) => {
                self.set_status(outcome.message(), StatusKind::Info);
                true
            }
            Err(err) => {
                self.set_status(err.to_string(), StatusKind::Error);
                false
            }
        };
        self.clamp_selection();
        accepted
    }

    // -----------------------------------------------------------------------
    // Selection
    // -----------------------------------------------------------------------

    fn visible_len(&self) -> usize {
        self.store.filtered_view().len()
    }

    fn clamp_selection(&mut self) {
        let len = self.visible_len();
        if len == 0 {
            self.list_state.select(None);
        } else {
            let idx = self.list_state.selected().unwrap_or(0).min(len - 1);
            self.list_state.select(Some(idx));
        }
    }

    fn select_next(&mut self) {
        let len = self.visible_len();
        if len == 0 {
            return;
        }
        let i = self
            .list_state
            .selected()
            .map_or(0, |i| if i + 1 >= len { 0 } else { i + 1 });
        self.list_state.select(Some(i));
    }

    fn select_prev(&mut self) {
        let len = self.visible_len();
        if len == 0 {
            return;
        }
        let i = self
            .list_state
            .selected()
            .map_or(0, |i| if i == 0 { len - 1 } else { i - 1 });
        self.list_state.select(Some(i));
    }

    fn select_first(&mut self) {
        if self.visible_len() > 0 {
            self.list_state.select(Some(0));
        }
    }

    fn select_last(&mut self) {
        let len = self.visible_len();
        if len > 0 {
            self.list_state.select(Some(len - 1));
        }
    }

    // -----------------------------------------------------------------------
    // Rendering
    // -----------------------------------------------------------------------

    pub fn render(&mut self, frame: &mut Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(1),
                Constraint::Min(3),
                Constraint::Length(1),
            ])
            .split(area);

        render_header(frame, chunks[0]);
        self.render_stats(frame, chunks[1]);
        self.render_input(frame, chunks[2]);
        self.render_tabs(frame, chunks[3]);
        self.render_list(frame, chunks[4]);
        frame.render_widget(Paragraph::new(self.status_line()), chunks[5]);
    }

    fn render_stats(&self, frame: &mut Frame<'_>, area: Rect) {
        let stats = self.store.stats();
        let cards = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Ratio(1, 3); 3])
            .split(area);

        let entries = [
            ("Total Tasks", stats.total, Color::Cyan),
            ("Pending", stats.pending, Color::Yellow),
            ("Completed", stats.completed, Color::Green),
        ];
        for ((label, value, color), card) in entries.into_iter().zip(cards.iter()) {
            let block = Block::default()
                .borders(Borders::ALL)
                .border_set(border::ROUNDED)
                .border_style(Style::default().fg(color))
                .title(format!(" {label} "));
            let body = Paragraph::new(Span::styled(
                value.to_string(),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ))
            .alignment(Alignment::Center)
            .block(block);
            frame.render_widget(body, *card);
        }
    }

    fn render_input(&self, frame: &mut Frame<'_>, area: Rect) {
        let adding = self.input_mode == InputMode::Adding;
        let title = match self.input.remaining_hint() {
            Some(hint) if adding => format!(" New Task · {hint} "),
            _ => " New Task ".to_string(),
        };
        let border_style = if adding {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        let body = if adding {
            Line::from(format!("{}_", self.input.text()))
        } else {
            Line::from(Span::styled(
                "Press a to add a task",
                Style::default().fg(Color::DarkGray),
            ))
        };

        let para = Paragraph::new(body).block(
            Block::default()
                .borders(Borders::ALL)
                .border_set(border::ROUNDED)
                .border_style(border_style)
                .title(title),
        );
        frame.render_widget(para, area);
    }

    fn render_tabs(&self, frame: &mut Frame<'_>, area: Rect) {
        let active = self.store.filter();
        let selected = Filter::ALL
            .iter()
            .position(|f| *f == active)
            .unwrap_or_default();
        let tabs = Tabs::new(Filter::ALL.iter().map(|f| f.label()))
            .select(selected)
            .style(Style::default().fg(Color::DarkGray))
            .highlight_style(
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD | Modifier::REVERSED),
            );
        frame.render_widget(tabs, area);
    }

    fn render_list(&mut self, frame: &mut Frame<'_>, area: Rect) {
        let filter = self.store.filter();
        let block = Block::default()
            .borders(Borders::ALL)
            .border_set(border::ROUNDED)
            .border_style(Style::default().fg(Color::Green))
            .title(format!(" {} ", filter.label()));

        let items: Vec<ListItem<'static>> = self
            .store
            .filtered_view()
            .into_iter()
            .map(task_row)
            .collect();

        if items.is_empty() {
            let (heading, hint) = filter.empty_message();
            let body = Paragraph::new(vec![
                Line::from(Span::styled(
                    heading,
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(hint, Style::default().fg(Color::DarkGray))),
            ])
            .alignment(Alignment::Center)
            .block(block);
            frame.render_widget(body, area);
            return;
        }

        let list = List::new(items)
            .block(block)
            .highlight_style(
                Style::default()
                    .bg(Color::DarkGray)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("► ");
        frame.render_stateful_widget(list, area, &mut self.list_state);
    }

    fn status_line(&self) -> Line<'static> {
        if let Some((msg, kind, _)) = &self.status_msg {
            let color = match kind {
                StatusKind::Info => Color::Green,
                StatusKind::Error => Color::Red,
            };
            return Line::from(Span::styled(msg.clone(), Style::default().fg(color)));
        }

        let hints: &[(&str, &str)] = match self.input_mode {
            InputMode::Adding => &[("Enter", "add"), ("Ctrl+U", "clear"), ("Esc", "done")],
            InputMode::Normal => &[
                ("a", "add"),
                ("Space", "toggle"),
                ("d", "delete"),
                ("1-3/Tab", "filter"),
                ("q", "quit"),
            ],
        };
        let mut spans = Vec::with_capacity(hints.len() * 2);
        for (key, label) in hints {
            spans.push(Span::styled(*key, Style::default().fg(Color::Yellow)));
            spans.push(Span::raw(format!(" {label}  ")));
        }
        Line::from(spans)
    }
}

fn render_header(frame: &mut Frame<'_>, area: Rect) {
    let header = Paragraph::new(vec![
        Line::from(Span::styled(
            "Task Manager",
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "Stay organized and get things done",
            Style::default().fg(Color::DarkGray),
        )),
    ])
    .alignment(Alignment::Center);
    frame.render_widget(header, area);
}

fn task_row(task: &Task) -> ListItem<'static> {
    let (box_str, title_style) = if task.completed() {
        (
            "[x] ",
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::CROSSED_OUT),
        )
    } else {
        ("[ ] ", Style::default().fg(Color::White))
    };
    ListItem::new(Line::from(vec![
        Span::styled(box_str, Style::default().fg(Color::Cyan)),
        Span::styled(task.title().to_string(), title_style),
    ]))
}
