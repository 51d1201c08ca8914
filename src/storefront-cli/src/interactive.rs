//! Interactive search screen.
//!
//! A full-screen search box backed by [`SearchWidget`]. Keys and mouse
//! clicks are translated to [`WidgetEvent`]s, the widget runs on its own
//! task, and each published [`WidgetView`] is redrawn.

use std::io::stdout;
use std::sync::Arc;

use anyhow::Result;
use crossterm::event::{
    Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use futures::StreamExt;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Widget};
use storefront_search::{
    CandidateProvider, InputEdit, Key, PointerTarget, SEARCH_EVENT, SearchIntent, SearchWidget,
    SuggestConfig, WidgetEvent, WidgetView,
};
use tokio::sync::{broadcast, mpsc, watch};
use tracing::{debug, warn};
use unicode_width::UnicodeWidthStr;

const BUTTON_LABEL: &str = " Search ";
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// What a terminal event means for the screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Forward to the widget.
    Widget(WidgetEvent),
    /// Leave the screen.
    Quit,
}

/// Map a key press to an action.
pub fn map_key(key: KeyEvent) -> Option<Action> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let event = match key.code {
        KeyCode::Char('c') if ctrl => return Some(Action::Quit),
        KeyCode::Char('u') if ctrl => WidgetEvent::Edit(InputEdit::Clear),
        KeyCode::Char(_) if ctrl => return None,
        KeyCode::Char(c) => WidgetEvent::Edit(InputEdit::Insert(c)),
        KeyCode::Backspace => WidgetEvent::Edit(InputEdit::Backspace),
        KeyCode::Enter => WidgetEvent::Key(Key::Enter),
        KeyCode::Esc => WidgetEvent::Key(Key::Escape),
        KeyCode::Up => WidgetEvent::Key(Key::Up),
        KeyCode::Down => WidgetEvent::Key(Key::Down),
        KeyCode::Tab => WidgetEvent::Key(Key::Tab),
        _ => return None,
    };
    Some(Action::Widget(event))
}

/// Map a mouse event to a widget event. Only left clicks count.
pub fn map_mouse(mouse: MouseEvent, layout: &ScreenLayout, entries: usize) -> Option<WidgetEvent> {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => Some(WidgetEvent::Pointer(
            layout.hit_test(mouse.column, mouse.row, entries),
        )),
        _ => None,
    }
}

/// Screen regions for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenLayout {
    pub input: Rect,
    pub button: Rect,
    pub list: Rect,
    pub status: Rect,
}

impl ScreenLayout {
    /// Lay out `area` for a list of `entries` rows.
    pub fn compute(area: Rect, entries: usize) -> Self {
        let list_height = u16::try_from(entries).unwrap_or(u16::MAX);
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),           // Title
                Constraint::Length(3),           // Input and button
                Constraint::Length(list_height), // Suggestions
                Constraint::Min(0),              // Flex
                Constraint::Length(1),           // Status
            ])
            .split(area);

        let button_width = u16::try_from(BUTTON_LABEL.width()).unwrap_or(8) + 2;
        let search_row = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(10), Constraint::Length(button_width)])
            .split(rows[1]);

        let input = search_row[0];
        Self {
            input,
            button: search_row[1],
            list: Rect::new(
                input.x + 1,
                rows[2].y,
                input.width.saturating_sub(2),
                rows[2].height,
            ),
            status: rows[4],
        }
    }

    /// Resolve a click position to a pointer target.
    pub fn hit_test(&self, column: u16, row: u16, entries: usize) -> PointerTarget {
        let pos = Position::new(column, row);
        if self.button.contains(pos) {
            return PointerTarget::SearchButton;
        }
        if self.list.contains(pos) {
            let index = usize::from(row - self.list.y);
            if index < entries {
                return PointerTarget::Suggestion(index);
            }
            return PointerTarget::SearchBox;
        }
        if self.input.contains(pos) {
            return PointerTarget::SearchBox;
        }
        PointerTarget::Outside
    }
}

/// Renders one [`WidgetView`] plus the status line.
pub struct SearchScreen<'a> {
    view: &'a WidgetView,
    status: &'a str,
}

impl<'a> SearchScreen<'a> {
    pub fn new(view: &'a WidgetView, status: &'a str) -> Self {
        Self { view, status }
    }

    /// Cursor position at the end of the input text.
    pub fn cursor(&self, layout: &ScreenLayout) -> Position {
        let text_width = u16::try_from(self.view.value.width()).unwrap_or(u16::MAX);
        let max_x = layout.input.right().saturating_sub(2);
        Position::new(
            (layout.input.x + 1).saturating_add(text_width).min(max_x),
            layout.input.y + 1,
        )
    }
}

impl Widget for &SearchScreen<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);
        let layout = ScreenLayout::compute(area, self.view.entries.len());

        let title = Line::from(vec![
            Span::styled("Storefront", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled("  Ctrl+C to quit", Style::default().fg(Color::DarkGray)),
        ]);
        Paragraph::new(title).render(Rect::new(area.x, area.y, area.width, 1), buf);

        let border = if self.view.focused {
            Color::Cyan
        } else {
            Color::DarkGray
        };
        Paragraph::new(self.view.value.as_str())
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(border)),
            )
            .render(layout.input, buf);

        Paragraph::new(BUTTON_LABEL)
            .block(Block::default().borders(Borders::ALL))
            .render(layout.button, buf);

        let lines: Vec<Line> = self
            .view
            .entries
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                let style = if self.view.highlighted == Some(i) {
                    Style::default().add_modifier(Modifier::REVERSED)
                } else {
                    Style::default()
                };
                Line::from(Span::styled(entry.value().to_string(), style))
            })
            .collect();
        Paragraph::new(lines).render(layout.list, buf);

        Paragraph::new(self.status)
            .style(Style::default().fg(Color::DarkGray))
            .render(layout.status, buf);
    }
}

/// Status line text for a submitted search.
pub fn describe_intent(intent: &SearchIntent) -> String {
    let payload = serde_json::to_string(intent).unwrap_or_else(|_| intent.query.clone());
    format!("{SEARCH_EVENT} {payload}")
}

/// Run the interactive screen until the user quits.
pub async fn run(provider: Arc<dyn CandidateProvider>, config: SuggestConfig) -> Result<()> {
    with_restore(
        setup_terminal,
        move |mut terminal| async move { run_loop(&mut terminal, provider, config).await },
        restore_terminal,
    )
    .await
}

/// Run `body` on whatever `setup` yields, then `restore`.
///
/// `restore` runs even when `setup` fails part way, so a terminal left in
/// raw mode is always put back. An error from `setup` or `body` wins over
/// one from `restore`.
pub async fn with_restore<T, F, Fut>(
    setup: impl FnOnce() -> Result<T>,
    body: F,
    restore: impl FnOnce() -> Result<()>,
) -> Result<()>
where
    F: FnOnce(T) -> Fut,
    Fut: Future<Output = Result<()>>,
{
    let result = match setup() {
        Ok(value) => body(value).await,
        Err(e) => Err(e),
    };
    let restored = restore();
    result?;
    restored
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<std::io::Stdout>>> {
    crossterm::terminal::enable_raw_mode()?;
    let mut stdout = stdout();
    crossterm::execute!(
        stdout,
        crossterm::terminal::EnterAlternateScreen,
        crossterm::event::EnableMouseCapture,
        crossterm::event::EnableBracketedPaste,
    )?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;
    Ok(terminal)
}

fn restore_terminal() -> Result<()> {
    crossterm::terminal::disable_raw_mode()?;
    crossterm::execute!(
        stdout(),
        crossterm::terminal::LeaveAlternateScreen,
        crossterm::event::DisableMouseCapture,
        crossterm::event::DisableBracketedPaste,
        crossterm::cursor::Show,
    )?;
    Ok(())
}

async fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    provider: Arc<dyn CandidateProvider>,
    config: SuggestConfig,
) -> Result<()> {
    let widget = SearchWidget::new(provider, config);
    let mut intents = widget.subscribe();

    let (events_tx, events_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
    let (views_tx, mut views_rx) = watch::channel(widget.view());
    let widget_task = tokio::spawn(widget.run(events_rx, views_tx));

    let mut terminal_events = EventStream::new();
    let mut status = String::from("Type to search");
    let mut layout = ScreenLayout::compute(Rect::default(), 0);

    loop {
        {
            let view = views_rx.borrow_and_update().clone();
            terminal.draw(|f| {
                let area = f.area();
                let screen = SearchScreen::new(&view, &status);
                layout = ScreenLayout::compute(area, view.entries.len());
                f.render_widget(&screen, area);
                f.set_cursor_position(screen.cursor(&layout));
            })?;
        }

        tokio::select! {
            event = terminal_events.next() => {
                let Some(event) = event else {
                    break;
                };
                let event = match event? {
                    Event::Key(key) => match map_key(key) {
                        Some(Action::Quit) => break,
                        Some(Action::Widget(event)) => Some(event),
                        None => None,
                    },
                    Event::Mouse(mouse) => {
                        let entries = views_rx.borrow().entries.len();
                        map_mouse(mouse, &layout, entries)
                    }
                    Event::Paste(text) => Some(WidgetEvent::Edit(InputEdit::InsertStr(text))),
                    _ => None,
                };
                if let Some(event) = event
                    && events_tx.send(event).await.is_err()
                {
                    warn!("search widget stopped unexpectedly");
                    break;
                }
            }
            changed = views_rx.changed() => {
                if changed.is_err() {
                    break;
                }
            }
            intent = intents.recv() => match intent {
                Ok(intent) => {
                    debug!(query = %intent.query, "search intent received");
                    status = describe_intent(&intent);
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    debug!(skipped, "search intents lagged");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            },
        }
    }

    drop(events_tx);
    if let Err(e) = widget_task.await {
        warn!("search widget task failed: {e}");
    }
    Ok(())
}
