use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::{event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind}, execute, terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen}};
use ratatui::{backend::CrosstermBackend, Terminal, widgets::{Block, Borders, List, ListItem, Paragraph, ListState}, layout::{Layout, Constraint, Direction}, style::{Style, Modifier, Color}};

use tokio::sync::oneshot::{self, error::TryRecvError};

use not_forget_todo::client::{api::{ClientError, HttpTodoApi, TodoApi, DEFAULT_API_URL}, board::{BoardItem, TodoBoard}};
use not_forget_todo::domain::todo::Todo;

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    let base_url = std::env::var("TODO_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
    let api = HttpTodoApi::new(&base_url)?;

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, TodoBoard::new(api), &base_url).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    res
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mode { View, Create, Edit }

struct App<A: TodoApi> {
    board: TodoBoard<A>,
    selected: usize,
    last_tick: Instant,
    mode: Mode,
    list_state: ListState,
    draft: String,
    // add request running on its own task so the loop keeps drawing
    pending_add: Option<oneshot::Receiver<Result<Todo, ClientError>>>,
}

impl<A: TodoApi + Clone + 'static> App<A> {
    fn start_add(&mut self) {
        let Some(text) = self.board.begin_add(&self.draft) else { return };
        let api = self.board.api().clone();
        let (tx, rx) = oneshot::channel();
        tokio::spawn(async move {
            let _ = tx.send(api.add_todo(&text).await);
        });
        self.pending_add = Some(rx);
    }

    fn poll_add(&mut self) {
        let Some(rx) = self.pending_add.as_mut() else { return };
        let result = match rx.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return,
            Err(TryRecvError::Closed) => Err(ClientError::Cancelled),
        };
        self.pending_add = None;
        let added = result.is_ok();
        self.board.finish_add(result);
        if added { self.selected = 0; }
        if self.mode == Mode::Create {
            self.mode = Mode::View;
            if added { self.draft.clear(); }
        }
        self.clamp_selection();
    }

    fn selected_item(&self) -> Option<&BoardItem> { self.board.items().get(self.selected) }

    fn clamp_selection(&mut self) {
        let len = self.board.items().len();
        if len == 0 { self.selected = 0; self.list_state.select(None); }
        else { if self.selected >= len { self.selected = len - 1; } self.list_state.select(Some(self.selected)); }
    }
}

// "#fff9c4" -> Rgb(0xff, 0xf9, 0xc4)
fn note_color(hex: &str) -> Color {
    let hex = hex.trim_start_matches('#');
    let channel = |i: usize| hex.get(i..i + 2).and_then(|c| u8::from_str_radix(c, 16).ok());
    match (channel(0), channel(2), channel(4)) {
        (Some(r), Some(g), Some(b)) => Color::Rgb(r, g, b),
        _ => Color::Reset,
    }
}

fn tilt(rotation: i32) -> &'static str {
    match rotation { r if r < 0 => "\\", 0 => "|", _ => "/" }
}

async fn run_app<A: TodoApi + Clone + 'static>(terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>, board: TodoBoard<A>, base_url: &str) -> Result<()> {
    let tick_rate = Duration::from_millis(200);
    let mut app = App { board, selected: 0, last_tick: Instant::now(), mode: Mode::View, list_state: ListState::default(), draft: String::new(), pending_add: None };
    app.board.load().await;
    app.clamp_selection();

    loop {
        app.poll_add();
        terminal.draw(|f| {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(3),
                    Constraint::Length(3),
                    Constraint::Min(1),
                    Constraint::Length(3),
                ])
                .split(f.size());

            let progress = app.board.progress();
            let header = Paragraph::new(format!("Today, not someday.  Completed: {} / {}  ({}%)", progress.completed, progress.total, progress.percent))
                .block(Block::default().borders(Borders::ALL).title("not-forget-todo"));
            f.render_widget(header, chunks[0]);

            let input_text = match (app.mode, app.board.input_error()) {
                _ if app.board.is_adding() => format!("{}  (adding...)", app.draft),
                (Mode::Create, _) => format!("{}_", app.draft),
                (_, Some(err)) => format!("! {err}"),
                _ => "press n to write a to-do".to_string(),
            };
            let input = Paragraph::new(input_text)
                .block(Block::default().borders(Borders::ALL).title("Add a to-do"));
            f.render_widget(input, chunks[1]);

            let middle = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
                .split(chunks[2]);

            let list_items: Vec<ListItem> = app.board.items().iter().map(|item| {
                let mark = if item.todo.completed { "[x]" } else { "[ ]" };
                let style = Style::default().fg(Color::Black).bg(note_color(item.note.color));
                let style = if item.todo.completed { style.add_modifier(Modifier::CROSSED_OUT) } else { style };
                ListItem::new(format!("{} {} {}", tilt(item.note.rotation), mark, item.todo.text)).style(style)
            }).collect();
            let board_title = match app.board.list_error() {
                Some(err) => format!("My To-Do Board  ! {err} (x to dismiss)"),
                None => "My To-Do Board".to_string(),
            };
            let list = List::new(list_items)
                .block(Block::default().borders(Borders::ALL).title(board_title))
                .highlight_style(Style::default().add_modifier(Modifier::BOLD | Modifier::REVERSED))
                .highlight_symbol(">> ");
            f.render_stateful_widget(list, middle[0], &mut app.list_state);

            let detail = match app.selected_item() {
                Some(item) if app.mode == Mode::Edit => format!("Id: {}\n\nText:\n{}_", item.todo.id, app.draft),
                Some(item) => format!(
                    "Id: {}\n\nText:\n{}\n\nStatus: {}\n\nDue: {}",
                    item.todo.id,
                    item.todo.text,
                    if item.todo.completed { "Done" } else { "Pending" },
                    item.todo.due_date.as_deref().unwrap_or("-"),
                ),
                None => "Let's write down just one small task to finish today!".to_string(),
            };
            let details = Paragraph::new(detail)
                .block(Block::default().borders(Borders::ALL).title("details"));
            f.render_widget(details, middle[1]);

            let footer_text = match app.mode {
                Mode::View => format!("{base_url}  |  Enter: toggle  n: new  e: edit  d: delete  x: dismiss  q: quit"),
                Mode::Create | Mode::Edit => "Enter to save, Esc to cancel".to_string(),
            };
            let footer = Paragraph::new(footer_text)
                .block(Block::default().borders(Borders::ALL).title(match app.mode { Mode::View => "info", Mode::Create => "create", Mode::Edit => "edit" }));
            f.render_widget(footer, chunks[3]);
        })?;

        let timeout = tick_rate.saturating_sub(app.last_tick.elapsed());
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                // Only act on key presses; ignore repeats and releases to prevent duplicate input
                if key.kind != KeyEventKind::Press { continue; }
                match app.mode {
                    Mode::View => match key.code {
                        KeyCode::Char('q') => break,
                        KeyCode::Up => { if app.selected > 0 { app.selected -= 1; } }
                        KeyCode::Down => { if app.selected + 1 < app.board.items().len() { app.selected += 1; } }
                        KeyCode::Enter => {
                            if let Some(id) = app.selected_item().map(|item| item.todo.id.clone()) {
                                app.board.toggle(&id).await;
                            }
                        }
                        KeyCode::Char('n') => { app.mode = Mode::Create; app.draft.clear(); }
                        KeyCode::Char('e') => {
                            // completed notes must be reopened before editing
                            let draft = app.selected_item().filter(|item| !item.todo.completed).map(|item| item.todo.text.clone());
                            if let Some(draft) = draft {
                                app.draft = draft;
                                app.mode = Mode::Edit;
                            }
                        }
                        KeyCode::Char('d') => {
                            if let Some(id) = app.selected_item().map(|item| item.todo.id.clone()) {
                                app.board.delete(&id).await;
                            }
                        }
                        KeyCode::Char('x') => app.board.dismiss_list_error(),
                        _ => {}
                    },
                    Mode::Create => match key.code {
                        KeyCode::Esc => { app.mode = Mode::View; app.draft.clear(); }
                        // stays in create mode until the server answers
                        KeyCode::Enter => app.start_add(),
                        KeyCode::Backspace => { app.draft.pop(); }
                        KeyCode::Char(c) => app.draft.push(c),
                        _ => {}
                    },
                    Mode::Edit => match key.code {
                        KeyCode::Esc => { app.mode = Mode::View; app.draft.clear(); }
                        KeyCode::Enter => {
                            if let Some(id) = app.selected_item().map(|item| item.todo.id.clone()) {
                                app.board.rename(&id, &app.draft).await;
                            }
                            app.mode = Mode::View;
                            app.draft.clear();
                        }
                        KeyCode::Backspace => { app.draft.pop(); }
                        KeyCode::Char(c) => app.draft.push(c),
                        _ => {}
                    },
                }
                app.clamp_selection();
            }
        }
        if app.last_tick.elapsed() >= tick_rate {
            app.last_tick = Instant::now();
        }
    }
    Ok(())
}
