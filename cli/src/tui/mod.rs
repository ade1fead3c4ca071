pub mod app;
pub mod ui;

use std::io::{self, Stdout};
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use taskdesk_core::{HttpGateway, ReqwestGateway};
use tracing::error;

use crate::tui::app::{App, InputMode, Pane};

const TICK: Duration = Duration::from_millis(100);

type Term = Terminal<CrosstermBackend<Stdout>>;

pub async fn run(gateway: ReqwestGateway) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(gateway);
    let res = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    if let Err(err) = &res {
        error!(error = %err, "tui exited with an error");
    }
    res
}

async fn run_app<G: HttpGateway + 'static>(terminal: &mut Term, app: &mut App<G>) -> Result<()> {
    loop {
        app.tick();
        terminal.draw(|f| ui::draw(f, app))?;

        // Fetches run on the runtime's other workers while this one waits for input.
        if !tokio::task::block_in_place(|| event::poll(TICK))? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match app.input_mode {
            InputMode::Normal => match (app.pane, key.code) {
                (_, KeyCode::Char('q')) => app.should_quit = true,
                (_, KeyCode::Down | KeyCode::Char('j')) => app.next(),
                (_, KeyCode::Up | KeyCode::Char('k')) => app.previous(),
                (_, KeyCode::Char('d') | KeyCode::Delete) => app.ask_delete(),
                (_, KeyCode::Char('g')) => app.show_global(),
                (_, KeyCode::Char('l')) => app.show_lists().await,
                (Pane::Tasks, KeyCode::Char(' ') | KeyCode::Char('s')) => app.cycle_status().await,
                (Pane::Tasks, KeyCode::Char('a')) => app.enter_add_mode(),
                (Pane::Tasks, KeyCode::Char('m')) => app.enter_modify_mode(),
                (Pane::Tasks, KeyCode::Char('f')) => app.enter_filter_mode(),
                (Pane::Tasks, KeyCode::Char('x')) => app.remove_from_list().await,
                (Pane::Tasks, KeyCode::Char('r')) => app.refresh(),
                (Pane::Lists, KeyCode::Enter) => app.open_selected_list(),
                (Pane::Lists, KeyCode::Char('n')) => app.enter_create_list_mode(),
                (Pane::Lists, KeyCode::Char('e')) => app.enter_rename_list_mode(),
                (Pane::Lists, KeyCode::Char('r')) => app.show_lists().await,
                (Pane::Lists, KeyCode::Esc) => app.pane = Pane::Tasks,
                _ => {}
            },
            InputMode::Confirm(target) => match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') => app.confirm_delete(target).await,
                _ => app.cancel_confirm(),
            },
            _ => match key.code {
                KeyCode::Enter => app.submit_command().await,
                KeyCode::Esc => app.exit_input_mode(),
                KeyCode::Char(c) => app.input_char(c),
                KeyCode::Backspace => app.delete_char(),
                KeyCode::Left => app.move_cursor_left(),
                KeyCode::Right => app.move_cursor_right(),
                _ => {}
            },
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
