//! Keyboard and paste input handling.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::app::App;

pub fn handle_input(app: &mut App, key: KeyEvent) {
    // Global quit
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    let columns = app.columns;
    match key.code {
        KeyCode::Enter => app.activate_selected(),
        KeyCode::Left => app.grid.move_selection(-1, 0, columns),
        KeyCode::Right => app.grid.move_selection(1, 0, columns),
        KeyCode::Up => app.grid.move_selection(0, -1, columns),
        KeyCode::Down => app.grid.move_selection(0, 1, columns),
        KeyCode::Esc => {
            if app.search.is_empty() {
                app.should_quit = true;
            } else {
                app.search.clear();
                app.apply_search();
            }
        }
        KeyCode::Char(c) => {
            app.search.push(c);
            app.apply_search();
        }
        KeyCode::Backspace => {
            if app.search.pop().is_some() {
                app.apply_search();
            }
        }
        _ => {}
    }
}

pub fn handle_paste(app: &mut App, text: &str) {
    // Search is a single line
    app.search.push_str(&text.replace(['\n', '\r'], " "));
    app.apply_search();
}
