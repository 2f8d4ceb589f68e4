//! Keyboard input dispatch: overlays → global keys → board keys.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use rankboard_core::ViewSelection;

use crate::app::{AppState, Overlay};

pub fn handle_key(app: &mut AppState, key: KeyEvent) {
    // Only handle key press events (Windows sends both Press and Release).
    if key.kind != KeyEventKind::Press {
        return;
    }

    // 1. Overlays consume input first.
    match app.overlay {
        Overlay::Search => {
            handle_search_overlay(app, key);
            return;
        }
        Overlay::Help => {
            if matches!(
                key.code,
                KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q') | KeyCode::Enter
            ) {
                app.overlay = Overlay::None;
            }
            return;
        }
        Overlay::ErrorHistory => {
            handle_error_overlay(app, key);
            return;
        }
        Overlay::None => {}
    }

    // 2. Global keys (available before data arrives).
    match key.code {
        KeyCode::Char('q') => {
            app.running = false;
            return;
        }
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.running = false;
            return;
        }
        KeyCode::Char('?') => {
            app.overlay = Overlay::Help;
            return;
        }
        KeyCode::Char('e') => {
            app.overlay = Overlay::ErrorHistory;
            app.error_scroll = 0;
            return;
        }
        KeyCode::Char('r') => {
            app.request_load();
            return;
        }
        _ => {}
    }

    // 3. Board keys: inert until a dataset has been reconciled.
    if !app.has_board() {
        return;
    }
    match key.code {
        KeyCode::Char('1') => app.set_view(ViewSelection::Signals),
        KeyCode::Char('2') => app.set_view(ViewSelection::Sepa),
        KeyCode::Char('3') => app.set_view(ViewSelection::Charts),
        KeyCode::Tab => {
            if key.modifiers.contains(KeyModifiers::SHIFT) {
                app.set_view(app.session.view.prev());
            } else {
                app.set_view(app.session.view.next());
            }
        }
        KeyCode::BackTab => app.set_view(app.session.view.prev()),
        KeyCode::Char(']') => app.cycle_universe(true),
        KeyCode::Char('[') => app.cycle_universe(false),
        KeyCode::Char('/') => app.overlay = Overlay::Search,
        KeyCode::Char('a') => app.cycle_action(),
        KeyCode::Char('l') | KeyCode::Right => app.cycle_focus(true),
        KeyCode::Char('h') | KeyCode::Left => app.cycle_focus(false),
        KeyCode::Char('j') | KeyCode::Down => app.scroll_down(),
        KeyCode::Char('k') | KeyCode::Up => app.scroll_up(),
        KeyCode::Home | KeyCode::Char('g') => app.scroll = 0,
        KeyCode::End | KeyCode::Char('G') => app.scroll = app.scroll_limit(),
        _ => {}
    }
}

/// Live ticker search: every keystroke re-reconciles.
fn handle_search_overlay(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.overlay = Overlay::None;
            app.clear_query();
        }
        KeyCode::Enter => {
            app.overlay = Overlay::None;
        }
        KeyCode::Backspace => app.pop_query_char(),
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.push_query_char(c)
        }
        _ => {}
    }
}

fn handle_error_overlay(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('e') => {
            app.overlay = Overlay::None;
        }
        KeyCode::Char('j') | KeyCode::Down => {
            if app.error_scroll + 1 < app.error_history.len() {
                app.error_scroll += 1;
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.error_scroll = app.error_scroll.saturating_sub(1);
        }
        _ => {}
    }
}
