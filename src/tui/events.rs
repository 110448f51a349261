use std::time::Duration;

use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};

/// User actions from keyboard and mouse events
#[derive(Debug, PartialEq)]
pub enum Action {
    Quit,
    /// Esc: close overlay, else clear query, else go back, else quit
    Back,
    ClearQuery,
    MoveUp,
    MoveDown,
    PageUp,
    PageDown,
    Open,
    CopyToClipboard,
    Retry,
    UpdateSearch(char),
    DeleteChar,
    Click { column: u16, row: u16 },
    Resize,
    None,
}

/// Poll for input events and convert to actions
pub fn poll_event(timeout: Duration) -> anyhow::Result<Action> {
    if !event::poll(timeout)? {
        return Ok(Action::None);
    }

    let action = match event::read()? {
        // Ignore key releases on platforms that report them
        Event::Key(key) if key.kind != KeyEventKind::Release => key_to_action(key),
        Event::Mouse(mouse) => mouse_to_action(mouse),
        Event::Resize(..) => Action::Resize,
        _ => Action::None,
    };
    Ok(action)
}

fn key_to_action(key: KeyEvent) -> Action {
    match (key.code, key.modifiers) {
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => Action::Quit,
        (KeyCode::Esc, _) => Action::Back,
        (KeyCode::Char('u'), KeyModifiers::CONTROL) => Action::ClearQuery,

        // Navigation (Emacs style)
        (KeyCode::Char('p'), KeyModifiers::CONTROL) => Action::MoveUp,
        (KeyCode::Char('n'), KeyModifiers::CONTROL) => Action::MoveDown,
        (KeyCode::Up, _) => Action::MoveUp,
        (KeyCode::Down, _) => Action::MoveDown,
        (KeyCode::PageUp, _) => Action::PageUp,
        (KeyCode::PageDown, _) => Action::PageDown,

        (KeyCode::Enter, _) => Action::Open,
        (KeyCode::Char('y'), KeyModifiers::CONTROL) => Action::CopyToClipboard,
        (KeyCode::Char('r'), KeyModifiers::CONTROL) => Action::Retry,

        // Search input
        (KeyCode::Char(c), KeyModifiers::NONE) | (KeyCode::Char(c), KeyModifiers::SHIFT) => {
            Action::UpdateSearch(c)
        }
        (KeyCode::Backspace, _) => Action::DeleteChar,

        _ => Action::None,
    }
}

fn mouse_to_action(mouse: MouseEvent) -> Action {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            Action::Click { column: mouse.column, row: mouse.row }
        }
        MouseEventKind::ScrollUp => Action::MoveUp,
        MouseEventKind::ScrollDown => Action::MoveDown,
        _ => Action::None,
    }
}
