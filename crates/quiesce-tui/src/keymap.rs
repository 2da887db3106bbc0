use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

pub(crate) fn is_ctrl_c(key: KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c')
}

pub(crate) fn is_back(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Esc)
}

pub(crate) fn is_up(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Up | KeyCode::Char('k'))
}

pub(crate) fn is_down(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Down | KeyCode::Char('j'))
}

pub(crate) fn is_page_up(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::PageUp)
}

pub(crate) fn is_page_down(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::PageDown)
}

pub(crate) fn is_toggle(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Enter | KeyCode::Char(' '))
}

pub(crate) fn is_cycle_filter(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('f'))
}

pub(crate) fn is_refresh(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('r'))
}

pub(crate) fn is_collapse_all(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('c')) && !is_ctrl_c(key)
}

pub(crate) fn is_expand_all(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('e'))
}

pub(crate) fn is_range_select(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('v'))
}

pub(crate) fn is_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q')) || is_ctrl_c(key)
}
