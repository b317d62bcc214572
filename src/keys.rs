use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use pocketpet::input::{Buttons, VButton};
use std::time::Duration;

/// Everything the keyboard said during one frame.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct FrameInput {
    pub(crate) buttons: Buttons,
    pub(crate) quit: bool,
}

pub(crate) fn map_key(key: KeyCode) -> Option<VButton> {
    match key {
        KeyCode::Char('a') | KeyCode::Char('A') | KeyCode::Left => Some(VButton::Left),
        KeyCode::Char(' ') | KeyCode::Enter => Some(VButton::Center),
        KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Right => Some(VButton::Right),
        _ => None,
    }
}

/// Drains pending key events without blocking past `max_frame_time`.
/// Auto-repeat counts as holding the button, not as a fresh press.
pub(crate) fn collect_input_nonblocking(max_frame_time: Duration) -> anyhow::Result<FrameInput> {
    let mut out = FrameInput::default();
    let timeout = std::cmp::min(Duration::from_millis(1), max_frame_time);
    let mut seen = 0;
    while event::poll(timeout)? {
        if let Event::Key(k) = event::read()? {
            if matches!(k.code, KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc) {
                out.quit = true;
                break;
            }
            if let Some(b) = map_key(k.code) {
                let slot = out.buttons.slot_mut(b);
                match k.kind {
                    KeyEventKind::Press => slot.pressed = true,
                    KeyEventKind::Repeat => slot.held = true,
                    KeyEventKind::Release => {}
                }
            }
            seen += 1;
            if seen >= 32 {
                break;
            }
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_key_sets_reach_the_same_buttons() {
        assert_eq!(map_key(KeyCode::Char('a')), Some(VButton::Left));
        assert_eq!(map_key(KeyCode::Left), Some(VButton::Left));
        assert_eq!(map_key(KeyCode::Enter), Some(VButton::Center));
        assert_eq!(map_key(KeyCode::Char(' ')), Some(VButton::Center));
        assert_eq!(map_key(KeyCode::Right), Some(VButton::Right));
        assert_eq!(map_key(KeyCode::Char('x')), None);
    }
}
