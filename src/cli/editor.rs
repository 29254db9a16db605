//! Prompt line editing.
//!
//! The terminal runs in raw mode, so typed keys arrive one by one and the
//! prompt keeps its own line buffer.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// What a key press did to the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorAction {
    /// The buffer changed and should be redrawn
    Edited,
    /// Enter was pressed; carries the submitted line
    Submit(String),
    /// Ctrl-C, or Ctrl-D on an empty line
    Interrupt,
    /// Nothing to do
    Ignored,
}

/// Single-line input buffer.
#[derive(Debug, Default)]
pub struct LineEditor {
    buffer: String,
}

impl LineEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Applies one key event.
    pub fn handle_key(&mut self, key: KeyEvent) -> EditorAction {
        if key.kind != KeyEventKind::Press {
            return EditorAction::Ignored;
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('c') if ctrl => EditorAction::Interrupt,
            KeyCode::Char('d') if ctrl && self.buffer.is_empty() => EditorAction::Interrupt,
            KeyCode::Char('u') if ctrl => self.clear(),
            KeyCode::Char(_) if ctrl => EditorAction::Ignored,
            KeyCode::Char(c) => {
                self.buffer.push(c);
                EditorAction::Edited
            }
            KeyCode::Backspace => match self.buffer.pop() {
                Some(_) => EditorAction::Edited,
                None => EditorAction::Ignored,
            },
            KeyCode::Esc => self.clear(),
            KeyCode::Enter => EditorAction::Submit(std::mem::take(&mut self.buffer)),
            _ => EditorAction::Ignored,
        }
    }

    fn clear(&mut self) -> EditorAction {
        if self.buffer.is_empty() {
            return EditorAction::Ignored;
        }
        self.buffer.clear();
        EditorAction::Edited
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn type_text(editor: &mut LineEditor, text: &str) {
        for c in text.chars() {
            assert_eq!(editor.handle_key(key(KeyCode::Char(c))), EditorAction::Edited);
        }
    }

    #[test]
    fn test_typing_and_submit() {
        let mut editor = LineEditor::new();
        type_text(&mut editor, "set focus 5");

        assert_eq!(editor.buffer(), "set focus 5");
        assert_eq!(
            editor.handle_key(key(KeyCode::Enter)),
            EditorAction::Submit("set focus 5".to_string())
        );
        assert_eq!(editor.buffer(), "");
    }

    #[test]
    fn test_empty_enter_submits_empty_line() {
        let mut editor = LineEditor::new();
        assert_eq!(
            editor.handle_key(key(KeyCode::Enter)),
            EditorAction::Submit(String::new())
        );
    }

    #[test]
    fn test_backspace() {
        let mut editor = LineEditor::new();
        type_text(&mut editor, "pau");

        assert_eq!(editor.handle_key(key(KeyCode::Backspace)), EditorAction::Edited);
        assert_eq!(editor.buffer(), "pa");

        editor.handle_key(key(KeyCode::Backspace));
        editor.handle_key(key(KeyCode::Backspace));
        assert_eq!(editor.handle_key(key(KeyCode::Backspace)), EditorAction::Ignored);
    }

    #[test]
    fn test_escape_and_ctrl_u_clear() {
        let mut editor = LineEditor::new();
        type_text(&mut editor, "skip");
        assert_eq!(editor.handle_key(key(KeyCode::Esc)), EditorAction::Edited);
        assert_eq!(editor.buffer(), "");

        type_text(&mut editor, "stop");
        assert_eq!(editor.handle_key(ctrl('u')), EditorAction::Edited);
        assert_eq!(editor.buffer(), "");
    }

    #[test]
    fn test_interrupts() {
        let mut editor = LineEditor::new();
        assert_eq!(editor.handle_key(ctrl('c')), EditorAction::Interrupt);
        assert_eq!(editor.handle_key(ctrl('d')), EditorAction::Interrupt);

        type_text(&mut editor, "x");
        assert_eq!(editor.handle_key(ctrl('d')), EditorAction::Ignored);
        assert_eq!(editor.handle_key(ctrl('c')), EditorAction::Interrupt);
    }

    #[test]
    fn test_release_events_are_ignored() {
        let mut editor = LineEditor::new();
        let mut release = key(KeyCode::Char('a'));
        release.kind = KeyEventKind::Release;

        assert_eq!(editor.handle_key(release), EditorAction::Ignored);
        assert_eq!(editor.buffer(), "");
    }
}
