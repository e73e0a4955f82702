//! Text input widgets for the per-step forms

use crossterm::event::KeyCode;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::wizard::{Field, InputKind, InputSpec, SessionState, WizardStep};

/// A single-line input bound to a session field
#[derive(Debug, Clone)]
pub struct FormField {
    pub input: InputSpec,
    value: String,
    /// Cursor position in characters
    cursor_pos: usize,
}

impl FormField {
    pub fn new(input: InputSpec, value: &str) -> Self {
        Self {
            input,
            value: value.to_string(),
            cursor_pos: value.chars().count(),
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn is_valid(&self) -> bool {
        !self.value.is_empty()
    }

    fn byte_index(&self, char_pos: usize) -> usize {
        self.value
            .char_indices()
            .nth(char_pos)
            .map_or(self.value.len(), |(i, _)| i)
    }

    fn char_len(&self) -> usize {
        self.value.chars().count()
    }

    fn accepts(&self, c: char) -> bool {
        match self.input.kind {
            InputKind::Numeric => c.is_ascii_digit(),
            InputKind::Text | InputKind::Secret => !c.is_control(),
        }
    }

    /// Handle a key event, returns true if the value changed
    pub fn handle_key(&mut self, key: KeyCode) -> bool {
        match key {
            KeyCode::Char(c) if self.accepts(c) => {
                let at = self.byte_index(self.cursor_pos);
                self.value.insert(at, c);
                self.cursor_pos += 1;
                true
            }
            KeyCode::Backspace if self.cursor_pos > 0 => {
                self.cursor_pos -= 1;
                let at = self.byte_index(self.cursor_pos);
                self.value.remove(at);
                true
            }
            KeyCode::Delete if self.cursor_pos < self.char_len() => {
                let at = self.byte_index(self.cursor_pos);
                self.value.remove(at);
                true
            }
            KeyCode::Left => {
                self.cursor_pos = self.cursor_pos.saturating_sub(1);
                false
            }
            KeyCode::Right => {
                self.cursor_pos = (self.cursor_pos + 1).min(self.char_len());
                false
            }
            KeyCode::Home => {
                self.cursor_pos = 0;
                false
            }
            KeyCode::End => {
                self.cursor_pos = self.char_len();
                false
            }
            _ => false,
        }
    }

    /// Text as shown on screen (masked for secrets)
    fn display_value(&self) -> String {
        match self.input.kind {
            InputKind::Secret => "*".repeat(self.char_len()),
            InputKind::Text | InputKind::Numeric => self.value.clone(),
        }
    }

    /// Render the field: label on the first row, value on the second
    pub fn render(&self, frame: &mut Frame, area: Rect, focused: bool) {
        let label_style = if focused {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };

        let value_line = if self.value.is_empty() && !focused {
            Line::from(Span::styled(
                format!("  {}", self.input.placeholder),
                Style::default().fg(Color::DarkGray),
            ))
        } else {
            let mut text = self.display_value();
            if focused {
                // Show cursor position
                let at = text
                    .char_indices()
                    .nth(self.cursor_pos)
                    .map_or(text.len(), |(i, _)| i);
                text.insert(at, '|');
            }
            Line::from(Span::styled(
                format!("  {}", text),
                Style::default().fg(if focused { Color::White } else { Color::Gray }),
            ))
        };

        let lines = vec![
            Line::from(Span::styled(self.input.label, label_style)),
            value_line,
        ];
        frame.render_widget(Paragraph::new(lines), area);
    }
}

/// The form for one step, seeded from the session values it is bound to
#[derive(Debug, Clone)]
pub struct StepForm {
    pub step: WizardStep,
    pub fields: Vec<FormField>,
    /// Currently focused field index
    pub focused_index: usize,
}

impl StepForm {
    pub fn for_step(step: WizardStep, session: &SessionState) -> Self {
        let fields = step
            .inputs()
            .iter()
            .map(|input| FormField::new(*input, session.get(input.field)))
            .collect();
        Self {
            step,
            fields,
            focused_index: 0,
        }
    }

    pub fn has_inputs(&self) -> bool {
        !self.fields.is_empty()
    }

    /// Move to the next field
    pub fn next_field(&mut self) {
        if self.focused_index < self.fields.len().saturating_sub(1) {
            self.focused_index += 1;
        }
    }

    /// Move to the previous field
    pub fn prev_field(&mut self) {
        if self.focused_index > 0 {
            self.focused_index -= 1;
        }
    }

    /// Check if we're on the last field (true for button-only forms)
    pub fn is_last_field(&self) -> bool {
        self.focused_index >= self.fields.len().saturating_sub(1)
    }

    pub fn is_valid(&self) -> bool {
        self.fields.iter().all(FormField::is_valid)
    }

    /// Forward a key to the focused field; returns the binding to update
    /// when the value changed.
    pub fn handle_key(&mut self, key: KeyCode) -> Option<(Field, String)> {
        let field = self.fields.get_mut(self.focused_index)?;
        if field.handle_key(key) {
            Some((field.input.field, field.value().to_string()))
        } else {
            None
        }
    }
}
