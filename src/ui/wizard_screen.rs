//! Wizard screen rendering: progress header, step form, response transcript

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, Paragraph, Wrap},
    Frame,
};

use super::centered_rect;
use super::form_field::StepForm;
use crate::config::UiConfig;
use crate::wizard::{Sender, Transcript, Wizard, TOTAL_STEPS};

/// Stateless renderer; everything it draws comes from the wizard and form
#[derive(Debug, Clone, Copy)]
pub struct WizardScreen {
    show_timestamps: bool,
}

impl WizardScreen {
    pub fn new(config: &UiConfig) -> Self {
        Self {
            show_timestamps: config.show_timestamps,
        }
    }

    pub fn render(&self, frame: &mut Frame, wizard: &Wizard, form: &StepForm, status: Option<&str>) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(10),   // Body
                Constraint::Length(1), // Status
            ])
            .split(frame.area());

        self.render_header(frame, chunks[0], wizard);

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(chunks[1]);

        if wizard.is_finished() {
            self.render_complete(frame, body[0], wizard);
        } else {
            self.render_form(frame, body[0], wizard, form);
        }
        self.render_transcript(frame, body[1], wizard.transcript());
        self.render_status(frame, chunks[2], status);

        if wizard.is_busy() {
            self.render_loading(frame);
        }
    }

    fn render_header(&self, frame: &mut Frame, area: Rect, wizard: &Wizard) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(30), Constraint::Min(20)])
            .split(area);

        let title = Paragraph::new(Line::from(vec![
            Span::styled(
                "petquest",
                Style::default()
                    .fg(Color::LightRed)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" API walkthrough"),
        ]))
        .block(Block::default().borders(Borders::ALL));
        frame.render_widget(title, chunks[0]);

        let number = wizard.step().number();
        let gauge = Gauge::default()
            .block(Block::default().borders(Borders::ALL))
            .gauge_style(Style::default().fg(Color::Cyan).bg(Color::Black))
            .ratio(f64::from(number) / f64::from(TOTAL_STEPS))
            .label(format!("Step {} of {}", number, TOTAL_STEPS));
        frame.render_widget(gauge, chunks[1]);
    }

    fn render_form(&self, frame: &mut Frame, area: Rect, wizard: &Wizard, form: &StepForm) {
        let step = wizard.step();
        let block = Block::default()
            .title(format!(" Step {}: {} ", step.number(), step.title()))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let mut constraints = vec![
            Constraint::Length(3), // Description
            Constraint::Length(1), // Spacer
        ];
        constraints.extend(form.fields.iter().map(|_| Constraint::Length(3)));
        constraints.extend([
            Constraint::Length(1), // Action
            Constraint::Min(0),
            Constraint::Length(2), // Footer
        ]);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints(constraints)
            .split(inner);

        let description = Paragraph::new(step.description())
            .style(Style::default().fg(Color::White))
            .wrap(Wrap { trim: true });
        frame.render_widget(description, chunks[0]);

        for (i, field) in form.fields.iter().enumerate() {
            field.render(frame, chunks[2 + i], i == form.focused_index);
        }

        let action_idx = 2 + form.fields.len();
        let action_style = if form.is_valid() {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Green)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let action = Paragraph::new(Line::from(Span::styled(
            format!("[ {} ]", step.action_label()),
            action_style,
        )))
        .alignment(Alignment::Center);
        frame.render_widget(action, chunks[action_idx]);

        let mut hints = vec![
            Span::styled("[Enter]", Style::default().fg(Color::Cyan)),
            Span::raw(if form.has_inputs() && !form.is_last_field() {
                " next  "
            } else {
                " submit  "
            }),
        ];
        if form.fields.len() > 1 {
            hints.push(Span::styled("[Tab]", Style::default().fg(Color::Cyan)));
            hints.push(Span::raw(" field  "));
        }
        if wizard.can_go_back() {
            hints.push(Span::styled("[Esc]", Style::default().fg(Color::Cyan)));
            hints.push(Span::raw(" back  "));
        }
        hints.push(Span::styled("[Ctrl+C]", Style::default().fg(Color::Cyan)));
        hints.push(Span::raw(" quit"));

        let footer = Paragraph::new(Line::from(hints)).alignment(Alignment::Center);
        frame.render_widget(footer, chunks[action_idx + 2]);
    }

    fn render_complete(&self, frame: &mut Frame, area: Rect, wizard: &Wizard) {
        let step = wizard.step();
        let block = Block::default()
            .title(format!(" Step {}: {} ", step.number(), step.title()))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Green));

        let lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                "✓",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "Congratulations!",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(step.description()),
            Line::from(""),
            Line::from(Span::styled(
                format!("[ {} ]", step.action_label()),
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled("[Enter]", Style::default().fg(Color::Cyan)),
                Span::raw(" start over  "),
                Span::styled("[q]", Style::default().fg(Color::Cyan)),
                Span::raw(" quit"),
            ]),
        ];

        let content = Paragraph::new(lines)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        frame.render_widget(content, area);
    }

    fn render_transcript(&self, frame: &mut Frame, area: Rect, transcript: &Transcript) {
        let block = Block::default()
            .title(format!(" API Responses ({}) ", transcript.len()))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Gray));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if transcript.is_empty() {
            let empty = Paragraph::new("No responses yet. Submit a step to call the API.")
                .style(Style::default().fg(Color::DarkGray))
                .wrap(Wrap { trim: true });
            frame.render_widget(empty, inner);
            return;
        }

        let width = usize::from(inner.width.saturating_sub(2));
        let mut lines: Vec<Line> = Vec::new();
        for entry in transcript.entries() {
            let (who, color) = match entry.sender {
                Sender::User => ("You", Color::Yellow),
                Sender::System => ("API", Color::Cyan),
            };
            let mut header = vec![Span::styled(
                who,
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )];
            if self.show_timestamps {
                header.push(Span::styled(
                    format!("  {}", entry.timestamp.format("%H:%M:%S")),
                    Style::default().fg(Color::DarkGray),
                ));
            }
            lines.push(Line::from(header));
            lines.extend(
                wrap_text(&entry.text, width)
                    .into_iter()
                    .map(|l| Line::from(format!(" {}", l))),
            );
            lines.push(Line::from(""));
        }

        // Keep the newest entry in view
        let overflow = lines.len().saturating_sub(usize::from(inner.height));
        let scroll = u16::try_from(overflow).unwrap_or(u16::MAX);
        frame.render_widget(Paragraph::new(lines).scroll((scroll, 0)), inner);
    }

    fn render_status(&self, frame: &mut Frame, area: Rect, status: Option<&str>) {
        let line = match status {
            Some(message) => Line::from(Span::styled(
                format!(" {}", message),
                Style::default().fg(Color::Red),
            )),
            None => Line::from(""),
        };
        frame.render_widget(Paragraph::new(line), area);
    }

    fn render_loading(&self, frame: &mut Frame) {
        let area = centered_rect(30, 15, frame.area());
        frame.render_widget(Clear, area);
        let popup = Paragraph::new(Line::from(Span::styled(
            "Loading...",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow)),
        );
        frame.render_widget(popup, area);
    }
}

/// Hard-wrap text at `width` characters, keeping explicit newlines
fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let mut out = Vec::new();
    for line in text.split('\n') {
        if width == 0 || line.chars().count() <= width {
            out.push(line.to_string());
            continue;
        }
        let chars: Vec<char> = line.chars().collect();
        out.extend(chars.chunks(width).map(|chunk| chunk.iter().collect::<String>()));
    }
    out
}
