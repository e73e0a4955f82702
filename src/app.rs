use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tracing::{debug, warn};

use crate::api::{ApiResponse, HttpTransport, Transport};
use crate::config::Config;
use crate::ui::{StepForm, TerminalGuard, WizardScreen};
use crate::wizard::{PendingOperation, SubmitBlocked, Wizard, WizardStep};

/// The one request currently on the wire
struct InFlight {
    pending: PendingOperation,
    rx: oneshot::Receiver<ApiResponse>,
}

pub struct App {
    config: Config,
    wizard: Wizard,
    form: StepForm,
    screen: WizardScreen,
    transport: Arc<dyn Transport>,
    in_flight: Option<InFlight>,
    status: Option<String>,
    should_quit: bool,
}

impl App {
    pub fn new(config: Config) -> Result<Self> {
        let transport =
            HttpTransport::from_config(&config).context("Failed to create HTTP client")?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    pub fn with_transport(config: Config, transport: Arc<dyn Transport>) -> Self {
        let wizard = Wizard::new();
        let form = StepForm::for_step(wizard.step(), wizard.session());
        let screen = WizardScreen::new(&config.ui);
        Self {
            config,
            wizard,
            form,
            screen,
            transport,
            in_flight: None,
            status: None,
            should_quit: false,
        }
    }

    pub fn wizard(&self) -> &Wizard {
        &self.wizard
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub async fn run(&mut self) -> Result<()> {
        let (_guard, mut terminal) = TerminalGuard::enter()?;
        let tick_rate = Duration::from_millis(self.config.ui.refresh_rate_ms);
        let screen = self.screen;

        while !self.should_quit {
            terminal.draw(|f| {
                screen.render(f, &self.wizard, &self.form, self.status.as_deref());
            })?;

            if event::poll(tick_rate)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key);
                    }
                }
            }

            self.poll_in_flight();
        }

        Ok(())
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL)
            && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('q'))
        {
            self.should_quit = true;
            return;
        }

        // Input is ignored while a request is in flight
        if self.wizard.is_busy() {
            return;
        }

        if self.wizard.is_finished() {
            match key.code {
                KeyCode::Enter => {
                    self.wizard.restart();
                    self.sync_form();
                }
                KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Tab | KeyCode::Down => self.form.next_field(),
            KeyCode::BackTab | KeyCode::Up => self.form.prev_field(),
            KeyCode::Esc => {
                if self.wizard.go_back() {
                    self.status = None;
                    self.sync_form();
                } else if self.wizard.step() == WizardStep::first() {
                    self.should_quit = true;
                }
            }
            KeyCode::Enter => {
                if self.form.has_inputs() && !self.form.is_last_field() {
                    self.form.next_field();
                } else {
                    self.submit();
                }
            }
            code => {
                if let Some((field, value)) = self.form.handle_key(code) {
                    self.wizard.set_field(field, value);
                    self.status = None;
                }
            }
        }
    }

    fn submit(&mut self) {
        match self.wizard.begin() {
            Ok(pending) => {
                self.status = None;
                let transport = Arc::clone(&self.transport);
                let request = pending.request.clone();
                let (tx, rx) = oneshot::channel();
                tokio::spawn(async move {
                    let response = transport.send(request).await;
                    let _ = tx.send(response);
                });
                self.in_flight = Some(InFlight { pending, rx });
            }
            Err(SubmitBlocked::Busy) => {}
            Err(blocked) => {
                debug!(reason = %blocked, "Submit blocked");
                self.status = Some(blocked.to_string());
            }
        }
    }

    /// Complete the in-flight step once its response has arrived
    pub fn poll_in_flight(&mut self) {
        let Some(mut in_flight) = self.in_flight.take() else {
            return;
        };

        let response = match in_flight.rx.try_recv() {
            Ok(response) => response,
            Err(oneshot::error::TryRecvError::Empty) => {
                self.in_flight = Some(in_flight);
                return;
            }
            Err(oneshot::error::TryRecvError::Closed) => {
                warn!("Request task ended without a response");
                ApiResponse::fallback()
            }
        };

        self.wizard.finish(in_flight.pending, response);
        self.sync_form();
    }

    /// Rebuild the form when the wizard moved to another step
    fn sync_form(&mut self) {
        if self.form.step != self.wizard.step() {
            self.form = StepForm::for_step(self.wizard.step(), self.wizard.session());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiRequest;
    use async_trait::async_trait;
    use serde_json::json;

    struct EchoTransport;

    #[async_trait]
    impl Transport for EchoTransport {
        async fn send(&self, request: ApiRequest) -> ApiResponse {
            ApiResponse::from_json(json!({"message": format!("handled {}", request.path)}))
        }
    }

    struct HangingTransport;

    #[async_trait]
    impl Transport for HangingTransport {
        async fn send(&self, _request: ApiRequest) -> ApiResponse {
            std::future::pending().await
        }
    }

    fn app_with(transport: impl Transport + 'static) -> App {
        App::with_transport(Config::default(), Arc::new(transport))
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    async fn settle(app: &mut App) {
        for _ in 0..100 {
            app.poll_in_flight();
            if !app.wizard.is_busy() {
                return;
            }
            tokio::task::yield_now().await;
        }
        panic!("request never completed");
    }

    #[tokio::test]
    async fn test_typing_binds_to_session() {
        let mut app = app_with(EchoTransport);
        type_text(&mut app, "alice");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "p1");

        assert_eq!(app.wizard().session().username, "alice");
        assert_eq!(app.wizard().session().password, "p1");
    }

    #[tokio::test]
    async fn test_enter_moves_then_submits() {
        let mut app = app_with(EchoTransport);
        type_text(&mut app, "alice");
        press(&mut app, KeyCode::Enter);
        assert!(!app.wizard().is_busy());
        type_text(&mut app, "p1");
        press(&mut app, KeyCode::Enter);
        assert!(app.wizard().is_busy());

        settle(&mut app).await;
        assert_eq!(app.wizard().step(), WizardStep::CompleteProfile);
        assert_eq!(
            app.wizard().transcript().last().map(|e| e.text.as_str()),
            Some("handled /signup")
        );
        assert_eq!(app.form.step, WizardStep::CompleteProfile);
    }

    #[tokio::test]
    async fn test_blank_fields_set_status() {
        let mut app = app_with(EchoTransport);
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Enter);

        assert!(!app.wizard().is_busy());
        assert_eq!(app.status(), Some("please fill in: Username, Password"));

        press(&mut app, KeyCode::Char('x'));
        assert_eq!(app.status(), None);
    }

    #[tokio::test]
    async fn test_keys_ignored_while_busy() {
        let mut app = app_with(HangingTransport);
        type_text(&mut app, "alice");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "p1");
        press(&mut app, KeyCode::Enter);
        assert!(app.wizard().is_busy());

        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Char('z'));
        press(&mut app, KeyCode::Esc);
        app.poll_in_flight();

        assert!(app.wizard().is_busy());
        assert_eq!(app.wizard().session().password, "p1");
        assert_eq!(app.wizard().step(), WizardStep::CreateAccount);

        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit());
    }

    #[tokio::test]
    async fn test_escape_goes_back_or_quits() {
        let mut app = app_with(EchoTransport);
        type_text(&mut app, "alice");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "p1");
        press(&mut app, KeyCode::Enter);
        settle(&mut app).await;

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.wizard().step(), WizardStep::CreateAccount);
        assert_eq!(app.form.fields[0].value(), "alice");
        assert!(!app.should_quit());

        press(&mut app, KeyCode::Esc);
        assert!(app.should_quit());
    }

    #[tokio::test]
    async fn test_dropped_sender_falls_back() {
        let mut app = app_with(EchoTransport);
        type_text(&mut app, "alice");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "p1");
        let pending = app.wizard.begin().unwrap();
        let (tx, rx) = oneshot::channel::<ApiResponse>();
        drop(tx);
        app.in_flight = Some(InFlight { pending, rx });

        app.poll_in_flight();
        assert_eq!(app.wizard().step(), WizardStep::CompleteProfile);
        assert_eq!(
            app.wizard().transcript().last().map(|e| e.text.as_str()),
            Some("Error")
        );
    }
}
