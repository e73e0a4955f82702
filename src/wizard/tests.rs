//! Tests for the wizard controller

use super::*;
use crate::api::{ApiRequest, ApiResponse, HttpMethod, Transport};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::Mutex;

/// Transport that replays canned responses and records what it was sent
#[derive(Default)]
struct ScriptedTransport {
    responses: Mutex<VecDeque<ApiResponse>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl ScriptedTransport {
    fn with_bodies(bodies: Vec<Value>) -> Self {
        Self {
            responses: Mutex::new(bodies.into_iter().map(ApiResponse::from_json).collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: ApiRequest) -> ApiResponse {
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| ApiResponse::from_json(json!({ "message": "ok" })))
    }
}

/// Transport whose every request fails before reaching a server
struct FailingTransport;

#[async_trait]
impl Transport for FailingTransport {
    async fn send(&self, _request: ApiRequest) -> ApiResponse {
        ApiResponse::fallback()
    }
}

fn fill_all_fields(wizard: &mut Wizard) {
    wizard.set_field(Field::Username, "alice");
    wizard.set_field(Field::Password, "p1");
    wizard.set_field(Field::Age, "30");
    wizard.set_field(Field::AuthKey, "k0");
    wizard.set_field(Field::PetName, "Rex");
    wizard.set_field(Field::PetType, "dog");
    wizard.set_field(Field::Role, "admin");
}

async fn run_to_end(wizard: &mut Wizard, transport: &dyn Transport) {
    while !wizard.is_finished() {
        wizard.submit(transport).await.unwrap();
    }
}

#[test]
fn test_new_wizard_starts_clean() {
    let wizard = Wizard::new();
    assert_eq!(wizard.step(), WizardStep::CreateAccount);
    assert!(wizard.transcript().is_empty());
    assert!(!wizard.is_busy());
    assert_eq!(wizard.session(), &SessionState::new());
}

#[tokio::test]
async fn test_signup_scenario() {
    let mut wizard = Wizard::new();
    wizard.set_field(Field::Username, "alice");
    wizard.set_field(Field::Password, "p1");
    let transport = ScriptedTransport::with_bodies(vec![json!({ "message": "User created" })]);

    let step = wizard.submit(&transport).await.unwrap();

    assert_eq!(step.number(), 2);
    assert_eq!(wizard.transcript().len(), 1);
    let entry = wizard.transcript().last().unwrap();
    assert!(entry.text.contains("User created"));
    assert_eq!(entry.sender, Sender::System);

    let sent = transport.requests();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].method, HttpMethod::Post);
    assert_eq!(
        sent[0].body,
        Some(json!({ "username": "alice", "password": "p1" }))
    );
}

#[tokio::test]
async fn test_complete_profile_scenario() {
    let mut wizard = Wizard::new();
    fill_all_fields(&mut wizard);
    let transport = ScriptedTransport::with_bodies(vec![
        json!({ "message": "created" }),
        json!({ "message": "ok", "id": "u1", "code": "k1" }),
    ]);

    wizard.submit(&transport).await.unwrap();
    let step = wizard.submit(&transport).await.unwrap();

    assert_eq!(step.number(), 3);
    assert_eq!(wizard.session().user_id, "u1");
    assert_eq!(wizard.session().auth_key, "k1");
    let text = &wizard.transcript().last().unwrap().text;
    assert!(text.contains("ok"));
    assert!(text.contains("ID: u1"));
    assert!(text.contains("Code: k1"));
}

#[tokio::test]
async fn test_user_id_survives_later_responses_without_id() {
    let mut wizard = Wizard::new();
    fill_all_fields(&mut wizard);
    let transport = ScriptedTransport::with_bodies(vec![
        json!({ "message": "created" }),
        json!({ "message": "ok", "id": "u1", "code": "k1" }),
        json!({ "message": "missing key" }),
        json!({ "message": "welcome back" }),
    ]);

    for _ in 0..4 {
        wizard.submit(&transport).await.unwrap();
    }

    assert_eq!(wizard.step(), WizardStep::UpdateUsername);
    assert_eq!(wizard.session().user_id, "u1");
    assert_eq!(wizard.session().auth_key, "k1");
}

#[tokio::test]
async fn test_every_operation_advances_exactly_one_step() {
    let mut wizard = Wizard::new();
    fill_all_fields(&mut wizard);
    // Every response is a denial; the wizard narrates and moves on regardless
    let transport = ScriptedTransport::with_bodies(
        (0..15)
            .map(|_| json!({ "message": "Unauthorized" }))
            .collect(),
    );

    for n in 1..TOTAL_STEPS {
        assert_eq!(wizard.step().number(), n);
        let step = wizard.submit(&transport).await.unwrap();
        assert_eq!(step.number(), n + 1);
        assert_eq!(wizard.transcript().len(), usize::from(n));
    }
    assert!(wizard.is_finished());
}

#[tokio::test]
async fn test_full_run_sends_fifteen_requests() {
    let mut wizard = Wizard::new();
    fill_all_fields(&mut wizard);
    let transport = ScriptedTransport::default();

    run_to_end(&mut wizard, &transport).await;

    let sent = transport.requests();
    assert_eq!(sent.len(), 15);
    assert_eq!(sent[14].path, "/logout");
    assert_eq!(wizard.transcript().len(), 15);
}

#[tokio::test]
async fn test_transport_failure_still_advances() {
    let mut wizard = Wizard::new();
    fill_all_fields(&mut wizard);

    let step = wizard.submit(&FailingTransport).await.unwrap();

    assert_eq!(step.number(), 2);
    assert_eq!(wizard.transcript().last().unwrap().text, "Error");
    assert!(!wizard.is_busy());
}

#[tokio::test]
async fn test_pet_id_flows_into_delete() {
    let mut wizard = Wizard::new();
    fill_all_fields(&mut wizard);
    let mut bodies: Vec<Value> = (0..5).map(|_| json!({ "message": "ok" })).collect();
    bodies[1] = json!({ "message": "ok", "id": "u9", "code": "k9" });
    bodies.push(json!({ "message": "Pet added", "petId": "p42" }));
    let transport = ScriptedTransport::with_bodies(bodies);

    run_to_end(&mut wizard, &transport).await;

    let sent = transport.requests();
    assert_eq!(sent[5].body.as_ref().unwrap()["ownerId"], "u9");
    assert_eq!(sent[11].method, HttpMethod::Delete);
    assert_eq!(sent[11].path, "/pets/p42");
    assert_eq!(sent[7].target(), "/pets?userId=u9");
}

#[test]
fn test_begin_blocks_on_empty_fields() {
    let mut wizard = Wizard::new();
    wizard.set_field(Field::Username, "alice");

    assert_eq!(
        wizard.begin(),
        Err(SubmitBlocked::MissingFields(vec!["Password"]))
    );
    assert!(!wizard.is_busy());
}

#[test]
fn test_whitespace_counts_as_filled() {
    let mut wizard = Wizard::new();
    wizard.set_field(Field::Username, "alice");
    wizard.set_field(Field::Password, "   ");

    assert!(wizard.form_ready());
    let pending = wizard.begin().unwrap();
    assert_eq!(pending.request.body.unwrap()["password"], "   ");
}

#[test]
fn test_button_only_steps_need_no_input() {
    let mut wizard = Wizard::new();
    wizard.sequencer = StepSequencer::new();
    for _ in 0..6 {
        wizard.sequencer.advance();
    }
    assert_eq!(wizard.step(), WizardStep::ListOwnPets);
    assert!(wizard.form_ready());
    assert!(wizard.begin().is_ok());
}

#[test]
fn test_only_one_request_in_flight() {
    let mut wizard = Wizard::new();
    fill_all_fields(&mut wizard);

    let pending = wizard.begin().unwrap();
    assert!(wizard.is_busy());
    assert_eq!(wizard.begin(), Err(SubmitBlocked::Busy));
    // Back navigation is held while busy
    assert!(!wizard.can_go_back());

    wizard.finish(pending, ApiResponse::from_json(json!({ "message": "done" })));
    assert!(!wizard.is_busy());
    assert_eq!(wizard.step().number(), 2);
}

#[tokio::test]
async fn test_go_back_keeps_state_and_transcript() {
    let mut wizard = Wizard::new();
    fill_all_fields(&mut wizard);
    let transport = ScriptedTransport::with_bodies(vec![
        json!({ "message": "created" }),
        json!({ "message": "ok", "id": "u1", "code": "k1" }),
    ]);
    wizard.submit(&transport).await.unwrap();
    wizard.submit(&transport).await.unwrap();

    assert!(wizard.go_back());
    assert_eq!(wizard.step().number(), 2);
    assert_eq!(wizard.transcript().len(), 2);
    assert_eq!(wizard.session().user_id, "u1");

    // Resubmitting after going back appends, never replaces
    wizard.submit(&transport).await.unwrap();
    assert_eq!(wizard.transcript().len(), 3);
    assert_eq!(wizard.step().number(), 3);
}

#[test]
fn test_go_back_noop_on_first_step() {
    let mut wizard = Wizard::new();
    assert!(!wizard.go_back());
    assert_eq!(wizard.step().number(), 1);
}

#[tokio::test]
async fn test_go_back_noop_on_terminal_step() {
    let mut wizard = Wizard::new();
    fill_all_fields(&mut wizard);
    run_to_end(&mut wizard, &ScriptedTransport::default()).await;

    assert!(!wizard.go_back());
    assert_eq!(wizard.step().number(), TOTAL_STEPS);
}

#[tokio::test]
async fn test_restart_resets_step_and_transcript_only() {
    let mut wizard = Wizard::new();
    fill_all_fields(&mut wizard);
    let transport = ScriptedTransport::with_bodies(vec![
        json!({ "message": "created" }),
        json!({ "message": "ok", "id": "u1", "code": "k1" }),
    ]);
    run_to_end(&mut wizard, &transport).await;
    let session_before = wizard.session().clone();

    assert!(wizard.restart());

    assert_eq!(wizard.step().number(), 1);
    assert!(wizard.transcript().is_empty());
    assert_eq!(wizard.session(), &session_before);
    assert_eq!(wizard.session().user_id, "u1");
}

#[test]
fn test_restart_only_from_terminal_step() {
    let mut wizard = Wizard::new();
    wizard.transcript.append("kept", Sender::System);
    wizard.sequencer.advance();

    assert!(!wizard.restart());
    assert_eq!(wizard.step().number(), 2);
    assert_eq!(wizard.transcript().len(), 1);
}

#[tokio::test]
async fn test_submit_on_terminal_step_is_blocked() {
    let mut wizard = Wizard::new();
    fill_all_fields(&mut wizard);
    run_to_end(&mut wizard, &ScriptedTransport::default()).await;

    assert_eq!(
        wizard.submit(&FailingTransport).await,
        Err(SubmitBlocked::Finished)
    );
    assert_eq!(wizard.transcript().len(), 15);
}

#[test]
fn test_missing_fields_message() {
    let err = SubmitBlocked::MissingFields(vec!["Pet Name", "Pet Type"]);
    assert_eq!(err.to_string(), "please fill in: Pet Name, Pet Type");
}
