//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::oneshot;

use crate::api::{
    Author, Credentials, Gateway, GatewayError, NewQuestion, Question, QuestionId, QuestionPatch,
    Session,
};

pub fn question(id: u64, title: &str, body: &str) -> Question {
    Question {
        id: QuestionId(id),
        title: title.to_string(),
        body: body.to_string(),
        author: Some(Author {
            full_name: "Test User".to_string(),
        }),
        answers: vec![],
    }
}

#[derive(Default)]
struct Store {
    questions: Vec<Question>,
    calls: Vec<String>,
    failure: Option<GatewayError>,
    last_patch: Option<QuestionPatch>,
}

/// A gateway backed by a vector, with PATCH semantics like the real API.
///
/// `gate(id)` holds back `get_question(id)` until the returned sender fires,
/// which lets tests pick the order in which concurrent requests complete.
#[derive(Default)]
pub struct InMemoryGateway {
    store: Mutex<Store>,
    gates: Mutex<HashMap<QuestionId, oneshot::Receiver<()>>>,
}

impl InMemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_questions(questions: Vec<Question>) -> Self {
        let gateway = Self::new();
        gateway.store.lock().unwrap().questions = questions;
        gateway
    }

    pub fn gate(&self, id: QuestionId) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().insert(id, rx);
        tx
    }

    /// Makes the next call fail with `error`.
    pub fn fail_next(&self, error: GatewayError) {
        self.store.lock().unwrap().failure = Some(error);
    }

    pub fn calls(&self) -> Vec<String> {
        self.store.lock().unwrap().calls.clone()
    }

    pub fn stored(&self, id: QuestionId) -> Option<Question> {
        let store = self.store.lock().unwrap();
        store.questions.iter().find(|q| q.id == id).cloned()
    }

    pub fn last_patch(&self) -> Option<QuestionPatch> {
        self.store.lock().unwrap().last_patch.clone()
    }

    fn record(&self, call: String) -> Result<(), GatewayError> {
        let mut store = self.store.lock().unwrap();
        store.calls.push(call);
        match store.failure.take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl Gateway for InMemoryGateway {
    async fn list_questions(&self) -> Result<Vec<Question>, GatewayError> {
        self.record("list".to_string())?;
        Ok(self.store.lock().unwrap().questions.clone())
    }

    async fn get_question(&self, id: QuestionId) -> Result<Question, GatewayError> {
        let gate = self.gates.lock().unwrap().remove(&id);
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        self.record(format!("get {id}"))?;
        self.stored(id)
            .ok_or_else(|| GatewayError::NotFound(format!("/questions/{id}")))
    }

    async fn create_question(&self, fields: &NewQuestion) -> Result<Question, GatewayError> {
        self.record("create".to_string())?;
        let mut store = self.store.lock().unwrap();
        let id = store.questions.iter().map(|q| q.id.0).max().unwrap_or(0) + 1;
        let created = question(id, &fields.title, &fields.body);
        store.questions.push(created.clone());
        Ok(created)
    }

    async fn update_question(
        &self,
        id: QuestionId,
        fields: &QuestionPatch,
    ) -> Result<Question, GatewayError> {
        self.record(format!("update {id}"))?;
        let mut store = self.store.lock().unwrap();
        store.last_patch = Some(fields.clone());
        let existing = store
            .questions
            .iter_mut()
            .find(|q| q.id == id)
            .ok_or_else(|| GatewayError::NotFound(format!("/questions/{id}")))?;
        if let Some(title) = &fields.title {
            existing.title = title.clone();
        }
        if let Some(body) = &fields.body {
            existing.body = body.clone();
        }
        Ok(existing.clone())
    }

    async fn login(&self, credentials: &Credentials) -> Result<Session, GatewayError> {
        self.record("login".to_string())?;
        if credentials.password == "supersecret" {
            Ok(serde_json::json!({"status": 200}))
        } else {
            Err(GatewayError::Api {
                status: 401,
                message: "Wrong email or password".to_string(),
            })
        }
    }
}
