//! # Navigation Controller
//!
//! Owns the [`App`], turns actions into state changes, and runs the resulting
//! effects against the gateway on spawned tasks. Completed requests come back
//! as actions over a channel and are applied one at a time by the owner.
//!
//! ```text
//! dispatch(action) ─► update() ─► effects ─► tokio::spawn(gateway call)
//!        ▲                                          │
//!        └──────── next_completion() ◄── channel ◄──┘
//! ```
//!
//! Nothing is cancelled: a request started before the user navigated away
//! still completes, and `RacePolicy` decides whether its result is shown.

use log::{debug, info, warn};
use std::sync::Arc;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};

use crate::api::Gateway;
use crate::core::action::{Action, Effect, update};
use crate::core::page::Page;
use crate::core::state::{App, RacePolicy};
use crate::view::{Container, Document, FormId, ViewError};

/// Fields the controller reads from each form.
const FORM_FIELDS: [(FormId, &[&str]); 3] = [
    (FormId::NewQuestion, &["title", "body"]),
    (FormId::EditQuestion, &["title", "body"]),
    (FormId::Login, &["email", "password"]),
];

pub struct NavigationController {
    app: App,
    gateway: Arc<dyn Gateway>,
    tx: UnboundedSender<Action>,
    rx: UnboundedReceiver<Action>,
    in_flight: usize,
}

impl NavigationController {
    /// Checks that `document` has every element the controller uses, then
    /// shows the index page. Any missing element aborts startup.
    pub fn new(
        document: Document,
        gateway: Arc<dyn Gateway>,
        race_policy: RacePolicy,
    ) -> Result<Self, ViewError> {
        validate(&document)?;
        let app = App::new(document, race_policy)?;
        let (tx, rx) = unbounded_channel();
        info!("Navigation controller ready (race policy: {})", race_policy);
        Ok(Self {
            app,
            gateway,
            tx,
            rx,
            in_flight: 0,
        })
    }

    pub fn app(&self) -> &App {
        &self.app
    }

    pub fn document(&self) -> &Document {
        &self.app.document
    }

    /// Direct access to the document, e.g. to type into a form.
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.app.document
    }

    /// Number of spawned requests whose completion hasn't been applied yet.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Applies one action and starts whatever requests it asks for.
    pub fn dispatch(&mut self, action: Action) -> Result<(), ViewError> {
        debug!("Dispatching: {:?}", action);
        let effects = update(&mut self.app, action)?;
        for effect in effects {
            self.spawn(effect);
        }
        Ok(())
    }

    /// Programmatic navigation; the navbar highlight is left alone.
    pub fn navigate(&mut self, page: Page) -> Result<(), ViewError> {
        self.dispatch(Action::Navigate(page))
    }

    /// Waits for the next request to finish and applies it.
    ///
    /// Returns `false` right away when nothing is in flight.
    pub async fn next_completion(&mut self) -> Result<bool, ViewError> {
        if self.in_flight == 0 {
            return Ok(false);
        }
        match self.rx.recv().await {
            Some(action) => {
                self.in_flight -= 1;
                self.dispatch(action)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Applies completions until no request is left in flight.
    pub async fn settle(&mut self) -> Result<(), ViewError> {
        while self.next_completion().await? {}
        Ok(())
    }

    /// The markup of whatever the user is looking at: the notice when one is
    /// up, otherwise the rendered container of the active page. Form pages
    /// have no rendered content.
    pub fn visible_html(&self) -> Result<String, ViewError> {
        let container = if self.app.notice.is_some() {
            Container::Notice
        } else {
            match self.app.active_page() {
                Page::QuestionIndex => Container::QuestionList,
                Page::QuestionShow => Container::QuestionDetail,
                Page::QuestionNew | Page::QuestionEdit | Page::SessionNew => {
                    return Ok(String::new());
                }
            }
        };
        Ok(self.app.document.inner_html(container)?.to_string())
    }

    fn spawn(&mut self, effect: Effect) {
        info!("Spawning request: {:?}", effect);
        self.in_flight += 1;
        let gateway = self.gateway.clone();
        let tx = self.tx.clone();

        tokio::spawn(async move {
            let action = run_effect(gateway.as_ref(), effect).await;
            if tx.send(action).is_err() {
                warn!("Failed to deliver completion: controller dropped");
            }
        });
    }
}

async fn run_effect(gateway: &dyn Gateway, effect: Effect) -> Action {
    match effect {
        Effect::FetchQuestions { generation } => Action::QuestionsLoaded {
            generation,
            result: gateway.list_questions().await,
        },
        Effect::FetchQuestion { id, generation } => Action::QuestionLoaded {
            generation,
            result: gateway.get_question(id).await,
        },
        Effect::FetchQuestionForEdit { id, generation } => Action::QuestionLoadedForEdit {
            generation,
            result: gateway.get_question(id).await,
        },
        Effect::CreateQuestion { fields, generation } => Action::QuestionCreated {
            generation,
            result: gateway.create_question(&fields).await,
        },
        Effect::UpdateQuestion {
            id,
            fields,
            generation,
        } => Action::QuestionUpdated {
            generation,
            result: gateway.update_question(id, &fields).await,
        },
        Effect::Login {
            credentials,
            generation,
        } => Action::LoggedIn {
            generation,
            result: gateway.login(&credentials).await,
        },
    }
}

fn validate(document: &Document) -> Result<(), ViewError> {
    for page in Page::ALL {
        if !document.has_page(page.id()) {
            return Err(ViewError::ElementMissing(format!(".page#{}", page.id())));
        }
    }
    for container in Container::ALL {
        if !document.has_container(container) {
            return Err(ViewError::ElementMissing(container.selector().to_string()));
        }
    }
    for (form, fields) in FORM_FIELDS {
        let found = document.form(form)?;
        if let Some(name) = fields.iter().find(|name| !found.has_field(name)) {
            return Err(ViewError::ElementMissing(format!(
                "{} [name={name}]",
                form.selector()
            )));
        }
    }
    Ok(())
}
