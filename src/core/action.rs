//! # Actions
//!
//! Everything that can happen in the client becomes an `Action`.
//! User clicks a question? That's `Action::QuestionLinkClicked`.
//! The API answers? That's `Action::QuestionLoaded { .. }`.
//!
//! `update()` applies an action to the state and returns the `Effect`s the
//! controller has to run. No I/O here; requests happen elsewhere.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effects
//! ```

use log::{debug, info, warn};

use crate::api::{Credentials, GatewayError, NewQuestion, Question, QuestionId, QuestionPatch, Session};
use crate::core::page::Page;
use crate::core::state::App;
use crate::view::{FormId, NavLinkId, ViewError, render_question_detail, render_question_list};

#[derive(Debug)]
pub enum Action {
    // User interactions
    /// Click on a navbar link.
    NavbarClicked(NavLinkId),
    /// Navigation not triggered from the navbar.
    Navigate(Page),
    /// Click on an `a.question-link`; `data_id` is its `data-id`.
    QuestionLinkClicked { data_id: String },
    /// Click on the edit link of the detail view.
    EditLinkClicked { data_id: String },
    NewQuestionSubmitted,
    EditQuestionSubmitted,
    LoginSubmitted,
    DismissNotice,

    // Completions
    QuestionsLoaded {
        generation: u64,
        result: Result<Vec<Question>, GatewayError>,
    },
    QuestionLoaded {
        generation: u64,
        result: Result<Question, GatewayError>,
    },
    QuestionLoadedForEdit {
        generation: u64,
        result: Result<Question, GatewayError>,
    },
    QuestionCreated {
        generation: u64,
        result: Result<Question, GatewayError>,
    },
    QuestionUpdated {
        generation: u64,
        result: Result<Question, GatewayError>,
    },
    LoggedIn {
        generation: u64,
        result: Result<Session, GatewayError>,
    },
}

/// Gateway work requested by `update()`, tagged with the generation it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    FetchQuestions { generation: u64 },
    FetchQuestion { id: QuestionId, generation: u64 },
    FetchQuestionForEdit { id: QuestionId, generation: u64 },
    CreateQuestion { fields: NewQuestion, generation: u64 },
    UpdateQuestion { id: QuestionId, fields: QuestionPatch, generation: u64 },
    Login { credentials: Credentials, generation: u64 },
}

/// Applies `action` to `app`.
///
/// Gateway failures become a notice and leave the current page as it was.
/// A missing element is returned as an error.
pub fn update(app: &mut App, action: Action) -> Result<Vec<Effect>, ViewError> {
    match action {
        Action::NavbarClicked(link) => {
            let Some(target) = app.document.nav_link(link)?.target.clone() else {
                debug!("Navbar click on link without data-target ignored");
                return Ok(vec![]);
            };
            let page: Page = target
                .parse()
                .map_err(|_| ViewError::ElementMissing(format!(".page#{target}")))?;
            app.begin_navigation();
            app.navigate_to(page, Some(link))
        }
        Action::Navigate(page) => {
            app.begin_navigation();
            app.navigate_to(page, None)
        }
        Action::QuestionLinkClicked { data_id } => match data_id.parse::<QuestionId>() {
            Ok(id) => {
                let generation = app.begin_navigation();
                Ok(vec![Effect::FetchQuestion { id, generation }])
            }
            Err(_) => notice(app, format!("Invalid question id: {data_id:?}")),
        },
        Action::EditLinkClicked { data_id } => match data_id.parse::<QuestionId>() {
            Ok(id) => {
                let generation = app.begin_navigation();
                Ok(vec![Effect::FetchQuestionForEdit { id, generation }])
            }
            Err(_) => notice(app, format!("Invalid question id: {data_id:?}")),
        },
        Action::NewQuestionSubmitted => {
            let fields = NewQuestion {
                title: app.document.field(FormId::NewQuestion, "title")?,
                body: app.document.field(FormId::NewQuestion, "body")?,
            };
            let generation = app.begin_navigation();
            Ok(vec![Effect::CreateQuestion { fields, generation }])
        }
        Action::EditQuestionSubmitted => {
            let title = app.document.field(FormId::EditQuestion, "title")?;
            let body = app.document.field(FormId::EditQuestion, "body")?;
            let Some(current) = app.editing.clone() else {
                return notice(app, "No question is loaded for editing");
            };
            let fields = QuestionPatch::diff(&current, &title, &body);
            let generation = app.begin_navigation();
            if fields.is_empty() {
                info!("Edit of question {} changed nothing, skipping update", current.id);
                app.editing = None;
                render_question_detail(&mut app.document, &current)?;
                return app.navigate_to(Page::QuestionShow, None);
            }
            Ok(vec![Effect::UpdateQuestion {
                id: current.id,
                fields,
                generation,
            }])
        }
        Action::LoginSubmitted => {
            let credentials = Credentials {
                email: app.document.field(FormId::Login, "email")?,
                password: app.document.field(FormId::Login, "password")?,
            };
            let generation = app.begin_navigation();
            Ok(vec![Effect::Login {
                credentials,
                generation,
            }])
        }
        Action::DismissNotice => {
            app.dismiss_notice()?;
            Ok(vec![])
        }

        Action::QuestionsLoaded { generation, result } => {
            if !current(app, generation, "question list") {
                return Ok(vec![]);
            }
            match result {
                Ok(questions) => {
                    info!("Rendering {} questions", questions.len());
                    render_question_list(&mut app.document, &questions)?;
                    Ok(vec![])
                }
                Err(e) => failed(app, "Could not load questions", e),
            }
        }
        Action::QuestionLoaded { generation, result } => {
            if !current(app, generation, "question") {
                return Ok(vec![]);
            }
            match result {
                Ok(question) => {
                    render_question_detail(&mut app.document, &question)?;
                    app.navigate_to(Page::QuestionShow, None)
                }
                Err(e) => failed(app, "Could not load question", e),
            }
        }
        Action::QuestionLoadedForEdit { generation, result } => {
            if !current(app, generation, "question for edit") {
                return Ok(vec![]);
            }
            match result {
                Ok(question) => {
                    app.document
                        .set_field(FormId::EditQuestion, "title", &question.title)?;
                    app.document
                        .set_field(FormId::EditQuestion, "body", &question.body)?;
                    app.editing = Some(question);
                    app.navigate_to(Page::QuestionEdit, None)
                }
                Err(e) => failed(app, "Could not load question", e),
            }
        }
        // Writes already happened server-side, so their outcome is reported
        // even when a newer navigation has started. Form state is only
        // cleared while it still belongs to the write.
        Action::QuestionCreated { generation, result } => match result {
            Ok(question) => {
                info!("Created question {}", question.id);
                if owns_form(app, generation, Page::QuestionNew) {
                    app.document.form_mut(FormId::NewQuestion)?.reset();
                }
                if !current(app, generation, "created question") {
                    return Ok(vec![]);
                }
                Ok(vec![Effect::FetchQuestion {
                    id: question.id,
                    generation,
                }])
            }
            Err(e) => failed(app, "Could not create question", e),
        },
        Action::QuestionUpdated { generation, result } => match result {
            Ok(question) => {
                info!("Updated question {}", question.id);
                if owns_form(app, generation, Page::QuestionEdit) {
                    app.editing = None;
                    app.document.form_mut(FormId::EditQuestion)?.reset();
                }
                if !current(app, generation, "updated question") {
                    return Ok(vec![]);
                }
                render_question_detail(&mut app.document, &question)?;
                app.navigate_to(Page::QuestionShow, None)
            }
            Err(e) => failed(app, "Could not update question", e),
        },
        Action::LoggedIn { generation, result } => match result {
            Ok(session) => {
                debug!("Session: {}", session);
                if owns_form(app, generation, Page::SessionNew) {
                    app.document.form_mut(FormId::Login)?.reset();
                }
                if !current(app, generation, "session") {
                    return Ok(vec![]);
                }
                app.navigate_to(Page::QuestionIndex, None)
            }
            Err(e) => failed(app, "Sign in failed", e),
        },
    }
}

fn current(app: &App, generation: u64, what: &str) -> bool {
    let current = app.is_current(generation);
    if !current {
        debug!(
            "Discarding stale {} (generation {}, now {})",
            what,
            generation,
            app.generation()
        );
    }
    current
}

/// A write owns the form on `page` unless a newer navigation has started
/// and the user is back on that page filling it in again.
fn owns_form(app: &App, generation: u64, page: Page) -> bool {
    generation == app.generation() || app.active_page() != page
}

fn notice(app: &mut App, message: impl Into<String>) -> Result<Vec<Effect>, ViewError> {
    app.show_notice(message)?;
    Ok(vec![])
}

fn failed(app: &mut App, context: &str, error: GatewayError) -> Result<Vec<Effect>, ViewError> {
    warn!("{}: {}", context, error);
    notice(app, format!("{context}: {error}"))
}
