//! Markup for the question list, the question detail and the notice slot.
//!
//! Templates are askama with the `html` extension, so every `{{ }}` is escaped.
//! Each render is a full replace of its container.

use askama::Template;

use super::document::{Container, Document, ViewError};
use crate::api::Question;

/// A dismissible message shown above the current page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
}

impl Notice {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

struct ListEntry<'a> {
    id: String,
    title: &'a str,
}

#[derive(Template)]
#[template(
    ext = "html",
    source = r#"{% for q in entries %}
<li>
    <span>{{ q.id }}</span>
    <a class="question-link" data-id="{{ q.id }}" href="">{{ q.title }}</a>
</li>
{%- endfor %}"#
)]
struct QuestionListTemplate<'a> {
    entries: Vec<ListEntry<'a>>,
}

#[derive(Template)]
#[template(
    ext = "html",
    source = r#"<h1>{{ title }}</h1>
<p>{{ body }}</p>
<small>Asked by: {{ author }}</small>
<a class="link" data-target="question-edit" data-id="{{ id }}" href="">Edit</a>
<h3>Answers</h3>
<ul>
{%- for answer in answers %}
    <li>{{ answer }}</li>
{%- endfor %}
</ul>"#
)]
struct QuestionDetailTemplate<'a> {
    id: String,
    title: &'a str,
    body: &'a str,
    author: &'a str,
    answers: Vec<&'a str>,
}

#[derive(Template)]
#[template(
    ext = "html",
    source = r#"<div class="notice" role="alert">
    <span>{{ message }}</span>
    <button class="dismiss" data-action="dismiss-notice">Dismiss</button>
</div>"#
)]
struct NoticeTemplate<'a> {
    message: &'a str,
}

pub fn question_list_html(questions: &[Question]) -> Result<String, ViewError> {
    let template = QuestionListTemplate {
        entries: questions
            .iter()
            .map(|q| ListEntry {
                id: q.id.to_string(),
                title: &q.title,
            })
            .collect(),
    };
    Ok(template.render()?)
}

pub fn question_detail_html(question: &Question) -> Result<String, ViewError> {
    let template = QuestionDetailTemplate {
        id: question.id.to_string(),
        title: &question.title,
        body: &question.body,
        author: question.author_name(),
        answers: question.answers.iter().map(|a| a.body.as_str()).collect(),
    };
    Ok(template.render()?)
}

pub fn notice_html(notice: &Notice) -> Result<String, ViewError> {
    Ok(NoticeTemplate {
        message: &notice.message,
    }
    .render()?)
}

pub fn render_question_list(doc: &mut Document, questions: &[Question]) -> Result<(), ViewError> {
    let html = question_list_html(questions)?;
    doc.set_inner_html(Container::QuestionList, html)
}

pub fn render_question_detail(doc: &mut Document, question: &Question) -> Result<(), ViewError> {
    let html = question_detail_html(question)?;
    doc.set_inner_html(Container::QuestionDetail, html)
}

/// Shows `notice`, or empties the slot when `None`.
pub fn render_notice(doc: &mut Document, notice: Option<&Notice>) -> Result<(), ViewError> {
    let html = match notice {
        Some(notice) => notice_html(notice)?,
        None => String::new(),
    };
    doc.set_inner_html(Container::Notice, html)
}
