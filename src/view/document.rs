//! # Document
//!
//! The page surface the client renders into, modelled the way a browser DOM
//! is used by a single-page app:
//!
//! ```text
//! Document
//! ├── pages: Vec<PageElement>       // <section class="page" id=..>
//! ├── navbar: Vec<NavLink>          // .navbar a[data-target]
//! ├── containers: HashMap           // ul.question-list, #question-show, notice
//! └── forms: HashMap                // new / edit question, login
//! ```
//!
//! Every lookup of an element that isn't there is a `ViewError::ElementMissing`.

use std::collections::HashMap;
use std::fmt;

/// Errors raised by the view layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewError {
    /// A referenced element does not exist in the document.
    ElementMissing(String),
    /// A template failed to render.
    Template(String),
}

impl fmt::Display for ViewError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewError::ElementMissing(what) => write!(f, "missing element: {what}"),
            ViewError::Template(msg) => write!(f, "template error: {msg}"),
        }
    }
}

impl std::error::Error for ViewError {}

impl From<askama::Error> for ViewError {
    fn from(e: askama::Error) -> Self {
        ViewError::Template(e.to_string())
    }
}

/// Render targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Container {
    /// `ul.question-list`
    QuestionList,
    /// `#question-show`
    QuestionDetail,
    /// The dismissible alert slot.
    Notice,
}

impl Container {
    pub const ALL: [Container; 3] = [
        Container::QuestionList,
        Container::QuestionDetail,
        Container::Notice,
    ];

    pub fn selector(self) -> &'static str {
        match self {
            Container::QuestionList => "ul.question-list",
            Container::QuestionDetail => "#question-show",
            Container::Notice => "#notice",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormId {
    NewQuestion,
    EditQuestion,
    Login,
}

impl FormId {
    pub const ALL: [FormId; 3] = [FormId::NewQuestion, FormId::EditQuestion, FormId::Login];

    pub fn selector(self) -> &'static str {
        match self {
            FormId::NewQuestion => "#new-question-form",
            FormId::EditQuestion => "#edit-question-form",
            FormId::Login => "#new-session-form",
        }
    }
}

/// Handle to a navbar link, stable for the lifetime of the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NavLinkId(pub usize);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageElement {
    pub id: String,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavLink {
    pub label: String,
    /// `data-target`; links without one are not navigation links.
    pub target: Option<String>,
    pub active: bool,
}

/// A form's named fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Form {
    fields: Vec<(String, String)>,
}

impl Form {
    pub fn with_fields(names: &[&str]) -> Self {
        Self {
            fields: names.iter().map(|n| (n.to_string(), String::new())).collect(),
        }
    }

    pub fn value(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn set(&mut self, name: &str, value: &str) -> bool {
        match self.fields.iter_mut().find(|(n, _)| n == name) {
            Some((_, v)) => {
                *v = value.to_string();
                true
            }
            None => false,
        }
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.fields.iter().any(|(n, _)| n == name)
    }

    /// Clears every field, like `HTMLFormElement.reset()` on an empty form.
    pub fn reset(&mut self) {
        for (_, v) in &mut self.fields {
            v.clear();
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Document {
    pages: Vec<PageElement>,
    navbar: Vec<NavLink>,
    containers: HashMap<Container, String>,
    forms: HashMap<FormId, Form>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// The layout the client ships with: every page, the navbar, all
    /// containers and forms. The index page starts out active.
    pub fn standard() -> Self {
        let mut doc = Self::new()
            .with_page("question-index")
            .with_page("question-show")
            .with_page("question-new")
            .with_page("question-edit")
            .with_page("session-new")
            .with_nav_link("Questions", Some("question-index"))
            .with_nav_link("Ask", Some("question-new"))
            .with_nav_link("Sign In", Some("session-new"))
            .with_form(FormId::NewQuestion, Form::with_fields(&["title", "body"]))
            .with_form(FormId::EditQuestion, Form::with_fields(&["title", "body"]))
            .with_form(FormId::Login, Form::with_fields(&["email", "password"]));
        for container in Container::ALL {
            doc = doc.with_container(container);
        }
        doc.pages[0].active = true;
        doc
    }

    pub fn with_page(mut self, id: &str) -> Self {
        self.pages.push(PageElement {
            id: id.to_string(),
            active: false,
        });
        self
    }

    pub fn with_nav_link(mut self, label: &str, target: Option<&str>) -> Self {
        self.navbar.push(NavLink {
            label: label.to_string(),
            target: target.map(str::to_string),
            active: false,
        });
        self
    }

    pub fn with_container(mut self, container: Container) -> Self {
        self.containers.insert(container, String::new());
        self
    }

    pub fn with_form(mut self, id: FormId, form: Form) -> Self {
        self.forms.insert(id, form);
        self
    }

    // ------------------------------------------------------------------
    // Pages
    // ------------------------------------------------------------------

    pub fn pages(&self) -> &[PageElement] {
        &self.pages
    }

    pub fn has_page(&self, id: &str) -> bool {
        self.pages.iter().any(|p| p.id == id)
    }

    /// Ids of every page currently carrying the active marker.
    pub fn active_pages(&self) -> Vec<&str> {
        self.pages
            .iter()
            .filter(|p| p.active)
            .map(|p| p.id.as_str())
            .collect()
    }

    /// Deactivates every page, then activates `id`.
    ///
    /// The lookup happens first, so a missing page leaves the markers untouched.
    pub fn activate_page(&mut self, id: &str) -> Result<(), ViewError> {
        let index = self
            .pages
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| ViewError::ElementMissing(format!(".page#{id}")))?;
        for page in &mut self.pages {
            page.active = false;
        }
        self.pages[index].active = true;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Navbar
    // ------------------------------------------------------------------

    pub fn nav_links(&self) -> &[NavLink] {
        &self.navbar
    }

    pub fn nav_link(&self, id: NavLinkId) -> Result<&NavLink, ViewError> {
        self.navbar
            .get(id.0)
            .ok_or_else(|| ViewError::ElementMissing(format!(".navbar a:nth({})", id.0)))
    }

    /// Finds the first navbar link pointing at `target`.
    pub fn nav_link_for(&self, target: &str) -> Option<NavLinkId> {
        self.navbar
            .iter()
            .position(|l| l.target.as_deref() == Some(target))
            .map(NavLinkId)
    }

    pub fn highlight_nav_link(&mut self, id: NavLinkId) -> Result<(), ViewError> {
        self.nav_link(id)?;
        for link in &mut self.navbar {
            link.active = false;
        }
        self.navbar[id.0].active = true;
        Ok(())
    }

    pub fn active_nav_links(&self) -> Vec<NavLinkId> {
        self.navbar
            .iter()
            .enumerate()
            .filter(|(_, l)| l.active)
            .map(|(i, _)| NavLinkId(i))
            .collect()
    }

    // ------------------------------------------------------------------
    // Containers
    // ------------------------------------------------------------------

    pub fn has_container(&self, container: Container) -> bool {
        self.containers.contains_key(&container)
    }

    pub fn inner_html(&self, container: Container) -> Result<&str, ViewError> {
        self.containers
            .get(&container)
            .map(String::as_str)
            .ok_or_else(|| ViewError::ElementMissing(container.selector().to_string()))
    }

    /// Replaces the whole contents of `container`.
    pub fn set_inner_html(&mut self, container: Container, html: String) -> Result<(), ViewError> {
        let slot = self
            .containers
            .get_mut(&container)
            .ok_or_else(|| ViewError::ElementMissing(container.selector().to_string()))?;
        *slot = html;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Forms
    // ------------------------------------------------------------------

    pub fn has_form(&self, id: FormId) -> bool {
        self.forms.contains_key(&id)
    }

    pub fn form(&self, id: FormId) -> Result<&Form, ViewError> {
        self.forms
            .get(&id)
            .ok_or_else(|| ViewError::ElementMissing(id.selector().to_string()))
    }

    pub fn form_mut(&mut self, id: FormId) -> Result<&mut Form, ViewError> {
        self.forms
            .get_mut(&id)
            .ok_or_else(|| ViewError::ElementMissing(id.selector().to_string()))
    }

    /// Reads one field, failing if the form or the field is missing.
    pub fn field(&self, id: FormId, name: &str) -> Result<String, ViewError> {
        self.form(id)?
            .value(name)
            .map(str::to_string)
            .ok_or_else(|| ViewError::ElementMissing(format!("{} [name={name}]", id.selector())))
    }

    pub fn set_field(&mut self, id: FormId, name: &str, value: &str) -> Result<(), ViewError> {
        if self.form_mut(id)?.set(name, value) {
            Ok(())
        } else {
            Err(ViewError::ElementMissing(format!(
                "{} [name={name}]",
                id.selector()
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_document_starts_on_index() {
        let doc = Document::standard();
        assert_eq!(doc.active_pages(), vec!["question-index"]);
        assert!(doc.active_nav_links().is_empty());
        for container in Container::ALL {
            assert!(doc.has_container(container));
        }
    }

    #[test]
    fn test_activate_page_leaves_exactly_one_active() {
        let mut doc = Document::standard();
        doc.activate_page("question-new").unwrap();
        assert_eq!(doc.active_pages(), vec!["question-new"]);
        doc.activate_page("question-show").unwrap();
        assert_eq!(doc.active_pages(), vec!["question-show"]);
    }

    #[test]
    fn test_activate_missing_page_keeps_markers() {
        let mut doc = Document::standard();
        let err = doc.activate_page("question-delete").unwrap_err();
        assert_eq!(err, ViewError::ElementMissing(".page#question-delete".to_string()));
        assert_eq!(doc.active_pages(), vec!["question-index"]);
    }

    #[test]
    fn test_highlight_nav_link_moves_marker() {
        let mut doc = Document::standard();
        let ask = doc.nav_link_for("question-new").unwrap();
        let index = doc.nav_link_for("question-index").unwrap();
        doc.highlight_nav_link(ask).unwrap();
        doc.highlight_nav_link(index).unwrap();
        assert_eq!(doc.active_nav_links(), vec![index]);
        assert!(doc.highlight_nav_link(NavLinkId(99)).is_err());
    }

    #[test]
    fn test_missing_container_is_reported() {
        let mut doc = Document::new();
        let err = doc
            .set_inner_html(Container::QuestionList, "<li></li>".to_string())
            .unwrap_err();
        assert_eq!(err, ViewError::ElementMissing("ul.question-list".to_string()));
    }

    #[test]
    fn test_form_fields_and_reset() {
        let mut doc = Document::standard();
        doc.set_field(FormId::NewQuestion, "title", "T").unwrap();
        doc.set_field(FormId::NewQuestion, "body", "B").unwrap();
        assert_eq!(doc.field(FormId::NewQuestion, "title").unwrap(), "T");
        assert!(doc.set_field(FormId::NewQuestion, "tags", "x").is_err());

        doc.form_mut(FormId::NewQuestion).unwrap().reset();
        assert_eq!(doc.field(FormId::NewQuestion, "title").unwrap(), "");
        assert_eq!(doc.field(FormId::NewQuestion, "body").unwrap(), "");
    }
}
