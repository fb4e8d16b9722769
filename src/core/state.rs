//! # Application State
//!
//! ```text
//! App
//! ├── document: Document          // the page surface we render into
//! ├── active_page: Page           // written only by navigate_to()
//! ├── generation: u64             // bumped on every user-initiated navigation
//! ├── race_policy: RacePolicy     // what to do with stale completions
//! ├── notice: Option<Notice>      // visible error, until dismissed
//! └── editing: Option<Question>   // question loaded into the edit form
//! ```
//!
//! State changes happen through `update(state, action)` in action.rs.

use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::api::Question;
use crate::core::action::Effect;
use crate::core::page::Page;
use crate::view::{Document, NavLinkId, Notice, ViewError, render_notice};

/// How completions that belong to an earlier navigation are treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RacePolicy {
    /// Completions issued before the latest navigation are dropped.
    #[default]
    LastNavigationWins,
    /// Every completion is applied; whichever resolves last is what shows.
    LastCompletionWins,
}

impl FromStr for RacePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "last-navigation-wins" => Ok(RacePolicy::LastNavigationWins),
            "last-completion-wins" => Ok(RacePolicy::LastCompletionWins),
            other => Err(format!("unknown race policy: {other}")),
        }
    }
}

impl fmt::Display for RacePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RacePolicy::LastNavigationWins => f.write_str("last-navigation-wins"),
            RacePolicy::LastCompletionWins => f.write_str("last-completion-wins"),
        }
    }
}

pub struct App {
    pub document: Document,
    active_page: Page,
    generation: u64,
    pub race_policy: RacePolicy,
    pub notice: Option<Notice>,
    pub editing: Option<Question>,
}

impl App {
    /// Takes over `document` and shows the index page.
    pub fn new(mut document: Document, race_policy: RacePolicy) -> Result<Self, ViewError> {
        document.activate_page(Page::QuestionIndex.id())?;
        Ok(Self {
            document,
            active_page: Page::QuestionIndex,
            generation: 0,
            race_policy,
            notice: None,
            editing: None,
        })
    }

    pub fn active_page(&self) -> Page {
        self.active_page
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Starts a new user-initiated navigation and returns its generation.
    pub fn begin_navigation(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    /// Whether a completion issued under `generation` should still be applied.
    pub fn is_current(&self, generation: u64) -> bool {
        match self.race_policy {
            RacePolicy::LastCompletionWins => true,
            RacePolicy::LastNavigationWins => generation == self.generation,
        }
    }

    /// Switches the visible page.
    ///
    /// Going to the index also asks for a list refresh; the switch does not
    /// wait for it. With `origin` set the navbar highlight moves to that link,
    /// programmatic navigation leaves the navbar alone.
    pub fn navigate_to(
        &mut self,
        page: Page,
        origin: Option<NavLinkId>,
    ) -> Result<Vec<Effect>, ViewError> {
        if let Some(link) = origin {
            self.document.nav_link(link)?;
        }

        let mut effects = Vec::new();
        if page == Page::QuestionIndex {
            effects.push(Effect::FetchQuestions {
                generation: self.generation,
            });
        }

        self.document.activate_page(page.id())?;
        self.active_page = page;

        if let Some(link) = origin {
            self.document.highlight_nav_link(link)?;
        }

        info!("Navigated to {} (generation {})", page, self.generation);
        Ok(effects)
    }

    pub fn show_notice(&mut self, message: impl Into<String>) -> Result<(), ViewError> {
        let notice = Notice::new(message);
        debug!("Showing notice: {}", notice.message);
        self.notice = Some(notice);
        render_notice(&mut self.document, self.notice.as_ref())
    }

    pub fn dismiss_notice(&mut self) -> Result<(), ViewError> {
        self.notice = None;
        render_notice(&mut self.document, None)
    }
}
