use std::fmt;
use std::str::FromStr;

/// Page sections the client can show. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Page {
    QuestionIndex,
    QuestionShow,
    QuestionNew,
    QuestionEdit,
    SessionNew,
}

impl Page {
    pub const ALL: [Page; 5] = [
        Page::QuestionIndex,
        Page::QuestionShow,
        Page::QuestionNew,
        Page::QuestionEdit,
        Page::SessionNew,
    ];

    /// The element id of the page section (and the navbar `data-target`).
    pub fn id(self) -> &'static str {
        match self {
            Page::QuestionIndex => "question-index",
            Page::QuestionShow => "question-show",
            Page::QuestionNew => "question-new",
            Page::QuestionEdit => "question-edit",
            Page::SessionNew => "session-new",
        }
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownPage(pub String);

impl fmt::Display for UnknownPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown page: {}", self.0)
    }
}

impl std::error::Error for UnknownPage {}

impl FromStr for Page {
    type Err = UnknownPage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Page::ALL
            .into_iter()
            .find(|p| p.id() == s)
            .ok_or_else(|| UnknownPage(s.to_string()))
    }
}
