use serde::{Deserialize, Serialize};

/// Raw input submitted for the current step.
///
/// The step decides how the input is read, so every variant can be viewed as
/// text, as a choice, or as a selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserInput {
    Text(String),
    Choice(bool),
    Selection(Vec<String>),
}

impl UserInput {
    pub fn text(text: impl Into<String>) -> Self {
        UserInput::Text(text.into())
    }

    /// Builds a choice from a "Yes"/"No" label
    pub fn choice(label: &str) -> Self {
        UserInput::Choice(is_yes(label))
    }

    pub fn selection<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        UserInput::Selection(items.into_iter().map(Into::into).collect())
    }

    pub fn as_text(&self) -> String {
        match self {
            UserInput::Text(text) => text.clone(),
            UserInput::Choice(choice) => choice_label(*choice).to_string(),
            UserInput::Selection(items) => items.join(", "),
        }
    }

    pub fn as_choice(&self) -> bool {
        match self {
            UserInput::Choice(choice) => *choice,
            UserInput::Text(text) => is_yes(text),
            UserInput::Selection(items) => items.first().map(|s| is_yes(s)).unwrap_or(false),
        }
    }

    pub fn as_selection(&self) -> Vec<String> {
        match self {
            UserInput::Selection(items) => items.clone(),
            UserInput::Text(text) => split_list(text),
            UserInput::Choice(choice) => vec![choice_label(*choice).to_string()],
        }
    }

    /// Text recorded in the transcript for this input
    pub fn display(&self) -> String {
        self.as_text()
    }
}

impl From<&str> for UserInput {
    fn from(text: &str) -> Self {
        UserInput::Text(text.to_string())
    }
}

impl From<String> for UserInput {
    fn from(text: String) -> Self {
        UserInput::Text(text)
    }
}

impl From<bool> for UserInput {
    fn from(choice: bool) -> Self {
        UserInput::Choice(choice)
    }
}

impl From<Vec<String>> for UserInput {
    fn from(items: Vec<String>) -> Self {
        UserInput::Selection(items)
    }
}

impl From<Vec<&str>> for UserInput {
    fn from(items: Vec<&str>) -> Self {
        UserInput::selection(items)
    }
}

fn is_yes(label: &str) -> bool {
    label.trim().eq_ignore_ascii_case("yes")
}

fn choice_label(choice: bool) -> &'static str {
    if choice { "Yes" } else { "No" }
}

/// Splits a comma-separated list, trimming entries and dropping empty ones
pub fn split_list(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}
