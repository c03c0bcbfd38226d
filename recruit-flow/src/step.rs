use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind of control a caller should present for a step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputClass {
    /// Free text, accepted verbatim
    FreeText,
    /// Constrained two-option Yes/No choice
    Choice,
    /// Several values picked from a list
    MultiSelect,
}

/// One node of the filter-collection dialogue.
///
/// Some steps are only visited on a "Yes" branch. `Complete` is the terminal
/// marker and accepts no input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepId {
    Role,
    Experience,
    Skills,
    TopTier,
    EmployersRequired,
    EmployerList,
    InstitutesRequired,
    InstituteName,
    BatchRequired,
    BatchYear,
    ConsultantOnly,
    TenureRequired,
    TenureCompany,
    TenureYears,
    Complete,
}

pub const CHOICE_OPTIONS: [&str; 2] = ["Yes", "No"];

/// Skills offered by the multi-select control. Callers may still submit others.
pub const SKILL_SUGGESTIONS: [&str; 16] = [
    "Java",
    "Python",
    "JavaScript",
    "TypeScript",
    "Go",
    "Rust",
    "C++",
    "React",
    "Node.js",
    "Spring Boot",
    "Django",
    "SQL",
    "AWS",
    "Docker",
    "Kubernetes",
    "Machine Learning",
];

impl StepId {
    /// Every step, terminal marker included
    pub const ALL: [StepId; 15] = [
        StepId::Role,
        StepId::Experience,
        StepId::Skills,
        StepId::TopTier,
        StepId::EmployersRequired,
        StepId::EmployerList,
        StepId::InstitutesRequired,
        StepId::InstituteName,
        StepId::BatchRequired,
        StepId::BatchYear,
        StepId::ConsultantOnly,
        StepId::TenureRequired,
        StepId::TenureCompany,
        StepId::TenureYears,
        StepId::Complete,
    ];

    pub fn initial() -> Self {
        StepId::Role
    }

    pub fn is_terminal(self) -> bool {
        self == StepId::Complete
    }

    /// Input class expected while this step is current. `None` for the terminal marker.
    pub fn input_class(self) -> Option<InputClass> {
        match self {
            StepId::Role
            | StepId::Experience
            | StepId::EmployerList
            | StepId::InstituteName
            | StepId::BatchYear
            | StepId::TenureCompany
            | StepId::TenureYears => Some(InputClass::FreeText),
            StepId::Skills => Some(InputClass::MultiSelect),
            StepId::TopTier
            | StepId::EmployersRequired
            | StepId::InstitutesRequired
            | StepId::BatchRequired
            | StepId::ConsultantOnly
            | StepId::TenureRequired => Some(InputClass::Choice),
            StepId::Complete => None,
        }
    }

    /// Options a caller can render for this step's control
    pub fn options(self) -> Vec<String> {
        match self.input_class() {
            Some(InputClass::Choice) => CHOICE_OPTIONS.iter().map(|s| s.to_string()).collect(),
            Some(InputClass::MultiSelect) => {
                SKILL_SUGGESTIONS.iter().map(|s| s.to_string()).collect()
            }
            _ => Vec::new(),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StepId::Role => "role",
            StepId::Experience => "experience",
            StepId::Skills => "skills",
            StepId::TopTier => "top_tier",
            StepId::EmployersRequired => "employers_required",
            StepId::EmployerList => "employer_list",
            StepId::InstitutesRequired => "institutes_required",
            StepId::InstituteName => "institute_name",
            StepId::BatchRequired => "batch_required",
            StepId::BatchYear => "batch_year",
            StepId::ConsultantOnly => "consultant_only",
            StepId::TenureRequired => "tenure_required",
            StepId::TenureCompany => "tenure_company",
            StepId::TenureYears => "tenure_years",
            StepId::Complete => "complete",
        }
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
