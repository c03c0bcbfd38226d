use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::answers::PartialAnswers;

/// Search criteria handed to the resume search. Field names are fixed by the
/// search API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Filter {
    pub role: String,
    pub experience_years: String,
    pub skills: Vec<String>,
    pub prefer_top_tier: bool,
    pub companies_worked_at: Vec<String>,
    pub institute_name: String,
    pub graduation_year: String,
    pub consultant_only: bool,
    pub company_tenure_target: String,
    pub tenure_years: String,
}

/// Converts collected answers into a [`Filter`].
///
/// Absent fields take their default. Company names are trimmed and upper-cased,
/// and empty entries are dropped. Everything else is passed through as entered.
pub fn materialize(answers: &PartialAnswers) -> Filter {
    Filter {
        role: answers.role.clone().unwrap_or_default(),
        experience_years: answers.experience_years.clone().unwrap_or_default(),
        skills: answers.skills.clone().unwrap_or_default(),
        prefer_top_tier: answers.prefer_top_tier.unwrap_or(false),
        companies_worked_at: answers
            .companies_worked_at
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(|company| company.trim())
            .filter(|company| !company.is_empty())
            .map(str::to_uppercase)
            .collect(),
        institute_name: answers.institute_name.clone().unwrap_or_default(),
        graduation_year: answers.graduation_year.clone().unwrap_or_default(),
        consultant_only: answers.consultant_only.unwrap_or(false),
        company_tenure_target: answers.company_tenure_target.clone().unwrap_or_default(),
        tenure_years: answers.tenure_years.clone().unwrap_or_default(),
    }
}

impl Filter {
    /// Writes every filter field over `target`, keeping keys the filter does not own.
    pub fn merge_into(&self, target: &mut Map<String, Value>) {
        if let Ok(Value::Object(fields)) = serde_json::to_value(self) {
            target.extend(fields);
        }
    }
}

impl From<&PartialAnswers> for Filter {
    fn from(answers: &PartialAnswers) -> Self {
        materialize(answers)
    }
}
