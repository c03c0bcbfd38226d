use serde::{Deserialize, Serialize};

/// Answers collected so far. `None` means the field was never asked or was skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialAnswers {
    pub role: Option<String>,
    pub experience_years: Option<String>,
    pub skills: Option<Vec<String>>,
    pub prefer_top_tier: Option<bool>,
    pub companies_worked_at: Option<Vec<String>>,
    pub institute_name: Option<String>,
    pub graduation_year: Option<String>,
    pub consultant_only: Option<bool>,
    pub company_tenure_target: Option<String>,
    pub tenure_years: Option<String>,
}

/// A patch has the same shape as the accumulator; set fields overwrite.
pub type AnswerPatch = PartialAnswers;

impl PartialAnswers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges `patch` into `self`. Every field the patch sets replaces the
    /// current value, lists included.
    pub fn merge(&mut self, patch: AnswerPatch) {
        let PartialAnswers {
            role,
            experience_years,
            skills,
            prefer_top_tier,
            companies_worked_at,
            institute_name,
            graduation_year,
            consultant_only,
            company_tenure_target,
            tenure_years,
        } = patch;

        overwrite(&mut self.role, role);
        overwrite(&mut self.experience_years, experience_years);
        overwrite(&mut self.skills, skills);
        overwrite(&mut self.prefer_top_tier, prefer_top_tier);
        overwrite(&mut self.companies_worked_at, companies_worked_at);
        overwrite(&mut self.institute_name, institute_name);
        overwrite(&mut self.graduation_year, graduation_year);
        overwrite(&mut self.consultant_only, consultant_only);
        overwrite(&mut self.company_tenure_target, company_tenure_target);
        overwrite(&mut self.tenure_years, tenure_years);
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    // Patch constructors used by transitions

    pub fn with_role(role: impl Into<String>) -> Self {
        Self {
            role: Some(role.into()),
            ..Self::default()
        }
    }

    pub fn with_experience_years(years: impl Into<String>) -> Self {
        Self {
            experience_years: Some(years.into()),
            ..Self::default()
        }
    }

    pub fn with_skills(skills: Vec<String>) -> Self {
        Self {
            skills: Some(skills),
            ..Self::default()
        }
    }

    pub fn with_prefer_top_tier(prefer: bool) -> Self {
        Self {
            prefer_top_tier: Some(prefer),
            ..Self::default()
        }
    }

    pub fn with_companies_worked_at(companies: Vec<String>) -> Self {
        Self {
            companies_worked_at: Some(companies),
            ..Self::default()
        }
    }

    pub fn with_institute_name(name: impl Into<String>) -> Self {
        Self {
            institute_name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn with_graduation_year(year: impl Into<String>) -> Self {
        Self {
            graduation_year: Some(year.into()),
            ..Self::default()
        }
    }

    pub fn with_consultant_only(consultant_only: bool) -> Self {
        Self {
            consultant_only: Some(consultant_only),
            ..Self::default()
        }
    }

    pub fn with_company_tenure_target(company: impl Into<String>) -> Self {
        Self {
            company_tenure_target: Some(company.into()),
            ..Self::default()
        }
    }

    pub fn with_tenure_years(years: impl Into<String>) -> Self {
        Self {
            tenure_years: Some(years.into()),
            ..Self::default()
        }
    }
}

fn overwrite<T>(slot: &mut Option<T>, value: Option<T>) {
    if value.is_some() {
        *slot = value;
    }
}
