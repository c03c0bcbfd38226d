//! The recruiter filter dialogue.
//!
//! ```text
//! Role -> Experience -> Skills -> TopTier -> EmployersRequired
//! EmployersRequired  --yes--> EmployerList --> InstitutesRequired
//!                    --no---------------------> InstitutesRequired
//! InstitutesRequired --yes--> InstituteName --> BatchRequired
//!                    --no----------------------> BatchRequired
//! BatchRequired      --yes--> BatchYear --> ConsultantOnly
//!                    --no------------------> ConsultantOnly
//! ConsultantOnly --> TenureRequired
//! TenureRequired     --yes--> TenureCompany --> TenureYears --> Complete
//!                    --no-------------------------------------> Complete
//! ```

use crate::{
    answers::PartialAnswers,
    input::{UserInput, split_list},
    step::StepId,
    transition::{Transition, TransitionTable, TransitionTableBuilder},
};

pub const GREETING: &str = "Hi! I'll help you narrow down the right candidates. What role are you hiring for?";
pub const ASK_EXPERIENCE: &str = "How many years of experience should the candidate have?";
pub const ASK_SKILLS: &str = "Which skills are you looking for? Pick all that apply.";
pub const ASK_TOP_TIER: &str = "Do you prefer candidates from top-tier institutes or companies?";
pub const ASK_EMPLOYERS_REQUIRED: &str = "Should the candidate have worked at specific companies?";
pub const ASK_EMPLOYER_LIST: &str = "Which companies? Separate names with commas.";
pub const ASK_INSTITUTES_REQUIRED: &str = "Are you looking for candidates from a specific institute?";
pub const ASK_INSTITUTE_NAME: &str = "Which institute?";
pub const ASK_BATCH_REQUIRED: &str = "Are you looking for a specific graduation batch?";
pub const ASK_BATCH_YEAR: &str = "Which graduation year?";
pub const ASK_CONSULTANT_ONLY: &str = "Should we only show consultants?";
pub const ASK_TENURE_REQUIRED: &str = "Should the candidate have spent a minimum tenure at a specific company?";
pub const ASK_TENURE_COMPANY: &str = "Which company?";
pub const ASK_TENURE_YEARS: &str = "For how many years?";
pub const COMPLETED: &str = "Thanks! Applying your filters now.";
pub const FALLBACK: &str = "Sorry, I lost track of our conversation. Let's start over. What role are you hiring for?";

/// Builds the transition table for the recruiter dialogue
pub fn recruiter_table() -> TransitionTable {
    TransitionTableBuilder::new("recruiter_filters")
        .add_step(StepId::Role, &[StepId::Experience], |input, _| {
            Transition::new(
                StepId::Experience,
                ASK_EXPERIENCE,
                PartialAnswers::with_role(input.as_text()),
            )
        })
        .add_step(StepId::Experience, &[StepId::Skills], |input, _| {
            Transition::new(
                StepId::Skills,
                ASK_SKILLS,
                PartialAnswers::with_experience_years(input.as_text()),
            )
        })
        .add_step(StepId::Skills, &[StepId::TopTier], |input, _| {
            Transition::new(
                StepId::TopTier,
                ASK_TOP_TIER,
                PartialAnswers::with_skills(input.as_selection()),
            )
        })
        .add_step(StepId::TopTier, &[StepId::EmployersRequired], |input, _| {
            Transition::new(
                StepId::EmployersRequired,
                ASK_EMPLOYERS_REQUIRED,
                PartialAnswers::with_prefer_top_tier(input.as_choice()),
            )
        })
        .add_step(
            StepId::EmployersRequired,
            &[StepId::EmployerList, StepId::InstitutesRequired],
            |input, _| {
                branch(
                    input,
                    (StepId::EmployerList, ASK_EMPLOYER_LIST),
                    (StepId::InstitutesRequired, ASK_INSTITUTES_REQUIRED),
                )
            },
        )
        .add_step(StepId::EmployerList, &[StepId::InstitutesRequired], |input, _| {
            Transition::new(
                StepId::InstitutesRequired,
                ASK_INSTITUTES_REQUIRED,
                PartialAnswers::with_companies_worked_at(split_list(&input.as_text())),
            )
        })
        .add_step(
            StepId::InstitutesRequired,
            &[StepId::InstituteName, StepId::BatchRequired],
            |input, _| {
                branch(
                    input,
                    (StepId::InstituteName, ASK_INSTITUTE_NAME),
                    (StepId::BatchRequired, ASK_BATCH_REQUIRED),
                )
            },
        )
        .add_step(StepId::InstituteName, &[StepId::BatchRequired], |input, _| {
            Transition::new(
                StepId::BatchRequired,
                ASK_BATCH_REQUIRED,
                PartialAnswers::with_institute_name(input.as_text()),
            )
        })
        .add_step(
            StepId::BatchRequired,
            &[StepId::BatchYear, StepId::ConsultantOnly],
            |input, _| {
                branch(
                    input,
                    (StepId::BatchYear, ASK_BATCH_YEAR),
                    (StepId::ConsultantOnly, ASK_CONSULTANT_ONLY),
                )
            },
        )
        .add_step(StepId::BatchYear, &[StepId::ConsultantOnly], |input, _| {
            Transition::new(
                StepId::ConsultantOnly,
                ASK_CONSULTANT_ONLY,
                PartialAnswers::with_graduation_year(input.as_text()),
            )
        })
        .add_step(StepId::ConsultantOnly, &[StepId::TenureRequired], |input, _| {
            Transition::new(
                StepId::TenureRequired,
                ASK_TENURE_REQUIRED,
                PartialAnswers::with_consultant_only(input.as_choice()),
            )
        })
        .add_step(
            StepId::TenureRequired,
            &[StepId::TenureCompany, StepId::Complete],
            |input, _| {
                branch(
                    input,
                    (StepId::TenureCompany, ASK_TENURE_COMPANY),
                    (StepId::Complete, COMPLETED),
                )
            },
        )
        .add_step(StepId::TenureCompany, &[StepId::TenureYears], |input, _| {
            Transition::new(
                StepId::TenureYears,
                ASK_TENURE_YEARS,
                PartialAnswers::with_company_tenure_target(input.as_text()),
            )
        })
        .add_step(StepId::TenureYears, &[StepId::Complete], |input, _| {
            Transition::new(
                StepId::Complete,
                COMPLETED,
                PartialAnswers::with_tenure_years(input.as_text()),
            )
        })
        .build()
}

/// Gate question: records nothing, only picks the branch
fn branch(
    input: &UserInput,
    (yes_step, yes_prompt): (StepId, &str),
    (no_step, no_prompt): (StepId, &str),
) -> Transition {
    if input.as_choice() {
        Transition::goto(yes_step, yes_prompt)
    } else {
        Transition::goto(no_step, no_prompt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_is_total() {
        assert!(recruiter_table().missing_steps().is_empty());
    }

    #[test]
    fn test_every_step_is_reachable() {
        let reachable = recruiter_table().reachable_steps();
        for step in StepId::ALL {
            assert!(reachable.contains(&step), "{step} is unreachable");
        }
    }

    #[test]
    fn test_declared_successors_match_transitions() {
        let table = recruiter_table();
        let answers = PartialAnswers::default();
        let inputs = [
            UserInput::Choice(true),
            UserInput::Choice(false),
            UserInput::text("anything"),
            UserInput::selection(["Go"]),
        ];

        for step in StepId::ALL.into_iter().filter(|s| !s.is_terminal()) {
            for input in &inputs {
                let transition = table.apply(step, input, &answers).unwrap();
                assert!(
                    table.successors(step).contains(&transition.next),
                    "{step} went to undeclared {}",
                    transition.next
                );
            }
        }
    }

    #[test]
    fn test_gate_questions_record_nothing() {
        let table = recruiter_table();
        for step in [
            StepId::EmployersRequired,
            StepId::InstitutesRequired,
            StepId::BatchRequired,
            StepId::TenureRequired,
        ] {
            for choice in [true, false] {
                let transition = table
                    .apply(step, &UserInput::Choice(choice), &PartialAnswers::default())
                    .unwrap();
                assert!(transition.patch.is_empty());
            }
        }
    }

    #[test]
    fn test_employer_list_is_split_on_commas() {
        let transition = recruiter_table()
            .apply(
                StepId::EmployerList,
                &UserInput::text("google, amazon"),
                &PartialAnswers::default(),
            )
            .unwrap();
        assert_eq!(
            transition.patch.companies_worked_at,
            Some(vec!["google".to_string(), "amazon".to_string()])
        );
    }
}
