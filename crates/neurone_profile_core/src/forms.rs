//! crates/neurone_profile_core/src/forms.rs
//!
//! Validation rules for form definitions and the example form handed out
//! when a requested form does not exist.

use crate::domain::{FormQuestion, QuestionType, ScaleOptions, Validators};
use std::collections::HashSet;
use uuid::Uuid;

/// Name of the canned example form.
pub const EXAMPLE_FORM_NAME: &str = "example_file";

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FormValidationError {
    #[error("form name must not be empty")]
    EmptyName,
    #[error("form must contain at least one question")]
    NoQuestions,
    #[error("question {index} ({kind:?}) needs at least one non-empty choice")]
    MissingChoices { index: usize, kind: QuestionType },
    #[error("question {index} is a scale but has no scaleOptions")]
    MissingScale { index: usize },
    #[error("question {index} has an invalid scale: {reason}")]
    InvalidScale { index: usize, reason: &'static str },
    #[error("question {index} is a rating but needs at least one star")]
    MissingStars { index: usize },
    #[error("question {index} has minLength greater than maxLength")]
    LengthBounds { index: usize },
    #[error("question {index} ({kind:?}) cannot carry length validators")]
    LengthOnNonText { index: usize, kind: QuestionType },
    #[error("question name {0:?} is used more than once")]
    DuplicateName(String),
}

/// Checks a form definition before it is stored.
pub fn validate_form(
    form_name: &str,
    questions: &[FormQuestion],
) -> Result<(), FormValidationError> {
    if form_name.trim().is_empty() {
        return Err(FormValidationError::EmptyName);
    }
    if questions.is_empty() {
        return Err(FormValidationError::NoQuestions);
    }

    let mut names = HashSet::new();
    for (index, question) in questions.iter().enumerate() {
        validate_question(index, question)?;
        if let Some(name) = question.name.as_deref().filter(|n| !n.is_empty()) {
            if !names.insert(name) {
                return Err(FormValidationError::DuplicateName(name.to_string()));
            }
        }
    }
    Ok(())
}

fn validate_question(index: usize, question: &FormQuestion) -> Result<(), FormValidationError> {
    let kind = question.question_type;

    if kind.uses_choices() && !question.choices.iter().any(|c| !c.trim().is_empty()) {
        return Err(FormValidationError::MissingChoices { index, kind });
    }

    match kind {
        QuestionType::Scale => {
            let scale = question
                .scale_options
                .as_ref()
                .ok_or(FormValidationError::MissingScale { index })?;
            validate_scale(index, scale)?;
        }
        QuestionType::Rating => {
            if question.stars.unwrap_or(0) == 0 {
                return Err(FormValidationError::MissingStars { index });
            }
        }
        _ => {}
    }

    let Validators {
        min_length,
        max_length,
        ..
    } = &question.validators;
    if (min_length.is_some() || max_length.is_some()) && !kind.is_text() {
        return Err(FormValidationError::LengthOnNonText { index, kind });
    }
    if let (Some(min), Some(max)) = (min_length, max_length) {
        if min > max {
            return Err(FormValidationError::LengthBounds { index });
        }
    }
    Ok(())
}

fn validate_scale(index: usize, scale: &ScaleOptions) -> Result<(), FormValidationError> {
    if !(scale.min.is_finite() && scale.max.is_finite() && scale.step.is_finite()) {
        return Err(FormValidationError::InvalidScale {
            index,
            reason: "bounds must be finite numbers",
        });
    }
    if scale.min >= scale.max {
        return Err(FormValidationError::InvalidScale {
            index,
            reason: "min must be lower than max",
        });
    }
    if scale.step <= 0.0 || scale.step > scale.max - scale.min {
        return Err(FormValidationError::InvalidScale {
            index,
            reason: "step must be positive and fit within the range",
        });
    }
    Ok(())
}

fn question(question_type: QuestionType, title: &str, hint: &str, name: &str) -> FormQuestion {
    FormQuestion {
        question_type,
        title: Some(title.to_string()),
        hint: Some(hint.to_string()),
        name: Some(name.to_string()),
        value: None,
        placeholder: None,
        rows: None,
        choices: Vec::new(),
        stars: None,
        scale_options: None,
        validators: Validators::default(),
    }
}

fn choices(items: &[&str]) -> Vec<String> {
    items.iter().map(|c| c.to_string()).collect()
}

/// Questions of the example form, one of each type.
pub fn example_questions() -> Vec<FormQuestion> {
    vec![
        FormQuestion {
            validators: Validators {
                required: true,
                min_length: Some(10),
                max_length: Some(20),
            },
            ..question(
                QuestionType::Input,
                "Form name not found in database! An example form has been sent.",
                "Example Hint",
                "inputExample",
            )
        },
        FormQuestion {
            placeholder: Some("This is a placeholder.".to_string()),
            rows: Some(4),
            validators: Validators {
                required: false,
                min_length: Some(2),
                max_length: None,
            },
            ..question(QuestionType::Paragraph, "Example Title", "Example Hint", "paraExample")
        },
        FormQuestion {
            choices: choices(&["Example 1", "Option 2", "Select 3"]),
            ..question(
                QuestionType::Checkbox,
                "Example Checkboxes",
                "Example Hint",
                "checkboxExample",
            )
        },
        FormQuestion {
            choices: choices(&["Example 1", "Example 2", "Example 3"]),
            ..question(QuestionType::Radio, "Example Title", "Example Hint", "radioExample")
        },
        FormQuestion {
            choices: choices(&["Example 1", "Example 2", "Example 3"]),
            validators: Validators {
                required: true,
                ..Validators::default()
            },
            ..question(QuestionType::Dropdown, "Pick An option", "Example Hint", "dropdownExample")
        },
        question(
            QuestionType::Datepicker,
            "Choose a Date",
            "Could be your birthday!",
            "dateExample",
        ),
        FormQuestion {
            scale_options: Some(ScaleOptions {
                min: 0.0,
                max: 100.0,
                step: 50.0,
                min_label: Some("bad".to_string()),
                max_label: Some("life saving".to_string()),
            }),
            validators: Validators {
                required: true,
                ..Validators::default()
            },
            ..question(QuestionType::Scale, "Rate this question", "Pick anything!", "scaleExample")
        },
        FormQuestion {
            stars: Some(6),
            validators: Validators {
                required: true,
                ..Validators::default()
            },
            ..question(QuestionType::Rating, "How many stars?", "Pick anything!", "ratingExample")
        },
    ]
}

/// The form returned in place of one that is not stored. It is never
/// persisted, so its id is nil.
pub fn example_form() -> crate::domain::Form {
    crate::domain::Form {
        id: Uuid::nil(),
        form_name: EXAMPLE_FORM_NAME.to_string(),
        questions: example_questions(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> FormQuestion {
        question(QuestionType::Input, "t", "h", "q1")
    }

    #[test]
    fn example_form_is_valid_and_covers_every_type() {
        let form = example_form();
        validate_form(&form.form_name, &form.questions).unwrap();
        let kinds: HashSet<_> = form.questions.iter().map(|q| q.question_type).collect();
        assert_eq!(kinds.len(), 8);
    }

    #[test]
    fn rejects_blank_name_and_empty_form() {
        assert_eq!(validate_form("  ", &[input()]), Err(FormValidationError::EmptyName));
        assert_eq!(validate_form("f", &[]), Err(FormValidationError::NoQuestions));
    }

    #[test]
    fn choice_questions_need_choices() {
        let q = FormQuestion {
            choices: vec![" ".into()],
            ..question(QuestionType::Radio, "t", "h", "r")
        };
        assert!(matches!(
            validate_form("f", &[q]),
            Err(FormValidationError::MissingChoices { index: 0, .. })
        ));
    }

    #[test]
    fn scale_bounds_are_checked() {
        let mut q = question(QuestionType::Scale, "t", "h", "s");
        assert_eq!(
            validate_form("f", &[q.clone()]),
            Err(FormValidationError::MissingScale { index: 0 })
        );

        q.scale_options = Some(ScaleOptions {
            min: 5.0,
            max: 5.0,
            step: 1.0,
            min_label: None,
            max_label: None,
        });
        assert!(matches!(
            validate_form("f", &[q.clone()]),
            Err(FormValidationError::InvalidScale { .. })
        ));

        q.scale_options = Some(ScaleOptions {
            min: 0.0,
            max: 10.0,
            step: 11.0,
            min_label: None,
            max_label: None,
        });
        assert!(matches!(
            validate_form("f", &[q]),
            Err(FormValidationError::InvalidScale { .. })
        ));
    }

    #[test]
    fn rating_needs_stars() {
        let q = FormQuestion {
            stars: Some(0),
            ..question(QuestionType::Rating, "t", "h", "r")
        };
        assert_eq!(
            validate_form("f", &[q]),
            Err(FormValidationError::MissingStars { index: 0 })
        );
    }

    #[test]
    fn length_validators_only_on_text_and_ordered() {
        let inverted = FormQuestion {
            validators: Validators {
                required: false,
                min_length: Some(9),
                max_length: Some(3),
            },
            ..input()
        };
        assert_eq!(
            validate_form("f", &[inverted]),
            Err(FormValidationError::LengthBounds { index: 0 })
        );

        let on_date = FormQuestion {
            validators: Validators {
                required: false,
                min_length: Some(1),
                max_length: None,
            },
            ..question(QuestionType::Datepicker, "t", "h", "d")
        };
        assert!(matches!(
            validate_form("f", &[on_date]),
            Err(FormValidationError::LengthOnNonText { .. })
        ));
    }

    #[test]
    fn question_names_must_be_unique() {
        assert_eq!(
            validate_form("f", &[input(), input()]),
            Err(FormValidationError::DuplicateName("q1".into()))
        );
    }
}
