//! Sequential question flow for the repository settings step

use std::collections::HashMap;

use super::state::RepositoryConfig;
use super::validation::{
    parse_boolean, validate_boolean, validate_description, validate_repository_name, Validator,
};
use crate::error::{Result, WizardError};

pub const REPOSITORY_NAME: &str = "repository_name";
pub const DESCRIPTION: &str = "description";
pub const VISIBILITY: &str = "visibility";
pub const CLONE_AFTER_CREATE: &str = "clone_after_create";
pub const ADD_README: &str = "add_readme";

pub const PRIVATE: &str = "private";
pub const PUBLIC: &str = "public";

/// How a question is answered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionKind {
    Text,
    Bool,
    Select,
}

#[derive(Debug, Clone)]
pub struct Question {
    pub id: &'static str,
    pub kind: QuestionKind,
    pub title: String,
    pub help_text: String,
    pub required: bool,
    pub default_value: String,
    /// Allowed values for [`QuestionKind::Select`]
    pub options: Vec<String>,
    pub validator: Option<Validator>,
}

impl Question {
    fn check(&self, value: &str) -> std::result::Result<(), String> {
        if self.kind == QuestionKind::Select && !self.options.iter().any(|o| o == value) {
            return Err(format!("choose one of: {}", self.options.join(", ")));
        }
        match self.validator {
            Some(validator) => validator(value),
            None => Ok(()),
        }
    }
}

/// The user's last submission for a question, valid or not
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answer {
    pub question_id: &'static str,
    pub value: String,
    pub is_valid: bool,
    pub error_message: Option<String>,
}

/// Fixed, ordered questions with per-question validation and revision
#[derive(Debug, Clone)]
pub struct QuestionFlow {
    questions: Vec<Question>,
    answers: HashMap<&'static str, Answer>,
    current_index: usize,
    is_completed: bool,
}

fn yes_no(value: bool) -> String {
    if value { "yes" } else { "no" }.to_string()
}

impl QuestionFlow {
    /// Questions seeded with the given defaults for visibility, clone and README
    pub fn new(defaults: &RepositoryConfig) -> Self {
        let questions = vec![
            Question {
                id: REPOSITORY_NAME,
                kind: QuestionKind::Text,
                title: "What is your repository named?".into(),
                help_text: "Letters, digits, '.', '-' and '_' only, up to 100 characters".into(),
                required: true,
                default_value: String::new(),
                options: Vec::new(),
                validator: Some(validate_repository_name),
            },
            Question {
                id: DESCRIPTION,
                kind: QuestionKind::Text,
                title: "Describe the repository (optional)".into(),
                help_text: "A short summary shown on the repository page".into(),
                required: false,
                default_value: String::new(),
                options: Vec::new(),
                validator: Some(validate_description),
            },
            Question {
                id: VISIBILITY,
                kind: QuestionKind::Select,
                title: "Who can see this repository?".into(),
                help_text: "Private repositories are visible to you and collaborators only".into(),
                required: true,
                default_value: if defaults.is_private { PRIVATE } else { PUBLIC }.into(),
                options: vec![PRIVATE.into(), PUBLIC.into()],
                validator: None,
            },
            Question {
                id: CLONE_AFTER_CREATE,
                kind: QuestionKind::Bool,
                title: "Clone the repository locally after creating it?".into(),
                help_text: "Clones into ./<name> in the current directory".into(),
                required: true,
                default_value: yes_no(defaults.should_clone),
                options: Vec::new(),
                validator: Some(validate_boolean),
            },
            Question {
                id: ADD_README,
                kind: QuestionKind::Bool,
                title: "Add a README file?".into(),
                help_text: "Creates README.md with the name and description".into(),
                required: true,
                default_value: yes_no(defaults.add_readme),
                options: Vec::new(),
                validator: Some(validate_boolean),
            },
        ];

        Self {
            questions,
            answers: HashMap::new(),
            current_index: 0,
            is_completed: false,
        }
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn is_completed(&self) -> bool {
        self.is_completed
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current_index)
    }

    /// 1-based position and total count
    pub fn progress(&self) -> (usize, usize) {
        (self.current_index + 1, self.questions.len())
    }

    pub fn progress_ratio(&self) -> f64 {
        if self.questions.is_empty() {
            return 0.0;
        }
        (self.current_index + 1) as f64 / self.questions.len() as f64
    }

    pub fn answer(&self, question_id: &str) -> Option<&Answer> {
        self.answers.get(question_id)
    }

    /// Whether every question has a valid stored answer
    pub fn all_answers_valid(&self) -> bool {
        self.questions
            .iter()
            .all(|q| self.answers.get(q.id).is_some_and(|a| a.is_valid))
    }

    /// Record an answer for the current question.
    ///
    /// Empty input on a required question is rejected without touching any state.
    /// Otherwise the answer is stored even when it fails validation so the caller can
    /// redisplay it, and the validation error is returned.
    pub fn set_answer(&mut self, raw_value: &str) -> Result<()> {
        let question = self
            .questions
            .get(self.current_index)
            .ok_or_else(|| WizardError::validation("no question to answer"))?;

        let mut value = raw_value.trim().to_string();
        if value.is_empty() {
            if question.required {
                return Err(WizardError::invalid_field(question.id, "field required"));
            }
            value = question.default_value.clone();
        }

        let outcome = question.check(&value);
        let answer = Answer {
            question_id: question.id,
            value,
            is_valid: outcome.is_ok(),
            error_message: outcome.as_ref().err().cloned(),
        };
        let question_id = question.id;
        self.answers.insert(question_id, answer);

        outcome.map_err(|message| WizardError::invalid_field(question_id, message))
    }

    /// Move to the next question; at the last one, mark the flow completed and return false
    pub fn advance(&mut self) -> bool {
        if self.current_index + 1 < self.questions.len() {
            self.current_index += 1;
            true
        } else {
            self.is_completed = true;
            false
        }
    }

    /// Move to the previous question; false at the first one
    pub fn retreat(&mut self) -> bool {
        if self.current_index == 0 {
            return false;
        }
        self.current_index -= 1;
        self.is_completed = false;
        true
    }

    /// Project the stored answers onto a repository configuration
    pub fn to_repository_config(&self) -> RepositoryConfig {
        let value = |id: &str| self.answers.get(id).map(|a| a.value.as_str());

        RepositoryConfig {
            name: value(REPOSITORY_NAME).unwrap_or_default().to_string(),
            description: value(DESCRIPTION).unwrap_or_default().to_string(),
            is_private: value(VISIBILITY).is_some_and(|v| v.contains(PRIVATE)),
            should_clone: value(CLONE_AFTER_CREATE).is_some_and(parse_boolean),
            add_readme: value(ADD_README).is_some_and(parse_boolean),
        }
    }
}

impl Default for QuestionFlow {
    fn default() -> Self {
        Self::new(&RepositoryConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_follow_config() {
        let defaults = RepositoryConfig {
            is_private: false,
            should_clone: false,
            ..Default::default()
        };
        let flow = QuestionFlow::new(&defaults);
        let questions = flow.questions();
        assert_eq!(questions[2].default_value, PUBLIC);
        assert_eq!(questions[3].default_value, "no");
        assert_eq!(questions[4].default_value, "yes");
    }

    #[test]
    fn test_optional_empty_answer_uses_default() {
        let mut flow = QuestionFlow::default();
        flow.set_answer("demo").unwrap();
        flow.advance();
        flow.set_answer("   ").unwrap();
        let answer = flow.answer(DESCRIPTION).unwrap();
        assert_eq!(answer.value, "");
        assert!(answer.is_valid);
    }

    #[test]
    fn test_select_answer_must_be_an_option() {
        let mut flow = QuestionFlow::default();
        flow.set_answer("demo").unwrap();
        flow.advance();
        flow.advance();
        let err = flow.set_answer("internal").unwrap_err();
        assert_eq!(err.field(), Some(VISIBILITY));
        assert!(!flow.answer(VISIBILITY).unwrap().is_valid);
    }

    #[test]
    fn test_progress() {
        let mut flow = QuestionFlow::default();
        assert_eq!(flow.progress(), (1, 5));
        flow.advance();
        assert_eq!(flow.progress(), (2, 5));
        assert!((flow.progress_ratio() - 0.4).abs() < f64::EPSILON);
    }
}
