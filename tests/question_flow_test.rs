use gh_wizard::wizard::questions::{ADD_README, CLONE_AFTER_CREATE, DESCRIPTION, REPOSITORY_NAME, VISIBILITY};
use gh_wizard::wizard::validation::parse_boolean;
use gh_wizard::wizard::{QuestionFlow, RepositoryConfig};
use pretty_assertions::assert_eq;

#[test]
fn test_empty_required_answer_fails_without_state_change() {
    let mut flow = QuestionFlow::default();
    let err = flow.set_answer("").unwrap_err();

    assert_eq!(err.to_string(), "field required");
    assert_eq!(err.field(), Some(REPOSITORY_NAME));
    assert_eq!(flow.current_index(), 0);
    assert!(flow.answer(REPOSITORY_NAME).is_none());
}

#[test]
fn test_invalid_answer_is_stored_for_redisplay() {
    let mut flow = QuestionFlow::default();
    assert!(flow.set_answer("-bad").is_err());

    let answer = flow.answer(REPOSITORY_NAME).unwrap();
    assert_eq!(answer.value, "-bad");
    assert!(!answer.is_valid);
    assert!(answer.error_message.is_some());
    assert_eq!(flow.current_index(), 0);
}

#[test]
fn test_advance_len_times_completes() {
    let mut flow = QuestionFlow::default();
    let total = flow.questions().len();

    for call in 1..=total {
        let moved = flow.advance();
        if call < total {
            assert!(moved);
            assert!(!flow.is_completed());
        } else {
            assert!(!moved);
            assert!(flow.is_completed());
        }
    }
}

#[test]
fn test_retreat_at_first_question() {
    let mut flow = QuestionFlow::default();
    assert!(!flow.retreat());

    flow.advance();
    assert!(flow.retreat());
    assert_eq!(flow.current_index(), 0);
}

#[test]
fn test_boolean_parsing() {
    assert!(!parse_boolean("N"));
    assert!(!parse_boolean("no"));
    for yes in ["Yes", "1", "true", "y", "TRUE"] {
        assert!(parse_boolean(yes), "{yes} should parse as true");
    }
}

#[test]
fn test_full_walk_produces_config() {
    let mut flow = QuestionFlow::new(&RepositoryConfig::default());
    let answers = ["my-service", "", "public", "N", "Yes"];

    for answer in answers {
        flow.set_answer(answer).unwrap();
        flow.advance();
    }

    assert!(flow.is_completed());
    assert!(flow.all_answers_valid());
    assert_eq!(flow.answer(DESCRIPTION).unwrap().value, "");
    assert_eq!(flow.answer(VISIBILITY).unwrap().value, "public");
    assert_eq!(flow.answer(CLONE_AFTER_CREATE).unwrap().value, "N");
    assert_eq!(flow.answer(ADD_README).unwrap().value, "Yes");

    assert_eq!(
        flow.to_repository_config(),
        RepositoryConfig {
            name: "my-service".into(),
            description: String::new(),
            is_private: false,
            should_clone: false,
            add_readme: true,
        }
    );
}

#[test]
fn test_revising_an_answer() {
    let mut flow = QuestionFlow::default();
    flow.set_answer("first-name").unwrap();
    flow.advance();
    flow.retreat();
    flow.set_answer("second-name").unwrap();

    assert_eq!(flow.to_repository_config().name, "second-name");
}
