use gh_wizard::wizard::validation::{
    validate_description, validate_long_description, validate_repository_name, ProjectNameValidator,
};

#[test]
fn test_hosting_rule_scenarios() {
    let err = validate_repository_name(".myrepo").unwrap_err();
    assert!(err.contains("cannot start with a period"), "{err}");

    let err = validate_repository_name("my..repo").unwrap_err();
    assert!(err.contains("consecutive periods"), "{err}");

    assert!(validate_repository_name("valid-repo-1").is_ok());
}

#[test]
fn test_trailing_and_charset() {
    assert!(validate_repository_name("repo-").unwrap_err().contains("cannot end with a hyphen"));
    assert!(validate_repository_name("my repo").is_err());
    assert!(validate_repository_name(&"a".repeat(101)).is_err());
    assert!(validate_repository_name(&"a".repeat(100)).is_ok());
}

#[test]
fn test_full_validator_rules() {
    let validator = ProjectNameValidator::new();
    assert!(validator.validate("CON").unwrap_err().contains("reserved"));
    assert!(validator.validate(".github").is_err());
    assert!(validator.validate("12345").is_err());
    assert!(validator.validate("a-b.c").unwrap_err().contains("special characters"));
    assert!(validator.validate("my-service").is_ok());
}

#[test]
fn test_description_limits() {
    assert!(validate_description(&"x".repeat(100)).is_ok());
    assert!(validate_description(&"x".repeat(101)).is_err());

    assert!(validate_long_description(&"x".repeat(500)).is_ok());
    assert!(validate_long_description(&"x".repeat(501)).is_err());
    assert!(validate_long_description("1\n2\n3\n4\n5\n6").is_err());
    assert!(validate_long_description("tab\tand\nnewline").is_ok());
    assert!(validate_long_description("bell\u{7}").is_err());
}
