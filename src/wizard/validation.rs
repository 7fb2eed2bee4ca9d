//! Field validators used by the question flow and the non-interactive command
//!
//! Validators return the message to show next to the offending field; callers wrap it
//! into a [`crate::WizardError`] tagged with the field id.

use once_cell::sync::Lazy;
use regex::Regex;

use super::state::MAX_NAME_LENGTH;

/// Signature shared by all question validators
pub type Validator = fn(&str) -> std::result::Result<(), String>;

/// Maximum description length accepted in the interactive flow
pub const MAX_DESCRIPTION_LENGTH: usize = 100;

static VALID_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9._-]+$").expect("static regex is valid"));

const SYSTEM_RESERVED: &[&str] = &[".", "..", "CON", "PRN", "AUX", "NUL", "COM1", "LPT1"];
const GIT_RESERVED: &[&str] = &[".git", ".github"];
const GENERAL_RESERVED: &[&str] = &["api", "www", "mail", "ftp", "admin", "root", "test", "debug"];

/// Repository name checks in order: basic shape, hosting rules, reserved names, heuristics
#[derive(Debug, Clone)]
pub struct ProjectNameValidator {
    min_length: usize,
    max_length: usize,
    max_special_ratio: f64,
}

impl Default for ProjectNameValidator {
    fn default() -> Self {
        Self {
            min_length: 1,
            max_length: MAX_NAME_LENGTH,
            max_special_ratio: 0.4,
        }
    }
}

impl ProjectNameValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn validate(&self, name: &str) -> std::result::Result<(), String> {
        self.validate_basic_rules(name)?;
        self.validate_hosting_rules(name)?;
        self.validate_reserved_names(name)?;
        self.validate_advanced_rules(name)
    }

    fn validate_basic_rules(&self, name: &str) -> std::result::Result<(), String> {
        if name.trim().is_empty() {
            return Err("project name is required".to_string());
        }
        let length = name.chars().count();
        if length < self.min_length {
            return Err(format!(
                "project name must be at least {} characters long",
                self.min_length
            ));
        }
        if length > self.max_length {
            return Err(format!(
                "project name must be at most {} characters long",
                self.max_length
            ));
        }
        if !VALID_NAME.is_match(name) {
            return Err("project name contains invalid characters. Only alphanumeric \
                        characters, hyphens, underscores, and dots are allowed"
                .to_string());
        }
        Ok(())
    }

    fn validate_hosting_rules(&self, name: &str) -> std::result::Result<(), String> {
        let edges = [('.', "a period"), ('-', "a hyphen"), ('_', "an underscore")];
        for (ch, label) in edges {
            if name.starts_with(ch) {
                return Err(format!("project names cannot start with {label}"));
            }
            if name.ends_with(ch) {
                return Err(format!("project names cannot end with {label}"));
            }
        }

        let doubles = [("..", "periods"), ("--", "hyphens"), ("__", "underscores")];
        for (pair, label) in doubles {
            if name.contains(pair) {
                return Err(format!("consecutive {label} are not allowed"));
            }
        }
        Ok(())
    }

    fn validate_reserved_names(&self, name: &str) -> std::result::Result<(), String> {
        let upper = name.to_uppercase();
        let lower = name.to_lowercase();

        let reserved = SYSTEM_RESERVED.iter().any(|r| upper == *r)
            || GIT_RESERVED.iter().any(|r| lower == *r)
            || GENERAL_RESERVED.iter().any(|r| lower == *r);

        if reserved {
            return Err(format!("'{name}' is a reserved name and cannot be used"));
        }
        Ok(())
    }

    fn validate_advanced_rules(&self, name: &str) -> std::result::Result<(), String> {
        if name.chars().any(char::is_control) {
            return Err("control characters are not allowed".to_string());
        }
        if name.chars().all(|c| c.is_ascii_digit()) {
            return Err("all-numeric project names are not recommended".to_string());
        }

        let total = name.chars().count();
        let special = name.chars().filter(|c| !c.is_alphanumeric()).count();
        if special > 0 && special as f64 / total as f64 >= self.max_special_ratio {
            return Err("too many special characters".to_string());
        }
        Ok(())
    }
}

/// Question validator for the repository name
pub fn validate_repository_name(name: &str) -> std::result::Result<(), String> {
    ProjectNameValidator::default().validate(name)
}

/// Question validator for the short description shown in the interactive flow
pub fn validate_description(description: &str) -> std::result::Result<(), String> {
    if description.chars().count() > MAX_DESCRIPTION_LENGTH {
        return Err(format!(
            "description must be at most {MAX_DESCRIPTION_LENGTH} characters"
        ));
    }
    Ok(())
}

/// Longer description accepted from the command line: 500 chars, 5 lines, no control chars
pub fn validate_long_description(description: &str) -> std::result::Result<(), String> {
    const MAX_LENGTH: usize = 500;
    const MAX_LINES: usize = 5;

    if description.chars().count() > MAX_LENGTH {
        return Err(format!("description must be at most {MAX_LENGTH} characters long"));
    }
    if description.split('\n').count() > MAX_LINES {
        return Err(format!("description must be at most {MAX_LINES} lines"));
    }
    if description
        .chars()
        .any(|c| c.is_control() && !matches!(c, '\n' | '\r' | '\t'))
    {
        return Err("control characters are not allowed in description".to_string());
    }
    Ok(())
}

/// Question validator for yes/no answers
pub fn validate_boolean(value: &str) -> std::result::Result<(), String> {
    match value.to_lowercase().as_str() {
        "y" | "n" | "yes" | "no" | "true" | "false" | "1" | "0" => Ok(()),
        _ => Err("please answer y/yes/true/1 or n/no/false/0".to_string()),
    }
}

/// Interpret a yes/no answer; anything outside the truthy set is `false`
pub fn parse_boolean(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "y" | "yes" | "true" | "1"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_names() {
        for name in ["valid-repo-1", "my_project", "gh.wizard", "Repo42"] {
            assert!(validate_repository_name(name).is_ok(), "{name} should pass");
        }
    }

    #[test]
    fn test_edge_characters() {
        assert!(validate_repository_name(".myrepo")
            .unwrap_err()
            .contains("cannot start with a period"));
        assert!(validate_repository_name("myrepo.")
            .unwrap_err()
            .contains("cannot end with a period"));
        assert!(validate_repository_name("-repo")
            .unwrap_err()
            .contains("start with a hyphen"));
        assert!(validate_repository_name("repo_")
            .unwrap_err()
            .contains("end with an underscore"));
    }

    #[test]
    fn test_consecutive_separators() {
        assert_eq!(
            validate_repository_name("my..repo").unwrap_err(),
            "consecutive periods are not allowed"
        );
        assert_eq!(
            validate_repository_name("my--repo").unwrap_err(),
            "consecutive hyphens are not allowed"
        );
    }

    #[test]
    fn test_reserved_and_heuristics() {
        assert!(validate_repository_name("con").unwrap_err().contains("reserved"));
        assert!(validate_repository_name("Admin").unwrap_err().contains("reserved"));
        assert!(validate_repository_name("12345").unwrap_err().contains("all-numeric"));
        assert_eq!(
            validate_repository_name("a-b-c").unwrap_err(),
            "too many special characters"
        );
        assert!(validate_repository_name("my repo").unwrap_err().contains("invalid characters"));
        assert!(validate_repository_name(&"a".repeat(101)).unwrap_err().contains("at most 100"));
    }

    #[test]
    fn test_descriptions() {
        assert!(validate_description("").is_ok());
        assert!(validate_description(&"x".repeat(100)).is_ok());
        assert!(validate_description(&"x".repeat(101)).is_err());

        assert!(validate_long_description("line\nline\tok").is_ok());
        assert!(validate_long_description("1\n2\n3\n4\n5\n6").is_err());
        assert!(validate_long_description("bell\u{7}").is_err());
    }

    #[test]
    fn test_booleans() {
        for value in ["Y", "no", "TRUE", "0"] {
            assert!(validate_boolean(value).is_ok());
        }
        assert!(validate_boolean("maybe").is_err());

        assert!(!parse_boolean("N"));
        assert!(parse_boolean("Yes"));
        assert!(parse_boolean("1"));
        assert!(parse_boolean("true"));
    }
}
