//! Attribute value validators.
//!
//! A validator is a `|`-separated list of rules, each `name` or `name:arg`:
//!
//! | Rule | Passes when |
//! |------|-------------|
//! | `bool` | the value is `true` or `false` (any case) |
//! | `num` | the value parses as an integer |
//! | `min:N` | the value is an integer `>= N` |
//! | `max:N` | the value is an integer `<= N` |
//! | `in:a,b` | the value equals one of the listed options |
//! | `empty` | the value is the empty string |
//!
//! Unknown rule names are ignored.

use std::fmt;

/// Outcome of running a validator against a value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    errors: Vec<String>,
}

impl ValidationResult {
    pub fn passed(&self) -> bool {
        self.errors.is_empty()
    }

    /// Messages of the rules that failed, in rule order.
    pub fn errors(&self) -> &[String] {
        &self.errors
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.errors.join(", "))
    }
}

/// Runs every rule in `rules` against `value`.
pub fn check(value: &str, rules: &str) -> ValidationResult {
    let mut result = ValidationResult::default();

    for rule in rules.split('|') {
        let (name, arg) = match rule.split_once(':') {
            Some((name, arg)) => (name, Some(arg)),
            None => (rule, None),
        };

        let failure = match (name, arg) {
            ("bool", _) => check_bool(value),
            ("num", _) => check_num(value),
            ("min", Some(min)) => check_min(value, min),
            ("max", Some(max)) => check_max(value, max),
            ("in", Some(set)) => check_in(value, set),
            ("empty", _) => check_empty(value),
            _ => None,
        };

        if let Some(message) = failure {
            result.errors.push(message);
        }
    }

    result
}

fn check_bool(value: &str) -> Option<String> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "false" => None,
        _ => Some("not a boolean value".to_string()),
    }
}

fn check_num(value: &str) -> Option<String> {
    value
        .parse::<i64>()
        .err()
        .map(|_| "not an int".to_string())
}

fn check_min(value: &str, min: &str) -> Option<String> {
    let Ok(bound) = min.parse::<i64>() else {
        return Some("min value not an int".to_string());
    };
    match value.parse::<i64>() {
        Ok(n) if n >= bound => None,
        _ => Some(format!("less than {bound}")),
    }
}

fn check_max(value: &str, max: &str) -> Option<String> {
    let Ok(bound) = max.parse::<i64>() else {
        return Some("max value not an int".to_string());
    };
    match value.parse::<i64>() {
        Ok(n) if n <= bound => None,
        _ => Some(format!("greater than {bound}")),
    }
}

fn check_in(value: &str, set: &str) -> Option<String> {
    let options: Vec<&str> = set.split(',').collect();
    if options.contains(&value) {
        None
    } else {
        Some(format!("not in set [{}]", options.join(" ")))
    }
}

fn check_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some("not empty".to_string())
    }
}
