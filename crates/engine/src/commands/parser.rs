//! Quote-aware tokenizing and positional argument binding.

use std::fmt;

use super::definition::Argument;

/// Splits on whitespace. A double-quoted run is one token with its interior
/// whitespace kept and the quotes removed. An unterminated quote runs to the
/// end of the line.
pub fn tokenize(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut started = false;
    let mut quoted = false;

    for c in line.chars() {
        match c {
            '"' => {
                quoted = !quoted;
                started = true;
            }
            c if c.is_whitespace() && !quoted => {
                if started {
                    tokens.push(std::mem::take(&mut current));
                    started = false;
                }
            }
            c => {
                current.push(c);
                started = true;
            }
        }
    }
    if started {
        tokens.push(current);
    }
    tokens
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundArg {
    pub name: &'static str,
    pub value: String,
    pub no_log: bool,
}

/// Arguments bound for one invocation, in schema order. Absent optional
/// arguments are simply missing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoundArgs(Vec<BoundArg>);

impl BoundArgs {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Log rendering, with `no_log` values masked.
impl fmt::Display for BoundArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|a| {
                if a.no_log {
                    format!("{}=***", a.name)
                } else {
                    format!("{}={:?}", a.name, a.value)
                }
            })
            .collect();
        write!(f, "{}", parts.join(" "))
    }
}

/// Missing required argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArityError;

/// Binds `tokens` to `schema` positionally.
///
/// Surplus tokens after the last non-remaining argument are ignored.
pub fn bind(schema: &[Argument], tokens: &[String]) -> Result<BoundArgs, ArityError> {
    let mut bound = Vec::with_capacity(schema.len());

    for (position, argument) in schema.iter().enumerate() {
        let value = if argument.remaining {
            let rest = tokens.get(position..).unwrap_or_default();
            if rest.is_empty() {
                None
            } else {
                Some(rest.join(" "))
            }
        } else {
            tokens.get(position).cloned()
        };

        match value {
            Some(value) => bound.push(BoundArg {
                name: argument.name,
                value,
                no_log: argument.no_log,
            }),
            None if argument.required => return Err(ArityError),
            None => {}
        }

        if argument.remaining {
            break;
        }
    }

    Ok(BoundArgs(bound))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toks(line: &str) -> Vec<String> {
        tokenize(line)
    }

    #[test]
    fn quoted_runs_collapse_into_one_token() {
        assert_eq!(
            toks(r#"say "hello  there" friend"#),
            vec!["say", "hello  there", "friend"]
        );
        assert_eq!(toks("  look   north "), vec!["look", "north"]);
        assert_eq!(toks(r#"set title """#), vec!["set", "title", ""]);
        assert_eq!(toks(r#"say "unterminated run"#), vec!["say", "unterminated run"]);
    }

    #[test]
    fn remaining_argument_rejoins_quoted_tokens() {
        let tokens = toks(r#"say "hello there" friend"#);
        let schema = [Argument::required("text").remaining()];

        let args = bind(&schema, &tokens[1..]).expect("bind");

        assert_eq!(args.get("text"), Some("hello there friend"));
    }

    #[test]
    fn optional_arguments_are_omitted_not_empty() {
        let schema = [Argument::optional("name"), Argument::optional("value")];

        let args = bind(&schema, &toks("brief")).expect("bind");

        assert_eq!(args.get("name"), Some("brief"));
        assert_eq!(args.get("value"), None);
        assert_eq!(args.len(), 1);
    }

    #[test]
    fn missing_required_argument_is_an_arity_error() {
        let schema = [
            Argument::required("target"),
            Argument::required("message").remaining(),
        ];

        assert_eq!(bind(&schema, &toks("Alice")), Err(ArityError));
        assert_eq!(bind(&schema, &[]), Err(ArityError));
    }

    #[test]
    fn no_log_values_are_masked_in_display() {
        let schema = [
            Argument::required("character"),
            Argument::required("password").no_log(),
        ];

        let args = bind(&schema, &toks("Bob hunter2")).expect("bind");

        assert_eq!(args.to_string(), r#"character="Bob" password=***"#);
    }
}
