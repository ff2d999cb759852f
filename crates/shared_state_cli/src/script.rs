use serde_json::Value;
use thiserror::Error;

/// A step, one per script line.
///
/// Syntax, `#` starts a comment line:
///
/// ```text
/// open <handle> <key> <default-json>
/// write <handle> <json>
/// merge <handle> <json-record>
/// reset <handle>
/// read <handle>
/// dispatch
/// close <handle>
/// ```
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Step {
    Open { handle: String, key: String, default: Value },
    Write { handle: String, value: Value },
    Merge { handle: String, partial: Value },
    Reset { handle: String },
    Read { handle: String },
    Dispatch,
    Close { handle: String },
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ScriptStep {
    /// 1-based
    pub(crate) line: usize,
    pub(crate) step: Step,
}

#[derive(Error, Debug)]
pub(crate) enum ScriptError {
    #[error("Unknown command. line: {line}, command: '{command}'")]
    UnknownCommand { line: usize, command: String },

    #[error("Missing argument. line: {line}, command: '{command}', argument: '{argument}'")]
    MissingArgument {
        line: usize,
        command: &'static str,
        argument: &'static str,
    },

    #[error("Unexpected argument. line: {line}, argument: '{argument}'")]
    UnexpectedArgument { line: usize, argument: String },

    #[error("Invalid JSON. line: {line}, cause: {source}")]
    InvalidJson { line: usize, source: serde_json::Error },
}

pub(crate) fn parse_script(content: &str) -> Result<Vec<ScriptStep>, ScriptError> {
    content
        .lines()
        .enumerate()
        .map(|(index, raw)| (index + 1, raw.trim()))
        .filter(|(_line, raw)| !raw.is_empty() && !raw.starts_with('#'))
        .map(|(line, raw)| {
            parse_step(line, raw).map(|step| ScriptStep {
                line,
                step,
            })
        })
        .collect()
}

fn parse_step(line: usize, raw: &str) -> Result<Step, ScriptError> {
    let mut tokens = Tokens {
        line,
        rest: raw,
    };

    let command = tokens
        .next_token()
        .unwrap_or_default();

    let step = match command {
        "open" => Step::Open {
            handle: tokens.required("open", "handle")?,
            key: tokens.required("open", "key")?,
            default: tokens.json("open", "default")?,
        },
        "write" => Step::Write {
            handle: tokens.required("write", "handle")?,
            value: tokens.json("write", "value")?,
        },
        "merge" => Step::Merge {
            handle: tokens.required("merge", "handle")?,
            partial: tokens.json("merge", "partial")?,
        },
        "reset" => Step::Reset {
            handle: tokens.required("reset", "handle")?,
        },
        "read" => Step::Read {
            handle: tokens.required("read", "handle")?,
        },
        "dispatch" => Step::Dispatch,
        "close" => Step::Close {
            handle: tokens.required("close", "handle")?,
        },
        other => {
            return Err(ScriptError::UnknownCommand {
                line,
                command: other.to_string(),
            });
        }
    };

    tokens.finish()?;

    Ok(step)
}

struct Tokens<'a> {
    line: usize,
    rest: &'a str,
}

impl<'a> Tokens<'a> {
    fn next_token(&mut self) -> Option<&'a str> {
        let rest = self.rest.trim_start();
        if rest.is_empty() {
            return None;
        }

        let (token, remainder) = rest
            .split_once(char::is_whitespace)
            .unwrap_or((rest, ""));
        self.rest = remainder;

        Some(token)
    }

    fn required(&mut self, command: &'static str, argument: &'static str) -> Result<String, ScriptError> {
        self.next_token()
            .map(str::to_string)
            .ok_or(ScriptError::MissingArgument {
                line: self.line,
                command,
                argument,
            })
    }

    /// JSON may contain whitespace, so it consumes the rest of the line.
    fn json(&mut self, command: &'static str, argument: &'static str) -> Result<Value, ScriptError> {
        let content = std::mem::take(&mut self.rest).trim();
        if content.is_empty() {
            return Err(ScriptError::MissingArgument {
                line: self.line,
                command,
                argument,
            });
        }

        serde_json::from_str(content).map_err(|source| ScriptError::InvalidJson {
            line: self.line,
            source,
        })
    }

    fn finish(mut self) -> Result<(), ScriptError> {
        match self.next_token() {
            Some(argument) => Err(ScriptError::UnexpectedArgument {
                line: self.line,
                argument: argument.to_string(),
            }),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use indoc::indoc;
    use rstest::rstest;
    use serde_json::json;

    use super::*;

    #[test]
    fn parse_every_command() {
        // given
        let content = indoc! {r#"
            # settings shared by two handles
            open a settings {"theme": "light", "size": 12}

            write a {"theme": "dark", "size": 12}
            merge a {"size": 14}
            reset a
            read a
            dispatch
            close a
        "#};

        // when
        let steps = parse_script(content).unwrap();

        // then
        let handle = || "a".to_string();
        assert_eq!(steps, vec![
            ScriptStep {
                line: 2,
                step: Step::Open {
                    handle: handle(),
                    key: "settings".to_string(),
                    default: json!({"theme": "light", "size": 12}),
                },
            },
            ScriptStep {
                line: 4,
                step: Step::Write {
                    handle: handle(),
                    value: json!({"theme": "dark", "size": 12}),
                },
            },
            ScriptStep {
                line: 5,
                step: Step::Merge {
                    handle: handle(),
                    partial: json!({"size": 14}),
                },
            },
            ScriptStep {
                line: 6,
                step: Step::Reset {
                    handle: handle(),
                },
            },
            ScriptStep {
                line: 7,
                step: Step::Read {
                    handle: handle(),
                },
            },
            ScriptStep {
                line: 8,
                step: Step::Dispatch,
            },
            ScriptStep {
                line: 9,
                step: Step::Close {
                    handle: handle(),
                },
            },
        ]);
    }

    #[test]
    fn scalar_values_are_allowed() {
        // when
        let steps = parse_script("open counter clicks 0\nwrite counter 5").unwrap();

        // then
        assert_eq!(steps[0].step, Step::Open {
            handle: "counter".to_string(),
            key: "clicks".to_string(),
            default: json!(0),
        });
        assert_eq!(steps[1].step, Step::Write {
            handle: "counter".to_string(),
            value: json!(5),
        });
    }

    #[rstest]
    #[case("fly a", "Unknown command. line: 1, command: 'fly'")]
    #[case("open a", "Missing argument. line: 1, command: 'open', argument: 'key'")]
    #[case("open a k", "Missing argument. line: 1, command: 'open', argument: 'default'")]
    #[case("read", "Missing argument. line: 1, command: 'read', argument: 'handle'")]
    #[case("read a b", "Unexpected argument. line: 1, argument: 'b'")]
    #[case("dispatch now", "Unexpected argument. line: 1, argument: 'now'")]
    #[case("# comment\n\nwrite a {", "Invalid JSON. line: 3, cause:")]
    fn parse_errors(#[case] content: &str, #[case] expected_message: &str) {
        // when
        let result = parse_script(content);

        // then
        let message = result.unwrap_err().to_string();
        assert!(
            message.starts_with(expected_message),
            "message: '{}', expected: '{}'",
            message,
            expected_message
        );
    }
}
