use anyhow::{Context, Result, bail};
use std::path::Path;
use tutor_bridge_engine::{Edit, HighlightId};

/// One replayable step: an agent envelope or a simulated user action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptStep {
    Envelope(String),
    Edit(Edit),
    Click(HighlightId),
}

/// Session replayed from a file, one step per line.
///
/// Lines starting with `:` are user actions (`:insert <at> <text>`,
/// `:delete <start> <end>`, `:click <id>`). Every other line is an envelope:
/// base64, or the plain JSON/key=value forms the fallback decoder accepts.
/// Blank lines and `#` comments are skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionScript {
    steps: Vec<ScriptStep>,
    next: usize,
}

impl ActionScript {
    pub fn parse(content: &str) -> Result<Self> {
        let mut steps = Vec::new();
        for (index, raw) in content.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            // Inserted text keeps its trailing whitespace
            let step = match raw.trim_start().strip_prefix(':') {
                Some(command) => {
                    parse_command(command).with_context(|| format!("line {}", index + 1))?
                }
                None => ScriptStep::Envelope(line.to_string()),
            };
            steps.push(step);
        }
        Ok(Self { steps, next: 0 })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read action script '{}'", path.display()))?;
        Self::parse(&content).with_context(|| format!("Invalid action script '{}'", path.display()))
    }

    pub fn next_step(&mut self) -> Option<&ScriptStep> {
        let step = self.steps.get(self.next)?;
        self.next += 1;
        Some(step)
    }

    pub fn remaining(&self) -> usize {
        self.steps.len() - self.next
    }
}

fn parse_command(command: &str) -> Result<ScriptStep> {
    let (name, rest) = command.split_once(' ').unwrap_or((command, ""));
    match name {
        "insert" => {
            let (at, text) = rest
                .split_once(' ')
                .context(":insert needs an offset and text")?;
            Ok(ScriptStep::Edit(Edit::Insert {
                at: parse_offset(at)?,
                text: text.to_string(),
            }))
        }
        "delete" => {
            let mut bounds = rest.split_whitespace();
            let (Some(start), Some(end), None) = (bounds.next(), bounds.next(), bounds.next())
            else {
                bail!(":delete needs a start and an end offset");
            };
            Ok(ScriptStep::Edit(Edit::Delete {
                range: parse_offset(start)?..parse_offset(end)?,
            }))
        }
        "click" => {
            let id = rest.trim();
            if id.is_empty() {
                bail!(":click needs a highlight id");
            }
            let Ok(id) = id.parse::<HighlightId>();
            Ok(ScriptStep::Click(id))
        }
        other => bail!("unknown command ':{other}'"),
    }
}

fn parse_offset(value: &str) -> Result<usize> {
    value
        .parse()
        .with_context(|| format!("'{value}' is not an offset"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_comments_and_blanks_are_skipped() {
        let mut script =
            ActionScript::parse("# warm-up\n\n  cmVxdWVzdA==  \n{\"requestId\": \"r2\"}\n")
                .unwrap();

        assert_eq!(script.remaining(), 2);
        assert_eq!(
            script.next_step(),
            Some(&ScriptStep::Envelope("cmVxdWVzdA==".to_string()))
        );
        assert_eq!(
            script.next_step(),
            Some(&ScriptStep::Envelope(r#"{"requestId": "r2"}"#.to_string()))
        );
        assert_eq!(script.next_step(), None);
        assert_eq!(script.remaining(), 0);
    }

    #[test]
    fn test_user_commands() {
        let mut script =
            ActionScript::parse(":insert 0 Well, \n:delete 4 9\n:click s1\n:click 7").unwrap();

        assert_eq!(
            script.next_step(),
            Some(&ScriptStep::Edit(Edit::Insert {
                at: 0,
                text: "Well, ".to_string()
            }))
        );
        assert_eq!(
            script.next_step(),
            Some(&ScriptStep::Edit(Edit::Delete { range: 4..9 }))
        );
        assert_eq!(
            script.next_step(),
            Some(&ScriptStep::Click(HighlightId::Text("s1".to_string())))
        );
        assert_eq!(
            script.next_step(),
            Some(&ScriptStep::Click(HighlightId::Number(7)))
        );
    }

    #[test]
    fn test_malformed_command_names_the_line() {
        let err = ActionScript::parse("# header\n:delete 4\n").unwrap_err();

        assert_eq!(err.to_string(), "line 2");
        assert_eq!(
            err.root_cause().to_string(),
            ":delete needs a start and an end offset"
        );
        assert!(ActionScript::parse(":jump 3").is_err());
        assert!(ActionScript::parse(":insert x hello").is_err());
    }

    #[test]
    fn test_load_missing_file_names_it() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("actions.txt");

        let err = ActionScript::load(&missing).unwrap_err();

        assert!(err.to_string().contains("actions.txt"));
    }
}
