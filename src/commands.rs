//! Script commands for Gapline
//!
//! Drives an editing session from a plain-text script so the engine can be
//! exercised without a terminal. One step per line:
//!
//! ```text
//! # comment
//! type hello world
//! enter
//! backspace 3
//! left 2
//! save
//! show
//! ```

use std::io::Write;

use anyhow::{anyhow, bail, Context, Result};
use gapline_editor::{Command, Direction, EditorState};
use tracing::{debug, info};

/// One parsed script step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptStep {
    /// Insert every byte of the text at the cursor
    Type(String),
    /// Split the paragraph at the cursor
    Enter,
    Backspace(usize),
    Move(Direction, usize),
    /// Write the document back to its file
    Save,
    /// Print the visible frame and the cursor position
    Show,
}

impl ScriptStep {
    /// Parse one script line. Blank lines and `#` comments yield `None`.
    pub fn parse(line: &str) -> Result<Option<Self>> {
        let trimmed = line.trim_end_matches(['\r', '\n']);
        if trimmed.trim().is_empty() || trimmed.trim_start().starts_with('#') {
            return Ok(None);
        }

        let trimmed = trimmed.trim_start();
        let (word, rest) = match trimmed.split_once(' ') {
            Some((word, rest)) => (word, rest),
            None => (trimmed, ""),
        };

        let step = match word {
            "type" => Self::Type(rest.to_string()),
            "enter" => {
                no_argument(word, rest)?;
                Self::Enter
            }
            "backspace" => Self::Backspace(repeat_count(rest)?),
            "left" => Self::Move(Direction::Left, repeat_count(rest)?),
            "right" => Self::Move(Direction::Right, repeat_count(rest)?),
            "up" => Self::Move(Direction::Up, repeat_count(rest)?),
            "down" => Self::Move(Direction::Down, repeat_count(rest)?),
            "save" => {
                no_argument(word, rest)?;
                Self::Save
            }
            "show" => {
                no_argument(word, rest)?;
                Self::Show
            }
            other => bail!("unknown step `{}`", other),
        };
        Ok(Some(step))
    }
}

fn no_argument(word: &str, rest: &str) -> Result<()> {
    if rest.trim().is_empty() {
        Ok(())
    } else {
        Err(anyhow!("`{}` takes no argument", word))
    }
}

fn repeat_count(rest: &str) -> Result<usize> {
    let rest = rest.trim();
    if rest.is_empty() {
        return Ok(1);
    }
    rest.parse()
        .map_err(|_| anyhow!("invalid repeat count `{}`", rest))
}

/// Parse a whole script, reporting the line number of the first bad step
pub fn parse_script(script: &str) -> Result<Vec<ScriptStep>> {
    let mut steps = Vec::new();
    for (index, line) in script.lines().enumerate() {
        let step = ScriptStep::parse(line).with_context(|| format!("script line {}", index + 1))?;
        steps.extend(step);
    }
    Ok(steps)
}

/// Run parsed steps against a session, writing `show` output to `out`
pub async fn run_script<W: Write>(
    state: &mut EditorState,
    steps: &[ScriptStep],
    out: &mut W,
) -> Result<()> {
    for step in steps {
        debug!(?step, "script step");
        match step {
            ScriptStep::Type(text) => {
                for &byte in text.as_bytes() {
                    apply(state, Command::InsertChar(byte))?;
                }
            }
            ScriptStep::Enter => apply(state, Command::SplitParagraph)?,
            ScriptStep::Backspace(count) => {
                for _ in 0..*count {
                    apply(state, Command::DeleteBackward)?;
                }
            }
            ScriptStep::Move(direction, count) => {
                for _ in 0..*count {
                    apply(state, Command::MoveCursor(*direction))?;
                }
            }
            ScriptStep::Save => {
                state.save().await?;
            }
            ScriptStep::Show => show(state, out)?,
        }
    }
    Ok(())
}

fn apply(state: &mut EditorState, command: Command) -> Result<()> {
    let result = state.execute(command)?;
    if let Some(message) = result.message {
        debug!("{:?}: {}", command, message);
    }
    Ok(())
}

/// Print the visible frame followed by a status line
pub fn show<W: Write>(state: &EditorState, out: &mut W) -> Result<()> {
    for row in state.render_frame() {
        writeln!(out, "{}", row)?;
    }
    let position = state.cursor_screen_position();
    writeln!(
        out,
        "-- line {}, column {}{} --",
        state.cursor_line_number() + 1,
        position.column + 1,
        if state.is_dirty() { " [modified]" } else { "" }
    )?;
    Ok(())
}

/// Save at end of input, the way the session always writes on quit
pub async fn finish(state: &mut EditorState) -> Result<()> {
    state.save().await.context("final save failed")?;
    info!("Session finished");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_steps() {
        let script = "# setup\n\ntype hello  world\nenter\nbackspace\nleft 3\nshow\n";
        let steps = parse_script(script).unwrap();
        assert_eq!(
            steps,
            vec![
                ScriptStep::Type("hello  world".to_string()),
                ScriptStep::Enter,
                ScriptStep::Backspace(1),
                ScriptStep::Move(Direction::Left, 3),
                ScriptStep::Show,
            ]
        );
    }

    #[test]
    fn test_unknown_step_reports_line() {
        let err = parse_script("enter\njump 4\n").unwrap_err();
        let message = format!("{:#}", err);
        assert!(message.contains("script line 2"));
        assert!(message.contains("jump"));
    }

    #[test]
    fn test_bad_count_is_rejected() {
        assert!(ScriptStep::parse("down many").is_err());
        assert!(ScriptStep::parse("enter 2").is_err());
    }

    #[tokio::test]
    async fn test_run_script_edits_and_shows() {
        let mut state = EditorState::from_bytes(b"HELLO", 8, 4).unwrap();
        let steps = parse_script("right 2\nenter\nup\nright 2\ntype y\nshow\n").unwrap();
        let mut out = Vec::new();
        run_script(&mut state, &steps, &mut out).await.unwrap();

        assert_eq!(state.to_bytes(), b"HEy\nLLO");
        let printed = String::from_utf8(out).unwrap();
        assert_eq!(printed, "HEy\nLLO\n-- line 1, column 4 [modified] --\n");
    }

    #[tokio::test]
    async fn test_save_step_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        let mut state = EditorState::open(path.clone(), 10, 4).await.unwrap();

        let steps = parse_script("type abc\nsave\n").unwrap();
        run_script(&mut state, &steps, &mut std::io::sink())
            .await
            .unwrap();

        assert_eq!(tokio::fs::read(&path).await.unwrap(), b"abc");
        assert!(!state.is_dirty());
    }

    #[tokio::test]
    async fn test_finish_without_path_fails() {
        let mut state = EditorState::new(10, 4).unwrap();
        assert!(finish(&mut state).await.is_err());
    }
}
