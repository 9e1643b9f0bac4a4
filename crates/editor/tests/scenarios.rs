//! End-to-end editing scenarios driven through the command interface.

use gapline_editor::{Command, Direction, EditorState};

fn lines(state: &EditorState) -> Vec<String> {
    let document = state.document();
    document
        .lines()
        .map(|id| String::from_utf8_lossy(&document.line(id).to_vec()).into_owned())
        .collect()
}

fn position(state: &EditorState) -> (usize, usize) {
    (state.cursor_line_number(), state.cursor().column())
}

fn run(state: &mut EditorState, commands: &[Command]) {
    for command in commands {
        state.execute(*command).unwrap();
    }
}

#[test]
fn insert_into_full_line_cascades_into_the_next() {
    let mut state = EditorState::from_bytes(b"ABCDEF", 5, 10).unwrap();
    assert_eq!(lines(&state), vec!["ABCDE", "F"]);

    state.execute(Command::InsertChar(b'X')).unwrap();

    assert_eq!(lines(&state), vec!["XABCD", "EF"]);
    assert_eq!(position(&state), (0, 1));
    assert_eq!(state.to_bytes(), b"XABCDEF");
}

#[test]
fn split_produces_two_single_line_paragraphs() {
    let mut state = EditorState::from_bytes(b"HELLO", 8, 10).unwrap();
    run(
        &mut state,
        &[
            Command::MoveCursor(Direction::Right),
            Command::MoveCursor(Direction::Right),
            Command::SplitParagraph,
        ],
    );

    let document = state.document();
    assert_eq!(document.paragraph_count(), 2);
    let numbers: Vec<(Vec<u8>, usize)> = document
        .paragraphs()
        .map(|p| {
            let first = document.paragraph_first_line(p);
            assert_eq!(first, document.paragraph_last_line(p));
            (document.paragraph_bytes(p), document.line_number(first))
        })
        .collect();
    assert_eq!(
        numbers,
        vec![(b"HE".to_vec(), 0), (b"LLO".to_vec(), 1)]
    );
    assert_eq!(position(&state), (1, 0));
}

#[test]
fn vertical_moves_remember_the_fail_value() {
    let mut state = EditorState::from_bytes(b"abcdef\nab\nabcdefgh", 80, 10).unwrap();
    run(
        &mut state,
        &[
            Command::MoveCursor(Direction::Down),
            Command::MoveCursor(Direction::Down),
        ],
    );
    for _ in 0..4 {
        state.execute(Command::MoveCursor(Direction::Right)).unwrap();
    }
    assert_eq!(position(&state), (2, 4));

    state.execute(Command::MoveCursor(Direction::Up)).unwrap();
    assert_eq!(position(&state), (1, 2));
    assert_eq!(state.cursor().preferred_column(), Some(4));

    state.execute(Command::MoveCursor(Direction::Up)).unwrap();
    assert_eq!(position(&state), (0, 4));
}

#[test]
fn horizontal_move_forgets_the_fail_value() {
    let mut state = EditorState::from_bytes(b"abcdef\nab\nabcdefgh", 80, 10).unwrap();
    run(
        &mut state,
        &[
            Command::MoveCursor(Direction::Down),
            Command::MoveCursor(Direction::Down),
        ],
    );
    for _ in 0..4 {
        state.execute(Command::MoveCursor(Direction::Right)).unwrap();
    }
    run(
        &mut state,
        &[
            Command::MoveCursor(Direction::Up),
            Command::MoveCursor(Direction::Left),
            Command::MoveCursor(Direction::Up),
        ],
    );
    assert_eq!(position(&state), (0, 1));
}

#[test]
fn backspace_joins_paragraphs_and_reflows() {
    let mut state = EditorState::from_bytes(b"abcd\nefgh", 4, 10).unwrap();
    assert_eq!(lines(&state), vec!["abcd", "", "efgh", ""]);

    run(
        &mut state,
        &[
            Command::MoveCursor(Direction::Down),
            Command::MoveCursor(Direction::Down),
            Command::DeleteBackward,
        ],
    );

    assert_eq!(state.to_bytes(), b"abcdefgh");
    assert_eq!(state.document().paragraph_count(), 1);
    let (line, column) = position(&state);
    let offset: usize = state
        .document()
        .lines()
        .take(line)
        .map(|id| state.document().line(id).len())
        .sum::<usize>()
        + column;
    assert_eq!(offset, 4);
    state.document().check_invariants();
}

#[test]
fn backspace_after_pulling_bytes_up_keeps_the_cursor_on_the_gap() {
    let mut state = EditorState::from_bytes(b"abcdef", 3, 10).unwrap();
    run(
        &mut state,
        &[
            Command::MoveCursor(Direction::Down),
            Command::DeleteBackward,
        ],
    );
    assert_eq!(state.to_bytes(), b"abdef");
    assert_eq!(position(&state), (0, 2));
    let line = state.cursor().line();
    assert_eq!(state.document().line(line).gap_start(), 2);

    state.execute(Command::DeleteBackward).unwrap();
    assert_eq!(state.to_bytes(), b"adef");
    assert_eq!(lines(&state), vec!["ade", "f"]);
    assert_eq!(position(&state), (0, 1));
}

#[test]
fn line_emptied_by_backspace_is_removed() {
    let mut state = EditorState::from_bytes(b"ab\ncd", 8, 10).unwrap();
    run(
        &mut state,
        &[
            Command::MoveCursor(Direction::Down),
            Command::DeleteBackward,
            Command::DeleteBackward,
            Command::DeleteBackward,
        ],
    );

    assert_eq!(state.to_bytes(), b"cd");
    assert_eq!(state.render_frame(), vec!["cd"]);
    assert_eq!(position(&state), (0, 0));

    let result = state.execute(Command::DeleteBackward).unwrap();
    assert!(!result.applied);
    assert_eq!(state.document().line_count(), 1);

    run(
        &mut state,
        &[
            Command::MoveCursor(Direction::Right),
            Command::DeleteBackward,
        ],
    );
    assert_eq!(state.to_bytes(), b"d");
}

#[test]
fn emptied_last_line_folds_into_the_line_above() {
    let mut state = EditorState::from_bytes(b"ab\ncd", 8, 10).unwrap();
    run(
        &mut state,
        &[
            Command::MoveCursor(Direction::Down),
            Command::DeleteBackward,
        ],
    );
    assert_eq!(lines(&state), vec!["ab", "cd"]);

    run(
        &mut state,
        &[
            Command::MoveCursor(Direction::Down),
            Command::DeleteBackward,
            Command::DeleteBackward,
        ],
    );
    assert_eq!(state.render_frame(), vec!["ab"]);
    assert_eq!(position(&state), (0, 2));
    state.document().check_invariants();
}

#[test]
fn boundaries_are_noops() {
    let mut state = EditorState::from_bytes(b"ab", 4, 10).unwrap();
    for direction in [Direction::Up, Direction::Left] {
        let result = state.execute(Command::MoveCursor(direction)).unwrap();
        assert!(!result.applied);
    }
    assert!(!state.execute(Command::DeleteBackward).unwrap().applied);

    run(
        &mut state,
        &[
            Command::MoveCursor(Direction::Right),
            Command::MoveCursor(Direction::Right),
        ],
    );
    for direction in [Direction::Down, Direction::Right] {
        let result = state.execute(Command::MoveCursor(direction)).unwrap();
        assert!(!result.applied);
    }
    assert_eq!(position(&state), (0, 2));
    assert!(!state.is_dirty());
}

#[test]
fn trailing_newline_round_trips() {
    for input in [&b"text\n"[..], b"text", b"\n", b"\n\n", b""] {
        let state = EditorState::from_bytes(input, 3, 10).unwrap();
        assert_eq!(state.to_bytes(), input);
    }
}

#[tokio::test]
async fn save_failure_leaves_the_document_alone() {
    let dir = tempfile::tempdir().unwrap();
    let blocked = dir.path().join("missing").join("out.txt");

    let mut state = EditorState::from_bytes(b"keep me", 4, 10).unwrap();
    state.execute(Command::InsertChar(b'!')).unwrap();
    let before = state.to_bytes();

    let err = state.save_as(blocked).await.unwrap_err();
    assert!(err.is_recoverable());
    assert_eq!(state.to_bytes(), before);
    assert!(state.is_dirty());
}

#[tokio::test]
async fn open_missing_file_then_save_creates_it() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("new.txt");

    let mut state = EditorState::open(path.clone(), 6, 3).await.unwrap();
    assert_eq!(state.document().line_count(), 1);
    state.insert_str("first line\nsecond").unwrap();
    state.save().await.unwrap();

    let reopened = EditorState::open(path, 6, 3).await.unwrap();
    assert_eq!(reopened.to_bytes(), b"first line\nsecond");
    assert_eq!(reopened.render_frame(), vec!["first ", "line", "second"]);
}
