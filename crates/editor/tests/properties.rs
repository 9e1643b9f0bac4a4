//! Property tests for load/save, reflow and the edit commands.

use gapline_editor::{serializer, Command, Direction, EditorState};
use proptest::prelude::*;

/// Byte offset of the cursor in the serialized document
fn cursor_offset(state: &EditorState) -> usize {
    let document = state.document();
    let target = state.cursor().line();
    let mut offset = 0;
    for id in document.lines() {
        if id == target {
            return offset + state.cursor().column();
        }
        offset += document.line(id).len();
        if document.next_in_paragraph(id).is_none() {
            offset += 1;
        }
    }
    unreachable!("cursor line is not in the document")
}

fn check_structure(state: &EditorState) {
    let document = state.document();
    document.check_invariants();
    for (expected, id) in document.lines().enumerate() {
        assert_eq!(document.line_number(id), expected);
        let line = document.line(id);
        assert_eq!(line.len(), document.capacity() - line.gap_width());
    }
    let cursor = state.cursor();
    assert_eq!(cursor.column(), document.line(cursor.line()).gap_start());
}

fn direction() -> impl Strategy<Value = Direction> {
    prop_oneof![
        Just(Direction::Up),
        Just(Direction::Down),
        Just(Direction::Left),
        Just(Direction::Right),
    ]
}

fn command() -> impl Strategy<Value = Command> {
    prop_oneof![
        4 => prop::sample::select(b"abc \n".to_vec()).prop_map(Command::InsertChar),
        2 => Just(Command::DeleteBackward),
        1 => Just(Command::SplitParagraph),
        3 => direction().prop_map(Command::MoveCursor),
    ]
}

fn text() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(prop::sample::select(b"xyz\n".to_vec()), 0..40)
}

#[test]
fn model_replay_with_cursor_before_full_line_end() {
    let mut state = EditorState::from_bytes(b"", 2, 4).unwrap();
    let commands = [
        Command::InsertChar(b'b'),
        Command::InsertChar(b'a'),
        Command::MoveCursor(Direction::Left),
        Command::MoveCursor(Direction::Left),
        Command::InsertChar(b'a'),
        Command::InsertChar(b'a'),
        Command::DeleteBackward,
        Command::DeleteBackward,
    ];
    for command in commands {
        state.execute(command).unwrap();
        check_structure(&state);
    }
    assert_eq!(state.to_bytes(), b"ba");
}

proptest! {
    #[test]
    fn load_then_save_is_identity(
        bytes in prop::collection::vec(any::<u8>(), 0..200),
        capacity in 1usize..12,
    ) {
        let document = serializer::from_bytes(&bytes, capacity).unwrap();
        document.check_invariants();
        prop_assert_eq!(serializer::to_bytes(&document), bytes);
    }

    #[test]
    fn insert_then_backspace_restores(
        initial in text(),
        capacity in 1usize..6,
        moves in prop::collection::vec(direction(), 0..20),
        byte in prop::sample::select(b"pq ".to_vec()),
    ) {
        let mut state = EditorState::from_bytes(&initial, capacity, 5).unwrap();
        for direction in moves {
            state.move_cursor(direction);
        }
        let before = state.to_bytes();
        let position = (state.cursor_line_number(), state.cursor().column());

        state.insert_char(byte).unwrap();
        prop_assert!(state.delete_backward());

        prop_assert_eq!(state.to_bytes(), before);
        prop_assert_eq!(
            (state.cursor_line_number(), state.cursor().column()),
            position
        );
        check_structure(&state);
    }

    #[test]
    fn commands_match_a_flat_byte_model(
        initial in text(),
        capacity in 1usize..6,
        commands in prop::collection::vec(command(), 0..60),
    ) {
        let mut state = EditorState::from_bytes(&initial, capacity, 4).unwrap();
        let mut model = initial.clone();

        for command in commands {
            let offset = cursor_offset(&state);
            let result = state.execute(command).unwrap();
            match command {
                Command::InsertChar(byte) => {
                    model.insert(offset, byte);
                    prop_assert_eq!(cursor_offset(&state), offset + 1);
                }
                Command::SplitParagraph => {
                    model.insert(offset, b'\n');
                    prop_assert_eq!(cursor_offset(&state), offset + 1);
                }
                Command::DeleteBackward => {
                    prop_assert_eq!(result.applied, offset > 0);
                    if offset > 0 {
                        model.remove(offset - 1);
                        prop_assert_eq!(cursor_offset(&state), offset - 1);
                    }
                }
                Command::MoveCursor(_) => {}
            }
            prop_assert_eq!(state.to_bytes(), model.clone());
            check_structure(&state);

            let row = state.cursor_screen_position().row;
            prop_assert!(row < state.viewport().visible_lines());
        }
    }

    #[test]
    fn insert_at_start_of_full_run_shifts_by_one(
        capacity in 2usize..8,
        full_lines in 0usize..5,
        tail_seed in any::<usize>(),
    ) {
        let tail = tail_seed % capacity;
        let total = full_lines * capacity + tail;
        let bytes: Vec<u8> = (0..total).map(|i| b'a' + (i % 26) as u8).collect();
        let mut state = EditorState::from_bytes(&bytes, capacity, 4).unwrap();
        let before = state.document().byte_count();

        state.insert_char(b'#').unwrap();

        let document = state.document();
        let lengths: Vec<usize> = document.lines().map(|id| document.line(id).len()).collect();
        for length in &lengths[..full_lines] {
            prop_assert_eq!(*length, capacity);
        }
        prop_assert_eq!(lengths[full_lines], tail + 1);
        prop_assert_eq!(document.byte_count(), before + 1);

        let mut expected = bytes.clone();
        expected.insert(0, b'#');
        prop_assert_eq!(state.to_bytes(), expected);
    }
}
