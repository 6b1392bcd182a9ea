//! Wrapper-layer contract: mutations void cursors and references, drops
//! void watchers, and violations surface on access.
//!
//! The engine is process-wide, so every test serializes on one lock and
//! installs its own recording handler.

use std::sync::{Mutex, MutexGuard, OnceLock};

use tether::{global, RecordingHandler};
use tether_text::{Text, TrackedCell};

fn engine_session() -> (MutexGuard<'static, ()>, RecordingHandler) {
    static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    let guard = match LOCK.get_or_init(|| Mutex::new(())).lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };
    let recorder = RecordingHandler::new();
    global::set_violation_handler(Some(Box::new(recorder.clone())));
    (guard, recorder)
}

#[test]
fn test_cursor_is_voided_by_mutation() {
    let (_guard, recorder) = engine_session();
    let mut text = Text::from("abc");
    let cursor = text.cursor();

    assert_eq!(cursor.get(), Some('a'));
    assert!(recorder.temporal_violations().is_empty());

    text.push('d');
    cursor.get();
    assert_eq!(recorder.temporal_violations().len(), 1);
}

#[test]
fn test_text_itself_survives_its_own_mutation() {
    let (_guard, recorder) = engine_session();
    let mut text = Text::from("abc");
    let _stale = text.cursor();
    text.push('d');

    // A cursor taken after the mutation is fine.
    let fresh = text.cursor();
    assert_eq!(fresh.get(), Some('a'));
    assert_eq!(text.to_string(), "abcd");
    assert!(recorder.temporal_violations().is_empty());
}

#[test]
fn test_char_ref_is_voided_by_mutation() {
    let (_guard, recorder) = engine_session();
    let mut text = Text::from("abc");
    let middle = text.char_at(1);

    assert_eq!(middle.get(), Some('b'));
    text.truncate(2);
    middle.get();
    assert_eq!(recorder.temporal_violations().len(), 1);
}

#[test]
fn test_cursor_clone_tracks_the_same_text() {
    let (_guard, recorder) = engine_session();
    let mut text = Text::from("abc");
    let cursor = text.cursor();
    let copy = cursor.clone();

    text.push('d');
    copy.get();
    assert_eq!(recorder.temporal_violations().len(), 1);
}

#[test]
fn test_clone_of_voided_cursor_is_voided() {
    let (_guard, recorder) = engine_session();
    let mut text = Text::from("abc");
    let cursor = text.cursor();
    text.push('d');

    let copy = cursor.clone();
    copy.get();
    assert_eq!(recorder.temporal_violations().len(), 1);
}

#[test]
fn test_watcher_is_voided_by_cell_drop() {
    let (_guard, recorder) = engine_session();
    let cell = TrackedCell::new(5);
    let watcher = cell.watch();

    assert_eq!(watcher.get(), Some(5));
    drop(cell);

    assert_eq!(watcher.get(), None);
    assert_eq!(recorder.temporal_violations().len(), 1);
}

#[test]
fn test_existence_watcher_survives_modification() {
    let (_guard, recorder) = engine_session();
    let cell = TrackedCell::new(5);
    let watcher = cell.watch();

    cell.set(6);
    assert_eq!(watcher.get(), Some(6));
    assert!(recorder.temporal_violations().is_empty());
}

#[test]
fn test_content_watcher_is_voided_by_modification() {
    let (_guard, recorder) = engine_session();
    let cell = TrackedCell::new(5);
    let watcher = cell.watch_contents();

    cell.update(|value| *value += 1);
    watcher.get();
    assert_eq!(recorder.temporal_violations().len(), 1);
}

#[test]
fn test_rebind_restores_a_voided_watcher() {
    let (_guard, recorder) = engine_session();
    let first = TrackedCell::new(1);
    let mut watcher = first.watch();
    drop(first);

    watcher.get();
    assert_eq!(recorder.temporal_violations().len(), 1);

    let second = TrackedCell::new(2);
    watcher.rebind(&second);
    assert_eq!(watcher.get(), Some(2));
    assert_eq!(recorder.temporal_violations().len(), 1);
}

#[test]
fn test_watcher_clone_inherits_broken_state() {
    let (_guard, recorder) = engine_session();
    let cell = TrackedCell::new(1);
    let watcher = cell.watch();
    drop(cell);

    let copy = watcher.clone();
    copy.get();
    // One violation per access to a voided reference; the clone itself
    // reports nothing.
    assert_eq!(recorder.temporal_violations().len(), 1);
}

#[test]
fn test_stepping_past_the_end_is_a_spatial_violation() {
    let (_guard, recorder) = engine_session();
    let text = Text::from("ab");
    let mut cursor = text.cursor();

    cursor.advance();
    cursor.advance();
    assert_eq!(recorder.spatial_violations(), 0);
    assert!(cursor.at_end());

    cursor.advance();
    assert_eq!(recorder.spatial_violations(), 1);

    let mut hopper = text.cursor();
    hopper.step(2);
    assert_eq!(recorder.spatial_violations(), 1);
    hopper.step(1);
    assert_eq!(recorder.spatial_violations(), 2);
}

#[test]
fn test_out_of_bounds_element_access_is_spatial() {
    let (_guard, recorder) = engine_session();
    let mut text = Text::from("ab");
    let _ = text.char_at(5);
    assert_eq!(recorder.spatial_violations(), 1);

    text.remove(7);
    assert_eq!(recorder.spatial_violations(), 2);
}

#[test]
fn test_remove_at_hands_back_a_live_cursor() {
    let (_guard, recorder) = engine_session();
    let mut text = Text::from("abc");
    let mut cursor = text.cursor();
    cursor.advance();

    let next = text.remove_at(&cursor);
    assert_eq!(text.to_string(), "ac");
    assert_eq!(next.get(), Some('c'));
    assert!(recorder.temporal_violations().is_empty());

    // The old cursor went stale with the mutation.
    cursor.get();
    assert_eq!(recorder.temporal_violations().len(), 1);
}

#[test]
fn test_swap_voids_cursors_on_both_sides() {
    let (_guard, recorder) = engine_session();
    let mut left = Text::from("left");
    let mut right = Text::from("right");
    let left_cursor = left.cursor();
    let right_cursor = right.cursor();

    left.swap(&mut right);
    assert_eq!(left.to_string(), "right");

    left_cursor.get();
    right_cursor.get();
    assert_eq!(recorder.temporal_violations().len(), 2);
}

#[test]
fn test_text_clone_is_independent() {
    let (_guard, recorder) = engine_session();
    let text = Text::from("abc");
    let mut copy = text.clone();
    let cursor = text.cursor();

    copy.push('d');
    assert_eq!(cursor.get(), Some('a'));
    assert_eq!(text.to_string(), "abc");
    assert_eq!(copy.to_string(), "abcd");
    assert!(recorder.temporal_violations().is_empty());
}
