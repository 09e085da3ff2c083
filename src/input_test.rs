use super::*;

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

// =============================================================
// PointerSource
// =============================================================

#[test]
fn pointer_source_default_is_mouse() {
    assert_eq!(PointerSource::default(), PointerSource::Mouse);
}

#[test]
fn only_touch_suppresses_scroll() {
    assert!(PointerSource::Touch.suppresses_scroll());
    assert!(!PointerSource::Mouse.suppresses_scroll());
    assert!(!PointerSource::Pen.suppresses_scroll());
}

#[test]
fn pointer_type_maps_to_source() {
    assert_eq!(PointerSource::from_pointer_type("pen"), PointerSource::Pen);
    assert_eq!(PointerSource::from_pointer_type("touch"), PointerSource::Touch);
    assert_eq!(PointerSource::from_pointer_type("mouse"), PointerSource::Mouse);
    assert_eq!(PointerSource::from_pointer_type(""), PointerSource::Mouse);
}

// =============================================================
// InputState
// =============================================================

#[test]
fn input_state_default_is_idle() {
    let state = InputState::default();
    assert_eq!(state, InputState::Idle);
    assert!(!state.is_drawing());
    assert!(state.points().is_empty());
}

#[test]
fn begin_enters_drawing_with_first_point() {
    let mut state = InputState::default();
    state.begin(pt(1.0, 2.0));
    assert!(state.is_drawing());
    assert_eq!(state.points(), &[pt(1.0, 2.0)]);
}

#[test]
fn begin_while_drawing_starts_over() {
    let mut state = InputState::default();
    state.begin(pt(1.0, 1.0));
    state.extend(pt(2.0, 2.0));
    state.begin(pt(9.0, 9.0));
    assert_eq!(state.points(), &[pt(9.0, 9.0)]);
}

#[test]
fn extend_appends_while_drawing() {
    let mut state = InputState::default();
    state.begin(pt(0.0, 0.0));
    assert!(state.extend(pt(1.0, 0.0)));
    assert!(state.extend(pt(2.0, 0.0)));
    assert_eq!(state.points().len(), 3);
}

#[test]
fn extend_ignored_when_idle() {
    let mut state = InputState::default();
    assert!(!state.extend(pt(1.0, 1.0)));
    assert_eq!(state, InputState::Idle);
}

#[test]
fn finish_returns_points_and_goes_idle() {
    let mut state = InputState::default();
    state.begin(pt(0.0, 0.0));
    state.extend(pt(5.0, 5.0));
    let points = state.finish();
    assert_eq!(points, Some(vec![pt(0.0, 0.0), pt(5.0, 5.0)]));
    assert_eq!(state, InputState::Idle);
}

#[test]
fn finish_when_idle_is_none() {
    let mut state = InputState::default();
    assert!(state.finish().is_none());
}

#[test]
fn reset_drops_gesture() {
    let mut state = InputState::default();
    state.begin(pt(0.0, 0.0));
    state.reset();
    assert!(!state.is_drawing());
}
