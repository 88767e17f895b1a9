use lessonlab_core::services::geometry::{
    compute_bounds, pointer_to_percent, DragSession, DragState, PercentPoint, Point, Size,
};

// 400x400 container showing a 1920x1080 image: contain-fit renders it
// 400x225 with 87.5px bars top and bottom.
const CONTAINER: Size = Size {
    width: 400.0,
    height: 400.0,
};
const NATURAL: Size = Size {
    width: 1920.0,
    height: 1080.0,
};

#[test]
fn letterboxed_click_maps_to_image_percentages() {
    let bounds = compute_bounds(CONTAINER, NATURAL).unwrap();
    assert_eq!(bounds.rendered_width, 400.0);
    assert_eq!(bounds.rendered_height, 225.0);
    assert_eq!(bounds.offset_y, 87.5);

    let percent = pointer_to_percent(Point::new(200.0, 100.0), &bounds).unwrap();
    assert_eq!(percent.x, 50.0);
    assert_eq!(percent.y, 5.6);

    // A click in the top bar is not a click on the image.
    assert!(pointer_to_percent(Point::new(200.0, 50.0), &bounds).is_none());
}

#[test]
fn full_drag_interaction_commits_percent_positions() {
    let mut session = DragSession::new();
    session.image_loaded(CONTAINER, NATURAL);
    session.set_position(PercentPoint { x: 50.0, y: 50.0 });

    // Marker center renders at (200, 200); grab it.
    assert!(session.pointer_down(Point::new(205.0, 195.0), 16.0));
    assert_eq!(session.state(), DragState::Dragging);

    // Each in-bounds move commits immediately.
    let p1 = session.pointer_move(Point::new(300.0, 150.0)).unwrap();
    assert_eq!((p1.x, p1.y), (75.0, 27.8));

    // Dragging into the bottom letterbox bar holds the last position.
    assert!(session.pointer_move(Point::new(300.0, 350.0)).is_none());
    assert_eq!(session.position().unwrap(), p1);

    // Release anywhere ends the drag; later moves change nothing.
    session.pointer_up();
    assert_eq!(session.state(), DragState::Idle);
    assert!(session.pointer_move(Point::new(100.0, 100.0)).is_none());
    assert_eq!(session.position().unwrap(), p1);
}

#[test]
fn percent_position_is_resolution_independent_across_resizes() {
    let mut session = DragSession::new();
    session.image_loaded(CONTAINER, NATURAL);
    session.set_position(PercentPoint { x: 50.0, y: 50.0 });

    assert!(session.pointer_down(Point::new(200.0, 200.0), 16.0));
    let committed = session.pointer_move(Point::new(100.0, 143.75)).unwrap();
    assert_eq!((committed.x, committed.y), (25.0, 25.0));
    session.pointer_up();

    // The container doubles; the stored percentages stand, only the
    // derived bounds change.
    session.container_resized(Size::new(800.0, 800.0));
    let bounds = session.bounds().unwrap();
    assert!((bounds.rendered_width - 800.0).abs() < 1e-9);
    assert_eq!(bounds.offset_y, 175.0);
    assert_eq!(session.position().unwrap(), committed);
}

#[test]
fn broken_image_disables_dragging_until_reload() {
    let mut session = DragSession::new();
    session.image_loaded(CONTAINER, NATURAL);
    session.set_position(PercentPoint { x: 50.0, y: 50.0 });
    assert!(session.pointer_down(Point::new(200.0, 200.0), 16.0));

    session.image_failed();
    assert_eq!(session.state(), DragState::Idle);
    assert!(session.bounds().is_none());
    assert!(!session.pointer_down(Point::new(200.0, 200.0), 16.0));

    session.image_loaded(CONTAINER, NATURAL);
    assert!(session.pointer_down(Point::new(200.0, 200.0), 16.0));
}
