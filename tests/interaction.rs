use approx::assert_relative_eq;
use nalgebra::{Point2, Vector2};
use orrery_sandbox::input::interaction::{InteractionState, PointerEvent, Response};
use orrery_sandbox::input::view::ViewTransform;
use orrery_sandbox::model::sandbox::{PointTarget, SandboxScene};

fn setup() -> (InteractionState, SandboxScene, ViewTransform) {
    (
        InteractionState::default(),
        SandboxScene::default(),
        ViewTransform::default(),
    )
}

fn send(
    events: &[PointerEvent],
    state: &mut InteractionState,
    scene: &mut SandboxScene,
    view: &mut ViewTransform,
) -> Vec<Response> {
    events.iter().map(|&e| state.handle(e, scene, view)).collect()
}

fn x_handle_on_screen(scene: &SandboxScene, view: &ViewTransform) -> Point2<f32> {
    view.world_to_screen(&scene.point(PointTarget::BasisX), None)
}

#[test]
fn test_pick_radius_boundary() {
    let (mut state, mut scene, mut view) = setup();
    let handle = x_handle_on_screen(&scene, &view);

    let outside = handle + Vector2::new(10.1, 0.0);
    let responses = send(
        &[PointerEvent::Moved(outside), PointerEvent::PrimaryPressed],
        &mut state,
        &mut scene,
        &mut view,
    );
    assert_eq!(responses[1], Response::Nothing);

    let inside = handle + Vector2::new(9.9, 0.0);
    let responses = send(
        &[PointerEvent::Moved(inside), PointerEvent::PrimaryPressed],
        &mut state,
        &mut scene,
        &mut view,
    );
    assert_eq!(responses[1], Response::DragStarted(3));
}

#[test]
fn test_drag_keeps_grab_offset() {
    let (mut state, mut scene, mut view) = setup();
    let start = x_handle_on_screen(&scene, &view) + Vector2::new(5.0, 0.0);

    send(
        &[PointerEvent::Moved(start), PointerEvent::PrimaryPressed],
        &mut state,
        &mut scene,
        &mut view,
    );
    assert!(state.is_dragging());

    // Five small moves, 20 px right and 10 px up each
    for step in 1..=5 {
        let cursor = start + Vector2::new(20.0, -10.0) * step as f32;
        assert_eq!(
            state.handle(PointerEvent::Moved(cursor), &mut scene, &mut view),
            Response::PointMoved(3)
        );
    }
    assert_relative_eq!(
        scene.point(PointTarget::BasisX),
        Point2::new(3.0, 1.0),
        epsilon = 1e-4
    );

    // Coming back to the start puts the handle back where it was
    state.handle(PointerEvent::Moved(start), &mut scene, &mut view);
    assert_relative_eq!(
        scene.point(PointTarget::BasisX),
        Point2::new(1.0, 0.0),
        epsilon = 1e-4
    );
    assert_eq!(
        state.handle(PointerEvent::PrimaryReleased, &mut scene, &mut view),
        Response::DragEnded
    );
}

#[test]
fn test_pan_and_drag_exclude_each_other() {
    let (mut state, mut scene, mut view) = setup();
    let handle = x_handle_on_screen(&scene, &view);

    // Dragging blocks panning
    send(
        &[PointerEvent::Moved(handle), PointerEvent::PrimaryPressed],
        &mut state,
        &mut scene,
        &mut view,
    );
    state.handle(PointerEvent::SecondaryPressed, &mut scene, &mut view);
    assert!(state.is_dragging());
    assert!(!state.is_panning());
    let origin = view.origin;
    state.handle(
        PointerEvent::Moved(handle + Vector2::new(30.0, 0.0)),
        &mut scene,
        &mut view,
    );
    assert_eq!(view.origin, origin);
    send(
        &[PointerEvent::PrimaryReleased, PointerEvent::SecondaryReleased],
        &mut state,
        &mut scene,
        &mut view,
    );

    // Panning blocks dragging
    let handle = x_handle_on_screen(&scene, &view);
    send(
        &[PointerEvent::Moved(handle), PointerEvent::SecondaryPressed],
        &mut state,
        &mut scene,
        &mut view,
    );
    assert!(state.is_panning());
    assert_eq!(
        state.handle(PointerEvent::PrimaryPressed, &mut scene, &mut view),
        Response::Nothing
    );
    let before = scene.point(PointTarget::BasisX);
    assert_eq!(
        state.handle(
            PointerEvent::Moved(handle + Vector2::new(40.0, 20.0)),
            &mut scene,
            &mut view
        ),
        Response::ViewChanged
    );
    assert_eq!(scene.point(PointTarget::BasisX), before);
    assert_relative_eq!(view.origin, origin + Vector2::new(40.0, -20.0));
}

#[test]
fn test_ui_capture_blocks_grab_and_zoom() {
    let (mut state, mut scene, mut view) = setup();
    let handle = x_handle_on_screen(&scene, &view);
    state.handle(PointerEvent::Moved(handle), &mut scene, &mut view);
    state.ui_captures_pointer = true;

    let responses = send(
        &[
            PointerEvent::PrimaryPressed,
            PointerEvent::SecondaryPressed,
            PointerEvent::Scrolled(2.0),
        ],
        &mut state,
        &mut scene,
        &mut view,
    );
    assert!(responses.iter().all(|r| *r == Response::Nothing));
    assert!(!state.is_dragging());
    assert!(!state.is_panning());
    assert_eq!(view, ViewTransform::default());
}

#[test]
fn test_grab_through_custom_basis() {
    let (mut state, mut scene, mut view) = setup();
    scene.set_point(PointTarget::BasisX, Point2::new(2.0, 0.0));
    scene.set_point(PointTarget::BasisY, Point2::new(0.0, 2.0));

    // The pivot at (1, 1) in basis space shows up at (2, 2) on the grid
    let basis = scene.basis.matrix();
    let pivot = view.world_to_screen(&scene.point(PointTarget::RotatePivot), Some(&basis));
    assert_relative_eq!(pivot, view.world_to_screen(&Point2::new(2.0, 2.0), None));

    send(
        &[PointerEvent::Moved(pivot), PointerEvent::PrimaryPressed],
        &mut state,
        &mut scene,
        &mut view,
    );
    // 50 px per grid unit, so 100 px per basis unit
    state.handle(
        PointerEvent::Moved(pivot + Vector2::new(100.0, 0.0)),
        &mut scene,
        &mut view,
    );
    assert_relative_eq!(
        scene.point(PointTarget::RotatePivot),
        Point2::new(2.0, 1.0),
        epsilon = 1e-4
    );
}

#[test]
fn test_screen_world_round_trip_after_zoom() {
    let mut view = ViewTransform::default();
    view.zoom_by(1.1f32.powi(3));
    view.pan_by(&Vector2::new(-37.0, 12.0));

    for &(x, y) in [(0.0, 0.0), (333.0, 777.0), (1279.0, 1199.0)].iter() {
        let screen = Point2::new(x, y);
        let world = view.screen_to_world(&screen, None).unwrap();
        assert_relative_eq!(view.world_to_screen(&world, None), screen, epsilon = 1e-2);
    }
}

#[test]
fn test_collinear_basis_freezes_basis_points() {
    let (mut state, mut scene, mut view) = setup();
    let pivot = view.world_to_screen(&scene.point(PointTarget::RotatePivot), None);
    send(
        &[PointerEvent::Moved(pivot), PointerEvent::PrimaryPressed],
        &mut state,
        &mut scene,
        &mut view,
    );
    assert!(state.is_dragging());

    // Collapse the basis mid-drag; the axes are collinear but not exactly so
    scene.set_point(PointTarget::BasisX, Point2::new(1.1, 3.3));
    scene.set_point(PointTarget::BasisY, Point2::new(0.7, 2.1));
    assert!(scene.basis.is_degenerate());

    let before = scene.point(PointTarget::RotatePivot);
    assert_eq!(
        state.handle(
            PointerEvent::Moved(pivot + Vector2::new(25.0, -5.0)),
            &mut scene,
            &mut view
        ),
        Response::Nothing
    );
    assert_eq!(scene.point(PointTarget::RotatePivot), before);

    // Grid-space handles can still be grabbed
    state.handle(PointerEvent::PrimaryReleased, &mut scene, &mut view);
    let origin = view.world_to_screen(&scene.point(PointTarget::BasisOrigin), None);
    let responses = send(
        &[PointerEvent::Moved(origin), PointerEvent::PrimaryPressed],
        &mut state,
        &mut scene,
        &mut view,
    );
    assert_eq!(responses[1], Response::DragStarted(2));
}
