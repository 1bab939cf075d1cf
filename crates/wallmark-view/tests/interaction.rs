use approx::assert_relative_eq;
use wallmark_core::annotation::AnnotationKind;
use wallmark_core::camera::InteractionMode;
use wallmark_core::config::ViewerConfig;
use wallmark_core::geom::Vec2;
use wallmark_core::room::WallId;
use wallmark_view::{Gesture, InteractionController, InteractionEvent, Viewport};

fn controller() -> InteractionController {
    let mut c = InteractionController::new(&ViewerConfig::default()).unwrap();
    c.set_viewport(Viewport::new(800.0, 600.0));
    c
}

/// Camera behind the front wall (yaw 180), so it is the closest surface.
fn facing_front() -> ViewerConfig {
    let mut config = ViewerConfig::default();
    config.camera.default_yaw = 180.0;
    config
}

fn editor() -> InteractionController {
    let mut c = InteractionController::new(&facing_front()).unwrap();
    c.set_viewport(Viewport::new(800.0, 600.0));
    c.set_edit_mode(true);
    c
}

fn front(c: &InteractionController, u: f32, v: f32) -> Vec2 {
    let m = c.matrices().unwrap();
    m.project(c.room().wall_to_world(WallId::Front, Vec2::new(u, v))).unwrap()
}

fn drag(c: &mut InteractionController, from: Vec2, to: Vec2) -> Vec<InteractionEvent> {
    let mut events = c.handle(Gesture::Down { x: from.x, y: from.y });
    events.extend(c.handle(Gesture::Move { x: to.x, y: to.y }));
    events.extend(c.handle(Gesture::Up { x: to.x, y: to.y }));
    events
}

#[test]
fn rotation_drag_uses_half_degree_per_pixel() {
    let mut c = controller();
    drag(&mut c, Vec2::new(100.0, 100.0), Vec2::new(140.0, 120.0));
    let s = c.camera().state();
    assert_relative_eq!(s.yaw, 20.0);
    assert_relative_eq!(s.pitch, 10.0);
}

#[test]
fn huge_drags_keep_pitch_in_range() {
    let mut c = controller();
    drag(&mut c, Vec2::new(0.0, 0.0), Vec2::new(0.0, 10_000.0));
    assert_eq!(80.0, c.camera().state().pitch);
    drag(&mut c, Vec2::new(0.0, 10_000.0), Vec2::new(0.0, -50_000.0));
    assert_eq!(-80.0, c.camera().state().pitch);
}

#[test]
fn long_press_toggles_pan_and_pan_inverts_y() {
    let mut c = controller();
    assert_eq!(
        vec![InteractionEvent::ModeChanged(InteractionMode::Pan)],
        c.handle(Gesture::LongPress)
    );
    drag(&mut c, Vec2::new(0.0, 0.0), Vec2::new(100.0, 50.0));
    let s = c.camera().state();
    assert_relative_eq!(s.pan_x, 1.0, epsilon = 1e-5);
    assert_relative_eq!(s.pan_y, -0.5, epsilon = 1e-5);

    c.handle(Gesture::LongPress);
    assert_eq!(InteractionMode::Rotation, c.state().mode);
}

#[test]
fn pinch_zooms_with_clamp_and_restores_previous_mode() {
    let mut c = controller();
    c.handle(Gesture::LongPress);
    c.handle(Gesture::PinchBegin);
    assert_eq!(InteractionMode::Zoom, c.state().mode);

    c.handle(Gesture::Pinch { scale: 2.0 });
    assert_relative_eq!(c.camera().state().zoom, 3.5);
    c.handle(Gesture::Pinch { scale: 0.001 });
    assert_eq!(10.0, c.camera().state().zoom);
    c.handle(Gesture::Pinch { scale: 1e6 });
    assert_eq!(1.0, c.camera().state().zoom);

    // Finger movement during the pinch does not pan.
    c.handle(Gesture::Move { x: 10.0, y: 10.0 });
    c.handle(Gesture::Move { x: 300.0, y: 300.0 });
    assert_eq!(0.0, c.camera().state().pan_x);

    c.handle(Gesture::PinchEnd);
    assert_eq!(InteractionMode::Pan, c.state().mode);
}

#[test]
fn edit_toggle_during_pinch_restores_the_overridden_mode() {
    let mut c = controller();
    c.handle(Gesture::PinchBegin);
    assert_eq!(InteractionMode::Zoom, c.state().mode);

    c.set_edit_mode(true);
    assert_eq!(InteractionMode::Rotation, c.state().mode);
    assert!(c.handle(Gesture::PinchEnd).is_empty());
    c.set_edit_mode(false);
    assert_eq!(InteractionMode::Rotation, c.state().mode);

    drag(&mut c, Vec2::new(0.0, 0.0), Vec2::new(20.0, 0.0));
    assert_relative_eq!(c.camera().state().yaw, 10.0);

    // The pan/rotate toggle works on the restored mode as usual.
    c.handle(Gesture::LongPress);
    drag(&mut c, Vec2::new(0.0, 0.0), Vec2::new(100.0, 0.0));
    assert_relative_eq!(c.camera().state().pan_x, 1.0, epsilon = 1e-5);
}

#[test]
fn double_tap_resets_camera() {
    let mut c = controller();
    drag(&mut c, Vec2::new(0.0, 0.0), Vec2::new(60.0, 60.0));
    c.handle(Gesture::Pinch { scale: 3.0 });
    assert_eq!(vec![InteractionEvent::CameraReset], c.handle(Gesture::DoubleTap));
    let s = c.camera().state();
    assert_eq!((0.0, 0.0, 7.0, 0.0, 0.0), (s.pitch, s.yaw, s.zoom, s.pan_x, s.pan_y));
}

#[test]
fn edit_mode_suspends_camera_handling() {
    let mut c = controller();
    c.set_edit_mode(true);
    assert!(!c.set_zoom(2.0));
    assert!(!c.set_rotation(10.0, 10.0));
    assert!(!c.set_pan(1.0, 1.0));
    assert!(c.handle(Gesture::LongPress).is_empty());
    assert!(c.handle(Gesture::Pinch { scale: 4.0 }).is_empty());
    c.handle(Gesture::DoubleTap);
    assert_eq!(7.0, c.camera().state().zoom);
    assert_eq!(InteractionMode::Rotation, c.state().mode);
}

#[test]
fn edit_drag_produces_tagged_annotation() {
    let mut config = facing_front();
    config.room_id = 3;
    let mut c = InteractionController::new(&config).unwrap();
    c.set_viewport(Viewport::new(800.0, 600.0));
    c.set_edit_mode(true);
    c.set_selected_kind(AnnotationKind::Obstacle);

    let (from, to) = (front(&c, 0.2, 0.2), front(&c, 0.6, 0.5));
    let events = drag(&mut c, from, to);
    assert_eq!(InteractionEvent::SelectionStarted(WallId::Front), events[0]);
    let ann = match events.last() {
        Some(InteractionEvent::AnnotationCompleted(a)) => a.clone(),
        other => panic!("unexpected {other:?}"),
    };
    assert_eq!(4, ann.wall.index());
    assert_eq!(3, ann.room_id);
    assert_eq!(AnnotationKind::Obstacle, ann.kind);
    assert_relative_eq!(ann.x1, 0.2, epsilon = 1e-3);
    assert_relative_eq!(ann.y2, 0.5, epsilon = 1e-3);
    assert!(c.selection().is_none());
}

#[test]
fn cancelled_drag_never_completes() {
    let mut c = editor();
    let start = front(&c, 0.3, 0.3);
    c.handle(Gesture::Down { x: start.x, y: start.y });
    let mid = front(&c, 0.5, 0.5);
    c.handle(Gesture::Move { x: mid.x, y: mid.y });
    assert!(c.selection().is_some());

    assert_eq!(vec![InteractionEvent::SelectionCancelled], c.handle(Gesture::Cancel));
    assert!(c.handle(Gesture::Up { x: mid.x, y: mid.y }).is_empty());
    assert!(c.selection().is_none());
}

#[test]
fn leaving_edit_mode_drops_the_selection() {
    let mut c = editor();
    let p = front(&c, 0.5, 0.5);
    c.handle(Gesture::Down { x: p.x, y: p.y });
    assert!(c.selection().is_some());
    c.set_edit_mode(false);
    assert!(c.selection().is_none());
}

#[test]
fn edit_down_on_empty_space_is_a_miss() {
    let mut c = controller();
    c.set_edit_mode(true);
    assert_eq!(vec![InteractionEvent::SelectionMissed], c.handle(Gesture::Down { x: 1.0, y: 1.0 }));
}

#[test]
fn snapshot_is_an_owned_copy() {
    let mut c = controller();
    let snap = c.snapshot(&[]);
    c.handle(Gesture::Pinch { scale: 2.0 });
    assert_eq!(7.0, snap.camera.zoom);
    assert!(snap.matrices.is_some());

    let handle = std::thread::spawn(move || snap.camera.zoom);
    assert_eq!(7.0, handle.join().unwrap());
}

#[test]
fn gestures_deserialize_from_tagged_json() {
    let g: Vec<Gesture> = serde_json::from_str(
        r#"[{"type":"down","x":1,"y":2},{"type":"pinch","scale":1.5},{"type":"double_tap"}]"#,
    )
    .unwrap();
    assert_eq!(Gesture::Down { x: 1.0, y: 2.0 }, g[0]);
    assert_eq!(Gesture::Pinch { scale: 1.5 }, g[1]);
    assert_eq!(Gesture::DoubleTap, g[2]);
}

#[test]
fn surface_changes_drive_the_viewport() {
    use wallmark_core::surface::{ChainedSurface, NoSurface, SurfaceCallback};

    let c = InteractionController::new(&ViewerConfig::default()).unwrap();
    let mut surface: ChainedSurface<InteractionController, NoSurface> = ChainedSurface::new(c, None);
    assert!(surface.inner().matrices().is_none());

    surface.resize(1024, 768);
    assert_eq!(Viewport::new(1024.0, 768.0), surface.inner().viewport());
    assert!(surface.inner().matrices().is_some());

    surface.surface_destroyed();
    assert!(surface.inner().matrices().is_none());
}
