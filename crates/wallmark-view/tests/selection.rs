use approx::assert_relative_eq;
use wallmark_core::annotation::AnnotationKind;
use wallmark_core::camera::{Camera, CameraConfig};
use wallmark_core::config::PickConfig;
use wallmark_core::geom::Vec2;
use wallmark_core::room::{Room, WallId};
use wallmark_view::selection::SelectionMode;
use wallmark_view::{CameraMatrices, Viewport, WallPicker, WallSelector};

/// Camera behind the front wall, which is then the closest surface.
fn setup() -> (WallPicker, CameraMatrices) {
    let camera = Camera::new(CameraConfig {
        default_yaw: 180.0,
        ..CameraConfig::default()
    });
    let m = CameraMatrices::from_camera(&camera, Viewport::new(800.0, 600.0)).unwrap();
    (WallPicker::new(Room::default(), PickConfig::default()), m)
}

fn screen_of(m: &CameraMatrices, wall: WallId, u: f32, v: f32) -> Vec2 {
    m.project(Room::default().wall_to_world(wall, Vec2::new(u, v))).unwrap()
}

#[test]
fn drag_on_front_wall_yields_ordered_annotation() {
    let (picker, m) = setup();
    let mut sel = WallSelector::new();

    assert!(sel.start_selection(&picker, &m, screen_of(&m, WallId::Front, 0.2, 0.2)));
    assert_eq!(SelectionMode::Selecting, sel.mode());
    assert!(sel.update_selection(&picker, &m, screen_of(&m, WallId::Front, 0.6, 0.5)));

    let ann = sel.finish_selection(AnnotationKind::SandArea).unwrap();
    assert_eq!(WallId::Front, ann.wall);
    assert_eq!(4, ann.wall.index());
    assert_relative_eq!(ann.x1, 0.2, epsilon = 1e-3);
    assert_relative_eq!(ann.y1, 0.2, epsilon = 1e-3);
    assert_relative_eq!(ann.x2, 0.6, epsilon = 1e-3);
    assert_relative_eq!(ann.y2, 0.5, epsilon = 1e-3);
    assert_eq!(AnnotationKind::SandArea, ann.kind);
    assert_eq!(SelectionMode::None, sel.mode());
}

#[test]
fn reverse_drag_still_orders_corners() {
    let (picker, m) = setup();
    let mut sel = WallSelector::new();
    assert!(sel.start_selection(&picker, &m, screen_of(&m, WallId::Front, 0.8, 0.9)));
    assert!(sel.update_selection(&picker, &m, screen_of(&m, WallId::Front, 0.1, 0.3)));
    let ann = sel.finish_selection(AnnotationKind::Obstacle).unwrap();
    assert!(ann.x1 <= ann.x2 && ann.y1 <= ann.y2);
    assert!(ann.validate().is_ok());
}

#[test]
fn off_wall_moves_are_ignored_not_aborted() {
    let (picker, m) = setup();
    let mut sel = WallSelector::new();
    assert!(sel.start_selection(&picker, &m, screen_of(&m, WallId::Front, 0.5, 0.5)));
    assert!(sel.update_selection(&picker, &m, screen_of(&m, WallId::Front, 0.7, 0.6)));
    let before = *sel.current().unwrap();

    assert!(!sel.update_selection(&picker, &m, Vec2::new(2.0, 2.0)));
    assert!(sel.is_selecting());
    assert_eq!(before, *sel.current().unwrap());
}

#[test]
fn start_on_empty_space_fails() {
    let (picker, m) = setup();
    let mut sel = WallSelector::new();
    assert!(!sel.start_selection(&picker, &m, Vec2::new(2.0, 2.0)));
    assert!(sel.finish_selection(AnnotationKind::SprayArea).is_none());
}

#[test]
fn cancel_discards_everything() {
    let (picker, m) = setup();
    let mut sel = WallSelector::new();
    assert!(sel.start_selection(&picker, &m, screen_of(&m, WallId::Front, 0.5, 0.5)));
    sel.cancel_selection();
    assert!(sel.current().is_none());
    assert!(sel.finish_selection(AnnotationKind::SprayArea).is_none());
    sel.cancel_selection();
}

#[test]
fn tap_without_drag_gives_zero_area_annotation() {
    let mut sel = WallSelector::new();
    assert!(sel.start_uv(WallId::Floor, Vec2::new(0.4, 0.4)));
    let ann = sel.finish_selection(AnnotationKind::SprayArea).unwrap();
    assert_eq!(0.0, ann.area());
}
