use wallmark_core::annotation::{AnnotationKind, WallAnnotation};
use wallmark_core::geom::Vec2;
use wallmark_core::report::AnnotationStats;
use wallmark_core::room::WallId;
use wallmark_core::Error;

#[test]
fn corners_are_ordered_regardless_of_drag_direction() {
    let a = Vec2::new(0.6, 0.5);
    let b = Vec2::new(0.2, 0.2);
    for (start, end) in [(a, b), (b, a), (Vec2::new(0.2, 0.5), Vec2::new(0.6, 0.2))] {
        let ann = WallAnnotation::from_corners(WallId::Front, start, end, AnnotationKind::SprayArea);
        assert_eq!((0.2, 0.2, 0.6, 0.5), (ann.x1, ann.y1, ann.x2, ann.y2));
        assert!(ann.validate().is_ok());
    }
}

#[test]
fn kinds_parse_from_loose_names() {
    assert_eq!(AnnotationKind::SprayArea, "paint".parse().unwrap());
    assert_eq!(AnnotationKind::SandArea, "Sand-Area".parse().unwrap());
    assert_eq!(AnnotationKind::Obstacle, " obstacle ".parse().unwrap());
    assert!(matches!("gravel".parse::<AnnotationKind>(), Err(Error::UnknownKind(_))));
}

#[test]
fn json_shape_uses_wall_index_and_screaming_kind() {
    let ann = WallAnnotation::from_corners(
        WallId::Back,
        Vec2::new(0.1, 0.2),
        Vec2::new(0.3, 0.4),
        AnnotationKind::Obstacle,
    )
    .with_room(7)
    .with_notes("pipe");
    let value = serde_json::to_value(&ann).unwrap();
    assert_eq!(5, value["wall_index"]);
    assert_eq!("OBSTACLE", value["kind"]);
    assert_eq!(7, value["room_id"]);
    assert_eq!("pipe", value["notes"]);
    assert!(value.get("id").is_none());

    let back: WallAnnotation = serde_json::from_value(value).unwrap();
    assert_eq!(ann, back);
}

#[test]
fn empty_notes_are_dropped() {
    let ann = WallAnnotation::from_corners(WallId::Floor, Vec2::new(0.0, 0.0), Vec2::new(1.0, 1.0), AnnotationKind::SandArea)
        .with_notes("");
    assert_eq!(None, ann.notes);
}

#[test]
fn validation_rejects_out_of_range_and_unordered() {
    let mut ann = WallAnnotation::from_corners(WallId::Left, Vec2::new(0.1, 0.1), Vec2::new(0.4, 0.4), AnnotationKind::SprayArea);
    ann.x2 = 1.2;
    assert!(matches!(ann.validate(), Err(Error::CoordinateOutOfRange { name: "x2", .. })));

    ann.x2 = 0.05;
    assert!(matches!(ann.validate(), Err(Error::UnorderedCorners)));
    assert!(ann.order_corners());
    assert!(ann.validate().is_ok());
}

#[test]
fn stats_group_by_wall_and_kind() {
    let rows = vec![
        WallAnnotation::from_corners(WallId::Front, Vec2::new(0.0, 0.0), Vec2::new(0.5, 0.5), AnnotationKind::SprayArea),
        WallAnnotation::from_corners(WallId::Front, Vec2::new(0.0, 0.0), Vec2::new(0.5, 1.0), AnnotationKind::Obstacle),
        WallAnnotation::from_corners(WallId::Floor, Vec2::new(0.0, 0.0), Vec2::new(1.0, 1.0), AnnotationKind::SprayArea),
    ];
    let stats = AnnotationStats::collect(&rows);
    assert_eq!(3, stats.total);
    assert_eq!(Some(&2), stats.per_wall.get(&4));
    assert_eq!(Some(&1), stats.per_wall.get(&0));
    assert_eq!(Some(&2), stats.per_kind.get("SPRAY_AREA"));
    assert!((stats.covered_area - 1.75).abs() < 1e-6);
}
