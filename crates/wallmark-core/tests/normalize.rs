use wallmark_core::annotation::{AnnotationKind, WallAnnotation};
use wallmark_core::normalize::{normalize_in_place, NormalizeConfig};
use wallmark_core::room::WallId;

fn raw(wall: WallId, x1: f32, y1: f32, x2: f32, y2: f32) -> WallAnnotation {
    WallAnnotation {
        id: None,
        room_id: 0,
        wall,
        x1,
        y1,
        x2,
        y2,
        kind: AnnotationKind::SandArea,
        notes: None,
    }
}

#[test]
fn reorders_swapped_corners_and_drops_out_of_range_rows() {
    let mut rows = vec![
        raw(WallId::Front, 0.6, 0.5, 0.2, 0.2),
        raw(WallId::Left, 0.1, 0.1, 1.5, 0.3),
        raw(WallId::Floor, 0.0, 0.0, 1.0, 1.0),
    ];

    let stats = normalize_in_place(&mut rows, &NormalizeConfig::default());
    assert_eq!(1, stats.reordered);
    assert_eq!(1, stats.removed_invalid);
    assert_eq!(0, stats.removed_degenerate);
    assert_eq!(2, rows.len());
    assert_eq!((0.2, 0.2, 0.6, 0.5), (rows[0].x1, rows[0].y1, rows[0].x2, rows[0].y2));
}

#[test]
fn degenerate_rows_survive_unless_requested() {
    let mut rows = vec![raw(WallId::Back, 0.3, 0.3, 0.3, 0.8), raw(WallId::Back, 0.1, 0.1, 0.4, 0.4)];
    let mut kept = rows.clone();

    normalize_in_place(&mut kept, &NormalizeConfig::default());
    assert_eq!(2, kept.len());

    let cfg = NormalizeConfig {
        drop_degenerate: true,
        ..NormalizeConfig::default()
    };
    let stats = normalize_in_place(&mut rows, &cfg);
    assert_eq!(1, stats.removed_degenerate);
    assert_eq!(0.1, rows[0].x1);
}

#[test]
fn nan_coordinates_are_invalid() {
    let mut rows = vec![raw(WallId::Right, f32::NAN, 0.0, 0.5, 0.5)];
    let stats = normalize_in_place(&mut rows, &NormalizeConfig::default());
    assert_eq!(1, stats.removed_invalid);
    assert!(rows.is_empty());
}
