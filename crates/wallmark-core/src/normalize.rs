use crate::annotation::WallAnnotation;

#[derive(Debug, Clone)]
pub struct NormalizeConfig {
    pub min_extent: f32,
    pub order_corners: bool,
    pub drop_invalid: bool,
    pub drop_degenerate: bool,
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            min_extent: 1e-6,
            order_corners: true,
            drop_invalid: true,
            // A tap without a drag still yields a (zero-area) annotation.
            drop_degenerate: false,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizeStats {
    pub reordered: usize,
    pub removed_invalid: usize,
    pub removed_degenerate: usize,
}

/// Repair a loaded annotation table in place: restore corner ordering and
/// drop rows that cannot be rendered.
pub fn normalize_in_place(annotations: &mut Vec<WallAnnotation>, cfg: &NormalizeConfig) -> NormalizeStats {
    let mut stats = NormalizeStats::default();

    if cfg.order_corners {
        for a in annotations.iter_mut() {
            if a.order_corners() {
                stats.reordered += 1;
            }
        }
    }

    if cfg.drop_invalid {
        let before = annotations.len();
        annotations.retain(|a| a.validate().is_ok());
        stats.removed_invalid = before.saturating_sub(annotations.len());
    }

    if cfg.drop_degenerate {
        let before = annotations.len();
        annotations.retain(|a| !is_degenerate(a, cfg.min_extent));
        stats.removed_degenerate = before.saturating_sub(annotations.len());
    }

    stats
}

fn is_degenerate(a: &WallAnnotation, min_extent: f32) -> bool {
    let rect = a.rect();
    rect.width() <= min_extent || rect.height() <= min_extent
}
