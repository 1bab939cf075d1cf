use crate::interaction::InteractionState;
use crate::projection::CameraMatrices;
use crate::selection::WallSelection;
use wallmark_core::annotation::WallAnnotation;
use wallmark_core::camera::CameraState;

/// Immutable copy of everything a frame needs. Owns its data, so it can be
/// handed to a render thread over a channel.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameSnapshot {
    pub camera: CameraState,
    pub state: InteractionState,
    /// `None` until the surface has a size.
    pub matrices: Option<CameraMatrices>,
    pub annotations: Vec<WallAnnotation>,
    pub selection: Option<WallSelection>,
}
