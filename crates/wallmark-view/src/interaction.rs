use crate::picking::WallPicker;
use crate::projection::{CameraMatrices, Viewport};
use crate::selection::{WallSelection, WallSelector};
use crate::snapshot::FrameSnapshot;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use wallmark_core::annotation::{AnnotationKind, WallAnnotation};
use wallmark_core::camera::{Camera, InteractionMode};
use wallmark_core::config::{GestureConfig, ViewerConfig};
use wallmark_core::geom::Vec2;
use wallmark_core::room::{Room, WallId};
use wallmark_core::surface::SurfaceCallback;

/// Touch input, already classified by the front end. Coordinates are screen
/// pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Gesture {
    Down { x: f32, y: f32 },
    Move { x: f32, y: f32 },
    Up { x: f32, y: f32 },
    Cancel,
    PinchBegin,
    /// Incremental scale since the previous pinch event.
    Pinch { scale: f32 },
    PinchEnd,
    DoubleTap,
    LongPress,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InteractionState {
    pub mode: InteractionMode,
    pub edit_mode: bool,
    pub selected_kind: AnnotationKind,
    pub loading: bool,
}

impl Default for InteractionState {
    fn default() -> Self {
        Self {
            mode: InteractionMode::Rotation,
            edit_mode: false,
            selected_kind: AnnotationKind::SprayArea,
            loading: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum InteractionEvent {
    ModeChanged(InteractionMode),
    EditModeChanged(bool),
    CameraChanged,
    CameraReset,
    SelectionStarted(WallId),
    /// Touch-down in edit mode that hit no wall.
    SelectionMissed,
    SelectionCancelled,
    AnnotationCompleted(WallAnnotation),
}

/// Owns the camera, the selection state machine and the interaction mode,
/// and turns gestures into camera changes or annotations.
#[derive(Debug, Clone)]
pub struct InteractionController {
    camera: Camera,
    gesture: GestureConfig,
    picker: WallPicker,
    selector: WallSelector,
    state: InteractionState,
    viewport: Viewport,
    room_id: u64,
    last_pointer: Option<Vec2>,
    mode_before_pinch: Option<InteractionMode>,
}

impl InteractionController {
    pub fn new(config: &ViewerConfig) -> wallmark_core::Result<Self> {
        config.validate()?;
        let room = Room::new(config.room)?;
        Ok(Self {
            camera: Camera::new(config.camera.clone()),
            gesture: config.gesture.clone(),
            picker: WallPicker::new(room, config.pick.clone()),
            selector: WallSelector::new(),
            state: InteractionState::default(),
            viewport: Viewport::new(0.0, 0.0),
            room_id: config.room_id,
            last_pointer: None,
            mode_before_pinch: None,
        })
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn state(&self) -> InteractionState {
        self.state
    }

    pub fn picker(&self) -> &WallPicker {
        &self.picker
    }

    pub fn room(&self) -> &Room {
        self.picker.room()
    }

    pub fn selection(&self) -> Option<&WallSelection> {
        self.selector.current()
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// `None` until a non-empty viewport is set.
    pub fn matrices(&self) -> Option<CameraMatrices> {
        CameraMatrices::from_camera(&self.camera, self.viewport)
    }

    pub fn set_mode(&mut self, mode: InteractionMode) -> Option<InteractionEvent> {
        if self.state.mode == mode {
            return None;
        }
        debug!(mode = mode.label(), "interaction mode changed");
        self.state.mode = mode;
        Some(InteractionEvent::ModeChanged(mode))
    }

    /// Rotation <-> Pan. Ignored in edit mode.
    pub fn toggle_pan_rotate(&mut self) -> Option<InteractionEvent> {
        if self.state.edit_mode {
            return None;
        }
        let next = if self.state.mode == InteractionMode::Rotation {
            InteractionMode::Pan
        } else {
            InteractionMode::Rotation
        };
        self.set_mode(next)
    }

    /// Leaving edit mode drops any half-drawn selection. Toggling either way
    /// ends a pinch in progress and restores the mode it overrode.
    pub fn set_edit_mode(&mut self, on: bool) -> Option<InteractionEvent> {
        if self.state.edit_mode == on {
            return None;
        }
        self.state.edit_mode = on;
        self.last_pointer = None;
        self.end_pinch();
        if !on {
            self.selector.cancel_selection();
        }
        Some(InteractionEvent::EditModeChanged(on))
    }

    pub fn set_selected_kind(&mut self, kind: AnnotationKind) {
        self.state.selected_kind = kind;
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.state.loading = loading;
    }

    // Camera setters are no-ops while editing.

    pub fn set_rotation(&mut self, pitch: f32, yaw: f32) -> bool {
        if self.state.edit_mode {
            return false;
        }
        self.camera.set_rotation(pitch, yaw);
        true
    }

    pub fn set_zoom(&mut self, zoom: f32) -> bool {
        if self.state.edit_mode {
            return false;
        }
        self.camera.set_zoom(zoom);
        true
    }

    pub fn set_pan(&mut self, x: f32, y: f32) -> bool {
        if self.state.edit_mode {
            return false;
        }
        self.camera.set_pan(x, y);
        true
    }

    pub fn reset_camera(&mut self) -> bool {
        if self.state.edit_mode {
            return false;
        }
        self.camera.reset();
        true
    }

    pub fn handle(&mut self, gesture: Gesture) -> Vec<InteractionEvent> {
        if self.state.edit_mode {
            self.handle_edit(gesture).into_iter().collect()
        } else {
            self.handle_camera(gesture).into_iter().collect()
        }
    }

    fn handle_edit(&mut self, gesture: Gesture) -> Option<InteractionEvent> {
        let Some(matrices) = self.matrices() else {
            debug!("edit gesture ignored: no viewport");
            return None;
        };
        match gesture {
            Gesture::Down { x, y } => {
                if self.selector.start_selection(&self.picker, &matrices, Vec2::new(x, y)) {
                    self.selector.current().map(|s| InteractionEvent::SelectionStarted(s.wall))
                } else {
                    Some(InteractionEvent::SelectionMissed)
                }
            }
            Gesture::Move { x, y } => {
                self.selector.update_selection(&self.picker, &matrices, Vec2::new(x, y));
                None
            }
            Gesture::Up { x, y } => {
                if !self.selector.is_selecting() {
                    return None;
                }
                self.selector.update_selection(&self.picker, &matrices, Vec2::new(x, y));
                let annotation = self
                    .selector
                    .finish_selection(self.state.selected_kind)?
                    .with_room(self.room_id);
                info!(
                    wall = annotation.wall.index(),
                    kind = annotation.kind.label(),
                    x1 = annotation.x1,
                    y1 = annotation.y1,
                    x2 = annotation.x2,
                    y2 = annotation.y2,
                    "annotation completed"
                );
                Some(InteractionEvent::AnnotationCompleted(annotation))
            }
            Gesture::Cancel => {
                if self.selector.is_selecting() {
                    self.selector.cancel_selection();
                    Some(InteractionEvent::SelectionCancelled)
                } else {
                    None
                }
            }
            Gesture::PinchBegin
            | Gesture::Pinch { .. }
            | Gesture::PinchEnd
            | Gesture::DoubleTap
            | Gesture::LongPress => None,
        }
    }

    fn handle_camera(&mut self, gesture: Gesture) -> Option<InteractionEvent> {
        match gesture {
            Gesture::Down { x, y } => {
                self.last_pointer = Some(Vec2::new(x, y));
                None
            }
            Gesture::Move { x, y } => {
                let pos = Vec2::new(x, y);
                let last = self.last_pointer.replace(pos);
                if self.mode_before_pinch.is_some() {
                    return None;
                }
                let last = last?;
                self.drag(pos.x - last.x, pos.y - last.y)
            }
            Gesture::Up { .. } | Gesture::Cancel => {
                self.last_pointer = None;
                None
            }
            Gesture::PinchBegin => {
                if self.mode_before_pinch.is_none() {
                    self.mode_before_pinch = Some(self.state.mode);
                }
                self.set_mode(InteractionMode::Zoom)
            }
            Gesture::Pinch { scale } => {
                if !(scale.is_finite() && scale > 0.0) {
                    return None;
                }
                let zoom = self.camera.state().zoom / scale;
                self.camera.set_zoom(zoom);
                Some(InteractionEvent::CameraChanged)
            }
            Gesture::PinchEnd => {
                self.last_pointer = None;
                self.end_pinch()
            }
            Gesture::DoubleTap => {
                self.camera.reset();
                Some(InteractionEvent::CameraReset)
            }
            Gesture::LongPress => self.toggle_pan_rotate(),
        }
    }

    fn end_pinch(&mut self) -> Option<InteractionEvent> {
        let previous = self.mode_before_pinch.take()?;
        self.set_mode(previous)
    }

    fn drag(&mut self, dx: f32, dy: f32) -> Option<InteractionEvent> {
        let s = self.camera.state();
        match self.state.mode {
            InteractionMode::Rotation => {
                let k = self.gesture.rotation_sensitivity;
                self.camera.set_rotation(s.pitch + dy * k, s.yaw + dx * k);
            }
            InteractionMode::Pan => {
                let k = self.gesture.pan_sensitivity;
                self.camera.set_pan(s.pan_x + dx * k, s.pan_y - dy * k);
            }
            // Zoom only follows the pinch.
            InteractionMode::Zoom => return None,
        }
        Some(InteractionEvent::CameraChanged)
    }

    pub fn snapshot(&self, annotations: &[WallAnnotation]) -> FrameSnapshot {
        FrameSnapshot {
            camera: self.camera.state(),
            state: self.state,
            matrices: self.matrices(),
            annotations: annotations.to_vec(),
            selection: self.selector.current().copied(),
        }
    }
}

impl SurfaceCallback for InteractionController {
    fn surface_changed(&mut self, width: u32, height: u32) {
        debug!(width, height, "surface resized");
        self.set_viewport(Viewport::new(width as f32, height as f32));
    }

    fn surface_destroyed(&mut self) {
        self.selector.cancel_selection();
        self.last_pointer = None;
        self.end_pinch();
        self.viewport = Viewport::new(0.0, 0.0);
    }
}
