use crate::interaction::{Gesture, InteractionController, InteractionEvent};
use crate::projection::Viewport;
use serde::{Deserialize, Serialize};
use wallmark_core::annotation::{AnnotationKind, WallAnnotation};
use wallmark_core::camera::InteractionMode;
use wallmark_core::report::{AnnotationStats, SessionReport, Warning};

/// Non-gesture inputs a front end would send from buttons.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Control {
    EditMode { on: bool },
    Kind { kind: AnnotationKind },
    Mode { mode: InteractionMode },
    Resize { width: f32, height: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScriptStep {
    Gesture(Gesture),
    Control(Control),
}

/// A recorded input session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GestureScript {
    pub viewport: Viewport,
    #[serde(default)]
    pub steps: Vec<ScriptStep>,
}

/// Run `script` through `controller`, returning every completed annotation
/// in order along with a summary.
pub fn replay(controller: &mut InteractionController, script: &GestureScript) -> SessionReport {
    controller.set_viewport(script.viewport);
    let mut annotations: Vec<WallAnnotation> = Vec::new();
    let mut warnings = Vec::new();

    if !script.viewport.is_valid() {
        warnings.push(Warning::new(
            "empty_viewport",
            format!("viewport {}x{} cannot be picked against", script.viewport.width, script.viewport.height),
        ));
    }

    for (index, step) in script.steps.iter().enumerate() {
        let events = match *step {
            ScriptStep::Gesture(g) => controller.handle(g),
            ScriptStep::Control(Control::EditMode { on }) => controller.set_edit_mode(on).into_iter().collect(),
            ScriptStep::Control(Control::Kind { kind }) => {
                controller.set_selected_kind(kind);
                Vec::new()
            }
            ScriptStep::Control(Control::Mode { mode }) => controller.set_mode(mode).into_iter().collect(),
            ScriptStep::Control(Control::Resize { width, height }) => {
                controller.set_viewport(Viewport::new(width, height));
                Vec::new()
            }
        };
        for event in events {
            match event {
                InteractionEvent::AnnotationCompleted(a) => annotations.push(a),
                InteractionEvent::SelectionMissed => warnings.push(Warning::new(
                    "selection_missed",
                    format!("step {index}: touch-down hit no wall"),
                )),
                _ => {}
            }
        }
    }

    let state = controller.state();
    SessionReport {
        camera: controller.camera().state(),
        mode: state.mode,
        edit_mode: state.edit_mode,
        stats: AnnotationStats::collect(&annotations),
        annotations,
        warnings,
    }
}
