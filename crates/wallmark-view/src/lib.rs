pub mod interaction;
pub mod picking;
pub mod projection;
pub mod ray;
pub mod script;
pub mod selection;
pub mod snapshot;

pub use interaction::{Gesture, InteractionController, InteractionEvent, InteractionState};
pub use picking::{WallHit, WallPicker};
pub use projection::{CameraMatrices, Viewport};
pub use script::{replay, GestureScript};
pub use selection::{WallSelection, WallSelector};
pub use snapshot::FrameSnapshot;
