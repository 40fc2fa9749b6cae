//! UI widgets - the stage and the loading overlay.

pub mod overlay;
pub mod stage;

pub use overlay::render_loading_overlay;
pub use stage::{StageInputs, StageState};
