//! Transform state model: the single source of truth for how the displayed
//! image is positioned relative to the mask.

mod mask;
mod state;

pub use mask::{mask_frame, MaskSpec};
pub use state::{TransformSnapshot, TransformState};
