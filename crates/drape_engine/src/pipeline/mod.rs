//! Material assignment orchestration
//!
//! Owns the per-submesh material lifecycle: placeholder immediately,
//! background normal-map synthesis, atomic swap to the triplanar material on
//! completion. Nothing here may ever be fatal to a render loop; every failure
//! path resolves to a valid material state.

pub mod assignment;
pub mod events;

pub use assignment::{AssignmentState, MaterialAssignmentPipeline, SubmeshHandle, TextureId};
pub use events::PipelineEvent;
