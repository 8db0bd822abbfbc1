//! Advisory events raised to the surrounding application
//!
//! Events are queued inside the pipeline and drained non-blockingly by the
//! caller. They inform UI concerns (progress, fallbacks); nothing in the
//! rendering path depends on them.

use crate::pipeline::assignment::SubmeshHandle;

/// Advisory pipeline notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineEvent {
    /// A submesh received its final material
    MaterialReady {
        /// The submesh that was shaded
        submesh: SubmeshHandle,
    },

    /// Normal-map synthesis failed; the submesh keeps its placeholder
    SynthesisFailed {
        /// The submesh left on its placeholder
        submesh: SubmeshHandle,
        /// Human-readable failure reason
        reason: String,
    },
}
