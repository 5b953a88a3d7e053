//=========================================================================
// Scene Errors
//=========================================================================

/// Expected failures of scene switching.
///
/// These are returned, never panicked on; lifecycle contract violations
/// (double init, double destroy, update after destroy) panic instead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SceneError {
    /// No factory is registered for the requested id.
    #[error("Unknown scene ID: {0}")]
    UnknownScene(String),

    /// Another scene is still initialising.
    #[error("Cannot switch to {requested}: {pending} is still initializing")]
    SwitchInProgress { requested: String, pending: String },

    /// The registry has been shut down.
    #[error("Scene registry is shut down")]
    ShutDown,
}
