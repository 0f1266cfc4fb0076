//! Tracing targets for the component crate.
//!
//! Filter with e.g. `RUST_LOG=chatkit::carousel=debug`.

/// Target names for log filtering.
pub mod targets {
    /// Component lifecycle (connect, first update, disconnect).
    pub const COMPONENT: &str = "chatkit::component";
    /// Carousel controller.
    pub const CAROUSEL: &str = "chatkit::carousel";
    /// Default view-rotation engine.
    pub const VIEW_ROTATION: &str = "chatkit::view_rotation";
    /// Workspace shell and header.
    pub const WORKSPACE_SHELL: &str = "chatkit::workspace_shell";
    /// Configuration loading.
    pub const CONFIG: &str = "chatkit::config";
}
