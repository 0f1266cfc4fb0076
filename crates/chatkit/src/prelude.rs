//! Prelude module for Chatkit.
//!
//! ```
//! use chatkit::prelude::*;
//! ```
//!
//! This provides access to:
//! - Components (`Carousel`, `WorkspaceShell`, `WorkspaceShellHeader`)
//! - The component lifecycle (`Component`, `ComponentBase`)
//! - Events and routing (`ChatEvent`, `ChatEventKind`, `ChatRouter`)
//! - Configuration (`ChatkitConfig`)

// ============================================================================
// Core
// ============================================================================

pub use chatkit_core::{ObjectId, Property, ReflectedProperty, Signal};

// ============================================================================
// Components
// ============================================================================

pub use crate::carousel::{
    Carousel, CarouselAction, CarouselResponse, ClampedRotation, EdgeBehavior, TransitionMode,
    ViewRotation, ViewRotationConfig,
};
pub use crate::component::{Component, ComponentBase};
pub use crate::workspace_shell::{Disclosure, WorkspaceShell, WorkspaceShellHeader};

// ============================================================================
// Events, Rendering and Configuration
// ============================================================================

pub use crate::config::ChatkitConfig;
pub use crate::events::{ChatEvent, ChatEventKind, ChatRouter, HeaderToggle};
pub use crate::render::{Element, RenderNode};
pub use crate::{Error, Result};
