//! Chatkit - carousel and workspace shell components for chat workspaces.
//!
//! This is the component crate; it re-exports the core object tree, signal,
//! property and event routing APIs from `chatkit-core`.
//!
//! # Example
//!
//! ```
//! use chatkit::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let config = ChatkitConfig::default();
//!     let router = ChatRouter::new();
//!
//!     let mut shell = config.shell();
//!     let shell_id = shell.connected_callback(&router, None)?;
//!
//!     let mut carousel = config.carousel();
//!     carousel.connected_callback(&router, Some(shell_id))?;
//!     carousel.add_view("card")?;
//!     carousel.add_view("card")?;
//!     carousel.perform_update();
//!
//!     carousel.request_next();
//!     assert_eq!(carousel.position_label(), "2 / 2");
//!     Ok(())
//! }
//! ```

pub use chatkit_core::*;

pub mod carousel;
pub mod component;
pub mod config;
mod error;
pub mod events;
pub mod icon;
pub mod logging;
pub mod prelude;
pub mod render;
pub mod workspace_shell;

pub use error::{ConfigError, Error, Result};
