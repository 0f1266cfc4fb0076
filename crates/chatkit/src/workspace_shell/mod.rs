//! Workspace shell and its collapsible header.
//!
//! A [`WorkspaceShell`] lays out five named regions. The
//! [`WorkspaceShellHeader`] placed in its `header` region reports every expand
//! or collapse as a routed [`ChatEvent::HeaderToggle`](crate::events::ChatEvent)
//! which bubbles up to the shell; the shell mirrors the reported state as its
//! `header-open` attribute.
//!
//! # Example
//!
//! ```
//! use chatkit::component::Component;
//! use chatkit::events::ChatRouter;
//! use chatkit::workspace_shell::{WorkspaceShell, WorkspaceShellHeader};
//!
//! let router = ChatRouter::new();
//! let mut shell = WorkspaceShell::new();
//! let shell_id = shell.connected_callback(&router, None).unwrap();
//!
//! let mut header = WorkspaceShellHeader::new().with_title_text("Workspace");
//! header.connected_callback(&router, Some(shell_id)).unwrap();
//! header.perform_update();
//!
//! header.disclosure().unwrap().toggle();
//! assert!(shell.header_open());
//! ```

mod disclosure;
mod header;
mod shell;

pub use disclosure::Disclosure;
pub use header::{DEFAULT_HEADER_SLOT, WorkspaceShellHeader};
pub use shell::{SHELL_SLOTS, WorkspaceShell};
