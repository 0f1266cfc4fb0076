//! Logging and debugging facilities.
//!
//! Chatkit uses the `tracing` crate for instrumentation. Install a subscriber
//! in the host application to see output:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("chatkit=debug,chatkit_core=trace")
//!     .init();
//! ```
//!
//! Use [`ObjectTreeDebug`] to print the component tree when diagnosing event
//! routing.

use std::fmt::Write as FmtWrite;

use crate::object::{ObjectId, ObjectResult, ObjectTree};

/// `tracing` targets, one per subsystem.
pub mod targets {
    /// Signal emission.
    pub const SIGNAL: &str = "chatkit_core::signal";
    /// Event routing target.
    pub const EVENT: &str = "chatkit_core::event";
    /// Object tree target.
    pub const OBJECT: &str = "chatkit_core::object";
}

/// Style options for tree output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TreeStyle {
    /// `|--` branches.
    Ascii,
    /// `├──` branches.
    #[default]
    Unicode,
}

/// Formats an [`ObjectTree`] for debugging.
#[derive(Debug, Clone, Copy, Default)]
pub struct ObjectTreeDebug {
    style: TreeStyle,
    show_ids: bool,
}

impl ObjectTreeDebug {
    /// Create a formatter with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the branch style.
    pub fn with_style(mut self, style: TreeStyle) -> Self {
        self.style = style;
        self
    }

    /// Include object IDs after tag names.
    pub fn with_ids(mut self, show_ids: bool) -> Self {
        self.show_ids = show_ids;
        self
    }

    /// Format every root of `tree` and its descendants.
    pub fn format_tree(&self, tree: &ObjectTree) -> String {
        let mut output = String::new();
        for root in tree.roots() {
            // Nodes removed concurrently are simply skipped.
            let _ = self.format_node(tree, root, "", true, true, &mut output);
        }
        output
    }

    /// Format the subtree rooted at `id`.
    pub fn format_subtree(&self, tree: &ObjectTree, id: ObjectId) -> ObjectResult<String> {
        let mut output = String::new();
        self.format_node(tree, id, "", true, true, &mut output)?;
        Ok(output)
    }

    fn format_node(
        &self,
        tree: &ObjectTree,
        id: ObjectId,
        prefix: &str,
        is_last: bool,
        is_root: bool,
        output: &mut String,
    ) -> ObjectResult<()> {
        let (branch, pipe, space) = match self.style {
            TreeStyle::Ascii => (if is_last { "`-- " } else { "|-- " }, "|   ", "    "),
            TreeStyle::Unicode => (if is_last { "└── " } else { "├── " }, "│   ", "    "),
        };

        let tag = tree.tag(id)?;
        let shadow = if tree.is_shadow_root(id)? { " (shadow)" } else { "" };
        let _ = if is_root {
            write!(output, "{tag}{shadow}")
        } else {
            write!(output, "{prefix}{branch}{tag}{shadow}")
        };
        if self.show_ids {
            let _ = write!(output, " {id}");
        }
        output.push('\n');

        let child_prefix = if is_root {
            String::new()
        } else {
            format!("{prefix}{}", if is_last { space } else { pipe })
        };
        let children = tree.children(id)?;
        let last = children.len().saturating_sub(1);
        for (index, child) in children.into_iter().enumerate() {
            self.format_node(tree, child, &child_prefix, index == last, false, output)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_tree_ascii() {
        let tree = ObjectTree::new();
        let shell = tree.insert("shell", None).unwrap();
        tree.insert("toolbar", Some(shell)).unwrap();
        let header = tree.insert("header", Some(shell)).unwrap();
        tree.insert("details", Some(header)).unwrap();

        let text = ObjectTreeDebug::new()
            .with_style(TreeStyle::Ascii)
            .format_tree(&tree);
        assert_eq!(text, "shell\n|-- toolbar\n`-- header\n    `-- details\n");
    }

    #[test]
    fn test_format_marks_shadow_roots() {
        let tree = ObjectTree::new();
        let host = tree.insert("carousel", None).unwrap();
        tree.set_shadow_root(host, true).unwrap();

        let text = ObjectTreeDebug::new().format_subtree(&tree, host).unwrap();
        assert_eq!(text, "carousel (shadow)\n");
    }
}
