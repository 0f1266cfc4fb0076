//! Object tree for Chatkit components.
//!
//! Components never hold references to each other. They are placed in an
//! [`ObjectTree`] as nodes with a tag name, an optional parent and optional
//! shadow-root status, and all cross-component communication is routed along
//! that tree by [`crate::EventRouter`].
//!
//! # Key Types
//!
//! - [`ObjectId`] - Stable handle for a node
//! - [`ObjectTree`] - Thread-safe arena of nodes with parent/child links

use std::fmt;

use parking_lot::RwLock;
use slotmap::{new_key_type, SlotMap};

use crate::logging::targets;

new_key_type! {
    /// A unique identifier for a node in an [`ObjectTree`].
    ///
    /// IDs stay valid until the node is removed from the tree.
    pub struct ObjectId;
}

impl ObjectId {
    /// The id as a plain integer, stable for the life of the node.
    #[inline]
    pub fn as_raw(self) -> u64 {
        use slotmap::Key;
        self.data().as_ffi()
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.as_raw())
    }
}

/// Errors that can occur during object-tree operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ObjectError {
    /// The object ID is invalid or has been removed.
    #[error("Invalid or removed object ID")]
    InvalidObjectId,
    /// A node would become its own ancestor.
    #[error("Cannot set an object as its own parent or ancestor")]
    CircularParentage,
}

/// Result alias for tree operations.
pub type ObjectResult<T> = std::result::Result<T, ObjectError>;

struct ObjectData {
    tag: String,
    parent: Option<ObjectId>,
    children: Vec<ObjectId>,
    shadow_root: bool,
}

/// A thread-safe tree of component nodes.
#[derive(Default)]
pub struct ObjectTree {
    nodes: RwLock<SlotMap<ObjectId, ObjectData>>,
}

impl ObjectTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node under `parent` (or as a root) and return its ID.
    pub fn insert(&self, tag: impl Into<String>, parent: Option<ObjectId>) -> ObjectResult<ObjectId> {
        let tag = tag.into();
        let mut nodes = self.nodes.write();
        if let Some(parent) = parent {
            if !nodes.contains_key(parent) {
                return Err(ObjectError::InvalidObjectId);
            }
        }
        let id = nodes.insert(ObjectData {
            tag,
            parent,
            children: Vec::new(),
            shadow_root: false,
        });
        if let Some(parent) = parent {
            nodes[parent].children.push(id);
        }
        tracing::trace!(target: targets::OBJECT, %id, tag = %nodes[id].tag, "inserted node");
        Ok(id)
    }

    /// Remove a node and its whole subtree.
    ///
    /// Returns the removed IDs, the node itself first.
    pub fn remove(&self, id: ObjectId) -> ObjectResult<Vec<ObjectId>> {
        let mut nodes = self.nodes.write();
        let parent = nodes.get(id).ok_or(ObjectError::InvalidObjectId)?.parent;
        if let Some(parent) = parent {
            if let Some(data) = nodes.get_mut(parent) {
                data.children.retain(|&child| child != id);
            }
        }

        let mut removed = Vec::new();
        let mut pending = vec![id];
        while let Some(next) = pending.pop() {
            if let Some(data) = nodes.remove(next) {
                pending.extend(data.children);
                removed.push(next);
            }
        }
        tracing::trace!(target: targets::OBJECT, %id, count = removed.len(), "removed subtree");
        Ok(removed)
    }

    /// Check whether a node exists.
    pub fn contains(&self, id: ObjectId) -> bool {
        self.nodes.read().contains_key(id)
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.nodes.read().len()
    }

    /// Whether the tree has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.read().is_empty()
    }

    /// Tag name of a node.
    pub fn tag(&self, id: ObjectId) -> ObjectResult<String> {
        self.nodes
            .read()
            .get(id)
            .map(|data| data.tag.clone())
            .ok_or(ObjectError::InvalidObjectId)
    }

    /// Parent of a node.
    pub fn parent(&self, id: ObjectId) -> ObjectResult<Option<ObjectId>> {
        self.nodes
            .read()
            .get(id)
            .map(|data| data.parent)
            .ok_or(ObjectError::InvalidObjectId)
    }

    /// Children of a node, in insertion order.
    pub fn children(&self, id: ObjectId) -> ObjectResult<Vec<ObjectId>> {
        self.nodes
            .read()
            .get(id)
            .map(|data| data.children.clone())
            .ok_or(ObjectError::InvalidObjectId)
    }

    /// Root nodes, in ID order.
    pub fn roots(&self) -> Vec<ObjectId> {
        self.nodes
            .read()
            .iter()
            .filter(|(_, data)| data.parent.is_none())
            .map(|(id, _)| id)
            .collect()
    }

    /// Move a node under a new parent (or make it a root).
    pub fn set_parent(&self, id: ObjectId, parent: Option<ObjectId>) -> ObjectResult<()> {
        let mut nodes = self.nodes.write();
        if !nodes.contains_key(id) {
            return Err(ObjectError::InvalidObjectId);
        }
        if let Some(new_parent) = parent {
            if !nodes.contains_key(new_parent) {
                return Err(ObjectError::InvalidObjectId);
            }
            let mut cursor = Some(new_parent);
            while let Some(current) = cursor {
                if current == id {
                    return Err(ObjectError::CircularParentage);
                }
                cursor = nodes[current].parent;
            }
        }

        if let Some(old_parent) = nodes[id].parent {
            nodes[old_parent].children.retain(|&child| child != id);
        }
        nodes[id].parent = parent;
        if let Some(new_parent) = parent {
            nodes[new_parent].children.push(id);
        }
        Ok(())
    }

    /// Mark a node as hosting a shadow root.
    ///
    /// Non-composed events dispatched inside the node's subtree do not
    /// propagate past it.
    pub fn set_shadow_root(&self, id: ObjectId, shadow_root: bool) -> ObjectResult<()> {
        let mut nodes = self.nodes.write();
        let data = nodes.get_mut(id).ok_or(ObjectError::InvalidObjectId)?;
        data.shadow_root = shadow_root;
        Ok(())
    }

    /// Whether a node hosts a shadow root.
    pub fn is_shadow_root(&self, id: ObjectId) -> ObjectResult<bool> {
        self.nodes
            .read()
            .get(id)
            .map(|data| data.shadow_root)
            .ok_or(ObjectError::InvalidObjectId)
    }

    /// The node followed by its ancestors, nearest first.
    pub fn ancestry(&self, id: ObjectId) -> ObjectResult<Vec<ObjectId>> {
        let nodes = self.nodes.read();
        if !nodes.contains_key(id) {
            return Err(ObjectError::InvalidObjectId);
        }
        let mut path = vec![id];
        let mut cursor = nodes[id].parent;
        while let Some(current) = cursor {
            path.push(current);
            cursor = nodes.get(current).and_then(|data| data.parent);
        }
        Ok(path)
    }
}

impl fmt::Debug for ObjectTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectTree").field("len", &self.len()).finish()
    }
}

static_assertions::assert_impl_all!(ObjectTree: Send, Sync);
