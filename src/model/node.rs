use std::cell::RefCell;
use std::rc::Rc;

use glam::{Mat4, Quat, Vec3};

/// Shared, caller-owned handle to a scene node.
///
/// The pose registry only ever keeps a `Weak` to the node, so dropping the
/// last handle ends the node's life regardless of any registered links.
pub type NodeHandle = Rc<RefCell<SceneNode>>;

/// Transform-bearing entity of the scene graph.
///
/// `matrix` is the local transform in parent space. `translation`, `rotation`
/// and `scale` always mirror its decomposition after a pose has been applied.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneNode {
    pub name: Option<String>,
    pub matrix: Mat4,
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
    /// Local matrix was written directly instead of composed from TRS.
    pub matrix_explicit: bool,
    /// World matrix is stale and must be recomputed by the consumer.
    pub world_matrix_dirty: bool,
}

impl SceneNode {
    pub fn new() -> Self {
        Self {
            name: None,
            matrix: Mat4::IDENTITY,
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
            matrix_explicit: false,
            world_matrix_dirty: false,
        }
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self { name: Some(name.into()), ..Self::new() }
    }

    /// Wrap into a shareable handle.
    pub fn into_handle(self) -> NodeHandle {
        Rc::new(RefCell::new(self))
    }

    /// Overwrite the local transform with `pose` and flag the node dirty.
    pub fn apply_pose(&mut self, pose: Mat4) {
        self.matrix = pose;
        let (scale, rotation, translation) = pose.to_scale_rotation_translation();
        self.translation = translation;
        self.rotation = rotation;
        self.scale = scale;

        self.matrix_explicit = true;
        self.world_matrix_dirty = true;
    }

    /// Acknowledge the dirty flags after derived state has been recomputed.
    pub fn clear_dirty(&mut self) {
        self.world_matrix_dirty = false;
    }

    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or("<unnamed>")
    }
}

impl Default for SceneNode {
    fn default() -> Self {
        Self::new()
    }
}
