use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::model::{NodeHandle, SceneNode, SourceId};

/// One (node, source) association. Never mutated in place.
#[derive(Debug)]
pub(crate) struct TrackedLink {
    node: Weak<RefCell<SceneNode>>,
    source: SourceId,
}

impl TrackedLink {
    fn new(node: &NodeHandle, source: SourceId) -> Self {
        Self { node: Rc::downgrade(node), source }
    }

    pub(crate) fn source(&self) -> &SourceId {
        &self.source
    }

    /// Live node, or `None` once its owner dropped it.
    pub(crate) fn node(&self) -> Option<NodeHandle> {
        self.node.upgrade()
    }

    fn links_to(&self, node: &NodeHandle) -> bool {
        std::ptr::eq(self.node.as_ptr(), Rc::as_ptr(node))
    }

    fn is_orphaned(&self) -> bool {
        self.node.strong_count() == 0
    }
}

/// Ordered set of tracked links.
///
/// Write-only from the outside: the frame loop is the only reader. The same
/// node may be registered more than once; every link is kept and processed
/// in registration order.
#[derive(Debug, Default)]
pub struct PoseLinkRegistry {
    links: Vec<TrackedLink>,
}

impl PoseLinkRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, node: &NodeHandle, source: impl Into<SourceId>) {
        let source = source.into();
        tracing::debug!(%source, links = self.links.len() + 1, "register pose link");
        self.links.push(TrackedLink::new(node, source));
    }

    /// Drop every link to `node`, matched by identity. Unknown nodes are a no-op.
    pub fn unregister(&mut self, node: &NodeHandle) {
        let before = self.links.len();
        self.links.retain(|link| !link.links_to(node));
        let removed = before - self.links.len();
        if removed > 0 {
            tracing::debug!(removed, "unregister pose links");
        }
    }

    /// Links in registration order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = &TrackedLink> {
        self.links.iter()
    }

    /// Forget links whose node has been dropped. Returns how many went away.
    pub(crate) fn prune_orphans(&mut self) -> usize {
        let before = self.links.len();
        self.links.retain(|link| !link.is_orphaned());
        before - self.links.len()
    }

    pub(crate) fn len(&self) -> usize {
        self.links.len()
    }

    #[cfg(test)]
    pub(crate) fn links_for(&self, node: &NodeHandle) -> usize {
        self.links.iter().filter(|link| link.links_to(node)).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_then_unregister_leaves_no_links() {
        let node = SceneNode::named("cursor").into_handle();
        let mut registry = PoseLinkRegistry::new();

        registry.register(&node, "/user/hand/left");
        assert_eq!(registry.links_for(&node), 1);

        registry.unregister(&node);
        assert_eq!(registry.links_for(&node), 0);
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn test_unregister_removes_every_duplicate() {
        let node = SceneNode::new().into_handle();
        let other = SceneNode::new().into_handle();
        let mut registry = PoseLinkRegistry::new();

        registry.register(&node, "/user/hand/left");
        registry.register(&other, "/user/head");
        registry.register(&node, "/user/hand/right");
        assert_eq!(registry.links_for(&node), 2);

        registry.unregister(&node);
        assert_eq!(registry.links_for(&node), 0);
        assert_eq!(registry.links_for(&other), 1);
    }

    #[test]
    fn test_unregister_matches_identity_not_value() {
        let a = SceneNode::new().into_handle();
        let b = SceneNode::new().into_handle();
        assert_eq!(*a.borrow(), *b.borrow());

        let mut registry = PoseLinkRegistry::new();
        registry.register(&a, "/user/hand/left");
        registry.unregister(&b);

        assert_eq!(registry.links_for(&a), 1);
    }

    #[test]
    fn test_unregister_unknown_node_is_noop() {
        let known = SceneNode::new().into_handle();
        let stranger = SceneNode::new().into_handle();
        let mut registry = PoseLinkRegistry::new();
        registry.register(&known, "/user/hand/left");

        registry.unregister(&stranger);
        PoseLinkRegistry::new().unregister(&stranger);

        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_iter_preserves_registration_order() {
        let node = SceneNode::new().into_handle();
        let mut registry = PoseLinkRegistry::new();
        registry.register(&node, "/user/hand/left");
        registry.register(&node, "/user/hand/right");

        let sources: Vec<_> = registry
            .iter()
            .map(|link| link.source().as_str().to_string())
            .collect();
        assert_eq!(sources, vec!["/user/hand/left", "/user/hand/right"]);
    }

    #[test]
    fn test_prune_orphans_drops_dead_nodes_only() {
        let kept = SceneNode::new().into_handle();
        let dropped = SceneNode::new().into_handle();
        let mut registry = PoseLinkRegistry::new();
        registry.register(&kept, "/user/hand/left");
        registry.register(&dropped, "/user/hand/right");

        drop(dropped);
        assert_eq!(registry.prune_orphans(), 1);
        assert_eq!(registry.links_for(&kept), 1);
        assert_eq!(registry.len(), 1);
    }
}
