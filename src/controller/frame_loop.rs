use crate::controller::input_provider::InputProvider;
use crate::controller::pose_links::PoseLinkRegistry;
use crate::model::{NodeHandle, SourceId};

/// Per-frame pose sync: registration API plus the tick sweep.
///
/// The host owns the nodes and the input provider. The provider is handed
/// in on every tick, so a host that has not brought its input system up yet
/// simply passes `None`.
#[derive(Debug, Default)]
pub struct PoseSync {
    links: PoseLinkRegistry,
    frame: u64,
}

impl PoseSync {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drive `node` from `source` starting with the next tick.
    pub fn register(&mut self, node: &NodeHandle, source: impl Into<SourceId>) {
        self.links.register(node, source);
    }

    /// Stop driving `node` from any source.
    pub fn unregister(&mut self, node: &NodeHandle) {
        self.links.unregister(node);
    }

    /// Number of ticks run so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    #[cfg(test)]
    pub(crate) fn link_count(&self) -> usize {
        self.links.len()
    }

    /// Pull the latest pose for every link and apply it to its node.
    pub fn tick(&mut self, provider: Option<&dyn InputProvider>) {
        self.frame += 1;

        let Some(provider) = provider else {
            tracing::trace!(frame = self.frame, "input provider unavailable, skipping pose sync");
            return;
        };

        let mut applied = 0usize;
        let mut absent = 0usize;
        let mut orphaned = 0usize;

        for link in self.links.iter() {
            let Some(node) = link.node() else {
                orphaned += 1;
                continue;
            };

            let Some(pose) = provider.get(link.source()) else {
                absent += 1;
                continue;
            };

            match node.try_borrow_mut() {
                Ok(mut node) => {
                    node.apply_pose(pose);
                    applied += 1;
                }
                Err(_) => {
                    tracing::warn!(source = %link.source(), "scene node busy, pose skipped this frame");
                }
            };
        }

        if orphaned > 0 {
            self.links.prune_orphans();
        }

        tracing::trace!(
            frame = self.frame,
            links = self.links.len(),
            applied,
            absent,
            orphaned,
            "pose sync tick"
        );
    }
}
