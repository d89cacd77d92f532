use std::cell::RefCell;
use std::rc::Rc;

use crate::controller::frame_loop::PoseSync;
use crate::controller::input_provider::InputProvider;
use crate::model::{NodeHandle, SourceId};

enum LinkOp {
    Register(NodeHandle, SourceId),
    Unregister(NodeHandle),
}

/// [`PoseSync`] behind shared references, for hosts whose input provider
/// calls back into the sync (JS callbacks, scripted devices).
///
/// Registration changes made while a tick is sweeping are queued and applied
/// right after that sweep, so they take effect on the next tick.
#[derive(Default)]
pub struct SharedPoseSync {
    sync: RefCell<PoseSync>,
    pending: RefCell<Vec<LinkOp>>,
}

impl SharedPoseSync {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, node: &NodeHandle, source: impl Into<SourceId>) {
        let source = source.into();
        match self.sync.try_borrow_mut() {
            Ok(mut sync) => sync.register(node, source),
            Err(_) => {
                tracing::debug!(%source, "tick in progress, deferring register");
                self.pending.borrow_mut().push(LinkOp::Register(Rc::clone(node), source));
            }
        }
    }

    pub fn unregister(&self, node: &NodeHandle) {
        match self.sync.try_borrow_mut() {
            Ok(mut sync) => sync.unregister(node),
            Err(_) => {
                tracing::debug!("tick in progress, deferring unregister");
                self.pending.borrow_mut().push(LinkOp::Unregister(Rc::clone(node)));
            }
        }
    }

    pub fn tick(&self, provider: Option<&dyn InputProvider>) {
        let Ok(mut sync) = self.sync.try_borrow_mut() else {
            tracing::warn!("tick called from inside a tick, ignored");
            return;
        };
        sync.tick(provider);

        let ops = std::mem::take(&mut *self.pending.borrow_mut());
        for op in ops {
            match op {
                LinkOp::Register(node, source) => sync.register(&node, source),
                LinkOp::Unregister(node) => sync.unregister(&node),
            }
        }
    }

    /// Ticks run so far, `None` while a tick is in progress.
    pub fn frame(&self) -> Option<u64> {
        self.sync.try_borrow().ok().map(|sync| sync.frame())
    }

    #[cfg(test)]
    fn link_count(&self) -> usize {
        self.sync.borrow().link_count()
    }
}
