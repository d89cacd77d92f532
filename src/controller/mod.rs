// CONTROLLER: pose links, input providers and the per-frame sync
pub mod input_provider;
pub mod pose_links;
pub mod frame_loop;
pub mod shared;

pub use input_provider::{InputProvider, ProviderReply, StaticInputProvider};
pub use pose_links::PoseLinkRegistry;
pub use frame_loop::PoseSync;
pub use shared::SharedPoseSync;
