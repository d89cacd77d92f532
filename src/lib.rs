// Re-export all public modules so they can be used from main.rs
pub mod logging;
pub mod config;
pub mod error;

// MVC Architecture (no view: rendering belongs to the host)
pub mod model;
pub mod controller;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use controller::{InputProvider, PoseLinkRegistry, PoseSync, SharedPoseSync, StaticInputProvider};
pub use error::PoseError;
pub use model::{NodeHandle, SceneNode, SourceId};
