// MODEL: scene nodes, source ids and pose data
pub mod node;
pub mod pose;
pub mod source;

pub use node::{NodeHandle, SceneNode};
pub use pose::{matrix_from_slice, matrix_to_array, MATRIX_LEN};
pub use source::SourceId;
