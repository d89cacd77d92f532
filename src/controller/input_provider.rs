use std::collections::HashMap;

use glam::Mat4;

use crate::error::PoseError;
use crate::model::{matrix_from_slice, SourceId};

/// Source of live device poses, keyed by input source path.
///
/// Returned matrices are poses in the parent space of whatever node the
/// source drives. `None` means the source is not tracked this frame.
pub trait InputProvider {
    fn get(&self, source: &SourceId) -> Option<Mat4>;
}

/// In-memory provider: whatever pose was last set for a source is returned
/// until it is cleared.
#[derive(Debug, Default, Clone)]
pub struct StaticInputProvider {
    poses: HashMap<SourceId, Mat4>,
}

impl StaticInputProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_pose(&mut self, source: impl Into<SourceId>, pose: Mat4) {
        self.poses.insert(source.into(), pose);
    }

    /// Mark a source as lost (no longer tracked).
    pub fn clear_pose(&mut self, source: &SourceId) {
        self.poses.remove(source);
    }

    pub fn is_tracked(&self, source: &SourceId) -> bool {
        self.poses.contains_key(source)
    }
}

impl InputProvider for StaticInputProvider {
    fn get(&self, source: &SourceId) -> Option<Mat4> {
        self.poses.get(source).copied()
    }
}

/// Raw answer from a foreign pose lookup, before validation.
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderReply {
    /// Source not tracked (`null`/`undefined` on the JS side).
    Missing,
    /// Column-major matrix elements; validated by [`ProviderReply::into_pose`].
    Values(Vec<f32>),
    /// A value of a type no pose can be read from.
    Unsupported(String),
    /// The lookup itself failed (threw).
    Failed(String),
}

impl ProviderReply {
    pub fn into_pose(self) -> Result<Option<Mat4>, PoseError> {
        match self {
            ProviderReply::Missing => Ok(None),
            ProviderReply::Values(values) => matrix_from_slice(&values).map(Some),
            ProviderReply::Unsupported(what) => Err(PoseError::UnsupportedValue(what)),
            ProviderReply::Failed(why) => Err(PoseError::ProviderCall(why)),
        }
    }

    /// Validated pose; any failure is logged and reads as "not tracked".
    pub fn pose_or_absent(self, source: &SourceId) -> Option<Mat4> {
        match self.into_pose() {
            Ok(pose) => pose,
            Err(e) => {
                tracing::warn!(%source, error = %e, "discarding pose from provider");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn test_static_provider_set_and_clear() {
        let left = SourceId::from("/user/hand/left");
        let pose = Mat4::from_translation(Vec3::new(0.0, 1.2, -0.3));

        let mut provider = StaticInputProvider::new();
        assert_eq!(provider.get(&left), None);

        provider.set_pose(left.clone(), pose);
        assert!(provider.is_tracked(&left));
        assert_eq!(provider.get(&left), Some(pose));

        provider.clear_pose(&left);
        assert_eq!(provider.get(&left), None);
    }

    #[test]
    fn test_reply_values_become_pose() {
        let pose = Mat4::from_translation(Vec3::new(0.1, 1.5, -0.2));
        let reply = ProviderReply::Values(pose.to_cols_array().to_vec());
        assert_eq!(reply.into_pose(), Ok(Some(pose)));
    }

    #[test]
    fn test_reply_missing_is_absent_not_error() {
        assert_eq!(ProviderReply::Missing.into_pose(), Ok(None));
    }

    #[test]
    fn test_reply_failures_map_to_errors() {
        assert_eq!(
            ProviderReply::Failed("TypeError".into()).into_pose(),
            Err(PoseError::ProviderCall("TypeError".into()))
        );
        assert_eq!(
            ProviderReply::Unsupported("\"pose\"".into()).into_pose(),
            Err(PoseError::UnsupportedValue("\"pose\"".into()))
        );
        assert_eq!(
            ProviderReply::Values(vec![1.0; 9]).into_pose(),
            Err(PoseError::BadLength(9))
        );
    }

    #[test]
    fn test_bad_replies_degrade_to_absent() {
        let source = SourceId::from("/user/hand/left");
        let mut nan = Mat4::IDENTITY.to_cols_array().to_vec();
        nan[3] = f32::NAN;

        for reply in [
            ProviderReply::Missing,
            ProviderReply::Values(nan),
            ProviderReply::Values(Vec::new()),
            ProviderReply::Unsupported("{}".into()),
            ProviderReply::Failed("boom".into()),
        ] {
            assert_eq!(reply.pose_or_absent(&source), None);
        }
    }
}
