//! Browser bindings: lets a JS host (WebXR frame loop) own nodes and feed
//! poses through a plain callback.
//!
//! ```js
//! const sync = new WebPoseSync();
//! const cursor = new WebSceneNode("cursor");
//! sync.register(cursor, "/user/hand/left");
//! sync.setProvider((path) => poses.get(path)); // Float32Array(16) | undefined
//! // every XR frame:
//! sync.tick();
//! scene.setMatrix(cursor.matrix());
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use glam::Mat4;
use js_sys::{Array, Float32Array, Function};
use wasm_bindgen::{prelude::wasm_bindgen, JsCast, JsValue};

use crate::controller::{InputProvider, ProviderReply, SharedPoseSync};
use crate::model::{matrix_to_array, NodeHandle, SceneNode, SourceId};

/// Input provider backed by a JS function `(path: string) => pose | null`.
pub struct JsInputProvider {
    lookup: Function,
}

impl JsInputProvider {
    pub fn new(lookup: Function) -> Self {
        Self { lookup }
    }
}

/// Sort out what a JS lookup handed back.
fn classify(result: Result<JsValue, JsValue>) -> ProviderReply {
    let value = match result {
        Ok(value) => value,
        Err(thrown) => return ProviderReply::Failed(format!("{thrown:?}")),
    };

    if value.is_undefined() || value.is_null() {
        ProviderReply::Missing
    } else if let Some(typed) = value.dyn_ref::<Float32Array>() {
        ProviderReply::Values(typed.to_vec())
    } else if Array::is_array(&value) {
        ProviderReply::Values(
            Array::from(&value)
                .iter()
                .map(|v| v.as_f64().map(|f| f as f32).unwrap_or(f32::NAN))
                .collect(),
        )
    } else {
        ProviderReply::Unsupported(format!("{value:?}"))
    }
}

impl InputProvider for JsInputProvider {
    fn get(&self, source: &SourceId) -> Option<Mat4> {
        let result = self.lookup.call1(&JsValue::NULL, &JsValue::from_str(source.as_str()));
        classify(result).pose_or_absent(source)
    }
}

/// Scene node handle shared with JS.
#[wasm_bindgen]
pub struct WebSceneNode {
    handle: NodeHandle,
}

#[wasm_bindgen]
impl WebSceneNode {
    #[wasm_bindgen(constructor)]
    pub fn new(name: Option<String>) -> WebSceneNode {
        let node = match name {
            Some(name) => SceneNode::named(name),
            None => SceneNode::new(),
        };
        WebSceneNode { handle: node.into_handle() }
    }

    /// Local matrix, column-major.
    pub fn matrix(&self) -> Vec<f32> {
        matrix_to_array(&self.handle.borrow().matrix).to_vec()
    }

    pub fn translation(&self) -> Vec<f32> {
        self.handle.borrow().translation.to_array().to_vec()
    }

    /// Unit quaternion as `[x, y, z, w]`.
    pub fn rotation(&self) -> Vec<f32> {
        self.handle.borrow().rotation.to_array().to_vec()
    }

    pub fn scale(&self) -> Vec<f32> {
        self.handle.borrow().scale.to_array().to_vec()
    }

    #[wasm_bindgen(js_name = matrixExplicit)]
    pub fn matrix_explicit(&self) -> bool {
        self.handle.borrow().matrix_explicit
    }

    #[wasm_bindgen(js_name = worldMatrixDirty)]
    pub fn world_matrix_dirty(&self) -> bool {
        self.handle.borrow().world_matrix_dirty
    }

    #[wasm_bindgen(js_name = clearDirty)]
    pub fn clear_dirty(&self) {
        self.handle.borrow_mut().clear_dirty();
    }
}

/// Pose sync driven from a JS frame loop.
///
/// All methods take `&self` so the provider callback may call `register` or
/// `unregister` while `tick` runs; such calls apply from the next tick.
#[wasm_bindgen]
pub struct WebPoseSync {
    sync: SharedPoseSync,
    provider: RefCell<Option<Rc<JsInputProvider>>>,
}

#[wasm_bindgen]
impl WebPoseSync {
    #[wasm_bindgen(constructor)]
    pub fn new() -> WebPoseSync {
        WebPoseSync { sync: SharedPoseSync::new(), provider: RefCell::new(None) }
    }

    pub fn register(&self, node: &WebSceneNode, source_id: String) {
        self.sync.register(&node.handle, source_id);
    }

    pub fn unregister(&self, node: &WebSceneNode) {
        self.sync.unregister(&node.handle);
    }

    #[wasm_bindgen(js_name = setProvider)]
    pub fn set_provider(&self, lookup: Function) {
        *self.provider.borrow_mut() = Some(Rc::new(JsInputProvider::new(lookup)));
    }

    /// Until a provider is set again every tick is a no-op.
    #[wasm_bindgen(js_name = clearProvider)]
    pub fn clear_provider(&self) {
        *self.provider.borrow_mut() = None;
    }

    pub fn tick(&self) {
        // Swapping the provider from inside the callback must not hit a live borrow
        let provider = self.provider.borrow().clone();
        self.sync.tick(provider.as_deref().map(|p| p as &dyn InputProvider));
    }
}

impl Default for WebPoseSync {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen(start)]
pub fn start() {
    crate::logging::init();
    tracing::info!("posesync ready");
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use wasm_bindgen_test::wasm_bindgen_test;

    const LEFT: &str = "/user/hand/left";

    fn provider(body: &str) -> JsInputProvider {
        JsInputProvider::new(Function::new_with_args("path", body))
    }

    #[wasm_bindgen_test]
    fn test_float32_array_pose() {
        let p = provider(
            "if (path !== '/user/hand/left') return undefined; \
             const m = new Float32Array(16); m[0] = 1; m[5] = 1; m[10] = 1; m[15] = 1; m[12] = 0.5; \
             return m;",
        );
        assert_eq!(p.get(&SourceId::from(LEFT)), Some(Mat4::from_translation(Vec3::new(0.5, 0.0, 0.0))));
        assert_eq!(p.get(&SourceId::from("/user/head")), None);
    }

    #[wasm_bindgen_test]
    fn test_number_array_pose() {
        let p = provider("return [1,0,0,0, 0,1,0,0, 0,0,1,0, 0,2,0,1];");
        assert_eq!(p.get(&SourceId::from(LEFT)), Some(Mat4::from_translation(Vec3::new(0.0, 2.0, 0.0))));
    }

    #[wasm_bindgen_test]
    fn test_null_is_absent() {
        assert_eq!(provider("return null;").get(&SourceId::from(LEFT)), None);
    }

    #[wasm_bindgen_test]
    fn test_throwing_callback_is_absent() {
        let p = provider("throw new Error('tracking lost');");
        assert_eq!(p.get(&SourceId::from(LEFT)), None);
    }

    #[wasm_bindgen_test]
    fn test_unsupported_and_malformed_values_are_absent() {
        for body in ["return 'pose';", "return { x: 1 };", "return [1, 2, 3];", "return new Array(16).fill('a');"] {
            assert_eq!(provider(body).get(&SourceId::from(LEFT)), None, "{body}");
        }
    }

    #[wasm_bindgen_test]
    fn test_clear_provider_makes_tick_noop() {
        let sync = WebPoseSync::new();
        let node = WebSceneNode::new(Some("cursor".to_string()));
        sync.register(&node, LEFT.to_string());

        sync.set_provider(Function::new_with_args("path", "return [1,0,0,0, 0,1,0,0, 0,0,1,0, 1,1,1,1];"));
        sync.clear_provider();
        sync.tick();
        assert!(!node.matrix_explicit());
        assert_eq!(node.matrix(), Mat4::IDENTITY.to_cols_array().to_vec());

        sync.set_provider(Function::new_with_args("path", "return [1,0,0,0, 0,1,0,0, 0,0,1,0, 1,1,1,1];"));
        sync.tick();
        assert!(node.matrix_explicit());
        assert!(node.world_matrix_dirty());
        assert_eq!(node.translation(), vec![1.0, 1.0, 1.0]);
    }

    #[wasm_bindgen_test]
    fn test_unregister_stops_updates() {
        let sync = WebPoseSync::new();
        let node = WebSceneNode::new(None);
        sync.register(&node, LEFT.to_string());
        sync.unregister(&node);
        sync.set_provider(Function::new_with_args("path", "return [1,0,0,0, 0,1,0,0, 0,0,1,0, 1,1,1,1];"));
        sync.tick();
        assert!(!node.matrix_explicit());
    }
}
