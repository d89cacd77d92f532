use glam::{Mat4, Quat, Vec3};
use std::time::{Duration, Instant};

// Import from the library crate
use posesync::{config, logging, model, controller};

use config::DemoConfig;
use controller::{PoseSync, StaticInputProvider};
use model::{NodeHandle, SceneNode, SourceId};

const LEFT_HAND: &str = "/user/hand/left";
const RIGHT_HAND: &str = "/user/hand/right";

/// Scripted stand-in for a tracking runtime.
///
/// The left hand orbits the head at arm's length; the right hand loses
/// tracking for half a second out of every two.
struct ScriptedDevices {
    provider: StaticInputProvider,
    left: SourceId,
    right: SourceId,
}

impl ScriptedDevices {
    fn new() -> Self {
        Self {
            provider: StaticInputProvider::new(),
            left: SourceId::from(LEFT_HAND),
            right: SourceId::from(RIGHT_HAND),
        }
    }

    fn advance(&mut self, t: f32) {
        let angle = t * 0.8;
        let left = Mat4::from_rotation_translation(
            Quat::from_rotation_y(-angle),
            Vec3::new(angle.cos() * 0.6, 1.3, angle.sin() * 0.6),
        );
        self.provider.set_pose(self.left.clone(), left);

        if t.rem_euclid(2.0) < 1.5 {
            let bob = (t * 3.0).sin() * 0.05;
            let right = Mat4::from_rotation_translation(
                Quat::from_rotation_z(bob),
                Vec3::new(0.3, 1.1 + bob, -0.35),
            );
            self.provider.set_pose(self.right.clone(), right);
        } else {
            self.provider.clear_pose(&self.right);
        }
    }
}

fn log_node(frame: u64, node: &NodeHandle) {
    let mut node = node.borrow_mut();
    if !node.world_matrix_dirty {
        tracing::info!(frame, node = node.label(), "no fresh pose");
        return;
    }
    let (axis, angle) = node.rotation.to_axis_angle();
    tracing::info!(
        frame,
        node = node.label(),
        translation = ?node.translation,
        axis = ?axis,
        angle_deg = angle.to_degrees(),
        "pose"
    );
    // Stand-in for the renderer recomputing world matrices
    node.clear_dirty();
}

fn main() {
    logging::init();
    let config = DemoConfig::from_env();
    tracing::info!(frames = config.frames, interval = ?config.frame_interval, "starting pose sync demo");

    let left_cursor = SceneNode::named("left-cursor").into_handle();
    let right_cursor = SceneNode::named("right-cursor").into_handle();

    let mut sync = PoseSync::new();
    sync.register(&left_cursor, LEFT_HAND);
    sync.register(&right_cursor, RIGHT_HAND);

    let mut devices = ScriptedDevices::new();

    let start = Instant::now();
    let mut fps_timer = Instant::now();
    let mut frame_count = 0u32;

    for frame in 0..config.frames {
        let frame_start = Instant::now();
        let t = start.elapsed().as_secs_f32();

        // The runtime needs a few frames before it reports any poses
        if frame >= 3 {
            devices.advance(t);
            sync.tick(Some(&devices.provider));
        } else {
            sync.tick(None);
        }

        if frame % 30 == 0 {
            log_node(sync.frame(), &left_cursor);
            log_node(sync.frame(), &right_cursor);
        }

        frame_count += 1;
        if fps_timer.elapsed() >= Duration::from_secs(1) {
            let fps = frame_count as f32 / fps_timer.elapsed().as_secs_f32();
            tracing::info!(fps, "frame rate");
            frame_count = 0;
            fps_timer = Instant::now();
        }

        if let Some(rest) = config.frame_interval.checked_sub(frame_start.elapsed()) {
            std::thread::sleep(rest);
        }
    }

    // Teardown: cursor entities destroyed
    sync.unregister(&left_cursor);
    sync.unregister(&right_cursor);
    tracing::info!(frames = sync.frame(), "pose sync demo finished");
}
