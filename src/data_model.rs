use std::sync::Arc;

use glam::Vec3;
use parking_lot::RwLock;

use crate::scene::Scene;

/// Shared handle to the live scene. Event handlers write through it, the
/// render path snapshots it; in practice there is a single writer (the UI
/// thread), the lock exists because host setup and the event-loop closure
/// both hold a handle.
#[derive(Debug)]
pub struct StageModel {
    scene: Arc<RwLock<Scene>>,
}

impl Clone for StageModel {
    fn clone(&self) -> Self {
        Self {
            scene: Arc::clone(&self.scene),
        }
    }
}

impl StageModel {
    pub fn new(scene: Scene) -> Self {
        Self {
            scene: Arc::new(RwLock::new(scene)),
        }
    }

    /// Returns a snapshot of the whole scene.
    pub fn snapshot(&self) -> Scene {
        self.scene.read().clone()
    }

    /// Applies a mutation to the scene.
    pub fn update<F, R>(&self, updater: F) -> R
    where
        F: FnOnce(&mut Scene) -> R,
    {
        let mut guard = self.scene.write();
        updater(&mut guard)
    }

    /// Moves the pointer-following spotlight. Returns false when the
    /// variant has no follow light.
    pub fn set_follow_light_position(&self, position: Vec3) -> bool {
        self.update(|scene| {
            if let Some(light) = scene.follow_light_mut() {
                light.position = position;
                true
            } else {
                false
            }
        })
    }

    /// Writes the animated rotation of a mesh group.
    pub fn set_group_rotation(&self, name: &str, angle: f32) -> bool {
        self.update(|scene| {
            if let Some(group) = scene.group_mut(name) {
                group.rotation_y = angle;
                true
            } else {
                false
            }
        })
    }

    pub fn set_camera_position(&self, position: Vec3) {
        self.update(|scene| scene.camera.set_position(position));
    }

    /// Tag-gated: only perspective cameras accept a field of view.
    pub fn set_camera_fov(&self, fov_deg: f32) -> bool {
        self.update(|scene| scene.camera.set_fov_deg(fov_deg))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variants;

    #[test]
    fn follow_light_updates_land_in_the_snapshot() {
        let model = StageModel::new(variants::hero());
        assert!(model.set_follow_light_position(Vec3::new(2.0, 1.5, -1.0)));
        let scene = model.snapshot();
        assert_eq!(scene.spot_lights[0].position, Vec3::new(2.0, 1.5, -1.0));
    }

    #[test]
    fn variants_without_a_follow_light_report_false() {
        let model = StageModel::new(variants::twin());
        let before = model.snapshot();
        assert!(!model.set_follow_light_position(Vec3::ONE));
        assert_eq!(model.snapshot(), before);
    }

    #[test]
    fn group_rotation_round_trips() {
        let model = StageModel::new(variants::turntable());
        assert!(model.set_group_rotation("cube", 1.25));
        assert_eq!(model.snapshot().group("cube").unwrap().rotation_y, 1.25);
        assert!(!model.set_group_rotation("missing", 1.0));
    }

    #[test]
    fn camera_fov_respects_the_tag() {
        let hero = StageModel::new(variants::hero());
        assert!(hero.set_camera_fov(40.0));
        assert_eq!(hero.snapshot().camera.fov_deg(), Some(40.0));

        let twin = StageModel::new(variants::twin());
        assert!(!twin.set_camera_fov(40.0));
    }

    #[test]
    fn handles_share_one_scene() {
        let model = StageModel::new(variants::hero());
        let other = model.clone();
        model.set_camera_position(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(other.snapshot().camera.position(), Vec3::new(1.0, 2.0, 3.0));
    }
}
