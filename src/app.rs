//! Host glue: per-frame and per-event update functions, panel ↔ scene
//! binding, and the overlay layout state. Both the native viewer and the
//! web host drive the stage through these.

use glam::{Vec2, Vec3};

use crate::data_model::StageModel;
use crate::interaction::{LightFollower, ParallaxComputer, PointerSample, RotationAnimator};
use crate::panel::{ControlPanel, Param, ParamGroup, ParamValue};
use crate::render::{CameraParams, LightParams};
use crate::scene::{format_hex_color, parse_hex_color, Camera, Material, Scene};

/// Advances the spin animation and writes the new orientation into the
/// model. Call once per rendered frame with the true elapsed time.
pub fn advance_frame(model: &StageModel, animator: &mut RotationAnimator, elapsed_seconds: f32) {
    animator.on_tick(elapsed_seconds);
    let spin_group = model.snapshot().interaction.spin_group;
    if let Some(name) = spin_group {
        model.set_group_rotation(&name, animator.angle());
    }
}

/// Routes a pointer sample over the stage surface to the follow light.
pub fn pointer_on_stage(model: &StageModel, follower: &mut LightFollower, sample: &PointerSample) {
    follower.on_pointer_move(sample);
    model.set_follow_light_position(follower.position());
}

/// Camera parameters for this frame. Orientation is recomputed from the
/// current position and target every call.
pub fn camera_params(camera: &Camera, aspect: f32) -> CameraParams {
    CameraParams {
        view_proj: camera.view_proj(aspect),
        position: camera.position(),
    }
}

/// Flattens the scene's spotlights into renderer params. Ambient light is
/// handled separately by the renderer.
pub fn light_params(scene: &Scene) -> Vec<LightParams> {
    scene
        .spot_lights
        .iter()
        .map(|light| LightParams {
            position: light.position,
            color: light.color,
            intensity: light.intensity,
            distance: light.distance,
            decay: light.decay,
            cos_angle: light.angle_rad.cos(),
            penumbra: light.penumbra,
        })
        .collect()
}

/// What the overlay layer needs each frame: the headline columns, the CTA
/// and the current parallax translation.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayState {
    pub left_words: Vec<String>,
    pub right_words: Vec<String>,
    pub cta: String,
    pub parallax: Vec2,
}

pub fn overlay_from_scene(scene: &Scene, parallax: &ParallaxComputer) -> OverlayState {
    OverlayState {
        left_words: scene.overlay.left_words.clone(),
        right_words: scene.overlay.right_words.clone(),
        cta: scene.overlay.cta.clone(),
        parallax: parallax.offset(),
    }
}

pub const GLASS_GROUP: &str = "Glass Material";
pub const GROUND_GROUP: &str = "Ground Plane";
pub const CAMERA_GROUP: &str = "Camera";

/// Declares the tuning surface for a scene, seeded from its current
/// attributes.
pub fn control_panel(scene: &Scene) -> ControlPanel {
    let mut groups = Vec::new();
    if let Some(material) = scene.mesh("glass-cube").map(|mesh| &mesh.material) {
        if let Some(group) = glass_panel(material) {
            groups.push(group);
        }
    }
    if let Some(material) = scene.mesh("ground").map(|mesh| &mesh.material) {
        if let Some(group) = ground_panel(material) {
            groups.push(group);
        }
    }
    groups.push(camera_panel(&scene.camera));
    ControlPanel { groups }
}

/// "Glass Material" group: thickness, roughness and tint with the original
/// bounds, plus the save action.
pub fn glass_panel(material: &Material) -> Option<ParamGroup> {
    let Material::Transmission {
        thickness,
        roughness,
        color,
        ..
    } = material
    else {
        return None;
    };
    Some(
        ParamGroup::new(GLASS_GROUP)
            .with_param("thickness", Param::bounded(*thickness, 0.0, 3.0, Some(0.05)))
            .with_param("roughness", Param::bounded(*roughness, 0.0, 1.0, Some(0.01)))
            .with_param("color", Param::color(format_hex_color(*color)))
            .with_export("Save Material", &[]),
    )
}

/// Applies the glass group back onto a transmission material.
pub fn apply_glass_panel(group: &ParamGroup, material: &mut Material) -> bool {
    let Material::Transmission {
        thickness,
        roughness,
        color,
        ..
    } = material
    else {
        return false;
    };
    if let Some(value) = group.float("thickness") {
        *thickness = value;
    }
    if let Some(value) = group.float("roughness") {
        *roughness = value;
    }
    if let Some(rgb) = group.color("color").and_then(parse_hex_color) {
        *color = rgb;
    }
    true
}

/// "Ground Plane" group: tint, roughness, metalness. No export action on
/// this one in the original pages.
pub fn ground_panel(material: &Material) -> Option<ParamGroup> {
    let Material::Standard {
        color,
        roughness,
        metalness,
    } = material
    else {
        return None;
    };
    Some(
        ParamGroup::new(GROUND_GROUP)
            .with_param("color", Param::color(format_hex_color(*color)))
            .with_param("roughness", Param::bounded(*roughness, 0.0, 1.0, None))
            .with_param("metalness", Param::bounded(*metalness, 0.0, 1.0, None)),
    )
}

pub fn apply_ground_panel(group: &ParamGroup, material: &mut Material) -> bool {
    let Material::Standard {
        color,
        roughness,
        metalness,
    } = material
    else {
        return false;
    };
    if let Some(rgb) = group.color("color").and_then(parse_hex_color) {
        *color = rgb;
    }
    if let Some(value) = group.float("roughness") {
        *roughness = value;
    }
    if let Some(value) = group.float("metalness") {
        *metalness = value;
    }
    true
}

/// "Camera" group: position (step 0.1) and field of view (10–120), plus the
/// save action. Orthographic cameras get no fov entry.
pub fn camera_panel(camera: &Camera) -> ParamGroup {
    let position = camera.position();
    let mut group = ParamGroup::new(CAMERA_GROUP).with_param(
        "position",
        Param::vec3([position.x, position.y, position.z], Some(0.1)),
    );
    if let Some(fov) = camera.fov_deg() {
        group = group.with_param("fov", Param::bounded(fov, 10.0, 120.0, None));
    }
    group.with_export("Save Camera", &[])
}

/// Applies the camera group back; the fov write is gated on the tag.
pub fn apply_camera_panel(group: &ParamGroup, camera: &mut Camera) {
    if let Some([x, y, z]) = group.vec3("position") {
        camera.set_position(Vec3::new(x, y, z));
    }
    if let Some(fov) = group.float("fov") {
        camera.set_fov_deg(fov);
    }
}

/// Headless summary of a composed scene, printed by the CLI.
pub fn print_scene_summary(scene: &Scene) {
    println!(
        "Loaded variant '{}' with {} groups, {} meshes, {} spot lights",
        scene.name,
        scene.groups.len(),
        scene.meshes.len() + scene.groups.iter().map(|g| g.meshes.len()).sum::<usize>(),
        scene.spot_lights.len()
    );
    for light in &scene.spot_lights {
        println!(
            " - spot at ({:.2}, {:.2}, {:.2}) intensity {:.0}",
            light.position.x, light.position.y, light.position.z, light.intensity
        );
    }
    println!(
        " - overlay \"{} / {}\" cta \"{}\"",
        scene.overlay.left_words.join(" "),
        scene.overlay.right_words.join(" "),
        scene.overlay.cta
    );
    let camera = &scene.camera;
    match camera.fov_deg() {
        Some(fov) => println!(
            " - perspective camera at ({:.2}, {:.2}, {:.2}) fov {:.0}",
            camera.position().x,
            camera.position().y,
            camera.position().z,
            fov
        ),
        None => println!(
            " - orthographic camera at ({:.2}, {:.2}, {:.2})",
            camera.position().x,
            camera.position().y,
            camera.position().z
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interaction::surface_sample;
    use crate::variants;

    #[test]
    fn advance_frame_writes_the_spin_group() {
        let model = StageModel::new(variants::turntable());
        let mut animator = RotationAnimator::new(0.4);
        advance_frame(&model, &mut animator, 0.5);
        let scene = model.snapshot();
        let expected = 0.5 * 0.4;
        assert!((scene.group("cube").unwrap().rotation_y - expected).abs() < 1e-6);
    }

    #[test]
    fn pointer_on_stage_moves_the_follow_light() {
        let scene = variants::hero();
        let mut follower = LightFollower::new(
            scene.interaction.initial_light_position,
            scene.interaction.light_height,
        );
        let model = StageModel::new(scene);
        pointer_on_stage(&model, &mut follower, &surface_sample(Vec3::new(2.0, 0.0, 3.0)));
        assert_eq!(
            model.snapshot().spot_lights[0].position,
            Vec3::new(2.0, 1.5, 3.0)
        );
    }

    #[test]
    fn panel_round_trips_through_the_scene() {
        let mut scene = variants::hero();
        let panel = control_panel(&scene);
        let mut glass = panel.group(GLASS_GROUP).unwrap().clone();
        glass
            .set("thickness", ParamValue::Float(1.0))
            .unwrap();
        glass
            .set("color", ParamValue::Color("#ff0000".to_string()))
            .unwrap();
        let material = &mut scene.mesh_mut("glass-cube").unwrap().material;
        assert!(apply_glass_panel(&glass, material));
        match &scene.mesh("glass-cube").unwrap().material {
            Material::Transmission {
                thickness, color, ..
            } => {
                assert_eq!(*thickness, 1.0);
                assert_eq!(*color, Vec3::new(1.0, 0.0, 0.0));
            }
            other => panic!("unexpected material {other:?}"),
        }
    }

    #[test]
    fn camera_panel_follows_the_tag() {
        let perspective = camera_panel(&variants::hero().camera);
        assert!(perspective.get("fov").is_some());

        let ortho = camera_panel(&variants::twin().camera);
        assert!(ortho.get("fov").is_none());

        // Applying a group with an fov entry to an orthographic camera
        // moves the position and leaves the projection alone.
        let mut camera = variants::twin().camera;
        apply_camera_panel(&perspective, &mut camera);
        assert_eq!(camera.position(), variants::hero().camera.position());
        assert_eq!(camera.fov_deg(), None);
    }

    #[test]
    fn control_panel_declares_all_three_groups_for_hero() {
        let panel = control_panel(&variants::hero());
        assert!(panel.group(GLASS_GROUP).is_some());
        assert!(panel.group(GROUND_GROUP).is_some());
        assert!(panel.group(CAMERA_GROUP).is_some());
    }

    #[test]
    fn light_params_carry_the_cone() {
        let params = light_params(&variants::hero());
        assert_eq!(params.len(), 1);
        let expected = std::f32::consts::FRAC_PI_6.cos();
        assert!((params[0].cos_angle - expected).abs() < 1e-6);
    }

    #[test]
    fn overlay_state_tracks_the_parallax_offset() {
        let scene = variants::hero();
        let mut parallax = ParallaxComputer::new(scene.interaction.parallax_max);
        parallax.on_pointer_move(0.0, 0.0, 1000.0, 800.0);
        let overlay = overlay_from_scene(&scene, &parallax);
        assert_eq!(overlay.parallax, Vec2::new(20.0, 20.0));
        assert_eq!(overlay.left_words, scene.overlay.left_words);
    }
}
