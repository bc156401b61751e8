//! Page variant configuration records.
//!
//! Each showcase page is the same parameterized scene contract with
//! different baked constants: light counts and positions, material preset,
//! camera framing, rotation rate. Nothing here is loaded from disk.

use std::f32::consts::FRAC_PI_6;

use glam::{Vec2, Vec3};

use crate::scene::{
    AmbientLight, Background, Camera, EnvironmentPreset, Geometry, GroupNode, Interaction,
    Material, MeshNode, OverlayContent, PostEffect, Scene, SoftShadows, SpotLight,
};

/// Names of every built-in variant, in presentation order.
pub fn names() -> Vec<&'static str> {
    vec!["hero", "turntable", "twin"]
}

/// Looks up a built-in variant by name.
pub fn by_name(name: &str) -> Option<Scene> {
    match name {
        "hero" => Some(hero()),
        "turntable" => Some(turntable()),
        "twin" => Some(twin()),
        _ => None,
    }
}

/// All built-in variants.
pub fn all() -> Vec<Scene> {
    names()
        .into_iter()
        .filter_map(by_name)
        .collect()
}

/// The landing hero: a glass cube over a grey ground plane, one spotlight
/// snapping to the pointer at a fixed height. The cube does not spin.
pub fn hero() -> Scene {
    let initial_light = Vec3::new(0.0, 0.5, 0.0);
    Scene {
        name: "hero".to_string(),
        camera: Camera::perspective(Vec3::new(4.0, 3.5, -3.0), Vec3::new(0.0, -0.5, 0.0), 31.0),
        environment: Some(EnvironmentPreset::Studio),
        soft_shadows: Some(SoftShadows {
            size: 80.0,
            focus: 0.4,
            samples: 30,
        }),
        ambient: None,
        spot_lights: vec![SpotLight {
            position: initial_light,
            color: Vec3::ONE,
            intensity: 90.0,
            distance: 8.0,
            decay: 2.0,
            angle_rad: FRAC_PI_6,
            penumbra: 1.0,
            cast_shadows: true,
        }],
        groups: vec![cube_group(glass_material())],
        meshes: vec![ground_plane()],
        post_effects: Vec::new(),
        background: grey_gradient(),
        interaction: Interaction {
            follow_light: Some(0),
            light_height: 1.5,
            initial_light_position: initial_light,
            spin_group: Some("cube".to_string()),
            rotation_rate: 0.0,
            parallax_max: 20.0,
        },
        overlay: OverlayContent {
            left_words: vec!["Holy".to_string(), "ITS    A".to_string()],
            right_words: vec!["Shit".to_string(), "Cube".to_string()],
            cta: "See it up close".to_string(),
        },
    }
}

/// The turntable variant: the cube spins slowly, a fixed overhead spot adds
/// rim light, and the post stack is declared. Wider camera rig framing.
pub fn turntable() -> Scene {
    let initial_light = Vec3::new(0.0, 0.5, 0.0);
    Scene {
        name: "turntable".to_string(),
        camera: Camera::perspective(Vec3::new(4.0, 1.5, 5.0), Vec3::new(0.0, -3.5, 0.0), 35.0),
        environment: Some(EnvironmentPreset::Studio),
        soft_shadows: Some(SoftShadows {
            size: 80.0,
            focus: 0.4,
            samples: 30,
        }),
        ambient: None,
        spot_lights: vec![
            SpotLight {
                position: initial_light,
                color: Vec3::ONE,
                intensity: 90.0,
                distance: 8.0,
                decay: 2.0,
                angle_rad: FRAC_PI_6,
                penumbra: 1.0,
                cast_shadows: true,
            },
            SpotLight {
                position: Vec3::new(0.0, 5.0, 0.0),
                color: Vec3::ONE,
                intensity: 80.0,
                distance: 10.0,
                decay: 2.0,
                angle_rad: FRAC_PI_6,
                penumbra: 0.5,
                cast_shadows: true,
            },
        ],
        groups: vec![cube_group(glass_material())],
        meshes: vec![ground_plane()],
        post_effects: vec![
            PostEffect::Bloom {
                intensity: 0.6,
                threshold: 0.8,
            },
            PostEffect::DepthOfField {
                focus_distance: 5.5,
                bokeh_scale: 2.0,
            },
            PostEffect::Ssao {
                radius: 0.3,
                intensity: 20.0,
            },
            PostEffect::Vignette {
                darkness: 0.6,
                offset: 0.3,
            },
        ],
        background: grey_gradient(),
        interaction: Interaction {
            follow_light: Some(0),
            light_height: 1.5,
            initial_light_position: initial_light,
            spin_group: Some("cube".to_string()),
            rotation_rate: 0.4,
            parallax_max: 20.0,
        },
        overlay: OverlayContent {
            left_words: vec!["Every".to_string(), "Side".to_string()],
            right_words: vec!["Of".to_string(), "It".to_string()],
            cta: "Spin it yourself".to_string(),
        },
    }
}

/// The twin-spot variant: two fixed lights plus a bright ambient wash, an
/// orthographic camera and no pointer-following light. Parallax only.
pub fn twin() -> Scene {
    let left = Vec3::new(-2.5, 3.0, 1.5);
    Scene {
        name: "twin".to_string(),
        camera: Camera::orthographic(Vec3::new(4.0, 3.0, 4.0), Vec3::new(0.0, 0.2, 0.0), 2.2),
        environment: Some(EnvironmentPreset::Studio),
        soft_shadows: None,
        ambient: Some(AmbientLight {
            color: Vec3::ONE,
            intensity: 1.5,
        }),
        spot_lights: vec![
            SpotLight {
                position: left,
                color: Vec3::new(1.0, 0.95, 0.9),
                intensity: 60.0,
                distance: 9.0,
                decay: 2.0,
                angle_rad: FRAC_PI_6,
                penumbra: 0.8,
                cast_shadows: true,
            },
            SpotLight {
                position: Vec3::new(2.5, 3.0, -1.5),
                color: Vec3::new(0.9, 0.95, 1.0),
                intensity: 60.0,
                distance: 9.0,
                decay: 2.0,
                angle_rad: FRAC_PI_6,
                penumbra: 0.8,
                cast_shadows: true,
            },
        ],
        groups: vec![cube_group(Material::Standard {
            color: Vec3::new(0.9, 0.9, 0.92),
            roughness: 0.35,
            metalness: 0.85,
        })],
        meshes: vec![ground_plane()],
        post_effects: vec![PostEffect::Vignette {
            darkness: 0.5,
            offset: 0.25,
        }],
        background: grey_gradient(),
        interaction: Interaction {
            follow_light: None,
            light_height: 3.0,
            initial_light_position: left,
            spin_group: Some("cube".to_string()),
            rotation_rate: 0.0,
            parallax_max: 14.0,
        },
        overlay: OverlayContent {
            left_words: vec!["Twin".to_string()],
            right_words: vec!["Lit".to_string()],
            cta: "Compare finishes".to_string(),
        },
    }
}

fn glass_material() -> Material {
    Material::Transmission {
        thickness: 0.2,
        roughness: 0.15,
        color: Vec3::ONE,
        transmission: 1.0,
        chromatic_aberration: 1.0,
        ior: 2.0,
    }
}

/// The showcase cube: an invisible occluder for shadow shaping plus the
/// visible shell, grouped so they rotate together.
fn cube_group(shell: Material) -> GroupNode {
    GroupNode {
        name: "cube".to_string(),
        position: Vec3::new(0.0, 0.5, 0.0),
        rotation_y: 0.0,
        meshes: vec![
            MeshNode {
                name: "cube-occluder".to_string(),
                geometry: Geometry::Box { size: Vec3::ONE },
                material: Material::Occluder { color: Vec3::ZERO },
                position: Vec3::ZERO,
                rotation: Vec3::ZERO,
                scale: Vec3::ONE,
                cast_shadow: true,
                receive_shadow: false,
            },
            MeshNode {
                name: "glass-cube".to_string(),
                geometry: Geometry::Box { size: Vec3::ONE },
                material: shell,
                position: Vec3::ZERO,
                rotation: Vec3::ZERO,
                scale: Vec3::ONE,
                cast_shadow: false,
                receive_shadow: true,
            },
        ],
    }
}

fn ground_plane() -> MeshNode {
    MeshNode {
        name: "ground".to_string(),
        geometry: Geometry::Plane {
            size: Vec2::new(20.0, 20.0),
        },
        material: Material::Standard {
            color: Vec3::new(0.447, 0.447, 0.447),
            roughness: 0.13,
            metalness: 0.38,
        },
        position: Vec3::new(0.0, -0.01, 0.0),
        rotation: Vec3::ZERO,
        scale: Vec3::ONE,
        cast_shadow: false,
        receive_shadow: true,
    }
}

fn grey_gradient() -> Background {
    Background {
        top: Vec3::new(0.827, 0.827, 0.827),
        bottom: Vec3::new(0.961, 0.961, 0.961),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_name_resolves() {
        for name in names() {
            let scene = by_name(name).expect("variant exists");
            assert_eq!(scene.name, name);
        }
        assert!(by_name("nope").is_none());
        assert_eq!(all().len(), names().len());
    }

    #[test]
    fn follow_light_indices_are_valid() {
        for scene in all() {
            if let Some(index) = scene.interaction.follow_light {
                assert!(index < scene.spot_lights.len(), "{}", scene.name);
            }
        }
    }

    #[test]
    fn hero_matches_its_baked_framing() {
        let scene = hero();
        assert_eq!(scene.camera.fov_deg(), Some(31.0));
        assert_eq!(scene.interaction.rotation_rate, 0.0);
        assert_eq!(scene.interaction.light_height, 1.5);
        assert_eq!(
            scene.spot_lights[0].position,
            scene.interaction.initial_light_position
        );
    }

    #[test]
    fn turntable_spins_and_declares_post_effects() {
        let scene = turntable();
        assert!(scene.interaction.rotation_rate > 0.0);
        assert_eq!(scene.spot_lights.len(), 2);
        assert_eq!(scene.post_effects.len(), 4);
    }

    #[test]
    fn twin_has_no_follow_light() {
        let scene = twin();
        assert_eq!(scene.interaction.follow_light, None);
        assert_eq!(scene.camera.fov_deg(), None);
    }
}
