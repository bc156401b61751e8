use glam::{Mat4, Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Camera as a tagged variant. Field access that only makes sense for one
/// projection is gated on the tag instead of downcast-and-hope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Camera {
    Perspective {
        position: Vec3,
        target: Vec3,
        fov_deg: f32,
    },
    Orthographic {
        position: Vec3,
        target: Vec3,
        half_height: f32,
    },
}

impl Camera {
    pub fn perspective(position: Vec3, target: Vec3, fov_deg: f32) -> Self {
        Self::Perspective {
            position,
            target,
            fov_deg,
        }
    }

    pub fn orthographic(position: Vec3, target: Vec3, half_height: f32) -> Self {
        Self::Orthographic {
            position,
            target,
            half_height,
        }
    }

    pub fn position(&self) -> Vec3 {
        match self {
            Self::Perspective { position, .. } | Self::Orthographic { position, .. } => *position,
        }
    }

    pub fn set_position(&mut self, value: Vec3) {
        match self {
            Self::Perspective { position, .. } | Self::Orthographic { position, .. } => {
                *position = value;
            }
        }
    }

    pub fn target(&self) -> Vec3 {
        match self {
            Self::Perspective { target, .. } | Self::Orthographic { target, .. } => *target,
        }
    }

    pub fn look_at(&mut self, value: Vec3) {
        match self {
            Self::Perspective { target, .. } | Self::Orthographic { target, .. } => {
                *target = value;
            }
        }
    }

    /// Field of view in degrees, only meaningful for perspective cameras.
    pub fn fov_deg(&self) -> Option<f32> {
        match self {
            Self::Perspective { fov_deg, .. } => Some(*fov_deg),
            Self::Orthographic { .. } => None,
        }
    }

    /// Sets the field of view. Returns false (and leaves the camera alone)
    /// when the active variant has no such field.
    pub fn set_fov_deg(&mut self, value: f32) -> bool {
        match self {
            Self::Perspective { fov_deg, .. } => {
                *fov_deg = value;
                true
            }
            Self::Orthographic { .. } => false,
        }
    }

    /// Recomputes the view-projection matrix from the current position and
    /// target. Called once per frame; nothing about the orientation is
    /// cached between calls.
    pub fn view_proj(&self, aspect: f32) -> Mat4 {
        let aspect = aspect.max(0.01);
        match self {
            Self::Perspective {
                position,
                target,
                fov_deg,
            } => {
                let view = Mat4::look_at_rh(*position, *target, Vec3::Y);
                let projection = Mat4::perspective_rh(fov_deg.to_radians(), aspect, 0.1, 100.0);
                projection * view
            }
            Self::Orthographic {
                position,
                target,
                half_height,
            } => {
                let view = Mat4::look_at_rh(*position, *target, Vec3::Y);
                let half_width = half_height * aspect;
                let projection = Mat4::orthographic_rh(
                    -half_width,
                    half_width,
                    -*half_height,
                    *half_height,
                    0.1,
                    100.0,
                );
                projection * view
            }
        }
    }
}

/// Shadow-casting spotlight with the usual cone attributes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpotLight {
    pub position: Vec3,
    #[serde(default = "default_white")]
    pub color: Vec3,
    pub intensity: f32,
    pub distance: f32,
    #[serde(default = "default_decay")]
    pub decay: f32,
    pub angle_rad: f32,
    #[serde(default)]
    pub penumbra: f32,
    #[serde(default)]
    pub cast_shadows: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AmbientLight {
    #[serde(default = "default_white")]
    pub color: Vec3,
    pub intensity: f32,
}

/// Surface shading description. The renderers approximate these; the tree
/// only declares them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Material {
    /// Glass-like physically based material.
    Transmission {
        thickness: f32,
        roughness: f32,
        color: Vec3,
        transmission: f32,
        chromatic_aberration: f32,
        ior: f32,
    },
    Standard {
        color: Vec3,
        roughness: f32,
        metalness: f32,
    },
    /// Invisible shadow helper: writes neither color nor depth.
    Occluder { color: Vec3 },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Geometry {
    Box { size: Vec3 },
    Plane { size: Vec2 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshNode {
    pub name: String,
    pub geometry: Geometry,
    pub material: Material,
    #[serde(default)]
    pub position: Vec3,
    #[serde(default)]
    pub rotation: Vec3,
    #[serde(default = "default_scale")]
    pub scale: Vec3,
    #[serde(default)]
    pub cast_shadow: bool,
    #[serde(default)]
    pub receive_shadow: bool,
}

/// Group of meshes sharing a transform. `rotation_y` is the only field the
/// animator writes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupNode {
    pub name: String,
    #[serde(default)]
    pub position: Vec3,
    #[serde(default)]
    pub rotation_y: f32,
    pub meshes: Vec<MeshNode>,
}

/// Declared post-processing stages. Carried through to the host untouched;
/// the built-in renderers ignore them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PostEffect {
    Bloom { intensity: f32, threshold: f32 },
    DepthOfField { focus_distance: f32, bokeh_scale: f32 },
    Ssao { radius: f32, intensity: f32 },
    Vignette { darkness: f32, offset: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SoftShadows {
    pub size: f32,
    pub focus: f32,
    pub samples: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnvironmentPreset {
    Studio,
    City,
    Sunset,
}

/// Background gradient, top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Background {
    pub top: Vec3,
    pub bottom: Vec3,
}

/// Per-variant interaction policy. These are the constants of the page:
/// which light follows the pointer and at what fixed height, which group
/// spins and how fast, how far the overlay may drift.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interaction {
    pub follow_light: Option<usize>,
    pub light_height: f32,
    pub initial_light_position: Vec3,
    pub spin_group: Option<String>,
    pub rotation_rate: f32,
    pub parallax_max: f32,
}

/// Headline columns and call-to-action text for the overlay layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlayContent {
    pub left_words: Vec<String>,
    pub right_words: Vec<String>,
    pub cta: String,
}

/// A fully declared page variant: camera, lights, meshes, post stack and
/// interaction policy in one record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub name: String,
    pub camera: Camera,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment: Option<EnvironmentPreset>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub soft_shadows: Option<SoftShadows>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ambient: Option<AmbientLight>,
    pub spot_lights: Vec<SpotLight>,
    pub groups: Vec<GroupNode>,
    pub meshes: Vec<MeshNode>,
    #[serde(default)]
    pub post_effects: Vec<PostEffect>,
    pub background: Background,
    pub interaction: Interaction,
    pub overlay: OverlayContent,
}

impl Scene {
    pub fn group(&self, name: &str) -> Option<&GroupNode> {
        self.groups.iter().find(|group| group.name == name)
    }

    pub fn group_mut(&mut self, name: &str) -> Option<&mut GroupNode> {
        self.groups.iter_mut().find(|group| group.name == name)
    }

    pub fn mesh(&self, name: &str) -> Option<&MeshNode> {
        self.meshes
            .iter()
            .chain(self.groups.iter().flat_map(|group| group.meshes.iter()))
            .find(|mesh| mesh.name == name)
    }

    pub fn mesh_mut(&mut self, name: &str) -> Option<&mut MeshNode> {
        self.meshes
            .iter_mut()
            .chain(
                self.groups
                    .iter_mut()
                    .flat_map(|group| group.meshes.iter_mut()),
            )
            .find(|mesh| mesh.name == name)
    }

    pub fn spot_light(&self, index: usize) -> Option<&SpotLight> {
        self.spot_lights.get(index)
    }

    pub fn spot_light_mut(&mut self, index: usize) -> Option<&mut SpotLight> {
        self.spot_lights.get_mut(index)
    }

    /// The spotlight driven by the pointer, when the variant has one.
    pub fn follow_light_mut(&mut self) -> Option<&mut SpotLight> {
        let index = self.interaction.follow_light?;
        self.spot_lights.get_mut(index)
    }
}

fn default_white() -> Vec3 {
    Vec3::ONE
}

fn default_scale() -> Vec3 {
    Vec3::ONE
}

fn default_decay() -> f32 {
    2.0
}

/// Parses `#rrggbb` into RGB in [0, 1].
pub fn parse_hex_color(text: &str) -> Option<Vec3> {
    let digits = text.strip_prefix('#')?;
    if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let value = u32::from_str_radix(digits, 16).ok()?;
    let r = ((value >> 16) & 0xff) as f32 / 255.0;
    let g = ((value >> 8) & 0xff) as f32 / 255.0;
    let b = (value & 0xff) as f32 / 255.0;
    Some(Vec3::new(r, g, b))
}

/// Formats RGB in [0, 1] as `#rrggbb`.
pub fn format_hex_color(color: Vec3) -> String {
    let quantize = |channel: f32| (channel.clamp(0.0, 1.0) * 255.0).round() as u32;
    format!(
        "#{:02x}{:02x}{:02x}",
        quantize(color.x),
        quantize(color.y),
        quantize(color.z)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_camera() -> Camera {
        Camera::perspective(Vec3::new(4.0, 3.5, -3.0), Vec3::new(0.0, -0.5, 0.0), 31.0)
    }

    #[test]
    fn fov_access_is_gated_on_the_tag() {
        let mut camera = sample_camera();
        assert_eq!(camera.fov_deg(), Some(31.0));
        assert!(camera.set_fov_deg(45.0));
        assert_eq!(camera.fov_deg(), Some(45.0));

        let mut ortho = Camera::orthographic(Vec3::new(0.0, 2.0, 6.0), Vec3::ZERO, 2.0);
        assert_eq!(ortho.fov_deg(), None);
        assert!(!ortho.set_fov_deg(45.0));
        assert_eq!(ortho.fov_deg(), None);
    }

    #[test]
    fn view_proj_follows_the_current_target() {
        let mut camera = sample_camera();
        let before = camera.view_proj(16.0 / 9.0);
        camera.look_at(Vec3::new(0.0, -3.5, 0.0));
        let after = camera.view_proj(16.0 / 9.0);
        assert_ne!(before, after);
    }

    #[test]
    fn hex_colors_round_trip() {
        let color = parse_hex_color("#727272").unwrap();
        assert_eq!(format_hex_color(color), "#727272");
        assert_eq!(parse_hex_color("#ffffff"), Some(Vec3::ONE));
        assert!(parse_hex_color("727272").is_none());
        assert!(parse_hex_color("#xyzxyz").is_none());
        assert!(parse_hex_color("#fff").is_none());
    }

    #[test]
    fn mesh_lookup_reaches_into_groups() {
        let scene = crate::variants::hero();
        assert!(scene.mesh("glass-cube").is_some());
        assert!(scene.mesh("ground").is_some());
        assert!(scene.mesh("missing").is_none());
    }

    #[test]
    fn scene_serializes_and_deserializes() {
        let scene = crate::variants::hero();
        let json = serde_json::to_string(&scene).unwrap();
        let back: Scene = serde_json::from_str(&json).unwrap();
        assert_eq!(scene, back);
    }
}
