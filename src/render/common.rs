use glam::{Mat4, Vec3};

/// Camera parameters consumed by the renderer's uniform buffer.
#[derive(Clone, Debug)]
pub struct CameraParams {
    pub view_proj: Mat4,
    pub position: Vec3,
}

/// Spotlight state consumed by the renderer's uniform buffer.
#[derive(Clone, Debug)]
pub struct LightParams {
    pub position: Vec3,
    pub color: Vec3,
    pub intensity: f32,
    pub distance: f32,
    pub decay: f32,
    /// Cosine of the full cone angle.
    pub cos_angle: f32,
    /// Edge softness in [0, 1]; 0 is a hard cone.
    pub penumbra: f32,
}
