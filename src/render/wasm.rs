use anyhow::{anyhow, Result};
use glam::Vec3;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::common::{CameraParams, LightParams};
use crate::scene::{Background, Geometry, Material, Scene};

/// Schematic 2D-canvas stage for the browser host: a top-down plan of the
/// scene rather than a shaded 3D view. Good enough to watch the follow
/// light track the pointer and the cube spin.
pub struct Renderer {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    lights: Vec<LightParams>,
    ambient: Vec3,
    background: Background,
}

/// World units visible across the shorter canvas axis.
const VIEW_SPAN: f64 = 12.0;

impl Renderer {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self> {
        let ctx = canvas
            .get_context("2d")
            .map_err(|_| anyhow!("2d context request failed"))?
            .ok_or_else(|| anyhow!("canvas has no 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| anyhow!("2d context has an unexpected type"))?;
        Ok(Self {
            canvas,
            ctx,
            lights: Vec::new(),
            ambient: Vec3::splat(0.1),
            background: Background {
                top: Vec3::ZERO,
                bottom: Vec3::ZERO,
            },
        })
    }

    pub fn update_globals(
        &mut self,
        _camera: &CameraParams,
        lights: &[LightParams],
        ambient: Vec3,
        background: &Background,
    ) {
        self.lights = lights.to_vec();
        self.ambient = ambient;
        self.background = *background;
    }

    pub fn render(&mut self, scene: &Scene) -> Result<()> {
        let width = self.canvas.width() as f64;
        let height = self.canvas.height() as f64;
        if width <= 0.0 || height <= 0.0 {
            return Ok(());
        }
        let scale = width.min(height) / VIEW_SPAN;
        let ctx = &self.ctx;

        let gradient = ctx.create_linear_gradient(0.0, 0.0, 0.0, height);
        let _ = gradient.add_color_stop(0.0, &css_color(self.background.top, 1.0));
        let _ = gradient.add_color_stop(1.0, &css_color(self.background.bottom, 1.0));
        ctx.set_fill_style_canvas_gradient(&gradient);
        ctx.fill_rect(0.0, 0.0, width, height);

        // World origin at canvas center, +x right, +z down.
        let to_canvas = |x: f32, z: f32| -> (f64, f64) {
            (
                width * 0.5 + x as f64 * scale,
                height * 0.5 + z as f64 * scale,
            )
        };

        for mesh in &scene.meshes {
            self.draw_footprint(mesh, 0.0, &to_canvas, scale);
        }
        for group in &scene.groups {
            for mesh in &group.meshes {
                self.draw_footprint(mesh, group.rotation_y, &to_canvas, scale);
            }
        }

        // Light pools last, additively over the plan.
        for light in &self.lights {
            let (cx, cy) = to_canvas(light.position.x, light.position.z);
            let radius = (light.distance as f64 * scale * 0.5).max(4.0);
            let pool = ctx
                .create_radial_gradient(cx, cy, 1.0, cx, cy, radius)
                .map_err(|_| anyhow!("radial gradient creation failed"))?;
            let strength = (light.intensity / 120.0).clamp(0.15, 0.85) as f64;
            let _ = pool.add_color_stop(0.0, &css_color(light.color, strength));
            let _ = pool.add_color_stop(1.0, &css_color(light.color, 0.0));
            ctx.set_fill_style_canvas_gradient(&pool);
            ctx.begin_path();
            let _ = ctx.arc(cx, cy, radius, 0.0, std::f64::consts::TAU);
            ctx.fill();
        }

        Ok(())
    }

    fn draw_footprint(
        &self,
        mesh: &crate::scene::MeshNode,
        group_rotation: f32,
        to_canvas: &dyn Fn(f32, f32) -> (f64, f64),
        scale: f64,
    ) {
        let (fill, alpha) = match &mesh.material {
            Material::Occluder { .. } => return,
            Material::Standard { color, .. } => (*color, 0.9),
            Material::Transmission { color, .. } => (*color, 0.45),
        };
        let (half_x, half_z) = match mesh.geometry {
            Geometry::Box { size } => (size.x * 0.5 * mesh.scale.x, size.z * 0.5 * mesh.scale.z),
            Geometry::Plane { size } => (size.x * 0.5 * mesh.scale.x, size.y * 0.5 * mesh.scale.z),
        };
        let (cx, cy) = to_canvas(mesh.position.x, mesh.position.z);

        let ctx = &self.ctx;
        ctx.save();
        let _ = ctx.translate(cx, cy);
        let _ = ctx.rotate((group_rotation + mesh.rotation.y) as f64);
        ctx.set_fill_style_str(&css_color(fill * self.ambient.max(Vec3::splat(0.35)), alpha));
        ctx.fill_rect(
            -(half_x as f64) * scale,
            -(half_z as f64) * scale,
            half_x as f64 * scale * 2.0,
            half_z as f64 * scale * 2.0,
        );
        ctx.restore();
    }
}

fn css_color(color: Vec3, alpha: f64) -> String {
    let channel = |value: f32| (value.clamp(0.0, 1.0) * 255.0).round() as u8;
    format!(
        "rgba({}, {}, {}, {:.3})",
        channel(color.x),
        channel(color.y),
        channel(color.z),
        alpha
    )
}
