use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use bytemuck::{bytes_of, Pod, Zeroable};
use wgpu::util::DeviceExt;
use glam::{Mat3, Mat4, Vec2, Vec3};
use winit::dpi::PhysicalSize;
use winit::window::{Window, WindowId};

use super::common::{CameraParams, LightParams};
use crate::scene::{Background, Geometry, GroupNode, Material, MeshNode, Scene};

pub const MAX_SPOT_LIGHTS: usize = 4;

/// Forward renderer for the showcase stage. Approximates the declared
/// materials: standard surfaces get a diffuse term per spotlight cone,
/// transmission surfaces are drawn last as tinted alpha-blended glass.
/// Declared post-processing stages are ignored.
pub struct Renderer {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    size: PhysicalSize<u32>,
    depth: DepthBuffer,
    pipeline: wgpu::RenderPipeline,
    global_buffer: wgpu::Buffer,
    global_bind_group: wgpu::BindGroup,
    object_layout: wgpu::BindGroupLayout,
    geometry_cache: HashMap<String, MeshBuffers>,
    clear_color: wgpu::Color,
}

impl Renderer {
    /// Initializes the GPU renderer for the provided window.
    pub async fn new(window: Arc<Window>) -> Result<Self> {
        let size = window.inner_size();
        if size.width == 0 || size.height == 0 {
            return Err(anyhow!("window has zero area"));
        }

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            flags: wgpu::InstanceFlags::default(),
            memory_budget_thresholds: Default::default(),
            backend_options: Default::default(),
        });
        let surface = instance.create_surface(Arc::clone(&window))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("failed to acquire GPU adapter")?;

        let device_descriptor = wgpu::DeviceDescriptor {
            label: Some("stage-device"),
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            memory_hints: Default::default(),
            trace: Default::default(),
        };
        let (device, queue) = adapter
            .request_device(&device_descriptor)
            .await
            .context("failed to create GPU device")?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|format| format.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width,
            height: size.height,
            present_mode: surface_caps
                .present_modes
                .iter()
                .copied()
                .find(|mode| {
                    matches!(
                        mode,
                        wgpu::PresentMode::Mailbox | wgpu::PresentMode::Immediate
                    )
                })
                .unwrap_or(wgpu::PresentMode::Fifo),
            desired_maximum_frame_latency: 2,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
        };
        surface.configure(&device, &config);

        let depth = DepthBuffer::create(&device, config.width, config.height);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("stage-shader"),
            source: wgpu::ShaderSource::Wgsl(SHADER.into()),
        });

        let global_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("global-bind-layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: Some(
                        std::num::NonZeroU64::new(std::mem::size_of::<GlobalUniform>() as u64)
                            .ok_or_else(|| anyhow!("empty global uniform"))?,
                    ),
                },
                count: None,
            }],
        });

        let object_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("object-bind-layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: Some(
                        std::num::NonZeroU64::new(std::mem::size_of::<ObjectConstants>() as u64)
                            .ok_or_else(|| anyhow!("empty object uniform"))?,
                    ),
                },
                count: None,
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("stage-pipeline-layout"),
            bind_group_layouts: &[&global_layout, &object_layout],
            push_constant_ranges: &[],
        });

        let global_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("global-uniform"),
            size: std::mem::size_of::<GlobalUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let global_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("global-bind-group"),
            layout: &global_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: global_buffer.as_entire_binding(),
            }],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("stage-pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: (6 * std::mem::size_of::<f32>()) as u64,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &[
                        wgpu::VertexAttribute {
                            format: wgpu::VertexFormat::Float32x3,
                            offset: 0,
                            shader_location: 0,
                        },
                        wgpu::VertexAttribute {
                            format: wgpu::VertexFormat::Float32x3,
                            offset: (3 * std::mem::size_of::<f32>()) as u64,
                            shader_location: 1,
                        },
                    ],
                }],
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DepthBuffer::FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: Default::default(),
                bias: Default::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            multiview: None,
            cache: None,
        });

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            size,
            depth,
            pipeline,
            global_buffer,
            global_bind_group,
            object_layout,
            geometry_cache: HashMap::new(),
            clear_color: wgpu::Color::BLACK,
        })
    }

    pub fn window_id(&self) -> WindowId {
        self.window.id()
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    /// Resizes the swap chain to match the new dimensions.
    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        self.size = new_size;
        self.config.width = new_size.width;
        self.config.height = new_size.height;
        self.surface.configure(&self.device, &self.config);
        self.depth = DepthBuffer::create(&self.device, new_size.width, new_size.height);
    }

    /// Updates the camera, lighting and background uniforms for this frame.
    pub fn update_globals(
        &mut self,
        camera: &CameraParams,
        lights: &[LightParams],
        ambient: Vec3,
        background: &Background,
    ) {
        let mut spots = [SpotUniform::zeroed(); MAX_SPOT_LIGHTS];
        let count = lights.len().min(MAX_SPOT_LIGHTS);
        for (slot, light) in spots.iter_mut().zip(lights.iter().take(MAX_SPOT_LIGHTS)) {
            *slot = SpotUniform {
                position_intensity: light.position.extend(light.intensity).into(),
                color_distance: light.color.extend(light.distance).into(),
                cone: [light.cos_angle, light.penumbra, light.decay, 0.0],
            };
        }
        let uniform = GlobalUniform {
            view_proj: camera.view_proj.to_cols_array_2d(),
            camera_position: camera.position.extend(1.0).into(),
            ambient_count: ambient.extend(count as f32).into(),
            spots,
        };
        self.queue
            .write_buffer(&self.global_buffer, 0, bytes_of(&uniform));
        self.clear_color = wgpu::Color {
            r: background.top.x as f64,
            g: background.top.y as f64,
            b: background.top.z as f64,
            a: 1.0,
        };
    }

    /// Draws the scene snapshot: opaque surfaces first, glass last.
    pub fn render(&mut self, scene: &Scene) -> Result<(), wgpu::SurfaceError> {
        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("stage-encoder"),
            });

        let mut draw_list = Vec::new();
        for mesh in &scene.meshes {
            self.push_draw(&mut draw_list, mesh, Mat4::IDENTITY);
        }
        for group in &scene.groups {
            let group_model = group_model_matrix(group);
            for mesh in &group.meshes {
                self.push_draw(&mut draw_list, mesh, group_model);
            }
        }
        // Blend-correct enough for this stage: glass after everything else.
        draw_list.sort_by_key(|item: &DrawItem| item.transparent);

        let mut bind_groups = Vec::new();
        for item in &draw_list {
            let object_buffer =
                self.device
                    .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                        label: Some("object-uniform"),
                        contents: bytes_of(&item.constants),
                        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                    });
            bind_groups.push(self.device.create_bind_group(&wgpu::BindGroupDescriptor {
                layout: &self.object_layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: object_buffer.as_entire_binding(),
                }],
                label: Some("object-bind-group"),
            }));
        }

        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("stage-pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &view,
                depth_slice: None,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(self.clear_color),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.depth.view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.global_bind_group, &[]);

        for (item, bind_group) in draw_list.iter().zip(bind_groups.iter()) {
            let Some(mesh) = self.geometry_cache.get(&item.geometry_key) else {
                continue;
            };
            pass.set_vertex_buffer(0, mesh.vertex.slice(..));
            pass.set_index_buffer(mesh.index.slice(..), wgpu::IndexFormat::Uint32);
            pass.set_bind_group(1, bind_group, &[]);
            pass.draw_indexed(0..mesh.index_count, 0, 0..1);
        }

        drop(pass); // explicit to satisfy lifetimes on some backends
        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }

    fn push_draw(&mut self, draw_list: &mut Vec<DrawItem>, mesh: &MeshNode, parent: Mat4) {
        let Some(surface) = surface_constants(&mesh.material) else {
            // Occluders write neither color nor depth; nothing to draw.
            return;
        };
        self.ensure_geometry(&mesh.name, &mesh.geometry);

        let model = parent * node_model_matrix(mesh);
        let normal = Mat3::from_mat4(model).inverse().transpose();
        draw_list.push(DrawItem {
            geometry_key: mesh.name.clone(),
            transparent: surface.color[3] < 1.0,
            constants: ObjectConstants {
                model: model.to_cols_array_2d(),
                normal: mat3_to_3x4(normal),
                color: surface.color,
                shading: surface.shading,
            },
        });
    }

    fn ensure_geometry(&mut self, key: &str, geometry: &Geometry) {
        if self.geometry_cache.contains_key(key) {
            return;
        }
        let (vertices, indices) = match geometry {
            Geometry::Box { size } => box_mesh(*size),
            Geometry::Plane { size } => plane_mesh(*size),
        };
        let buffers = MeshBuffers::from_data(&self.device, &vertices, &indices, key);
        self.geometry_cache.insert(key.to_string(), buffers);
    }
}

struct DrawItem {
    geometry_key: String,
    transparent: bool,
    constants: ObjectConstants,
}

struct SurfaceConstants {
    color: [f32; 4],
    /// roughness, metalness, unlit flag, padding.
    shading: [f32; 4],
}

/// Maps a declared material onto the shading model the pass understands.
/// Returns None for surfaces that should not be drawn at all.
fn surface_constants(material: &Material) -> Option<SurfaceConstants> {
    match material {
        Material::Occluder { .. } => None,
        Material::Standard {
            color,
            roughness,
            metalness,
        } => Some(SurfaceConstants {
            color: color.extend(1.0).into(),
            shading: [*roughness, *metalness, 0.0, 0.0],
        }),
        Material::Transmission {
            roughness,
            color,
            transmission,
            ..
        } => {
            // More transmissive glass is more see-through.
            let alpha = (1.0 - transmission * 0.65).clamp(0.2, 1.0);
            Some(SurfaceConstants {
                color: color.extend(alpha).into(),
                shading: [*roughness, 0.0, 0.0, 0.0],
            })
        }
    }
}

fn node_model_matrix(mesh: &MeshNode) -> Mat4 {
    let translation = Mat4::from_translation(mesh.position);
    let rotation = Mat4::from_rotation_z(mesh.rotation.z)
        * Mat4::from_rotation_y(mesh.rotation.y)
        * Mat4::from_rotation_x(mesh.rotation.x);
    let scale = Mat4::from_scale(mesh.scale);
    translation * rotation * scale
}

fn group_model_matrix(group: &GroupNode) -> Mat4 {
    Mat4::from_translation(group.position) * Mat4::from_rotation_y(group.rotation_y)
}

fn mat3_to_3x4(matrix: Mat3) -> [[f32; 4]; 3] {
    let cols = matrix.to_cols_array();
    [
        [cols[0], cols[1], cols[2], 0.0],
        [cols[3], cols[4], cols[5], 0.0],
        [cols[6], cols[7], cols[8], 0.0],
    ]
}

/// Interleaved position + normal vertices for an axis-aligned box centered
/// at the origin.
fn box_mesh(size: Vec3) -> (Vec<f32>, Vec<u32>) {
    let (hx, hy, hz) = (size.x * 0.5, size.y * 0.5, size.z * 0.5);
    // One quad per face, normals outward.
    let faces: [([f32; 3], [[f32; 3]; 4]); 6] = [
        (
            [0.0, 0.0, 1.0],
            [
                [-hx, -hy, hz],
                [hx, -hy, hz],
                [hx, hy, hz],
                [-hx, hy, hz],
            ],
        ),
        (
            [0.0, 0.0, -1.0],
            [
                [hx, -hy, -hz],
                [-hx, -hy, -hz],
                [-hx, hy, -hz],
                [hx, hy, -hz],
            ],
        ),
        (
            [-1.0, 0.0, 0.0],
            [
                [-hx, -hy, -hz],
                [-hx, -hy, hz],
                [-hx, hy, hz],
                [-hx, hy, -hz],
            ],
        ),
        (
            [1.0, 0.0, 0.0],
            [
                [hx, -hy, hz],
                [hx, -hy, -hz],
                [hx, hy, -hz],
                [hx, hy, hz],
            ],
        ),
        (
            [0.0, -1.0, 0.0],
            [
                [-hx, -hy, -hz],
                [hx, -hy, -hz],
                [hx, -hy, hz],
                [-hx, -hy, hz],
            ],
        ),
        (
            [0.0, 1.0, 0.0],
            [
                [-hx, hy, hz],
                [hx, hy, hz],
                [hx, hy, -hz],
                [-hx, hy, -hz],
            ],
        ),
    ];

    let mut vertices = Vec::with_capacity(6 * 4 * 6);
    let mut indices = Vec::with_capacity(36);
    for (face, (normal, corners)) in faces.iter().enumerate() {
        let base = (face * 4) as u32;
        for corner in corners {
            vertices.extend_from_slice(corner);
            vertices.extend_from_slice(normal);
        }
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }
    (vertices, indices)
}

/// A horizontal quad at y = 0, normal up.
fn plane_mesh(size: Vec2) -> (Vec<f32>, Vec<u32>) {
    let (hx, hz) = (size.x * 0.5, size.y * 0.5);
    let normal = [0.0, 1.0, 0.0];
    let corners = [
        [-hx, 0.0, hz],
        [hx, 0.0, hz],
        [hx, 0.0, -hz],
        [-hx, 0.0, -hz],
    ];
    let mut vertices = Vec::with_capacity(4 * 6);
    for corner in &corners {
        vertices.extend_from_slice(corner);
        vertices.extend_from_slice(&normal);
    }
    (vertices, vec![0, 1, 2, 0, 2, 3])
}

struct MeshBuffers {
    vertex: wgpu::Buffer,
    index: wgpu::Buffer,
    index_count: u32,
}

impl MeshBuffers {
    fn from_data(device: &wgpu::Device, vertices: &[f32], indices: &[u32], label: &str) -> Self {
        let vertex = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label}-vertices")),
            contents: bytemuck::cast_slice(vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label}-indices")),
            contents: bytemuck::cast_slice(indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        Self {
            vertex,
            index,
            index_count: indices.len() as u32,
        }
    }
}

struct DepthBuffer {
    _texture: wgpu::Texture,
    view: wgpu::TextureView,
}

impl DepthBuffer {
    const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth24Plus;

    fn create(device: &wgpu::Device, width: u32, height: u32) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("depth-texture"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self {
            _texture: texture,
            view,
        }
    }
}

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
struct SpotUniform {
    position_intensity: [f32; 4],
    color_distance: [f32; 4],
    /// cos(angle), penumbra, decay, padding.
    cone: [f32; 4],
}

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
struct GlobalUniform {
    view_proj: [[f32; 4]; 4],
    camera_position: [f32; 4],
    /// Ambient color in xyz, active spotlight count in w.
    ambient_count: [f32; 4],
    spots: [SpotUniform; MAX_SPOT_LIGHTS],
}

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
struct ObjectConstants {
    model: [[f32; 4]; 4],
    normal: [[f32; 4]; 3],
    color: [f32; 4],
    shading: [f32; 4],
}

const SHADER: &str = r#"
struct SpotUniform {
    position_intensity: vec4<f32>,
    color_distance: vec4<f32>,
    cone: vec4<f32>,
}

struct GlobalUniform {
    view_proj: mat4x4<f32>,
    camera_position: vec4<f32>,
    ambient_count: vec4<f32>,
    spots: array<SpotUniform, 4>,
}

struct ObjectConstants {
    model: mat4x4<f32>,
    normal: mat3x4<f32>,
    color: vec4<f32>,
    shading: vec4<f32>,
}

@group(0) @binding(0)
var<uniform> globals: GlobalUniform;

@group(1) @binding(0)
var<uniform> object: ObjectConstants;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
}

struct VertexOutput {
    @builtin(position) position: vec4<f32>,
    @location(0) world_pos: vec3<f32>,
    @location(1) normal: vec3<f32>,
}

@vertex
fn vs_main(input: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    let world_position = object.model * vec4<f32>(input.position, 1.0);
    out.position = globals.view_proj * world_position;
    out.world_pos = world_position.xyz;

    let world_normal = mat3x3<f32>(
        object.normal[0].xyz,
        object.normal[1].xyz,
        object.normal[2].xyz
    ) * input.normal;

    out.normal = normalize(world_normal);
    return out;
}

@fragment
fn fs_main(input: VertexOutput) -> @location(0) vec4<f32> {
    let normal = normalize(input.normal);
    let roughness = object.shading.x;
    let metalness = object.shading.y;
    var lit = globals.ambient_count.xyz;

    let count = u32(globals.ambient_count.w);
    for (var i = 0u; i < count; i = i + 1u) {
        let spot = globals.spots[i];
        let light_pos = spot.position_intensity.xyz;
        let intensity = spot.position_intensity.w;
        let to_frag = input.world_pos - light_pos;
        let dist = length(to_frag);
        let dir = to_frag / max(dist, 1e-4);

        // All spots aim at the stage origin.
        let spot_dir = normalize(-light_pos);
        let cos_outer = spot.cone.x;
        let cos_inner = mix(1.0, cos_outer, 1.0 - spot.cone.y);
        let cone = smoothstep(cos_outer, max(cos_inner, cos_outer + 1e-4), dot(dir, spot_dir));

        let range = clamp(1.0 - dist / max(spot.color_distance.w, 1e-4), 0.0, 1.0);
        let falloff = pow(range, spot.cone.z);
        let diffuse = max(dot(normal, -dir), 0.0) * (1.0 - roughness * 0.5);

        let energy = intensity / 16.0;
        lit = lit + spot.color_distance.xyz * energy * falloff * cone * diffuse;
    }

    let view_dir = normalize(globals.camera_position.xyz - input.world_pos);
    let sheen = pow(max(dot(normal, view_dir), 0.0), 2.0) * metalness * 0.25;
    let color = object.color.rgb * clamp(lit + vec3<f32>(sheen), vec3<f32>(0.0), vec3<f32>(1.6));
    return vec4<f32>(color, object.color.a);
}
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn occluders_are_never_drawn() {
        assert!(surface_constants(&Material::Occluder { color: Vec3::ZERO }).is_none());
    }

    #[test]
    fn transmission_maps_to_a_translucent_surface() {
        let constants = surface_constants(&Material::Transmission {
            thickness: 0.2,
            roughness: 0.15,
            color: Vec3::ONE,
            transmission: 1.0,
            chromatic_aberration: 1.0,
            ior: 2.0,
        })
        .unwrap();
        assert!(constants.color[3] < 1.0);
        assert!(constants.color[3] >= 0.2);
    }

    #[test]
    fn box_mesh_has_one_quad_per_face() {
        let (vertices, indices) = box_mesh(Vec3::ONE);
        assert_eq!(vertices.len(), 24 * 6);
        assert_eq!(indices.len(), 36);
        // All positions sit on the half-extent shell.
        for chunk in vertices.chunks(6) {
            let on_shell = chunk[..3].iter().any(|c| (c.abs() - 0.5).abs() < 1e-6);
            assert!(on_shell, "{chunk:?}");
        }
    }

    #[test]
    fn plane_mesh_is_flat_and_up_facing() {
        let (vertices, indices) = plane_mesh(Vec2::new(20.0, 20.0));
        assert_eq!(indices.len(), 6);
        for chunk in vertices.chunks(6) {
            assert_eq!(chunk[1], 0.0);
            assert_eq!(&chunk[3..], &[0.0, 1.0, 0.0]);
        }
    }

    #[test]
    fn group_rotation_feeds_the_model_matrix() {
        let group = GroupNode {
            name: "cube".to_string(),
            position: Vec3::new(0.0, 0.5, 0.0),
            rotation_y: std::f32::consts::FRAC_PI_2,
            meshes: Vec::new(),
        };
        let model = group_model_matrix(&group);
        let moved = model.transform_point3(Vec3::new(1.0, 0.0, 0.0));
        assert!((moved - Vec3::new(0.0, 0.5, -1.0)).length() < 1e-5);
    }
}
