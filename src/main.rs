use std::any::Any;
use std::env;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;

use anyhow::{anyhow, Result};
use glam::Vec3;
use log::{debug, info};
use pollster::block_on;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, Event, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{Key, KeyCode, NamedKey, PhysicalKey};
use winit::window::Window;

use vitrine::app::{
    self, advance_frame, camera_params, control_panel, light_params, pointer_on_stage,
    print_scene_summary,
};
use vitrine::interaction::{
    ray_plane_y, screen_to_world_ray, surface_sample, LightFollower, ParallaxComputer,
    RotationAnimator,
};
use vitrine::panel::StdoutClipboard;
use vitrine::render::Renderer;
use vitrine::variants;
use vitrine::StageModel;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err:?}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {}

fn run() -> Result<()> {
    let options = CliOptions::parse()?;
    if options.list {
        for name in variants::names() {
            println!("{name}");
        }
        return Ok(());
    }

    let scene = variants::by_name(&options.variant).ok_or_else(|| {
        anyhow!(
            "unknown variant '{}'. Known variants: {}",
            options.variant,
            variants::names().join(", ")
        )
    })?;

    print_scene_summary(&scene);

    let interaction = scene.interaction.clone();
    let model = StageModel::new(scene);
    let follower = LightFollower::new(
        interaction.initial_light_position,
        interaction.light_height,
    );
    let animator = RotationAnimator::new(interaction.rotation_rate);
    let parallax = ParallaxComputer::new(interaction.parallax_max);

    if options.summary_only {
        run_headless(&model)
    } else {
        let headless_model = model.clone();
        match run_interactive(
            model,
            follower,
            animator,
            parallax,
            interaction.initial_light_position,
        ) {
            Ok(()) => Ok(()),
            Err(err) => {
                if err.downcast_ref::<WindowInitError>().is_some() {
                    eprintln!(
                        "{err}. Falling back to --summary-only mode (set DISPLAY or install X11 libs to enable rendering)."
                    );
                    run_headless(&headless_model)
                } else {
                    Err(err)
                }
            }
        }
    }
}

/// Headless mode: print the tuning surface and each group's export blob so
/// the composed state is inspectable without a window.
fn run_headless(model: &StageModel) -> Result<()> {
    let scene = model.snapshot();
    let panel = control_panel(&scene);
    let mut clipboard = StdoutClipboard;
    for group in &panel.groups {
        match group.export_action() {
            Some(action) => {
                println!("[{}] {}:", group.name, action.label);
                group.run_export(&mut clipboard)?;
            }
            None => println!("[{}] (no export action)", group.name),
        }
    }
    Ok(())
}

fn run_interactive(
    model: StageModel,
    follower: LightFollower,
    animator: RotationAnimator,
    parallax: ParallaxComputer,
    initial_light: Vec3,
) -> Result<()> {
    let default_hook = panic::take_hook();
    panic::set_hook(Box::new(|_| {}));
    let event_loop = panic::catch_unwind(AssertUnwindSafe(EventLoop::new));
    panic::set_hook(default_hook);
    let event_loop = event_loop
        .map_err(|panic| WindowInitError::from_panic("event loop", panic))?
        .map_err(|err| WindowInitError::from_error("event loop", err))?;

    let attributes = Window::default_attributes()
        .with_title("Vitrine")
        .with_inner_size(LogicalSize::new(1280.0, 720.0));
    #[allow(deprecated)]
    let window = Arc::new(
        event_loop
            .create_window(attributes)
            .map_err(|err| WindowInitError::from_error("window", err))?,
    );

    let renderer = block_on(Renderer::new(Arc::clone(&window)))
        .map_err(|err| WindowInitError::from_error("renderer", err))?;

    let mut app = AppState {
        renderer,
        model,
        follower,
        animator,
        parallax,
        initial_light,
        last_frame: Instant::now(),
        last_error: None,
    };

    #[allow(deprecated)]
    event_loop.run(move |event, elwt| {
        elwt.set_control_flow(ControlFlow::Poll);
        if let Err(err) = app.process_event(&event, elwt) {
            app.last_error = Some(err);
            elwt.exit();
        }
        // The closure owns the state; surface the error before exiting.
        if elwt.exiting() {
            if let Some(err) = app.last_error.take() {
                eprintln!("Error: {err:?}");
            }
        }
    })?;

    Ok(())
}

struct AppState {
    renderer: Renderer,
    model: StageModel,
    follower: LightFollower,
    animator: RotationAnimator,
    parallax: ParallaxComputer,
    initial_light: Vec3,
    last_frame: Instant,
    last_error: Option<anyhow::Error>,
}

#[derive(Debug)]
struct WindowInitError {
    message: String,
}

impl WindowInitError {
    fn from_panic(stage: &str, panic: Box<dyn Any + Send>) -> Self {
        Self {
            message: format!("failed to initialize {stage}: {}", panic_message(panic)),
        }
    }

    fn from_error(stage: &str, err: impl fmt::Display) -> Self {
        Self {
            message: format!("failed to initialize {stage}: {err}"),
        }
    }
}

impl fmt::Display for WindowInitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for WindowInitError {}

fn panic_message(panic: Box<dyn Any + Send>) -> String {
    match panic.downcast::<String>() {
        Ok(msg) => *msg,
        Err(panic) => match panic.downcast::<&'static str>() {
            Ok(msg) => (*msg).to_string(),
            Err(_) => "unknown panic".into(),
        },
    }
}

impl AppState {
    fn process_event(&mut self, event: &Event<()>, elwt: &ActiveEventLoop) -> Result<()> {
        match event {
            Event::WindowEvent { event, window_id } if *window_id == self.renderer.window_id() => {
                match event {
                    WindowEvent::CloseRequested => {
                        elwt.exit();
                    }
                    WindowEvent::Resized(size) => {
                        self.renderer.resize(*size);
                    }
                    WindowEvent::KeyboardInput { event, .. } => {
                        self.handle_keyboard(event, elwt)?;
                    }
                    WindowEvent::CursorMoved { position, .. } => {
                        self.handle_cursor(position.x as f32, position.y as f32);
                    }
                    WindowEvent::RedrawRequested => {
                        self.redraw()?;
                    }
                    _ => {}
                }
            }
            Event::AboutToWait => {
                self.renderer.window().request_redraw();
            }
            _ => {}
        }
        Ok(())
    }

    fn handle_cursor(&mut self, x: f32, y: f32) {
        let size = self.renderer.window().inner_size();
        let (width, height) = (size.width as f32, size.height as f32);
        if width <= 0.0 || height <= 0.0 {
            return;
        }

        self.parallax.on_pointer_move(x, y, width, height);
        debug!(
            "parallax offset ({:.1}, {:.1})",
            self.parallax.offset().x,
            self.parallax.offset().y
        );

        let camera = self.model.snapshot().camera;
        let view_proj = camera.view_proj(width / height);
        if let Some((origin, direction)) = screen_to_world_ray(view_proj, x, y, width, height) {
            if let Some(point) = ray_plane_y(origin, direction, 0.0) {
                pointer_on_stage(&self.model, &mut self.follower, &surface_sample(point));
            }
        }
    }

    /// C, G and M print the camera, glass and ground export blobs; R puts
    /// the follow light back at its opening position.
    fn handle_keyboard(&mut self, event: &KeyEvent, elwt: &ActiveEventLoop) -> Result<()> {
        if event.state != ElementState::Pressed {
            return Ok(());
        }
        if event.logical_key == Key::Named(NamedKey::Escape) {
            elwt.exit();
            return Ok(());
        }
        let group_name = match event.physical_key {
            PhysicalKey::Code(KeyCode::KeyC) => app::CAMERA_GROUP,
            PhysicalKey::Code(KeyCode::KeyG) => app::GLASS_GROUP,
            PhysicalKey::Code(KeyCode::KeyM) => app::GROUND_GROUP,
            PhysicalKey::Code(KeyCode::KeyR) => {
                self.follower.reset(self.initial_light);
                self.model.set_follow_light_position(self.follower.position());
                return Ok(());
            }
            _ => return Ok(()),
        };

        let scene = self.model.snapshot();
        let panel = control_panel(&scene);
        if let Some(group) = panel.group(group_name) {
            if group.export_action().is_some() {
                println!("[{group_name}]");
                group.run_export(&mut StdoutClipboard)?;
            } else {
                info!("group '{group_name}' has no export action");
            }
        }
        Ok(())
    }

    fn redraw(&mut self) -> Result<()> {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;
        advance_frame(&self.model, &mut self.animator, elapsed);

        let scene = self.model.snapshot();
        let camera = camera_params(&scene.camera, self.aspect());
        let lights = light_params(&scene);
        let ambient = scene
            .ambient
            .map(|light| light.color * light.intensity * 0.2)
            .unwrap_or(Vec3::ZERO);
        self.renderer
            .update_globals(&camera, &lights, ambient, &scene.background);

        if let Err(err) = self.renderer.render(&scene) {
            match err {
                wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => {
                    let size = self.renderer.window().inner_size();
                    self.renderer.resize(size);
                }
                wgpu::SurfaceError::OutOfMemory => {
                    return Err(anyhow!("GPU is out of memory"));
                }
                wgpu::SurfaceError::Timeout => {
                    info!("Surface timeout; retrying next frame");
                }
                wgpu::SurfaceError::Other => {
                    info!("Surface error; retrying next frame");
                }
            }
        }
        Ok(())
    }

    fn aspect(&self) -> f32 {
        let size = self.renderer.window().inner_size();
        if size.height == 0 {
            1.0
        } else {
            size.width as f32 / size.height as f32
        }
    }
}

struct CliOptions {
    variant: String,
    summary_only: bool,
    list: bool,
}

impl CliOptions {
    fn parse() -> Result<Self> {
        let mut args = env::args().skip(1);
        let Some(first) = args.next() else {
            return Err(anyhow!(
                "Usage: vitrine <variant> [--summary-only] | vitrine --list"
            ));
        };
        if first == "--list" {
            return Ok(Self {
                variant: String::new(),
                summary_only: false,
                list: true,
            });
        }
        let mut summary_only = false;
        for arg in args {
            match arg.as_str() {
                "--summary-only" => summary_only = true,
                other => {
                    return Err(anyhow!(
                        "Unknown argument: {other}. Expected --summary-only"
                    ));
                }
            }
        }
        Ok(Self {
            variant: first,
            summary_only,
            list: false,
        })
    }
}
