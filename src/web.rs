//! Browser host. Wires pointer and keyboard events to the stage, keeps the
//! overlay element drifting with the parallax offset and drives the canvas
//! renderer from a requestAnimationFrame loop.

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec3;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{HtmlCanvasElement, HtmlElement, KeyboardEvent, PointerEvent};

use crate::app::{
    self, advance_frame, camera_params, control_panel, light_params, overlay_from_scene,
    pointer_on_stage, OverlayState,
};
use crate::data_model::StageModel;
use crate::interaction::{
    ray_plane_y, screen_to_world_ray, surface_sample, LightFollower, ParallaxComputer,
    RotationAnimator,
};
use crate::panel::ClipboardSink;
use crate::render::Renderer;
use crate::variants;

/// Clipboard sink backed by the async browser clipboard. The write is fire
/// and forget; the promise outcome is not awaited.
struct WebClipboard;

impl ClipboardSink for WebClipboard {
    fn write_text(&mut self, text: &str) -> anyhow::Result<()> {
        let window = web_sys::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
        let _ = window.navigator().clipboard().write_text(text);
        Ok(())
    }
}

fn js_err(message: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&message.to_string())
}

/// Mounts a scene variant onto the given canvas. `overlay_id` may name a DOM
/// element that receives the parallax translation; pass an empty string to
/// skip overlay handling.
#[wasm_bindgen]
pub fn run(canvas_id: &str, overlay_id: &str, variant: &str) -> Result<(), JsValue> {
    console_error_panic_hook::set_once();

    let scene = variants::by_name(variant)
        .ok_or_else(|| js_err(format!("unknown variant '{variant}', try one of {:?}", variants::names())))?;

    let window = web_sys::window().ok_or_else(|| js_err("no window"))?;
    let document = window.document().ok_or_else(|| js_err("no document"))?;
    let canvas: HtmlCanvasElement = document
        .get_element_by_id(canvas_id)
        .ok_or_else(|| js_err(format!("no element with id '{canvas_id}'")))?
        .dyn_into()
        .map_err(|_| js_err(format!("'{canvas_id}' is not a canvas")))?;
    let overlay: Option<HtmlElement> = if overlay_id.is_empty() {
        None
    } else {
        Some(
            document
                .get_element_by_id(overlay_id)
                .ok_or_else(|| js_err(format!("no element with id '{overlay_id}'")))?
                .dyn_into()
                .map_err(|_| js_err(format!("'{overlay_id}' is not an html element")))?,
        )
    };

    let interaction = scene.interaction.clone();
    let follower = Rc::new(RefCell::new(LightFollower::new(
        interaction.initial_light_position,
        interaction.light_height,
    )));
    let animator = Rc::new(RefCell::new(RotationAnimator::new(
        interaction.rotation_rate,
    )));
    let parallax = Rc::new(RefCell::new(ParallaxComputer::new(
        interaction.parallax_max,
    )));

    if let Some(element) = &overlay {
        mount_overlay(
            &document,
            element,
            &overlay_from_scene(&scene, &parallax.borrow()),
        )?;
    }
    let model = StageModel::new(scene);
    let renderer = Rc::new(RefCell::new(
        Renderer::new(canvas.clone()).map_err(js_err)?,
    ));

    attach_pointer_handler(
        &canvas,
        overlay,
        model.clone(),
        Rc::clone(&follower),
        Rc::clone(&parallax),
    )?;
    attach_key_handler(&document, model.clone())?;
    start_frame_loop(&window, canvas, model, animator, renderer)?;

    Ok(())
}

/// Fills the overlay element with the variant's headline columns and CTA
/// and applies the current parallax translation. The element's existing
/// content is replaced; styling stays with the page.
fn mount_overlay(
    document: &web_sys::Document,
    element: &HtmlElement,
    state: &OverlayState,
) -> Result<(), JsValue> {
    element.set_text_content(None);
    for (class, words) in [
        ("overlay-left", &state.left_words),
        ("overlay-right", &state.right_words),
    ] {
        let column = document.create_element("div")?;
        column.set_class_name(class);
        for word in words {
            let line = document.create_element("div")?;
            line.set_text_content(Some(word));
            column.append_child(&line)?;
        }
        element.append_child(&column)?;
    }
    let cta = document.create_element("div")?;
    cta.set_class_name("overlay-cta");
    cta.set_text_content(Some(&state.cta));
    element.append_child(&cta)?;
    let _ = element.style().set_property(
        "transform",
        &format!(
            "translate({:.1}px, {:.1}px)",
            state.parallax.x, state.parallax.y
        ),
    );
    Ok(())
}

fn attach_pointer_handler(
    canvas: &HtmlCanvasElement,
    overlay: Option<HtmlElement>,
    model: StageModel,
    follower: Rc<RefCell<LightFollower>>,
    parallax: Rc<RefCell<ParallaxComputer>>,
) -> Result<(), JsValue> {
    let target = canvas.clone();
    let handler = Closure::<dyn FnMut(PointerEvent)>::new(move |event: PointerEvent| {
        let rect = target.get_bounding_client_rect();
        let x = event.client_x() as f32 - rect.left() as f32;
        let y = event.client_y() as f32 - rect.top() as f32;
        let width = rect.width() as f32;
        let height = rect.height() as f32;
        if width <= 0.0 || height <= 0.0 {
            return;
        }

        // Overlay drift comes straight from the normalized pointer.
        let offset = {
            let mut parallax = parallax.borrow_mut();
            parallax.on_pointer_move(x, y, width, height);
            parallax.offset()
        };
        if let Some(element) = &overlay {
            let _ = element.style().set_property(
                "transform",
                &format!("translate({:.1}px, {:.1}px)", offset.x, offset.y),
            );
        }

        // The follow light needs the pointer unprojected onto the ground.
        let camera = model.snapshot().camera;
        let view_proj = camera.view_proj(width / height);
        if let Some((origin, direction)) = screen_to_world_ray(view_proj, x, y, width, height) {
            if let Some(point) = ray_plane_y(origin, direction, 0.0) {
                let mut follower = follower.borrow_mut();
                pointer_on_stage(&model, &mut follower, &surface_sample(point));
            }
        }
    });
    canvas.add_event_listener_with_callback("pointermove", handler.as_ref().unchecked_ref())?;
    handler.forget();
    Ok(())
}

/// `c` copies the camera group, `g` the glass group, `m` the ground group.
fn attach_key_handler(document: &web_sys::Document, model: StageModel) -> Result<(), JsValue> {
    let handler = Closure::<dyn FnMut(KeyboardEvent)>::new(move |event: KeyboardEvent| {
        let group_name = match event.key().as_str() {
            "c" => app::CAMERA_GROUP,
            "g" => app::GLASS_GROUP,
            "m" => app::GROUND_GROUP,
            _ => return,
        };
        let scene = model.snapshot();
        let panel = control_panel(&scene);
        if let Some(group) = panel.group(group_name) {
            if let Err(error) = group.run_export(&mut WebClipboard) {
                web_sys::console::warn_1(&JsValue::from_str(&format!(
                    "export for '{group_name}' failed: {error}"
                )));
            }
        }
    });
    document.add_event_listener_with_callback("keydown", handler.as_ref().unchecked_ref())?;
    handler.forget();
    Ok(())
}

fn start_frame_loop(
    window: &web_sys::Window,
    canvas: HtmlCanvasElement,
    model: StageModel,
    animator: Rc<RefCell<RotationAnimator>>,
    renderer: Rc<RefCell<Renderer>>,
) -> Result<(), JsValue> {
    let handle: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
    let handle_for_tick = Rc::clone(&handle);
    let window_for_tick = window.clone();
    let last_time = Rc::new(RefCell::new(None::<f64>));

    let tick = Closure::<dyn FnMut(f64)>::new(move |now_ms: f64| {
        let elapsed = {
            let mut last = last_time.borrow_mut();
            let elapsed = match *last {
                Some(previous) => ((now_ms - previous) / 1000.0) as f32,
                None => 0.0,
            };
            *last = Some(now_ms);
            elapsed
        };

        advance_frame(&model, &mut animator.borrow_mut(), elapsed);

        let scene = model.snapshot();
        let aspect = canvas.width().max(1) as f32 / canvas.height().max(1) as f32;
        let camera = camera_params(&scene.camera, aspect);
        let lights = light_params(&scene);
        let ambient = scene
            .ambient
            .map(|light| light.color * light.intensity * 0.2)
            .unwrap_or(Vec3::ZERO);

        {
            let mut renderer = renderer.borrow_mut();
            renderer.update_globals(&camera, &lights, ambient, &scene.background);
            if let Err(error) = renderer.render(&scene) {
                web_sys::console::error_1(&JsValue::from_str(&format!("draw failed: {error}")));
                return;
            }
        }

        if let Some(closure) = handle_for_tick.borrow().as_ref() {
            let _ = window_for_tick
                .request_animation_frame(closure.as_ref().unchecked_ref());
        }
    });

    *handle.borrow_mut() = Some(tick);
    if let Some(closure) = handle.borrow().as_ref() {
        window.request_animation_frame(closure.as_ref().unchecked_ref())?;
    }
    Ok(())
}
