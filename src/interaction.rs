//! Pointer-driven scene state: light following, parallax, rotation.
//!
//! Everything here is a plain state record updated by the host's event
//! handlers. There are no singletons and no smoothing; the browser/native
//! host owns the values and feeds them to the renderer each frame.

use glam::{Mat4, Vec2, Vec3};

/// One pointer observation, in whichever coordinate system produced it.
///
/// The two modes are independent (a 3D surface hit vs. a raw viewport
/// position) and make no promise of agreeing with each other even when they
/// originate from the same physical cursor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerSample {
    /// Intersection point on a scene surface, in world space.
    Surface { point: Vec3 },
    /// Raw client coordinates plus the container size at capture time.
    Viewport {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },
}

/// Wraps a surface intersection point as a sample.
pub fn surface_sample(point: Vec3) -> PointerSample {
    PointerSample::Surface { point }
}

/// Wraps raw viewport coordinates as a sample.
pub fn viewport_sample(x: f32, y: f32, width: f32, height: f32) -> PointerSample {
    PointerSample::Viewport {
        x,
        y,
        width,
        height,
    }
}

/// Unprojects a viewport position into a world-space ray.
///
/// Returns the ray origin and normalized direction, or None when the
/// view-projection matrix is singular or the viewport is degenerate.
pub fn screen_to_world_ray(
    view_proj: Mat4,
    x: f32,
    y: f32,
    width: f32,
    height: f32,
) -> Option<(Vec3, Vec3)> {
    if width <= 0.0 || height <= 0.0 {
        return None;
    }
    let inverse = view_proj.inverse();
    if !inverse.is_finite() {
        return None;
    }
    let ndc_x = (x / width) * 2.0 - 1.0;
    let ndc_y = 1.0 - (y / height) * 2.0;

    let near = inverse * glam::Vec4::new(ndc_x, ndc_y, 0.0, 1.0);
    let far = inverse * glam::Vec4::new(ndc_x, ndc_y, 1.0, 1.0);
    if near.w.abs() <= f32::EPSILON || far.w.abs() <= f32::EPSILON {
        return None;
    }
    let near = near.truncate() / near.w;
    let far = far.truncate() / far.w;
    let dir = far - near;
    if dir.length_squared() <= f32::EPSILON {
        return None;
    }
    Some((near, dir.normalize()))
}

/// Intersects a ray with the horizontal plane `y = plane_y`.
pub fn ray_plane_y(origin: Vec3, dir: Vec3, plane_y: f32) -> Option<Vec3> {
    if dir.y.abs() < 1e-6 {
        return None;
    }
    let t = (plane_y - origin.y) / dir.y;
    (t >= 0.0).then(|| origin + dir * t)
}

/// Keeps a spotlight under the pointer with its height pinned to a
/// per-variant constant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightFollower {
    position: Vec3,
    height: f32,
}

impl LightFollower {
    /// `initial` is the variant's resting position before any interaction.
    pub fn new(initial: Vec3, height: f32) -> Self {
        Self {
            position: initial,
            height,
        }
    }

    /// Snaps the two free axes to the sample's surface point. The height
    /// axis always stays at the configured constant; viewport samples are
    /// not for us and leave the state untouched.
    pub fn on_pointer_move(&mut self, sample: &PointerSample) {
        if let PointerSample::Surface { point } = sample {
            self.position = Vec3::new(point.x, self.height, point.z);
        }
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    /// Puts the light back at a resting position, keeping the height policy.
    pub fn reset(&mut self, initial: Vec3) {
        self.position = initial;
    }
}

/// Advances an orientation by a fixed angular rate. A rate of zero disables
/// the animation without special-casing the host loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationAnimator {
    angle: f32,
    rate: f32,
}

impl RotationAnimator {
    pub fn new(rate: f32) -> Self {
        Self { angle: 0.0, rate }
    }

    /// `elapsed_seconds` is the true delta since the previous tick, which
    /// keeps the motion frame-rate independent.
    pub fn on_tick(&mut self, elapsed_seconds: f32) {
        self.angle += elapsed_seconds * self.rate;
    }

    /// Raw accumulated angle in radians. Grows without bound while the
    /// animation runs; see `wrapped` for the periodic view.
    pub fn angle(&self) -> f32 {
        self.angle
    }

    /// The angle reduced to [0, 2π).
    pub fn wrapped(&self) -> f32 {
        self.angle.rem_euclid(std::f32::consts::TAU)
    }

    pub fn rate(&self) -> f32 {
        self.rate
    }
}

/// Maps the pointer's offset from the viewport center to a small inverted
/// translation for the overlay layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParallaxComputer {
    max_offset: f32,
    offset: Vec2,
}

impl ParallaxComputer {
    pub fn new(max_offset: f32) -> Self {
        Self {
            max_offset,
            offset: Vec2::ZERO,
        }
    }

    /// Replaces the offset wholesale. Any easing belongs to the consumer
    /// (the overlay applies a CSS transition); nothing accumulates here.
    /// Positions outside the viewport saturate at the edges, so the offset
    /// never exceeds `max_offset` on either axis.
    pub fn on_pointer_move(&mut self, client_x: f32, client_y: f32, width: f32, height: f32) {
        if width <= 0.0 || height <= 0.0 {
            return;
        }
        let nx = ((client_x / width - 0.5) * 2.0).clamp(-1.0, 1.0);
        let ny = ((client_y / height - 0.5) * 2.0).clamp(-1.0, 1.0);
        self.offset = Vec2::new(-nx * self.max_offset, -ny * self.max_offset);
    }

    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    pub fn max_offset(&self) -> f32 {
        self.max_offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn follower_copies_free_axes_and_pins_height() {
        let mut follower = LightFollower::new(Vec3::new(0.0, 0.5, 0.0), 1.5);
        follower.on_pointer_move(&surface_sample(Vec3::new(3.2, 0.0, -1.7)));
        assert_eq!(follower.position(), Vec3::new(3.2, 1.5, -1.7));

        // Repeated identical samples change nothing further.
        follower.on_pointer_move(&surface_sample(Vec3::new(3.2, 0.0, -1.7)));
        assert_eq!(follower.position(), Vec3::new(3.2, 1.5, -1.7));
    }

    #[test]
    fn follower_default_state_is_the_initial_constant() {
        let initial = Vec3::new(0.0, 0.5, 0.0);
        let follower = LightFollower::new(initial, 1.5);
        assert_eq!(follower.position(), initial);
    }

    #[test]
    fn follower_ignores_viewport_samples() {
        let mut follower = LightFollower::new(Vec3::new(1.0, 1.5, 1.0), 1.5);
        follower.on_pointer_move(&viewport_sample(10.0, 20.0, 800.0, 600.0));
        assert_eq!(follower.position(), Vec3::new(1.0, 1.5, 1.0));
    }

    #[test]
    fn rotation_is_frame_rate_independent() {
        let mut many = RotationAnimator::new(0.4);
        let mut one = RotationAnimator::new(0.4);
        for _ in 0..10 {
            many.on_tick(0.016);
        }
        one.on_tick(0.16);
        assert!((many.angle() - one.angle()).abs() < 1e-4);
    }

    #[test]
    fn zero_rate_never_moves() {
        let mut animator = RotationAnimator::new(0.0);
        animator.on_tick(100.0);
        assert_eq!(animator.angle(), 0.0);
    }

    #[test]
    fn wrapped_angle_stays_in_one_turn() {
        let mut animator = RotationAnimator::new(1.0);
        animator.on_tick(100.0);
        assert!(animator.angle() > std::f32::consts::TAU);
        let wrapped = animator.wrapped();
        assert!((0.0..std::f32::consts::TAU).contains(&wrapped));
    }

    #[test]
    fn parallax_center_is_zero() {
        let mut parallax = ParallaxComputer::new(20.0);
        parallax.on_pointer_move(500.0, 400.0, 1000.0, 800.0);
        assert_eq!(parallax.offset(), Vec2::ZERO);
    }

    #[test]
    fn parallax_top_left_corner_is_positive_max() {
        let mut parallax = ParallaxComputer::new(20.0);
        parallax.on_pointer_move(0.0, 0.0, 1000.0, 800.0);
        assert_eq!(parallax.offset(), Vec2::new(20.0, 20.0));
    }

    #[test]
    fn parallax_is_bounded_everywhere() {
        let mut parallax = ParallaxComputer::new(20.0);
        for &(x, y) in &[
            (0.0, 0.0),
            (1000.0, 800.0),
            (1000.0, 0.0),
            (0.0, 800.0),
            (733.0, 41.0),
            (2000.0, 400.0),
            (-100.0, 900.0),
        ] {
            parallax.on_pointer_move(x, y, 1000.0, 800.0);
            assert!(parallax.offset().x.abs() <= 20.0);
            assert!(parallax.offset().y.abs() <= 20.0);
        }
    }

    #[test]
    fn parallax_saturates_outside_the_viewport() {
        // Pointer capture and event retargeting can hand the handler
        // client coordinates past the container edges.
        let mut parallax = ParallaxComputer::new(20.0);
        parallax.on_pointer_move(2000.0, 400.0, 1000.0, 800.0);
        assert_eq!(parallax.offset(), Vec2::new(-20.0, 0.0));
        parallax.on_pointer_move(-50.0, 900.0, 1000.0, 800.0);
        assert_eq!(parallax.offset(), Vec2::new(20.0, -20.0));
    }

    #[test]
    fn parallax_replaces_rather_than_accumulates() {
        let mut parallax = ParallaxComputer::new(20.0);
        parallax.on_pointer_move(0.0, 0.0, 1000.0, 800.0);
        parallax.on_pointer_move(500.0, 400.0, 1000.0, 800.0);
        assert_eq!(parallax.offset(), Vec2::ZERO);
    }

    #[test]
    fn parallax_ignores_degenerate_viewports() {
        let mut parallax = ParallaxComputer::new(20.0);
        parallax.on_pointer_move(0.0, 0.0, 1000.0, 800.0);
        let before = parallax.offset();
        parallax.on_pointer_move(10.0, 10.0, 0.0, 800.0);
        assert_eq!(parallax.offset(), before);
    }

    #[test]
    fn ground_ray_round_trips_through_the_camera() {
        let camera = crate::scene::Camera::perspective(
            Vec3::new(4.0, 3.5, -3.0),
            Vec3::new(0.0, -0.5, 0.0),
            31.0,
        );
        let view_proj = camera.view_proj(1280.0 / 720.0);
        // Center of the viewport should hit the ground plane near where the
        // camera is looking.
        let (origin, dir) =
            screen_to_world_ray(view_proj, 640.0, 360.0, 1280.0, 720.0).expect("ray");
        let hit = ray_plane_y(origin, dir, 0.0).expect("ground hit");
        assert!(hit.x.abs() < 2.0 && hit.z.abs() < 2.0, "{hit:?}");
    }

    #[test]
    fn ray_misses_a_plane_behind_the_origin() {
        let origin = Vec3::new(0.0, 1.0, 0.0);
        assert!(ray_plane_y(origin, Vec3::Y, 0.0).is_none());
        assert!(ray_plane_y(origin, Vec3::X, 0.0).is_none());
        assert!(ray_plane_y(origin, Vec3::NEG_Y, 0.0).is_some());
    }
}
