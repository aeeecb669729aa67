//! Damped orbit controls around a fixed target.
//!
//! Pointer drags and auto-rotation accumulate into a spherical delta that is
//! bled into the camera a fraction at a time, so motion eases in and out
//! instead of snapping:
//! - drag rotates azimuth/polar angle, scaled by the surface height
//! - wheel dollies toward/away from the target within distance limits
//! - auto-rotation turns the azimuth slowly while no drag is active

use foundation::math::Vec3;
use serde::Deserialize;

/// Polar angle margin keeping the camera off the exact poles.
const POLAR_EPS: f64 = 1e-6;

#[derive(Debug, Copy, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct OrbitConfig {
    pub enable_damping: bool,
    /// Fraction of the pending rotation applied per frame.
    pub damping_factor: f64,
    pub auto_rotate: bool,
    /// 1.0 is one revolution per minute at 60 fps.
    pub auto_rotate_speed: f64,
    pub rotate_speed: f64,
    pub zoom_speed: f64,
    pub min_distance: f64,
    pub max_distance: f64,
}

impl Default for OrbitConfig {
    fn default() -> Self {
        Self {
            enable_damping: true,
            damping_factor: 0.05,
            auto_rotate: true,
            auto_rotate_speed: 0.3,
            rotate_speed: 1.0,
            zoom_speed: 1.0,
            min_distance: 6.0,
            max_distance: 500.0,
        }
    }
}

/// Pointer input in surface pixels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum ControlInput {
    PointerDown { x: f64, y: f64 },
    PointerMove { x: f64, y: f64 },
    PointerUp,
    Wheel { delta_y: f64 },
}

#[derive(Debug, Copy, Clone, Default, PartialEq)]
struct Spherical {
    radius: f64,
    /// Azimuth around +Y, measured from +Z toward +X.
    theta: f64,
    /// Polar angle from +Y.
    phi: f64,
}

impl Spherical {
    fn from_offset(v: Vec3) -> Self {
        let radius = v.length();
        if radius <= 0.0 {
            return Self::default();
        }
        Self {
            radius,
            theta: v.x.atan2(v.z),
            phi: (v.y / radius).clamp(-1.0, 1.0).acos(),
        }
    }

    fn to_offset(self) -> Vec3 {
        let (sin_phi, cos_phi) = self.phi.sin_cos();
        let (sin_theta, cos_theta) = self.theta.sin_cos();
        Vec3::new(
            self.radius * sin_phi * sin_theta,
            self.radius * cos_phi,
            self.radius * sin_phi * cos_theta,
        )
    }
}

#[derive(Debug, Clone)]
pub struct OrbitControls {
    config: OrbitConfig,
    target: Vec3,
    spherical: Spherical,
    /// Pending rotation not yet applied to `spherical` (radius unused).
    delta: Spherical,
    /// Pending dolly factor for the next update.
    scale: f64,
    dragging: bool,
    last_pos_px: [f64; 2],
    viewport_height: f64,
}

impl OrbitControls {
    pub fn new(config: OrbitConfig, position: Vec3, target: Vec3) -> Self {
        let mut spherical = Spherical::from_offset(position - target);
        spherical.radius = spherical.radius.clamp(config.min_distance, config.max_distance);
        Self {
            config,
            target,
            spherical,
            delta: Spherical::default(),
            scale: 1.0,
            dragging: false,
            last_pos_px: [0.0, 0.0],
            viewport_height: 1.0,
        }
    }

    pub fn config(&self) -> &OrbitConfig {
        &self.config
    }

    /// Rotate speed is relative to the surface height.
    pub fn set_viewport(&mut self, _width: u32, height: u32) {
        self.viewport_height = f64::from(height.max(1));
    }

    pub fn handle_input(&mut self, input: ControlInput) {
        match input {
            ControlInput::PointerDown { x, y } => {
                self.dragging = true;
                self.last_pos_px = [x, y];
            }
            ControlInput::PointerMove { x, y } => {
                if !self.dragging {
                    return;
                }
                let dx = x - self.last_pos_px[0];
                let dy = y - self.last_pos_px[1];
                self.last_pos_px = [x, y];

                let per_px = std::f64::consts::TAU / self.viewport_height * self.config.rotate_speed;
                self.rotate_left(dx * per_px);
                self.rotate_up(dy * per_px);
            }
            ControlInput::PointerUp => {
                self.dragging = false;
            }
            ControlInput::Wheel { delta_y } => {
                let zoom = self.zoom_scale();
                if delta_y < 0.0 {
                    self.scale *= zoom;
                } else if delta_y > 0.0 {
                    self.scale /= zoom;
                }
            }
        }
    }

    /// Advance one frame: apply auto-rotation, damping and dolly.
    /// Returns the new camera position.
    pub fn update(&mut self) -> Vec3 {
        if self.config.auto_rotate && !self.dragging {
            self.rotate_left(self.auto_rotation_angle());
        }

        let step = if self.config.enable_damping {
            self.config.damping_factor.clamp(0.0, 1.0)
        } else {
            1.0
        };
        self.spherical.theta += self.delta.theta * step;
        self.spherical.phi += self.delta.phi * step;
        self.spherical.phi = self
            .spherical
            .phi
            .clamp(POLAR_EPS, std::f64::consts::PI - POLAR_EPS);
        self.spherical.theta %= std::f64::consts::TAU;

        self.spherical.radius = (self.spherical.radius * self.scale)
            .clamp(self.config.min_distance, self.config.max_distance);
        self.scale = 1.0;

        let decay = 1.0 - step;
        self.delta.theta *= decay;
        self.delta.phi *= decay;

        self.position()
    }

    pub fn position(&self) -> Vec3 {
        self.target + self.spherical.to_offset()
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    pub fn distance(&self) -> f64 {
        self.spherical.radius
    }

    fn auto_rotation_angle(&self) -> f64 {
        std::f64::consts::TAU / 60.0 / 60.0 * self.config.auto_rotate_speed
    }

    fn zoom_scale(&self) -> f64 {
        0.95f64.powf(self.config.zoom_speed)
    }

    fn rotate_left(&mut self, angle: f64) {
        self.delta.theta -= angle;
    }

    fn rotate_up(&mut self, angle: f64) {
        self.delta.phi -= angle;
    }
}

#[cfg(test)]
mod tests {
    use super::{ControlInput, OrbitConfig, OrbitControls};
    use foundation::math::Vec3;

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    fn still() -> OrbitConfig {
        OrbitConfig {
            auto_rotate: false,
            ..OrbitConfig::default()
        }
    }

    fn start() -> Vec3 {
        Vec3::new(-10.0, 5.0, 15.0)
    }

    #[test]
    fn position_round_trips_without_motion() {
        let mut ctrl = OrbitControls::new(still(), start(), Vec3::ZERO);
        let p = ctrl.update();
        assert_close(p.x, -10.0, 1e-9);
        assert_close(p.y, 5.0, 1e-9);
        assert_close(p.z, 15.0, 1e-9);
    }

    #[test]
    fn auto_rotation_orbits_at_constant_distance() {
        let mut ctrl = OrbitControls::new(OrbitConfig::default(), start(), Vec3::ZERO);
        let before = ctrl.position();
        for _ in 0..120 {
            ctrl.update();
        }
        let after = ctrl.position();
        assert!((after - before).length() > 1e-3);
        assert_close(after.length(), before.length(), 1e-9);
        assert_close(after.y, before.y, 1e-9);
    }

    #[test]
    fn auto_rotation_pauses_while_dragging() {
        let mut ctrl = OrbitControls::new(
            OrbitConfig {
                enable_damping: false,
                ..OrbitConfig::default()
            },
            start(),
            Vec3::ZERO,
        );
        ctrl.handle_input(ControlInput::PointerDown { x: 10.0, y: 10.0 });
        let before = ctrl.position();
        ctrl.update();
        assert_eq!(ctrl.position(), before);
    }

    #[test]
    fn drag_motion_is_damped() {
        let mut ctrl = OrbitControls::new(still(), start(), Vec3::ZERO);
        ctrl.set_viewport(800, 600);
        ctrl.handle_input(ControlInput::PointerDown { x: 100.0, y: 100.0 });
        ctrl.handle_input(ControlInput::PointerMove { x: 160.0, y: 100.0 });
        ctrl.handle_input(ControlInput::PointerUp);

        let p0 = ctrl.position();
        let p1 = ctrl.update();
        let p2 = ctrl.update();
        let first = (p1 - p0).length();
        let second = (p2 - p1).length();
        assert!(first > 0.0);
        assert!(second < first, "second step {second} should be smaller than {first}");

        // The motion keeps easing out and eventually settles.
        let mut last = p2;
        for _ in 0..600 {
            last = ctrl.update();
        }
        let settled = (ctrl.update() - last).length();
        assert!(settled < 1e-9);
    }

    #[test]
    fn undamped_drag_applies_full_rotation_at_once() {
        let mut ctrl = OrbitControls::new(
            OrbitConfig {
                enable_damping: false,
                auto_rotate: false,
                ..OrbitConfig::default()
            },
            Vec3::new(0.0, 0.0, 10.0),
            Vec3::ZERO,
        );
        ctrl.set_viewport(400, 400);
        ctrl.handle_input(ControlInput::PointerDown { x: 0.0, y: 200.0 });
        // A quarter of the height is a quarter turn.
        ctrl.handle_input(ControlInput::PointerMove { x: 100.0, y: 200.0 });
        let p = ctrl.update();
        assert_close(p.x, -10.0, 1e-9);
        assert_close(p.z, 0.0, 1e-9);
        assert_eq!(ctrl.update(), p);
    }

    #[test]
    fn wheel_dolly_respects_distance_limits() {
        let mut ctrl = OrbitControls::new(still(), start(), Vec3::ZERO);
        let d0 = ctrl.distance();
        ctrl.handle_input(ControlInput::Wheel { delta_y: -100.0 });
        ctrl.update();
        assert_close(ctrl.distance(), d0 * 0.95, 1e-9);

        for _ in 0..500 {
            ctrl.handle_input(ControlInput::Wheel { delta_y: -1.0 });
            ctrl.update();
        }
        assert_eq!(ctrl.distance(), 6.0);

        for _ in 0..500 {
            ctrl.handle_input(ControlInput::Wheel { delta_y: 1.0 });
            ctrl.update();
        }
        assert_eq!(ctrl.distance(), 500.0);
    }

    #[test]
    fn polar_angle_never_crosses_the_poles() {
        let mut ctrl = OrbitControls::new(still(), start(), Vec3::ZERO);
        ctrl.set_viewport(100, 100);
        ctrl.handle_input(ControlInput::PointerDown { x: 0.0, y: 0.0 });
        ctrl.handle_input(ControlInput::PointerMove { x: 0.0, y: 1000.0 });
        for _ in 0..200 {
            ctrl.update();
        }
        let p = ctrl.position();
        assert!(p.y < ctrl.distance());
        assert!(p.y > 0.0);
    }

    #[test]
    fn move_without_press_is_ignored() {
        let mut ctrl = OrbitControls::new(still(), start(), Vec3::ZERO);
        ctrl.handle_input(ControlInput::PointerMove { x: 500.0, y: 500.0 });
        let p = ctrl.update();
        assert_close((p - start()).length(), 0.0, 1e-9);
    }
}
