//! Camera system: view/projection matrices and the orbit controller.

use glam::{Mat3, Mat4, Quat, Vec3};

/// A camera that generates view and projection matrices for rendering.
#[derive(Debug, Clone)]
pub struct Camera {
    /// Position in world space.
    pub position: Vec3,
    /// Rotation as a unit quaternion.
    pub rotation: Quat,
    /// Projection parameters.
    pub projection: Projection,
    /// Near clip plane distance (always positive).
    pub near: f32,
    /// Far clip plane distance (always positive, > near).
    pub far: f32,
}

/// Projection type for the camera.
#[derive(Debug, Clone)]
pub enum Projection {
    /// Perspective projection for the main view.
    Perspective {
        /// Vertical field of view in radians.
        fov_y: f32,
        /// Width / height.
        aspect_ratio: f32,
    },
    /// Orthographic projection (light-space shadow camera).
    Orthographic {
        /// Half-width of the view volume in world units.
        half_width: f32,
        /// Half-height of the view volume in world units.
        half_height: f32,
    },
}

impl Camera {
    /// Compute the view matrix (inverse of camera transform).
    pub fn view_matrix(&self) -> Mat4 {
        let rotation_matrix = Mat4::from_quat(self.rotation);
        let translation_matrix = Mat4::from_translation(self.position);
        (translation_matrix * rotation_matrix).inverse()
    }

    /// Compute the projection matrix with reverse-Z.
    pub fn projection_matrix(&self) -> Mat4 {
        match &self.projection {
            Projection::Perspective {
                fov_y,
                aspect_ratio,
            } => {
                // Reverse-Z: near plane maps to z=1, far plane maps to z=0.
                // This is handled by swapping near/far in the projection matrix.
                Mat4::perspective_rh(
                    *fov_y,
                    *aspect_ratio,
                    self.far,  // swapped: far as "near" parameter
                    self.near, // swapped: near as "far" parameter
                )
            }
            Projection::Orthographic {
                half_width,
                half_height,
            } => Mat4::orthographic_rh(
                -*half_width,
                *half_width,
                -*half_height,
                *half_height,
                self.far,  // swapped
                self.near, // swapped
            ),
        }
    }

    /// Compute the combined view-projection matrix.
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// The forward direction vector (-Z in camera space).
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::NEG_Z
    }

    /// The up direction vector (+Y in camera space).
    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    /// Update the aspect ratio for perspective projection.
    pub fn set_aspect_ratio(&mut self, width: f32, height: f32) {
        if let Projection::Perspective { aspect_ratio, .. } = &mut self.projection {
            *aspect_ratio = width / height.max(1.0);
        }
    }

    /// Point the camera at `target` with +Y as up.
    pub fn look_at(&mut self, target: Vec3) {
        let back = (self.position - target).normalize_or_zero();
        if back.length_squared() < 1e-12 {
            return;
        }
        let right = Vec3::Y.cross(back).normalize_or_zero();
        if right.length_squared() < 1e-12 {
            // Looking straight up or down; fall back to world X.
            self.rotation = Quat::from_mat3(&Mat3::from_cols(Vec3::X, back.cross(Vec3::X), back));
            return;
        }
        let up = back.cross(right);
        self.rotation = Quat::from_mat3(&Mat3::from_cols(right, up, back));
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 150.0),
            rotation: Quat::IDENTITY,
            projection: Projection::Perspective {
                fov_y: 63.0_f32.to_radians(),
                aspect_ratio: 16.0 / 9.0,
            },
            near: 1.0,
            far: 8000.0,
        }
    }
}

/// Orbit controller: spherical coordinates around a fixed target with
/// optional slow auto-rotation and damped pointer input.
#[derive(Debug, Clone)]
pub struct OrbitController {
    /// The point the camera orbits and looks at.
    pub target: Vec3,
    /// Distance from the target.
    pub radius: f32,
    /// Azimuth angle in radians.
    pub yaw: f32,
    /// Elevation angle in radians, clamped short of the poles.
    pub pitch: f32,
    /// Slowly rotate around the target when no input is active.
    pub auto_rotate: bool,
    /// Auto-rotation speed; 2.0 corresponds to one orbit per 60 seconds.
    pub auto_rotate_speed: f32,
    /// Smooth pointer input over several frames.
    pub enable_damping: bool,
    /// Fraction of remaining velocity kept per frame when damping.
    pub damping_factor: f32,
    yaw_velocity: f32,
    pitch_velocity: f32,
}

impl OrbitController {
    const MIN_RADIUS: f32 = 60.0;
    const MAX_RADIUS: f32 = 4000.0;
    const PITCH_LIMIT: f32 = std::f32::consts::FRAC_PI_2 - 0.01;

    /// Create a controller at the given distance from the origin.
    pub fn new(radius: f32) -> Self {
        Self {
            target: Vec3::ZERO,
            radius,
            yaw: 0.0,
            pitch: 0.0,
            auto_rotate: true,
            auto_rotate_speed: 0.07,
            enable_damping: true,
            damping_factor: 0.05,
            yaw_velocity: 0.0,
            pitch_velocity: 0.0,
        }
    }

    /// Feed a pointer drag delta in radians.
    pub fn rotate(&mut self, delta_yaw: f32, delta_pitch: f32) {
        if self.enable_damping {
            self.yaw_velocity += delta_yaw;
            self.pitch_velocity += delta_pitch;
        } else {
            self.yaw += delta_yaw;
            self.pitch = (self.pitch + delta_pitch).clamp(-Self::PITCH_LIMIT, Self::PITCH_LIMIT);
        }
    }

    /// Zoom by a scroll delta; positive moves the camera closer.
    pub fn zoom(&mut self, delta: f32) {
        self.radius = (self.radius * (1.0 - delta * 0.1)).clamp(Self::MIN_RADIUS, Self::MAX_RADIUS);
    }

    /// Advance the controller and write the resulting transform into `camera`.
    pub fn update(&mut self, dt: f32, camera: &mut Camera) {
        if self.auto_rotate {
            // Speed 2.0 is one full orbit per minute.
            self.yaw += dt * std::f32::consts::TAU / 60.0 * self.auto_rotate_speed / 2.0;
        }

        if self.enable_damping {
            self.yaw += self.yaw_velocity;
            self.pitch = (self.pitch + self.pitch_velocity)
                .clamp(-Self::PITCH_LIMIT, Self::PITCH_LIMIT);
            self.yaw_velocity *= 1.0 - self.damping_factor;
            self.pitch_velocity *= 1.0 - self.damping_factor;
        }

        camera.position = self.position();
        camera.look_at(self.target);
    }

    /// The camera position implied by the current spherical coordinates.
    pub fn position(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        self.target
            + Vec3::new(
                self.radius * cos_pitch * sin_yaw,
                self.radius * sin_pitch,
                self.radius * cos_pitch * cos_yaw,
            )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::TAU;

    #[test]
    fn test_default_camera_matches_scene_setup() {
        let camera = Camera::default();
        assert_eq!(camera.position, Vec3::new(0.0, 0.0, 150.0));
        assert_eq!(camera.near, 1.0);
        assert_eq!(camera.far, 8000.0);
        if let Projection::Perspective { fov_y, .. } = camera.projection {
            assert!((fov_y - 63.0_f32.to_radians()).abs() < 1e-6);
        } else {
            panic!("expected perspective projection");
        }
    }

    #[test]
    fn test_identity_camera_looks_down_neg_z() {
        let camera = Camera::default();
        let forward = camera.forward();
        assert!(forward.x.abs() < 1e-6);
        assert!(forward.y.abs() < 1e-6);
        assert!((forward.z + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_set_aspect_ratio_updates_perspective() {
        let mut camera = Camera::default();
        camera.set_aspect_ratio(1920.0, 1080.0);
        if let Projection::Perspective { aspect_ratio, .. } = camera.projection {
            assert!((aspect_ratio - 16.0 / 9.0).abs() < 1e-6);
        } else {
            panic!("expected perspective projection");
        }
    }

    #[test]
    fn test_look_at_points_forward_at_target() {
        let mut camera = Camera::default();
        camera.position = Vec3::new(100.0, 50.0, 100.0);
        camera.look_at(Vec3::ZERO);

        let expected = (Vec3::ZERO - camera.position).normalize();
        let forward = camera.forward();
        assert!(
            (forward - expected).length() < 1e-4,
            "forward {forward:?} should point at the origin, expected {expected:?}"
        );
    }

    #[test]
    fn test_view_matrix_inverse_is_camera_transform() {
        let mut camera = Camera::default();
        camera.position = Vec3::new(10.0, 20.0, 30.0);
        camera.look_at(Vec3::ZERO);

        let inv_view = camera.view_matrix().inverse();
        let reconstructed_pos = inv_view.col(3).truncate();
        assert!((reconstructed_pos - camera.position).length() < 1e-3);
    }

    #[test]
    fn test_orbit_position_stays_at_radius() {
        let mut controller = OrbitController::new(150.0);
        controller.yaw = 1.3;
        controller.pitch = 0.7;
        let pos = controller.position();
        assert!((pos.length() - 150.0).abs() < 1e-3);
    }

    #[test]
    fn test_auto_rotate_advances_yaw() {
        let mut controller = OrbitController::new(150.0);
        controller.auto_rotate = true;
        controller.auto_rotate_speed = 2.0;
        let mut camera = Camera::default();

        // Speed 2.0 should complete one full orbit in 60 seconds.
        controller.update(60.0, &mut camera);
        assert!((controller.yaw - TAU).abs() < 1e-3);
    }

    #[test]
    fn test_auto_rotate_off_keeps_yaw() {
        let mut controller = OrbitController::new(150.0);
        controller.auto_rotate = false;
        let mut camera = Camera::default();
        controller.update(1.0, &mut camera);
        assert_eq!(controller.yaw, 0.0);
    }

    #[test]
    fn test_pitch_clamped_short_of_poles() {
        let mut controller = OrbitController::new(150.0);
        controller.enable_damping = false;
        controller.rotate(0.0, 10.0);
        assert!(controller.pitch < std::f32::consts::FRAC_PI_2);
        controller.rotate(0.0, -20.0);
        assert!(controller.pitch > -std::f32::consts::FRAC_PI_2);
    }

    #[test]
    fn test_damping_decays_input_velocity() {
        let mut controller = OrbitController::new(150.0);
        controller.auto_rotate = false;
        controller.enable_damping = true;
        controller.rotate(0.1, 0.0);

        let mut camera = Camera::default();
        controller.update(0.016, &mut camera);
        let yaw_after_first = controller.yaw;
        controller.update(0.016, &mut camera);
        let second_step = controller.yaw - yaw_after_first;

        assert!(second_step > 0.0, "damped input should carry over");
        assert!(
            second_step < yaw_after_first,
            "velocity should decay between frames"
        );
    }

    #[test]
    fn test_zoom_clamps_radius() {
        let mut controller = OrbitController::new(150.0);
        for _ in 0..200 {
            controller.zoom(1.0);
        }
        assert!(controller.radius >= 60.0);
        for _ in 0..200 {
            controller.zoom(-1.0);
        }
        assert!(controller.radius <= 4000.0);
    }

    #[test]
    fn test_camera_tracks_controller_after_update() {
        let mut controller = OrbitController::new(150.0);
        controller.auto_rotate = false;
        controller.yaw = 0.5;
        let mut camera = Camera::default();
        controller.update(0.016, &mut camera);

        assert!((camera.position - controller.position()).length() < 1e-5);
        let to_target = (controller.target - camera.position).normalize();
        assert!((camera.forward() - to_target).length() < 1e-4);
    }
}
