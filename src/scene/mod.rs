mod game_object;
mod particle;

pub use game_object::{GameObject, ObjectTransform, ProjectedPoint, SpatialAudio, UiText, FACES};
pub use particle::{GravityRule, Particle};

use crate::math::{Mat4, Plane, Vec3};

/// How [`Camera::frustum_planes`] derives its six planes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FrustumMode {
    /// Normalises the strided triple [`Mat4::row`] of `projection * view` for
    /// indices `0..6` and leaves every plane distance at zero. All six planes
    /// therefore pass through the world origin.
    #[default]
    Literal,
    /// Gribb-Hartmann extraction (row 3 plus or minus rows 0..3, distance
    /// term included) from a column-vector perspective matrix.
    Extracted,
}

/// Intrinsic camera parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraSettings {
    /// Vertical field of view in radians (default: 45 degrees)
    pub fov_y: f32,
    /// Width over height (default: taken from the canvas, else 1.0)
    pub aspect_ratio: f32,
    /// Near clipping distance (default: 0.1)
    pub near: f32,
    /// Far clipping distance (default: 1000.0)
    pub far: f32,
    /// Pixels per unit of perspective-divided coordinate, used when
    /// projecting particles (default: 400.0)
    pub scale: f32,
    pub frustum_mode: FrustumMode,
}

impl CameraSettings {
    #[must_use]
    pub fn for_canvas(canvas_width: f32, canvas_height: f32) -> Self {
        let aspect_ratio = if canvas_height > 0.0 {
            canvas_width / canvas_height
        } else {
            1.0
        };
        Self {
            aspect_ratio,
            ..Self::default()
        }
    }
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            fov_y: std::f32::consts::FRAC_PI_4,
            aspect_ratio: 1.0,
            near: 0.1,
            far: 1000.0,
            scale: 400.0,
            frustum_mode: FrustumMode::Literal,
        }
    }
}

pub struct Camera {
    pub canvas_width: f32,
    pub canvas_height: f32,
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub settings: CameraSettings,
}

impl Camera {
    /// Camera at `position` looking at the origin with +Y up.
    #[must_use]
    pub fn new(canvas_width: f32, canvas_height: f32, position: Vec3) -> Self {
        Self::with_settings(
            canvas_width,
            canvas_height,
            position,
            CameraSettings::for_canvas(canvas_width, canvas_height),
        )
    }

    #[must_use]
    pub fn with_settings(
        canvas_width: f32,
        canvas_height: f32,
        position: Vec3,
        settings: CameraSettings,
    ) -> Self {
        Self {
            canvas_width,
            canvas_height,
            position,
            target: Vec3::zero(),
            up: Vec3::new(0.0, 1.0, 0.0),
            settings,
        }
    }

    #[must_use]
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at(&self.position, &self.target, &self.up)
    }

    #[must_use]
    pub fn projection_matrix(&self) -> Mat4 {
        let s = &self.settings;
        Mat4::perspective(s.fov_y, s.aspect_ratio, s.near, s.far)
    }

    #[must_use]
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix().multiply(&self.view_matrix())
    }

    /// The six culling planes, in the order left, right, bottom, top, near,
    /// far for [`FrustumMode::Extracted`]. Literal planes follow the row
    /// index instead.
    #[must_use]
    pub fn frustum_planes(&self) -> [Plane; 6] {
        match self.settings.frustum_mode {
            FrustumMode::Literal => {
                let view_projection = self.view_projection_matrix();
                std::array::from_fn(|i| Plane::new(view_projection.row(i).normalize(), 0.0))
            }
            FrustumMode::Extracted => {
                let view_projection = self
                    .projection_matrix()
                    .transpose()
                    .multiply(&self.view_matrix());
                let r3 = view_projection.full_row(3);
                std::array::from_fn(|i| {
                    let r = view_projection.full_row(i / 2);
                    let sign = if i % 2 == 0 { 1.0 } else { -1.0 };
                    let normal = Vec3::new(
                        r3[0] + sign * r[0],
                        r3[1] + sign * r[1],
                        r3[2] + sign * r[2],
                    );
                    let length = normal.length();
                    Plane::new(normal.scale(1.0 / length), (r3[3] + sign * r[3]) / length)
                })
            }
        }
    }

    /// Moves the camera in its own plane without touching the target.
    pub fn pan(&mut self, dx: f32, dy: f32) {
        self.position.x += dx;
        self.position.y += dy;
    }

    pub fn set_canvas_size(&mut self, canvas_width: f32, canvas_height: f32) {
        self.canvas_width = canvas_width;
        self.canvas_height = canvas_height;
        if canvas_height > 0.0 {
            self.settings.aspect_ratio = canvas_width / canvas_height;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Aabb;

    fn camera(mode: FrustumMode) -> Camera {
        let settings = CameraSettings {
            frustum_mode: mode,
            ..CameraSettings::for_canvas(800.0, 600.0)
        };
        Camera::with_settings(800.0, 600.0, Vec3::new(0.0, 0.0, 10.0), settings)
    }

    #[test]
    fn test_camera_defaults() {
        let camera = Camera::new(800.0, 600.0, Vec3::new(0.0, 0.0, 10.0));
        assert_eq!(camera.target, Vec3::zero());
        assert_eq!(camera.up, Vec3::new(0.0, 1.0, 0.0));
        assert!((camera.settings.aspect_ratio - 800.0 / 600.0).abs() < 1e-6);
        assert_ne!(camera.view_matrix(), Mat4::identity());
        assert_ne!(camera.projection_matrix(), Mat4::identity());
    }

    #[test]
    fn test_literal_planes_are_normalized_rows_with_zero_distance() {
        let camera = camera(FrustumMode::Literal);
        let view_projection = camera.view_projection_matrix();
        for (i, plane) in camera.frustum_planes().iter().enumerate() {
            let expected = view_projection.row(i).normalize();
            assert_eq!(plane.distance, 0.0);
            assert!((plane.normal.x - expected.x).abs() < 1e-6);
            assert!((plane.normal.y - expected.y).abs() < 1e-6);
            assert!((plane.normal.z - expected.z).abs() < 1e-6);
        }
    }

    #[test]
    fn test_extracted_planes_contain_target_and_reject_far_objects() {
        let camera = camera(FrustumMode::Extracted);
        let planes = camera.frustum_planes();
        for plane in &planes {
            assert!((plane.normal.length() - 1.0).abs() < 1e-4);
        }

        let at_target = Aabb::from_center(Vec3::zero(), 2.0, 2.0, 2.0);
        let behind_camera = Aabb::from_center(Vec3::new(0.0, 0.0, 30.0), 2.0, 2.0, 2.0);
        let far_left = Aabb::from_center(Vec3::new(-500.0, 0.0, 0.0), 2.0, 2.0, 2.0);
        let beyond_far = Aabb::from_center(Vec3::new(0.0, 0.0, -2000.0), 2.0, 2.0, 2.0);

        assert!(at_target.intersects_frustum(&planes));
        assert!(!behind_camera.intersects_frustum(&planes));
        assert!(!far_left.intersects_frustum(&planes));
        assert!(!beyond_far.intersects_frustum(&planes));
    }

    #[test]
    fn test_pan_moves_position_only() {
        let mut camera = camera(FrustumMode::Literal);
        camera.pan(2.0, -2.0);
        assert_eq!(camera.position, Vec3::new(2.0, -2.0, 10.0));
        assert_eq!(camera.target, Vec3::zero());
    }

    #[test]
    fn test_set_canvas_size_updates_aspect() {
        let mut camera = camera(FrustumMode::Literal);
        camera.set_canvas_size(1000.0, 500.0);
        assert_eq!(camera.canvas_width, 1000.0);
        assert!((camera.settings.aspect_ratio - 2.0).abs() < 1e-6);
    }
}
