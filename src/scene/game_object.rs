//! Box-shaped game objects: wireframe projection, AABB collision, UI text
//! overlays and distance-attenuated sound.

use super::Camera;
use crate::audio::{distance_attenuation, play_full_volume, AudioOutput, SourceId};
use crate::core::AudioError;
use crate::math::{Aabb, Vec2, Vec3};
use crate::renderer::{parse_color, Color, Font, Surface, BLACK, WHITE};
use std::path::Path;

/// Triangles of the box, as indices into [`GameObject::vertices`].
pub const FACES: [[usize; 3]; 12] = [
    [0, 1, 2],
    [0, 2, 3],
    [4, 5, 6],
    [4, 6, 7],
    [0, 1, 5],
    [0, 5, 4],
    [1, 2, 6],
    [1, 6, 5],
    [2, 3, 7],
    [2, 7, 6],
    [3, 0, 4],
    [3, 4, 7],
];

const WIREFRAME_WIDTH: f32 = 2.0;

/// Per-object projection parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObjectTransform {
    /// Euler angles in radians, composed Z * Y * X (default: all zero)
    pub rotation: Vec3,
    /// Pixels per unit of perspective-divided coordinate (default: 400.0)
    pub scale: f32,
}

impl Default for ObjectTransform {
    fn default() -> Self {
        Self {
            rotation: Vec3::zero(),
            scale: 400.0,
        }
    }
}

/// Distance-attenuated playback settings plus the lazily created source.
#[derive(Debug, Clone, PartialEq)]
pub struct SpatialAudio {
    /// Distance at which the sound fades to silence (default: 500.0)
    pub max_distance: f32,
    /// Volume multiplier applied after attenuation (default: 1.0)
    pub volume: f32,
    source: Option<SourceId>,
}

impl SpatialAudio {
    #[must_use]
    pub fn new(max_distance: f32, volume: f32) -> Self {
        Self {
            max_distance,
            volume,
            source: None,
        }
    }

    #[must_use]
    pub fn source(&self) -> Option<SourceId> {
        self.source
    }
}

impl Default for SpatialAudio {
    fn default() -> Self {
        Self::new(500.0, 1.0)
    }
}

/// Text drawn at the object's screen-space position.
#[derive(Debug, Clone, PartialEq)]
pub struct UiText {
    pub text: String,
    pub font: Font,
    pub color: Color,
}

impl UiText {
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            font: Font::default(),
            color: WHITE,
        }
    }

    /// Sets the colour from a CSS name or hex string. Values that do not
    /// parse keep the current colour.
    #[must_use]
    pub fn with_css_color(mut self, css: &str) -> Self {
        match parse_color(css) {
            Some(color) => self.color = color,
            None => log::warn!("Unrecognised colour `{css}`"),
        }
        self
    }
}

/// Screen-space result of projecting a vertex.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectedPoint {
    pub x: f32,
    pub y: f32,
    /// Rotated camera-space z used for the perspective divide.
    pub depth: f32,
}

impl ProjectedPoint {
    #[must_use]
    pub fn screen(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

#[derive(Debug, Clone)]
pub struct GameObject {
    pub position: Vec3,
    pub width: f32,
    pub height: f32,
    pub depth: f32,
    pub velocity: Vec3,
    pub acceleration: Vec3,
    /// Corners captured at construction. They are world-space and do not
    /// follow later changes to `position`.
    pub vertices: [Vec3; 8],
    pub visible: bool,
    /// Set by frustum culling.
    pub hidden: bool,
    pub ui: Option<UiText>,
    pub transform: ObjectTransform,
    pub audio: SpatialAudio,
}

impl GameObject {
    #[must_use]
    pub fn new(x: f32, y: f32, z: f32, width: f32, height: f32, depth: f32) -> Self {
        let position = Vec3::new(x, y, z);
        let (hw, hh, hd) = (width / 2.0, height / 2.0, depth / 2.0);
        let vertices = [
            Vec3::new(x - hw, y - hh, z - hd),
            Vec3::new(x + hw, y - hh, z - hd),
            Vec3::new(x + hw, y + hh, z - hd),
            Vec3::new(x - hw, y + hh, z - hd),
            Vec3::new(x - hw, y - hh, z + hd),
            Vec3::new(x + hw, y - hh, z + hd),
            Vec3::new(x + hw, y + hh, z + hd),
            Vec3::new(x - hw, y + hh, z + hd),
        ];

        Self {
            position,
            width,
            height,
            depth,
            velocity: Vec3::zero(),
            acceleration: Vec3::zero(),
            vertices,
            visible: true,
            hidden: false,
            ui: None,
            transform: ObjectTransform::default(),
            audio: SpatialAudio::default(),
        }
    }

    #[must_use]
    pub fn with_transform(mut self, transform: ObjectTransform) -> Self {
        self.transform = transform;
        self
    }

    #[must_use]
    pub fn with_audio(mut self, audio: SpatialAudio) -> Self {
        self.audio = audio;
        self
    }

    /// Bounding box around the current position.
    #[must_use]
    pub fn aabb(&self) -> Aabb {
        Aabb::from_center(self.position, self.width, self.height, self.depth)
    }

    /// Attaches a text overlay using the default font and colour.
    pub fn create_ui(&mut self, text: impl Into<String>) {
        self.ui = Some(UiText::new(text));
    }

    #[must_use]
    pub fn is_ui(&self) -> bool {
        self.ui.is_some()
    }

    /// Integrates acceleration into velocity and velocity into position.
    pub fn update(&mut self) {
        self.velocity = self.velocity.add(&self.acceleration);
        self.position = self.position.add(&self.velocity);
    }

    /// Projects a world-space vertex to canvas pixels.
    ///
    /// A vertex whose rotated depth is exactly zero produces non-finite
    /// coordinates.
    #[must_use]
    pub fn project_vertex(&self, vertex: &Vec3, camera: &Camera) -> ProjectedPoint {
        let t = vertex.sub(&camera.position);
        let r = self.transform.rotation;
        let (sin_x, cos_x) = r.x.sin_cos();
        let (sin_y, cos_y) = r.y.sin_cos();
        let (sin_z, cos_z) = r.z.sin_cos();

        let x = t.x * cos_z * cos_y
            + t.y * (cos_z * sin_y * sin_x - sin_z * cos_x)
            + t.z * (cos_z * sin_y * cos_x + sin_z * sin_x);
        let y = t.x * sin_z * cos_y
            + t.y * (sin_z * sin_y * sin_x + cos_z * cos_x)
            + t.z * (sin_z * sin_y * cos_x - cos_z * sin_x);
        let z = t.y * cos_y * -sin_x + t.z * cos_y * cos_x;

        let scale = self.transform.scale;
        ProjectedPoint {
            x: x / z * scale + camera.canvas_width / 2.0,
            y: y / z * scale + camera.canvas_height / 2.0,
            depth: z,
        }
    }

    /// Strokes the outline of every face.
    pub fn render(&self, surface: &mut dyn Surface, camera: &Camera) {
        if !self.visible {
            return;
        }

        let projected = self.vertices.map(|v| self.project_vertex(&v, camera));
        for face in &FACES {
            for i in 0..face.len() {
                let from = projected[face[i]].screen();
                let to = projected[face[(i + 1) % face.len()]].screen();
                surface.stroke_line(from, to, BLACK, WIREFRAME_WIDTH);
            }
        }
    }

    pub fn render_ui(&self, surface: &mut dyn Surface, camera: &Camera) {
        let Some(ui) = &self.ui else {
            return;
        };
        let origin = Vec2::new(
            self.position.x - camera.position.x + camera.canvas_width / 2.0,
            self.position.y - camera.position.y + camera.canvas_height / 2.0,
        );
        surface.fill_text(&ui.text, origin, &ui.font, ui.color);
    }

    /// Boxes overlap when their extents around `position` intersect on all
    /// three axes. `position` is the centre of the box, not its minimum
    /// corner, so boxes of different sizes are compared centre to centre.
    /// Touching faces do not count as a collision.
    #[must_use]
    pub fn check_collision(&self, other: &Self) -> bool {
        self.aabb().overlaps(&other.aabb())
    }

    #[must_use]
    pub fn check_collision_x(&self, other: &Self) -> bool {
        self.aabb().overlaps_x(&other.aabb())
    }

    #[must_use]
    pub fn check_collision_y(&self, other: &Self) -> bool {
        self.aabb().overlaps_y(&other.aabb())
    }

    #[must_use]
    pub fn check_collision_z(&self, other: &Self) -> bool {
        self.aabb().overlaps_z(&other.aabb())
    }

    /// Reverses velocity on every axis whose extents overlap `other`.
    pub fn handle_collision(&mut self, other: &Self) {
        if self.check_collision_x(other) {
            self.velocity.x = -self.velocity.x;
        }
        if self.check_collision_y(other) {
            self.velocity.y = -self.velocity.y;
        }
        if self.check_collision_z(other) {
            self.velocity.z = -self.velocity.z;
        }
    }

    /// Plays `file` with volume falling off linearly with distance to the
    /// camera. The source is created on first use and reused afterwards.
    /// Returns the volume that was requested.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be created or played.
    pub fn play_sound_effect(
        &mut self,
        audio: &mut dyn AudioOutput,
        file: &Path,
        camera: &Camera,
    ) -> Result<f32, AudioError> {
        let distance = self.position.distance(&camera.position);
        let volume = distance_attenuation(distance, self.audio.max_distance) * self.audio.volume;

        let source = match self.audio.source {
            Some(source) => source,
            None => {
                let source = audio.create_source(file)?;
                self.audio.source = Some(source);
                source
            }
        };

        audio.play(source, volume)?;
        Ok(volume)
    }

    /// Plays `file` at full volume through a fresh source.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be created or played.
    pub fn play_background_music(
        &self,
        audio: &mut dyn AudioOutput,
        file: &Path,
    ) -> Result<SourceId, AudioError> {
        play_full_volume(audio, file)
    }

    /// Plays `file` once at full volume, ignoring the object's position.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be created or played.
    pub fn play_global_sound_effect(
        &self,
        audio: &mut dyn AudioOutput,
        file: &Path,
    ) -> Result<SourceId, AudioError> {
        play_full_volume(audio, file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::NullAudio;
    use crate::renderer::Canvas;

    fn camera() -> Camera {
        Camera::new(800.0, 600.0, Vec3::new(0.0, 0.0, -50.0))
    }

    #[test]
    fn test_aabb_of_centered_box() {
        let object = GameObject::new(0.0, 0.0, 0.0, 10.0, 10.0, 10.0);
        let aabb = object.aabb();
        assert_eq!(aabb.min, Vec3::new(-5.0, -5.0, -5.0));
        assert_eq!(aabb.max, Vec3::new(5.0, 5.0, 5.0));
    }

    #[test]
    fn test_aabb_follows_position_but_vertices_do_not() {
        let mut object = GameObject::new(0.0, 0.0, 0.0, 2.0, 2.0, 2.0);
        object.velocity = Vec3::new(3.0, 0.0, 0.0);
        object.update();
        assert_eq!(object.aabb().min.x, 2.0);
        assert_eq!(object.vertices[0], Vec3::new(-1.0, -1.0, -1.0));
    }

    #[test]
    fn test_faces_index_vertices() {
        assert!(FACES.iter().flatten().all(|&i| i < 8));
    }

    #[test]
    fn test_update_integrates_acceleration() {
        let mut object = GameObject::new(0.0, 0.0, 0.0, 1.0, 1.0, 1.0);
        object.acceleration = Vec3::new(0.0, -1.0, 0.5);
        object.update();
        object.update();
        assert_eq!(object.velocity, Vec3::new(0.0, -2.0, 1.0));
        assert_eq!(object.position, Vec3::new(0.0, -3.0, 1.5));
    }

    #[test]
    fn test_touching_boxes_do_not_collide() {
        let a = GameObject::new(0.0, 0.0, 0.0, 10.0, 10.0, 10.0);
        let b = GameObject::new(10.0, 0.0, 0.0, 10.0, 10.0, 10.0);
        assert!(!a.check_collision(&b));
        assert!(!a.check_collision_x(&b));
        assert!(a.check_collision_y(&b));
    }

    #[test]
    fn test_collision_measures_from_box_centres() {
        let large = GameObject::new(0.0, 0.0, 0.0, 10.0, 10.0, 10.0);
        // Spans 5..7 on x, so it only touches the large box's face.
        let small = GameObject::new(6.0, 0.0, 0.0, 2.0, 2.0, 2.0);
        assert!(!large.check_collision(&small));

        let inside = GameObject::new(4.0, 0.0, 0.0, 2.0, 2.0, 2.0);
        assert!(large.check_collision(&inside));
        assert!(inside.check_collision(&large));
    }

    #[test]
    fn test_ui_text_css_colour() {
        let ui = UiText::new("HI").with_css_color("#ff0000");
        assert_eq!(ui.color, image::Rgba([255, 0, 0, 255]));
        let ui = UiText::new("HI").with_css_color("not-a-colour");
        assert_eq!(ui.color, WHITE);
    }

    #[test]
    fn test_handle_collision_flips_overlapping_axes() {
        let mut a = GameObject::new(0.0, 0.0, 0.0, 10.0, 10.0, 10.0);
        a.velocity = Vec3::new(1.0, 2.0, 3.0);
        // Overlaps on x and y, separated on z.
        let b = GameObject::new(4.0, 4.0, 20.0, 10.0, 10.0, 10.0);
        a.handle_collision(&b);
        assert_eq!(a.velocity, Vec3::new(-1.0, -2.0, 3.0));
    }

    #[test]
    fn test_project_vertex_centers_point_on_axis() {
        let object = GameObject::new(0.0, 0.0, 0.0, 1.0, 1.0, 1.0);
        let p = object.project_vertex(&Vec3::zero(), &camera());
        assert_eq!(p.x, 400.0);
        assert_eq!(p.y, 300.0);
        assert_eq!(p.depth, 50.0);
    }

    #[test]
    fn test_project_vertex_perspective_divide_and_scale() {
        let object = GameObject::new(0.0, 0.0, 0.0, 1.0, 1.0, 1.0);
        let p = object.project_vertex(&Vec3::new(10.0, -5.0, 0.0), &camera());
        // 10 / 50 * 400 = 80, -5 / 50 * 400 = -40
        assert!((p.x - 480.0).abs() < 1e-3);
        assert!((p.y - 260.0).abs() < 1e-3);
    }

    #[test]
    fn test_project_vertex_applies_rotation() {
        let object = GameObject::new(0.0, 0.0, 0.0, 1.0, 1.0, 1.0).with_transform(
            ObjectTransform {
                rotation: Vec3::new(0.0, 0.0, std::f32::consts::FRAC_PI_2),
                scale: 400.0,
            },
        );
        // A quarter turn about z maps +x onto +y.
        let p = object.project_vertex(&Vec3::new(10.0, 0.0, 0.0), &camera());
        assert!((p.x - 400.0).abs() < 1e-3);
        assert!((p.y - 380.0).abs() < 1e-3);
    }

    #[test]
    fn test_project_vertex_at_camera_depth_is_not_finite() {
        let object = GameObject::new(0.0, 0.0, 0.0, 1.0, 1.0, 1.0);
        let p = object.project_vertex(&Vec3::new(1.0, 1.0, -50.0), &camera());
        assert!(!p.screen().is_finite());
    }

    #[test]
    fn test_render_draws_wireframe_only_when_visible() {
        let camera = camera();
        let mut object = GameObject::new(0.0, 0.0, 0.0, 10.0, 10.0, 10.0);
        let mut canvas = Canvas::new(800, 600);

        object.render(&mut canvas, &camera);
        let drawn = canvas.image().pixels().filter(|p| **p == BLACK).count();
        assert!(drawn > 0);
        assert_eq!(canvas.pixel(10, 10), Some(WHITE));

        canvas.clear();
        object.visible = false;
        object.render(&mut canvas, &camera);
        assert_eq!(canvas.image().pixels().filter(|p| **p == BLACK).count(), 0);
    }

    #[test]
    fn test_render_ui_only_with_text() {
        let camera = camera();
        let mut object = GameObject::new(-100.0, 0.0, 0.0, 1.0, 1.0, 1.0);
        let mut canvas = Canvas::with_background(800, 600, BLACK);

        object.render_ui(&mut canvas, &camera);
        assert!(canvas.image().pixels().all(|p| *p == BLACK));

        object.create_ui("HELLO");
        assert!(object.is_ui());
        object.render_ui(&mut canvas, &camera);
        assert!(canvas.image().pixels().any(|p| *p == WHITE));
    }

    #[test]
    fn test_sound_effect_attenuates_and_caches_source() {
        let camera = camera();
        let mut audio = NullAudio::new();
        let mut object = GameObject::new(0.0, 0.0, 0.0, 1.0, 1.0, 1.0)
            .with_audio(SpatialAudio::new(100.0, 0.5));

        let volume = object
            .play_sound_effect(&mut audio, Path::new("hit.wav"), &camera)
            .unwrap();
        // 50 units away out of 100 → half volume, times 0.5
        assert!((volume - 0.25).abs() < 1e-6);

        object.position = Vec3::new(0.0, 0.0, 500.0);
        let volume = object
            .play_sound_effect(&mut audio, Path::new("hit.wav"), &camera)
            .unwrap();
        assert_eq!(volume, 0.0);

        assert_eq!(audio.source_count(), 1);
        assert_eq!(audio.history().len(), 2);
        assert_eq!(object.audio.source(), Some(SourceId(0)));
    }

    #[test]
    fn test_background_and_global_sounds_play_at_full_volume() {
        let mut audio = NullAudio::new();
        let object = GameObject::new(0.0, 0.0, 0.0, 1.0, 1.0, 1.0);
        object
            .play_background_music(&mut audio, Path::new("theme.ogg"))
            .unwrap();
        object
            .play_global_sound_effect(&mut audio, Path::new("ding.wav"))
            .unwrap();
        assert_eq!(audio.source_count(), 2);
        assert!(audio.history().iter().all(|p| p.volume == 1.0));
    }
}
