//! Frame orchestration: owns the objects, particles, camera, input and audio
//! output and advances them one frame at a time.

use crate::audio::{play_full_volume, AudioOutput, NullAudio, SourceId};
use crate::core::{AudioError, EngineError};
use crate::input::{InputEvent, InputState};
use crate::math::{Aabb, Plane, Vec3};
use crate::renderer::{Color, Surface};
use crate::scene::{Camera, GameObject, GravityRule, Particle};
use rand::Rng;
use std::cell::Cell;
use std::path::Path;
use std::rc::Rc;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, PartialEq)]
pub struct GameSettings {
    /// Camera pan per frame while an arrow key is held (default: 2.0)
    pub camera_speed: f32,
    /// Run the culling pass every frame and skip hidden objects when
    /// rendering (default: false)
    pub frustum_culling: bool,
    /// Gravity rule given to particles from [`Game::create_particle`]
    pub particle_gravity: GravityRule,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            camera_speed: 2.0,
            frustum_culling: false,
            particle_gravity: GravityRule::Literal,
        }
    }
}

/// Index of an object added with [`Game::add`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectId(pub usize);

/// Shared handle that ends [`Game::run`] after the current frame.
#[derive(Debug, Clone)]
pub struct StopHandle {
    running: Rc<Cell<bool>>,
}

impl StopHandle {
    pub fn stop(&self) {
        self.running.set(false);
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running.get()
    }
}

/// Paces the run loop.
pub trait FrameClock {
    /// Waits until the next frame is due. Returns `false` once the host is
    /// shutting down.
    fn next_frame(&mut self) -> bool;
}

/// Sleeps so that frames start at most once per `interval`, optionally
/// ending after a fixed number of frames.
pub struct FixedRateClock {
    interval: Duration,
    last_frame: Option<Instant>,
    frame_limit: Option<u64>,
    frames: u64,
}

impl FixedRateClock {
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_frame: None,
            frame_limit: None,
            frames: 0,
        }
    }

    /// Roughly 60 frames per second.
    #[must_use]
    pub fn sixty_hz() -> Self {
        Self::new(Duration::from_micros(16_667))
    }

    #[must_use]
    pub fn with_frame_limit(mut self, limit: u64) -> Self {
        self.frame_limit = Some(limit);
        self
    }
}

impl FrameClock for FixedRateClock {
    fn next_frame(&mut self) -> bool {
        if self.frame_limit.is_some_and(|limit| self.frames >= limit) {
            return false;
        }
        if let Some(last) = self.last_frame {
            let elapsed = last.elapsed();
            if elapsed < self.interval {
                std::thread::sleep(self.interval - elapsed);
            }
        }
        self.last_frame = Some(Instant::now());
        self.frames += 1;
        true
    }
}

pub struct Game {
    objects: Vec<GameObject>,
    particles: Vec<Particle>,
    camera: Camera,
    input: InputState,
    input_attached: bool,
    audio: Box<dyn AudioOutput>,
    settings: GameSettings,
    running: Rc<Cell<bool>>,
    frame_count: u64,
}

impl Game {
    /// Creates a game for a canvas of the given size with the camera at
    /// `camera_position`. Input starts attached; audio goes to [`NullAudio`].
    #[must_use]
    pub fn new(canvas_width: f32, canvas_height: f32, camera_position: Vec3) -> Self {
        Self::with_camera(Camera::new(canvas_width, canvas_height, camera_position))
    }

    #[must_use]
    pub fn with_camera(camera: Camera) -> Self {
        Self {
            objects: Vec::new(),
            particles: Vec::new(),
            camera,
            input: InputState::new(),
            input_attached: true,
            audio: Box::new(NullAudio::new()),
            settings: GameSettings::default(),
            running: Rc::new(Cell::new(false)),
            frame_count: 0,
        }
    }

    #[must_use]
    pub fn with_settings(mut self, settings: GameSettings) -> Self {
        self.settings = settings;
        self
    }

    #[must_use]
    pub fn with_audio(mut self, audio: Box<dyn AudioOutput>) -> Self {
        self.audio = audio;
        self
    }

    pub fn add(&mut self, object: GameObject) -> ObjectId {
        self.objects.push(object);
        let id = ObjectId(self.objects.len() - 1);
        log::debug!("Added object {id:?}");
        id
    }

    #[must_use]
    pub fn object(&self, id: ObjectId) -> Option<&GameObject> {
        self.objects.get(id.0)
    }

    pub fn object_mut(&mut self, id: ObjectId) -> Option<&mut GameObject> {
        self.objects.get_mut(id.0)
    }

    #[must_use]
    pub fn objects(&self) -> &[GameObject] {
        &self.objects
    }

    #[must_use]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    #[must_use]
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    #[must_use]
    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    #[must_use]
    pub fn input(&self) -> &InputState {
        &self.input
    }

    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn create_particle(&mut self, position: Vec3, velocity: Vec3, lifetime: i32, color: Color) {
        let particle = Particle::new(position, velocity, lifetime, color)
            .with_gravity(self.settings.particle_gravity);
        self.particles.push(particle);
    }

    /// Emits `count` particles from `origin` with random velocities of up
    /// to `|speed|` on each axis. A non-finite speed emits nothing.
    pub fn spawn_burst<R: Rng>(
        &mut self,
        rng: &mut R,
        origin: Vec3,
        count: usize,
        speed: f32,
        lifetime: i32,
        color: Color,
    ) {
        let speed = speed.abs();
        if !speed.is_finite() {
            log::warn!("Ignoring particle burst with speed {speed}");
            return;
        }
        for _ in 0..count {
            let velocity = Vec3::new(
                rng.gen_range(-speed..=speed),
                rng.gen_range(-speed..=speed),
                rng.gen_range(-speed..=speed),
            );
            self.create_particle(origin, velocity, lifetime, color);
        }
    }

    /// Advances every particle and drops the ones that expired.
    pub fn update_particles(&mut self) {
        for particle in &mut self.particles {
            particle.update();
        }
        self.particles.retain(Particle::is_alive);
    }

    /// Starts delivering input events to this game.
    pub fn attach_input(&mut self) {
        self.input_attached = true;
    }

    /// Stops delivering input events and releases any held keys.
    pub fn detach_input(&mut self) {
        self.input_attached = false;
        self.input.reset();
    }

    #[must_use]
    pub fn is_input_attached(&self) -> bool {
        self.input_attached
    }

    /// Returns whether the event was consumed. Detached games consume
    /// nothing.
    pub fn handle_input(&mut self, event: InputEvent) -> bool {
        self.input_attached && self.input.handle(event)
    }

    pub fn update_camera_position(&mut self) {
        let (dx, dy) = self.input.pan_delta(self.settings.camera_speed);
        if dx != 0.0 || dy != 0.0 {
            self.camera.pan(dx, dy);
        }
    }

    /// Marks every object whose box fails the frustum test as hidden.
    pub fn perform_frustum_culling(&mut self) {
        let planes = self.camera.frustum_planes();
        for object in &mut self.objects {
            object.hidden = !Self::intersects_frustum(&object.aabb(), &planes);
        }
    }

    #[must_use]
    pub fn intersects_frustum(aabb: &Aabb, planes: &[Plane]) -> bool {
        aabb.intersects_frustum(planes)
    }

    #[must_use]
    pub fn intersects_plane_aabb(plane: &Plane, aabb: &Aabb) -> bool {
        aabb.intersects_plane(plane)
    }

    /// Physics, particles and camera for one frame.
    pub fn update(&mut self) {
        for object in &mut self.objects {
            object.update();
        }
        self.update_particles();
        self.update_camera_position();
        if self.settings.frustum_culling {
            self.perform_frustum_culling();
        }
    }

    pub fn render(&self, surface: &mut dyn Surface) {
        surface.clear();
        for object in &self.objects {
            if self.settings.frustum_culling && object.hidden {
                continue;
            }
            object.render(surface, &self.camera);
            object.render_ui(surface, &self.camera);
        }
        for particle in &self.particles {
            particle.render(surface, &self.camera);
        }
    }

    /// One full update and render.
    pub fn frame(&mut self, surface: &mut dyn Surface) {
        self.update();
        self.render(surface);
        self.frame_count += 1;
        log::trace!(
            "Frame {} ({} objects, {} particles)",
            self.frame_count,
            self.objects.len(),
            self.particles.len()
        );
    }

    #[must_use]
    pub fn stop_handle(&self) -> StopHandle {
        StopHandle {
            running: Rc::clone(&self.running),
        }
    }

    /// Marks the game as running for hosts that drive [`Game::frame`]
    /// themselves.
    pub fn start(&mut self) {
        self.running.set(true);
        log::info!("Game started with {} objects", self.objects.len());
    }

    pub fn stop(&mut self) {
        if self.running.replace(false) {
            log::info!("Game stopped after {} frames", self.frame_count);
        }
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running.get()
    }

    /// Runs frames until the clock reports shutdown or the game is stopped.
    /// Returns the number of frames run by this call.
    pub fn run(&mut self, surface: &mut dyn Surface, clock: &mut dyn FrameClock) -> u64 {
        let start = self.frame_count;
        self.start();
        while self.is_running() && clock.next_frame() {
            self.frame(surface);
        }
        self.stop();
        self.frame_count - start
    }

    /// Plays `file` from the object's position, attenuated by its distance
    /// to the camera.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown objects or audio failures.
    pub fn play_sound_effect(&mut self, id: ObjectId, file: &Path) -> Result<f32, EngineError> {
        let object = self
            .objects
            .get_mut(id.0)
            .ok_or(EngineError::UnknownObject(id))?;
        Ok(object.play_sound_effect(self.audio.as_mut(), file, &self.camera)?)
    }

    /// # Errors
    ///
    /// Returns an error if the source cannot be created or played.
    pub fn play_background_music(&mut self, file: &Path) -> Result<SourceId, AudioError> {
        play_full_volume(self.audio.as_mut(), file)
    }

    /// # Errors
    ///
    /// Returns an error for unknown sources or backend failures.
    pub fn stop_sound(&mut self, source: SourceId) -> Result<(), AudioError> {
        self.audio.stop(source)
    }
}
