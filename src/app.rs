use crate::{
    core::{EngineError, Timer},
    game::Game,
    input::InputEvent,
    math::{Vec2, Vec3},
    renderer::{Canvas, BLACK},
    scene::{GameObject, UiText},
    ui::FPSCounter,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::num::NonZeroU32;
use std::rc::Rc;
use winit::{
    application::ApplicationHandler,
    event::{ElementState, KeyEvent, MouseButton, Touch, TouchPhase, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowAttributes, WindowId},
};

const WIDTH: u32 = 1280;
const HEIGHT: u32 = 720;
const BURST_SIZE: usize = 24;

type WindowSurface = softbuffer::Surface<Rc<Window>, Rc<Window>>;

pub struct App {
    window: Option<Rc<Window>>,
    surface: Option<WindowSurface>,
    canvas: Canvas,
    game: Game,
    timer: Timer,
    fps_counter: FPSCounter,
    rng: ChaCha8Rng,
    screenshots: u32,
}

impl App {
    pub fn new() -> Self {
        let game = Game::new(WIDTH as f32, HEIGHT as f32, Vec3::new(0.0, 0.0, -200.0));
        let mut game = Self::with_audio_output(game);
        Self::populate(&mut game);

        Self {
            window: None,
            surface: None,
            canvas: Canvas::new(WIDTH, HEIGHT),
            game,
            timer: Timer::new(),
            fps_counter: FPSCounter::new(),
            rng: ChaCha8Rng::seed_from_u64(0x5eed),
            screenshots: 0,
        }
    }

    #[cfg(feature = "kira")]
    fn with_audio_output(game: Game) -> Game {
        match crate::audio::KiraAudio::new() {
            Ok(audio) => game.with_audio(Box::new(audio)),
            Err(e) => {
                log::warn!("{e}, continuing without sound");
                game
            }
        }
    }

    #[cfg(not(feature = "kira"))]
    fn with_audio_output(game: Game) -> Game {
        game
    }

    fn populate(game: &mut Game) {
        game.add(GameObject::new(0.0, 0.0, 0.0, 50.0, 50.0, 50.0));

        let mut drifting = GameObject::new(-120.0, 40.0, 30.0, 30.0, 30.0, 30.0);
        drifting.velocity = Vec3::new(0.25, 0.0, 0.0);
        game.add(drifting);

        let mut label = GameObject::new(-300.0, -200.0, 0.0, 0.0, 0.0, 0.0);
        label.visible = false;
        label.ui = Some(
            UiText::new("ARROWS PAN - CLICK FOR PARTICLES - F12 SAVES").with_css_color("#202020"),
        );
        game.add(label);
    }

    fn window_title(&self) -> String {
        format!(
            "weaver | FPS: {} | particles: {}",
            self.fps_counter.fps() as u32,
            self.game.particles().len()
        )
    }

    fn save_frame(&mut self) {
        self.screenshots += 1;
        let path = format!("weaver-frame-{:03}.png", self.screenshots);
        if let Err(e) = self.canvas.save(&path) {
            log::warn!("Failed to save {path}: {e}");
        }
    }

    fn burst_at_pointer(&mut self) {
        let Some(pointer) = self.game.input().pointer_position() else {
            return;
        };
        // Place the burst on the z = 0 plane under the pointer.
        let camera = self.game.camera();
        let scale = camera.settings.scale;
        let depth = -camera.position.z;
        let origin = Vec3::new(
            (pointer.x - camera.canvas_width / 2.0) * depth / scale + camera.position.x,
            (pointer.y - camera.canvas_height / 2.0) * depth / scale + camera.position.y,
            0.0,
        );
        self.game
            .spawn_burst(&mut self.rng, origin, BURST_SIZE, 2.0, 60, BLACK);
    }

    fn create_surface(window: &Rc<Window>) -> Result<WindowSurface, EngineError> {
        let context = softbuffer::Context::new(Rc::clone(window))?;
        Ok(softbuffer::Surface::new(&context, Rc::clone(window))?)
    }

    /// Copies the canvas into the window's framebuffer.
    fn present(&mut self) -> Result<(), EngineError> {
        let Some(surface) = self.surface.as_mut() else {
            return Ok(());
        };
        let (width, height) = self.canvas.image().dimensions();
        let (Some(width), Some(height)) = (NonZeroU32::new(width), NonZeroU32::new(height)) else {
            return Ok(());
        };
        surface.resize(width, height)?;
        let mut buffer = surface.buffer_mut()?;
        self.canvas.copy_to_xrgb(&mut buffer);
        buffer.present()?;
        Ok(())
    }

    fn forward(&mut self, event: InputEvent) {
        self.game.handle_input(event);
    }

    pub fn run() -> Result<(), Box<dyn std::error::Error>> {
        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut app = App::new();
        event_loop.run_app(&mut app)?;
        Ok(())
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window_attributes = WindowAttributes::default()
            .with_title("weaver")
            .with_inner_size(winit::dpi::LogicalSize::new(WIDTH, HEIGHT));

        match event_loop.create_window(window_attributes) {
            Ok(window) => {
                log::info!("Window created");
                let window = Rc::new(window);
                match Self::create_surface(&window) {
                    Ok(surface) => self.surface = Some(surface),
                    Err(e) => {
                        log::error!("{e}");
                        event_loop.exit();
                        return;
                    }
                }
                let size = window.inner_size();
                self.canvas.resize(size.width, size.height);
                self.game
                    .camera_mut()
                    .set_canvas_size(size.width as f32, size.height as f32);
                self.game.start();
                window.request_redraw();
                self.window = Some(window);
            }
            Err(e) => {
                log::error!("Failed to create window: {e}");
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                log::info!("Window close requested");
                self.game.stop();
                event_loop.exit();
            }
            WindowEvent::Focused(focused) => {
                if focused {
                    self.game.attach_input();
                } else {
                    self.game.detach_input();
                }
            }
            WindowEvent::Resized(size) => {
                if size.width > 0 && size.height > 0 {
                    self.canvas.resize(size.width, size.height);
                    self.game
                        .camera_mut()
                        .set_canvas_size(size.width as f32, size.height as f32);
                    log::debug!("Window resized to {}x{}", size.width, size.height);
                }
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state,
                        ..
                    },
                ..
            } => match (code, state) {
                (KeyCode::Escape, ElementState::Pressed) => {
                    log::info!("Escape pressed, exiting");
                    self.game.stop();
                    event_loop.exit();
                }
                (KeyCode::F12, ElementState::Pressed) => self.save_frame(),
                (_, ElementState::Pressed) => self.forward(InputEvent::KeyDown(code)),
                (_, ElementState::Released) => self.forward(InputEvent::KeyUp(code)),
            },
            WindowEvent::CursorMoved { position, .. } => {
                self.forward(InputEvent::PointerMove(Vec2::new(
                    position.x as f32,
                    position.y as f32,
                )));
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => match state {
                ElementState::Pressed => {
                    self.forward(InputEvent::PointerDown);
                    self.burst_at_pointer();
                }
                ElementState::Released => self.forward(InputEvent::PointerUp),
            },
            WindowEvent::Touch(Touch {
                phase, location, ..
            }) => {
                let position = Vec2::new(location.x as f32, location.y as f32);
                match phase {
                    TouchPhase::Started => self.forward(InputEvent::TouchStart(position)),
                    TouchPhase::Moved => self.forward(InputEvent::TouchMove(position)),
                    TouchPhase::Ended | TouchPhase::Cancelled => {}
                }
            }
            WindowEvent::RedrawRequested => {
                if !self.game.is_running() {
                    return;
                }

                let delta = self.timer.delta();
                self.fps_counter.update(delta);

                self.game.frame(&mut self.canvas);
                if let Err(e) = self.present() {
                    log::warn!("{e}");
                }

                let title = self.window_title();
                if let Some(window) = &self.window {
                    window.set_title(&title);
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        log::info!(
            "Exiting after {} frames ({:.1}s)",
            self.game.frame_count(),
            self.timer.elapsed()
        );
    }
}
