//! A small software-rendered 3D toy engine
//!
//! Box-shaped game objects are projected with a per-object perspective and
//! drawn as wireframes onto a [`renderer::Surface`], alongside particles and
//! text overlays. A [`game::Game`] owns the objects, camera, input state and
//! audio output and advances them one frame at a time.
//!
//! # Example
//! ```no_run
//! use weaver_engine::game::{FixedRateClock, Game};
//! use weaver_engine::math::Vec3;
//! use weaver_engine::renderer::Canvas;
//! use weaver_engine::scene::GameObject;
//!
//! let mut game = Game::new(800.0, 600.0, Vec3::new(0.0, 0.0, -100.0));
//! game.add(GameObject::new(0.0, 0.0, 0.0, 20.0, 20.0, 20.0));
//!
//! let mut canvas = Canvas::new(800, 600);
//! game.run(&mut canvas, &mut FixedRateClock::sixty_hz().with_frame_limit(60));
//! let _ = canvas.save("frame.png");
//! ```

pub mod app;
pub mod asset;
pub mod audio;
pub mod core;
pub mod game;
pub mod input;
pub mod math;
pub mod renderer;
pub mod scene;
pub mod ui;
