//! First-person demo application
//!
//! Flies a camera over a field of spinning cubes and pyramids.
//!
//! Controls: WASD to move, Space/Left Shift to rise and sink, the mouse to
//! look, the scroll wheel to zoom, left click to toggle wireframe, Escape to
//! quit.
//!
//! Usage: `fps [--config <context.toml|context.ron>] [debug-log-path]`
//!
//! Without `--config` the window opens at 1024x768 with the mouse captured.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use fps_engine::config::ConfigError;
use fps_engine::foundation::logging;
use fps_engine::prelude::*;
use fps_engine::render::{ObjectType, RenderResult};
use rand::Rng;

const PYRAMID: DefinitionId = DefinitionId(1);

/// Units per second
const MOVE_SPEED: f32 = 6.0;

/// Degrees per pixel of cursor travel
const LOOK_SENSITIVITY: f32 = 0.1;

/// Degrees of field of view per scroll step
const ZOOM_STEP: f32 = 2.0;

const SPIN_DEGREES_PER_SECOND: f32 = 45.0;

const GRID_SIZE: i32 = 5;
const GRID_SPACING: f32 = 4.0;

const USAGE: &str = "usage: fps [--config <context.toml|context.ron>] [debug-log-path]";

/// Command-line options
#[derive(Debug, Default, PartialEq, Eq)]
struct Args {
    config: Option<PathBuf>,
    log_file: Option<PathBuf>,
}

impl Args {
    fn parse(args: impl IntoIterator<Item = String>) -> Result<Self, String> {
        let mut parsed = Self::default();
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            if arg == "--config" {
                let path = args.next().ok_or("--config needs a path")?;
                parsed.config = Some(path.into());
            } else if arg.starts_with("--") {
                return Err(format!("unknown option {arg}"));
            } else if parsed.log_file.is_none() {
                parsed.log_file = Some(arg.into());
            } else {
                return Err(format!("unexpected argument {arg}"));
            }
        }
        Ok(parsed)
    }
}

/// Engine context from a TOML/RON file, or the demo's built-in one
fn load_context(path: Option<&Path>) -> Result<EngineContext, ConfigError> {
    match path {
        Some(path) => {
            let context = EngineContext::load_from_file(path)?;
            log::info!("loaded engine context from {}", path.display());
            Ok(context)
        }
        None => Ok(EngineContext::new(1024, 768, "fps").with_mouse_disabled(true)),
    }
}

/// Movement keys currently held
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct Movement {
    forward: bool,
    back: bool,
    left: bool,
    right: bool,
    up: bool,
    down: bool,
}

impl Movement {
    /// Record a key going down or up; returns false for keys that don't move
    fn set(&mut self, key: KeyCode, held: bool) -> bool {
        let slot = match key {
            KeyCode::W => &mut self.forward,
            KeyCode::S => &mut self.back,
            KeyCode::A => &mut self.left,
            KeyCode::D => &mut self.right,
            KeyCode::Space => &mut self.up,
            KeyCode::LeftShift => &mut self.down,
            _ => return false,
        };
        *slot = held;
        true
    }

    /// (forward, right, up), each in -1..=1
    fn axes(self) -> (f32, f32, f32) {
        let axis = |pos: bool, neg: bool| f32::from(u8::from(pos)) - f32::from(u8::from(neg));
        (
            axis(self.forward, self.back),
            axis(self.right, self.left),
            axis(self.up, self.down),
        )
    }
}

#[derive(Debug)]
struct Demo {
    camera: FirstPersonCamera,
    movement: Movement,
    last_cursor: Option<(f64, f64)>,
    viewport: (i32, i32),
    wireframe: bool,
}

impl Demo {
    fn new(context: &EngineContext) -> Self {
        let width = i32::try_from(context.window_width).unwrap_or(i32::MAX);
        let height = i32::try_from(context.window_height).unwrap_or(i32::MAX);
        let mut camera = FirstPersonCamera::new(Vec3::new(0.0, 2.0, 8.0), 1.0);
        camera.far = 200.0;
        camera.set_viewport(width, height);
        Self {
            camera,
            movement: Movement::default(),
            last_cursor: None,
            viewport: (width, height),
            wireframe: false,
        }
    }

    /// Turn the camera by the cursor's travel since the last sample
    #[allow(clippy::cast_possible_truncation)]
    fn look(&mut self, x: f64, y: f64) {
        if let Some((last_x, last_y)) = self.last_cursor {
            let dx = (x - last_x) as f32;
            let dy = (y - last_y) as f32;
            self.camera.rotate(-dx * LOOK_SENSITIVITY, -dy * LOOK_SENSITIVITY);
        }
        self.last_cursor = Some((x, y));
    }
}

/// Square pyramid, apex up, base two units wide
#[rustfmt::skip]
fn pyramid_vertices() -> Vec<[f32; 3]> {
    vec![
        [-1.0, -1.0,  1.0], [ 1.0, -1.0,  1.0], [ 0.0,  1.0,  0.0],
        [ 1.0, -1.0,  1.0], [ 1.0, -1.0, -1.0], [ 0.0,  1.0,  0.0],
        [ 1.0, -1.0, -1.0], [-1.0, -1.0, -1.0], [ 0.0,  1.0,  0.0],
        [-1.0, -1.0, -1.0], [-1.0, -1.0,  1.0], [ 0.0,  1.0,  0.0],
        [-1.0, -1.0,  1.0], [-1.0, -1.0, -1.0], [ 1.0, -1.0, -1.0],
        [-1.0, -1.0,  1.0], [ 1.0, -1.0, -1.0], [ 1.0, -1.0,  1.0],
    ]
}

/// Register the pyramid and lay out the object grid
#[allow(clippy::cast_precision_loss)]
fn populate(scene: &mut Scene<Demo>) -> RenderResult<()> {
    scene
        .renderer
        .add_definition(RenderDefinition::from_triangles(PYRAMID, pyramid_vertices())?)?;

    let mut rng = rand::thread_rng();
    let half = GRID_SIZE / 2;
    for row in -half..=half {
        for col in -half..=half {
            let color = [
                rng.gen_range(0.2..1.0),
                rng.gen_range(0.2..1.0),
                rng.gen_range(0.2..1.0),
                1.0,
            ];
            let base = if (row + col) % 2 == 0 {
                RenderableObject::cube()
            } else {
                RenderableObject::custom(PYRAMID)
            };
            let object = base
                .at(col as f32 * GRID_SPACING, 0.0, row as f32 * GRID_SPACING - 10.0)
                .with_color(color)
                .with_rotation(rng.gen_range(0.0..360.0), Vec3::new(0.0, 1.0, 0.0));
            scene.spawn(object)?;
        }
    }
    log::info!("spawned {} objects", scene.objects.len());
    Ok(())
}

fn register_callbacks(engine: &mut Engine<Demo, GlfwPlatform>) -> Result<(), EngineError> {
    engine.register_key_callback(
        Filter::Any,
        KeyCode::Escape,
        Filter::Any,
        Action::Press,
        Filter::Any,
        |scene: &mut Scene<Demo>, _: &KeyEvent| {
            log::info!("escape pressed, closing");
            scene.request_close();
        },
    )?;

    engine.register_key_callback(
        Filter::Any,
        Filter::Any,
        Filter::Any,
        Filter::Any,
        Filter::Any,
        |scene: &mut Scene<Demo>, event: &KeyEvent| {
            let held = match event.action {
                Action::Press => true,
                Action::Release => false,
                Action::Repeat => return,
            };
            scene.state.movement.set(event.key, held);
        },
    )?;

    engine.register_cursor_move_callback(Filter::Any, |scene: &mut Scene<Demo>, event: &CursorMoveEvent| {
        scene.state.look(event.x, event.y);
    })?;

    // Forget the last sample so re-entering doesn't jerk the view
    engine.register_cursor_enter_callback(
        Filter::Any,
        Filter::Any,
        |scene: &mut Scene<Demo>, _: &CursorEnterEvent| scene.state.last_cursor = None,
    )?;

    engine.register_scroll_callback(Filter::Any, |scene: &mut Scene<Demo>, event: &ScrollEvent| {
        #[allow(clippy::cast_possible_truncation)]
        let steps = event.y_offset as f32;
        scene.state.camera.zoom(-steps * ZOOM_STEP);
    })?;

    engine.register_framebuffer_resize_callback(
        Filter::Any,
        |scene: &mut Scene<Demo>, event: &FramebufferResizeEvent| {
            log::debug!("framebuffer resized to {}x{}", event.width, event.height);
            scene.state.viewport = (event.width, event.height);
            scene.state.camera.set_viewport(event.width, event.height);
        },
    )?;

    engine.register_mouse_button_callback(
        Filter::Any,
        MouseButton::Left,
        Action::Press,
        Filter::Any,
        |scene: &mut Scene<Demo>, _: &MouseButtonEvent| {
            let wireframe = !scene.state.wireframe;
            scene.state.wireframe = wireframe;
            let mode = if wireframe { PolygonMode::Line } else { PolygonMode::Fill };
            for object in scene.objects.values_mut() {
                object.polygon_mode = mode;
            }
        },
    )?;

    engine.register_prerun_callback(|scene, device| {
        device.set_clear_color([0.05, 0.05, 0.1, 1.0]);
        device.set_depth_test(true);
        if let Err(e) = populate(scene) {
            log::error!("failed to build the scene: {e}");
            scene.request_close();
        }
    });

    engine.register_update_callback(|scene, dt| {
        #[allow(clippy::cast_possible_truncation)]
        let dt = dt as f32;
        let (forward, right, up) = scene.state.movement.axes();
        let step = MOVE_SPEED * dt;
        scene.state.camera.move_local(forward * step, right * step, up * step);

        for object in scene.objects.values_mut() {
            if object.object_type == ObjectType::Cube {
                object.rotation_angle =
                    (object.rotation_angle + SPIN_DEGREES_PER_SECOND * dt).rem_euclid(360.0);
            }
        }
    });

    engine.register_render_callback(|scene, device| {
        let (width, height) = scene.state.viewport;
        device.set_viewport(width, height);
        device.clear();
        device.load_projection(&scene.state.camera.projection_matrix());
        let view = scene.state.camera.view_matrix();
        scene.renderer.set_view(view);
    });

    Ok(())
}

fn main() -> ExitCode {
    let args = match Args::parse(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{e}\n{USAGE}");
            return ExitCode::from(1);
        }
    };

    let log_config = args
        .log_file
        .clone()
        .map_or_else(LogConfig::default, LogConfig::with_file);
    if let Err(e) = logging::init(&log_config) {
        eprintln!("failed to initialize logging: {e}");
        return ExitCode::from(3);
    }

    let context = match load_context(args.config.as_deref()) {
        Ok(context) => context,
        Err(e) => {
            log::error!("failed to load engine context: {e}");
            return ExitCode::from(1);
        }
    };
    let mut engine = Engine::new(GlfwPlatform::new(), Demo::new(&context));

    let setup = engine
        .init(context)
        .and_then(|()| register_callbacks(&mut engine));
    if let Err(e) = setup {
        log::error!("engine initialization failed: {e}");
        return ExitCode::from(1);
    }

    if let Err(e) = engine.run() {
        log::error!("engine run failed: {e}");
        return ExitCode::from(2);
    }

    log::info!("finished after {} frames", engine.frame_count());
    ExitCode::SUCCESS
}
