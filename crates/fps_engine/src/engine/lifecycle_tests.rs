//! Lifecycle and frame-loop tests, driven by the headless platform

use super::*;
use crate::events::{KeyEvent, ScrollEvent};
use crate::platform::{HeadlessPlatform, PRIMARY_WINDOW};
use crate::render::{DrawCommand, RenderableObject};

#[derive(Debug, Default)]
struct Journal {
    entries: Vec<String>,
    deltas: Vec<f64>,
    counter: u32,
    seen_by_render: Vec<u32>,
}

type TestEngine = Engine<Journal, HeadlessPlatform>;

fn engine(platform: HeadlessPlatform) -> TestEngine {
    Engine::new(platform, Journal::default())
}

fn context() -> EngineContext {
    EngineContext::new(320, 200, "lifecycle")
}

fn key_event(key: KeyCode, action: Action) -> HostEvent {
    HostEvent::Key(KeyEvent {
        window: PRIMARY_WINDOW,
        key,
        scancode: 0,
        action,
        mods: Modifiers::empty(),
    })
}

#[test]
fn test_frame_order_and_scripted_deltas() {
    let platform = HeadlessPlatform::new()
        .with_timestamps([10.0, 10.5, 10.75, 11.75])
        .with_frame_limit(3);
    let mut engine = engine(platform);
    engine.init(context()).unwrap();

    engine.register_prerun_callback(|scene, _| scene.state.entries.push("prerun".into()));
    engine.register_update_callback(|scene, dt| {
        scene.state.entries.push("update".into());
        scene.state.deltas.push(dt);
    });
    engine.register_render_callback(|scene, device| {
        scene.state.entries.push("render".into());
        device.clear();
    });
    engine.register_postrender_callback(|scene, device| {
        scene.state.entries.push("postrender".into());
        device.set_depth_test(false);
    });

    engine.run().unwrap();

    assert_eq!(engine.state().deltas, vec![0.5, 0.25, 1.0]);
    let expected: Vec<String> = std::iter::once("prerun")
        .chain(["update", "render", "postrender"].repeat(3))
        .map(String::from)
        .collect();
    assert_eq!(engine.state().entries, expected);
    assert_eq!(engine.frame_count(), 3);
    assert_eq!(engine.platform().frames_presented(), 3);
    assert_eq!(engine.platform().device().present_count(), 3);

    // render hook, then the draw pass, then post-render, then the swap
    let commands = engine.platform().device().commands();
    let first_frame: Vec<_> = commands
        .iter()
        .take_while(|c| **c != DrawCommand::Present)
        .collect();
    assert_eq!(first_frame.first(), Some(&&DrawCommand::Clear));
    assert_eq!(first_frame.get(1), Some(&&DrawCommand::PushTransform));
    assert_eq!(first_frame.last(), Some(&&DrawCommand::DepthTest(false)));
}

#[test]
fn test_update_changes_are_visible_to_render() {
    let mut engine = engine(HeadlessPlatform::new().with_frame_limit(3));
    engine.init(context()).unwrap();
    engine.register_update_callback(|scene, _| scene.state.counter += 1);
    engine.register_render_callback(|scene, _| {
        let counter = scene.state.counter;
        scene.state.seen_by_render.push(counter);
    });
    engine.run().unwrap();
    assert_eq!(engine.state().seen_by_render, vec![1, 2, 3]);
}

#[test]
fn test_run_without_callbacks() {
    let mut engine = engine(HeadlessPlatform::new().with_frame_limit(2));
    engine.init(context()).unwrap();
    engine.run().unwrap();
    assert_eq!(engine.platform().frames_presented(), 2);
    assert_eq!(engine.lifecycle(), EngineState::Terminated);
}

#[test]
fn test_window_lives_for_the_run() {
    let mut engine = engine(HeadlessPlatform::new().with_frame_limit(1));
    engine.init(context()).unwrap();
    engine.register_prerun_callback(|scene, _| {
        assert_eq!(scene.window(), Some(PRIMARY_WINDOW));
    });
    engine.register_update_callback(|scene, _| {
        scene.state.entries.push(format!("{:?}", scene.window()));
    });
    engine.run().unwrap();

    assert_eq!(engine.state().entries, vec![format!("{:?}", Some(PRIMARY_WINDOW))]);
    let platform = engine.platform();
    assert!(!platform.has_window());
    assert_eq!(platform.windows_destroyed(), 1);
    assert!(engine.context().is_none());
    assert!(engine.scene().window().is_none());
}

#[test]
fn test_window_created_from_context() {
    let mut engine = engine(HeadlessPlatform::new().with_frame_limit(1));
    engine.init(context().with_mouse_disabled(true)).unwrap();
    engine.run().unwrap();

    let platform = engine.platform();
    assert_eq!(platform.window_title(), "lifecycle");
    assert_eq!(platform.window_size(), (320, 200));
    assert!(platform.events_enabled());
    assert!(platform.cursor_disabled());
}

#[test]
fn test_prerun_fires_once_with_context_current() {
    let mut engine = engine(HeadlessPlatform::new().with_frame_limit(4));
    engine.init(context()).unwrap();
    engine.register_prerun_callback(|scene, device| {
        scene.state.counter += 1;
        device.set_clear_color([0.0, 0.0, 0.0, 1.0]);
    });
    engine.run().unwrap();
    assert_eq!(engine.state().counter, 1);
    assert_eq!(
        engine.platform().device().commands().first(),
        Some(&DrawCommand::ClearColor([0.0, 0.0, 0.0, 1.0]))
    );
}

#[test]
fn test_prerun_spawned_objects_are_drawn_every_frame() {
    let mut engine = engine(HeadlessPlatform::new().with_frame_limit(2));
    engine.init(context()).unwrap();
    engine.register_prerun_callback(|scene, _| {
        scene.spawn(RenderableObject::cube()).unwrap();
        scene.spawn(RenderableObject::cube().at(2.0, 0.0, 0.0)).unwrap();
    });
    engine.run().unwrap();
    assert_eq!(engine.platform().device().draw_calls().count(), 4);
    assert_eq!(engine.scene().renderer.last_frame_stats().drawn, 2);
}

#[test]
fn test_request_close_ends_loop() {
    let mut engine = engine(HeadlessPlatform::new());
    engine.init(context()).unwrap();
    engine.register_update_callback(|scene, _| {
        scene.state.counter += 1;
        if scene.state.counter == 2 {
            scene.request_close();
        }
    });
    engine.run().unwrap();
    assert_eq!(engine.state().counter, 2);
    assert_eq!(engine.platform().frames_presented(), 2);
    assert!(!engine.scene().close_requested());
}

#[test]
fn test_escape_press_dispatched_through_loop() {
    let platform = HeadlessPlatform::new()
        .with_frame_limit(10)
        .with_event(0, key_event(KeyCode::Escape, Action::Release))
        .with_event(1, key_event(KeyCode::Space, Action::Press))
        .with_event(2, key_event(KeyCode::Escape, Action::Press));
    let mut engine = engine(platform);
    engine.init(context()).unwrap();
    engine
        .register_key_callback(
            Filter::Any,
            KeyCode::Escape,
            Filter::Any,
            Action::Press,
            Filter::Any,
            |scene: &mut Scene<Journal>, _: &KeyEvent| {
                scene.state.entries.push("escape".into());
                scene.request_close();
            },
        )
        .unwrap();
    engine
        .register_key_callback(
            Filter::Any,
            Filter::Any,
            Filter::Any,
            Filter::Any,
            Filter::Any,
            |scene: &mut Scene<Journal>, e: &KeyEvent| {
                scene.state.entries.push(format!("{:?} {:?}", e.key, e.action));
            },
        )
        .unwrap();
    engine.run().unwrap();

    assert_eq!(
        engine.state().entries,
        vec!["Escape Release", "Space Press", "escape", "Escape Press"]
    );
    assert_eq!(engine.platform().frames_presented(), 3);
}

#[test]
fn test_event_changes_reach_next_update() {
    let scroll = HostEvent::Scroll(ScrollEvent {
        window: PRIMARY_WINDOW,
        x_offset: 0.0,
        y_offset: 3.0,
    });
    let platform = HeadlessPlatform::new().with_frame_limit(2).with_event(0, scroll);
    let mut engine = engine(platform);
    engine.init(context()).unwrap();
    engine
        .register_scroll_callback(PRIMARY_WINDOW, |scene: &mut Scene<Journal>, e: &ScrollEvent| {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let steps = e.y_offset as u32;
            scene.state.counter += steps;
        })
        .unwrap();
    engine
        .register_scroll_callback(WindowId::new(99), |scene: &mut Scene<Journal>, _: &ScrollEvent| {
            scene.state.entries.push("wrong window".into());
        })
        .unwrap();
    engine.register_update_callback(|scene, _| {
        let counter = scene.state.counter;
        scene.state.seen_by_render.push(counter);
    });
    engine.run().unwrap();
    assert_eq!(engine.state().seen_by_render, vec![0, 3]);
    assert!(engine.state().entries.is_empty());
}

#[test]
fn test_double_init_fails() {
    let mut engine = engine(HeadlessPlatform::new());
    engine.init(context()).unwrap();
    assert!(matches!(
        engine.init(context()),
        Err(EngineError::AlreadyInitialized(EngineState::Initialized))
    ));
    assert_eq!(engine.platform().init_calls(), 1);
}

#[test]
fn test_init_after_termination_fails() {
    let mut engine = engine(HeadlessPlatform::new().with_frame_limit(1));
    engine.init(context()).unwrap();
    engine.run().unwrap();
    assert!(matches!(
        engine.init(context()),
        Err(EngineError::AlreadyInitialized(EngineState::Terminated))
    ));
}

#[test]
fn test_run_requires_init() {
    let mut engine = engine(HeadlessPlatform::new());
    assert!(matches!(engine.run(), Err(EngineError::NotInitialized)));
    assert_eq!(engine.lifecycle(), EngineState::Uninitialized);
}

#[test]
fn test_run_twice_fails() {
    let mut engine = engine(HeadlessPlatform::new().with_frame_limit(1));
    engine.init(context()).unwrap();
    engine.run().unwrap();
    assert!(matches!(engine.run(), Err(EngineError::NotInitialized)));
}

#[test]
fn test_event_registration_requires_init() {
    let mut engine = engine(HeadlessPlatform::new());
    let result = engine.register_scroll_callback(Filter::Any, |_: &mut Scene<Journal>, _: &ScrollEvent| {});
    assert!(matches!(result, Err(EngineError::NotInitialized)));

    // frame hooks may be set in any state
    engine.register_update_callback(|_, _| {});
}

#[test]
fn test_invalid_context_rejected_before_platform() {
    let mut engine = engine(HeadlessPlatform::new());
    let long_title = "x".repeat(EngineContext::MAX_TITLE_LEN + 1);
    let result = engine.init(EngineContext::new(320, 200, long_title));
    assert!(matches!(result, Err(EngineError::Config(_))));
    assert_eq!(engine.platform().init_calls(), 0);

    engine.shutdown();
    assert_eq!(engine.platform().terminate_calls(), 0);
    assert_eq!(engine.lifecycle(), EngineState::Terminated);
}

#[test]
fn test_partial_init_cleanup() {
    let mut engine = engine(HeadlessPlatform::new().failing_init());
    let result = engine.init(context());
    assert!(matches!(result, Err(EngineError::Platform(PlatformError::InitializationFailed(_)))));
    assert_eq!(engine.lifecycle(), EngineState::Uninitialized);
    assert!(engine.scene().renderer.is_initialized());

    engine.shutdown();
    assert_eq!(engine.platform().terminate_calls(), 0);
    assert!(!engine.scene().renderer.is_initialized());
    assert_eq!(engine.lifecycle(), EngineState::Terminated);
    let result = engine.register_key_callback(
        Filter::Any,
        Filter::Any,
        Filter::Any,
        Filter::Any,
        Filter::Any,
        |_: &mut Scene<Journal>, _: &KeyEvent| {},
    );
    assert!(matches!(result, Err(EngineError::NotInitialized)));
}

#[test]
fn test_window_failure_terminates_run() {
    let mut engine = engine(HeadlessPlatform::new().failing_window());
    engine.init(context()).unwrap();
    engine.register_prerun_callback(|scene, _| scene.state.counter += 1);
    let result = engine.run();
    assert!(matches!(
        result,
        Err(EngineError::Platform(PlatformError::WindowCreationFailed(_)))
    ));
    assert_eq!(engine.lifecycle(), EngineState::Terminated);
    assert!(engine.context().is_none());
    assert_eq!(engine.state().counter, 0);

    engine.shutdown();
    assert_eq!(engine.platform().terminate_calls(), 1);
}

#[test]
fn test_shutdown_is_idempotent() {
    let mut engine = engine(HeadlessPlatform::new().with_frame_limit(1));
    engine.init(context()).unwrap();
    engine.run().unwrap();
    engine.shutdown();
    engine.shutdown();
    assert_eq!(engine.platform().terminate_calls(), 1);
    assert!(!engine.platform().is_initialized());
}

#[test]
fn test_shutdown_without_init_does_nothing() {
    let mut engine = engine(HeadlessPlatform::new());
    engine.shutdown();
    assert_eq!(engine.lifecycle(), EngineState::Uninitialized);
    assert_eq!(engine.platform().terminate_calls(), 0);
}

#[test]
fn test_engines_are_independent() {
    let mut first = engine(HeadlessPlatform::new().with_frame_limit(1));
    let mut second = engine(HeadlessPlatform::new().with_frame_limit(2));
    first.init(context()).unwrap();
    second.init(context()).unwrap();
    first.run().unwrap();
    assert_eq!(second.lifecycle(), EngineState::Initialized);
    second.run().unwrap();
    assert_eq!(first.frame_count(), 1);
    assert_eq!(second.frame_count(), 2);
}
