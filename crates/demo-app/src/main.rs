use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use anyhow::{Result, bail};
use log::{debug, info};
use rune_animation::{
    Animatable, AnimationCurve, AnimationEvent, AnimationGroup, Clock, CurveFunction,
    CurveWeight, GroupMode, KeyFrameAnimation, SharedAnimation, SystemClock, TypedValue,
};
use rune_config::{AnimationSettings, RuneConfig};

/// Demo runs give up after this long even if an animation loops forever.
const MAX_RUN: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scene {
    Single,
    Sequential,
    Parallel,
}

impl Scene {
    fn from_env_and_args() -> Result<Self> {
        let scene_env = std::env::var("DEMO_SCENE").ok();
        let arg = std::env::args()
            .skip(1)
            .find_map(|a| a.strip_prefix("--scene=").map(str::to_string).or_else(|| {
                a.strip_prefix("--").map(str::to_string)
            }));
        let name = arg.or(scene_env).unwrap_or_else(|| "single".to_string());
        Ok(match name.as_str() {
            "single" => Scene::Single,
            "sequential" | "group" => Scene::Sequential,
            "parallel" => Scene::Parallel,
            other => bail!("unknown scene {other:?}; expected single, sequential or parallel"),
        })
    }
}

fn log_event(label: &'static str) -> Rc<dyn Fn(&AnimationEvent)> {
    Rc::new(move |event: &AnimationEvent| {
        if event.is_advanced() {
            if let Some(value) = &event.value {
                info!("{label}: {value:?}");
            }
        } else {
            debug!("{label}: {:?} ({:?})", event.kind, event.state);
        }
    })
}

fn key_frames(
    clock: &Rc<dyn Clock>,
    settings: &AnimationSettings,
    start: impl Into<TypedValue>,
    end: impl Into<TypedValue>,
    duration_ms: u32,
) -> KeyFrameAnimation {
    let mut animation = KeyFrameAnimation::new(start, end)
        .with_clock(clock.clone())
        .with_duration(duration_ms);
    settings.apply_to_key_frames(&mut animation);
    animation
}

/// The animation driven by the demo loop, plus the children a group only
/// holds weakly.
struct Demo {
    root: Box<dyn Animatable>,
    _children: Vec<SharedAnimation>,
}

fn build(scene: Scene, clock: &Rc<dyn Clock>, settings: &AnimationSettings) -> Demo {
    match scene {
        Scene::Single => {
            let mut slide = key_frames(clock, settings, 0, 400, 1000);
            slide.set_key_value(0.5, 300);
            slide.add_listener(log_event("slide"));
            Demo {
                root: Box::new(slide),
                _children: Vec::new(),
            }
        }
        Scene::Sequential | Scene::Parallel => {
            let mode = if scene == Scene::Sequential {
                GroupMode::Sequential
            } else {
                GroupMode::Parallel
            };

            let fade = Rc::new(RefCell::new(key_frames(clock, settings, 0.0, 1.0, 300)));
            fade.borrow_mut().add_listener(log_event("fade"));

            let mut grow = key_frames(clock, settings, 16_i64, 64_i64, 600);
            grow.set_curve(AnimationCurve::new(CurveFunction::Back, CurveWeight::Out));
            let grow = Rc::new(RefCell::new(grow));
            grow.borrow_mut().add_listener(log_event("grow"));

            let mut group = AnimationGroup::new(mode).with_clock(clock.clone());
            group.set_speed(settings.speed_ms);
            group.add_animation(&fade);
            group.add_animation(&grow);
            group.add_listener(Rc::new(|event: &AnimationEvent| {
                if !event.is_advanced() {
                    debug!("group: {:?} ({:?})", event.kind, event.state);
                }
            }));

            Demo {
                root: Box::new(group),
                _children: vec![fade as SharedAnimation, grow as SharedAnimation],
            }
        }
    }
}

fn main() -> Result<()> {
    let config = RuneConfig::load();

    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| config.logging.filter.clone());
    env_logger::Builder::new().parse_filters(&filter).init();

    config.validate()?;
    let scene = Scene::from_env_and_args()?;
    info!("running {scene:?} demo with {:?}", config.animation);

    let clock = SystemClock::shared();
    let mut demo = build(scene, &clock, &config.animation);
    let animation = &mut demo.root;
    let interval = Duration::from_millis(u64::from(config.animation.speed_ms));

    animation.start();
    let began = std::time::Instant::now();
    while animation.is_running() {
        if began.elapsed() > MAX_RUN {
            info!("stopping after {:?}", MAX_RUN);
            animation.stop();
            break;
        }
        std::thread::sleep(interval);
        animation.tick();
    }

    info!("final value: {:?}", animation.current_value());
    Ok(())
}
