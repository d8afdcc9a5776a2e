use super::*;
use crate::frames::payload::FramePayload;
use crate::render::{RecordingRenderer, RenderEvent};
use crate::schedule::manual::ManualScheduler;

type TestController = PlaybackController<ManualScheduler, RecordingRenderer>;

fn frames(n: usize) -> FrameSet {
    FrameSet::from_raw((0..n).map(|i| format!("ZnJhbWU{i}")))
}

fn controller() -> TestController {
    PlaybackController::new(ManualScheduler::new(), RecordingRenderer::new())
}

fn timer(c: &TestController) -> TimerId {
    c.state().and_then(PlaybackState::timer).unwrap()
}

fn tick_n(c: &mut TestController, n: usize) {
    for _ in 0..n {
        let id = timer(c);
        assert!(c.tick(id).unwrap());
    }
}

#[test]
fn load_shows_first_frame_exactly_once() {
    for n in 1..6 {
        let mut c = controller();
        let state = c.load(frames(n)).unwrap();
        assert_eq!(state.cursor(), 0);
        assert!(!state.running());
        assert_eq!(c.renderer().frame_indices(), vec![0]);
        assert_eq!(c.scheduler().armed_count(), 0);
    }
}

#[test]
fn load_event_carries_count_and_payload() {
    let mut c = controller();
    c.load(frames(3)).unwrap();
    assert_eq!(
        c.renderer().events(),
        &[RenderEvent::Frame {
            index: 0,
            count: 3,
            src: FramePayload::parse("ZnJhbWU0").to_src(),
        }]
    );
}

#[test]
fn load_empty_fails_without_state() {
    let mut c = controller();
    let err = c.load(FrameSet::default()).unwrap_err();
    assert!(matches!(err, FlipbookError::EmptyFrameSet));
    assert!(c.state().is_none());
    assert!(c.renderer().events().is_empty());
}

#[test]
fn ticks_wrap_around() {
    for n in 1..5 {
        for k in 0..12 {
            let mut c = controller();
            c.load(frames(n)).unwrap();
            c.play().unwrap();
            tick_n(&mut c, k);
            assert_eq!(c.state().unwrap().cursor(), k % n, "n={n} k={k}");
        }
    }
}

#[test]
fn play_twice_keeps_one_timer_and_cursor() {
    let mut c = controller();
    c.load(frames(4)).unwrap();
    c.play().unwrap();
    tick_n(&mut c, 2);
    let first = timer(&c);

    c.play().unwrap();
    let second = timer(&c);
    assert_ne!(first, second);
    assert_eq!(c.scheduler().armed_count(), 1);
    assert_eq!(c.state().unwrap().cursor(), 2);

    // The replaced timer is dead even if a tick from it was already queued.
    assert!(!c.tick(first).unwrap());
    assert_eq!(c.state().unwrap().cursor(), 2);
}

#[test]
fn pause_stops_timer_and_keeps_cursor() {
    let mut c = controller();
    c.load(frames(3)).unwrap();
    c.play().unwrap();
    tick_n(&mut c, 2);
    let id = timer(&c);

    c.pause();
    let state = c.state().unwrap();
    assert!(!state.running());
    assert_eq!(state.cursor(), 2);
    assert_eq!(c.scheduler().armed_count(), 0);
    assert!(!c.tick(id).unwrap());

    // Pausing again is a no-op.
    c.pause();
    assert_eq!(c.state().unwrap().cursor(), 2);
}

#[test]
fn seek_in_range_stops_and_moves() {
    for running in [false, true] {
        for i in 0..4 {
            let mut c = controller();
            c.load(frames(4)).unwrap();
            if running {
                c.play().unwrap();
            }
            c.seek(i).unwrap();
            let state = c.state().unwrap();
            assert!(!state.running());
            assert_eq!(state.cursor(), i as usize);
            assert_eq!(c.scheduler().armed_count(), 0);
            assert_eq!(c.renderer().frame_indices().last(), Some(&(i as usize)));
        }
    }
}

#[test]
fn seek_out_of_range_leaves_state_unchanged() {
    let mut c = controller();
    c.load(frames(3)).unwrap();
    c.play().unwrap();
    tick_n(&mut c, 1);
    let id = timer(&c);
    let shown = c.renderer().events().len();

    for bad in [-1, 3, 5, i64::MIN, i64::MAX] {
        let err = c.seek(bad).unwrap_err();
        assert!(
            matches!(err, FlipbookError::IndexOutOfRange { index, len: 3 } if index == bad),
            "{err}"
        );
    }

    let state = c.state().unwrap();
    assert_eq!(state.cursor(), 1);
    assert!(state.running());
    assert_eq!(timer(&c), id);
    assert_eq!(c.renderer().events().len(), shown);
}

#[test]
fn rate_clamps_and_rearms_when_running() {
    let mut c = controller();
    c.load(frames(3)).unwrap();
    assert_eq!(c.state().unwrap().interval_millis(), 1000);

    c.set_rate(4.0).unwrap();
    assert_eq!(c.state().unwrap().interval_millis(), 250);
    assert_eq!(c.scheduler().armed_count(), 0);

    c.play().unwrap();
    let before = timer(&c);
    c.set_rate(20.0).unwrap();
    let after = timer(&c);
    assert_ne!(before, after);
    assert_eq!(c.scheduler().armed_count(), 1);
    assert_eq!(
        c.scheduler().interval_of(after),
        Some(Duration::from_millis(100))
    );
}

#[test]
fn rate_persists_across_loads() {
    let mut c = controller();
    c.set_rate(5.0).unwrap();
    c.load(frames(2)).unwrap();
    assert_eq!(c.state().unwrap().interval_millis(), 200);
    assert_eq!(c.speed(), 5.0);
}

#[test]
fn reload_discards_previous_timer() {
    let mut c = controller();
    c.load(frames(3)).unwrap();
    c.play().unwrap();
    let old = timer(&c);

    c.load(frames(2)).unwrap();
    assert_eq!(c.scheduler().armed_count(), 0);
    assert!(!c.tick(old).unwrap());
    assert_eq!(c.state().unwrap().cursor(), 0);
}

#[test]
fn discard_cancels_and_ignores_late_ticks() {
    let mut c = controller();
    c.load(frames(3)).unwrap();
    c.play().unwrap();
    let id = timer(&c);

    c.discard();
    assert!(c.state().is_none());
    assert_eq!(c.scheduler().armed_count(), 0);
    assert!(!c.tick(id).unwrap());
}

#[test]
fn operations_without_frames() {
    let mut c = controller();
    assert!(matches!(c.play(), Err(FlipbookError::NotLoaded)));
    assert!(matches!(c.seek(0), Err(FlipbookError::NotLoaded)));
    c.pause();
    c.discard();
    c.set_rate(3.0).unwrap();
    assert!(!c.tick(TimerId(0)).unwrap());
}

#[test]
fn virtual_clock_drives_playback() {
    let mut c = controller();
    c.set_rate(10.0).unwrap();
    c.load(frames(3)).unwrap();
    c.play().unwrap();

    let due = c.scheduler_mut().advance(Duration::from_millis(450));
    assert_eq!(due.len(), 4);
    for id in due {
        c.tick(id).unwrap();
    }
    assert_eq!(c.state().unwrap().cursor(), 1);
}

#[test]
fn documented_scenario() {
    let mut c = controller();
    c.load(frames(3)).unwrap();
    c.play().unwrap();
    tick_n(&mut c, 4);
    assert_eq!(c.state().unwrap().cursor(), 1);

    assert!(matches!(
        c.seek(5),
        Err(FlipbookError::IndexOutOfRange { index: 5, len: 3 })
    ));
    assert_eq!(c.state().unwrap().cursor(), 1);

    c.set_rate(20.0).unwrap();
    assert_eq!(c.state().unwrap().interval_millis(), 100);
}

#[test]
fn with_limits_rejects_unusable_bounds() {
    for limits in [
        RateLimits {
            min_fps: 5.0,
            max_fps: 1.0,
        },
        RateLimits {
            min_fps: 1e-320,
            max_fps: 10.0,
        },
    ] {
        let res = PlaybackController::with_limits(
            ManualScheduler::new(),
            RecordingRenderer::new(),
            limits,
        );
        assert!(matches!(res, Err(FlipbookError::Validation(_))));
    }

    let mut c = PlaybackController::with_limits(
        ManualScheduler::new(),
        RecordingRenderer::new(),
        RateLimits::new(2.0, 4.0).unwrap(),
    )
    .unwrap();
    c.set_rate(f64::NAN).unwrap();
    c.load(frames(2)).unwrap();
    assert_eq!(c.state().unwrap().interval_millis(), 500);
}

/// Scheduler whose timers can never be armed.
#[derive(Default)]
struct NoTimers {
    attempts: usize,
}

impl Scheduler for NoTimers {
    fn arm_repeating(&mut self, _interval: Duration) -> FlipbookResult<TimerId> {
        self.attempts += 1;
        Err(FlipbookError::Other(anyhow::anyhow!("no threads left")))
    }

    fn cancel(&mut self, _id: TimerId) {}

    fn armed_count(&self) -> usize {
        0
    }
}

#[test]
fn play_reports_failure_to_arm_and_stays_stopped() {
    let mut c = PlaybackController::new(NoTimers::default(), RecordingRenderer::new());
    c.load(frames(3)).unwrap();

    let err = c.play().unwrap_err();
    assert!(err.to_string().contains("no threads left"), "{err}");
    assert!(!c.is_running());
    assert_eq!(c.state().unwrap().timer(), None);
    assert_eq!(c.scheduler().attempts, 1);

    assert!(c.set_rate(4.0).is_ok());
    assert_eq!(c.scheduler().attempts, 1);
}
