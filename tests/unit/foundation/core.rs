use super::*;

#[test]
fn default_limits_are_one_to_ten() {
    let limits = RateLimits::default();
    assert_eq!(limits.clamp(0.5), 1.0);
    assert_eq!(limits.clamp(4.0), 4.0);
    assert_eq!(limits.clamp(20.0), 10.0);
}

#[test]
fn interval_is_inverse_of_clamped_speed() {
    let limits = RateLimits::default();
    assert_eq!(interval_millis(limits.interval_for(20.0)), 100);
    assert_eq!(interval_millis(limits.interval_for(10.0)), 100);
    assert_eq!(interval_millis(limits.interval_for(2.0)), 500);
    assert_eq!(interval_millis(limits.interval_for(1.0)), 1000);
    assert_eq!(interval_millis(limits.interval_for(0.1)), 1000);
}

#[test]
fn unusable_speeds_fall_back_to_min_rate() {
    let limits = RateLimits::default();
    assert_eq!(limits.clamp(f64::NAN), 1.0);
    assert_eq!(limits.clamp(-3.0), 1.0);
    assert_eq!(limits.clamp(0.0), 1.0);
    assert_eq!(limits.clamp(f64::INFINITY), 1.0);
}

#[test]
fn custom_limits_validate() {
    assert!(RateLimits::new(2.0, 30.0).is_ok());
    assert!(RateLimits::new(0.0, 10.0).is_err());
    assert!(RateLimits::new(5.0, 4.0).is_err());
    assert!(RateLimits::new(1.0, f64::INFINITY).is_err());

    let limits = RateLimits::new(2.0, 30.0).unwrap();
    assert_eq!(interval_millis(limits.interval_for(25.0)), 40);
    assert_eq!(interval_millis(limits.interval_for(1.0)), 500);
}

#[test]
fn tiny_min_fps_is_rejected() {
    let err = RateLimits::new(1e-320, 10.0).unwrap_err();
    assert!(matches!(err, FlipbookError::Validation(_)), "{err}");
    assert!(RateLimits::new(1e-3, 10.0).is_ok());
}

#[test]
fn interval_never_panics_on_unchecked_limits() {
    let tiny = RateLimits {
        min_fps: 1e-320,
        max_fps: 10.0,
    };
    assert_eq!(tiny.interval_for(f64::NAN), Duration::MAX);
    assert_eq!(interval_millis(tiny.interval_for(5.0)), 200);

    let inverted = RateLimits {
        min_fps: 5.0,
        max_fps: 1.0,
    };
    assert!(inverted.validate().is_err());
    assert_eq!(inverted.clamp(3.0), 5.0);
    assert_eq!(interval_millis(inverted.interval_for(3.0)), 200);

    let zero = RateLimits {
        min_fps: 0.0,
        max_fps: 0.0,
    };
    assert_eq!(zero.interval_for(2.0), Duration::MAX);
}

#[test]
fn interval_millis_saturates() {
    assert_eq!(interval_millis(Duration::from_millis(1234)), 1234);
    assert_eq!(interval_millis(Duration::MAX), u64::MAX);
}
