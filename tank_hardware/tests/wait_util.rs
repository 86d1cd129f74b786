use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use std::thread;
use std::time::{Duration, Instant};

use tank_hardware::error::HwError;
use tank_hardware::util::wait_while_with_deadline;

#[test]
fn wait_returns_once_echo_falls() {
    let high = Arc::new(AtomicBool::new(true));
    let high_bg = high.clone();
    // Drop the line after a short delay
    thread::spawn(move || {
        thread::sleep(Duration::from_millis(3));
        high_bg.store(false, Ordering::Relaxed);
    });

    let start = Instant::now();
    let res = wait_while_with_deadline(
        || high.load(Ordering::Relaxed),
        start + Duration::from_millis(200),
        Duration::from_micros(200),
    );
    let fell_at = res.expect("expected the line to fall");
    assert!(fell_at >= start);
}

#[test]
fn wait_times_out_as_echo_timeout() {
    let high = Arc::new(AtomicBool::new(true));

    let err = wait_while_with_deadline(
        || high.load(Ordering::Relaxed),
        Instant::now() + Duration::from_millis(5),
        Duration::ZERO,
    )
    .expect_err("expected timeout error");

    match err {
        HwError::EchoTimeout => {}
        other => panic!("unexpected error: {other:?}"),
    }
}
