//! Integration tests against a real controller.
//!
//! These tests require a Grizzly Bear to be connected and the motor to be
//! free to spin.
//! Run with: cargo test -p grizzly --test hardware -- --ignored --nocapture

use std::thread;
use std::time::Duration;

use grizzly::{ControlMode, ControllerConfig, DriveMode, Grizzly};

fn open_controller() -> Grizzly {
    Grizzly::open(&ControllerConfig::default())
        .expect("No controller found - plug in a Grizzly Bear")
}

#[test]
#[ignore] // requires hardware
fn uptime_advances_and_no_reset_reported() {
    let grizzly = open_controller();

    // First call compares against zero
    let _ = grizzly.has_reset().unwrap();
    thread::sleep(Duration::from_millis(50));
    assert!(!grizzly.has_reset().unwrap());

    grizzly.close().unwrap();
}

#[test]
#[ignore] // requires hardware
fn pid_gains_read_back() {
    let grizzly = open_controller();

    grizzly.init_pid(0.5, 0.25, -1.0).unwrap();
    let pid = grizzly.read_pid_constants().unwrap();
    assert_eq!((pid.kp, pid.ki, pid.kd), (0.5, 0.25, -1.0));

    grizzly.close().unwrap();
}

#[test]
#[ignore] // requires hardware
fn short_pwm_pulse_moves_encoder() {
    let grizzly = open_controller();

    grizzly.write_encoder(0).unwrap();
    grizzly.limit_acceleration(50).unwrap();
    grizzly.limit_current(5.0).unwrap();
    grizzly
        .set_mode(ControlMode::NoPid, DriveMode::Brake)
        .unwrap();
    grizzly.set_target(100).unwrap();
    thread::sleep(Duration::from_millis(500));
    let current = grizzly.read_motor_current().unwrap();
    grizzly.set_target(0).unwrap();

    let ticks = grizzly.read_encoder().unwrap();
    println!("encoder={} current={:.2}A", ticks, current);
    assert_ne!(ticks, 0);

    grizzly.close().unwrap();
}
