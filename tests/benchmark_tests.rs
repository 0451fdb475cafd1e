//! Timing and performance checks for the client's hot paths

use assert_approx_eq::assert_approx_eq;
use client::input::DirectionBuffer;
use client::ticker::TickScheduler;
use macroquad::prelude::KeyCode;
use serde_json::json;
use shared::{MoveReply, Protocol, Reply};
use std::thread;
use std::time::{Duration, Instant};

/// Ten ticks on a 500 ms grid land at 5 s even when every tick costs time
#[test]
fn benchmark_tick_cadence_without_drift() {
    let interval = Duration::from_millis(500);
    let handler_cost = Duration::from_millis(50);
    let origin = Instant::now();
    let mut scheduler = TickScheduler::new(origin, interval);

    let mut fired_at = Vec::new();
    while fired_at.len() < 10 {
        let now = Instant::now();
        if scheduler.poll(now) {
            fired_at.push(now.duration_since(origin));
            thread::sleep(handler_cost);
        } else {
            thread::sleep(scheduler.next_deadline().saturating_duration_since(now));
        }
    }

    let total_ms = fired_at[9].as_secs_f64() * 1000.0;
    println!("10 ticks in {:.2}ms", total_ms);

    // Within one handler's cost of the ideal, not ten handlers' worth
    assert_approx_eq!(total_ms, 5000.0, handler_cost.as_millis() as f64);
    assert!(fired_at[9] >= interval * 10);

    for (i, at) in fired_at.iter().enumerate() {
        let ideal = interval * (i as u32 + 1);
        assert!(*at >= ideal);
        assert!(*at - ideal < handler_cost);
    }
}

/// Benchmarks scheduler polling, which runs once per rendered frame
#[test]
fn benchmark_scheduler_poll() {
    let origin = Instant::now();
    let mut scheduler = TickScheduler::new(origin, Duration::from_millis(500));

    let iterations = 100_000u32;
    let start = Instant::now();

    for i in 0..iterations {
        let _ = scheduler.poll(origin + Duration::from_millis(i as u64));
    }

    let duration = start.elapsed();
    println!(
        "Scheduler poll: {} iterations in {:?} ({:.2} ns/iter)",
        iterations,
        duration,
        duration.as_nanos() as f64 / iterations as f64
    );

    assert_eq!(scheduler.ticks_fired(), 199);
    assert!(duration.as_millis() < 100);
}

/// Benchmarks key handling
#[test]
fn benchmark_direction_buffer() {
    let keys = [KeyCode::Up, KeyCode::Left, KeyCode::Down, KeyCode::Right, KeyCode::A];
    let mut buffer = DirectionBuffer::new();

    let iterations = 100_000;
    let start = Instant::now();

    for i in 0..iterations {
        buffer.on_key(keys[i % keys.len()]);
        if i % 3 == 0 {
            buffer.commit();
        }
    }

    let duration = start.elapsed();
    println!(
        "Direction buffer: {} key presses in {:?}",
        iterations, duration
    );

    assert_ne!(buffer.current(), buffer.last_committed().opposite());
    assert!(duration.as_millis() < 100);
}

/// Benchmarks decoding a full 10x10 move reply
#[test]
fn benchmark_move_reply_decode() {
    let protocol = Protocol::default();
    let row = vec![" ", "s", "s", "h", " ", " ", " ", "a", " ", " "];
    let reply = json!({
        "alive": true,
        "won": false,
        "length": 3,
        "eaten": 1,
        "board": vec![row; 10]
    });
    let reply = match reply {
        serde_json::Value::Object(object) => object,
        _ => unreachable!(),
    };

    let iterations = 10_000;
    let start = Instant::now();

    for _ in 0..iterations {
        match protocol.decode::<MoveReply>(reply.clone()).unwrap() {
            Reply::Ok(state) => assert_eq!(state.board.height(), 10),
            Reply::Error(e) => panic!("unexpected soft error: {}", e),
        }
    }

    let duration = start.elapsed();
    println!(
        "Move reply decode: {} iterations in {:?} ({:.2} μs/iter)",
        iterations,
        duration,
        duration.as_micros() as f64 / iterations as f64
    );

    // Should complete in under 1 second
    assert!(duration.as_millis() < 1000);
}
