//! Integration test: the tokio scheduler with paused time.

use std::time::Duration;

use crosswalk_common::signal::command::{ControlEvent, OverrideRequest};
use crosswalk_common::signal::config::TimingConfig;
use crosswalk_common::signal::state::{DetectionState, Mode, Phase, VehicleLight};
use crosswalk_control_unit::config::load_config_from_str;
use crosswalk_control_unit::cycle::{CycleError, CycleRunner};
use crosswalk_control_unit::supervisor::Supervisor;

#[tokio::test(start_paused = true)]
async fn detection_then_ticks_complete_a_crossing() {
    let config = load_config_from_str("[controller]\ntick_period_ms = 100\n").unwrap();
    let (runner, handle) = CycleRunner::from_config(&config);
    let mut rx = handle.subscribe();
    let task = tokio::spawn(runner.run(std::future::pending()));

    handle
        .send(ControlEvent::DetectionUpdate(DetectionState::new(false, true)))
        .await
        .unwrap();
    let snap = *rx.wait_for(|s| s.phase == Phase::PedestrianGreen).await.unwrap();
    assert_eq!(snap.lamp_codes(), [0, 1]);

    handle.send(ControlEvent::ClearDetections).await.unwrap();
    let snap = *rx
        .wait_for(|s| s.phase == Phase::VehicleGreen && s.timer.remaining.is_indefinite())
        .await
        .unwrap();
    assert!(snap.tick >= 3 + 2 + 10 + 2);

    drop(rx);
    drop(handle);
    let stats = task.await.unwrap().unwrap();
    assert_eq!(stats.events, stats.ticks + 2);
    assert!(stats.phase_changes >= 5);
}

#[tokio::test(start_paused = true)]
async fn override_expires_on_schedule() {
    let (runner, handle) = CycleRunner::new(
        Supervisor::new(TimingConfig::default(), Mode::Automatic),
        Duration::from_secs(1),
        4,
    );
    let mut rx = handle.subscribe();
    let task = tokio::spawn(runner.run(std::future::pending()));

    handle
        .send(ControlEvent::RequestOverride(OverrideRequest::Vehicle(
            VehicleLight::Yellow,
        )))
        .await
        .unwrap();
    let engaged = *rx.wait_for(|s| s.mode == Mode::Override).await.unwrap();
    let restored = *rx.wait_for(|s| s.mode == Mode::Automatic).await.unwrap();
    assert_eq!(restored.tick - engaged.tick, 5);
    assert_eq!(restored.previous_mode, Some(Mode::Automatic));

    drop(rx);
    drop(handle);
    task.await.unwrap().unwrap();
}

#[tokio::test(start_paused = true)]
async fn full_queue_waits_instead_of_dropping() {
    let (runner, handle) = CycleRunner::new(
        Supervisor::new(TimingConfig::default(), Mode::Automatic),
        Duration::from_secs(3600),
        1,
    );
    let mut rx = handle.subscribe();

    // Fill the queue before the runner starts; the next sends must wait.
    handle.try_send(ControlEvent::ClearDetections).unwrap();
    assert!(matches!(
        handle.try_send(ControlEvent::ClearDetections),
        Err(CycleError::QueueFull)
    ));

    let sender = handle.clone();
    let producer = tokio::spawn(async move {
        for mode in [Mode::Manual, Mode::Automatic, Mode::Manual] {
            sender.send(ControlEvent::SetMode(mode)).await.unwrap();
        }
    });
    let task = tokio::spawn(runner.run(std::future::pending()));

    let snap = *rx.wait_for(|s| s.revision >= 4).await.unwrap();
    assert_eq!(snap.mode, Mode::Manual);
    assert_eq!(snap.previous_mode, Some(Mode::Automatic));
    producer.await.unwrap();

    drop(rx);
    drop(handle);
    let stats = task.await.unwrap().unwrap();
    assert_eq!(stats.events - stats.ticks, 4);
}

#[tokio::test]
async fn shutdown_future_stops_the_runner() {
    let (runner, handle) = CycleRunner::new(
        Supervisor::new(TimingConfig::default(), Mode::Manual),
        Duration::from_secs(3600),
        4,
    );
    let stats = runner.run(async {}).await.unwrap();
    assert_eq!(stats.events, 0);
    assert!(matches!(
        handle.send(ControlEvent::Tick).await,
        Err(CycleError::Closed)
    ));
}
