//! Integration test: override hold, floor and restoration.

use crosswalk_common::consts::MIN_OVERRIDE_TICKS;
use crosswalk_common::signal::command::{ControlEvent, OverrideRequest};
use crosswalk_common::signal::config::{GreenLinePreference, TimingConfig};
use crosswalk_common::signal::state::{
    Countdown, Mode, PedestrianLight, Phase, TimerPurpose, VehicleLight,
};
use crosswalk_control_unit::supervisor::Supervisor;

use super::{detect, tick};

const ALL_REQUESTS: [OverrideRequest; 5] = [
    OverrideRequest::Vehicle(VehicleLight::Green),
    OverrideRequest::Vehicle(VehicleLight::Yellow),
    OverrideRequest::Vehicle(VehicleLight::Red),
    OverrideRequest::Pedestrian(PedestrianLight::Green),
    OverrideRequest::Pedestrian(PedestrianLight::Red),
];

fn remaining(sup: &Supervisor) -> u32 {
    sup.state()
        .timer()
        .remaining
        .remaining()
        .expect("override timer is finite")
}

/// Ticks until the mode leaves Override.
fn ticks_until_restored(sup: &mut Supervisor) -> u32 {
    let mut n = 0;
    while sup.state().mode() == Mode::Override {
        tick(sup, 1);
        n += 1;
        assert!(n <= 1_000, "override never expired");
    }
    n
}

#[test]
fn short_configured_durations_hold_exactly_the_floor() {
    let timing = TimingConfig::new(1, 2, 1, 1, GreenLinePreference::Vehicle);
    for request in ALL_REQUESTS {
        let mut sup = Supervisor::new(timing, Mode::Manual);
        sup.dispatch(ControlEvent::RequestOverride(request));
        assert_eq!(remaining(&sup), MIN_OVERRIDE_TICKS, "{request:?}");
        assert_eq!(ticks_until_restored(&mut sup), MIN_OVERRIDE_TICKS);
    }
}

#[test]
fn lamps_stay_forced_for_the_whole_hold() {
    let mut sup = Supervisor::new(TimingConfig::default(), Mode::Automatic);
    sup.dispatch(ControlEvent::RequestOverride(OverrideRequest::Pedestrian(
        PedestrianLight::Green,
    )));
    for _ in 0..9 {
        tick(&mut sup, 1);
        assert_eq!(sup.state().mode(), Mode::Override);
        assert_eq!(sup.state().lamps().codes(), [0, 1]);
        assert_eq!(sup.state().phase(), Phase::VehicleGreen);
    }
    tick(&mut sup, 1);
    assert_eq!(sup.state().mode(), Mode::Automatic);
}

#[test]
fn detection_is_ignored_during_override() {
    let mut sup = Supervisor::new(TimingConfig::default(), Mode::Automatic);
    sup.dispatch(ControlEvent::RequestOverride(OverrideRequest::Vehicle(
        VehicleLight::Green,
    )));
    detect(&mut sup, false, true);
    assert_eq!(sup.state().lamps().codes(), [1, 0]);
    assert_eq!(sup.state().timer().purpose, TimerPurpose::Override);
}

#[test]
fn expiry_restores_automatic_as_fresh_entry() {
    for preference in [GreenLinePreference::Vehicle, GreenLinePreference::Pedestrian] {
        let timing = TimingConfig::new(15, 10, 3, 2, preference);
        let mut sup = Supervisor::new(timing, Mode::Automatic);

        // Disturb detection (and the pedestrian hold) before the override.
        detect(&mut sup, true, true);
        tick(&mut sup, 1);
        sup.dispatch(ControlEvent::RequestOverride(OverrideRequest::Vehicle(
            VehicleLight::Yellow,
        )));
        ticks_until_restored(&mut sup);

        let mut fresh = Supervisor::new(timing, Mode::Manual);
        fresh.dispatch(ControlEvent::SetMode(Mode::Automatic));

        assert_eq!(sup.state().mode(), Mode::Automatic);
        assert_eq!(sup.state().previous_mode(), Some(Mode::Automatic));
        assert_eq!(sup.state().phase(), fresh.state().phase());
        assert_eq!(sup.state().lamps(), fresh.state().lamps());
        assert_eq!(sup.state().timer(), fresh.state().timer());
        assert_eq!(sup.state().detection(), fresh.state().detection());
    }
}

#[test]
fn expiry_restores_manual_at_vehicle_green() {
    let mut sup = Supervisor::new(TimingConfig::default(), Mode::Manual);
    tick(&mut sup, 16);
    assert_eq!(sup.state().phase(), Phase::VehicleYellow);

    sup.dispatch(ControlEvent::RequestOverride(OverrideRequest::Vehicle(
        VehicleLight::Red,
    )));
    assert_eq!(ticks_until_restored(&mut sup), 10);
    assert_eq!(sup.state().mode(), Mode::Manual);
    assert_eq!(sup.state().phase(), Phase::VehicleGreen);
    assert_eq!(sup.state().timer().remaining, Countdown::Finite(15));
}

#[test]
fn mode_change_cancels_override() {
    let mut sup = Supervisor::new(TimingConfig::default(), Mode::Automatic);
    sup.dispatch(ControlEvent::RequestOverride(OverrideRequest::Vehicle(
        VehicleLight::Green,
    )));
    sup.dispatch(ControlEvent::SetMode(Mode::Manual));
    assert_eq!(sup.state().mode(), Mode::Manual);
    assert_eq!(sup.state().previous_mode(), Some(Mode::Override));

    // A later override still resumes Manual, never Override.
    sup.dispatch(ControlEvent::RequestOverride(OverrideRequest::Pedestrian(
        PedestrianLight::Red,
    )));
    assert_eq!(sup.state().previous_mode(), Some(Mode::Manual));
    ticks_until_restored(&mut sup);
    assert_eq!(sup.state().mode(), Mode::Manual);
}

#[test]
fn override_from_direct_override_resumes_automatic() {
    let mut sup = Supervisor::new(TimingConfig::default(), Mode::Automatic);
    sup.dispatch(ControlEvent::SetMode(Mode::Override));
    assert_eq!(sup.state().previous_mode(), None);

    sup.dispatch(ControlEvent::RequestOverride(OverrideRequest::Vehicle(
        VehicleLight::Green,
    )));
    ticks_until_restored(&mut sup);
    assert_eq!(sup.state().mode(), Mode::Automatic);
}
