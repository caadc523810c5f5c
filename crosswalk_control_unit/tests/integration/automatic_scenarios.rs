//! Integration test: Automatic mode walk-throughs for both variants.

use crosswalk_common::signal::command::ControlEvent;
use crosswalk_common::signal::config::{GreenLinePreference, TimingConfig};
use crosswalk_common::signal::state::{Countdown, Mode, Phase};
use crosswalk_control_unit::supervisor::Supervisor;

use super::{detect, tick};

fn vehicle_preferred() -> Supervisor {
    Supervisor::new(
        TimingConfig::new(15, 10, 3, 2, GreenLinePreference::Vehicle),
        Mode::Automatic,
    )
}

fn pedestrian_preferred() -> Supervisor {
    Supervisor::new(
        TimingConfig::new(15, 10, 3, 2, GreenLinePreference::Pedestrian),
        Mode::Automatic,
    )
}

fn at(sup: &Supervisor) -> (Phase, Countdown) {
    (sup.state().phase(), sup.state().timer().remaining)
}

#[test]
fn lone_pedestrian_gets_a_crossing_and_vehicles_resume() {
    let mut sup = vehicle_preferred();
    assert_eq!(at(&sup), (Phase::VehicleGreen, Countdown::Indefinite));

    detect(&mut sup, false, true);
    assert_eq!(at(&sup), (Phase::VehicleYellow, Countdown::Finite(3)));

    tick(&mut sup, 3);
    assert_eq!(at(&sup), (Phase::AllRedSafety1, Countdown::Finite(2)));

    tick(&mut sup, 2);
    assert_eq!(at(&sup), (Phase::PedestrianGreen, Countdown::Finite(10)));

    detect(&mut sup, false, false);
    tick(&mut sup, 10);
    assert_eq!(at(&sup), (Phase::AllRedSafety2, Countdown::Finite(2)));

    tick(&mut sup, 2);
    assert_eq!(at(&sup), (Phase::VehicleGreen, Countdown::Indefinite));
    assert_eq!(sup.state().lamps().codes(), [1, 0]);
}

#[test]
fn waiting_pedestrians_extend_the_crossing() {
    let mut sup = vehicle_preferred();
    detect(&mut sup, false, true);
    tick(&mut sup, 3 + 2 + 10);
    assert_eq!(at(&sup), (Phase::PedestrianGreen, Countdown::Finite(10)));

    // A vehicle arriving ends the crossing at the next expiry.
    detect(&mut sup, true, true);
    tick(&mut sup, 10);
    assert_eq!(at(&sup), (Phase::AllRedSafety2, Countdown::Finite(2)));
    tick(&mut sup, 2);
    assert_eq!(at(&sup), (Phase::VehicleGreen, Countdown::Indefinite));
}

#[test]
fn vehicle_hold_waits_while_vehicles_are_present() {
    let mut sup = vehicle_preferred();
    detect(&mut sup, true, true);
    tick(&mut sup, 30);
    assert_eq!(at(&sup), (Phase::VehicleGreen, Countdown::Indefinite));

    detect(&mut sup, false, true);
    assert_eq!(sup.state().phase(), Phase::VehicleYellow);
}

#[test]
fn vehicle_interrupts_pedestrian_hold_even_with_pedestrians() {
    let mut sup = pedestrian_preferred();
    assert_eq!(at(&sup), (Phase::PedestrianGreen, Countdown::Indefinite));

    detect(&mut sup, true, true);
    assert_eq!(at(&sup), (Phase::AllRedSafety1, Countdown::Finite(2)));
    assert!(sup.state().lamps().is_all_red());
}

#[test]
fn pedestrian_variant_full_cycle() {
    let mut sup = pedestrian_preferred();
    detect(&mut sup, true, false);
    tick(&mut sup, 2);
    assert_eq!(at(&sup), (Phase::VehicleGreen, Countdown::Finite(15)));

    // Still vehicles: extend.
    tick(&mut sup, 15);
    assert_eq!(at(&sup), (Phase::VehicleGreen, Countdown::Finite(15)));

    sup.dispatch(ControlEvent::ClearDetections);
    tick(&mut sup, 15);
    assert_eq!(at(&sup), (Phase::VehicleYellow, Countdown::Finite(3)));
    tick(&mut sup, 3);
    assert_eq!(at(&sup), (Phase::AllRedSafety2, Countdown::Finite(2)));
    tick(&mut sup, 2);
    assert_eq!(at(&sup), (Phase::PedestrianGreen, Countdown::Indefinite));
}

#[test]
fn pedestrian_demand_skips_amber_in_pedestrian_variant() {
    let mut sup = pedestrian_preferred();
    detect(&mut sup, true, false);
    tick(&mut sup, 2);
    detect(&mut sup, false, true);
    tick(&mut sup, 15);
    assert_eq!(at(&sup), (Phase::AllRedSafety2, Countdown::Finite(2)));
}

#[test]
fn pedestrian_hold_ignores_pedestrian_only_updates() {
    let mut sup = pedestrian_preferred();
    detect(&mut sup, false, true);
    tick(&mut sup, 20);
    assert_eq!(at(&sup), (Phase::PedestrianGreen, Countdown::Indefinite));
}

#[test]
fn variant_follows_preference_at_entry_only() {
    let mut sup = vehicle_preferred();
    sup.dispatch(ControlEvent::UpdateConfiguration(TimingConfig::new(
        15,
        10,
        3,
        2,
        GreenLinePreference::Pedestrian,
    )));
    assert_eq!(sup.state().phase(), Phase::VehicleGreen);

    detect(&mut sup, true, false);
    assert_eq!(sup.state().phase(), Phase::VehicleGreen);

    sup.dispatch(ControlEvent::SetMode(Mode::Automatic));
    assert_eq!(at(&sup), (Phase::PedestrianGreen, Countdown::Indefinite));
}
