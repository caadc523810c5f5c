//! Property tests: safety holds for arbitrary event streams and timings.

use proptest::prelude::*;

use crosswalk_common::consts::MIN_OVERRIDE_TICKS;
use crosswalk_common::signal::command::{ControlEvent, OverrideRequest};
use crosswalk_common::signal::config::{GreenLinePreference, TimingConfig};
use crosswalk_common::signal::state::{
    Countdown, DetectionState, LampPair, Mode, PedestrianLight, TimerPurpose, VehicleLight,
};
use crosswalk_control_unit::supervisor::Supervisor;

prop_compose! {
    fn arbitrary_timing()(
        car_green in -2i64..20,
        ped_green in -2i64..20,
        yellow in -2i64..8,
        all_red_safety in -2i64..5,
        pedestrian_preferred in any::<bool>(),
    ) -> TimingConfig {
        let preference = if pedestrian_preferred {
            GreenLinePreference::Pedestrian
        } else {
            GreenLinePreference::Vehicle
        };
        TimingConfig::new(car_green, ped_green, yellow, all_red_safety, preference)
    }
}

fn arbitrary_mode() -> impl Strategy<Value = Mode> {
    prop_oneof![Just(Mode::Automatic), Just(Mode::Manual), Just(Mode::Override)]
}

fn arbitrary_request() -> impl Strategy<Value = OverrideRequest> {
    prop_oneof![
        Just(OverrideRequest::Vehicle(VehicleLight::Red)),
        Just(OverrideRequest::Vehicle(VehicleLight::Yellow)),
        Just(OverrideRequest::Vehicle(VehicleLight::Green)),
        Just(OverrideRequest::Pedestrian(PedestrianLight::Red)),
        Just(OverrideRequest::Pedestrian(PedestrianLight::Green)),
    ]
}

fn arbitrary_event() -> impl Strategy<Value = ControlEvent> {
    prop_oneof![
        12 => Just(ControlEvent::Tick),
        4 => (any::<bool>(), any::<bool>())
            .prop_map(|(v, p)| ControlEvent::DetectionUpdate(DetectionState::new(v, p))),
        1 => Just(ControlEvent::ClearDetections),
        1 => arbitrary_mode().prop_map(ControlEvent::SetMode),
        1 => arbitrary_request().prop_map(ControlEvent::RequestOverride),
        1 => arbitrary_timing().prop_map(ControlEvent::UpdateConfiguration),
    ]
}

fn vehicle_lit(lamps: LampPair) -> bool {
    lamps.vehicle != VehicleLight::Red
}

fn pedestrian_lit(lamps: LampPair) -> bool {
    lamps.pedestrian == PedestrianLight::Green
}

fn is_sequencing_event(event: &ControlEvent) -> bool {
    matches!(
        event,
        ControlEvent::Tick | ControlEvent::DetectionUpdate(_) | ControlEvent::ClearDetections
    )
}

proptest! {
    #[test]
    fn invariants_hold_after_every_event(
        timing in arbitrary_timing(),
        initial in prop_oneof![Just(Mode::Automatic), Just(Mode::Manual)],
        events in prop::collection::vec(arbitrary_event(), 0..300),
    ) {
        let mut sup = Supervisor::new(timing, initial);
        prop_assert!(sup.check_invariants().is_ok());

        for event in events {
            sup.dispatch(event);
            let state = sup.state();
            prop_assert!(state.lamps().is_exclusive(), "{event}: {:?}", state.lamps());
            prop_assert!(
                sup.check_invariants().is_ok(),
                "{event}: {:?}",
                sup.check_invariants()
            );
        }
    }

    #[test]
    fn opposite_greens_are_separated_outside_override(
        timing in arbitrary_timing(),
        events in prop::collection::vec(arbitrary_event(), 0..300),
    ) {
        let mut sup = Supervisor::new(timing, Mode::Automatic);

        for event in events {
            let before = sup.state().lamps();
            let report = sup.dispatch(event);
            let after = sup.state().lamps();

            if !is_sequencing_event(&event)
                || report.mode_changed()
                || report.mode_after == Mode::Override
            {
                continue;
            }
            prop_assert!(
                !(vehicle_lit(before) && pedestrian_lit(after)),
                "{event}: {before:?} -> {after:?}"
            );
            prop_assert!(
                !(pedestrian_lit(before) && vehicle_lit(after)),
                "{event}: {before:?} -> {after:?}"
            );
        }
    }

    #[test]
    fn override_hold_is_floored_for_any_timing(
        timing in arbitrary_timing(),
        initial in prop_oneof![Just(Mode::Automatic), Just(Mode::Manual)],
        request in arbitrary_request(),
    ) {
        let mut sup = Supervisor::new(timing, initial);
        sup.dispatch(ControlEvent::RequestOverride(request));

        let state = sup.state();
        prop_assert_eq!(state.mode(), Mode::Override);
        prop_assert_eq!(state.previous_mode(), Some(initial));
        prop_assert_eq!(state.timer().purpose, TimerPurpose::Override);
        match state.timer().remaining {
            Countdown::Finite(n) => prop_assert!(n >= MIN_OVERRIDE_TICKS),
            Countdown::Indefinite => prop_assert!(false, "override hold must be finite"),
        }
    }

    #[test]
    fn override_always_resumes_a_running_mode(
        timing in arbitrary_timing(),
        initial in prop_oneof![Just(Mode::Automatic), Just(Mode::Manual)],
        requests in prop::collection::vec(arbitrary_request(), 1..4),
    ) {
        let mut sup = Supervisor::new(timing, initial);
        for request in requests {
            sup.dispatch(ControlEvent::RequestOverride(request));
        }

        let mut guard = 0u32;
        while sup.state().mode() == Mode::Override {
            sup.dispatch(ControlEvent::Tick);
            guard += 1;
            prop_assert!(guard <= 64, "override never expired");
        }
        prop_assert_eq!(sup.state().mode(), initial);
    }
}
