use spacetime_diagram::relativity::{LorentzTransform, SpeedOfLight};
use spacetime_diagram::store;
use spacetime_diagram::{
    ObjectList, ObserverFrame, RelativityError, SpacetimeEntity, SpacetimeEvent, SpacetimeTraveller,
};

fn frame(beta: f64) -> ObserverFrame {
    ObserverFrame::with_transform(beta, LorentzTransform::new(SpeedOfLight::Normalized)).unwrap()
}

#[test]
fn test_traveller_foo_seen_from_rest() {
    let foo = SpacetimeTraveller::new("foo", 0.1, 0.0, 0.0).unwrap();
    let rest = frame(0.0);
    assert_eq!(foo.beta(&rest), 0.1);
    assert_eq!(foo.event().x(&rest), 0.0);
    assert_eq!(foo.event().t(&rest), 0.0);
    assert_eq!(foo.x_intercept(&rest), 0.0);
}

#[test]
fn test_event_baz_moves_in_x_only() {
    let mut baz = SpacetimeEvent::new("baz", 50.0, -50.0);
    let rest = frame(0.0);
    assert_eq!(baz.x(&rest), -50.0);
    assert_eq!(baz.t(&rest), 50.0);
    baz.set_x(&rest, -100.0);
    assert_eq!(baz.x(&rest), -100.0);
    assert_eq!(baz.t(&rest), 50.0);
}

#[test]
fn test_rejected_velocity_keeps_prior_value() {
    let mut ship = SpacetimeTraveller::new("ship", -0.3, 1.0, 1.0).unwrap();
    for observer in [-0.9, -0.5, 0.0, 0.4, 0.95] {
        let frame = frame(observer);
        let before = ship.beta(&frame);
        // observing light speed in any frame means light speed in the rest frame
        for observed in [1.0, -1.0, 2.5] {
            assert!(matches!(
                ship.set_beta(&frame, observed),
                Err(RelativityError::InvalidVelocity { .. })
            ));
            assert_eq!(ship.rest_beta(), -0.3);
            assert_eq!(ship.set_beta_or_current(&frame, observed), before);
        }
    }
}

#[test]
fn test_edits_in_moving_frame_survive_frame_changes() {
    let moving = frame(0.6);
    let mut ship = SpacetimeEntity::traveller("ship", 0.0, 0.0, 0.0).unwrap();
    ship.set_x(&moving, 3.0);
    assert!((ship.x(&moving) - 3.0).abs() < 1e-9);
    let rest_t = ship.rest_t();

    // setting t keeps the rest-frame position, not the observed one
    ship.set_t(&moving, 4.0);
    assert!((ship.t(&moving) - 4.0).abs() < 1e-9);
    assert_ne!(ship.rest_t(), rest_t);

    ship.as_traveller_mut().unwrap().set_beta(&moving, -0.2).unwrap();
    assert!((ship.as_traveller().unwrap().beta(&moving) + 0.2).abs() < 1e-9);

    // the rest frame sees consistent values, and viewing never mutates
    let rest = frame(0.0);
    let rest_x = ship.x(&rest);
    assert_eq!(ship.x(&rest), rest_x);
    assert_eq!(rest_x, ship.rest_x());
}

#[test]
fn test_placing_event_in_moving_frame_survives_save() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("placed.diagram");
    let moving = ObserverFrame::with_transform(0.6, LorentzTransform::new(SpeedOfLight::Exact)).unwrap();

    let mut objects = ObjectList::new();
    objects.push(SpacetimeEntity::event("flash", 0.0, 0.0));
    objects.get_mut(0).unwrap().set_position(&moving, 3.0e8, 4.0);
    store::save(&path, &objects).unwrap();

    let loaded = store::load(&path).unwrap();
    let flash = loaded.get(0).unwrap();
    assert!((flash.x(&moving) - 3.0e8).abs() < 1e-3);
    assert!((flash.t(&moving) - 4.0).abs() < 1e-9);
}

#[test]
fn test_diagram_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("twins.diagram");

    let mut objects = ObjectList::new();
    objects.push(SpacetimeEntity::event("departure", 0.0, 0.0));
    objects.push(SpacetimeEntity::traveller("stay-at-home", 0.0, 0.0, 0.0).unwrap());
    objects.push(SpacetimeEntity::traveller("rocket", 0.8, 0.0, 0.0).unwrap());
    objects.push(SpacetimeEntity::event("turnaround, far away", 5.0, 4.0));
    store::save(&path, &objects).unwrap();

    let loaded = store::load(&path).unwrap();
    assert_eq!(loaded.len(), objects.len());
    let moving = frame(0.3);
    for (a, b) in objects.iter().zip(loaded.iter()) {
        assert_eq!(a.name(), b.name());
        assert_eq!(a.kind(), b.kind());
        assert_eq!(a.x(&moving), b.x(&moving));
        assert_eq!(a.t(&moving), b.t(&moving));
        assert_eq!(
            a.as_traveller().map(SpacetimeTraveller::rest_beta),
            b.as_traveller().map(SpacetimeTraveller::rest_beta)
        );
    }
}

#[test]
fn test_observer_frame_validation() {
    let lt = LorentzTransform::new(SpeedOfLight::Normalized);
    assert_eq!(
        ObserverFrame::with_transform(1.0, lt),
        Err(RelativityError::InvalidObserverFrame { beta: 1.0 })
    );
}
