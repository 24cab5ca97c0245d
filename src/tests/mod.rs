use std::{cell::RefCell, rc::Rc};

use crate::plan::{ChangeStream, Flightplan, Waypoint};


const SCENARIO_MAVLINK: &str = "QGC WPL 120 test\n0\t0\t3\t22\t0\t0\t0\t10\t47.0\t8.0\t5\t1\n1\t0\t3\t16\t1\t2\t0\t20\t47.001\t8.001\t6\t1\n2\t0\t3\t21\t0\t0\t0\t30\t47.002\t8.002\t7\t1";

const SCENARIO_KMZ: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<kml xmlns=\"http://www.opengis.net/kml/2.2\">\n<Document><Placemark><name>route</name>\n<LineString>\n<coordinates>\n8.0,47.0,5 8.001,47.001,6 8.002,47.002,7\n</coordinates>\n</LineString>\n</Placemark></Document>\n</kml>\n";

/// A valid plan with two route legs of roughly 110 m each.
fn survey_plan() -> Flightplan {
    let mut plan = Flightplan::new();
    plan.set_name("survey").unwrap();
    plan.set_takeoff(Waypoint::new(47.0, 8.0, 0.0, 0.0, 0.0)).unwrap();
    plan.set_touchdown(Waypoint::new(47.0, 8.003, 0.0, 0.0, 0.0)).unwrap();
    plan.set_waypoints(vec![
        Waypoint::new(47.0, 8.0, 10.0, 90.0, 2.0),
        Waypoint::new(47.001, 8.0, 20.0, 180.0, 3.0),
        Waypoint::new(47.001, 8.0015, 20.0, 270.0, 1.0),
    ])
    .unwrap();
    plan
}

/// Records the streams of every event published by `plan`.
fn record_streams(plan: &mut Flightplan) -> Rc<RefCell<Vec<ChangeStream>>> {
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&log);
    plan.subscribe_all(move |event| sink.borrow_mut().push(event.stream()));
    log
}

fn assert_close(actual: f64, expected: f64, tolerance: f64) {
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {expected} +/- {tolerance}, got {actual}"
    );
}
