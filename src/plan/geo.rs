use aviation_calc_util::geo::GeoPoint;

use super::waypoint::PointOfInterest;

fn to_geo_point(point: &PointOfInterest) -> GeoPoint {
    // Altitude is left out so distances stay on the surface.
    GeoPoint::from_degs_and_ft(point.lat, point.lon, 0_f64)
}

/// Great-circle distance in meters.
pub fn distance_m(from: &PointOfInterest, to: &PointOfInterest) -> f64 {
    (to_geo_point(to) - to_geo_point(from)).as_meters()
}

/// Initial great-circle bearing in degrees, normalized to `[0, 360)`.
pub fn initial_bearing_deg(from: &PointOfInterest, to: &PointOfInterest) -> f64 {
    if from == to {
        return 0_f64;
    }
    let bearing = GeoPoint::initial_bearing(&to_geo_point(from), &to_geo_point(to));
    let degrees = bearing.as_degrees().rem_euclid(360_f64);
    if degrees >= 360_f64 { 0_f64 } else { degrees }
}

/// Center of the lat/lon bounding box, `None` for an empty input.
pub fn center_of_bounds<'a>(points: impl IntoIterator<Item = &'a PointOfInterest>) -> Option<PointOfInterest> {
    let mut iter = points.into_iter();
    let first = iter.next()?;
    let (mut min_lat, mut max_lat, mut min_lon, mut max_lon) = (first.lat, first.lat, first.lon, first.lon);

    for pt in iter {
        min_lat = min_lat.min(pt.lat);
        max_lat = max_lat.max(pt.lat);
        min_lon = min_lon.min(pt.lon);
        max_lon = max_lon.max(pt.lon);
    }

    Some(PointOfInterest::new((min_lat + max_lat) / 2_f64, (min_lon + max_lon) / 2_f64))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_one_degree_latitude() {
        let a = PointOfInterest::new(47.0, 8.0);
        let b = PointOfInterest::new(48.0, 8.0);
        let dist = distance_m(&a, &b);
        assert!((dist - 111_195_f64).abs() < 500_f64, "unexpected distance {dist}");
    }

    #[test]
    fn test_cardinal_bearings() {
        let origin = PointOfInterest::new(0.0, 0.0);
        let north = initial_bearing_deg(&origin, &PointOfInterest::new(1.0, 0.0));
        let east = initial_bearing_deg(&origin, &PointOfInterest::new(0.0, 1.0));
        let south = initial_bearing_deg(&origin, &PointOfInterest::new(-1.0, 0.0));
        let west = initial_bearing_deg(&origin, &PointOfInterest::new(0.0, -1.0));

        assert!(north < 0.01 || north > 359.99);
        assert!((east - 90.0).abs() < 0.01);
        assert!((south - 180.0).abs() < 0.01);
        assert!((west - 270.0).abs() < 0.01);
    }

    #[test]
    fn test_center_of_bounds() {
        let pts = vec![
            PointOfInterest::new(47.0, 8.0),
            PointOfInterest::new(47.002, 8.004),
            PointOfInterest::new(47.001, 8.001),
        ];
        let center = center_of_bounds(&pts).unwrap();
        assert!((center.lat - 47.001).abs() < 1e-9);
        assert!((center.lon - 8.002).abs() < 1e-9);

        assert!(center_of_bounds(&Vec::new()).is_none());
    }
}
