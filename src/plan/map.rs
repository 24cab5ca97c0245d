use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value};

use super::{Flightplan, PointOfInterest, Waypoint};

fn point_feature(lat: f64, lon: f64, props_map: JsonObject) -> Feature {
    Feature {
        id: None,
        bbox: None,
        foreign_members: None,
        geometry: Some(Geometry::new(Value::Point(vec![lon, lat]))),
        properties: Some(props_map),
    }
}

fn role(role: &str) -> JsonObject {
    let mut props_map = JsonObject::new();
    props_map.insert("role".to_string(), role.into());
    props_map
}

fn waypoint_props(role_name: &str, wp: &Waypoint) -> JsonObject {
    let mut props_map = role(role_name);
    props_map.insert("altitude".to_string(), wp.altitude.into());
    props_map.insert("orientation".to_string(), wp.orientation.into());
    props_map.insert("radius".to_string(), wp.radius.into());
    props_map
}

impl Flightplan {
    /// Route, endpoints and points of interest as GeoJSON, `[lon, lat]` ordered.
    pub fn to_geojson(&self) -> FeatureCollection {
        let mut features = Vec::with_capacity(self.waypoints.len() + self.points_of_interest.len() + 3);

        let line = self.path().map(|wp| vec![wp.longitude, wp.latitude]).collect::<Vec<Vec<f64>>>();
        if line.len() >= 2 {
            let mut props_map = role("route");
            props_map.insert("name".to_string(), self.name.clone().into());
            features.push(Feature {
                id: None,
                bbox: None,
                foreign_members: None,
                geometry: Some(Geometry::new(Value::LineString(line))),
                properties: Some(props_map),
            });
        }

        if let Some(wp) = &self.take_off_position {
            features.push(point_feature(wp.latitude, wp.longitude, waypoint_props("takeOff", wp)));
        }
        if let Some(wp) = &self.touch_down_position {
            features.push(point_feature(wp.latitude, wp.longitude, waypoint_props("touchDown", wp)));
        }

        for (index, wp) in self.waypoints.iter().enumerate() {
            let mut props_map = waypoint_props("waypoint", wp);
            props_map.insert("index".to_string(), index.into());
            features.push(point_feature(wp.latitude, wp.longitude, props_map));
        }

        for (index, PointOfInterest { lat, lon }) in self.points_of_interest.iter().enumerate() {
            let mut props_map = role("pointOfInterest");
            props_map.insert("index".to_string(), index.into());
            features.push(point_feature(*lat, *lon, props_map));
        }

        FeatureCollection {
            bbox: None,
            features,
            foreign_members: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geojson_features() {
        let mut plan = Flightplan::from_kmz("<coordinates>\n8.0,47.0,5 8.001,47.001,6 8.002,47.002,7\n", "route", 0.0, 2.0).unwrap();
        plan.add_point_of_interest(PointOfInterest::new(47.0005, 8.0005)).unwrap();

        let collection = plan.to_geojson();
        // route + take-off + touch-down + 3 waypoints + 1 poi
        assert_eq!(collection.features.len(), 7);

        let route = &collection.features[0];
        match route.geometry.as_ref().map(|g| &g.value) {
            Some(Value::LineString(coords)) => {
                assert_eq!(coords.len(), 5);
                assert_eq!(coords[0], vec![8.0, 47.0]);
            }
            other => panic!("unexpected route geometry {other:?}"),
        }

        let poi = collection.features.last().unwrap();
        assert_eq!(poi.property("role").and_then(|v| v.as_str()), Some("pointOfInterest"));
    }

    #[test]
    fn test_empty_plan_has_no_features() {
        assert!(Flightplan::new().to_geojson().features.is_empty());
    }
}
