// Map/trail updater - marker and trail from the GPS track
use crate::application::widgets::MapWidget;
use crate::domain::dashboard::{GeoBounds, GeoPoint};
use crate::domain::telemetry::TrackPoint;

pub const FIT_PADDING_PX: u32 = 20;
pub const FALLBACK_ZOOM: u8 = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapOutcome {
    /// Marker at the end of a trail of this many points.
    Trail(usize),
    /// Only the latest fix was usable.
    LatestFix,
    /// Nothing usable this cycle; the map was left as it was.
    Unchanged,
}

/// Zero and missing coordinates are receiver placeholders, not positions.
fn usable(lat: Option<f64>, lon: Option<f64>) -> Option<GeoPoint> {
    match (lat, lon) {
        (Some(lat), Some(lon))
            if lat.is_finite() && lon.is_finite() && lat != 0.0 && lon != 0.0 =>
        {
            Some(GeoPoint::new(lat, lon))
        }
        _ => None,
    }
}

pub fn filter_track(track: &[TrackPoint]) -> Vec<GeoPoint> {
    track.iter().filter_map(|p| usable(p.lat, p.lon)).collect()
}

pub fn update_map(
    map: &mut dyn MapWidget,
    track: &[TrackPoint],
    latest: Option<(f64, f64)>,
) -> MapOutcome {
    let trail = filter_track(track);

    if let Some(last) = trail.last().copied() {
        let count = trail.len();
        let bounds = GeoBounds::enclosing(&trail);
        map.set_marker(last);
        map.set_trail(trail);
        if let Some(bounds) = bounds {
            map.fit_bounds(bounds, FIT_PADDING_PX);
        }
        return MapOutcome::Trail(count);
    }

    match latest {
        Some((lat, lon)) if lat.is_finite() && lon.is_finite() => {
            let position = GeoPoint::new(lat, lon);
            map.set_marker(position);
            map.set_trail(vec![position]);
            map.set_view(position, FALLBACK_ZOOM);
            MapOutcome::LatestFix
        }
        _ => MapOutcome::Unchanged,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::widgets::recording::{Call, RecordingFactory};
    use crate::application::widgets::WidgetFactory;

    fn point(lat: f64, lon: f64) -> TrackPoint {
        TrackPoint {
            ts: None,
            lat: Some(lat),
            lon: Some(lon),
        }
    }

    #[test]
    fn test_sentinel_points_are_filtered() {
        let track = vec![point(0.0, 0.0), point(12.1, 45.2)];
        assert_eq!(filter_track(&track), vec![GeoPoint::new(12.1, 45.2)]);

        let partial = vec![
            TrackPoint { ts: None, lat: Some(44.0), lon: None },
            point(44.0, 0.0),
            point(f64::NAN, 11.0),
        ];
        assert!(filter_track(&partial).is_empty());
    }

    #[test]
    fn test_trail_sets_marker_and_fits_bounds() {
        let mut factory = RecordingFactory::default();
        let mut map = factory.create_map("map");
        factory.clear();

        let track = vec![point(0.0, 0.0), point(45.0, 12.0), point(45.1, 12.2)];
        let outcome = update_map(map.as_mut(), &track, Some((1.0, 1.0)));
        assert_eq!(outcome, MapOutcome::Trail(2));

        let calls = factory.calls();
        assert_eq!(calls[0], Call::Marker(GeoPoint::new(45.1, 12.2)));
        assert_eq!(
            calls[1],
            Call::Trail(vec![GeoPoint::new(45.0, 12.0), GeoPoint::new(45.1, 12.2)])
        );
        assert_eq!(
            calls[2],
            Call::FitBounds(
                GeoBounds {
                    south_west: GeoPoint::new(45.0, 12.0),
                    north_east: GeoPoint::new(45.1, 12.2),
                },
                FIT_PADDING_PX
            )
        );
    }

    #[test]
    fn test_falls_back_to_latest_fix() {
        let mut factory = RecordingFactory::default();
        let mut map = factory.create_map("map");
        factory.clear();

        let outcome = update_map(map.as_mut(), &[point(0.0, 0.0)], Some((45.5, 9.1)));
        assert_eq!(outcome, MapOutcome::LatestFix);
        let position = GeoPoint::new(45.5, 9.1);
        assert_eq!(
            factory.calls(),
            vec![
                Call::Marker(position),
                Call::Trail(vec![position]),
                Call::SetView(position, FALLBACK_ZOOM),
            ]
        );
    }

    #[test]
    fn test_no_data_leaves_map_untouched() {
        let mut factory = RecordingFactory::default();
        let mut map = factory.create_map("map");
        factory.clear();

        assert_eq!(update_map(map.as_mut(), &[], None), MapOutcome::Unchanged);
        assert_eq!(
            update_map(map.as_mut(), &[], Some((f64::NAN, 9.0))),
            MapOutcome::Unchanged
        );
        assert!(factory.calls().is_empty());
    }
}
