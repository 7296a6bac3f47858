use super::*;
use drift_model::Planar;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const EPS: f64 = 1e-9;

// =============================================================================
// Helpers
// =============================================================================

fn trace(points: &[(f64, f64)]) -> Trace {
    Trace::new(
        points.iter().map(|&(lat, lon)| Point::new(lat, lon)).collect(),
        CoordinateSystem::Wgs84,
    )
}

fn zigzag() -> Trace {
    trace(&[
        (0.0, 0.0),
        (0.0, 3.0),
        (4.0, 3.0),
        (4.0, 3.0), // zero-length segment
        (4.0, 0.0),
        (1.0, 0.0),
    ])
}

fn random_trace(seed: u64, len: usize) -> Trace {
    let mut rng = StdRng::seed_from_u64(seed);
    trace(
        &(0..len)
            .map(|_| (rng.random_range(-10.0..10.0), rng.random_range(-10.0..10.0)))
            .collect::<Vec<_>>(),
    )
}

fn progress_steps(n: usize) -> impl Iterator<Item = f64> {
    (0..=n).map(move |i| i as f64 / n as f64)
}

/// Distance from the first point when walking the polyline up to `pos`
fn walked_distance(interp: &TraceInterpolator, pos: &TracePosition) -> f64 {
    interp.cumulative[pos.index] + Planar.distance(&interp.points[pos.index], &pos.point)
}

// =============================================================================
// Degenerate traces
// =============================================================================

#[test]
fn test_empty_trace_yields_zero_point() {
    let interp = TraceInterpolator::new(&Trace::default(), &Planar);
    for p in [-1.0, 0.0, 0.5, 1.0, 2.0] {
        assert_eq!(interp.at(p, None).point, Point::zero(CoordinateSystem::Wgs84));
    }
}

#[test]
fn test_single_point_trace() {
    let interp = TraceInterpolator::new(&trace(&[(3.0, 4.0)]), &Planar);
    for p in [0.0, 0.3, 1.0] {
        assert_eq!(interp.at(p, None).point, Point::new(3.0, 4.0));
    }
}

#[test]
fn test_zero_length_trace_stays_at_start() {
    let interp = TraceInterpolator::new(&trace(&[(1.0, 1.0), (1.0, 1.0)]), &Planar);
    assert_eq!(interp.length(), 0.0);
    assert_eq!(interp.at(0.5, None).point, Point::new(1.0, 1.0));
}

// =============================================================================
// Boundaries
// =============================================================================

#[test]
fn test_clamps_outside_unit_interval() {
    let interp = TraceInterpolator::new(&zigzag(), &Planar);
    assert_eq!(interp.at(-0.5, None).point, Point::new(0.0, 0.0));
    assert_eq!(interp.at(0.0, None).point, Point::new(0.0, 0.0));
    assert_eq!(interp.at(1.0, None).point, Point::new(1.0, 0.0));
    assert_eq!(interp.at(1.7, None).point, Point::new(1.0, 0.0));
    assert_eq!(interp.at(f64::NAN, None).point, Point::new(0.0, 0.0));
}

#[test]
fn test_two_point_midpoint() {
    let interp = TraceInterpolator::new(&trace(&[(0.0, 0.0), (0.0, 1.0)]), &Planar);
    let pos = interp.at(0.25, None);
    assert!((pos.point.longitude - 0.25).abs() < EPS);
    assert_eq!(pos.point.latitude, 0.0);
    assert_eq!(pos.index, 0);
}

// =============================================================================
// Properties
// =============================================================================

#[test]
fn test_point_lies_on_polyline_at_target_distance() {
    for t in [zigzag(), random_trace(1, 20), random_trace(2, 50)] {
        let interp = TraceInterpolator::new(&t, &Planar);
        let total = interp.length();

        for p in progress_steps(200) {
            let pos = interp.at(p, None);
            let a = &interp.points[pos.index];
            let b = &interp.points[pos.index + 1];

            // On the segment: |ap| + |pb| == |ab|
            let on_segment =
                Planar.distance(a, &pos.point) + Planar.distance(&pos.point, b) - Planar.distance(a, b);
            assert!(on_segment.abs() < 1e-7, "p={p} off polyline by {on_segment}");

            let walked = walked_distance(&interp, &pos);
            assert!((walked - p * total).abs() < 1e-7, "p={p} walked={walked}");
        }
    }
}

#[test]
fn test_pure_function_of_progress() {
    let interp = TraceInterpolator::new(&random_trace(3, 30), &Planar);
    for p in progress_steps(50) {
        assert_eq!(interp.at(p, None), interp.at(p, None));
    }
}

#[test]
fn test_resumed_matches_fresh() {
    for t in [zigzag(), random_trace(4, 40)] {
        let interp = TraceInterpolator::new(&t, &Planar);
        let mut previous: Option<TracePosition> = None;

        for p in progress_steps(333) {
            let resumed = interp.at(p, previous.as_ref());
            let fresh = interp.at(p, None);
            assert_eq!(resumed, fresh, "drift at p={p}");
            previous = Some(resumed);
        }
    }
}

#[test]
fn test_resume_after_regression_falls_back_to_search() {
    let interp = TraceInterpolator::new(&zigzag(), &Planar);
    let late = interp.at(0.9, None);
    let early = interp.at(0.1, Some(&late));
    assert_eq!(early, interp.at(0.1, None));
}

#[test]
fn test_resume_from_foreign_position() {
    let interp = TraceInterpolator::new(&zigzag(), &Planar);
    let foreign = TracePosition {
        point: Point::new(0.0, 0.0),
        index: 99,
        progress: 0.0,
    };
    assert_eq!(interp.at(0.5, Some(&foreign)), interp.at(0.5, None));
}

#[test]
fn test_skips_zero_length_segment() {
    let interp = TraceInterpolator::new(&zigzag(), &Planar);
    // Cumulative: 0, 3, 7, 7, 10, 13
    let pos = interp.at(7.0 / 13.0, None);
    assert_ne!(pos.index, 2);
    assert!((pos.point.latitude - 4.0).abs() < EPS);
    assert!((pos.point.longitude - 3.0).abs() < EPS);
}
