use geo::{Area, BoundingRect, MultiPoint, coord};
use proximity_search::compute::geometry::{approx_eq, distance_sq};
use proximity_search::{
    ConvexHull, Coord, HullKind, MinBoxMethod, Tolerances, oriented_bounding_box,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::f64::consts::PI;

fn random_coords(seed: u64, n: usize) -> Vec<Coord<f64>> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..n)
        .map(|_| coord! { x: rng.random_range(-50.0..50.0), y: rng.random_range(-20.0..20.0) })
        .collect()
}

#[test]
fn test_hull_and_box_contain_every_point() {
    let tolerances = Tolerances::default();

    for seed in 0..20 {
        let points = random_coords(seed, 200);
        let hull = ConvexHull::new(&points, tolerances.collinear);
        assert_eq!(hull.kind(), HullKind::Planar);

        for method in [MinBoxMethod::RotatingCalipers, MinBoxMethod::Exhaustive] {
            let obb = oriented_bounding_box(&points, method, &tolerances);
            for &p in &points {
                assert!(hull.contains(p), "seed {} hull misses {:?}", seed, p);
                assert!(obb.contains(p), "seed {} {:?} box misses {:?}", seed, method, p);
            }
        }
    }
}

#[test]
fn test_box_methods_agree() {
    let tolerances = Tolerances::default();

    for seed in 100..130 {
        let points = random_coords(seed, 80);
        let calipers = oriented_bounding_box(&points, MinBoxMethod::RotatingCalipers, &tolerances);
        let exhaustive = oriented_bounding_box(&points, MinBoxMethod::Exhaustive, &tolerances);
        let diff = (calipers.area() - exhaustive.area()).abs();
        assert!(
            diff <= 1e-9 * exhaustive.area(),
            "seed {}: {} vs {}",
            seed,
            calipers.area(),
            exhaustive.area()
        );
    }
}

#[test]
fn test_box_never_larger_than_axis_aligned() {
    let tolerances = Tolerances::default();

    for seed in 200..220 {
        let points = random_coords(seed, 60);
        let aabb = MultiPoint::from(points.clone())
            .bounding_rect()
            .expect("non-empty");
        let obb = oriented_bounding_box(&points, MinBoxMethod::RotatingCalipers, &tolerances);
        assert!(obb.area() <= aabb.unsigned_area() * (1.0 + 1e-12));
    }
}

#[test]
fn test_rotated_rectangle_is_recovered() {
    // A 4 x 1 rectangle rotated by 30 degrees, with interior points.
    let (sin, cos) = (PI / 6.0).sin_cos();
    let rotate = |x: f64, y: f64| coord! { x: 10.0 + x * cos - y * sin, y: -3.0 + x * sin + y * cos };

    let mut points = vec![
        rotate(0.0, 0.0),
        rotate(4.0, 0.0),
        rotate(4.0, 1.0),
        rotate(0.0, 1.0),
    ];
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    for _ in 0..50 {
        points.push(rotate(rng.random_range(0.1..3.9), rng.random_range(0.1..0.9)));
    }

    let tolerances = Tolerances::default();
    for method in [MinBoxMethod::RotatingCalipers, MinBoxMethod::Exhaustive] {
        let obb = oriented_bounding_box(&points, method, &tolerances);
        assert!((obb.area() - 4.0).abs() < 1e-9, "{:?}: {}", method, obb.area());
        assert!((obb.short_side() - 1.0).abs() < 1e-9);
        assert!((obb.center.x - rotate(2.0, 0.5).x).abs() < 1e-9);
        assert!((obb.center.y - rotate(2.0, 0.5).y).abs() < 1e-9);
    }
}

#[test]
fn test_points_on_circle_are_all_vertices() {
    let points: Vec<Coord<f64>> = (0..64)
        .map(|i| {
            let angle = 2.0 * PI * i as f64 / 64.0;
            coord! { x: 5.0 * angle.cos(), y: 5.0 * angle.sin() }
        })
        .collect();

    let hull = ConvexHull::new(&points, Tolerances::default().collinear);
    assert_eq!(hull.kind(), HullKind::Planar);
    assert_eq!(hull.len(), 64);

    // Counterclockwise: positive signed area.
    assert!(hull.to_polygon().signed_area() > 0.0);
}

#[test]
fn test_degenerate_hulls() {
    let line: Vec<Coord<f64>> = [(3.0, 1.5), (0.0, 0.0), (1.0, 0.5), (2.0, 1.0)]
        .into_iter()
        .map(Coord::from)
        .collect();
    let hull = ConvexHull::new(&line, 1e-6);
    assert_eq!(hull.kind(), HullKind::Linear);
    assert_eq!(hull.vertices(), &[coord! { x: 0.0, y: 0.0 }, coord! { x: 3.0, y: 1.5 }]);

    let same = vec![coord! { x: 1.0, y: 1.0 }; 5];
    let hull = ConvexHull::new(&same, 1e-6);
    assert_eq!(hull.kind(), HullKind::Point);
    assert_eq!(hull.len(), 1);

    let hull = ConvexHull::new(&[], 1e-6);
    assert_eq!(hull.kind(), HullKind::Point);
    assert!(hull.is_empty());
}

#[test]
fn test_degenerate_boxes_have_zero_short_side() {
    let tolerances = Tolerances::default();
    let method = MinBoxMethod::RotatingCalipers;

    let diagonal: Vec<Coord<f64>> = (0..10).map(|i| coord! { x: i as f64, y: i as f64 }).collect();
    let obb = oriented_bounding_box(&diagonal, method, &tolerances);
    assert_eq!(obb.short_side(), 0.0);
    assert!((obb.side_lengths()[0] - 9.0 * 2f64.sqrt()).abs() < 1e-9);

    let vertical: Vec<Coord<f64>> = (0..10).map(|i| coord! { x: 4.0, y: i as f64 }).collect();
    let obb = oriented_bounding_box(&vertical, method, &tolerances);
    assert_eq!(obb.short_side(), 0.0);
    assert_eq!(obb.side_lengths()[0], 9.0);

    let single = [coord! { x: 1.0, y: 2.0 }];
    let obb = oriented_bounding_box(&single, method, &tolerances);
    assert_eq!(obb.area(), 0.0);
    assert_eq!(obb.center, single[0]);
}

#[test]
fn test_approx_eq_is_relative() {
    assert!(approx_eq(1000.0, 1000.5, 1e-3));
    assert!(!approx_eq(1.0, 1.5, 1e-3));
    assert!(approx_eq(0.0, 0.0, 1e-3));
    assert!(approx_eq(1.0e12, 1.0e12 + 9.0, 1e-3));
}

#[test]
fn test_distance_sq() {
    let a = coord! { x: 1.0, y: 2.0 };
    let b = coord! { x: 4.0, y: 6.0 };
    assert_eq!(distance_sq(a, b), 25.0);
    assert_eq!(distance_sq(b, a), 25.0);
    assert_eq!(distance_sq(a, a), 0.0);
}
