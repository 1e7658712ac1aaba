use crate::types::{LandmarkSet, Point2D};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DistanceSample {
    pub point_a: Point2D,
    pub point_b: Point2D,
    pub distance: f32,
    pub midpoint: Point2D,
}

/// Euclidean distance and midpoint between two pixel positions.
///
/// The midpoint uses floor division (rounds toward negative infinity) on
/// each axis, so it is always a reproducible pixel coordinate.
pub fn distance(point_a: Point2D, point_b: Point2D) -> DistanceSample {
    let dx = (point_b.x as f64) - (point_a.x as f64);
    let dy = (point_b.y as f64) - (point_a.y as f64);

    DistanceSample {
        point_a,
        point_b,
        distance: dx.hypot(dy) as f32,
        midpoint: Point2D {
            x: floor_mid(point_a.x, point_b.x),
            y: floor_mid(point_a.y, point_b.y),
        },
    }
}

/// Distance between two landmarks of the same hand.
pub fn landmark_distance(hand: &LandmarkSet, a: usize, b: usize) -> DistanceSample {
    distance(hand.point(a), hand.point(b))
}

/// Distance between landmark `index` on two different hands.
pub fn cross_hand_distance(
    first: &LandmarkSet,
    second: &LandmarkSet,
    index: usize,
) -> DistanceSample {
    distance(first.point(index), second.point(index))
}

fn floor_mid(a: i32, b: i32) -> i32 {
    // i64 keeps the sum exact; the result always fits back into i32.
    (a as i64 + b as i64).div_euclid(2) as i32
}
