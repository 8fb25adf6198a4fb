use std::f64::consts::PI;

/// Fraction of the requested length used for the arrow shaft
pub const SHAFT_FRACTION: f64 = 0.75;

/// Barb length relative to the shaft length
pub const BARB_FRACTION: f64 = 0.3;

/// Angle between the reversed shaft and each barb, in degrees
pub const BARB_ANGLE_DEG: f64 = 30.0;

/// A point in screen coordinates (y grows downwards)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Point {
        Point { x, y }
    }
}

/// Wind direction arrow, the shaft runs from origin to shaft_end where both barbs are anchored
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Arrow {
    pub origin: Point,
    pub shaft_end: Point,
    pub barb_left: Point,
    pub barb_right: Point,
}

impl Arrow {
    /// Returns the arrow moved so that the middle of its shaft lands on the given point
    ///
    /// # Arguments
    ///
    /// * 'x' - x of the new shaft midpoint
    /// * 'y' - y of the new shaft midpoint
    pub fn centred_on(&self, x: f64, y: f64) -> Arrow {
        let dx = x - (self.origin.x + self.shaft_end.x) / 2.0;
        let dy = y - (self.origin.y + self.shaft_end.y) / 2.0;
        let shift = |p: Point| Point::new(p.x + dx, p.y + dy);

        Arrow {
            origin: shift(self.origin),
            shaft_end: shift(self.shaft_end),
            barb_left: shift(self.barb_left),
            barb_right: shift(self.barb_right),
        }
    }
}

/// Computes the shaft end and the two barb points of a direction arrow
///
/// Bearing is measured clockwise from vertical-up, so 0 points up and 90 points right.
///
/// # Arguments
///
/// * 'origin_x' - x of the shaft start
/// * 'origin_y' - y of the shaft start
/// * 'length' - nominal arrow length
/// * 'bearing_deg' - the bearing in degrees
pub fn compute_arrow(origin_x: f64, origin_y: f64, length: f64, bearing_deg: f64) -> Arrow {
    let angle = (bearing_deg - 90.0) * PI / 180.0;
    let shaft_len = SHAFT_FRACTION * length;
    let (dir_x, dir_y) = (angle.cos(), angle.sin());

    let shaft_end = Point::new(origin_x + shaft_len * dir_x, origin_y + shaft_len * dir_y);

    let barb_len = BARB_FRACTION * shaft_len;
    let barb = |rotation_deg: f64| {
        let r = rotation_deg * PI / 180.0;
        let (bx, by) = (-dir_x, -dir_y);
        let rx = bx * r.cos() - by * r.sin();
        let ry = bx * r.sin() + by * r.cos();
        Point::new(shaft_end.x + barb_len * rx, shaft_end.y + barb_len * ry)
    };

    Arrow {
        origin: Point::new(origin_x, origin_y),
        shaft_end,
        barb_left: barb(-BARB_ANGLE_DEG),
        barb_right: barb(BARB_ANGLE_DEG),
    }
}
