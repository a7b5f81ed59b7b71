use crate::geometry::{Point, Rect};
use crate::target::Shape;
use strum::Display;

/// Where a pointer landed. Target wins over the outer circle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Hit {
    Target,
    OuterCircle,
    Outside,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitGeometry {
    pub target_bounds: Rect,
    pub shape: Shape,
    pub target_radius: f64,
    /// Radius the target rests at, used to scale ovals with the pulse.
    pub base_target_radius: f64,
    pub outer_center: Point,
    pub outer_radius: f64,
}

impl HitGeometry {
    fn hits_target(&self, point: Point) -> bool {
        let center = self.target_bounds.center();
        match self.shape {
            Shape::Circle => point.distance(center) <= self.target_radius,
            Shape::Oval => {
                let scale = if self.base_target_radius > 0.0 {
                    self.target_radius / self.base_target_radius
                } else {
                    1.0
                };
                let a = self.target_bounds.width() / 2.0 * scale;
                let b = self.target_bounds.height() / 2.0 * scale;
                within_ellipse(point.x - center.x, point.y - center.y, a, b)
            }
        }
    }

    fn hits_outer_circle(&self, point: Point) -> bool {
        point.distance(self.outer_center) <= self.outer_radius
    }
}

fn within_ellipse(dx: f64, dy: f64, a: f64, b: f64) -> bool {
    match (a > 0.0, b > 0.0) {
        (true, true) => (dx / a).powi(2) + (dy / b).powi(2) <= 1.0,
        (false, true) => dx == 0.0 && dy.abs() <= b,
        (true, false) => dy == 0.0 && dx.abs() <= a,
        (false, false) => dx == 0.0 && dy == 0.0,
    }
}

pub fn classify(point: Point, geometry: &HitGeometry) -> Hit {
    if geometry.hits_target(point) {
        Hit::Target
    } else if geometry.hits_outer_circle(point) {
        Hit::OuterCircle
    } else {
        Hit::Outside
    }
}
