use std::ops::{Add, Mul, Sub};

#[derive(Default, Debug, Copy, Clone, PartialEq)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Add for Vec2 {
    type Output = Vec2;

    fn add(self, other: Vec2) -> Vec2 {
        Vec2 {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

// a - b == a + (-1 * b)
impl Sub for Vec2 {
    type Output = Vec2;

    fn sub(self, other: Vec2) -> Vec2 {
        self + other * -1.
    }
}

impl Mul<f64> for Vec2 {
    type Output = Vec2;
    fn mul(self, other: f64) -> Vec2 {
        Vec2 {
            x: self.x * other,
            y: self.y * other,
        }
    }
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0., y: 0. };

    pub fn new(x: f64, y: f64) -> Self {
        Vec2 { x, y }
    }

    /// Unit vector pointing at `degrees`, measured clockwise from +x in screen
    /// coordinates (y grows downwards), as the game reports headings.
    pub fn from_angle(degrees: f64) -> Self {
        let (sin, cos) = degrees.to_radians().sin_cos();
        Vec2 { x: cos, y: sin }
    }

    /// `a * u + b * v`
    pub fn lin_comb(a: f64, u: Vec2, b: f64, v: Vec2) -> Vec2 {
        u * a + v * b
    }

    pub fn dot(self, other: Vec2) -> f64 {
        self.x * other.x + self.y * other.y
    }

    pub fn sq_len(self) -> f64 {
        self.dot(self)
    }

    pub fn len(self) -> f64 {
        self.sq_len().sqrt()
    }

    pub fn dist(self, other: Vec2) -> f64 {
        (self - other).len()
    }

    pub fn sq_dist(self, other: Vec2) -> f64 {
        (self - other).sq_len()
    }

    /// Zero vector stays zero instead of turning into NaNs.
    pub fn norm(self) -> Vec2 {
        let len = self.len();
        if len == 0. {
            return self;
        }
        self * (1. / len)
    }

    /// Cosine of the angle between two vectors, `None` if either is zero.
    pub fn cos_to(self, other: Vec2) -> Option<f64> {
        let denom = self.len() * other.len();
        if denom == 0. {
            return None;
        }
        Some(self.dot(other) / denom)
    }

    /// Heading of this vector in degrees, `[0, 360)`.
    pub fn angle(self) -> f64 {
        self.y.atan2(self.x).to_degrees().rem_euclid(360.)
    }

    pub fn round(self) -> Vec2 {
        Vec2 {
            x: self.x.round(),
            y: self.y.round(),
        }
    }

    pub fn trunc(self) -> Vec2 {
        Vec2 {
            x: self.x.trunc(),
            y: self.y.trunc(),
        }
    }
}

/// Signed difference `to - from` folded into `(-180, 180]`.
pub fn angle_diff(from: f64, to: f64) -> f64 {
    let d = (to - from).rem_euclid(360.);
    if d > 180. {
        d - 360.
    } else {
        d
    }
}
