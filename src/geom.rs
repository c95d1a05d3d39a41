use serde::{Deserialize, Serialize};

/// A point in the path coordinate space.
///
/// All geometry in this crate is IEEE-754 32-bit; paths that need more
/// precision should be recentered before scanning.
#[derive(Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// The horizontal coordinate.
    pub x: f32,
    /// The vertical coordinate. The y axis points down.
    pub y: f32,
}

impl std::fmt::Debug for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:?}, {:?})", self.x, self.y)
    }
}

impl Point {
    /// Creates a point from its coordinates.
    pub fn new(x: f32, y: f32) -> Self {
        Point { x, y }
    }

    /// A convex combination of `self` and `other`; `t == 0` is `self`.
    pub fn affine(self, other: Self, t: f32) -> Self {
        Point {
            x: (1.0 - t) * self.x + t * other.x,
            y: (1.0 - t) * self.y + t * other.y,
        }
    }
}

impl From<(f32, f32)> for Point {
    fn from(p: (f32, f32)) -> Self {
        Point { x: p.0, y: p.1 }
    }
}

impl std::ops::Sub for Point {
    type Output = Vector;

    fn sub(self, rhs: Self) -> Self::Output {
        Vector {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
        }
    }
}

impl std::ops::Add<Vector> for Point {
    type Output = Point;

    fn add(self, rhs: Vector) -> Self::Output {
        Point {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}

/// A displacement between two [`Point`]s.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector {
    /// The horizontal component.
    pub x: f32,
    /// The vertical component.
    pub y: f32,
}

impl Vector {
    /// Creates a vector from its components.
    pub fn new(x: f32, y: f32) -> Self {
        Vector { x, y }
    }

    /// The squared Euclidean length.
    pub fn length_squared(self) -> f32 {
        self.x * self.x + self.y * self.y
    }
}

/// A 3×2 affine transform, applied to row vectors: the first two rows are
/// the linear part and the third row is the translation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// Row 1, column 1 of the linear part.
    pub m11: f32,
    /// Row 1, column 2 of the linear part.
    pub m12: f32,
    /// Row 2, column 1 of the linear part.
    pub m21: f32,
    /// Row 2, column 2 of the linear part.
    pub m22: f32,
    /// The x translation.
    pub m31: f32,
    /// The y translation.
    pub m32: f32,
}

impl Transform {
    /// The identity transform.
    pub const IDENTITY: Transform = Transform {
        m11: 1.0,
        m12: 0.0,
        m21: 0.0,
        m22: 1.0,
        m31: 0.0,
        m32: 0.0,
    };

    /// A pure translation.
    pub fn translation(dx: f32, dy: f32) -> Self {
        Transform {
            m31: dx,
            m32: dy,
            ..Transform::IDENTITY
        }
    }

    /// A rotation about the origin, in degrees. Positive angles rotate from
    /// +x toward +y (clockwise on a y-down screen).
    pub fn rotation_deg(degrees: f32) -> Self {
        let (sin, cos) = degrees.to_radians().sin_cos();
        Transform {
            m11: cos,
            m12: sin,
            m21: -sin,
            m22: cos,
            m31: 0.0,
            m32: 0.0,
        }
    }

    /// A rotation about `center`, in degrees.
    pub fn rotation_about(degrees: f32, center: Point) -> Self {
        Transform::translation(-center.x, -center.y)
            .then(&Transform::rotation_deg(degrees))
            .then(&Transform::translation(center.x, center.y))
    }

    /// Composition: applying the result is applying `self`, then `after`.
    pub fn then(&self, after: &Transform) -> Transform {
        Transform {
            m11: self.m11 * after.m11 + self.m12 * after.m21,
            m12: self.m11 * after.m12 + self.m12 * after.m22,
            m21: self.m21 * after.m11 + self.m22 * after.m21,
            m22: self.m21 * after.m12 + self.m22 * after.m22,
            m31: self.m31 * after.m11 + self.m32 * after.m21 + after.m31,
            m32: self.m31 * after.m12 + self.m32 * after.m22 + after.m32,
        }
    }

    /// Replaces the translation row, keeping the linear part.
    pub fn set_translation(&mut self, dx: f32, dy: f32) {
        self.m31 = dx;
        self.m32 = dy;
    }

    /// Applies the transform to a point.
    pub fn apply(&self, p: Point) -> Point {
        Point {
            x: p.x * self.m11 + p.y * self.m21 + self.m31,
            y: p.x * self.m12 + p.y * self.m22 + self.m32,
        }
    }

    /// Whether this is exactly the identity.
    pub fn is_identity(&self) -> bool {
        *self == Transform::IDENTITY
    }
}

impl Default for Transform {
    fn default() -> Self {
        Transform::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotation_about_fixes_center() {
        let center = Point::new(3.0, -2.0);
        let rot = Transform::rotation_about(90.0, center);
        let moved = rot.apply(center);
        assert!((moved.x - center.x).abs() < 1e-5);
        assert!((moved.y - center.y).abs() < 1e-5);
    }

    #[test]
    fn composition_matches_sequential_application() {
        let a = Transform::rotation_deg(30.0);
        let b = Transform::translation(5.0, -1.0);
        let p = Point::new(2.0, 7.0);
        let composed = a.then(&b).apply(p);
        let sequential = b.apply(a.apply(p));
        assert!((composed.x - sequential.x).abs() < 1e-5);
        assert!((composed.y - sequential.y).abs() < 1e-5);
    }
}
