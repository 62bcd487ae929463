use super::Vec3;

/// Implicit plane `normal · p + distance = 0`. Points with a non-negative
/// signed distance are on the inner side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub normal: Vec3,
    pub distance: f32,
}

impl Plane {
    #[must_use]
    pub const fn new(normal: Vec3, distance: f32) -> Self {
        Self { normal, distance }
    }

    #[must_use]
    pub fn signed_distance(&self, point: &Vec3) -> f32 {
        self.normal.dot(point) + self.distance
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    #[must_use]
    pub const fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Box of the given full extents centred on `center`.
    #[must_use]
    pub fn from_center(center: Vec3, width: f32, height: f32, depth: f32) -> Self {
        let half = Vec3::new(width / 2.0, height / 2.0, depth / 2.0);
        Self {
            min: center.sub(&half),
            max: center.add(&half),
        }
    }

    #[must_use]
    pub fn corners(&self) -> [Vec3; 8] {
        let (min, max) = (self.min, self.max);
        [
            Vec3::new(min.x, min.y, min.z),
            Vec3::new(max.x, min.y, min.z),
            Vec3::new(min.x, max.y, min.z),
            Vec3::new(max.x, max.y, min.z),
            Vec3::new(min.x, min.y, max.z),
            Vec3::new(max.x, min.y, max.z),
            Vec3::new(min.x, max.y, max.z),
            Vec3::new(max.x, max.y, max.z),
        ]
    }

    /// True unless every corner lies strictly on the negative side of `plane`.
    #[must_use]
    pub fn intersects_plane(&self, plane: &Plane) -> bool {
        self.corners()
            .iter()
            .any(|corner| plane.signed_distance(corner) >= 0.0)
    }

    /// Conservative visibility test: the box is rejected as soon as one plane
    /// has all eight corners behind it.
    #[must_use]
    pub fn intersects_frustum(&self, planes: &[Plane]) -> bool {
        planes.iter().all(|plane| self.intersects_plane(plane))
    }

    #[must_use]
    pub fn overlaps_x(&self, other: &Self) -> bool {
        self.min.x < other.max.x && self.max.x > other.min.x
    }

    #[must_use]
    pub fn overlaps_y(&self, other: &Self) -> bool {
        self.min.y < other.max.y && self.max.y > other.min.y
    }

    #[must_use]
    pub fn overlaps_z(&self, other: &Self) -> bool {
        self.min.z < other.max.z && self.max.z > other.min.z
    }

    /// Strict interval overlap on all three axes; boxes that only share a
    /// face do not overlap.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.overlaps_x(other) && self.overlaps_y(other) && self.overlaps_z(other)
    }
}
