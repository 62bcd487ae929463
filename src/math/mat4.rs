use super::Vec3;

/// 4x4 matrix stored row-major: `elements[row * 4 + col]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat4 {
    pub elements: [f32; 16],
}

impl Mat4 {
    #[must_use]
    pub const fn identity() -> Self {
        Self {
            elements: [
                1.0, 0.0, 0.0, 0.0, //
                0.0, 1.0, 0.0, 0.0, //
                0.0, 0.0, 1.0, 0.0, //
                0.0, 0.0, 0.0, 1.0,
            ],
        }
    }

    #[must_use]
    pub const fn from_rows(elements: [f32; 16]) -> Self {
        Self { elements }
    }

    /// Resets this matrix to identity in place.
    pub fn set_identity(&mut self) {
        for (i, e) in self.elements.iter_mut().enumerate() {
            *e = if i % 5 == 0 { 1.0 } else { 0.0 };
        }
    }

    /// Overwrites all sixteen elements, given in row-major order.
    pub fn set(&mut self, elements: [f32; 16]) {
        self.elements = elements;
    }

    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.elements[row * 4 + col]
    }

    /// Standard product `self * other`.
    #[must_use]
    pub fn multiply(&self, other: &Self) -> Self {
        let a = &self.elements;
        let b = &other.elements;
        let mut c = [0.0; 16];

        for i in 0..4 {
            for j in 0..4 {
                c[i * 4 + j] = a[i * 4] * b[j]
                    + a[i * 4 + 1] * b[j + 4]
                    + a[i * 4 + 2] * b[j + 8]
                    + a[i * 4 + 3] * b[j + 12];
            }
        }

        Self { elements: c }
    }

    #[must_use]
    pub fn transpose(&self) -> Self {
        let mut out = [0.0; 16];
        for row in 0..4 {
            for col in 0..4 {
                out[col * 4 + row] = self.elements[row * 4 + col];
            }
        }
        Self { elements: out }
    }

    /// Multiplies the column vector `(p, 1)` and returns the homogeneous result.
    #[must_use]
    pub fn multiply_point(&self, p: &Vec3) -> [f32; 4] {
        let e = &self.elements;
        let mut out = [0.0; 4];
        for (row, value) in out.iter_mut().enumerate() {
            *value = e[row * 4] * p.x + e[row * 4 + 1] * p.y + e[row * 4 + 2] * p.z + e[row * 4 + 3];
        }
        out
    }

    /// Builds a right-handed view matrix looking from `eye` towards `center`.
    #[must_use]
    pub fn look_at(eye: &Vec3, center: &Vec3, up: &Vec3) -> Self {
        let mut m = Self::identity();
        m.set_look_at(eye, center, up);
        m
    }

    pub fn set_look_at(&mut self, eye: &Vec3, center: &Vec3, up: &Vec3) {
        let z_axis = eye.sub(center).normalize();
        let x_axis = up.cross(&z_axis).normalize();
        let y_axis = z_axis.cross(&x_axis).normalize();

        self.set([
            x_axis.x, x_axis.y, x_axis.z, -x_axis.dot(eye), //
            y_axis.x, y_axis.y, y_axis.z, -y_axis.dot(eye), //
            z_axis.x, z_axis.y, z_axis.z, -z_axis.dot(eye), //
            0.0, 0.0, 0.0, 1.0,
        ]);
    }

    /// Symmetric perspective projection.
    ///
    /// The depth terms sit in the third column (`-1` at row 2, the
    /// `2*far*near` term at row 3), which is the layout the frustum
    /// extraction in [`crate::scene::Camera`] was written against.
    #[must_use]
    pub fn perspective(fov_y: f32, aspect_ratio: f32, near: f32, far: f32) -> Self {
        let f = 1.0 / (fov_y / 2.0).tan();
        let near_minus_far = near - far;

        Self::from_rows([
            f / aspect_ratio, 0.0, 0.0, 0.0, //
            0.0, f, 0.0, 0.0, //
            0.0, 0.0, (far + near) / near_minus_far, -1.0, //
            0.0, 0.0, (2.0 * far * near) / near_minus_far, 0.0,
        ])
    }

    /// Reads the strided triple `(e[i], e[i + 4], e[i + 8])` and drops the
    /// fourth component.
    ///
    /// # Panics
    ///
    /// Panics if `index > 7`.
    #[must_use]
    pub fn row(&self, index: usize) -> Vec3 {
        let e = &self.elements;
        Vec3::new(e[index], e[index + 4], e[index + 8])
    }

    /// All four elements of storage row `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index > 3`.
    #[must_use]
    pub fn full_row(&self, index: usize) -> [f32; 4] {
        let e = &self.elements;
        [e[index * 4], e[index * 4 + 1], e[index * 4 + 2], e[index * 4 + 3]]
    }
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::identity()
    }
}
