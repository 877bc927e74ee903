//! Column-major 4x4 matrix helpers for scene-graph local/world matrix
//! composition. Storage is a flat `[f32; 16]`, `m[col * 4 + row]`, matching
//! both glTF's `node.matrix` layout and the reference C loader's `mat4_*`
//! helpers directly (no wrapper type, so a worked matrix literal from a
//! test fixture can be compared element-for-element).

/// A column-major 4x4 matrix.
pub type Mat4 = [f32; 16];

/// Translation, rotation (quaternion `x, y, z, w`), and scale.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Trs {
    pub translation: [f32; 3],
    pub rotation: [f32; 4],
    pub scale: [f32; 3],
}

impl Default for Trs {
    fn default() -> Self {
        Trs {
            translation: [0.0, 0.0, 0.0],
            rotation: [0.0, 0.0, 0.0, 1.0],
            scale: [1.0, 1.0, 1.0],
        }
    }
}

pub const IDENTITY: Mat4 = [
    1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0,
];

/// Builds the column-major rotation matrix for a unit quaternion `(x, y, z, w)`,
/// per spec §4.8.
pub fn mat4_from_quat(q: [f32; 4]) -> Mat4 {
    let [x, y, z, w] = q;
    let mut m = IDENTITY;
    m[0] = 1.0 - 2.0 * (y * y + z * z);
    m[1] = 2.0 * (x * y + w * z);
    m[2] = 2.0 * (x * z - w * y);

    m[4] = 2.0 * (x * y - w * z);
    m[5] = 1.0 - 2.0 * (x * x + z * z);
    m[6] = 2.0 * (y * z + w * x);

    m[8] = 2.0 * (x * z + w * y);
    m[9] = 2.0 * (y * z - w * x);
    m[10] = 1.0 - 2.0 * (x * x + y * y);
    m
}

/// Scales basis columns 0..2 in place: `m[:, i] *= scale[i]`.
pub fn mat4_apply_scale(m: &mut Mat4, scale: [f32; 3]) {
    for col in 0..3 {
        for row in 0..4 {
            m[col * 4 + row] *= scale[col];
        }
    }
}

/// Sets the translation column (`m[12..=14]`) in place.
pub fn mat4_apply_translation(m: &mut Mat4, translation: [f32; 3]) {
    m[12] = translation[0];
    m[13] = translation[1];
    m[14] = translation[2];
}

/// Builds a local matrix from TRS: `T * R * S` in column-major storage
/// (spec §4.8: rotation first, then scale applied to the basis columns,
/// then translation written into the last column).
pub fn mat4_from_trs(trs: &Trs) -> Mat4 {
    let mut m = mat4_from_quat(trs.rotation);
    mat4_apply_scale(&mut m, trs.scale);
    mat4_apply_translation(&mut m, trs.translation);
    m
}

/// `out = a * b`, both column-major, standard 4x4 matrix product.
pub fn mat4_mul(a: &Mat4, b: &Mat4) -> Mat4 {
    let mut out = [0.0f32; 16];
    for col in 0..4 {
        for row in 0..4 {
            let mut sum = 0.0f32;
            for k in 0..4 {
                sum += a[k * 4 + row] * b[col * 4 + k];
            }
            out[col * 4 + row] = sum;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn identity_times_identity_is_identity() {
        let m = mat4_mul(&IDENTITY, &IDENTITY);
        assert_eq!(m, IDENTITY);
    }

    #[test]
    fn trs_with_identity_rotation_is_scale_then_translate() {
        let trs = Trs {
            translation: [1.0, 2.0, 3.0],
            rotation: [0.0, 0.0, 0.0, 1.0],
            scale: [2.0, 2.0, 2.0],
        };
        let m = mat4_from_trs(&trs);
        assert_relative_eq!(m[0], 2.0);
        assert_relative_eq!(m[5], 2.0);
        assert_relative_eq!(m[10], 2.0);
        assert_relative_eq!(m[12], 1.0);
        assert_relative_eq!(m[13], 2.0);
        assert_relative_eq!(m[14], 3.0);
    }

    #[test]
    fn unit_quaternion_rotation_has_unit_determinant() {
        // 90 degree rotation about Z: (x,y,z,w) = (0,0,sin45,cos45)
        let s = std::f32::consts::FRAC_1_SQRT_2;
        let m = mat4_from_quat([0.0, 0.0, s, s]);
        // Column 0 should be roughly (0, 1, 0), column 1 roughly (-1, 0, 0).
        assert_relative_eq!(m[0], 0.0, epsilon = 1e-6);
        assert_relative_eq!(m[1], 1.0, epsilon = 1e-6);
        assert_relative_eq!(m[4], -1.0, epsilon = 1e-6);
        assert_relative_eq!(m[5], 0.0, epsilon = 1e-6);
    }
}
