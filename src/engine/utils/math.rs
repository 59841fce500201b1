//! Row-major matrix and vector helpers.
//!
//! Matrices are stored row by row, so they are uploaded with `transpose = true`
//! (see `UniformValue::mat4`).

pub type Vec3 = [f32; 3];
pub type Mat3x3 = [f32; 9];
pub type Mat4x4 = [f32; 16];

pub fn vec3_add(a: Vec3, b: Vec3) -> Vec3 {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

pub fn vec3_sub(a: Vec3, b: Vec3) -> Vec3 {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

pub fn vec3_scale(v: Vec3, s: f32) -> Vec3 {
    [v[0] * s, v[1] * s, v[2] * s]
}

pub fn vec3_dot(a: Vec3, b: Vec3) -> f32 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

pub fn vec3_cross(a: Vec3, b: Vec3) -> Vec3 {
    [a[1] * b[2] - a[2] * b[1], a[2] * b[0] - a[0] * b[2], a[0] * b[1] - a[1] * b[0]]
}

pub fn vec3_length(v: Vec3) -> f32 {
    vec3_dot(v, v).sqrt()
}

/// Zero-length vectors are returned unchanged.
pub fn vec3_normalize(v: Vec3) -> Vec3 {
    let len = vec3_length(v);
    if len <= f32::EPSILON {
        v
    } else {
        vec3_scale(v, 1.0 / len)
    }
}

pub fn mat4x4_identity() -> Mat4x4 {
    [
      1.0, 0.0, 0.0, 0.0,
      0.0, 1.0, 0.0, 0.0,
      0.0, 0.0, 1.0, 0.0,
      0.0, 0.0, 0.0, 1.0
    ]
}

pub fn mat4x4_translate(x: f32, y: f32, z: f32) -> Mat4x4 {
    [
      1.0, 0.0, 0.0,  x,
      0.0, 1.0, 0.0,  y,
      0.0, 0.0, 1.0,  z,
      0.0, 0.0, 0.0, 1.0
    ]
}

pub fn mat4x4_scale(x: f32, y: f32, z: f32) -> Mat4x4 {
    [
       x,  0.0, 0.0, 0.0,
      0.0,  y,  0.0, 0.0,
      0.0, 0.0,  z,  0.0,
      0.0, 0.0, 0.0, 1.0
    ]
}

/// Counter-clockwise rotation of `angle` radians about `axis`.
pub fn mat4x4_rotate(angle: f32, axis: Vec3) -> Mat4x4 {
    let [x, y, z] = vec3_normalize(axis);
    let c = angle.cos();
    let s = angle.sin();
    let t = 1.0 - c;

    [
        t * x * x + c,      t * x * y - s * z,  t * x * z + s * y,  0.0,
        t * x * y + s * z,  t * y * y + c,      t * y * z - s * x,  0.0,
        t * x * z - s * y,  t * y * z + s * x,  t * z * z + c,      0.0,
        0.0,                0.0,                0.0,                1.0,
    ]
}

pub fn mat4x4_transpose(matrix: Mat4x4) -> Mat4x4 {
    let mut ret = [0.0; 16];
    for i in 0..16 {
        let row = i / 4;
        let col = i % 4;
        ret[col * 4 + row] = matrix[row * 4 + col];
    }
    ret
}

pub fn mat4x4_mul(a: Mat4x4, b: Mat4x4) -> Mat4x4 {
    let mut ret = [0.0; 16];
    for (i, cell) in ret.iter_mut().enumerate() {
        let row = i / 4;
        let col = i % 4;
        *cell = (0..4).map(|k| a[row * 4 + k] * b[k * 4 + col]).sum();
    }
    ret
}

pub fn mat4x4_perspective(fov_y_radians: f32, aspect_ratio: f32, near: f32, far: f32) -> Mat4x4 {
    let f = 1.0 / (fov_y_radians * 0.5).tan();
    let range_inv = 1.0 / (near - far);

    [
        f / aspect_ratio, 0.0, 0.0,                          0.0,
        0.0,              f,   0.0,                          0.0,
        0.0,              0.0, (near + far) * range_inv,     (2.0 * near * far) * range_inv,
        0.0,              0.0, -1.0,                         0.0,
    ]
}

/// Right-handed view matrix looking from `eye` towards `center`.
pub fn mat4x4_look_at(eye: Vec3, center: Vec3, up: Vec3) -> Mat4x4 {
    let f = vec3_normalize(vec3_sub(center, eye));
    let s = vec3_normalize(vec3_cross(f, up));
    let u = vec3_cross(s, f);

    [
        s[0],  s[1],  s[2],  -vec3_dot(s, eye),
        u[0],  u[1],  u[2],  -vec3_dot(u, eye),
        -f[0], -f[1], -f[2], vec3_dot(f, eye),
        0.0,   0.0,   0.0,   1.0,
    ]
}

/// Inverse-transpose of the upper-left 3x3 of `model`, for transforming
/// normals. A singular matrix yields its upper-left 3x3 unchanged.
pub fn mat3x3_normal_matrix(model: &Mat4x4) -> Mat3x3 {
    let (a, b, c) = (model[0], model[1], model[2]);
    let (d, e, f) = (model[4], model[5], model[6]);
    let (g, h, i) = (model[8], model[9], model[10]);

    let cofactors = [
        e * i - f * h,    -(d * i - f * g), d * h - e * g,
        -(b * i - c * h), a * i - c * g,    -(a * h - b * g),
        b * f - c * e,    -(a * f - c * d), a * e - b * d,
    ];
    let det = a * cofactors[0] + b * cofactors[1] + c * cofactors[2];

    if det.abs() <= f32::EPSILON {
        return [a, b, c, d, e, f, g, h, i];
    }
    cofactors.map(|v| v / det)
}
