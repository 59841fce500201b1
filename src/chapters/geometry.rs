use crate::engine::components::mesh::Vertex;
use crate::engine::utils::math::{ vec3_add, vec3_scale, Vec3 };

/// Where the textured-cube chapter places its cubes.
pub const CUBE_POSITIONS: [Vec3; 10] = [
    [0.0, 0.0, 0.0],
    [2.0, 5.0, -15.0],
    [-1.5, -2.2, -2.5],
    [-3.8, -2.0, -12.3],
    [2.4, -0.4, -3.5],
    [-1.7, 3.0, -7.5],
    [1.3, -2.0, -2.5],
    [1.5, 2.0, -2.5],
    [1.5, 0.2, -1.5],
    [-1.3, 1.0, -1.5],
];

// (normal, u, v) with u x v == normal, so every face winds counter-clockwise
// seen from outside
const CUBE_FACES: [(Vec3, Vec3, Vec3); 6] = [
    ([1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]),
    ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
    ([0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0]),
    ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
    ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
    ([0.0, 0.0, -1.0], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
];

/// Unit cube centred on the origin: 4 vertices per face so every face keeps
/// its own normal, 36 indices.
pub fn cube() -> (Vec<Vertex>, Vec<u32>) {
    let mut vertices = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);

    for (normal, u, v) in CUBE_FACES {
        let base = vertices.len() as u32;
        let center = vec3_scale(normal, 0.5);
        for (su, sv) in [(-0.5, -0.5), (0.5, -0.5), (0.5, 0.5), (-0.5, 0.5)] {
            let position = vec3_add(center, vec3_add(vec3_scale(u, su), vec3_scale(v, sv)));
            vertices.push(Vertex::new(position, normal, [su + 0.5, sv + 0.5]));
        }
        indices.extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
    }

    (vertices, indices)
}

pub fn triangle() -> (Vec<Vertex>, Vec<u32>) {
    let normal = [0.0, 0.0, 1.0];
    let vertices = vec![
        Vertex::new([-0.5, -0.5, 0.0], normal, [0.0, 0.0]),
        Vertex::new([0.5, -0.5, 0.0], normal, [1.0, 0.0]),
        Vertex::new([0.0, 0.5, 0.0], normal, [0.5, 1.0])
    ];
    (vertices, vec![0, 1, 2])
}
