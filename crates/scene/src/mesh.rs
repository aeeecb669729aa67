/// Triangle mesh on the CPU side; uploaded by the renderer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// UV sphere with `width_segments` around the equator and
/// `height_segments` from pole to pole.
pub fn sphere_mesh(radius: f32, width_segments: u32, height_segments: u32) -> MeshData {
    let width_segments = width_segments.max(3);
    let height_segments = height_segments.max(2);

    let vertex_count = ((height_segments + 1) * (width_segments + 1)) as usize;
    let mut positions = Vec::with_capacity(vertex_count);
    let mut normals = Vec::with_capacity(vertex_count);
    for lat in 0..=height_segments {
        let v = lat as f32 / height_segments as f32;
        let theta = v * std::f32::consts::PI;
        let (sin_t, cos_t) = theta.sin_cos();

        for lon in 0..=width_segments {
            let u = lon as f32 / width_segments as f32;
            let phi = u * std::f32::consts::TAU;
            let (sin_p, cos_p) = phi.sin_cos();

            let n = [sin_t * cos_p, cos_t, sin_t * sin_p];
            positions.push([n[0] * radius, n[1] * radius, n[2] * radius]);
            normals.push(n);
        }
    }

    let stride = width_segments + 1;
    let mut indices = Vec::with_capacity((height_segments * width_segments * 6) as usize);
    for lat in 0..height_segments {
        for lon in 0..width_segments {
            let i0 = lat * stride + lon;
            let i1 = i0 + 1;
            let i2 = i0 + stride;
            let i3 = i2 + 1;

            // Degenerate triangles at the poles are skipped.
            if lat != 0 {
                indices.extend_from_slice(&[i0, i1, i2]);
            }
            if lat != height_segments - 1 {
                indices.extend_from_slice(&[i1, i3, i2]);
            }
        }
    }

    MeshData {
        positions,
        normals,
        indices,
    }
}
