//! UV sphere mesh generation for planets and moons.
//!
//! Produces a latitude/longitude grid with duplicated seam vertices so the
//! equirectangular maps wrap cleanly, and pole rows collapsed into triangle
//! fans rather than degenerate quads.

use std::f32::consts::{PI, TAU};

use crate::mesh::SphereVertex;

/// CPU-side sphere geometry ready for upload.
pub struct SphereGeometry {
    pub vertices: Vec<SphereVertex>,
    pub indices: Vec<u32>,
}

impl SphereGeometry {
    /// Generate a UV sphere.
    ///
    /// `width_segments` is the longitude resolution (minimum 3) and
    /// `height_segments` the latitude resolution (minimum 2).
    pub fn new(radius: f32, width_segments: u32, height_segments: u32) -> Self {
        let w = width_segments.max(3);
        let h = height_segments.max(2);

        let mut vertices = Vec::with_capacity(((w + 1) * (h + 1)) as usize);

        for iy in 0..=h {
            let v = iy as f32 / h as f32;
            let polar = v * PI;
            let (sin_polar, cos_polar) = polar.sin_cos();

            for ix in 0..=w {
                let u = ix as f32 / w as f32;
                let azimuth = u * TAU;
                let (sin_azimuth, cos_azimuth) = azimuth.sin_cos();

                let nx = -cos_azimuth * sin_polar;
                let ny = cos_polar;
                let nz = sin_azimuth * sin_polar;

                vertices.push(SphereVertex {
                    position: [nx * radius, ny * radius, nz * radius],
                    normal: [nx, ny, nz],
                    uv: [u, v],
                });
            }
        }

        let row = w + 1;
        let mut indices = Vec::with_capacity((w * (h - 1) * 6) as usize);

        for iy in 0..h {
            for ix in 0..w {
                let a = iy * row + ix + 1;
                let b = iy * row + ix;
                let c = (iy + 1) * row + ix;
                let d = (iy + 1) * row + ix + 1;

                // Pole rows produce triangles, interior rows produce quads.
                if iy != 0 {
                    indices.extend_from_slice(&[a, b, d]);
                }
                if iy != h - 1 {
                    indices.extend_from_slice(&[b, c, d]);
                }
            }
        }

        Self { vertices, indices }
    }

    /// Raw vertex bytes for buffer creation.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_count_matches_grid() {
        let sphere = SphereGeometry::new(50.0, 64, 32);
        assert_eq!(sphere.vertices.len(), (64 + 1) * (32 + 1));
    }

    #[test]
    fn test_index_count_accounts_for_pole_fans() {
        let (w, h) = (32u32, 16u32);
        let sphere = SphereGeometry::new(10.0, w, h);
        // Two triangles per interior quad, one per pole quad.
        let expected_triangles = 2 * w * (h - 1);
        assert_eq!(sphere.indices.len() as u32, expected_triangles * 3);
    }

    #[test]
    fn test_all_vertices_on_sphere_surface() {
        let radius = 50.0;
        let sphere = SphereGeometry::new(radius, 16, 8);
        for v in &sphere.vertices {
            let len = (v.position[0].powi(2) + v.position[1].powi(2) + v.position[2].powi(2))
                .sqrt();
            assert!(
                (len - radius).abs() < 1e-3,
                "vertex at distance {len}, expected {radius}"
            );
        }
    }

    #[test]
    fn test_normals_are_unit_length_and_radial() {
        let sphere = SphereGeometry::new(50.3, 16, 8);
        for v in &sphere.vertices {
            let len = (v.normal[0].powi(2) + v.normal[1].powi(2) + v.normal[2].powi(2)).sqrt();
            assert!((len - 1.0).abs() < 1e-5, "normal length {len}");

            // Normal should point along the position vector.
            let dot = v.position[0] * v.normal[0]
                + v.position[1] * v.normal[1]
                + v.position[2] * v.normal[2];
            assert!(dot > 0.0, "normal not radial");
        }
    }

    #[test]
    fn test_uv_covers_full_range() {
        let sphere = SphereGeometry::new(1.0, 8, 4);
        let min_u = sphere.vertices.iter().map(|v| v.uv[0]).fold(1.0f32, f32::min);
        let max_u = sphere.vertices.iter().map(|v| v.uv[0]).fold(0.0f32, f32::max);
        let min_v = sphere.vertices.iter().map(|v| v.uv[1]).fold(1.0f32, f32::min);
        let max_v = sphere.vertices.iter().map(|v| v.uv[1]).fold(0.0f32, f32::max);
        assert_eq!(min_u, 0.0);
        assert_eq!(max_u, 1.0);
        assert_eq!(min_v, 0.0);
        assert_eq!(max_v, 1.0);
    }

    #[test]
    fn test_indices_in_bounds() {
        let sphere = SphereGeometry::new(1.0, 12, 6);
        let count = sphere.vertices.len() as u32;
        for &i in &sphere.indices {
            assert!(i < count, "index {i} out of bounds ({count} vertices)");
        }
    }

    #[test]
    fn test_minimum_segments_are_enforced() {
        let sphere = SphereGeometry::new(1.0, 1, 1);
        assert_eq!(sphere.vertices.len(), (3 + 1) * (2 + 1));
    }
}
