//! UV sphere generation with normals and texture coordinates.

use super::GeometryData;
use std::f32::consts::PI;

/// Generate a UV sphere of radius 1.0 centered at the origin.
///
/// # Arguments
/// * `longitude_segments` - Number of vertical segments (longitude lines)
/// * `latitude_segments` - Number of horizontal segments (latitude lines)
///
/// For a unit sphere the normal equals the position, which the fur shells
/// rely on: scaling the model matrix pushes vertices straight out along
/// their normals.
pub fn generate_sphere(longitude_segments: u32, latitude_segments: u32) -> GeometryData {
    let mut data = GeometryData::new();

    let long_segs = longitude_segments.max(3);
    let lat_segs = latitude_segments.max(2);

    for lat in 0..=lat_segs {
        let theta = lat as f32 * PI / lat_segs as f32; // 0 to PI
        let sin_theta = theta.sin();
        let cos_theta = theta.cos();

        for long in 0..=long_segs {
            let phi = long as f32 * 2.0 * PI / long_segs as f32; // 0 to 2*PI

            let x = sin_theta * phi.cos();
            let y = cos_theta;
            let z = sin_theta * phi.sin();

            data.vertices.push([x, y, z]);
            data.normals.push([x, y, z]);
            data.tex_coords.push([
                long as f32 / long_segs as f32,
                lat as f32 / lat_segs as f32,
            ]);
        }
    }

    for lat in 0..lat_segs {
        for long in 0..long_segs {
            let first = lat * (long_segs + 1) + long;
            let second = first + long_segs + 1;

            data.indices.push(first);
            data.indices.push(second);
            data.indices.push(first + 1);

            data.indices.push(second);
            data.indices.push(second + 1);
            data.indices.push(first + 1);
        }
    }

    data
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn sphere_attribute_counts_agree() {
        let sphere = generate_sphere(64, 64);
        assert!(sphere.vertex_count() > 0);
        assert!(sphere.triangle_count() > 0);
        assert_eq!(sphere.vertices.len(), sphere.normals.len());
        assert_eq!(sphere.vertices.len(), sphere.tex_coords.len());
        assert_eq!(sphere.indices.len() % 3, 0);
    }

    #[test]
    fn sphere_vertices_lie_on_unit_sphere() {
        let sphere = generate_sphere(16, 12);
        for v in &sphere.vertices {
            let radius = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
            assert_relative_eq!(radius, 1.0, epsilon = 1e-5);
        }
    }

    #[test]
    fn sphere_indices_stay_in_bounds() {
        let sphere = generate_sphere(8, 6);
        let count = sphere.vertex_count() as u32;
        assert!(sphere.indices.iter().all(|&i| i < count));
    }
}
