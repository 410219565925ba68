//! Ground surfaces towers land on.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use bastion_behavior::placement::{GroundHit, GroundProbe};

/// Minimum |normal.y| for a plane to count as ground.
const MIN_GROUND_SLOPE: f32 = 1e-3;

/// An infinite ground plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GroundPlane {
    pub point: Vec3,
    /// Unit normal, pointing up.
    pub normal: Vec3,
}

impl GroundPlane {
    pub fn flat(height: f32) -> Self {
        Self {
            point: Vec3::new(0.0, height, 0.0),
            normal: Vec3::Y,
        }
    }

    /// Plane through `point` with the given normal. `None` for a zero or
    /// near-vertical normal.
    pub fn sloped(point: Vec3, normal: Vec3) -> Option<Self> {
        let normal = normal.try_normalize()?;
        let normal = if normal.y < 0.0 { -normal } else { normal };
        (normal.y >= MIN_GROUND_SLOPE).then_some(Self { point, normal })
    }

    /// Surface height at `(x, z)`.
    pub fn height_at(&self, x: f32, z: f32) -> f32 {
        let n = self.normal;
        self.point.y - (n.x * (x - self.point.x) + n.z * (z - self.point.z)) / n.y
    }
}

/// Set of ground planes. The highest surface under a point wins.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Terrain {
    pub planes: Vec<GroundPlane>,
}

impl Terrain {
    /// A single flat ground plane at y = 0.
    pub fn flat() -> Self {
        Self {
            planes: vec![GroundPlane::flat(0.0)],
        }
    }

    /// Highest ground surface at `(x, z)` and its normal.
    pub fn surface_at(&self, x: f32, z: f32) -> Option<GroundHit> {
        self.planes
            .iter()
            .filter(|plane| plane.normal.y >= MIN_GROUND_SLOPE)
            .map(|plane| GroundHit {
                point: Vec3::new(x, plane.height_at(x, z), z),
                normal: plane.normal,
            })
            .max_by(|a, b| a.point.y.total_cmp(&b.point.y))
    }
}

impl GroundProbe for Terrain {
    fn raycast_down(&self, origin: Vec3, max_distance: f32) -> Option<GroundHit> {
        self.planes
            .iter()
            .filter(|plane| plane.normal.y >= MIN_GROUND_SLOPE)
            .filter_map(|plane| {
                let drop = origin.y - plane.height_at(origin.x, origin.z);
                (0.0..=max_distance).contains(&drop).then(|| {
                    (
                        drop,
                        GroundHit {
                            point: Vec3::new(origin.x, origin.y - drop, origin.z),
                            normal: plane.normal,
                        },
                    )
                })
            })
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, hit)| hit)
    }
}
