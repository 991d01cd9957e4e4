//! Pose - rigid transform between two frames
//!
//! Translation + unit quaternion, enough to express camera-to-sensor and
//! world-to-camera transforms. Full pose math stays outside this core.

use serde::{Deserialize, Serialize};

/// Rigid transform: translation (meters) + rotation (unit quaternion x, y, z, w).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    /// Translation (x, y, z)
    pub translation: [f64; 3],

    /// Rotation quaternion (x, y, z, w)
    pub rotation: [f64; 4],
}

impl Pose {
    /// Identity pose: zero translation, unit rotation.
    pub fn identity() -> Self {
        Self {
            translation: [0.0, 0.0, 0.0],
            rotation: [0.0, 0.0, 0.0, 1.0],
        }
    }

    /// Whether this is the identity pose.
    pub fn is_identity(&self) -> bool {
        *self == Self::identity()
    }

    /// Compose two poses: `self` then `other` (a_t_b.multiply(b_t_c) = a_t_c).
    pub fn multiply(&self, other: &Pose) -> Pose {
        let [x1, y1, z1, w1] = self.rotation;
        let [x2, y2, z2, w2] = other.rotation;

        let rotation = [
            w1 * x2 + x1 * w2 + y1 * z2 - z1 * y2,
            w1 * y2 - x1 * z2 + y1 * w2 + z1 * x2,
            w1 * z2 + x1 * y2 - y1 * x2 + z1 * w2,
            w1 * w2 - x1 * x2 - y1 * y2 - z1 * z2,
        ];

        let translation = {
            let rotated = rotate(&self.rotation, &other.translation);
            [
                self.translation[0] + rotated[0],
                self.translation[1] + rotated[1],
                self.translation[2] + rotated[2],
            ]
        };

        Pose {
            translation,
            rotation,
        }
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::identity()
    }
}

/// Rotate a vector by a unit quaternion (q * v * q^-1).
fn rotate(q: &[f64; 4], v: &[f64; 3]) -> [f64; 3] {
    let [qx, qy, qz, qw] = *q;
    let [vx, vy, vz] = *v;

    // t = 2 * cross(q.xyz, v)
    let tx = 2.0 * (qy * vz - qz * vy);
    let ty = 2.0 * (qz * vx - qx * vz);
    let tz = 2.0 * (qx * vy - qy * vx);

    // v' = v + qw * t + cross(q.xyz, t)
    [
        vx + qw * tx + (qy * tz - qz * ty),
        vy + qw * ty + (qz * tx - qx * tz),
        vz + qw * tz + (qx * ty - qy * tx),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_multiply() {
        let pose = Pose {
            translation: [1.0, 2.0, 3.0],
            rotation: [0.0, 0.0, 0.0, 1.0],
        };
        let composed = Pose::identity().multiply(&pose);
        assert_eq!(composed, pose);
        let composed = pose.multiply(&Pose::identity());
        assert_eq!(composed, pose);
    }

    #[test]
    fn test_translation_composes() {
        let a = Pose {
            translation: [1.0, 0.0, 0.0],
            rotation: [0.0, 0.0, 0.0, 1.0],
        };
        let b = Pose {
            translation: [0.0, 2.0, 0.0],
            rotation: [0.0, 0.0, 0.0, 1.0],
        };
        let c = a.multiply(&b);
        assert_eq!(c.translation, [1.0, 2.0, 0.0]);
    }

    #[test]
    fn test_rotation_applies_to_translation() {
        // 180 degrees around z: (x, y) -> (-x, -y)
        let a = Pose {
            translation: [0.0, 0.0, 0.0],
            rotation: [0.0, 0.0, 1.0, 0.0],
        };
        let b = Pose {
            translation: [1.0, 0.0, 0.0],
            rotation: [0.0, 0.0, 0.0, 1.0],
        };
        let c = a.multiply(&b);
        assert!((c.translation[0] + 1.0).abs() < 1e-12);
        assert!(c.translation[1].abs() < 1e-12);
    }
}
