//! Area-of-effect hit tests on plain positions.
//!
//! Engines hand us positions and a facing direction; these functions decide
//! whether a target falls inside a melee range, a cone, or a piercing line.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn sub(self, other: Vec3) -> Vec3 {
        Vec3::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }

    pub fn scale(self, factor: f64) -> Vec3 {
        Vec3::new(self.x * factor, self.y * factor, self.z * factor)
    }

    pub fn dot(self, other: Vec3) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn length(self) -> f64 {
        self.dot(self).sqrt()
    }

    pub fn distance(self, other: Vec3) -> f64 {
        other.sub(self).length()
    }

    /// Projection of `self` onto `onto`. Zero when `onto` is zero.
    pub fn project_onto(self, onto: Vec3) -> Vec3 {
        let denom = onto.dot(onto);
        if denom <= f64::EPSILON {
            return Vec3::ZERO;
        }
        onto.scale(self.dot(onto) / denom)
    }

    /// Unsigned angle in degrees between two vectors. `None` when either is
    /// zero, since a zero vector has no direction.
    pub fn angle_deg(self, other: Vec3) -> Option<f64> {
        let denom = self.length() * other.length();
        if denom <= f64::EPSILON {
            return None;
        }
        let cos = (self.dot(other) / denom).clamp(-1.0, 1.0);
        Some(cos.acos().to_degrees())
    }
}

/// Attacker position plus facing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub forward: Vec3,
}

impl Transform {
    pub fn new(position: Vec3, forward: Vec3) -> Self {
        Self { position, forward }
    }
}

/// Shape of an area attack.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum AreaShape {
    /// Everything within `range`.
    Radius { range: f64 },
    /// Within `range` and at most `half_angle_deg` off the forward vector.
    /// A zero forward vector hits nothing.
    Cone { range: f64, half_angle_deg: f64 },
    /// Ahead of the attacker, within `range`, at most `width` off the forward axis.
    Line { range: f64, width: f64 },
}

pub fn in_range(distance: f64, range: f64) -> bool {
    distance <= range
}

pub fn in_cone(distance: f64, angle_to_target_deg: f64, range: f64, half_angle_deg: f64) -> bool {
    distance <= range && angle_to_target_deg <= half_angle_deg
}

pub fn in_line(
    distance: f64,
    perpendicular_offset: f64,
    forward_dot: f64,
    range: f64,
    width: f64,
) -> bool {
    distance <= range && perpendicular_offset <= width && forward_dot > 0.0
}

/// Whether `target` is hit by `shape` cast from `attacker`.
pub fn hits(attacker: &Transform, target: Vec3, shape: AreaShape) -> bool {
    let to_target = target.sub(attacker.position);
    let distance = to_target.length();

    match shape {
        AreaShape::Radius { range } => in_range(distance, range),
        AreaShape::Cone {
            range,
            half_angle_deg,
        } => {
            attacker
                .forward
                .angle_deg(to_target)
                .is_some_and(|angle| in_cone(distance, angle, range, half_angle_deg))
        }
        AreaShape::Line { range, width } => {
            let projected = to_target.project_onto(attacker.forward);
            let perpendicular = to_target.sub(projected).length();
            let forward_dot = to_target.dot(attacker.forward);
            in_line(distance, perpendicular, forward_dot, range, width)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn facing_x() -> Transform {
        Transform::new(Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0))
    }

    #[test]
    fn test_radius_boundary_is_inclusive() {
        let attacker = facing_x();
        assert!(hits(&attacker, Vec3::new(0.0, 0.0, 2.0), AreaShape::Radius { range: 2.0 }));
        assert!(!hits(&attacker, Vec3::new(0.0, 0.0, 2.01), AreaShape::Radius { range: 2.0 }));
    }

    #[test]
    fn test_cone_rejects_targets_behind() {
        let attacker = facing_x();
        let cone = AreaShape::Cone {
            range: 10.0,
            half_angle_deg: 30.0,
        };
        assert!(hits(&attacker, Vec3::new(5.0, 0.0, 1.0), cone));
        assert!(!hits(&attacker, Vec3::new(-5.0, 0.0, 0.0), cone));
        // 45 degrees off axis
        assert!(!hits(&attacker, Vec3::new(3.0, 0.0, 3.0), cone));
    }

    #[test]
    fn test_line_uses_perpendicular_offset() {
        let attacker = facing_x();
        let line = AreaShape::Line {
            range: 10.0,
            width: 1.0,
        };
        assert!(hits(&attacker, Vec3::new(6.0, 0.0, 0.9), line));
        assert!(!hits(&attacker, Vec3::new(6.0, 0.0, 1.5), line));
        assert!(!hits(&attacker, Vec3::new(-2.0, 0.0, 0.0), line));
        assert!(!hits(&attacker, Vec3::new(11.0, 0.0, 0.0), line));
    }

    #[test]
    fn test_target_on_attacker_position() {
        let attacker = facing_x();
        assert!(hits(&attacker, Vec3::ZERO, AreaShape::Radius { range: 0.0 }));
        // No direction to the target, so directional shapes miss it
        assert!(!hits(&attacker, Vec3::ZERO, AreaShape::Line { range: 1.0, width: 1.0 }));
        let cone = AreaShape::Cone {
            range: 1.0,
            half_angle_deg: 45.0,
        };
        assert!(!hits(&attacker, Vec3::ZERO, cone));
    }

    #[test]
    fn test_angle_between_vectors() {
        let a = Vec3::new(1.0, 0.0, 0.0);
        let b = Vec3::new(0.0, 0.0, 1.0);
        assert!((a.angle_deg(b).unwrap() - 90.0).abs() < 1e-9);
        assert_eq!(a.angle_deg(Vec3::ZERO), None);
    }

    #[test]
    fn test_cone_without_facing_hits_nothing() {
        let attacker = Transform::new(Vec3::ZERO, Vec3::ZERO);
        let cone = AreaShape::Cone {
            range: 10.0,
            half_angle_deg: 180.0,
        };
        for target in [
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(-1.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, 3.0),
        ] {
            assert!(!hits(&attacker, target, cone), "{target:?} hit with no facing");
        }
        // Radius does not depend on facing.
        assert!(hits(&attacker, Vec3::new(1.0, 0.0, 0.0), AreaShape::Radius { range: 2.0 }));
    }
}
