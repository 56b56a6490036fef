// Copyright @yucwang 2023

use crate::math::constants::{ Vector3f };

/// Orthonormal basis; `z` is the reference axis (surface normal or
/// propagation direction) and local directions are expressed against it.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Frame {
    pub x: Vector3f,
    pub y: Vector3f,
    pub z: Vector3f
}

impl Default for Frame {
    fn default() -> Self {
        Frame {
            x: Vector3f::new(1.0, 0.0, 0.0),
            y: Vector3f::new(0.0, 1.0, 0.0),
            z: Vector3f::new(0.0, 0.0, 1.0)
        }
    }
}

impl Frame {
    pub fn new(new_x: Vector3f, new_y: Vector3f, new_z: Vector3f) -> Frame {
        Frame {
            x: new_x,
            y: new_y,
            z: new_z
        }
    }

    /// Builds a frame around the unit vector `n`.
    pub fn from_z(n: Vector3f) -> Frame {
        let up = if n.z.abs() < 0.999 {
            Vector3f::new(0.0, 0.0, 1.0)
        } else {
            Vector3f::new(1.0, 0.0, 0.0)
        };
        let x = up.cross(&n).normalize();
        let y = n.cross(&x);
        Frame { x, y, z: n }
    }

    pub fn to_local(&self, v: Vector3f) -> Vector3f {
        Vector3f::new(v.dot(&self.x), v.dot(&self.y), v.dot(&self.z))
    }

    pub fn from_local(&self, v: Vector3f) -> Vector3f {
        v.x * self.x + v.y * self.y + v.z * self.z
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_round_trip_is_orthonormal() {
        let normals = [
            Vector3f::new(0.0, 0.0, 1.0),
            Vector3f::new(0.0, 0.0, -1.0),
            Vector3f::new(0.3, -0.4, 0.5).normalize(),
        ];
        for n in &normals {
            let frame = Frame::from_z(*n);
            assert!(frame.x.dot(&frame.y).abs() < 1e-5);
            assert!(frame.x.dot(&frame.z).abs() < 1e-5);
            assert!((frame.x.cross(&frame.y) - frame.z).norm() < 1e-5);

            let v = Vector3f::new(0.2, 0.9, -0.1);
            let back = frame.from_local(frame.to_local(v));
            assert!((back - v).norm() < 1e-5);
            assert!((frame.to_local(*n) - Vector3f::new(0.0, 0.0, 1.0)).norm() < 1e-5);
        }
    }
}
