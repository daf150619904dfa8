//! Right-handed to left-handed conversion applied per vertex as it is read.
//!
//! Source data is right-handed, Y-up, with texture `v` growing upwards; the
//! target is left-handed, Y-up, with `v` growing downwards. Mirroring Z must
//! go together with the triangle-list winding flip in [`crate::triangulate`].

use glam::{Vec2, Vec3};

const MIRROR_Z: Vec3 = Vec3::new(1.0, 1.0, -1.0);

/// Mirror a position across the XY plane.
pub fn convert_position(position: [f32; 3]) -> [f32; 3] {
    (Vec3::from_array(position) * MIRROR_Z).to_array()
}

/// Mirror a normal across the XY plane.
pub fn convert_normal(normal: [f32; 3]) -> [f32; 3] {
    (Vec3::from_array(normal) * MIRROR_Z).to_array()
}

/// Move the texture origin from bottom-left to top-left when `flip_v` is set.
pub fn convert_uv(uv: [f32; 2], flip_v: bool) -> [f32; 2] {
    let uv = Vec2::from_array(uv);
    if flip_v {
        Vec2::new(uv.x, 1.0 - uv.y).to_array()
    } else {
        uv.to_array()
    }
}
