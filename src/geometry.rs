use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use lazy_static::lazy_static;

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
}

impl Vertex {
    pub const COMPONENTS: i32 = 3;
}

impl From<Vec3> for Vertex {
    fn from(v: Vec3) -> Self {
        Self {
            position: v.to_array(),
        }
    }
}

lazy_static! {
    /// Unit-sided triangle centred on the origin.
    pub static ref TRIANGLE: [Vertex; 3] = equilateral_triangle(1.0);
}

/// Equilateral triangle with edge `side`, flat edge at the bottom, centroid at
/// the origin, wound counter-clockwise.
pub fn equilateral_triangle(side: f32) -> [Vertex; 3] {
    let height = side * 3f32.sqrt() / 2.0;
    let half = side / 2.0;
    [
        Vec3::new(-half, -height / 3.0, 0.0).into(),
        Vec3::new(half, -height / 3.0, 0.0).into(),
        Vec3::new(0.0, height * 2.0 / 3.0, 0.0).into(),
    ]
}
