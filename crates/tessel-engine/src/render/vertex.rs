use bytemuck::{Pod, Zeroable};

use crate::coords::{ColorRgba, Vec2};

/// Interleaved vertex record consumed by the backend (20 bytes):
///
///  offset  0  position  [f32; 2]  loc 0
///  offset  8  texcoord  [f32; 2]  loc 1
///  offset 16  color     [u8; 4]   loc 2 (normalized)
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct SpriteVertex {
    pub position: [f32; 2],
    pub texcoord: [f32; 2],
    pub color: [u8; 4],
}

impl SpriteVertex {
    const ATTRS: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        0 => Float32x2, // position
        1 => Float32x2, // texcoord
        2 => Unorm8x4   // color
    ];

    /// A vertex with opaque white color and zeroed position/texcoord.
    #[inline]
    pub const fn white() -> Self {
        Self {
            position: [0.0; 2],
            texcoord: [0.0; 2],
            color: ColorRgba::white().to_array(),
        }
    }

    #[inline]
    pub fn position(&self) -> Vec2 {
        Vec2::from(self.position)
    }

    #[inline]
    pub fn set_position(&mut self, p: Vec2) {
        self.position = p.into();
    }

    #[inline]
    pub fn texcoord(&self) -> Vec2 {
        Vec2::from(self.texcoord)
    }

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<SpriteVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}
