use super::{RenderCtx, SpriteVertex};

/// Destination for a contiguous run of vertex records.
///
/// The record layout is fixed ([`SpriteVertex`]); there is no negotiation.
pub trait VertexSink {
    fn upload(&mut self, vertices: &[SpriteVertex]);
}

/// CPU copy, mostly for tests and headless hosts.
impl VertexSink for Vec<SpriteVertex> {
    fn upload(&mut self, vertices: &[SpriteVertex]) {
        self.clear();
        self.extend_from_slice(vertices);
    }
}

/// GPU vertex buffer that grows to fit whatever is uploaded.
///
/// Capacity is rounded up to the next power of two (minimum 64 records) so a
/// batch that grows one sprite at a time does not reallocate every frame.
pub struct GpuVertexBuffer<'a> {
    ctx: RenderCtx<'a>,
    buffer: Option<wgpu::Buffer>,
    capacity: usize,
    len: usize,
}

impl<'a> GpuVertexBuffer<'a> {
    pub fn new(ctx: RenderCtx<'a>) -> Self {
        Self {
            ctx,
            buffer: None,
            capacity: 0,
            len: 0,
        }
    }

    /// The backing buffer, once something has been uploaded.
    pub fn buffer(&self) -> Option<&wgpu::Buffer> {
        self.buffer.as_ref()
    }

    /// Number of records written by the last upload.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn ensure_capacity(&mut self, required: usize) {
        if required <= self.capacity && self.buffer.is_some() {
            return;
        }
        let new_cap = required.next_power_of_two().max(64);
        let new_size = (new_cap * std::mem::size_of::<SpriteVertex>()) as u64;
        log::debug!("GpuVertexBuffer: growing to {new_cap} vertices");
        self.buffer = Some(self.ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("tessel sprite vbo"),
            size: new_size,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        }));
        self.capacity = new_cap;
    }
}

impl VertexSink for GpuVertexBuffer<'_> {
    fn upload(&mut self, vertices: &[SpriteVertex]) {
        self.len = vertices.len();
        if vertices.is_empty() {
            return;
        }
        self.ensure_capacity(vertices.len());
        let Some(buffer) = self.buffer.as_ref() else { return; };
        self.ctx.queue.write_buffer(buffer, 0, bytemuck::cast_slice(vertices));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vec_sink_replaces_contents() {
        let mut sink: Vec<SpriteVertex> = vec![SpriteVertex::default(); 8];
        sink.upload(&[SpriteVertex::white(); 4]);
        assert_eq!(sink.len(), 4);
        assert!(sink.iter().all(|v| v.color == [0xff; 4]));
    }
}
