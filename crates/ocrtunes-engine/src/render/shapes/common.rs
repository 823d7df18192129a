//! GPU types and helpers shared by the shape renderers.

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use crate::coords::Viewport;
use crate::render::RenderCtx;

// ── blend ─────────────────────────────────────────────────────────────────

pub(super) fn premul_alpha_blend() -> wgpu::BlendState {
    let component = wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::One,
        dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
        operation: wgpu::BlendOperation::Add,
    };
    wgpu::BlendState { color: component, alpha: component }
}

// ── viewport uniform ──────────────────────────────────────────────────────

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(super) struct ViewportUniform {
    pub viewport: [f32; 2],
    pub _pad: [f32; 2], // 16-byte alignment
}

impl ViewportUniform {
    /// Degenerate sizes are lifted to 1 so the shader never divides by zero.
    pub(super) fn new(viewport: Viewport) -> Self {
        Self { viewport: [viewport.width.max(1.0), viewport.height.max(1.0)], _pad: [0.0; 2] }
    }
}

/// Minimum binding size of the viewport uniform.
pub(super) fn viewport_ubo_min_binding_size() -> std::num::NonZeroU64 {
    std::num::NonZeroU64::new(std::mem::size_of::<ViewportUniform>() as u64)
        .expect("ViewportUniform has non-zero size by construction")
}

pub(super) fn create_viewport_ubo(ctx: &RenderCtx<'_>, label: &str) -> wgpu::Buffer {
    ctx.device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size: std::mem::size_of::<ViewportUniform>() as u64,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

pub(super) fn write_viewport_ubo(ctx: &RenderCtx<'_>, ubo: &wgpu::Buffer) {
    ctx.queue.write_buffer(ubo, 0, bytemuck::bytes_of(&ViewportUniform::new(ctx.viewport)));
}

// ── bind group layouts ────────────────────────────────────────────────────

/// Binding 0: the viewport uniform, read by the vertex stage.
pub(super) fn viewport_layout_entry() -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding: 0,
        visibility: wgpu::ShaderStages::VERTEX,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: Some(viewport_ubo_min_binding_size()),
        },
        count: None,
    }
}

/// Bindings 1 and 2: a filterable 2D texture and its sampler.
pub(super) fn texture_layout_entries() -> [wgpu::BindGroupLayoutEntry; 2] {
    [
        wgpu::BindGroupLayoutEntry {
            binding: 1,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Texture {
                sample_type: wgpu::TextureSampleType::Float { filterable: true },
                view_dimension: wgpu::TextureViewDimension::D2,
                multisampled: false,
            },
            count: None,
        },
        wgpu::BindGroupLayoutEntry {
            binding: 2,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
            count: None,
        },
    ]
}

/// Layout, uniform and bind group for shaders that only read the viewport.
pub(super) struct ViewportBindings {
    pub layout: wgpu::BindGroupLayout,
    pub ubo: wgpu::Buffer,
    pub group: wgpu::BindGroup,
}

impl ViewportBindings {
    pub(super) fn new(ctx: &RenderCtx<'_>, label: &str) -> Self {
        let layout = ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some(&format!("{label} bgl")),
            entries: &[viewport_layout_entry()],
        });
        let ubo = create_viewport_ubo(ctx, &format!("{label} viewport ubo"));
        let group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("{label} bind group")),
            layout: &layout,
            entries: &[wgpu::BindGroupEntry { binding: 0, resource: ubo.as_entire_binding() }],
        });
        Self { layout, ubo, group }
    }
}

// ── quad ──────────────────────────────────────────────────────────────────

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(super) struct QuadVertex {
    pub pos: [f32; 2], // 0..1
}

impl QuadVertex {
    const ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x2];

    pub(super) fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<QuadVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

pub(super) const QUAD_VERTICES: [QuadVertex; 4] = [
    QuadVertex { pos: [0.0, 0.0] },
    QuadVertex { pos: [1.0, 0.0] },
    QuadVertex { pos: [1.0, 1.0] },
    QuadVertex { pos: [0.0, 1.0] },
];

pub(super) const QUAD_INDICES: [u16; 6] = [0, 1, 2, 0, 2, 3];

/// Unit quad every instance is stretched from.
pub(super) struct QuadBuffers {
    vbo: wgpu::Buffer,
    ibo: wgpu::Buffer,
}

impl QuadBuffers {
    pub(super) fn new(ctx: &RenderCtx<'_>, label: &str) -> Self {
        let vbo = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} quad vbo")),
            contents: bytemuck::cast_slice(&QUAD_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let ibo = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} quad ibo")),
            contents: bytemuck::cast_slice(&QUAD_INDICES),
            usage: wgpu::BufferUsages::INDEX,
        });
        Self { vbo, ibo }
    }

    /// Binds the quad to vertex slot 0 and the index buffer.
    pub(super) fn bind(&self, rpass: &mut wgpu::RenderPass<'_>) {
        rpass.set_vertex_buffer(0, self.vbo.slice(..));
        rpass.set_index_buffer(self.ibo.slice(..), wgpu::IndexFormat::Uint16);
    }
}

// ── pipeline ──────────────────────────────────────────────────────────────

/// Alpha-blended triangle-list pipeline: quad in slot 0, `instance` in slot 1.
pub(super) fn instanced_pipeline(
    ctx: &RenderCtx<'_>,
    label: &str,
    source: &'static str,
    bind_group_layout: &wgpu::BindGroupLayout,
    instance: wgpu::VertexBufferLayout<'static>,
) -> wgpu::RenderPipeline {
    let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(&format!("{label} shader")),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    });

    let pipeline_layout = ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(&format!("{label} pipeline layout")),
        bind_group_layouts: &[bind_group_layout],
        immediate_size: 0,
    });

    ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(&format!("{label} pipeline")),
        layout: Some(&pipeline_layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            compilation_options: Default::default(),
            buffers: &[QuadVertex::layout(), instance],
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format: ctx.surface_format,
                blend: Some(premul_alpha_blend()),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview_mask: None,
        cache: None,
    })
}

// ── instances ─────────────────────────────────────────────────────────────

/// Buffer capacity, in instances, for `required` instances.
pub(super) fn instance_capacity_for(required: usize) -> usize {
    required.next_power_of_two().max(64)
}

/// Per-frame instance staging plus the vertex buffer it is uploaded to.
///
/// The GPU buffer grows in powers of two and is never shrunk.
pub(super) struct InstanceBuffer<T> {
    label: &'static str,
    staged: Vec<T>,
    buffer: Option<wgpu::Buffer>,
    capacity: usize,
}

impl<T: Pod> InstanceBuffer<T> {
    pub(super) fn new(label: &'static str) -> Self {
        Self { label, staged: Vec::new(), buffer: None, capacity: 0 }
    }

    pub(super) fn clear(&mut self) {
        self.staged.clear();
    }

    /// Stages `instance` and returns its index.
    pub(super) fn push(&mut self, instance: T) -> u32 {
        self.staged.push(instance);
        self.staged.len() as u32 - 1
    }

    #[inline]
    pub(super) fn len(&self) -> u32 {
        self.staged.len() as u32
    }

    /// Writes the staged instances, growing the buffer first when needed.
    pub(super) fn upload(&mut self, ctx: &RenderCtx<'_>) {
        if self.staged.is_empty() {
            return;
        }
        if self.staged.len() > self.capacity || self.buffer.is_none() {
            let capacity = instance_capacity_for(self.staged.len());
            self.buffer = Some(ctx.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(self.label),
                size: (capacity * std::mem::size_of::<T>()) as u64,
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            }));
            self.capacity = capacity;
        }
        if let Some(buffer) = self.buffer.as_ref() {
            ctx.queue.write_buffer(buffer, 0, bytemuck::cast_slice(&self.staged));
        }
    }

    /// Binds the uploaded instances to vertex slot 1.
    pub(super) fn bind(&self, rpass: &mut wgpu::RenderPass<'_>) -> bool {
        let Some(buffer) = self.buffer.as_ref() else { return false; };
        rpass.set_vertex_buffer(1, buffer.slice(..));
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capacity_grows_in_powers_of_two_from_64() {
        assert_eq!(instance_capacity_for(1), 64);
        assert_eq!(instance_capacity_for(64), 64);
        assert_eq!(instance_capacity_for(65), 128);
        assert_eq!(instance_capacity_for(1000), 1024);
    }

    #[test]
    fn viewport_uniform_never_divides_by_zero() {
        let u = ViewportUniform::new(Viewport::new(0.0, 900.0));
        assert_eq!(u.viewport, [1.0, 900.0]);
        assert_eq!(std::mem::size_of::<ViewportUniform>(), 16);
    }

    #[test]
    fn staged_instances_are_indexed_in_push_order() {
        let mut buf: InstanceBuffer<[f32; 2]> = InstanceBuffer::new("test");
        assert_eq!(buf.push([1.0, 2.0]), 0);
        assert_eq!(buf.push([3.0, 4.0]), 1);
        assert_eq!(buf.len(), 2);
        buf.clear();
        assert_eq!(buf.len(), 0);
    }
}
