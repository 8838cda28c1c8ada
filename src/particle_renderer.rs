use crate::camera::{Camera, CameraUniforms};
use crate::canvas::DEPTH_FORMAT;
use crate::particle_buffer::ParticleBuffer;
use crate::scene::{PointLayer, Scene, ShellLayer};
use crate::shader_utils;
use cgmath::Matrix4;
use wgpu::util::DeviceExt;
use zerocopy::AsBytes;

// This should match the `Layer` struct in points.wgsl.
#[repr(C)]
#[derive(Clone, Copy, zerocopy::AsBytes, zerocopy::FromBytes)]
pub struct LayerUniforms {
    pub model: [f32; 16],
    pub opacity: f32,
    pub size_scale: f32,
    pub _padding: [f32; 2],
}

pub fn layer_uniforms(model: &Matrix4<f32>, opacity: f32, size_scale: f32) -> LayerUniforms {
    let mut uniforms = LayerUniforms {
        model: [0.0; 16],
        opacity,
        size_scale,
        _padding: [0.0; 2],
    };
    uniforms
        .model
        .copy_from_slice(&AsRef::<[f32; 16]>::as_ref(model)[..]);
    uniforms
}

// Every sprite in a point layer has the layer's material size, which keeps a
// constant world size under perspective.
pub fn point_layer_uniforms(layer: &PointLayer<'_>, camera: &CameraUniforms) -> LayerUniforms {
    layer_uniforms(&layer.model, layer.opacity, layer.point_size * camera.point_scale)
}

// Sprites are sized in view space, so the pulse scale applies to the diameter.
pub fn shell_layer_uniforms(shell: &ShellLayer) -> LayerUniforms {
    layer_uniforms(&shell.model, shell.opacity, 2.0 * shell.radius * shell.scale)
}

// Particles glow: each sprite adds its color weighted by the layer opacity.
pub const ADDITIVE_BLENDING: wgpu::BlendState = wgpu::BlendState {
    color: wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::SrcAlpha,
        dst_factor: wgpu::BlendFactor::One,
        operation: wgpu::BlendOperation::Add,
    },
    alpha: wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::One,
        dst_factor: wgpu::BlendFactor::One,
        operation: wgpu::BlendOperation::Add,
    },
};

const POSITION_ATTRIBUTES: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x3];
const COLOR_ATTRIBUTES: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![1 => Float32x3];

fn instance_layouts() -> [wgpu::VertexBufferLayout<'static>; 2] {
    let float = std::mem::size_of::<f32>() as wgpu::BufferAddress;
    [
        wgpu::VertexBufferLayout {
            array_stride: 3 * float,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &POSITION_ATTRIBUTES,
        },
        wgpu::VertexBufferLayout {
            array_stride: 3 * float,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &COLOR_ATTRIBUTES,
        },
    ]
}

// GPU side of one draw: its uniforms and per-instance attributes.
struct GpuLayer {
    label: &'static str,
    uniform_buf: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    positions: wgpu::Buffer,
    colors: wgpu::Buffer,
    count: u32,
}

impl GpuLayer {
    fn new(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        label: &'static str,
        buffer: &ParticleBuffer,
    ) -> Self {
        let make_vertex_buffer = |contents: &[f32]| {
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents: contents.as_bytes(),
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            })
        };
        let uniforms = layer_uniforms(&Matrix4::from_scale(1.0), 1.0, 1.0);
        let uniform_buf = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: uniforms.as_bytes(),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buf.as_entire_binding(),
            }],
            label: Some(label),
        });
        GpuLayer {
            label,
            uniform_buf,
            bind_group,
            positions: make_vertex_buffer(buffer.positions()),
            colors: make_vertex_buffer(buffer.colors()),
            count: buffer.len() as u32,
        }
    }

    fn draw<'a>(&'a self, rpass: &mut wgpu::RenderPass<'a>) {
        rpass.set_bind_group(1, &self.bind_group, &[]);
        rpass.set_vertex_buffer(0, self.positions.slice(..));
        rpass.set_vertex_buffer(1, self.colors.slice(..));
        rpass.draw(0..6, 0..self.count);
    }
}

// A shell is a single sprite at the origin.
fn shell_sprite(shell: &ShellLayer) -> ParticleBuffer {
    let mut buffer = ParticleBuffer::new(1);
    buffer.set_color(0, shell.color);
    buffer
}

fn depth_state(write: bool) -> wgpu::DepthStencilState {
    wgpu::DepthStencilState {
        format: DEPTH_FORMAT,
        depth_write_enabled: write,
        depth_compare: wgpu::CompareFunction::LessEqual,
        stencil: wgpu::StencilState::default(),
        bias: wgpu::DepthBiasState::default(),
    }
}

pub struct ParticleRenderer {
    camera_uniform_buf: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    points_pipeline: wgpu::RenderPipeline,
    // The opaque-looking core occludes what passes behind it; the glows and
    // the particles only test against it.
    core_pipeline: wgpu::RenderPipeline,
    glow_pipeline: wgpu::RenderPipeline,
    point_layers: Vec<GpuLayer>,
    shell_layers: Vec<GpuLayer>,
}

impl ParticleRenderer {
    pub fn init(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        sample_count: u32,
        scene: &Scene,
    ) -> anyhow::Result<Self> {
        let shader = shader_utils::create_shader_module(device, "points.wgsl")?;

        let uniform_entry = |visibility| wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        };
        let camera_bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            entries: &[uniform_entry(wgpu::ShaderStages::VERTEX)],
            label: Some("Camera"),
        });
        let layer_bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            entries: &[uniform_entry(wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT)],
            label: Some("Layer"),
        });
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Particles"),
            bind_group_layouts: &[&camera_bind_group_layout, &layer_bind_group_layout],
            push_constant_ranges: &[],
        });

        let buffers = instance_layouts();
        let make_pipeline = |label: &str, blend: wgpu::BlendState, depth_write: bool| {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: "vs_main",
                    buffers: &buffers,
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: "fs_main",
                    targets: &[Some(wgpu::ColorTargetState {
                        format,
                        blend: Some(blend),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                }),
                primitive: wgpu::PrimitiveState::default(),
                depth_stencil: Some(depth_state(depth_write)),
                multisample: wgpu::MultisampleState {
                    count: sample_count,
                    ..Default::default()
                },
                multiview: None,
            })
        };
        let points_pipeline = make_pipeline("Points", ADDITIVE_BLENDING, false);
        let core_pipeline = make_pipeline("Core", wgpu::BlendState::ALPHA_BLENDING, true);
        let glow_pipeline = make_pipeline("Glow", wgpu::BlendState::ALPHA_BLENDING, false);

        let camera_uniform_buf = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Camera"),
            contents: Camera::default().to_uniforms().as_bytes(),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &camera_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_uniform_buf.as_entire_binding(),
            }],
            label: Some("Camera"),
        });

        let point_layers = scene
            .point_layers()
            .iter()
            .map(|layer| GpuLayer::new(device, &layer_bind_group_layout, layer.label, layer.buffer))
            .collect();
        let shell_labels = ["Core", "Inner glow", "Outer glow"];
        let shell_layers = scene
            .shell_layers()
            .iter()
            .zip(shell_labels.iter())
            .map(|(shell, &label)| {
                GpuLayer::new(device, &layer_bind_group_layout, label, &shell_sprite(shell))
            })
            .collect();

        Ok(ParticleRenderer {
            camera_uniform_buf,
            camera_bind_group,
            points_pipeline,
            core_pipeline,
            glow_pipeline,
            point_layers,
            shell_layers,
        })
    }

    // Uploads the camera, every layer's transform and opacity, and the
    // positions of layers that move per particle.
    pub fn update(&self, queue: &wgpu::Queue, camera: &Camera, scene: &Scene) {
        let camera_uniforms: CameraUniforms = camera.to_uniforms();
        queue.write_buffer(&self.camera_uniform_buf, 0, camera_uniforms.as_bytes());

        for (gpu, layer) in self.point_layers.iter().zip(scene.point_layers().iter()) {
            let uniforms = point_layer_uniforms(layer, &camera_uniforms);
            queue.write_buffer(&gpu.uniform_buf, 0, uniforms.as_bytes());
            if layer.dynamic {
                log::trace!("Uploading {} positions for {}", layer.buffer.len(), gpu.label);
                queue.write_buffer(&gpu.positions, 0, layer.buffer.positions().as_bytes());
            }
        }
        for (gpu, shell) in self.shell_layers.iter().zip(scene.shell_layers().iter()) {
            let uniforms = shell_layer_uniforms(shell);
            queue.write_buffer(&gpu.uniform_buf, 0, uniforms.as_bytes());
        }
    }

    // Shells go underneath, core first so it lands in the depth buffer, then
    // the additive particle layers. The pass needs the canvas depth attachment.
    pub fn render<'a>(&'a self, rpass: &mut wgpu::RenderPass<'a>) {
        rpass.set_bind_group(0, &self.camera_bind_group, &[]);
        for (i, layer) in self.shell_layers.iter().enumerate() {
            rpass.set_pipeline(if i == 0 {
                &self.core_pipeline
            } else {
                &self.glow_pipeline
            });
            layer.draw(rpass);
        }
        rpass.set_pipeline(&self.points_pipeline);
        for layer in &self.point_layers {
            layer.draw(rpass);
        }
    }
}
