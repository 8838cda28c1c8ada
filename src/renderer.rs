use crate::camera::Camera;
use crate::canvas::Canvas;
use crate::particle_renderer::ParticleRenderer;
use crate::placeholder::Placeholder;
use crate::textured_quad::{self, TexturedQuad};
use crate::visual::FrameOutput;
use crate::visual_params::VisualParams;

// Sampled and blended in linear space, resolved from MSAA.
pub const CANVAS_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

struct PlaceholderTexture {
    size: (u32, u32),
    bind_group: wgpu::BindGroup,
}

// Draws whatever the visual hands out into the canvas, then copies the canvas
// onto the window surface.
pub struct Renderer {
    camera: Camera,
    canvas: Canvas,
    clear_color: wgpu::Color,
    placeholder_quad: TexturedQuad,
    placeholder_texture: Option<PlaceholderTexture>,
    viewport_quad: TexturedQuad,
    viewport_bind_group: wgpu::BindGroup,
    // Created with the scene, on the first frame after the gate opens.
    particles: Option<ParticleRenderer>,
}

impl Renderer {
    pub fn init(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        canvas_size: (u32, u32),
        params: &VisualParams,
    ) -> anyhow::Result<Self> {
        let sample_count = params.sample_count();
        let canvas = Canvas::new(device, canvas_size.0, canvas_size.1, CANVAS_FORMAT, sample_count);
        let camera = Camera {
            screen_size: canvas.size(),
            ..Default::default()
        };
        let placeholder_quad = TexturedQuad::init(
            device,
            CANVAS_FORMAT,
            sample_count,
            Some(wgpu::BlendState::ALPHA_BLENDING),
            "Placeholder",
        )?;
        let viewport_quad = TexturedQuad::init(
            device,
            surface_format,
            1,
            Some(wgpu::BlendState::REPLACE),
            "Viewport",
        )?;
        let viewport_bind_group = viewport_quad.bind(device, &canvas.view);
        let [r, g, b, a] = params.clear_color();
        Ok(Renderer {
            camera,
            canvas,
            clear_color: wgpu::Color { r, g, b, a },
            placeholder_quad,
            placeholder_texture: None,
            viewport_quad,
            viewport_bind_group,
            particles: None,
        })
    }

    pub fn resize(&mut self, device: &wgpu::Device, canvas_size: (u32, u32)) {
        if canvas_size == self.canvas.size() {
            return;
        }
        self.canvas = Canvas::new(
            device,
            canvas_size.0,
            canvas_size.1,
            self.canvas.format,
            self.canvas.sample_count,
        );
        self.camera.screen_size = self.canvas.size();
        self.viewport_bind_group = self.viewport_quad.bind(device, &self.canvas.view);
    }

    fn upload_placeholder(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, placeholder: &Placeholder) {
        let size = (placeholder.width(), placeholder.height());
        if let Some(texture) = &self.placeholder_texture {
            if texture.size == size {
                return;
            }
        }
        log::debug!("Uploading {}x{} placeholder", size.0, size.1);
        let view = textured_quad::create_rgba_texture(device, queue, size.0, size.1, placeholder.pixels());
        self.placeholder_texture = Some(PlaceholderTexture {
            size,
            bind_group: self.placeholder_quad.bind(device, &view),
        });
    }

    pub fn render(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        output: FrameOutput<'_>,
        target: &wgpu::TextureView,
    ) -> anyhow::Result<()> {
        match output {
            FrameOutput::Placeholder(placeholder) => {
                self.upload_placeholder(device, queue, placeholder);
            }
            FrameOutput::Scene(scene) => {
                if self.particles.is_none() {
                    self.particles = Some(ParticleRenderer::init(
                        device,
                        self.canvas.format,
                        self.canvas.sample_count,
                        scene,
                    )?);
                    // The placeholder is never shown again.
                    self.placeholder_texture = None;
                }
                if let Some(particles) = &self.particles {
                    particles.update(queue, &self.camera, scene);
                }
            }
        }

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor { label: None });
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Canvas"),
                color_attachments: &[Some(self.canvas.color_attachment(self.clear_color))],
                // Only the particle pipelines declare a depth target.
                depth_stencil_attachment: self
                    .particles
                    .as_ref()
                    .map(|_| self.canvas.depth_attachment()),
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            match (&self.particles, &self.placeholder_texture) {
                (Some(particles), _) => particles.render(&mut rpass),
                (None, Some(texture)) => self.placeholder_quad.render(&mut rpass, &texture.bind_group),
                (None, None) => {}
            }
        }
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Viewport"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            self.viewport_quad.render(&mut rpass, &self.viewport_bind_group);
        }
        queue.submit(Some(encoder.finish()));
        Ok(())
    }
}
