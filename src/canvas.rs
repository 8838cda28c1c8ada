pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

// Offscreen render target at the clamped device pixel ratio. With MSAA the
// scene is drawn into a multisampled texture and resolved into `view`, which
// is what gets sampled when the canvas is blitted to the window.
pub struct Canvas {
    pub width: u32,
    pub height: u32,
    pub sample_count: u32,
    pub format: wgpu::TextureFormat,
    pub view: wgpu::TextureView,
    multisampled_view: Option<wgpu::TextureView>,
    depth_view: wgpu::TextureView,
}

fn make_texture(
    device: &wgpu::Device,
    width: u32,
    height: u32,
    format: wgpu::TextureFormat,
    sample_count: u32,
    usage: wgpu::TextureUsages,
    label: &str,
) -> wgpu::TextureView {
    device
        .create_texture(&wgpu::TextureDescriptor {
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage,
            label: Some(label),
            view_formats: &[],
        })
        .create_view(&wgpu::TextureViewDescriptor::default())
}

impl Canvas {
    pub fn new(
        device: &wgpu::Device,
        width: u32,
        height: u32,
        format: wgpu::TextureFormat,
        sample_count: u32,
    ) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        log::info!(
            "Canvas: {}x{}, {} sample(s), {:?}",
            width,
            height,
            sample_count,
            format
        );
        let view = make_texture(
            device,
            width,
            height,
            format,
            1,
            wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::RENDER_ATTACHMENT,
            "Canvas",
        );
        let multisampled_view = if sample_count > 1 {
            Some(make_texture(
                device,
                width,
                height,
                format,
                sample_count,
                wgpu::TextureUsages::RENDER_ATTACHMENT,
                "Canvas multisampled",
            ))
        } else {
            None
        };
        let depth_view = make_texture(
            device,
            width,
            height,
            DEPTH_FORMAT,
            sample_count,
            wgpu::TextureUsages::RENDER_ATTACHMENT,
            "Canvas depth",
        );
        Canvas {
            width,
            height,
            sample_count,
            format,
            view,
            multisampled_view,
            depth_view,
        }
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn color_attachment(&self, clear: wgpu::Color) -> wgpu::RenderPassColorAttachment<'_> {
        let ops = wgpu::Operations {
            load: wgpu::LoadOp::Clear(clear),
            store: wgpu::StoreOp::Store,
        };
        match &self.multisampled_view {
            Some(multisampled) => wgpu::RenderPassColorAttachment {
                view: multisampled,
                resolve_target: Some(&self.view),
                ops,
            },
            None => wgpu::RenderPassColorAttachment {
                view: &self.view,
                resolve_target: None,
                ops,
            },
        }
    }

    // Cleared to the far plane every frame; nothing reads it afterwards.
    pub fn depth_attachment(&self) -> wgpu::RenderPassDepthStencilAttachment<'_> {
        wgpu::RenderPassDepthStencilAttachment {
            view: &self.depth_view,
            depth_ops: Some(wgpu::Operations {
                load: wgpu::LoadOp::Clear(1.0),
                store: wgpu::StoreOp::Discard,
            }),
            stencil_ops: None,
        }
    }
}
