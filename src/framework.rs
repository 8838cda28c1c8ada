use std::sync::Arc;
use winit::event::WindowEvent;

gflags::define! {
    --log_filter: &str = "warn,convergence=info"
}
gflags::define! {
    -h, --help = false
}

// Parses the command line and installs the logger. Call before anything logs.
pub fn init() -> anyhow::Result<()> {
    gflags::parse();
    if HELP.flag {
        gflags::print_help_and_exit(0);
    }
    scrub_log::init_with_filter_string(LOG_FILTER.flag)
        .map_err(|e| anyhow::anyhow!("Failed to init logging: {:?}", e))?;
    Ok(())
}

// "Framework" for a windowed executable. The app itself is built by the
// closure handed to `run` once the device and surface exist.
pub trait App: Sized {
    fn resize(
        &mut self,
        config: &wgpu::SurfaceConfiguration,
        scale_factor: f64,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
    );
    fn handle_event(&mut self, event: WindowEvent);
    fn render(
        &mut self,
        view: &wgpu::TextureView,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
    ) -> anyhow::Result<()>;
    // Called once a rendered frame has been handed to the compositor.
    fn presented(&mut self) {}
}

pub struct WindowParams<'a> {
    pub title: &'a str,
    pub logical_size: (u32, u32),
    pub transparent: bool,
    pub high_performance: bool,
}

fn is_exit_key(key: &winit::keyboard::Key) -> bool {
    use winit::keyboard::{Key, NamedKey};
    match key {
        Key::Named(NamedKey::Escape) => true,
        Key::Character(c) => c.as_str() == "q",
        _ => false,
    }
}

fn choose_alpha_mode(modes: &[wgpu::CompositeAlphaMode], transparent: bool) -> wgpu::CompositeAlphaMode {
    let preferred = if transparent {
        modes
            .iter()
            .copied()
            .find(|m| *m != wgpu::CompositeAlphaMode::Opaque)
    } else {
        None
    };
    preferred
        .or_else(|| modes.first().copied())
        .unwrap_or(wgpu::CompositeAlphaMode::Auto)
}

pub fn run<A, F>(params: &WindowParams, init: F) -> anyhow::Result<()>
where
    A: App,
    F: FnOnce(&wgpu::SurfaceConfiguration, f64, &wgpu::Device, &wgpu::Queue) -> anyhow::Result<A>,
{
    use winit::{
        event::{ElementState, Event, KeyEvent},
        event_loop::{ControlFlow, EventLoop},
    };

    let event_loop = EventLoop::new()?;
    log::info!("Initializing the window...");
    let window = Arc::new(
        winit::window::WindowBuilder::new()
            .with_title(params.title)
            .with_transparent(params.transparent)
            .with_inner_size(winit::dpi::LogicalSize::new(
                params.logical_size.0,
                params.logical_size.1,
            ))
            .build(&event_loop)?,
    );
    let size = window.inner_size();

    let instance = wgpu::Instance::new(wgpu::InstanceDescriptor::default());
    let surface = instance.create_surface(window.clone())?;
    let adapter = futures::executor::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
        power_preference: if params.high_performance {
            wgpu::PowerPreference::HighPerformance
        } else {
            wgpu::PowerPreference::LowPower
        },
        force_fallback_adapter: false,
        compatible_surface: Some(&surface),
    }))
    .ok_or_else(|| anyhow::anyhow!("No suitable graphics adapter"))?;
    log::info!("Adapter: {:?}", adapter.get_info());

    let (device, queue) = futures::executor::block_on(adapter.request_device(
        &wgpu::DeviceDescriptor {
            label: None,
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::downlevel_webgl2_defaults().using_resolution(adapter.limits()),
        },
        None,
    ))?;

    let caps = surface.get_capabilities(&adapter);
    let format = caps
        .formats
        .iter()
        .copied()
        .find(|f| f.is_srgb())
        .or_else(|| caps.formats.first().copied())
        .ok_or_else(|| anyhow::anyhow!("Surface is incompatible with the adapter"))?;
    let mut config = wgpu::SurfaceConfiguration {
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        format,
        width: size.width.max(1),
        height: size.height.max(1),
        present_mode: wgpu::PresentMode::AutoVsync,
        desired_maximum_frame_latency: 2,
        alpha_mode: choose_alpha_mode(&caps.alpha_modes, params.transparent),
        view_formats: vec![],
    };
    surface.configure(&device, &config);

    log::info!("Initializing the app...");
    let mut app = init(&config, window.scale_factor(), &device, &queue)?;
    let mut last_frame_start = std::time::Instant::now();
    let mut failure: Option<anyhow::Error> = None;

    log::info!("Entering render loop...");
    event_loop.set_control_flow(ControlFlow::Poll);
    event_loop.run(|event, elwt| match event {
        Event::WindowEvent { event, .. } => match event {
            WindowEvent::Resized(size) => {
                log::info!("Resizing to {:?}", size);
                config.width = size.width.max(1);
                config.height = size.height.max(1);
                surface.configure(&device, &config);
                app.resize(&config, window.scale_factor(), &device, &queue);
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        logical_key,
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } if is_exit_key(&logical_key) => elwt.exit(),
            WindowEvent::CloseRequested => elwt.exit(),
            WindowEvent::RedrawRequested => {
                let frame = match surface.get_current_texture() {
                    Ok(frame) => frame,
                    Err(wgpu::SurfaceError::Lost) | Err(wgpu::SurfaceError::Outdated) => {
                        surface.configure(&device, &config);
                        return;
                    }
                    Err(e) => {
                        log::warn!("Dropped frame: {:?}", e);
                        return;
                    }
                };
                let view = frame
                    .texture
                    .create_view(&wgpu::TextureViewDescriptor::default());
                let cpu_time_start = std::time::Instant::now();
                if let Err(e) = app.render(&view, &device, &queue) {
                    log::error!("Render failed: {:?}", e);
                    failure = Some(e);
                    elwt.exit();
                    return;
                }
                let cpu_time = cpu_time_start.elapsed();
                frame.present();
                app.presented();
                let frame_time = last_frame_start.elapsed();
                last_frame_start = std::time::Instant::now();
                log::trace!("Frame time: {:?}, CPU time: {:?}", frame_time, cpu_time);
            }
            other => app.handle_event(other),
        },
        Event::AboutToWait => window.request_redraw(),
        _ => (),
    })?;

    match failure {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
