mod framework;

use convergence::camera;
use convergence::frame_clock::FrameClock;
use convergence::placeholder::Placeholder;
use convergence::readiness::{readiness_channel, ReadySignal};
use convergence::renderer::Renderer;
use convergence::visual::ConvergenceVisual;
use convergence::visual_params::{self, VisualParams};
use log::{error, info};

gflags::define! {
    --config: &str = "visual_config.toml"
}
gflags::define! {
    /// Write the pre-ready placeholder to this PNG and exit without a window.
    --placeholder_png: &str = ""
}

// Canvas pixels for a surface of `config`'s physical size, within the
// device's texture limit.
fn canvas_size_for(
    config: &wgpu::SurfaceConfiguration,
    scale_factor: f64,
    params: &VisualParams,
    max_dimension: u32,
) -> (u32, u32) {
    let scale_factor = if scale_factor > 0.0 { scale_factor } else { 1.0 };
    let logical = (
        f64::from(config.width) / scale_factor,
        f64::from(config.height) / scale_factor,
    );
    let ratio = camera::clamp_pixel_ratio(scale_factor, params.pixel_ratio.range());
    camera::fit_to_limit(camera::canvas_size(logical, ratio), max_dimension)
}

struct ConvergenceApp {
    params: VisualParams,
    visual: ConvergenceVisual,
    renderer: Renderer,
    clock: FrameClock,
    signal: ReadySignal,
}

impl ConvergenceApp {
    fn init(
        params: VisualParams,
        config: &wgpu::SurfaceConfiguration,
        scale_factor: f64,
        device: &wgpu::Device,
    ) -> anyhow::Result<Self> {
        let max_dimension = device.limits().max_texture_dimension_2d;
        let (width, height) = canvas_size_for(config, scale_factor, &params, max_dimension);
        let (signal, gate) = readiness_channel();
        let visual = ConvergenceVisual::mount(gate, width, height);
        let renderer = Renderer::init(device, config.format, (width, height), &params)?;
        let clock = FrameClock::new(params.fps);
        Ok(ConvergenceApp {
            params,
            visual,
            renderer,
            clock,
            signal,
        })
    }
}

impl framework::App for ConvergenceApp {
    fn resize(
        &mut self,
        config: &wgpu::SurfaceConfiguration,
        scale_factor: f64,
        device: &wgpu::Device,
        _queue: &wgpu::Queue,
    ) {
        let max_dimension = device.limits().max_texture_dimension_2d;
        let (width, height) = canvas_size_for(config, scale_factor, &self.params, max_dimension);
        self.renderer.resize(device, (width, height));
        self.visual.resize(width, height);
    }

    fn handle_event(&mut self, _event: winit::event::WindowEvent) {}

    fn render(
        &mut self,
        view: &wgpu::TextureView,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
    ) -> anyhow::Result<()> {
        let output = self.visual.frame(self.clock.elapsed());
        self.renderer.render(device, queue, output, view)?;
        self.clock.tick();
        Ok(())
    }

    // The surface has presented a frame, so the scene may start.
    fn presented(&mut self) {
        self.signal.notify();
    }
}

fn export_placeholder(params: &VisualParams, path: &str) -> anyhow::Result<()> {
    let (width, height) = camera::canvas_size(
        (f64::from(params.viewport_width), f64::from(params.viewport_height)),
        camera::clamp_pixel_ratio(1.0, params.pixel_ratio.range()),
    );
    Placeholder::new(width, height).save_png(path)
}

fn run() -> anyhow::Result<()> {
    framework::init()?;
    let params = visual_params::get_config(CONFIG.flag);
    info!("Visual params: {:?}", params);

    if !PLACEHOLDER_PNG.flag.is_empty() {
        return export_placeholder(&params, PLACEHOLDER_PNG.flag);
    }

    let window = framework::WindowParams {
        title: "Convergence",
        logical_size: (params.viewport_width, params.viewport_height),
        transparent: params.transparent,
        high_performance: params.high_performance,
    };
    framework::run(&window, |config, scale_factor, device, _queue| {
        ConvergenceApp::init(params, config, scale_factor, device)
    })
}

fn main() {
    if let Err(e) = run() {
        error!("{:?}", e);
        eprintln!("Error: {:?}", e);
        std::process::exit(1);
    }
}
