use crate::placeholder::Placeholder;
use crate::readiness::ReadinessGate;
use crate::scene::Scene;

/// What the host should draw this frame.
pub enum FrameOutput<'a> {
    Placeholder(&'a Placeholder),
    Scene(&'a Scene),
}

// The mounted visual. Until the gate opens it only ever hands out the static
// placeholder; the scene (and with it every particle buffer) is created on the
// first frame after the gate opens and animated on every frame after that.
// Scene time starts at zero on that first frame.
pub struct ConvergenceVisual {
    gate: ReadinessGate,
    placeholder: Placeholder,
    scene: Option<Scene>,
    scene_start: f64,
}

impl ConvergenceVisual {
    pub fn mount(gate: ReadinessGate, canvas_width: u32, canvas_height: u32) -> Self {
        ConvergenceVisual {
            gate,
            placeholder: Placeholder::new(canvas_width, canvas_height),
            scene: None,
            scene_start: 0.0,
        }
    }

    pub fn frame(&mut self, elapsed: f64) -> FrameOutput<'_> {
        if !self.gate.poll() {
            return FrameOutput::Placeholder(&self.placeholder);
        }
        if self.scene.is_none() {
            self.scene_start = elapsed;
        }
        let scene = self.scene.get_or_insert_with(Scene::new);
        scene.update(elapsed - self.scene_start);
        FrameOutput::Scene(scene)
    }

    pub fn is_ready(&self) -> bool {
        self.gate.is_ready()
    }

    pub fn scene(&self) -> Option<&Scene> {
        self.scene.as_ref()
    }

    pub fn placeholder(&self) -> &Placeholder {
        &self.placeholder
    }

    pub fn resize(&mut self, canvas_width: u32, canvas_height: u32) {
        // Only the placeholder depends on the canvas bounds.
        if self.scene.is_none() {
            self.placeholder = Placeholder::new(canvas_width, canvas_height);
        }
    }
}
