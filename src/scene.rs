use crate::ambient_cloud::{AmbientCloud, AMBIENT_OPACITY, AMBIENT_POINT_SIZE};
use crate::color_maps::Color;
use crate::converging_streams::{ConvergingStreams, STREAM_OPACITY, STREAM_POINT_SIZE};
use crate::core_glow::CoreGlow;
use crate::orbital_rings::OrbitalRings;
use crate::particle_buffer::ParticleBuffer;
use cgmath::{Matrix4, Rad};

// Whole-scene turn, radians per second.
const SCENE_ANGULAR_RATE: f64 = 0.05;

pub const POINT_LAYER_COUNT: usize = 5;
pub const SHELL_LAYER_COUNT: usize = 3;

/// A particle buffer to draw with additive blending.
pub struct PointLayer<'a> {
    pub label: &'static str,
    pub model: Matrix4<f32>,
    pub opacity: f32,
    // Sprite size for every particle in the layer.
    pub point_size: f32,
    pub buffer: &'a ParticleBuffer,
    // Positions change every frame and must be re-uploaded.
    pub dynamic: bool,
}

/// One of the core's translucent spheres.
pub struct ShellLayer {
    pub model: Matrix4<f32>,
    pub radius: f32,
    // Current pulse scale, also folded into `model`.
    pub scale: f32,
    pub color: Color,
    pub opacity: f32,
}

// Everything the visual draws. Created when the visual mounts and advanced by
// `update` once per frame.
pub struct Scene {
    core: CoreGlow,
    rings: OrbitalRings,
    streams: ConvergingStreams,
    ambient: AmbientCloud,
    rotation_y: f32,
}

impl Scene {
    pub fn new() -> Self {
        let scene = Scene {
            core: CoreGlow::new(),
            rings: OrbitalRings::new(),
            streams: ConvergingStreams::new(),
            ambient: AmbientCloud::new(),
            rotation_y: 0.0,
        };
        log::info!(
            "Scene mounted with {} particles",
            scene.point_layers().iter().map(|l| l.buffer.len()).sum::<usize>()
        );
        scene
    }

    pub fn update(&mut self, elapsed: f64) {
        self.rotation_y = (elapsed * SCENE_ANGULAR_RATE) as f32;
        self.core.update(elapsed);
        self.rings.update(elapsed);
        self.streams.update(elapsed);
        self.ambient.update(elapsed);
    }

    pub fn rotation_y(&self) -> f32 {
        self.rotation_y
    }

    pub fn core(&self) -> &CoreGlow {
        &self.core
    }

    pub fn rings(&self) -> &OrbitalRings {
        &self.rings
    }

    pub fn streams(&self) -> &ConvergingStreams {
        &self.streams
    }

    pub fn ambient(&self) -> &AmbientCloud {
        &self.ambient
    }

    fn scene_transform(&self) -> Matrix4<f32> {
        Matrix4::from_angle_y(Rad(self.rotation_y))
    }

    // Rings first, then streams, then ambient dust. The layer order is stable
    // so renderers can key GPU resources by index.
    pub fn point_layers(&self) -> [PointLayer<'_>; POINT_LAYER_COUNT] {
        let scene = self.scene_transform();
        let ring_group = scene * Matrix4::from_angle_y(Rad(self.rings.group_rotation_y()));
        let rings = self.rings.rings();
        let ring_layer = move |i: usize, label: &'static str| PointLayer {
            label,
            model: ring_group * Matrix4::from_angle_z(Rad(rings[i].rotation_z)),
            opacity: rings[i].shape.opacity,
            point_size: rings[i].shape.point_size,
            buffer: &rings[i].buffer,
            dynamic: false,
        };
        [
            ring_layer(0, "Ring 1"),
            ring_layer(1, "Ring 2"),
            ring_layer(2, "Ring 3"),
            PointLayer {
                label: "Converging streams",
                model: scene,
                opacity: STREAM_OPACITY,
                point_size: STREAM_POINT_SIZE,
                buffer: self.streams.buffer(),
                dynamic: true,
            },
            PointLayer {
                label: "Ambient cloud",
                model: scene,
                opacity: AMBIENT_OPACITY,
                point_size: AMBIENT_POINT_SIZE,
                buffer: self.ambient.buffer(),
                dynamic: true,
            },
        ]
    }

    pub fn shell_layers(&self) -> [ShellLayer; SHELL_LAYER_COUNT] {
        let scene = self.scene_transform();
        let layer = |shell: &crate::core_glow::Shell| ShellLayer {
            model: scene * Matrix4::from_scale(shell.scale),
            radius: shell.radius,
            scale: shell.scale,
            color: shell.color,
            opacity: shell.opacity,
        };
        let [core, inner, outer] = self.core.shells();
        [layer(core), layer(inner), layer(outer)]
    }
}

impl Default for Scene {
    fn default() -> Self {
        Scene::new()
    }
}
