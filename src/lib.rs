pub mod ambient_cloud;
pub mod camera;
pub mod canvas;
pub mod color_maps;
pub mod converging_streams;
pub mod core_glow;
pub mod frame_clock;
pub mod orbital_rings;
pub mod particle_buffer;
pub mod particle_renderer;
pub mod placeholder;
pub mod readiness;
pub mod renderer;
pub mod scene;
pub mod seeded_random;
pub mod shader_utils;
pub mod textured_quad;
pub mod visual;
pub mod visual_params;
