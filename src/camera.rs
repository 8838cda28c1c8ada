use cgmath::{EuclideanSpace, Matrix4, Point3, Vector3};

#[cfg_attr(rustfmt, rustfmt_skip)]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

// This should match the `Camera` struct in points.wgsl.
#[repr(C)]
#[derive(Clone, Copy, zerocopy::AsBytes, zerocopy::FromBytes)]
pub struct CameraUniforms {
    pub projection: [f32; 16],
    pub view: [f32; 16],
    // World-space size of a point of size 1 at unit distance.
    pub point_scale: f32,
    pub _padding: [f32; 3],
}

pub struct Camera {
    pub eye: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub screen_size: (u32, u32),
}

impl Default for Camera {
    fn default() -> Camera {
        Camera {
            eye: Point3::new(0.0, 2.0, 12.0),
            target: Point3::origin(),
            up: Vector3::unit_y(),
            fov_degrees: 45.0,
            near: 0.1,
            far: 1000.0,
            screen_size: (1280, 720),
        }
    }
}

impl Camera {
    pub fn aspect(&self) -> f32 {
        self.screen_size.0.max(1) as f32 / self.screen_size.1.max(1) as f32
    }

    pub fn projection(&self) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX
            * cgmath::perspective(cgmath::Deg(self.fov_degrees), self.aspect(), self.near, self.far)
    }

    pub fn view(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(self.eye, self.target, self.up)
    }

    // Sprites keep a constant world size, so a point of size s spans
    // s * tan(fov / 2) world units.
    pub fn point_scale(&self) -> f32 {
        (self.fov_degrees.to_radians() / 2.0).tan()
    }

    pub fn to_uniforms(&self) -> CameraUniforms {
        let projection = self.projection();
        let view = self.view();
        let mut uniforms = CameraUniforms {
            projection: [0.0; 16],
            view: [0.0; 16],
            point_scale: self.point_scale(),
            _padding: [0.0; 3],
        };
        uniforms
            .projection
            .copy_from_slice(&AsRef::<[f32; 16]>::as_ref(&projection)[..]);
        uniforms
            .view
            .copy_from_slice(&AsRef::<[f32; 16]>::as_ref(&view)[..]);
        uniforms
    }
}

/// Canvas pixels per logical pixel: the host's hint clamped to `range`.
pub fn clamp_pixel_ratio(hint: f64, range: [f64; 2]) -> f64 {
    if !hint.is_finite() {
        return range[0];
    }
    hint.max(range[0]).min(range[1])
}

/// Canvas size in pixels for a window of `logical` size.
pub fn canvas_size(logical: (f64, f64), pixel_ratio: f64) -> (u32, u32) {
    (
        ((logical.0 * pixel_ratio).round() as u32).max(1),
        ((logical.1 * pixel_ratio).round() as u32).max(1),
    )
}

/// Shrinks `size` uniformly so neither side exceeds `max_dimension`.
pub fn fit_to_limit(size: (u32, u32), max_dimension: u32) -> (u32, u32) {
    let longest = size.0.max(size.1);
    if longest <= max_dimension {
        return size;
    }
    let scale = f64::from(max_dimension) / f64::from(longest);
    (
        ((f64::from(size.0) * scale).floor() as u32).max(1),
        ((f64::from(size.1) * scale).floor() as u32).max(1),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{Transform, Vector4};

    #[test]
    fn pixel_ratio_clamped() {
        let range = [1.0, 2.0];
        assert_eq!(clamp_pixel_ratio(0.5, range), 1.0);
        assert_eq!(clamp_pixel_ratio(1.5, range), 1.5);
        assert_eq!(clamp_pixel_ratio(3.0, range), 2.0);
        assert_eq!(clamp_pixel_ratio(f64::NAN, range), 1.0);
    }

    #[test]
    fn canvas_scaled_by_ratio() {
        assert_eq!(canvas_size((640.0, 360.0), 2.0), (1280, 720));
        assert_eq!(canvas_size((0.0, 0.0), 2.0), (1, 1));
    }

    #[test]
    fn canvas_fits_texture_limit() {
        assert_eq!(fit_to_limit((1280, 720), 8192), (1280, 720));
        assert_eq!(fit_to_limit((16384, 8192), 8192), (8192, 4096));
        let (w, h) = fit_to_limit((10000, 3), 2048);
        assert!(w <= 2048 && h >= 1);
    }

    #[test]
    fn origin_centered_in_view() {
        let camera = Camera::default();
        let clip = camera.projection() * camera.view() * Vector4::new(0.0, 0.0, 0.0, 1.0);
        let ndc = clip.truncate() / clip.w;
        assert!(ndc.x.abs() < 1e-5);
        assert!(ndc.y.abs() < 1e-5);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
        // Points above the origin still land above the center.
        let clip = camera.projection() * camera.view() * Vector4::new(0.0, 1.0, 0.0, 1.0);
        assert!(clip.y / clip.w > 0.0);
    }

    #[test]
    fn view_moves_eye_to_origin() {
        let camera = Camera::default();
        let p = camera.view().transform_point(camera.eye);
        assert!(p.x.abs() < 1e-5 && p.y.abs() < 1e-5 && p.z.abs() < 1e-5);
    }

    #[test]
    fn point_scale_for_default_fov() {
        let camera = Camera::default();
        assert!((camera.point_scale() - 0.41421357).abs() < 1e-5);
        let uniforms = camera.to_uniforms();
        assert_eq!(uniforms.point_scale, camera.point_scale());
    }
}
