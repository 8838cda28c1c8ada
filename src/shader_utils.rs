use std::borrow::Cow;

#[derive(rust_embed::RustEmbed)]
#[folder = "$CARGO_MANIFEST_DIR/src/shaders/"]
pub struct Shaders;

// WGSL source of an embedded shader, by file name.
pub fn wgsl_source(name: &str) -> anyhow::Result<String> {
    let bytes = Shaders::get(name).ok_or_else(|| anyhow::anyhow!("Missing shader: {}", name))?;
    Ok(String::from_utf8(bytes.into_owned())?)
}

pub fn create_shader_module(device: &wgpu::Device, name: &str) -> anyhow::Result<wgpu::ShaderModule> {
    let source = wgsl_source(name)?;
    log::debug!("Compiling shader {}", name);
    Ok(device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(name),
        source: wgpu::ShaderSource::Wgsl(Cow::Owned(source)),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn internal() {
        let names: Vec<String> = Shaders::iter().map(|name| name.into_owned()).collect();
        assert!(names.iter().any(|n| n == "points.wgsl"));
        assert!(names.iter().any(|n| n == "quad.wgsl"));
    }

    #[test]
    fn sources_have_entry_points() {
        for name in &["points.wgsl", "quad.wgsl"] {
            let source = wgsl_source(name).unwrap();
            assert!(source.contains("fn vs_main"));
            assert!(source.contains("fn fs_main"));
        }
        assert!(wgsl_source("missing.wgsl").is_err());
    }
}
