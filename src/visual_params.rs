use serde::{Deserialize, Serialize};

// Parameters of the host window and GPU surface. The scene itself has no
// knobs; these don't change at runtime.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct VisualParams {
    // Logical window size.
    pub viewport_width: u32,
    pub viewport_height: u32,

    pub fps: f64,
    pub msaa_samples: u32,
    pub transparent: bool,
    pub high_performance: bool,
    pub background: [f64; 4],

    #[serde(default)]
    pub pixel_ratio: PixelRatioParams,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct PixelRatioParams {
    pub min: f64,
    pub max: f64,
}

impl Default for PixelRatioParams {
    fn default() -> Self {
        PixelRatioParams { min: 1.0, max: 2.0 }
    }
}

impl PixelRatioParams {
    pub fn range(&self) -> [f64; 2] {
        [self.min, self.max.max(self.min)]
    }
}

impl std::str::FromStr for VisualParams {
    type Err = toml::de::Error;
    fn from_str(serialized: &str) -> Result<Self, Self::Err> {
        let params = toml::from_str(serialized)?;
        Ok(params)
    }
}

impl Default for VisualParams {
    fn default() -> Self {
        VisualParams {
            viewport_width: 1280,
            viewport_height: 720,
            fps: 60.0,
            msaa_samples: 4,
            transparent: false,
            high_performance: true,
            background: [0.0, 0.0, 0.0, 1.0],
            pixel_ratio: PixelRatioParams::default(),
        }
    }
}

impl VisualParams {
    // wgpu only guarantees 1 and 4 samples for render targets.
    pub fn sample_count(&self) -> u32 {
        if self.msaa_samples >= 4 {
            4
        } else {
            1
        }
    }

    pub fn clear_color(&self) -> [f64; 4] {
        if self.transparent {
            [0.0, 0.0, 0.0, 0.0]
        } else {
            self.background
        }
    }
}

pub fn read_config_from_file(path: &str) -> anyhow::Result<VisualParams> {
    let params = std::fs::read_to_string(path)?.parse()?;
    Ok(params)
}

pub fn get_config_from_default_file() -> VisualParams {
    let config_data = include_str!("../visual_config.toml");
    match config_data.parse() {
        Ok(params) => params,
        Err(e) => {
            log::error!(
                "Failed to parse config file({}): {:?}",
                "../visual_config.toml",
                e
            );
            VisualParams::default()
        }
    }
}

// Reads `path`, falling back to the embedded config.
pub fn get_config(path: &str) -> VisualParams {
    match read_config_from_file(path) {
        Ok(params) => params,
        Err(e) => {
            log::error!("Failed to parse config file({}): {:?}", path, e);
            get_config_from_default_file()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn smoke() {
        let params = VisualParams {
            viewport_width: 640,
            viewport_height: 360,
            fps: 30.0,
            msaa_samples: 1,
            transparent: true,
            high_performance: false,
            background: [0.1, 0.2, 0.3, 1.0],
            pixel_ratio: PixelRatioParams { min: 1.0, max: 1.5 },
        };
        let serialized = toml::to_string(&params).unwrap();
        let deserialized: VisualParams = toml::from_str(&serialized).unwrap();
        assert_eq!(params, deserialized);
    }

    #[test]
    fn default_file_parses() {
        let config_data = include_str!("../visual_config.toml");
        let params: VisualParams = config_data.parse().unwrap();
        assert_eq!(params.pixel_ratio.range(), [1.0, 2.0]);
        assert_eq!(params.sample_count(), 4);
    }

    #[test]
    fn pixel_ratio_defaults_when_missing() {
        let params: VisualParams = r#"
            viewport_width = 800
            viewport_height = 600
            fps = 60.0
            msaa_samples = 2
            transparent = false
            high_performance = true
            background = [0.0, 0.0, 0.0, 1.0]
        "#
        .parse()
        .unwrap();
        assert_eq!(params.pixel_ratio, PixelRatioParams::default());
        assert_eq!(params.sample_count(), 1);
    }

    #[test]
    fn missing_file_falls_back() {
        assert!(read_config_from_file("/nonexistent/visual_config.toml").is_err());
        let params = get_config("/nonexistent/visual_config.toml");
        assert_eq!(params, get_config_from_default_file());
    }

    #[test]
    fn transparent_clears_to_nothing() {
        let params = VisualParams {
            transparent: true,
            ..VisualParams::default()
        };
        assert_eq!(params.clear_color(), [0.0; 4]);
    }
}
