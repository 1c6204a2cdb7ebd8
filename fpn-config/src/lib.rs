//! Training configuration shared by the evaluation metrics and the image
//! preprocessing pipeline.

mod common;

use crate::common::*;

/// The main configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub train: TrainConfig,
    pub network: NetworkConfig,
    /// Candidate `(target_size, max_size)` pairs. One is drawn per image.
    pub scales: Vec<(usize, usize)>,
    /// Number of tiles per side in tiled cropping.
    pub crop_num: usize,
}

impl Config {
    /// Load and validate a JSON5 configuration file.
    pub fn open<P>(path: P) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file '{}'", path.display()))?;
        Self::from_json5(&text)
            .with_context(|| format!("invalid config file '{}'", path.display()))
    }

    pub fn from_json5(text: &str) -> Result<Self> {
        let config: Self = json5::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(!self.scales.is_empty(), "scales must not be empty");
        self.scales
            .iter()
            .try_for_each(|&(target_size, max_size)| -> Result<_> {
                ensure!(
                    target_size > 0 && max_size > 0,
                    "invalid scale ({}, {}), sizes must be positive",
                    target_size,
                    max_size
                );
                Ok(())
            })?;
        ensure!(
            self.crop_num >= 2,
            "crop_num must be at least 2, but get {}",
            self.crop_num
        );
        Ok(())
    }
}

/// Training mode switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TrainConfig {
    /// Train the proposal and classification stages jointly.
    #[serde(default)]
    pub end2end: bool,
    /// Enable online hard example mining in the classification stage.
    #[serde(default)]
    pub enable_ohem: bool,
}

/// Network input options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Pad images to a multiple of this value. Zero disables padding.
    #[serde(default)]
    pub image_stride: usize,
    /// Per-channel means in B, G, R order.
    pub pixel_means: [R64; 3],
}

impl NetworkConfig {
    pub fn pixel_means(&self) -> [f32; 3] {
        let [b, g, r] = self.pixel_means;
        [b.raw() as f32, g.raw() as f32, r.raw() as f32]
    }
}
