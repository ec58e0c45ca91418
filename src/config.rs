//! # World Configuration
//!
//! Tunables of the voxel world, loaded from JSON. Every field is optional in the file;
//! missing fields take their default value.
//!
//! ```json
//! {
//!     "chunk_width": 16,
//!     "chunk_height": 64,
//!     "render_distance": 4,
//!     "generation": { "method": "perlin" },
//!     "terrain": { "amplitude": 30.0, "scale": 0.02 },
//!     "streaming": { "mode": "background", "workers": 4 },
//!     "gpu_budget": 268435456
//! }
//! ```

use std::{
    fs,
    path::{Path, PathBuf},
};

use log::info;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::engine_state::voxels::{
    terrain::{GenerationMethod, TerrainConfig},
    world::StreamingMode,
};

/// Environment variable holding the path of the configuration file.
pub const CONFIG_PATH_VAR: &str = "VOXEL_WORLD_CONFIG";

/// Largest accepted render distance, in chunks.
pub const MAX_RENDER_DISTANCE: u32 = 4096;

/// Errors raised while loading or validating a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config file {}: {source}", .path.display())]
    Io {
        /// Path of the file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
    /// The configuration is not valid JSON for `WorldConfig`.
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    /// A value is out of its allowed range.
    #[error("invalid config: {0}")]
    Invalid(&'static str),
}

/// Configuration of a `World`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Chunk extent along x and z, in blocks
    pub chunk_width: u32,
    /// Chunk extent along y, in blocks
    pub chunk_height: u32,
    /// Chebyshev radius of the loaded square, in chunks
    pub render_distance: u32,
    /// How chunk contents are generated
    pub generation: GenerationMethod,
    /// Heightmap shape, used by the perlin generation method
    pub terrain: TerrainConfig,
    /// Where chunks are built
    pub streaming: StreamingMode,
    /// Upper bound on the bytes of live chunk buffers, unbounded if absent
    pub gpu_budget: Option<u64>,
}

impl Default for WorldConfig {
    fn default() -> Self {
        WorldConfig {
            chunk_width: 16,
            chunk_height: 64,
            render_distance: 4,
            generation: GenerationMethod::default(),
            terrain: TerrainConfig::default(),
            streaming: StreamingMode::default(),
            gpu_budget: None,
        }
    }
}

impl WorldConfig {
    /// Parses and validates a JSON configuration.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: WorldConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates the configuration file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&json)?;
        info!("Loaded world config from {}", path.display());
        Ok(config)
    }

    /// Loads the file named by `VOXEL_WORLD_CONFIG`, or returns the defaults if the
    /// variable is not set.
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var_os(CONFIG_PATH_VAR) {
            Some(path) => Self::load(path),
            None => {
                info!("{CONFIG_PATH_VAR} not set, using default world config");
                Ok(WorldConfig::default())
            }
        }
    }

    /// Checks that the values describe a usable world.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chunk_width == 0 || self.chunk_height == 0 {
            return Err(ConfigError::Invalid("chunk dimensions must be positive"));
        }
        if self.render_distance > MAX_RENDER_DISTANCE {
            return Err(ConfigError::Invalid("render distance must be at most 4096 chunks"));
        }
        if !(self.terrain.scale.is_finite() && self.terrain.amplitude.is_finite()) {
            return Err(ConfigError::Invalid("terrain parameters must be finite"));
        }
        if let StreamingMode::Background { workers: 0 } = self.streaming {
            return Err(ConfigError::Invalid("background streaming needs at least one worker"));
        }
        if let GenerationMethod::Random { sparseness, .. } = self.generation {
            if !(0.0..=1.0).contains(&sparseness) {
                return Err(ConfigError::Invalid("sparseness must be within 0.0..=1.0"));
            }
        }
        Ok(())
    }
}
