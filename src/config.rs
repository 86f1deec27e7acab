//! Pipeline configuration.
//!
//! Handles loading and saving configuration from a TOML file in the user's
//! config directory, validation of the analysis parameters, and the shared
//! handle the processing loop reads fresh once per cycle. Every field can
//! be changed live between cycles through [`SharedConfig`].

use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SpecfallError};

/// Analysis parameters for the spectral pipeline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PipelineConfig {
    /// Sample rate the audio source delivers at, in Hz
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,
    /// FFT frame size; power of two, larger = finer frequency resolution
    #[serde(default = "default_fft_size")]
    pub fft_size: usize,
    /// Delay between processing cycles in ms (a 20 ms floor is applied)
    #[serde(default = "default_update_interval_ms")]
    pub update_interval_ms: u64,
    /// Number of spectral frames retained for the waterfall
    #[serde(default = "default_max_history_size")]
    pub max_history_size: usize,
    /// Lower edge of the displayed frequency range in Hz
    #[serde(default)]
    pub min_frequency_hz: f32,
    /// Upper edge of the displayed frequency range in Hz; None = Nyquist
    #[serde(default)]
    pub max_frequency_hz: Option<f32>,
}

fn default_sample_rate() -> u32 {
    44100
}

fn default_fft_size() -> usize {
    1024
}

fn default_update_interval_ms() -> u64 {
    30
}

fn default_max_history_size() -> usize {
    100
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            sample_rate: default_sample_rate(),
            fft_size: default_fft_size(),
            update_interval_ms: default_update_interval_ms(),
            max_history_size: default_max_history_size(),
            min_frequency_hz: 0.0,
            max_frequency_hz: None,
        }
    }
}

impl PipelineConfig {
    /// Upper edge of the zoom range, defaulting to Nyquist.
    pub fn max_frequency_hz(&self) -> f32 {
        self.max_frequency_hz
            .unwrap_or(self.sample_rate as f32 / 2.0)
    }

    /// Checks every precondition the pipeline relies on.
    ///
    /// # Errors
    /// [`SpecfallError::InvalidConfig`] naming the offending field.
    pub fn validate(&self) -> Result<()> {
        if self.sample_rate == 0 {
            return Err(SpecfallError::InvalidConfig(
                "sample_rate must be positive".into(),
            ));
        }
        if self.fft_size < 2 || !self.fft_size.is_power_of_two() {
            return Err(SpecfallError::InvalidConfig(format!(
                "fft_size must be a power of two >= 2, got {}",
                self.fft_size
            )));
        }
        if self.max_history_size == 0 {
            return Err(SpecfallError::InvalidConfig(
                "max_history_size must be positive".into(),
            ));
        }
        let nyquist = self.sample_rate as f32 / 2.0;
        let max_hz = self.max_frequency_hz();
        if self.min_frequency_hz < 0.0 {
            return Err(SpecfallError::InvalidConfig(
                "min_frequency_hz must not be negative".into(),
            ));
        }
        if self.min_frequency_hz >= max_hz {
            return Err(SpecfallError::InvalidConfig(format!(
                "min_frequency_hz ({}) must be below max_frequency_hz ({max_hz})",
                self.min_frequency_hz
            )));
        }
        if max_hz > nyquist {
            return Err(SpecfallError::InvalidConfig(format!(
                "max_frequency_hz ({max_hz}) exceeds the Nyquist frequency ({nyquist})"
            )));
        }
        Ok(())
    }

    /// Loads configuration from the user's config directory.
    ///
    /// # Errors
    /// - If the config directory cannot be determined
    /// - If the config file cannot be read
    /// - If the TOML is malformed or fails validation
    pub fn load() -> anyhow::Result<Self> {
        let config_path = get_config_path()?;
        let config_content = fs::read_to_string(&config_path)?;
        let config: PipelineConfig = toml::from_str(&config_content)?;
        config.validate()?;
        Ok(config)
    }

    /// Saves configuration to the user's config directory.
    ///
    /// # Errors
    /// - If the config directory cannot be determined or created
    /// - If the file cannot be written
    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = get_config_path()?;
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let config_content = toml::to_string_pretty(self)?;
        fs::write(&config_path, config_content)?;
        tracing::info!("Configuration saved");
        Ok(())
    }
}

/// Returns the path to the configuration file.
fn get_config_path() -> anyhow::Result<PathBuf> {
    let config_dir = dirs::config_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
    Ok(config_dir.join("specfall").join("config.toml"))
}

/// Externally-mutable configuration handle.
///
/// The processing loop takes one consistent copy per cycle through
/// [`SharedConfig::get`]; edits go through [`SharedConfig::update`], which
/// validates the result before committing so an invalid live edit never
/// reaches the loop.
#[derive(Debug, Clone)]
pub struct SharedConfig(Arc<Mutex<PipelineConfig>>);

impl SharedConfig {
    /// Wraps a validated configuration.
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        Ok(SharedConfig(Arc::new(Mutex::new(config))))
    }

    /// One consistent copy of the current configuration.
    pub fn get(&self) -> PipelineConfig {
        self.0.lock().unwrap().clone()
    }

    /// Applies `edit` to a copy, validates it, and commits on success.
    ///
    /// # Errors
    /// [`SpecfallError::InvalidConfig`] if the edited config fails
    /// validation; the previous configuration stays in effect.
    pub fn update(&self, edit: impl FnOnce(&mut PipelineConfig)) -> Result<()> {
        let mut guard = self.0.lock().unwrap();
        let mut edited = guard.clone();
        edit(&mut edited);
        edited.validate()?;
        *guard = edited;
        Ok(())
    }
}
