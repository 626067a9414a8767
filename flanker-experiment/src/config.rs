use anyhow::{bail, Context, Result};
use flanker_core::HandPlacement;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Session parameters. Every field has a default so a config file only needs
/// to name what it overrides; `validate` runs before the session starts and
/// a violation is fatal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperimentConfig {
    /// Total main-phase blocks. Must equal hand placements x blocks_per_hand.
    #[serde(default = "ExperimentConfig::default_blocks")]
    pub blocks: usize,
    #[serde(default = "ExperimentConfig::default_blocks_per_hand")]
    pub blocks_per_hand: usize,
    #[serde(default = "ExperimentConfig::default_trials_per_block")]
    pub trials_per_block: usize,
    #[serde(default = "ExperimentConfig::default_practice_trials_per_block")]
    pub practice_trials_per_block: usize,

    /// Fixation-to-target asynchrony distribution, milliseconds.
    #[serde(default = "ExperimentConfig::default_soa_min_ms")]
    pub soa_min_ms: f64,
    #[serde(default = "ExperimentConfig::default_soa_mean_ms")]
    pub soa_mean_ms: f64,
    #[serde(default = "ExperimentConfig::default_soa_max_ms")]
    pub soa_max_ms: f64,

    #[serde(default = "ExperimentConfig::default_response_window_ms")]
    pub response_window_ms: u64,
    #[serde(default = "ExperimentConfig::default_inter_trial_ms")]
    pub inter_trial_ms: u64,

    #[serde(default = "ExperimentConfig::default_px_per_degree")]
    pub px_per_degree: f32,

    #[serde(default = "ExperimentConfig::default_tone_hz")]
    pub tone_hz: f32,
    #[serde(default = "ExperimentConfig::default_tone_ms")]
    pub tone_ms: u64,

    /// Font used for letters and instruction text. When unset, a few common
    /// system locations are tried at startup.
    #[serde(default)]
    pub font_path: Option<PathBuf>,

    #[serde(default = "ExperimentConfig::default_output_path")]
    pub output_path: PathBuf,

    /// Fixed RNG seed for a reproducible session; unset means entropy.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl ExperimentConfig {
    fn default_blocks() -> usize {
        4
    }
    fn default_blocks_per_hand() -> usize {
        2
    }
    fn default_trials_per_block() -> usize {
        36
    }
    fn default_practice_trials_per_block() -> usize {
        9
    }
    fn default_soa_min_ms() -> f64 {
        500.0
    }
    fn default_soa_mean_ms() -> f64 {
        1000.0
    }
    fn default_soa_max_ms() -> f64 {
        5000.0
    }
    fn default_response_window_ms() -> u64 {
        2000
    }
    fn default_inter_trial_ms() -> u64 {
        1000
    }
    fn default_px_per_degree() -> f32 {
        45.0
    }
    fn default_tone_hz() -> f32 {
        2000.0
    }
    fn default_tone_ms() -> u64 {
        100
    }
    fn default_output_path() -> PathBuf {
        PathBuf::from("flanker_results.jsonl")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("cannot read config {}", path.display()))?;
        let config: Self = serde_json::from_str(&text)
            .with_context(|| format!("cannot parse config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => {
                let config = Self::default();
                config.validate()?;
                Ok(config)
            }
        }
    }

    /// Setup-time checks. The session must not start on any violation.
    pub fn validate(&self) -> Result<()> {
        if self.soa_min_ms < 0.0 || self.soa_mean_ms <= self.soa_min_ms {
            bail!(
                "SOA mean ({} ms) must exceed SOA min ({} ms), min must be >= 0",
                self.soa_mean_ms,
                self.soa_min_ms
            );
        }
        if self.soa_max_ms <= self.soa_min_ms {
            bail!(
                "SOA max ({} ms) must exceed SOA min ({} ms)",
                self.soa_max_ms,
                self.soa_min_ms
            );
        }
        let placements = HandPlacement::ALL.len();
        if self.blocks != placements * self.blocks_per_hand {
            bail!(
                "block count {} does not match {} hand placements x {} repetitions",
                self.blocks,
                placements,
                self.blocks_per_hand
            );
        }
        if self.blocks_per_hand == 0 {
            bail!("blocks_per_hand must be at least 1");
        }
        if self.trials_per_block == 0 || self.practice_trials_per_block == 0 {
            bail!("trials_per_block and practice_trials_per_block must be at least 1");
        }
        if self.response_window_ms == 0 {
            bail!("response_window_ms must be positive");
        }
        if self.px_per_degree <= 0.0 {
            bail!("px_per_degree must be positive");
        }
        if self.tone_hz <= 0.0 || self.tone_ms == 0 {
            bail!("error tone frequency and duration must be positive");
        }
        Ok(())
    }
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            blocks: Self::default_blocks(),
            blocks_per_hand: Self::default_blocks_per_hand(),
            trials_per_block: Self::default_trials_per_block(),
            practice_trials_per_block: Self::default_practice_trials_per_block(),
            soa_min_ms: Self::default_soa_min_ms(),
            soa_mean_ms: Self::default_soa_mean_ms(),
            soa_max_ms: Self::default_soa_max_ms(),
            response_window_ms: Self::default_response_window_ms(),
            inter_trial_ms: Self::default_inter_trial_ms(),
            px_per_degree: Self::default_px_per_degree(),
            tone_hz: Self::default_tone_hz(),
            tone_ms: Self::default_tone_ms(),
            font_path: None,
            output_path: Self::default_output_path(),
            seed: None,
        }
    }
}
