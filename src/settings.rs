//! Field settings and presets
//!
//! Persisted in LocalStorage on the web; read once at mount.

use anyhow::{Context, ensure};
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::SpawnParams;

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Particles spawned for this preset
    pub fn particle_count(&self) -> usize {
        match self {
            QualityPreset::Low => 25,
            QualityPreset::Medium => PARTICLE_COUNT,
            QualityPreset::High => 80,
        }
    }
}

/// Which surface the web host draws on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum RenderBackend {
    #[default]
    Canvas2d,
    /// wgpu on the canvas; falls back to Canvas2d without an adapter
    WebGpu,
}

impl RenderBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            RenderBackend::Canvas2d => "Canvas2D",
            RenderBackend::WebGpu => "WebGPU",
        }
    }
}

/// Field settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldSettings {
    pub quality: QualityPreset,
    /// Fixed for the lifetime of a mounted instance
    pub particle_count: usize,

    // === Links ===
    pub proximity_threshold: f32,
    pub link_base_alpha: f32,
    pub link_width: f32,

    // === Particles ===
    /// Half-range of each velocity component (px per tick)
    pub max_speed: f32,
    pub radius_min: f32,
    pub radius_max: f32,
    pub color: [u8; 3],
    pub particle_alpha: f32,

    /// Fixed seed for reproducible layouts; clock-seeded when `None`
    pub seed: Option<u64>,
    pub backend: RenderBackend,
}

impl Default for FieldSettings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,
            particle_count: PARTICLE_COUNT,

            proximity_threshold: PROXIMITY_THRESHOLD,
            link_base_alpha: LINK_BASE_ALPHA,
            link_width: LINK_WIDTH,

            max_speed: MAX_SPEED,
            radius_min: RADIUS_MIN,
            radius_max: RADIUS_MAX,
            color: PARTICLE_RGB,
            particle_alpha: PARTICLE_ALPHA,

            seed: None,
            backend: RenderBackend::Canvas2d,
        }
    }
}

impl FieldSettings {
    /// Create settings from a quality preset (applies preset defaults)
    pub fn from_preset(preset: QualityPreset) -> Self {
        let mut settings = Self::default();
        settings.apply_preset(preset);
        settings
    }

    /// Apply a quality preset (updates the particle count)
    pub fn apply_preset(&mut self, preset: QualityPreset) {
        self.quality = preset;
        self.particle_count = preset.particle_count();
    }

    /// Reject values the simulation or renderer cannot honour
    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(
            (1..=MAX_PARTICLES).contains(&self.particle_count),
            "particle_count must be in 1..={}, got {}",
            MAX_PARTICLES,
            self.particle_count
        );
        ensure!(
            self.proximity_threshold.is_finite() && self.proximity_threshold > 0.0,
            "proximity_threshold must be positive, got {}",
            self.proximity_threshold
        );
        ensure!(
            (0.0..=1.0).contains(&self.link_base_alpha),
            "link_base_alpha must be in [0, 1], got {}",
            self.link_base_alpha
        );
        ensure!(
            (0.0..=1.0).contains(&self.particle_alpha),
            "particle_alpha must be in [0, 1], got {}",
            self.particle_alpha
        );
        ensure!(
            self.link_width.is_finite() && self.link_width > 0.0,
            "link_width must be positive, got {}",
            self.link_width
        );
        ensure!(
            self.max_speed.is_finite() && self.max_speed >= 0.0,
            "max_speed must be non-negative, got {}",
            self.max_speed
        );
        ensure!(
            self.radius_min > 0.0 && self.radius_min <= self.radius_max && self.radius_max.is_finite(),
            "radius range must satisfy 0 < min <= max, got {}..{}",
            self.radius_min,
            self.radius_max
        );
        Ok(())
    }

    /// Parse and validate settings JSON. Missing fields take defaults.
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let settings: Self = serde_json::from_str(json).context("parsing field settings")?;
        settings.validate().context("invalid field settings")?;
        Ok(settings)
    }

    pub fn to_json(&self) -> anyhow::Result<String> {
        serde_json::to_string(self).context("serializing field settings")
    }

    /// Sampling ranges for the particle store
    pub fn spawn_params(&self) -> SpawnParams {
        SpawnParams {
            count: self.particle_count,
            max_speed: self.max_speed,
            radius_min: self.radius_min,
            radius_max: self.radius_max,
        }
    }

    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "particle_field_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded field settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring stored field settings: {e:#}"),
                }
            }
        }

        log::info!("Using default field settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            match self.to_json() {
                Ok(json) => {
                    let _ = storage.set_item(Self::STORAGE_KEY, &json);
                    log::info!("Field settings saved");
                }
                Err(e) => log::warn!("{e:#}"),
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}
