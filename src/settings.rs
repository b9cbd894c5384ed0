//! Interaction settings and preferences
//!
//! Persisted in LocalStorage. The simulation only ever sees a borrowed
//! `InteractionSettings` for the duration of a single call.

use serde::{Deserialize, Serialize};

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

    /// Next preset in Low -> Medium -> High -> Low order
    pub fn next(&self) -> Self {
        match self {
            QualityPreset::Low => QualityPreset::Medium,
            QualityPreset::Medium => QualityPreset::High,
            QualityPreset::High => QualityPreset::Low,
        }
    }

    /// Maximum live particles for this preset
    pub fn max_particles(&self) -> usize {
        match self {
            QualityPreset::Low => 150,
            QualityPreset::Medium => 600,
            QualityPreset::High => 2000,
        }
    }

    /// Trail density multiplier (1.0 = full)
    pub fn trail_quality(&self) -> f32 {
        match self {
            QualityPreset::Low => 0.4,
            QualityPreset::Medium => 1.0,
            QualityPreset::High => 1.0,
        }
    }
}

/// Swipe sensitivity thresholds read by the gesture detector on every sample
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InteractionSettings {
    /// Minimum pointer displacement per sample (px) for a swipe to count
    pub movement_threshold: f32,
    /// Minimum dot product between swipe direction and direction to creature
    pub alignment_threshold: f32,
    /// Minimum spacing between any two pops (ms)
    pub global_cooldown_ms: f64,
}

impl Default for InteractionSettings {
    fn default() -> Self {
        Self {
            movement_threshold: 2.5,
            alignment_threshold: 0.2,
            global_cooldown_ms: 150.0,
        }
    }
}

impl InteractionSettings {
    /// Stricter values applied while safe mode is on
    pub const SAFE: Self = Self {
        movement_threshold: 6.0,
        alignment_threshold: 0.6,
        global_cooldown_ms: 400.0,
    };

    /// Copy with out-of-range values pulled back into range.
    ///
    /// Non-finite values fall back to the defaults, negative thresholds and
    /// cooldowns become zero, alignment is clamped to [-1, 1].
    pub fn sanitized(&self) -> Self {
        let defaults = Self::default();
        let movement_threshold = if self.movement_threshold.is_finite() {
            self.movement_threshold.max(0.0)
        } else {
            defaults.movement_threshold
        };
        let alignment_threshold = if self.alignment_threshold.is_finite() {
            self.alignment_threshold.clamp(-1.0, 1.0)
        } else {
            defaults.alignment_threshold
        };
        let global_cooldown_ms = if self.global_cooldown_ms.is_finite() {
            self.global_cooldown_ms.max(0.0)
        } else {
            defaults.global_cooldown_ms
        };
        Self {
            movement_threshold,
            alignment_threshold,
            global_cooldown_ms,
        }
    }
}

/// Player settings/preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Particle quality preset
    pub quality: QualityPreset,

    // === Interaction ===
    /// Live swipe thresholds
    pub interaction: InteractionSettings,
    /// Safe mode overrides `interaction` with `InteractionSettings::SAFE`
    pub safe_mode: bool,
    /// Values to restore when safe mode is switched off
    saved_interaction: Option<InteractionSettings>,

    // === Creatures ===
    /// Spawn creatures at all
    pub creatures_enabled: bool,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Chime volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Background music volume (0.0 - 1.0)
    pub music_volume: f32,
    /// Auto-pause (and silence) when the window loses focus
    pub pause_on_blur: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,

            interaction: InteractionSettings::default(),
            safe_mode: false,
            saved_interaction: None,

            creatures_enabled: true,

            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.7,
            pause_on_blur: true,
        }
    }
}

impl Settings {
    /// Thresholds the gesture detector should use right now
    pub fn effective_interaction(&self) -> InteractionSettings {
        self.interaction.sanitized()
    }

    /// Turn safe mode on or off.
    ///
    /// Enabling stashes the current thresholds and applies the strict set;
    /// disabling restores whatever was stashed.
    pub fn set_safe_mode(&mut self, enabled: bool) {
        if enabled == self.safe_mode {
            return;
        }
        if enabled {
            self.saved_interaction = Some(self.interaction);
            self.interaction = InteractionSettings::SAFE;
        } else if let Some(prev) = self.saved_interaction.take() {
            self.interaction = prev;
        }
        self.safe_mode = enabled;
        log::info!("Safe mode {}", if enabled { "on" } else { "off" });
    }

    /// Update one threshold from a UI control (ignored while safe mode is on)
    pub fn set_movement_threshold(&mut self, px: f32) {
        if !self.safe_mode {
            self.interaction.movement_threshold = px;
        }
    }

    pub fn set_alignment_threshold(&mut self, dot: f32) {
        if !self.safe_mode {
            self.interaction.alignment_threshold = dot;
        }
    }

    pub fn set_global_cooldown_ms(&mut self, ms: f64) {
        if !self.safe_mode {
            self.interaction.global_cooldown_ms = ms;
        }
    }

    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "jelly_pop_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match serde_json::from_str(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_clamps() {
        let s = InteractionSettings {
            movement_threshold: -4.0,
            alignment_threshold: 3.0,
            global_cooldown_ms: -10.0,
        }
        .sanitized();
        assert_eq!(s.movement_threshold, 0.0);
        assert_eq!(s.alignment_threshold, 1.0);
        assert_eq!(s.global_cooldown_ms, 0.0);
    }

    #[test]
    fn test_sanitize_non_finite_uses_defaults() {
        let s = InteractionSettings {
            movement_threshold: f32::NAN,
            alignment_threshold: f32::NEG_INFINITY,
            global_cooldown_ms: f64::NAN,
        }
        .sanitized();
        assert_eq!(s, InteractionSettings::default());
    }

    #[test]
    fn test_safe_mode_round_trip() {
        let mut settings = Settings::default();
        settings.set_movement_threshold(4.0);
        let custom = settings.interaction;

        settings.set_safe_mode(true);
        assert_eq!(settings.effective_interaction(), InteractionSettings::SAFE);

        // Slider changes are ignored while safe mode holds
        settings.set_global_cooldown_ms(0.0);
        assert_eq!(settings.interaction, InteractionSettings::SAFE);

        settings.set_safe_mode(false);
        assert_eq!(settings.interaction, custom);
    }

    #[test]
    fn test_safe_mode_enable_twice_keeps_original() {
        let mut settings = Settings::default();
        settings.set_safe_mode(true);
        settings.set_safe_mode(true);
        settings.set_safe_mode(false);
        assert_eq!(settings.interaction, InteractionSettings::default());
    }

    #[test]
    fn test_settings_json_round_trip_keeps_stash() {
        let mut settings = Settings::default();
        settings.set_alignment_threshold(-0.5);
        settings.set_safe_mode(true);
        let json = serde_json::to_string(&settings).unwrap();
        let mut loaded: Settings = serde_json::from_str(&json).unwrap();
        assert!(loaded.safe_mode);
        loaded.set_safe_mode(false);
        assert_eq!(loaded.interaction.alignment_threshold, -0.5);
    }

    #[test]
    fn test_quality_cycles_through_presets() {
        let start = QualityPreset::default();
        assert_eq!(start.next().next().next(), start);
        assert_eq!(QualityPreset::High.next(), QualityPreset::Low);
        assert_eq!(QualityPreset::Low.next().as_str(), "Medium");
        assert!(QualityPreset::Low.max_particles() < QualityPreset::High.max_particles());
    }
}
