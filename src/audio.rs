//! Audio system using Web Audio API
//!
//! Chimes and the ambient pad are synthesised with oscillators, so there are
//! no sound files to load. Every failure here is swallowed: a page without
//! audio still plays normally.

use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

use crate::settings::Settings;

/// Pentatonic steps (semitones above the root) for successive pop chimes
const CHIME_STEPS: [f32; 5] = [0.0, 2.0, 4.0, 7.0, 9.0];
/// A5
const CHIME_ROOT_HZ: f32 = 880.0;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// A creature popped; `note` walks up the chime scale
    Pop { note: u32 },
    /// A new level started
    LevelUp,
    /// Final level cleared
    Win,
}

/// Audio manager for the page
pub struct AudioManager {
    ctx: Option<AudioContext>,
    /// Ambient pad: oscillator plus its gain, started on first user gesture
    pad: Option<(OscillatorNode, GainNode)>,
    master_volume: f32,
    sfx_volume: f32,
    music_volume: f32,
    muted: bool,
}

impl AudioManager {
    pub fn new(settings: &Settings) -> Self {
        // Fails outside a secure context or when the browser refuses
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        let mut audio = Self {
            ctx,
            pad: None,
            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.7,
            muted: false,
        };
        audio.apply_settings(settings);
        audio
    }

    /// Pick up volume changes from the settings panel
    pub fn apply_settings(&mut self, settings: &Settings) {
        self.master_volume = settings.master_volume.clamp(0.0, 1.0);
        self.sfx_volume = settings.sfx_volume.clamp(0.0, 1.0);
        self.music_volume = settings.music_volume.clamp(0.0, 1.0);
        self.update_pad_gain();
    }

    /// Resume the context (browsers require a user gesture first)
    pub fn resume(&mut self) {
        let Some(ctx) = &self.ctx else { return };
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }
        if self.pad.is_none() {
            self.start_pad();
        }
    }

    /// Suspend all output while the simulation is paused
    pub fn suspend(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.suspend();
        }
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        self.update_pad_gain();
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    fn sfx_gain(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    fn music_gain(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.music_volume * 0.15
        }
    }

    /// Play a sound effect (fire and forget)
    pub fn play(&self, effect: SoundEffect) {
        let vol = self.sfx_gain();
        if vol <= 0.0 {
            return;
        }
        let Some(ctx) = &self.ctx else { return };
        if ctx.state() != web_sys::AudioContextState::Running {
            return;
        }

        match effect {
            SoundEffect::Pop { note } => self.play_pop(ctx, vol, note),
            SoundEffect::LevelUp => self.play_level_up(ctx, vol),
            SoundEffect::Win => self.play_win(ctx, vol),
        }
    }

    // === Sound generators ===

    /// Oscillator routed through its own gain node to the speakers
    fn create_osc(
        ctx: &AudioContext,
        freq: f32,
        osc_type: OscillatorType,
    ) -> Option<(OscillatorNode, GainNode)> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;

        osc.set_type(osc_type);
        osc.frequency().set_value(freq);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;

        Some((osc, gain))
    }

    /// Short bell: quick attack, exponential tail
    fn bell(ctx: &AudioContext, freq: f32, peak: f32, start: f64, length: f64) {
        let Some((osc, gain)) = Self::create_osc(ctx, freq, OscillatorType::Sine) else {
            return;
        };
        gain.gain().set_value_at_time(0.0001, start).ok();
        gain.gain()
            .linear_ramp_to_value_at_time(peak, start + 0.01)
            .ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.0001, start + length)
            .ok();
        osc.start_with_when(start).ok();
        osc.stop_with_when(start + length + 0.02).ok();
    }

    /// Pop chime with a soft octave shimmer
    fn play_pop(&self, ctx: &AudioContext, vol: f32, note: u32) {
        let step = CHIME_STEPS[note as usize % CHIME_STEPS.len()];
        let freq = CHIME_ROOT_HZ * 2f32.powf(step / 12.0);
        let t = ctx.current_time();
        Self::bell(ctx, freq, vol * 0.35, t, 0.45);
        Self::bell(ctx, freq * 2.0, vol * 0.08, t, 0.25);
    }

    /// Rising arpeggio
    fn play_level_up(&self, ctx: &AudioContext, vol: f32) {
        let t = ctx.current_time();
        for (i, step) in [0.0f32, 4.0, 7.0, 12.0].iter().enumerate() {
            let freq = CHIME_ROOT_HZ * 0.5 * 2f32.powf(step / 12.0);
            Self::bell(ctx, freq, vol * 0.3, t + i as f64 * 0.09, 0.4);
        }
    }

    /// Slow major chord swell
    fn play_win(&self, ctx: &AudioContext, vol: f32) {
        let t = ctx.current_time();
        for (i, step) in [0.0f32, 4.0, 7.0, 12.0, 16.0].iter().enumerate() {
            let freq = CHIME_ROOT_HZ * 0.5 * 2f32.powf(step / 12.0);
            Self::bell(ctx, freq, vol * 0.22, t + i as f64 * 0.12, 1.6);
        }
    }

    /// Low triangle drone standing in for background music
    fn start_pad(&mut self) {
        let Some(ctx) = &self.ctx else { return };
        let Some((osc, gain)) = Self::create_osc(ctx, 110.0, OscillatorType::Triangle) else {
            log::warn!("Could not build ambient pad");
            return;
        };
        gain.gain().set_value(0.0);
        if osc.start().is_err() {
            return;
        }
        self.pad = Some((osc, gain));
        self.update_pad_gain();
    }

    fn update_pad_gain(&self) {
        let (Some(ctx), Some((_, gain))) = (&self.ctx, &self.pad) else {
            return;
        };
        gain.gain()
            .linear_ramp_to_value_at_time(self.music_gain(), ctx.current_time() + 0.3)
            .ok();
    }
}
