/// Sound engine: procedural 8-bit style sound effects via rodio.
///
/// All sounds are generated as in-memory WAV buffers at init time.
/// Playback is fire-and-forget (non-blocking) via rodio's Sink.
///
/// Compile without the "sound" feature to disable audio entirely
/// (the stub SoundEngine does nothing).

use crate::sim::event::GameEvent;

#[cfg(feature = "sound")]
mod inner {
    use std::io::Cursor;
    use std::sync::Arc;

    use rodio::{OutputStream, OutputStreamHandle, Sink};
    use tracing::info;

    use super::wave;

    /// Pre-generated WAV buffers for each sound effect.
    pub struct SoundEngine {
        _stream: OutputStream,
        handle: OutputStreamHandle,
        sfx_start: Arc<Vec<u8>>,
        sfx_turn: Arc<Vec<u8>>,
        sfx_eat: Arc<Vec<u8>>,
        sfx_crash: Arc<Vec<u8>>,
    }

    impl SoundEngine {
        pub fn new() -> Option<Self> {
            let (stream, handle) = match OutputStream::try_default() {
                Ok(pair) => pair,
                Err(e) => {
                    info!("no audio output, sound disabled: {e}");
                    return None;
                }
            };

            Some(SoundEngine {
                _stream: stream,
                handle,
                sfx_start: Arc::new(wave::make_wav(&wave::gen_start())),
                sfx_turn: Arc::new(wave::make_wav(&wave::gen_blip(660.0, 0.02, 0.08))),
                sfx_eat: Arc::new(wave::make_wav(&wave::gen_eat())),
                sfx_crash: Arc::new(wave::make_wav(&wave::gen_crash())),
            })
        }

        fn play(&self, buf: &Arc<Vec<u8>>) {
            if let Ok(sink) = Sink::try_new(&self.handle) {
                let cursor = Cursor::new(buf.as_ref().clone());
                if let Ok(src) = rodio::Decoder::new(cursor) {
                    sink.append(src);
                    sink.detach(); // fire-and-forget
                }
            }
        }

        pub fn play_start(&self) { self.play(&self.sfx_start); }
        pub fn play_turn(&self) { self.play(&self.sfx_turn); }
        pub fn play_eat(&self) { self.play(&self.sfx_eat); }
        pub fn play_crash(&self) { self.play(&self.sfx_crash); }
    }
}

// ════════════════════════════════════════════════════════════
//  Waveform generators: all produce Vec<f32> mono samples
// ════════════════════════════════════════════════════════════

#[cfg_attr(not(feature = "sound"), allow(dead_code))]
mod wave {
    use std::f32::consts::PI;

    pub const SAMPLE_RATE: u32 = 22050;

    fn samples_for(duration: f32) -> usize {
        (SAMPLE_RATE as f32 * duration) as usize
    }

    /// Simple sine blip with a linear fade out.
    pub fn gen_blip(freq: f32, duration: f32, volume: f32) -> Vec<f32> {
        let n = samples_for(duration);
        (0..n)
            .map(|i| {
                let t = i as f32 / SAMPLE_RATE as f32;
                let env = 1.0 - (i as f32 / n as f32);
                (t * freq * 2.0 * PI).sin() * env * volume
            })
            .collect()
    }

    /// Game start: two quick rising notes.
    pub fn gen_start() -> Vec<f32> {
        let mut samples = gen_blip(523.0, 0.06, 0.25); // C5
        samples.extend(gen_blip(784.0, 0.09, 0.25)); // G5
        samples
    }

    /// Apple: bright ascending arpeggio E6 → G6 → C7.
    pub fn gen_eat() -> Vec<f32> {
        let notes = [1319.0_f32, 1568.0, 2093.0];
        let mut samples = Vec::new();
        for &freq in &notes {
            let n = samples_for(0.04);
            for i in 0..n {
                let t = i as f32 / SAMPLE_RATE as f32;
                let env = 1.0 - (i as f32 / n as f32).powf(0.5);
                // Sine + 3rd harmonic for a square-ish retro edge
                let wave = (t * freq * 2.0 * PI).sin() * 0.7
                    + (t * freq * 3.0 * 2.0 * PI).sin() * 0.3;
                samples.push(wave * env * 0.25);
            }
        }
        samples
    }

    /// Crash: short noise thump into a falling tone.
    pub fn gen_crash() -> Vec<f32> {
        let n = samples_for(0.45);
        let mut rng: u32 = 12345;
        let mut samples: Vec<f32> = (0..n)
            .map(|i| {
                let p = i as f32 / n as f32;
                let freq = 440.0 - p * 300.0;
                let t = i as f32 / SAMPLE_RATE as f32;
                let tone = (t * freq * 2.0 * PI).sin();
                rng = rng.wrapping_mul(1103515245).wrapping_add(12345);
                let noise = (rng as f32 / u32::MAX as f32) * 2.0 - 1.0;
                let noise_env = (1.0 - p * 4.0).max(0.0);
                (tone * 0.6 + noise * 0.4 * noise_env) * 0.3
            })
            .collect();

        let fade_len = samples.len() / 4;
        let total = samples.len();
        for i in (total - fade_len)..total {
            samples[i] *= (total - i) as f32 / fade_len as f32;
        }
        samples
    }

    /// Wrap f32 samples into a 16-bit mono PCM WAV buffer.
    pub fn make_wav(samples: &[f32]) -> Vec<u8> {
        let num_channels: u16 = 1;
        let bits_per_sample: u16 = 16;
        let byte_rate = SAMPLE_RATE * (num_channels as u32) * (bits_per_sample as u32) / 8;
        let block_align = num_channels * bits_per_sample / 8;
        let data_size = samples.len() as u32 * 2;
        let file_size = 36 + data_size;

        let mut buf = Vec::with_capacity(44 + data_size as usize);

        // RIFF header
        buf.extend_from_slice(b"RIFF");
        buf.extend_from_slice(&file_size.to_le_bytes());
        buf.extend_from_slice(b"WAVE");

        // fmt chunk
        buf.extend_from_slice(b"fmt ");
        buf.extend_from_slice(&16u32.to_le_bytes());
        buf.extend_from_slice(&1u16.to_le_bytes()); // PCM
        buf.extend_from_slice(&num_channels.to_le_bytes());
        buf.extend_from_slice(&SAMPLE_RATE.to_le_bytes());
        buf.extend_from_slice(&byte_rate.to_le_bytes());
        buf.extend_from_slice(&block_align.to_le_bytes());
        buf.extend_from_slice(&bits_per_sample.to_le_bytes());

        // data chunk
        buf.extend_from_slice(b"data");
        buf.extend_from_slice(&data_size.to_le_bytes());

        for &s in samples {
            let val = (s.clamp(-1.0, 1.0) * 32767.0) as i16;
            buf.extend_from_slice(&val.to_le_bytes());
        }

        buf
    }
}

// ════════════════════════════════════════════════════════════
//  Public API: compiles to no-ops when sound feature is off
// ════════════════════════════════════════════════════════════

#[cfg(feature = "sound")]
pub use inner::SoundEngine;

#[cfg(not(feature = "sound"))]
pub struct SoundEngine;

#[cfg(not(feature = "sound"))]
impl SoundEngine {
    pub fn new() -> Option<Self> { Some(SoundEngine) }
    pub fn play_start(&self) {}
    pub fn play_turn(&self) {}
    pub fn play_eat(&self) {}
    pub fn play_crash(&self) {}
}

/// Map simulation events to sound effects.
pub fn play_events(sound: Option<&SoundEngine>, events: &[GameEvent]) {
    let sfx = match sound {
        Some(s) => s,
        None => return,
    };
    for event in events {
        match event {
            GameEvent::Started => sfx.play_start(),
            GameEvent::TurnQueued(_) => sfx.play_turn(),
            GameEvent::AppleEaten { .. } => sfx.play_eat(),
            GameEvent::Crashed { .. } => sfx.play_crash(),
            GameEvent::Restarted { .. } => {}
        }
    }
}
