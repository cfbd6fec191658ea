//! Stitching clips into one track.

use crate::audio::clip::AudioClip;
use crate::defaults;

/// Concatenate `clips` in order, each followed by `separator_ms` of silence.
///
/// The separator after the last clip is kept. The result uses the sample
/// rate of the first clip; clips at other rates are resampled. No clips
/// gives an empty clip at [`defaults::SAMPLE_RATE`].
pub fn assemble(clips: &[AudioClip], separator_ms: u32) -> AudioClip {
    let sample_rate = clips
        .first()
        .map(AudioClip::sample_rate)
        .unwrap_or(defaults::SAMPLE_RATE);
    let separator = AudioClip::silence(separator_ms, sample_rate);

    let mut combined = AudioClip::empty(sample_rate);
    for clip in clips {
        combined.append(clip);
        combined.append(&separator);
    }
    combined
}
