//! Decoded mono PCM audio.

/// Mono 16-bit PCM samples at a fixed sample rate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioClip {
    samples: Vec<i16>,
    sample_rate: u32,
}

impl AudioClip {
    pub fn new(samples: Vec<i16>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    /// Zero-length clip.
    pub fn empty(sample_rate: u32) -> Self {
        Self::new(Vec::new(), sample_rate)
    }

    /// Digital silence lasting `duration_ms`.
    pub fn silence(duration_ms: u32, sample_rate: u32) -> Self {
        let len = (u64::from(sample_rate) * u64::from(duration_ms) / 1000) as usize;
        Self::new(vec![0; len], sample_rate)
    }

    pub fn samples(&self) -> &[i16] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Append `other`, resampling it first when its rate differs.
    pub fn append(&mut self, other: &AudioClip) {
        if other.sample_rate == self.sample_rate {
            self.samples.extend_from_slice(&other.samples);
        } else {
            self.samples
                .extend(resample(&other.samples, other.sample_rate, self.sample_rate));
        }
    }
}

/// Simple linear interpolation resampling.
pub(crate) fn resample(samples: &[i16], from_rate: u32, to_rate: u32) -> Vec<i16> {
    if from_rate == to_rate || samples.is_empty() || from_rate == 0 || to_rate == 0 {
        return samples.to_vec();
    }

    let ratio = from_rate as f64 / to_rate as f64;
    let output_len = (samples.len() as f64 / ratio).ceil() as usize;

    (0..output_len)
        .map(|i| {
            let source_pos = i as f64 * ratio;
            let source_idx = (source_pos.floor() as usize).min(samples.len() - 1);
            let fraction = source_pos - source_idx as f64;

            if source_idx + 1 >= samples.len() {
                samples[source_idx]
            } else {
                let left = samples[source_idx] as f64;
                let right = samples[source_idx + 1] as f64;
                (left + (right - left) * fraction) as i16
            }
        })
        .collect()
}

/// Average interleaved frames down to one channel.
pub(crate) fn downmix(interleaved: &[i16], channels: usize) -> Vec<i16> {
    if channels <= 1 {
        return interleaved.to_vec();
    }
    interleaved
        .chunks_exact(channels)
        .map(|frame| {
            let sum: i32 = frame.iter().map(|&s| s as i32).sum();
            (sum / channels as i32) as i16
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn silence_length_follows_rate_and_duration() {
        let clip = AudioClip::silence(500, 24000);
        assert_eq!(clip.len(), 12000);
        assert!(clip.samples().iter().all(|&s| s == 0));

        assert!(AudioClip::silence(0, 24000).is_empty());
    }

    #[test]
    fn append_same_rate_concatenates() {
        let mut a = AudioClip::new(vec![1, 2], 16000);
        a.append(&AudioClip::new(vec![3, 4, 5], 16000));
        assert_eq!(a.samples(), &[1, 2, 3, 4, 5]);
    }

    #[test]
    fn append_different_rate_resamples_to_own_rate() {
        let mut a = AudioClip::empty(16000);
        a.append(&AudioClip::new(vec![1000; 48000], 48000));
        assert!(a.len() >= 15900 && a.len() <= 16100);
        assert_eq!(a.sample_rate(), 16000);
    }

    #[test]
    fn append_to_zero_rate_clip_keeps_samples() {
        let mut a = AudioClip::new(vec![1], 0);
        a.append(&AudioClip::new(vec![2, 3], 16000));
        assert_eq!(a.samples(), &[1, 2, 3]);
    }

    #[test]
    fn resample_preserves_constant_signal() {
        let out = resample(&[1000i16; 44100], 44100, 16000);
        assert!(out.len() >= 15900 && out.len() <= 16100);
        assert!(out.iter().all(|&s| s == 1000));
    }

    #[test]
    fn downmix_stereo_averages_pairs() {
        assert_eq!(downmix(&[100, 200, 300, 400, 500, 600], 2), vec![150, 350, 550]);
        assert_eq!(downmix(&[7, 8, 9], 1), vec![7, 8, 9]);
    }
}
