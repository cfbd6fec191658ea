//! Decoding of synthesized speech into PCM clips.
//!
//! WAV data is read with `hound`; anything else (the speech services return
//! MP3 by default) goes through symphonia's probe. Multi-channel audio is
//! downmixed to mono.

use crate::audio::clip::{AudioClip, downmix};
use crate::error::{Result, VocabcastError};
use std::io::Cursor;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{CODEC_TYPE_NULL, DecoderOptions};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

/// Decode an encoded audio buffer (WAV or MP3) into a mono clip.
pub fn decode(bytes: &[u8]) -> Result<AudioClip> {
    if bytes.is_empty() {
        return Err(decode_error("empty audio buffer"));
    }
    if bytes.starts_with(b"RIFF") {
        decode_wav(bytes)
    } else {
        decode_compressed(bytes)
    }
}

fn decode_error(message: impl Into<String>) -> VocabcastError {
    VocabcastError::AudioDecode {
        message: message.into(),
    }
}

fn decode_wav(bytes: &[u8]) -> Result<AudioClip> {
    let mut reader = hound::WavReader::new(Cursor::new(bytes))
        .map_err(|e| decode_error(format!("Failed to parse WAV data: {e}")))?;

    let spec = reader.spec();
    let interleaved: Vec<i16> = match (spec.sample_format, spec.bits_per_sample) {
        (hound::SampleFormat::Int, 16) => reader
            .samples::<i16>()
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| decode_error(format!("Failed to read WAV samples: {e}")))?,
        (hound::SampleFormat::Int, bits) if bits <= 32 => {
            let shift = i32::from(bits) - 16;
            reader
                .samples::<i32>()
                .map(|s| {
                    s.map(|v| {
                        if shift >= 0 {
                            (v >> shift) as i16
                        } else {
                            (v << -shift) as i16
                        }
                    })
                })
                .collect::<std::result::Result<Vec<_>, _>>()
                .map_err(|e| decode_error(format!("Failed to read WAV samples: {e}")))?
        }
        (hound::SampleFormat::Float, 32) => reader
            .samples::<f32>()
            .map(|s| s.map(f32_to_i16))
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| decode_error(format!("Failed to read WAV samples: {e}")))?,
        (format, bits) => {
            return Err(decode_error(format!(
                "Unsupported WAV sample format: {format:?} {bits}-bit"
            )));
        }
    };

    if spec.sample_rate == 0 {
        return Err(decode_error("WAV data declares a sample rate of 0"));
    }

    Ok(AudioClip::new(
        downmix(&interleaved, spec.channels as usize),
        spec.sample_rate,
    ))
}

fn f32_to_i16(sample: f32) -> i16 {
    (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16
}

fn decode_compressed(bytes: &[u8]) -> Result<AudioClip> {
    let mss = MediaSourceStream::new(Box::new(Cursor::new(bytes.to_vec())), Default::default());

    let probed = symphonia::default::get_probe()
        .format(
            &Hint::new(),
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| decode_error(format!("Unrecognized audio format: {e}")))?;

    let mut format = probed.format;
    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| decode_error("No audio track found"))?;

    let track_id = track.id;
    let mut sample_rate = track.codec_params.sample_rate;
    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| decode_error(format!("No decoder for audio track: {e}")))?;

    let mut samples = Vec::new();
    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                break;
            }
            Err(e) => return Err(decode_error(format!("Failed to read audio packet: {e}"))),
        };

        if packet.track_id() != track_id {
            continue;
        }

        match decoder.decode(&packet) {
            Ok(decoded) => {
                let spec = *decoded.spec();
                let capacity = decoded.capacity() as u64;
                sample_rate.get_or_insert(spec.rate);

                let mut buffer = SampleBuffer::<i16>::new(capacity, spec);
                buffer.copy_interleaved_ref(decoded);
                samples.extend(downmix(buffer.samples(), spec.channels.count()));
            }
            Err(SymphoniaError::DecodeError(e)) => {
                // Corrupt frame: skip it and keep the rest of the stream
                log::warn!("Skipping undecodable audio packet: {e}");
            }
            Err(e) => return Err(decode_error(format!("Audio decoding failed: {e}"))),
        }
    }

    let sample_rate = sample_rate
        .filter(|&rate| rate > 0)
        .ok_or_else(|| decode_error("Audio stream has no sample rate"))?;

    log::debug!("Decoded {} samples at {} Hz", samples.len(), sample_rate);
    Ok(AudioClip::new(samples, sample_rate))
}
