//! Encoding assembled clips into the output container.
//!
//! WAV is written in-process with `hound`. MP3 is produced by piping WAV
//! through `ffmpeg`, which must be on `PATH`.

use crate::audio::clip::AudioClip;
use crate::error::{Result, VocabcastError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::{Cursor, Write};
use std::process::{Command, Stdio};
use std::str::FromStr;

/// Audio container written to disk (and requested from the speech service).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Mp3,
    Wav,
}

impl OutputFormat {
    /// File extension, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Mp3 => "mp3",
            OutputFormat::Wav => "wav",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mp3" => Ok(OutputFormat::Mp3),
            "wav" => Ok(OutputFormat::Wav),
            other => Err(format!("unknown audio format '{other}' (expected mp3 or wav)")),
        }
    }
}

fn encode_error(message: impl Into<String>) -> VocabcastError {
    VocabcastError::AudioEncode {
        message: message.into(),
    }
}

/// Encode `clip` in the requested container.
pub fn encode(clip: &AudioClip, format: OutputFormat) -> Result<Vec<u8>> {
    match format {
        OutputFormat::Wav => encode_wav(clip),
        OutputFormat::Mp3 => encode_mp3(clip),
    }
}

/// 16-bit mono WAV.
pub fn encode_wav(clip: &AudioClip) -> Result<Vec<u8>> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: clip.sample_rate(),
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::with_capacity(44 + clip.len() * 2));
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec)
            .map_err(|e| encode_error(format!("Failed to start WAV stream: {e}")))?;
        for &sample in clip.samples() {
            writer
                .write_sample(sample)
                .map_err(|e| encode_error(format!("Failed to write WAV samples: {e}")))?;
        }
        writer
            .finalize()
            .map_err(|e| encode_error(format!("Failed to finalize WAV stream: {e}")))?;
    }
    Ok(cursor.into_inner())
}

fn encode_mp3(clip: &AudioClip) -> Result<Vec<u8>> {
    let wav = encode_wav(clip)?;

    let mut child = Command::new("ffmpeg")
        .args([
            "-hide_banner",
            "-loglevel",
            "error",
            "-f",
            "wav",
            "-i",
            "pipe:0",
            "-codec:a",
            "libmp3lame",
            "-q:a",
            "4",
            "-f",
            "mp3",
            "pipe:1",
        ])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                encode_error("ffmpeg not found in PATH (required for MP3 output)")
            } else {
                encode_error(format!("Failed to start ffmpeg: {e}"))
            }
        })?;

    let mut stdin = child
        .stdin
        .take()
        .ok_or_else(|| encode_error("ffmpeg stdin unavailable"))?;

    // Feed stdin from a separate thread so a full stdout pipe can't deadlock us
    let writer = std::thread::spawn(move || stdin.write_all(&wav));

    let output = child
        .wait_with_output()
        .map_err(|e| encode_error(format!("Failed to wait for ffmpeg: {e}")))?;

    let write_result = writer
        .join()
        .map_err(|_| encode_error("ffmpeg stdin writer panicked"))?;

    if !output.status.success() {
        return Err(encode_error(format!(
            "ffmpeg exited with {}: {}",
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }
    write_result.map_err(|e| encode_error(format!("Failed to pipe audio to ffmpeg: {e}")))?;

    if output.stdout.is_empty() {
        return Err(encode_error("ffmpeg produced no output"));
    }
    Ok(output.stdout)
}
