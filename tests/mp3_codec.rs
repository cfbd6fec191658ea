//! MP3 in and out: symphonia decoding of a fixture and ffmpeg encoding.

use std::path::PathBuf;
use std::process::Command;
use std::sync::Arc;
use tempfile::TempDir;
use vocabcast::audio::{AudioClip, OutputFormat, decode, encode};
use vocabcast::config::Config;
use vocabcast::pipeline::CollectingReporter;
use vocabcast::{MockSpeechBackend, MockTextGenerator, VocabEntry, VocabcastError};

fn load_fixture(name: &str) -> Vec<u8> {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name);
    std::fs::read(&path).expect("Failed to read fixture")
}

fn ffmpeg_available() -> bool {
    let found = Command::new("ffmpeg")
        .arg("-version")
        .output()
        .is_ok_and(|output| output.status.success());
    if !found {
        eprintln!("\n╔══════════════════════════════════════════════════════════════╗");
        eprintln!("║  ffmpeg NOT FOUND — SKIPPING MP3 ENCODING TESTS              ║");
        eprintln!("║                                                              ║");
        eprintln!("║  Install it with:                                            ║");
        eprintln!("║    sudo apt install ffmpeg                                   ║");
        eprintln!("╚══════════════════════════════════════════════════════════════╝\n");
    }
    found
}

#[test]
fn decodes_mp3_fixture() {
    // 30 MPEG-1 Layer III frames of silence, 44.1kHz mono
    let clip = decode(&load_fixture("silence.mp3")).unwrap();

    assert_eq!(clip.sample_rate(), 44100);
    assert!(!clip.is_empty());
    assert!(clip.len() <= 30 * 1152);
    assert!(clip.samples().iter().all(|&s| s == 0));
}

#[test]
fn truncated_mp3_still_decodes_whole_frames() {
    let bytes = load_fixture("silence.mp3");
    let clip = decode(&bytes[..bytes.len() / 2 + 7]).unwrap();
    assert_eq!(clip.sample_rate(), 44100);
    assert!(clip.len() <= 16 * 1152);
}

#[test]
fn mp3_round_trip_through_ffmpeg() {
    let tone: Vec<i16> = (0..24000)
        .map(|i| ((i as f32 * 440.0 * std::f32::consts::TAU / 24000.0).sin() * 8000.0) as i16)
        .collect();
    let clip = AudioClip::new(tone, 24000);

    let encoded = encode(&clip, OutputFormat::Mp3);
    if !ffmpeg_available() {
        let err = encoded.unwrap_err();
        assert!(matches!(err, VocabcastError::AudioEncode { .. }));
        assert!(err.to_string().contains("ffmpeg"));
        return;
    }

    let bytes = encoded.unwrap();
    assert!(!bytes.starts_with(b"RIFF"));
    let decoded = decode(&bytes).unwrap();
    assert_eq!(decoded.sample_rate(), 24000);
    assert!(decoded.len() >= clip.len());
    assert!(decoded.samples().iter().any(|&s| s.unsigned_abs() > 1000));
}

#[tokio::test]
async fn default_batch_writes_mp3_files() {
    if !ffmpeg_available() {
        return;
    }
    let dir = TempDir::new().unwrap();
    let config = Config::default();
    let orchestrator = vocabcast::app::build_orchestrator(
        &config,
        Arc::new(MockTextGenerator::new("Mam kota.|I have a cat.")),
        Arc::new(MockSpeechBackend::new()),
        Arc::new(CollectingReporter::new()),
    );

    let manifest = orchestrator
        .run_batch(&[VocabEntry::new("kot", "cat")], dir.path())
        .await
        .unwrap();

    let record = manifest.get("0.mp3").unwrap();
    assert_eq!(record.source, "kot");
    assert_eq!(record.target_sentence, "I have a cat.");
    let clip = decode(&std::fs::read(dir.path().join("0.mp3")).unwrap()).unwrap();
    assert!(!clip.is_empty());
}
