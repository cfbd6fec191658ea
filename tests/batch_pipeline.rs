//! End-to-end batch runs against mock services.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;
use vocabcast::audio::OutputFormat;
use vocabcast::config::Config;
use vocabcast::pipeline::naming::content_hash;
use vocabcast::pipeline::{CollectingReporter, ProgressEvent};
use vocabcast::{
    BatchOrchestrator, Manifest, MockSpeechBackend, MockTextGenerator, NamingScheme, VocabEntry,
    VocabcastError,
};

fn wav_config(naming: NamingScheme, concurrency: usize) -> Config {
    let mut config = Config::default();
    config.audio.output_format = OutputFormat::Wav;
    config.audio.separator_ms = 20;
    config.batch.naming = naming;
    config.batch.concurrency = concurrency;
    config
}

fn build(
    config: &Config,
    speech: Arc<MockSpeechBackend>,
) -> (BatchOrchestrator, Arc<CollectingReporter>) {
    let reporter = Arc::new(CollectingReporter::new());
    let orchestrator = vocabcast::app::build_orchestrator(
        config,
        Arc::new(MockTextGenerator::new("Mam kota.|I have a cat.")),
        speech,
        reporter.clone(),
    );
    (orchestrator, reporter)
}

fn word_list(n: usize) -> Vec<VocabEntry> {
    (0..n)
        .map(|i| VocabEntry::new(format!("słowo{i}"), format!("word{i}")))
        .collect()
}

fn audio_files(dir: &Path) -> BTreeSet<String> {
    fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|name| name.ends_with(".wav"))
        .collect()
}

#[tokio::test]
async fn single_entry_manifest() {
    let dir = TempDir::new().unwrap();
    let config = wav_config(NamingScheme::Position, 10);
    let (orchestrator, _) = build(&config, Arc::new(MockSpeechBackend::new()));

    orchestrator
        .run_batch(&[VocabEntry::new("kot", "cat")], dir.path())
        .await
        .unwrap();

    assert_eq!(audio_files(dir.path()), BTreeSet::from(["0.wav".to_string()]));
    let written: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(dir.path().join("content.json")).unwrap())
            .unwrap();
    assert_eq!(
        written,
        serde_json::json!({
            "0.wav": {
                "source": "kot",
                "target": "cat",
                "source_sentence": "Mam kota.",
                "target_sentence": "I have a cat.",
            }
        })
    );
}

#[tokio::test]
async fn every_entry_gets_a_file_and_a_key() {
    let dir = TempDir::new().unwrap();
    let config = wav_config(NamingScheme::Position, 3);
    let speech = Arc::new(MockSpeechBackend::new());
    let (orchestrator, reporter) = build(&config, speech.clone());

    let manifest = orchestrator.run_batch(&word_list(7), dir.path()).await.unwrap();

    assert_eq!(manifest.len(), 7);
    let files = audio_files(dir.path());
    let keys: BTreeSet<String> = manifest.iter().map(|(name, _)| name.clone()).collect();
    assert_eq!(files, keys);
    for (i, entry) in word_list(7).iter().enumerate() {
        assert_eq!(manifest.get(&format!("{i}.wav")).unwrap().source, entry.source);
    }
    assert_eq!(Manifest::load(&dir.path().join("content.json")).unwrap(), manifest);
    assert_eq!(speech.calls(), 7 * 4);

    let events = reporter.events();
    let processed = events
        .iter()
        .filter(|e| matches!(e, ProgressEvent::Processed { .. }))
        .count();
    assert_eq!(processed, 7);
    assert!(matches!(
        events.last(),
        Some(ProgressEvent::Saved {
            completed: 7,
            total: 7,
            ..
        })
    ));
}

#[tokio::test]
async fn hash_names_are_stable_across_runs() {
    let first = TempDir::new().unwrap();
    let second = TempDir::new().unwrap();
    let config = wav_config(NamingScheme::ContentHash, 10);
    let entries = vec![VocabEntry::new("kot", "cat"), VocabEntry::new("pies", "dog")];

    let (orchestrator, _) = build(&config, Arc::new(MockSpeechBackend::new()));
    orchestrator.run_batch(&entries, first.path()).await.unwrap();
    let reversed: Vec<_> = entries.iter().rev().cloned().collect();
    let (orchestrator, _) = build(&config, Arc::new(MockSpeechBackend::new()));
    orchestrator.run_batch(&reversed, second.path()).await.unwrap();

    let expected = BTreeSet::from([
        format!("{}.wav", content_hash("kot", "cat")),
        format!("{}.wav", content_hash("pies", "dog")),
    ]);
    assert_eq!(audio_files(first.path()), expected);
    assert_eq!(audio_files(second.path()), expected);
}

#[tokio::test]
async fn duplicate_pairs_collapse_under_hash_naming() {
    let dir = TempDir::new().unwrap();
    let config = wav_config(NamingScheme::ContentHash, 10);
    let speech = Arc::new(MockSpeechBackend::new());
    let (orchestrator, reporter) = build(&config, speech.clone());
    let entries = vec![
        VocabEntry::new("kot", "cat"),
        VocabEntry::new("kot", "cat"),
        VocabEntry::new("kot", "cat"),
    ];

    let manifest = orchestrator.run_batch(&entries, dir.path()).await.unwrap();

    assert_eq!(manifest.len(), 1);
    assert_eq!(audio_files(dir.path()).len(), 1);
    assert_eq!(speech.calls(), 4);
    assert!(reporter.lines().contains(&format!(
        "Saved: {}, 1/1, 100.00%",
        dir.path()
            .join(format!("{}.wav", content_hash("kot", "cat")))
            .display()
    )));
}

#[tokio::test]
async fn resume_skips_finished_entries() {
    let dir = TempDir::new().unwrap();
    let mut config = wav_config(NamingScheme::Slug, 10);
    let (orchestrator, _) = build(&config, Arc::new(MockSpeechBackend::new()));
    let first = orchestrator.run_batch(&word_list(3), dir.path()).await.unwrap();

    config.batch.resume = true;
    let speech = Arc::new(MockSpeechBackend::new());
    let (orchestrator, reporter) = build(&config, speech.clone());
    let mut entries = word_list(3);
    entries.push(VocabEntry::new("nowe", "new"));
    let second = orchestrator.run_batch(&entries, dir.path()).await.unwrap();

    assert_eq!(second.len(), 4);
    for (name, record) in first.iter() {
        assert_eq!(second.get(name), Some(record));
    }
    assert_eq!(speech.calls(), 4);
    assert!(speech.requests().iter().all(|(_, text)| !text.starts_with("słowo")));
    assert!(reporter.lines().iter().any(|line| line.ends_with(", 4/4, 100.00%")));
}

#[tokio::test]
async fn resume_redoes_entries_whose_file_is_missing() {
    let dir = TempDir::new().unwrap();
    let mut config = wav_config(NamingScheme::Position, 10);
    let (orchestrator, _) = build(&config, Arc::new(MockSpeechBackend::new()));
    orchestrator.run_batch(&word_list(2), dir.path()).await.unwrap();
    fs::remove_file(dir.path().join("1.wav")).unwrap();

    config.batch.resume = true;
    let speech = Arc::new(MockSpeechBackend::new());
    let (orchestrator, _) = build(&config, speech.clone());
    let manifest = orchestrator.run_batch(&word_list(2), dir.path()).await.unwrap();

    assert_eq!(manifest.len(), 2);
    assert_eq!(speech.calls(), 4);
    assert!(dir.path().join("1.wav").is_file());
}

#[tokio::test]
async fn resume_regenerates_positions_whose_words_changed() {
    let dir = TempDir::new().unwrap();
    let mut config = wav_config(NamingScheme::Position, 10);
    let (orchestrator, _) = build(&config, Arc::new(MockSpeechBackend::new()));
    orchestrator
        .run_batch(
            &[VocabEntry::new("kot", "cat"), VocabEntry::new("pies", "dog")],
            dir.path(),
        )
        .await
        .unwrap();

    config.batch.resume = true;
    let speech = Arc::new(MockSpeechBackend::new());
    let (orchestrator, _) = build(&config, speech.clone());
    let edited = vec![VocabEntry::new("koń", "horse"), VocabEntry::new("pies", "dog")];
    let manifest = orchestrator.run_batch(&edited, dir.path()).await.unwrap();

    let first = manifest.get("0.wav").unwrap();
    assert_eq!((first.source.as_str(), first.target.as_str()), ("koń", "horse"));
    assert_eq!(manifest.get("1.wav").unwrap().source, "pies");
    assert_eq!(speech.calls(), 4);
    assert!(speech.requests().iter().any(|(_, text)| text == "koń"));
    assert!(speech.requests().iter().all(|(_, text)| text != "pies"));
    assert_eq!(Manifest::load(&dir.path().join("content.json")).unwrap(), manifest);
}

#[tokio::test]
async fn failed_entry_aborts_batch_and_leaves_checkpoint() {
    let dir = TempDir::new().unwrap();
    let mut config = wav_config(NamingScheme::Position, 1);
    let failing = Arc::new(MockSpeechBackend::new().with_failing_text("boom"));
    let (orchestrator, _) = build(&config, failing.clone());
    let entries = vec![
        VocabEntry::new("kot", "cat"),
        VocabEntry::new("boom", "bang"),
        VocabEntry::new("pies", "dog"),
    ];

    let err = orchestrator.run_batch(&entries, dir.path()).await.unwrap_err();
    assert!(matches!(err, VocabcastError::SpeechSynthesis { .. }));

    let checkpoint = Manifest::load(&dir.path().join("content.json")).unwrap();
    assert!(checkpoint.get("0.wav").is_some());
    assert!(checkpoint.get("1.wav").is_none());
    assert!(!dir.path().join("1.wav").exists());
    assert_eq!(
        failing
            .requests()
            .iter()
            .filter(|(_, text)| text == "boom")
            .count(),
        4
    );

    config.batch.resume = true;
    let speech = Arc::new(MockSpeechBackend::new());
    let (orchestrator, _) = build(&config, speech.clone());
    let manifest = orchestrator.run_batch(&entries, dir.path()).await.unwrap();

    assert_eq!(manifest.len(), 3);
    assert!(speech.requests().iter().all(|(_, text)| text != "kot"));
}

#[tokio::test]
async fn transient_speech_failures_do_not_fail_the_batch() {
    let dir = TempDir::new().unwrap();
    let config = wav_config(NamingScheme::Position, 2);
    let speech = Arc::new(MockSpeechBackend::new().with_failures(3));
    let (orchestrator, _) = build(&config, speech.clone());

    let manifest = orchestrator.run_batch(&word_list(2), dir.path()).await.unwrap();

    assert_eq!(manifest.len(), 2);
    assert_eq!(speech.calls(), 2 * 4 + 3);
}

#[tokio::test]
async fn sequential_and_concurrent_runs_match() {
    let sequential = TempDir::new().unwrap();
    let concurrent = TempDir::new().unwrap();
    let entries = word_list(5);

    let (orchestrator, _) = build(
        &wav_config(NamingScheme::Position, 1),
        Arc::new(MockSpeechBackend::new()),
    );
    let a = orchestrator.run_batch(&entries, sequential.path()).await.unwrap();
    let (orchestrator, _) = build(
        &wav_config(NamingScheme::Position, 10),
        Arc::new(MockSpeechBackend::new()),
    );
    let b = orchestrator.run_batch(&entries, concurrent.path()).await.unwrap();

    assert_eq!(a, b);
    for name in audio_files(sequential.path()) {
        assert_eq!(
            fs::read(sequential.path().join(&name)).unwrap(),
            fs::read(concurrent.path().join(&name)).unwrap(),
            "{name} differs"
        );
    }
    assert_eq!(
        fs::read_to_string(sequential.path().join("content.json")).unwrap(),
        fs::read_to_string(concurrent.path().join("content.json")).unwrap()
    );
}
