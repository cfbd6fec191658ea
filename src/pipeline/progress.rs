//! Progress reporting for batch runs.

use std::fmt;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

/// One progress line. Counts are 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    /// Sentences generated for one more entry
    Processed { completed: usize, total: usize },
    /// One more audio file written
    Saved {
        path: PathBuf,
        completed: usize,
        total: usize,
    },
}

fn percent(completed: usize, total: usize) -> f64 {
    if total == 0 {
        return 100.0;
    }
    completed as f64 / total as f64 * 100.0
}

impl fmt::Display for ProgressEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProgressEvent::Processed { completed, total } => write!(
                f,
                "Processed: {completed}/{total}, {:.2}%",
                percent(*completed, *total)
            ),
            ProgressEvent::Saved {
                path,
                completed,
                total,
            } => write!(
                f,
                "Saved: {}, {completed}/{total}, {:.2}%",
                path.display(),
                percent(*completed, *total)
            ),
        }
    }
}

/// Receives progress events; called from many tasks at once.
pub trait ProgressReporter: Send + Sync {
    fn report(&self, event: &ProgressEvent);
}

/// Prints each event as a line on stdout.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutReporter;

impl ProgressReporter for StdoutReporter {
    fn report(&self, event: &ProgressEvent) {
        println!("{event}");
    }
}

/// Drops every event (`--quiet`).
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentReporter;

impl ProgressReporter for SilentReporter {
    fn report(&self, event: &ProgressEvent) {
        log::debug!("{event}");
    }
}

/// Keeps every event in memory, for tests.
#[derive(Debug, Default)]
pub struct CollectingReporter {
    events: Mutex<Vec<ProgressEvent>>,
}

impl CollectingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.events().iter().map(ToString::to_string).collect()
    }
}

impl ProgressReporter for CollectingReporter {
    fn report(&self, event: &ProgressEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}

/// Monotonic counter shared by the tasks of one batch.
///
/// Counting and reporting happen under one lock, so printed counts never go
/// backwards even when many tasks finish at once.
#[derive(Debug)]
pub struct ProgressCounter {
    completed: Mutex<usize>,
    total: usize,
}

impl ProgressCounter {
    /// Counter that starts at `already_done` out of `total`.
    pub fn new(already_done: usize, total: usize) -> Self {
        Self {
            completed: Mutex::new(already_done),
            total,
        }
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// Count one more entry with generated sentences and report it.
    pub fn report_processed(&self, reporter: &dyn ProgressReporter) {
        self.advance_and_report(reporter, |completed, total| ProgressEvent::Processed {
            completed,
            total,
        });
    }

    /// Count one more written file and report it.
    pub fn report_saved(&self, reporter: &dyn ProgressReporter, path: PathBuf) {
        self.advance_and_report(reporter, |completed, total| ProgressEvent::Saved {
            path,
            completed,
            total,
        });
    }

    fn advance_and_report(
        &self,
        reporter: &dyn ProgressReporter,
        event: impl FnOnce(usize, usize) -> ProgressEvent,
    ) {
        let mut completed = self.completed.lock().unwrap_or_else(PoisonError::into_inner);
        *completed += 1;
        reporter.report(&event(*completed, self.total));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn processed_line_format() {
        let event = ProgressEvent::Processed {
            completed: 1,
            total: 3,
        };
        assert_eq!(event.to_string(), "Processed: 1/3, 33.33%");
    }

    #[test]
    fn saved_line_format() {
        let event = ProgressEvent::Saved {
            path: PathBuf::from("./out/0.mp3"),
            completed: 2,
            total: 2,
        };
        assert_eq!(event.to_string(), "Saved: ./out/0.mp3, 2/2, 100.00%");
    }

    #[test]
    fn percent_of_empty_batch_is_complete() {
        assert_eq!(percent(0, 0), 100.0);
    }

    #[test]
    fn counter_is_one_based_and_monotonic() {
        let reporter = CollectingReporter::new();
        let counter = ProgressCounter::new(0, 3);
        counter.report_processed(&reporter);
        counter.report_saved(&reporter, PathBuf::from("out/1.mp3"));

        let resumed = ProgressCounter::new(5, 8);
        resumed.report_processed(&reporter);
        assert_eq!(resumed.total(), 8);

        assert_eq!(
            reporter.lines(),
            vec![
                "Processed: 1/3, 33.33%",
                "Saved: out/1.mp3, 2/3, 66.67%",
                "Processed: 6/8, 75.00%",
            ]
        );
    }

    /// Reporter that yields between reading and recording, widening any race
    /// between counting and printing.
    struct SlowReporter(CollectingReporter);

    impl ProgressReporter for SlowReporter {
        fn report(&self, event: &ProgressEvent) {
            std::thread::yield_now();
            self.0.report(event);
        }
    }

    #[test]
    fn concurrent_reports_arrive_in_count_order() {
        let total = 200;
        let counter = ProgressCounter::new(0, total);
        let reporter = SlowReporter(CollectingReporter::new());

        std::thread::scope(|scope| {
            for _ in 0..8 {
                scope.spawn(|| {
                    for _ in 0..total / 8 {
                        counter.report_processed(&reporter);
                    }
                });
            }
        });

        let counts: Vec<usize> = reporter
            .0
            .events()
            .iter()
            .map(|event| match event {
                ProgressEvent::Processed { completed, .. } => *completed,
                other => panic!("unexpected event {other:?}"),
            })
            .collect();
        assert_eq!(counts, (1..=total).collect::<Vec<_>>());
    }

    #[test]
    fn collecting_reporter_keeps_order() {
        let reporter = CollectingReporter::new();
        reporter.report(&ProgressEvent::Processed {
            completed: 1,
            total: 2,
        });
        reporter.report(&ProgressEvent::Processed {
            completed: 2,
            total: 2,
        });
        assert_eq!(
            reporter.lines(),
            vec!["Processed: 1/2, 50.00%", "Processed: 2/2, 100.00%"]
        );
    }
}
