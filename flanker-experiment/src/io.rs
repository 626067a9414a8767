use anyhow::{Context, Result};
use flanker_core::TrialRecord;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Receives one flat record per completed main-phase trial. Records are
/// committed as soon as the trial ends, so a quit loses nothing already
/// written.
pub trait TrialSink {
    fn commit(&mut self, record: &TrialRecord) -> Result<()>;
    fn finish(&mut self) -> Result<()>;
}

/// Audible error cue, played on incorrect and no-response trials.
pub trait ErrorCue {
    fn error_tone(&mut self);
}

impl<S: TrialSink + ?Sized> TrialSink for Box<S> {
    fn commit(&mut self, record: &TrialRecord) -> Result<()> {
        (**self).commit(record)
    }
    fn finish(&mut self) -> Result<()> {
        (**self).finish()
    }
}

impl<C: ErrorCue + ?Sized> ErrorCue for Box<C> {
    fn error_tone(&mut self) {
        (**self).error_tone()
    }
}

/// One JSON object per line, flushed on every commit.
pub struct JsonLinesSink {
    writer: BufWriter<File>,
}

impl JsonLinesSink {
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path)
            .with_context(|| format!("cannot create result file {}", path.display()))?;
        Ok(Self {
            writer: BufWriter::new(file),
        })
    }
}

impl TrialSink for JsonLinesSink {
    fn commit(&mut self, record: &TrialRecord) -> Result<()> {
        serde_json::to_writer(&mut self.writer, record).context("cannot serialize trial record")?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Keeps records in memory; for tests and dry runs.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub records: Vec<TrialRecord>,
    pub finished: bool,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TrialSink for MemorySink {
    fn commit(&mut self, record: &TrialRecord) -> Result<()> {
        self.records.push(record.clone());
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.finished = true;
        Ok(())
    }
}

/// Swallows the cue; for headless runs without an audio device.
#[derive(Debug, Default, Clone)]
pub struct NullCue;

impl ErrorCue for NullCue {
    fn error_tone(&mut self) {}
}

/// Counts cue triggers; clones share the counter so tests can assert on it.
#[derive(Debug, Default, Clone)]
pub struct CountingCue {
    count: Arc<AtomicUsize>,
}

impl CountingCue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }
}

impl ErrorCue for CountingCue {
    fn error_tone(&mut self) {
        self.count.fetch_add(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flanker_core::{Congruency, HandPlacement, Outcome, ResponseMade, TargetLetter};

    #[test]
    fn memory_sink_keeps_commits_in_order() {
        let mut sink = MemorySink::new();
        for trial_num in 1..=3 {
            sink.commit(&TrialRecord {
                block_num: 1,
                trial_num,
                hand_placed: HandPlacement::Left,
                fix_target_asynchrony: 800.0,
                target_letter: TargetLetter::H,
                left_flanker_type: Congruency::Congruent,
                right_flanker_type: Congruency::Neutral,
                response_time: 400.0,
                response_made: ResponseMade::H,
                response_error: Outcome::Correct,
            })
            .unwrap();
        }
        sink.finish().unwrap();
        assert_eq!(sink.records.len(), 3);
        assert_eq!(
            sink.records.iter().map(|r| r.trial_num).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
        assert!(sink.finished);
    }
}
