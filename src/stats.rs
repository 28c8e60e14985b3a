use std::{
    collections::BTreeMap,
    fs::{File, OpenOptions},
    io::{self, BufRead, BufReader, BufWriter, Write},
};

use serde::Serialize;
use tempfile::NamedTempFile;

/// Buffered samples spill to the durable log past this many entries.
const SPILL_THRESHOLD: usize = 10_000;

/// The two residency sample streams. Every request contributes exactly one
/// sample to exactly one of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    InCache,
    NotInCache,
}

/// Running hit/miss counters for one cache.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HitStats {
    pub requests: u64,
    pub hits: u64,
    pub misses: u64,
    pub miss_chance: f64,
}

/// Gap frequency histograms read back from the durable logs, sorted
/// ascending by gap value. Tuples serialize as `[gap, count]` pairs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtendedStats {
    pub in_cache: Vec<(i64, u64)>,
    pub not_in_cache: Vec<(i64, u64)>,
}

impl ExtendedStats {
    pub fn total_samples(&self) -> u64 {
        let sum = |pairs: &[(i64, u64)]| pairs.iter().map(|&(_, count)| count).sum::<u64>();
        sum(&self.in_cache) + sum(&self.not_in_cache)
    }
}

/// One append-only gap log: an in-memory buffer backed by a spill file that
/// is unlinked when the log drops. A `None` sample marks a first touch and is
/// encoded as `-1` on disk.
#[derive(Debug)]
pub struct GapLog {
    path: tempfile::TempPath,
    buffered: Vec<Option<u64>>,
}

impl GapLog {
    fn new() -> io::Result<Self> {
        Ok(GapLog {
            path: NamedTempFile::new()?.into_temp_path(),
            buffered: Vec::new(),
        })
    }

    fn push(&mut self, gap: Option<u64>) -> io::Result<()> {
        self.buffered.push(gap);
        if self.buffered.len() > SPILL_THRESHOLD {
            self.flush()?;
        }
        Ok(())
    }

    /// Appends the buffer to the durable log and clears it. The file handle
    /// is scoped to this call, so earlier flushes stay durable if the run
    /// dies mid-way.
    fn flush(&mut self) -> io::Result<()> {
        let file = OpenOptions::new().append(true).open(&self.path)?;
        let mut out = BufWriter::new(file);
        for gap in &self.buffered {
            writeln!(out, "{}", encode(*gap))?;
        }
        out.flush()?;
        self.buffered.clear();
        Ok(())
    }

    /// Frequency-counts the durable log. Only flushed samples are visible.
    fn histogram(&self) -> io::Result<BTreeMap<i64, u64>> {
        let file = File::open(&self.path)?;
        let mut counts = BTreeMap::new();
        for line in BufReader::new(file).lines() {
            let line = line?;
            let gap: i64 = line.parse().map_err(|err| {
                io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("bad gap entry {line:?}: {err}"),
                )
            })?;
            *counts.entry(gap).or_insert(0) += 1;
        }
        Ok(counts)
    }
}

fn encode(gap: Option<u64>) -> i64 {
    match gap {
        Some(gap) => gap as i64,
        None => -1,
    }
}

/// Both residency streams of one cache instance.
#[derive(Debug)]
pub struct ResidencyStats {
    in_cache: GapLog,
    not_in_cache: GapLog,
}

impl ResidencyStats {
    pub fn new() -> io::Result<Self> {
        Ok(ResidencyStats {
            in_cache: GapLog::new()?,
            not_in_cache: GapLog::new()?,
        })
    }

    fn log(&mut self, stream: Stream) -> &mut GapLog {
        match stream {
            Stream::InCache => &mut self.in_cache,
            Stream::NotInCache => &mut self.not_in_cache,
        }
    }

    pub fn record(&mut self, stream: Stream, gap: Option<u64>) -> io::Result<()> {
        self.log(stream).push(gap)
    }

    pub fn flush(&mut self, stream: Stream) -> io::Result<()> {
        self.log(stream).flush()
    }

    pub fn histograms(&self) -> io::Result<ExtendedStats> {
        Ok(ExtendedStats {
            in_cache: self.in_cache.histogram()?.into_iter().collect(),
            not_in_cache: self.not_in_cache.histogram()?.into_iter().collect(),
        })
    }
}
