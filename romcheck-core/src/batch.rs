use crate::header::{entry_jump_target, CartridgeHeader, Header};
use crate::{check, RomError, RomSource, VerdictRecord};
use crossbeam::channel;

/// Checked state of one ROM.
#[derive(Debug)]
pub struct Outcome {
    pub display_name: String,
    pub result: Result<VerdictRecord, RomError>,
}

impl Outcome {
    pub fn status(&self) -> Status {
        match &self.result {
            Ok(v) if v.matches => Status::Match,
            Ok(_) => Status::Mismatch,
            Err(RomError::UnsupportedExtension(_)) => Status::NotApplicable,
            Err(_) => Status::Unknown,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Match,
    Mismatch,
    Unknown,
    NotApplicable,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub total: usize,
    pub matched: usize,
    pub mismatched: usize,
    pub unknown: usize,
}

/// Accumulated outcomes of one run, in discovery order.
#[derive(Debug, Default)]
pub struct Report {
    pub outcomes: Vec<Outcome>,
}

impl Report {
    pub fn summary(&self) -> Summary {
        let mut summary = Summary {
            total: self.outcomes.len(),
            ..Summary::default()
        };
        for outcome in &self.outcomes {
            match outcome.status() {
                Status::Match => summary.matched += 1,
                Status::Mismatch => summary.mismatched += 1,
                Status::Unknown | Status::NotApplicable => summary.unknown += 1,
            }
        }
        summary
    }

    /// Reorders outcomes by display name, ignoring case.
    pub fn sort_by_name(&mut self) {
        self.outcomes
            .sort_by_cached_key(|o| o.display_name.to_lowercase());
    }
}

/// Default worker count: up to four, never more than the machine has.
pub fn default_jobs() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(2)
        .min(4)
}

/// Loads and checks one ROM.
pub fn check_source(source: &RomSource) -> Outcome {
    let result = source
        .load()
        .map_err(RomError::from)
        .and_then(|rom| {
            if log::log_enabled!(log::Level::Debug) {
                log_header(&source.display_name, &rom);
            }
            check(source.file_name(), &rom)
        });

    if let Err(e) = &result {
        log::warn!("{}: {}", source.display_name, e);
    }
    Outcome {
        display_name: source.display_name.clone(),
        result,
    }
}

fn log_header(name: &str, rom: &[u8]) {
    match CartridgeHeader::parse(rom) {
        Ok(header) => log::debug!(
            "{}: {} header, title {:?}, flag {:#04x}, entry {:?}",
            name,
            header.format_name(),
            header.title(),
            header.cgb_flag(),
            entry_jump_target(&header)
        ),
        Err(e) => log::debug!("{}: {}", name, e),
    }
}

/// Checks every source with `jobs` worker threads.
///
/// Outcomes come back in the same order as `sources` regardless of `jobs`.
pub fn run(sources: &[RomSource], jobs: usize) -> Report {
    let jobs = jobs.clamp(1, sources.len().max(1));
    if jobs == 1 {
        return Report {
            outcomes: sources.iter().map(check_source).collect(),
        };
    }

    let (job_tx, job_rx) = channel::unbounded::<(usize, &RomSource)>();
    let (done_tx, done_rx) = channel::unbounded::<(usize, Outcome)>();
    for job in sources.iter().enumerate() {
        // Receiver is alive for the whole function.
        let _ = job_tx.send(job);
    }
    drop(job_tx);

    let scoped = crossbeam::scope(|s| {
        for _ in 0..jobs {
            let job_rx = job_rx.clone();
            let done_tx = done_tx.clone();
            s.spawn(move |_| {
                for (index, source) in job_rx {
                    if done_tx.send((index, check_source(source))).is_err() {
                        break;
                    }
                }
            });
        }
    });
    drop(done_tx);

    if scoped.is_err() {
        log::error!("A worker panicked; its ROMs are missing from the report");
    }

    let mut indexed: Vec<(usize, Outcome)> = done_rx.into_iter().collect();
    indexed.sort_by_key(|(index, _)| *index);
    log::info!("Checked {} ROMs with {} workers", indexed.len(), jobs);

    Report {
        outcomes: indexed.into_iter().map(|(_, outcome)| outcome).collect(),
    }
}
