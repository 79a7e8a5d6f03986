use std::io::{self, Write};
use std::time::Duration;

use crossbeam_channel::tick;
use num_format::{Locale, ToFormattedString};

use crate::progress::{CancellationFlag, ProgressCounter, ProgressSnapshot};

/// Renders one progress line. Counts use thousands separators.
pub fn format_progress(snapshot: &ProgressSnapshot) -> String {
    format!(
        "{}/{} IPs | {:.2} IPs/sec | Progress: {:.2}% | ETA: {:.2}s | Elapsed: {:.2}s",
        snapshot.processed.to_formatted_string(&Locale::en),
        snapshot.total.to_formatted_string(&Locale::en),
        snapshot.rate(),
        snapshot.percent(),
        snapshot.eta_secs(),
        snapshot.elapsed.as_secs_f64()
    )
}

/// Periodically overwrites a single terminal line with the search progress.
pub struct Reporter<W: Write> {
    out: W,
    interval: Duration,
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W, interval: Duration) -> Self {
        Reporter { out, interval }
    }

    pub fn render(&mut self, snapshot: &ProgressSnapshot) -> io::Result<()> {
        write!(self.out, "\r{}", format_progress(snapshot))?;
        self.out.flush()
    }

    /// Renders on every tick until `cancel` is raised, then hands the reporter
    /// back so the caller can draw the closing line once all counts are in.
    pub fn run(
        mut self,
        progress: &ProgressCounter,
        cancel: &CancellationFlag,
    ) -> io::Result<Self> {
        let ticker = tick(self.interval);

        while !cancel.is_cancelled() {
            self.render(&progress.snapshot())?;
            // a tick channel never disconnects
            let _ = ticker.recv();
        }

        Ok(self)
    }

    /// Renders `snapshot` one last time, ends the line and returns the sink.
    pub fn finish(mut self, snapshot: &ProgressSnapshot) -> io::Result<W> {
        self.render(snapshot)?;
        writeln!(self.out)?;
        self.out.flush()?;
        Ok(self.out)
    }
}
