//! Progress reporting for bulk updates.

use std::io::Write;

/// Receives the number of bulk-update requests that have not completed yet.
pub trait Progress {
    fn remaining(&self, remaining: usize);

    /// Called once when a bulk update stops, successfully or not, with the
    /// number of updates that succeeded.
    fn finished(&self, _updated: usize) {}
}

/// Discards progress.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl Progress for NoProgress {
    fn remaining(&self, _remaining: usize) {}
}

/// Rewrites a single `"N remaining..."` line on stdout and replaces it with
/// the final count when the update stops.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleProgress;

impl ConsoleProgress {
    fn write_remaining(out: &mut impl Write, remaining: usize) -> std::io::Result<()> {
        write!(out, "\r{remaining} remaining...")?;
        out.flush()
    }

    fn write_finished(out: &mut impl Write, updated: usize) -> std::io::Result<()> {
        writeln!(out, "\rNumber of transactions updated: {updated}")?;
        out.flush()
    }
}

impl Progress for ConsoleProgress {
    fn remaining(&self, remaining: usize) {
        let _ = Self::write_remaining(&mut std::io::stdout().lock(), remaining);
    }

    fn finished(&self, updated: usize) {
        let _ = Self::write_finished(&mut std::io::stdout().lock(), updated);
    }
}

impl<F> Progress for F
where
    F: Fn(usize),
{
    fn remaining(&self, remaining: usize) {
        self(remaining)
    }
}
