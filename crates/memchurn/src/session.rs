//! One process run: selector in, probe text out.

use std::error::Error;
use std::fmt;
use std::io::{self, BufRead, Write};

use log::{info, warn};
use memchurn_core::Selector;
use memchurn_engine::{Driver, DriverConfig, DriverError, RunReport};
use memchurn_probe::MemoryProbe;

/// Errors from [`Session::execute`].
#[derive(Debug)]
pub enum SessionError {
    /// The driver failed to build or run.
    Driver(DriverError),
    /// Writing the probe report failed.
    Io(io::Error),
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Driver(e) => write!(f, "driver: {e}"),
            Self::Io(e) => write!(f, "output: {e}"),
        }
    }
}

impl Error for SessionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Driver(e) => Some(e),
            Self::Io(e) => Some(e),
        }
    }
}

impl From<DriverError> for SessionError {
    fn from(e: DriverError) -> Self {
        Self::Driver(e)
    }
}

impl From<io::Error> for SessionError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

/// Read the selector from the first non-blank line of `input`.
///
/// Blank lines are skipped, then the line's leading integer is parsed (see
/// [`Selector`]'s `FromStr`). End of input, or a line that does not start
/// with an integer, selects [`Selector::Baseline`].
pub fn read_selector<R: BufRead>(mut input: R) -> io::Result<Selector> {
    let mut line = String::new();
    while input.read_line(&mut line)? > 0 && line.trim().is_empty() {
        line.clear();
    }
    Ok(line.parse::<Selector>().unwrap_or_else(|e| {
        warn!("{e}; running no experiment");
        Selector::Baseline
    }))
}

/// Runs a selected experiment and reports memory to `out`.
///
/// The probe is printed once after the experiment. With
/// [`mid_run_probe`](Session::mid_run_probe) enabled (the default in
/// debug builds) it is also printed between phase one and phase two.
pub struct Session<W> {
    config: DriverConfig,
    probe: MemoryProbe,
    mid_run_probe: bool,
    out: W,
}

impl<W: Write> Session<W> {
    /// Session with the compiled-in budgets writing to `out`.
    pub fn new(out: W) -> Self {
        Self {
            config: DriverConfig::default(),
            probe: MemoryProbe::new(),
            mid_run_probe: cfg!(debug_assertions),
            out,
        }
    }

    /// Replace the driver config.
    pub fn config(mut self, config: DriverConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the probe.
    pub fn probe(mut self, probe: MemoryProbe) -> Self {
        self.probe = probe;
        self
    }

    /// Print the probe after phase one as well.
    pub fn mid_run_probe(mut self, enabled: bool) -> Self {
        self.mid_run_probe = enabled;
        self
    }

    /// Run `selector` and print the final probe.
    ///
    /// [`Selector::Baseline`] allocates nothing, not even the table, and
    /// returns `Ok(None)` after printing the probe.
    pub fn execute(&mut self, selector: Selector) -> Result<Option<RunReport>, SessionError> {
        let report = match selector {
            Selector::Experiment(id) => {
                let mut driver = Driver::new(self.config.clone())?;
                let phase_one = driver.phase_one(id)?;
                if self.mid_run_probe {
                    self.probe.report(&mut self.out)?;
                }
                let phase_two = driver.phase_two(id)?;
                info!("experiment {id} finished");
                Some(RunReport {
                    experiment: id,
                    phase_one,
                    phase_two,
                })
            }
            Selector::Baseline => {
                info!("no experiment selected");
                None
            }
        };
        self.probe.report(&mut self.out)?;
        Ok(report)
    }

    /// Consume the session and return the writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}
