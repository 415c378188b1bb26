//! Station counting session.
//!
//! A session walks through two phases: setup (choose how many stations
//! there are, then name each of them) and counting (type a number on the
//! keypad, commit it to the current station, move on to the next one).

use super::errors::{SessionError, SessionResult};
use super::models::{CommitReceipt, Phase, SetupStage, Station, Summary};
use tracing::{debug, info};

/// Default upper bound on the number of stations in one session.
pub const DEFAULT_MAX_STATIONS: usize = 20;

/// The full mutable state of one run of the counter.
///
/// Guard conditions that a UI expresses by disabling controls are reported
/// here as [`SessionError::InvalidTransition`], so every rule can be
/// exercised without a UI.
///
/// # Examples
///
/// ```
/// use tally::domain::{Phase, Session};
///
/// let mut session = Session::default();
/// session.set_station_count(2).unwrap();
/// session.set_station_name(0, "North Gate").unwrap();
/// session.set_station_name(1, "Depot").unwrap();
/// session.start_counting().unwrap();
/// assert_eq!(session.phase(), Phase::Counting);
///
/// session.input_digit('1').unwrap();
/// session.input_digit('2').unwrap();
/// let receipt = session.commit().unwrap().unwrap();
/// assert_eq!(receipt.total, 12);
/// assert_eq!(session.current_station_index(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct Session {
    stations: Vec<Station>,
    phase: Phase,
    current_station_index: usize,
    pending_input: String,
    max_stations: usize,
}

impl Default for Session {
    fn default() -> Self {
        Self::with_max_stations(DEFAULT_MAX_STATIONS)
    }
}

impl Session {
    /// Creates an empty session that accepts at most `max_stations` stations.
    pub fn with_max_stations(max_stations: usize) -> Self {
        Self {
            stations: Vec::new(),
            phase: Phase::Setup,
            current_station_index: 0,
            pending_input: String::new(),
            max_stations,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Which setup step is active. Only meaningful while in [`Phase::Setup`].
    pub fn setup_stage(&self) -> SetupStage {
        if self.stations.is_empty() {
            SetupStage::CountEntry
        } else {
            SetupStage::NameEntry
        }
    }

    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    pub fn station_count(&self) -> usize {
        self.stations.len()
    }

    pub fn max_stations(&self) -> usize {
        self.max_stations
    }

    pub fn current_station_index(&self) -> usize {
        self.current_station_index
    }

    pub fn current_station(&self) -> Option<&Station> {
        self.stations.get(self.current_station_index)
    }

    pub fn pending_input(&self) -> &str {
        &self.pending_input
    }

    /// The pending buffer as shown on the keypad display: `"0"` when empty.
    pub fn display_input(&self) -> &str {
        if self.pending_input.is_empty() {
            "0"
        } else {
            &self.pending_input
        }
    }

    /// Whether [`Session::start_counting`] would succeed right now.
    pub fn can_start(&self) -> bool {
        self.phase == Phase::Setup
            && !self.stations.is_empty()
            && self.stations.iter().all(Station::has_name)
    }

    pub fn summary(&self) -> Summary {
        Summary::from_stations(&self.stations)
    }

    /// Replaces the station list with `n` blank stations.
    ///
    /// # Errors
    ///
    /// * [`SessionError::InvalidTransition`] if `n` is zero or counting has started
    /// * [`SessionError::TooManyStations`] if `n` exceeds the configured cap
    pub fn set_station_count(&mut self, n: usize) -> SessionResult<()> {
        if self.phase != Phase::Setup {
            return Err(SessionError::InvalidTransition(
                "station count can only be set during setup",
            ));
        }
        if n == 0 {
            return Err(SessionError::InvalidTransition(
                "station count must be positive",
            ));
        }
        if n > self.max_stations {
            return Err(SessionError::TooManyStations {
                requested: n,
                max: self.max_stations,
            });
        }

        self.stations = (0..n).map(Station::new).collect();
        self.current_station_index = 0;
        info!(stations = n, "configured stations");
        Ok(())
    }

    /// Stores `text` verbatim as the name of station `index`.
    pub fn set_station_name(&mut self, index: usize, text: &str) -> SessionResult<()> {
        if self.phase != Phase::Setup {
            return Err(SessionError::InvalidTransition(
                "station names are fixed once counting starts",
            ));
        }
        let len = self.stations.len();
        let station = self
            .stations
            .get_mut(index)
            .ok_or(SessionError::StationOutOfRange { index, len })?;
        station.name = text.to_string();
        Ok(())
    }

    /// Drops the station list and goes back to count entry.
    pub fn reconfigure(&mut self) -> SessionResult<()> {
        if self.phase != Phase::Setup {
            return Err(SessionError::InvalidTransition(
                "reconfigure is only available during setup",
            ));
        }
        self.stations.clear();
        self.current_station_index = 0;
        debug!("station list cleared for reconfiguration");
        Ok(())
    }

    /// Moves from setup to counting once every station has a non-blank name.
    pub fn start_counting(&mut self) -> SessionResult<()> {
        if self.phase != Phase::Setup {
            return Err(SessionError::InvalidTransition("counting has already started"));
        }
        if self.stations.is_empty() {
            return Err(SessionError::InvalidTransition("no stations configured"));
        }
        if !self.stations.iter().all(Station::has_name) {
            return Err(SessionError::InvalidTransition("every station needs a name"));
        }

        self.phase = Phase::Counting;
        self.current_station_index = 0;
        self.pending_input.clear();
        info!(stations = self.stations.len(), "counting started");
        Ok(())
    }

    /// Appends a keypad digit to the pending buffer.
    pub fn input_digit(&mut self, digit: char) -> SessionResult<()> {
        if self.phase != Phase::Counting {
            return Err(SessionError::InvalidTransition(
                "digits are only accepted while counting",
            ));
        }
        if !digit.is_ascii_digit() {
            return Err(SessionError::InvalidDigit(digit));
        }
        self.pending_input.push(digit);
        Ok(())
    }

    pub fn clear_input(&mut self) {
        self.pending_input.clear();
    }

    pub fn backspace(&mut self) {
        self.pending_input.pop();
    }

    /// Adds the pending value to the current station and advances to the next one.
    ///
    /// An empty buffer is a no-op and returns `Ok(None)`. After the last
    /// station the index wraps back to the first.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::ValueOutOfRange`] when the buffer or the new
    /// total does not fit in a `u64`. The session is left untouched in that case.
    pub fn commit(&mut self) -> SessionResult<Option<CommitReceipt>> {
        if self.phase != Phase::Counting {
            return Err(SessionError::InvalidTransition(
                "values can only be committed while counting",
            ));
        }
        if self.pending_input.is_empty() {
            return Ok(None);
        }

        let added: u64 = self
            .pending_input
            .parse()
            .map_err(|_| SessionError::ValueOutOfRange(self.pending_input.clone()))?;

        let station_index = self.current_station_index;
        let station = &mut self.stations[station_index];
        let total = station.count.checked_add(added).ok_or_else(|| {
            SessionError::ValueOutOfRange(format!("{} + {}", station.count, added))
        })?;
        station.count = total;

        self.pending_input.clear();
        self.current_station_index = (station_index + 1) % self.stations.len();

        debug!(station = station_index, added, total, "committed count");
        Ok(Some(CommitReceipt {
            station_index,
            added,
            total,
        }))
    }

    /// Discards everything and returns to setup with no stations.
    pub fn reset_all(&mut self) {
        *self = Self::with_max_stations(self.max_stations);
        info!("session reset");
    }
}
