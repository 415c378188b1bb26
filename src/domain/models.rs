use serde::{Deserialize, Serialize};

/// A named counting target with an accumulating tally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Station {
    /// Position in the station list, assigned when the list is created
    pub id: usize,
    /// Label entered during setup, stored verbatim
    pub name: String,
    /// Running total, only ever increased
    pub count: u64,
}

impl Station {
    pub fn new(id: usize) -> Self {
        Self {
            id,
            name: String::new(),
            count: 0,
        }
    }

    /// Whether the name has visible content once surrounding whitespace is ignored.
    pub fn has_name(&self) -> bool {
        !self.name.trim().is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Setup,
    Counting,
}

/// Sub-step of the setup phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupStage {
    CountEntry,
    NameEntry,
}

/// Result of a successful commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommitReceipt {
    pub station_index: usize,
    pub added: u64,
    pub total: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub stations: usize,
    /// Sum of all counts, `None` when it does not fit in a `u64`
    pub total: Option<u64>,
}

impl Default for Summary {
    fn default() -> Self {
        Self {
            stations: 0,
            total: Some(0),
        }
    }
}

impl Summary {
    pub fn from_stations(stations: &[Station]) -> Self {
        Self {
            stations: stations.len(),
            total: stations
                .iter()
                .try_fold(0u64, |acc, s| acc.checked_add(s.count)),
        }
    }

    /// The total as displayed and exported.
    pub fn total_label(&self) -> String {
        match self.total {
            Some(total) => total.to_string(),
            None => "overflow".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_station_is_blank() {
        let station = Station::new(3);
        assert_eq!(station.id, 3);
        assert!(station.name.is_empty());
        assert_eq!(station.count, 0);
        assert!(!station.has_name());
    }

    #[test]
    fn test_whitespace_name_is_not_a_name() {
        let mut station = Station::new(0);
        station.name = "  \t ".to_string();
        assert!(!station.has_name());

        station.name = " Main St ".to_string();
        assert!(station.has_name());
    }

    #[test]
    fn test_summary_totals() {
        let mut a = Station::new(0);
        a.count = 12;
        let mut b = Station::new(1);
        b.count = 30;

        let summary = Summary::from_stations(&[a, b]);
        assert_eq!(summary.stations, 2);
        assert_eq!(summary.total, Some(42));
        assert_eq!(summary.total_label(), "42");
        assert_eq!(Summary::from_stations(&[]), Summary::default());
    }

    #[test]
    fn test_summary_total_overflow_is_reported() {
        let mut a = Station::new(0);
        a.count = u64::MAX;
        let mut b = Station::new(1);
        b.count = 1;

        let summary = Summary::from_stations(&[a, b]);
        assert_eq!(summary.stations, 2);
        assert_eq!(summary.total, None);
        assert_eq!(summary.total_label(), "overflow");
    }
}
