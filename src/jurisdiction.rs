use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use log::{debug, info};
use serde::Serialize;
use snafu::{ensure, OptionExt};

use crate::config::*;
use crate::election::Election;

/// The election history of a jurisdiction.
///
/// Elections are keyed by their date and always visited in chronological order.
///
/// ```
/// use election_history::{Jurisdiction, ResultRow};
/// # use election_history::ElectionError;
///
/// let mut canada = Jurisdiction::new("Canada");
/// canada.record_results(2000, 2, 8, &[
///     ResultRow::new("r1", "ndp", 1),
///     ResultRow::new("r1", "lib", 2),
///     ResultRow::new("r2", "lib", 5),
///     ResultRow::new("r2", "green", 2),
/// ])?;
/// canada.record_results(2004, 5, 16, &[
///     ResultRow::new("r1", "ndp", 40),
///     ResultRow::new("r3", "lib", 10),
/// ])?;
///
/// assert_eq!(canada.party_wins("lib").len(), 2);
/// let history = canada.party_history("lib");
/// assert_eq!(history.values().copied().collect::<Vec<f64>>(), vec![0.7, 0.2]);
///
/// let changes = canada.riding_changes()?;
/// assert_eq!(changes.len(), 1);
/// assert!(changes[0].removed.contains("r2"));
/// assert!(changes[0].added.contains("r3"));
/// # Ok::<(), ElectionError>(())
/// ```
#[derive(Eq, PartialEq, Debug, Clone, Serialize)]
pub struct Jurisdiction {
    name: String,
    elections: BTreeMap<NaiveDate, Election>,
}

impl Jurisdiction {
    pub fn new(name: &str) -> Jurisdiction {
        Jurisdiction {
            name: name.to_string(),
            elections: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Records results for the election held on the given day.
    ///
    /// If results are already stored for this date, the new rows are added to them.
    pub fn record_results(
        &mut self,
        year: i32,
        month: u32,
        day: u32,
        rows: &[ResultRow],
    ) -> ElectionResult<()> {
        let date = NaiveDate::from_ymd_opt(year, month, day)
            .context(InvalidDateSnafu { year, month, day })?;
        self.record_results_on(date, rows);
        Ok(())
    }

    /// Same as [`Jurisdiction::record_results`], for an already validated date.
    pub fn record_results_on(&mut self, date: NaiveDate, rows: &[ResultRow]) {
        info!(
            "record_results: {}: recording {} rows for the election of {}",
            self.name,
            rows.len(),
            date
        );
        self.elections
            .entry(date)
            .or_insert_with(|| Election::new(date))
            .update_from_rows(rows);
    }

    /// Adds a complete election to the history.
    ///
    /// The election is stored under its own date. If an election is already
    /// stored for that date, the results are combined.
    pub fn add_election(&mut self, election: Election) {
        let date = election.date();
        match self.elections.get_mut(&date) {
            Some(existing) => {
                info!(
                    "add_election: {}: combining with the election already recorded on {}",
                    self.name, date
                );
                existing.merge(&election);
            }
            None => {
                self.elections.insert(date, election);
            }
        }
    }

    pub fn election(&self, date: NaiveDate) -> Option<&Election> {
        self.elections.get(&date)
    }

    /// The dates of all the recorded elections, in chronological order.
    pub fn election_dates(&self) -> Vec<NaiveDate> {
        self.elections.keys().copied().collect()
    }

    /// The dates on which `party` won the election, in chronological order.
    ///
    /// Being tied for the most seats counts as a win.
    pub fn party_wins(&self, party: &str) -> Vec<NaiveDate> {
        self.elections
            .iter()
            .filter(|(_, e)| e.election_winners().iter().any(|w| w == party))
            .map(|(d, _)| *d)
            .collect()
    }

    /// The share of the popular vote earned by `party` in each election.
    ///
    /// The share is 0.0 for an election without any vote, or without any vote
    /// for this party.
    pub fn party_history(&self, party: &str) -> BTreeMap<NaiveDate, f64> {
        let mut res: BTreeMap<NaiveDate, f64> = BTreeMap::new();
        for (date, e) in self.elections.iter() {
            let total = e.total_votes();
            let share = match e.popular_vote().get(party) {
                Some(votes) if total > 0 => *votes as f64 / total as f64,
                _ => 0.0,
            };
            debug!(
                "party_history: {}: {:?} earned {} of the vote on {}",
                self.name, party, share, date
            );
            res.insert(*date, share);
        }
        res
    }

    /// The ridings removed and added between each pair of consecutive elections.
    ///
    /// Returns an error if no election was recorded.
    pub fn riding_changes(&self) -> ElectionResult<Vec<RidingChange>> {
        ensure!(
            !self.elections.is_empty(),
            NoElectionsSnafu {
                name: self.name.as_str()
            }
        );
        let history: Vec<(&NaiveDate, &Election)> = self.elections.iter().collect();
        let changes = history
            .windows(2)
            .map(|pair| {
                let (from, before) = pair[0];
                let (to, after) = pair[1];
                let start: BTreeSet<String> = before.ridings_recorded().into_iter().collect();
                let end: BTreeSet<String> = after.ridings_recorded().into_iter().collect();
                RidingChange {
                    from: *from,
                    to: *to,
                    removed: start.difference(&end).cloned().collect(),
                    added: end.difference(&start).cloned().collect(),
                }
            })
            .collect();
        Ok(changes)
    }
}
