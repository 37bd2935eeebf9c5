use std::collections::HashMap;

use chrono::NaiveDate;
use log::debug;
use serde::Serialize;
use snafu::OptionExt;

use crate::config::*;

/// The vote counts of a single election, by riding and by party.
///
/// Invariants:
/// - a riding is in `ridings` iff it is a key of `results`
/// - a party is in `parties` iff it is a key of `results[r]` for some riding `r`
/// - every count stored in `results` is at least 1
///
/// ```
/// use chrono::NaiveDate;
/// use election_history::Election;
/// # use election_history::ElectionError;
///
/// let mut e = Election::new(NaiveDate::from_ymd_opt(2000, 2, 8).unwrap());
/// e.update_results("r1", "ndp", 1234);
/// e.update_results("r1", "lib", 1345);
/// e.update_results("r1", "pc", 1456);
/// assert_eq!(e.riding_winners("r1")?, vec!["pc".to_string()]);
///
/// e.update_results("r2", "pc", 1);
/// assert_eq!(e.results_for("r1", "lib"), Some(1345));
/// assert_eq!(e.popular_vote()["pc"], 1457);
/// assert_eq!(e.party_seats()["pc"], 2);
/// # Ok::<(), ElectionError>(())
/// ```
#[derive(Eq, PartialEq, Debug, Clone, Serialize)]
pub struct Election {
    date: NaiveDate,
    // First-seen order, no duplicates.
    ridings: Vec<String>,
    // First-seen order, no duplicates.
    parties: Vec<String>,
    results: HashMap<String, HashMap<String, u64>>,
}

impl Election {
    /// An election held on `date`, with nothing recorded yet.
    pub fn new(date: NaiveDate) -> Election {
        Election {
            date,
            ridings: Vec::new(),
            parties: Vec::new(),
            results: HashMap::new(),
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// The ridings in which votes have been recorded, in the order they were first seen.
    ///
    /// The returned vector is a copy: changing it does not change the election.
    pub fn ridings_recorded(&self) -> Vec<String> {
        self.ridings.clone()
    }

    /// The parties with at least one recorded vote, in the order they were first seen.
    pub fn parties_recorded(&self) -> Vec<String> {
        self.parties.clone()
    }

    /// Records that `party` received `votes` additional votes in `riding`.
    ///
    /// A row with zero votes is dropped: neither the riding nor the party
    /// gets recorded because of it.
    pub fn update_results(&mut self, riding: &str, party: &str, votes: u64) {
        if votes == 0 {
            debug!(
                "update_results: {}: dropping row with no votes for {:?} in {:?}",
                self.date, party, riding
            );
            return;
        }
        if !self.ridings.iter().any(|r| r == riding) {
            self.ridings.push(riding.to_string());
        }
        if !self.parties.iter().any(|p| p == party) {
            self.parties.push(party.to_string());
        }
        let count = self
            .results
            .entry(riding.to_string())
            .or_default()
            .entry(party.to_string())
            .or_insert(0);
        *count += votes;
    }

    /// Records all the rows, in order.
    pub fn update_from_rows(&mut self, rows: &[ResultRow]) {
        for row in rows.iter() {
            self.update_results(row.riding.as_str(), row.party.as_str(), row.votes);
        }
    }

    /// Adds all the counts of `other` to this election.
    ///
    /// The parties and ridings not seen so far are appended in the order in
    /// which `other` first saw them.
    pub fn merge(&mut self, other: &Election) {
        debug!(
            "merge: {}: merging {} ridings recorded on {}",
            self.date,
            other.ridings.len(),
            other.date
        );
        for party in other.parties.iter() {
            if !self.parties.contains(party) {
                self.parties.push(party.clone());
            }
        }
        for riding in other.ridings.iter() {
            if !self.ridings.contains(riding) {
                self.ridings.push(riding.clone());
            }
            if let Some(tally) = other.results.get(riding) {
                let own = self.results.entry(riding.clone()).or_default();
                for (party, votes) in tally.iter() {
                    *own.entry(party.clone()).or_insert(0) += *votes;
                }
            }
        }
    }

    /// The number of votes received by `party` in `riding`.
    ///
    /// Returns `None` if nothing was recorded for this riding, or for this
    /// party in this riding.
    pub fn results_for(&self, riding: &str, party: &str) -> Option<u64> {
        self.results.get(riding)?.get(party).copied()
    }

    /// The parties that received the most votes in `riding`.
    ///
    /// There is more than one party in case of a tie. The parties are listed in
    /// the order they were first recorded in this election.
    pub fn riding_winners(&self, riding: &str) -> ElectionResult<Vec<String>> {
        let tally = self.results.get(riding).context(UnknownRidingSnafu {
            riding,
            date: self.date,
        })?;
        Ok(self.tally_leaders(tally))
    }

    /// For each recorded party, the total number of votes across all ridings.
    pub fn popular_vote(&self) -> HashMap<String, u64> {
        let mut res: HashMap<String, u64> =
            self.parties.iter().map(|p| (p.clone(), 0)).collect();
        for tally in self.results.values() {
            for (party, votes) in tally.iter() {
                *res.entry(party.clone()).or_insert(0) += *votes;
            }
        }
        res
    }

    /// The total number of votes recorded in this election.
    pub fn total_votes(&self) -> u64 {
        self.results
            .values()
            .flat_map(|tally| tally.values())
            .sum()
    }

    /// For each recorded party, the number of ridings it won.
    ///
    /// A riding with a tie does not count as a seat for any of the tied parties.
    pub fn party_seats(&self) -> HashMap<String, u32> {
        let mut seats: HashMap<String, u32> =
            self.parties.iter().map(|p| (p.clone(), 0)).collect();
        for riding in self.ridings.iter() {
            let tally = match self.results.get(riding) {
                Some(t) => t,
                None => continue,
            };
            match self.tally_leaders(tally).as_slice() {
                [winner] => {
                    *seats.entry(winner.clone()).or_insert(0) += 1;
                }
                tied => {
                    debug!(
                        "party_seats: {}: tie in {:?} between {:?}, no seat awarded",
                        self.date, riding, tied
                    );
                }
            }
        }
        seats
    }

    /// The parties that won the most seats.
    ///
    /// Empty if no vote was recorded. All the parties with the most seats are
    /// returned, including when that number is zero.
    pub fn election_winners(&self) -> Vec<String> {
        let seats = self.party_seats();
        leaders(
            self.parties
                .iter()
                .map(|p| (p, u64::from(seats.get(p).copied().unwrap_or(0)))),
        )
    }

    pub fn summary(&self) -> ElectionSummary {
        let popular_vote = self.popular_vote();
        let seats = self.party_seats();
        ElectionSummary {
            date: self.date,
            ridings: self.ridings_recorded(),
            popular_vote: self
                .parties
                .iter()
                .map(|p| (p.clone(), popular_vote.get(p).copied().unwrap_or(0)))
                .collect(),
            seats: self
                .parties
                .iter()
                .map(|p| (p.clone(), seats.get(p).copied().unwrap_or(0)))
                .collect(),
            winners: self.election_winners(),
        }
    }

    // The leaders of one riding, in party order.
    fn tally_leaders(&self, tally: &HashMap<String, u64>) -> Vec<String> {
        leaders(
            self.parties
                .iter()
                .filter_map(|p| tally.get(p).map(|votes| (p, *votes))),
        )
    }
}

/// The names with the largest count.
///
/// A strictly larger count replaces the current leaders, an equal count joins them.
fn leaders<'a, I>(counts: I) -> Vec<String>
where
    I: IntoIterator<Item = (&'a String, u64)>,
{
    let mut best: Option<u64> = None;
    let mut res: Vec<String> = Vec::new();
    for (name, count) in counts {
        match best {
            Some(b) if count < b => {}
            Some(b) if count == b => res.push(name.clone()),
            _ => {
                best = Some(count);
                res = vec![name.clone()];
            }
        }
    }
    res
}

#[cfg(test)]
mod tests {
    use super::*;

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn test_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2000, 3, 25).unwrap()
    }

    fn names(l: &[&str]) -> Vec<String> {
        l.iter().map(|s| s.to_string()).collect()
    }

    fn sorted(mut l: Vec<String>) -> Vec<String> {
        l.sort();
        l
    }

    #[test]
    fn new_election_is_empty() {
        let e = Election::new(test_date());
        assert_eq!(e.date(), test_date());
        assert!(e.ridings_recorded().is_empty());
        assert!(e.parties_recorded().is_empty());
        assert!(e.results.is_empty());
        assert!(e.popular_vote().is_empty());
        assert!(e.party_seats().is_empty());
        assert!(e.election_winners().is_empty());
        assert_eq!(e.total_votes(), 0);
    }

    #[test]
    fn ridings_recorded_is_a_copy() {
        let mut e = Election::new(test_date());
        e.update_results("r1", "ndp", 5);
        let mut first = e.ridings_recorded();
        let second = e.ridings_recorded();
        assert_eq!(first, second);
        first.push("r2".to_string());
        assert_eq!(second, names(&["r1"]));
        assert_eq!(e.ridings_recorded(), names(&["r1"]));
    }

    #[test]
    fn update_results_accumulates() {
        init_logger();
        let mut e = Election::new(test_date());
        e.update_results("r1", "ndp", 10);
        assert_eq!(e.results_for("r1", "ndp"), Some(10));
        e.update_results("r1", "ndp", 11);
        assert_eq!(e.ridings_recorded(), names(&["r1"]));
        assert_eq!(e.parties_recorded(), names(&["ndp"]));
        assert_eq!(e.results_for("r1", "ndp"), Some(21));
        e.update_results("r2", "pc", 100);
        assert_eq!(e.ridings_recorded(), names(&["r1", "r2"]));
        assert_eq!(e.parties_recorded(), names(&["ndp", "pc"]));
        assert_eq!(e.results_for("r2", "pc"), Some(100));
        assert_eq!(e.results_for("r2", "ndp"), None);
    }

    #[test]
    fn insertion_order_does_not_depend_on_counts() {
        let mut e = Election::new(test_date());
        e.update_results("r1", "ndp", 1);
        e.update_results("r2", "pc", 1000);
        assert_eq!(e.ridings_recorded(), names(&["r1", "r2"]));
        assert_eq!(e.parties_recorded(), names(&["ndp", "pc"]));
    }

    #[test]
    fn zero_votes_are_not_recorded() {
        init_logger();
        let mut e = Election::new(test_date());
        e.update_results("r1", "ndp", 0);
        assert!(e.ridings_recorded().is_empty());
        assert!(e.parties_recorded().is_empty());
        assert_eq!(e.results_for("r1", "ndp"), None);

        e.update_results("r1", "ndp", 3);
        e.update_results("r1", "pc", 0);
        assert_eq!(e.parties_recorded(), names(&["ndp"]));
        assert_eq!(e.results_for("r1", "pc"), None);
    }

    #[test]
    fn update_from_rows_skips_empty_rows() {
        let mut e = Election::new(test_date());
        e.update_from_rows(&[
            ResultRow::new("Brampton Centre", "Green Party", 4),
            ResultRow::new("Brampton Centre", "Marxist-Leninist", 0),
            ResultRow::new("Brampton Centre", "Conservative", 90),
            ResultRow::new("Brampton Centre", "NDP-New Democratic Party", 34),
        ]);
        assert_eq!(e.ridings_recorded(), names(&["Brampton Centre"]));
        assert_eq!(
            e.parties_recorded(),
            names(&["Green Party", "Conservative", "NDP-New Democratic Party"])
        );
        assert_eq!(e.results_for("Brampton Centre", "Marxist-Leninist"), None);
    }

    #[test]
    fn results_for_unknown() {
        let mut e = Election::new(test_date());
        e.update_results("r1", "ndp", 1);
        assert_eq!(e.results_for("r2", "ndp"), None);
        assert_eq!(e.results_for("r1", "lib"), None);
    }

    #[test]
    fn riding_winners_single() -> ElectionResult<()> {
        let mut e = Election::new(test_date());
        e.update_results("r1", "ndp", 1);
        e.update_results("r1", "lib", 2);
        e.update_results("r1", "pc", 3);
        assert_eq!(e.riding_winners("r1")?, names(&["pc"]));
        Ok(())
    }

    #[test]
    fn riding_winners_tie() -> ElectionResult<()> {
        let mut e = Election::new(test_date());
        e.update_results("r1", "ndp", 100);
        e.update_results("r1", "pc", 200);
        e.update_results("r1", "ndp", 100);
        assert_eq!(sorted(e.riding_winners("r1")?), names(&["ndp", "pc"]));
        Ok(())
    }

    #[test]
    fn riding_winners_unknown_riding() {
        let mut e = Election::new(test_date());
        e.update_results("r1", "ndp", 1);
        assert_eq!(
            e.riding_winners("r2"),
            Err(ElectionError::UnknownRiding {
                riding: "r2".to_string(),
                date: test_date(),
            })
        );
    }

    #[test]
    fn end_to_end_single_riding() -> ElectionResult<()> {
        let mut e = Election::new(test_date());
        e.update_results("r1", "Green Party", 4);
        e.update_results("r1", "Conservative", 90);
        e.update_results("r1", "NDP", 34);
        let expected: HashMap<String, u64> = [
            ("Green Party".to_string(), 4),
            ("Conservative".to_string(), 90),
            ("NDP".to_string(), 34),
        ]
        .into_iter()
        .collect();
        assert_eq!(e.popular_vote(), expected);
        assert_eq!(e.riding_winners("r1")?, names(&["Conservative"]));
        Ok(())
    }

    #[test]
    fn popular_vote_across_ridings() {
        let mut e = Election::new(test_date());
        e.update_results("r1", "ndp", 1);
        e.update_results("r1", "lib", 2);
        e.update_results("r1", "pc", 3);
        e.update_results("r2", "pc", 4);
        e.update_results("r2", "lib", 5);
        e.update_results("r2", "green", 6);
        e.update_results("r2", "ndp", 7);
        let pv = e.popular_vote();
        assert_eq!(pv.len(), 4);
        assert_eq!(pv["ndp"], 8);
        assert_eq!(pv["lib"], 7);
        assert_eq!(pv["pc"], 7);
        assert_eq!(pv["green"], 6);
        assert_eq!(e.total_votes(), 28);
    }

    #[test]
    fn party_seats_with_tied_riding() {
        let mut e = Election::new(test_date());
        e.update_results("r1", "ndp", 1);
        e.update_results("r1", "lib", 1);
        e.update_results("r1", "pc", 1);
        e.update_results("r1", "green", 1);
        let seats = e.party_seats();
        assert_eq!(seats.len(), 4);
        assert!(seats.values().all(|s| *s == 0));
        // Everyone ties at zero seats.
        assert_eq!(e.election_winners(), names(&["ndp", "lib", "pc", "green"]));

        e.update_results("r2", "ndp", 5);
        e.update_results("r2", "lib", 1);
        e.update_results("r2", "lib", 2);
        e.update_results("r2", "pc", 3);
        e.update_results("r2", "green", 4);
        let seats = e.party_seats();
        assert_eq!(seats["ndp"], 1);
        assert_eq!(seats["lib"], 0);
        assert_eq!(seats["pc"], 0);
        assert_eq!(seats["green"], 0);
    }

    fn four_ridings(r1_ndp: u64) -> Election {
        let mut e = Election::new(test_date());
        e.update_results("r1", "ndp", r1_ndp);
        e.update_results("r1", "lib", 1);
        e.update_results("r1", "pc", 1);
        e.update_results("r1", "green", 1);
        e.update_results("r2", "ndp", 2);
        e.update_results("r2", "ndp", 3);
        e.update_results("r2", "lib", 4);
        e.update_results("r2", "pc", 4);
        e.update_results("r2", "green", 4);
        e.update_results("r3", "ndp", 4);
        e.update_results("r3", "lib", 5);
        e.update_results("r3", "pc", 4);
        e.update_results("r3", "green", 4);
        e.update_results("r4", "ndp", 4);
        e.update_results("r4", "lib", 4);
        e.update_results("r4", "pc", 5);
        e.update_results("r4", "green", 4);
        e
    }

    #[test]
    fn election_winners_tie_on_seats() {
        let e = four_ridings(1);
        assert_eq!(e.election_winners(), names(&["ndp", "lib", "pc"]));
    }

    #[test]
    fn election_winners_single() {
        let e = four_ridings(2);
        assert_eq!(e.party_seats()["ndp"], 2);
        assert_eq!(e.election_winners(), names(&["ndp"]));
    }

    #[test]
    fn merge_adds_counts() {
        let mut e1 = Election::new(test_date());
        e1.update_results("r1", "ndp", 1);
        e1.update_results("r1", "lib", 2);
        let mut e2 = Election::new(test_date());
        e2.update_results("r2", "green", 3);
        e2.update_results("r1", "lib", 5);
        e2.update_results("r1", "pc", 7);
        e1.merge(&e2);
        assert_eq!(e1.ridings_recorded(), names(&["r1", "r2"]));
        assert_eq!(e1.parties_recorded(), names(&["ndp", "lib", "green", "pc"]));
        assert_eq!(e1.results_for("r1", "lib"), Some(7));
        assert_eq!(e1.results_for("r1", "pc"), Some(7));
        assert_eq!(e1.results_for("r2", "green"), Some(3));
        assert_eq!(e1.total_votes(), 18);
    }

    #[test]
    fn summary_follows_party_order() {
        let mut e = Election::new(test_date());
        e.update_results("r1", "ndp", 1);
        e.update_results("r1", "lib", 2);
        e.update_results("r2", "ndp", 4);
        let s = e.summary();
        assert_eq!(s.date, test_date());
        assert_eq!(s.ridings, names(&["r1", "r2"]));
        assert_eq!(
            s.popular_vote,
            vec![("ndp".to_string(), 5), ("lib".to_string(), 2)]
        );
        assert_eq!(s.seats, vec![("ndp".to_string(), 1), ("lib".to_string(), 1)]);
        assert_eq!(s.winners, names(&["ndp", "lib"]));

        let js = serde_json::to_value(&s).unwrap();
        assert_eq!(js["date"], "2000-03-25");
        assert_eq!(js["popular_vote"][0][0], "ndp");
        assert_eq!(js["popular_vote"][0][1], 5);
        assert_eq!(js["winners"][1], "lib");
    }
}
