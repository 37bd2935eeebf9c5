// ********* Input data structures ***********

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::Serialize;
use snafu::Snafu;

/// One line of results, as handed over by the reader of the raw results.
///
/// The reader is responsible for mapping its columns to these fields and for
/// stripping quotes and whitespace. Rows with zero votes may be passed: they
/// are not recorded.
#[derive(Eq, PartialEq, Debug, Clone, Hash, Serialize)]
pub struct ResultRow {
    pub riding: String,
    pub party: String,
    pub votes: u64,
}

impl ResultRow {
    pub fn new(riding: &str, party: &str, votes: u64) -> ResultRow {
        ResultRow {
            riding: riding.to_string(),
            party: party.to_string(),
            votes,
        }
    }
}

// ******** Output data structures *********

/// The ridings that changed between two consecutive elections.
#[derive(Eq, PartialEq, Debug, Clone, Serialize)]
pub struct RidingChange {
    pub from: NaiveDate,
    pub to: NaiveDate,
    /// Recorded in the election at `from` but not in the election at `to`.
    pub removed: BTreeSet<String>,
    /// Recorded in the election at `to` but not in the election at `from`.
    pub added: BTreeSet<String>,
}

/// Derived results for one election.
///
/// The per-party lists follow the order in which the parties were first
/// recorded.
#[derive(Eq, PartialEq, Debug, Clone, Serialize)]
pub struct ElectionSummary {
    pub date: NaiveDate,
    pub ridings: Vec<String>,
    pub popular_vote: Vec<(String, u64)>,
    pub seats: Vec<(String, u32)>,
    pub winners: Vec<String>,
}

/// Errors returned when a query does not make sense for the recorded data.
#[derive(Eq, PartialEq, Debug, Clone, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ElectionError {
    #[snafu(display("No votes recorded in riding {riding:?} for the election of {date}"))]
    UnknownRiding { riding: String, date: NaiveDate },

    #[snafu(display("No election recorded for jurisdiction {name:?}"))]
    NoElections { name: String },

    #[snafu(display("Not a valid election date: {year}-{month}-{day}"))]
    InvalidDate { year: i32, month: u32, day: u32 },
}

pub type ElectionResult<T> = Result<T, ElectionError>;
