/*!

# Quick start

This example records the results of two elections in a jurisdiction and looks at
how the parties did over time.

Results are recorded as rows: a riding, a party and the number of votes the
party received in that riding. Rows are usually produced by a reader of the
official results files. Quotes and whitespace must already be removed. Rows with
zero votes can be passed along: they are simply not recorded.

```
use election_history::{Jurisdiction, ResultRow};
# use election_history::ElectionError;

let mut country = Jurisdiction::new("Canada");
country.record_results(2015, 10, 19, &[
    ResultRow::new("Nunavut", "Liberal", 5619),
    ResultRow::new("Nunavut", "NDP-New Democratic Party", 3171),
    ResultRow::new("Nunavut", "Conservative", 2956),
    ResultRow::new("Labrador", "Liberal", 8878),
    ResultRow::new("Labrador", "Conservative", 1716),
    ResultRow::new("Labrador", "Marxist-Leninist", 0),
])?;
country.record_results(2019, 10, 21, &[
    ResultRow::new("Nunavut", "NDP-New Democratic Party", 3717),
    ResultRow::new("Nunavut", "Liberal", 3526),
    ResultRow::new("Labrador", "Liberal", 4851),
    ResultRow::new("Labrador", "Conservative", 4548),
])?;
# Ok::<(), ElectionError>(())
```

Recording more rows for a date that already has results adds to them. This is
how the results of several files for the same election are combined.

**Results of one election** Each election answers questions about its ridings:

```
# use election_history::{Jurisdiction, ResultRow};
# use election_history::ElectionError;
# use chrono::NaiveDate;
# let mut country = Jurisdiction::new("Canada");
# country.record_results(2015, 10, 19, &[
#     ResultRow::new("Nunavut", "Liberal", 5619),
#     ResultRow::new("Nunavut", "NDP-New Democratic Party", 3171),
#     ResultRow::new("Labrador", "Liberal", 8878),
#     ResultRow::new("Labrador", "Conservative", 1716),
# ])?;
let e = country
    .election(NaiveDate::from_ymd_opt(2015, 10, 19).unwrap())
    .unwrap();
assert_eq!(e.riding_winners("Nunavut")?, vec!["Liberal".to_string()]);
assert_eq!(e.party_seats()["Liberal"], 2);
assert_eq!(e.election_winners(), vec!["Liberal".to_string()]);
assert_eq!(e.results_for("Labrador", "NDP-New Democratic Party"), None);
# Ok::<(), ElectionError>(())
```

A riding where several parties are tied for the most votes does not give a
seat to anyone. All the parties tied for the most seats are winners of the
election.

**History** The jurisdiction compares its elections, in chronological order:

- `party_wins` lists the dates at which a party won (or tied for) the most seats.
- `party_history` gives the share of the popular vote of a party at each date.
- `riding_changes` lists, for each pair of consecutive elections, the ridings
  that disappeared and the ones that appeared.

All the output structures implement `serde::Serialize`, so they can be written
out in JSON or any other format supported by serde.

Logging goes through the `log` crate. Install a logger such as `env_logger` and
set `RUST_LOG=election_history=debug` to see the details of each recording,
including the rows that were dropped.

*/
