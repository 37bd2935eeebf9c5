/*!
Vote counts of parliamentary elections, by riding and by party, and the results
derived from them: riding winners, seats, popular vote and how a jurisdiction
changed from one election to the next.

Reading the raw results (spreadsheets, CSV exports) is left to the caller, who
hands over rows of [`ResultRow`]. See the [quick start](quick_start/index.html).
*/

mod config;
mod election;
mod jurisdiction;
pub mod quick_start;

pub use crate::config::*;
pub use crate::election::Election;
pub use crate::jurisdiction::Jurisdiction;
