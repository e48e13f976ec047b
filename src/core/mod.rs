pub mod amount;
pub mod brackets;
pub mod draft;
pub mod engine;
pub mod filing;
pub mod import;
pub mod input;
pub mod links;
pub mod rates;
pub mod years;

// Flat public surface for domain types and functions.
#[allow(unused_imports)]
pub use amount::Amount;
pub use brackets::tiers_as_brackets;
pub use draft::{Draft, DraftStore, WizardStep};
pub use engine::{calculate_for_year, Settlement, TaxResult};
pub use filing::FilingStatus;
pub use import::import_prior_year;
pub use input::{FilerInput, InputField};
pub use links::DocumentLink;
pub use rates::{Bracket, RateTable};
pub use years::{RateTableSource, RateTables, DEFAULT_YEAR};
