pub mod droid;
pub mod scraper;
pub mod spreadsheet;

pub use droid::*;
pub use scraper::*;
pub use spreadsheet::*;
