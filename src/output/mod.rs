//! Output formatting for CLI results

use serde::Serialize;
use tabled::Tabled;

use crate::cli::OutputFormat;
use crate::error::Result;

pub mod format;
pub mod json;
pub mod rows;
pub mod table;

/// Print a list either as a table of `R` rows or as JSON of the raw items.
pub fn print_list<T, R>(items: &[T], format: OutputFormat) -> Result<()>
where
    T: Serialize,
    R: Tabled + for<'a> From<&'a T>,
{
    match format {
        OutputFormat::Table => {
            let rows: Vec<R> = items.iter().map(R::from).collect();
            println!("{}", table::format_table(&rows));
        }
        OutputFormat::Json => println!("{}", json::format_json(items)?),
    }
    Ok(())
}
