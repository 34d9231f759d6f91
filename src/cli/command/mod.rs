pub mod map;
pub mod province;
pub mod summary;

pub use map::map;
pub use province::province;
pub use summary::summary;

use tabled::{settings::Style, Table, Tabled};

/// Formats a possibly-missing value in mm for a table cell.
pub fn format_mm(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.1}"),
        None => "-".to_string(),
    }
}

/// Prints rows as a markdown table, or a placeholder when empty.
pub fn print_table<T: Tabled>(rows: Vec<T>) {
    if rows.is_empty() {
        println!("(no rows)\n");
        return;
    }
    println!("{}\n", Table::new(rows).with(Style::markdown()));
}

// -- Tests -------------------------------------------------------------------
