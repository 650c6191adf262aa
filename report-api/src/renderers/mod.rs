//! Terminal renderings of backend responses.
//!
//! Everything here returns a `String`; printing is left to the caller so the
//! output can be asserted on in tests.

pub mod charts;
pub mod table;
pub mod views;

pub use charts::{bar_chart, pie_shares, render_shares, Share};
pub use table::{cells, TableBuilder, TableStyle};
pub use views::{
    bulk_results_table, diff_table, groups_table, load_test_data_tables, mappings_table,
    process_all_tables, reports_table, summary_table,
};
