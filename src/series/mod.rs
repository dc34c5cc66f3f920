//! Time-series data model and CSV loading

mod data;
mod coerce;
pub mod loader;

pub use data::{
    CashflowEntry, DateWindow, FeeAccrual, LabeledSeries, ReturnObservation, SeriesTable,
    ensure_strictly_ascending,
};
pub use coerce::{parse_cell, parse_date};
pub use loader::{
    load_index_table, load_index_table_from_reader, load_observations,
    load_observations_from_reader, INDEX_SERIES_LABELS,
};
