//! Core library for JGE, the JSON Grid Editor.
//! Provides an order-preserving JSON document model addressed by dotted
//! paths, table and tree projections of any location in it, a CSV
//! import/export bridge, and the egui shell that ties them together.

mod coerce;
mod config;
mod csv_bridge;
mod diff;
mod document;
mod gui;
mod history;
mod path;
pub mod statics;
mod table;
mod template;
mod tree;
mod urlcodec;
mod value;
mod workspace;

pub use coerce::{coerce, coerce_csv_cell};
pub use config::AppConfig;
pub use csv_bridge::{CsvError, csv_to_json, json_to_csv};
pub use diff::{DiffLine, DiffLineKind, DiffReport, line_diff};
pub use document::{Document, DocumentError, LoadOutcome, RenameOutcome, SetOutcome};
pub use gui::run_gui;
pub use history::{HISTORY_CAP, HistoryStack, NavDirection};
pub use path::{JsonPath, Step};
pub use table::{Cell, TableKind, TableModel};
pub use template::{ImportSummary, Template, TemplateError, TemplateKind, TemplateStore};
pub use tree::TreeRow;
pub use urlcodec::{UrlDecodeError, decode_component, encode_component};
pub use value::{JsonNumber, JsonValue};
pub use workspace::{CellEdit, CsvLoadOutcome, Workspace};
