//! The egui shell: one window, a tree panel on the left, the focused
//! table in the center, and a row of tool windows. All document state
//! lives in [`Workspace`]; this module only stages input and reports
//! outcomes.

use crate::config::AppConfig;
use crate::diff::{DiffLineKind, DiffReport};
use crate::document::{DocumentError, LoadOutcome, RenameOutcome};
use crate::history::NavDirection;
use crate::path::JsonPath;
use crate::statics;
use crate::table::{Cell, TableKind, TableModel};
use crate::template::TemplateStore;
use crate::urlcodec;
use crate::value::JsonValue;
use crate::workspace::{CellEdit, Workspace};
use eframe::egui;
use egui_extras::{Column, TableBuilder};
use std::path::{Path, PathBuf};

pub fn run_gui() -> eframe::Result {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1280.0, 900.0]),
        ..Default::default()
    };
    let title = format!("{} {}", statics::EN_APP_TITLE, env!("CARGO_PKG_VERSION"));
    eframe::run_native(
        &title,
        options,
        Box::new(|cc| {
            let app = JgeApp::with_config(AppConfig::load());
            if !app.config.dark_theme {
                cc.egui_ctx.set_visuals(egui::Visuals::light());
            }
            Ok(Box::new(app))
        }),
    )
}

/// The main application state and GUI logic. Holds the [`Workspace`]
/// (owned), UI state (selection, open windows), and editor buffers.
#[derive(Default)]
struct JgeApp {
    ws: Workspace,
    config: AppConfig,
    dialog_dir: Option<PathBuf>,
    status: String,
    last_error: Option<String>,

    // Grid selection and the staged text for the selected cell.
    selected_cell: Option<(usize, usize)>,
    edit_buffer: String,

    // Paste JSON window.
    paste_open: bool,
    paste_buffer: String,

    // Diff window; the report is computed when the window is opened.
    diff_open: bool,
    diff_report: Option<DiffReport>,

    // Template library window.
    templates_open: bool,
    template_name_input: String,

    // URL encode/decode tool.
    url_open: bool,
    url_input: String,
    url_output: String,
    url_error: Option<String>,

    about_open: bool,

    // Small structural-edit dialogs.
    rename_key_open: bool,
    rename_key_row: usize,
    rename_key_input: String,
    rename_column_open: bool,
    rename_column_index: usize,
    rename_column_input: String,
    add_column_open: bool,
    add_column_input: String,
    add_key_open: bool,
    add_key_input: String,
    add_key_template: Option<String>,
}

impl JgeApp {
    fn with_config(config: AppConfig) -> Self {
        let mut app = JgeApp {
            dialog_dir: config.last_dir.clone(),
            config,
            ..Default::default()
        };
        match app.ws.templates.load_file(&TemplateStore::default_path()) {
            Ok(summary) => tracing::debug!("loaded {} saved template(s)", summary.imported),
            Err(e) => tracing::debug!("no saved templates: {e:#}"),
        }
        app
    }

    /// "Added X" when the write created a key, "Changed X a -> b" when
    /// the value switched type, "Updated X" otherwise.
    fn describe_edit(edit: &CellEdit) -> String {
        let target = edit.path.label();
        match &edit.outcome.old {
            None => format!("Added '{target}'"),
            Some(old) if old.type_name() != edit.outcome.new.type_name() => format!(
                "Changed '{target}' {} -> {}",
                old.type_name(),
                edit.outcome.new.type_name()
            ),
            Some(_) => format!("Updated '{target}'"),
        }
    }

    /// The text staged into the edit box for a cell. Strings come from
    /// the document in full; the cell text itself may be a truncated
    /// preview.
    fn staged_text_for(&self, cell: &Cell) -> String {
        let Some(path) = cell.path.as_ref() else {
            return String::new();
        };
        match self.ws.value_at(path) {
            Some(JsonValue::String(s)) => s.clone(),
            Some(value) => value.preview(),
            None => String::new(),
        }
    }

    fn persist_config(&self) {
        if let Err(e) = self.config.save() {
            tracing::warn!("could not persist config: {e:#}");
        }
    }

    fn persist_templates(&self) {
        if let Err(e) = self.ws.templates.save_file(&TemplateStore::default_path()) {
            tracing::warn!("could not persist templates: {e:#}");
        }
    }

    fn json_dialog(&self) -> rfd::FileDialog {
        let mut dialog = rfd::FileDialog::new().add_filter("JSON", &["json"]);
        if let Some(dir) = &self.dialog_dir {
            dialog = dialog.set_directory(dir);
        }
        dialog
    }

    fn csv_dialog(&self) -> rfd::FileDialog {
        let mut dialog = rfd::FileDialog::new().add_filter("CSV", &["csv"]);
        if let Some(dir) = &self.dialog_dir {
            dialog = dialog.set_directory(dir);
        }
        dialog
    }

    fn remember_dir(&mut self, path: &Path) {
        self.dialog_dir = path.parent().map(PathBuf::from);
        self.config.last_dir = self.dialog_dir.clone();
        self.persist_config();
    }

    fn after_document_change(&mut self) {
        self.selected_cell = None;
        self.edit_buffer.clear();
        self.diff_report = None;
    }

    /// Record a mutation outcome: status line on success, error bar on
    /// failure. Returns whether the operation went through.
    fn report_op(&mut self, result: Result<(), DocumentError>, ok_status: &str) -> bool {
        match result {
            Ok(()) => {
                self.status = ok_status.to_string();
                self.last_error = None;
                true
            }
            Err(e) => {
                self.last_error = Some(e.to_string());
                false
            }
        }
    }

    fn open_json(&mut self) {
        let Some(path) = self.json_dialog().pick_file() else {
            return;
        };
        match self.ws.load_json_path(&path) {
            Ok(outcome) => {
                self.remember_dir(&path);
                self.after_document_change();
                self.status = match outcome {
                    LoadOutcome::Loaded => format!("Loaded {}", path.display()),
                    LoadOutcome::Empty => format!("{} is empty; starting blank", path.display()),
                };
                self.last_error = None;
            }
            Err(e) => self.last_error = Some(format!("Failed to load: {e:#}")),
        }
    }

    fn save_json_as(&mut self) {
        let mut dialog = self.json_dialog();
        if let Some(source) = self.ws.source_path()
            && let Some(name) = source.file_name()
        {
            dialog = dialog.set_file_name(name.to_string_lossy());
        }
        let Some(path) = dialog.save_file() else {
            return;
        };
        match self.ws.save_json_path(&path) {
            Ok(()) => {
                self.remember_dir(&path);
                self.status = format!("Saved {}", path.display());
                self.last_error = None;
            }
            Err(e) => self.last_error = Some(format!("Failed to save: {e:#}")),
        }
    }

    fn import_csv(&mut self) {
        let Some(path) = self.csv_dialog().pick_file() else {
            return;
        };
        match self.ws.load_csv_path(&path) {
            Ok(outcome) => {
                self.remember_dir(&path);
                self.after_document_change();
                self.status = format!("Loaded {}", path.display());
                self.last_error = if outcome.discarded_rows > 0 {
                    Some(format!(
                        "{} loaded only the first CSV row; {} more row(s) were left out",
                        statics::EN_PREFIX_WARNING,
                        outcome.discarded_rows
                    ))
                } else {
                    None
                };
            }
            Err(e) => self.last_error = Some(format!("Failed to load: {e:#}")),
        }
    }

    fn export_csv(&mut self) {
        let Some(path) = self.csv_dialog().save_file() else {
            return;
        };
        match self.ws.export_csv_path(&path) {
            Ok(()) => {
                self.remember_dir(&path);
                self.status = format!("Exported {}", path.display());
                self.last_error = None;
            }
            Err(e) => self.last_error = Some(format!("Failed to export: {e:#}")),
        }
    }

    fn go(&mut self, direction: NavDirection) {
        match self.ws.navigate(direction) {
            Ok(Some(path)) => {
                self.status = format!("Viewing {}", path.label());
                self.selected_cell = None;
                self.edit_buffer.clear();
                self.last_error = None;
            }
            Ok(None) => {}
            Err(e) => self.last_error = Some(e.to_string()),
        }
    }

    fn drill_to(&mut self, path: JsonPath) {
        match self.ws.drill(path) {
            Ok(()) => {
                self.selected_cell = None;
                self.edit_buffer.clear();
                self.last_error = None;
            }
            Err(e) => self.last_error = Some(e.to_string()),
        }
    }

    fn apply_cell_edit(&mut self, row: usize, col: usize) {
        let raw = self.edit_buffer.clone();
        match self.ws.edit_cell(row, col, &raw) {
            Ok(edit) => {
                self.status = Self::describe_edit(&edit);
                // Re-stage the canonical form of what was stored.
                self.edit_buffer = match &edit.outcome.new {
                    JsonValue::String(s) => s.clone(),
                    value => value.preview(),
                };
                self.last_error = None;
            }
            Err(e) => self.last_error = Some(e.to_string()),
        }
    }

    fn tree_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::left("tree_panel")
            .resizable(true)
            .default_width(280.0)
            .show(ctx, |ui| {
                ui.heading(statics::EN_HEADING_DOCUMENT);
                ui.separator();
                let row_h = ui.text_style_height(&egui::TextStyle::Body) + 4.0;
                let rows = self.ws.tree_rows().to_vec();
                let focused = self.ws.table_path().clone();
                ui.push_id("tree_rows", |ui| {
                    egui::ScrollArea::vertical()
                        .auto_shrink([false, false])
                        .show(ui, |ui| {
                            for row in &rows {
                                ui.horizontal(|ui| {
                                    ui.add_space(row.depth as f32 * 14.0);
                                    if row.expandable {
                                        let glyph = if row.expanded {
                                            statics::EN_GLYPH_EXPANDED
                                        } else {
                                            statics::EN_GLYPH_COLLAPSED
                                        };
                                        if ui.small_button(glyph).clicked() {
                                            self.ws.toggle_expanded(&row.path);
                                        }
                                    } else {
                                        ui.add_space(18.0);
                                    }
                                    let text = format!("{}  {}", row.label, row.preview);
                                    let selected = row.path == focused;
                                    if selectable_row_left(ui, selected, &text, row_h).clicked() {
                                        self.drill_to(row.path.clone());
                                    }
                                });
                            }
                        });
                });
            });
    }

    fn table_toolbar(&mut self, ui: &mut egui::Ui, table: &TableModel) {
        let sel = self.selected_cell;
        match table.kind {
            TableKind::Rows | TableKind::IndexValue => {
                ui.horizontal(|ui| {
                    let add_label = if table.kind == TableKind::Rows {
                        statics::EN_BTN_ADD_ROW
                    } else {
                        statics::EN_BTN_ADD_ITEM
                    };
                    if ui.button(add_label).clicked() {
                        let result = self.ws.add_row();
                        self.report_op(result, "Added a row");
                    }
                    let row_sel = sel.map(|(r, _)| r).filter(|r| *r < table.rows.len());
                    if ui
                        .add_enabled(row_sel.is_some(), egui::Button::new(statics::EN_BTN_INSERT))
                        .clicked()
                        && let Some(row) = row_sel
                    {
                        let result = self.ws.insert_row(row);
                        self.report_op(result, "Inserted a row");
                    }
                    let can_up = row_sel.is_some_and(|r| r > 0);
                    if ui
                        .add_enabled(can_up, egui::Button::new(statics::EN_BTN_UP))
                        .clicked()
                        && let Some((row, col)) = sel
                    {
                        let result = self.ws.move_row(row, row - 1);
                        if self.report_op(result, "Moved the row up") {
                            self.selected_cell = Some((row - 1, col));
                        }
                    }
                    let can_down = row_sel.is_some_and(|r| r + 1 < table.rows.len());
                    if ui
                        .add_enabled(can_down, egui::Button::new(statics::EN_BTN_DOWN))
                        .clicked()
                        && let Some((row, col)) = sel
                    {
                        let result = self.ws.move_row(row, row + 1);
                        if self.report_op(result, "Moved the row down") {
                            self.selected_cell = Some((row + 1, col));
                        }
                    }
                    if ui
                        .add_enabled(row_sel.is_some(), egui::Button::new(statics::EN_BTN_DELETE))
                        .clicked()
                        && let Some(row) = row_sel
                    {
                        let result = self.ws.delete_row(row);
                        if self.report_op(result, "Deleted the row") {
                            self.selected_cell = None;
                            self.edit_buffer.clear();
                        }
                    }
                    if table.kind == TableKind::Rows {
                        ui.separator();
                        if ui.button(statics::EN_BTN_ADD_COLUMN).clicked() {
                            self.add_column_open = true;
                            self.add_column_input.clear();
                        }
                        let col_sel = sel.map(|(_, c)| c).filter(|c| *c < table.headers.len());
                        if ui
                            .add_enabled(
                                col_sel.is_some(),
                                egui::Button::new(statics::EN_BTN_RENAME_COLUMN),
                            )
                            .clicked()
                            && let Some(col) = col_sel
                        {
                            self.rename_column_open = true;
                            self.rename_column_index = col;
                            self.rename_column_input = table.headers[col].clone();
                        }
                        if ui
                            .add_enabled(
                                col_sel.is_some(),
                                egui::Button::new(statics::EN_BTN_DELETE_COLUMN),
                            )
                            .clicked()
                            && let Some(col) = col_sel
                        {
                            let result = self.ws.delete_column(col);
                            if self.report_op(result, "Deleted the column") {
                                self.selected_cell = None;
                                self.edit_buffer.clear();
                            }
                        }
                    }
                });
                ui.separator();
            }
            TableKind::KeyValue => {
                ui.horizontal(|ui| {
                    if ui.button(statics::EN_BTN_ADD_KEY).clicked() {
                        self.add_key_open = true;
                        self.add_key_input.clear();
                        self.add_key_template = None;
                    }
                    let row_sel = sel.map(|(r, _)| r).filter(|r| *r < table.rows.len());
                    if ui
                        .add_enabled(
                            row_sel.is_some(),
                            egui::Button::new(statics::EN_BTN_RENAME_KEY),
                        )
                        .clicked()
                        && let Some(row) = row_sel
                    {
                        self.rename_key_open = true;
                        self.rename_key_row = row;
                        self.rename_key_input = table
                            .cell(row, 0)
                            .map(|cell| cell.text.clone())
                            .unwrap_or_default();
                    }
                    if ui
                        .add_enabled(
                            row_sel.is_some(),
                            egui::Button::new(statics::EN_BTN_DELETE_KEY),
                        )
                        .clicked()
                        && let Some(row) = row_sel
                    {
                        let result = self.ws.delete_key(row);
                        if self.report_op(result, "Deleted the key") {
                            self.selected_cell = None;
                            self.edit_buffer.clear();
                        }
                    }
                });
                ui.separator();
            }
            TableKind::KeyedColumns | TableKind::Single => {}
        }
    }

    fn value_cell(&mut self, ui: &mut egui::Ui, row: usize, col: usize, cell: &Cell) {
        if let Some(target) = cell.drill.clone() {
            if ui.small_button(&cell.text).clicked() {
                self.drill_to(target);
            }
        } else if cell.editable {
            let selected = self.selected_cell == Some((row, col));
            if ui.selectable_label(selected, &cell.text).clicked() {
                self.selected_cell = Some((row, col));
                self.edit_buffer = self.staged_text_for(cell);
                self.last_error = None;
            }
        } else {
            ui.monospace(&cell.text);
        }
    }

    fn value_grid(&mut self, ui: &mut egui::Ui, table: &TableModel) {
        if table.headers.is_empty() {
            ui.label(statics::EN_LABEL_EMPTY_TABLE);
            return;
        }
        let row_h = ui.text_style_height(&egui::TextStyle::Body) + 6.0;
        let grid_h = (ui.available_height() - 110.0).max(140.0);
        ui.push_id("value_grid", |ui| {
            egui::ScrollArea::vertical()
                .max_height(grid_h)
                .auto_shrink([false, true])
                .show(ui, |ui| {
                    let mut builder = TableBuilder::new(ui)
                        .striped(true)
                        .cell_layout(egui::Layout::left_to_right(egui::Align::Center));
                    for _ in 0..table.headers.len().saturating_sub(1) {
                        builder = builder.column(Column::initial(160.0).resizable(true));
                    }
                    builder = builder.column(Column::remainder().resizable(true));
                    builder
                        .header(row_h, |mut header| {
                            for title in &table.headers {
                                header.col(|ui| {
                                    ui.strong(title);
                                });
                            }
                        })
                        .body(|mut body| {
                            for (r, cells) in table.rows.iter().enumerate() {
                                body.row(row_h, |mut row| {
                                    for (c, cell) in cells.iter().enumerate() {
                                        row.col(|ui| {
                                            self.value_cell(ui, r, c, cell);
                                        });
                                    }
                                });
                            }
                        });
                });
        });
        if table.rows.is_empty() {
            ui.label(statics::EN_LABEL_EMPTY_TABLE);
        }
    }

    fn edit_bar(&mut self, ui: &mut egui::Ui, table: &TableModel) {
        ui.heading(statics::EN_HEADING_EDIT);
        let Some((row, col)) = self.selected_cell else {
            ui.label(statics::EN_LABEL_SELECT_CELL);
            return;
        };
        let Some(cell) = table.cell(row, col) else {
            self.selected_cell = None;
            return;
        };
        let (Some(path), true) = (cell.path.clone(), cell.editable) else {
            self.selected_cell = None;
            return;
        };
        ui.horizontal(|ui| {
            ui.label(statics::EN_LABEL_PATH);
            ui.monospace(path.label());
        });
        ui.horizontal(|ui| {
            ui.label(statics::EN_LABEL_VALUE);
            let resp = ui.add(
                egui::TextEdit::singleline(&mut self.edit_buffer)
                    .font(egui::TextStyle::Monospace)
                    .desired_width((ui.available_width() - 180.0).max(120.0)),
            );
            let entered = resp.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
            if ui.button(statics::EN_BTN_APPLY).clicked() || entered {
                self.apply_cell_edit(row, col);
            }
            if ui.button(statics::EN_BTN_SET_NULL).clicked() {
                self.edit_buffer.clear();
                self.edit_buffer.push_str("null");
                self.apply_cell_edit(row, col);
            }
        });
    }

    fn show_paste_window(&mut self, ctx: &egui::Context) {
        if !self.paste_open {
            return;
        }
        let mut open = self.paste_open;
        let mut close_requested = false;
        egui::Window::new(statics::EN_WINDOW_PASTE_JSON)
            .collapsible(false)
            .open(&mut open)
            .show(ctx, |ui| {
                ui.add_sized(
                    [ui.available_width().max(480.0), 220.0],
                    egui::TextEdit::multiline(&mut self.paste_buffer)
                        .font(egui::TextStyle::Monospace)
                        .lock_focus(true),
                );
                ui.separator();
                ui.horizontal(|ui| {
                    if ui.button(statics::EN_BTN_LOAD).clicked() {
                        let text = self.paste_buffer.clone();
                        match self.ws.load_json_text(&text) {
                            Ok(outcome) => {
                                self.after_document_change();
                                self.status = match outcome {
                                    LoadOutcome::Loaded => "Loaded pasted JSON".to_string(),
                                    LoadOutcome::Empty => "Cleared the document".to_string(),
                                };
                                self.last_error = None;
                                self.paste_buffer.clear();
                                close_requested = true;
                            }
                            Err(e) => self.last_error = Some(e.to_string()),
                        }
                    }
                    if ui.button(statics::EN_BTN_CANCEL).clicked() {
                        close_requested = true;
                    }
                });
            });
        if close_requested {
            open = false;
        }
        self.paste_open = open;
    }

    fn show_diff_window(&mut self, ctx: &egui::Context) {
        if !self.diff_open {
            return;
        }
        let mut open = self.diff_open;
        egui::Window::new(statics::EN_WINDOW_DIFF)
            .collapsible(false)
            .open(&mut open)
            .show(ctx, |ui| match &self.diff_report {
                None => {
                    ui.label(statics::EN_DIFF_NONE);
                }
                Some(report) if !report.has_changes() => {
                    ui.label(statics::EN_DIFF_CLEAN);
                }
                Some(report) => {
                    ui.label(format!(
                        "{} line(s) added, {} removed",
                        report.added, report.removed
                    ));
                    ui.separator();
                    ui.push_id("diff_lines", |ui| {
                        egui::ScrollArea::vertical()
                            .max_height(380.0)
                            .show(ui, |ui| {
                                for line in &report.lines {
                                    let (prefix, color) = match line.kind {
                                        DiffLineKind::Added => (
                                            statics::EN_PREFIX_ADDED,
                                            egui::Color32::from_rgb(0, 160, 0),
                                        ),
                                        DiffLineKind::Removed => (
                                            statics::EN_PREFIX_REMOVED,
                                            egui::Color32::from_rgb(220, 0, 0),
                                        ),
                                        DiffLineKind::Same => {
                                            (statics::EN_PREFIX_COMMON, ui.visuals().text_color())
                                        }
                                    };
                                    ui.monospace(
                                        egui::RichText::new(format!("{prefix}{}", line.text))
                                            .color(color),
                                    );
                                }
                            });
                    });
                }
            });
        self.diff_open = open;
    }

    fn show_templates_window(&mut self, ctx: &egui::Context) {
        if !self.templates_open {
            return;
        }
        let mut open = self.templates_open;
        egui::Window::new(statics::EN_WINDOW_TEMPLATES)
            .collapsible(false)
            .open(&mut open)
            .show(ctx, |ui| {
                let row_h = ui.text_style_height(&egui::TextStyle::Body) + 6.0;
                let entries: Vec<(String, &'static str, bool)> = self
                    .ws
                    .templates
                    .iter()
                    .map(|t| (t.name.clone(), t.kind.as_str(), t.builtin))
                    .collect();
                let mut remove_requested: Option<String> = None;
                ui.push_id("template_list", |ui| {
                    TableBuilder::new(ui)
                        .striped(true)
                        .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
                        .column(Column::initial(220.0).resizable(true))
                        .column(Column::initial(70.0))
                        .column(Column::remainder())
                        .header(row_h, |mut header| {
                            header.col(|ui| {
                                ui.strong(statics::EN_COL_NAME);
                            });
                            header.col(|ui| {
                                ui.strong(statics::EN_COL_TYPE);
                            });
                            header.col(|_ui| {});
                        })
                        .body(|mut body| {
                            for (name, kind, builtin) in &entries {
                                body.row(row_h, |mut row| {
                                    row.col(|ui| {
                                        ui.label(name);
                                    });
                                    row.col(|ui| {
                                        ui.monospace(*kind);
                                    });
                                    row.col(|ui| {
                                        if *builtin {
                                            ui.label(statics::EN_BADGE_BUILTIN);
                                        } else if ui
                                            .small_button(statics::EN_BTN_DELETE)
                                            .clicked()
                                        {
                                            remove_requested = Some(name.clone());
                                        }
                                    });
                                });
                            }
                        });
                });
                if let Some(name) = remove_requested {
                    match self.ws.templates.remove(&name) {
                        Ok(()) => {
                            self.status = format!("Removed template '{name}'");
                            self.last_error = None;
                            self.persist_templates();
                        }
                        Err(e) => self.last_error = Some(e.to_string()),
                    }
                }
                ui.separator();
                ui.horizontal(|ui| {
                    ui.label(statics::EN_LABEL_NAME);
                    ui.add(
                        egui::TextEdit::singleline(&mut self.template_name_input)
                            .desired_width(180.0),
                    );
                    if ui
                        .add_enabled(
                            self.ws.has_document(),
                            egui::Button::new(statics::EN_BTN_SAVE_TEMPLATE),
                        )
                        .clicked()
                    {
                        let name = self.template_name_input.trim().to_string();
                        match self.ws.capture_template(&name) {
                            Ok(()) => {
                                self.status = format!("Saved template '{name}'");
                                self.template_name_input.clear();
                                self.last_error = None;
                                self.persist_templates();
                            }
                            Err(e) => self.last_error = Some(e.to_string()),
                        }
                    }
                });
                ui.separator();
                ui.horizontal(|ui| {
                    if ui.button(statics::EN_BTN_IMPORT_TEMPLATES).clicked() {
                        self.import_templates();
                    }
                    if ui.button(statics::EN_BTN_EXPORT_TEMPLATES).clicked() {
                        self.export_templates();
                    }
                });
            });
        self.templates_open = open;
    }

    fn import_templates(&mut self) {
        let Some(path) = self.json_dialog().pick_file() else {
            return;
        };
        match self.ws.templates.load_file(&path) {
            Ok(summary) => {
                self.remember_dir(&path);
                self.status = format!(
                    "Imported {} template(s), skipped {}",
                    summary.imported, summary.skipped
                );
                self.last_error = None;
                self.persist_templates();
            }
            Err(e) => self.last_error = Some(format!("Failed to import: {e:#}")),
        }
    }

    fn export_templates(&mut self) {
        let Some(path) = self
            .json_dialog()
            .set_file_name(statics::TEMPLATES_FILE_NAME)
            .save_file()
        else {
            return;
        };
        match self.ws.templates.save_file(&path) {
            Ok(()) => {
                self.remember_dir(&path);
                self.status = format!("Exported templates to {}", path.display());
                self.last_error = None;
            }
            Err(e) => self.last_error = Some(format!("Failed to export: {e:#}")),
        }
    }

    fn show_url_window(&mut self, ctx: &egui::Context) {
        if !self.url_open {
            return;
        }
        let mut open = self.url_open;
        egui::Window::new(statics::EN_WINDOW_URL_TOOL)
            .collapsible(false)
            .open(&mut open)
            .show(ctx, |ui| {
                ui.label(statics::EN_LABEL_INPUT);
                ui.add_sized(
                    [ui.available_width().max(420.0), 90.0],
                    egui::TextEdit::multiline(&mut self.url_input)
                        .font(egui::TextStyle::Monospace),
                );
                ui.horizontal(|ui| {
                    if ui.button(statics::EN_BTN_ENCODE).clicked() {
                        self.url_output = urlcodec::encode_component(&self.url_input);
                        self.url_error = None;
                    }
                    if ui.button(statics::EN_BTN_DECODE).clicked() {
                        match urlcodec::decode_component(&self.url_input) {
                            Ok(text) => {
                                self.url_output = text;
                                self.url_error = None;
                            }
                            Err(e) => self.url_error = Some(e.to_string()),
                        }
                    }
                    if ui.small_button(statics::EN_BTN_CLEAR).clicked() {
                        self.url_input.clear();
                        self.url_output.clear();
                        self.url_error = None;
                    }
                });
                if let Some(err) = &self.url_error {
                    ui.colored_label(egui::Color32::RED, err);
                }
                ui.separator();
                ui.label(statics::EN_LABEL_OUTPUT);
                let mut output = self.url_output.clone();
                ui.add_enabled(
                    false,
                    egui::TextEdit::multiline(&mut output)
                        .font(egui::TextStyle::Monospace)
                        .desired_rows(4),
                );
            });
        self.url_open = open;
    }

    fn show_about_window(&mut self, ctx: &egui::Context) {
        if !self.about_open {
            return;
        }
        let mut open = self.about_open;
        egui::Window::new(statics::EN_WINDOW_ABOUT)
            .collapsible(false)
            .resizable(false)
            .open(&mut open)
            .show(ctx, |ui| {
                ui.heading(statics::EN_ABOUT_HEADING);
                ui.label(format!(
                    "{} {}",
                    statics::EN_ABOUT_VERSION,
                    env!("CARGO_PKG_VERSION")
                ));
                ui.separator();
                ui.label(statics::EN_ABOUT_NAV_HINT);
            });
        self.about_open = open;
    }

    fn show_rename_key_window(&mut self, ctx: &egui::Context) {
        if !self.rename_key_open {
            return;
        }
        let mut open = self.rename_key_open;
        let mut close_requested = false;
        egui::Window::new(statics::EN_WINDOW_RENAME_KEY)
            .collapsible(false)
            .resizable(false)
            .open(&mut open)
            .show(ctx, |ui| {
                let mut apply = false;
                ui.horizontal(|ui| {
                    ui.label(statics::EN_LABEL_NAME);
                    let resp = ui.add(
                        egui::TextEdit::singleline(&mut self.rename_key_input)
                            .desired_width(220.0),
                    );
                    apply = resp.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                });
                ui.separator();
                ui.horizontal(|ui| {
                    if ui.button(statics::EN_BTN_APPLY).clicked() {
                        apply = true;
                    }
                    if ui.button(statics::EN_BTN_CANCEL).clicked() {
                        close_requested = true;
                    }
                });
                if apply {
                    let name = self.rename_key_input.trim().to_string();
                    if name.is_empty() {
                        self.last_error = Some(statics::EN_ERR_NAME_EMPTY.to_string());
                    } else {
                        match self.ws.rename_key(self.rename_key_row, &name) {
                            Ok(RenameOutcome::Renamed) => {
                                self.status = format!("Renamed key to '{name}'");
                                self.last_error = None;
                                self.selected_cell = None;
                                self.edit_buffer.clear();
                                close_requested = true;
                            }
                            Ok(RenameOutcome::Unchanged) => {
                                self.status = "No change.".to_string();
                                self.last_error = None;
                                close_requested = true;
                            }
                            Err(e) => self.last_error = Some(e.to_string()),
                        }
                    }
                }
            });
        if close_requested {
            open = false;
        }
        self.rename_key_open = open;
    }

    fn show_rename_column_window(&mut self, ctx: &egui::Context) {
        if !self.rename_column_open {
            return;
        }
        let mut open = self.rename_column_open;
        let mut close_requested = false;
        egui::Window::new(statics::EN_WINDOW_RENAME_COLUMN)
            .collapsible(false)
            .resizable(false)
            .open(&mut open)
            .show(ctx, |ui| {
                let mut apply = false;
                ui.horizontal(|ui| {
                    ui.label(statics::EN_LABEL_NAME);
                    let resp = ui.add(
                        egui::TextEdit::singleline(&mut self.rename_column_input)
                            .desired_width(220.0),
                    );
                    apply = resp.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                });
                ui.separator();
                ui.horizontal(|ui| {
                    if ui.button(statics::EN_BTN_APPLY).clicked() {
                        apply = true;
                    }
                    if ui.button(statics::EN_BTN_CANCEL).clicked() {
                        close_requested = true;
                    }
                });
                if apply {
                    let name = self.rename_column_input.trim().to_string();
                    if name.is_empty() {
                        self.last_error = Some(statics::EN_ERR_NAME_EMPTY.to_string());
                    } else {
                        match self.ws.rename_column(self.rename_column_index, &name) {
                            Ok(RenameOutcome::Renamed) => {
                                self.status = format!("Renamed column to '{name}'");
                                self.last_error = None;
                                self.selected_cell = None;
                                self.edit_buffer.clear();
                                close_requested = true;
                            }
                            Ok(RenameOutcome::Unchanged) => {
                                self.status = "No change.".to_string();
                                self.last_error = None;
                                close_requested = true;
                            }
                            Err(e) => self.last_error = Some(e.to_string()),
                        }
                    }
                }
            });
        if close_requested {
            open = false;
        }
        self.rename_column_open = open;
    }

    fn show_add_column_window(&mut self, ctx: &egui::Context) {
        if !self.add_column_open {
            return;
        }
        let mut open = self.add_column_open;
        let mut close_requested = false;
        egui::Window::new(statics::EN_WINDOW_ADD_COLUMN)
            .collapsible(false)
            .resizable(false)
            .open(&mut open)
            .show(ctx, |ui| {
                let mut apply = false;
                ui.horizontal(|ui| {
                    ui.label(statics::EN_LABEL_NAME);
                    let resp = ui.add(
                        egui::TextEdit::singleline(&mut self.add_column_input)
                            .desired_width(220.0),
                    );
                    apply = resp.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                });
                ui.separator();
                ui.horizontal(|ui| {
                    if ui.button(statics::EN_BTN_APPLY).clicked() {
                        apply = true;
                    }
                    if ui.button(statics::EN_BTN_CANCEL).clicked() {
                        close_requested = true;
                    }
                });
                if apply {
                    let name = self.add_column_input.trim().to_string();
                    if name.is_empty() {
                        self.last_error = Some(statics::EN_ERR_NAME_EMPTY.to_string());
                    } else {
                        let result = self.ws.add_column(&name);
                        if self.report_op(result, &format!("Added column '{name}'")) {
                            close_requested = true;
                        }
                    }
                }
            });
        if close_requested {
            open = false;
        }
        self.add_column_open = open;
    }

    fn show_add_key_window(&mut self, ctx: &egui::Context) {
        if !self.add_key_open {
            return;
        }
        let mut open = self.add_key_open;
        let mut close_requested = false;
        egui::Window::new(statics::EN_WINDOW_ADD_KEY)
            .collapsible(false)
            .resizable(false)
            .open(&mut open)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(statics::EN_LABEL_NAME);
                    ui.add(
                        egui::TextEdit::singleline(&mut self.add_key_input).desired_width(220.0),
                    );
                });
                ui.horizontal(|ui| {
                    ui.label(statics::EN_LABEL_PICK_TEMPLATE);
                    let template_names: Vec<String> = self
                        .ws
                        .templates
                        .iter()
                        .map(|t| t.name.clone())
                        .collect();
                    let selected_label = self
                        .add_key_template
                        .clone()
                        .unwrap_or_else(|| "null".to_string());
                    egui::ComboBox::from_id_salt("add_key_template")
                        .selected_text(selected_label)
                        .show_ui(ui, |ui| {
                            ui.selectable_value(&mut self.add_key_template, None, "null");
                            for name in template_names {
                                ui.selectable_value(
                                    &mut self.add_key_template,
                                    Some(name.clone()),
                                    name,
                                );
                            }
                        });
                });
                ui.separator();
                ui.horizontal(|ui| {
                    if ui.button(statics::EN_BTN_APPLY).clicked() {
                        let name = self.add_key_input.trim().to_string();
                        if name.is_empty() {
                            self.last_error = Some(statics::EN_ERR_NAME_EMPTY.to_string());
                        } else {
                            let value = self
                                .add_key_template
                                .as_deref()
                                .and_then(|n| self.ws.templates.get(n))
                                .map(|t| t.value.clone())
                                .unwrap_or(JsonValue::Null);
                            let result = self.ws.add_key(&name, value);
                            if self.report_op(result, &format!("Added '{name}'")) {
                                close_requested = true;
                            }
                        }
                    }
                    if ui.button(statics::EN_BTN_CANCEL).clicked() {
                        close_requested = true;
                    }
                });
            });
        if close_requested {
            open = false;
        }
        self.add_key_open = open;
    }
}

impl eframe::App for JgeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Mouse side buttons step through the view history.
        if ctx.input(|i| i.pointer.button_clicked(egui::PointerButton::Extra1)) {
            self.go(NavDirection::Back);
        }
        if ctx.input(|i| i.pointer.button_clicked(egui::PointerButton::Extra2)) {
            self.go(NavDirection::Forward);
        }

        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            egui::MenuBar::new().ui(ui, |ui| {
                if ui.button(statics::EN_BTN_OPEN_JSON).clicked() {
                    self.open_json();
                }
                if ui
                    .add_enabled(
                        self.ws.has_document(),
                        egui::Button::new(statics::EN_BTN_SAVE_JSON_AS),
                    )
                    .clicked()
                {
                    self.save_json_as();
                }
                if ui.button(statics::EN_BTN_IMPORT_CSV).clicked() {
                    self.import_csv();
                }
                if ui
                    .add_enabled(
                        self.ws.has_document(),
                        egui::Button::new(statics::EN_BTN_EXPORT_CSV),
                    )
                    .clicked()
                {
                    self.export_csv();
                }
                if ui.button(statics::EN_BTN_PASTE_JSON).clicked() {
                    self.paste_open = true;
                }
                ui.separator();
                if ui
                    .add_enabled(
                        self.ws.can_navigate(NavDirection::Back),
                        egui::Button::new(statics::EN_NAV_BACK),
                    )
                    .clicked()
                {
                    self.go(NavDirection::Back);
                }
                if ui
                    .add_enabled(
                        self.ws.can_navigate(NavDirection::Forward),
                        egui::Button::new(statics::EN_NAV_FORWARD),
                    )
                    .clicked()
                {
                    self.go(NavDirection::Forward);
                }
                ui.separator();
                if ui.button(statics::EN_BTN_DIFF).clicked() {
                    self.diff_report = self.ws.diff_report();
                    self.diff_open = true;
                }
                if ui.button(statics::EN_BTN_TEMPLATES).clicked() {
                    self.templates_open = true;
                }
                if ui.button(statics::EN_BTN_URL_TOOL).clicked() {
                    self.url_open = true;
                }
                if ui.button(statics::EN_BTN_TOGGLE_THEME).clicked() {
                    self.config.dark_theme = !self.config.dark_theme;
                    if self.config.dark_theme {
                        ctx.set_visuals(egui::Visuals::dark());
                    } else {
                        ctx.set_visuals(egui::Visuals::light());
                    }
                    self.persist_config();
                }
                if ui.button(statics::EN_BTN_ABOUT).clicked() {
                    self.about_open = true;
                }
                ui.separator();
                ui.label(&self.status);
            });
        });

        self.show_paste_window(ctx);
        self.show_diff_window(ctx);
        self.show_templates_window(ctx);
        self.show_url_window(ctx);
        self.show_about_window(ctx);
        self.show_rename_key_window(ctx);
        self.show_rename_column_window(ctx);
        self.show_add_column_window(ctx);
        self.show_add_key_window(ctx);

        if let Some(err) = self.last_error.clone() {
            egui::TopBottomPanel::top("error_bar").show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.colored_label(egui::Color32::RED, &err);
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.small_button(statics::EN_BTN_CLEAR).clicked() {
                            self.last_error = None;
                        }
                    });
                });
            });
        }

        if !self.ws.has_document() {
            egui::CentralPanel::default().show(ctx, |ui| {
                ui.heading(statics::EN_HOME_HEADING);
                ui.separator();
                ui.label(statics::EN_HOME_INSTRUCTIONS);
            });
            return;
        }

        // Bottom bar first so the side panel does not eat its width.
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let file_label = self
                    .ws
                    .source_path()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| statics::EN_PLACEHOLDER_UNSAVED.to_string());
                ui.label(file_label);
                ui.separator();
                ui.monospace(self.ws.table_path().label());
                if let Some((at, len)) = self.ws.history_position() {
                    ui.separator();
                    ui.label(format!("view {at}/{len}"));
                }
                if self.ws.dirty() {
                    ui.separator();
                    ui.colored_label(egui::Color32::YELLOW, statics::EN_BADGE_DIRTY);
                }
            });
        });

        self.tree_panel(ctx);

        egui::CentralPanel::default().show(ctx, |ui| {
            let Some(table) = self.ws.table().cloned() else {
                return;
            };
            ui.heading(self.ws.table_path().label());
            ui.separator();
            self.table_toolbar(ui, &table);
            self.value_grid(ui, &table);
            ui.separator();
            self.edit_bar(ui, &table);
        });
    }
}

/// A full-width selectable row painted flat with left-aligned text.
fn selectable_row_left(
    ui: &mut egui::Ui,
    selected: bool,
    text: &str,
    row_h: f32,
) -> egui::Response {
    let desired = egui::vec2(ui.available_width(), row_h);
    let (rect, resp) = ui.allocate_exact_size(desired, egui::Sense::click());
    let resp = resp.on_hover_cursor(egui::CursorIcon::PointingHand);
    if ui.is_rect_visible(rect) {
        let visuals = ui.style().interact_selectable(&resp, selected);
        if selected || resp.hovered() {
            ui.painter().rect_filled(rect, 2.0, visuals.bg_fill);
            ui.painter()
                .rect_stroke(rect, 2.0, visuals.bg_stroke, egui::StrokeKind::Inside);
        }
        ui.painter().text(
            egui::pos2(rect.left() + 4.0, rect.center().y),
            egui::Align2::LEFT_CENTER,
            text,
            egui::TextStyle::Body.resolve(ui.style()),
            visuals.text_color(),
        );
    }
    resp
}
