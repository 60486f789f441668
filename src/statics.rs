// Central place for UI strings and other non-localized constants.
// Keep these out of gui.rs to reduce duplication and make tweaks safer.

// English UI strings (EN_ prefix to make future localization easier)
pub const EN_APP_TITLE: &str = "JGE: JSON Grid Editor";

pub const EN_BTN_OPEN_JSON: &str = "Open JSON...";
pub const EN_BTN_SAVE_JSON_AS: &str = "Save JSON As...";
pub const EN_BTN_IMPORT_CSV: &str = "Import CSV...";
pub const EN_BTN_EXPORT_CSV: &str = "Export CSV...";
pub const EN_BTN_PASTE_JSON: &str = "Paste JSON";
pub const EN_BTN_DIFF: &str = "Diff";
pub const EN_BTN_TEMPLATES: &str = "Templates";
pub const EN_BTN_URL_TOOL: &str = "URL Tool";
pub const EN_BTN_ABOUT: &str = "About";
pub const EN_BTN_TOGGLE_THEME: &str = "Theme";

pub const EN_NAV_BACK: &str = "<- Back";
pub const EN_NAV_FORWARD: &str = "Forward ->";

pub const EN_WINDOW_ABOUT: &str = "About";
pub const EN_WINDOW_PASTE_JSON: &str = "Paste JSON";
pub const EN_WINDOW_DIFF: &str = "Changes Since Load";
pub const EN_WINDOW_TEMPLATES: &str = "Templates";
pub const EN_WINDOW_URL_TOOL: &str = "URL Encode / Decode";
pub const EN_WINDOW_RENAME_KEY: &str = "Rename Key";
pub const EN_WINDOW_RENAME_COLUMN: &str = "Rename Column";
pub const EN_WINDOW_ADD_COLUMN: &str = "Add Column";
pub const EN_WINDOW_ADD_KEY: &str = "Add Key";

pub const EN_ABOUT_HEADING: &str = "JGE: JSON Grid Editor";
pub const EN_ABOUT_VERSION: &str = "Version:";
pub const EN_ABOUT_NAV_HINT: &str = "Mouse back/forward buttons navigate view history.";

pub const EN_HOME_HEADING: &str = "JGE: JSON Grid Editor";
pub const EN_HOME_INSTRUCTIONS: &str = "Open a .json file, import a .csv, or paste JSON to begin.";

pub const EN_HEADING_DOCUMENT: &str = "Document";
pub const EN_HEADING_EDIT: &str = "Edit";

// Fixed column titles for the index/value table layout.
pub const EN_COL_INDEX: &str = "Index";
pub const EN_COL_VALUE: &str = "Value";
// Column titles for the key/value layouts (lowercase, like the CSV form).
pub const EN_COL_KV_KEY: &str = "key";
pub const EN_COL_KV_VALUE: &str = "value";
// Column titles for the template library list.
pub const EN_COL_NAME: &str = "Name";
pub const EN_COL_TYPE: &str = "Type";

pub const EN_LABEL_PATH: &str = "Path:";
pub const EN_LABEL_NAME: &str = "Name:";
pub const EN_LABEL_VALUE: &str = "Value:";
pub const EN_LABEL_INPUT: &str = "Input:";
pub const EN_LABEL_OUTPUT: &str = "Output:";
pub const EN_LABEL_EMPTY_TABLE: &str = "Nothing to show at this path.";
pub const EN_LABEL_SELECT_CELL: &str = "Select a cell to edit.";
pub const EN_LABEL_PICK_TEMPLATE: &str = "Initial value:";

pub const EN_BTN_APPLY: &str = "Apply";
pub const EN_BTN_CANCEL: &str = "Cancel";
pub const EN_BTN_CLEAR: &str = "Clear";
pub const EN_BTN_LOAD: &str = "Load";
pub const EN_BTN_SET_NULL: &str = "Set null";
pub const EN_BTN_ENCODE: &str = "Encode";
pub const EN_BTN_DECODE: &str = "Decode";

pub const EN_BTN_ADD_ROW: &str = "Add Row";
pub const EN_BTN_ADD_ITEM: &str = "Add Item";
pub const EN_BTN_INSERT: &str = "Insert";
pub const EN_BTN_DELETE: &str = "Delete";
pub const EN_BTN_UP: &str = "Up";
pub const EN_BTN_DOWN: &str = "Down";
pub const EN_BTN_ADD_COLUMN: &str = "Add Column...";
pub const EN_BTN_DELETE_COLUMN: &str = "Delete Column";
pub const EN_BTN_RENAME_COLUMN: &str = "Rename Column...";
pub const EN_BTN_ADD_KEY: &str = "Add Key...";
pub const EN_BTN_DELETE_KEY: &str = "Delete Key";
pub const EN_BTN_RENAME_KEY: &str = "Rename Key...";

pub const EN_BTN_SAVE_TEMPLATE: &str = "Save selection as template";
pub const EN_BTN_IMPORT_TEMPLATES: &str = "Import...";
pub const EN_BTN_EXPORT_TEMPLATES: &str = "Export...";
pub const EN_BADGE_BUILTIN: &str = "built-in";

pub const EN_DIFF_NONE: &str = "No document loaded.";
pub const EN_DIFF_CLEAN: &str = "No changes since load.";
pub const EN_PREFIX_ADDED: &str = "+ ";
pub const EN_PREFIX_REMOVED: &str = "- ";
pub const EN_PREFIX_COMMON: &str = "  ";
pub const EN_PREFIX_WARNING: &str = "Warning:";

pub const EN_BADGE_DIRTY: &str = "(modified)";
pub const EN_PLACEHOLDER_UNSAVED: &str = "<unsaved>";

pub const EN_ERR_CELL_READ_ONLY: &str = "this cell is not editable";
pub const EN_ERR_NAME_EMPTY: &str = "name cannot be empty";

// Glyphs for the tree side panel.
pub const EN_GLYPH_EXPANDED: &str = "-";
pub const EN_GLYPH_COLLAPSED: &str = "+";

// CSV bridge constants.
pub const CSV_KEY_HEADER: &str = "key";
pub const CSV_VALUE_HEADER: &str = "value";
// First-header spellings that mark a two-column CSV as a flat object.
pub const CSV_KEY_HEADER_ALIASES: &[&str] = &["key", "property", "name", "field", "item"];
// Synthesized name prefix for blank or surplus columns (1-based suffix).
pub const CSV_PLACEHOLDER_PREFIX: &str = "column_";

// Template record fields and the two builtin names.
pub const TPL_FIELD_NAME: &str = "name";
pub const TPL_FIELD_TYPE: &str = "type";
pub const TPL_FIELD_VALUE: &str = "value";
pub const TPL_KIND_OBJECT: &str = "object";
pub const TPL_KIND_ARRAY: &str = "array";
pub const TPL_EMPTY_OBJECT: &str = "Empty object";
pub const TPL_EMPTY_ARRAY: &str = "Empty array";

// On-disk locations under the platform config directory.
pub const CONFIG_DIR_NAME: &str = "jge";
pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const TEMPLATES_FILE_NAME: &str = "templates.json";
