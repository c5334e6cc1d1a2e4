/*
 * Defines shared constants for logical UI control identifiers.
 * These IDs are used by the `ui_description_layer` to define the initial UI
 * structure and by the `app_logic` (Presenter) to target specific controls
 * for dynamic updates. The `platform_layer` maps them to whatever it renders.
 */

use crate::platform_layer::types::ControlId;

// --- Search form ---
pub const QUERY_INPUT_ID: ControlId = ControlId::new(1001);
pub const DIRECTORY_INPUT_ID: ControlId = ControlId::new(1002);
pub const EXTENSION_INPUT_ID: ControlId = ControlId::new(1003);

pub const SEARCH_BUTTON_ID: ControlId = ControlId::new(1010);
pub const CANCEL_BUTTON_ID: ControlId = ControlId::new(1011);

// --- Feedback ---
pub const PROGRESS_BAR_ID: ControlId = ControlId::new(1020);
pub const RESULTS_LIST_ID: ControlId = ControlId::new(1021);

// General status line (state, match count, elapsed time).
pub const STATUS_LABEL_ID: ControlId = ControlId::new(1030);

// Shows the last error; cleared when a new search starts.
pub const ERROR_LABEL_ID: ControlId = ControlId::new(1031);
