//! Application-level configuration constants.

// UI Behavior
pub const COPY_FEEDBACK_MS: u32 = 1200;

// Default values for input fields
pub const DEFAULT_PRESET_NAME: &str = "Countdown";
pub const DEFAULT_GROUP_NAME: &str = "Countdown";
pub const DEFAULT_ZONE_ID: &str = "1122";
pub const DEFAULT_STATUS_ID: &str = "4410";
pub const DEFAULT_START_SECONDS: &str = "5";
pub const DEFAULT_SUB_SECOND_THRESHOLD: &str = "0";
pub const DEFAULT_V_OFFSET: &str = "2.0";
pub const DEFAULT_F_SCALE: &str = "2.0";
pub const DEFAULT_TARGET: &str = "self";

// Labels
pub const COPY_LABEL: &str = "Copy";
pub const COPIED_LABEL: &str = "Copied ✓";
pub const COPY_FAILED_MESSAGE: &str = "Copy failed. Select the text and copy it manually.";
pub const HEX_EMPTY_HINT: &str = "Hex values typed above are shown here in decimal.";
