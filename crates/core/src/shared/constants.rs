/// Directory name used under the platform data and config directories.
pub const APP_DIR_NAME: &str = "AR Capture";
pub const CAPTURES_DIR_NAME: &str = "captures";
pub const SETTINGS_FILE_NAME: &str = "settings.json";

pub const DEFAULT_CAPTURE_FILENAME: &str = "camera.png";

/// Matches the engine's default `EncodeToJPG` quality.
pub const JPEG_QUALITY: u8 = 75;

/// Bytes per texel in the offscreen capture buffer (RGBA8).
pub const TARGET_BYTES_PER_PIXEL: u32 = 4;

pub const PANEL_WIDTH: f32 = 0.6;
pub const PANEL_HEIGHT: f32 = 0.3;

/// Height above the hit plane at which a tapped panel is placed.
pub const PANEL_LIFT: f32 = 0.5;

/// Local height of an anchored panel above its anchor.
pub const ANCHORED_PANEL_LIFT: f32 = 0.7;

/// Keyboard offset below the panel it is parented to.
pub const KEYBOARD_DROP: f32 = -0.31;

pub const DEFAULT_PANEL_URL: &str = "https://www.google.com";
