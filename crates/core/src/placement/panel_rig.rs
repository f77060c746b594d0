use crate::placement::domain::pose::{Pose, Quat, Vec3};
use crate::placement::domain::web_panel::{Keyboard, KeyboardFactory, WebPanel, WebPanelFactory};
use crate::shared::constants::{KEYBOARD_DROP, PANEL_HEIGHT, PANEL_WIDTH};

/// A web panel with a keyboard hung underneath it.
///
/// The panel only accepts URLs and keys after it reports initialized, so
/// the initial URL is held back and keys pressed before then are dropped.
pub struct PanelRig {
    panel: Box<dyn WebPanel>,
    keyboard: Box<dyn Keyboard>,
    pending_url: Option<String>,
}

impl PanelRig {
    pub fn spawn(
        panels: &mut dyn WebPanelFactory,
        keyboards: &mut dyn KeyboardFactory,
        pose: Pose,
        url: impl Into<String>,
    ) -> Self {
        let mut panel = panels.instantiate(PANEL_WIDTH, PANEL_HEIGHT);
        panel.set_pose(pose);

        let mut keyboard = keyboards.instantiate();
        keyboard.set_local_pose(Pose::new(Vec3::new(0.0, KEYBOARD_DROP, 0.0), Quat::IDENTITY));

        Self {
            panel,
            keyboard,
            pending_url: Some(url.into()),
        }
    }

    /// Call once per frame.
    pub fn update(&mut self) {
        let keys = self.keyboard.drain_input();
        if !self.panel.is_initialized() {
            if !keys.is_empty() {
                log::debug!("Dropping {} key(s): panel not initialized", keys.len());
            }
            return;
        }

        if let Some(url) = self.pending_url.take() {
            log::debug!("Panel initialized, loading {url}");
            self.panel.load_url(&url);
        }
        for key in keys {
            self.panel.handle_keyboard_input(&key);
        }
    }

    /// True once the initial URL has been handed to the panel.
    pub fn is_loaded(&self) -> bool {
        self.pending_url.is_none()
    }
}
