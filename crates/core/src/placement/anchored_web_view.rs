use std::rc::Rc;

use crate::placement::domain::anchor_creator::AnchorCreator;
use crate::placement::domain::pose::{Pose, Quat, Vec3};
use crate::placement::domain::web_panel::{KeyboardFactory, WebPanelFactory};
use crate::placement::panel_rig::PanelRig;
use crate::shared::constants::ANCHORED_PANEL_LIFT;

/// A web panel attached to an AR anchor.
///
/// The anchor creator is disabled while the view lives, so taps on the
/// panel don't spawn further anchors, and re-enabled when it is dropped.
pub struct AnchoredWebView {
    rig: PanelRig,
    anchor_creator: Option<Rc<dyn AnchorCreator>>,
}

impl AnchoredWebView {
    pub fn start(
        anchor_creator: Option<Rc<dyn AnchorCreator>>,
        panels: &mut dyn WebPanelFactory,
        keyboards: &mut dyn KeyboardFactory,
        url: impl Into<String>,
    ) -> Self {
        if let Some(creator) = &anchor_creator {
            creator.set_enabled(false);
        }

        let pose = Pose::new(
            Vec3::new(0.0, ANCHORED_PANEL_LIFT, 0.0),
            Quat::from_euler_degrees(0.0, 180.0, 0.0),
        );
        let rig = PanelRig::spawn(panels, keyboards, pose, url);

        Self {
            rig,
            anchor_creator,
        }
    }

    /// Call once per frame.
    pub fn update(&mut self) {
        self.rig.update();
    }

    pub fn rig(&self) -> &PanelRig {
        &self.rig
    }
}

impl Drop for AnchoredWebView {
    fn drop(&mut self) {
        if let Some(creator) = &self.anchor_creator {
            creator.set_enabled(true);
        }
    }
}
