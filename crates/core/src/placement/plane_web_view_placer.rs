use crate::placement::domain::plane_raycaster::{PlaneRaycaster, ScreenPoint, TrackableKind};
use crate::placement::domain::pose::{Pose, Vec3};
use crate::placement::domain::web_panel::{KeyboardFactory, WebPanelFactory};
use crate::placement::panel_rig::PanelRig;
use crate::shared::constants::{DEFAULT_PANEL_URL, PANEL_LIFT};

type PlacedListener = Box<dyn FnMut(&Pose)>;

/// Places a single web panel where the first tap hits a detected plane.
///
/// Once a panel exists further taps are ignored; `update` then only drives
/// the panel's deferred URL load and keyboard routing.
pub struct PlaneWebViewPlacer {
    raycaster: Box<dyn PlaneRaycaster>,
    panels: Box<dyn WebPanelFactory>,
    keyboards: Box<dyn KeyboardFactory>,
    url: String,
    spawned: Option<PanelRig>,
    listeners: Vec<PlacedListener>,
}

impl PlaneWebViewPlacer {
    pub fn new(
        raycaster: Box<dyn PlaneRaycaster>,
        panels: Box<dyn WebPanelFactory>,
        keyboards: Box<dyn KeyboardFactory>,
    ) -> Self {
        Self {
            raycaster,
            panels,
            keyboards,
            url: DEFAULT_PANEL_URL.to_string(),
            spawned: None,
            listeners: Vec::new(),
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Registers a callback fired once, with the panel pose, when it is placed.
    pub fn on_placed(&mut self, listener: impl FnMut(&Pose) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn spawned(&self) -> Option<&PanelRig> {
        self.spawned.as_ref()
    }

    /// Call once per frame with the active touches. Returns the panel pose on
    /// the frame it is placed.
    pub fn update(&mut self, touches: &[ScreenPoint]) -> Option<Pose> {
        if let Some(rig) = self.spawned.as_mut() {
            rig.update();
            return None;
        }

        let touch = touches.first()?;
        let hit = self
            .raycaster
            .raycast(*touch, TrackableKind::PlaneWithinPolygon)
            .into_iter()
            .next()?;

        let pose = panel_pose_for_hit(&hit.pose);
        self.spawned = Some(PanelRig::spawn(
            self.panels.as_mut(),
            self.keyboards.as_mut(),
            pose,
            self.url.clone(),
        ));
        log::info!(
            "Placed web panel at ({:.2}, {:.2}, {:.2})",
            pose.position.x,
            pose.position.y,
            pose.position.z
        );

        for listener in &mut self.listeners {
            listener(&pose);
        }
        Some(pose)
    }
}

/// Lifts the panel above the hit point and turns it to face the camera.
pub fn panel_pose_for_hit(hit: &Pose) -> Pose {
    Pose::new(hit.position + Vec3::new(0.0, PANEL_LIFT, 0.0), hit.rotation).rotated_local_y(180.0)
}
