use super::pose::Pose;

/// A touch position in screen pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScreenPoint {
    pub x: f32,
    pub y: f32,
}

impl ScreenPoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Which tracked surfaces a raycast may hit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrackableKind {
    /// Inside the detected polygon of a plane.
    PlaneWithinPolygon,
    /// Inside the bounding box of a plane.
    PlaneWithinBounds,
    FeaturePoint,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RaycastHit {
    pub pose: Pose,
    pub distance: f32,
}

/// Raycasting against surfaces tracked by the host AR framework.
pub trait PlaneRaycaster {
    /// Hits sorted nearest first. Empty when nothing was hit.
    fn raycast(&self, point: ScreenPoint, kind: TrackableKind) -> Vec<RaycastHit>;
}
