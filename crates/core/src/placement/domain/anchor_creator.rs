/// The scene component that spawns anchors on tap.
///
/// Shared with the host scene, so toggling goes through `&self`.
pub trait AnchorCreator {
    fn set_enabled(&self, enabled: bool);
}
