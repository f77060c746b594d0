use super::pose::Pose;

/// An interactive web-view panel rendered by an external plugin.
pub trait WebPanel {
    /// Sets the panel pose relative to its parent (world space when unparented).
    fn set_pose(&mut self, pose: Pose);

    /// The panel cannot load URLs or take input until this is true.
    fn is_initialized(&self) -> bool;

    fn load_url(&mut self, url: &str);

    fn handle_keyboard_input(&mut self, key: &str);
}

pub trait WebPanelFactory {
    /// Creates a panel of the given size in meters.
    fn instantiate(&mut self, width: f32, height: f32) -> Box<dyn WebPanel>;
}

/// An on-screen keyboard parented under a panel.
pub trait Keyboard {
    /// Sets the keyboard pose relative to its parent panel.
    fn set_local_pose(&mut self, pose: Pose);

    /// Keys pressed since the last call, oldest first.
    fn drain_input(&mut self) -> Vec<String>;
}

pub trait KeyboardFactory {
    fn instantiate(&mut self) -> Box<dyn Keyboard>;
}
