use std::cell::{Cell, RefCell};
use std::rc::Rc;

use super::domain::anchor_creator::AnchorCreator;
use super::domain::plane_raycaster::{PlaneRaycaster, RaycastHit, ScreenPoint, TrackableKind};
use super::domain::pose::Pose;
use super::domain::web_panel::{Keyboard, KeyboardFactory, WebPanel, WebPanelFactory};

#[derive(Default)]
pub struct PanelRecord {
    pub size: (f32, f32),
    pub pose: Option<Pose>,
    pub urls: Vec<String>,
    pub keys: Vec<String>,
}

struct FakePanel {
    record: Rc<RefCell<PanelRecord>>,
    initialized: Rc<Cell<bool>>,
}

impl WebPanel for FakePanel {
    fn set_pose(&mut self, pose: Pose) {
        self.record.borrow_mut().pose = Some(pose);
    }

    fn is_initialized(&self) -> bool {
        self.initialized.get()
    }

    fn load_url(&mut self, url: &str) {
        self.record.borrow_mut().urls.push(url.to_string());
    }

    fn handle_keyboard_input(&mut self, key: &str) {
        self.record.borrow_mut().keys.push(key.to_string());
    }
}

/// Records every panel it creates. All panels share one `initialized` flag.
/// Clones share state, so a test can keep one after boxing another.
#[derive(Default, Clone)]
pub struct FakePanelFactory {
    pub panels: Rc<RefCell<Vec<Rc<RefCell<PanelRecord>>>>>,
    pub initialized: Rc<Cell<bool>>,
}

impl FakePanelFactory {
    pub fn count(&self) -> usize {
        self.panels.borrow().len()
    }

    pub fn panel(&self, index: usize) -> Rc<RefCell<PanelRecord>> {
        self.panels.borrow()[index].clone()
    }
}

impl WebPanelFactory for FakePanelFactory {
    fn instantiate(&mut self, width: f32, height: f32) -> Box<dyn WebPanel> {
        let record = Rc::new(RefCell::new(PanelRecord {
            size: (width, height),
            ..Default::default()
        }));
        self.panels.borrow_mut().push(record.clone());
        Box::new(FakePanel {
            record,
            initialized: self.initialized.clone(),
        })
    }
}

struct FakeKeyboard {
    pose: Rc<RefCell<Option<Pose>>>,
    input: Rc<RefCell<Vec<String>>>,
}

impl Keyboard for FakeKeyboard {
    fn set_local_pose(&mut self, pose: Pose) {
        *self.pose.borrow_mut() = Some(pose);
    }

    fn drain_input(&mut self) -> Vec<String> {
        std::mem::take(&mut *self.input.borrow_mut())
    }
}

#[derive(Default, Clone)]
pub struct FakeKeyboardFactory {
    poses: Rc<RefCell<Vec<Rc<RefCell<Option<Pose>>>>>>,
    input: Rc<RefCell<Vec<String>>>,
}

impl FakeKeyboardFactory {
    pub fn press(&self, key: &str) {
        self.input.borrow_mut().push(key.to_string());
    }

    pub fn count(&self) -> usize {
        self.poses.borrow().len()
    }

    pub fn pose(&self, index: usize) -> Option<Pose> {
        *self.poses.borrow()[index].borrow()
    }
}

impl KeyboardFactory for FakeKeyboardFactory {
    fn instantiate(&mut self) -> Box<dyn Keyboard> {
        let pose = Rc::new(RefCell::new(None));
        self.poses.borrow_mut().push(pose.clone());
        Box::new(FakeKeyboard {
            pose,
            input: self.input.clone(),
        })
    }
}

pub struct FakeRaycaster {
    pub hits: Vec<RaycastHit>,
    pub calls: Rc<RefCell<Vec<(ScreenPoint, TrackableKind)>>>,
}

impl FakeRaycaster {
    pub fn new(hits: Vec<RaycastHit>) -> Self {
        Self {
            hits,
            calls: Rc::new(RefCell::new(Vec::new())),
        }
    }
}

impl PlaneRaycaster for FakeRaycaster {
    fn raycast(&self, point: ScreenPoint, kind: TrackableKind) -> Vec<RaycastHit> {
        self.calls.borrow_mut().push((point, kind));
        self.hits.clone()
    }
}

pub struct FakeAnchorCreator {
    pub enabled: Cell<bool>,
    pub toggles: Cell<usize>,
}

impl Default for FakeAnchorCreator {
    fn default() -> Self {
        Self {
            enabled: Cell::new(true),
            toggles: Cell::new(0),
        }
    }
}

impl AnchorCreator for FakeAnchorCreator {
    fn set_enabled(&self, enabled: bool) {
        self.enabled.set(enabled);
        self.toggles.set(self.toggles.get() + 1);
    }
}
