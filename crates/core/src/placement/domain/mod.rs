pub mod anchor_creator;
pub mod plane_raycaster;
pub mod pose;
pub mod web_panel;
