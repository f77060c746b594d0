pub mod domain;
pub mod frame_capture_service;
pub mod infrastructure;
