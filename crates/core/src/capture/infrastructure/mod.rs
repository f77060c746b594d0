pub mod gpu_context;
pub mod image_encoder;
pub mod image_file_writer;
pub mod texture_frame_source;
pub mod wgpu_capture_backend;
