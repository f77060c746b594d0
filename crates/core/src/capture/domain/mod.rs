pub mod capture_backend;
pub mod capture_error;
pub mod image_writer;
