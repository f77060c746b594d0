pub mod capture_config;
pub mod constants;
pub mod frame;
pub mod output_dir;
pub mod settings;
