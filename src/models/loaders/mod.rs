pub mod request_loader;

pub use request_loader::load_request_file;
