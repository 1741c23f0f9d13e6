pub mod extractors;
pub mod middleware_viewer;
