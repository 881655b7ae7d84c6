mod section_handler;

pub use section_handler::*;
