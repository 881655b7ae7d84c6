mod section_service;

pub use section_service::SectionService;
