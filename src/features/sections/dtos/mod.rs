mod section_dto;

pub use section_dto::{
    CreateSectionDto, SectionDetailDto, SectionRefDto, SectionResponseDto, SectionsByCategoryDto,
    UpdateSectionDto,
};
