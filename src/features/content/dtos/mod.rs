mod content_dto;

pub use content_dto::{
    ContentResponseDto, CreateContentDto, EmptyContentDto, UpdateContentDto,
};
