//! Section tree: the middle level of the content hierarchy.
//!
//! Every section belongs to exactly one category and may nest under a folder
//! section of the same category. Name/slug uniqueness is scoped to the
//! (category, parent) sibling set. Non-folder sections are the leaves content
//! attaches to.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/sections` | List sections at one level (filters: categoryId, parentId) |
//! | GET | `/api/sections/id/{id}` | Get by id, with children for folders |
//! | GET | `/api/sections/category/{categoryId}` | All sections of a category |
//! | GET | `/api/sections/category/{categorySlug}/section/{sectionSlug}` | Slug lookup |
//! | GET | `/api/sections/category/{categorySlug}/parent/{parentSlug}/section/{sectionSlug}` | Nested slug lookup |
//! | POST | `/api/sections` | Create section |
//! | PUT | `/api/sections/{id}` | Partial update |
//! | DELETE | `/api/sections/{id}` | Delete (refused while children exist) |
//! | DELETE | `/api/sections` | Bulk delete (refused while nested) |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::SectionService;
