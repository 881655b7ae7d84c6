//! Content records: the leaves of the hierarchy.
//!
//! A content record attaches to exactly one non-folder section, and a section
//! holds at most one content record. Content slugs are unique across the
//! whole category owning the section, so a slug resolves unambiguously within
//! a category regardless of which section holds it.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/content` | List content (filter: sectionId) |
//! | GET | `/api/content/id/{id}` | Get by id |
//! | GET | `/api/content/section/{sectionId}` | Get by section (empty skeleton when none) |
//! | GET | `/api/content/category/{categoryId}` | All content under a category |
//! | GET | `/api/content/category/{categoryId}/slug/{slug}` | Category-scoped slug lookup |
//! | POST | `/api/content` | Create content |
//! | PUT | `/api/content/{id}` | Partial update |
//! | DELETE | `/api/content/{id}` | Delete content |
//! | DELETE | `/api/content` | Bulk delete |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::ContentService;
