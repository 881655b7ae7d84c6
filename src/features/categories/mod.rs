//! Category tree: the top level of the content hierarchy.
//!
//! Categories may nest one level at a time via `parent_id` (folders only).
//! Name and slug are unique among siblings, and globally via the primary
//! index. Four marker flags (`recent`, `latest`, `mostUsed`, `trending`) are
//! each held by at most one category collection-wide.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/categories` | List categories at one level (root by default) |
//! | GET | `/api/categories/id/{id}` | Get by id, with children for folders |
//! | GET | `/api/categories/slug/{slug}` | Get root-level category by slug |
//! | GET | `/api/categories/parent/{parentSlug}/slug/{slug}` | Nested slug lookup |
//! | POST | `/api/categories` | Create category |
//! | PUT | `/api/categories/{id}` | Partial update |
//! | DELETE | `/api/categories/{id}` | Delete (refused while children exist) |
//! | DELETE | `/api/categories` | Bulk delete (refused while nested) |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::CategoryService;
