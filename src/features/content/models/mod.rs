mod content;

pub use content::{Content, ContentField, ContentFieldValue, ContentImage, ContentWithRefs};
