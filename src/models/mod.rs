pub mod examples;
pub mod payload;

pub use payload::{Attachment, AttachmentField, FormatFields, Payload};
