//! Template payloads to start custom formatting from.

use super::payload::{Attachment, AttachmentField, Payload};

/// Plain message with an author name and emoji avatar
pub fn simple() -> Payload {
    Payload::new()
        .username("hookcast")
        .icon_emoji(":robot_face:")
}

/// Message carrying two fully populated attachments
pub fn with_attachments() -> Payload {
    Payload::new()
        .username("hookcast")
        .icon_emoji(":space_invader:")
        .attachment(
            Attachment::new("Required plain-text summary of the attachment.")
                .text("Optional text that appears within the attachment")
                .pretext("Optional text that should appear above the formatted data")
                .color("#36a64f")
                .author(
                    "Bobby Tables",
                    Some("http://flickr.com/bobby/".to_string()),
                    Some("http://flickr.com/icons/bobby.jpg".to_string()),
                )
                .title(
                    "Slack API Documentation",
                    Some("https://api.slack.com/".to_string()),
                )
                .field(AttachmentField::new("Priority", "High", true))
                .field(AttachmentField::new(
                    "UUID",
                    "123e4567-e89b-12d3-a456-426655440000",
                    false,
                ))
                .image_url("http://my-website.com/path/to/image.jpg")
                .thumb_url("http://example.com/path/to/thumb.png")
                .footer(
                    "Slack API",
                    Some(
                        "https://platform.slack-edge.com/img/default_application_icon.png"
                            .to_string(),
                    ),
                )
                .ts(123456789),
        )
        .attachment(
            Attachment::new("Second attachment fallback")
                .pretext("Second attachment")
                .text("Deploy of build 42 failed on the staging cluster.")
                .color("danger")
                .title("Build log", Some("https://ci.example.com/builds/42".to_string()))
                .field(AttachmentField::new("Environment", "staging", true))
                .field(AttachmentField::new("Duration", "4m 12s", true))
                .footer("CI", None)
                .ts(1486457892),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_has_no_text() {
        let fields = simple().into_fields();
        assert!(!fields.contains_key("text"));
        assert_eq!(fields["icon_emoji"], ":robot_face:");
    }

    #[test]
    fn test_with_attachments_every_attachment_has_fallback() {
        let payload = with_attachments();
        assert_eq!(payload.attachments.len(), 2);
        assert!(payload.attachments.iter().all(|a| !a.fallback.is_empty()));
    }
}
