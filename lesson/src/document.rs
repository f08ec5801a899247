//! The simulated e-mail being composed.

use serde::{Deserialize, Serialize};

use crate::score::PointEvent;
use crate::script;
use crate::types::{LessonError, Result};

#[cfg(feature = "typescript")]
use ts_rs::TS;

/// Text colour the document starts with.
pub const DEFAULT_TEXT_COLOR: &str = "black";

/// Style applied to an inserted picture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "lowercase")]
pub enum ImageStyle {
    #[default]
    None,
    Shadow,
    Border,
}

/// Toggleable text style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "lowercase")]
pub enum TextStyle {
    Bold,
    Italic,
    Underline,
}

/// Free-text field of the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "lowercase")]
pub enum EmailField {
    To,
    Subject,
    Body,
    Cc,
    Bcc,
}

/// Mutable e-mail draft.
///
/// `is_formatted` latches on the first formatting or colour action and
/// `image_styled` on the first picture style. Both are only reset by
/// [`EmailDocument::clear`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct EmailDocument {
    to: String,
    subject: String,
    body: String,
    cc: String,
    bcc: String,
    has_attachment: bool,
    image_style: ImageStyle,
    bold: bool,
    italic: bool,
    underline: bool,
    text_color: String,
    is_formatted: bool,
    image_styled: bool,
}

impl Default for EmailDocument {
    fn default() -> Self {
        Self {
            to: String::new(),
            subject: String::new(),
            body: String::new(),
            cc: String::new(),
            bcc: String::new(),
            has_attachment: false,
            image_style: ImageStyle::None,
            bold: false,
            italic: false,
            underline: false,
            text_color: DEFAULT_TEXT_COLOR.to_string(),
            is_formatted: false,
            image_styled: false,
        }
    }
}

impl EmailDocument {
    /// Create an empty draft.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(&self, field: EmailField) -> &str {
        match field {
            EmailField::To => &self.to,
            EmailField::Subject => &self.subject,
            EmailField::Body => &self.body,
            EmailField::Cc => &self.cc,
            EmailField::Bcc => &self.bcc,
        }
    }

    pub fn to(&self) -> &str {
        &self.to
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn cc(&self) -> &str {
        &self.cc
    }

    pub fn bcc(&self) -> &str {
        &self.bcc
    }

    pub fn has_attachment(&self) -> bool {
        self.has_attachment
    }

    pub fn image_style(&self) -> ImageStyle {
        self.image_style
    }

    pub fn text_color(&self) -> &str {
        &self.text_color
    }

    pub fn is_formatted(&self) -> bool {
        self.is_formatted
    }

    pub fn style(&self, style: TextStyle) -> bool {
        match style {
            TextStyle::Bold => self.bold,
            TextStyle::Italic => self.italic,
            TextStyle::Underline => self.underline,
        }
    }

    /// Replace the contents of a text field.
    pub fn set_field(&mut self, field: EmailField, value: impl Into<String>) {
        let value = value.into();
        match field {
            EmailField::To => self.to = value,
            EmailField::Subject => self.subject = value,
            EmailField::Body => self.body = value,
            EmailField::Cc => self.cc = value,
            EmailField::Bcc => self.bcc = value,
        }
    }

    /// Flip a text style.
    ///
    /// Returns [`PointEvent::FirstFormatting`] when this is the first
    /// formatting action applied to the document.
    pub fn toggle_style(&mut self, style: TextStyle) -> Option<PointEvent> {
        match style {
            TextStyle::Bold => self.bold = !self.bold,
            TextStyle::Italic => self.italic = !self.italic,
            TextStyle::Underline => self.underline = !self.underline,
        }
        self.mark_formatted()
    }

    /// Change the text colour. Shares the first-formatting award with
    /// [`EmailDocument::toggle_style`].
    pub fn set_text_color(&mut self, color: impl Into<String>) -> Option<PointEvent> {
        self.text_color = color.into();
        self.mark_formatted()
    }

    fn mark_formatted(&mut self) -> Option<PointEvent> {
        if self.is_formatted {
            return None;
        }
        self.is_formatted = true;
        Some(PointEvent::FirstFormatting)
    }

    /// Insert the sample picture. Only the first insertion earns points.
    pub fn attach_image(&mut self) -> Option<PointEvent> {
        if self.has_attachment {
            return None;
        }
        self.has_attachment = true;
        Some(PointEvent::ImageAttached)
    }

    /// Apply a picture style.
    ///
    /// Needs an inserted picture. Points are earned the first time the
    /// picture is styled; restyling is free.
    pub fn apply_image_style(&mut self, style: ImageStyle) -> Result<Option<PointEvent>> {
        if !self.has_attachment {
            return Err(LessonError::NoAttachment);
        }
        let first = !self.image_styled && style != ImageStyle::None;
        self.image_styled |= first;
        self.image_style = style;
        Ok(first.then_some(PointEvent::ImageStyled))
    }

    /// Fill recipient, subject and body with the sample message. Formatting
    /// is left alone.
    pub fn load_template(&mut self) {
        self.to = script::TEMPLATE_TO.to_string();
        self.subject = script::TEMPLATE_SUBJECT.to_string();
        self.body = script::TEMPLATE_BODY.to_string();
    }

    /// Reset every field, formatting included.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Recipient, subject and body are all filled in.
    pub fn has_basics(&self) -> bool {
        !self.to.trim().is_empty() && !self.subject.trim().is_empty() && !self.body.trim().is_empty()
    }

    /// Any text style is on, or the colour differs from the default.
    pub fn has_text_formatting(&self) -> bool {
        self.bold || self.italic || self.underline || self.text_color != DEFAULT_TEXT_COLOR
    }

    /// A picture is inserted and styled.
    pub fn has_image_formatting(&self) -> bool {
        self.has_attachment && self.image_style != ImageStyle::None
    }

    /// Cc or Bcc holds something.
    pub fn uses_copy_recipients(&self) -> bool {
        !self.cc.trim().is_empty() || !self.bcc.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_formatting_awarded_once() {
        let mut doc = EmailDocument::new();
        assert_eq!(doc.toggle_style(TextStyle::Bold), Some(PointEvent::FirstFormatting));
        assert!(doc.is_formatted());
        assert_eq!(doc.toggle_style(TextStyle::Italic), None);
        assert_eq!(doc.set_text_color("blue"), None);
    }

    #[test]
    fn test_color_latches_formatted_flag() {
        let mut doc = EmailDocument::new();
        assert_eq!(doc.set_text_color("red"), Some(PointEvent::FirstFormatting));
        assert!(doc.has_text_formatting());

        // Toggling bold off again keeps the latch
        doc.toggle_style(TextStyle::Bold);
        doc.toggle_style(TextStyle::Bold);
        assert!(doc.is_formatted());
    }

    #[test]
    fn test_formatted_flag_survives_untoggle() {
        let mut doc = EmailDocument::new();
        doc.toggle_style(TextStyle::Underline);
        doc.toggle_style(TextStyle::Underline);
        assert!(doc.is_formatted());
        assert!(!doc.has_text_formatting());
    }

    #[test]
    fn test_image_style_requires_attachment() {
        let mut doc = EmailDocument::new();
        assert_eq!(doc.apply_image_style(ImageStyle::Shadow), Err(LessonError::NoAttachment));

        assert_eq!(doc.attach_image(), Some(PointEvent::ImageAttached));
        assert_eq!(doc.attach_image(), None);

        assert_eq!(doc.apply_image_style(ImageStyle::Shadow), Ok(Some(PointEvent::ImageStyled)));
        assert_eq!(doc.apply_image_style(ImageStyle::Border), Ok(None));
        assert!(doc.has_image_formatting());
    }

    #[test]
    fn test_image_style_points_survive_reset_to_none() {
        let mut doc = EmailDocument::new();
        doc.attach_image();

        assert_eq!(doc.apply_image_style(ImageStyle::Shadow), Ok(Some(PointEvent::ImageStyled)));
        assert_eq!(doc.apply_image_style(ImageStyle::None), Ok(None));
        assert!(!doc.has_image_formatting());
        assert_eq!(doc.apply_image_style(ImageStyle::Shadow), Ok(None));
        assert!(doc.has_image_formatting());

        doc.clear();
        doc.attach_image();
        assert_eq!(doc.apply_image_style(ImageStyle::Border), Ok(Some(PointEvent::ImageStyled)));
    }

    #[test]
    fn test_template_keeps_formatting() {
        let mut doc = EmailDocument::new();
        doc.toggle_style(TextStyle::Bold);
        doc.load_template();

        assert!(doc.has_basics());
        assert!(doc.style(TextStyle::Bold));
        assert_eq!(doc.to(), script::TEMPLATE_TO);
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut doc = EmailDocument::new();
        doc.load_template();
        doc.set_field(EmailField::Bcc, "friend@school.com");
        doc.set_text_color("green");
        doc.attach_image();

        doc.clear();
        assert_eq!(doc, EmailDocument::default());
        assert!(!doc.is_formatted());
    }

    #[test]
    fn test_blank_fields_do_not_count() {
        let mut doc = EmailDocument::new();
        doc.set_field(EmailField::To, "a@b.com");
        doc.set_field(EmailField::Subject, "   ");
        doc.set_field(EmailField::Body, "Hello");
        assert!(!doc.has_basics());

        doc.set_field(EmailField::Cc, " ");
        assert!(!doc.uses_copy_recipients());
    }
}
