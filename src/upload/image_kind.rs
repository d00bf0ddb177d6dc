use std::str::FromStr;

use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

/// Image formats accepted in the `image` field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ImageKind {
    Png,
    #[strum(to_string = "jpeg", serialize = "jpg")]
    Jpeg,
    Gif,
    Webp,
}

impl ImageKind {
    pub fn mime_type(&self) -> &'static str {
        use ImageKind::*;

        match self {
            Png => "image/png",
            Jpeg => "image/jpeg",
            Gif => "image/gif",
            Webp => "image/webp",
        }
    }

    pub fn from_extension(extension: &str) -> Option<ImageKind> {
        ImageKind::from_str(extension).ok()
    }

    /// Parameters such as `; charset=...` are ignored.
    pub fn from_content_type(content_type: &str) -> Option<ImageKind> {
        let essence = content_type.split(';').next()?.trim();

        ImageKind::iter().find(|kind| kind.mime_type().eq_ignore_ascii_case(essence))
    }

    /// Lists the accepted extensions for error messages.
    pub fn allowed_list() -> String {
        ImageKind::iter()
            .map(|kind| kind.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use crate::upload::image_kind::ImageKind;

    #[test]
    fn extensions_are_case_insensitive() {
        assert_eq!(ImageKind::from_extension("PNG"), Some(ImageKind::Png));
        assert_eq!(ImageKind::from_extension("Jpg"), Some(ImageKind::Jpeg));
        assert_eq!(ImageKind::from_extension("jpeg"), Some(ImageKind::Jpeg));
    }

    #[test]
    fn unknown_extension() {
        assert_eq!(ImageKind::from_extension("exe"), None);
        assert_eq!(ImageKind::from_extension("svg"), None);
        assert_eq!(ImageKind::from_extension(""), None);
    }

    #[test]
    fn content_type_with_parameters() {
        assert_eq!(
            ImageKind::from_content_type("image/webp; q=0.9"),
            Some(ImageKind::Webp)
        );
        assert_eq!(
            ImageKind::from_content_type("IMAGE/GIF"),
            Some(ImageKind::Gif)
        );
    }

    #[test]
    fn non_image_content_type() {
        assert_eq!(ImageKind::from_content_type("application/pdf"), None);
        assert_eq!(ImageKind::from_content_type("image/svg+xml"), None);
    }

    #[test]
    fn allowed_list() {
        assert_eq!(ImageKind::allowed_list(), "png, jpeg, gif, webp");
    }
}
