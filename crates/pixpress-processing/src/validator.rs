/// Upload validation errors
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid file extension: {extension} (allowed: {allowed:?})")]
    InvalidExtension {
        extension: String,
        allowed: Vec<String>,
    },

    #[error("Invalid filename: {0}")]
    InvalidFilename(String),
}

/// Case-insensitive extension allowlist for uploads
#[derive(Debug, Clone)]
pub struct ExtensionValidator {
    allowed_extensions: Vec<String>,
}

impl ExtensionValidator {
    pub fn new(allowed_extensions: Vec<String>) -> Self {
        Self {
            allowed_extensions: allowed_extensions
                .into_iter()
                .map(|e| e.trim_start_matches('.').to_lowercase())
                .collect(),
        }
    }

    pub fn validate_extension(&self, filename: &str) -> Result<(), ValidationError> {
        let extension = lowercase_extension(filename)
            .ok_or_else(|| ValidationError::InvalidFilename(filename.to_string()))?;

        if !self.allowed_extensions.contains(&extension) {
            return Err(ValidationError::InvalidExtension {
                extension,
                allowed: self.allowed_extensions.clone(),
            });
        }

        Ok(())
    }

    pub fn is_allowed(&self, filename: &str) -> bool {
        self.validate_extension(filename).is_ok()
    }
}

/// Split at the last dot. A leading dot starts the extension, so `.jpg` is all extension.
fn split_extension(filename: &str) -> (&str, Option<&str>) {
    match filename.rsplit_once('.') {
        Some((stem, ext)) => (stem, Some(ext)),
        None => (filename, None),
    }
}

fn lowercase_extension(filename: &str) -> Option<String> {
    split_extension(filename).1.map(|e| e.to_lowercase())
}

pub fn is_heif(filename: &str) -> bool {
    matches!(lowercase_extension(filename).as_deref(), Some("heif" | "heic"))
}

/// Output name derived from a client filename: `{stem}_compressed{ext}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputName {
    /// `{stem}_compressed`, before any collision counter
    pub base: String,
    /// Extension with its leading dot, or empty
    pub extension: String,
}

impl OutputName {
    /// HEIF/HEIC sources become `.jpg`; other extensions keep their case.
    pub fn from_filename(filename: &str) -> Self {
        let (stem, ext) = split_extension(filename);
        let stem = if stem.is_empty() { "image" } else { stem };

        let extension = if is_heif(filename) {
            ".jpg".to_string()
        } else {
            ext.map(|e| format!(".{}", e)).unwrap_or_default()
        };

        Self {
            base: format!("{}_compressed", stem),
            extension,
        }
    }

    pub fn file_name(&self) -> String {
        format!("{}{}", self.base, self.extension)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_validator() -> ExtensionValidator {
        ExtensionValidator::new(
            ["jpg", "jpeg", "png", "heif", "heic", "webp"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        )
    }

    #[test]
    fn test_allowlist_is_case_insensitive() {
        let validator = default_validator();
        assert!(validator.is_allowed("photo.JPG"));
        assert!(validator.is_allowed("scan.HeIc"));
        assert!(validator.is_allowed("a.webp"));
        assert!(!validator.is_allowed("notes.txt"));
        assert!(!validator.is_allowed("anim.gif"));
        assert!(!validator.is_allowed("no_extension"));
    }

    #[test]
    fn test_validate_extension_errors() {
        let validator = default_validator();
        assert!(matches!(
            validator.validate_extension("x.bmp"),
            Err(ValidationError::InvalidExtension { .. })
        ));
        assert!(matches!(
            validator.validate_extension("README"),
            Err(ValidationError::InvalidFilename(_))
        ));
    }

    #[test]
    fn test_dotted_config_entries_are_normalized() {
        let validator = ExtensionValidator::new(vec![".PNG".to_string()]);
        assert!(validator.is_allowed("a.png"));
    }

    #[test]
    fn test_output_name_keeps_extension_case() {
        let name = OutputName::from_filename("Holiday.PNG");
        assert_eq!(name.base, "Holiday_compressed");
        assert_eq!(name.file_name(), "Holiday_compressed.PNG");
    }

    #[test]
    fn test_heif_output_is_jpg() {
        assert_eq!(
            OutputName::from_filename("IMG_0001.HEIC").file_name(),
            "IMG_0001_compressed.jpg"
        );
        assert_eq!(
            OutputName::from_filename("scan.heif").file_name(),
            "scan_compressed.jpg"
        );
        assert!(is_heif("a.HEIF"));
        assert!(!is_heif("a.jpg"));
    }

    #[test]
    fn test_output_name_multiple_dots() {
        let name = OutputName::from_filename("my.photo.jpeg");
        assert_eq!(name.file_name(), "my.photo_compressed.jpeg");
    }

    #[test]
    fn test_extension_only_names() {
        let validator = default_validator();
        assert!(validator.is_allowed(".jpg"));
        assert!(validator.is_allowed(".HEIC"));
        assert!(!validator.is_allowed("photo."));

        assert_eq!(OutputName::from_filename(".png").file_name(), "image_compressed.png");
        assert_eq!(OutputName::from_filename(".heic").file_name(), "image_compressed.jpg");
        assert_eq!(OutputName::from_filename("README").file_name(), "README_compressed");
    }
}
