use anyhow::{Result, anyhow};

/// Maximum filename length accepted at the boundary
pub const MAX_FILENAME_LENGTH: usize = 255;

/// Filenames are taken mostly as-is (they end up embedded in the object
/// key), but must be present, bounded, and free of path separators.
pub fn validate_filename(filename: &str) -> Result<()> {
    if filename.trim().is_empty() {
        return Err(anyhow!("Filename must not be empty"));
    }
    if filename.len() > MAX_FILENAME_LENGTH {
        return Err(anyhow!(
            "Filename too long (max {} characters)",
            MAX_FILENAME_LENGTH
        ));
    }
    if filename.contains('/') || filename.contains('\\') {
        return Err(anyhow!("Filename must not contain path separators"));
    }
    Ok(())
}

/// The content type is trusted (not re-validated against the bytes), but
/// must at least look like a MIME type.
pub fn validate_content_type(content_type: &str) -> Result<()> {
    if content_type.trim().is_empty() {
        return Err(anyhow!("Content type must not be empty"));
    }
    if !content_type.contains('/') {
        return Err(anyhow!("Content type must be a MIME type"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_filename() {
        assert!(validate_filename("report.pdf").is_ok());
        assert!(validate_filename("a.png").is_ok());
    }

    #[test]
    fn test_empty_filename_rejected() {
        assert!(validate_filename("").is_err());
        assert!(validate_filename("   ").is_err());
    }

    #[test]
    fn test_path_separators_rejected() {
        assert!(validate_filename("../etc/passwd").is_err());
        assert!(validate_filename("a\\b.txt").is_err());
    }

    #[test]
    fn test_overlong_filename_rejected() {
        let name = "a".repeat(MAX_FILENAME_LENGTH + 1);
        assert!(validate_filename(&name).is_err());
    }

    #[test]
    fn test_content_type() {
        assert!(validate_content_type("image/png").is_ok());
        assert!(validate_content_type("").is_err());
        assert!(validate_content_type("png").is_err());
    }
}
