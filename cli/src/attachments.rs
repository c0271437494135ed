use anyhow::{bail, Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use explorer_orchestrator::Part;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Reads an image file into an inline attachment
pub fn load(path: &Path) -> Result<Part> {
    let Some(mime_type) = mime_type_for(path) else {
        bail!(
            "Unsupported attachment type: {} (expected png, jpeg, webp, gif, heic or heif)",
            path.display()
        );
    };

    let bytes = fs::read(path)
        .with_context(|| format!("Failed to read attachment {}", path.display()))?;
    debug!(path = %path.display(), mime_type, bytes = bytes.len(), "Loaded attachment");

    Ok(Part::InlineAttachment {
        mime_type: mime_type.to_string(),
        base64_data: STANDARD.encode(bytes),
    })
}

fn mime_type_for(path: &Path) -> Option<&'static str> {
    let extension = path.extension()?.to_str()?.to_ascii_lowercase();
    match extension.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "webp" => Some("image/webp"),
        "gif" => Some("image/gif"),
        "heic" => Some("image/heic"),
        "heif" => Some("image/heif"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_mime_type_by_extension() {
        assert_eq!(mime_type_for(Path::new("shot.PNG")), Some("image/png"));
        assert_eq!(mime_type_for(Path::new("a/b/cover.jpg")), Some("image/jpeg"));
        assert_eq!(mime_type_for(Path::new("notes.txt")), None);
        assert_eq!(mime_type_for(Path::new("README")), None);
    }

    #[test]
    fn test_load_encodes_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("pixel.png");
        fs::write(&path, [0x89, b'P', b'N', b'G']).unwrap();

        let part = load(&path).unwrap();
        assert_eq!(
            part,
            Part::InlineAttachment {
                mime_type: "image/png".to_string(),
                base64_data: "iVBORw==".to_string(),
            }
        );
    }

    #[test]
    fn test_load_rejects_unknown_types() {
        let err = load(Path::new("/tmp/whatever.txt")).unwrap_err();
        assert!(err.to_string().contains("Unsupported attachment type"));
    }
}
