//! Pick / upload / generate / reload actions and the alert text they produce.

use super::picker::{ImagePicker, PermissionStatus};
use crate::api::{ApiError, UploadRequest};
use crate::config::UPLOAD_FILENAME;
use crate::scene::ModelLoadError;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;

pub const PERMISSION_REQUIRED: &str = "Permission to access camera roll is required!";
pub const NO_IMAGE_PICKED: &str = "No image was selected!";
pub const RELOAD_SUCCEEDED: &str = "Success: Model reloaded successfully";
pub const RELOAD_FAILED: &str = "Error: Could not reload model";
pub const INITIAL_LOAD_FAILED: &str = "Error: Could not load model";
pub const GENERATE_FAILED: &str = "Failed to generate model";

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("No image selected.")]
    NoImageSelected,
    #[error("Please enter a valid height.")]
    InvalidHeight,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickOutcome {
    Selected(String),
    PermissionDenied,
    NothingSelected,
}

pub fn pick_image(picker: &mut dyn ImagePicker) -> PickOutcome {
    if picker.request_permission() != PermissionStatus::Granted {
        return PickOutcome::PermissionDenied;
    }

    match picker.pick().into_iter().next() {
        Some(asset) => PickOutcome::Selected(asset.uri),
        None => PickOutcome::NothingSelected,
    }
}

/// Height in meters: a finite number greater than zero.
pub fn parse_height(text: &str) -> Result<f64, ValidationError> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|h| h.is_finite() && *h > 0.)
        .ok_or(ValidationError::InvalidHeight)
}

/// Base64 image content for the upload body.
///
/// `data:` URIs carry their payload after the comma; anything else is read
/// as a local file. `None` when there is nothing readable.
pub fn encode_image(uri: &str) -> Option<String> {
    if uri.starts_with("data:image") {
        return uri.split(',').nth(1).map(str::to_string);
    }

    let path = uri.strip_prefix("file://").unwrap_or(uri);
    match std::fs::read(path) {
        Ok(bytes) => Some(STANDARD.encode(bytes)),
        Err(e) => {
            log::warn!("Could not read image {}: {}", path, e);
            None
        }
    }
}

/// A validated upload whose image has not been read yet.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadDraft {
    pub image_uri: String,
    pub height: f64,
}

impl UploadDraft {
    /// Reads and encodes the image. Blocks on file I/O, so run it off the UI thread.
    pub fn into_request(self) -> UploadRequest {
        UploadRequest {
            file: encode_image(&self.image_uri),
            filename: UPLOAD_FILENAME.to_string(),
            height: self.height,
        }
    }
}

/// Validates local preconditions. Nothing is sent unless this succeeds.
pub fn validate_upload(
    selected_image: Option<&str>,
    height: &str,
) -> Result<UploadDraft, ValidationError> {
    let image = selected_image.ok_or(ValidationError::NoImageSelected)?;
    let height = parse_height(height)?;

    Ok(UploadDraft {
        image_uri: image.to_string(),
        height,
    })
}

pub fn upload_notice(result: &Result<String, ApiError>) -> String {
    match result {
        Ok(message) => format!("Image uploaded successfully: {}", message),
        Err(ApiError::Status { message, .. }) => format!("Failed to upload image: {}", message),
        Err(e) => format!("Error uploading image: {}", e),
    }
}

pub fn generate_notice(result: &Result<String, ApiError>) -> String {
    match result {
        Ok(message) => format!("Success: {}", message),
        Err(ApiError::Status { .. }) => format!("Error: {}", GENERATE_FAILED),
        Err(e) => format!("Error: {}", e),
    }
}

pub fn reload_notice(result: &Result<(), ModelLoadError>) -> String {
    match result {
        Ok(()) => RELOAD_SUCCEEDED.to_string(),
        Err(_) => RELOAD_FAILED.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::picker::PickedAsset;

    struct FakePicker {
        permission: PermissionStatus,
        assets: Vec<PickedAsset>,
    }

    impl ImagePicker for FakePicker {
        fn request_permission(&mut self) -> PermissionStatus {
            self.permission
        }

        fn pick(&mut self) -> Vec<PickedAsset> {
            self.assets.clone()
        }
    }

    #[test]
    fn test_height_validation() {
        assert_eq!(parse_height("1.75"), Ok(1.75));
        assert_eq!(parse_height(" 2 "), Ok(2.0));
        for bad in ["", "   ", "abc", "-5", "0", "NaN", "inf", "1.7m"] {
            assert_eq!(
                parse_height(bad),
                Err(ValidationError::InvalidHeight),
                "{bad:?}"
            );
        }
    }

    #[test]
    fn test_missing_image_checked_first() {
        assert_eq!(
            validate_upload(None, "abc"),
            Err(ValidationError::NoImageSelected)
        );
        assert_eq!(
            validate_upload(Some("data:image/png;base64,AAAA"), "0"),
            Err(ValidationError::InvalidHeight)
        );
    }

    #[test]
    fn test_data_uri_payload_is_sent() {
        let draft = validate_upload(Some("data:image/jpeg;base64,/9j/4AAQ"), "1.75").unwrap();
        assert_eq!(draft.height, 1.75);
        let request = draft.into_request();
        assert_eq!(request.file.as_deref(), Some("/9j/4AAQ"));
        assert_eq!(request.filename, "uploaded_image.jpg");
        assert_eq!(request.height, 1.75);
    }

    #[test]
    fn test_local_file_is_base64_encoded() {
        let path = std::env::temp_dir().join("mannequin-upload-test.jpg");
        std::fs::write(&path, [0xFF, 0xD8, 0xFF]).unwrap();

        let encoded = encode_image(&path.to_string_lossy());
        assert_eq!(encoded.as_deref(), Some("/9j/"));
    }

    #[test]
    fn test_validation_does_not_read_image() {
        let draft = validate_upload(Some("/definitely/not/here.jpg"), "1.8").unwrap();
        assert_eq!(draft.image_uri, "/definitely/not/here.jpg");
        assert_eq!(draft.into_request().file, None);
    }

    #[test]
    fn test_unreadable_file_sends_null() {
        assert_eq!(encode_image("/definitely/not/here.jpg"), None);
    }

    #[test]
    fn test_pick_outcomes() {
        let mut denied = FakePicker {
            permission: PermissionStatus::Denied,
            assets: vec![PickedAsset { uri: "a.jpg".into() }],
        };
        assert_eq!(pick_image(&mut denied), PickOutcome::PermissionDenied);

        let mut cancelled = FakePicker {
            permission: PermissionStatus::Granted,
            assets: vec![],
        };
        assert_eq!(pick_image(&mut cancelled), PickOutcome::NothingSelected);

        let mut picked = FakePicker {
            permission: PermissionStatus::Granted,
            assets: vec![
                PickedAsset { uri: "first.jpg".into() },
                PickedAsset { uri: "second.jpg".into() },
            ],
        };
        assert_eq!(
            pick_image(&mut picked),
            PickOutcome::Selected("first.jpg".into())
        );
    }

    #[test]
    fn test_server_messages_are_reported_verbatim() {
        assert_eq!(
            upload_notice(&Ok("stored".into())),
            "Image uploaded successfully: stored"
        );
        assert_eq!(
            upload_notice(&Err(ApiError::Status {
                status: 400,
                message: "No file part".into()
            })),
            "Failed to upload image: No file part"
        );
        assert_eq!(
            upload_notice(&Err(ApiError::Transport("connection refused".into()))),
            "Error uploading image: connection refused"
        );

        assert_eq!(generate_notice(&Ok("done".into())), "Success: done");
        assert_eq!(
            generate_notice(&Err(ApiError::Status {
                status: 500,
                message: "boom".into()
            })),
            "Error: Failed to generate model"
        );
    }
}
