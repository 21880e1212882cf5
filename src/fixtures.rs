//! # Request Fixtures
//!
//! Test user credentials and upload payloads. The fixture values are
//! immutable; state that changes during a run (the current password) lives
//! in [`TestSession`](crate::config::session::TestSession).

use std::io::Cursor;

use image::{ImageFormat, Rgb, RgbImage};
use serde_json::{Value, json};

use crate::error::{HarnessError, HarnessResult};

/// Credentials of the account the checks sign up and log in with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestUser {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl Default for TestUser {
    fn default() -> Self {
        Self {
            name: "OCR Test User".to_string(),
            email: "demo@ocrplatform.com".to_string(),
            password: "demo123".to_string(),
        }
    }
}

impl TestUser {
    /// Signup body; the confirmation repeats the password.
    pub fn signup_body(&self) -> Value {
        json!({
            "name": self.name,
            "email": self.email,
            "password": self.password,
            "confirmPassword": self.password,
        })
    }

    /// Login body using `password`, which may differ from the fixture after rotation.
    pub fn login_body(&self, password: &str) -> Value {
        json!({
            "email": self.email,
            "password": password,
        })
    }
}

/// Name the profile check renames the user to.
pub const UPDATED_NAME: &str = "Updated OCR Test User";

/// Password the profile check rotates to.
pub const ROTATED_PASSWORD: &str = "newdemo123";

/// Text written by the document update check.
pub const UPDATED_OCR_TEXT: &str = "Updated OCR text for testing purposes";

/// An upload body: file name, MIME type and raw bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

pub const TEST_IMAGE_WIDTH: u32 = 400;
pub const TEST_IMAGE_HEIGHT: u32 = 200;

/// A blank white 400x200 PNG named `test_image.png`.
pub fn test_image() -> HarnessResult<UploadFile> {
    let image = RgbImage::from_pixel(TEST_IMAGE_WIDTH, TEST_IMAGE_HEIGHT, Rgb([255, 255, 255]));
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(|e| HarnessError::fixture("test_image.png", e.to_string()))?;

    Ok(UploadFile {
        file_name: "test_image.png".to_string(),
        mime_type: "image/png".to_string(),
        bytes,
    })
}

/// A plain-text file the service must reject.
pub fn invalid_upload() -> UploadFile {
    UploadFile {
        file_name: "test.txt".to_string(),
        mime_type: "text/plain".to_string(),
        bytes: b"This is not an image".to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_is_png_of_expected_size() {
        let upload = test_image().unwrap();
        assert_eq!(upload.mime_type, "image/png");
        assert_eq!(&upload.bytes[..8], b"\x89PNG\r\n\x1a\n");

        let decoded = image::load_from_memory_with_format(&upload.bytes, ImageFormat::Png).unwrap();
        assert_eq!(decoded.width(), TEST_IMAGE_WIDTH);
        assert_eq!(decoded.height(), TEST_IMAGE_HEIGHT);
    }

    #[test]
    fn test_signup_body_repeats_password() {
        let body = TestUser::default().signup_body();
        assert_eq!(body["email"], "demo@ocrplatform.com");
        assert_eq!(body["confirmPassword"], body["password"]);
    }

    #[test]
    fn test_login_body_uses_given_password() {
        let body = TestUser::default().login_body(ROTATED_PASSWORD);
        assert_eq!(body["password"], "newdemo123");
        assert!(body.get("name").is_none());
    }
}
