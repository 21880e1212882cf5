//! OCR upload checks: a valid PNG is accepted and queued, a text file is
//! rejected with "Invalid file type".

use std::thread;

use reqwest::blocking::multipart::{Form, Part};

use super::{CheckContext, CheckOutcome};
use crate::error::{HarnessError, HarnessResult};
use crate::fixtures::{self, UploadFile};
use crate::models::{expect_success, require_id};

pub const UPLOAD: &str = "POST /api/ocr/upload";
pub const UPLOAD_INVALID: &str = "POST /api/ocr/upload (invalid file)";

const INVALID_FILE_TYPE: &str = "Invalid file type";

fn file_part(operation: &str, file: UploadFile) -> HarnessResult<Part> {
    Part::bytes(file.bytes)
        .file_name(file.file_name)
        .mime_str(&file.mime_type)
        .map_err(|e| HarnessError::fixture(operation, e.to_string()))
}

/// Uploads the generated PNG, stores the returned document id and then
/// waits for the service to process it.
pub fn upload_image(ctx: &mut CheckContext) -> CheckOutcome {
    CheckOutcome::from_result(UPLOAD, try_upload_image(ctx))
}

fn try_upload_image(ctx: &mut CheckContext) -> HarnessResult<String> {
    let token = ctx.session.require_token(UPLOAD)?;
    let image = fixtures::test_image()?;
    let form = Form::new()
        .part("file", file_part(UPLOAD, image)?)
        .text("language", ctx.client.config().language.clone());

    let response = ctx.client.post_multipart(UPLOAD, "/ocr/upload", Some(token), form)?;
    response.expect_status(UPLOAD, 200)?;
    let body = response.json(UPLOAD)?;
    expect_success(UPLOAD, &body)?;
    let document_id = require_id(UPLOAD, &body, "/data/documentId")?;
    ctx.session.set_document_id(document_id.clone());

    let wait = ctx.client.config().processing_wait;
    if !wait.is_zero() {
        tracing::info!(?wait, "waiting for OCR processing");
        thread::sleep(wait);
    }
    Ok(format!("Document ID: {}", document_id))
}

/// Uploads a plain-text file, which must be refused with 400.
pub fn upload_invalid_file(ctx: &mut CheckContext) -> CheckOutcome {
    CheckOutcome::from_result(UPLOAD_INVALID, try_upload_invalid(ctx))
}

fn try_upload_invalid(ctx: &mut CheckContext) -> HarnessResult<String> {
    let token = ctx.session.require_token(UPLOAD_INVALID)?;
    let form = Form::new().part("file", file_part(UPLOAD_INVALID, fixtures::invalid_upload())?);

    let response = ctx
        .client
        .post_multipart(UPLOAD_INVALID, "/ocr/upload", Some(token), form)?;
    if response.status != 400 {
        return Err(HarnessError::unexpected_status(UPLOAD_INVALID, 400, response.status, ""));
    }

    let body = response.json(UPLOAD_INVALID)?;
    let success = body.get("success").and_then(|v| v.as_bool()).unwrap_or(false);
    let error = body.get("error").and_then(|v| v.as_str()).unwrap_or("");
    if success || !error.contains(INVALID_FILE_TYPE) {
        return Err(HarnessError::mismatch(
            UPLOAD_INVALID,
            "error",
            INVALID_FILE_TYPE,
            body.to_string(),
        ));
    }
    Ok("Correctly rejected invalid file type".to_string())
}
