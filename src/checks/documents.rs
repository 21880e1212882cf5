//! Document CRUD checks against `/api/ocr/documents` and
//! `/api/ocr/document/{id}`.

use serde_json::{Value, json};

use super::{CheckContext, CheckOutcome};
use crate::error::{HarnessError, HarnessResult};
use crate::fixtures::UPDATED_OCR_TEXT;
use crate::models::{DocumentRecord, DocumentStatus, Pagination, expect_success, require_as};

pub const LIST: &str = "GET /api/ocr/documents";
pub const LIST_FILTERED: &str = "GET /api/ocr/documents (with filters)";
pub const GET: &str = "GET /api/ocr/document/:id";
pub const UPDATE: &str = "PATCH /api/ocr/document/:id";
pub const DELETE: &str = "DELETE /api/ocr/document/:id";
pub const GET_AFTER_DELETE: &str = "GET /api/ocr/document/:id (after delete)";

const FILTER_PAGE: u64 = 1;
const FILTER_LIMIT: u64 = 5;

fn document_path(id: &str) -> String {
    format!("/ocr/document/{}", id)
}

/// Fetches one document and decodes `data.document`.
fn fetch_document(ctx: &CheckContext, operation: &str, id: &str) -> HarnessResult<DocumentRecord> {
    let token = ctx.session.require_token(operation)?;
    let response = ctx.client.get(operation, &document_path(id), Some(token), &[])?;
    response.expect_status(operation, 200)?;
    let body = response.json(operation)?;
    expect_success(operation, &body)?;
    require_as(operation, &body, "/data/document")
}

/// Lists the user's documents without filters.
pub fn list_documents(ctx: &mut CheckContext) -> CheckOutcome {
    CheckOutcome::from_result(LIST, try_list(ctx))
}

fn try_list(ctx: &mut CheckContext) -> HarnessResult<String> {
    let token = ctx.session.require_token(LIST)?;
    let response = ctx.client.get(LIST, "/ocr/documents", Some(token), &[])?;
    response.expect_status(LIST, 200)?;
    let body = response.json(LIST)?;
    expect_success(LIST, &body)?;

    let documents: Vec<Value> = require_as(LIST, &body, "/data/documents")?;
    let pagination: Pagination = require_as(LIST, &body, "/data/pagination")?;
    Ok(format!(
        "Found {} documents, total: {}",
        documents.len(),
        pagination.total
    ))
}

/// Lists with `page`, `limit`, `status=COMPLETED` and `language` filters and
/// checks every returned document honours them.
pub fn list_documents_filtered(ctx: &mut CheckContext) -> CheckOutcome {
    CheckOutcome::from_result(LIST_FILTERED, try_list_filtered(ctx))
}

fn try_list_filtered(ctx: &mut CheckContext) -> HarnessResult<String> {
    let token = ctx.session.require_token(LIST_FILTERED)?;
    let language = ctx.client.config().language.clone();
    let status = DocumentStatus::Completed;
    let query = [
        ("page", FILTER_PAGE.to_string()),
        ("limit", FILTER_LIMIT.to_string()),
        ("status", status.as_str().to_string()),
        ("language", language.clone()),
    ];

    let response = ctx
        .client
        .get(LIST_FILTERED, "/ocr/documents", Some(token), &query)?;
    response.expect_status(LIST_FILTERED, 200)?;
    let body = response.json(LIST_FILTERED)?;
    expect_success(LIST_FILTERED, &body)?;

    let documents: Vec<DocumentRecord> = require_as(LIST_FILTERED, &body, "/data/documents")?;
    let pagination: Pagination = require_as(LIST_FILTERED, &body, "/data/pagination")?;
    verify_filtered(&documents, &pagination, &status, &language)?;

    Ok(format!(
        "Filters applied successfully ({} of {} documents)",
        documents.len(),
        pagination.total
    ))
}

fn verify_filtered(
    documents: &[DocumentRecord],
    pagination: &Pagination,
    status: &DocumentStatus,
    language: &str,
) -> HarnessResult<()> {
    let count = documents.len() as u64;
    if count > FILTER_LIMIT {
        return Err(HarnessError::mismatch(
            LIST_FILTERED,
            "data.documents.length",
            format!("at most {}", FILTER_LIMIT),
            count.to_string(),
        ));
    }
    if pagination.total < count {
        return Err(HarnessError::mismatch(
            LIST_FILTERED,
            "data.pagination.total",
            format!("at least {}", count),
            pagination.total.to_string(),
        ));
    }
    for doc in documents {
        if doc.status.as_ref() != Some(status) {
            return Err(HarnessError::mismatch(
                LIST_FILTERED,
                "document.status",
                status.as_str(),
                doc.status.as_ref().map(|s| s.as_str()).unwrap_or("<missing>"),
            ));
        }
        if doc.language.as_deref() != Some(language) {
            return Err(HarnessError::mismatch(
                LIST_FILTERED,
                "document.language",
                language,
                doc.language.as_deref().unwrap_or("<missing>"),
            ));
        }
    }
    Ok(())
}

/// Fetches the uploaded document.
pub fn get_document(ctx: &mut CheckContext) -> CheckOutcome {
    CheckOutcome::from_result(GET, try_get(ctx))
}

fn try_get(ctx: &mut CheckContext) -> HarnessResult<String> {
    ctx.session.require_token(GET)?;
    let id = ctx.session.require_document_id(GET)?.to_string();
    let document = fetch_document(ctx, GET, &id)?;
    let status = document
        .status
        .map(|s| s.to_string())
        .unwrap_or_else(|| "unknown".to_string());
    Ok(format!("Document status: {}", status))
}

/// Replaces the document's OCR text, then reads it back.
pub fn update_document(ctx: &mut CheckContext) -> CheckOutcome {
    CheckOutcome::from_result(UPDATE, try_update(ctx))
}

fn try_update(ctx: &mut CheckContext) -> HarnessResult<String> {
    let token = ctx.session.require_token(UPDATE)?;
    let id = ctx.session.require_document_id(UPDATE)?;
    let path = document_path(id);

    let response = ctx.client.patch_json(
        UPDATE,
        &path,
        Some(token),
        &json!({ "ocrText": UPDATED_OCR_TEXT }),
    )?;
    response.expect_status(UPDATE, 200)?;
    let body = response.json(UPDATE)?;
    expect_success(UPDATE, &body)?;
    let updated: DocumentRecord = require_as(UPDATE, &body, "/data/document")?;
    expect_ocr_text(&updated, "data.document.ocrText")?;

    // Read back so a response that merely echoes the request is not enough.
    let id = id.to_string();
    let stored = fetch_document(ctx, UPDATE, &id)?;
    expect_ocr_text(&stored, "document.ocrText (re-fetched)")?;
    Ok("OCR text updated successfully".to_string())
}

fn expect_ocr_text(document: &DocumentRecord, field: &str) -> HarnessResult<()> {
    if document.ocr_text.as_deref() == Some(UPDATED_OCR_TEXT) {
        Ok(())
    } else {
        Err(HarnessError::mismatch(
            UPDATE,
            field,
            UPDATED_OCR_TEXT,
            document.ocr_text.clone().unwrap_or_else(|| "<missing>".to_string()),
        ))
    }
}

/// Deletes the uploaded document.
pub fn delete_document(ctx: &mut CheckContext) -> CheckOutcome {
    CheckOutcome::from_result(DELETE, try_delete(ctx))
}

fn try_delete(ctx: &mut CheckContext) -> HarnessResult<String> {
    let token = ctx.session.require_token(DELETE)?;
    let id = ctx.session.require_document_id(DELETE)?;
    let response = ctx.client.delete(DELETE, &document_path(id), Some(token))?;
    response.expect_status(DELETE, 200)?;
    let body = response.json(DELETE)?;
    expect_success(DELETE, &body)?;
    Ok("Document deleted successfully".to_string())
}

/// The deleted document must no longer be found.
pub fn get_deleted_document(ctx: &mut CheckContext) -> CheckOutcome {
    CheckOutcome::from_result(GET_AFTER_DELETE, try_get_deleted(ctx))
}

fn try_get_deleted(ctx: &mut CheckContext) -> HarnessResult<String> {
    let token = ctx.session.require_token(GET_AFTER_DELETE)?;
    let id = ctx.session.require_document_id(GET_AFTER_DELETE)?;
    let response = ctx
        .client
        .get(GET_AFTER_DELETE, &document_path(id), Some(token), &[])?;
    if response.status != 404 {
        return Err(HarnessError::unexpected_status(
            GET_AFTER_DELETE,
            404,
            response.status,
            "",
        ));
    }
    ctx.session.clear_document_id();
    Ok("Deleted document is no longer found".to_string())
}
