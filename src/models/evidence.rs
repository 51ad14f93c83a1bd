use serde::{Deserialize, Serialize};

use crate::selector::SelectionRect;

/// The form fields accompanying an evidence image.
#[derive(Clone, Debug)]
pub struct EvidenceForm {
    /// The student the graded assessment belongs to.
    pub estudiante_id: String,
    /// The course the assessment was taken in.
    pub materia_id: String,
    /// The course group.
    pub grupo: String,
    /// The assessment ("aporte") the evidence documents.
    pub aporte: String,
}

/// The response payload for a temporary evidence upload.
#[derive(Clone, Debug, Deserialize)]
pub struct UploadTempResponse {
    /// Server-generated id of the temporary file.
    pub temp_id: String,
    /// The temporary filename to reference in the redact-and-save step.
    pub temp_filename: String,
    /// URL the selector loads the preview image from.
    pub preview_url: String,
    /// Human-readable confirmation text.
    pub message: String,
}

/// The request payload for the redact-and-save step.
///
/// `crop_area` is the selector's final rectangle in image-pixel coordinates,
/// or `None` when no redaction was requested. The server treats a zero-area
/// rectangle exactly like `None`; the client forwards degenerate rectangles
/// unchanged rather than deciding for the server.
#[derive(Clone, Debug, Serialize)]
pub struct SaveRedactedRequest {
    pub temp_filename: String,
    pub estudiante_id: String,
    pub materia_id: String,
    pub grupo: String,
    pub aporte: String,
    pub descripcion: String,
    pub crop_area: Option<SelectionRect>,
}

/// The response payload for a stored, redacted evidence.
#[derive(Clone, Debug, Deserialize)]
pub struct SaveRedactedResponse {
    /// Database id of the stored evidence.
    pub id: String,
    /// The internal linking code shown to the instructor.
    pub codigo_interno: String,
    /// Human-readable confirmation text.
    pub message: String,
    /// Hashed filename the image was stored under.
    pub archivo_hash: String,
    /// Resolved course name.
    pub materia_nombre: String,
}
