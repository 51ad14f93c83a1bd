use reqwest::multipart;

use crate::{
    client::ApiClient,
    error::{AppError, Result},
    models::evidence::{EvidenceForm, SaveRedactedRequest, SaveRedactedResponse, UploadTempResponse},
    selector::SelectionRect,
    validation::auth::ensure_image_bytes,
};

/// The evidence upload flow the region selector feeds.
///
/// Two steps: a multipart upload of the raw image to temporary storage, then
/// a redact-and-save call carrying the selector's final rectangle. Abandoning
/// the flow simply drops the temp handle; the server cleans up on its own.
#[derive(Clone)]
pub struct EvidenceService {
    client: ApiClient,
}

impl EvidenceService {
    /// Creates a new `EvidenceService` over the shared API client.
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Uploads an evidence image to temporary storage for previewing.
    ///
    /// The bytes must sniff as an image; this is checked locally before any
    /// network call.
    ///
    /// # Arguments
    ///
    /// * `form` - The evidence form fields.
    /// * `bytes` - The image file content.
    /// * `filename` - The original filename.
    ///
    /// # Returns
    ///
    /// A `Result` containing the temp handle and preview URL.
    pub async fn upload_temp(
        &self,
        form: &EvidenceForm,
        bytes: Vec<u8>,
        filename: &str,
    ) -> Result<UploadTempResponse> {
        let mime = ensure_image_bytes(&bytes)?;

        tracing::info!(
            "📤 Uploading temp evidence: {} ({} bytes, {})",
            filename,
            bytes.len(),
            mime
        );

        let part = multipart::Part::bytes(bytes)
            .file_name(filename.to_string())
            .mime_str(mime)?;

        let multipart = multipart::Form::new()
            .part("archivo", part)
            .text("estudiante_id", form.estudiante_id.clone())
            .text("materia_id", form.materia_id.clone())
            .text("grupo", form.grupo.clone())
            .text("aporte", form.aporte.clone());

        let response = self
            .client
            .send(
                self.client
                    .post("/docente/evidencias/upload-temp")
                    .multipart(multipart),
            )
            .await?;
        let uploaded: UploadTempResponse = self.client.expect_json(response).await?;

        tracing::info!("✅ Temp evidence uploaded: {}", uploaded.temp_filename);

        Ok(uploaded)
    }

    /// Fetches the preview image for the region selector.
    ///
    /// The server returns `preview_url` as an absolute path on its origin,
    /// outside the API prefix.
    pub async fn fetch_preview(&self, preview_url: &str) -> Result<Vec<u8>> {
        let base = reqwest::Url::parse(self.client.backend_url())
            .map_err(|e| AppError::Internal(format!("Invalid backend URL: {}", e)))?;
        let url = base
            .join(preview_url)
            .map_err(|e| AppError::Internal(format!("Invalid preview URL: {}", e)))?;

        tracing::debug!("🖼️ Fetching preview image: {}", url);

        let response = self.client.send(self.client.get_url(url)).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Api(format!("HTTP {}", status)));
        }

        Ok(response.bytes().await?.to_vec())
    }

    /// Redacts the selected area server-side and stores the final evidence.
    ///
    /// The rectangle is forwarded exactly as the selector reported it,
    /// degenerate (zero-area) rectangles included: the server treats zero
    /// area the same as `None`, meaning no redaction was requested.
    ///
    /// # Arguments
    ///
    /// * `temp_filename` - The handle returned by [`Self::upload_temp`].
    /// * `form` - The evidence form fields.
    /// * `descripcion` - Free-text description.
    /// * `crop_area` - The selector's final rectangle, if any.
    ///
    /// # Returns
    ///
    /// A `Result` containing the stored evidence summary.
    pub async fn save_redacted(
        &self,
        temp_filename: &str,
        form: &EvidenceForm,
        descripcion: &str,
        crop_area: Option<SelectionRect>,
    ) -> Result<SaveRedactedResponse> {
        tracing::info!(
            "✂️ Saving evidence {} with crop_area: {:?}",
            temp_filename,
            crop_area
        );

        let payload = SaveRedactedRequest {
            temp_filename: temp_filename.to_string(),
            estudiante_id: form.estudiante_id.clone(),
            materia_id: form.materia_id.clone(),
            grupo: form.grupo.clone(),
            aporte: form.aporte.clone(),
            descripcion: descripcion.to_string(),
            crop_area,
        };

        let response = self
            .client
            .send(
                self.client
                    .post("/docente/evidencias/recortar")
                    .json(&payload),
            )
            .await?;
        let saved: SaveRedactedResponse = self.client.expect_json(response).await?;

        tracing::info!(
            "✅ Evidence saved: {} (hash: {})",
            saved.codigo_interno,
            saved.archivo_hash
        );

        Ok(saved)
    }
}
