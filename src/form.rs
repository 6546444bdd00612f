use axum::extract::{multipart::MultipartError, Multipart};

use crate::error::{AppError, AppResult};
use crate::images::services::UploadItem;

/// A decoded `multipart/form-data` body: text fields in submission order and
/// at most one file.
#[derive(Debug, Default)]
pub struct FormData {
    pub fields: Vec<(String, String)>,
    pub file: Option<UploadItem>,
}

impl FormData {
    /// Reads the whole body. Only parts named in `file_fields` may carry a
    /// file, and only one such part is accepted.
    pub async fn read(mut mp: Multipart, file_fields: &[&str]) -> AppResult<Self> {
        let mut form = FormData::default();
        while let Some(field) = mp.next_field().await.map_err(bad_multipart)? {
            let name = field.name().unwrap_or_default().to_string();

            if field.file_name().is_some() || file_fields.contains(&name.as_str()) {
                if !file_fields.contains(&name.as_str()) {
                    return Err(AppError::validation(format!("unexpected file field: {}", name)));
                }
                if form.file.is_some() {
                    return Err(AppError::validation("exactly one image is allowed"));
                }
                let content_type = field
                    .content_type()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "application/octet-stream".into());
                let body = field.bytes().await.map_err(bad_multipart)?;
                form.file = Some(UploadItem::new(body, content_type)?);
            } else {
                let value = field.text().await.map_err(bad_multipart)?;
                form.fields.push((name, value));
            }
        }
        Ok(form)
    }

    /// Removes and returns the first text field called `name`.
    pub fn take(&mut self, name: &str) -> Option<String> {
        let idx = self.fields.iter().position(|(k, _)| k == name)?;
        Some(self.fields.remove(idx).1)
    }
}

fn bad_multipart(e: MultipartError) -> AppError {
    AppError::validation(format!("invalid multipart body: {}", e.body_text()))
}
