use actix_multipart::Multipart;
use futures::TryStreamExt;

use super::error::DetectionError;
use super::models::MediaSource;

#[derive(Debug, Default)]
pub struct MediaForm {
    pub file: Option<UploadedFile>,
    pub url: Option<String>,
}

#[derive(Debug)]
pub struct UploadedFile {
    pub bytes: Vec<u8>,
    pub file_name: Option<String>,
}

impl MediaForm {
    /// Collects the `file` and `url` parts; other parts are ignored.
    pub async fn from_multipart(mut payload: Multipart) -> Result<Self, DetectionError> {
        let mut form = MediaForm::default();

        while let Some(mut field) = payload.try_next().await.map_err(malformed)? {
            let name = field.name().unwrap_or_default().to_string();
            let file_name = field
                .content_disposition()
                .and_then(|cd| cd.get_filename())
                .map(str::to_string);

            let mut data = Vec::new();
            while let Some(chunk) = field.try_next().await.map_err(malformed)? {
                data.extend_from_slice(&chunk);
            }

            match name.as_str() {
                "file" if !data.is_empty() => {
                    if form.file.is_some() {
                        return Err(repeated("file"));
                    }
                    form.file = Some(UploadedFile {
                        bytes: data,
                        file_name,
                    });
                }
                "url" => {
                    let url = String::from_utf8(data).map_err(|_| {
                        DetectionError::InvalidInput("url must be valid UTF-8".to_string())
                    })?;
                    if url.trim().is_empty() {
                        continue;
                    }
                    if form.url.is_some() {
                        return Err(repeated("url"));
                    }
                    form.url = Some(url);
                }
                _ => {}
            }
        }

        Ok(form)
    }

    pub fn into_source(self) -> Result<MediaSource, DetectionError> {
        select_source(self.file, self.url)
    }
}

/// Exactly one of an uploaded file or a URL must be present.
pub fn select_source(
    file: Option<UploadedFile>,
    url: Option<String>,
) -> Result<MediaSource, DetectionError> {
    let file = file.filter(|f| !f.bytes.is_empty());
    let url = url
        .map(|u| u.trim().to_string())
        .filter(|u| !u.is_empty());

    match (file, url) {
        (Some(file), None) => Ok(MediaSource::Inline {
            bytes: file.bytes,
            file_name: file.file_name,
        }),
        (None, Some(url)) => Ok(MediaSource::RemoteUrl(url)),
        (None, None) => Err(DetectionError::InvalidInput(
            "Either file or url must be provided".to_string(),
        )),
        (Some(_), Some(_)) => Err(DetectionError::InvalidInput(
            "Provide either file or url, not both".to_string(),
        )),
    }
}

fn repeated(part: &str) -> DetectionError {
    DetectionError::InvalidInput(format!(
        "Provide a single file or url, got more than one '{}' part",
        part
    ))
}

fn malformed(err: actix_multipart::MultipartError) -> DetectionError {
    DetectionError::InvalidInput(format!("Malformed multipart body: {}", err))
}
