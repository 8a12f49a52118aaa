//! Chapter upload client and the upload dialog's series selector.
//!
//! The server side of `/upload` is not part of this crate; only the request
//! shape and the status text shown to the user are.

use std::future::Future;

use reqwest::multipart::{Form, Part};
use reqwest::Client;
use url::Url;

use crate::error::YomikomiError;
use crate::models::SeriesRecord;
use crate::paths;

/// Value of the selector option that means "create a new series".
pub const NEW_SERIES_VALUE: &str = "new";
pub const NEW_SERIES_LABEL: &str = "+ New Series";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    pub series: String,
    /// Sent as entered; the server interprets it.
    pub chapter: String,
    pub images: Vec<UploadFile>,
}

/// Raw contents of the upload dialog.
#[derive(Debug, Clone, Default)]
pub struct UploadForm {
    /// Selected option value; [`NEW_SERIES_VALUE`] means use `new_series_name`.
    pub selection: String,
    pub new_series_name: String,
    pub chapter: String,
    pub images: Vec<UploadFile>,
}

impl UploadForm {
    pub fn series_name(&self) -> &str {
        if self.selection == NEW_SERIES_VALUE {
            &self.new_series_name
        } else {
            &self.selection
        }
    }

    pub fn into_request(self) -> Result<UploadRequest, YomikomiError> {
        let series = self.series_name().to_string();
        if series.is_empty() {
            return Err(YomikomiError::Validation("Series name is required.".into()));
        }
        Ok(UploadRequest {
            series,
            chapter: self.chapter,
            images: self.images,
        })
    }
}

pub trait Uploader: Send + Sync {
    /// Send one chapter. Single attempt.
    fn upload(&self, request: UploadRequest)
        -> impl Future<Output = Result<(), YomikomiError>> + Send;
}

/// POSTs a multipart form to `<base>/upload`.
pub struct HttpUploader {
    endpoint: Url,
    http: Client,
}

impl HttpUploader {
    pub fn new(base: &Url) -> Result<Self, YomikomiError> {
        Ok(Self {
            endpoint: paths::site_base(base.clone()).join("upload")?,
            http: Client::new(),
        })
    }

    pub fn with_client(mut self, http: Client) -> Self {
        self.http = http;
        self
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn form(request: UploadRequest) -> Form {
        request.images.into_iter().fold(
            Form::new()
                .text("series", request.series)
                .text("chapter", request.chapter),
            |form, image| form.part("images", Part::bytes(image.bytes).file_name(image.file_name)),
        )
    }

    /// Fails with the response body as the message on a non-success status.
    async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, YomikomiError> {
        if resp.status().is_success() {
            Ok(resp)
        } else {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            tracing::warn!(status, "Upload rejected");
            Err(YomikomiError::Upload {
                status,
                message: body,
            })
        }
    }
}

impl Uploader for HttpUploader {
    async fn upload(&self, request: UploadRequest) -> Result<(), YomikomiError> {
        tracing::info!(
            series = %request.series,
            chapter = %request.chapter,
            images = request.images.len(),
            "Uploading chapter"
        );
        let resp = self
            .http
            .post(self.endpoint.clone())
            .multipart(Self::form(request))
            .send()
            .await?;
        Self::check_response(resp).await?;
        Ok(())
    }
}

/// Status line of the upload dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadStatus {
    Uploading,
    Invalid(String),
    Succeeded,
    Failed(String),
}

impl UploadStatus {
    pub fn message(&self) -> String {
        match self {
            Self::Uploading => "Uploading... Please wait.".into(),
            Self::Invalid(reason) => format!("Error: {reason}"),
            Self::Succeeded => "✅ Upload Successful! Refreshing...".into(),
            Self::Failed(reason) => format!("❌ Upload Failed: {reason}"),
        }
    }

    /// Text color, when the status sets one.
    pub fn color(&self) -> Option<&'static str> {
        match self {
            Self::Uploading => Some("#bb86fc"),
            Self::Invalid(_) => None,
            Self::Succeeded => Some("#00e676"),
            Self::Failed(_) => Some("#ff4757"),
        }
    }

    /// The page should reload after a successful upload.
    pub fn should_reload(&self) -> bool {
        matches!(self, Self::Succeeded)
    }
}

/// Validate and send `form`, reporting every status change to `on_status`.
///
/// Returns the final status.
pub async fn submit<U, F>(uploader: &U, form: UploadForm, mut on_status: F) -> UploadStatus
where
    U: Uploader,
    F: FnMut(&UploadStatus),
{
    on_status(&UploadStatus::Uploading);

    let status = match form.into_request() {
        Err(YomikomiError::Validation(reason)) => UploadStatus::Invalid(reason),
        Err(e) => UploadStatus::Failed(e.to_string()),
        Ok(request) => match uploader.upload(request).await {
            Ok(()) => UploadStatus::Succeeded,
            Err(e) => {
                tracing::error!(error = %e, "Upload failed");
                UploadStatus::Failed(e.to_string())
            }
        },
    };

    on_status(&status);
    status
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

/// Series dropdown of the upload dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesSelector {
    options: Vec<SelectOption>,
    selected: String,
    new_series_visible: bool,
}

impl Default for SeriesSelector {
    fn default() -> Self {
        Self {
            options: vec![new_series_option()],
            selected: NEW_SERIES_VALUE.into(),
            new_series_visible: true,
        }
    }
}

fn new_series_option() -> SelectOption {
    SelectOption {
        value: NEW_SERIES_VALUE.into(),
        label: NEW_SERIES_LABEL.into(),
    }
}

impl SeriesSelector {
    pub fn options(&self) -> &[SelectOption] {
        &self.options
    }

    pub fn selected(&self) -> &str {
        &self.selected
    }

    /// Whether the new-series name field is shown.
    pub fn new_series_visible(&self) -> bool {
        self.new_series_visible
    }

    /// Rebuild the options from the catalog, keeping the current selection
    /// when it still names a series. An empty catalog leaves it as is.
    pub fn populate(&mut self, records: &[SeriesRecord]) {
        if records.is_empty() {
            return;
        }
        let current = std::mem::take(&mut self.selected);

        self.options = std::iter::once(new_series_option())
            .chain(records.iter().map(|r| SelectOption {
                value: r.id.clone(),
                label: r.title.clone(),
            }))
            .collect();

        let keep = current != NEW_SERIES_VALUE && self.options.iter().any(|o| o.value == current);
        if keep {
            self.selected = current;
            self.new_series_visible = false;
        } else {
            self.selected = NEW_SERIES_VALUE.into();
        }
    }

    /// Change the selection. Unknown values are ignored.
    pub fn select(&mut self, value: &str) {
        if !self.options.iter().any(|o| o.value == value) {
            return;
        }
        self.selected = value.to_string();
        self.new_series_visible = value == NEW_SERIES_VALUE;
    }
}
