use std::path::Path;
use std::time::Duration;

use reqwest::blocking::{multipart, Client, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::model::{CaptureStatus, JobRecord, JobRef, JobSummary};
use crate::service::api::JobService;

#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: String,
}

#[derive(Debug, Serialize)]
struct StartBody<'a> {
    title: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct RenameBody<'a> {
    title: &'a str,
}

/// HTTP implementation of [`JobService`] against the `/api` surface of the
/// recording server.
pub struct HttpJobService {
    client: Client,
    base_url: String,
}

impl HttpJobService {
    /// `timeout` of zero means no request timeout; a hung request then stalls
    /// only its own tick's turnaround, never the timers.
    pub fn new(base_url: &str, timeout: Duration) -> AppResult<Self> {
        let mut builder = Client::builder();
        if !timeout.is_zero() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api{path}", self.base_url)
    }

    fn decode<T: DeserializeOwned>(response: Response) -> AppResult<T> {
        if response.status().is_success() {
            Ok(response.json::<T>()?)
        } else {
            Err(service_error(response))
        }
    }

    fn expect_success(response: Response) -> AppResult<()> {
        if response.status().is_success() {
            Ok(())
        } else {
            Err(service_error(response))
        }
    }
}

fn service_error(response: Response) -> AppError {
    let status = response.status();
    let detail = response
        .json::<ErrorBody>()
        .map(|body| body.detail)
        .unwrap_or_else(|_| {
            status
                .canonical_reason()
                .unwrap_or("unrecognized server error")
                .to_owned()
        });

    AppError::Service {
        status: status.as_u16(),
        detail,
    }
}

impl JobService for HttpJobService {
    fn capture_status(&self) -> AppResult<CaptureStatus> {
        Self::decode(self.client.get(self.url("/status")).send()?)
    }

    fn list_jobs(&self) -> AppResult<Vec<JobSummary>> {
        Self::decode(self.client.get(self.url("/recordings")).send()?)
    }

    fn get_job(&self, id: &str) -> AppResult<JobRecord> {
        Self::decode(self.client.get(self.url(&format!("/recordings/{id}"))).send()?)
    }

    fn start_capture(&self, title: Option<&str>) -> AppResult<JobRef> {
        let response = self
            .client
            .post(self.url("/recording/start"))
            .json(&StartBody { title })
            .send()?;
        Self::decode(response)
    }

    fn stop_capture(&self) -> AppResult<JobRef> {
        Self::decode(self.client.post(self.url("/recording/stop")).send()?)
    }

    fn import_file(&self, path: &Path) -> AppResult<JobRef> {
        let form = multipart::Form::new().file("file", path)?;
        let response = self
            .client
            .post(self.url("/recordings/import"))
            .multipart(form)
            .send()?;
        Self::decode(response)
    }

    fn rename_job(&self, id: &str, title: &str) -> AppResult<()> {
        let response = self
            .client
            .put(self.url(&format!("/recordings/{id}")))
            .json(&RenameBody { title })
            .send()?;
        Self::expect_success(response)
    }

    fn transcribe(&self, id: &str) -> AppResult<()> {
        let response = self
            .client
            .post(self.url(&format!("/recordings/{id}/transcribe")))
            .send()?;
        Self::expect_success(response)
    }

    fn summarize(&self, id: &str) -> AppResult<()> {
        let response = self
            .client
            .post(self.url(&format!("/recordings/{id}/summarize")))
            .send()?;
        Self::expect_success(response)
    }

    fn process(&self, id: &str) -> AppResult<()> {
        let response = self
            .client
            .post(self.url(&format!("/recordings/{id}/process")))
            .send()?;
        Self::expect_success(response)
    }

    fn delete_job(&self, id: &str) -> AppResult<()> {
        let response = self
            .client
            .delete(self.url(&format!("/recordings/{id}")))
            .send()?;
        Self::expect_success(response)
    }
}
