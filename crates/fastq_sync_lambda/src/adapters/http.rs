use std::future::Future;
use std::time::Duration;

use fastq_sync_core::error::SyncError;
use fastq_sync_core::jobs::{Job, JobType, UnarchivingJob, UnarchivingJobStatus};
use fastq_sync_core::model::{FastqRecord, FastqSet};
use fastq_sync_core::workflow::{WorkflowRunDetail, WorkflowRunRef};
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;

use super::fastq::FastqApi;
use super::unarchiving::UnarchivingApi;
use super::workflow::WorkflowApi;

/// Base URLs of the services this runtime talks to, without trailing slashes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceEndpoints {
    pub fastq: String,
    pub unarchiving: String,
    pub workflow: String,
}

impl ServiceEndpoints {
    pub fn for_hostname(hostname: &str) -> Self {
        let hostname = hostname.trim().trim_end_matches('/');
        Self {
            fastq: format!("https://fastq.{hostname}"),
            unarchiving: format!("https://fastq-unarchiving.{hostname}"),
            workflow: format!("https://workflow.{hostname}"),
        }
    }
}

/// List endpoints answer either a bare array or a `{"results": [...]}` page.
/// Only the first page is read.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ListBody<T> {
    Page { results: Vec<T> },
    Bare(Vec<T>),
}

impl<T> ListBody<T> {
    fn into_items(self) -> Vec<T> {
        match self {
            Self::Page { results } => results,
            Self::Bare(items) => items,
        }
    }
}

/// `reqwest`-backed client for the fastq, unarchiving and workflow services.
///
/// Calls are bridged onto the current Tokio runtime, so methods must run on a
/// multi-threaded runtime worker.
#[derive(Debug, Clone)]
pub struct HttpServiceClient {
    client: Client,
    endpoints: ServiceEndpoints,
}

impl HttpServiceClient {
    pub fn new(endpoints: ServiceEndpoints, timeout: Duration) -> Result<Self, SyncError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|error| {
                SyncError::Configuration(format!("failed to build HTTP client: {error}"))
            })?;
        Ok(Self { client, endpoints })
    }

    pub fn endpoints(&self) -> &ServiceEndpoints {
        &self.endpoints
    }

    fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        resource: &'static str,
        id: &str,
    ) -> Result<T, SyncError> {
        let id = id.to_string();
        block_on_current(async move {
            let response = request.send().await.map_err(|error| {
                SyncError::Upstream(format!("{resource} request for {id} failed: {error}"))
            })?;

            let status = response.status();
            if status == StatusCode::NOT_FOUND {
                return Err(SyncError::not_found(resource, id));
            }
            if !status.is_success() {
                return Err(SyncError::Upstream(format!(
                    "{resource} request for {id} returned {status}"
                )));
            }

            response.json::<T>().await.map_err(|error| {
                SyncError::Upstream(format!("invalid {resource} response for {id}: {error}"))
            })
        })
    }

    fn get_list<T: DeserializeOwned>(
        &self,
        url: Url,
        resource: &'static str,
        id: &str,
    ) -> Result<Vec<T>, SyncError> {
        self.send_json::<ListBody<T>>(self.client.get(url), resource, id)
            .map(ListBody::into_items)
    }
}

impl FastqApi for HttpServiceClient {
    fn fetch_fastq(
        &self,
        fastq_id: &str,
        include_s3_details: bool,
    ) -> Result<FastqRecord, SyncError> {
        let url = fastq_url(&self.endpoints.fastq, fastq_id, include_s3_details)?;
        self.send_json(self.client.get(url), "fastq", fastq_id)
    }

    fn fetch_fastq_set(&self, fastq_set_id: &str) -> Result<FastqSet, SyncError> {
        let url = endpoint_url(
            &self.endpoints.fastq,
            &["api", "v1", "fastqSet", fastq_set_id],
            &[],
        )?;
        self.send_json(self.client.get(url), "fastq set", fastq_set_id)
    }

    fn list_fastq_jobs(&self, fastq_id: &str) -> Result<Vec<Job>, SyncError> {
        let url = endpoint_url(
            &self.endpoints.fastq,
            &["api", "v1", "fastq", fastq_id, "jobs"],
            &[],
        )?;
        self.get_list(url, "fastq jobs", fastq_id)
    }

    fn create_fastq_job(&self, fastq_id: &str, job_type: JobType) -> Result<Job, SyncError> {
        let url = fastq_job_url(&self.endpoints.fastq, fastq_id, job_type)?;
        self.send_json(self.client.patch(url), "fastq job", fastq_id)
    }
}

impl UnarchivingApi for HttpServiceClient {
    fn list_jobs(
        &self,
        fastq_id: &str,
        status: UnarchivingJobStatus,
    ) -> Result<Vec<UnarchivingJob>, SyncError> {
        let url = endpoint_url(
            &self.endpoints.unarchiving,
            &["api", "v1", "jobs"],
            &[("fastqId", fastq_id), ("status", status.as_str())],
        )?;
        self.get_list(url, "unarchiving jobs", fastq_id)
    }

    fn create_job(
        &self,
        fastq_ids: &[String],
        job_kind: &str,
    ) -> Result<UnarchivingJob, SyncError> {
        let url = endpoint_url(&self.endpoints.unarchiving, &["api", "v1", "jobs"], &[])?;
        let request = self.client.post(url).json(&json!({
            "fastqIds": fastq_ids,
            "jobType": job_kind,
        }));
        self.send_json(request, "unarchiving job", &fastq_ids.join(","))
    }
}

impl WorkflowApi for HttpServiceClient {
    fn list_workflow_runs(
        &self,
        workflow_name: &str,
        status: &str,
    ) -> Result<Vec<WorkflowRunRef>, SyncError> {
        let url = endpoint_url(
            &self.endpoints.workflow,
            &["api", "v1", "workflowrun"],
            &[("workflowName", workflow_name), ("currentStatus", status)],
        )?;
        self.get_list(url, "workflow runs", workflow_name)
    }

    fn fetch_workflow_run(&self, workflow_run_id: &str) -> Result<WorkflowRunDetail, SyncError> {
        let url = endpoint_url(
            &self.endpoints.workflow,
            &["api", "v1", "workflowrun", workflow_run_id],
            &[],
        )?;
        self.send_json(self.client.get(url), "workflow run", workflow_run_id)
    }
}

fn block_on_current<F: Future>(future: F) -> F::Output {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}

pub fn endpoint_url(
    base: &str,
    segments: &[&str],
    query: &[(&str, &str)],
) -> Result<Url, SyncError> {
    let mut url = Url::parse(base)
        .map_err(|error| SyncError::Configuration(format!("invalid service URL '{base}': {error}")))?;
    url.path_segments_mut()
        .map_err(|_| SyncError::Configuration(format!("service URL '{base}' cannot be a base")))?
        .pop_if_empty()
        .extend(segments);
    if !query.is_empty() {
        url.query_pairs_mut().extend_pairs(query);
    }
    Ok(url)
}

pub fn fastq_url(base: &str, fastq_id: &str, include_s3_details: bool) -> Result<Url, SyncError> {
    endpoint_url(
        base,
        &["api", "v1", "fastq", fastq_id],
        &[(
            "includeS3Details",
            if include_s3_details { "true" } else { "false" },
        )],
    )
}

pub fn fastq_job_url(base: &str, fastq_id: &str, job_type: JobType) -> Result<Url, SyncError> {
    let action = match job_type {
        JobType::Qc => "runQcStats",
        JobType::Ntsm => "runNtsm",
        JobType::FileCompression => "runFileCompressionInformation",
        JobType::ReadCount => "runReadCountInformation",
    };
    let segment = format!("{fastq_id}:{action}");
    endpoint_url(base, &["api", "v1", "fastq", &segment], &[])
}

#[cfg(test)]
mod tests {
    use std::io::{BufRead, BufReader, Write};
    use std::net::TcpListener;
    use std::thread;

    use super::*;

    fn serve_once(status: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind local port");
        let address = listener.local_addr().expect("local address");
        thread::spawn(move || {
            let (mut stream, _) = listener.accept().expect("accept request");
            let mut reader = BufReader::new(stream.try_clone().expect("clone stream"));
            let mut line = String::new();
            while reader.read_line(&mut line).expect("read request") > 0 {
                if line == "\r\n" {
                    break;
                }
                line.clear();
            }
            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream
                .write_all(response.as_bytes())
                .expect("write response");
        });
        format!("http://{address}")
    }

    fn client_for(base: String) -> HttpServiceClient {
        let endpoints = ServiceEndpoints {
            fastq: base.clone(),
            unarchiving: base.clone(),
            workflow: base,
        };
        HttpServiceClient::new(endpoints, Duration::from_secs(5)).expect("client builds")
    }

    #[test]
    fn derives_service_urls_from_hostname() {
        let endpoints = ServiceEndpoints::for_hostname("dev.example.org/");
        assert_eq!(endpoints.fastq, "https://fastq.dev.example.org");
        assert_eq!(endpoints.unarchiving, "https://fastq-unarchiving.dev.example.org");
        assert_eq!(endpoints.workflow, "https://workflow.dev.example.org");
    }

    #[test]
    fn builds_fastq_url_with_storage_details_flag() {
        let url = fastq_url("https://fastq.example.org", "fqr.01JN25XG", true).expect("valid url");
        assert_eq!(
            url.as_str(),
            "https://fastq.example.org/api/v1/fastq/fqr.01JN25XG?includeS3Details=true"
        );
    }

    #[test]
    fn builds_job_action_urls() {
        let url = fastq_job_url("https://fastq.example.org/", "fqr.1", JobType::Ntsm)
            .expect("valid url");
        assert_eq!(url.as_str(), "https://fastq.example.org/api/v1/fastq/fqr.1:runNtsm");
    }

    #[test]
    fn encodes_query_and_path_values() {
        let url = endpoint_url(
            "https://workflow.example.org",
            &["api", "v1", "workflowrun"],
            &[("workflowName", "bssh-to-aws-s3"), ("currentStatus", "RUNNING")],
        )
        .expect("valid url");
        assert_eq!(
            url.as_str(),
            "https://workflow.example.org/api/v1/workflowrun?workflowName=bssh-to-aws-s3&currentStatus=RUNNING"
        );

        let url = endpoint_url("https://fastq.example.org", &["api", "v1", "fastq", "a/b"], &[])
            .expect("valid url");
        assert_eq!(url.as_str(), "https://fastq.example.org/api/v1/fastq/a%2Fb");
    }

    #[test]
    fn rejects_invalid_base_url() {
        let error = endpoint_url("not a url", &["api"], &[]).expect_err("invalid base");
        assert_eq!(error.error_code(), "misconfiguration");
    }

    #[test]
    fn list_body_accepts_pages_and_bare_arrays() {
        let page: ListBody<WorkflowRunRef> =
            serde_json::from_value(json!({"links": {}, "results": [{"orcabusId": "wfr.1"}]}))
                .expect("page parses");
        let bare: ListBody<WorkflowRunRef> =
            serde_json::from_value(json!([{"orcabusId": "wfr.2"}])).expect("array parses");

        assert_eq!(page.into_items()[0].orcabus_id, "wfr.1");
        assert_eq!(bare.into_items()[0].orcabus_id, "wfr.2");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn missing_fastq_maps_to_not_found() {
        let client = client_for(serve_once("404 Not Found", r#"{"detail": "Not found."}"#));

        let error = client.fetch_fastq("fqr.404", true).expect_err("404 response");
        assert_eq!(error, SyncError::not_found("fastq", "fqr.404"));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn server_error_maps_to_upstream() {
        let client = client_for(serve_once("500 Internal Server Error", "{}"));

        let error = client.list_fastq_jobs("fqr.1").expect_err("500 response");
        assert_eq!(error.error_code(), "upstream_error");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn undecodable_body_maps_to_upstream() {
        let client = client_for(serve_once("200 OK", r#"{"id": 7}"#));

        let error = client.fetch_fastq("fqr.1", false).expect_err("bad body");
        assert_eq!(error.error_code(), "upstream_error");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn paged_listing_decodes_results() {
        let client = client_for(serve_once(
            "200 OK",
            r#"{"links": {"next": null}, "results": [{"id": "job.1", "jobType": "QC", "status": "RUNNING"}]}"#,
        ));

        let jobs = client.list_fastq_jobs("fqr.1").expect("listing decodes");
        assert_eq!(jobs.len(), 1);
        assert!(jobs[0].is_active_of(JobType::Qc));
    }
}
