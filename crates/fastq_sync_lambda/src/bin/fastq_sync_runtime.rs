use fastq_sync_core::readiness::ReadinessChecker;
use fastq_sync_lambda::adapters::http::HttpServiceClient;
use fastq_sync_lambda::config::{resolve_hostname, RuntimeConfig};
use fastq_sync_lambda::logging::init_tracing;
use fastq_sync_lambda::runtime::{dispatch_event, HandlerContext, HandlerKind};
use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::Value;
use tracing::{error, info};

struct RuntimeDependencies {
    handler: HandlerKind,
    checker: ReadinessChecker,
    client: HttpServiceClient,
}

async fn build_dependencies() -> Result<RuntimeDependencies, Error> {
    let config = RuntimeConfig::from_env()?;
    let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let ssm_client = aws_sdk_ssm::Client::new(&aws_config);
    let hostname = resolve_hostname(&config.hostname_source, &ssm_client).await?;
    let endpoints = config.endpoints(hostname.as_deref())?;

    info!(
        component = "fastq_sync_runtime",
        event = "runtime_configured",
        handler = %config.handler,
        mode = ?config.mode,
        fastq_api = %endpoints.fastq,
        unarchiving_api = %endpoints.unarchiving,
        workflow_api = %endpoints.workflow
    );

    Ok(RuntimeDependencies {
        handler: config.handler,
        checker: ReadinessChecker::new(config.bucket_prefix, config.mode),
        client: HttpServiceClient::new(endpoints, config.api_timeout)?,
    })
}

async fn handle_request(
    event: LambdaEvent<Value>,
    deps: &RuntimeDependencies,
) -> Result<Value, Error> {
    let request_id = event.context.request_id.clone();
    let context = HandlerContext {
        checker: &deps.checker,
        fastq: &deps.client,
        unarchiving: &deps.client,
        workflow: &deps.client,
    };

    dispatch_event(deps.handler, event.payload, &context).map_err(|failure| {
        error!(
            component = "fastq_sync_runtime",
            event = "handler_failed",
            handler = %deps.handler,
            request_id = %request_id,
            error_code = failure.error_code(),
            error = %failure
        );
        Error::from(failure)
    })
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    init_tracing();

    let deps = build_dependencies().await.inspect_err(|failure| {
        error!(
            component = "fastq_sync_runtime",
            event = "startup_failed",
            error = %failure
        );
    })?;
    let deps = &deps;

    lambda_runtime::run(service_fn(move |event| handle_request(event, deps))).await
}
