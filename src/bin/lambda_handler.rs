//! AWS Lambda handler serving server-side projections
//!
//! This is the remote counterpart of the `api` projection source. It accepts a
//! household snapshot (plus an optional tenant id) as JSON and returns the same
//! report the in-process planner produces.

use benefits_planner::{PlanInputs, PlanReport, PlannerConfig, PlannerSession, ProjectionSourceMode};
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use log::info;
use serde::Deserialize;

/// Input payload for one projection
#[derive(Debug, Deserialize)]
pub struct ProjectionRequest {
    /// Tenant id; unknown or missing ids use the default tenant
    #[serde(default)]
    pub tenant: Option<String>,

    /// Household snapshot to project
    pub inputs: PlanInputs,
}

async fn handler(session: &PlannerSession, event: LambdaEvent<ProjectionRequest>) -> Result<PlanReport, Error> {
    let (request, context) = event.into_parts();
    info!(
        "Projection request {}: {} months, {} accounts",
        context.request_id,
        request.inputs.horizon_months,
        request.inputs.accounts.len()
    );
    Ok(session.plan_local(request.tenant.as_deref(), &request.inputs))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();

    // The service is the remote end; it always computes in-process
    let mut config = PlannerConfig::from_env();
    config.source_mode = ProjectionSourceMode::Local;

    let session = PlannerSession::new(&config)?;
    let session = &session;

    run(service_fn(move |event: LambdaEvent<ProjectionRequest>| async move {
        handler(session, event).await
    }))
    .await
}
