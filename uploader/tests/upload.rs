mod common;

use std::time::Duration;

use common::{write_csv, MockApi, TEST_TOKEN};
use pelanor_metrics::{
    run_dimensional, run_plain, DimensionalOptions, MetricPayload, MetricsClient, PipelineError,
    PlainOptions, TimeseriesPoint, UploadError, UploadOutcome,
};
use serde_json::json;

const USAGE_CSV: &str = "timestamp,value_mb,tenant,environment
t1,10,tenantA,prod
t2,20,tenantB,prod
t3,5,tenantA,staging
";

fn dau_payload() -> MetricPayload {
    MetricPayload::plain(
        "Daily Active Users",
        vec![TimeseriesPoint::new("t1", 100), TimeseriesPoint::new("t2", 150)],
    )
}

#[tokio::test]
async fn created_response_reports_id() {
    let api = MockApi::start(vec![(201, r#"{"id":"abc"}"#)]).await;
    let client = MetricsClient::new(api.config()).unwrap();

    let outcome = client.post_metric(&dau_payload()).await.unwrap();
    assert_eq!(outcome, UploadOutcome::Created { id: Some("abc".into()) });

    let requests = api.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(
        requests[0].authorization.as_deref(),
        Some(format!("Bearer {}", TEST_TOKEN).as_str())
    );
    assert_eq!(requests[0].content_type.as_deref(), Some("application/json"));
    assert_eq!(
        requests[0].body,
        json!({
            "metric_name": "Daily Active Users",
            "metric_data": { "Plain": { "data": [
                { "timestamp": "t1", "value": 100 },
                { "timestamp": "t2", "value": 150 }
            ] } }
        })
    );
}

#[tokio::test]
async fn server_error_is_reported_not_raised() {
    let api = MockApi::start(vec![(500, "server error")]).await;
    let client = MetricsClient::new(api.config()).unwrap();

    let outcome = client.post_metric(&dau_payload()).await.unwrap();
    assert_eq!(
        outcome,
        UploadOutcome::Rejected { status: 500, body: "server error".into() }
    );
    // No retry
    assert_eq!(api.requests().len(), 1);
}

#[tokio::test]
async fn dimensional_run_continues_after_rejection() {
    let api = MockApi::start(vec![(400, "bad metric"), (200, r#"{"id":"env-1"}"#)]).await;
    let client = MetricsClient::new(api.config()).unwrap();
    let (_dir, path) = write_csv("tenant_env_usage.csv", USAGE_CSV);

    let options = DimensionalOptions {
        csv_path: path,
        ..DimensionalOptions::default()
    };
    let reports = run_dimensional(&client, &options).await.unwrap();

    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0].metric_name, "tenant_usage");
    assert_eq!(
        reports[0].outcome,
        UploadOutcome::Rejected { status: 400, body: "bad metric".into() }
    );
    assert_eq!(reports[1].metric_name, "environment_usage");
    assert_eq!(reports[1].outcome, UploadOutcome::Created { id: Some("env-1".into()) });
    assert_eq!(
        reports[1].status_line(),
        "environment_usage (Environment) created – id env-1"
    );

    let requests = api.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(
        requests[0].body["metric_data"]["Dimensional"],
        json!({
            "data": [
                { "property_value": "tenantA", "timeseries_point": [
                    { "timestamp": "t1", "value": 10.0 },
                    { "timestamp": "t3", "value": 5.0 }
                ] },
                { "property_value": "tenantB", "timeseries_point": [
                    { "timestamp": "t2", "value": 20.0 }
                ] }
            ],
            "property_kind": { "Dimension": "Tenants" }
        })
    );
    assert_eq!(
        requests[1].body["metric_data"]["Dimensional"]["property_kind"],
        json!({ "Dimension": "Environment" })
    );
    let envs: Vec<_> = requests[1].body["metric_data"]["Dimensional"]["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["property_value"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(envs, vec!["prod", "staging"]);
}

#[tokio::test]
async fn plain_run_uploads_points() {
    let api = MockApi::start(vec![(201, r#"{"id":"dau"}"#)]).await;
    let client = MetricsClient::new(api.config()).unwrap();
    let (_dir, path) = write_csv("dau_timeseries.csv", "timestamp,value\nt1,100\nt2,150\n");

    let options = PlainOptions {
        csv_path: path,
        ..PlainOptions::default()
    };
    let report = run_plain(&client, &options).await.unwrap();

    assert_eq!(report.status_line(), "Daily Active Users created – id dau");
    assert_eq!(api.requests()[0].body, serde_json::to_value(dau_payload()).unwrap());
}

#[tokio::test]
async fn malformed_csv_sends_nothing() {
    let api = MockApi::start(vec![]).await;
    let client = MetricsClient::new(api.config()).unwrap();
    let (_dir, path) = write_csv(
        "tenant_env_usage.csv",
        "timestamp,value_mb,tenant,environment\nt1,10,tenantA,prod\nt2,oops,tenantB,prod\n",
    );

    let options = DimensionalOptions {
        csv_path: path,
        ..DimensionalOptions::default()
    };
    let err = run_dimensional(&client, &options).await.unwrap_err();

    assert!(matches!(err, PipelineError::Csv(_)));
    assert!(err.to_string().contains("Line 3"));
    assert!(api.requests().is_empty());
}

#[tokio::test]
async fn missing_file_is_fatal() {
    let api = MockApi::start(vec![]).await;
    let client = MetricsClient::new(api.config()).unwrap();
    let dir = tempfile::tempdir().unwrap();

    let options = PlainOptions {
        csv_path: dir.path().join("dau_timeseries.csv"),
        ..PlainOptions::default()
    };
    let err = run_plain(&client, &options).await.unwrap_err();

    assert!(matches!(err, PipelineError::Csv(_)));
    assert!(api.requests().is_empty());
}

#[tokio::test]
async fn slow_server_hits_timeout() {
    let api = MockApi::start_slow(Duration::from_secs(5)).await;
    let config = api.config().with_timeout(Duration::from_millis(200));
    let client = MetricsClient::new(config).unwrap();

    let err = client.post_metric(&dau_payload()).await.unwrap_err();
    match err {
        UploadError::RequestFailed(e) => assert!(e.is_timeout()),
        other => panic!("expected timeout, got {other:?}"),
    }
}
