#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{Router, body::Body, http::Request, http::StatusCode, response::Response};
use bm_common::Resource;
use bm_common::client::{
    Account, ClientError, ResourceSource, SkillSearch, SoftBlockRequest,
};
use bm_common::normalize::map_resources;
use bm_common::views::directory::ResourceStatistics;
use chrono::{DateTime, Utc};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

/// Upstream stand-in serving fixed records through the real normalizer.
#[derive(Default)]
pub struct InMemorySource {
    pub records: Vec<Value>,
    pub statistics: Option<ResourceStatistics>,
    pub locations: Vec<String>,
    pub skills: Vec<String>,
    pub accounts: Vec<Account>,
    pub soft_blocks: Mutex<Vec<(String, SoftBlockRequest)>>,
}

fn not_found() -> ClientError {
    ClientError::HttpStatus {
        status: 404,
        message: "Resource not found".into(),
    }
}

#[async_trait]
impl ResourceSource for InMemorySource {
    async fn resources(&self, now: DateTime<Utc>) -> Result<Vec<Resource>, ClientError> {
        Ok(map_resources(&self.records, now))
    }

    async fn resource(&self, id: &str, now: DateTime<Utc>) -> Result<Resource, ClientError> {
        map_resources(&self.records, now)
            .into_iter()
            .find(|r| r.id == id || r.employee_id == id)
            .ok_or_else(not_found)
    }

    async fn statistics(&self) -> Result<ResourceStatistics, ClientError> {
        self.statistics.clone().ok_or(ClientError::HttpStatus {
            status: 503,
            message: "stats offline".into(),
        })
    }

    async fn locations(&self) -> Result<Vec<String>, ClientError> {
        Ok(self.locations.clone())
    }

    async fn skills(&self) -> Result<Vec<String>, ClientError> {
        Ok(self.skills.clone())
    }

    async fn accounts(&self) -> Result<Vec<Account>, ClientError> {
        Ok(self.accounts.clone())
    }

    async fn search_by_skills(
        &self,
        query: &SkillSearch,
        now: DateTime<Utc>,
    ) -> Result<Vec<Resource>, ClientError> {
        Ok(map_resources(&self.records, now)
            .into_iter()
            .filter(|r| r.skills.iter().any(|s| query.skills.contains(&s.name)))
            .collect())
    }

    async fn soft_block(
        &self,
        resource_id: &str,
        request: &SoftBlockRequest,
        now: DateTime<Utc>,
    ) -> Result<Resource, ClientError> {
        let resource = self.resource(resource_id, now).await?;
        self.soft_blocks
            .lock()
            .unwrap()
            .push((resource_id.to_string(), request.clone()));
        Ok(resource)
    }
}

/// Every upstream call fails with a server error.
pub struct FailingSource;

fn upstream_down() -> ClientError {
    ClientError::HttpStatus {
        status: 500,
        message: "upstream exploded".into(),
    }
}

#[async_trait]
impl ResourceSource for FailingSource {
    async fn resources(&self, _now: DateTime<Utc>) -> Result<Vec<Resource>, ClientError> {
        Err(upstream_down())
    }

    async fn resource(&self, _id: &str, _now: DateTime<Utc>) -> Result<Resource, ClientError> {
        Err(upstream_down())
    }

    async fn statistics(&self) -> Result<ResourceStatistics, ClientError> {
        Err(upstream_down())
    }

    async fn locations(&self) -> Result<Vec<String>, ClientError> {
        Err(upstream_down())
    }

    async fn skills(&self) -> Result<Vec<String>, ClientError> {
        Err(upstream_down())
    }

    async fn accounts(&self) -> Result<Vec<Account>, ClientError> {
        Err(upstream_down())
    }

    async fn search_by_skills(
        &self,
        _query: &SkillSearch,
        _now: DateTime<Utc>,
    ) -> Result<Vec<Resource>, ClientError> {
        Err(upstream_down())
    }

    async fn soft_block(
        &self,
        _resource_id: &str,
        _request: &SoftBlockRequest,
        _now: DateTime<Utc>,
    ) -> Result<Resource, ClientError> {
        Err(upstream_down())
    }
}

/// Two resources: an available React developer under consideration for
/// `REQ-1`, and a deployed Java developer with an active soft block.
pub fn bench_records() -> Vec<Value> {
    vec![
        json!({
            "id": "1",
            "employeeId": "EMP001",
            "name": "Asha Rao",
            "email": "asha@example.com",
            "designation": "Senior Engineer",
            "location": "Pune",
            "status": "ATP",
            "availabilityDate": "2020-01-01",
            "totalExperience": 7,
            "skills": [{"name": "React", "level": "expert", "type": "primary"}],
            "considerations": [{
                "id": "c1",
                "requirementId": "REQ-1",
                "requirementTitle": "Frontend Lead",
                "requiredSkills": [{"name": "React"}],
                "location": "Pune",
                "interviewStatus": "scheduled",
                "interviewDate": "2099-01-10T10:00:00Z"
            }],
            "createdAt": "2020-01-01T00:00:00Z",
            "updatedAt": "2020-01-02T00:00:00Z"
        }),
        json!({
            "resourceName": "Vikram Singh",
            "employeeCode": "EMP002",
            "position": "Backend Engineer",
            "baseLocation": "Delhi",
            "status": "DEPLOYED",
            "technicalSkills": [{"name": "Java", "level": "advanced"}],
            "blockedDates": [{"accountId": 7, "accountName": "Acme", "blockedUntil": "2099-12-31"}],
            "created": "2020-01-01T00:00:00Z",
            "updated": "2020-01-03T00:00:00Z"
        }),
    ]
}

pub fn bench_source() -> InMemorySource {
    InMemorySource {
        records: bench_records(),
        skills: vec!["Java".into(), "React".into()],
        accounts: vec![Account {
            id: Some("7".into()),
            name: "Acme".into(),
            description: None,
        }],
        ..InMemorySource::default()
    }
}

pub fn router_with(source: Arc<dyn ResourceSource>) -> Router {
    bm_api::create_router(bm_api::test_state(source))
}

pub async fn get(app: &Router, uri: &str) -> Response {
    app.clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub async fn post_json(app: &Router, uri: &str, body: Value) -> Response {
    app.clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
}

pub async fn json_body(response: Response) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}
