//! Entity-keyed wrappers over the timetable data endpoint.
//!
//! Every call is `GET <endpoint>?entity=<name>&session_id=<id>&<params>` and returns the
//! decoded JSON body as-is.
use crate::error::Result;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use ttms_http::{send_query, HttpClient, QueryRequest};

pub const DEFAULT_DATA_ENDPOINT: &str = "http://web.fc.utm.my/ttms/api.php";

/// Query for the `pelajar` (student) entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentQuery {
    pub sesi: String,
    pub semester: String,
    pub limit: u32,
    pub offset: u32,
    pub filters: BTreeMap<String, String>,
}

impl StudentQuery {
    /// A query for the first page of three students.
    pub fn new(sesi: impl Into<String>, semester: impl ToString) -> Self {
        Self {
            sesi: sesi.into(),
            semester: semester.to_string(),
            limit: 3,
            offset: 0,
            filters: BTreeMap::new(),
        }
    }
    pub fn page(mut self, limit: u32, offset: u32) -> Self {
        self.limit = limit;
        self.offset = offset;
        self
    }
    pub fn filter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.insert(key.into(), value.into());
        self
    }
}

/// Query for the `subjek_pelajar` (students of a subject section) entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectStudentsQuery {
    pub sesi: String,
    pub semester: String,
    pub kod_subjek: String,
    pub seksyen: String,
}

/// Data-access client bound to one validated session identifier.
pub struct DataApi<T> {
    http: Arc<T>,
    endpoint: String,
    session_id: String,
}

impl<T> DataApi<T>
where
    T: HttpClient + Send + Sync,
{
    pub fn new(http: Arc<T>, endpoint: impl Into<String>, session_id: impl Into<String>) -> Self {
        Self { http, endpoint: endpoint.into(), session_id: session_id.into() }
    }
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
    pub fn session_id(&self) -> &str {
        &self.session_id
    }
    /// All curricula (`entity=kurikulum`).
    pub async fn curricula(&self) -> Result<Value> {
        self.get("kurikulum", Vec::new()).await
    }
    /// Curriculum detail for one intake cohort.
    pub async fn cohort(&self, cohort: &str) -> Result<Value> {
        self.get("kurikulum", vec![(String::from("cohort"), cohort.into())]).await
    }
    /// Students of an academic session and semester (`entity=pelajar`).
    pub async fn students(&self, query: &StudentQuery) -> Result<Value> {
        let mut params = vec![
            (String::from("sesi"), query.sesi.clone()),
            (String::from("semester"), query.semester.clone()),
            (String::from("limit"), query.limit.to_string()),
            (String::from("offset"), query.offset.to_string()),
        ];
        merge(&mut params, &query.filters);
        self.get("pelajar", params).await
    }
    /// Lecturers of an academic session and semester (`entity=pensyarah`).
    pub async fn lecturers(
        &self,
        sesi: &str,
        semester: &str,
        extra: &BTreeMap<String, String>,
    ) -> Result<Value> {
        let mut params =
            vec![(String::from("sesi"), sesi.into()), (String::from("semester"), semester.into())];
        merge(&mut params, extra);
        self.get("pensyarah", params).await
    }
    /// Students registered in one section of a subject (`entity=subjek_pelajar`).
    pub async fn subject_students(&self, query: &SubjectStudentsQuery) -> Result<Value> {
        self.get(
            "subjek_pelajar",
            vec![
                (String::from("sesi"), query.sesi.clone()),
                (String::from("semester"), query.semester.clone()),
                (String::from("kod_subjek"), query.kod_subjek.clone()),
                (String::from("seksyen"), query.seksyen.clone()),
            ],
        )
        .await
    }
    async fn get(&self, entity: &str, params: Vec<(String, String)>) -> Result<Value> {
        let mut query = vec![
            (String::from("entity"), String::from(entity)),
            (String::from("session_id"), self.session_id.clone()),
        ];
        query.extend(params);
        tracing::debug!(entity, "fetching entity");
        Ok(send_query(self.http.as_ref(), &QueryRequest::new(self.endpoint.as_str(), query)).await?)
    }
}

/// Add `extra` to `params`; an extra key that is already present replaces its value.
fn merge(params: &mut Vec<(String, String)>, extra: &BTreeMap<String, String>) {
    for (key, value) in extra {
        match params.iter_mut().find(|(k, _)| k == key) {
            Some((_, v)) => v.clone_from(value),
            None => params.push((key.clone(), value.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockClient, MockResponse, DATA_ENDPOINT};
    use http::StatusCode;
    use serde_json::json;
    #[cfg(target_arch = "wasm32")]
    use wasm_bindgen_test::wasm_bindgen_test;

    const PATH: &str = "/ttms/api.php";

    fn api(response: MockResponse) -> DataApi<MockClient> {
        DataApi::new(Arc::new(MockClient::with(PATH, response)), DATA_ENDPOINT, "abc123")
    }

    fn last_query(api: &DataApi<MockClient>) -> String {
        let uri = api.http.requests().pop().expect("a request");
        uri.split_once('?').map(|(_, q)| q.to_string()).unwrap_or_default()
    }

    #[tokio::test]
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
    async fn curricula_and_cohort() {
        let api = api(MockResponse::Json(json!([{"sesi_masuk": "2023/2024"}])));
        assert_eq!(api.curricula().await.expect("ok"), json!([{"sesi_masuk": "2023/2024"}]));
        assert_eq!(last_query(&api), "entity=kurikulum&session_id=abc123");
        api.cohort("2023/2024").await.expect("ok");
        assert_eq!(last_query(&api), "entity=kurikulum&session_id=abc123&cohort=2023%2F2024");
    }

    #[tokio::test]
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
    async fn students_with_defaults_and_filters() {
        let api = api(MockResponse::Json(json!([])));
        api.students(&StudentQuery::new("2024/2025", 1)).await.expect("ok");
        assert_eq!(
            last_query(&api),
            "entity=pelajar&session_id=abc123&sesi=2024%2F2025&semester=1&limit=3&offset=0"
        );
        api.students(&StudentQuery::new("2024/2025", 2).page(10, 20).filter("kod_prog", "SECJH"))
            .await
            .expect("ok");
        assert_eq!(
            last_query(&api),
            "entity=pelajar&session_id=abc123&sesi=2024%2F2025&semester=2&limit=10&offset=20&kod_prog=SECJH"
        );
    }

    #[tokio::test]
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
    async fn lecturers_extra_params_override() {
        let api = api(MockResponse::Json(json!([])));
        let extra = BTreeMap::from([
            (String::from("fakulti"), String::from("FC")),
            (String::from("semester"), String::from("2")),
        ]);
        api.lecturers("2024/2025", "1", &extra).await.expect("ok");
        assert_eq!(
            last_query(&api),
            "entity=pensyarah&session_id=abc123&sesi=2024%2F2025&semester=2&fakulti=FC"
        );
    }

    #[tokio::test]
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
    async fn subject_students() {
        let api = api(MockResponse::Json(json!({"data": []})));
        let query = SubjectStudentsQuery {
            sesi: String::from("2024/2025"),
            semester: String::from("1"),
            kod_subjek: String::from("SECJ1013"),
            seksyen: String::from("01"),
        };
        assert_eq!(api.subject_students(&query).await.expect("ok"), json!({"data": []}));
        assert_eq!(
            last_query(&api),
            "entity=subjek_pelajar&session_id=abc123&sesi=2024%2F2025&semester=1&kod_subjek=SECJ1013&seksyen=01"
        );
    }

    #[tokio::test]
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
    async fn non_success_status_is_an_error() {
        let api = api(MockResponse::Body(StatusCode::FORBIDDEN, "[]"));
        let err = api.curricula().await.expect_err("must be error");
        match err {
            crate::Error::Http(ttms_http::Error::UnexpectedStatus(status)) => {
                assert_eq!(status, StatusCode::FORBIDDEN)
            }
            err => panic!("must be Error::Http, got {err:?}"),
        }
    }
}
