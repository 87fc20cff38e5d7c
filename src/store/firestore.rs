//! Firestore REST (v1) backend.
//!
//! Documents live under
//! `{base}/projects/{project}/databases/(default)/documents/products`. Text fields are
//! `stringValue`, the price is a `doubleValue` and the stock an `integerValue`.
//! The API key travels in the `x-goog-api-key` header so it never appears in URLs or
//! logged errors.

use crate::{
    config::store::StoreSettings,
    core::{
        gateway::{PRODUCTS_COLLECTION, ProductGateway},
        product::{Category, Product, ProductFields, ProductId},
        validation::Field,
    },
    errors::{Error, Result},
};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use tracing::{debug, error, instrument, warn};

const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Debug, Default, Serialize, Deserialize)]
struct Document {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    name: String,
    #[serde(default)]
    fields: Map<String, Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListDocumentsResponse {
    #[serde(default)]
    documents: Vec<Document>,
    next_page_token: Option<String>,
}

/// Gateway over the Firestore REST API.
#[derive(Clone)]
pub struct FirestoreGateway {
    http: Client,
    collection_url: String,
    api_key: Option<String>,
}

impl std::fmt::Debug for FirestoreGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FirestoreGateway")
            .field("collection_url", &self.collection_url)
            .finish_non_exhaustive()
    }
}

impl FirestoreGateway {
    /// Builds a gateway for `project_id` at `base_url`.
    pub fn new(base_url: &str, project_id: &str, api_key: Option<String>) -> Self {
        Self::with_client(Client::new(), base_url, project_id, api_key)
    }

    /// Same as [`FirestoreGateway::new`] with a caller-provided HTTP client.
    pub fn with_client(
        http: Client,
        base_url: &str,
        project_id: &str,
        api_key: Option<String>,
    ) -> Self {
        let collection_url = format!(
            "{}/projects/{project_id}/databases/(default)/documents/{PRODUCTS_COLLECTION}",
            base_url.trim_end_matches('/')
        );
        Self {
            http,
            collection_url,
            api_key,
        }
    }

    /// Builds a gateway from store settings.
    ///
    /// # Errors
    /// Returns a configuration error when no project id is configured.
    pub fn from_settings(settings: &StoreSettings) -> Result<Self> {
        let project_id = settings.require_project_id()?;
        Ok(Self::new(
            &settings.base_url,
            project_id,
            settings.api_key.clone(),
        ))
    }

    /// URL of one document, with the id escaped as a single path segment.
    fn document_url(&self, operation: &'static str, id: &ProductId) -> Result<Url> {
        if id.as_str().is_empty() {
            return Err(Error::store(operation, Some(id.as_str()), "document id is empty"));
        }
        let mut url = Url::parse(&self.collection_url).map_err(|e| Error::Config {
            message: format!("invalid Firestore URL '{}': {e}", self.collection_url),
        })?;
        url.path_segments_mut()
            .map_err(|()| Error::Config {
                message: format!("Firestore URL '{}' has no path", self.collection_url),
            })?
            .push(id.as_str());
        Ok(url)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => request.header(API_KEY_HEADER, key),
            None => request,
        }
    }

    async fn fetch_all(&self) -> Result<Vec<Product>> {
        let mut products = Vec::new();
        let mut page_token: Option<String> = None;
        loop {
            let mut request = self.authorized(self.http.get(self.collection_url.as_str()));
            if let Some(token) = &page_token {
                request = request.query(&[("pageToken", token)]);
            }
            let response = ensure_success("list_all", None, request.send().await?).await?;
            let page: ListDocumentsResponse = response.json().await?;

            for document in page.documents {
                products.push(decode_document("list_all", document)?);
            }
            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }
        Ok(products)
    }

    async fn fetch_one(&self, id: &ProductId) -> Result<Option<Product>> {
        if id.as_str().is_empty() {
            return Ok(None);
        }
        let response = self
            .authorized(self.http.get(self.document_url("get_by_id", id)?))
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let document: Document = ensure_success("get_by_id", Some(id), response)
            .await?
            .json()
            .await?;
        decode_document("get_by_id", document).map(Some)
    }

    async fn insert(&self, fields: &ProductFields) -> Result<ProductId> {
        let body = Document {
            name: String::new(),
            fields: encode_fields(fields),
        };
        let response = self
            .authorized(self.http.post(self.collection_url.as_str()))
            .json(&body)
            .send()
            .await?;
        let created: Document = ensure_success("create", None, response)
            .await?
            .json()
            .await?;
        document_id(&created.name)
            .ok_or_else(|| Error::store("create", None, "response carried no document name"))
    }

    async fn patch(&self, id: &ProductId, fields: &ProductFields) -> Result<()> {
        let mut query: Vec<(&str, &str)> = Field::ALL
            .iter()
            .map(|field| ("updateMask.fieldPaths", field.as_str()))
            .collect();
        query.push(("currentDocument.exists", "true"));

        let body = Document {
            name: String::new(),
            fields: encode_fields(fields),
        };
        let response = self
            .authorized(self.http.patch(self.document_url("update_by_id", id)?))
            .query(&query)
            .json(&body)
            .send()
            .await?;
        ensure_success("update_by_id", Some(id), response).await?;
        Ok(())
    }

    async fn remove(&self, id: &ProductId) -> Result<()> {
        let response = self
            .authorized(self.http.delete(self.document_url("delete_by_id", id)?))
            .send()
            .await?;
        ensure_success("delete_by_id", Some(id), response).await?;
        Ok(())
    }
}

#[async_trait]
impl ProductGateway for FirestoreGateway {
    #[instrument(skip(self))]
    async fn list_all(&self) -> Result<Vec<Product>> {
        let products = self
            .fetch_all()
            .await
            .inspect_err(|e| error!("Failed to list products: {e}"))?;
        debug!("Listed {} products", products.len());
        Ok(products)
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: &ProductId) -> Result<Option<Product>> {
        let found = self
            .fetch_one(id)
            .await
            .inspect_err(|e| error!(product_id = %id, "Failed to fetch product: {e}"))?;
        if found.is_none() {
            warn!(product_id = %id, "Product not found");
        }
        Ok(found)
    }

    #[instrument(skip(self, fields), fields(name = %fields.name))]
    async fn create(&self, fields: &ProductFields) -> Result<ProductId> {
        self.insert(fields)
            .await
            .inspect_err(|e| error!("Failed to create product: {e}"))
    }

    #[instrument(skip(self, fields))]
    async fn update_by_id(&self, id: &ProductId, fields: &ProductFields) -> Result<()> {
        self.patch(id, fields)
            .await
            .inspect_err(|e| error!(product_id = %id, "Failed to update product: {e}"))
    }

    #[instrument(skip(self))]
    async fn delete_by_id(&self, id: &ProductId) -> Result<()> {
        self.remove(id)
            .await
            .inspect_err(|e| error!(product_id = %id, "Failed to delete product: {e}"))
    }
}

async fn ensure_success(
    operation: &'static str,
    id: Option<&ProductId>,
    response: Response,
) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(Error::store(
        operation,
        id.map(ProductId::as_str),
        format!("HTTP {status}: {}", body.trim()),
    ))
}

fn document_id(name: &str) -> Option<ProductId> {
    name.rsplit('/')
        .next()
        .filter(|segment| !segment.is_empty())
        .map(ProductId::new)
}

fn encode_fields(fields: &ProductFields) -> Map<String, Value> {
    let encoded = json!({
        "name": { "stringValue": fields.name },
        "brand": { "stringValue": fields.brand },
        "category": { "stringValue": fields.category.label() },
        "price": { "doubleValue": fields.price },
        "stock": { "integerValue": fields.stock.to_string() },
        "description": { "stringValue": fields.description },
        "imageUrl": { "stringValue": fields.image_url },
    });
    match encoded {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

fn decode_document(operation: &'static str, document: Document) -> Result<Product> {
    let id = document_id(&document.name)
        .ok_or_else(|| Error::store(operation, None, "document without a name"))?;
    let fields = &document.fields;
    let malformed = |field: &str| {
        Error::store(
            operation,
            Some(id.as_str()),
            format!("missing or malformed field '{field}'"),
        )
    };

    let text = |field: &str| {
        fields
            .get(field)
            .and_then(|v| v.get("stringValue"))
            .and_then(Value::as_str)
            .map(ToOwned::to_owned)
            .ok_or_else(|| malformed(field))
    };

    let category_label = text("category")?;
    let category = Category::from_label(&category_label).ok_or_else(|| {
        Error::store(
            operation,
            Some(id.as_str()),
            format!("unknown category '{category_label}'"),
        )
    })?;
    let price = fields
        .get("price")
        .and_then(number_value)
        .ok_or_else(|| malformed("price"))?;
    let stock = fields
        .get("stock")
        .and_then(integer_value)
        .ok_or_else(|| malformed("stock"))?;

    let product_fields = ProductFields {
        name: text("name")?,
        brand: text("brand")?,
        category,
        price,
        stock,
        description: text("description")?,
        image_url: text("imageUrl")?,
    };
    Ok(Product::new(id, product_fields))
}

#[allow(clippy::cast_precision_loss)]
fn number_value(value: &Value) -> Option<f64> {
    if let Some(double) = value.get("doubleValue").and_then(Value::as_f64) {
        return Some(double);
    }
    integer_value(value).map(|i| i as f64)
}

// Cast safety: only whole numbers within i64 range reach the cast
#[allow(clippy::cast_possible_truncation)]
fn integer_value(value: &Value) -> Option<i64> {
    if let Some(integer) = value.get("integerValue") {
        return match integer {
            Value::String(s) => s.parse().ok(),
            other => other.as_i64(),
        };
    }
    let double = value.get("doubleValue").and_then(Value::as_f64)?;
    (double.fract() == 0.0 && double.abs() < 9.0e15).then_some(double as i64)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::sample_fields;
    use axum::{
        Json, Router,
        extract::{Path, Query, State},
        http::HeaderMap,
        response::{IntoResponse, Response as AxumResponse},
        routing::get,
    };
    use std::{
        collections::{BTreeMap, HashMap},
        sync::Arc,
    };
    use tokio::{net::TcpListener, sync::Mutex};

    const TEST_KEY: &str = "test-key";
    const DOCUMENTS: &str = "projects/demo/databases/(default)/documents/products";

    #[derive(Default)]
    struct MockFirestore {
        documents: BTreeMap<String, Map<String, Value>>,
        next_id: u32,
        page_size: usize,
        list_requests: u32,
    }

    type Shared = Arc<Mutex<MockFirestore>>;

    fn document_json(id: &str, fields: &Map<String, Value>) -> Value {
        json!({ "name": format!("{DOCUMENTS}/{id}"), "fields": fields })
    }

    fn authorized(headers: &HeaderMap) -> bool {
        headers
            .get(API_KEY_HEADER)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v == TEST_KEY)
    }

    fn denied() -> AxumResponse {
        (
            axum::http::StatusCode::FORBIDDEN,
            Json(json!({ "error": { "status": "PERMISSION_DENIED" } })),
        )
            .into_response()
    }

    fn not_found() -> AxumResponse {
        (
            axum::http::StatusCode::NOT_FOUND,
            Json(json!({ "error": { "status": "NOT_FOUND" } })),
        )
            .into_response()
    }

    async fn list_documents(
        State(state): State<Shared>,
        headers: HeaderMap,
        Query(params): Query<HashMap<String, String>>,
    ) -> AxumResponse {
        if !authorized(&headers) {
            return denied();
        }
        let mut mock = state.lock().await;
        mock.list_requests += 1;
        let start: usize = params
            .get("pageToken")
            .and_then(|t| t.parse().ok())
            .unwrap_or(0);
        let page: Vec<Value> = mock
            .documents
            .iter()
            .skip(start)
            .take(mock.page_size)
            .map(|(id, fields)| document_json(id, fields))
            .collect();
        if page.is_empty() {
            return Json(json!({})).into_response();
        }
        let mut body = json!({ "documents": page });
        let next = start + mock.page_size;
        if next < mock.documents.len() {
            body["nextPageToken"] = json!(next.to_string());
        }
        Json(body).into_response()
    }

    async fn create_document(
        State(state): State<Shared>,
        headers: HeaderMap,
        Json(body): Json<Value>,
    ) -> AxumResponse {
        if !authorized(&headers) {
            return denied();
        }
        let mut mock = state.lock().await;
        mock.next_id += 1;
        let id = format!("doc{:02}", mock.next_id);
        let fields = body["fields"].as_object().cloned().unwrap_or_default();
        let response = document_json(&id, &fields);
        mock.documents.insert(id, fields);
        Json(response).into_response()
    }

    async fn get_document(
        State(state): State<Shared>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> AxumResponse {
        if !authorized(&headers) {
            return denied();
        }
        let mock = state.lock().await;
        mock.documents.get(&id).map_or_else(not_found, |fields| {
            Json(document_json(&id, fields)).into_response()
        })
    }

    async fn patch_document(
        State(state): State<Shared>,
        headers: HeaderMap,
        Path(id): Path<String>,
        Query(params): Query<HashMap<String, String>>,
        Json(body): Json<Value>,
    ) -> AxumResponse {
        if !authorized(&headers) {
            return denied();
        }
        let mut mock = state.lock().await;
        let must_exist = params.get("currentDocument.exists").map(String::as_str) == Some("true");
        if must_exist && !mock.documents.contains_key(&id) {
            return not_found();
        }
        let fields = body["fields"].as_object().cloned().unwrap_or_default();
        let response = document_json(&id, &fields);
        mock.documents.insert(id, fields);
        Json(response).into_response()
    }

    async fn delete_document(
        State(state): State<Shared>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> AxumResponse {
        if !authorized(&headers) {
            return denied();
        }
        state.lock().await.documents.remove(&id);
        Json(json!({})).into_response()
    }

    async fn spawn_mock_firestore(page_size: usize) -> Result<(String, Shared)> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let state: Shared = Arc::new(Mutex::new(MockFirestore {
            page_size,
            ..MockFirestore::default()
        }));

        let app = Router::new()
            .route(
                &format!("/v1/{DOCUMENTS}"),
                get(list_documents).post(create_document),
            )
            .route(
                &format!("/v1/{DOCUMENTS}/:id"),
                get(get_document)
                    .patch(patch_document)
                    .delete(delete_document),
            )
            .with_state(Arc::clone(&state));

        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        Ok((format!("http://{addr}/v1"), state))
    }

    async fn gateway(page_size: usize) -> Result<(FirestoreGateway, Shared)> {
        let (base_url, state) = spawn_mock_firestore(page_size).await?;
        let gateway = FirestoreGateway::new(&base_url, "demo", Some(TEST_KEY.to_string()));
        Ok((gateway, state))
    }

    #[tokio::test]
    async fn test_create_then_get_round_trip() -> Result<()> {
        let (gateway, _state) = gateway(10).await?;
        let fields = sample_fields("Parlante");

        let id = gateway.create(&fields).await?;
        assert_eq!(id.as_str(), "doc01");

        let stored = gateway.get_by_id(&id).await?.unwrap();
        assert_eq!(stored.id, id);
        assert_eq!(stored.fields, fields);
        Ok(())
    }

    #[tokio::test]
    async fn test_list_all_follows_page_tokens() -> Result<()> {
        let (gateway, state) = gateway(2).await?;
        for name in ["A", "B", "C", "D", "E"] {
            gateway.create(&sample_fields(name)).await?;
        }

        let products = gateway.list_all().await?;

        let names: Vec<&str> = products.iter().map(Product::name).collect();
        assert_eq!(names, vec!["A", "B", "C", "D", "E"]);
        assert_eq!(state.lock().await.list_requests, 3);
        Ok(())
    }

    #[tokio::test]
    async fn test_list_all_on_empty_collection() -> Result<()> {
        let (gateway, _state) = gateway(10).await?;
        assert!(gateway.list_all().await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_get_missing_document_is_none() -> Result<()> {
        let (gateway, _state) = gateway(10).await?;
        assert!(gateway.get_by_id(&ProductId::new("nope")).await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_update_replaces_fields_and_requires_existing_document() -> Result<()> {
        let (gateway, state) = gateway(10).await?;
        let id = gateway.create(&sample_fields("Parlante")).await?;

        let mut changed = sample_fields("Parlante portátil");
        changed.stock = 0;
        gateway.update_by_id(&id, &changed).await?;
        assert_eq!(gateway.get_by_id(&id).await?.unwrap().fields, changed);

        let err = gateway
            .update_by_id(&ProductId::new("nope"), &changed)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Store {
                operation: "update_by_id",
                ..
            }
        ));
        assert_eq!(state.lock().await.documents.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_existing_and_missing_documents() -> Result<()> {
        let (gateway, _state) = gateway(10).await?;
        let id = gateway.create(&sample_fields("Parlante")).await?;

        gateway.delete_by_id(&id).await?;
        assert!(gateway.get_by_id(&id).await?.is_none());
        gateway.delete_by_id(&id).await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_ids_with_url_delimiters_address_one_document() -> Result<()> {
        let (gateway, state) = gateway(10).await?;
        gateway.create(&sample_fields("Parlante")).await?;

        // each id names exactly one document, delimiters included
        for raw in ["a?b", "a#b", "a/b", "doc01?x=1", "doc01#frag"] {
            assert!(gateway.get_by_id(&ProductId::new(raw)).await?.is_none(), "{raw}");
        }
        assert_eq!(state.lock().await.list_requests, 0);

        let fields = encode_fields(&sample_fields("Silla"));
        state.lock().await.documents.insert("x?y#z".to_string(), fields);
        let id = ProductId::new("x?y#z");
        let stored = gateway.get_by_id(&id).await?.unwrap();
        assert_eq!(stored.id, id);
        assert_eq!(stored.fields.name, "Silla");

        gateway.update_by_id(&id, &sample_fields("Silla gamer")).await?;
        assert_eq!(gateway.get_by_id(&id).await?.unwrap().fields.name, "Silla gamer");
        gateway.delete_by_id(&id).await?;
        let remaining = state.lock().await.documents.keys().cloned().collect::<Vec<_>>();
        assert_eq!(remaining, vec!["doc01".to_string()]);
        Ok(())
    }

    #[tokio::test]
    async fn test_empty_id_never_reaches_the_store() -> Result<()> {
        let (gateway, state) = gateway(10).await?;
        let empty = ProductId::new("");

        assert!(gateway.get_by_id(&empty).await?.is_none());
        let err = gateway.delete_by_id(&empty).await.unwrap_err();
        assert!(matches!(err, Error::Store { operation: "delete_by_id", .. }));
        assert_eq!(state.lock().await.list_requests, 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_rejected_credentials_surface_as_store_error() -> Result<()> {
        let (base_url, _state) = spawn_mock_firestore(10).await?;
        let gateway = FirestoreGateway::new(&base_url, "demo", Some("wrong".to_string()));

        let err = gateway.list_all().await.unwrap_err();
        assert!(matches!(err, Error::Store { operation: "list_all", ref message, .. } if message.contains("403")));
        Ok(())
    }

    #[tokio::test]
    async fn test_unreachable_store_is_transport_error() -> Result<()> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        drop(listener);
        let gateway = FirestoreGateway::new(&format!("http://{addr}/v1"), "demo", None);

        let err = gateway.list_all().await.unwrap_err();
        assert!(matches!(err, Error::Http(_)));
        assert!(err.is_store_failure());
        Ok(())
    }

    #[test]
    fn test_encode_uses_typed_values() {
        let encoded = encode_fields(&sample_fields("Parlante"));
        assert_eq!(encoded["name"]["stringValue"], "Parlante");
        assert_eq!(encoded["category"]["stringValue"], "Hogar");
        assert!(encoded["price"]["doubleValue"].is_f64());
        assert_eq!(encoded["stock"]["integerValue"], "7");
        assert!(encoded.contains_key("imageUrl"));
    }

    #[test]
    fn test_decode_accepts_either_numeric_encoding() {
        let document: Document = serde_json::from_value(json!({
            "name": format!("{DOCUMENTS}/abc"),
            "fields": {
                "name": { "stringValue": "Silla" },
                "brand": { "stringValue": "Ikea" },
                "category": { "stringValue": "Oficina" },
                "price": { "integerValue": "1500" },
                "stock": { "doubleValue": 3.0 },
                "description": { "stringValue": "Gamer" },
                "imageUrl": { "stringValue": "https://img/silla.png" }
            }
        }))
        .unwrap();

        let product = decode_document("get_by_id", document).unwrap();
        assert_eq!(product.id.as_str(), "abc");
        assert_eq!(product.fields.price, 1500.0);
        assert_eq!(product.fields.stock, 3);
        assert_eq!(product.fields.category, Category::Office);
    }

    #[test]
    fn test_decode_rejects_missing_field() {
        let document: Document = serde_json::from_value(json!({
            "name": format!("{DOCUMENTS}/abc"),
            "fields": { "name": { "stringValue": "Silla" } }
        }))
        .unwrap();

        let err = decode_document("list_all", document).unwrap_err();
        assert!(err.to_string().contains("malformed field"));
    }

    #[test]
    fn test_decode_rejects_fractional_stock() {
        assert_eq!(integer_value(&json!({ "doubleValue": 2.5 })), None);
        assert_eq!(integer_value(&json!({ "integerValue": "12" })), Some(12));
    }
}
