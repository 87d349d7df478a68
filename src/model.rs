//! Identifiers, request payloads and response schemas exchanged with the backend.

use crate::client::ApiResult;
use derive_builder::Builder;
use reqwest::multipart::{Form, Part};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Identifier of a dataset, view, feature set or category-name record.
///
/// The backend uses both numeric and string ids, so both are kept verbatim:
/// integers serialize as JSON numbers, strings as JSON strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResourceId {
    Int(i64),
    Str(String),
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceId::Int(id) => write!(f, "{id}"),
            ResourceId::Str(id) => f.write_str(id),
        }
    }
}

impl From<i64> for ResourceId {
    fn from(id: i64) -> Self {
        ResourceId::Int(id)
    }
}

impl From<i32> for ResourceId {
    fn from(id: i32) -> Self {
        ResourceId::Int(id.into())
    }
}

impl From<u32> for ResourceId {
    fn from(id: u32) -> Self {
        ResourceId::Int(id.into())
    }
}

impl From<String> for ResourceId {
    fn from(id: String) -> Self {
        ResourceId::Str(id)
    }
}

impl From<&str> for ResourceId {
    fn from(id: &str) -> Self {
        ResourceId::Str(id.to_string())
    }
}

impl From<&ResourceId> for ResourceId {
    fn from(id: &ResourceId) -> Self {
        id.clone()
    }
}

/// Body of the view and feature-set delete calls.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceRef {
    pub id: ResourceId,
    pub ds_id: ResourceId,
}

/// File attached to a dataset upload.
#[derive(Clone, PartialEq)]
pub struct DatasetFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl DatasetFile {
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        DatasetFile {
            file_name: file_name.into(),
            bytes: bytes.into(),
        }
    }
}

impl fmt::Debug for DatasetFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatasetFile")
            .field("file_name", &self.file_name)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Create (no `id`) or update (`id` set) a dataset. Sent as a multipart form.
#[derive(Debug, Clone, Default, PartialEq, Builder)]
#[builder(setter(into, strip_option), default)]
pub struct DatasetUpsert {
    pub id: Option<ResourceId>,
    pub name: Option<String>,
    pub url: Option<String>,
    pub description: Option<String>,
    pub species: Option<String>,
    pub title: Option<String>,
    /// Emails allowed to read the dataset
    pub readers: Option<Vec<String>>,
    pub file: Option<DatasetFile>,
}

impl DatasetUpsert {
    pub fn is_update(&self) -> bool {
        self.id.is_some()
    }

    pub fn method(&self) -> Method {
        if self.is_update() {
            Method::PUT
        } else {
            Method::POST
        }
    }

    /// Text fields of the form, in submission order. Absent fields are left
    /// out and sequences are written as JSON text.
    pub fn form_fields(&self) -> ApiResult<Vec<(&'static str, String)>> {
        let mut fields = Vec::new();
        if let Some(id) = &self.id {
            fields.push(("id", id.to_string()));
        }
        let text = [
            ("name", &self.name),
            ("url", &self.url),
            ("description", &self.description),
            ("species", &self.species),
            ("title", &self.title),
        ];
        for (key, value) in text {
            if let Some(value) = value {
                fields.push((key, value.clone()));
            }
        }
        if let Some(readers) = &self.readers {
            fields.push(("readers", serde_json::to_string(readers)?));
        }
        Ok(fields)
    }

    pub fn to_form(&self) -> ApiResult<Form> {
        let mut form = Form::new();
        for (key, value) in self.form_fields()? {
            form = form.text(key, value);
        }
        if let Some(file) = &self.file {
            form = form.part(
                "file",
                Part::bytes(file.bytes.clone()).file_name(file.file_name.clone()),
            );
        }
        Ok(form)
    }
}

/// Renames one category value of a dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Builder)]
#[builder(setter(into))]
pub struct CategoryNameUpdate {
    #[serde(rename = "id")]
    pub dataset_id: ResourceId,
    #[serde(rename = "c")]
    pub category: String,
    #[serde(rename = "o")]
    pub original: String,
    #[serde(rename = "n")]
    pub new_name: String,
    #[builder(setter(into, strip_option), default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Builder)]
#[builder(setter(into))]
pub struct ViewUpsert {
    #[builder(setter(into, strip_option), default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<ResourceId>,
    pub ds_id: ResourceId,
    pub name: String,
    #[builder(setter(into, strip_option), default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Serialized explorer state
    #[builder(default)]
    pub value: Value,
}

impl ViewUpsert {
    pub fn method(&self) -> Method {
        upsert_method(&self.id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Builder)]
#[builder(setter(into))]
pub struct FeatureSetUpsert {
    #[builder(setter(into, strip_option), default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<ResourceId>,
    pub ds_id: ResourceId,
    pub name: String,
    #[builder(setter(into, strip_option), default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[builder(default)]
    pub features: Vec<String>,
}

impl FeatureSetUpsert {
    pub fn method(&self) -> Method {
        upsert_method(&self.id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Builder)]
#[builder(setter(into))]
pub struct JobSubmission {
    #[serde(rename = "id")]
    pub dataset_id: ResourceId,
    pub name: String,
    #[serde(rename = "type")]
    pub job_type: String,
    #[builder(default)]
    pub params: Value,
}

fn upsert_method(id: &Option<ResourceId>) -> Method {
    if id.is_some() {
        Method::PUT
    } else {
        Method::POST
    }
}

create_api_schema! {
    /// The signed-in user.
    User;
    values: {
        id: Option<String>,
        email: Option<String>,
        /// Whether the user may create datasets
        importer: Option<bool>,
    }
}

create_api_schema! {
    Dataset;
    values: {
        id: Option<ResourceId>,
        name: Option<String>,
        url: Option<String>,
        description: Option<String>,
        species: Option<String>,
        title: Option<String>,
        owner: Option<bool>,
        readers: Option<Vec<String>>,
    }
}

create_api_schema! {
    CategoryName;
    values: {
        category: Option<String>,
        original: Option<String>,
        new: Option<String>,
        color: Option<String>,
    }
}

create_api_schema! {
    View;
    values: {
        id: Option<ResourceId>,
        name: Option<String>,
        notes: Option<String>,
        email: Option<String>,
        last_updated: Option<String>,
        value: Option<Value>,
    }
}

create_api_schema! {
    FeatureSet;
    values: {
        id: Option<ResourceId>,
        name: Option<String>,
        category: Option<String>,
        features: Option<Vec<String>>,
    }
}

create_api_schema! {
    /// Reply to a dataset create or update.
    Created;
    values: {
        id: Option<ResourceId>,
    }
}

create_api_schema! {
    JobCreated;
    values: {
        id: Option<ResourceId>,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_resource_id_serializes_verbatim() {
        assert_eq!(serde_json::to_value(ResourceId::from(42)).unwrap(), json!(42));
        assert_eq!(
            serde_json::to_value(ResourceId::from("abc")).unwrap(),
            json!("abc")
        );
        assert_eq!(ResourceId::from(7i64).to_string(), "7");
        assert_eq!(ResourceId::from("x1").to_string(), "x1");
    }

    #[test]
    fn test_dataset_upsert_method_follows_id() {
        let create = DatasetUpsertBuilder::default()
            .name("pbmc3k")
            .build()
            .unwrap();
        assert_eq!(create.method(), Method::POST);

        let update = DatasetUpsertBuilder::default()
            .id("ds1")
            .name("pbmc3k")
            .build()
            .unwrap();
        assert_eq!(update.method(), Method::PUT);
    }

    #[test]
    fn test_form_fields_skip_absent_and_stringify_sequences() {
        let data = DatasetUpsertBuilder::default()
            .name("pbmc3k")
            .readers(vec!["a@x.org".to_string(), "b@x.org".to_string()])
            .build()
            .unwrap();

        let fields = data.form_fields().unwrap();
        assert_eq!(
            fields,
            vec![
                ("name", "pbmc3k".to_string()),
                ("readers", r#"["a@x.org","b@x.org"]"#.to_string()),
            ]
        );
    }

    #[test]
    fn test_form_fields_include_id_on_update() {
        let data = DatasetUpsertBuilder::default()
            .id(5)
            .description("updated")
            .build()
            .unwrap();
        let fields = data.form_fields().unwrap();
        assert_eq!(fields[0], ("id", "5".to_string()));
        assert_eq!(fields[1], ("description", "updated".to_string()));
        assert_eq!(fields.len(), 2);
    }

    #[test]
    fn test_view_upsert_omits_absent_id() {
        let view = ViewUpsertBuilder::default()
            .ds_id("ds1")
            .name("clusters")
            .value(json!({"embedding": "umap"}))
            .build()
            .unwrap();
        assert_eq!(view.method(), Method::POST);
        assert_eq!(
            serde_json::to_value(&view).unwrap(),
            json!({"ds_id": "ds1", "name": "clusters", "value": {"embedding": "umap"}})
        );
    }

    #[test]
    fn test_category_name_update_wire_names() {
        let update = CategoryNameUpdateBuilder::default()
            .dataset_id("ds1")
            .category("leiden")
            .original("0")
            .new_name("T cells")
            .build()
            .unwrap();
        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            json!({"id": "ds1", "c": "leiden", "o": "0", "n": "T cells"})
        );
    }

    #[test]
    fn test_job_submission_wire_names() {
        let job = JobSubmissionBuilder::default()
            .dataset_id(3)
            .name("markers")
            .job_type("de")
            .params(json!({"filter": null}))
            .build()
            .unwrap();
        assert_eq!(
            serde_json::to_value(&job).unwrap(),
            json!({"id": 3, "name": "markers", "type": "de", "params": {"filter": null}})
        );
    }

    #[test]
    fn test_schema_keeps_unknown_fields() {
        let dataset: Dataset =
            serde_json::from_value(json!({"id": "ds1", "name": "x", "nObs": 2700})).unwrap();
        assert_eq!(dataset.id, Some(ResourceId::from("ds1")));
        assert_eq!(dataset.name.as_deref(), Some("x"));
        assert_eq!(dataset.url, None);
        assert_eq!(dataset.extra.get("nObs"), Some(&json!(2700)));
    }

    #[test]
    fn test_feature_set_builder_requires_name() {
        let result = FeatureSetUpsertBuilder::default().ds_id("ds1").build();
        assert!(result.is_err());
    }
}
