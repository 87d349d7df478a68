//! Backend operations, one method per endpoint.

use crate::client::{ApiClient, ApiResult};
use crate::model::{
    CategoryName, CategoryNameUpdate, Created, Dataset, DatasetUpsert, FeatureSet,
    FeatureSetUpsert, JobCreated, JobSubmission, ResourceId, User, View, ViewUpsert,
};
use reqwest::header::CONTENT_TYPE;
use reqwest::Method;
use serde_json::json;
use tracing::{debug, instrument};

impl ApiClient {
    /// Fetches the signed-in user.
    #[instrument(skip(self))]
    pub async fn get_user(&self) -> ApiResult<User> {
        let request = self
            .request(Method::GET, "/user")
            .header(CONTENT_TYPE, "application/json");
        let response = self.execute(request).await?;
        let response = Self::check_status(response).await?;
        Self::decode_json(response).await
    }

    pub async fn get_datasets(&self) -> ApiResult<Vec<Dataset>> {
        self.get("/datasets", None::<&()>).await
    }

    pub async fn delete_dataset(&self, id: impl Into<ResourceId>) -> ApiResult<()> {
        let id = id.into();
        self.send_json_status(Method::DELETE, "/dataset", &json!({ "id": id }))
            .await
    }

    /// Creates the dataset when `data.id` is absent, otherwise updates it.
    ///
    /// The payload goes out as a multipart form so that a data file can ride
    /// along. Dropping the returned future aborts the upload.
    #[instrument(skip(self, data), fields(update = data.is_update()))]
    pub async fn upsert_dataset(&self, data: &DatasetUpsert) -> ApiResult<Created> {
        let form = data.to_form()?;
        debug!("Dataset form fields: {:?}", data.form_fields()?);
        self.send_multipart(data.method(), "/dataset", form).await
    }

    pub async fn set_category_name(&self, data: &CategoryNameUpdate) -> ApiResult<()> {
        self.send_json_status(Method::PUT, "/category_name", data)
            .await
    }

    /// Creates the view when `data.id` is absent, otherwise updates it.
    pub async fn upsert_view(&self, data: &ViewUpsert) -> ApiResult<View> {
        self.send_json(data.method(), "/view", data).await
    }

    /// Creates the feature set when `data.id` is absent, otherwise updates it.
    pub async fn upsert_feature_set(&self, data: &FeatureSetUpsert) -> ApiResult<FeatureSet> {
        self.send_json(data.method(), "/feature_set", data).await
    }

    /// Downloads the saved filters of a dataset as text.
    ///
    /// Yields `Ok(None)` when the server answers with an error status, so
    /// callers can treat "nothing to export" and "not allowed" alike.
    pub async fn export_dataset_filters(
        &self,
        dataset_id: impl Into<ResourceId>,
    ) -> ApiResult<Option<String>> {
        let dataset_id = dataset_id.into();
        self.get_text_or_none("/export_filters", Some(&[("id", dataset_id.to_string())]))
            .await
    }

    pub async fn submit_job(&self, data: &JobSubmission) -> ApiResult<JobCreated> {
        self.send_json(Method::POST, "/job", data).await
    }
}

define_lookup_endpoint! {
    fn get_dataset(id) -> Dataset;
    endpoint: "/dataset";
}

define_lookup_endpoint! {
    /// Category renames of a dataset.
    fn get_category_names(id) -> Vec<CategoryName>;
    endpoint: "/category_name";
}

define_lookup_endpoint! {
    /// Views saved for a dataset.
    fn get_views(id) -> Vec<View>;
    endpoint: "/views";
}

define_lookup_endpoint! {
    fn get_view(id) -> View;
    endpoint: "/view";
}

define_scoped_delete! {
    /// Deletes a saved view of dataset `ds_id`.
    view
}

define_scoped_delete! {
    /// Deletes a feature set of dataset `ds_id`.
    feature_set
}
