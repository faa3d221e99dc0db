//! reqwest implementation of the remote collaborators.

use reqwest::{Client, Method, StatusCode};
use serde::{Serialize, de::DeserializeOwned};
use uuid::Uuid;

use crate::{
    cart::CatalogProduct,
    drafts::{DraftFlow, DraftSnapshot, SessionId},
    dto::{
        auxiliary::{AuxiliaryForm, AuxiliaryReceipt},
        drafts::DraftRecord,
        orders::{NewOrder, OrderConfirmation},
        products::ProductList,
        reservations::{NewReservation, ReservationConfirmation},
    },
    models::Product,
    response::ApiResponse,
};

use super::{
    api::{DraftApi, SubmissionApi},
    config::ClientConfig,
    error::{ClientError, ClientResult},
};

#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
}

impl HttpClient {
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn draft_path(flow: DraftFlow, session_id: &SessionId) -> String {
        format!("api/drafts/{}/{}", flow.as_str(), session_id)
    }

    async fn send<T, B>(&self, method: Method, path: &str, body: Option<&B>) -> ClientResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let mut request = self.client.request(method, self.url(path));
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await?;
        Self::handle_response(response).await
    }

    /// Unwraps the `ApiResponse` envelope and maps error statuses.
    async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await?;
            let message = serde_json::from_str::<ApiResponse<serde_json::Value>>(&text)
                .map(|body| body.message)
                .unwrap_or(text);
            return Err(match status {
                StatusCode::NOT_FOUND => ClientError::NotFound(message),
                StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                    ClientError::Validation(message)
                }
                _ => ClientError::Transient {
                    status: status.as_u16(),
                    message,
                },
            });
        }

        response
            .json::<ApiResponse<T>>()
            .await?
            .data
            .ok_or_else(|| ClientError::InvalidResponse("missing data".to_string()))
    }

    pub async fn list_products(&self) -> ClientResult<Vec<CatalogProduct>> {
        let list: ProductList = self.send::<_, ()>(Method::GET, "api/products", None).await?;
        Ok(list.items.into_iter().map(CatalogProduct::from).collect())
    }

    pub async fn product(&self, id: Uuid) -> ClientResult<CatalogProduct> {
        let product: Product = self
            .send::<_, ()>(Method::GET, &format!("api/products/{id}"), None)
            .await?;
        Ok(product.into())
    }
}

impl DraftApi for HttpClient {
    async fn get_draft(
        &self,
        flow: DraftFlow,
        session_id: &SessionId,
    ) -> ClientResult<Option<DraftSnapshot>> {
        let path = Self::draft_path(flow, session_id);
        match self.send::<DraftRecord, ()>(Method::GET, &path, None).await {
            Ok(record) => Ok(Some(record.snapshot)),
            Err(ClientError::NotFound(_)) => Ok(None),
            Err(err) => Err(err),
        }
    }

    async fn save_draft(
        &self,
        flow: DraftFlow,
        session_id: &SessionId,
        snapshot: &DraftSnapshot,
    ) -> ClientResult<()> {
        let path = Self::draft_path(flow, session_id);
        self.send::<DraftRecord, _>(Method::PUT, &path, Some(snapshot))
            .await?;
        Ok(())
    }

    async fn delete_draft(&self, flow: DraftFlow, session_id: &SessionId) -> ClientResult<()> {
        let path = Self::draft_path(flow, session_id);
        self.send::<serde_json::Value, ()>(Method::DELETE, &path, None)
            .await?;
        Ok(())
    }
}

impl SubmissionApi for HttpClient {
    async fn create_reservation(
        &self,
        reservation: &NewReservation,
    ) -> ClientResult<ReservationConfirmation> {
        self.send(Method::POST, "api/reservations", Some(reservation))
            .await
    }

    async fn create_order(&self, order: &NewOrder) -> ClientResult<OrderConfirmation> {
        self.send(Method::POST, "api/orders", Some(order)).await
    }

    async fn submit_auxiliary_form(
        &self,
        flow: DraftFlow,
        session_id: &SessionId,
        form: &AuxiliaryForm,
    ) -> ClientResult<()> {
        let path = format!("api/auxiliary/{}/{}", flow.as_str(), session_id);
        self.send::<AuxiliaryReceipt, _>(Method::POST, &path, Some(form))
            .await?;
        Ok(())
    }
}
