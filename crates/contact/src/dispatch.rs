use std::sync::Arc;

use serde::Serialize;

pub const SERVICE_NOT_SPECIFIED: &str = "not specified";
pub const DEFAULT_TO_NAME: &str = "Portfolio Contact";

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EmailParams {
    pub from_name: String,
    pub from_email: String,
    pub message: String,
    pub service_type: Option<String>,
    pub to_name: Option<String>,
}

impl EmailParams {
    pub fn service_type_or_default(&self) -> &str {
        self.service_type.as_deref().unwrap_or(SERVICE_NOT_SPECIFIED)
    }

    pub fn to_name_or_default(&self) -> &str {
        self.to_name.as_deref().unwrap_or(DEFAULT_TO_NAME)
    }
}

/// Boundary to an outbound mail provider.
///
/// Implementations make at most one delivery attempt per call and report
/// only whether it was acknowledged; failure detail is logged, not returned.
#[async_trait::async_trait]
pub trait MailDispatch: Send + Sync {
    async fn send_email(&self, params: EmailParams) -> bool;
}

#[async_trait::async_trait]
impl<T: MailDispatch + ?Sized> MailDispatch for Arc<T> {
    async fn send_email(&self, params: EmailParams) -> bool {
        (**self).send_email(params).await
    }
}
