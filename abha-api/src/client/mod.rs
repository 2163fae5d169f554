use std::time::Duration;

use reqwest::Url;
use reqwest::blocking::{RequestBuilder, Response};

pub mod error;
pub mod session;
pub mod enrollment;

use error::{ApiClientError, RequestError};
use crate::error::GatewayError;
use crate::headers::{RequestMeta, REQUEST_ID, TIMESTAMP, X_CM_ID};

pub const DEFAULT_GATEWAY_URL: &str = "https://dev.abdm.gov.in/api/hiecm/gateway/v3/";
pub const DEFAULT_ENROLLMENT_URL: &str = "https://abhasbx.abdm.gov.in/abha/api/v3/";
pub const DEFAULT_CM_ID: &str = "sbx";
pub const DEFAULT_USER_AGENT: &str = "abha-api-client/0.1.0";

pub struct Info {
    pub gateway: Url,
    pub enrollment: Url,
    pub cm_id: String,
}

pub struct ApiClient {
    pub(crate) client: reqwest::blocking::Client,
    pub(crate) info: Info,
}

/// `Url::join` drops the last path segment unless the base ends with a slash
fn parse_base<U>(given: U) -> Result<Url, url::ParseError>
where
    U: AsRef<str>
{
    let given = given.as_ref().trim();

    if given.ends_with('/') {
        Url::parse(given)
    } else {
        Url::parse(&format!("{given}/"))
    }
}

impl ApiClient {
    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder {
            gateway: None,
            enrollment: None,
            cm_id: None,
            agent: None,
            timeout: None,
        }
    }

    pub fn info(&self) -> &Info {
        &self.info
    }

    /// POST against the session gateway with the correlation headers set
    pub(crate) fn gateway_post<P>(&self, path: P, meta: &RequestMeta) -> Result<RequestBuilder, RequestError>
    where
        P: AsRef<str>
    {
        let url = self.info.gateway.join(path.as_ref())?;

        tracing::debug!("POST {url} request id: {}", meta.request_id);

        Ok(self.client.post(url)
            .header(REQUEST_ID, &meta.request_id)
            .header(TIMESTAMP, &meta.timestamp)
            .header(X_CM_ID, &self.info.cm_id))
    }

    /// POST against the enrollment api with the correlation headers set
    pub(crate) fn enrollment_post<P>(&self, path: P, meta: &RequestMeta) -> Result<RequestBuilder, RequestError>
    where
        P: AsRef<str>
    {
        let url = self.info.enrollment.join(path.as_ref())?;

        tracing::debug!("POST {url} request id: {}", meta.request_id);

        Ok(self.client.post(url)
            .header(REQUEST_ID, &meta.request_id)
            .header(TIMESTAMP, &meta.timestamp))
    }
}

/// turns a non success response into a [`GatewayError`]
pub(crate) fn into_gateway_error(res: Response) -> Result<GatewayError, RequestError> {
    let status = res.status().as_u16();
    let body = res.bytes()?;

    let err = GatewayError::from_body(status, &body);

    tracing::warn!("gateway responded with {err}");

    Ok(err)
}

pub struct ApiClientBuilder {
    gateway: Option<Url>,
    enrollment: Option<Url>,
    cm_id: Option<String>,
    agent: Option<String>,
    timeout: Option<Duration>,
}

impl ApiClientBuilder {
    pub fn gateway_url<U>(&mut self, url: U) -> Result<(), ApiClientError>
    where
        U: AsRef<str>
    {
        self.gateway = Some(parse_base(url)?);

        Ok(())
    }

    pub fn enrollment_url<U>(&mut self, url: U) -> Result<(), ApiClientError>
    where
        U: AsRef<str>
    {
        self.enrollment = Some(parse_base(url)?);

        Ok(())
    }

    pub fn cm_id<C>(&mut self, cm_id: C)
    where
        C: Into<String>
    {
        self.cm_id = Some(cm_id.into());
    }

    pub fn user_agent<U>(&mut self, user_agent: U)
    where
        U: Into<String>
    {
        self.agent = Some(user_agent.into());
    }

    pub fn timeout(&mut self, timeout: Duration) {
        self.timeout = Some(timeout);
    }

    pub fn build(self) -> Result<ApiClient, ApiClientError> {
        let user_agent = self.agent.unwrap_or(DEFAULT_USER_AGENT.into());
        let gateway = match self.gateway {
            Some(url) => url,
            None => parse_base(DEFAULT_GATEWAY_URL)?,
        };
        let enrollment = match self.enrollment {
            Some(url) => url,
            None => parse_base(DEFAULT_ENROLLMENT_URL)?,
        };

        let mut builder = reqwest::blocking::Client::builder()
            .user_agent(user_agent);

        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder.build()?;

        Ok(ApiClient {
            client,
            info: Info {
                gateway,
                enrollment,
                cm_id: self.cm_id.unwrap_or(DEFAULT_CM_ID.into()),
            }
        })
    }
}
