use reqwest::blocking::Request;

use crate::client::error::RequestError;
use crate::client::{ApiClient, into_gateway_error};
use crate::headers::RequestMeta;
use crate::session::{SessionRequest, SessionPayload};

pub const SESSIONS_PATH: &str = "sessions";

/// exchanges client credentials for a gateway session
pub struct CreateSession {
    meta: RequestMeta,
    body: SessionRequest,
}

impl CreateSession {
    pub fn client_credentials<I, S>(client_id: I, client_secret: S) -> Self
    where
        I: AsRef<str>,
        S: AsRef<str>,
    {
        CreateSession {
            meta: RequestMeta::generate(),
            body: SessionRequest::client_credentials(client_id, client_secret),
        }
    }

    pub fn meta(&mut self, meta: RequestMeta) -> &mut Self {
        self.meta = meta;
        self
    }

    pub fn build(&self, client: &ApiClient) -> Result<Request, RequestError> {
        self.body.validate()?;

        Ok(client.gateway_post(SESSIONS_PATH, &self.meta)?
            .json(&self.body)
            .build()?)
    }

    pub fn send(self, client: &ApiClient) -> Result<SessionPayload, RequestError> {
        let req = self.build(client)?;
        let res = client.client.execute(req)?;

        if res.status().is_success() {
            Ok(res.json()?)
        } else {
            Err(RequestError::Gateway(into_gateway_error(res)?))
        }
    }
}
