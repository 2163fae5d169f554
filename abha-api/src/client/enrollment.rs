use reqwest::blocking::Request;

use abha_lib::ids::TransactionId;

use crate::client::error::RequestError;
use crate::client::{ApiClient, into_gateway_error};
use crate::enrollment::{OtpRequest, OtpResponse};
use crate::headers::RequestMeta;

pub const REQUEST_OTP_PATH: &str = "enrollment/request/otp";

/// asks the enrollment api to send an otp to the mobile registered with a
/// document
pub struct RequestOtp {
    meta: RequestMeta,
    token: String,
    body: OtpRequest,
}

impl RequestOtp {
    pub fn aadhaar<T, L, S>(token: T, login_id: L, scope: S) -> Self
    where
        T: Into<String>,
        L: Into<String>,
        S: Into<String>,
    {
        RequestOtp {
            meta: RequestMeta::generate(),
            token: token.into(),
            body: OtpRequest::aadhaar(login_id, scope),
        }
    }

    pub fn txn_id(&mut self, txn_id: &TransactionId) -> &mut Self {
        self.body.txn_id = txn_id.as_str().to_owned();
        self
    }

    pub fn meta(&mut self, meta: RequestMeta) -> &mut Self {
        self.meta = meta;
        self
    }

    pub fn build(&self, client: &ApiClient) -> Result<Request, RequestError> {
        Ok(client.enrollment_post(REQUEST_OTP_PATH, &self.meta)?
            .bearer_auth(&self.token)
            .json(&self.body)
            .build()?)
    }

    pub fn send(self, client: &ApiClient) -> Result<OtpResponse, RequestError> {
        let req = self.build(client)?;
        let res = client.client.execute(req)?;

        if res.status().is_success() {
            Ok(res.json()?)
        } else {
            Err(RequestError::Gateway(into_gateway_error(res)?))
        }
    }
}
