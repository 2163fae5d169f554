use abha_api::client::ApiClient;
use abha_api::client::enrollment::RequestOtp;
use abha_api::client::error::RequestError;
use abha_api::client::session::CreateSession;
use abha_api::enrollment::OtpResponse;
use abha_api::session::SessionPayload;
use abha_lib::ids::TransactionId;

use super::FlowError;

pub const LOGIN_FALLBACK: &str = "Authentication failed";
pub const OTP_FALLBACK: &str = "Failed to send OTP";

/// the two remote calls the wizard makes
pub trait Gateway {
    fn create_session(
        &self,
        client_id: &str,
        client_secret: &str
    ) -> Result<SessionPayload, FlowError>;

    /// `txn_id` is only given when re-sending for an existing transaction
    fn request_otp(
        &self,
        token: &str,
        login_id: &str,
        scope: &str,
        txn_id: Option<&TransactionId>
    ) -> Result<OtpResponse, FlowError>;
}

/// maps a failed request onto the flow error shown to the user. gateway
/// responses without a message use `fallback` with the status appended.
pub fn request_failure(err: RequestError, fallback: &str) -> FlowError {
    match err {
        RequestError::Gateway(err) => FlowError::Gateway {
            status: err.status(),
            message: err.message_or(fallback),
        },
        RequestError::Validation(err) => FlowError::Validation(err),
        RequestError::Reqwest(err) => {
            tracing::warn!("gateway request failed: {err}");

            FlowError::Network(err.to_string())
        },
        RequestError::Url(err) => FlowError::Network(err.to_string()),
    }
}

impl Gateway for ApiClient {
    fn create_session(
        &self,
        client_id: &str,
        client_secret: &str
    ) -> Result<SessionPayload, FlowError> {
        CreateSession::client_credentials(client_id, client_secret)
            .send(self)
            .map_err(|e| request_failure(e, LOGIN_FALLBACK))
    }

    fn request_otp(
        &self,
        token: &str,
        login_id: &str,
        scope: &str,
        txn_id: Option<&TransactionId>
    ) -> Result<OtpResponse, FlowError> {
        let mut op = RequestOtp::aadhaar(token, login_id, scope);

        if let Some(txn) = txn_id {
            op.txn_id(txn);
        }

        op.send(self)
            .map_err(|e| request_failure(e, OTP_FALLBACK))
    }
}

#[cfg(test)]
mod test {
    use abha_api::GatewayError;

    use super::*;

    #[test]
    fn gateway_message_is_kept() {
        let err = RequestError::Gateway(GatewayError::new(401).with_message("Invalid Client ID or Secret"));

        match request_failure(err, LOGIN_FALLBACK) {
            FlowError::Gateway { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message, "Invalid Client ID or Secret");
            },
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn fallback_has_status() {
        let err = RequestError::Gateway(GatewayError::new(500));
        let flow_err = request_failure(err, OTP_FALLBACK);

        assert_eq!(flow_err.to_string(), "Failed to send OTP (500)");
    }
}
