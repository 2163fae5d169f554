use serde::{Serialize, Deserialize};

use abha_lib::contact::{full_contact, masked_suffix};
use abha_lib::ids::TransactionId;

pub const SCOPE_ENROL: &str = "abha-enrol";
pub const LOGIN_HINT_AADHAAR: &str = "aadhaar";
pub const OTP_SYSTEM_AADHAAR: &str = "aadhaar";

/// body of the enrollment otp request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OtpRequest {
    pub txn_id: String,
    pub scope: Vec<String>,
    pub login_hint: String,
    pub login_id: String,
    pub otp_system: String,
}

impl OtpRequest {
    /// first request of an enrollment, no transaction exists yet so the
    /// `txnId` is sent empty.
    ///
    /// `login_id` is the encrypted document number as expected by the
    /// gateway.
    pub fn aadhaar<L, S>(login_id: L, scope: S) -> Self
    where
        L: Into<String>,
        S: Into<String>,
    {
        OtpRequest {
            txn_id: String::new(),
            scope: vec![scope.into()],
            login_hint: LOGIN_HINT_AADHAAR.to_owned(),
            login_id: login_id.into(),
            otp_system: OTP_SYSTEM_AADHAAR.to_owned(),
        }
    }

    pub fn with_txn_id(mut self, txn_id: &TransactionId) -> Self {
        self.txn_id = txn_id.as_str().to_owned();
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OtpResponse {
    #[serde(default)]
    pub txn_id: Option<String>,

    #[serde(default)]
    pub message: Option<String>,

    #[serde(default)]
    pub mobile: Option<String>,
}

impl OtpResponse {
    pub fn transaction_id(&self) -> TransactionId {
        TransactionId::from(self.txn_id.clone())
    }

    /// the digits the gateway revealed of the mobile number registered with
    /// the document. an explicit `mobile` field, complete or masked, wins over
    /// a masked number in the text of `message`.
    pub fn registered_mobile_hint(&self) -> Option<String> {
        let from_mobile = self.mobile.as_deref()
            .and_then(|mobile| full_contact(mobile).or_else(|| masked_suffix(mobile)));

        if from_mobile.is_some() {
            return from_mobile;
        }

        self.message.as_deref()?
            .split_whitespace()
            .rev()
            .find_map(masked_suffix)
    }
}
