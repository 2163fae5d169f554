//! the enrollment wizard as a state machine.
//!
//! exactly one [`Screen`] is active at a time. moving forward pushes the
//! current screen onto the history and going back pops it, so a previous step
//! comes back exactly as it was left. any failed step leaves the current
//! screen in place.

use std::time::{Duration, Instant};

use chrono::Utc;
use rand::Rng;

use abha_api::enrollment::SCOPE_ENROL;
use abha_api::session::SessionRequest;
use abha_lib::ValidationError;
use abha_lib::account::{suggest_addresses, AccountNumber, AccountRecord, NameFragments};
use abha_lib::contact::{ContactNumber, Passcode};
use abha_lib::document::DocumentNumber;

use crate::session::{Session, SessionStore};

pub mod context;
pub mod error;
pub mod forms;
pub mod gateway;
pub mod timer;

pub use context::VerificationContext;
pub use error::FlowError;
pub use forms::{AddressForm, DocumentForm, PasscodeForm};
pub use gateway::Gateway;

use timer::Delay;

/// sent in place of the encrypted document number, encryption is not
/// implemented
pub const DEFAULT_LOGIN_ID: &str = "ENCRYPTED_DOCUMENT_NUMBER_PLACEHOLDER";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Document,
    Biometric,
    License,
}

impl Method {
    pub fn label(&self) -> &'static str {
        match self {
            Method::Document => "aadhaar number",
            Method::Biometric => "biometric verification",
            Method::License => "driving license verification",
        }
    }
}

#[derive(Debug, Clone)]
pub struct FlowOptions {
    pub scope: String,
    pub login_id: String,
    pub verify_delay: Delay,
    pub create_delay: Delay,
    pub resend_cooldown: Duration,
    pub fragments: NameFragments,
}

impl Default for FlowOptions {
    fn default() -> Self {
        FlowOptions {
            scope: SCOPE_ENROL.into(),
            login_id: DEFAULT_LOGIN_ID.into(),
            verify_delay: Delay::from_millis(2000),
            create_delay: Delay::from_millis(2000),
            resend_cooldown: Duration::from_secs(30),
            fragments: NameFragments::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Screen {
    Login,
    Dashboard,
    MethodSelect,
    Document(DocumentForm),
    Passcode(PasscodeForm),
    MobileMismatch(VerificationContext),
    Address(AddressForm),
    Summary(AccountRecord),
}

impl Screen {
    pub fn name(&self) -> &'static str {
        match self {
            Screen::Login => "login",
            Screen::Dashboard => "dashboard",
            Screen::MethodSelect => "method selection",
            Screen::Document(_) => "document verification",
            Screen::Passcode(_) => "OTP confirmation",
            Screen::MobileMismatch(_) => "mobile mismatch",
            Screen::Address(_) => "address selection",
            Screen::Summary(_) => "account summary",
        }
    }

    pub fn context(&self) -> Option<&VerificationContext> {
        match self {
            Screen::Document(form) => Some(form.context()),
            Screen::Passcode(form) => Some(form.context()),
            Screen::MobileMismatch(context) => Some(context),
            Screen::Address(form) => Some(form.context()),
            _ => None,
        }
    }

    fn enter(&mut self, now: Instant, options: &FlowOptions) {
        if let Screen::Passcode(form) = self {
            form.start_cooldown(now, options.resend_cooldown);
        }
    }

    fn leave(&mut self) {
        if let Screen::Passcode(form) = self {
            form.clear_cooldown();
        }
    }
}

pub struct Flow {
    options: FlowOptions,
    store: SessionStore,
    session: Option<Session>,
    current: Screen,
    history: Vec<Screen>,
}

impl Flow {
    /// starts at the dashboard when the store holds a session that has not
    /// expired, otherwise at login. an expired session is removed.
    pub fn new(options: FlowOptions, mut store: SessionStore) -> Self {
        let session = match store.session() {
            Some(session) if session.is_expired(&Utc::now()) => {
                tracing::info!("stored session has expired");

                store.clear_session();

                if let Err(err) = store.save() {
                    tracing::warn!("failed to remove expired session: {err}");
                }

                None
            },
            found => found,
        };

        let current = if session.is_some() {
            Screen::Dashboard
        } else {
            Screen::Login
        };

        Flow {
            options,
            store,
            session,
            current,
            history: Vec::new(),
        }
    }

    pub fn screen(&self) -> &Screen {
        &self.current
    }

    pub fn history(&self) -> &[Screen] {
        &self.history
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// seconds until the OTP can be sent again, `None` off the OTP screen
    pub fn cooldown_remaining(&self, now: Instant) -> Option<u64> {
        match &self.current {
            Screen::Passcode(form) => form.cooldown_remaining(now),
            _ => None,
        }
    }

    fn wrong_step(&self, action: &'static str) -> FlowError {
        FlowError::WrongStep {
            action,
            screen: self.current.name(),
        }
    }

    fn advance(&mut self, mut next: Screen) {
        tracing::info!("{} -> {}", self.current.name(), next.name());

        next.enter(Instant::now(), &self.options);

        let mut prev = std::mem::replace(&mut self.current, next);
        prev.leave();

        self.history.push(prev);
    }

    fn reset(&mut self, screen: Screen) {
        tracing::info!("{} -> {} (history cleared)", self.current.name(), screen.name());

        self.current.leave();
        self.history.clear();
        self.current = screen;
    }

    /// returns to the screen before the current one
    pub fn back(&mut self) -> Result<(), FlowError> {
        let mut prev = self.history.pop().ok_or(FlowError::NoPreviousStep)?;

        tracing::info!("{} <- {}", prev.name(), self.current.name());

        prev.enter(Instant::now(), &self.options);

        let mut left = std::mem::replace(&mut self.current, prev);
        left.leave();

        Ok(())
    }

    fn invalidate_session(&mut self) {
        self.session = None;
        self.store.clear_session();

        if let Err(err) = self.store.save() {
            tracing::warn!("failed to remove session from store: {err}");
        }
    }

    fn access_token(&mut self) -> Result<String, FlowError> {
        let expired = match &self.session {
            Some(session) => session.is_expired(&Utc::now()),
            None => return Err(FlowError::SessionMissing),
        };

        if expired {
            self.invalidate_session();

            return Err(FlowError::SessionExpired);
        }

        self.session.as_ref()
            .and_then(|s| s.access_token())
            .map(|t| t.to_owned())
            .ok_or(FlowError::TokenMissing)
    }

    /// exchanges client credentials for a session, persists it and moves to
    /// the dashboard
    pub fn login<G>(&mut self, gateway: &G, client_id: &str, client_secret: &str) -> Result<(), FlowError>
    where
        G: Gateway + ?Sized
    {
        if !matches!(self.current, Screen::Login | Screen::Dashboard) {
            return Err(self.wrong_step("log in"));
        }

        let request = SessionRequest::client_credentials(client_id, client_secret);
        request.validate()?;

        let payload = gateway.create_session(&request.client_id, &request.client_secret)?;
        let session = Session::new(payload, Utc::now());

        if session.access_token().is_none() {
            tracing::warn!("session response did not include an access token");
        }

        self.store.save_session(&session)?;

        self.session = Some(session);
        self.reset(Screen::Dashboard);

        Ok(())
    }

    /// drops the session from memory and the store. `true` if one was stored
    pub fn logout(&mut self) -> Result<bool, FlowError> {
        self.session = None;

        let removed = self.store.clear_session();

        self.reset(Screen::Login);
        self.store.save()?;

        Ok(removed)
    }

    pub fn create_new(&mut self) -> Result<(), FlowError> {
        if !matches!(self.current, Screen::Dashboard) {
            return Err(self.wrong_step("start a new enrollment"));
        }

        self.advance(Screen::MethodSelect);

        Ok(())
    }

    pub fn verify_existing(&self) -> Result<(), FlowError> {
        if !matches!(self.current, Screen::Dashboard) {
            return Err(self.wrong_step("verify an existing account"));
        }

        Err(FlowError::Unsupported("verifying an existing account"))
    }

    pub fn choose_method(&mut self, method: Method) -> Result<(), FlowError> {
        if !matches!(self.current, Screen::MethodSelect) {
            return Err(self.wrong_step("choose a verification method"));
        }

        match method {
            Method::Document => {
                self.advance(Screen::Document(DocumentForm::new(VerificationContext::default())));

                Ok(())
            },
            other => Err(FlowError::Unsupported(other.label())),
        }
    }

    pub fn document_input(&mut self, given: &str) -> Result<(), FlowError> {
        match &mut self.current {
            Screen::Document(form) => {
                form.set_input(given);

                Ok(())
            },
            _ => Err(self.wrong_step("enter a document number")),
        }
    }

    /// requests an OTP for the entered document number. nothing is sent
    /// unless the number is complete and a usable session exists.
    pub fn submit_document<G>(&mut self, gateway: &G) -> Result<(), FlowError>
    where
        G: Gateway + ?Sized
    {
        let (document, context) = match &self.current {
            Screen::Document(form) => (
                DocumentNumber::try_from(form.input())?,
                form.context().clone(),
            ),
            _ => return Err(self.wrong_step("submit a document number")),
        };

        let token = self.access_token()?;

        tracing::debug!("requesting OTP for document {document}");

        let response = gateway.request_otp(
            &token,
            &self.options.login_id,
            &self.options.scope,
            None
        )?;
        let txn = response.transaction_id();

        if txn.is_placeholder() {
            tracing::warn!("OTP response did not include a transaction id");
        }

        let context = context.with_document(document)
            .with_transaction(txn);

        self.advance(Screen::Passcode(PasscodeForm::new(
            context,
            response.registered_mobile_hint()
        )));

        Ok(())
    }

    pub fn passcode_input(&mut self, given: &str) -> Result<(), FlowError> {
        match &mut self.current {
            Screen::Passcode(form) => {
                form.set_passcode(given);

                Ok(())
            },
            _ => Err(self.wrong_step("enter an OTP")),
        }
    }

    pub fn contact_input(&mut self, given: &str) -> Result<(), FlowError> {
        match &mut self.current {
            Screen::Passcode(form) => {
                form.set_contact(given);

                Ok(())
            },
            _ => Err(self.wrong_step("enter a mobile number")),
        }
    }

    /// sends the OTP again for the current transaction once the cooldown has
    /// run out, then restarts the cooldown
    pub fn resend_otp<G>(&mut self, gateway: &G, now: Instant) -> Result<(), FlowError>
    where
        G: Gateway + ?Sized
    {
        let txn = match &self.current {
            Screen::Passcode(form) => {
                let remaining = form.cooldown_remaining(now).unwrap_or(0);

                if remaining > 0 {
                    return Err(FlowError::CooldownActive(remaining));
                }

                form.context().transaction_id.clone()
            },
            _ => return Err(self.wrong_step("resend the OTP")),
        };

        let token = self.access_token()?;
        let response = gateway.request_otp(
            &token,
            &self.options.login_id,
            &self.options.scope,
            txn.as_ref()
        )?;

        if let Screen::Passcode(form) = &mut self.current {
            let updated = response.transaction_id();

            if !updated.is_placeholder() {
                form.context_mut().transaction_id = Some(updated);
            }

            form.set_hint(response.registered_mobile_hint());
            form.clear_passcode();
            form.start_cooldown(now, self.options.resend_cooldown);
        }

        tracing::info!("OTP sent again");

        Ok(())
    }

    /// checks the OTP and mobile number then moves to address selection when
    /// the number matches the one registered with the document, or to the
    /// mismatch notice when it does not
    pub fn submit_passcode(&mut self) -> Result<(), FlowError> {
        let (context, contact, matched) = match &self.current {
            Screen::Passcode(form) => {
                Passcode::try_from(form.passcode())?;

                let contact = ContactNumber::try_from(form.contact())?;
                let matched = form.hint()
                    .map(|hint| contact.matches_registered(hint))
                    .unwrap_or(false);

                (form.context().clone(), contact, matched)
            },
            _ => return Err(self.wrong_step("verify the OTP")),
        };

        self.options.verify_delay.wait();

        let context = context.with_contact(contact, matched);

        if matched {
            let candidates = suggest_addresses(&self.options.fragments);

            self.advance(Screen::Address(AddressForm::new(context, candidates)));
        } else {
            tracing::info!("mobile number does not match the registered number");

            self.advance(Screen::MobileMismatch(context));
        }

        Ok(())
    }

    /// selects by zero based position in the candidate list
    pub fn select_address(&mut self, index: usize) -> Result<(), FlowError> {
        match &mut self.current {
            Screen::Address(form) => {
                form.select(index)?;

                Ok(())
            },
            _ => Err(self.wrong_step("select an address")),
        }
    }

    pub fn select_address_value(&mut self, given: &str) -> Result<(), FlowError> {
        match &mut self.current {
            Screen::Address(form) => {
                form.select_value(given)?;

                Ok(())
            },
            _ => Err(self.wrong_step("select an address")),
        }
    }

    /// creates the account for the selected address
    pub fn submit_address<R>(&mut self, rng: &mut R) -> Result<(), FlowError>
    where
        R: Rng + ?Sized
    {
        let (context, address) = match &self.current {
            Screen::Address(form) => (
                form.context().clone(),
                form.selected().cloned().ok_or(ValidationError::NoSelection)?,
            ),
            _ => return Err(self.wrong_step("create the account")),
        };

        let document = context.document_number.ok_or(FlowError::Incomplete("document number"))?;
        let contact = context.contact_number.ok_or(FlowError::Incomplete("mobile number"))?;

        self.options.create_delay.wait();

        let record = AccountRecord {
            account_number: AccountNumber::generate(rng),
            account_address: address,
            linked_contact_number: contact,
            linked_document_number: document,
        };

        tracing::info!("created account {}", record.account_number);

        self.advance(Screen::Summary(record));

        Ok(())
    }

    /// leaves the summary for the dashboard, the finished enrollment can not
    /// be returned to
    pub fn finish(&mut self) -> Result<(), FlowError> {
        if !matches!(self.current, Screen::Summary(_)) {
            return Err(self.wrong_step("finish"));
        }

        self.reset(Screen::Dashboard);

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use std::cell::{Cell, RefCell};

    use rand::SeedableRng;
    use rand::rngs::SmallRng;
    use serde_json::json;

    use abha_api::enrollment::OtpResponse;
    use abha_api::session::SessionPayload;
    use abha_lib::ids::TransactionId;

    use super::*;
    use crate::session::SESSION_KEY;

    const REGISTERED_MESSAGE: &str = "OTP sent to Aadhaar registered mobile number ending with ******3210";

    #[derive(Default)]
    struct FakeGateway {
        session_calls: Cell<usize>,
        otp_calls: RefCell<Vec<(String, Option<String>)>>,
        fail_status: Option<(u16, &'static str)>,
        offline: bool,
        no_txn: bool,
        message: Option<&'static str>,
    }

    impl FakeGateway {
        fn otp_count(&self) -> usize {
            self.otp_calls.borrow().len()
        }

        fn failure(&self) -> Option<FlowError> {
            if self.offline {
                return Some(FlowError::Network("connection refused".into()));
            }

            self.fail_status.map(|(status, message)| FlowError::Gateway {
                status,
                message: message.into(),
            })
        }
    }

    impl Gateway for FakeGateway {
        fn create_session(&self, client_id: &str, _client_secret: &str) -> Result<SessionPayload, FlowError> {
            self.session_calls.set(self.session_calls.get() + 1);

            if let Some(err) = self.failure() {
                return Err(err);
            }

            Ok(SessionPayload::new(json!({
                "accessToken": format!("token-{client_id}"),
                "expiresIn": 1800,
                "tokenType": "bearer"
            })))
        }

        fn request_otp(
            &self,
            token: &str,
            _login_id: &str,
            _scope: &str,
            txn_id: Option<&TransactionId>
        ) -> Result<OtpResponse, FlowError> {
            self.otp_calls.borrow_mut().push((
                token.to_owned(),
                txn_id.map(|t| t.as_str().to_owned())
            ));

            if let Some(err) = self.failure() {
                return Err(err);
            }

            Ok(OtpResponse {
                txn_id: if self.no_txn {
                    None
                } else {
                    Some(format!("txn-{}", self.otp_count()))
                },
                message: Some(self.message.unwrap_or(REGISTERED_MESSAGE).into()),
                mobile: None,
            })
        }
    }

    fn options() -> FlowOptions {
        FlowOptions {
            verify_delay: Delay::from_millis(0),
            create_delay: Delay::from_millis(0),
            ..FlowOptions::default()
        }
    }

    fn store_with(payload: serde_json::Value) -> SessionStore {
        let mut store = SessionStore::memory();
        store.put_session(&Session::new(SessionPayload::new(payload), Utc::now()));
        store
    }

    fn logged_in() -> Flow {
        Flow::new(options(), store_with(json!({"accessToken": "token-abc"})))
    }

    fn at_document() -> Flow {
        let mut flow = logged_in();
        flow.create_new().unwrap();
        flow.choose_method(Method::Document).unwrap();
        flow
    }

    fn at_passcode(gateway: &FakeGateway) -> Flow {
        let mut flow = at_document();
        flow.document_input("1234 5678 9012").unwrap();
        flow.submit_document(gateway).unwrap();
        flow
    }

    fn at_address(gateway: &FakeGateway) -> Flow {
        let mut flow = at_passcode(gateway);
        flow.passcode_input("123456").unwrap();
        flow.contact_input("9876543210").unwrap();
        flow.submit_passcode().unwrap();
        flow
    }

    #[test]
    fn starts_at_login_without_session() {
        let flow = Flow::new(options(), SessionStore::memory());

        assert!(matches!(flow.screen(), Screen::Login));
        assert!(flow.session().is_none());
    }

    #[test]
    fn stored_session_starts_at_dashboard() {
        let flow = logged_in();

        assert!(matches!(flow.screen(), Screen::Dashboard));
        assert_eq!(flow.session().and_then(|s| s.access_token()), Some("token-abc"));
    }

    #[test]
    fn expired_session_is_dropped_on_start() {
        let mut store = SessionStore::memory();
        store.put_session(&Session::new(
            SessionPayload::new(json!({"accessToken": "old", "expiresIn": 60})),
            Utc::now() - chrono::Duration::hours(1)
        ));

        let flow = Flow::new(options(), store);

        assert!(matches!(flow.screen(), Screen::Login));
        assert!(flow.store().get(SESSION_KEY).is_none());
    }

    #[test]
    fn login_blank_fields_make_no_call() {
        let gateway = FakeGateway::default();
        let mut flow = Flow::new(options(), SessionStore::memory());

        let result = flow.login(&gateway, "  ", "secret");

        assert!(matches!(
            result,
            Err(FlowError::Validation(ValidationError::Required { field: "client ID" }))
        ));
        assert!(matches!(
            flow.login(&gateway, "id", ""),
            Err(FlowError::Validation(ValidationError::Required { field: "client secret" }))
        ));
        assert_eq!(gateway.session_calls.get(), 0);
        assert!(matches!(flow.screen(), Screen::Login));
    }

    #[test]
    fn login_persists_session() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("abha_session.json");
        let gateway = FakeGateway::default();
        let mut flow = Flow::new(options(), SessionStore::load(&path).unwrap());

        flow.login(&gateway, " SBX_001 ", "secret").unwrap();

        assert!(matches!(flow.screen(), Screen::Dashboard));
        assert!(flow.history().is_empty());
        assert_eq!(gateway.session_calls.get(), 1);

        let reloaded = SessionStore::load(&path).unwrap();

        assert_eq!(
            reloaded.get(SESSION_KEY),
            Some(&json!({"accessToken": "token-SBX_001", "expiresIn": 1800, "tokenType": "bearer"}))
        );

        let restarted = Flow::new(options(), reloaded);

        assert!(matches!(restarted.screen(), Screen::Dashboard));
    }

    #[test]
    fn login_save_failure_keeps_logged_out() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("abha_session.json");
        let gateway = FakeGateway::default();
        let mut flow = Flow::new(options(), SessionStore::load(&path).unwrap());

        assert!(matches!(
            flow.login(&gateway, "SBX_001", "secret"),
            Err(FlowError::Storage(_))
        ));

        assert!(matches!(flow.screen(), Screen::Login));
        assert!(flow.session().is_none());
        assert!(flow.store().session().is_none());
    }

    #[test]
    fn login_failures_stay_on_login() {
        let rejected = FakeGateway {
            fail_status: Some((401, "Invalid Client ID or Secret")),
            ..FakeGateway::default()
        };
        let mut flow = Flow::new(options(), SessionStore::memory());

        let err = flow.login(&rejected, "id", "secret").unwrap_err();

        assert_eq!(err.to_string(), "Invalid Client ID or Secret");
        assert!(matches!(flow.screen(), Screen::Login));
        assert!(flow.session().is_none());

        let offline = FakeGateway {
            offline: true,
            ..FakeGateway::default()
        };

        assert!(matches!(flow.login(&offline, "id", "secret"), Err(FlowError::Network(_))));
        assert!(matches!(flow.screen(), Screen::Login));

        flow.login(&FakeGateway::default(), "id", "secret").unwrap();
        assert!(matches!(flow.screen(), Screen::Dashboard));
    }

    #[test]
    fn logout_returns_to_login() {
        let mut flow = at_document();

        assert!(flow.logout().unwrap());
        assert!(matches!(flow.screen(), Screen::Login));
        assert!(flow.history().is_empty());
        assert!(flow.session().is_none());
        assert!(flow.store().session().is_none());
        assert!(matches!(flow.back(), Err(FlowError::NoPreviousStep)));
    }

    #[test]
    fn unimplemented_paths() {
        let mut flow = logged_in();

        assert!(matches!(flow.verify_existing(), Err(FlowError::Unsupported(_))));

        flow.create_new().unwrap();

        assert!(matches!(flow.choose_method(Method::Biometric), Err(FlowError::Unsupported(_))));
        assert!(matches!(flow.choose_method(Method::License), Err(FlowError::Unsupported(_))));
        assert!(matches!(flow.screen(), Screen::MethodSelect));
    }

    #[test]
    fn actions_on_the_wrong_screen() {
        let gateway = FakeGateway::default();
        let mut flow = logged_in();

        assert!(matches!(
            flow.submit_document(&gateway),
            Err(FlowError::WrongStep { screen: "dashboard", .. })
        ));
        assert!(matches!(flow.submit_passcode(), Err(FlowError::WrongStep { .. })));
        assert!(matches!(flow.finish(), Err(FlowError::WrongStep { .. })));
        assert!(matches!(flow.back(), Err(FlowError::NoPreviousStep)));
        assert_eq!(gateway.otp_count(), 0);
    }

    #[test]
    fn document_submit_forwards_transaction() {
        let gateway = FakeGateway::default();
        let flow = at_passcode(&gateway);

        let Screen::Passcode(form) = flow.screen() else {
            panic!("expected passcode screen, on {}", flow.screen().name());
        };

        assert_eq!(
            form.context().document_number.as_ref().map(|d| d.as_str()),
            Some("123456789012")
        );
        assert_eq!(form.context().transaction_id.as_ref().map(|t| t.as_str()), Some("txn-1"));
        assert!(form.context().contact_number.is_none());
        assert_eq!(form.hint(), Some("3210"));
        assert_eq!(*gateway.otp_calls.borrow(), vec![("token-abc".to_owned(), None)]);
    }

    #[test]
    fn missing_transaction_uses_placeholder() {
        let gateway = FakeGateway {
            no_txn: true,
            ..FakeGateway::default()
        };
        let flow = at_passcode(&gateway);

        let txn = flow.screen().context().and_then(|c| c.transaction_id.clone()).unwrap();

        assert!(txn.is_placeholder());
    }

    #[test]
    fn document_submit_without_session() {
        let gateway = FakeGateway::default();
        let mut flow = at_document();
        flow.session = None;
        flow.document_input("123456789012").unwrap();

        let err = flow.submit_document(&gateway).unwrap_err();

        assert!(matches!(err, FlowError::SessionMissing));
        assert!(err.needs_login());
        assert!(matches!(flow.screen(), Screen::Document(_)));
        assert_eq!(gateway.otp_count(), 0);
    }

    #[test]
    fn document_submit_without_token() {
        let gateway = FakeGateway::default();
        let mut flow = Flow::new(options(), store_with(json!({"refreshToken": "r"})));
        flow.create_new().unwrap();
        flow.choose_method(Method::Document).unwrap();
        flow.document_input("123456789012").unwrap();

        assert!(matches!(flow.submit_document(&gateway), Err(FlowError::TokenMissing)));
        assert!(matches!(flow.screen(), Screen::Document(_)));
        assert_eq!(gateway.otp_count(), 0);
    }

    #[test]
    fn document_submit_with_expired_session() {
        let gateway = FakeGateway::default();
        let mut flow = at_document();
        flow.session = Some(Session::new(
            SessionPayload::new(json!({"accessToken": "old", "expiresIn": 60})),
            Utc::now() - chrono::Duration::hours(1)
        ));
        flow.document_input("123456789012").unwrap();

        assert!(matches!(flow.submit_document(&gateway), Err(FlowError::SessionExpired)));
        assert!(flow.session().is_none());
        assert!(flow.store().session().is_none());
        assert_eq!(gateway.otp_count(), 0);
    }

    #[test]
    fn short_document_makes_no_call() {
        let gateway = FakeGateway::default();
        let mut flow = at_document();
        flow.document_input("12345678901").unwrap();

        let err = flow.submit_document(&gateway).unwrap_err();

        assert!(matches!(
            err,
            FlowError::Validation(ValidationError::Length { expected: 12, given: 11, .. })
        ));
        assert_eq!(err.to_string(), "please enter a valid 12-digit document number");
        assert!(matches!(flow.screen(), Screen::Document(_)));
        assert_eq!(gateway.otp_count(), 0);
    }

    #[test]
    fn gateway_failure_stays_on_document() {
        let gateway = FakeGateway {
            fail_status: Some((400, "Invalid LoginId")),
            ..FakeGateway::default()
        };
        let mut flow = at_document();
        flow.document_input("123456789012").unwrap();

        let err = flow.submit_document(&gateway).unwrap_err();

        assert_eq!(err.to_string(), "Invalid LoginId");
        assert!(matches!(flow.screen(), Screen::Document(_)));

        // failed submissions can be retried by hand
        assert!(flow.submit_document(&gateway).is_err());
        assert_eq!(gateway.otp_count(), 2);
    }

    #[test]
    fn passcode_requires_both_inputs() {
        let gateway = FakeGateway::default();
        let mut flow = at_passcode(&gateway);

        flow.passcode_input("12345").unwrap();
        flow.contact_input("9876543210").unwrap();

        assert!(matches!(
            flow.submit_passcode(),
            Err(FlowError::Validation(ValidationError::Length { expected: 6, .. }))
        ));

        flow.passcode_input("1234567").unwrap();
        flow.contact_input("98765").unwrap();

        assert!(matches!(
            flow.submit_passcode(),
            Err(FlowError::Validation(ValidationError::Length { expected: 10, .. }))
        ));
        assert!(matches!(flow.screen(), Screen::Passcode(_)));
    }

    #[test]
    fn matching_contact_goes_to_address() {
        let gateway = FakeGateway::default();
        let flow = at_address(&gateway);

        let Screen::Address(form) = flow.screen() else {
            panic!("expected address screen, on {}", flow.screen().name());
        };

        assert_eq!(form.context().mobile_matches_document, Some(true));
        assert_eq!(form.candidates().len(), 5);
        assert_eq!(form.candidates()[0].as_str(), "rahul.sharma@abha");
    }

    #[test]
    fn other_contact_goes_to_mismatch() {
        let gateway = FakeGateway::default();
        let mut flow = at_passcode(&gateway);
        flow.passcode_input("123456").unwrap();
        flow.contact_input("9876543211").unwrap();
        flow.submit_passcode().unwrap();

        let Screen::MobileMismatch(context) = flow.screen() else {
            panic!("expected mismatch screen, on {}", flow.screen().name());
        };

        assert_eq!(context.mobile_matches_document, Some(false));
        assert_eq!(context.contact_number.as_ref().map(|c| c.as_str()), Some("9876543211"));

        flow.back().unwrap();
        assert!(matches!(flow.screen(), Screen::Passcode(_)));
    }

    #[test]
    fn unmasked_digits_do_not_confirm_contact() {
        let gateway = FakeGateway {
            message: Some("OTP sent successfully, valid for 10 minutes"),
            ..FakeGateway::default()
        };
        let mut flow = at_passcode(&gateway);

        let Screen::Passcode(form) = flow.screen() else {
            panic!("expected passcode screen, on {}", flow.screen().name());
        };

        assert_eq!(form.hint(), None);

        flow.passcode_input("123456").unwrap();
        flow.contact_input("9876543210").unwrap();
        flow.submit_passcode().unwrap();

        let Screen::MobileMismatch(context) = flow.screen() else {
            panic!("expected mismatch screen, on {}", flow.screen().name());
        };

        assert_eq!(context.mobile_matches_document, Some(false));
    }

    #[test]
    fn address_submit_creates_record() {
        let gateway = FakeGateway::default();
        let mut flow = at_address(&gateway);
        let mut rng = SmallRng::seed_from_u64(1);

        assert!(matches!(
            flow.submit_address(&mut rng),
            Err(FlowError::Validation(ValidationError::NoSelection))
        ));

        flow.select_address_value("rahul.sharma@abha").unwrap();
        flow.submit_address(&mut rng).unwrap();

        let Screen::Summary(record) = flow.screen() else {
            panic!("expected summary screen, on {}", flow.screen().name());
        };

        let grouped = record.account_number.to_string();

        assert_eq!(record.account_address.as_str(), "rahul.sharma@abha");
        assert_eq!(record.account_number.digits().len(), 14);
        assert_eq!(grouped.len(), 17);
        assert_eq!(grouped.matches('-').count(), 3);
        assert_eq!(record.linked_contact_number.linked(), "+91 9876543210");
        assert_eq!(record.masked_document(), "****-****-9012");
    }

    #[test]
    fn finish_resets_to_dashboard() {
        let gateway = FakeGateway::default();
        let mut flow = at_address(&gateway);
        flow.select_address(0).unwrap();
        flow.submit_address(&mut SmallRng::seed_from_u64(2)).unwrap();

        flow.back().unwrap();

        let Screen::Address(form) = flow.screen() else {
            panic!("expected address screen, on {}", flow.screen().name());
        };

        assert_eq!(form.selected_index(), Some(0));

        flow.submit_address(&mut SmallRng::seed_from_u64(2)).unwrap();
        flow.finish().unwrap();

        assert!(matches!(flow.screen(), Screen::Dashboard));
        assert!(flow.history().is_empty());
    }

    #[test]
    fn back_restores_each_step() {
        let gateway = FakeGateway::default();
        let mut flow = at_document();
        flow.document_input("123456789012").unwrap();

        let document_context = flow.screen().context().cloned().unwrap();
        flow.submit_document(&gateway).unwrap();

        let passcode_context = flow.screen().context().cloned().unwrap();
        flow.passcode_input("123456").unwrap();
        flow.contact_input("9876543210").unwrap();
        flow.submit_passcode().unwrap();

        let address_context = flow.screen().context().cloned().unwrap();
        flow.select_address(2).unwrap();
        flow.submit_address(&mut SmallRng::seed_from_u64(3)).unwrap();

        assert!(matches!(flow.screen(), Screen::Summary(_)));

        flow.back().unwrap();
        assert_eq!(flow.screen().context(), Some(&address_context));

        flow.back().unwrap();
        assert_eq!(flow.screen().context(), Some(&passcode_context));
        assert!(passcode_context.contact_number.is_none());
        assert!(passcode_context.mobile_matches_document.is_none());

        flow.back().unwrap();
        assert_eq!(flow.screen().context(), Some(&document_context));
        assert_eq!(document_context, VerificationContext::default());

        let Screen::Document(form) = flow.screen() else {
            panic!("expected document screen, on {}", flow.screen().name());
        };

        assert_eq!(form.input().as_str(), "123456789012");

        flow.back().unwrap();
        assert!(matches!(flow.screen(), Screen::MethodSelect));

        flow.back().unwrap();
        assert!(matches!(flow.screen(), Screen::Dashboard));

        assert!(matches!(flow.back(), Err(FlowError::NoPreviousStep)));
    }

    #[test]
    fn resend_waits_for_cooldown() {
        let gateway = FakeGateway::default();
        let mut flow = at_passcode(&gateway);
        let now = Instant::now();

        assert!(flow.cooldown_remaining(now).unwrap() > 0);
        assert!(matches!(flow.resend_otp(&gateway, now), Err(FlowError::CooldownActive(_))));
        assert_eq!(gateway.otp_count(), 1);

        let later = now + Duration::from_secs(31);

        assert_eq!(flow.cooldown_remaining(later), Some(0));

        flow.passcode_input("111111").unwrap();
        flow.resend_otp(&gateway, later).unwrap();

        assert_eq!(
            gateway.otp_calls.borrow()[1],
            ("token-abc".to_owned(), Some("txn-1".to_owned()))
        );

        let Screen::Passcode(form) = flow.screen() else {
            panic!("expected passcode screen, on {}", flow.screen().name());
        };

        assert_eq!(form.context().transaction_id.as_ref().map(|t| t.as_str()), Some("txn-2"));
        assert!(form.passcode().is_empty());
        assert_eq!(flow.cooldown_remaining(later), Some(30));
        assert!(matches!(flow.resend_otp(&gateway, later), Err(FlowError::CooldownActive(30))));
    }

    #[test]
    fn cooldown_is_cleared_on_leave() {
        let gateway = FakeGateway::default();
        let mut flow = at_address(&gateway);

        let Some(Screen::Passcode(left)) = flow.history().last() else {
            panic!("expected passcode screen in history");
        };

        assert_eq!(left.cooldown_remaining(Instant::now()), None);
        assert_eq!(flow.cooldown_remaining(Instant::now()), None);

        flow.back().unwrap();

        assert!(flow.cooldown_remaining(Instant::now()).unwrap() > 0);
    }
}
