use abha_lib::contact::ContactNumber;
use abha_lib::document::DocumentNumber;
use abha_lib::ids::TransactionId;

/// what the verification steps have established so far.
///
/// every step gets its own copy and hands an extended copy to the next one,
/// a field is only ever set by the step that owns it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerificationContext {
    pub document_number: Option<DocumentNumber>,
    pub transaction_id: Option<TransactionId>,
    pub contact_number: Option<ContactNumber>,
    pub mobile_matches_document: Option<bool>,
}

impl VerificationContext {
    pub fn with_document(mut self, document: DocumentNumber) -> Self {
        self.document_number = Some(document);
        self
    }

    pub fn with_transaction(mut self, txn: TransactionId) -> Self {
        self.transaction_id = Some(txn);
        self
    }

    pub fn with_contact(mut self, contact: ContactNumber, matches: bool) -> Self {
        self.contact_number = Some(contact);
        self.mobile_matches_document = Some(matches);
        self
    }
}
