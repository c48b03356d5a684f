use time::{Date, OffsetDateTime};
use url::Url;

use crate::config::{Credential, Endpoints};
use crate::endpoints::{Collection, ZohoEndpoint};
use crate::entities::{
    Acknowledgement, Comment, EmailContent, EmailRequest, Page, PrintUrl, Template,
    contact::{self, Contact, Statement},
    customer_payment::{self, CustomerPayment, PaymentMode, Refund, RefundRequest},
    endpoint_utils,
    invoice::{self, ApplyCredits, ConvertedInvoice, Invoice, InvoicePayment, ReminderRequest},
    sales_receipt::{self, ConvertedCreditNote, CreditNoteConversion, InvoiceConversion, SalesReceipt},
    DATA_KEY,
};
use crate::error::{Error, Result};
use crate::filters::ListFilters;
use crate::oauth::{TokenManager, TokenResponse, TokenStore};
use crate::transport::{Request, Transport};
use crate::utils::date_format::format_zoho_date;

/// This is the client that is used for interacting with the Zoho Books API.
///
/// It owns one [`Transport`] and one [`TokenManager`], both working on the
/// same token store: tokens obtained through the token manager are attached
/// to every later resource request. Clones share that state; separately
/// constructed clients don't.
#[derive(Clone, Debug)]
pub struct Client {
    transport: Transport,
    tokens: TokenManager,
}

impl Client {
    /// Create a client talking to the default Zoho Books addresses.
    ///
    /// # Errors
    /// Returns an error if the HTTP client can't be initialised.
    pub fn new(credential: Credential) -> Result<Self> {
        Self::with_endpoints(credential, Endpoints::default())
    }

    /// Create a client talking to custom addresses, e.g. another data centre.
    ///
    /// # Errors
    /// Returns an error if the HTTP client can't be initialised.
    #[instrument(skip(credential), fields(client_id = %credential.client_id()))]
    pub fn with_endpoints(credential: Credential, endpoints: Endpoints) -> Result<Self> {
        let store = TokenStore::new(
            credential.access_token.clone(),
            credential.refresh_token.clone(),
        );
        let transport = Transport::new(endpoints.api_base.clone(), store.clone())?;
        let tokens = TokenManager::new(credential, &endpoints, transport.http().clone(), store);
        trace!(api_base = %endpoints.api_base, "client created");

        Ok(Self { transport, tokens })
    }

    #[must_use]
    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    #[must_use]
    pub fn token_manager(&self) -> &TokenManager {
        &self.tokens
    }

    /// Generates the URL to send the user to for the code flow authorization.
    #[must_use]
    pub fn authorization_url(&self) -> Url {
        self.tokens.authorization_url()
    }

    /// Exchange the code passed to the redirect URI for tokens.
    ///
    /// # Errors
    /// Returns an error if the code is rejected or the token endpoint can't be
    /// reached.
    pub async fn exchange_code_for_token(&self, code: &str) -> Result<TokenResponse> {
        self.tokens.exchange_code(code).await
    }

    /// Refreshes the access token using the refresh token.
    ///
    /// # Errors
    /// Returns an error if no refresh token is stored or the refresh fails.
    pub async fn refresh_access_token(&self) -> Result<TokenResponse> {
        self.tokens.refresh().await
    }

    pub async fn access_token(&self) -> Option<String> {
        self.tokens.access_token().await
    }

    pub async fn refresh_token(&self) -> Option<String> {
        self.tokens.refresh_token().await
    }

    pub async fn set_access_token(&self, token: impl Into<String>) {
        self.tokens.set_access_token(token).await;
    }

    pub async fn set_refresh_token(&self, token: impl Into<String>) {
        self.tokens.set_refresh_token(token).await;
    }

    pub async fn clear_credentials(&self) {
        self.tokens.clear_credentials().await;
    }

    pub async fn access_token_expires_at(&self) -> Option<OffsetDateTime> {
        self.tokens.access_token_expires_at().await
    }

    pub async fn is_token_expiring(&self) -> bool {
        self.tokens.is_token_expiring().await
    }

    /// Access the contacts API
    #[must_use]
    pub fn contacts(&self) -> ContactsApi<'_> {
        ContactsApi { client: self }
    }

    /// Access the invoices API
    #[must_use]
    pub fn invoices(&self) -> InvoicesApi<'_> {
        InvoicesApi { client: self }
    }

    /// Access the customer payments API
    #[must_use]
    pub fn customer_payments(&self) -> CustomerPaymentsApi<'_> {
        CustomerPaymentsApi { client: self }
    }

    /// Access the sales receipts API
    #[must_use]
    pub fn sales_receipts(&self) -> SalesReceiptsApi<'_> {
        SalesReceiptsApi { client: self }
    }
}

/// API handler for Contacts endpoints
#[derive(Debug)]
pub struct ContactsApi<'a> {
    client: &'a Client,
}

impl ContactsApi<'_> {
    /// Retrieve one page of contacts
    #[instrument(skip(self))]
    pub async fn list(&self, filters: &ListFilters) -> Result<Page<Contact>> {
        endpoint_utils::list(&self.client.transport, filters).await
    }

    /// Retrieve a single contact by ID
    #[instrument(skip(self))]
    pub async fn get(&self, contact_id: &str) -> Result<Contact> {
        endpoint_utils::get(&self.client.transport, contact_id).await
    }

    #[instrument(skip(self, contact))]
    pub async fn create(&self, contact: &contact::Builder) -> Result<Contact> {
        endpoint_utils::create(&self.client.transport, contact).await
    }

    /// Update a contact. Only the fields set on `contact` are sent.
    #[instrument(skip(self, contact))]
    pub async fn update(&self, contact_id: &str, contact: &contact::Builder) -> Result<Contact> {
        endpoint_utils::update(&self.client.transport, contact_id, contact).await
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, contact_id: &str) -> Result<Acknowledgement> {
        endpoint_utils::delete::<Contact>(&self.client.transport, contact_id).await
    }

    #[instrument(skip(self))]
    pub async fn mark_as_active(&self, contact_id: &str) -> Result<Acknowledgement> {
        endpoint_utils::action::<Contact>(&self.client.transport, contact_id, "active").await
    }

    #[instrument(skip(self))]
    pub async fn mark_as_inactive(&self, contact_id: &str) -> Result<Acknowledgement> {
        endpoint_utils::action::<Contact>(&self.client.transport, contact_id, "inactive").await
    }

    #[instrument(skip(self))]
    pub async fn enable_payment_reminder(&self, contact_id: &str) -> Result<Acknowledgement> {
        endpoint_utils::action::<Contact>(&self.client.transport, contact_id, "paymentreminder/enable")
            .await
    }

    #[instrument(skip(self))]
    pub async fn disable_payment_reminder(&self, contact_id: &str) -> Result<Acknowledgement> {
        endpoint_utils::action::<Contact>(&self.client.transport, contact_id, "paymentreminder/disable")
            .await
    }

    #[instrument(skip(self))]
    pub async fn comments(&self, contact_id: &str) -> Result<Vec<Comment>> {
        endpoint_utils::comments::<Contact>(&self.client.transport, contact_id).await
    }

    #[instrument(skip(self, description))]
    pub async fn add_comment(&self, contact_id: &str, description: &str) -> Result<Comment> {
        endpoint_utils::add_comment::<Contact>(&self.client.transport, contact_id, description).await
    }

    #[instrument(skip(self, description))]
    pub async fn update_comment(
        &self,
        contact_id: &str,
        comment_id: &str,
        description: &str,
    ) -> Result<Comment> {
        endpoint_utils::update_comment::<Contact>(
            &self.client.transport,
            contact_id,
            comment_id,
            description,
        )
        .await
    }

    #[instrument(skip(self))]
    pub async fn delete_comment(&self, contact_id: &str, comment_id: &str) -> Result<Acknowledgement> {
        endpoint_utils::delete_comment::<Contact>(&self.client.transport, contact_id, comment_id).await
    }

    /// Account statement of a contact for the given period.
    #[instrument(skip(self))]
    pub async fn statement(&self, contact_id: &str, start: Date, end: Date) -> Result<Statement> {
        let request = Request::get(ZohoEndpoint::Action(
            Collection::Contacts,
            contact_id.to_string(),
            "statements",
        ))
        .query("start_date", format_zoho_date(start).map_err(Error::request)?)
        .query("end_date", format_zoho_date(end).map_err(Error::request)?);
        self.client.transport.send_record(request, DATA_KEY).await
    }
}

/// API handler for Invoices endpoints
#[derive(Debug)]
pub struct InvoicesApi<'a> {
    client: &'a Client,
}

impl InvoicesApi<'_> {
    /// Retrieve one page of invoices
    #[instrument(skip(self))]
    pub async fn list(&self, filters: &ListFilters) -> Result<Page<Invoice>> {
        endpoint_utils::list(&self.client.transport, filters).await
    }

    /// Get a single invoice by ID
    #[instrument(skip(self))]
    pub async fn get(&self, invoice_id: &str) -> Result<Invoice> {
        endpoint_utils::get(&self.client.transport, invoice_id).await
    }

    /// Create a new invoice
    #[instrument(skip(self, invoice))]
    pub async fn create(&self, invoice: &invoice::Builder) -> Result<Invoice> {
        endpoint_utils::create(&self.client.transport, invoice).await
    }

    /// Update an existing invoice
    #[instrument(skip(self, invoice))]
    pub async fn update(&self, invoice_id: &str, invoice: &invoice::Builder) -> Result<Invoice> {
        endpoint_utils::update(&self.client.transport, invoice_id, invoice).await
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, invoice_id: &str) -> Result<Acknowledgement> {
        endpoint_utils::delete::<Invoice>(&self.client.transport, invoice_id).await
    }

    #[instrument(skip(self))]
    pub async fn mark_as_sent(&self, invoice_id: &str) -> Result<Acknowledgement> {
        endpoint_utils::action::<Invoice>(&self.client.transport, invoice_id, "status/sent").await
    }

    #[instrument(skip(self))]
    pub async fn mark_as_void(&self, invoice_id: &str) -> Result<Acknowledgement> {
        endpoint_utils::action::<Invoice>(&self.client.transport, invoice_id, "status/void").await
    }

    #[instrument(skip(self))]
    pub async fn mark_as_draft(&self, invoice_id: &str) -> Result<Acknowledgement> {
        endpoint_utils::action::<Invoice>(&self.client.transport, invoice_id, "status/draft").await
    }

    /// Email the invoice to the customer
    #[instrument(skip(self, email))]
    pub async fn email(&self, invoice_id: &str, email: &EmailRequest) -> Result<Acknowledgement> {
        endpoint_utils::email::<Invoice>(&self.client.transport, invoice_id, email).await
    }

    /// The email Zoho Books would send for this invoice
    #[instrument(skip(self))]
    pub async fn email_content(&self, invoice_id: &str) -> Result<EmailContent> {
        endpoint_utils::email_content::<Invoice>(&self.client.transport, invoice_id).await
    }

    #[instrument(skip(self, reminder))]
    pub async fn send_reminder(
        &self,
        invoice_id: &str,
        reminder: &ReminderRequest,
    ) -> Result<Acknowledgement> {
        let request = Request::post(ZohoEndpoint::Action(
            Collection::Invoices,
            invoice_id.to_string(),
            "reminder",
        ))
        .json(reminder)?;
        self.client.transport.send_acknowledgement(request).await
    }

    #[instrument(skip(self))]
    pub async fn comments(&self, invoice_id: &str) -> Result<Vec<Comment>> {
        endpoint_utils::comments::<Invoice>(&self.client.transport, invoice_id).await
    }

    #[instrument(skip(self, description))]
    pub async fn add_comment(&self, invoice_id: &str, description: &str) -> Result<Comment> {
        endpoint_utils::add_comment::<Invoice>(&self.client.transport, invoice_id, description).await
    }

    #[instrument(skip(self, description))]
    pub async fn update_comment(
        &self,
        invoice_id: &str,
        comment_id: &str,
        description: &str,
    ) -> Result<Comment> {
        endpoint_utils::update_comment::<Invoice>(
            &self.client.transport,
            invoice_id,
            comment_id,
            description,
        )
        .await
    }

    #[instrument(skip(self))]
    pub async fn delete_comment(&self, invoice_id: &str, comment_id: &str) -> Result<Acknowledgement> {
        endpoint_utils::delete_comment::<Invoice>(&self.client.transport, invoice_id, comment_id).await
    }

    /// Payments recorded against the invoice
    #[instrument(skip(self))]
    pub async fn payments(&self, invoice_id: &str) -> Result<Vec<InvoicePayment>> {
        let request = Request::get(ZohoEndpoint::Action(
            Collection::Invoices,
            invoice_id.to_string(),
            "payments",
        ));
        self.client.transport.send_record(request, "payments").await
    }

    #[instrument(skip(self, credits))]
    pub async fn apply_credits(
        &self,
        invoice_id: &str,
        credits: &ApplyCredits,
    ) -> Result<Acknowledgement> {
        let request = Request::post(ZohoEndpoint::Action(
            Collection::Invoices,
            invoice_id.to_string(),
            "credits",
        ))
        .json(credits)?;
        self.client.transport.send_acknowledgement(request).await
    }

    #[instrument(skip(self))]
    pub async fn delete_applied_credit(
        &self,
        invoice_id: &str,
        credit_id: &str,
    ) -> Result<Acknowledgement> {
        let endpoint = ZohoEndpoint::AppliedCredit(invoice_id.to_string(), credit_id.to_string());
        self.client.transport.send_acknowledgement(Request::delete(endpoint)).await
    }

    #[instrument(skip(self))]
    pub async fn templates(&self) -> Result<Vec<Template>> {
        endpoint_utils::templates::<Invoice>(&self.client.transport).await
    }

    /// Get the invoice as a PDF
    #[instrument(skip(self))]
    pub async fn pdf(&self, invoice_id: &str) -> Result<Vec<u8>> {
        endpoint_utils::pdf::<Invoice>(&self.client.transport, invoice_id).await
    }

    #[instrument(skip(self))]
    pub async fn print_url(&self, invoice_id: &str) -> Result<PrintUrl> {
        endpoint_utils::print_url::<Invoice>(&self.client.transport, invoice_id).await
    }
}

/// API handler for Customer Payments endpoints
#[derive(Debug)]
pub struct CustomerPaymentsApi<'a> {
    client: &'a Client,
}

impl CustomerPaymentsApi<'_> {
    #[instrument(skip(self))]
    pub async fn list(&self, filters: &ListFilters) -> Result<Page<CustomerPayment>> {
        endpoint_utils::list(&self.client.transport, filters).await
    }

    #[instrument(skip(self))]
    pub async fn get(&self, payment_id: &str) -> Result<CustomerPayment> {
        endpoint_utils::get(&self.client.transport, payment_id).await
    }

    /// Record a new payment
    #[instrument(skip(self, payment))]
    pub async fn create(&self, payment: &customer_payment::Builder) -> Result<CustomerPayment> {
        endpoint_utils::create(&self.client.transport, payment).await
    }

    #[instrument(skip(self, payment))]
    pub async fn update(
        &self,
        payment_id: &str,
        payment: &customer_payment::Builder,
    ) -> Result<CustomerPayment> {
        endpoint_utils::update(&self.client.transport, payment_id, payment).await
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, payment_id: &str) -> Result<Acknowledgement> {
        endpoint_utils::delete::<CustomerPayment>(&self.client.transport, payment_id).await
    }

    #[instrument(skip(self))]
    pub async fn comments(&self, payment_id: &str) -> Result<Vec<Comment>> {
        endpoint_utils::comments::<CustomerPayment>(&self.client.transport, payment_id).await
    }

    #[instrument(skip(self, description))]
    pub async fn add_comment(&self, payment_id: &str, description: &str) -> Result<Comment> {
        endpoint_utils::add_comment::<CustomerPayment>(&self.client.transport, payment_id, description)
            .await
    }

    #[instrument(skip(self, description))]
    pub async fn update_comment(
        &self,
        payment_id: &str,
        comment_id: &str,
        description: &str,
    ) -> Result<Comment> {
        endpoint_utils::update_comment::<CustomerPayment>(
            &self.client.transport,
            payment_id,
            comment_id,
            description,
        )
        .await
    }

    #[instrument(skip(self))]
    pub async fn delete_comment(&self, payment_id: &str, comment_id: &str) -> Result<Acknowledgement> {
        endpoint_utils::delete_comment::<CustomerPayment>(&self.client.transport, payment_id, comment_id)
            .await
    }

    /// Refunds made from this payment
    #[instrument(skip(self))]
    pub async fn refunds(&self, payment_id: &str) -> Result<Vec<Refund>> {
        let request = Request::get(ZohoEndpoint::Action(
            Collection::CustomerPayments,
            payment_id.to_string(),
            "refunds",
        ));
        self.client.transport.send_record(request, "payment_refunds").await
    }

    #[instrument(skip(self, refund))]
    pub async fn create_refund(&self, payment_id: &str, refund: &RefundRequest) -> Result<Refund> {
        let request = Request::post(ZohoEndpoint::Action(
            Collection::CustomerPayments,
            payment_id.to_string(),
            "refunds",
        ))
        .json(refund)?;
        self.client.transport.send_record(request, "payment_refund").await
    }

    #[instrument(skip(self))]
    pub async fn pdf(&self, payment_id: &str) -> Result<Vec<u8>> {
        endpoint_utils::pdf::<CustomerPayment>(&self.client.transport, payment_id).await
    }

    #[instrument(skip(self))]
    pub async fn print_url(&self, payment_id: &str) -> Result<PrintUrl> {
        endpoint_utils::print_url::<CustomerPayment>(&self.client.transport, payment_id).await
    }

    /// Payment modes configured for the organization
    #[instrument(skip(self))]
    pub async fn payment_modes(&self) -> Result<Vec<PaymentMode>> {
        let request = Request::get(ZohoEndpoint::PaymentModes);
        self.client.transport.send_record(request, "payment_modes").await
    }
}

/// API handler for Sales Receipts endpoints
#[derive(Debug)]
pub struct SalesReceiptsApi<'a> {
    client: &'a Client,
}

impl SalesReceiptsApi<'_> {
    #[instrument(skip(self))]
    pub async fn list(&self, filters: &ListFilters) -> Result<Page<SalesReceipt>> {
        endpoint_utils::list(&self.client.transport, filters).await
    }

    #[instrument(skip(self))]
    pub async fn get(&self, sales_receipt_id: &str) -> Result<SalesReceipt> {
        endpoint_utils::get(&self.client.transport, sales_receipt_id).await
    }

    #[instrument(skip(self, receipt))]
    pub async fn create(&self, receipt: &sales_receipt::Builder) -> Result<SalesReceipt> {
        endpoint_utils::create(&self.client.transport, receipt).await
    }

    #[instrument(skip(self, receipt))]
    pub async fn update(
        &self,
        sales_receipt_id: &str,
        receipt: &sales_receipt::Builder,
    ) -> Result<SalesReceipt> {
        endpoint_utils::update(&self.client.transport, sales_receipt_id, receipt).await
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, sales_receipt_id: &str) -> Result<Acknowledgement> {
        endpoint_utils::delete::<SalesReceipt>(&self.client.transport, sales_receipt_id).await
    }

    #[instrument(skip(self))]
    pub async fn mark_as_sent(&self, sales_receipt_id: &str) -> Result<Acknowledgement> {
        endpoint_utils::action::<SalesReceipt>(&self.client.transport, sales_receipt_id, "status/sent")
            .await
    }

    #[instrument(skip(self))]
    pub async fn mark_as_void(&self, sales_receipt_id: &str) -> Result<Acknowledgement> {
        endpoint_utils::action::<SalesReceipt>(&self.client.transport, sales_receipt_id, "status/void")
            .await
    }

    #[instrument(skip(self))]
    pub async fn mark_as_draft(&self, sales_receipt_id: &str) -> Result<Acknowledgement> {
        endpoint_utils::action::<SalesReceipt>(&self.client.transport, sales_receipt_id, "status/draft")
            .await
    }

    #[instrument(skip(self, email))]
    pub async fn email(&self, sales_receipt_id: &str, email: &EmailRequest) -> Result<Acknowledgement> {
        endpoint_utils::email::<SalesReceipt>(&self.client.transport, sales_receipt_id, email).await
    }

    #[instrument(skip(self))]
    pub async fn email_content(&self, sales_receipt_id: &str) -> Result<EmailContent> {
        endpoint_utils::email_content::<SalesReceipt>(&self.client.transport, sales_receipt_id).await
    }

    #[instrument(skip(self))]
    pub async fn comments(&self, sales_receipt_id: &str) -> Result<Vec<Comment>> {
        endpoint_utils::comments::<SalesReceipt>(&self.client.transport, sales_receipt_id).await
    }

    #[instrument(skip(self, description))]
    pub async fn add_comment(&self, sales_receipt_id: &str, description: &str) -> Result<Comment> {
        endpoint_utils::add_comment::<SalesReceipt>(
            &self.client.transport,
            sales_receipt_id,
            description,
        )
        .await
    }

    #[instrument(skip(self, description))]
    pub async fn update_comment(
        &self,
        sales_receipt_id: &str,
        comment_id: &str,
        description: &str,
    ) -> Result<Comment> {
        endpoint_utils::update_comment::<SalesReceipt>(
            &self.client.transport,
            sales_receipt_id,
            comment_id,
            description,
        )
        .await
    }

    #[instrument(skip(self))]
    pub async fn delete_comment(
        &self,
        sales_receipt_id: &str,
        comment_id: &str,
    ) -> Result<Acknowledgement> {
        endpoint_utils::delete_comment::<SalesReceipt>(
            &self.client.transport,
            sales_receipt_id,
            comment_id,
        )
        .await
    }

    #[instrument(skip(self))]
    pub async fn templates(&self) -> Result<Vec<Template>> {
        endpoint_utils::templates::<SalesReceipt>(&self.client.transport).await
    }

    #[instrument(skip(self))]
    pub async fn pdf(&self, sales_receipt_id: &str) -> Result<Vec<u8>> {
        endpoint_utils::pdf::<SalesReceipt>(&self.client.transport, sales_receipt_id).await
    }

    #[instrument(skip(self))]
    pub async fn print_url(&self, sales_receipt_id: &str) -> Result<PrintUrl> {
        endpoint_utils::print_url::<SalesReceipt>(&self.client.transport, sales_receipt_id).await
    }

    /// Turn the receipt into an invoice. Without `conversion` the service
    /// picks number and dates.
    #[instrument(skip(self, conversion))]
    pub async fn convert_to_invoice(
        &self,
        sales_receipt_id: &str,
        conversion: Option<&InvoiceConversion>,
    ) -> Result<ConvertedInvoice> {
        let mut request = Request::post(ZohoEndpoint::Action(
            Collection::SalesReceipts,
            sales_receipt_id.to_string(),
            "converttoinvoice",
        ));
        if let Some(conversion) = conversion {
            request = request.json(conversion)?;
        }
        self.client.transport.send_record(request, "invoice").await
    }

    #[instrument(skip(self, conversion))]
    pub async fn convert_to_credit_note(
        &self,
        sales_receipt_id: &str,
        conversion: Option<&CreditNoteConversion>,
    ) -> Result<ConvertedCreditNote> {
        let mut request = Request::post(ZohoEndpoint::Action(
            Collection::SalesReceipts,
            sales_receipt_id.to_string(),
            "converttocreditnote",
        ));
        if let Some(conversion) = conversion {
            request = request.json(conversion)?;
        }
        self.client.transport.send_record(request, "creditnote").await
    }
}
