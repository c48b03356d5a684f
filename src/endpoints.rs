use url::Url;

use crate::error::{Error, Result};

/// The top-level resource collections the client works with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Contacts,
    Invoices,
    CustomerPayments,
    SalesReceipts,
}

impl Collection {
    /// Path segment of the collection below the API root.
    #[must_use]
    pub fn path(self) -> &'static str {
        match self {
            Self::Contacts => "contacts",
            Self::Invoices => "invoices",
            Self::CustomerPayments => "customerpayments",
            Self::SalesReceipts => "salesreceipts",
        }
    }
}

/// A typed representation of Zoho Books API endpoints.
///
/// Identifiers are inserted as single percent-encoded path segments, so an id
/// can never escape into a sibling path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ZohoEndpoint {
    /// `/{collection}`
    List(Collection),
    /// `/{collection}/{id}`
    Record(Collection, String),
    /// `/{collection}/{id}/{action...}`, e.g. `status/sent` or `pdf`.
    Action(Collection, String, &'static str),
    /// `/{collection}/{id}/comments`
    Comments(Collection, String),
    /// `/{collection}/{id}/comments/{comment_id}`
    Comment(Collection, String, String),
    /// `/{collection}/templates`
    Templates(Collection),
    /// `/invoices/{id}/credits/{credit_id}`
    AppliedCredit(String, String),
    /// `/settings/paymentmodes`
    PaymentModes,
}

impl ZohoEndpoint {
    fn segments(&self) -> Vec<&str> {
        match self {
            Self::List(collection) => vec![collection.path()],
            Self::Record(collection, id) => vec![collection.path(), id],
            Self::Action(collection, id, action) => {
                let mut segments = vec![collection.path(), id.as_str()];
                segments.extend(action.split('/'));
                segments
            }
            Self::Comments(collection, id) => vec![collection.path(), id, "comments"],
            Self::Comment(collection, id, comment_id) => {
                vec![collection.path(), id, "comments", comment_id]
            }
            Self::Templates(collection) => vec![collection.path(), "templates"],
            Self::AppliedCredit(invoice_id, credit_id) => vec![
                Collection::Invoices.path(),
                invoice_id,
                "credits",
                credit_id,
            ],
            Self::PaymentModes => vec!["settings", "paymentmodes"],
        }
    }

    /// Render the endpoint below the given API root.
    pub fn to_url_with_base(&self, base: &Url) -> Result<Url> {
        let mut url = base.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|()| Error::invalid_endpoint())?;
            path.pop_if_empty();
            path.extend(self.segments());
        }
        Ok(url)
    }
}
