use miette::Result;
use rust_decimal_macros::dec;
use serde_json::json;
use time::macros::date;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};
use zoho_books_rs::invoice;
use zoho_books_rs::line_item;
use zoho_books_rs::sales_receipt::{self, CreditNoteConversion, InvoiceConversion};
use zoho_books_rs::{ListFilters, SearchOperator};

mod test_utils;

#[tokio::test]
async fn create_and_fetch_receipt() -> Result<()> {
    test_utils::do_setup();
    let server = MockServer::start().await;
    let receipt = json!({
        "sales_receipt_id": "sr1",
        "receipt_number": "SR-00001",
        "date": "2024-07-01",
        "customer_id": "c1",
        "payment_mode": "cash",
        "total": 30
    });
    Mock::given(method("POST"))
        .and(path("/api/v3/salesreceipts"))
        .and(body_json(json!({
            "customer_id": "c1",
            "date": "2024-07-01",
            "payment_mode": "cash",
            "line_items": [{ "quantity": 3.0, "rate": 10.0, "item_description": "Coffee" }]
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "code": 0,
            "message": "Sales receipt created.",
            "sales_receipt": receipt.clone()
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v3/salesreceipts/sr1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 0,
            "message": "success",
            "sales_receipt": receipt
        })))
        .mount(&server)
        .await;

    let client = test_utils::authorized_client(&server);
    let body = sales_receipt::Builder::new("c1", date!(2024 - 07 - 01))
        .payment_mode("cash")
        .line_item(line_item::Builder::new(dec!(3), dec!(10)).description("Coffee"));
    let created = client.sales_receipts().create(&body).await?;
    assert_eq!(created.salesreceipt_id, "sr1");

    let fetched = client.sales_receipts().get("sr1").await?;
    assert_eq!(fetched, created);
    assert_eq!(fetched.total, Some(dec!(30)));
    Ok(())
}

#[tokio::test]
async fn convert_to_invoice_without_overrides_sends_no_body() -> Result<()> {
    test_utils::do_setup();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v3/salesreceipts/sr1/converttoinvoice"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 0,
            "message": "Sales receipt converted to invoice.",
            "invoice": {
                "invoice_id": "inv9",
                "invoice_number": "INV-00009",
                "date": "2024-07-01",
                "status": "paid",
                "total": 30
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_utils::authorized_client(&server);
    let converted = client.sales_receipts().convert_to_invoice("sr1", None).await?;

    assert_eq!(converted.invoice_id, "inv9");
    assert_eq!(converted.status, Some(invoice::Status::Paid));
    let requests = server.received_requests().await.unwrap();
    assert!(requests[0].body.is_empty());
    Ok(())
}

#[tokio::test]
async fn conversions_forward_overrides() -> Result<()> {
    test_utils::do_setup();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v3/salesreceipts/sr1/converttoinvoice"))
        .and(body_json(json!({ "invoice_number": "INV-100", "due_date": "2024-08-01" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 0,
            "message": "ok",
            "invoice": { "invoice_id": "inv100", "date": "2024-07-01" }
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v3/salesreceipts/sr1/converttocreditnote"))
        .and(body_json(json!({ "creditnote_number": "CN-7" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 0,
            "message": "ok",
            "creditnote": { "creditnote_id": "cn7", "creditnote_number": "CN-7", "balance": 30 }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_utils::authorized_client(&server);
    let to_invoice = InvoiceConversion {
        invoice_number: Some("INV-100".to_string()),
        due_date: Some(date!(2024 - 08 - 01)),
        ..InvoiceConversion::default()
    };
    let invoice = client
        .sales_receipts()
        .convert_to_invoice("sr1", Some(&to_invoice))
        .await?;
    assert_eq!(invoice.date, date!(2024 - 07 - 01));

    let to_credit_note = CreditNoteConversion {
        creditnote_number: Some("CN-7".to_string()),
        ..CreditNoteConversion::default()
    };
    let credit_note = client
        .sales_receipts()
        .convert_to_credit_note("sr1", Some(&to_credit_note))
        .await?;
    assert_eq!(credit_note.creditnote_id, "cn7");
    assert_eq!(credit_note.balance, Some(dec!(30)));
    Ok(())
}

#[tokio::test]
async fn list_sends_page_and_criteria_only() -> Result<()> {
    test_utils::do_setup();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/salesreceipts"))
        .and(query_param("page", "2"))
        .and(query_param("search_criteria[0][search_text]", "a"))
        .and(query_param("search_criteria[0][search_operator]", "contains"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 0,
            "message": "success",
            "salesreceipts": []
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_utils::authorized_client(&server);
    let filters = ListFilters::new().page(2).criterion("a", SearchOperator::Contains);
    let page = client.sales_receipts().list(&filters).await?;
    assert!(page.items.is_empty());

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests[0].url.query_pairs().count(), 3);
    Ok(())
}
