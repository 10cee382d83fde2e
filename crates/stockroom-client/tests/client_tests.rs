// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, anyhow};
use std::thread;
use std::time::Duration;
use stockroom_app::{
    AccountId, DriverReviewInput, Item, ItemFormInput, ItemId, ListController, ListError,
    RemoteCollection, RemoteError, Supplier,
};
use stockroom_client::RestClient;
use tiny_http::{Header, Method, Request, Response, Server};

fn json_response(status: u16, body: &str) -> Response<std::io::Cursor<Vec<u8>>> {
    Response::from_string(body)
        .with_status_code(status)
        .with_header(
            Header::from_bytes("Content-Type", "application/json")
                .expect("valid content type header"),
        )
}

fn header(request: &Request, name: &'static str) -> Option<String> {
    request
        .headers()
        .iter()
        .find(|header| header.field.equiv(name))
        .map(|header| header.value.as_str().to_owned())
}

fn mock_server() -> Result<(Server, String)> {
    let server =
        Server::http("127.0.0.1:0").map_err(|error| anyhow!("start mock server: {error}"))?;
    let addr = format!("http://{}/api", server.server_addr());
    Ok((server, addr))
}

#[test]
fn unreachable_server_is_unavailable() -> Result<()> {
    let client = RestClient::new("http://127.0.0.1:1/api", Duration::from_millis(200), None)?;
    let mut items = client.collection::<Item>();

    let error = items.list(None).expect_err("list should fail");
    assert!(matches!(error, RemoteError::Unavailable(_)));

    let message = ListError::from(error).to_string();
    assert!(message.contains("[server].base_url"));
    Ok(())
}

#[test]
fn list_sends_filter_and_bearer_token() -> Result<()> {
    let (server, addr) = mock_server()?;

    let handle = thread::spawn(move || {
        let request = server.recv().expect("request expected");
        assert_eq!(request.method(), &Method::Get);
        assert_eq!(request.url(), "/api/item?filter=wid");
        assert_eq!(
            header(&request, "Authorization").as_deref(),
            Some("Bearer s3cret")
        );
        let body = r#"[{"_id":"a1","itemName":"Widget","category":"Snacks","quantity":3,"price":2.5}]"#;
        request
            .respond(json_response(200, body))
            .expect("response should succeed");
    });

    let client = RestClient::new(&addr, Duration::from_secs(2), Some("s3cret".to_owned()))?;
    let items = client.collection::<Item>().list(Some("wid"))?;
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].item_name, "Widget");
    assert_eq!(items[0].price_cents, 250);

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn update_puts_json_body_to_record_path() -> Result<()> {
    let (server, addr) = mock_server()?;

    let handle = thread::spawn(move || {
        let mut request = server.recv().expect("request expected");
        assert_eq!(request.method(), &Method::Put);
        assert_eq!(request.url(), "/api/item/a1");
        assert!(header(&request, "Authorization").is_none());

        let mut body = String::new();
        request
            .as_reader()
            .read_to_string(&mut body)
            .expect("read request body");
        let body: serde_json::Value = serde_json::from_str(&body).expect("json body");
        assert_eq!(body["itemName"], "Widget");
        assert_eq!(body["quantity"], 7);
        assert_eq!(body["price"], 1.25);

        request
            .respond(json_response(200, r#"{"_id":"a1"}"#))
            .expect("response should succeed");
    });

    let client = RestClient::new(&addr, Duration::from_secs(2), None)?;
    let draft = ItemFormInput {
        item_name: "Widget".to_owned(),
        quantity: 7,
        price_cents: 125,
        ..ItemFormInput::default()
    };
    client
        .collection::<Item>()
        .update(&ItemId::new("a1"), &draft)?;

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn rejected_request_carries_server_message() -> Result<()> {
    let (server, addr) = mock_server()?;

    let handle = thread::spawn(move || {
        let request = server.recv().expect("request expected");
        assert_eq!(request.method(), &Method::Delete);
        assert_eq!(request.url(), "/api/supplier/s9");
        request
            .respond(json_response(404, r#"{"message":"Supplier not found"}"#))
            .expect("response should succeed");
    });

    let client = RestClient::new(&addr, Duration::from_secs(2), None)?;
    let error = client
        .collection::<Supplier>()
        .delete(&"s9".into())
        .expect_err("delete should be rejected");
    assert_eq!(error, RemoteError::rejected(404, "Supplier not found"));
    assert!(error.is_not_found());

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn review_posts_driver_rating() -> Result<()> {
    let (server, addr) = mock_server()?;

    let handle = thread::spawn(move || {
        let mut request = server.recv().expect("request expected");
        assert_eq!(request.method(), &Method::Post);
        assert_eq!(request.url(), "/api/review/driver");
        let mut body = String::new();
        request
            .as_reader()
            .read_to_string(&mut body)
            .expect("read request body");
        assert_eq!(body, r#"{"driverId":"d7","rate":4}"#);
        request
            .respond(json_response(201, r#"{"message":"Review added"}"#))
            .expect("response should succeed");
    });

    let client = RestClient::new(&addr, Duration::from_secs(2), None)?;
    client.submit_review(&DriverReviewInput {
        driver_id: AccountId::new("d7"),
        rate: 4,
    })?;

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn controller_loads_through_rest_collection() -> Result<()> {
    let (server, addr) = mock_server()?;

    let handle = thread::spawn(move || {
        for expected in ["/api/item", "/api/item"] {
            let request = server.recv().expect("request expected");
            assert_eq!(request.url(), expected);
            let body = r#"[
                {"_id":"a1","itemName":"Widget","category":"Snacks","quantity":3,"price":2.5},
                {"_id":"a2","itemName":"Gadget","category":"Bakery","quantity":1,"price":4}
            ]"#;
            request
                .respond(json_response(200, body))
                .expect("response should succeed");
        }
    });

    let client = RestClient::new(&addr, Duration::from_secs(2), None)?;
    let mut controller = ListController::new(client.collection::<Item>());
    controller.load(None)?;
    controller.set_query("gad");
    assert_eq!(controller.visible_len(), 1);

    controller.reload()?;
    assert_eq!(controller.collection().len(), 2);
    assert_eq!(controller.visible_len(), 1);

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn undecodable_list_body_names_the_decode_failure() -> Result<()> {
    let (server, addr) = mock_server()?;

    let handle = thread::spawn(move || {
        let request = server.recv().expect("request expected");
        request
            .respond(json_response(200, r#"{"items":"not an array"}"#))
            .expect("response should succeed");
    });

    let client = RestClient::new(&addr, Duration::from_secs(2), None)?;
    let error = client
        .collection::<Item>()
        .list(None)
        .expect_err("object body is not a list");
    let message = error.to_string();
    assert!(message.contains("response body is not a valid items list"));

    handle.join().expect("server thread should join");
    Ok(())
}
