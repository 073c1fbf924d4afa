//! Line-delimited JSON over a real TCP socket.

mod harness;

use std::net::SocketAddr;
use std::sync::Arc;

use harness::temp_db::TempDb;
use orderdesk::adapter::inbound::server::listener::MAX_REQUEST_BYTES;
use orderdesk::adapter::inbound::server::Server;
use orderdesk::infrastructure::bootstrap::sqlite_service;
use orderdesk::testkit::db::{seed_customer, seed_dish, seed_order, seed_restaurant};
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;

struct Client {
    lines: Lines<BufReader<OwnedReadHalf>>,
    writer: OwnedWriteHalf,
}

impl Client {
    async fn connect(addr: SocketAddr) -> Self {
        let stream = TcpStream::connect(addr).await.unwrap();
        let (reader, writer) = stream.into_split();
        Self {
            lines: BufReader::new(reader).lines(),
            writer,
        }
    }

    async fn send_raw(&mut self, line: &str) -> Value {
        self.writer.write_all(line.as_bytes()).await.unwrap();
        self.writer.write_all(b"\n").await.unwrap();
        let reply = self.lines.next_line().await.unwrap().unwrap();
        serde_json::from_str(&reply).unwrap()
    }

    async fn send(&mut self, request: Value) -> Value {
        self.send_raw(&request.to_string()).await
    }
}

async fn start(db: &TempDb) -> SocketAddr {
    let service = Arc::new(sqlite_service(db.pool()));
    let server = Server::bind("127.0.0.1:0".parse().unwrap(), service)
        .await
        .unwrap();
    let addr = server.local_addr().unwrap();
    tokio::spawn(server.run());
    addr
}

fn seeded(name: &str) -> TempDb {
    let db = TempDb::create(name);
    let mut conn = db.conn();
    seed_restaurant(&mut conn, 1, "Grill");
    seed_dish(&mut conn, 1, 100, "Steak", "main_course", &[("regular", 80)]);
    seed_customer(&mut conn, 10, "north", "active", 0);
    seed_order(&mut conn, 10, 1, 40, "2024-03-02 12:00:00");
    drop(conn);
    db
}

#[tokio::test]
async fn report_round_trip_with_cache_and_refresh() {
    let db = seeded("server-report");
    let mut client = Client::connect(start(&db).await).await;

    let request = json!({
        "command": "income",
        "restaurant": 1,
        "month_year": "3/2024",
        "district": "north",
    });
    let first = client.send(request.clone()).await;
    assert_eq!(first["status"], "ok");
    assert_eq!(first["provenance"], "computed");
    assert_eq!(first["report"]["kind"], "income");
    assert_eq!(first["report"]["weeks"], json!([40, 0, 0, 0]));

    let second = client.send(request.clone()).await;
    assert_eq!(second["provenance"], "cached");

    let mut refresh = request;
    refresh["refresh"] = json!(true);
    let third = client.send(refresh).await;
    assert_eq!(third["provenance"], "computed");
}

#[tokio::test]
async fn menu_load_commit_and_receipt() {
    let db = seeded("server-order");
    let mut client = Client::connect(start(&db).await).await;

    let menu = client
        .send(json!({"command": "load-menu", "restaurant_name": "Grill"}))
        .await;
    assert_eq!(menu["status"], "ok");
    assert_eq!(menu["items"][0]["name"], "Steak");
    let snapshot = menu["snapshot"].clone();

    let committed = client
        .send(json!({
            "command": "commit-order",
            "now": "2024-03-05 12:00:00",
            "order": {
                "customer": 10,
                "restaurant": 1,
                "lines": [
                    {"dish_id": 100, "category": "main_course", "quantity": 1, "unit_price": 80}
                ],
                "delivery": {"type": "robot", "address": "1 Main St", "phone": "555"},
                "requested_at": "2024-03-05 19:00:00",
                "snapshot": snapshot,
            },
        }))
        .await;
    assert_eq!(committed["status"], "ok", "{committed}");
    assert_eq!(committed["total_price"], 80);
    let order_id = committed["order_id"].clone();

    let received = client
        .send(json!({
            "command": "confirm-receipt",
            "order_id": order_id,
            "received_at": "2024-03-05 12:30:00",
        }))
        .await;
    assert_eq!(received, json!({"status": "ok", "late": false, "credit_awarded": 0}));
}

#[tokio::test]
async fn stale_snapshot_asks_for_rebuild() {
    let db = seeded("server-stale");
    let mut client = Client::connect(start(&db).await).await;

    let menu = client
        .send(json!({"command": "load-menu", "restaurant_name": "Grill"}))
        .await;
    let ack = client
        .send(json!({
            "command": "begin-menu-edit",
            "restaurant": 1,
            "at": "2024-03-05 11:00:00",
        }))
        .await;
    assert_eq!(ack, json!({"status": "ok"}));

    let refused = client
        .send(json!({
            "command": "commit-order",
            "order": {
                "customer": 10,
                "restaurant": 1,
                "lines": [
                    {"dish_id": 100, "category": "main_course", "quantity": 1, "unit_price": 80}
                ],
                "delivery": {"type": "pickup"},
                "requested_at": "2024-03-05 19:00:00",
                "snapshot": menu["snapshot"].clone(),
            },
        }))
        .await;
    assert_eq!(refused["status"], "menu_changed");
    assert!(refused["message"]
        .as_str()
        .unwrap()
        .contains("please rebuild your order"));
}

#[tokio::test]
async fn bad_input_keeps_connection_open() {
    let db = seeded("server-bad-input");
    let mut client = Client::connect(start(&db).await).await;

    let garbage = client.send_raw("{not json").await;
    assert_eq!(garbage["status"], "invalid_argument");

    let bad_month = client
        .send(json!({"command": "performance", "district": "north", "month_year": "13/2024"}))
        .await;
    assert_eq!(bad_month["status"], "invalid_argument");

    let missing = client
        .send(json!({"command": "confirm-receipt", "order_id": 404}))
        .await;
    assert_eq!(missing["status"], "not_found");

    let fine = client
        .send(json!({"command": "performance", "district": "north", "month_year": "3/2024"}))
        .await;
    assert_eq!(fine["status"], "ok");
}

#[tokio::test]
async fn oversized_request_is_rejected_and_connection_survives() {
    let db = seeded("server-oversized");
    let mut client = Client::connect(start(&db).await).await;

    let huge = "x".repeat(MAX_REQUEST_BYTES + 1);
    let rejected = client.send_raw(&huge).await;
    assert_eq!(rejected["status"], "invalid_argument");

    let fine = client
        .send(json!({"command": "performance", "district": "north", "month_year": "3/2024"}))
        .await;
    assert_eq!(fine["status"], "ok");
}
