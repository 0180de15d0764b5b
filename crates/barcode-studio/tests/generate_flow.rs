//! End-to-end tests of the generate workflow against an in-memory
//! canvas and a mock rendering service.

use barcode_studio::config::{SettingsManager, StudioConfig, FALLBACK_API_KEY};
use barcode_studio::{NoticeEvent, Session, StateEvent, UiEvent, UiRequest};
use httpmock::prelude::*;
use studio_canvas::{CanvasDocument, InMemoryCanvas, NodeKind, Paint};
use studio_db::Database;
use tokio::sync::mpsc;
use zebra_client::BarcodeFormat;

const QR_SVG: &str = r#"<svg width="472" height="472"><rect x="0" y="0" width="472" height="472" fill="white"/><rect x="40" y="40" width="56" height="56" fill="black"/></svg>"#;
const BAR_SVG: &str = r#"<svg width="440" height="120"><rect x="0" y="0" width="440" height="120" fill="white"/><rect x="12" y="0" width="4" height="120" fill="black"/></svg>"#;

struct Harness {
    session: Session<InMemoryCanvas>,
    rx: mpsc::UnboundedReceiver<UiEvent>,
}

fn harness(server: &MockServer) -> Harness {
    harness_with(server, |_| {})
}

fn harness_with(server: &MockServer, tweak: impl FnOnce(&SettingsManager)) -> Harness {
    let db = Database::open_in_memory().unwrap();
    let sm = SettingsManager::new(db.clone());
    sm.initialize_defaults().unwrap();
    sm.set_setting("zebra.endpoint", &server.base_url()).unwrap();
    tweak(&sm);
    let config = StudioConfig::load(&sm).unwrap();
    let (session, rx) = Session::new(InMemoryCanvas::new(), db, config).unwrap();
    Harness { session, rx }
}

/// Drain state events up to and including the `state:finish` marker.
fn states_until_finish(rx: &mut mpsc::UnboundedReceiver<UiEvent>) -> Vec<StateEvent> {
    let mut states = Vec::new();
    while let Ok(event) = rx.try_recv() {
        if let UiEvent::State(state) = event {
            let done = state == StateEvent::Finish;
            states.push(state);
            if done {
                break;
            }
        }
    }
    states
}

/// Wait for the next toast to appear, skipping state events and the
/// dismissal of any earlier toast.
async fn next_show(rx: &mut mpsc::UnboundedReceiver<UiEvent>) -> (String, bool) {
    loop {
        match rx.recv().await.expect("channel open") {
            UiEvent::Notice(NoticeEvent::Show { message, error, .. }) => return (message, error),
            _ => continue,
        }
    }
}

fn generate(text: Option<&str>, format: BarcodeFormat) -> UiRequest {
    UiRequest::Generate {
        text: text.map(str::to_string),
        format,
    }
}

#[tokio::test]
async fn success_places_one_named_container() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .query_param("type", "CODE-128")
            .header("X-RapidAPI-Key", FALLBACK_API_KEY);
        then.status(200).json_body(serde_json::json!({ "image": BAR_SVG }));
    });

    let mut h = harness(&server);
    h.session
        .handle(generate(Some("hello%20world"), BarcodeFormat::Code128))
        .await;

    mock.assert();
    assert_eq!(states_until_finish(&mut h.rx), vec![StateEvent::Finish]);

    let canvas = h.session.canvas();
    let page = canvas.page_children();
    assert_eq!(page.len(), 1);
    let frame = page[0];
    assert_eq!(canvas.node_kind(frame), Some(NodeKind::Frame));
    assert_eq!(canvas.size(frame), Some((512.0, 640.0)));
    assert_eq!(canvas.name(frame).as_deref(), Some("CODE 128 - hello world"));
}

#[tokio::test]
async fn one_dimensional_layout_has_format_label_and_centered_strip() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET);
        then.status(200).json_body(serde_json::json!({ "image": BAR_SVG }));
    });

    let mut h = harness(&server);
    h.session
        .handle(generate(Some("12345"), BarcodeFormat::Ean13))
        .await;
    states_until_finish(&mut h.rx);

    let canvas = h.session.canvas();
    let frame = canvas.page_children()[0];
    let children = canvas.children(frame);
    // caption, format label, graphic — labels appended before the graphic
    assert_eq!(children.len(), 3);
    assert_eq!(canvas.node_kind(children[0]), Some(NodeKind::Text));
    assert_eq!(canvas.node_kind(children[1]), Some(NodeKind::Text));
    assert_eq!(canvas.node_kind(children[2]), Some(NodeKind::Vector));

    assert_eq!(
        canvas.text_characters(children[0]).as_deref(),
        Some("12345")
    );
    assert_eq!(
        canvas.text_characters(children[1]).as_deref(),
        Some("EAN 13")
    );
    assert_eq!(canvas.position(children[1]).unwrap().1, 124.0);

    // Natural 120-unit height, vertically centered, 20-unit margins.
    let graphic = children[2];
    assert_eq!(canvas.size(graphic), Some((472.0, 120.0)));
    let (gx, gy) = canvas.position(graphic).unwrap();
    assert_eq!(gx, 20.0);
    assert_eq!(gy, 260.0);
}

#[tokio::test]
async fn qr_layout_is_square_and_inset() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).query_param("type", "QR_CODE");
        then.status(200).json_body(serde_json::json!({ "image": QR_SVG }));
    });

    let mut h = harness(&server);
    h.session
        .handle(generate(Some("ticket-9"), BarcodeFormat::QrCode))
        .await;
    states_until_finish(&mut h.rx);

    let canvas = h.session.canvas();
    let frame = canvas.page_children()[0];
    let children = canvas.children(frame);
    // caption + graphic only: no format label for QR
    assert_eq!(children.len(), 2);
    let graphic = children[1];
    assert_eq!(canvas.position(graphic), Some((20.0, 20.0)));
    assert_eq!(canvas.size(graphic), Some((472.0, 472.0)));
}

#[tokio::test]
async fn second_container_lines_up_right_of_the_first() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET);
        then.status(200).json_body(serde_json::json!({ "image": QR_SVG }));
    });

    let mut h = harness(&server);
    h.session
        .handle(generate(Some("one"), BarcodeFormat::QrCode))
        .await;
    h.session
        .handle(generate(Some("two"), BarcodeFormat::QrCode))
        .await;

    let canvas = h.session.canvas();
    let page = canvas.page_children();
    assert_eq!(page.len(), 2);
    let (x1, y1) = canvas.position(page[0]).unwrap();
    let (x2, y2) = canvas.position(page[1]).unwrap();
    assert_eq!(x1, 0.0);
    assert_eq!(x2, 512.0 + 20.0);
    assert_eq!(y1, y2);
}

#[tokio::test]
async fn deleted_predecessor_leaves_default_origin() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET);
        then.status(200).json_body(serde_json::json!({ "image": QR_SVG }));
    });

    let mut h = harness(&server);
    h.session
        .handle(generate(Some("one"), BarcodeFormat::QrCode))
        .await;
    let first = h.session.canvas().page_children()[0];
    h.session.canvas_mut().remove(first).unwrap();

    h.session
        .handle(generate(Some("two"), BarcodeFormat::QrCode))
        .await;
    let page = h.session.canvas().page_children();
    assert_eq!(page.len(), 1);
    assert_eq!(h.session.canvas().position(page[0]), Some((0.0, 0.0)));
}

#[tokio::test]
async fn selection_supplies_text_when_request_has_none() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).query_param("data", "caf\u{e9} au lait");
        then.status(200).json_body(serde_json::json!({ "image": QR_SVG }));
    });

    let mut h = harness(&server);
    let text = h.session.canvas_mut().add_page_text("café au lait");
    h.session.canvas_mut().set_selection(&[text]);

    h.session.handle(generate(None, BarcodeFormat::QrCode)).await;

    mock.assert();
    assert_eq!(states_until_finish(&mut h.rx), vec![StateEvent::Finish]);
    let canvas = h.session.canvas();
    // page holds the source text node plus the new container
    assert_eq!(canvas.page_children().len(), 2);
    let frame = canvas.page_children()[1];
    assert_eq!(canvas.name(frame).as_deref(), Some("QR_CODE - café au lait"));
}

#[tokio::test]
async fn request_text_never_consults_the_selection() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).query_param("data", "explicit");
        then.status(200).json_body(serde_json::json!({ "image": QR_SVG }));
    });

    let mut h = harness(&server);
    let text = h.session.canvas_mut().add_page_text("selected text");
    h.session.canvas_mut().set_selection(&[text]);

    h.session
        .handle(generate(Some("explicit"), BarcodeFormat::QrCode))
        .await;

    mock.assert();
}

#[tokio::test]
async fn no_text_and_no_selection_is_silent_and_offline() {
    let server = MockServer::start();
    let catch_all = server.mock(|when, then| {
        when.method(GET);
        then.status(200).json_body(serde_json::json!({ "image": QR_SVG }));
    });

    let mut h = harness(&server);
    h.session.handle(generate(None, BarcodeFormat::QrCode)).await;

    assert_eq!(catch_all.hits(), 0);
    assert_eq!(
        states_until_finish(&mut h.rx),
        vec![StateEvent::NoTextSelected, StateEvent::Finish]
    );
    assert!(h.session.canvas().page_children().is_empty());
}

#[tokio::test]
async fn empty_text_with_no_selection_is_no_text_selected() {
    let server = MockServer::start();
    let catch_all = server.mock(|when, then| {
        when.method(GET);
        then.status(200).json_body(serde_json::json!({ "image": QR_SVG }));
    });

    let mut h = harness(&server);
    h.session
        .handle(generate(Some(""), BarcodeFormat::QrCode))
        .await;

    assert_eq!(catch_all.hits(), 0);
    assert_eq!(
        states_until_finish(&mut h.rx),
        vec![StateEvent::NoTextSelected, StateEvent::Finish]
    );
    assert!(h.session.canvas().page_children().is_empty());
}

#[tokio::test]
async fn empty_text_falls_back_to_the_selection() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).query_param("data", "from selection");
        then.status(200).json_body(serde_json::json!({ "image": QR_SVG }));
    });

    let mut h = harness(&server);
    let text = h.session.canvas_mut().add_page_text("from selection");
    h.session.canvas_mut().set_selection(&[text]);

    h.session
        .handle(generate(Some(""), BarcodeFormat::QrCode))
        .await;

    mock.assert();
    assert_eq!(states_until_finish(&mut h.rx), vec![StateEvent::Finish]);
}

#[tokio::test]
async fn non_text_selection_is_no_text_selected() {
    let server = MockServer::start();
    let mut h = harness(&server);
    let frame = h.session.canvas_mut().create_frame();
    h.session.canvas_mut().append_to_page(frame).unwrap();
    let id = h.session.canvas().page_children()[0];
    h.session.canvas_mut().set_selection(&[id]);

    h.session.handle(generate(None, BarcodeFormat::Code128)).await;

    assert_eq!(
        states_until_finish(&mut h.rx),
        vec![StateEvent::NoTextSelected, StateEvent::Finish]
    );
}

#[tokio::test]
async fn forbidden_surfaces_the_auth_message() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET);
        then.status(403).json_body(serde_json::json!({ "image": null }));
    });

    let mut h = harness(&server);
    h.session
        .handle(generate(Some("abc"), BarcodeFormat::QrCode))
        .await;

    let (message, error) = next_show(&mut h.rx).await;
    assert_eq!(message, "API Key is invalid or expired");
    assert!(error);
    assert!(h.session.canvas().page_children().is_empty());
}

#[tokio::test]
async fn quota_and_generic_messages_are_classified() {
    let server = MockServer::start();
    let quota = server.mock(|when, then| {
        when.method(GET).query_param("data", "quota");
        then.status(429).json_body(serde_json::json!({ "image": null }));
    });
    server.mock(|when, then| {
        when.method(GET).query_param("data", "broken");
        then.status(200).json_body(serde_json::json!({ "image": "" }));
    });

    // Short toast duration so the second show arrives promptly after
    // the first one's dismissal.
    let mut h = harness_with(&server, |sm| {
        sm.set_setting("notice.duration-ms", "50").unwrap();
    });
    h.session
        .handle(generate(Some("quota"), BarcodeFormat::QrCode))
        .await;
    quota.assert();
    let (message, _) = next_show(&mut h.rx).await;
    assert_eq!(message, "API Request exceeded capacity.");

    h.session
        .handle(generate(Some("broken"), BarcodeFormat::QrCode))
        .await;
    let (message, _) = next_show(&mut h.rx).await;
    assert_eq!(
        message,
        "Oops! Barcode generation failed, please try again later."
    );
}

#[tokio::test]
async fn finish_is_emitted_once_per_invocation_on_failure_too() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET);
        then.status(500).json_body(serde_json::json!({ "image": null }));
    });

    let mut h = harness(&server);
    h.session
        .handle(generate(Some("abc"), BarcodeFormat::QrCode))
        .await;

    let states = states_until_finish(&mut h.rx);
    assert_eq!(states.iter().filter(|s| **s == StateEvent::Finish).count(), 1);
}

#[tokio::test]
async fn saved_key_replaces_the_fallback_until_cleared() {
    let server = MockServer::start();
    let with_saved = server.mock(|when, then| {
        when.method(GET).header("X-RapidAPI-Key", "my-own-key");
        then.status(200).json_body(serde_json::json!({ "image": QR_SVG }));
    });
    let with_fallback = server.mock(|when, then| {
        when.method(GET).header("X-RapidAPI-Key", FALLBACK_API_KEY);
        then.status(200).json_body(serde_json::json!({ "image": QR_SVG }));
    });

    let mut h = harness(&server);
    h.session
        .handle(UiRequest::SaveKey {
            text: "my-own-key".into(),
        })
        .await;
    h.session
        .handle(generate(Some("a"), BarcodeFormat::QrCode))
        .await;
    assert_eq!(with_saved.hits(), 1);
    assert_eq!(with_fallback.hits(), 0);

    h.session.handle(UiRequest::ClearKey).await;
    h.session
        .handle(generate(Some("b"), BarcodeFormat::QrCode))
        .await;
    assert_eq!(with_fallback.hits(), 1);

    // Both credential changes pushed a key-updated state.
    let mut key_updates = 0;
    while let Ok(event) = h.rx.try_recv() {
        if event == UiEvent::State(StateEvent::KeyUpdated) {
            key_updates += 1;
        }
    }
    assert_eq!(key_updates, 2);
}

#[tokio::test]
async fn startup_prefills_the_stored_key() {
    let server = MockServer::start();
    let h = harness_with(&server, |sm| {
        sm.set_setting("zebra.api-key", "stored-key").unwrap();
    });
    h.session.startup().unwrap();

    let mut rx = h.rx;
    let Some(UiEvent::State(StateEvent::SavedKey { text })) = rx.try_recv().ok() else {
        panic!("expected the saved-key prefill");
    };
    assert_eq!(text, "stored-key");
}

#[tokio::test]
async fn raster_mode_paints_a_rectangle_with_an_image_fill() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET);
        then.status(200).json_body(serde_json::json!({ "image": BAR_SVG }));
    });

    let mut h = harness_with(&server, |sm| {
        sm.set_setting("graphic.import-mode", "raster").unwrap();
    });
    h.session
        .handle(generate(Some("raster"), BarcodeFormat::Code39))
        .await;

    let canvas = h.session.canvas();
    let frame = canvas.page_children()[0];
    let graphic = *canvas.children(frame).last().unwrap();
    assert_eq!(canvas.node_kind(graphic), Some(NodeKind::Rectangle));

    let fills = canvas.fills(graphic);
    let [Paint::Image { hash, .. }] = &fills[..] else {
        panic!("expected a single image fill");
    };
    // The registered bitmap is the 2x export of the 440x120 markup.
    let png = canvas.image_bytes(hash).expect("registered image");
    assert_eq!(
        studio_canvas::raster::image_dimensions(&png).unwrap(),
        (880, 240)
    );
    // No stray vector node left behind.
    assert!(canvas
        .children(frame)
        .iter()
        .all(|c| canvas.node_kind(*c) != Some(NodeKind::Vector)));
}

#[tokio::test]
async fn data_uri_payload_becomes_an_image_fill_in_vector_mode() {
    // A 1x1 PNG, base64-encoded.
    const PIXEL: &str = "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET);
        then.status(200).json_body(serde_json::json!({
            "image": format!("data:image/png;base64,{PIXEL}")
        }));
    });

    let mut h = harness(&server);
    h.session
        .handle(generate(Some("pixel"), BarcodeFormat::QrCode))
        .await;

    let canvas = h.session.canvas();
    let page = canvas.page_children();
    assert_eq!(page.len(), 1, "generate should have succeeded");
    let graphic = *canvas.children(page[0]).last().unwrap();
    assert_eq!(canvas.node_kind(graphic), Some(NodeKind::Rectangle));
    assert!(matches!(canvas.fills(graphic)[..], [Paint::Image { .. }]));
}
