// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

mod common;

use actix_web::{http::StatusCode, test};
use common::Part;
use folio::util::test_config::TestConfigBuilder;
use serde_json::Value;

fn image_part<'a>(filename: &'a str) -> Part<'a> {
    Part::File {
        name: "file",
        filename,
        content_type: "image/png",
        bytes: common::PNG_BYTES,
    }
}

#[actix_web::test]
async fn image_upload_is_stored_and_served() {
    let harness = common::TestHarness::new();
    let app = test::init_service(harness.app()).await;
    let session = harness.admin_auth();

    let req = common::multipart_request(
        "/api/upload",
        &session,
        &[image_part("Team Photo.PNG"), Part::Text { name: "type", value: "image" }],
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let json = common::read_json(resp).await;
    assert_eq!(json.get("success").and_then(Value::as_bool), Some(true));
    assert_eq!(json.get("category").and_then(Value::as_str), Some("image"));
    assert_eq!(json.get("mimeType").and_then(Value::as_str), Some("image/png"));
    assert_eq!(
        json.get("originalName").and_then(Value::as_str),
        Some("Team Photo.PNG")
    );
    assert_eq!(
        json.get("size").and_then(Value::as_u64),
        Some(common::PNG_BYTES.len() as u64)
    );

    let path = json.get("path").and_then(Value::as_str).expect("path");
    assert!(path.starts_with("/images/team-photo-"));
    assert!(path.ends_with(".png"));

    let req = test::TestRequest::get().uri(path).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = test::read_body(resp).await;
    assert_eq!(body.as_ref(), common::PNG_BYTES);
}

#[actix_web::test]
async fn same_name_uploads_produce_distinct_files() {
    let harness = common::TestHarness::new();
    let app = test::init_service(harness.app()).await;
    let session = harness.admin_auth();

    let mut paths = Vec::new();
    for _ in 0..2 {
        let req = common::multipart_request("/api/upload", &session, &[image_part("logo.png")])
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let json = common::read_json(resp).await;
        paths.push(json.get("path").and_then(Value::as_str).expect("path").to_string());
    }
    assert_ne!(paths[0], paths[1]);

    for path in &paths {
        let req = test::TestRequest::get().uri(path).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }
    assert_eq!(harness.public_files().len(), 2);
}

#[actix_web::test]
async fn disallowed_type_writes_nothing() {
    let harness = common::TestHarness::new();
    let app = test::init_service(harness.app()).await;
    let session = harness.admin_auth();

    let req = common::multipart_request(
        "/api/upload",
        &session,
        &[
            Part::File {
                name: "file",
                filename: "notes.txt",
                content_type: "text/plain",
                bytes: b"plain text notes",
            },
            Part::Text { name: "type", value: "document" },
        ],
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let json = common::read_json(resp).await;
    let error = json.get("error").and_then(Value::as_str).expect("error");
    assert!(error.contains("text/plain"));
    assert!(error.contains("PDF"));
    assert!(harness.public_files().is_empty());
}

#[actix_web::test]
async fn missing_file_part_is_rejected() {
    let harness = common::TestHarness::new();
    let app = test::init_service(harness.app()).await;
    let session = harness.admin_auth();

    let req = common::multipart_request(
        "/api/upload",
        &session,
        &[Part::Text { name: "type", value: "image" }],
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn oversize_file_is_rejected() {
    let harness = common::TestHarness::with_config(TestConfigBuilder::new().with_upload_limits(1, 1));
    let app = test::init_service(harness.app()).await;
    let session = harness.admin_auth();

    let mut big = common::PNG_BYTES.to_vec();
    big.resize(1024 * 1024 + 1, 0);
    let req = common::multipart_request(
        "/api/upload",
        &session,
        &[Part::File {
            name: "file",
            filename: "huge.png",
            content_type: "image/png",
            bytes: &big,
        }],
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let json = common::read_json(resp).await;
    assert_eq!(
        json.get("error").and_then(Value::as_str),
        Some("File too large. Maximum size is 1MB")
    );
    assert!(harness.public_files().is_empty());
}

#[actix_web::test]
async fn file_parts_outside_route_fields_are_rejected() {
    let harness = common::TestHarness::with_config(TestConfigBuilder::new().with_upload_limits(1, 1));
    let app = test::init_service(harness.app()).await;
    let session = harness.admin_auth();

    let mut extra = common::PNG_BYTES.to_vec();
    extra.resize(2 * 1024 * 1024, 0);
    let req = common::multipart_request(
        "/api/upload",
        &session,
        &[
            image_part("small.png"),
            Part::File {
                name: "thumbnail",
                filename: "extra.png",
                content_type: "image/png",
                bytes: &extra,
            },
        ],
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let json = common::read_json(resp).await;
    assert_eq!(
        json.get("error").and_then(Value::as_str),
        Some("Unexpected file field 'thumbnail'")
    );
    assert!(harness.public_files().is_empty());

    let req = common::multipart_request(
        "/api/upload/video",
        &session,
        &[
            Part::Text { name: "section", value: "intro" },
            Part::File {
                name: "video",
                filename: "clip.mp4",
                content_type: "video/mp4",
                bytes: common::MP4_BYTES,
            },
            image_part("stray.png"),
        ],
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(harness.public_files().is_empty());
}

#[actix_web::test]
async fn upload_requires_session() {
    let harness = common::TestHarness::new();
    let app = test::init_service(harness.app()).await;

    let (content_type, body) = common::multipart_body(&[image_part("logo.png")]);
    let req = test::TestRequest::post()
        .uri("/api/upload")
        .insert_header(("Content-Type", content_type))
        .set_payload(body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(harness.public_files().is_empty());
}

#[actix_web::test]
async fn section_video_with_thumbnail_is_stored_together() {
    let harness = common::TestHarness::new();
    let app = test::init_service(harness.app()).await;
    let session = harness.admin_auth();

    let req = common::multipart_request(
        "/api/upload/video",
        &session,
        &[
            Part::File {
                name: "video",
                filename: "intro.mp4",
                content_type: "video/mp4",
                bytes: common::MP4_BYTES,
            },
            Part::File {
                name: "thumbnail",
                filename: "intro.png",
                content_type: "image/png",
                bytes: common::PNG_BYTES,
            },
            Part::Text { name: "section", value: "homepage" },
        ],
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let json = common::read_json(resp).await;
    assert_eq!(json.get("section").and_then(Value::as_str), Some("homepage"));
    assert_eq!(json.get("mimeType").and_then(Value::as_str), Some("video/mp4"));

    let video_path = json.get("videoPath").and_then(Value::as_str).expect("videoPath");
    let thumbnail_path = json
        .get("thumbnailPath")
        .and_then(Value::as_str)
        .expect("thumbnailPath");
    assert!(video_path.starts_with("/videos-sections/homepage-"));
    assert!(video_path.ends_with(".mp4"));
    assert!(thumbnail_path.starts_with("/videos-sections/homepage-thumb-"));
    assert_eq!(harness.public_files().len(), 2);
}

#[actix_web::test]
async fn section_video_with_bad_thumbnail_writes_nothing() {
    let harness = common::TestHarness::new();
    let app = test::init_service(harness.app()).await;
    let session = harness.admin_auth();

    let req = common::multipart_request(
        "/api/upload/video",
        &session,
        &[
            Part::File {
                name: "video",
                filename: "intro.mp4",
                content_type: "video/mp4",
                bytes: common::MP4_BYTES,
            },
            Part::File {
                name: "thumbnail",
                filename: "intro.txt",
                content_type: "text/plain",
                bytes: b"not an image",
            },
            Part::Text { name: "section", value: "homepage" },
        ],
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(harness.public_files().is_empty());
}

#[actix_web::test]
async fn section_video_requires_valid_section() {
    let harness = common::TestHarness::new();
    let app = test::init_service(harness.app()).await;
    let session = harness.admin_auth();

    for section in [None, Some("../etc")] {
        let mut parts = vec![Part::File {
            name: "video",
            filename: "intro.mp4",
            content_type: "video/mp4",
            bytes: common::MP4_BYTES,
        }];
        if let Some(value) = section {
            parts.push(Part::Text { name: "section", value });
        }
        let req = common::multipart_request("/api/upload/video", &session, &parts).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
    assert!(harness.public_files().is_empty());
}
