// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

mod common;

use actix_web::cookie::Cookie;
use actix_web::http::header::LOCATION;
use actix_web::{http::StatusCode, test};
use folio::util::test_config::TestConfigBuilder;

#[actix_web::test]
async fn admin_subpage_without_cookie_redirects_to_login() {
    let harness = common::TestHarness::new();
    let app = test::init_service(harness.app()).await;

    let req = test::TestRequest::get()
        .uri("/admin/homepage?tab=hero")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    let location = resp
        .headers()
        .get(LOCATION)
        .and_then(|value| value.to_str().ok())
        .expect("location header");
    assert_eq!(
        location,
        "/admin/login?return_path=%2Fadmin%2Fhomepage%3Ftab%3Dhero"
    );
}

#[actix_web::test]
async fn admin_root_and_login_pass_through() {
    let harness = common::TestHarness::new();
    let app = test::init_service(harness.app()).await;

    for uri in ["/admin", "/admin/login", "/about"] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_ne!(resp.status(), StatusCode::FOUND, "{}", uri);
    }
}

#[actix_web::test]
async fn session_or_admin_flag_cookie_passes_the_gate() {
    let harness = common::TestHarness::new();
    let app = test::init_service(harness.app()).await;
    let session = harness.admin_auth();

    let req = common::with_session(test::TestRequest::get().uri("/admin/settings"), &session)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_ne!(resp.status(), StatusCode::FOUND);

    let req = test::TestRequest::get()
        .uri("/admin/settings")
        .cookie(Cookie::new(harness.config.auth.admin_cookie_name.clone(), "true"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_ne!(resp.status(), StatusCode::FOUND);
}

#[actix_web::test]
async fn empty_cookie_does_not_pass_the_gate() {
    let harness = common::TestHarness::new();
    let app = test::init_service(harness.app()).await;

    let req = test::TestRequest::get()
        .uri("/admin/settings")
        .cookie(Cookie::new(harness.config.auth.cookie_name.clone(), ""))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
}

#[actix_web::test]
async fn custom_admin_path_is_gated() {
    let harness =
        common::TestHarness::with_config(TestConfigBuilder::new().with_admin_path("/studio"));
    let app = test::init_service(harness.app()).await;

    let req = test::TestRequest::get().uri("/studio/about").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    let location = resp
        .headers()
        .get(LOCATION)
        .and_then(|value| value.to_str().ok())
        .expect("location header");
    assert!(location.starts_with("/studio/login?return_path="));

    let req = test::TestRequest::get().uri("/admin/about").to_request();
    let resp = test::call_service(&app, req).await;
    assert_ne!(resp.status(), StatusCode::FOUND);
}
