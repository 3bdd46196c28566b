// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

#![allow(dead_code)]

use actix_web::body::MessageBody;
use actix_web::cookie::Cookie;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};
use folio::app_state::AppState;
use folio::auth::gate::AdminGate;
use folio::auth::middleware::SessionMiddlewareFactory;
use folio::auth::{AuthService, User};
use folio::config::ValidatedConfig;
use folio::routes;
use folio::runtime_paths::RuntimePaths;
use folio::util::test_config::{TEST_ADMIN_EMAIL, TEST_ADMIN_PASSWORD, TestConfigBuilder};
use folio::util::test_fixtures::TestFixtureRoot;
use serde_json::Value;
use std::sync::Arc;

pub const ADMIN_EMAIL: &str = TEST_ADMIN_EMAIL;
pub const ADMIN_PASSWORD: &str = TEST_ADMIN_PASSWORD;

const BOUNDARY: &str = "----folio-test-boundary";

pub struct TestHarness {
    pub fixture: TestFixtureRoot,
    pub config: Arc<ValidatedConfig>,
    pub runtime_paths: RuntimePaths,
    pub app_state: Arc<AppState>,
    pub auth: Arc<AuthService>,
}

pub struct AuthSession {
    pub user: User,
    pub token: String,
    pub cookie: Cookie<'static>,
}

impl TestHarness {
    pub fn new() -> Self {
        Self::with_config(TestConfigBuilder::new())
    }

    pub fn with_config(builder: TestConfigBuilder) -> Self {
        let fixture = TestFixtureRoot::new_unique("api-test-suite").expect("fixture root");
        let config = builder.build();
        let runtime_paths = fixture.runtime_paths(&config).expect("runtime paths");
        let app_state =
            Arc::new(AppState::new(&config, &runtime_paths).expect("app state"));
        let auth = Arc::new(AuthService::from_config(&config).expect("auth service"));

        Self {
            fixture,
            config: Arc::new(config),
            runtime_paths,
            app_state,
            auth,
        }
    }

    pub fn admin_auth(&self) -> AuthSession {
        let (token, user) = self
            .auth
            .login(ADMIN_EMAIL, ADMIN_PASSWORD)
            .expect("admin login");
        let cookie = self.auth.tokens().session_cookie(&token).into_owned();
        AuthSession {
            user,
            token,
            cookie,
        }
    }

    pub fn app(
        &self,
    ) -> App<
        impl ServiceFactory<
            ServiceRequest,
            Config = (),
            Response = ServiceResponse<impl MessageBody + use<>>,
            Error = actix_web::Error,
            InitError = (),
        > + use<>,
    > {
        let gate = AdminGate::new(&self.config);
        let public_dir = self.runtime_paths.public_dir.clone();

        App::new()
            .app_data(web::Data::from(self.config.clone()))
            .app_data(web::Data::from(self.app_state.clone()))
            .app_data(web::Data::from(self.auth.clone()))
            .wrap(SessionMiddlewareFactory)
            .wrap(gate)
            .configure(move |cfg| routes::configure(cfg, &public_dir))
    }

    /// Files under the public tree, relative to it.
    pub fn public_files(&self) -> Vec<std::path::PathBuf> {
        self.fixture.list_files(&self.runtime_paths.public_dir)
    }
}

pub fn with_session(
    req: actix_web::test::TestRequest,
    session: &AuthSession,
) -> actix_web::test::TestRequest {
    req.cookie(session.cookie.clone())
}

pub fn with_bearer(
    req: actix_web::test::TestRequest,
    session: &AuthSession,
) -> actix_web::test::TestRequest {
    req.insert_header(("Authorization", format!("Bearer {}", session.token)))
}

pub async fn read_json<B: MessageBody>(resp: ServiceResponse<B>) -> Value {
    let body = actix_web::test::read_body(resp).await;
    serde_json::from_slice(&body).expect("json body")
}

pub enum Part<'a> {
    Text {
        name: &'a str,
        value: &'a str,
    },
    File {
        name: &'a str,
        filename: &'a str,
        content_type: &'a str,
        bytes: &'a [u8],
    },
}

/// Encodes `parts` as `multipart/form-data`; returns the content type and body.
pub fn multipart_body(parts: &[Part<'_>]) -> (String, Vec<u8>) {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match part {
            Part::Text { name, value } => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name)
                        .as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            Part::File {
                name,
                filename,
                content_type,
                bytes,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                        name, filename, content_type
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(bytes);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

    (
        format!("multipart/form-data; boundary={}", BOUNDARY),
        body,
    )
}

pub fn multipart_request(
    uri: &str,
    session: &AuthSession,
    parts: &[Part<'_>],
) -> actix_web::test::TestRequest {
    let (content_type, body) = multipart_body(parts);
    with_session(actix_web::test::TestRequest::post().uri(uri), session)
        .insert_header(("Content-Type", content_type))
        .set_payload(body)
}

pub const PNG_BYTES: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
    0x52,
];

pub const MP4_BYTES: &[u8] = &[
    0x00, 0x00, 0x00, 0x18, 0x66, 0x74, 0x79, 0x70, 0x6D, 0x70, 0x34, 0x32, 0x00, 0x00, 0x00,
    0x00, 0x6D, 0x70, 0x34, 0x32, 0x69, 0x73, 0x6F, 0x6D,
];
