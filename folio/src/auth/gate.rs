// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use actix_web::{
    Error, HttpResponse,
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
    http::header::LOCATION,
};
use futures_util::future::LocalBoxFuture;
use std::future::{Ready, ready};
use std::rc::Rc;

use crate::config::ValidatedConfig;

#[derive(Debug)]
struct GateRules {
    admin_path: String,
    login_path: String,
    cookie_names: [String; 2],
}

impl GateRules {
    /// Admin sub-pages are gated; the admin root and the login page are not.
    fn is_gated(&self, path: &str) -> bool {
        let path = path.trim_end_matches('/');
        if path == self.admin_path || path == self.login_path.trim_end_matches('/') {
            return false;
        }
        path.strip_prefix(&self.admin_path)
            .is_some_and(|rest| rest.starts_with('/'))
    }

    fn has_session_cookie(&self, req: &ServiceRequest) -> bool {
        self.cookie_names.iter().any(|name| {
            req.cookie(name)
                .is_some_and(|cookie| !cookie.value().is_empty())
        })
    }

    fn login_redirect(&self, req: &ServiceRequest) -> String {
        let current = req
            .uri()
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or(req.uri().path());
        format!(
            "{}?return_path={}",
            self.login_path,
            urlencoding::encode(current)
        )
    }
}

/// Redirects browser navigation under the admin prefix to the login page unless a
/// session or admin-flag cookie is present. Only presence is checked; the API routes
/// verify the token itself.
pub struct AdminGate {
    rules: Rc<GateRules>,
}

impl AdminGate {
    pub fn new(config: &ValidatedConfig) -> Self {
        Self {
            rules: Rc::new(GateRules {
                admin_path: config.admin.path.clone(),
                login_path: config.admin.login_path.clone(),
                cookie_names: [
                    config.auth.cookie_name.clone(),
                    config.auth.admin_cookie_name.clone(),
                ],
            }),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AdminGate
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = AdminGateService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AdminGateService {
            service,
            rules: self.rules.clone(),
        }))
    }
}

pub struct AdminGateService<S> {
    service: S,
    rules: Rc<GateRules>,
}

impl<S, B> Service<ServiceRequest> for AdminGateService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        if self.rules.is_gated(req.path()) && !self.rules.has_session_cookie(&req) {
            let location = self.rules.login_redirect(&req);
            log::debug!("Admin gate redirecting {} to {}", req.path(), location);
            let (req, _) = req.into_parts();
            let response = HttpResponse::Found()
                .insert_header((LOCATION, location))
                .finish()
                .map_into_right_body();
            return Box::pin(async move { Ok(ServiceResponse::new(req, response)) });
        }

        let fut = self.service.call(req);
        Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) })
    }
}
