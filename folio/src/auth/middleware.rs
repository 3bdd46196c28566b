// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready};
use actix_web::http::header::AUTHORIZATION;
use actix_web::web::Data;
use actix_web::{Error, HttpMessage, HttpRequest};
use futures_util::future::LocalBoxFuture;
use std::future::{Ready, ready};
use std::rc::Rc;

use super::AuthService;
use super::token::Claims;
use super::users::User;

/// The verified identity attached to a request.
#[derive(Debug, Clone)]
pub struct SessionUser {
    pub user: User,
    pub claims: Claims,
}

/// Trait to add session accessors to HttpRequest
pub trait AuthRequest {
    fn session_user(&self) -> Option<SessionUser>;
    fn bearer_token(&self) -> Option<String>;
}

impl AuthRequest for HttpRequest {
    fn session_user(&self) -> Option<SessionUser> {
        self.extensions().get::<SessionUser>().cloned()
    }

    fn bearer_token(&self) -> Option<String> {
        bearer_from_header(self.headers().get(AUTHORIZATION)?.to_str().ok()?)
    }
}

fn bearer_from_header(value: &str) -> Option<String> {
    let (scheme, token) = value.trim().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then(|| token.to_string())
}

/// Resolves a bearer header or session cookie into a [`SessionUser`] request extension.
/// Requests without a valid session pass through untouched.
pub struct SessionMiddlewareFactory;

impl<S, B> Transform<S, ServiceRequest> for SessionMiddlewareFactory
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = SessionMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SessionMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct SessionMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for SessionMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        if let Some(auth) = req.app_data::<Data<AuthService>>().cloned() {
            let token = req.request().bearer_token().or_else(|| {
                req.cookie(auth.tokens().cookie_name())
                    .map(|cookie| cookie.value().to_string())
            });
            if let Some(token) = token {
                match auth.resolve(&token) {
                    Ok(session) => {
                        req.extensions_mut().insert(session);
                    }
                    Err(err) => log::debug!("Ignoring session token on {}: {}", req.path(), err),
                }
            }
        }

        let service = self.service.clone();
        Box::pin(async move { service.call(req).await })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearer_parsing() {
        assert_eq!(bearer_from_header("Bearer abc"), Some("abc".to_string()));
        assert_eq!(bearer_from_header("bearer   abc "), Some("abc".to_string()));
        assert_eq!(bearer_from_header("Basic abc"), None);
        assert_eq!(bearer_from_header("Bearer "), None);
        assert_eq!(bearer_from_header("Bearer"), None);
    }
}
