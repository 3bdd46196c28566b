// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use actix_web::web;

mod auth;
mod content;
pub mod error;
mod section_video;
mod sections;
mod upload;

pub use error::ApiError;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .app_data(error::json_config())
            .app_data(error::query_config())
            .service(
                web::resource("/admin/{section}")
                    .route(web::get().to(sections::get_section))
                    .route(web::post().to(sections::update_section)),
            )
            .service(
                web::resource("/content")
                    .route(web::get().to(content::get_content))
                    .route(web::post().to(content::store_content))
                    .route(web::put().to(content::update_item))
                    .route(web::delete().to(content::delete_item)),
            )
            .route("/upload", web::post().to(upload::upload_file))
            .route("/upload/video", web::post().to(upload::upload_section_video))
            .service(
                web::scope("/auth")
                    .route("/login", web::post().to(auth::login))
                    .route("/register", web::post().to(auth::register))
                    .route("/check", web::get().to(auth::check))
                    .route("/logout", web::post().to(auth::logout)),
            )
            .route(
                "/section-videos/{section}/toggle",
                web::post().to(section_video::toggle),
            ),
    );
}
