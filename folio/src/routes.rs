// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use actix_files::Files;
use actix_web::web;
use std::path::Path;

use crate::api;

/// Registers the JSON API, then the read-only public tree at `/`.
/// The static mount goes last so it never shadows `/api`.
pub fn configure(cfg: &mut web::ServiceConfig, public_dir: &Path) {
    api::configure(cfg);
    cfg.service(Files::new("/", public_dir).use_etag(true).use_last_modified(true));
}
