// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

#![allow(dead_code)]

use crate::config::{
    AdminAccountConfig, AdminConfig, AppConfig, AuthConfig, BackendConfig, LoggingConfig,
    ServerConfig, StorageConfig, UploadConfig, ValidatedConfig,
};

pub const TEST_ADMIN_EMAIL: &str = "admin@example.com";
pub const TEST_ADMIN_PASSWORD: &str = "admin-password";

#[derive(Debug, Clone)]
pub struct TestConfigBuilder {
    config: ValidatedConfig,
}

impl Default for TestConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: ValidatedConfig {
                server: ServerConfig {
                    host: "127.0.0.1".to_string(),
                    port: 7080,
                    workers: 1,
                },
                admin: AdminConfig::default(),
                auth: AuthConfig {
                    secret: "test-secret-test-secret-test-secret".to_string(),
                    issuer: "folio".to_string(),
                    session_hours: 168,
                    cookie_name: "auth-token".to_string(),
                    admin_cookie_name: "is-admin".to_string(),
                    admin: AdminAccountConfig {
                        email: TEST_ADMIN_EMAIL.to_string(),
                        password: TEST_ADMIN_PASSWORD.to_string(),
                        name: "Test Admin".to_string(),
                    },
                },
                storage: StorageConfig::default(),
                upload: UploadConfig::default(),
                backend: BackendConfig::default(),
                logging: LoggingConfig::default(),
                app: AppConfig {
                    name: "Test Folio".to_string(),
                    description: "Test Description".to_string(),
                },
            },
        }
    }

    pub fn with_admin_path(mut self, path: &str) -> Self {
        self.config.admin.path = path.to_string();
        self.config.admin.login_path = format!("{}/login", path);
        self
    }

    pub fn with_data_dir(mut self, dir: &str) -> Self {
        self.config.storage.data_dir = dir.to_string();
        self
    }

    pub fn with_upload_limits(mut self, max_file_size_mb: u64, max_video_size_mb: u64) -> Self {
        self.config.upload.max_file_size_mb = max_file_size_mb;
        self.config.upload.max_video_size_mb = max_video_size_mb;
        self
    }

    pub fn with_backend_url(mut self, url: Option<&str>) -> Self {
        self.config.backend.base_url = url.map(str::to_string);
        self
    }

    pub fn with_session_hours(mut self, hours: u64) -> Self {
        self.config.auth.session_hours = hours;
        self
    }

    pub fn build(self) -> ValidatedConfig {
        self.config
    }
}

pub fn test_config() -> ValidatedConfig {
    TestConfigBuilder::new().build()
}
