// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use super::schema::{FieldSpec, SectionSchema};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backing {
    Memory,
    File,
}

static HOMEPAGE_FIELDS: [FieldSpec; 7] = [
    FieldSpec::required("title", "Clarity for complex decisions"),
    FieldSpec::required(
        "subtitle",
        "Independent advice on strategy, operations and technology",
    ),
    FieldSpec::required("buttonText", "Get in touch"),
    FieldSpec::text("backgroundImage", "/images/hero-bg.jpg"),
    FieldSpec::text("backgroundColor", "#0b1f3a"),
    FieldSpec::text("buttonLink", "/contact"),
    FieldSpec::text("backgroundVideo", ""),
];

static ABOUT_FIELDS: [FieldSpec; 6] = [
    FieldSpec::required("mainTitle", "About us"),
    FieldSpec::required(
        "description1",
        "We help organisations turn strategy into measurable results.",
    ),
    FieldSpec::required(
        "description2",
        "Our consultants combine industry experience with practical delivery.",
    ),
    FieldSpec::text("subtitle", ""),
    FieldSpec::text("image", "/images/about.jpg"),
    FieldSpec::list("statistics"),
];

static EXPERTISE_FIELDS: [FieldSpec; 4] = [
    FieldSpec::required("title", "Our expertise"),
    FieldSpec::text("subtitle", ""),
    FieldSpec::text("description", ""),
    FieldSpec::list("items"),
];

static SETTINGS_FIELDS: [FieldSpec; 9] = [
    FieldSpec::required("siteName", "Folio Consulting"),
    FieldSpec::text("tagline", ""),
    FieldSpec::text("logo", ""),
    FieldSpec::text("favicon", ""),
    FieldSpec::text("primaryColor", "#0b1f3a"),
    FieldSpec::text("contactEmail", ""),
    FieldSpec::text("phone", ""),
    FieldSpec::text("address", ""),
    FieldSpec::map("socialLinks"),
];

static CONTACT_FIELDS: [FieldSpec; 5] = [
    FieldSpec::required("email", "hello@example.com"),
    FieldSpec::text("phone", ""),
    FieldSpec::text("address", ""),
    FieldSpec::text("mapUrl", ""),
    FieldSpec::text("officeHours", ""),
];

pub static SECTIONS: [SectionSchema; 5] = [
    SectionSchema {
        name: "homepage",
        backing: Backing::Memory,
        fields: &HOMEPAGE_FIELDS,
    },
    SectionSchema {
        name: "about",
        backing: Backing::Memory,
        fields: &ABOUT_FIELDS,
    },
    SectionSchema {
        name: "expertise",
        backing: Backing::File,
        fields: &EXPERTISE_FIELDS,
    },
    SectionSchema {
        name: "settings",
        backing: Backing::File,
        fields: &SETTINGS_FIELDS,
    },
    SectionSchema {
        name: "contact",
        backing: Backing::Memory,
        fields: &CONTACT_FIELDS,
    },
];

pub fn find_section(name: &str) -> Option<&'static SectionSchema> {
    SECTIONS.iter().find(|schema| schema.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_section_is_reachable_by_name() {
        for schema in &SECTIONS {
            let found = find_section(schema.name).expect("section");
            assert_eq!(found.name, schema.name);
        }
        assert!(find_section("publications").is_none());
        assert!(find_section("Homepage").is_none());
    }

    #[test]
    fn defaults_satisfy_their_own_schema() {
        for schema in &SECTIONS {
            let defaults = schema.default_record();
            let merged = schema
                .validate_and_merge(None, &defaults)
                .expect("defaults validate");
            assert_eq!(merged, defaults, "{}", schema.name);
        }
    }

    #[test]
    fn file_backed_sections() {
        let files: Vec<_> = SECTIONS
            .iter()
            .filter(|schema| schema.backing == Backing::File)
            .map(|schema| schema.name)
            .collect();
        assert_eq!(files, vec!["expertise", "settings"]);
    }
}
