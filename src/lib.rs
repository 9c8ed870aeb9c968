// SPDX-FileCopyrightText: The doctheme authors
// SPDX-License-Identifier: MPL-2.0

#![cfg_attr(not(test), deny(clippy::panic_in_result_fn))]
#![cfg_attr(not(debug_assertions), deny(clippy::used_underscore_binding))]

//! A validated, immutable theme configuration for documentation sites.
//!
//! Refer to [`docs`] for the configuration contract.

pub mod clock;
pub mod docs;
pub mod markup;

use std::sync::OnceLock;

use derive_more::{Display, Error};
use url::Url;

use crate::{
    clock::Clock,
    markup::{Element, Fragment, MarkupError},
};

#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
/// Unvalidated theme settings
///
/// The raw input for building a [`ThemeConfig`]. All fields are plain
/// data. Nothing is checked until [`ThemeConfig::new()`] runs.
pub struct ThemeSettings {
    /// URL of the repository that hosts the site.
    pub repository_url: String,

    /// Base URL for linking from a rendered page to its source document.
    ///
    /// Usually points into the repository, e.g. a `/blob/<branch>` path.
    pub docs_source_base: String,

    /// Suffix appended to every page title. May be empty.
    pub title_suffix: String,

    /// Branding markup for the sidebar/header.
    pub logo_markup: Fragment,

    /// Extra `<head>` elements, typically `<meta>` and `<link>`.
    ///
    /// Icon paths referenced here are opaque strings. Whether the
    /// files exist at the served site root is the consuming
    /// framework's contract.
    pub head_markup: Vec<Element>,

    /// Toggle for the search UI.
    pub search_enabled: bool,

    /// Toggle for the "previous page" navigation link.
    pub show_prev_link: bool,

    /// Toggle for the "next page" navigation link.
    pub show_next_link: bool,

    /// Toggle for the footer.
    pub show_footer: bool,

    /// Label of the footer's edit link. May be empty.
    pub footer_edit_link_label: String,

    /// Footer markup, typically a copyright line.
    ///
    /// May contain [`markup::Node::CurrentYear`] placeholders.
    pub footer_markup: Fragment,
}

impl Default for ThemeSettings {
    fn default() -> Self {
        Self {
            repository_url: String::new(),
            docs_source_base: String::new(),
            title_suffix: String::new(),
            logo_markup: Fragment::default(),
            head_markup: Vec::new(),
            // All presentation toggles default to enabled.
            search_enabled: true,
            show_prev_link: true,
            show_next_link: true,
            show_footer: true,
            footer_edit_link_label: String::new(),
            footer_markup: Fragment::default(),
        }
    }
}

/// A configuration validation error
///
/// Validation failures are terminal. The settings are static, so a
/// failed validation fails identically on every retry. Callers are
/// expected to abort startup instead of rendering partially
/// configured pages.
#[derive(Debug, Display, Error)]
pub enum ConfigValidationError {
    /// A required field is missing or empty.
    #[display("missing required field `{field}`")]
    MissingField {
        /// The offending field.
        field: &'static str,
    },

    /// A URL field does not hold a well-formed absolute URL.
    #[display("malformed URL in field `{field}`: {source}")]
    MalformedUrl {
        /// The offending field.
        field: &'static str,

        /// The parse failure.
        source: url::ParseError,
    },

    /// A markup field contains invalid markup.
    #[display("invalid markup in field `{field}`: {source}")]
    Markup {
        /// The offending field.
        field: &'static str,

        /// The underlying markup error.
        source: MarkupError,
    },
}

fn parse_required_url(field: &'static str, value: &str) -> Result<Url, ConfigValidationError> {
    if value.is_empty() {
        return Err(ConfigValidationError::MissingField { field });
    }
    Url::parse(value).map_err(|source| ConfigValidationError::MalformedUrl { field, source })
}

fn validated_fragment(
    field: &'static str,
    fragment: Fragment,
) -> Result<Fragment, ConfigValidationError> {
    fragment
        .validate()
        .map_err(|source| ConfigValidationError::Markup { field, source })?;
    Ok(fragment)
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
/// Validated, immutable theme configuration
///
/// Built once at startup from [`ThemeSettings`] and read-only
/// afterwards. All owned data, no interior mutability, safe for any
/// number of concurrent readers.
pub struct ThemeConfig {
    repository_url: Url,
    docs_source_base: Url,
    title_suffix: String,
    logo_markup: Fragment,
    head_markup: Vec<Element>,
    search_enabled: bool,
    show_prev_link: bool,
    show_next_link: bool,
    show_footer: bool,
    footer_edit_link_label: String,
    footer_markup: Fragment,
}

impl ThemeConfig {
    /// Validate the given settings and build the configuration.
    ///
    /// Year placeholders in the logo and footer markup are stamped
    /// from `clock` exactly once. The stamped text never changes for
    /// the lifetime of the returned configuration.
    ///
    /// No I/O. Construction is pure and synchronous.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigValidationError`] naming the offending field
    /// if a required URL is missing or malformed or if a markup field
    /// fails validation.
    pub fn new(settings: ThemeSettings, clock: &impl Clock) -> Result<Self, ConfigValidationError> {
        let ThemeSettings {
            repository_url,
            docs_source_base,
            title_suffix,
            logo_markup,
            head_markup,
            search_enabled,
            show_prev_link,
            show_next_link,
            show_footer,
            footer_edit_link_label,
            footer_markup,
        } = settings;
        let repository_url = parse_required_url("repository_url", &repository_url)?;
        let docs_source_base = parse_required_url("docs_source_base", &docs_source_base)?;
        for element in &head_markup {
            element
                .validate()
                .map_err(|source| ConfigValidationError::Markup {
                    field: "head_markup",
                    source,
                })?;
        }
        let logo_markup = validated_fragment("logo_markup", logo_markup)?;
        let footer_markup = validated_fragment("footer_markup", footer_markup)?;
        let year = clock.year();
        let logo_markup = logo_markup.stamp_year(year);
        let footer_markup = footer_markup.stamp_year(year);
        Ok(Self {
            repository_url,
            docs_source_base,
            title_suffix,
            logo_markup,
            head_markup,
            search_enabled,
            show_prev_link,
            show_next_link,
            show_footer,
            footer_edit_link_label,
            footer_markup,
        })
    }

    /// Return the repository URL.
    #[must_use]
    pub const fn repository_url(&self) -> &Url {
        &self.repository_url
    }

    /// Return the docs source base URL.
    #[must_use]
    pub const fn docs_source_base(&self) -> &Url {
        &self.docs_source_base
    }

    /// Return the page title suffix.
    #[must_use]
    pub fn title_suffix(&self) -> &str {
        &self.title_suffix
    }

    /// Return the logo markup.
    #[must_use]
    pub const fn logo_markup(&self) -> &Fragment {
        &self.logo_markup
    }

    /// Return the extra head elements.
    #[must_use]
    pub fn head_markup(&self) -> &[Element] {
        &self.head_markup
    }

    /// Check if the search UI is enabled.
    #[must_use]
    pub const fn search_enabled(&self) -> bool {
        self.search_enabled
    }

    /// Check if the "previous page" link is shown.
    #[must_use]
    pub const fn show_prev_link(&self) -> bool {
        self.show_prev_link
    }

    /// Check if the "next page" link is shown.
    #[must_use]
    pub const fn show_next_link(&self) -> bool {
        self.show_next_link
    }

    /// Check if the footer is shown.
    #[must_use]
    pub const fn show_footer(&self) -> bool {
        self.show_footer
    }

    /// Return the footer edit link label.
    #[must_use]
    pub fn footer_edit_link_label(&self) -> &str {
        &self.footer_edit_link_label
    }

    /// Return the footer markup with stamped year placeholders.
    #[must_use]
    pub const fn footer_markup(&self) -> &Fragment {
        &self.footer_markup
    }

    /// Return the footer content if the footer is shown.
    ///
    /// Returns `None` when [`show_footer()`](Self::show_footer) is
    /// `false`. The footer fields stay readable through their plain
    /// accessors either way, but consumers that render must act on
    /// this view only.
    #[must_use]
    pub fn footer(&self) -> Option<Footer<'_>> {
        self.show_footer.then(|| Footer {
            edit_link_label: &self.footer_edit_link_label,
            markup: &self.footer_markup,
        })
    }

    /// Check if the docs source base points into the repository.
    ///
    /// Advisory. A mismatch is accepted but usually indicates a
    /// misconfigured edit link.
    #[must_use]
    pub fn docs_source_within_repository(&self) -> bool {
        self.docs_source_base.scheme() == self.repository_url.scheme()
            && self.docs_source_base.host_str() == self.repository_url.host_str()
            && self
                .docs_source_base
                .path()
                .starts_with(self.repository_url.path())
    }
}

/// Footer content, present only while the footer is shown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Footer<'a> {
    /// Label of the edit link.
    pub edit_link_label: &'a str,

    /// The footer markup.
    pub markup: &'a Fragment,
}

/// The process-wide configuration has already been installed
#[derive(Debug, Display, Error)]
#[display("theme configuration already installed")]
pub struct InstallError;

static INSTALLED: OnceLock<ThemeConfig> = OnceLock::new();

/// Install the process-wide configuration.
///
/// Must complete before any read through [`installed()`]. The
/// configuration is installed exactly once per process lifetime and
/// never replaced.
///
/// # Errors
///
/// Returns an [`InstallError`] if a configuration has already been
/// installed.
pub fn install(config: ThemeConfig) -> Result<(), InstallError> {
    INSTALLED.set(config).map_err(|_config| InstallError)
}

/// Return the process-wide configuration.
///
/// Returns `None` until [`install()`] has completed. Reads are safe
/// from any number of threads without further synchronization.
#[must_use]
pub fn installed() -> Option<&'static ThemeConfig> {
    INSTALLED.get()
}

#[cfg(test)]
mod tests;
