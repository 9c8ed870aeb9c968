// SPDX-FileCopyrightText: The doctheme authors
// SPDX-License-Identifier: MPL-2.0

use time::macros::date;

use super::{
    clock::FixedClock,
    markup::{Attribute, Element, Fragment, MarkupError, Node},
    *,
};

fn fixed_clock() -> FixedClock {
    FixedClock(date!(2024 - 06 - 25))
}

fn attribute(name: &str, value: &str) -> Attribute {
    Attribute {
        name: name.into(),
        value: value.into(),
    }
}

fn meta(name: &str, content: &str) -> Element {
    Element {
        tag_name: "meta".into(),
        attributes: vec![attribute("name", name), attribute("content", content)],
        ..Default::default()
    }
}

fn icon_link(sizes: &str, href: &str) -> Element {
    Element {
        tag_name: "link".into(),
        attributes: vec![
            attribute("rel", "icon"),
            attribute("type", "image/png"),
            attribute("sizes", sizes),
            attribute("href", href),
        ],
        ..Default::default()
    }
}

fn settings() -> ThemeSettings {
    ThemeSettings {
        repository_url: "https://github.com/Org/repo".to_owned(),
        docs_source_base: "https://github.com/Org/repo/blob/main".to_owned(),
        title_suffix: " – Org".to_owned(),
        logo_markup: Fragment::from(vec![Node::Element(Element {
            tag_name: "span".into(),
            attributes: vec![attribute("class", "logo")],
            children: Fragment::from(vec![Node::text("Org")]),
        })]),
        head_markup: vec![
            meta("viewport", "width=device-width, initial-scale=1.0"),
            icon_link("32x32", "/favicon/favicon-32x32.png"),
            icon_link("16x16", "/favicon/favicon-16x16.png"),
        ],
        footer_edit_link_label: "Edit this page on GitHub".to_owned(),
        footer_markup: Fragment::from(vec![
            Node::text("MIT "),
            Node::CurrentYear,
            Node::text(" © Org."),
        ]),
        ..Default::default()
    }
}

#[test]
fn builds_from_valid_settings() {
    let config = ThemeConfig::new(settings(), &fixed_clock()).unwrap();
    // The URL survives verbatim, no normalization beyond validity.
    assert_eq!(
        "https://github.com/Org/repo",
        config.repository_url().as_str()
    );
    assert_eq!(" – Org", config.title_suffix());
    assert_eq!(3, config.head_markup().len());
    assert!(config.search_enabled());
    assert!(config.show_prev_link());
    assert!(config.show_next_link());
    assert!(config.show_footer());
}

#[test]
fn building_twice_yields_identical_configs() {
    let clock = fixed_clock();
    let first = ThemeConfig::new(settings(), &clock).unwrap();
    let second = ThemeConfig::new(settings(), &clock).unwrap();
    assert_eq!(first, second);
}

#[test]
fn missing_repository_url() {
    let settings = ThemeSettings {
        repository_url: String::new(),
        ..settings()
    };
    let err = ThemeConfig::new(settings, &fixed_clock()).unwrap_err();
    assert!(matches!(
        err,
        ConfigValidationError::MissingField {
            field: "repository_url"
        }
    ));
}

#[test]
fn malformed_docs_source_base() {
    // Relative URLs are rejected, the base must be absolute.
    let settings = ThemeSettings {
        docs_source_base: "/repo/blob/main".to_owned(),
        ..settings()
    };
    let err = ThemeConfig::new(settings, &fixed_clock()).unwrap_err();
    assert!(matches!(
        err,
        ConfigValidationError::MalformedUrl {
            field: "docs_source_base",
            ..
        }
    ));
}

#[test]
fn validation_errors_name_the_offending_field() {
    let settings = ThemeSettings {
        repository_url: "not a url".to_owned(),
        ..settings()
    };
    let err = ThemeConfig::new(settings, &fixed_clock()).unwrap_err();
    assert!(err.to_string().contains("repository_url"));
}

#[test]
fn repeated_icon_links_with_distinct_sizes_are_ok() {
    // Duplicate tag names and repeated `rel="icon"` across elements
    // are fine. Only duplicate attribute names within one element
    // are rejected.
    assert!(ThemeConfig::new(settings(), &fixed_clock()).is_ok());
}

#[test]
fn duplicate_attribute_within_head_element() {
    let mut settings = settings();
    settings.head_markup.push(Element {
        tag_name: "link".into(),
        attributes: vec![
            attribute("rel", "manifest"),
            attribute("href", "/favicon/site.webmanifest"),
            attribute("href", "/site.webmanifest"),
        ],
        ..Default::default()
    });
    let err = ThemeConfig::new(settings, &fixed_clock()).unwrap_err();
    assert!(matches!(
        err,
        ConfigValidationError::Markup {
            field: "head_markup",
            source: MarkupError::DuplicateAttribute { .. },
        }
    ));
}

#[test]
fn executable_logo_markup_is_rejected() {
    let mut settings = settings();
    settings.logo_markup.nodes.push(Node::Element(Element {
        tag_name: "script".into(),
        ..Default::default()
    }));
    let err = ThemeConfig::new(settings, &fixed_clock()).unwrap_err();
    assert!(matches!(
        err,
        ConfigValidationError::Markup {
            field: "logo_markup",
            source: MarkupError::ExecutableElement { .. },
        }
    ));
}

#[test]
fn hidden_footer_is_inert() {
    let settings = ThemeSettings {
        show_footer: false,
        ..settings()
    };
    let config = ThemeConfig::new(settings, &fixed_clock()).unwrap();
    assert_eq!(None, config.footer());
    // The fields stay readable, they just must not be rendered.
    assert!(!config.show_footer());
    assert_eq!("Edit this page on GitHub", config.footer_edit_link_label());
    assert!(!config.footer_markup().is_empty());
}

#[test]
fn footer_year_is_stamped_at_construction() {
    let config = ThemeConfig::new(settings(), &fixed_clock()).unwrap();
    let expected = Fragment::from(vec![
        Node::text("MIT "),
        Node::text("2024"),
        Node::text(" © Org."),
    ]);
    assert_eq!(&expected, config.footer_markup());
    let footer = config.footer().unwrap();
    assert_eq!(&expected, footer.markup);
    assert_eq!("Edit this page on GitHub", footer.edit_link_label);
}

#[test]
fn stamped_year_follows_the_injected_clock() {
    let clock = FixedClock(date!(1999 - 12 - 31));
    let config = ThemeConfig::new(settings(), &clock).unwrap();
    assert!(config.footer_markup().nodes.contains(&Node::text("1999")));
}

#[test]
fn title_suffix_may_be_empty() {
    let settings = ThemeSettings {
        title_suffix: String::new(),
        ..settings()
    };
    let config = ThemeConfig::new(settings, &fixed_clock()).unwrap();
    assert!(config.title_suffix().is_empty());
}

#[test]
fn default_toggles_are_enabled() {
    let settings = ThemeSettings::default();
    assert!(settings.search_enabled);
    assert!(settings.show_prev_link);
    assert!(settings.show_next_link);
    assert!(settings.show_footer);
}

#[test]
fn docs_source_within_repository() {
    let config = ThemeConfig::new(settings(), &fixed_clock()).unwrap();
    assert!(config.docs_source_within_repository());

    let foreign = ThemeSettings {
        docs_source_base: "https://gitlab.com/Org/repo/blob/main".to_owned(),
        ..settings()
    };
    let config = ThemeConfig::new(foreign, &fixed_clock()).unwrap();
    assert!(!config.docs_source_within_repository());
}

#[test]
fn install_once() {
    let config = ThemeConfig::new(settings(), &fixed_clock()).unwrap();
    install(config.clone()).unwrap();
    assert_eq!(Some(&config), installed());
    // A second installation fails and leaves the first one in place.
    assert!(install(config.clone()).is_err());
    assert_eq!(Some(&config), installed());
}
