use std::sync::LazyLock;

use scraper::{Html, Selector};

use super::{CreditItem, ProcessedCredit};
use crate::error::GeocreditError;

/// Converts a credit reported by the engine into a [`ProcessedCredit`].
///
/// Returns `None` if there is nothing to display: the item is absent, empty or has no markup.
///
/// For HTML credits the result is built from the first `<img>` and the first `<a>` of the
/// fragment:
/// * `logo` is the `src` of the image,
/// * `description` is the `title` of the image, or the text of the whole fragment if the image
///   has no title,
/// * `credit_url` is the `href` of the link.
///
/// Values that cannot be found are set to empty strings.
pub fn normalize_credit(credit: Option<&CreditItem>) -> Option<ProcessedCredit> {
    match credit? {
        CreditItem::Empty => None,
        CreditItem::Html(markup) if markup.is_empty() => None,
        CreditItem::Html(markup) => match parse_markup(markup) {
            Ok(processed) => Some(processed),
            Err(err) => {
                log::error!("Error processing credit HTML {markup:?}: {err}");
                None
            }
        },
        CreditItem::Attribution(attribution) => Some(attribution.into()),
    }
}

struct CreditSelectors {
    img: Selector,
    link: Selector,
}

static SELECTORS: LazyLock<Result<CreditSelectors, String>> = LazyLock::new(|| {
    Ok(CreditSelectors {
        img: Selector::parse("img").map_err(|err| err.to_string())?,
        link: Selector::parse("a").map_err(|err| err.to_string())?,
    })
});

fn parse_markup(markup: &str) -> Result<ProcessedCredit, GeocreditError> {
    let selectors = SELECTORS
        .as_ref()
        .map_err(|err| GeocreditError::Selector(err.clone()))?;

    let fragment = Html::parse_fragment(markup);
    let img = fragment.select(&selectors.img).next();

    let logo = img
        .and_then(|el| el.value().attr("src"))
        .unwrap_or_default()
        .to_owned();

    let description = match img.and_then(|el| el.value().attr("title")) {
        Some(title) if !title.is_empty() => title.to_owned(),
        _ => fragment.root_element().text().collect(),
    };

    let credit_url = fragment
        .select(&selectors.link)
        .next()
        .and_then(|el| el.value().attr("href"))
        .unwrap_or_default()
        .to_owned();

    Ok(ProcessedCredit {
        logo: Some(logo),
        description: Some(description),
        credit_url: Some(credit_url),
    })
}

#[cfg(test)]
mod tests {
    use insta::assert_compact_debug_snapshot;

    use super::*;
    use crate::attribution::Attribution;

    fn processed(logo: &str, description: &str, credit_url: &str) -> ProcessedCredit {
        ProcessedCredit {
            logo: Some(logo.into()),
            description: Some(description.into()),
            credit_url: Some(credit_url.into()),
        }
    }

    #[test]
    fn image_title_and_link() {
        let item = CreditItem::html(r#"<a href="Z"><img src="X" title="Y"></a>"#);
        assert_eq!(normalize_credit(Some(&item)), Some(processed("X", "Y", "Z")));
    }

    #[test]
    fn text_only_body() {
        let item = CreditItem::html("Hello");
        assert_eq!(normalize_credit(Some(&item)), Some(processed("", "Hello", "")));
    }

    #[test]
    fn image_without_title_uses_text() {
        let item = CreditItem::html(
            r#"<a href="https://www.openstreetmap.org/copyright"><img src="osm.png"> OpenStreetMap</a> contributors"#,
        );
        assert_compact_debug_snapshot!(normalize_credit(Some(&item)), @r#"Some(ProcessedCredit { logo: Some("osm.png"), description: Some(" OpenStreetMap contributors"), credit_url: Some("https://www.openstreetmap.org/copyright") })"#);
    }

    #[test]
    fn empty_title_falls_back_to_text() {
        let item = CreditItem::html(r#"<img src="X" title="">Data"#);
        assert_eq!(normalize_credit(Some(&item)), Some(processed("X", "Data", "")));
    }

    #[test]
    fn only_first_image_and_link_are_used() {
        let item = CreditItem::html(
            r#"<a href="first"><img src="1" title="one"></a><a href="second"><img src="2" title="two"></a>"#,
        );
        assert_eq!(
            normalize_credit(Some(&item)),
            Some(processed("1", "one", "first"))
        );
    }

    #[test]
    fn credit_selectors_are_valid() {
        assert!(SELECTORS.is_ok());
    }

    #[test]
    fn absent_credit() {
        assert_eq!(normalize_credit(None), None);
    }

    #[test]
    fn empty_credit() {
        assert_eq!(normalize_credit(Some(&CreditItem::Empty)), None);
        assert_eq!(normalize_credit(Some(&CreditItem::html(""))), None);
    }

    #[test]
    fn malformed_markup_does_not_fail() {
        let item = CreditItem::html(r#"<a href="u"><img src="s" title="t"<<</div>"#);
        let result = normalize_credit(Some(&item));
        assert!(result.is_some());
        assert_eq!(result.unwrap().credit_url.as_deref(), Some("u"));
    }

    #[test]
    fn normalization_is_idempotent() {
        let item = CreditItem::html(r#"<a href="Z"><img src="X" title="Y"></a> text"#);
        assert_eq!(normalize_credit(Some(&item)), normalize_credit(Some(&item)));
    }

    #[test]
    fn typed_attribution_is_not_parsed() {
        let item = CreditItem::from(
            Attribution::new("<b>Terrain</b>", Some("https://terrain".into())).with_logo("t.png"),
        );
        assert_compact_debug_snapshot!(normalize_credit(Some(&item)), @r#"Some(ProcessedCredit { logo: Some("t.png"), description: Some("<b>Terrain</b>"), credit_url: Some("https://terrain") })"#);
    }
}
