use scraper::{Html, Selector};

/// Text content of the first element carrying the CSS class `class`.
///
/// The page goes through a full HTML parser, so comments, unquoted attributes
/// and `>` inside attribute values are handled the way a browser would. Nested
/// text is joined and whitespace collapsed. An element without text counts as
/// not found.
///
/// ```
/// use relay_web::extract_first_by_class;
///
/// let html = r#"<ul><li class="item price">  <b>42,50</b>&nbsp;грн </li></ul>"#;
/// assert_eq!(extract_first_by_class(html, "price").as_deref(), Some("42,50 грн"));
/// ```
pub fn extract_first_by_class(html: &str, class: &str) -> Option<String> {
    let selector = Selector::parse(&format!(".{class}")).ok()?;
    let doc = Html::parse_document(html);
    let el = doc.select(&selector).next()?;

    let text = el.text().collect::<String>();
    let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
    (!text.is_empty()).then_some(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_matching_element_wins() {
        let html = r#"
            <div class="pricelist">ignored</div>
            <span class='price'>12,30</span>
            <span class="price">99,99</span>"#;
        assert_eq!(extract_first_by_class(html, "price").as_deref(), Some("12,30"));
    }

    #[test]
    fn nested_markup_is_flattened() {
        let html = r#"<div class="card price"><div>Картопля</div> <div>18,40 грн</div></div><div>footer</div>"#;
        assert_eq!(
            extract_first_by_class(html, "price").as_deref(),
            Some("Картопля 18,40 грн")
        );
    }

    #[test]
    fn entities_are_decoded() {
        let html = r#"<td class="price">10&#44;5&nbsp;&amp;&#x20B4;</td>"#;
        let html = format!("<table><tr>{html}</tr></table>");
        assert_eq!(extract_first_by_class(&html, "price").as_deref(), Some("10,5 &₴"));
    }

    #[test]
    fn missing_or_empty_elements_are_not_found() {
        assert_eq!(extract_first_by_class("<p>no prices here</p>", "price"), None);
        assert_eq!(extract_first_by_class(r#"<span class="price">  </span>"#, "price"), None);
        assert_eq!(extract_first_by_class(r#"<img class="price"/>"#, "price"), None);
    }

    #[test]
    fn unclosed_cell_ends_at_next_cell() {
        let html = r#"<table><tr><td class="price">7,15<td>next cell</table>"#;
        assert_eq!(extract_first_by_class(html, "price").as_deref(), Some("7,15"));
    }

    #[test]
    fn attribute_case_is_ignored_but_class_is_not() {
        let html = r#"<!doctype html><SPAN CLASS="Price">1</SPAN><span CLASS="price">2</span>"#;
        assert_eq!(extract_first_by_class(html, "price").as_deref(), Some("2"));
    }

    #[test]
    fn other_attributes_named_like_class_are_ignored() {
        let html = r#"<div data-class="price">menu</div><span class="price">18,40</span>"#;
        assert_eq!(extract_first_by_class(html, "price").as_deref(), Some("18,40"));
    }

    #[test]
    fn unquoted_class_attribute_matches() {
        let html = r#"<span class=price>18,40</span>"#;
        assert_eq!(extract_first_by_class(html, "price").as_deref(), Some("18,40"));
    }

    #[test]
    fn angle_bracket_inside_attribute_value() {
        let html = r#"<span title="a > b" class="price">18,40</span>"#;
        assert_eq!(extract_first_by_class(html, "price").as_deref(), Some("18,40"));
    }

    #[test]
    fn commented_out_markup_is_skipped() {
        let html = r#"<!-- <span class="price">old</span> --><span class="price">18,40</span>"#;
        assert_eq!(extract_first_by_class(html, "price").as_deref(), Some("18,40"));
    }

    #[test]
    fn unusable_class_name_is_not_found() {
        assert_eq!(extract_first_by_class(r#"<span class="price">1</span>"#, "1 > 2"), None);
    }
}
