use std::sync::LazyLock;

use scraper::{ElementRef, Selector};

fn sel(css: &str) -> Selector {
    Selector::parse(css).unwrap()
}

pub static MATCH_ROW: LazyLock<Selector> = LazyLock::new(|| sel("tr.sub-row"));
pub static LEAGUE_CELL: LazyLock<Selector> = LazyLock::new(|| sel("td.category-label-td"));
pub static LEAGUE_HEADING: LazyLock<Selector> = LazyLock::new(|| sel("h2.category-label"));
pub static MEMBER_NUMBER: LazyLock<Selector> = LazyLock::new(|| sel("b.member-number"));
pub static SCORE_CLOCK: LazyLock<Selector> =
    LazyLock::new(|| sel("div.event-description div.cl-left.red"));
pub static ODDS_HOME: LazyLock<Selector> =
    LazyLock::new(|| sel(r#"td[data-market-type="RESULT"] span[data-selection-key$=".1"]"#));
pub static ODDS_DRAW: LazyLock<Selector> =
    LazyLock::new(|| sel(r#"td[data-market-type="RESULT"] span[data-selection-key$=".draw"]"#));
pub static ODDS_AWAY: LazyLock<Selector> =
    LazyLock::new(|| sel(r#"td[data-market-type="RESULT"] span[data-selection-key$=".3"]"#));
pub static TOTAL_CELL: LazyLock<Selector> = LazyLock::new(|| sel(r#"td[data-market-type="TOTAL"]"#));
pub static SPAN: LazyLock<Selector> = LazyLock::new(|| sel("span"));

/// All text below `el`, trimmed.
pub fn text_of(el: ElementRef) -> String {
    el.text().collect::<String>().trim().to_string()
}

pub fn select_text(el: ElementRef, selector: &Selector) -> Option<String> {
    el.select(selector).next().map(text_of)
}

/// Nearest element before `el` in document order matching `selector`.
/// Ancestors count as preceding, as do the descendants of earlier siblings.
pub fn find_previous<'a>(el: ElementRef<'a>, selector: &Selector) -> Option<ElementRef<'a>> {
    let mut node = *el;
    loop {
        node = match node.prev_sibling() {
            Some(mut prev) => {
                while let Some(last) = prev.last_child() {
                    prev = last;
                }
                prev
            }
            None => node.parent()?,
        };
        if let Some(candidate) = ElementRef::wrap(node) {
            if selector.matches(&candidate) {
                return Some(candidate);
            }
        }
    }
}

/// Next sibling element with the given tag name, skipping text and other tags.
pub fn next_sibling_named<'a>(el: ElementRef<'a>, name: &str) -> Option<ElementRef<'a>> {
    el.next_siblings()
        .filter_map(ElementRef::wrap)
        .find(|e| e.value().name() == name)
}

/// Text nodes that are direct children of `el`, in order.
pub fn own_text_nodes<'a>(el: ElementRef<'a>) -> impl Iterator<Item = &'a str> + 'a {
    el.children().filter_map(|c| c.value().as_text().map(|t| &**t))
}
