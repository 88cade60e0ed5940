//! Static HTML renderer: the whole page as a standalone document.
//!
//! Used when there is no window to measure. The avatar is rendered with the
//! transform of a zero viewport at the top of the page; a host that mounts
//! later takes over from there.

use std::fmt::Write as _;

use utopia_protocol::{ElementId, ThemeToken, ViewportState};

use crate::config::PageConfig;
use crate::content::CivilDate;
use crate::mapper::compute_transform_with;
use crate::render::{transform_css, transition_css};

/// Render the page as an HTML document.
///
/// `today` drives date-derived rows such as the day counter.
pub fn render_page_html(config: &PageConfig, today: &CivilDate) -> String {
    let content = &config.content;
    let viewport = ViewportState::zero();
    let avatar = compute_transform_with(&config.avatar, 0.0, viewport.width, viewport.height);

    let mut html = String::with_capacity(8 * 1024);
    html.push_str("<!doctype html>\n<html lang=\"zh-CN\">\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    let _ = writeln!(html, "<title>{}</title>", escape_html(&content.title));
    let _ = writeln!(html, "<style>{}</style>", stylesheet());
    html.push_str("</head>\n<body>\n<main>\n");

    let _ = writeln!(
        html,
        r#"<img id="{id}" class="float-avatar" src="{src}" alt="Avatar" style="transform:{transform};transition:{transition}">"#,
        id = ElementId::FloatAvatar.dom_id(),
        src = escape_html(&content.avatar_src),
        transform = transform_css(&avatar),
        transition = transition_css(&config.avatar),
    );

    // Hero
    let _ = writeln!(
        html,
        r#"<div class="hero"><button id="{id}" class="scroll-hint" aria-label="Scroll down">&#x2BC6;</button></div>"#,
        id = ElementId::ScrollHint.dom_id(),
    );

    // Sticky header; the title fades in as the hero leaves.
    let _ = writeln!(
        html,
        r#"<header><div id="{id}" class="title" style="opacity:0">{title}</div></header>"#,
        id = ElementId::HeaderTitle.dom_id(),
        title = escape_html(&content.title),
    );

    html.push_str("<div class=\"body\">\n<div class=\"columns\">\n<div class=\"column\">\n");

    let _ = writeln!(
        html,
        "<section><h2>{}</h2>",
        escape_html(&content.preface_heading)
    );
    for line in &content.preface {
        let _ = writeln!(html, "<p>{}</p>", escape_html(line));
    }
    html.push_str("</section>\n");

    let _ = writeln!(
        html,
        "<section><h2>{}</h2><ul class=\"grid\">",
        escape_html(&content.basic_info_heading)
    );
    for (label, value) in content.basic_info_rows(today) {
        let _ = writeln!(
            html,
            r#"<li><span class="key">{}</span><span>{}</span></li>"#,
            escape_html(&label),
            escape_html(&value),
        );
    }
    html.push_str("</ul></section>\n</div>\n<div class=\"column\">\n");

    let _ = writeln!(
        html,
        "<section><h2>{}</h2><ul class=\"grid\">",
        escape_html(&content.links_heading)
    );
    for link in &content.links {
        let _ = writeln!(
            html,
            r#"<li><span class="icon">{}</span><a href="{}">{}</a></li>"#,
            escape_html(link.service.name()),
            escape_html(&link.url),
            escape_html(&link.handle),
        );
    }
    html.push_str("</ul></section>\n</div>\n</div>\n");

    // Contact; the card stays hidden until the number is clicked.
    let _ = writeln!(
        html,
        r#"<div class="contact"><p>{prompt}</p><p><span class="phone">{phone}</span></p>"#,
        prompt = escape_html(&content.contact_prompt),
        phone = escape_html(&content.contact_phone),
    );
    let _ = writeln!(
        html,
        r#"<div id="{card}" class="card" hidden><div id="{placeholder}" class="skeleton"></div><img id="{qr}" alt="QR Code" hidden style="opacity:0"><button id="{retry}" hidden>重试</button></div></div>"#,
        card = ElementId::ContactCard.dom_id(),
        placeholder = ElementId::QrPlaceholder.dom_id(),
        qr = ElementId::QrCode.dom_id(),
        retry = ElementId::QrRetry.dom_id(),
    );

    let credits = &content.credits;
    let _ = writeln!(
        html,
        r#"<footer><p>Made with <span class="heart">&#x2764;</span> by <a href="{url}" target="_blank" rel="noreferrer noopener">{by}</a></p><p>Maintained by {maintainer}</p></footer>"#,
        url = escape_html(&credits.made_by_url),
        by = escape_html(&credits.made_by),
        maintainer = escape_html(&credits.maintained_by),
    );

    html.push_str("</div>\n</main>\n</body>\n</html>\n");
    html
}

fn stylesheet() -> String {
    let mut css = String::new();
    for (scheme, dark) in [("light", false), ("dark", true)] {
        let vars = format!(
            "--bg:{};--fg:{};--accent:{};--link:{};--hero:{};--skeleton:{};--heart:{};",
            resolve_color(if dark { ThemeToken::Primary950 } else { ThemeToken::Primary50 }, dark),
            resolve_color(if dark { ThemeToken::Primary50 } else { ThemeToken::Primary900 }, dark),
            resolve_color(if dark { ThemeToken::Primary300 } else { ThemeToken::Primary500 }, dark),
            resolve_color(if dark { ThemeToken::Primary500 } else { ThemeToken::Primary700 }, dark),
            resolve_color(ThemeToken::Primary500, dark),
            resolve_color(if dark { ThemeToken::Primary800 } else { ThemeToken::Primary200 }, dark),
            resolve_color(ThemeToken::Heart, dark),
        );
        if dark {
            let _ = write!(css, "@media (prefers-color-scheme:{scheme}){{:root{{{vars}}}}}");
        } else {
            let _ = write!(css, ":root{{{vars}}}");
        }
    }
    css.push_str(concat!(
        "body{margin:0;background:var(--bg);color:var(--fg);font-family:system-ui,sans-serif}",
        ".float-avatar{position:fixed;top:50%;left:50%;z-index:100;width:16rem;height:16rem;",
        "border-radius:50%;box-shadow:0 0 0 8px var(--accent);transform-origin:center}",
        ".hero{height:calc(100vh - 4rem);background:var(--hero);position:relative}",
        ".scroll-hint{position:absolute;bottom:4rem;left:50%;transform:translateX(-50%);",
        "font-size:3.75rem;color:#fff;background:none;border:0;cursor:pointer}",
        "header{position:sticky;top:0;z-index:50;height:4rem;display:flex;align-items:center;",
        "justify-content:center;font-size:1.25rem;font-weight:bold;backdrop-filter:blur(4px)}",
        ".body{display:flex;flex-direction:column;align-items:center;padding:5vh 1rem 1rem}",
        ".columns{display:flex;flex-wrap:wrap;gap:2rem;max-width:56rem}",
        ".column{flex:1 1 24rem}.grid{display:grid;grid-template-columns:auto 1fr;gap:.5rem 1rem;",
        "padding:0;list-style:none}.grid li{display:contents}.key,.icon{font-weight:bold;color:var(--accent)}",
        "a{color:var(--link)}.contact{max-width:28rem;margin:100px 0 100vh}.phone{color:var(--accent);cursor:pointer}",
        ".card{position:relative;width:auto}.card img{width:100%;height:auto;border-radius:.5rem;",
        "transition:opacity .3s}.skeleton{aspect-ratio:1;border-radius:.5rem;background:var(--skeleton)}",
        ".heart{color:var(--heart)}",
    ));
    css
}

fn resolve_color(token: ThemeToken, dark: bool) -> &'static str {
    match token {
        ThemeToken::Primary50 => "#eef6ff",
        ThemeToken::Primary200 => "#bfdcfe",
        ThemeToken::Primary300 => "#93c5fd",
        ThemeToken::Primary500 => "#3b82f6",
        ThemeToken::Primary700 => "#1d4ed8",
        ThemeToken::Primary800 => "#1e40af",
        ThemeToken::Primary900 => "#1e3a8a",
        ThemeToken::Primary950 => "#172554",
        ThemeToken::Heart if dark => "#f87171",
        ThemeToken::Heart => "#ef4444",
    }
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{ExternalLink, LinkService};

    fn today() -> CivilDate {
        CivilDate::new(2025, 4, 10).unwrap()
    }

    #[test]
    fn renders_full_document() {
        let html = render_page_html(&PageConfig::default(), &today());
        assert!(html.starts_with("<!doctype html>"));
        assert!(html.trim_end().ends_with("</html>"));
        assert!(html.contains("Zubmarine&#39;s Utopia"));
        assert!(html.contains("7003 天"));
        assert!(html.contains("https://t.me/Zubmar1ne"));
    }

    #[test]
    fn avatar_starts_untransformed() {
        let html = render_page_html(&PageConfig::default(), &today());
        assert!(html.contains(
            "transform:translate(-50%, -50%) translateX(0px) translateY(0px) scale(1);transition:transform 0.1s ease-out"
        ));
    }

    #[test]
    fn every_addressable_element_is_present() {
        let html = render_page_html(&PageConfig::default(), &today());
        for id in [
            ElementId::FloatAvatar,
            ElementId::ScrollHint,
            ElementId::HeaderTitle,
            ElementId::ContactCard,
            ElementId::QrCode,
            ElementId::QrPlaceholder,
            ElementId::QrRetry,
        ] {
            assert!(
                html.contains(&format!("id=\"{}\"", id.dom_id())),
                "missing {id:?}"
            );
        }
    }

    #[test]
    fn escapes_content() {
        let mut config = PageConfig::default();
        config.content.links.push(ExternalLink {
            service: LinkService::Other,
            handle: "<script>".to_string(),
            url: "https://example.com/?a=1&b=2".to_string(),
        });
        let html = render_page_html(&config, &today());
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("a=1&amp;b=2"));
        assert!(!html.contains("<script>"));
    }
}
