use std::fmt::Write;

use axum::response::Html;

use super::{escape, layout};
use crate::models::{Banner, Link, Profile};

const SHARE_TARGETS: [(&str, &str); 5] = [
    ("twitter", "Twitter"),
    ("facebook", "Facebook"),
    ("whatsapp", "WhatsApp"),
    ("telegram", "Telegram"),
    ("copy", "Copy link"),
];

pub struct IndexPage {
    pub profile: Profile,
    pub links: Vec<Link>,
    pub banner: Banner,
    pub last_updated: String,
}

pub fn index_page(page: &IndexPage) -> Html<String> {
    let mut body = String::new();

    if page.banner.enabled && !page.banner.text.is_empty() {
        let _ = write!(body, r#"<div class="banner banner-{}">"#, escape(&page.banner.kind));
        if page.banner.link.is_empty() {
            let _ = write!(body, "{}", escape(&page.banner.text));
        } else {
            let _ = write!(
                body,
                r#"<a href="{}" rel="noopener">{}</a>"#,
                escape(&page.banner.link),
                escape(&page.banner.text)
            );
        }
        body.push_str("</div>\n");
    }

    let profile = &page.profile;
    body.push_str("<header class=\"profile\">\n");
    if !profile.avatar.is_empty() {
        let _ = writeln!(
            body,
            r#"<img class="avatar" src="{}" alt="{}">"#,
            escape(&profile.avatar),
            escape(&profile.name)
        );
    }
    let _ = writeln!(body, "<h1>{}</h1>", escape(&profile.name));
    if !profile.title.is_empty() {
        let _ = writeln!(body, r#"<p class="title">{}</p>"#, escape(&profile.title));
    }
    if !profile.subtitle.is_empty() {
        let _ = writeln!(body, r#"<p class="subtitle">{}</p>"#, escape(&profile.subtitle));
    }
    if !profile.description.is_empty() {
        let _ = writeln!(body, r#"<p class="description">{}</p>"#, escape(&profile.description));
    }
    body.push_str("</header>\n<main>\n<ul class=\"links\">\n");

    for link in &page.links {
        let class = if link.featured { "link featured" } else { "link" };
        let _ = write!(
            body,
            r#"<li class="{class}" data-category="{}"><a href="{}" target="_blank" rel="noopener">"#,
            escape(&link.category),
            escape(&link.url)
        );
        if !link.icon.is_empty() {
            let _ = write!(body, r#"<span class="icon">{}</span> "#, escape(&link.icon));
        }
        let _ = writeln!(body, "{}</a></li>", escape(&link.title));
    }

    body.push_str("</ul>\n");
    share_buttons(&mut body, profile);
    let _ = write!(
        body,
        "</main>\n<footer>Last updated {}</footer>\n<script src=\"/static/share.js\" defer></script>",
        escape(&page.last_updated)
    );

    layout(&page.profile.name, &body)
}

/// Share bar driven by `/static/share.js`.
fn share_buttons(body: &mut String, profile: &Profile) {
    let text = if profile.title.is_empty() {
        profile.name.clone()
    } else {
        format!("{} - {}", profile.name, profile.title)
    };

    let _ = writeln!(
        body,
        r#"<nav class="share" data-share-text="{}">"#,
        escape(&text)
    );
    for (target, label) in SHARE_TARGETS {
        let _ = writeln!(body, r#"<button type="button" data-share="{target}">{label}</button>"#);
    }
    body.push_str("</nav>\n<div id=\"copyToast\" class=\"toast\" role=\"status\">Link copied</div>\n");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page() -> IndexPage {
        IndexPage {
            profile: Profile {
                name: "Test Site".into(),
                ..Default::default()
            },
            links: vec![Link {
                id: "1".into(),
                title: "Donate <here>".into(),
                url: "https://example.com/?a=1&b=2".into(),
                category: "fundraiser".into(),
                icon: "$".into(),
                featured: true,
            }],
            banner: Banner::default(),
            last_updated: "Jan 2, 2026".into(),
        }
    }

    #[test]
    fn renders_links_escaped() {
        let Html(body) = index_page(&page());
        assert!(body.contains("<title>Test Site</title>"));
        assert!(body.contains("Donate &lt;here&gt;"));
        assert!(body.contains("https://example.com/?a=1&amp;b=2"));
        assert!(body.contains(r#"class="link featured""#));
        assert!(body.contains("Last updated Jan 2, 2026"));
    }

    #[test]
    fn renders_share_bar() {
        let mut page = page();
        page.profile.title = "Woman, Life, Freedom".into();
        let Html(body) = index_page(&page);

        assert!(body.contains(r#"data-share-text="Test Site - Woman, Life, Freedom""#));
        for target in ["twitter", "facebook", "whatsapp", "telegram", "copy"] {
            assert!(body.contains(&format!(r#"data-share="{target}""#)));
        }
        assert!(body.contains(r#"id="copyToast""#));
        assert!(body.contains(r#"<script src="/static/share.js" defer></script>"#));
    }

    #[test]
    fn banner_only_when_enabled() {
        let mut page = page();
        page.banner.text = "Rally on Saturday".into();
        let Html(body) = index_page(&page);
        assert!(!body.contains("Rally on Saturday"));

        page.banner.enabled = true;
        page.banner.kind = "urgent".into();
        let Html(body) = index_page(&page);
        assert!(body.contains(r#"<div class="banner banner-urgent">Rally on Saturday</div>"#));
    }
}
