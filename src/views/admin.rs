use std::fmt::Write;

use axum::response::Html;

use super::{escape, layout};
use crate::models::{Banner, Link, Profile};

pub struct AdminPage {
    pub profile: Profile,
    pub links: Vec<Link>,
    pub banner: Banner,
    pub message: Option<String>,
    pub error: Option<String>,
}

pub fn login_page(error: Option<&str>) -> Html<String> {
    let mut body = String::from("<main class=\"login\">\n<h1>Admin login</h1>\n");
    if let Some(error) = error {
        let _ = writeln!(body, r#"<p class="error">{}</p>"#, escape(error));
    }
    body.push_str(
        r#"<form method="post" action="/admin/login">
<label>Password <input type="password" name="password" autocomplete="current-password" required autofocus></label>
<button type="submit">Log in</button>
</form>
</main>"#,
    );
    layout("Admin login", &body)
}

fn checked(on: bool) -> &'static str {
    if on { " checked" } else { "" }
}

fn text_input(body: &mut String, label: &str, name: &str, value: &str) {
    let _ = writeln!(
        body,
        r#"<label>{label} <input type="text" name="{name}" value="{}"></label>"#,
        escape(value)
    );
}

pub fn admin_page(page: &AdminPage) -> Html<String> {
    let mut body = String::from(
        "<main class=\"admin\">\n<header><h1>Admin</h1> <a href=\"/\">View site</a> <a href=\"/admin/logout\">Log out</a></header>\n",
    );

    if let Some(message) = page.message.as_deref().filter(|m| !m.is_empty()) {
        let _ = writeln!(body, r#"<p class="notice">{}</p>"#, escape(message));
    }
    if let Some(error) = page.error.as_deref().filter(|e| !e.is_empty()) {
        let _ = writeln!(body, r#"<p class="error">{}</p>"#, escape(error));
    }

    let profile = &page.profile;
    body.push_str("<section>\n<h2>Profile</h2>\n<form method=\"post\" action=\"/admin/profile\">\n");
    text_input(&mut body, "Name", "name", &profile.name);
    text_input(&mut body, "Title", "title", &profile.title);
    text_input(&mut body, "Subtitle", "subtitle", &profile.subtitle);
    let _ = writeln!(
        body,
        r#"<label>Description <textarea name="description">{}</textarea></label>"#,
        escape(&profile.description)
    );
    text_input(&mut body, "Avatar URL", "avatar", &profile.avatar);
    body.push_str("<button type=\"submit\">Save profile</button>\n</form>\n</section>\n");

    let banner = &page.banner;
    body.push_str("<section>\n<h2>Banner</h2>\n<form method=\"post\" action=\"/admin/banner\">\n");
    let _ = writeln!(
        body,
        r#"<label><input type="checkbox" name="banner_enabled" value="true"{}> Enabled</label>"#,
        checked(banner.enabled)
    );
    text_input(&mut body, "Text", "banner_text", &banner.text);
    text_input(&mut body, "Link", "banner_link", &banner.link);
    text_input(&mut body, "Type", "banner_type", &banner.kind);
    body.push_str("<button type=\"submit\">Save banner</button>\n</form>\n</section>\n");

    body.push_str(
        r#"<section>
<h2>Add link</h2>
<form method="post" action="/admin/links/add">
<label>Title <input type="text" name="title" required></label>
<label>URL <input type="url" name="url" required></label>
<label>Category <input type="text" name="category"></label>
<label>Icon <input type="text" name="icon"></label>
<label><input type="checkbox" name="featured" value="true"> Featured</label>
<button type="submit">Add link</button>
</form>
</section>
<section>
<h2>Links</h2>
<ul class="links">
"#,
    );
    for link in &page.links {
        let id = escape(&link.id);
        let _ = writeln!(
            body,
            r#"<li><a href="{url}">{title}</a> <small>{category}</small>
<form method="post" action="/admin/links/featured"><input type="hidden" name="id" value="{id}"><input type="hidden" name="featured" value="{toggle}"><button type="submit">{label}</button></form>
<form method="post" action="/admin/links/delete"><input type="hidden" name="id" value="{id}"><button type="submit">Delete</button></form></li>"#,
            url = escape(&link.url),
            title = escape(&link.title),
            category = escape(&link.category),
            toggle = !link.featured,
            label = if link.featured { "Unfeature" } else { "Feature" },
        );
    }
    body.push_str(
        r#"</ul>
</section>
<section>
<h2>Password</h2>
<form method="post" action="/admin/password">
<label>New password <input type="password" name="new_password" minlength="6" autocomplete="new-password" required></label>
<button type="submit">Change password</button>
</form>
</section>
</main>"#,
    );

    layout("Admin", &body)
}
