use serde::Deserialize;

use crate::models::{Banner, Link, Profile};

/// Checkboxes post `"true"` when ticked and nothing otherwise.
fn is_checked(value: &Option<String>) -> bool {
    value.as_deref() == Some("true")
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub password: String,
}

/// Outcome of the previous mutation, carried in the redirect query.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AdminNotice {
    pub message: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AddLinkForm {
    pub title: String,
    pub url: String,
    pub category: String,
    pub icon: String,
    pub featured: Option<String>,
}

impl AddLinkForm {
    pub fn is_complete(&self) -> bool {
        !self.title.trim().is_empty() && !self.url.trim().is_empty()
    }

    pub fn into_link(self, id: String) -> Link {
        let featured = is_checked(&self.featured);
        Link {
            id,
            title: self.title,
            url: self.url,
            category: self.category,
            icon: self.icon,
            featured,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LinkIdForm {
    pub id: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FeaturedForm {
    pub id: String,
    pub featured: Option<String>,
}

impl FeaturedForm {
    pub fn featured(&self) -> bool {
        is_checked(&self.featured)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ProfileForm {
    pub name: String,
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub avatar: String,
}

impl From<ProfileForm> for Profile {
    fn from(form: ProfileForm) -> Self {
        Profile {
            name: form.name,
            title: form.title,
            subtitle: form.subtitle,
            description: form.description,
            avatar: form.avatar,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PasswordForm {
    pub new_password: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct BannerForm {
    pub banner_enabled: Option<String>,
    pub banner_text: String,
    pub banner_link: String,
    pub banner_type: String,
}

impl From<BannerForm> for Banner {
    fn from(form: BannerForm) -> Self {
        Banner {
            enabled: is_checked(&form.banner_enabled),
            text: form.banner_text,
            link: form.banner_link,
            kind: form.banner_type,
        }
    }
}
