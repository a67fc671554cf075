mod handler;
mod model;

pub use handler::{
    add_link,
    dashboard,
    delete_link,
    login,
    login_page,
    logout,
    toggle_featured,
    update_banner,
    update_password,
    update_profile,
};
pub use model::{
    AddLinkForm, AdminNotice, BannerForm, FeaturedForm, LinkIdForm, LoginForm, PasswordForm,
    ProfileForm,
};
