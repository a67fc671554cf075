use axum::{
    extract::{Form, Query, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use tracing::{error, info, warn};

use super::model::{
    AddLinkForm, AdminNotice, BannerForm, FeaturedForm, LinkIdForm, LoginForm, PasswordForm,
    ProfileForm,
};
use crate::{
    AppState,
    error::AppError,
    middleware::{clear_session_cookie, session_cookie, session_token},
    utils::random_hex,
    views::{self, AdminPage},
};

/// Shown for any failed login, whatever the cause.
const INVALID_CREDENTIAL: &str = "Invalid password";

const MIN_PASSWORD_LEN: usize = 6;

/// Random bytes in a link id.
const LINK_ID_BYTES: usize = 8;

fn back_to_admin(query: &str) -> Redirect {
    Redirect::to(&format!("/admin?{query}"))
}

pub async fn login_page(State(state): State<AppState>, jar: CookieJar) -> Response {
    if state.sessions.validate(&session_token(&jar)) {
        return Redirect::to("/admin").into_response();
    }

    views::login_page(None).into_response()
}

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let valid = match state.repo.verify_credential(&form.password).await {
        Ok(valid) => valid,
        Err(e) => {
            error!(error = %e, "Failed to verify admin credential");
            false
        }
    };

    if !valid {
        warn!("Rejected admin login");
        return Ok(views::login_page(Some(INVALID_CREDENTIAL)).into_response());
    }

    let token = state
        .sessions
        .create()
        .inspect_err(|e| error!(error = %e, "Failed to create session"))?;
    let jar = jar.add(session_cookie(token, state.sessions.lifetime()));
    info!("Admin logged in");

    Ok((jar, Redirect::to("/admin")).into_response())
}

pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    state.sessions.delete(&session_token(&jar));
    let jar = jar.add(clear_session_cookie());

    (jar, Redirect::to("/"))
}

pub async fn dashboard(
    State(state): State<AppState>,
    Query(notice): Query<AdminNotice>,
) -> Result<Html<String>, AppError> {
    let profile = state
        .repo
        .profile()
        .await
        .inspect_err(|e| error!(error = %e, "Failed to load profile"))?;
    let links = state
        .repo
        .links()
        .await
        .inspect_err(|e| error!(error = %e, "Failed to load links"))?;
    let banner = state
        .repo
        .banner()
        .await
        .inspect_err(|e| error!(error = %e, "Failed to load banner"))?;

    Ok(views::admin_page(&AdminPage {
        profile,
        links,
        banner,
        message: notice.message,
        error: notice.error,
    }))
}

pub async fn add_link(State(state): State<AppState>, Form(form): Form<AddLinkForm>) -> Redirect {
    if !form.is_complete() {
        return back_to_admin("error=Title+and+URL+are+required");
    }

    let id = match random_hex(LINK_ID_BYTES) {
        Ok(id) => id,
        Err(e) => {
            error!(error = %e, "Failed to generate link id");
            return back_to_admin("error=Failed+to+generate+ID");
        }
    };

    let link = form.into_link(id);
    if let Err(e) = state.repo.add_link(&link).await {
        error!(error = %e, "Failed to add link");
        return back_to_admin("error=Failed+to+save");
    }

    back_to_admin("message=Link+added+successfully")
}

pub async fn delete_link(State(state): State<AppState>, Form(form): Form<LinkIdForm>) -> Redirect {
    if let Err(e) = state.repo.delete_link(&form.id).await {
        error!(error = %e, "Failed to delete link {}", form.id);
        return back_to_admin("error=Failed+to+delete");
    }

    back_to_admin("message=Link+deleted")
}

pub async fn toggle_featured(
    State(state): State<AppState>,
    Form(form): Form<FeaturedForm>,
) -> Redirect {
    if let Err(e) = state.repo.set_link_featured(&form.id, form.featured()).await {
        error!(error = %e, "Failed to update featured status of {}", form.id);
        return back_to_admin("error=Failed+to+update");
    }

    back_to_admin("message=Link+updated")
}

pub async fn update_profile(
    State(state): State<AppState>,
    Form(form): Form<ProfileForm>,
) -> Redirect {
    if let Err(e) = state.repo.update_profile(&form.into()).await {
        error!(error = %e, "Failed to update profile");
        return back_to_admin("error=Failed+to+save");
    }

    back_to_admin("message=Profile+updated")
}

pub async fn update_password(
    State(state): State<AppState>,
    Form(form): Form<PasswordForm>,
) -> Redirect {
    if form.new_password.chars().count() < MIN_PASSWORD_LEN {
        return back_to_admin("error=Password+must+be+at+least+6+characters");
    }

    if let Err(e) = state.repo.set_credential(&form.new_password).await {
        error!(error = %e, "Failed to update password");
        return back_to_admin("error=Failed+to+save");
    }

    info!("Admin password changed");
    back_to_admin("message=Password+updated")
}

pub async fn update_banner(
    State(state): State<AppState>,
    Form(form): Form<BannerForm>,
) -> Redirect {
    if let Err(e) = state.repo.update_banner(&form.into()).await {
        error!(error = %e, "Failed to update banner");
        return back_to_admin("error=Failed+to+save+banner");
    }

    back_to_admin("message=Banner+updated")
}
