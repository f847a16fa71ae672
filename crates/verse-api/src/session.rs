use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

pub const SESSION_COOKIE: &str = "token";

/// Set the session cookie: HttpOnly, Secure, SameSite=None (the client is
/// served cross-origin). No expiry attribute, so the cookie is
/// session-scoped in the browser.
pub fn attach(jar: CookieJar, token: String) -> CookieJar {
    let cookie = Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .secure(true)
        .same_site(SameSite::None)
        .build();

    jar.add(cookie)
}

/// Absence is a precondition miss for the auth gate, not an error.
pub fn extract(jar: &CookieJar) -> Option<String> {
    jar.get(SESSION_COOKIE).map(|c| c.value().to_string())
}

/// Remove the cookie. Already-issued tokens stay verifiable until the
/// signing secret rotates.
pub fn clear(jar: CookieJar) -> CookieJar {
    jar.remove(Cookie::build((SESSION_COOKIE, "")).path("/"))
}
