use axum_extra::extract::cookie::{Cookie, SameSite, SignedCookieJar};

pub const SESSION_COOKIE: &str = "bearer";

pub fn bearer_token(jar: &SignedCookieJar) -> Option<String> {
    jar.get(SESSION_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .filter(|token| !token.is_empty())
}

pub fn store_token(jar: SignedCookieJar, token: &str, secure: bool) -> SignedCookieJar {
    let cookie = Cookie::build((SESSION_COOKIE, token.to_string()))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .path("/")
        .build();
    jar.add(cookie)
}

pub fn clear_token(jar: SignedCookieJar) -> SignedCookieJar {
    jar.remove(Cookie::build((SESSION_COOKIE, "")).path("/").build())
}
