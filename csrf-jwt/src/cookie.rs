use crate::config::GuardConfig;

/// Render a `Set-Cookie` line for `name=value` using the configured attributes.
pub fn render_set_cookie(config: &GuardConfig, name: &str, value: &str, max_age: u64) -> String {
    let mut cookie = format!(
        "{}={}; Max-Age={}; Path={}",
        name, value, max_age, config.cookie_path
    );

    if let Some(ref domain) = config.cookie_domain {
        cookie.push_str(&format!("; Domain={}", domain));
    }

    if config.cookie_secure {
        cookie.push_str("; Secure");
    }

    if config.cookie_http_only {
        cookie.push_str("; HttpOnly");
    }

    cookie.push_str(&format!("; SameSite={}", config.cookie_same_site.as_str()));
    cookie
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SameSite;

    #[test]
    fn test_default_attributes() {
        let config = GuardConfig::new("test").unwrap();
        let cookie = render_set_cookie(&config, "jwt", "abc", 3600);

        assert_eq!(
            cookie,
            "jwt=abc; Max-Age=3600; Path=/; Secure; HttpOnly; SameSite=Strict"
        );
    }

    #[test]
    fn test_custom_attributes() {
        let config = GuardConfig::new("test")
            .unwrap()
            .with_cookie_domain("example.com")
            .with_cookie_path("/app")
            .with_cookie_secure(false)
            .with_cookie_http_only(false)
            .with_cookie_same_site(SameSite::Lax);

        let cookie = render_set_cookie(&config, "x-csrf-jwt", "abc", 60);
        assert_eq!(
            cookie,
            "x-csrf-jwt=abc; Max-Age=60; Path=/app; Domain=example.com; SameSite=Lax"
        );
    }
}
