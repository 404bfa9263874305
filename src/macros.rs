// src/macros.rs

/// Compile a CSS selector once and hand back a `&'static Selector`.
#[macro_export]
macro_rules! selector {
    ($css:literal) => {{
        static SELECTOR: ::std::sync::OnceLock<::scraper::Selector> = ::std::sync::OnceLock::new();
        SELECTOR.get_or_init(|| ::scraper::Selector::parse($css).unwrap())
    }};
}

/// Compile a regex once and hand back a `&'static Regex`.
#[macro_export]
macro_rules! regex {
    ($re:literal) => {{
        static REGEX: ::std::sync::OnceLock<::regex::Regex> = ::std::sync::OnceLock::new();
        REGEX.get_or_init(|| ::regex::Regex::new($re).unwrap())
    }};
}
