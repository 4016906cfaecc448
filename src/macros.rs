/// Compile a pattern once and hand out a `&'static Regex`.
///
/// The `ci` form prefixes `(?i)` so Fortran keywords match regardless of case.
#[macro_export]
macro_rules! regex {
    ($pat:literal) => {{
        static RE: once_cell::sync::Lazy<regex::Regex> =
            once_cell::sync::Lazy::new(|| regex::Regex::new($pat).expect("static pattern compiles"));
        &*RE
    }};
    (ci $pat:literal) => {{
        static RE: once_cell::sync::Lazy<regex::Regex> = once_cell::sync::Lazy::new(|| {
            regex::RegexBuilder::new($pat).case_insensitive(true).build().expect("static pattern compiles")
        });
        &*RE
    }};
}
