/// Compile a regex literal once and hand out a `&'static Regex`.
///
/// Every pattern passed here is a literal checked by the unit tests, so a
/// failed compile is a programming error rather than a configuration one.
#[macro_export]
macro_rules! regex {
    ($pat:literal) => {{
        static RE: once_cell::sync::Lazy<regex::Regex> =
            once_cell::sync::Lazy::new(|| regex::Regex::new($pat).unwrap());
        &*RE
    }};
}
