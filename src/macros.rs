// Compiles a pattern once per call site and hands out a `&'static Regex`.
// Patterns are literals checked by the test suite, so compilation cannot fail
// at runtime.
macro_rules! regex(
    ($s:expr) => ({
        static RE: ::std::sync::LazyLock<::regex::Regex> =
            ::std::sync::LazyLock::new(|| ::regex::Regex::new($s).unwrap());
        &*RE
    });
);
