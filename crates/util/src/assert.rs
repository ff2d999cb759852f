/// Asserts that each needle occurs in `content`, each one after the end of the previous one.
///
/// ```rust
/// use util::assert_contains_inorder;
///
/// assert_contains_inorder!("opened, wrote, closed", ["opened", "closed"]);
/// ```
#[macro_export]
macro_rules! assert_contains_inorder {
    ($content:expr, [$($needle:expr),* $(,)?]) => {{
        let content: &str = &$content;
        let mut _remaining: &str = content;
        $(
            let needle: &str = &$needle;
            match _remaining.find(needle) {
                Some(index) => _remaining = &_remaining[index + needle.len()..],
                None => panic!(
                    "expected content to contain '{}' (in order), remaining content:\n{}",
                    needle, _remaining
                ),
            }
        )*
    }};
}
