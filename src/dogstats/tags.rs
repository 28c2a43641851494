const TAG_MARKER: &str = "|#";

/// Renders the `|#...` tag suffix of a wire line.
///
/// `constant_tags` is a suffix previously rendered by this function, so it already starts
/// with `|#`. Constant tags come first, then the ad-hoc tags. Each group is written in
/// reverse declaration order. No tags at all renders as the empty string.
///
/// ```
/// use insight_statsd::render_tags;
///
/// let constant = render_tags(&["instance:foo", "app:bar"], None);
/// assert_eq!(constant, "|#app:bar,instance:foo");
/// assert_eq!(render_tags(&["baz"], Some(&constant)), "|#app:bar,instance:foo,baz");
/// assert_eq!(render_tags::<&str>(&[], None), "");
/// ```
#[must_use]
pub fn render_tags<T: AsRef<str>>(tags: &[T], constant_tags: Option<&str>) -> String {
    let mut rendered = String::new();
    write_tags(&mut rendered, tags, constant_tags);
    rendered
}

/// Renders constant tags once, at client construction. An empty list means no constant tags.
pub(crate) fn render_constant_tags<T: AsRef<str>>(tags: &[T]) -> Option<String> {
    if tags.is_empty() {
        return None;
    }
    Some(render_tags(tags, None))
}

pub(crate) fn write_tags<T: AsRef<str>>(out: &mut String, tags: &[T], constant_tags: Option<&str>) {
    match constant_tags {
        Some(constant) => {
            out.push_str(constant);
            if tags.is_empty() {
                return;
            }
            out.push(',');
        }
        None => {
            if tags.is_empty() {
                return;
            }
            out.push_str(TAG_MARKER);
        }
    }

    let mut iter = tags.iter().rev();
    if let Some(tag) = iter.next() {
        out.push_str(tag.as_ref());
    }
    for tag in iter {
        out.push(',');
        out.push_str(tag.as_ref());
    }
}
