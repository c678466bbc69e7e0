use std::borrow::Cow;
use std::path::Path;

use crate::error::DarkHelpError;

/// Parse the content of a names file.
///
/// Every line is the name of one class, starting with class 0. Reading stops at the first
/// empty line and a trailing `\r` is removed from every line.
///
/// # Example
///
/// ```
/// use darkhelp::names::parse_names;
///
/// let names = parse_names("car\r\nperson\n\nignored\n");
///
/// assert_eq!(names, vec!["car", "person"]);
/// ```
pub fn parse_names(content: &str) -> Vec<String> {
    content
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .take_while(|line| !line.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Read a names file, see [`parse_names`].
pub fn read_names_file(path: impl AsRef<Path>) -> Result<Vec<String>, DarkHelpError> {
    let content = std::fs::read_to_string(path)?;
    Ok(parse_names(&content))
}

/// Placeholder names `#0`, `#1`, ... for networks without a names file.
pub fn numbered_names(num_classes: usize) -> Vec<String> {
    (0..num_classes).map(|i| format!("#{i}")).collect()
}

/// The name of a class, or `#id` when `names` is too short.
pub fn class_name(names: &[String], class_id: usize) -> Cow<'_, str> {
    match names.get(class_id) {
        Some(name) => Cow::Borrowed(name.as_str()),
        None => Cow::Owned(format!("#{class_id}")),
    }
}
