use itertools::Itertools;

/// Quotes an identifier with double quotes, doubling any embedded quote.
///
/// Used where an identifier has to be spliced into sql, such as the schema of an attached
/// sqlite database, which can not be passed as a parameter.
pub fn quote_identifier(identifier: impl AsRef<str>) -> String {
    let escaped = identifier.as_ref().replace('"', r#""""#);

    format!("\"{escaped}\"")
}

/// Renders a value as a single quoted PHP string literal.
pub fn php_string(value: impl AsRef<str>) -> String {
    let mut quoted = String::with_capacity(value.as_ref().len() + 2);
    quoted.push('\'');
    for c in value.as_ref().chars() {
        if matches!(c, '\'' | '\\') {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('\'');

    quoted
}

/// Renders values as a PHP array literal of single quoted strings, such as `['a', 'b']`.
pub fn php_string_array(values: impl IntoIterator<Item = impl AsRef<str>>) -> String {
    format!("[{}]", values.into_iter().map(php_string).join(", "))
}
