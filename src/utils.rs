// ABOUTME: Small text helpers shared by export and import
// ABOUTME: Identifier quoting, display sanitising and bounded previews

/// Quote an identifier with T-SQL brackets, doubling any closing bracket
///
/// # Examples
///
/// ```
/// # use mssql_script_migrator::utils::quote_identifier;
/// assert_eq!(quote_identifier("Orders"), "[Orders]");
/// assert_eq!(quote_identifier("odd]name"), "[odd]]name]");
/// ```
pub fn quote_identifier(identifier: &str) -> String {
    format!("[{}]", identifier.replace(']', "]]"))
}

/// Sanitize an identifier (table name, database name) for display
///
/// Removes control characters and limits length to prevent log injection
/// and keep messages readable.
///
/// **Note**: This is for display purposes only. Use [`quote_identifier`]
/// when building SQL.
///
/// # Examples
///
/// ```
/// # use mssql_script_migrator::utils::sanitize_identifier;
/// assert_eq!(sanitize_identifier("normal_table"), "normal_table");
/// assert_eq!(sanitize_identifier("table\nname"), "tablename");
///
/// let long_name = "a".repeat(200);
/// assert_eq!(sanitize_identifier(&long_name).len(), 100);
/// ```
pub fn sanitize_identifier(identifier: &str) -> String {
    identifier
        .chars()
        .filter(|c| !c.is_control())
        .take(100)
        .collect()
}

/// First `max_chars` characters of `text`, never splitting a character
pub fn preview(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}
