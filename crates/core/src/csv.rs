//! Minimal CSV writing for exports.

/// Quote a field when it contains a delimiter, quote or line break.
pub fn escape(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r') {
        quote(field)
    } else {
        field.to_string()
    }
}

/// Always quote a field, doubling inner quotes.
pub fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

/// Header row for the user export.
pub const USERS_HEADER: &str = "Id,Name,Role,Department";

/// One row of the user export. Text columns are always quoted.
pub fn user_row(id: i64, name: &str, role: &str, department: Option<&str>) -> String {
    format!(
        "{id},{},{},{}",
        quote(name),
        quote(role),
        quote(department.unwrap_or_default())
    )
}
