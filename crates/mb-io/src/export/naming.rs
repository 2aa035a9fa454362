//! Identifier and literal helpers shared by the code generators

/// `leave_type` → `LeaveType`
#[must_use]
pub fn to_pascal_case(name: &str) -> String {
    name.split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

/// `LeaveType` → `leave_type`
#[must_use]
pub fn to_snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (i, c) in name.chars().enumerate() {
        if c.is_uppercase() {
            if i > 0 && !out.ends_with('_') {
                out.push('_');
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Single-quoted SQL string literal
#[must_use]
pub fn sql_literal(text: &str) -> String {
    format!("'{}'", text.replace('\'', "''"))
}

/// Single-quoted Python string literal
#[must_use]
pub fn py_literal(text: &str) -> String {
    format!("'{}'", text.replace('\\', "\\\\").replace('\'', "\\'"))
}

/// Text safe inside a Python triple-quoted docstring
#[must_use]
pub fn py_docstring(text: &str) -> String {
    text.replace('\\', "\\\\").replace("\"\"\"", "\\\"\\\"\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pascal_case() {
        assert_eq!(to_pascal_case("leave_type"), "LeaveType");
        assert_eq!(to_pascal_case("employees"), "Employees");
        assert_eq!(to_pascal_case("a__b"), "AB");
    }

    #[test]
    fn snake_case() {
        assert_eq!(to_snake_case("Departments_rel"), "departments_rel");
        assert_eq!(to_snake_case("LeaveType"), "leave_type");
        assert_eq!(to_snake_case("already_snake"), "already_snake");
    }

    #[test]
    fn literals_escape_quotes() {
        assert_eq!(sql_literal("O'Brien"), "'O''Brien'");
        assert_eq!(py_literal("it's"), r"'it\'s'");
        assert_eq!(py_docstring(r#"say """hi""""#), r#"say \"\"\"hi\"\"\""#);
    }
}
