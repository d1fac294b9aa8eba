/// Split a display name into lowercase words.
///
/// Any non-alphanumeric character separates words, and so does a
/// lowercase-to-uppercase transition (`mainPage` → `main`, `page`).
fn words(s: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut prev_lower = false;

    for c in s.chars() {
        if !c.is_ascii_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            prev_lower = false;
            continue;
        }
        if c.is_ascii_uppercase() && prev_lower && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        prev_lower = c.is_ascii_lowercase() || c.is_ascii_digit();
        current.push(c.to_ascii_lowercase());
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

/// Convert a display name to `UPPER_SNAKE_CASE`, usable as a C enum member.
///
/// # Examples
/// ```
/// use flowpack_core::utils::to_upper_snake_case;
/// assert_eq!(to_upper_snake_case("Main page"), "MAIN_PAGE");
/// assert_eq!(to_upper_snake_case("mainPage"), "MAIN_PAGE");
/// ```
pub fn to_upper_snake_case(s: &str) -> String {
    words(s).join("_").to_ascii_uppercase()
}

/// Convert a display name to `lower_snake_case`, usable as a C identifier.
///
/// # Examples
/// ```
/// use flowpack_core::utils::to_lower_snake_case;
/// assert_eq!(to_lower_snake_case("Main Page"), "main_page");
/// assert_eq!(to_lower_snake_case("btn-OK"), "btn_ok");
/// ```
pub fn to_lower_snake_case(s: &str) -> String {
    words(s).join("_")
}

/// Convert a display name to PascalCase.
///
/// # Examples
/// ```
/// use flowpack_core::utils::to_pascal_case;
/// assert_eq!(to_pascal_case("main_page"), "MainPage");
/// assert_eq!(to_pascal_case("settings"), "Settings");
/// ```
pub fn to_pascal_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for word in words(s) {
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            result.push(first.to_ascii_uppercase());
            result.extend(chars);
        }
    }
    result
}
