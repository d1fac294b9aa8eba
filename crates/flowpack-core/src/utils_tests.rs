use crate::utils::{to_lower_snake_case, to_pascal_case, to_upper_snake_case};

#[test]
fn upper_snake_from_spaces() {
    assert_eq!(to_upper_snake_case("Main Page"), "MAIN_PAGE");
    assert_eq!(to_upper_snake_case("  lead and trail "), "LEAD_AND_TRAIL");
}

#[test]
fn upper_snake_from_camel() {
    assert_eq!(to_upper_snake_case("settingsPage2"), "SETTINGS_PAGE2");
    assert_eq!(to_upper_snake_case("ABC"), "ABC");
}

#[test]
fn lower_snake_collapses_separators() {
    assert_eq!(to_lower_snake_case("a--b__c"), "a_b_c");
    assert_eq!(to_lower_snake_case("Button OK"), "button_ok");
}

#[test]
fn pascal_case() {
    assert_eq!(to_pascal_case("main page"), "MainPage");
    assert_eq!(to_pascal_case("mainPage"), "MainPage");
    assert_eq!(to_pascal_case(""), "");
}
