use super::{ColorTable, rgb565, rgb888};

fn table(layered: bool) -> ColorTable {
    ColorTable::new(vec!["background".into(), "text".into()], layered)
}

#[test]
fn transparent_is_reserved() {
    assert_eq!(table(false).index("transparent"), 65535);
    assert_eq!(table(true).index("transparent"), 65535);
}

#[test]
fn named_colors_resolve_to_their_position() {
    let mut colors = table(false);
    assert_eq!(colors.index("background"), 0);
    assert_eq!(colors.index("text"), 1);
    assert!(colors.extra().is_empty());
}

#[test]
fn literals_are_pooled_after_named_colors() {
    let mut colors = table(false);
    assert_eq!(colors.index("#ff0000"), 2);
    assert_eq!(colors.index("#00ff00"), 3);
    assert_eq!(colors.index("#ff0000"), 2);
    assert_eq!(colors.extra(), ["#ff0000", "#00ff00"]);
}

#[test]
fn layered_builds_do_not_pool() {
    let mut colors = table(true);
    assert_eq!(colors.index("text"), 1);
    assert_eq!(colors.index("#ff0000"), 0);
    assert!(colors.extra().is_empty());
}

#[test]
fn rgb565_conversion() {
    assert_eq!(rgb565("#ffffff"), 0xFFFF);
    assert_eq!(rgb565("#000000"), 0x0000);
    assert_eq!(rgb565("#ff0000"), 0xF800);
    assert_eq!(rgb565("#00ff00"), 0x07E0);
    assert_eq!(rgb565("#0000ff"), 0x001F);
    assert_eq!(rgb565("#f00"), 0xF800);
    assert_eq!(rgb565("red"), 0);
    assert_eq!(rgb565("#12345"), 0);
}

#[test]
fn rgb888_conversion() {
    assert_eq!(rgb888("#102030"), Some(0x102030));
    assert_eq!(rgb888("#abc"), Some(0xAABBCC));
    assert_eq!(rgb888("nope"), None);
}
