use super::*;

// -----------------------------------------------------------------------
// normalize_address
// -----------------------------------------------------------------------

#[test]
fn strips_punctuation_and_ordinal_suffix() {
    assert_eq!(
        normalize_address("123 West 45th Street!"),
        "123 west 45 street"
    );
}

#[test]
fn punctuation_becomes_word_separator() {
    assert_eq!(normalize_address("1-2 Ave, Apt #3B"), "1 2 ave apt 3b");
}

#[test]
fn removes_each_ordinal_form() {
    assert_eq!(
        normalize_address("1st 2nd 3rd 4th 11th 21st 102nd"),
        "1 2 3 4 11 21 102"
    );
}

#[test]
fn ordinal_suffix_must_follow_a_digit() {
    assert_eq!(normalize_address("East Third St"), "east third st");
    assert_eq!(normalize_address("North Ave"), "north ave");
}

#[test]
fn ordinal_suffix_must_end_the_word() {
    assert_eq!(normalize_address("3b 5stone"), "3b 5stone");
}

#[test]
fn collapses_whitespace_and_trims() {
    assert_eq!(
        normalize_address("  200\t\tEast   10th \n Street  "),
        "200 east 10 street"
    );
}

#[test]
fn empty_and_punctuation_only_inputs_normalize_to_empty() {
    assert_eq!(normalize_address(""), "");
    assert_eq!(normalize_address(" ,.#! "), "");
}

#[test]
fn non_ascii_letters_are_treated_as_separators() {
    assert_eq!(normalize_address("12 Café Pl"), "12 caf pl");
}

#[test]
fn normalization_is_idempotent() {
    let samples = [
        "123 West 45th Street!",
        "1-2 Ave, Apt #3B",
        "200 1st Ave",
        "1st-st 2ndth",
        "1st th",
        "  Mixed CASE   4TH  ",
        "",
        "ÅÉÎ 9th",
    ];
    for s in samples {
        let once = normalize_address(s);
        assert_eq!(normalize_address(&once), once, "not idempotent for {s:?}");
    }
}

// -----------------------------------------------------------------------
// same_address
// -----------------------------------------------------------------------

#[test]
fn ordinal_digit_does_not_match_spelled_ordinal() {
    assert!(!same_address("200 1st Ave", "200 First Ave"));
}

#[test]
fn street_type_abbreviations_are_not_expanded() {
    assert!(!same_address("200 1st Ave", "200 1st Avenue"));
}

#[test]
fn case_and_punctuation_differences_match() {
    assert!(same_address("200 1st Ave.", "200 1ST AVE"));
    assert!(same_address("123 West 45th Street", "123 west 45 street"));
}
