use super::*;

use nycrental_core::DEFAULT_NO_LISTING_PHRASES;

fn classifier() -> ListingClassifier {
    ListingClassifier::new(DEFAULT_NO_LISTING_PHRASES)
}

fn building_page(name: &str, address: &str) -> String {
    format!(
        r#"<html><body>
        <section data-testid="building-summary-component">
          <h1> {name} </h1>
          <h2>{address}</h2>
        </section>
        <div class="listings">3 rentals available</div>
        </body></html>"#
    )
}

#[test]
fn extracts_building_name_and_address() {
    let result = classifier().classify_html(
        "200 1st Ave",
        &building_page("The Ellington", "200 1st Avenue"),
    );
    assert_eq!(result.unit_name.as_deref(), Some("The Ellington"));
    assert_eq!(result.unit_address.as_deref(), Some("200 1st Avenue"));
    assert!(result.has_listing);
    assert_eq!(result.same_address, Some(false));
}

#[test]
fn matching_address_sets_same_address_true() {
    let result = classifier().classify_html(
        "123 West 45th Street",
        &building_page("Times Square Lofts", "123 West 45 Street"),
    );
    assert_eq!(result.same_address, Some(true));
}

#[test]
fn building_text_nodes_are_trimmed_and_joined() {
    let html = r#"<section data-testid="building-summary-component">
        <h1>
            <span> The </span><span>Aldyn</span>
        </h1>
        <h2>
            60 Riverside Blvd
        </h2>
    </section>"#;
    let result = classifier().classify_html("60 Riverside Blvd", html);
    assert_eq!(result.unit_name.as_deref(), Some("TheAldyn"));
    assert_eq!(result.unit_address.as_deref(), Some("60 Riverside Blvd"));
    assert_eq!(result.same_address, Some(true));
}

#[test]
fn missing_summary_section_leaves_fields_absent() {
    let html = "<html><body><h1>Search results</h1><h2>10 Main St</h2></body></html>";
    let result = classifier().classify_html("10 Main St", html);
    assert_eq!(result.unit_name, None);
    assert_eq!(result.unit_address, None);
    assert_eq!(result.same_address, None);
    assert!(result.has_listing);
}

#[test]
fn summary_without_h2_has_no_address_comparison() {
    let html = r#"<section data-testid="building-summary-component"><h1>The Octagon</h1></section>"#;
    let result = classifier().classify_html("888 Main St", html);
    assert_eq!(result.unit_name.as_deref(), Some("The Octagon"));
    assert_eq!(result.unit_address, None);
    assert_eq!(result.same_address, None);
}

#[test]
fn empty_h2_is_treated_as_absent() {
    let html = r#"<section data-testid="building-summary-component"><h1>X</h1><h2>   </h2></section>"#;
    let result = classifier().classify_html("1 Main St", html);
    assert_eq!(result.unit_address, None);
    assert_eq!(result.same_address, None);
}

#[test]
fn no_results_phrase_in_any_case_means_no_listing() {
    let html = "<html><body><p>We Couldn't Find Any Matches for your search</p></body></html>";
    let result = classifier().classify_html("1 Main St", html);
    assert!(!result.has_listing);
}

#[test]
fn phrase_split_across_lines_and_entities_still_matches() {
    let html = "<p>There were\n   no matches for &quot;1 Main St&quot;</p>";
    assert!(!classifier().classify_html("1 Main St", html).has_listing);

    let html = "<p>We couldn&#39;t find any matches</p>";
    assert!(!classifier().classify_html("1 Main St", html).has_listing);

    let html = "<p>We couldn\u{2019}t find any matches</p>";
    assert!(!classifier().classify_html("1 Main St", html).has_listing);
}

#[test]
fn phrase_in_attribute_value_means_no_listing() {
    let html = r#"<html><head>
        <meta name="description" content="No results found for 1 Main St">
        </head><body><div class="results"></div></body></html>"#;
    assert!(!classifier().classify_html("1 Main St", html).has_listing);

    let html = r#"<div role="status" aria-label="There were no matches for your search"></div>"#;
    assert!(!classifier().classify_html("1 Main St", html).has_listing);
}

#[test]
fn phrase_split_by_inline_tags_still_matches() {
    let html = "<p>We couldn<span>'</span>t find any matches</p>";
    assert!(!classifier().classify_html("1 Main St", html).has_listing);

    let html = "<p><b>No</b> results <em>found</em></p>";
    assert!(!classifier().classify_html("1 Main St", html).has_listing);
}

#[test]
fn has_listing_is_independent_of_building_summary() {
    let html = r#"<section data-testid="building-summary-component">
        <h1>The Rockrose</h1><h2>10 Main St</h2>
    </section>
    <p>No results found</p>"#;
    let result = classifier().classify_html("10 Main St", html);
    assert_eq!(result.unit_address.as_deref(), Some("10 Main St"));
    assert!(!result.has_listing);
    assert_eq!(result.same_address, Some(true));
}

#[test]
fn page_without_phrases_has_listing() {
    let result = classifier().classify_html("1 Main St", "<p>Showing 4 of 12 rentals</p>");
    assert!(result.has_listing);
}

#[test]
fn custom_phrase_set_replaces_defaults() {
    let classifier = ListingClassifier::new(["nothing to see", "  "]);
    assert!(!classifier.classify_html("1 Main St", "<p>NOTHING to see here</p>").has_listing);
    assert!(classifier.classify_html("1 Main St", "<p>No results found</p>").has_listing);
}

#[test]
fn malformed_html_degrades_to_absent_fields() {
    let html = "<section data-testid=\"building-summary-component\"><h1>Half <b>open";
    let result = classifier().classify_html("1 Main St", html);
    assert_eq!(result.unit_name.as_deref(), Some("Halfopen"));
    assert_eq!(result.unit_address, None);
    assert!(result.has_listing);
}

#[test]
fn classify_rejects_non_utf8_body() {
    let page = FetchedPage {
        final_url: "https://streeteasy.com/search".to_owned(),
        body: vec![0xff, 0xfe, 0x00, 0x3c],
    };
    let result = classifier().classify("1 Main St", &page);
    assert!(
        matches!(result, Err(ClassifyError::NotText { .. })),
        "expected NotText, got: {result:?}"
    );
}

#[test]
fn classify_decodes_utf8_body() {
    let page = FetchedPage {
        final_url: "https://streeteasy.com/building/the-ellington".to_owned(),
        body: building_page("The Ellington", "200 1st Ave").into_bytes(),
    };
    let result = classifier().classify("200 1st Ave", &page).unwrap();
    assert_eq!(result.same_address, Some(true));
}
