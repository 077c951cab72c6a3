//! Query parameter parsing tests
//!
//! Required keys, error messages, label selections and the
//! viewport → query → viewport round trip.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

use test_case::test_case;
use xlviewport::labels::{LabelStore, NoLabels};
use xlviewport::layout::SheetLayout;
use xlviewport::{
    Anchor, AnchoredSelection, CellRef, LabelMapping, NavigationCommand, RequiredKeys, SelectionKind,
    Viewport, ViewportQuery, ViewportRectangle, ViewportRequest,
};

fn parse(query: &str, required: RequiredKeys) -> xlviewport::Result<ViewportQuery> {
    ViewportQuery::parse_str(query, required, &NoLabels)
}

fn parse_viewport(query: &str) -> Viewport {
    match parse(query, RequiredKeys::Window).unwrap() {
        ViewportQuery::Viewport(viewport) => viewport,
        ViewportQuery::Window(window) => panic!("unexpected window {window}"),
    }
}

#[test_case("home=A1", RequiredKeys::Cell, "Missing: width, height" ; "cell request without size")]
#[test_case("home=A1", RequiredKeys::Window, "Missing: width, height, includeFrozenColumnsRows" ; "window request without size")]
#[test_case("width=1&height=1", RequiredKeys::Window, "Missing: home, includeFrozenColumnsRows" ; "skips present keys")]
#[test_case("", RequiredKeys::Window, "Missing: home, width, height, includeFrozenColumnsRows" ; "empty query")]
fn test_missing_keys(query: &str, required: RequiredKeys, expected: &str) {
    assert_eq!(parse(query, required).unwrap_err().to_string(), expected);
}

#[test_case("home=A1&width=abc&height=1", "Invalid width \"abc\"" ; "width not a number")]
#[test_case("home=A1&width=-5&height=1", "Invalid width \"-5\"" ; "negative width")]
#[test_case("home=A1&width=1&height=1&includeFrozenColumnsRows=yes", "Invalid includeFrozenColumnsRows \"yes\"" ; "bad flag")]
#[test_case("home=A1&width=1&height=1&selectionType=cell&selection=1A", "Invalid cell \"1A\"" ; "bad cell")]
#[test_case("home=A1&width=1&height=1&selectionType=cells&selection=A1", "Invalid selectionType \"cells\"" ; "bad kind")]
#[test_case("home=A1&width=1&height=1&selectionType=column-range&selection=B:C&selectionAnchor=top", "Invalid anchor top for column-range" ; "illegal anchor")]
#[test_case("home=A1&width=1&height=1&selectionType=cell&selection=A1&selectionAnchor=middle", "Invalid selectionAnchor \"middle\"" ; "unknown anchor")]
#[test_case("home=A1&width=1&height=1&navigation=up-row,jump", "Invalid navigation \"jump\"" ; "bad navigation")]
#[test_case("window=A1:B", "Invalid window \"A1:B\"" ; "bad window")]
fn test_invalid_values(query: &str, expected: &str) {
    assert_eq!(parse(query, RequiredKeys::Cell).unwrap_err().to_string(), expected);
}

#[test]
fn test_cell_request_defaults_frozen_to_false() {
    let query = parse("home=C3&width=640&height=480", RequiredKeys::Cell).unwrap();
    let ViewportQuery::Viewport(viewport) = query else {
        panic!("expected viewport");
    };
    assert!(!viewport.include_frozen_columns_rows);
    assert_eq!(viewport.home().to_string(), "C3");
    assert!(viewport.selection.is_none());
}

#[test]
fn test_window_key_overrides_other_keys() {
    let query = parse("window=A1%3AB2%2CD1%3AE2&home=1A&navigation=bogus", RequiredKeys::Window).unwrap();
    assert_eq!(query, ViewportQuery::Window("A1:B2,D1:E2".parse().unwrap()));
}

#[test]
fn test_selection_defaults_anchor() {
    let viewport = parse_viewport(
        "home=A1&width=1&height=1&includeFrozenColumnsRows=false&selectionType=row-range&selection=5:2",
    );
    assert_eq!(viewport.selection.unwrap().to_string(), "2:5 top");
}

#[test_case("cell-range", "B2:C3", "B2:C3 top-left" ; "cell range")]
#[test_case("column-range", "B:C", "B:C left" ; "column range")]
#[test_case("row-range", "2:4", "2:4 top" ; "row range")]
#[test_case("cell", "B2", "B2" ; "cell")]
fn test_none_anchor_takes_default(kind: &str, selection: &str, expected: &str) {
    let viewport = parse_viewport(&format!(
        "home=A1&width=100&height=100&includeFrozenColumnsRows=false\
         &selectionType={kind}&selection={selection}&selectionAnchor=none"
    ));
    assert_eq!(viewport.selection.unwrap().to_string(), expected);
}

#[test]
fn test_label_selection_resolves() {
    let labels: LabelStore = [LabelMapping::new(
        "Totals".parse().unwrap(),
        SelectionKind::CellRange.parse("D4:E9").unwrap(),
    )]
    .into_iter()
    .collect();

    let query = "home=A1&width=1&height=1&selectionType=label&selection=Totals&selectionAnchor=bottom-right";
    let ViewportQuery::Viewport(viewport) = ViewportQuery::parse_str(query, RequiredKeys::Cell, &labels).unwrap()
    else {
        panic!("expected viewport");
    };
    assert_eq!(viewport.selection.unwrap().to_string(), "D4:E9 bottom-right");

    let missing = "home=A1&width=1&height=1&selectionType=label&selection=Other";
    let err = ViewportQuery::parse_str(missing, RequiredKeys::Cell, &labels).unwrap_err();
    assert_eq!(err.to_string(), "Unknown label Other");
}

#[test_case(None ; "no selection")]
#[test_case(Some(("cell", "B2", Anchor::None)) ; "cell")]
#[test_case(Some(("cell-range", "B2:D9", Anchor::BottomLeft)) ; "cell range")]
#[test_case(Some(("column-range", "C:F", Anchor::Right)) ; "column range")]
#[test_case(Some(("row", "12", Anchor::None)) ; "row")]
fn test_viewport_round_trip(selection: Option<(&str, &str, Anchor)>) {
    let rect = ViewportRectangle::new(CellRef::at(3, 41), 1234.5, 678.0).unwrap();
    let selection = selection.map(|(kind, text, anchor)| {
        let kind: SelectionKind = kind.parse().unwrap();
        AnchoredSelection::new(kind.parse(text).unwrap(), anchor).unwrap()
    });
    let viewport = Viewport::new(rect, true).with_selection(selection);

    let pairs = viewport.to_query_pairs();
    let parsed = ViewportQuery::parse(
        pairs.iter().map(|(key, value)| (*key, value.as_str())),
        RequiredKeys::Window,
        &NoLabels,
    )
    .unwrap();
    assert_eq!(parsed, ViewportQuery::Viewport(viewport.clone()));

    let from_string = parse(&viewport.to_query_string(), RequiredKeys::Window).unwrap();
    assert_eq!(from_string, ViewportQuery::Viewport(viewport));
}

#[test]
fn test_round_trip_keeps_navigation_text() {
    let viewport = parse_viewport(
        "home=A1&width=100&height=100&includeFrozenColumnsRows=true\
         &navigation=extend-left-pixels+40%2Cselect-cell+C3%2Cdown-row",
    );
    assert_eq!(
        NavigationCommand::format_list(&viewport.navigations),
        "extend-left-pixels 40,select-cell C3,down-row"
    );
    let again = parse_viewport(&viewport.to_query_string());
    assert_eq!(again.navigations, viewport.navigations);
}

#[test]
fn test_end_to_end_response_json() {
    let layout = SheetLayout::uniform(100.0, 20.0).with_frozen(1, 1);
    let request = ViewportRequest::new(&layout, &NoLabels);
    let response = request
        .handle(
            "home=B2&width=300&height=60&includeFrozenColumnsRows=true\
             &selectionType=cell&selection=B2&navigation=extend-right-column",
            RequiredKeys::Window,
            None,
        )
        .unwrap();

    let json = serde_json::to_value(&response).unwrap();
    assert_eq!(json["window"], "A2:A3,B1:C1,A1,B2:C3");
    assert_eq!(json["viewport"]["rectangle"]["home"], "B2");
    assert_eq!(json["viewport"]["selection"]["selection"]["value"], "B2:C2");
    assert_eq!(json["viewport"]["selection"]["anchor"], "top-left");
}
