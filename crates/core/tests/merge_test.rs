//! Tests for voting and the merge orchestrator: majority selection,
//! gap filling, contribution accounting, degradation and config errors.

use rover_core::{
    BBox, ConfidenceRange, DetectionItem, EngineId, EngineResult, MergeParams, RoverError,
    merge_page,
};

fn item(text: &str, y1: i32, y2: i32, conf: f64) -> DetectionItem {
    DetectionItem::new(text, BBox::new(0, y1, 200, y2), conf)
}

fn params(min_agreement: usize) -> MergeParams {
    MergeParams {
        cluster_y_tolerance: 12.0,
        align_y_tolerance: 20.0,
        min_agreement,
        primary_engine: None,
        confidence_ranges: Default::default(),
    }
}

// ============================================================================
// End-to-end merge scenarios
// ============================================================================

#[test]
fn two_engines_with_one_extra_line_fill_a_gap() {
    // Engine A sees two lines; engine B sees the same two plus a third
    // line A missed entirely.
    let a = EngineResult::ok(
        "A",
        vec![item("第一行", 100, 120, 0.90), item("第二行", 200, 220, 0.85)],
    );
    let b = EngineResult::ok(
        "B",
        vec![
            item("第一行", 102, 122, 0.88),
            item("第二行", 202, 222, 0.82),
            item("第三行", 300, 320, 0.75),
        ],
    );

    let result = merge_page(&[a, b], &params(1)).unwrap();

    assert_eq!(result.lines, ["第一行", "第二行", "第三行"]);
    assert_eq!(result.text, "第一行\n第二行\n第三行");
    assert!(result.gaps_filled >= 1);
    assert!(result.engine_contributions["A"] >= 1);
    assert!(result.engine_contributions["B"] >= 1);
    let total: usize = result.engine_contributions.values().sum();
    assert!(total <= result.lines.len());
}

#[test]
fn three_agreeing_engines_all_contribute_to_the_majority() {
    let engines = ["A", "B", "C"];
    let results: Vec<EngineResult> = engines
        .iter()
        .enumerate()
        .map(|(i, e)| {
            EngineResult::ok(
                *e,
                vec![item("agreed text", 100 + i as i32, 120 + i as i32, 0.9)],
            )
        })
        .collect();

    let result = merge_page(&results, &params(2)).unwrap();
    assert_eq!(result.lines, ["agreed text"]);
    assert_eq!(result.gaps_filled, 0);
}

// ============================================================================
// Majority correctness
// ============================================================================

#[test]
fn majority_wins_over_a_garbled_minority() {
    let a = EngineResult::ok("A", vec![item("clean line", 100, 120, 0.80)]);
    let b = EngineResult::ok("B", vec![item("clean line", 101, 121, 0.70)]);
    let c = EngineResult::ok("C", vec![item("cIean 1ine", 99, 119, 0.99)]);

    let result = merge_page(&[a, b, c], &params(2)).unwrap();
    assert_eq!(result.lines, ["clean line"]);
    // Winner is the majority group's highest-confidence member.
    assert_eq!(result.engine_contributions["A"], 1);
    assert_eq!(result.gaps_filled, 0);
}

#[test]
fn width_variants_count_as_agreement_but_original_text_is_emitted() {
    // B reports the full-width rendering; it normalizes equal to A's
    // half-width text, and the emitted text is the winner's original form.
    let a = EngineResult::ok("A", vec![item("Page 12", 100, 120, 0.60)]);
    let b = EngineResult::ok("B", vec![item("Ｐａｇｅ　１２", 101, 121, 0.95)]);

    let result = merge_page(&[a, b], &params(2)).unwrap();
    assert_eq!(result.gaps_filled, 0);
    assert_eq!(result.lines, ["Ｐａｇｅ　１２"]);
    assert_eq!(result.engine_contributions["B"], 1);
}

#[test]
fn confidence_normalization_decides_the_fallback_source() {
    // Raw confidences favor B, but B's engine always reports near its
    // ceiling; rescaled against the observed ranges, A is more reliable.
    let mut p = params(2);
    p.confidence_ranges
        .insert(EngineId::new("A"), ConfidenceRange::new(0.20, 0.90));
    p.confidence_ranges
        .insert(EngineId::new("B"), ConfidenceRange::new(0.90, 0.99));

    let a = EngineResult::ok("A", vec![item("right", 100, 120, 0.85)]);
    let b = EngineResult::ok("B", vec![item("wrong", 101, 121, 0.92)]);

    let result = merge_page(&[a, b], &p).unwrap();
    assert_eq!(result.lines, ["right"]);
    assert_eq!(result.gaps_filled, 1);
}

// ============================================================================
// Degradation and failure semantics
// ============================================================================

#[test]
fn single_engine_merge_returns_its_lines_verbatim() {
    let a = EngineResult::ok(
        "A",
        vec![item("only line one", 100, 120, 0.9), item("only line two", 200, 220, 0.8)],
    );

    let result = merge_page(&[a], &params(2)).unwrap();
    assert_eq!(result.lines, ["only line one", "only line two"]);
    assert_eq!(result.gaps_filled, 0);
    assert_eq!(result.engine_contributions["A"], 2);
}

#[test]
fn failed_engines_are_excluded_without_aborting() {
    let a = EngineResult::ok("A", vec![item("survivor", 100, 120, 0.9)]);
    let b = EngineResult::failed("B", "backend crashed");
    let c = EngineResult::ok("C", vec![]);

    let result = merge_page(&[a, b, c], &params(1)).unwrap();
    assert_eq!(result.lines, ["survivor"]);
    assert!(!result.engine_contributions.contains_key("B"));
    assert!(!result.engine_contributions.contains_key("C"));
}

#[test]
fn zero_successful_engines_yield_an_empty_document() {
    let results = [
        EngineResult::failed("A", "timeout"),
        EngineResult::failed("B", "oom"),
    ];
    let result = merge_page(&results, &params(1)).unwrap();
    assert!(result.lines.is_empty());
    assert_eq!(result.text, "");
    assert_eq!(result.gaps_filled, 0);
    assert!(result.engine_contributions.is_empty());
}

#[test]
fn malformed_items_never_abort_a_merge() {
    let a = EngineResult::ok(
        "A",
        vec![
            item("good", 100, 120, 0.9),
            DetectionItem::new("", BBox::new(0, 100, 200, 120), 0.9),
            DetectionItem::new("bad box", BBox::new(200, 120, 0, 100), 0.9),
        ],
    );
    let result = merge_page(&[a], &params(1)).unwrap();
    assert_eq!(result.lines, ["good"]);
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn zero_min_agreement_is_a_config_error() {
    let a = EngineResult::ok("A", vec![item("x", 100, 120, 0.9)]);
    let err = merge_page(&[a], &params(0)).unwrap_err();
    assert!(matches!(err, RoverError::InvalidMinAgreement(0)));
}

#[test]
fn unknown_primary_engine_is_a_config_error() {
    let a = EngineResult::ok("A", vec![item("x", 100, 120, 0.9)]);
    let mut p = params(1);
    p.primary_engine = Some(EngineId::new("nope"));
    let err = merge_page(&[a], &p).unwrap_err();
    assert!(matches!(err, RoverError::UnknownPrimaryEngine(_)));
}

#[test]
fn failed_primary_engine_degrades_instead_of_erroring() {
    let a = EngineResult::failed("A", "crashed");
    let b = EngineResult::ok("B", vec![item("still here", 100, 120, 0.9)]);
    let mut p = params(1);
    p.primary_engine = Some(EngineId::new("A"));

    let result = merge_page(&[a, b], &p).unwrap();
    assert_eq!(result.lines, ["still here"]);
}

#[test]
fn primary_engine_anchors_the_reference_ordering() {
    // Lexicographically B would come after A, but as primary its line
    // ordering anchors the groups.
    let a = EngineResult::ok("A", vec![item("from a", 100, 120, 0.99)]);
    let b = EngineResult::ok("B", vec![item("from b", 102, 122, 0.50)]);
    let mut p = params(1);
    p.primary_engine = Some(EngineId::new("B"));

    let result = merge_page(&[a, b], &p).unwrap();
    assert_eq!(result.lines.len(), 1);
    // No consensus between the two texts; the gap fills from the more
    // reliable source regardless of who anchored.
    assert_eq!(result.lines, ["from a"]);
    assert_eq!(result.gaps_filled, 1);
}

// ============================================================================
// Input contract
// ============================================================================

#[test]
fn inputs_are_not_mutated_by_the_merge() {
    let a = EngineResult::ok(
        "A",
        vec![item("z-last", 200, 220, 0.9), item("a-first", 100, 120, 0.9)],
    );
    let before = a.clone();
    let _ = merge_page(std::slice::from_ref(&a), &params(1)).unwrap();
    assert_eq!(a, before);
}

#[test]
fn engine_results_decode_from_collector_json() {
    let fixture = r#"[
        {
            "engine": "tesseract",
            "items": [
                {"text": "hello ", "bbox": {"x1": 0, "y1": 100, "x2": 80, "y2": 120}, "confidence": 0.81},
                {"text": "world", "bbox": {"x1": 90, "y1": 101, "x2": 170, "y2": 121}, "confidence": 0.77}
            ],
            "success": true
        },
        {
            "engine": "paddle",
            "items": [
                {"text": "hello world", "bbox": {"x1": 0, "y1": 99, "x2": 170, "y2": 119}, "confidence": 0.97}
            ],
            "success": true
        },
        {
            "engine": "easyocr",
            "items": [],
            "success": false,
            "error": "model not loaded"
        }
    ]"#;

    let results: Vec<EngineResult> = serde_json::from_str(fixture).unwrap();
    assert_eq!(results.len(), 3);
    assert_eq!(results[0].text(12.0), "hello world");

    let result = merge_page(&results, &MergeParams::default()).unwrap();
    assert_eq!(result.lines, ["hello world"]);
    assert_eq!(result.gaps_filled, 0);
}
