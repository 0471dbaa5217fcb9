// Unit tests for the mirror clustering engine.
//
// Exercises the three signal layers and their priority rules directly
// against detect_in_group, with hand-built records and lookups. No
// database access.

use std::collections::HashMap;

use mirage::db::models::{RecordMetadata, ScrapedRecord, SocialHandles};
use mirage::mirror::engine::{detect_in_group, MirrorThresholds, MirrorType};
use mirage::mirror::tfidf::{cosine, TfIdfVectorizer};

fn record(url: &str, title: &str, raw_text: &str) -> ScrapedRecord {
    ScrapedRecord {
        url: url.to_string(),
        title: title.to_string(),
        raw_text: raw_text.to_string(),
        ..Default::default()
    }
}

fn lookup_of(records: &[ScrapedRecord]) -> HashMap<String, ScrapedRecord> {
    records
        .iter()
        .map(|r| (r.url.clone(), r.clone()))
        .collect()
}

fn urls_of(records: &[ScrapedRecord]) -> Vec<String> {
    records.iter().map(|r| r.url.clone()).collect()
}

const MEDS_TEXT: &str = "Cheap meds shop for bulk pharmaceutical orders, escrow protected, \
                         worldwide stealth shipping, vendor accounts open";

// ============================================================
// Exact layer
// ============================================================

#[test]
fn identical_content_on_two_domains_is_an_exact_cluster() {
    let records = vec![
        record("http://a.onion/", "Cheap Meds Shop", MEDS_TEXT),
        // Differs only by case and whitespace layout
        record("http://b.onion/", "Cheap Meds Shop", &MEDS_TEXT.to_uppercase()),
    ];
    let clusters = detect_in_group(
        "Cheap Meds Shop",
        &urls_of(&records),
        &lookup_of(&records),
        &MirrorThresholds::default(),
    );

    assert_eq!(clusters.len(), 1);
    assert_eq!(clusters[0].mirror_type, MirrorType::Exact);
    assert_eq!(clusters[0].confidence, 1.0);
    assert_eq!(clusters[0].domains, vec!["a.onion", "b.onion"]);
}

#[test]
fn same_domain_paths_never_form_a_cluster() {
    let records = vec![
        record("http://forum.onion/board1", "Forum X", MEDS_TEXT),
        record("http://forum.onion/board2", "Forum X", MEDS_TEXT),
    ];
    let clusters = detect_in_group(
        "Forum X",
        &urls_of(&records),
        &lookup_of(&records),
        &MirrorThresholds::default(),
    );
    assert!(clusters.is_empty(), "Domain diversity of 1 must yield no cluster");
}

#[test]
fn same_domain_duplicates_ride_along_in_a_diverse_cluster() {
    let records = vec![
        record("http://a.onion/x", "Shop", MEDS_TEXT),
        record("http://a.onion/y", "Shop", MEDS_TEXT),
        record("http://b.onion/", "Shop", MEDS_TEXT),
    ];
    let clusters = detect_in_group(
        "Shop",
        &urls_of(&records),
        &lookup_of(&records),
        &MirrorThresholds::default(),
    );

    // Both a.onion paths join through b.onion; the cluster spans 2 domains
    assert_eq!(clusters.len(), 1);
    assert_eq!(clusters[0].urls.len(), 3);
    assert_eq!(clusters[0].domains, vec!["a.onion", "b.onion"]);
}

#[test]
fn precomputed_text_hashes_are_honored() {
    let mut a = record("http://a.onion/", "Shop", "text one");
    a.text_hash = Some("samehash".to_string());
    let mut b = record("http://b.onion/", "Shop", "text two");
    b.text_hash = Some("samehash".to_string());

    let records = vec![a, b];
    let clusters = detect_in_group(
        "Shop",
        &urls_of(&records),
        &lookup_of(&records),
        &MirrorThresholds::default(),
    );
    assert_eq!(clusters.len(), 1);
    assert_eq!(clusters[0].mirror_type, MirrorType::Exact);
}

// ============================================================
// Operator-linkage layer
// ============================================================

fn with_identifiers(mut r: ScrapedRecord, wallets: &[&str], emails: &[&str]) -> ScrapedRecord {
    r.metadata = RecordMetadata {
        btc_wallets: wallets.iter().map(|w| w.to_string()).collect(),
        emails: emails.iter().map(|e| e.to_string()).collect(),
        pgp_keys: Vec::new(),
    };
    r
}

#[test]
fn shared_identifiers_above_half_jaccard_link_domains() {
    // 3 of 4 identifiers shared: Jaccard 0.75
    let records = vec![
        with_identifiers(
            record("http://a.onion/", "Shop", "first page text"),
            &["w1"],
            &["s1@x.com", "s2@x.com"],
        ),
        with_identifiers(
            record("http://b.onion/", "Shop", "second page text"),
            &["w1"],
            &["s1@x.com", "s2@x.com", "extra@x.com"],
        ),
    ];
    let clusters = detect_in_group(
        "Shop",
        &urls_of(&records),
        &lookup_of(&records),
        &MirrorThresholds::default(),
    );

    assert_eq!(clusters.len(), 1);
    assert_eq!(clusters[0].mirror_type, MirrorType::OperatorLinked);
    assert!((clusters[0].confidence - 0.75).abs() < 1e-9);
    assert_eq!(
        clusters[0].shared_metadata,
        vec!["btc:w1", "email:s1@x.com", "email:s2@x.com"]
    );
}

#[test]
fn jaccard_exactly_half_does_not_link() {
    // {w1, e1} vs {w1, e1, e2, e3}: 2 of 4 shared, Jaccard 0.5 (threshold
    // is exclusive)
    let records = vec![
        with_identifiers(record("http://a.onion/", "Shop", "first page"), &["w1"], &["e1@x.com"]),
        with_identifiers(
            record("http://b.onion/", "Shop", "second page"),
            &["w1"],
            &["e1@x.com", "e2@x.com", "e3@x.com"],
        ),
    ];
    let clusters = detect_in_group(
        "Shop",
        &urls_of(&records),
        &lookup_of(&records),
        &MirrorThresholds::default(),
    );
    assert!(clusters.is_empty());
}

// ============================================================
// Priority and mixed-signal clusters
// ============================================================

#[test]
fn exact_pair_dominates_cluster_type() {
    // a-b exact; a-c operator-linked (Jaccard 0.6). One cluster, type
    // exact, confidence 1.0, wallet still reported in shared metadata.
    let a = with_identifiers(
        record("http://a.onion/", "Cheap Meds Shop", MEDS_TEXT),
        &["wallet1"],
        &["s1@x.com", "s2@x.com"],
    );
    // tg handle pushes a's set to 4 identifiers so a∩c = 3, a∪c = 5
    let a = ScrapedRecord {
        social_handles: SocialHandles {
            telegram: vec!["@meds".to_string()],
            ..Default::default()
        },
        ..a
    };
    let b = record("http://b.onion/", "Cheap Meds Shop", MEDS_TEXT);
    let c = ScrapedRecord {
        social_handles: SocialHandles {
            telegram: vec!["@meds".to_string()],
            ..Default::default()
        },
        ..with_identifiers(
            record("http://c.onion/", "Cheap Meds Shop", "totally different storefront text"),
            &["wallet1"],
            &["s1@x.com", "other@x.com"],
        )
    };

    let records = vec![a, b, c];
    let clusters = detect_in_group(
        "Cheap Meds Shop",
        &urls_of(&records),
        &lookup_of(&records),
        &MirrorThresholds::default(),
    );

    assert_eq!(clusters.len(), 1);
    let cluster = &clusters[0];
    assert_eq!(cluster.mirror_type, MirrorType::Exact);
    assert_eq!(cluster.confidence, 1.0);
    assert_eq!(cluster.domains.len(), 3);
    assert!(cluster.shared_metadata.contains(&"btc:wallet1".to_string()));
}

#[test]
fn higher_confidence_signal_wins_without_an_exact_pair() {
    // a-b near (high but < 1.0); b-c operator with full identifier overlap
    // (Jaccard 1.0), so the cluster takes the operator type.
    let base = "hidden marketplace selling rare alchemical reagents with escrow protection \
                and fast worldwide shipping from trusted vendors premium quality guaranteed \
                discreet packaging options available";
    let a = record("http://a.onion/", "Shop", &format!("{base} alpha"));
    let b = with_identifiers(
        record("http://b.onion/", "Shop", &format!("{base} beta")),
        &["w9"],
        &["ops@x.com"],
    );
    let c = with_identifiers(
        record(
            "http://c.onion/",
            "Shop",
            "entirely different text about knitting patterns and wool suppliers in rural areas",
        ),
        &["w9"],
        &["ops@x.com"],
    );

    let records = vec![a, b, c];
    let clusters = detect_in_group(
        "Shop",
        &urls_of(&records),
        &lookup_of(&records),
        &MirrorThresholds::default(),
    );

    assert_eq!(clusters.len(), 1);
    let cluster = &clusters[0];
    assert_eq!(cluster.mirror_type, MirrorType::OperatorLinked);
    assert!((cluster.confidence - 1.0).abs() < 1e-9);
    assert_eq!(cluster.domains.len(), 3);
}

// ============================================================
// Near layer thresholds
// ============================================================

#[test]
fn near_threshold_is_inclusive() {
    let base = "hidden marketplace selling rare alchemical reagents with escrow protection \
                and fast worldwide shipping from trusted vendors premium quality guaranteed \
                discreet packaging options available";
    let text_a = format!("{base} alpha");
    let text_b = format!("{base} beta");
    let decoy = "entirely different text about knitting patterns and wool suppliers in rural areas";

    // Compute the actual similarity the engine will see
    let vectors = TfIdfVectorizer::default()
        .fit_transform(&[&text_a, &text_b, decoy])
        .unwrap();
    let similarity = cosine(&vectors[0], &vectors[1]);
    assert!(similarity > 0.5 && similarity < 1.0);

    let records = vec![
        record("http://a.onion/", "Shop", &text_a),
        record("http://b.onion/", "Shop", &text_b),
        record("http://d.onion/", "Shop", decoy),
    ];
    let urls = urls_of(&records);
    let lookup = lookup_of(&records);

    // At exactly the similarity: merged
    let at = MirrorThresholds {
        near_similarity: similarity,
        ..Default::default()
    };
    let clusters = detect_in_group("Shop", &urls, &lookup, &at);
    assert_eq!(clusters.len(), 1);
    assert_eq!(clusters[0].mirror_type, MirrorType::Near);
    assert_eq!(clusters[0].domains, vec!["a.onion", "b.onion"]);

    // Just above it: not merged
    let above = MirrorThresholds {
        near_similarity: similarity + 1e-6,
        ..Default::default()
    };
    assert!(detect_in_group("Shop", &urls, &lookup, &above).is_empty());
}

#[test]
fn short_texts_sit_out_the_near_layer() {
    // Both under the 50-char floor, different content, no identifiers
    let records = vec![
        record("http://a.onion/", "Shop", "short text one"),
        record("http://b.onion/", "Shop", "short text two"),
    ];
    let clusters = detect_in_group(
        "Shop",
        &urls_of(&records),
        &lookup_of(&records),
        &MirrorThresholds::default(),
    );
    assert!(clusters.is_empty());
}

#[test]
fn vectorization_failure_is_absorbed() {
    // Long enough to qualify but all stop words: the vectorizer fails and
    // the near layer is skipped without killing the group.
    let stopword_text = "the and of or but if then else when where how why the and of or but \
                         if then else when where how why";
    let records = vec![
        record("http://a.onion/", "Shop", stopword_text),
        record("http://b.onion/", "Shop", stopword_text),
    ];
    // Identical text still matches via the exact layer
    let clusters = detect_in_group(
        "Shop",
        &urls_of(&records),
        &lookup_of(&records),
        &MirrorThresholds::default(),
    );
    assert_eq!(clusters.len(), 1);
    assert_eq!(clusters[0].mirror_type, MirrorType::Exact);
}

// ============================================================
// Degenerate inputs and determinism
// ============================================================

#[test]
fn urls_missing_from_the_lookup_are_dropped() {
    let records = vec![
        record("http://a.onion/", "Shop", MEDS_TEXT),
        record("http://b.onion/", "Shop", MEDS_TEXT),
    ];
    let mut urls = urls_of(&records);
    urls.push("http://never-scraped.onion/".to_string());

    let clusters = detect_in_group(
        "Shop",
        &urls,
        &lookup_of(&records),
        &MirrorThresholds::default(),
    );
    assert_eq!(clusters.len(), 1);
    assert_eq!(clusters[0].urls.len(), 2);
}

#[test]
fn fewer_than_two_valid_records_yields_nothing() {
    let records = vec![record("http://a.onion/", "Shop", MEDS_TEXT)];
    let urls = vec![
        "http://a.onion/".to_string(),
        "http://gone.onion/".to_string(),
    ];
    assert!(detect_in_group("Shop", &urls, &lookup_of(&records), &MirrorThresholds::default())
        .is_empty());
}

#[test]
fn clustering_is_deterministic() {
    let a = with_identifiers(
        record("http://a.onion/", "Shop", MEDS_TEXT),
        &["wallet1"],
        &["s1@x.com"],
    );
    let b = record("http://b.onion/", "Shop", MEDS_TEXT);
    let c = with_identifiers(
        record("http://c.onion/", "Shop", "another storefront with different words"),
        &["wallet1"],
        &["s1@x.com"],
    );
    let records = vec![a, b, c];
    let urls = urls_of(&records);
    let lookup = lookup_of(&records);

    let first = detect_in_group("Shop", &urls, &lookup, &MirrorThresholds::default());
    for _ in 0..10 {
        let again = detect_in_group("Shop", &urls, &lookup, &MirrorThresholds::default());
        assert_eq!(again, first);
    }
}
