//! Traversal option defaults and builder behaviour

use regex::Regex;
use sturdyfs::fs::{EntityFilter, TraversalAction, TraversalOptions};

#[test]
fn test_defaults() {
    let options = TraversalOptions::new();
    assert!(!options.full_paths);
    assert!(!options.recurse);
    assert_eq!(options.entities, EntityFilter::All);
    assert!(options.include.is_empty());
    assert!(options.exclude.is_empty());
    assert!(options.prune.is_empty());
    assert_eq!(options.max_depth, None);
    assert!(!options.stop_on_first_match);
    assert!(!options.throw_on_missing_root);
    assert!(options.on_error.is_none());
}

#[test]
fn test_builder_accumulates_patterns() {
    let options = TraversalOptions::new()
        .include(Regex::new("a").unwrap())
        .include(Regex::new("b").unwrap())
        .exclude(Regex::new("c").unwrap())
        .prune(Regex::new("node_modules").unwrap());

    assert_eq!(options.include.len(), 2);
    assert_eq!(options.exclude.len(), 1);
    assert_eq!(options.prune.len(), 1);
}

#[test]
fn test_debug_hides_handler() {
    let options = TraversalOptions::new().on_error(|_, _| TraversalAction::Continue);
    let rendered = format!("{options:?}");
    assert!(rendered.contains("<handler>"));

    let cloned = options.clone();
    assert!(cloned.on_error.is_some());
}
