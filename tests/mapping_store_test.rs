//! Integration tests for the anonymization mapping store
//!
//! The store is the consistency guarantee of the whole system: these tests
//! cover determinism across process restarts, the identity rule for blank
//! input, CPF/CNPJ shape branching and the insert-or-fetch race contract.

use mascara::domain::SensitivityLabel;
use mascara::mapping::{FakeValueGenerator, LocaleKey, MappingStore};
use std::sync::{Arc, Barrier};
use std::thread;
use tempfile::tempdir;

fn generator() -> FakeValueGenerator {
    FakeValueGenerator::new(LocaleKey::PtBr)
}

#[test]
fn test_determinism_across_reopens() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("mappings.db");

    let originals = [
        ("Alice Smith", SensitivityLabel::Name),
        ("alice@example.com", SensitivityLabel::Email),
        ("123.456.789-00", SensitivityLabel::CpfCnpj),
        ("(11) 91234-5678", SensitivityLabel::Phone),
        ("4444-5555-6666-7777", SensitivityLabel::CreditCard),
    ];

    let first_run: Vec<String> = {
        let store = MappingStore::open(&path, generator()).unwrap();
        originals
            .iter()
            .map(|(value, label)| store.fake_value(value, *label).unwrap())
            .collect()
    };

    // A fresh process over the same backing file must reproduce every value
    let store = MappingStore::open(&path, generator()).unwrap();
    for ((value, label), expected) in originals.iter().zip(first_run.iter()) {
        assert_eq!(&store.fake_value(value, *label).unwrap(), expected);
    }
}

#[test]
fn test_identity_passthrough() {
    let store = MappingStore::open_in_memory(generator()).unwrap();

    assert_eq!(
        store
            .fake_for_nullable(None, SensitivityLabel::Email)
            .unwrap(),
        None
    );
    assert_eq!(store.fake_value("", SensitivityLabel::Email).unwrap(), "");
    assert_eq!(
        store.fake_value("   ", SensitivityLabel::Email).unwrap(),
        "   "
    );

    // Blank values are never cached
    assert!(store.is_empty().unwrap());
}

#[test]
fn test_cpf_cnpj_branching_on_digit_count() {
    let store = MappingStore::open_in_memory(generator()).unwrap();

    // 11 digits or fewer: CPF-shaped (###.###.###-##)
    let cpf_fake = store
        .fake_value("12345678900", SensitivityLabel::CpfCnpj)
        .unwrap();
    assert_eq!(cpf_fake.len(), 14);
    assert!(!cpf_fake.contains('/'));

    // More than 11 digits: CNPJ-shaped (##.###.###/####-##)
    let cnpj_fake = store
        .fake_value("12345678000190", SensitivityLabel::CpfCnpj)
        .unwrap();
    assert_eq!(cnpj_fake.len(), 18);
    assert!(cnpj_fake.contains('/'));

    // A slash alone forces the CNPJ branch regardless of digit count
    let slash_fake = store
        .fake_value("123/456", SensitivityLabel::CpfCnpj)
        .unwrap();
    assert!(slash_fake.contains('/'));
}

#[test]
fn test_insert_or_fetch_race_converges() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("mappings.db");

    let barrier = Arc::new(Barrier::new(2));
    let mut handles = Vec::new();

    for _ in 0..2 {
        let barrier = Arc::clone(&barrier);
        let path = path.clone();
        handles.push(thread::spawn(move || {
            // Each thread has its own store instance, as two independent
            // processes sharing the backing file would
            let store = MappingStore::open(&path, generator()).unwrap();
            barrier.wait();
            store
                .fake_value("race@example.com", SensitivityLabel::Email)
                .unwrap()
        }));
    }

    let results: Vec<String> = handles
        .into_iter()
        .map(|handle| handle.join().unwrap())
        .collect();

    // Both callers must observe the single surviving mapping
    assert_eq!(results[0], results[1]);

    let store = MappingStore::open(&path, generator()).unwrap();
    assert_eq!(store.len().unwrap(), 1);
    let entries = store.list_mappings(10).unwrap();
    assert_eq!(entries[0].fake_value, results[0]);
}

#[test]
fn test_same_original_different_labels_are_independent_keys() {
    let store = MappingStore::open_in_memory(generator()).unwrap();

    store.fake_value("admin", SensitivityLabel::Login).unwrap();
    store.fake_value("admin", SensitivityLabel::Token).unwrap();

    assert_eq!(store.len().unwrap(), 2);
    let entries = store.list_mappings(10).unwrap();
    let mut labels: Vec<&str> = entries
        .iter()
        .map(|e| e.sensitivity_type.as_str())
        .collect();
    labels.sort_unstable();
    assert_eq!(labels, vec!["LOGIN", "TOKEN"]);
}
