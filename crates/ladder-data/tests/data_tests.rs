// Tests for ladder-data: Corpus, windows, pipelines

use std::io::Write;
use std::sync::Arc;

use ladder_data::{
    windows, Cardinality, CollapseWhitespace, Corpus, Dataset, DatasetExt, Error, Lowercase,
    PipelineConfig, WindowDataset,
};
use proptest::prelude::*;

fn corpus(text: &str) -> Arc<Corpus> {
    Arc::new(Corpus::from_text(text))
}

// Corpus loading

#[test]
fn test_corpus_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "curriculum").unwrap();
    let c = Corpus::from_path(file.path()).unwrap();
    assert_eq!(c.char_len(), 10);
    assert_eq!(c.source(), Some(file.path()));
    assert_eq!(c.window(0, 5), Some("curri"));
}

#[test]
fn test_corpus_rejects_invalid_utf8() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(&[0x66, 0xff, 0xfe, 0x67]).unwrap();
    let err = Corpus::from_path(file.path()).unwrap_err();
    match err {
        Error::Io { source, .. } => assert_eq!(source.kind(), std::io::ErrorKind::InvalidData),
        other => panic!("expected Io error, got {other:?}"),
    }
}

// Window generator

#[test]
fn test_window_dataset_cardinality_matches_stream() {
    let c = corpus("the quick brown fox");
    for len in [1, 4, 18, 19, 25] {
        let ds = WindowDataset::new(c.clone(), len).unwrap();
        let n = ds.iter().unwrap().count();
        assert_eq!(ds.cardinality(), Cardinality::Finite(n));
        assert_eq!(n, 19usize.saturating_sub(len));
    }
}

#[test]
fn test_windows_over_unicode() {
    let got: Vec<String> = windows(corpus("日本語です"), 2).unwrap().collect();
    assert_eq!(got, vec!["日本", "本語", "語で"]);
}

proptest! {
    #[test]
    fn prop_window_count_length_overlap(text in "[a-z ]{0,200}", len in 1usize..40) {
        let c = corpus(&text);
        let got: Vec<String> = windows(c.clone(), len).unwrap().collect();

        prop_assert_eq!(got.len(), text.len().saturating_sub(len));
        for w in &got {
            prop_assert_eq!(w.chars().count(), len);
        }
        for pair in got.windows(2) {
            prop_assert_eq!(&pair[0][1..], &pair[1][..len - 1]);
        }
        for (start, w) in got.iter().enumerate() {
            prop_assert_eq!(w.as_str(), &text[start..start + len]);
        }
    }

    #[test]
    fn prop_unicode_windows_have_char_length(text in "\\PC{0,80}", len in 1usize..10) {
        let c = corpus(&text);
        let n = text.chars().count();
        let got: Vec<String> = windows(c, len).unwrap().collect();
        prop_assert_eq!(got.len(), n.saturating_sub(len));
        for w in &got {
            prop_assert_eq!(w.chars().count(), len);
        }
    }
}

// Pipelines over windows

#[test]
fn test_window_pipeline_batches_every_window() {
    let c = corpus("abcdefghij");
    let ds = WindowDataset::new(c, 3).unwrap();
    let cfg = PipelineConfig::default()
        .seed(1)
        .shuffle_buffer(100)
        .repeat(Some(1))
        .batch_size(2)
        .prefetch(2);
    let batches = cfg.build(ds).unwrap();
    assert_eq!(batches.cardinality(), Cardinality::Finite(4));

    let mut all: Vec<String> = batches
        .iter()
        .unwrap()
        .flat_map(|b| b.unwrap())
        .collect();
    all.sort();
    assert_eq!(
        all,
        vec!["abc", "bcd", "cde", "def", "efg", "fgh", "ghi"]
    );
}

#[test]
fn test_transforms_in_pipeline() {
    let c = corpus("A  B\n\nC  D");
    let ds = WindowDataset::new(c, 5)
        .unwrap()
        .map(CollapseWhitespace)
        .map(Lowercase)
        .take(1);
    let got: Vec<String> = ds.iter().unwrap().map(|r| r.unwrap()).collect();
    assert_eq!(got, vec!["a b "]);
}

#[test]
fn test_parallel_map_over_windows() {
    let c = corpus("abcdefgh");
    let ds = WindowDataset::new(c, 4)
        .unwrap()
        .map_parallel(|w: String| w.to_uppercase(), 3)
        .unwrap();
    let got: Vec<String> = ds.iter().unwrap().map(|r| r.unwrap()).collect();
    assert_eq!(got, vec!["ABCD", "BCDE", "CDEF", "DEFG"]);
}

#[test]
fn test_repeated_windows_cycle() {
    let c = corpus("abcd");
    let ds = WindowDataset::new(c, 2).unwrap().repeat(None).take(7);
    let got: Vec<String> = ds.iter().unwrap().map(|r| r.unwrap()).collect();
    assert_eq!(got, vec!["ab", "bc", "ab", "bc", "ab", "bc", "ab"]);
}

#[test]
fn test_empty_phase_pipeline_ends() {
    let c = corpus("ab");
    let ds = WindowDataset::new(c, 8).unwrap();
    let batches = PipelineConfig::default().seed(3).build(ds).unwrap();
    assert_eq!(batches.cardinality(), Cardinality::Finite(0));
    assert!(batches.iter().unwrap().next().is_none());
}
