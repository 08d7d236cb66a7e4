// Tests for ladder: curriculum phases fed through handles

use std::io::Write;
use std::sync::Arc;

use ladder::prelude::*;

const TEXT: &str = "Curriculum learning starts with short sequences and \
                    grows them as training goes on, one phase at a time.";

fn corpus() -> Arc<Corpus> {
    Arc::new(Corpus::from_text(TEXT))
}

fn pipeline() -> PipelineConfig {
    PipelineConfig::default()
        .seed(42)
        .shuffle_buffer(64)
        .batch_size(4)
        .prefetch(2)
}

#[test]
fn test_each_handle_yields_its_own_window_length() {
    let phases = vec![
        Phase::new("short", 4, 2),
        Phase::new("medium", 9, 2),
        Phase::new("long", 20, 2),
    ];
    let mut c = Curriculum::build(corpus(), phases, &pipeline()).unwrap();

    for (phase, len) in [("short", 4), ("medium", 9), ("long", 20)] {
        let handle = c.handle_by_name(phase).unwrap().clone();
        for _ in 0..3 {
            let batch = c.next_batch(handle.as_str()).unwrap();
            assert_eq!(batch.len(), 4);
            for window in &batch {
                assert_eq!(window.chars().count(), len);
                assert!(TEXT.contains(window.as_str()));
            }
        }
    }
}

#[test]
fn test_interleaved_feeding() {
    let phases = vec![Phase::new("short", 3, 1), Phase::new("long", 12, 1)];
    let mut c = Curriculum::build(corpus(), phases, &pipeline()).unwrap();
    let short = c.handle(0).unwrap().clone();
    let long = c.handle(1).unwrap().clone();

    for i in 0..10 {
        let (handle, len) = if i % 2 == 0 { (&short, 3) } else { (&long, 12) };
        let batch = c.next_batch(handle.as_str()).unwrap();
        assert!(batch.iter().all(|w| w.chars().count() == len));
    }
}

#[test]
fn test_unknown_handle_is_reported() {
    let mut c = Curriculum::build(corpus(), vec![Phase::new("only", 5, 1)], &pipeline()).unwrap();
    assert!(matches!(
        c.next_batch("ladder-iterator-bogus"),
        Err(Error::UnknownHandle { .. })
    ));
}

#[test]
fn test_run_follows_schedule() {
    let phases = vec![
        Phase::new("short", 4, 3),
        Phase::new("medium", 8, 2),
        Phase::new("long", 16, 1),
    ];
    let mut c = Curriculum::build(corpus(), phases, &pipeline()).unwrap();

    let mut seen = Vec::new();
    let summary = c
        .run(|phase, _handle, step, batch| {
            assert!(batch.iter().all(|w| w.chars().count() == phase.window_length));
            seen.push((step, phase.name.clone()));
            Ok(())
        })
        .unwrap();

    assert_eq!(summary.batches, 6);
    assert_eq!(summary.skipped_steps, 0);
    let names: Vec<&str> = seen.iter().map(|(_, n)| n.as_str()).collect();
    assert_eq!(
        names,
        vec!["short", "short", "short", "medium", "medium", "long"]
    );
    let steps: Vec<usize> = seen.iter().map(|(s, _)| *s).collect();
    assert_eq!(steps, vec![0, 1, 2, 3, 4, 5]);
}

#[test]
fn test_run_skips_phase_longer_than_corpus() {
    let phases = vec![
        Phase::new("fits", 5, 2),
        Phase::new("too-long", 10_000, 3),
        Phase::new("fits-again", 6, 1),
    ];
    let mut c = Curriculum::build(corpus(), phases, &pipeline()).unwrap();
    assert_eq!(c.cardinality(1), Some(Cardinality::Finite(0)));

    let mut lengths = Vec::new();
    let summary = c
        .run(|phase, _, _, _| {
            lengths.push(phase.window_length);
            Ok(())
        })
        .unwrap();
    assert_eq!(summary.batches, 3);
    assert_eq!(summary.skipped_steps, 3);
    assert_eq!(lengths, vec![5, 5, 6]);
}

#[test]
fn test_finite_repeat_runs_out() {
    // 20 windows of length 4, one pass, batches of 8: 3 batches then done.
    let text = "abcdefghijklmnopqrstuvwx";
    let cfg = PipelineConfig::default()
        .seed(1)
        .repeat(Some(1))
        .batch_size(8)
        .prefetch(0);
    let mut c = Curriculum::build(
        Arc::new(Corpus::from_text(text)),
        vec![Phase::new("one-pass", 4, 10)],
        &cfg,
    )
    .unwrap();

    let summary = c.run(|_, _, _, _| Ok(())).unwrap();
    assert_eq!(summary.batches, 3);
    assert_eq!(summary.skipped_steps, 7);
}

#[test]
fn test_callback_error_stops_run() {
    let mut c = Curriculum::build(corpus(), vec![Phase::new("p", 4, 5)], &pipeline()).unwrap();
    let mut calls = 0;
    let err = c
        .run(|_, _, step, _| {
            calls += 1;
            if step == 1 {
                ladder::bail!("stop at step {}", step);
            }
            Ok(())
        })
        .unwrap_err();
    assert_eq!(err.to_string(), "stop at step 1");
    assert_eq!(calls, 2);
}

#[test]
fn test_same_seed_same_batches() {
    let phases = || vec![Phase::new("p", 6, 1)];
    let mut a = Curriculum::build(corpus(), phases(), &pipeline()).unwrap();
    let mut b = Curriculum::build(corpus(), phases(), &pipeline()).unwrap();
    let ha = a.handle(0).unwrap().clone();
    let hb = b.handle(0).unwrap().clone();
    for _ in 0..5 {
        assert_eq!(
            a.next_batch(ha.as_str()).unwrap(),
            b.next_batch(hb.as_str()).unwrap()
        );
    }
}

#[test]
fn test_config_file_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let corpus_path = dir.path().join("corpus.txt");
    std::fs::write(&corpus_path, TEXT).unwrap();

    let config_path = dir.path().join("curriculum.toml");
    let mut file = std::fs::File::create(&config_path).unwrap();
    writeln!(
        file,
        r#"
corpus = "corpus.txt"

[pipeline]
batch_size = 2
shuffle_buffer = 32
seed = 5

[[phases]]
name = "tiny"
window_length = 3
steps = 2

[[phases]]
name = "big"
window_length = 11
steps = 2
"#
    )
    .unwrap();

    let config = CurriculumConfig::load(&config_path).unwrap();
    assert_eq!(config.corpus.as_deref(), Some(corpus_path.as_path()));

    let corpus = Corpus::from_path(config.corpus.as_ref().unwrap()).unwrap();
    let mut c = Curriculum::from_config(&config, Arc::new(corpus)).unwrap();
    let mut lengths = Vec::new();
    let summary = c
        .run(|phase, _, _, batch| {
            assert_eq!(batch.len(), 2);
            lengths.push(phase.window_length);
            Ok(())
        })
        .unwrap();
    assert_eq!(summary.batches, 4);
    assert_eq!(lengths, vec![3, 3, 11, 11]);
}

#[test]
fn test_missing_config_file() {
    let err = CurriculumConfig::load("/no/such/curriculum.toml").unwrap_err();
    assert!(matches!(err, Error::Io { .. }));
}
