use chrono::Utc;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use multichat::api::ChatMessage;
use multichat::core::catalog::{ProviderId, Selection};
use multichat::utils::logging::{AuditLogger, RasEntry, RasRequest, RasResponse};
use tempfile::TempDir;

fn make_entry(turns: usize, base: &str) -> RasEntry {
    let now = Utc::now();
    let prompts = (0..turns)
        .map(|i| {
            let role = if i % 2 == 0 { "user" } else { "assistant" };
            ChatMessage::new(role, base)
        })
        .collect();
    RasEntry {
        timestamp: now,
        model: Selection::new(ProviderId::OpenAi, "gpt-4"),
        request: RasRequest {
            timestamp: now,
            model: "gpt-4".to_string(),
            prompts,
        },
        response: RasResponse::Success {
            timestamp: now,
            duration_ms: 850,
            output: base.to_string(),
        },
    }
}

fn bench_ras_append(c: &mut Criterion) {
    let base = "lorem ipsum dolor sit amet consectetur adipiscing elit sed do eiusmod tempor incididunt ut labore et dolore magna aliqua";
    // A full default history window per request.
    let entry = make_entry(10, base);

    let mut group = c.benchmark_group("ras_append");
    group.throughput(Throughput::Elements(1));

    for &existing in &[0usize, 100, 500] {
        let dir = TempDir::new().expect("temp dir");
        let logger = AuditLogger::provision(dir.path().join("logs")).expect("provision");
        for _ in 0..existing {
            logger.log_ras(&entry).expect("seed");
        }
        let path = logger.ras_path(&entry.timestamp);
        let seeded = std::fs::read(&path).unwrap_or_default();

        group.bench_function(BenchmarkId::new("existing_entries", existing), |b| {
            b.iter(|| {
                // Reset so every iteration appends to a day file of the same size.
                if seeded.is_empty() {
                    let _ = std::fs::remove_file(&path);
                } else {
                    std::fs::write(&path, &seeded).expect("reset");
                }
                logger.log_ras(&entry).expect("append")
            })
        });
    }

    group.finish();
}

fn bench_transcript_append(c: &mut Criterion) {
    let dir = TempDir::new().expect("temp dir");
    let logger = AuditLogger::provision(dir.path().join("logs")).expect("provision");
    let turn = multichat::core::message::Turn::user("hello there, how are you today?");

    c.bench_function("transcript_append", |b| {
        b.iter(|| logger.log_turn(&turn, "openai/gpt-4").expect("append"))
    });
}

criterion_group!(benches, bench_ras_append, bench_transcript_append);
criterion_main!(benches);
