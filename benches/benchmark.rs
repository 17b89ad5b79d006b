//! Benchmarks for segmentation, store operations and persistence.
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use scriptcut::{segment, ProjectDocument, Section, SectionPatch, SectionStore, VoiceSettings};

const PARAGRAPH: &str = "Welcome to our product demo! Today I'll show you how our revolutionary \
    new app can transform your daily workflow. First, let's look at the main dashboard where \
    you can see all your projects at a glance; the clean interface makes it easy to navigate \
    between different tasks, projects, and teammates.\n";

fn script_of(paragraphs: usize) -> String {
    PARAGRAPH.repeat(paragraphs)
}

fn store_of(sections: usize) -> SectionStore {
    let mut store = SectionStore::new();
    store.set_sections(
        (1..=sections)
            .map(|i| {
                Section::new(i.to_string(), format!("Section text number {}", i))
                    .with_title(format!("Section {}", i))
            })
            .collect(),
    );
    store
}

fn bench_segment(c: &mut Criterion) {
    let mut group = c.benchmark_group("segment");
    for paragraphs in [1usize, 10, 100] {
        let script = script_of(paragraphs);
        group.bench_with_input(
            BenchmarkId::from_parameter(paragraphs),
            &script,
            |b, script| b.iter(|| black_box(segment(script))),
        );
    }
    group.finish();
}

fn bench_from_script(c: &mut Criterion) {
    let script = script_of(10);
    c.bench_function("from_script_10_paragraphs", |b| {
        b.iter(|| black_box(SectionStore::from_script(&script).unwrap()))
    });
}

fn bench_update_section(c: &mut Criterion) {
    c.bench_function("update_section_last_of_500", |b| {
        let mut store = store_of(500);
        b.iter(|| {
            store.update_section(
                "500",
                SectionPatch::new().voice_settings(VoiceSettings::default().with_speed(1.5)),
            );
        })
    });
}

fn bench_merge_sections(c: &mut Criterion) {
    c.bench_function("merge_all_into_first_of_200", |b| {
        b.iter_batched(
            || store_of(200),
            |mut store| {
                for i in 2..=200 {
                    store.merge_sections(&i.to_string());
                }
                black_box(store)
            },
            criterion::BatchSize::SmallInput,
        )
    });
}

fn bench_save_load(c: &mut Criterion) {
    let mut group = c.benchmark_group("document");
    for sections in [10usize, 100] {
        let store = store_of(sections);
        group.bench_with_input(BenchmarkId::new("save", sections), &store, |b, store| {
            b.iter(|| {
                let mut doc = ProjectDocument::from_store(store).unwrap();
                black_box(doc.save())
            })
        });

        let bytes = ProjectDocument::from_store(&store).unwrap().save();
        group.bench_with_input(BenchmarkId::new("load", sections), &bytes, |b, bytes| {
            b.iter(|| {
                let mut doc = ProjectDocument::from_bytes(bytes).unwrap();
                black_box(doc.to_store().unwrap())
            })
        });
    }
    group.finish();
}

fn bench_commit_after_edit(c: &mut Criterion) {
    c.bench_function("commit_store_after_edit_100", |b| {
        let mut store = store_of(100);
        let mut doc = ProjectDocument::from_store(&store).unwrap();
        let mut i = 0u64;
        b.iter(|| {
            store.update_section("50", SectionPatch::new().title(format!("Edited {}", i)));
            doc.commit_store(&store).unwrap();
            i += 1;
        })
    });
}

criterion_group!(
    benches,
    bench_segment,
    bench_from_script,
    bench_update_section,
    bench_merge_sections,
    bench_save_load,
    bench_commit_after_edit,
);
criterion_main!(benches);
