use criterion::{black_box, criterion_group, criterion_main, Criterion};

use hopechain_intake::anonymizer::anonymize;
use hopechain_intake::emotion::analyze_emotion;
use hopechain_intake::pipeline::analyze_text;

const SHORT: &str = "My name is Asha, I am scared and hungry, please help, call 555-123-4567";

fn long_text() -> String {
    let paragraph = "We walked from the camp for three days. I miss my school and my teacher. \
                     Sometimes I feel sad and alone, but I still hope to study again. \
                     Email maria@example.org or call +254 712 345 678. ";
    paragraph.repeat(40)
}

fn bench_pipeline(c: &mut Criterion) {
    let long = long_text();

    c.bench_function("anonymize_short", |b| b.iter(|| anonymize(black_box(SHORT))));
    c.bench_function("emotion_long", |b| b.iter(|| analyze_emotion(black_box(&long))));
    c.bench_function("analyze_text_short", |b| b.iter(|| analyze_text(black_box(SHORT))));
    c.bench_function("analyze_text_long", |b| b.iter(|| analyze_text(black_box(&long))));
}

criterion_group!(benches, bench_pipeline);
criterion_main!(benches);
