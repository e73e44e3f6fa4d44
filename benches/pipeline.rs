//! Benchmarks for the narrative pipeline.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use narrative_ontology::export::{ExportFormat, Exporter};
use narrative_ontology::pipeline::NarrativeProcessor;
use narrative_ontology::taxonomy::Taxonomy;

const REPORT: &str = "Last quarter, we focused heavily on improving the onboarding experience, \
especially with the rollout of the new AI-powered insights feature. The engineering team worked \
closely with the design team to implement a streamlined workflow that reduced user friction by \
40%. The initiative was led by Sarah Johnson and supported by the product team throughout Q3. \
Moving forward into Q4, we aim to target enterprise customers.";

fn bench_classify(c: &mut Criterion) {
    let taxonomy = Taxonomy::default();

    c.bench_function("classify_text", |bench| {
        bench.iter(|| black_box(taxonomy.classify_text(black_box("engineering team in Q3"))))
    });
}

fn bench_process(c: &mut Criterion) {
    let processor = NarrativeProcessor::new();

    c.bench_function("process_report", |bench| {
        bench.iter(|| black_box(processor.process_narrative(REPORT, Some("bench")).unwrap()))
    });
}

fn bench_export(c: &mut Criterion) {
    let processor = NarrativeProcessor::new();
    let result = processor.process_narrative(REPORT, Some("bench")).unwrap();
    let exporter = Exporter::new(processor.taxonomy());

    c.bench_function("export_all_formats", |bench| {
        bench.iter(|| {
            for format in ExportFormat::ALL {
                black_box(exporter.render(&result.ontology, format).unwrap());
            }
        })
    });
}

criterion_group!(benches, bench_classify, bench_process, bench_export);
criterion_main!(benches);
