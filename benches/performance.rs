//! Performance benchmarks for extraction and rendering

use chrono::Utc;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use recon_report::output::{render_html, write_csv_to};
use recon_report::parse_records;

/// Synthetic nmap document with `hosts` hosts of `ports` ports each
fn scan_document(hosts: usize, ports: usize) -> String {
    let mut xml = String::from("<?xml version=\"1.0\"?>\n<nmaprun scanner=\"nmap\">\n");
    for h in 0..hosts {
        xml.push_str(&format!(
            "<host><status state=\"up\"/><address addr=\"10.0.{}.{}\" addrtype=\"ipv4\"/><ports>",
            h / 256,
            h % 256
        ));
        for p in 0..ports {
            xml.push_str(&format!(
                "<port protocol=\"tcp\" portid=\"{}\"><state state=\"open\" reason=\"syn-ack\"/>\
                 <service name=\"http\" product=\"nginx\" version=\"1.24.0\"/></port>",
                1000 + p
            ));
        }
        xml.push_str("</ports></host>\n");
    }
    xml.push_str("</nmaprun>\n");
    xml
}

fn bench_extraction(c: &mut Criterion) {
    let mut group = c.benchmark_group("extraction");

    for (hosts, ports) in [(1, 10), (256, 10), (1024, 50)] {
        let xml = scan_document(hosts, ports);
        group.bench_with_input(
            BenchmarkId::new("parse_records", hosts * ports),
            &xml,
            |b, xml| b.iter(|| black_box(parse_records(black_box(xml.as_bytes())).unwrap())),
        );
    }

    group.finish();
}

fn bench_rendering(c: &mut Criterion) {
    let records = parse_records(scan_document(256, 20).as_bytes()).unwrap();
    let targets = vec!["10.0.0.0/23".to_string()];
    let now = Utc::now();

    let mut group = c.benchmark_group("rendering");
    group.bench_function("html_5120_rows", |b| {
        b.iter(|| black_box(render_html(black_box(&records), &targets, now)))
    });
    group.bench_function("csv_5120_rows", |b| {
        b.iter(|| {
            let mut buffer = Vec::with_capacity(512 * 1024);
            write_csv_to(black_box(&records), &mut buffer).unwrap();
            black_box(buffer)
        })
    });
    group.finish();
}

criterion_group!(benches, bench_extraction, bench_rendering);
criterion_main!(benches);
