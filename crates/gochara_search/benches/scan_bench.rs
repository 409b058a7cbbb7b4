#[path = "../tests/common/mod.rs"]
mod common;

use chrono::NaiveDate;
use criterion::{Criterion, black_box, criterion_group, criterion_main};
use gochara_search::{
    NatalPoint, NatalPointId, NatalReference, PhaseConfig, ScanRequest, ScanSettings,
    find_lunar_phases, run_scan,
};

use common::{JAN_1_2024, Synthetic};

fn year_request() -> ScanRequest {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid date");
    let end = NaiveDate::from_ymd_opt(2024, 12, 31).expect("valid date");
    let mut request = ScanRequest::new(start, end);
    request.natal = Some(NatalReference {
        points: ["SUN", "MOON", "MERCURY", "VENUS", "MARS", "ASC", "MC"]
            .iter()
            .zip([280.5, 45.0, 265.0, 300.2, 12.0, 15.0, 285.0])
            .map(|(id, longitude_deg)| NatalPoint {
                id: NatalPointId::new(*id),
                longitude_deg,
                orb_deg: None,
            })
            .collect(),
        houses: None,
    });
    request
}

fn scan_bench(c: &mut Criterion) {
    let provider = Synthetic::solar_system(JAN_1_2024);
    let request = year_request();
    let settings = ScanSettings::default();

    let mut group = c.benchmark_group("scan");
    group.sample_size(10);
    group.bench_function("year_with_natal", |b| {
        b.iter(|| {
            run_scan(
                black_box(&provider),
                black_box(&request),
                black_box(&settings),
                None,
            )
            .expect("scan should succeed")
        })
    });
    group.finish();
}

fn lunar_phase_bench(c: &mut Criterion) {
    let provider = Synthetic::solar_system(JAN_1_2024);
    let config = PhaseConfig::default();

    let mut group = c.benchmark_group("lunar_phase");
    group.sample_size(20);
    group.bench_function("year", |b| {
        b.iter(|| {
            find_lunar_phases(
                black_box(&provider),
                JAN_1_2024,
                JAN_1_2024 + 366.0,
                black_box(&config),
            )
        })
    });
    group.finish();
}

criterion_group!(benches, scan_bench, lunar_phase_bench);
criterion_main!(benches);
