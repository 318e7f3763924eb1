use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use hashtool::crawler::{DirectoryCrawler, GenerateOptions, Generator};
use hashtool::digest::{Algorithm, hash_file, hash_reader};
use std::fs;
use std::hint::black_box;
use tempfile::tempdir;

fn benchmark_algorithms(c: &mut Criterion) {
    let data = vec![0x5au8; 1024 * 1024];
    let mut group = c.benchmark_group("hash_reader_1mb");
    group.throughput(Throughput::Bytes(data.len() as u64));

    for algorithm in Algorithm::ALL {
        group.bench_with_input(
            BenchmarkId::from_parameter(algorithm),
            &algorithm,
            |b, &algorithm| {
                b.iter(|| hash_reader(algorithm, black_box(data.as_slice())).unwrap());
            },
        );
    }
    group.finish();
}

fn benchmark_hash_file(c: &mut Criterion) {
    let dir = tempdir().unwrap();
    let path = dir.path().join("blob.bin");
    fs::write(&path, vec![7u8; 8 * 1024 * 1024]).unwrap();

    c.bench_function("hash_file_sha256_8mb", |b| {
        b.iter(|| hash_file(Algorithm::Sha256, black_box(&path)).unwrap());
    });
}

fn benchmark_generate_tree(c: &mut Criterion) {
    let dir = tempdir().unwrap();
    for d in 0..10 {
        let sub = dir.path().join(format!("dir_{d}"));
        fs::create_dir_all(&sub).unwrap();
        for f in 0..50 {
            fs::write(sub.join(format!("file_{f}.dat")), format!("{d}:{f}")).unwrap();
        }
    }

    let mut options = GenerateOptions::new(Algorithm::Md5);
    options.recursive = true;
    options.backup = false;
    let generator = Generator::new(options).unwrap();

    c.bench_function("generate_500_files", |b| {
        b.iter(|| generator.process_directory(black_box(dir.path())).unwrap());
    });
}

criterion_group!(
    benches,
    benchmark_algorithms,
    benchmark_hash_file,
    benchmark_generate_tree
);
criterion_main!(benches);
