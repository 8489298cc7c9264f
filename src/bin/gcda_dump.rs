//! gcda_dump - Demo embedding program
//!
//! Membangun coverage unit sintetis, mensimulasikan eksekusi program,
//! mengukur latency encode/reset, lalu dump lewat sink yang dipilih.
//!
//! Usage:
//!   cargo run --release --bin gcda_dump -- [OPTIONS]

use std::io;
use std::time::Instant;

use gcda_writer::config::{DumpConfig, OutputMode};
use gcda_writer::model::{CounterGroup, CounterKind, CoverageUnit, FunctionRecord};
use gcda_writer::sink::{dump, FileSink, GcdaSink, HexDumpSink, MemorySink};
use gcda_writer::{encode, encode_with, reset, GcovError};
use tracing_subscriber::EnvFilter;

/// gcc 13.x version magic ("B33*")
const DEMO_VERSION: u32 = 0x4233_332a;

/// Demo configuration
struct DemoConfig {
    dump: DumpConfig,
    source_name: String,
    functions: u32,
    counters_per_function: usize,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            dump: DumpConfig::from_env(),
            source_name: "gcda_demo.gcda".to_string(),
            functions: 64,
            counters_per_function: 16,
        }
    }
}

fn build_unit(config: &DemoConfig) -> Result<CoverageUnit, GcovError> {
    let functions = (0..config.functions).map(|ident| {
        FunctionRecord::new(
            ident,
            ident.wrapping_mul(0x9e37_79b9),
            ident ^ 0x5bd1_e995,
            vec![
                CounterGroup::zeroed(config.counters_per_function),
                CounterGroup::zeroed(1),
            ],
        )
    });

    CoverageUnit::builder(config.source_name.clone())
        .version(DEMO_VERSION)
        .stamp(0x6502_1337)
        .checksum(0xc0ff_ee00)
        .counter_kind(CounterKind::Arcs)
        .counter_kind(CounterKind::TimeProfiler)
        .functions(functions)
        .build()
}

/// Simulasi instrumentasi: increment arc counters secara deterministik
fn simulate_execution(unit: &mut CoverageUnit, steps: usize) {
    let mut state = 0x2545_f491_4f6c_dd1du64;
    let functions = unit.functions_mut();
    if functions.is_empty() {
        return;
    }

    for step in 0..steps {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;

        let idx = (state as usize) % functions.len();
        let groups = functions[idx].groups_mut();
        let arcs = &mut groups[0];
        let arc = (state >> 32) as usize % arcs.values().len().max(1);
        arcs.hit(arc);

        let first_run = &mut groups[1].values_mut()[0];
        if *first_run == 0 {
            *first_run = step as u64 + 1;
        }
    }
}

fn benchmark(unit: &mut CoverageUnit) -> Result<(), GcovError> {
    println!("📊 Encode Benchmark (Zero-Allocation)");
    println!("-------------------------------------");

    const ITERATIONS: usize = 10_000;

    let size = encode(unit, None)?;
    let mut buffer = vec![0u32; size / 4];

    let start = Instant::now();
    for _ in 0..ITERATIONS {
        encode(unit, None)?;
    }
    let size_duration = start.elapsed();

    let mut kicks = 0u64;
    let mut watchdog = || kicks += 1;
    let start = Instant::now();
    for _ in 0..ITERATIONS {
        encode_with(unit, Some(&mut buffer[..]), &mut watchdog)?;
    }
    let fill_duration = start.elapsed();

    let size_ns = size_duration.as_nanos() as f64 / ITERATIONS as f64;
    let fill_ns = fill_duration.as_nanos() as f64 / ITERATIONS as f64;

    println!("  Unit size:       {} bytes", size);
    println!("  Counters:        {}", unit.counter_count());
    println!("  Size-only:       {:.2} ns/op", size_ns);
    println!("  Encode (fill):   {:.2} ns/op", fill_ns);
    println!(
        "  Throughput:      {:.2} MB/sec",
        (size * ITERATIONS) as f64 / fill_duration.as_secs_f64() / 1_000_000.0
    );
    println!("  Watchdog kicks:  {}", kicks);

    let start = Instant::now();
    reset(unit);
    let reset_us = start.elapsed().as_nanos() as f64 / 1000.0;
    println!("  Reset:           {:.2} μs\n", reset_us);

    Ok(())
}

fn run(config: DemoConfig) -> Result<(), GcovError> {
    println!("🚀 gcda-writer demo");
    println!("====================\n");

    let mut unit = build_unit(&config)?;

    simulate_execution(&mut unit, 100_000);
    benchmark(&mut unit)?;

    // Counter di-reset oleh benchmark; jalankan ulang supaya dump berisi data
    simulate_execution(&mut unit, 100_000);

    let mut sink: Box<dyn GcdaSink> = match config.dump.output {
        OutputMode::File => Box::new(FileSink::new(config.dump.clone())),
        OutputMode::HexDump => Box::new(HexDumpSink::new(io::stdout().lock())),
        OutputMode::Memory => Box::new(MemorySink::new()),
    };

    let written = dump(&mut unit, sink.as_mut(), &config.dump)?;

    println!("\n✅ Dumped {} bytes for {}", written, unit.source_name());
    if config.dump.output == OutputMode::File {
        let path = config.dump.output_path(unit.source_name());
        println!("   Path: {}", path.display());
    }

    Ok(())
}

fn parse_args() -> DemoConfig {
    let args: Vec<String> = std::env::args().collect();
    let mut config = DemoConfig::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--output" | "-o" => {
                if i + 1 < args.len() {
                    match OutputMode::parse(&args[i + 1]) {
                        Some(mode) => config.dump.output = mode,
                        None => eprintln!("⚠️  Unknown output mode: {}", args[i + 1]),
                    }
                    i += 1;
                }
            }
            "--name" | "-n" => {
                if i + 1 < args.len() {
                    config.source_name = args[i + 1].clone();
                    i += 1;
                }
            }
            "--prefix" | "-p" => {
                if i + 1 < args.len() {
                    config.dump.prefix = Some(args[i + 1].clone().into());
                    i += 1;
                }
            }
            "--strip" => {
                if i + 1 < args.len() {
                    config.dump.prefix_strip = args[i + 1].parse().unwrap_or(0);
                    i += 1;
                }
            }
            "--functions" | "-f" => {
                if i + 1 < args.len() {
                    config.functions = args[i + 1].parse().unwrap_or(64);
                    i += 1;
                }
            }
            "--counters" | "-c" => {
                if i + 1 < args.len() {
                    config.counters_per_function = args[i + 1].parse().unwrap_or(16);
                    i += 1;
                }
            }
            "--reset" | "-r" => {
                config.dump.reset_after_dump = true;
            }
            "--help" | "-h" => {
                println!("gcda_dump - gcov .gcda encoder demo\n");
                println!("Usage: gcda_dump [OPTIONS]\n");
                println!("Options:");
                println!("  -o, --output <MODE>   file | hex | memory (default: file)");
                println!("  -n, --name <PATH>     Source .gcda path (default: gcda_demo.gcda)");
                println!("  -p, --prefix <DIR>    Output prefix (default: $GCOV_PREFIX)");
                println!("      --strip <N>       Strip N dirs (default: $GCOV_PREFIX_STRIP)");
                println!("  -f, --functions <N>   Instrumented functions (default: 64)");
                println!("  -c, --counters <N>    Arc counters per function (default: 16)");
                println!("  -r, --reset           Reset counters after dump");
                println!("  -h, --help            Show this help");
                std::process::exit(0);
            }
            _ => {}
        }
        i += 1;
    }

    config
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = parse_args();

    if let Err(e) = run(config) {
        eprintln!("❌ Dump error: {}", e);
        std::process::exit(1);
    }
}
