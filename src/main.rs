mod cache;
mod config;
mod displace;
mod error;
mod mem;
mod org;
mod stats;
mod trace;

use std::{
    fs::File,
    io::{BufWriter, Write},
    process,
    time::Instant,
};

use config::Scenario;
use error::SimError;
use mem::{Matrix, Memory};
use stats::Stream;

fn main() {
    let mut args = pico_args::Arguments::from_env();
    let mode: usize = args
        .opt_value_from_str(["-m", "--mode"])
        .expect("-m should be an integer")
        .unwrap_or(0);
    let n: usize = args
        .opt_value_from_str(["-s", "--size"])
        .expect("-s should be an integer")
        .unwrap_or(1024);
    let sets: usize = args
        .opt_value_from_str(["-a", "--sets"])
        .expect("-a should be an integer")
        .unwrap_or(3);
    let element_size: u64 = args
        .opt_value_from_str(["-e", "--element-size"])
        .expect("-e should be an integer")
        .unwrap_or(4);
    let heartbeat: u64 = args
        .opt_value_from_str(["-h", "--heartbeat"])
        .expect("-h should be an integer")
        .unwrap_or(0);

    if let Err(err) = run(Scenario { mode, sets }, n, element_size, heartbeat) {
        eprintln!("error: {err}");
        process::exit(1);
    }
}

fn run(scenario: Scenario, n: usize, element_size: u64, heartbeat: u64) -> Result<(), SimError> {
    let (name, mut cache) = scenario.build()?;

    let mut memory = Memory::new();
    let a = Matrix::new(element_size, n, &mut memory);
    let b = Matrix::new(element_size, n, &mut memory);
    let c = Matrix::new(element_size, n, &mut memory);

    let started = Instant::now();
    trace::run_matmul(cache.as_mut(), n, &a, &b, &c, heartbeat)?;
    cache.flush(Stream::InCache)?;
    cache.flush(Stream::NotInCache)?;
    let spent = started.elapsed().as_secs_f64();
    println!("testing time {spent}");

    let hit_stats = cache.hit_stats()?;
    let out = File::create(format!("{name}_{n}_results.dump"))?;
    let mut out = BufWriter::new(out);
    writeln!(out, "{spent}")?;
    writeln!(out, "{}", serde_json::to_string(&hit_stats)?)?;
    writeln!(out, "{}", serde_json::to_string(&cache.extended_stats()?)?)?;
    out.flush()?;

    println!("{}", serde_json::to_string(&hit_stats)?);
    Ok(())
}
