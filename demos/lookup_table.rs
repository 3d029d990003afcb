//! Load a prefix table and answer longest-prefix-match queries.
//!
//! ```text
//! cargo run --example lookup_table -- TABLE [SAMPLES]
//! ```
//!
//! Without a sample file, addresses are read from stdin (one per line) and the matched prefix and
//! value are printed. With a sample file, every sample is checked against its expected value.
//! Set `RUST_LOG=debug` to see what is loaded.

use std::error::Error;
use std::fs::File;
use std::io::{stdin, BufRead, BufReader};
use std::net::Ipv4Addr;
use std::process::ExitCode;

use ipv4_patricia::{parse_ipv4_strict, table, PatriciaTrie};

fn main() -> Result<ExitCode, Box<dyn Error>> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let Some(table_path) = args.next() else {
        eprintln!("usage: lookup_table TABLE [SAMPLES]");
        return Ok(ExitCode::FAILURE);
    };

    let trie = table::load(BufReader::new(File::open(&table_path)?))?;
    log::info!(
        "{table_path}: {} prefixes in {} nodes ({} bytes)",
        trie.len(),
        trie.size(),
        trie.memory_usage()
    );

    match args.next() {
        Some(samples_path) => check_samples(&trie, &samples_path),
        None => interactive(&trie),
    }
}

fn check_samples(trie: &PatriciaTrie, path: &str) -> Result<ExitCode, Box<dyn Error>> {
    let samples = table::read_samples(BufReader::new(File::open(path)?))?;
    let mut failed = 0;
    for (addr, expected) in &samples {
        let got = trie.lookup(*addr);
        if got != *expected {
            failed += 1;
            log::warn!(
                "{}: expected {expected:?}, got {got:?}",
                Ipv4Addr::from(*addr)
            );
        }
    }
    println!("{} of {} samples passed", samples.len() - failed, samples.len());
    Ok(if failed == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn interactive(trie: &PatriciaTrie) -> Result<ExitCode, Box<dyn Error>> {
    for line in stdin().lock().lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let addr = match parse_ipv4_strict(line) {
            Ok(addr) => addr,
            Err(e) => {
                eprintln!("{line}: {e}");
                continue;
            }
        };
        match (trie.lookup_prefix(addr), trie.lookup(addr)) {
            (Some(prefix), Some(value)) => println!("{line} {prefix} {value}"),
            (Some(prefix), None) => println!("{line} {prefix} -"),
            (None, _) => println!("{line} -"),
        }
    }
    Ok(ExitCode::SUCCESS)
}
