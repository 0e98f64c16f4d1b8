use std::path::PathBuf;

use clap::{Arg, Command, arg, value_parser};

use crate::consts::{BIN_NAME, VERSION};

pub fn build_parser() -> Command {
    Command::new(BIN_NAME)
        .bin_name(BIN_NAME)
        .version(VERSION)
        .author("Databio")
        .about("Stream a BAM file and print live alignment statistics as one JSON object per line.")
        .arg(
            Arg::new("file")
                .help("BAM file to read. Reads stdin when omitted or '-'"),
        )
        .arg(
            arg!(-u --"update-rate" <READS> "Emit a snapshot every this many reads [default: 1000]")
                .value_parser(value_parser!(u64).range(1..)),
        )
        .arg(
            arg!(-f --"first-update" <READS> "Emit one extra snapshot once this many reads are processed")
                .value_parser(value_parser!(u64).range(1..)),
        )
        .arg(
            arg!(-k --"coverage-skip" <CYCLES> "Snapshot intervals to skip region coverage after each active one [default: 2]")
                .value_parser(value_parser!(u32)),
        )
        .arg(
            arg!(-r --regions <JSON> "Inline JSON array of {name, start, end} regions for coverage")
                .conflicts_with("regions-file"),
        )
        .arg(
            arg!(--"regions-file" <PATH> "File holding the JSON region payload")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            arg!(-s --"region-start" <POS> "Start of the coverage map window")
                .value_parser(value_parser!(i64)),
        )
        .arg(
            arg!(-l --"region-length" <LEN> "Length of the coverage map window. 0 disables the map")
                .value_parser(value_parser!(u64)),
        )
        .arg(
            arg!(--"target-interval-ms" <MS> "Adapt the update rate so snapshots arrive about this often")
                .value_parser(value_parser!(u64)),
        )
        .arg(
            arg!(--"interval-tolerance-ms" <MS> "Accepted deviation from the target interval [default: 100]")
                .value_parser(value_parser!(u64)),
        )
        .arg(
            arg!(-c --config <PATH> "TOML file with default settings. Flags take precedence")
                .value_parser(value_parser!(PathBuf)),
        )
}
