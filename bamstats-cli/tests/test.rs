use std::io::Write;
use std::num::NonZeroUsize;
use std::path::Path;
use std::process::{Command, Output, Stdio};

use noodles::bam;
use noodles::core::Position;
use noodles::sam;
use noodles::sam::alignment::io::Write as AlignmentWrite;
use noodles::sam::alignment::record::cigar::op::{Kind, Op};
use noodles::sam::alignment::record::{Flags, MappingQuality};
use noodles::sam::alignment::record_buf::{Cigar, QualityScores, RecordBuf, Sequence};
use noodles::sam::header::record::value::Map;
use noodles::sam::header::record::value::map::ReferenceSequence;
use pretty_assertions::assert_eq;
use rstest::{fixture, rstest};
use serde_json::{Value, json};
use tempfile::TempDir;

const BIN: &str = env!("CARGO_BIN_EXE_bamstats-alive");

fn record(start: usize) -> RecordBuf {
    RecordBuf::builder()
        .set_flags(Flags::empty())
        .set_reference_sequence_id(0)
        .set_alignment_start(Position::try_from(start).unwrap())
        .set_mapping_quality(MappingQuality::new(60).unwrap())
        .set_cigar(Cigar::from(vec![Op::new(Kind::Match, 10)]))
        .set_sequence(Sequence::from(b"ACGTACGTAC".to_vec()))
        .set_quality_scores(QualityScores::from(vec![40; 10]))
        .build()
}

fn encode(starts: &[usize]) -> Vec<u8> {
    let header = sam::Header::builder()
        .add_reference_sequence(
            "11",
            Map::<ReferenceSequence>::new(NonZeroUsize::new(1_000_000).unwrap()),
        )
        .build();

    let mut data = Vec::new();
    {
        let mut writer = bam::io::Writer::new(&mut data);
        writer.write_header(&header).unwrap();
        for start in starts {
            writer.write_alignment_record(&header, &record(*start)).unwrap();
        }
        writer.get_mut().try_finish().unwrap();
    }
    data
}

#[fixture]
fn workdir() -> TempDir {
    tempfile::tempdir().unwrap()
}

fn write_bam(dir: &Path, starts: &[usize]) -> String {
    let path = dir.join("reads.bam");
    std::fs::write(&path, encode(starts)).unwrap();
    path.to_str().unwrap().to_string()
}

fn run(args: &[&str]) -> Output {
    Command::new(BIN)
        .args(args)
        .env("RUST_LOG", "off")
        .output()
        .unwrap()
}

fn json_lines(output: &Output) -> Vec<Value> {
    String::from_utf8(output.stdout.clone())
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

#[rstest]
fn test_streams_snapshots(workdir: TempDir) {
    let bam = write_bam(workdir.path(), &[101, 201, 301, 401, 501]);

    let output = run(&[&bam, "-u", "2"]);
    assert!(output.status.success());

    let lines = json_lines(&output);
    let totals: Vec<u64> = lines
        .iter()
        .map(|line| line["total_reads"].as_u64().unwrap())
        .collect();
    assert_eq!(totals, vec![2, 4, 5]);

    let last = &lines[2];
    assert_eq!(last["mapped_reads"], 5);
    assert_eq!(last["refAln_hist"], json!({"11": 5}));
    assert_eq!(last["length_hist"], json!({"10": 5}));
    assert_eq!(last["mapq_hist"], json!({"60": 5}));
}

#[rstest]
fn test_reads_stdin_by_default() {
    let mut child = Command::new(BIN)
        .env("RUST_LOG", "off")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .unwrap();
    child
        .stdin
        .take()
        .unwrap()
        .write_all(&encode(&[101, 201, 301]))
        .unwrap();

    let output = child.wait_with_output().unwrap();
    assert!(output.status.success());

    let lines = json_lines(&output);
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0]["total_reads"], 3);
}

#[rstest]
fn test_coverage_map_and_regions(workdir: TempDir) {
    let bam = write_bam(workdir.path(), &[1001, 1011, 1021]);
    let regions = workdir.path().join("regions.json");
    std::fs::write(&regions, r#"[{"name":"11","start":1000,"end":1099}]"#).unwrap();

    let output = run(&[
        &bam,
        "--regions-file",
        regions.to_str().unwrap(),
        "-k",
        "0",
        "-s",
        "1000",
        "-l",
        "256",
    ]);
    assert!(output.status.success());

    let lines = json_lines(&output);
    let last = lines.last().unwrap();
    assert_eq!(last["read_depth"], json!({"0": 1, "10": 1, "20": 1}));

    let coverage: f64 = last["coverage_hist"]
        .as_object()
        .unwrap()
        .values()
        .filter_map(Value::as_f64)
        .sum();
    assert!((coverage - 1.0).abs() < 1e-9);
}

#[rstest]
fn test_config_file(workdir: TempDir) {
    let bam = write_bam(workdir.path(), &[101, 201, 301]);
    let config = workdir.path().join("bamstats.toml");
    std::fs::write(&config, "update_rate = 1\n").unwrap();

    let output = run(&[&bam, "--config", config.to_str().unwrap()]);
    assert!(output.status.success());
    assert_eq!(json_lines(&output).len(), 4);
}

#[rstest]
fn test_missing_input_reports_error_status(workdir: TempDir) {
    let missing = workdir.path().join("missing.bam");

    let output = run(&[missing.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));

    let lines = json_lines(&output);
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0]["status"], "error");
    assert!(
        lines[0]["message"]
            .as_str()
            .unwrap()
            .starts_with("Cannot open the specified file")
    );
}

#[rstest]
#[case(r#"{"name":"11","start":1,"end":10}"#)]
#[case(r#"[{"name":"11","start":1}]"#)]
#[case(r#"[{"name":11,"start":1,"end":10}]"#)]
#[case("[{")]
fn test_bad_region_payload_reports_error_status(workdir: TempDir, #[case] payload: &str) {
    let bam = write_bam(workdir.path(), &[101]);

    let output = run(&[&bam, "-r", payload]);
    assert_eq!(output.status.code(), Some(1));

    let lines = json_lines(&output);
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0]["status"], "error");
    assert!(lines[0].get("total_reads").is_none());
}

#[rstest]
fn test_invalid_config_reports_error_status(workdir: TempDir) {
    let config = workdir.path().join("bamstats.toml");
    std::fs::write(&config, "update_rate = 0\n").unwrap();

    let output = run(&["--config", config.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(json_lines(&output)[0]["status"], "error");
}
