use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::tempdir;

const ETHANOL: &str = "\
ethanol
  hand-written      3D

  3  2  0  0  0  0  0  0  0  0999 V2000
   -1.2000    0.0000    0.0000 C   0  0  0  0  0  0  0  0  0  0  0  0
    0.3100    0.0000    0.0000 C   0  0  0  0  0  0  0  0  0  0  0  0
    0.8000    1.3400    0.0000 O   0  0  0  0  0  0  0  0  0  0  0  0
  1  2  1  0  0  0  0
  2  3  1  0  0  0  0
M  END
$$$$
";

fn confgen(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_confgen"))
        .args(args)
        .output()
        .expect("failed to launch the confgen binary")
}

fn path_str(path: &Path) -> &str {
    path.to_str().unwrap()
}

fn record_count(sdf: &str) -> usize {
    sdf.lines().filter(|l| l.trim() == "$$$$").count()
}

#[test]
fn missing_output_argument_is_a_usage_error() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("ethanol.sdf");
    fs::write(&input, ETHANOL).unwrap();

    let out = confgen(&[path_str(&input)]);

    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("Usage"));
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[test]
fn extra_positional_argument_is_a_usage_error() {
    let out = confgen(&["a.sdf", "b.sdf", "c.sdf"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(out.stdout.is_empty());
}

#[test]
fn help_and_version_succeed() {
    let help = confgen(&["--help"]);
    assert_eq!(help.status.code(), Some(0));
    let text = String::from_utf8_lossy(&help.stdout);
    assert!(text.contains("<INPUT>") && text.contains("<OUTPUT>"));

    let version = confgen(&["--version"]);
    assert_eq!(version.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&version.stdout).contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn generates_conformers_and_prints_summary() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("ethanol.sdf");
    let output = dir.path().join("conformers.sdf");
    fs::write(&input, ETHANOL).unwrap();

    let out = confgen(&["-q", "-n", "5", path_str(&input), path_str(&output)]);
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));

    let written = fs::read_to_string(&output).unwrap();
    let records = record_count(&written);
    assert!((1..=5).contains(&records));

    // Every record carries the hydrogen-complete molecule: 3 heavy atoms + 6 H.
    let counts_line = written.lines().nth(3).unwrap();
    assert_eq!(counts_line[..3].trim(), "9");
    assert_eq!(written.matches("> <energy>").count(), records);

    let stdout = String::from_utf8_lossy(&out.stdout);
    assert_eq!(
        stdout.trim(),
        format!("Generated {} conformers in {}", records, path_str(&output))
    );
}

#[test]
fn same_seed_gives_identical_output() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("ethanol.sdf");
    let first = dir.path().join("first.sdf");
    let second = dir.path().join("second.sdf");
    fs::write(&input, ETHANOL).unwrap();

    for output in [&first, &second] {
        let out = confgen(&[
            "-q",
            "-n",
            "4",
            "--seed",
            "0x1234",
            "--no-optimize",
            path_str(&input),
            path_str(output),
        ]);
        assert!(out.status.success());
    }

    assert_eq!(
        fs::read_to_string(&first).unwrap(),
        fs::read_to_string(&second).unwrap()
    );
}

#[test]
fn invalid_input_fails_without_creating_output() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("broken.sdf");
    let output = dir.path().join("out.sdf");
    fs::write(&input, "broken\n\n\nnot a counts line\n").unwrap();

    let out = confgen(&["-q", path_str(&input), path_str(&output)]);

    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("Error:"));
    assert!(!output.exists());
}

#[test]
fn writes_energy_report_when_requested() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("ethanol.sdf");
    let output = dir.path().join("out.sdf");
    let report = dir.path().join("energies.csv");
    let config = dir.path().join("confgen.toml");
    fs::write(&input, ETHANOL).unwrap();
    fs::write(
        &config,
        "[embedding]\nnum-conformers = 3\n\n[optimization]\nmax-iterations = 50\n",
    )
    .unwrap();

    let out = confgen(&[
        "-q",
        "-c",
        path_str(&config),
        "--report",
        path_str(&report),
        path_str(&input),
        path_str(&output),
    ]);
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));

    let records = record_count(&fs::read_to_string(&output).unwrap());
    let csv = fs::read_to_string(&report).unwrap();
    let mut lines = csv.lines();
    assert_eq!(
        lines.next(),
        Some("conformer,energy,initial_energy,iterations,converged")
    );
    assert_eq!(lines.count(), records);
}

#[test]
fn unknown_config_key_is_rejected() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("ethanol.sdf");
    let output = dir.path().join("out.sdf");
    let config = dir.path().join("bad.toml");
    fs::write(&input, ETHANOL).unwrap();
    fs::write(&config, "[embedding]\nconformers = 3\n").unwrap();

    let out = confgen(&["-q", "-c", path_str(&config), path_str(&input), path_str(&output)]);

    assert_eq!(out.status.code(), Some(1));
    assert!(!output.exists());
}
