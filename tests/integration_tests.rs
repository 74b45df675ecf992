//! End-to-end tests against the `bee` binary

use spelling_bee::batch::{BatchConfig, Beehive, ExitCause, WorkerExit};
use spelling_bee::exit_code;
use spelling_bee::wordlists::{DictionaryFilter, find_pangrams, load_from_file};
use std::collections::HashSet;
use std::fs;
use std::io::{BufRead, BufReader, Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdout, Command, Output, Stdio};
use tempfile::TempDir;

const BEE: &str = env!("CARGO_BIN_EXE_bee");

fn write_dict(dir: &TempDir, words: &str) -> PathBuf {
    let path = dir.path().join("words");
    fs::write(&path, words).unwrap();
    path
}

fn bee(args: &[&str], cwd: &Path) -> Output {
    Command::new(BEE)
        .args(args)
        .current_dir(cwd)
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

/// A dictionary of `count` pseudo-random pangrams, enough to keep a worker busy
fn write_pangram_dict(dir: &TempDir, count: usize) -> PathBuf {
    let mut state: u64 = 0x2545_f491_4f6c_dd1d;
    let mut next = move || {
        state = state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        (state >> 33) as usize
    };

    let mut text = String::with_capacity(count * 8);
    for _ in 0..count {
        let mut alphabet: Vec<u8> = (b'a'..=b'z').collect();
        for i in 0..7 {
            let j = i + next() % (26 - i);
            alphabet.swap(i, j);
        }
        text.push_str(std::str::from_utf8(&alphabet[..7]).unwrap());
        text.push('\n');
    }

    let path = dir.path().join("pangrams");
    fs::write(&path, text).unwrap();
    path
}

fn spawn_bee(args: &[&str], cwd: &Path, stdin: Stdio) -> Child {
    Command::new(BEE)
        .args(args)
        .current_dir(cwd)
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .stdin(stdin)
        .stdout(Stdio::piped())
        .spawn()
        .unwrap()
}

/// Read stdout until a line containing `needle`, then return the reader
fn wait_for_line(child: &mut Child, needle: &str) -> BufReader<ChildStdout> {
    let mut reader = BufReader::new(child.stdout.take().unwrap());
    let mut line = String::new();
    loop {
        line.clear();
        assert!(reader.read_line(&mut line).unwrap() > 0, "no line containing {needle}");
        if line.contains(needle) {
            return reader;
        }
    }
}

#[cfg(unix)]
fn send_sigint(pid: u32) {
    let status = Command::new("kill")
        .args(["-INT", &pid.to_string()])
        .status()
        .unwrap();
    assert!(status.success());
}

fn answer_rows(db: &Path) -> i64 {
    let conn = rusqlite::Connection::open(db).unwrap();
    conn.query_row("SELECT COUNT(*) FROM answers", [], |row| row.get(0))
        .unwrap()
}

fn batch_config(dict: PathBuf, database: Option<PathBuf>, workers: usize) -> BatchConfig {
    BatchConfig {
        dictionary: dict,
        filter: DictionaryFilter::default(),
        database,
        workers,
        verbose: false,
    }
}

#[test]
fn single_puzzle_lists_answers() {
    let dir = TempDir::new().unwrap();
    let dict = write_dict(&dir, "accord\nradical\ncordial\ncar\n");

    let out = bee(&["-d", dict.to_str().unwrap(), "-l", "ordail", "-m", "c"], dir.path());

    assert_eq!(out.status.code(), Some(exit_code::EX_OK));
    let stdout = String::from_utf8_lossy(&out.stdout);
    for word in ["accord", "cordial", "radical"] {
        assert!(stdout.contains(word), "missing {word} in {stdout}");
    }
    assert!(stdout.contains("3 words"));
    assert!(stdout.contains("Elapsed time"));
}

#[test]
fn single_puzzle_is_repeatable() {
    let dir = TempDir::new().unwrap();
    let dict = write_dict(&dir, "accord radical cordial lilac radio");
    let args = ["-d", dict.to_str().unwrap(), "-l", "cordail"];

    let first = bee(&args, dir.path());
    let second = bee(&args, dir.path());

    let answers = |out: &Output| {
        String::from_utf8_lossy(&out.stdout)
            .lines()
            .filter(|l| !l.starts_with("Elapsed"))
            .map(str::to_string)
            .collect::<Vec<_>>()
    };
    assert_eq!(answers(&first), answers(&second));
}

#[test]
fn missing_letters_is_data_error() {
    let dir = TempDir::new().unwrap();
    let dict = write_dict(&dir, "cordial");
    let out = bee(&["-d", dict.to_str().unwrap()], dir.path());
    assert_eq!(out.status.code(), Some(exit_code::EX_DATAERR));
}

#[test]
fn too_many_letters_is_rejected_before_matching() {
    let dir = TempDir::new().unwrap();
    // The dictionary is never read, so it need not exist
    let out = bee(&["-d", "no-such-file", "-l", "anointedcy"], dir.path());
    assert_eq!(out.status.code(), Some(exit_code::EX_DATAERR));
}

#[test]
fn unreadable_dictionary_is_no_input() {
    let dir = TempDir::new().unwrap();
    let out = bee(&["-d", "no-such-file", "-l", "cordail"], dir.path());
    assert_eq!(out.status.code(), Some(exit_code::EX_NOINPUT));
}

#[test]
fn four_workers_one_pangram() {
    let dir = TempDir::new().unwrap();
    let dict = write_dict(&dir, "accord radical cordial lilac radio");
    let words = load_from_file(&dict, DictionaryFilter::default()).unwrap();

    let hive = Beehive::with_program(batch_config(dict, None, 4), PathBuf::from(BEE));
    let report = hive.run(&words).unwrap();

    assert_eq!(report.pangrams, 1);
    assert_eq!(report.workers.len(), 4);
    let pids: HashSet<u32> = report.workers.iter().map(|w| w.pid).collect();
    assert_eq!(pids.len(), 4);
    assert!(report.workers.iter().all(|w| w.cause() == ExitCause::Completed));
}

#[test]
fn workers_persist_every_rotation_once() {
    let dir = TempDir::new().unwrap();
    let dict = write_dict(&dir, "cordial pelican blowing mixture accord radical lilac panic");
    let db = dir.path().join("bee.db");
    fs::File::create(&db).unwrap();
    let words = load_from_file(&dict, DictionaryFilter::default()).unwrap();

    let hive = Beehive::with_program(batch_config(dict, Some(db.clone()), 3), PathBuf::from(BEE));
    let report = hive.run(&words).unwrap();

    assert_eq!(report.pangrams, 4);
    assert!(report.all_succeeded());

    let conn = rusqlite::Connection::open(&db).unwrap();
    let per_puzzle: Vec<(String, i64)> = conn
        .prepare("SELECT puzzle, COUNT(*) FROM answers GROUP BY puzzle ORDER BY puzzle")
        .unwrap()
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(
        per_puzzle,
        vec![
            ("acdilor".to_string(), 7),
            ("aceilnp".to_string(), 7),
            ("bgilnow".to_string(), 7),
            ("eimrtux".to_string(), 7),
        ]
    );

    // One pangram's rows always come from a single worker
    let mixed: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM (SELECT puzzle FROM answers GROUP BY puzzle HAVING COUNT(DISTINCT pid) > 1)",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(mixed, 0);

    let matches: String = conn
        .query_row(
            "SELECT matches FROM answers WHERE puzzle = 'acdilor' AND middle_letter = 'c'",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(matches, "accord cordial lilac radical");
}

#[test]
fn batch_cli_reports_each_worker() {
    let dir = TempDir::new().unwrap();
    let dict = write_dict(&dir, "cordial pelican blowing");

    let out = bee(&["-b", "--cpus", "2", "-d", dict.to_str().unwrap()], dir.path());

    assert_eq!(out.status.code(), Some(exit_code::EX_OK));
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("BATCH RESULTS"));
    assert_eq!(stdout.lines().filter(|l| l.trim_start().starts_with("pid")).count(), 2);
}

#[test]
fn batch_with_unreachable_database_still_runs() {
    let dir = TempDir::new().unwrap();
    let dict = write_dict(&dir, "cordial pelican");

    let out = bee(
        &["-b", "--cpus", "2", "-d", dict.to_str().unwrap(), "--db", "missing.db"],
        dir.path(),
    );

    assert_eq!(out.status.code(), Some(exit_code::EX_OK));
    assert!(String::from_utf8_lossy(&out.stdout).contains("results will not be saved"));
    assert!(!dir.path().join("missing.db").exists());
}

#[test]
fn zero_cpus_is_a_usage_error() {
    let dir = TempDir::new().unwrap();
    let out = bee(&["-b", "--cpus", "0"], dir.path());
    assert!(!out.status.success());
}

#[test]
fn build_dict_writes_filtered_copy() {
    let dir = TempDir::new().unwrap();
    let dict = write_dict(&dir, "car Cordial cordial cords accord");

    let out = bee(&["--build-dict", "--no-plurals", "-d", dict.to_str().unwrap()], dir.path());

    assert_eq!(out.status.code(), Some(exit_code::EX_OK));
    let built = fs::read_to_string(dir.path().join("words.bee")).unwrap();
    assert_eq!(built, "cordial\naccord\n");
}

#[cfg(unix)]
#[test]
fn sigint_to_worker_process_is_a_clean_exit() {
    let dir = TempDir::new().unwrap();
    let dict = write_pangram_dict(&dir, 20_000);
    let words = load_from_file(&dict, DictionaryFilter::default()).unwrap();
    let payload: String = find_pangrams(&words)
        .iter()
        .map(|p| p.canonical() + "\n")
        .collect();

    let mut child = spawn_bee(
        &["--worker", "--dict", dict.to_str().unwrap()],
        dir.path(),
        Stdio::piped(),
    );
    {
        let mut stdin = child.stdin.take().unwrap();
        stdin.write_all(payload.as_bytes()).unwrap();
    }

    let mut reader = wait_for_line(&mut child, "is analyzing");
    send_sigint(child.id());

    let mut rest = String::new();
    reader.read_to_string(&mut rest).unwrap();
    let status = child.wait().unwrap();

    let exit = WorkerExit::from_status(child.id(), status);
    assert_eq!(exit.cause(), ExitCause::Completed);
    assert!(rest.contains("interrupted after"), "worker output: {rest}");
}

#[cfg(unix)]
#[test]
fn sigint_to_single_process_batch_keeps_whole_pangrams() {
    let dir = TempDir::new().unwrap();
    let dict = write_pangram_dict(&dir, 20_000);
    let db = dir.path().join("bee.db");
    fs::File::create(&db).unwrap();

    let mut child = spawn_bee(
        &["-b", "--cpus", "1", "-d", dict.to_str().unwrap(), "--db", "bee.db"],
        dir.path(),
        Stdio::null(),
    );

    let mut reader = wait_for_line(&mut child, "is analyzing");
    send_sigint(child.id());

    let mut rest = String::new();
    reader.read_to_string(&mut rest).unwrap();
    let status = child.wait().unwrap();

    assert_eq!(status.code(), Some(exit_code::EX_OK), "output: {rest}");
    assert!(rest.contains("interrupted after"));
    assert!(rest.contains("BATCH RESULTS"));

    // The sink was closed after the last committed pangram
    let rows = answer_rows(&db);
    assert_eq!(rows % 7, 0);
    assert!(rows < 20_000 * 7);
}

#[test]
fn commit_failure_ends_only_that_worker() {
    let dir = TempDir::new().unwrap();
    let dict = write_dict(&dir, "cordial accord radical lilac");
    let db = dir.path().join("bee.db");
    {
        // Rows reference a worker table that is never filled, so COMMIT fails
        let conn = rusqlite::Connection::open(&db).unwrap();
        conn.execute_batch(
            "CREATE TABLE workers (pid INTEGER PRIMARY KEY);
             CREATE TABLE answers (
                 middle_letter TEXT NOT NULL,
                 puzzle TEXT NOT NULL,
                 matches TEXT NOT NULL,
                 pid INTEGER NOT NULL REFERENCES workers(pid) DEFERRABLE INITIALLY DEFERRED
             );",
        )
        .unwrap();
    }
    let words = load_from_file(&dict, DictionaryFilter::default()).unwrap();

    let hive = Beehive::with_program(batch_config(dict, Some(db.clone()), 3), PathBuf::from(BEE));
    let report = hive.run(&words).unwrap();

    assert_eq!(report.pangrams, 1);
    assert_eq!(report.workers.len(), 3);
    let causes: Vec<ExitCause> = report.workers.iter().map(WorkerExit::cause).collect();
    assert_eq!(causes.iter().filter(|c| **c == ExitCause::IoError).count(), 1);
    assert_eq!(causes.iter().filter(|c| **c == ExitCause::Completed).count(), 2);
    assert!(!report.all_succeeded());
    assert_eq!(answer_rows(&db), 0);
}
