/*!
 * Integration tests for the mdbundle binary
 */

use std::fs;
use std::io;
use std::path::Path;
use std::process::{Command, ExitStatus};
use std::thread;
use std::time::Duration;

use tempfile::tempdir;

fn mdbundle() -> Command {
    Command::new(env!("CARGO_BIN_EXE_mdbundle"))
}

#[test]
fn test_invalid_directory_exits_with_one() {
    let temp_dir = tempdir().unwrap();
    let missing = temp_dir.path().join("missing");
    let output = temp_dir.path().join("out.md");

    let status = mdbundle()
        .args(["-q"])
        .arg(&missing)
        .arg(&output)
        .status()
        .unwrap();

    assert_eq!(status.code(), Some(1));
    assert!(!output.exists());
}

#[test]
fn test_file_instead_of_directory_exits_with_one() {
    let temp_dir = tempdir().unwrap();
    let file = temp_dir.path().join("plain.txt");
    fs::write(&file, "hello").unwrap();

    let status = mdbundle()
        .arg("-q")
        .arg(&file)
        .arg(temp_dir.path().join("out.md"))
        .status()
        .unwrap();

    assert_eq!(status.code(), Some(1));
}

#[test]
fn test_single_export() {
    let temp_dir = tempdir().unwrap();
    let project = temp_dir.path().join("project");
    fs::create_dir(&project).unwrap();
    fs::write(project.join("main.rs"), "// entry point\nfn main() {}\n").unwrap();
    let output = temp_dir.path().join("bundle.md");

    let status = mdbundle()
        .args(["-q", "--no-type-check"])
        .arg(&project)
        .arg(&output)
        .status()
        .unwrap();
    assert!(status.success());

    let doc = fs::read_to_string(&output).unwrap();
    assert!(doc.contains("└── main.rs"));
    assert!(doc.contains("## main.rs\n```rust\nfn main() {}\n```"));
}

#[test]
fn test_no_strip_flag() {
    let temp_dir = tempdir().unwrap();
    fs::write(temp_dir.path().join("main.rs"), "// entry point\nfn main() {}\n").unwrap();
    let output = temp_dir.path().join("bundle.md");

    let status = mdbundle()
        .args(["-q", "--no-type-check", "--no-strip"])
        .arg(temp_dir.path())
        .arg(&output)
        .status()
        .unwrap();
    assert!(status.success());

    let doc = fs::read_to_string(&output).unwrap();
    assert!(doc.contains("// entry point"));
}

#[test]
fn test_split_export() {
    let temp_dir = tempdir().unwrap();
    let project = temp_dir.path().join("project");
    fs::create_dir(&project).unwrap();
    for name in ["a.py", "b.py", "c.py"] {
        fs::write(project.join(name), "print(1)\n").unwrap();
    }
    let output = temp_dir.path().join("out").join("bundle.md");
    fs::create_dir(temp_dir.path().join("out")).unwrap();

    let status = mdbundle()
        .args(["-q", "--no-type-check", "--split", "2"])
        .arg(&project)
        .arg(&output)
        .status()
        .unwrap();
    assert!(status.success());

    let export_dir = temp_dir.path().join("out").join("export");
    let first = fs::read_to_string(export_dir.join("export_1.md")).unwrap();
    let second = fs::read_to_string(export_dir.join("export_2.md")).unwrap();
    assert!(first.contains("### PART 1/2"));
    assert!(first.contains("## a.py") && first.contains("## b.py"));
    assert!(second.contains("## c.py"));
    assert!(!export_dir.join("export_3.md").exists());
    assert!(!output.exists());
}

// A freshly copied binary can briefly report ETXTBSY while parallel tests fork
fn run_with_retry(command: &mut Command) -> io::Result<ExitStatus> {
    let mut attempts = 0;
    loop {
        match command.status() {
            Err(e) if e.raw_os_error() == Some(26) && attempts < 10 => {
                attempts += 1;
                thread::sleep(Duration::from_millis(50));
            }
            result => return result,
        }
    }
}

fn copied_binary(project: &Path) -> (std::path::PathBuf, String) {
    let source = Path::new(env!("CARGO_BIN_EXE_mdbundle"));
    let name = source.file_name().unwrap().to_string_lossy().into_owned();
    let copy = project.join(&name);
    fs::copy(source, &copy).unwrap();
    (copy, name)
}

#[test]
fn test_own_executable_is_skipped_unless_included() {
    let temp_dir = tempdir().unwrap();
    let project = temp_dir.path().join("project");
    fs::create_dir(&project).unwrap();
    fs::write(project.join("main.rs"), "fn main() {}\n").unwrap();
    let (binary, name) = copied_binary(&project);

    let output = temp_dir.path().join("bundle.md");
    let status = run_with_retry(
        Command::new(&binary)
            .args(["-q", "--no-type-check"])
            .arg(&project)
            .arg(&output),
    )
    .unwrap();
    assert!(status.success());

    let doc = fs::read_to_string(&output).unwrap();
    assert!(doc.contains("└── main.rs"));
    assert!(!doc.contains(&format!("── {}\n", name)));
    assert!(!doc.lines().any(|l| l == format!("## {}", name)));

    let included = temp_dir.path().join("with_self.md");
    let status = run_with_retry(
        Command::new(&binary)
            .args(["-q", "--no-type-check", "--include-self"])
            .arg(&project)
            .arg(&included),
    )
    .unwrap();
    assert!(status.success());

    let doc = fs::read_to_string(&included).unwrap();
    assert!(doc.contains(&format!("── {}\n", name)));
    assert!(doc.lines().any(|l| l == format!("## {}", name)));
}
