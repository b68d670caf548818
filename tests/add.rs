use crate::common::command::{
    commit_file, get_branch_sha, init_repository_dir, repository_dir, run_twig_command, twig_commit,
};
use crate::common::file::{FileSpec, write_file, write_generated_files};
use assert_fs::TempDir;
use predicates::prelude::predicate;
use pretty_assertions::assert_eq;
use rstest::rstest;
use std::path::Path;

mod common;

fn staged_entries(dir: &Path) -> Result<serde_json::Value, Box<dyn std::error::Error>> {
    let index = std::fs::read_to_string(dir.join(".twig").join("index"))?;
    let index: serde_json::Value = serde_json::from_str(&index)?;
    Ok(index["entries"].clone())
}

#[rstest]
fn add_single_file_to_index(repository_dir: TempDir) -> Result<(), Box<dyn std::error::Error>> {
    run_twig_command(repository_dir.path(), &["init", "-q"])
        .assert()
        .success();
    write_file(FileSpec::new(
        repository_dir.path().join("hello.txt"),
        "Hello World".to_string(),
    ));

    run_twig_command(repository_dir.path(), &["add", "-v", "hello.txt"])
        .assert()
        .success()
        .stdout("add 'hello.txt'\n");

    assert_eq!(
        staged_entries(repository_dir.path())?,
        serde_json::json!({
            "hello.txt": {
                "path": "hello.txt",
                "hash": "5e1c309dae7f45e0f39b1bf3ac3cd9db12e7d689"
            }
        })
    );
    assert!(
        repository_dir
            .path()
            .join(".twig/objects/5e/1c309dae7f45e0f39b1bf3ac3cd9db12e7d689")
            .is_file()
    );

    Ok(())
}

#[rstest]
fn add_files_from_nested_directories(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    run_twig_command(repository_dir.path(), &["init", "-q"])
        .assert()
        .success();
    let nested = repository_dir.path().join("a").join("b");
    std::fs::create_dir_all(&nested)?;
    let files = write_generated_files(&nested, 3);

    run_twig_command(repository_dir.path(), &["add", "a"])
        .assert()
        .success();

    let entries = staged_entries(repository_dir.path())?;
    let staged = entries.as_object().ok_or("entries is not an object")?;
    assert_eq!(staged.len(), files.len());
    for file in files {
        let name = file.path.file_name().ok_or("no file name")?.to_string_lossy();
        assert!(staged.contains_key(&format!("a/b/{name}")));
    }

    Ok(())
}

#[rstest]
fn add_from_a_subdirectory_resolves_against_it(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    run_twig_command(repository_dir.path(), &["init", "-q"])
        .assert()
        .success();
    write_file(FileSpec::new(
        repository_dir.path().join("src").join("lib.rs"),
        "pub fn f() {}".to_string(),
    ));

    run_twig_command(&repository_dir.path().join("src"), &["add", "lib.rs"])
        .assert()
        .success();

    let entries = staged_entries(repository_dir.path())?;
    assert!(entries.get("src/lib.rs").is_some());

    Ok(())
}

#[rstest]
fn adding_a_missing_path_fails(repository_dir: TempDir) -> Result<(), Box<dyn std::error::Error>> {
    run_twig_command(repository_dir.path(), &["init", "-q"])
        .assert()
        .success();

    run_twig_command(repository_dir.path(), &["add", "nope.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "pathspec 'nope.txt' did not match any files",
        ));

    assert_eq!(staged_entries(repository_dir.path())?, serde_json::json!({}));

    Ok(())
}

#[rstest]
fn adding_a_directory_unstages_deleted_files(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let repository_dir = init_repository_dir;
    std::fs::remove_file(repository_dir.path().join("a").join("b").join("3.txt"))?;

    run_twig_command(repository_dir.path(), &["add", "."])
        .assert()
        .success();

    let entries = staged_entries(repository_dir.path())?;
    let mut staged = entries
        .as_object()
        .ok_or("entries is not an object")?
        .keys()
        .cloned()
        .collect::<Vec<_>>();
    staged.sort();
    assert_eq!(staged, vec!["1.txt", "a/2.txt"]);

    Ok(())
}

#[rstest]
fn metadata_directory_is_never_staged(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    run_twig_command(repository_dir.path(), &["init", "-q"])
        .assert()
        .success();
    write_file(FileSpec::new(
        repository_dir.path().join("file.txt"),
        "content".to_string(),
    ));

    run_twig_command(repository_dir.path(), &["add", "."])
        .assert()
        .success();

    let entries = staged_entries(repository_dir.path())?;
    let staged = entries.as_object().ok_or("entries is not an object")?;
    assert!(staged.keys().all(|path| !path.starts_with(".twig")));
    assert_eq!(staged.len(), 1);

    Ok(())
}

#[rstest]
fn metadata_files_named_directly_are_not_staged(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let repository_dir = init_repository_dir;

    for metadata_path in [".twig/refs/heads/master", ".twig/HEAD", ".twig/index", ".twig/refs"] {
        run_twig_command(repository_dir.path(), &["add", metadata_path])
            .assert()
            .success();
    }

    let entries = staged_entries(repository_dir.path())?;
    let staged = entries.as_object().ok_or("entries is not an object")?;
    assert!(staged.keys().all(|path| !path.starts_with(".twig")));
    assert_eq!(staged.len(), 3);

    // a staged ref copy would be written back over the live ref on switch
    twig_commit(repository_dir.path(), "Second commit")
        .assert()
        .success();
    run_twig_command(repository_dir.path(), &["branch", "side"])
        .assert()
        .success();
    commit_file(repository_dir.path(), "later.txt", "later", "Later commit");
    let master_tip = get_branch_sha(repository_dir.path(), "master")?;

    run_twig_command(repository_dir.path(), &["switch", "side"])
        .assert()
        .success();

    assert_eq!(get_branch_sha(repository_dir.path(), "master")?, master_tip);

    Ok(())
}

#[rstest]
fn identical_content_is_stored_once(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    run_twig_command(repository_dir.path(), &["init", "-q"])
        .assert()
        .success();
    write_file(FileSpec::new(
        repository_dir.path().join("a.txt"),
        "same bytes".to_string(),
    ));
    write_file(FileSpec::new(
        repository_dir.path().join("b").join("c.txt"),
        "same bytes".to_string(),
    ));

    run_twig_command(repository_dir.path(), &["add", "."])
        .assert()
        .success();

    let entries = staged_entries(repository_dir.path())?;
    let first = entries["a.txt"]["hash"].as_str().ok_or("a.txt is not staged")?;
    let second = entries["b/c.txt"]["hash"].as_str().ok_or("b/c.txt is not staged")?;
    assert_eq!(first, second);

    let objects_dir = repository_dir.path().join(".twig").join("objects");
    let shard = objects_dir.join(&first[..2]);
    assert_eq!(std::fs::read_dir(&shard)?.count(), 1);
    assert!(shard.join(&first[2..]).is_file());
    assert_eq!(std::fs::read_dir(&objects_dir)?.count(), 1);

    Ok(())
}

#[rstest]
fn names_with_tabs_or_line_breaks_are_rejected(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    run_twig_command(repository_dir.path(), &["init", "-q"])
        .assert()
        .success();
    write_file(FileSpec::new(
        repository_dir.path().join("bad\tname.txt"),
        "content".to_string(),
    ));

    run_twig_command(repository_dir.path(), &["add", "."])
        .assert()
        .failure()
        .stderr(predicate::str::contains("contains a tab or line break"));

    assert_eq!(staged_entries(repository_dir.path())?, serde_json::json!({}));

    Ok(())
}
