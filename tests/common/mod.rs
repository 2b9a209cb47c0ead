// Shared test fixtures for integration tests
// Functions here are used across different test files
#![allow(dead_code)]

use git2::{Oid, Repository, RepositoryInitOptions, Signature};
use repo_snapshot::repository::GitStore;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Create a temporary git repository with no commits, HEAD on an unborn `main`
pub fn create_test_repo() -> (TempDir, PathBuf, Repository) {
    let dir = TempDir::new().unwrap();
    let repo_path = dir.path().join("work");
    let mut opts = RepositoryInitOptions::new();
    opts.initial_head("main");
    let repo = Repository::init_opts(&repo_path, &opts).unwrap();

    // Configure git user for commits
    let mut config = repo.config().unwrap();
    config.set_str("user.name", "Test User").unwrap();
    config.set_str("user.email", "test@example.com").unwrap();

    (dir, repo_path, repo)
}

pub fn open_store(repo_path: &Path) -> GitStore {
    GitStore::open(repo_path).unwrap()
}

/// Signature with a fixed authored time so archive timestamps are predictable
pub fn signature_at(seconds: i64) -> Signature<'static> {
    Signature::new("Test User", "test@example.com", &git2::Time::new(seconds, 0)).unwrap()
}

/// Write files to the working directory, stage them and commit on HEAD
pub fn add_commit(repo: &Repository, files: &[(&str, &[u8])], message: &str) -> Oid {
    add_commit_at(repo, files, message, 1_700_000_000)
}

pub fn add_commit_at(
    repo: &Repository,
    files: &[(&str, &[u8])],
    message: &str,
    seconds: i64,
) -> Oid {
    let sig = signature_at(seconds);

    let mut index = repo.index().unwrap();

    for (path, content) in files {
        // Write file to working directory
        let full_path = repo.workdir().unwrap().join(path);
        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&full_path, content).unwrap();

        // Add to index
        index.add_path(Path::new(path)).unwrap();
    }

    index.write().unwrap();
    let tree_id = index.write_tree().unwrap();
    let tree = repo.find_tree(tree_id).unwrap();

    // Get parent commit if exists
    let parent = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
    let parents: Vec<&git2::Commit> = parent.iter().collect();

    repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
        .unwrap()
}

/// Commit the current index with an empty tree
pub fn empty_commit(repo: &Repository, message: &str) -> Oid {
    let sig = signature_at(1_700_000_000);
    let tree_id = repo.treebuilder(None).unwrap().write().unwrap();
    let tree = repo.find_tree(tree_id).unwrap();
    let parent = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
    let parents: Vec<&git2::Commit> = parent.iter().collect();
    repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
        .unwrap()
}

/// Create a commit with explicit parents without moving any ref
pub fn commit_with_parents(
    repo: &Repository,
    files: &[(&str, &[u8])],
    parents: &[Oid],
    message: &str,
) -> Oid {
    let sig = signature_at(1_700_000_000);
    let mut builder = repo.treebuilder(None).unwrap();
    for (name, content) in files {
        let blob = repo.blob(content).unwrap();
        builder.insert(*name, blob, 0o100644).unwrap();
    }
    let tree = repo.find_tree(builder.write().unwrap()).unwrap();
    let parent_commits: Vec<git2::Commit> =
        parents.iter().map(|p| repo.find_commit(*p).unwrap()).collect();
    let parent_refs: Vec<&git2::Commit> = parent_commits.iter().collect();
    repo.commit(None, &sig, &sig, message, &tree, &parent_refs)
        .unwrap()
}

/// Create or move a local branch
pub fn set_branch(repo: &Repository, name: &str, target: Oid) {
    let commit = repo.find_commit(target).unwrap();
    repo.branch(name, &commit, true).unwrap();
}

/// Copy every object reachable from `tip` in `src` into `dst`'s object
/// database without creating any refs
pub fn seed_objects(src: &Repository, dst: &Repository, tip: Oid) {
    let mut walk = src.revwalk().unwrap();
    walk.push(tip).unwrap();
    let mut builder = src.packbuilder().unwrap();
    builder.insert_walk(&mut walk).unwrap();
    let mut buf = git2::Buf::new();
    builder.write_buf(&mut buf).unwrap();

    let odb = dst.odb().unwrap();
    let mut writer = odb.packwriter().unwrap();
    std::io::Write::write_all(&mut writer, &buf).unwrap();
    writer.commit().unwrap();
}

/// Relative path -> content for every file in the working directory (excluding .git)
pub fn read_worktree(root: &Path) -> Vec<(String, Vec<u8>)> {
    fn walk(root: &Path, dir: &Path, out: &mut Vec<(String, Vec<u8>)>) {
        for entry in std::fs::read_dir(dir).unwrap() {
            let path = entry.unwrap().path();
            if path.file_name().is_some_and(|n| n == ".git") {
                continue;
            }
            if path.is_dir() {
                walk(root, &path, out);
            } else {
                let rel = path.strip_prefix(root).unwrap().to_string_lossy().replace('\\', "/");
                out.push((rel, std::fs::read(&path).unwrap()));
            }
        }
    }
    let mut out = Vec::new();
    walk(root, root, &mut out);
    out.sort();
    out
}
