// Shared fixtures for tests driving real git repositories
#![allow(dead_code)]

use git2::{Oid, Repository, Signature};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub struct TestRepo {
    pub dir: TempDir,
    pub repo: Repository,
}

impl TestRepo {
    /// Empty repository with a committer identity configured
    pub fn init() -> Self {
        let dir = TempDir::new().expect("Could not create temp dir");
        let repo = Repository::init(dir.path()).expect("Could not init git repo");
        {
            let mut config = repo.config().expect("Could not get config");
            config
                .set_str("user.name", "Test User")
                .expect("Could not set user.name");
            config
                .set_str("user.email", "test@example.com")
                .expect("Could not set user.email");
        }
        TestRepo { dir, repo }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn read(&self, path: &str) -> String {
        fs::read_to_string(self.path().join(path)).expect("Could not read file")
    }

    /// Write `files` and commit them on top of HEAD
    pub fn commit(&self, message: &str, files: &[(&str, &str)]) -> Oid {
        let mut index = self.repo.index().expect("Could not get index");
        for (path, content) in files {
            let full = self.path().join(path);
            fs::create_dir_all(full.parent().unwrap()).unwrap();
            fs::write(&full, content).expect("Could not write file");
            index.add_path(Path::new(path)).expect("Could not add file");
        }
        index.write().expect("Could not write index");

        let tree_id = index.write_tree().expect("Could not write tree");
        let tree = self.repo.find_tree(tree_id).expect("Could not find tree");
        let signature = Signature::now("Test User", "test@example.com").unwrap();

        let parent = self.repo.head().ok().and_then(|h| h.peel_to_commit().ok());
        let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();

        self.repo
            .commit(Some("HEAD"), &signature, &signature, message, &tree, &parents)
            .expect("Could not create commit")
    }

    /// Annotated tag at `target`
    pub fn tag(&self, name: &str, target: Oid) {
        let object = self.repo.find_object(target, None).unwrap();
        let signature = Signature::now("Test User", "test@example.com").unwrap();
        self.repo
            .tag(name, &object, &signature, name, false)
            .expect("Could not create tag");
    }

    pub fn add_remote(&self, name: &str, url: &str) {
        self.repo.remote(name, url).expect("Could not add remote");
    }

    /// Bare repository registered as remote `name`
    pub fn add_bare_remote(&self, name: &str) -> TempDir {
        let bare = TempDir::new().expect("Could not create temp dir");
        Repository::init_bare(bare.path()).expect("Could not init bare repo");
        let url = bare.path().to_string_lossy().into_owned();
        self.add_remote(name, &url);
        bare
    }

    pub fn head(&self) -> git2::Commit<'_> {
        self.repo.head().unwrap().peel_to_commit().unwrap()
    }

    pub fn branch(&self) -> String {
        self.repo.head().unwrap().shorthand().unwrap().to_string()
    }

    pub fn file(&self, path: &str) -> PathBuf {
        self.path().join(path)
    }
}
