#![allow(dead_code)]

use gluadoc::{SyntaxTree, TreeCall};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// A throwaway addon directory on disk
pub struct TestProject {
    pub dir: TempDir,
}

impl TestProject {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    pub fn add_file(&self, path: &str, content: &str) -> PathBuf {
        let file_path = self.dir.path().join(path);
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dirs");
        }
        fs::write(&file_path, content).expect("Failed to write file");
        file_path
    }

    pub fn read(&self, path: &str) -> String {
        fs::read_to_string(self.dir.path().join(path)).expect("Failed to read file")
    }

    /// Path of `path` inside the project, as the host would pass it
    pub fn uri(&self, path: &str) -> String {
        self.dir.path().join(path).to_string_lossy().into_owned()
    }
}

/// Minimal host tree: nodes are plain ids wired up by the test
#[derive(Debug, Default)]
pub struct MockTree {
    declarations: HashMap<String, usize>,
    bodies: HashMap<(String, String), usize>,
    calls: HashMap<usize, Vec<(String, TreeCall<usize>)>>,
    docs: HashMap<usize, Vec<String>>,
    next_id: usize,
}

impl MockTree {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            ..Self::default()
        }
    }

    fn fresh(&mut self) -> usize {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn declare(&mut self, global: &str) -> usize {
        let id = self.fresh();
        self.declarations.insert(global.to_string(), id);
        id
    }

    pub fn method(&mut self, owner: &str, method: &str) -> usize {
        let id = self.fresh();
        self.bodies
            .insert((owner.to_string(), method.to_string()), id);
        id
    }

    pub fn call(&mut self, block: usize, callee: &str, receiver: Option<&str>, args: &str) {
        let node = self.fresh();
        self.calls.entry(block).or_default().push((
            callee.to_string(),
            TreeCall {
                node,
                receiver: receiver.map(str::to_string),
                args: args.to_string(),
            },
        ));
    }

    /// Seed a doc line as if an earlier pass had attached it
    pub fn attach_existing(&mut self, node: usize, line: &str) {
        self.docs.entry(node).or_default().push(line.to_string());
    }

    pub fn doc_lines(&self, node: usize) -> Vec<String> {
        self.docs.get(&node).cloned().unwrap_or_default()
    }
}

impl SyntaxTree for MockTree {
    type Node = usize;

    fn scope_declaration(&self, global: &str) -> Option<usize> {
        self.declarations.get(global).copied()
    }

    fn method_body(&self, owner: &str, method: &str) -> Option<usize> {
        self.bodies
            .get(&(owner.to_string(), method.to_string()))
            .copied()
    }

    fn calls_in(&self, block: usize, callee: &str) -> Vec<TreeCall<usize>> {
        self.calls
            .get(&block)
            .map(|calls| {
                calls
                    .iter()
                    .filter(|(name, _)| name == callee)
                    .map(|(_, call)| call.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    fn docs(&self, node: usize) -> Vec<String> {
        self.doc_lines(node)
    }

    fn attach_doc(&mut self, node: usize, line: String) {
        self.docs.entry(node).or_default().push(line);
    }
}
