//! Override validation and application
//!
//! Precedence between packages comes from two sources:
//!
//! - A package's `override` list: every listed package ranks below it.
//! - The root package's `override-order`: every entry ranks below the next.
//!
//! Together they form a directed graph. It must be acyclic, and every pair
//! of packages that claims overlapping logical paths must be ordered by it
//! (directly or transitively). The final order is a topological sort of the
//! graph with ties broken by load order, so the result is deterministic.

use std::cmp::Reverse;
use std::collections::{BTreeSet, BinaryHeap, HashMap};

use log::{debug, warn};

use super::{LoadedPackage, RepositoryLoader};
use crate::error::{Error, Result};
use crate::path::is_ancestor_or_self;

impl RepositoryLoader<'_> {
    /// Check that every overlapping resource is covered by an override.
    ///
    /// Fails with [`Error::Conflict`] on an unresolved overlap and with
    /// [`Error::CycleDetected`] if the overrides contradict each other.
    pub fn validate_overrides(&mut self) -> Result<()> {
        self.precedence().map(|_| ())
    }

    /// Add every package's exports to the repository in precedence order.
    ///
    /// Validates first if [`validate_overrides`](Self::validate_overrides)
    /// has not been called since the last package was loaded.
    pub fn apply_overrides(&mut self) -> Result<()> {
        let order = self.precedence()?;
        for &index in &order {
            let package = &self.packages[index];
            for (logical, physical) in &package.exports {
                self.repository.add(logical, physical.clone());
            }
        }
        debug!(
            "Applied {} packages, {} resources mapped",
            order.len(),
            self.repository.len()
        );
        Ok(())
    }
}

/// Compute package indices from lowest to highest precedence.
pub(super) fn resolve_precedence(
    packages: &[LoadedPackage],
    override_order: &[String],
) -> Result<Vec<usize>> {
    let edges = precedence_edges(packages, override_order);
    let order = topological_order(&edges);

    if order.len() < packages.len() {
        let cycle = find_cycle(&edges)
            .into_iter()
            .map(|i| packages[i].name.as_str())
            .collect::<Vec<_>>()
            .join(" -> ");
        return Err(Error::CycleDetected { cycle });
    }

    check_conflicts(packages, &edges)?;
    Ok(order)
}

/// `edges[a]` holds every package that directly ranks above `a`.
fn precedence_edges(packages: &[LoadedPackage], override_order: &[String]) -> Vec<BTreeSet<usize>> {
    let index: HashMap<&str, usize> = packages
        .iter()
        .enumerate()
        .map(|(i, p)| (p.name.as_str(), i))
        .collect();
    let mut edges = vec![BTreeSet::new(); packages.len()];

    for (i, package) in packages.iter().enumerate() {
        for target in &package.overrides {
            match index.get(target.as_str()) {
                Some(&j) if j != i => {
                    edges[j].insert(i);
                }
                Some(_) => warn!("Package {} declares an override of itself", package.name),
                None => warn!(
                    "Package {} overrides {}, which is not installed",
                    package.name, target
                ),
            }
        }
    }

    let ordered: Vec<usize> = override_order
        .iter()
        .filter_map(|name| {
            let found = index.get(name.as_str()).copied();
            if found.is_none() {
                warn!("Package {} in \"override-order\" is not installed", name);
            }
            found
        })
        .collect();
    for pair in ordered.windows(2) {
        if pair[0] != pair[1] {
            edges[pair[0]].insert(pair[1]);
        }
    }

    edges
}

/// Kahn's algorithm; among ready packages the earliest loaded goes first.
fn topological_order(edges: &[BTreeSet<usize>]) -> Vec<usize> {
    let mut in_degree = vec![0usize; edges.len()];
    for targets in edges {
        for &t in targets {
            in_degree[t] += 1;
        }
    }

    let mut ready: BinaryHeap<Reverse<usize>> = in_degree
        .iter()
        .enumerate()
        .filter(|(_, &d)| d == 0)
        .map(|(i, _)| Reverse(i))
        .collect();

    let mut order = Vec::with_capacity(edges.len());
    while let Some(Reverse(node)) = ready.pop() {
        order.push(node);
        for &t in &edges[node] {
            in_degree[t] -= 1;
            if in_degree[t] == 0 {
                ready.push(Reverse(t));
            }
        }
    }
    order
}

/// Find one cycle in the graph, returned with its first node repeated at the end.
fn find_cycle(edges: &[BTreeSet<usize>]) -> Vec<usize> {
    #[derive(Clone, Copy, PartialEq)]
    enum Mark {
        New,
        Active,
        Done,
    }

    fn visit(node: usize, edges: &[BTreeSet<usize>], marks: &mut [Mark], stack: &mut Vec<usize>) -> bool {
        marks[node] = Mark::Active;
        stack.push(node);
        for &next in &edges[node] {
            match marks[next] {
                Mark::Active => {
                    let start = stack.iter().position(|&n| n == next).unwrap_or(0);
                    stack.drain(..start);
                    stack.push(next);
                    return true;
                }
                Mark::New => {
                    if visit(next, edges, marks, stack) {
                        return true;
                    }
                }
                Mark::Done => {}
            }
        }
        stack.pop();
        marks[node] = Mark::Done;
        false
    }

    let mut marks = vec![Mark::New; edges.len()];
    for start in 0..edges.len() {
        let mut stack = Vec::new();
        if marks[start] == Mark::New && visit(start, edges, &mut marks, &mut stack) {
            return stack;
        }
    }
    Vec::new()
}

/// Transitive closure: `reach[a]` holds every package ranking above `a`.
fn reachability(edges: &[BTreeSet<usize>]) -> Vec<BTreeSet<usize>> {
    (0..edges.len())
        .map(|start| {
            let mut seen = BTreeSet::new();
            let mut pending: Vec<usize> = edges[start].iter().copied().collect();
            while let Some(node) = pending.pop() {
                if seen.insert(node) {
                    pending.extend(edges[node].iter().copied());
                }
            }
            seen
        })
        .collect()
}

fn check_conflicts(packages: &[LoadedPackage], edges: &[BTreeSet<usize>]) -> Result<()> {
    let reach = reachability(edges);

    for (i, first) in packages.iter().enumerate() {
        for (j, second) in packages.iter().enumerate().skip(i + 1) {
            if reach[i].contains(&j) || reach[j].contains(&i) {
                continue;
            }
            for (a, _) in &first.exports {
                for (b, _) in &second.exports {
                    if !(is_ancestor_or_self(a, b) || is_ancestor_or_self(b, a)) {
                        continue;
                    }
                    let path = if a.len() >= b.len() { a } else { b };
                    return Err(Error::Conflict {
                        path: path.clone(),
                        message: format!(
                            "claimed by both {} and {}; declare an \"override\" in one of them \
                             or list both in the root package's \"override-order\"",
                            first.name, second.name
                        ),
                    });
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::super::tests::package;
    use super::*;
    use crate::repository::ResourceRepository;
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    /// A temp dir with `a/`, `b/` and `c/` subdirectories, each holding `file.txt`
    fn fixture() -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        for name in ["a", "b", "c"] {
            let dir = temp_dir.path().join(name);
            fs::create_dir(&dir).unwrap();
            fs::write(dir.join("file.txt"), name).unwrap();
        }
        temp_dir
    }

    fn physical(root: &Path, name: &str) -> PathBuf {
        crate::path::normalize(root.join(name)).unwrap()
    }

    #[test]
    fn test_disjoint_packages_do_not_conflict() {
        let temp_dir = fixture();
        let mut repo = ResourceRepository::new();
        {
            let mut loader = RepositoryLoader::new(&mut repo);
            loader
                .load_package(&package("__root__", r#"{"export": {"/app": "a"}}"#), temp_dir.path())
                .unwrap();
            loader
                .load_package(&package("acme/blog", r#"{"export": {"/acme/blog": "b"}}"#), temp_dir.path())
                .unwrap();
            loader.validate_overrides().unwrap();
            loader.apply_overrides().unwrap();
        }
        assert_eq!(repo.len(), 2);
        assert_eq!(repo.get("/app"), Some(physical(temp_dir.path(), "a").as_path()));
    }

    #[test]
    fn test_same_path_without_override_conflicts() {
        let temp_dir = fixture();
        let mut repo = ResourceRepository::new();
        let mut loader = RepositoryLoader::new(&mut repo);
        loader
            .load_package(&package("__root__", r#"{"export": {"res/a": "a"}}"#), temp_dir.path())
            .unwrap();
        loader
            .load_package(&package("acme/blog", r#"{"export": {"res/a": "b"}}"#), temp_dir.path())
            .unwrap();

        let err = loader.validate_overrides().unwrap_err();
        assert!(matches!(err, Error::Conflict { ref path, .. } if path == "res/a"));
        assert!(err.to_string().contains("__root__"));
        assert!(err.to_string().contains("acme/blog"));
    }

    #[test]
    fn test_nested_path_without_override_conflicts() {
        let temp_dir = fixture();
        let mut repo = ResourceRepository::new();
        let mut loader = RepositoryLoader::new(&mut repo);
        loader
            .load_package(&package("acme/blog", r#"{"export": {"/acme/blog": "a"}}"#), temp_dir.path())
            .unwrap();
        loader
            .load_package(
                &package("acme/theme", r#"{"export": {"/acme/blog/file.txt": "b/file.txt"}}"#),
                temp_dir.path(),
            )
            .unwrap();

        let err = loader.validate_overrides().unwrap_err();
        assert!(matches!(err, Error::Conflict { ref path, .. } if path == "/acme/blog/file.txt"));
    }

    #[test]
    fn test_override_wins_regardless_of_load_order() {
        let temp_dir = fixture();
        let mut repo = ResourceRepository::new();
        {
            let mut loader = RepositoryLoader::new(&mut repo);
            // The root overrides a package loaded after it
            loader
                .load_package(
                    &package("__root__", r#"{"export": {"res/a": "a"}, "override": "acme/blog"}"#),
                    temp_dir.path(),
                )
                .unwrap();
            loader
                .load_package(&package("acme/blog", r#"{"export": {"res/a": "b"}}"#), temp_dir.path())
                .unwrap();
            loader.validate_overrides().unwrap();
            loader.apply_overrides().unwrap();
        }
        assert_eq!(repo.get("res/a"), Some(physical(temp_dir.path(), "a").as_path()));
    }

    #[test]
    fn test_override_replaces_nested_mapping() {
        let temp_dir = fixture();
        let mut repo = ResourceRepository::new();
        {
            let mut loader = RepositoryLoader::new(&mut repo);
            loader
                .load_package(
                    &package("acme/theme", r#"{"export": {"/acme/blog/file.txt": "b/file.txt"}}"#),
                    temp_dir.path(),
                )
                .unwrap();
            loader
                .load_package(
                    &package("acme/blog", r#"{"export": {"/acme/blog": "a"}, "override": "acme/theme"}"#),
                    temp_dir.path(),
                )
                .unwrap();
            loader.apply_overrides().unwrap();
        }
        assert_eq!(repo.len(), 1);
        assert_eq!(
            repo.resolve("/acme/blog/file.txt"),
            Some(physical(temp_dir.path(), "a").join("file.txt"))
        );
    }

    #[test]
    fn test_transitive_override() {
        let temp_dir = fixture();
        let mut repo = ResourceRepository::new();
        {
            let mut loader = RepositoryLoader::new(&mut repo);
            loader
                .load_package(
                    &package("acme/c", r#"{"export": {"/x": "c"}, "override": "acme/b"}"#),
                    temp_dir.path(),
                )
                .unwrap();
            loader
                .load_package(&package("acme/a", r#"{"export": {"/x": "a"}}"#), temp_dir.path())
                .unwrap();
            loader
                .load_package(&package("acme/b", r#"{"override": "acme/a"}"#), temp_dir.path())
                .unwrap();
            loader.validate_overrides().unwrap();
            loader.apply_overrides().unwrap();
        }
        assert_eq!(repo.get("/x"), Some(physical(temp_dir.path(), "c").as_path()));
    }

    #[test]
    fn test_override_order_resolves_conflict() {
        let temp_dir = fixture();
        let mut repo = ResourceRepository::new();
        {
            let mut loader = RepositoryLoader::new(&mut repo);
            loader
                .load_package(
                    &package("__root__", r#"{"override-order": ["acme/b", "acme/a"]}"#),
                    temp_dir.path(),
                )
                .unwrap();
            loader
                .load_package(&package("acme/a", r#"{"export": {"/x": "a"}}"#), temp_dir.path())
                .unwrap();
            loader
                .load_package(&package("acme/b", r#"{"export": {"/x": "b"}}"#), temp_dir.path())
                .unwrap();
            loader.validate_overrides().unwrap();
            loader.apply_overrides().unwrap();
        }
        assert_eq!(repo.get("/x"), Some(physical(temp_dir.path(), "a").as_path()));
    }

    #[test]
    fn test_override_cycle() {
        let temp_dir = fixture();
        let mut repo = ResourceRepository::new();
        let mut loader = RepositoryLoader::new(&mut repo);
        loader
            .load_package(&package("acme/a", r#"{"override": "acme/b"}"#), temp_dir.path())
            .unwrap();
        loader
            .load_package(&package("acme/b", r#"{"override": "acme/a"}"#), temp_dir.path())
            .unwrap();

        let err = loader.validate_overrides().unwrap_err();
        match err {
            Error::CycleDetected { cycle } => {
                assert!(cycle.contains("acme/a"));
                assert!(cycle.contains("acme/b"));
            }
            other => panic!("expected a cycle, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_override_target_is_ignored() {
        let temp_dir = fixture();
        let mut repo = ResourceRepository::new();
        let mut loader = RepositoryLoader::new(&mut repo);
        loader
            .load_package(
                &package("acme/a", r#"{"export": {"/x": "a"}, "override": "acme/missing"}"#),
                temp_dir.path(),
            )
            .unwrap();
        assert!(loader.validate_overrides().is_ok());
    }

    #[test]
    fn test_ties_follow_load_order() {
        let edges = vec![BTreeSet::new(), BTreeSet::new(), BTreeSet::from([0])];
        // 0 ranks above 2, so it waits for 2; the ready nodes 1 and 2 go in load order
        assert_eq!(topological_order(&edges), vec![1, 2, 0]);
    }

    #[test]
    fn test_find_cycle_reports_closed_path() {
        let edges = vec![BTreeSet::from([1]), BTreeSet::from([2]), BTreeSet::from([1])];
        assert_eq!(find_cycle(&edges), vec![1, 2, 1]);
    }
}
