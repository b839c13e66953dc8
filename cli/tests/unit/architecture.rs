//! Structural tests for architectural boundary enforcement.
//!
//! These scan source files to keep the layering intact: the domain is pure,
//! services only see ports, and infra never reaches up into presentation.

use std::path::{Path, PathBuf};

/// Collect all `.rs` files under a directory recursively.
fn collect_rs_files(dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    if let Ok(entries) = std::fs::read_dir(dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                files.extend(collect_rs_files(&path));
            } else if path.extension().and_then(|e| e.to_str()) == Some("rs") {
                files.push(path);
            }
        }
    }
    files
}

/// Track brace depth and report whether a line is inside a `#[cfg(test)]` block.
struct CfgTestTracker {
    in_test_block: bool,
    brace_depth: i32,
    test_block_start_depth: i32,
}

impl CfgTestTracker {
    fn new() -> Self {
        Self {
            in_test_block: false,
            brace_depth: 0,
            test_block_start_depth: 0,
        }
    }

    fn process_line(&mut self, line: &str) -> bool {
        if line.trim().contains("#[cfg(test)]") {
            self.in_test_block = true;
            self.test_block_start_depth = self.brace_depth;
        }
        for ch in line.chars() {
            match ch {
                '{' => self.brace_depth += 1,
                '}' => {
                    self.brace_depth -= 1;
                    if self.in_test_block && self.brace_depth <= self.test_block_start_depth {
                        self.in_test_block = false;
                    }
                }
                _ => {}
            }
        }
        self.in_test_block
    }
}

/// Non-comment lines outside `#[cfg(test)]` blocks, with their line numbers.
fn production_lines(path: &Path) -> Vec<(usize, String)> {
    let Ok(content) = std::fs::read_to_string(path) else {
        return Vec::new();
    };
    let mut tracker = CfgTestTracker::new();
    content
        .lines()
        .enumerate()
        .filter_map(|(i, line)| {
            let in_test = tracker.process_line(line);
            let trimmed = line.trim();
            (!in_test && !trimmed.starts_with("//")).then(|| (i + 1, line.to_string()))
        })
        .collect()
}

fn src(parts: &[&str]) -> PathBuf {
    let mut dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("src");
    for part in parts {
        dir = dir.join(part);
    }
    dir
}

fn violations(dir: &Path, forbidden: &[&str]) -> Vec<String> {
    let mut found = Vec::new();
    for file in collect_rs_files(dir) {
        let rel = file
            .strip_prefix(env!("CARGO_MANIFEST_DIR"))
            .unwrap_or(&file)
            .display()
            .to_string();
        for (lineno, line) in production_lines(&file) {
            for needle in forbidden {
                if line.contains(needle) {
                    found.push(format!("{rel}:{lineno}: `{needle}`: {}", line.trim()));
                }
            }
        }
    }
    found
}

#[test]
fn domain_is_free_of_io_and_outer_layers() {
    let found = violations(
        &src(&["domain"]),
        &[
            "crate::infra",
            "crate::commands",
            "crate::application",
            "crate::output",
            "tokio",
            "std::fs",
            "std::net",
            "suppaftp",
        ],
    );
    assert!(found.is_empty(), "domain/ must stay pure:\n{}", found.join("\n"));
}

#[test]
fn application_depends_only_on_domain_and_ports() {
    let found = violations(
        &src(&["application"]),
        &[
            "crate::infra",
            "crate::commands",
            "crate::output",
            "suppaftp",
            "std::fs",
            "println!",
        ],
    );
    assert!(
        found.is_empty(),
        "application/ must route I/O through ports:\n{}",
        found.join("\n")
    );
}

#[test]
fn infra_has_no_imports_from_commands_or_output() {
    let found = violations(&src(&["infra"]), &["crate::commands", "crate::output"]);
    assert!(
        found.is_empty(),
        "infra/ must not import from commands/ or output/:\n{}",
        found.join("\n")
    );
}

#[test]
fn infra_has_no_print_macros_outside_tests() {
    let found = violations(&src(&["infra"]), &["println!", "eprintln!"]);
    assert!(
        found.is_empty(),
        "infra/ must log through tracing, not print:\n{}",
        found.join("\n")
    );
}

#[test]
fn ftp_client_only_used_in_infra() {
    let mut found = Vec::new();
    for dir in ["commands", "output", "application", "domain"] {
        found.extend(violations(&src(&[dir]), &["suppaftp"]));
    }
    assert!(
        found.is_empty(),
        "suppaftp belongs behind the RemoteStore port:\n{}",
        found.join("\n")
    );
}

#[test]
fn no_inline_json_branching_in_commands() {
    let found = violations(&src(&["commands"]), &["json: bool"]);
    assert!(
        found.is_empty(),
        "use app.renderer() instead of threading a json flag:\n{}",
        found.join("\n")
    );
}
