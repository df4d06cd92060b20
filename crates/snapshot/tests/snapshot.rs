use codeslice_chunker::Chunk;
use codeslice_snapshot::{
    generate_snapshot, generate_snapshots, DependencyKind, InMemorySourceIndex, Snapshot,
    SnapshotConfig, SnapshotError, SnapshotGenerator, SourceIndex,
};
use pretty_assertions::assert_eq;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn index_with(files: &[(&str, &str)]) -> InMemorySourceIndex {
    init_logging();
    let mut index = InMemorySourceIndex::new();
    for (relative_path, source) in files {
        index
            .insert(*source, &format!("/repo/{relative_path}"), relative_path)
            .expect("indexing failed");
    }
    index
}

fn target(index: &InMemorySourceIndex, relative_path: &str, name: &str) -> Chunk {
    index
        .file(&format!("/repo/{relative_path}"))
        .and_then(|file| file.chunk_named(name))
        .unwrap_or_else(|| panic!("no chunk {name} in {relative_path}"))
        .clone()
}

fn snapshot_of(index: &InMemorySourceIndex, relative_path: &str, names: &[&str]) -> Snapshot {
    let targets: Vec<Chunk> = names
        .iter()
        .map(|name| target(index, relative_path, name))
        .collect();
    generate_snapshot(index, &targets).expect("snapshot failed")
}

const WORKER: &str = r#"const MAX_RETRIES = 3;
const BATCH_SIZE = 50;

export class Worker {
  retry(task: () => void): number {
    for (let i = 0; i < MAX_RETRIES; i++) task();
    return MAX_RETRIES;
  }

  batch(items: string[]): string[][] {
    return [items.slice(0, BATCH_SIZE)];
  }
}
"#;

#[test]
fn member_target_pulls_only_its_constant_and_wrapper() {
    let index = index_with(&[("src/worker.ts", WORKER)]);
    let snapshot = snapshot_of(&index, "src/worker.ts", &["retry"]);

    assert_eq!(
        snapshot.snapshot,
        "// src/worker.ts\n\nconst MAX_RETRIES = 3;\n\nexport class Worker {\n  retry(task: () => void): number {\n    for (let i = 0; i < MAX_RETRIES; i++) task();\n    return MAX_RETRIES;\n  }\n}\n"
    );
    assert!(!snapshot.snapshot.contains("BATCH_SIZE"));
    assert!(!snapshot.snapshot.contains("batch("));

    assert_eq!(snapshot.target_count, 1);
    assert_eq!(snapshot.dependency_count, 2);
    let kinds: Vec<_> = snapshot.dependencies.iter().map(|dep| dep.kind).collect();
    assert_eq!(
        kinds,
        vec![DependencyKind::Constant, DependencyKind::ContainerDeclaration]
    );
    assert_eq!(snapshot.dependencies[1].source_text, "export class Worker {");
}

#[test]
fn empty_targets_rejected() {
    let index = index_with(&[("src/worker.ts", WORKER)]);
    let err = generate_snapshot(&index, &[]).unwrap_err();

    assert!(matches!(err, SnapshotError::NoTargets));
    assert!(err.to_string().contains("at least one target"));
}

#[test]
fn targets_from_two_files_rejected() {
    let index = index_with(&[
        ("src/worker.ts", WORKER),
        ("src/other.ts", "export const other = 1;\n"),
    ]);
    let targets = vec![
        target(&index, "src/worker.ts", "retry"),
        target(&index, "src/other.ts", "other"),
    ];
    let err = generate_snapshot(&index, &targets).unwrap_err();

    let message = err.to_string();
    assert!(message.contains("same file"), "{message}");
    assert!(message.contains("/repo/src/worker.ts"));
    assert!(message.contains("/repo/src/other.ts"));
    match err {
        SnapshotError::MixedFiles { paths } => assert_eq!(paths.len(), 2),
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn unindexed_file_rejected() {
    let index = index_with(&[("src/worker.ts", WORKER)]);
    let retry = target(&index, "src/worker.ts", "retry");

    let empty = InMemorySourceIndex::new();
    let err = generate_snapshot(&empty, &[retry]).unwrap_err();
    assert!(matches!(err, SnapshotError::FileNotIndexed(_)));
}

const RUNNER: &str = r#"import { Logger } from './logger';
import type { Options } from './options';
import { unused } from './unused';

/** Shared instance */
const log = new Logger();

export function run(opts: Options): void {
  log.info(opts);
}
"#;

#[test]
fn imports_and_transitive_declarations_render_in_order() {
    let index = index_with(&[("src/run.ts", RUNNER)]);
    let snapshot = snapshot_of(&index, "src/run.ts", &["run"]);

    assert_eq!(
        snapshot.snapshot,
        "// src/run.ts\n\nimport { Logger } from './logger';\nimport type { Options } from './options';\n\n/** Shared instance */\nconst log = new Logger();\n\nexport function run(opts: Options): void {\n  log.info(opts);\n}\n"
    );
    let kinds: Vec<_> = snapshot.dependencies.iter().map(|dep| dep.kind).collect();
    assert_eq!(
        kinds,
        vec![
            DependencyKind::Import,
            DependencyKind::TypeImport,
            DependencyKind::Constant
        ]
    );
}

#[test]
fn identical_import_statements_render_once() {
    let source = "import { a } from './a';\nimport { a } from './a';\n\nexport const b = a + 1;\n";
    let index = index_with(&[("src/b.ts", source)]);
    let snapshot = snapshot_of(&index, "src/b.ts", &["b"]);

    assert_eq!(
        snapshot.snapshot,
        "// src/b.ts\n\nimport { a } from './a';\n\nexport const b = a + 1;\n"
    );
}

#[test]
fn imports_sharing_a_line_resolve_individually() {
    let source = "import a from 'a'; import b from 'b';\n\nexport function f() {\n  return b();\n}\n";
    let index = index_with(&[("src/a.ts", source)]);
    let snapshot = snapshot_of(&index, "src/a.ts", &["f"]);

    assert_eq!(
        snapshot.snapshot,
        "// src/a.ts\n\nimport b from 'b';\n\nexport function f() {\n  return b();\n}\n"
    );
    assert_eq!(snapshot.dependency_count, 1);
    assert_eq!(snapshot.dependencies[0].kind, DependencyKind::Import);
    assert_eq!(snapshot.dependencies[0].name, "b");
    assert_eq!(snapshot.dependencies[0].start_line, 1);
}

const CFG: &str = r#"export class Cfg {
  static LIMIT = 3;
  static OTHER = 4;

  check(n: number) {
    return n < Cfg.LIMIT;
  }
}
"#;

#[test]
fn static_members_read_through_the_class_name_are_kept() {
    let index = index_with(&[("src/cfg.ts", CFG)]);
    let snapshot = snapshot_of(&index, "src/cfg.ts", &["check"]);

    assert_eq!(
        snapshot.snapshot,
        "// src/cfg.ts\n\nexport class Cfg {\n  static LIMIT = 3;\n\n  check(n: number) {\n    return n < Cfg.LIMIT;\n  }\n}\n"
    );
    assert!(!snapshot.snapshot.contains("OTHER"));
    let kinds: Vec<_> = snapshot.dependencies.iter().map(|dep| dep.kind).collect();
    assert_eq!(
        kinds,
        vec![
            DependencyKind::ContainerDeclaration,
            DependencyKind::MemberProperty
        ]
    );
}

#[test]
fn snapshots_are_idempotent() {
    let index = index_with(&[("src/run.ts", RUNNER)]);
    let run = target(&index, "src/run.ts", "run");

    let first = generate_snapshot(&index, &[run.clone()]).unwrap();
    let second = generate_snapshot(&index, &[run.clone(), run]).unwrap();

    assert_eq!(first.snapshot, second.snapshot);
    assert_eq!(first.dependency_count, second.dependency_count);
    assert_eq!(second.target_count, 1);
}

#[test]
fn transitive_dependencies_appear_exactly_once() {
    let source = r#"const BASE = 2;
const SCALE = BASE * 10;
const UNRELATED = 'x';

function helper(n: number): number {
  return n * SCALE + BASE;
}

export function compute(x: number): number {
  return helper(x);
}
"#;
    let index = index_with(&[("src/compute.ts", source)]);
    let snapshot = snapshot_of(&index, "src/compute.ts", &["compute"]);

    for needle in ["const BASE", "const SCALE", "function helper"] {
        assert_eq!(snapshot.snapshot.matches(needle).count(), 1, "{needle}");
    }
    assert!(!snapshot.snapshot.contains("UNRELATED"));
    assert_eq!(snapshot.dependency_count, 3);
}

#[test]
fn nested_containers_are_wrapped_recursively() {
    let source = r#"export namespace Outer {
  export const LIMIT = 5;

  export class Inner {
    private count = 0;
    private label = 'x';

    bump(): number {
      this.count += LIMIT;
      return this.count;
    }

    name(): string {
      return this.label;
    }
  }
}
"#;
    let index = index_with(&[("src/outer.ts", source)]);
    let snapshot = snapshot_of(&index, "src/outer.ts", &["bump"]);

    assert_eq!(
        snapshot.snapshot,
        "// src/outer.ts\n\nexport namespace Outer {\n  export const LIMIT = 5;\n\n  export class Inner {\n    private count = 0;\n\n    bump(): number {\n      this.count += LIMIT;\n      return this.count;\n    }\n  }\n}\n"
    );
    assert_eq!(
        snapshot
            .dependencies_of(DependencyKind::MemberProperty)
            .map(|dep| dep.name.as_str())
            .collect::<Vec<_>>(),
        vec!["LIMIT", "count"]
    );
    assert_eq!(
        snapshot
            .dependencies_of(DependencyKind::ContainerDeclaration)
            .count(),
        2
    );
}

#[test]
fn object_literal_members_use_this_properties() {
    let source = r#"const LIMIT = 3;

export const api = {
  retries: LIMIT,
  timeout: 100,

  fetch(url) {
    return request(url, this.retries);
  },

  close() {
    return null;
  },
};
"#;
    let index = index_with(&[("src/api.js", source)]);
    let snapshot = snapshot_of(&index, "src/api.js", &["fetch"]);

    assert_eq!(
        snapshot.snapshot,
        "// src/api.js\n\nconst LIMIT = 3;\n\nexport const api = {\n  retries: LIMIT,\n\n  fetch(url) {\n    return request(url, this.retries);\n  },\n};\n"
    );
}

#[test]
fn nested_targets_fold_into_enclosing_target() {
    let index = index_with(&[("src/worker.ts", WORKER)]);
    let snapshot = snapshot_of(&index, "src/worker.ts", &["retry", "Worker"]);

    assert_eq!(snapshot.target_count, 2);
    assert_eq!(snapshot.snapshot.matches("retry(").count(), 1);
    assert!(snapshot.snapshot.contains("const BATCH_SIZE = 50;"));
    assert_eq!(
        snapshot
            .dependencies_of(DependencyKind::ContainerDeclaration)
            .count(),
        0
    );
}

#[test]
fn batch_groups_targets_by_file() {
    let index = index_with(&[
        ("src/worker.ts", WORKER),
        ("src/run.ts", RUNNER),
    ]);
    let targets = vec![
        target(&index, "src/worker.ts", "retry"),
        target(&index, "src/run.ts", "run"),
        target(&index, "src/worker.ts", "batch"),
    ];

    let snapshots: Vec<Snapshot> = generate_snapshots(&index, &targets)
        .into_iter()
        .collect::<Result<_, _>>()
        .unwrap();

    assert_eq!(snapshots.len(), 2);
    assert_eq!(snapshots[0].relative_path, "src/worker.ts");
    assert_eq!(snapshots[0].target_count, 2);
    assert!(snapshots[0].snapshot.contains("BATCH_SIZE"));
    assert_eq!(snapshots[1].relative_path, "src/run.ts");
}

#[test]
fn custom_header_prefix() {
    let index = index_with(&[("src/worker.ts", WORKER)]);
    let generator = SnapshotGenerator::new(SnapshotConfig {
        header_prefix: "#".to_string(),
        ..Default::default()
    })
    .unwrap();
    let snapshot = generator
        .generate(&index, &[target(&index, "src/worker.ts", "batch")])
        .unwrap();
    assert!(snapshot.snapshot.starts_with("# src/worker.ts\n\n"));
}

#[test]
fn invalid_config_rejected() {
    let config = SnapshotConfig {
        indent_unit: String::new(),
        ..Default::default()
    };
    assert!(matches!(
        SnapshotGenerator::new(config),
        Err(SnapshotError::InvalidConfig(_))
    ));
}

#[test]
fn snapshot_serializes_with_camel_case_keys() {
    let index = index_with(&[("src/worker.ts", WORKER)]);
    let snapshot = snapshot_of(&index, "src/worker.ts", &["retry"]);
    let json = serde_json::to_value(&snapshot).unwrap();

    assert!(json.get("relativePath").is_some());
    assert!(json.get("targetCount").is_some());
    assert_eq!(json["dependencies"][1]["kind"], "containerDeclaration");
    assert!(json["dependencies"][0].get("sourceText").is_some());
}
