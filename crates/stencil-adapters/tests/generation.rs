//! End-to-end generation through the real adapters.

use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use stencil_adapters::{
    ConfigLoader, LocalFilesystem, MemoryFetcher, MemoryFilesystem, TextTemplateRenderer,
    config_loader::ConfigFormat,
};
use stencil_core::{
    application::ApplicationError,
    domain::{DomainError, NameKind},
    error::StencilError,
    prelude::*,
};
use tempfile::TempDir;

// ── Helpers ──────────────────────────────────────────────────────────────────

fn dispatcher(fs: Arc<dyn Filesystem>, fetcher: MemoryFetcher) -> Dispatcher {
    let materializer = FileMaterializer::new(
        Arc::new(fetcher),
        Arc::new(TextTemplateRenderer::new()),
        fs.clone(),
    );
    Dispatcher::new(RepositoryProcessor::new(materializer, fs))
}

/// Validate, then generate every repository. Mirrors `stencil generate`.
fn generate(
    config: &Configuration,
    fs: MemoryFilesystem,
    fetcher: MemoryFetcher,
    parallelism: usize,
) -> Result<DispatchReport, StencilError> {
    ConfigValidator::new(Box::new(fs.clone())).validate(config)?;
    dispatcher(Arc::new(fs), fetcher).run(
        config,
        None,
        Parallelism::new(parallelism)?,
        Path::new("out"),
    )
}

fn parse(yaml: &str) -> Configuration {
    ConfigLoader::new("templates")
        .parse(yaml, ConfigFormat::Yaml)
        .unwrap()
}

// ── Behaviour ────────────────────────────────────────────────────────────────

#[test]
fn readme_is_rendered_for_each_repository_on_disk() {
    let work = TempDir::new().unwrap();
    let config_path = work.path().join("stencil.yaml");
    fs::write(
        &config_path,
        r##"
templateGroups:
  base:
    - filename: README.md
      content: "# {{ .Name }}"
repositories:
  - name: svc-a
    groups:
      - groupName: base
        values:
          Name: svc-a
  - name: svc-b
    groups:
      - groupName: base
        values:
          Name: svc-b
"##,
    )
    .unwrap();

    let config = ConfigLoader::new(work.path().join("templates"))
        .load(&config_path)
        .unwrap();
    ConfigValidator::new(Box::new(LocalFilesystem::new()))
        .validate(&config)
        .unwrap();

    let out = work.path().join("out");
    let report = dispatcher(Arc::new(LocalFilesystem::new()), MemoryFetcher::new())
        .run(&config, None, Parallelism::default(), &out)
        .unwrap();

    assert!(report.is_success());
    assert_eq!(
        fs::read_to_string(out.join("svc-a/README.md")).unwrap(),
        "# svc-a"
    );
    assert_eq!(
        fs::read_to_string(out.join("svc-b/README.md")).unwrap(),
        "# svc-b"
    );
}

#[test]
fn local_templates_are_read_from_the_templates_directory() {
    let work = TempDir::new().unwrap();
    let templates = work.path().join("templates");
    fs::create_dir_all(templates.join("ci")).unwrap();
    fs::write(templates.join("ci/build.yml"), "name: build {{ .Name }}\n").unwrap();
    fs::write(
        templates.join("ci/release.yml"),
        "token: ${{ secrets.TOKEN }}\n",
    )
    .unwrap();

    let config = ConfigLoader::new(&templates)
        .parse(
            r##"
repositories:
  - name: svc
    files:
      - filename: .github/workflows/build.yml
        sourceFile: ci/build.yml
        values: { Name: svc }
      - filename: .github/workflows/release.yml
        sourceFile: ci/release.yml
"##,
            ConfigFormat::Yaml,
        )
        .unwrap();
    ConfigValidator::new(Box::new(LocalFilesystem::new()))
        .validate(&config)
        .unwrap();

    let out = work.path().join("out");
    let report = dispatcher(Arc::new(LocalFilesystem::new()), MemoryFetcher::new())
        .run(&config, None, Parallelism::default(), &out)
        .unwrap();

    let summary = report.outcomes[0].result.as_ref().unwrap();
    assert_eq!((summary.rendered, summary.copied), (1, 1));
    assert_eq!(
        fs::read_to_string(out.join("svc/.github/workflows/build.yml")).unwrap(),
        "name: build svc\n"
    );
    assert_eq!(
        fs::read_to_string(out.join("svc/.github/workflows/release.yml")).unwrap(),
        "token: ${{ secrets.TOKEN }}\n"
    );
}

#[test]
fn duplicate_repository_names_generate_nothing() {
    let fs = MemoryFilesystem::new();
    let config = parse(
        r##"
repositories:
  - name: svc
    files:
      - { filename: a.txt, content: a }
  - name: svc
    files:
      - { filename: b.txt, content: b }
"##,
    );

    let err = generate(&config, fs.clone(), MemoryFetcher::new(), 2).unwrap_err();

    assert!(matches!(
        err,
        StencilError::Domain(DomainError::DuplicateName {
            kind: NameKind::Repository,
            ..
        })
    ));
    assert!(fs.list_files().is_empty());
}

#[test]
fn conflicting_sources_are_rejected_before_generation() {
    let fs = MemoryFilesystem::new();
    let config = parse(
        r##"
templateGroups:
  base:
    - filename: README.md
      content: "# hi"
      sourceUrl: https://example.com/README.md
repositories:
  - name: svc
    groups:
      - groupName: base
"##,
    );

    let err = generate(&config, fs.clone(), MemoryFetcher::new(), 1).unwrap_err();

    assert!(matches!(
        err,
        StencilError::Domain(DomainError::ConflictingSource { .. })
    ));
    assert!(fs.list_files().is_empty());
}

#[test]
fn group_reference_values_override_file_values() {
    let fs = MemoryFilesystem::new();
    let config = parse(
        r##"
templateGroups:
  base:
    - filename: values.txt
      content: "{{ .a }} {{ .b }} {{ .c }}"
      values: { b: 3, c: 4 }
repositories:
  - name: svc
    groups:
      - groupName: base
        values: { a: 1, b: 2 }
"##,
    );

    generate(&config, fs.clone(), MemoryFetcher::new(), 1).unwrap();

    assert_eq!(fs.file_text("out/svc/values.txt").unwrap(), "1 2 4");
}

/// File names directly under `dir`, sorted.
fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<_> = fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

/// Generate `yaml` into `<work>/out` on the real filesystem.
fn generate_on_disk(work: &Path, yaml: &str) -> DispatchReport {
    let config = ConfigLoader::new(work.join("templates"))
        .parse(yaml, ConfigFormat::Yaml)
        .unwrap();
    ConfigValidator::new(Box::new(LocalFilesystem::new()))
        .validate(&config)
        .unwrap();
    dispatcher(Arc::new(LocalFilesystem::new()), MemoryFetcher::new())
        .run(&config, None, Parallelism::default(), &work.join("out"))
        .unwrap()
}

#[test]
fn regeneration_replaces_previous_output() {
    let work = TempDir::new().unwrap();

    let first = generate_on_disk(
        work.path(),
        r##"
repositories:
  - name: svc
    files:
      - { filename: README.md, content: "# first" }
      - { filename: old.txt, content: "only in the first run" }
"##,
    );
    assert!(first.is_success());
    assert_eq!(file_names(&work.path().join("out/svc")), ["README.md", "old.txt"]);

    let second = generate_on_disk(
        work.path(),
        r##"
repositories:
  - name: svc
    files:
      - { filename: README.md, content: "# second" }
      - { filename: new.txt, content: "only in the second run" }
"##,
    );
    assert!(second.is_success());

    let svc = work.path().join("out/svc");
    assert_eq!(file_names(&svc), ["README.md", "new.txt"]);
    assert_eq!(fs::read_to_string(svc.join("README.md")).unwrap(), "# second");
}

#[test]
fn a_plain_file_in_place_of_the_output_directory_is_replaced() {
    let work = TempDir::new().unwrap();
    fs::create_dir_all(work.path().join("out")).unwrap();
    fs::write(work.path().join("out/svc"), "not a directory").unwrap();

    let report = generate_on_disk(
        work.path(),
        r##"
repositories:
  - name: svc
    files:
      - { filename: README.md, content: "# svc" }
"##,
    );

    assert!(report.is_success());
    assert!(work.path().join("out/svc").is_dir());
    assert_eq!(
        fs::read_to_string(work.path().join("out/svc/README.md")).unwrap(),
        "# svc"
    );
}

#[test]
fn empty_repository_name_leaves_sibling_output_alone() {
    let work = TempDir::new().unwrap();
    let keep = work.path().join("out/other/keep.txt");
    fs::create_dir_all(keep.parent().unwrap()).unwrap();
    fs::write(&keep, "keep").unwrap();

    let config = ConfigLoader::new(work.path().join("templates"))
        .parse(
            r##"
repositories:
  - name: ""
    files:
      - { filename: README.md, content: "# root" }
"##,
            ConfigFormat::Yaml,
        )
        .unwrap();

    let err = ConfigValidator::new(Box::new(LocalFilesystem::new()))
        .validate(&config)
        .unwrap_err();

    assert!(matches!(
        err,
        StencilError::Domain(DomainError::InvalidRepositoryName { .. })
    ));
    assert_eq!(fs::read_to_string(&keep).unwrap(), "keep");
}

#[test]
fn local_templates_support_conditionals_and_loops() {
    let work = TempDir::new().unwrap();
    let templates = work.path().join("templates");
    fs::create_dir_all(&templates).unwrap();
    fs::write(
        templates.join("CODEOWNERS"),
        "{{ range .Owners }}* @{{ . }}\n{{ end }}",
    )
    .unwrap();
    fs::write(
        templates.join("ci.yml"),
        "deploy: {{ if .Deploy }}on{{ else }}off{{ end }}\nteam: {{ .Team }}\n",
    )
    .unwrap();

    let report = generate_on_disk(
        work.path(),
        r##"
repositories:
  - name: svc
    files:
      - filename: CODEOWNERS
        sourceFile: CODEOWNERS
        values: { Owners: [alice, bob] }
      - filename: ci.yml
        sourceFile: ci.yml
        values: { Deploy: false }
"##,
    );

    let summary = report.outcomes[0].result.as_ref().unwrap();
    assert_eq!(summary.rendered, 2);
    let svc = work.path().join("out/svc");
    assert_eq!(
        fs::read_to_string(svc.join("CODEOWNERS")).unwrap(),
        "* @alice\n* @bob\n"
    );
    assert_eq!(
        fs::read_to_string(svc.join("ci.yml")).unwrap(),
        "deploy: off\nteam: <no value>\n"
    );
}

#[test]
fn remote_files_render_or_fall_back_to_raw_bytes() {
    let fetcher = MemoryFetcher::new()
        .with_body("https://example.com/NOTICE", "Copyright {{ .Owner }}")
        .with_body("https://example.com/chart.yaml", "{{ include \"x\" . }}")
        .with_body("https://example.com/logo.png", [0x89u8, 0x50, 0x4e, 0x47, 0xff]);
    let fs = MemoryFilesystem::new();
    let config = parse(
        r##"
repositories:
  - name: svc
    files:
      - filename: NOTICE
        sourceUrl: https://example.com/NOTICE
        values: { Owner: Acme }
      - filename: chart.yaml
        sourceUrl: https://example.com/chart.yaml
      - filename: logo.png
        sourceUrl: https://example.com/logo.png
"##,
    );

    generate(&config, fs.clone(), fetcher, 1).unwrap();

    assert_eq!(fs.file_text("out/svc/NOTICE").unwrap(), "Copyright Acme");
    assert_eq!(
        fs.file_text("out/svc/chart.yaml").unwrap(),
        "{{ include \"x\" . }}"
    );
    assert_eq!(
        fs.read_file(Path::new("out/svc/logo.png")).unwrap(),
        vec![0x89, 0x50, 0x4e, 0x47, 0xff]
    );
}

#[test]
fn failing_repository_does_not_affect_the_others() {
    let fs = MemoryFilesystem::new();
    let config = parse(
        r##"
repositories:
  - name: a
    files:
      - { filename: ok.txt, content: "a" }
  - name: b
    files:
      - { filename: ok.txt, content: "b" }
      - { filename: bad.txt, content: "{{ .Missing" }
  - name: c
    files:
      - filename: remote.txt
        sourceUrl: https://example.com/gone
  - name: d
    files:
      - { filename: ok.txt, content: "d" }
"##,
    );

    let report = generate(&config, fs.clone(), MemoryFetcher::new(), 2).unwrap();

    let failed: Vec<_> = report.failed().map(|o| o.repository.as_str()).collect();
    assert_eq!(failed, vec!["b", "c"]);
    assert_eq!(fs.file_text("out/a/ok.txt").unwrap(), "a");
    assert_eq!(fs.file_text("out/d/ok.txt").unwrap(), "d");
    // Files written before the failure stay on disk.
    assert_eq!(fs.file_text("out/b/ok.txt").unwrap(), "b");

    let c = &report.outcomes[2];
    match &c.result {
        Err(StencilError::Application(ApplicationError::RepositoryFailed { source, .. })) => {
            assert!(matches!(
                **source,
                StencilError::Application(ApplicationError::SourceUnavailable { .. })
            ));
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
}

#[derive(Default)]
struct PeakCounter {
    active: AtomicUsize,
    peak: AtomicUsize,
}

struct Observer(Arc<PeakCounter>);

impl DispatchObserver for Observer {
    fn on_started(&self, _repository: &str) {
        let now = self.0.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.0.peak.fetch_max(now, Ordering::SeqCst);
    }

    fn on_finished(&self, _outcome: &RepositoryOutcome) {
        self.0.active.fetch_sub(1, Ordering::SeqCst);
    }
}

#[test]
fn at_most_max_parallel_repositories_run_at_once() {
    let mut yaml = String::from("repositories:\n");
    for i in 0..8 {
        yaml.push_str(&format!(
            "  - name: svc-{i}\n    files:\n      - {{ filename: f, sourceUrl: \"https://example.com/f\" }}\n"
        ));
    }
    let config = parse(&yaml);

    let fetcher = MemoryFetcher::new()
        .with_body("https://example.com/f", "body")
        .with_delay(Duration::from_millis(25));
    let requests = fetcher.clone();
    let counter = Arc::new(PeakCounter::default());

    let fs = MemoryFilesystem::new();
    let report = dispatcher(Arc::new(fs.clone()), fetcher)
        .with_observer(Box::new(Observer(counter.clone())))
        .run(&config, None, Parallelism::new(2).unwrap(), Path::new("out"))
        .unwrap();

    assert!(report.is_success());
    assert_eq!(requests.request_count(), 8);
    let peak = counter.peak.load(Ordering::SeqCst);
    assert!((1..=2).contains(&peak), "peak = {peak}");
}

#[test]
fn repository_filter_limits_generation() {
    let fs = MemoryFilesystem::new();
    let config = parse(
        r##"
repositories:
  - name: a
    files: [{ filename: x, content: a }]
  - name: b
    files: [{ filename: x, content: b }]
"##,
    );

    let report = dispatcher(Arc::new(fs.clone()), MemoryFetcher::new())
        .run(&config, Some("b"), Parallelism::default(), Path::new("out"))
        .unwrap();

    assert_eq!(report.outcomes.len(), 1);
    assert!(!fs.exists(Path::new("out/a")));
    assert_eq!(fs.file_text("out/b/x").unwrap(), "b");
}
