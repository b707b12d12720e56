use docsite::model::MetadataModel;
use docsite::site::{generate, SiteConfig, SiteReport};
use docsite::{linker_file_name, Error, LINKER_SUFFIX};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name))
}

fn touch(root: &Path, rel: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, "// source\n").unwrap();
}

/// Source tree matching `Widgets.json`, plus directories the site must ignore.
fn source_tree(root: &Path) {
    for rel in [
        "Widget.cs",
        "Program.cs",
        "Models/Gadget.cs",
        "Models/Helpers.cs",
        "Models/Sprocket.cs",
        "Data/Access/Repository.cs",
        "obj/Debug/Widget.cs",
        "Empty/obj/Temp.cs",
        "Properties/AssemblyInfo.cs",
        ".vs/Widget.cs",
    ] {
        touch(root, rel);
    }
    touch(root, "bin/Debug/Widgets.dll");
    touch(root, "bin/Widgets.dll");
}

struct Run {
    dir: TempDir,
    site: PathBuf,
    report: SiteReport,
}

fn run() -> Run {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("src");
    source_tree(&source);
    let (site, report) = generate_into(&source, &dir.path().join("out"));
    Run { dir, site, report }
}

fn generate_into(source: &Path, output: &Path) -> (PathBuf, SiteReport) {
    let model = MetadataModel::load(&fixture_path("Widgets.json")).unwrap();
    let config = SiteConfig::new(
        source.to_path_buf(),
        fixture_path("Widgets.xml"),
        output,
        &model.assembly,
    );
    let report = generate(&model, &config).unwrap();
    (config.output_root, report)
}

/// Every file under `root`, keyed by relative path.
fn snapshot(root: &Path) -> BTreeMap<PathBuf, Vec<u8>> {
    fn walk(root: &Path, dir: &Path, out: &mut BTreeMap<PathBuf, Vec<u8>>) {
        for entry in fs::read_dir(dir).unwrap() {
            let path = entry.unwrap().path();
            if path.is_dir() {
                walk(root, &path, out);
            } else {
                let rel = path.strip_prefix(root).unwrap().to_path_buf();
                out.insert(rel, fs::read(&path).unwrap());
            }
        }
    }
    let mut out = BTreeMap::new();
    walk(root, root, &mut out);
    out
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap()
}

fn hrefs(html: &str) -> Vec<String> {
    html.split("href=\"")
        .skip(1)
        .filter_map(|rest| rest.split('"').next())
        .map(|h| urlencoding::decode(h).unwrap().into_owned())
        .collect()
}

#[test]
fn mirrors_source_layout() {
    let run = run();
    assert!(run.site.join("Widget.html").is_file());
    assert!(run.site.join("Program.html").is_file());
    assert!(run.site.join("Models/Gadget.html").is_file());
    assert!(run.site.join("Models/Sprocket.html").is_file());
    assert!(run.site.join("Data/Access/Repository.html").is_file());
    assert!(!run.site.join("Models/Helpers.html").exists());
    assert_eq!(run.report.pages.len(), 5);
}

#[test]
fn skips_types_without_a_single_source() {
    let run = run();
    let skipped: Vec<_> = run
        .report
        .skipped
        .iter()
        .map(|s| s.type_name.as_str())
        .collect();
    assert_eq!(skipped, vec!["AssemblyInfo", "Ghost"]);
    assert!(run.report.failures.is_empty());
}

#[test]
fn rerun_is_byte_identical() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("src");
    source_tree(&source);

    let (first, _) = generate_into(&source, &dir.path().join("a"));
    let (second, _) = generate_into(&source, &dir.path().join("b"));
    let before = snapshot(&first);
    assert!(!before.is_empty());
    assert_eq!(before, snapshot(&second));

    let (again, _) = generate_into(&source, &dir.path().join("a"));
    assert_eq!(before, snapshot(&again));
}

#[test]
fn rerun_removes_stale_pages() {
    let run = run();
    fs::create_dir_all(run.site.join("Old")).unwrap();
    fs::write(run.site.join("Old/Stale.html"), "old").unwrap();

    let (site, report) = generate_into(&run.dir.path().join("src"), &run.dir.path().join("out"));
    assert!(!site.join("Old").exists());
    assert_eq!(report.linkers.len(), run.report.linkers.len());
}

#[test]
fn correlates_documentation_onto_class_page() {
    let run = run();
    let html = read(&run.site.join("Widget.html"));
    assert!(html.contains("<h1 id=\"page_title\">Widget Class</h1>"));
    assert!(html.contains(
        "<span title=\"Return type\" class=\"return_type\">Boolean</span> <span title=\"Method name\">Save</span>("
    ));
    assert!(html.contains("<p>Persists the widget</p>"));
    assert!(html.contains("<p>id - row id</p>"));
    assert!(html.contains("<p>returns - true when the row was written</p>"));
    assert!(html.contains(
        "<p>Checks invariants before Widgets.Widget.Save(System.Int32,System.String).</p>"
    ));
}

#[test]
fn escapes_documentation_text() {
    let run = run();
    let html = read(&run.site.join("Data/Access/Repository.html"));
    assert!(html.contains("<p>Looks up a row &amp; returns it.</p>"));
}

#[test]
fn inherited_static_and_accessor_members_are_not_rendered() {
    let run = run();
    let html = read(&run.site.join("Widget.html"));
    assert!(!html.contains("ToString"));
    assert!(!html.contains("get_Id"));
    assert!(!html.contains("set_Id"));
    assert!(!html.contains(">Create<"));
    assert!(html.contains(">Validate<"));
}

#[test]
fn undocumented_member_has_heading_only() {
    let run = run();
    let html = read(&run.site.join("Models/Gadget.html"));
    assert!(html.contains("<p>speed - revolutions per second</p>"));
    let reset = html.lines().position(|l| l.contains(">Reset<")).unwrap();
    let next = html.lines().nth(reset + 1).unwrap();
    assert!(!next.contains("<p>"));
}

#[test]
fn class_pages_link_parent_and_neighbours() {
    let run = run();
    let gadget = read(&run.site.join("Models/Gadget.html"));
    assert!(gadget.contains("href=\"Models%20Linker.html\""));
    // Helpers.cs has no page, so Sprocket is Gadget's next sibling.
    assert!(gadget.contains("<a class=\"nav_next\" href=\"Sprocket.html\">Sprocket</a>"));
    assert!(!gadget.contains("nav_previous"));

    let widget = read(&run.site.join("Widget.html"));
    assert!(widget.contains("href=\"Widgets%20Linker.html\""));
    assert!(widget.contains("<a class=\"nav_previous\" href=\"Program.html\">Program</a>"));
}

#[test]
fn every_same_directory_link_resolves() {
    let run = run();
    for page in &run.report.pages {
        let dir = page.parent().unwrap();
        for href in hrefs(&read(page)) {
            if href.contains("://") {
                continue;
            }
            assert!(dir.join(&href).is_file(), "{} links to missing {}", page.display(), href);
        }
    }
}

#[test]
fn root_link_page_lists_pages_and_retained_directories() {
    let run = run();
    let root = read(&run.site.join(linker_file_name("Widgets")));
    let links = hrefs(&root);
    assert!(links.contains(&"Program.html".to_string()));
    assert!(links.contains(&"Widget.html".to_string()));
    assert!(links.contains(&"Models/Models Linker.html".to_string()));
    assert!(links.contains(&"Data/Data Linker.html".to_string()));
    assert!(!root.contains("Widgets Linker.html\">"));
}

#[test]
fn ignored_and_empty_directories_are_absent() {
    let run = run();
    let root = read(&run.site.join(linker_file_name("Widgets")));
    for name in ["bin", "obj", "Empty", "Properties", ".vs", "Styles"] {
        assert!(!root.contains(&format!("{} Directory", name)), "{} listed", name);
        assert!(!run.site.join(name).join(linker_file_name(name)).exists());
    }
}

#[test]
fn retained_directories_have_retained_ancestors() {
    let run = run();
    for linker in &run.report.linkers {
        let mut dir = linker.parent().unwrap();
        while dir != run.site {
            dir = dir.parent().unwrap();
            let name = dir.file_name().unwrap().to_string_lossy();
            assert!(
                dir.join(linker_file_name(&name)).is_file(),
                "ancestor {} of {} has no link page",
                dir.display(),
                linker.display()
            );
        }
    }
}

#[test]
fn subdirectory_links_point_at_link_pages() {
    let run = run();
    for linker in &run.report.linkers {
        let dir = linker.parent().unwrap();
        for href in hrefs(&read(linker)) {
            if href.contains("://") {
                continue;
            }
            let target = dir.join(&href);
            assert!(target.is_file(), "{} links to missing {}", linker.display(), href);
            if href.contains('/') {
                assert!(href.ends_with(LINKER_SUFFIX));
            }
        }
    }
}

#[test]
fn intermediate_directory_without_pages_is_kept() {
    let run = run();
    let data = read(&run.site.join("Data").join(linker_file_name("Data")));
    assert!(hrefs(&data).contains(&"Access/Access Linker.html".to_string()));
    assert!(run.site.join("Data/Access/Access Linker.html").is_file());
}

#[test]
fn stylesheet_and_scripts_are_relative_to_each_page() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("src");
    source_tree(&source);
    let css = dir.path().join("w3.css");
    fs::write(&css, "body {}").unwrap();

    let model = MetadataModel::load(&fixture_path("Widgets.json")).unwrap();
    let config = SiteConfig {
        stylesheet: Some(css),
        scripts: vec!["Scripts/nav.js".to_string()],
        ..SiteConfig::new(
            source,
            fixture_path("Widgets.xml"),
            &dir.path().join("out"),
            &model.assembly,
        )
    };
    generate(&model, &config).unwrap();

    let site = &config.output_root;
    assert!(site.join("Styles/w3.css").is_file());
    let deep = read(&site.join("Data/Access/Repository.html"));
    assert!(deep.contains("href=\"../../Styles/w3.css\""));
    assert!(deep.contains("<script src=\"../../Scripts/nav.js\"></script>"));
    let top = read(&site.join("Widget.html"));
    assert!(top.contains("href=\"Styles/w3.css\""));
}

#[test]
fn missing_documentation_aborts_without_touching_output() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("src");
    source_tree(&source);
    let site = dir.path().join("out/Widgets");
    fs::create_dir_all(&site).unwrap();
    fs::write(site.join("Keep.html"), "previous run").unwrap();

    let model = MetadataModel::load(&fixture_path("Widgets.json")).unwrap();
    let config = SiteConfig::new(
        source,
        dir.path().join("missing.xml"),
        &dir.path().join("out"),
        &model.assembly,
    );
    let err = generate(&model, &config).unwrap_err();
    assert!(matches!(err, Error::DocSourceMissing { .. }));
    assert!(site.join("Keep.html").is_file());
}

#[test]
fn malformed_documentation_aborts() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("src");
    source_tree(&source);
    let docs = dir.path().join("broken.xml");
    fs::write(&docs, "<doc><members><member name=\"M:X\"></doc>").unwrap();

    let model = MetadataModel::load(&fixture_path("Widgets.json")).unwrap();
    let config = SiteConfig::new(source, docs, &dir.path().join("out"), &model.assembly);
    let err = generate(&model, &config).unwrap_err();
    assert!(matches!(err, Error::MalformedDocs { .. }));
}

#[test]
fn reserved_characters_in_names_are_percent_encoded() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("src");
    touch(&source, "C#/Gizmo.cs");
    touch(&source, "C#/Sprocket.cs");

    let model = MetadataModel::from_json(
        r#"{ "assembly": "Widgets", "types": [{ "name": "Gizmo" }, { "name": "Sprocket" }] }"#,
    )
    .unwrap();
    let config = SiteConfig::new(
        source,
        fixture_path("Widgets.xml"),
        &dir.path().join("out"),
        &model.assembly,
    );
    let report = generate(&model, &config).unwrap();

    let site = &config.output_root;
    let root = read(&site.join(linker_file_name("Widgets")));
    assert!(root.contains("<a href=\"C%23/C%23%20Linker.html\">C# Directory</a>"));
    let gizmo = read(&site.join("C#/Gizmo.html"));
    assert!(gizmo.contains("href=\"C%23%20Linker.html\""));

    for page in report.pages.iter().chain(&report.linkers) {
        let dir = page.parent().unwrap();
        for href in hrefs(&read(page)) {
            if !href.contains("://") {
                assert!(dir.join(&href).is_file(), "{} links to missing {}", page.display(), href);
            }
        }
    }
}

#[test]
fn unsafe_assembly_name_is_rejected_before_anything_is_deleted() {
    for assembly in ["", ".", "..", "../escape"] {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("src");
        source_tree(&source);
        let out = dir.path().join("out");
        fs::create_dir_all(&out).unwrap();
        fs::write(out.join("precious.txt"), "keep").unwrap();

        let model = MetadataModel {
            assembly: assembly.to_string(),
            ..MetadataModel::load(&fixture_path("Widgets.json")).unwrap()
        };
        let config = SiteConfig::new(source, fixture_path("Widgets.xml"), &out, &model.assembly);
        let err = generate(&model, &config).unwrap_err();

        assert!(matches!(err, Error::InvalidAssemblyName { .. }), "{:?}", assembly);
        assert!(out.join("precious.txt").is_file(), "{:?} deleted output", assembly);
        assert!(dir.path().join("src/Widget.cs").is_file());
    }
}
